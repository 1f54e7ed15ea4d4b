use crate::catalog::{DirectoryReport, LocalCatalog};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::CatalogStore;
use std::path::Path;

pub fn run<S: CatalogStore>(catalog: &mut LocalCatalog<S>, dir: &Path) -> Result<CmdResult> {
    let report = catalog.add_directory(dir)?;
    let mut result = CmdResult::default();
    report_messages(&mut result, &report);
    result.add_message(CmdMessage::info(format!(
        "The catalog now contains {} movies.",
        catalog.movies().len()
    )));
    Ok(result)
}

/// Messages for one scanned box, shared with `update`.
pub fn report_messages(result: &mut CmdResult, report: &DirectoryReport) {
    for title in &report.duplicates {
        result.add_message(CmdMessage::warning(format!(
            "{} already exists in the catalog!",
            title
        )));
    }
    for path in &report.unreadable {
        result.add_message(CmdMessage::warning(format!(
            "Could not read {}",
            path.display()
        )));
    }
    result.add_message(CmdMessage::success(format!(
        "Added {} new movies from: {}",
        report.added,
        report.dir.display()
    )));
}
