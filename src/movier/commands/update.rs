use crate::catalog::LocalCatalog;
use crate::commands::add::report_messages;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::CatalogStore;

pub fn run<S: CatalogStore>(catalog: &mut LocalCatalog<S>) -> Result<CmdResult> {
    let reports = catalog.rebuild()?;
    let mut result = CmdResult::default();
    for report in &reports {
        report_messages(&mut result, report);
    }
    let missing = catalog.boxes().len() - reports.len();
    if missing > 0 {
        result.add_message(CmdMessage::warning(format!(
            "{} boxes could not be scanned",
            missing
        )));
    }
    result.add_message(CmdMessage::info(format!(
        "The catalog now contains {} movies.",
        catalog.movies().len()
    )));
    Ok(result)
}
