use crate::catalog::LocalCatalog;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{MovierError, Result};
use crate::store::CatalogStore;

/// Splits a `a, b` tag list.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn run<S: CatalogStore>(
    catalog: &mut LocalCatalog<S>,
    ids: &[String],
    tags: &[String],
) -> Result<CmdResult> {
    if tags.is_empty() {
        return Err(MovierError::Api("No tags given".to_string()));
    }

    let mut result = CmdResult::default();
    for id in ids.iter().filter(|id| catalog.lookup(id).is_none()) {
        result.add_message(CmdMessage::warning(format!("No movie with id {}", id)));
    }

    let updated = catalog.add_tags(ids, tags)?;
    if !updated.is_empty() {
        let names: Vec<&str> = updated[0]
            .tags
            .iter()
            .filter(|t| tags.iter().any(|given| given.trim().eq_ignore_ascii_case(t)))
            .map(String::as_str)
            .collect();
        result.add_message(CmdMessage::success(format!(
            "Tagged {} movies with '{}'",
            updated.len(),
            names.join(", ")
        )));
    }
    Ok(result.with_movies(updated))
}
