use crate::catalog::LocalCatalog;
use crate::commands::{CmdMessage, CmdResult, Lookup};
use crate::error::Result;
use crate::provider::{MediaKind, MetadataProvider, SearchQuery};
use crate::store::CatalogStore;
use tracing::warn;

/// Titles with fewer votes are noise unless everything was asked for.
pub const MIN_VOTES: u64 = 1000;

#[derive(Debug, Clone, Default)]
pub struct InfoOptions {
    pub year: Option<String>,
    /// Keep every media type and every vote count.
    pub all: bool,
}

pub fn run<P: MetadataProvider, S: CatalogStore>(
    provider: &P,
    catalog: &LocalCatalog<S>,
    keyword: &str,
    options: &InfoOptions,
) -> Result<CmdResult> {
    let kind = if options.all {
        MediaKind::All
    } else {
        MediaKind::Movie
    };
    let query = SearchQuery::movie(keyword, options.year.clone()).with_kind(kind);
    let hits = provider.search(&query)?;

    let mut lookups = Vec::new();
    for hit in hits {
        let details = match provider.fetch_details(&hit.external_id) {
            Ok(details) => details,
            Err(e) => {
                warn!(id = %hit.external_id, error = %e, "could not fetch details");
                continue;
            }
        };
        if details.votes < MIN_VOTES && !options.all {
            continue;
        }
        lookups.push(Lookup {
            available: catalog.lookup(&details.external_id).is_some(),
            details,
        });
    }

    let mut result = CmdResult::default();
    if lookups.is_empty() {
        result.add_message(CmdMessage::warning(format!(
            "No movie found for: {}",
            keyword
        )));
    }
    Ok(result.with_lookups(lookups))
}
