use crate::catalog::{titleize, LocalCatalog, QueryFilter};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{MovierError, Result};
use crate::media::{largest_media_file, MediaLauncher};
use crate::model::CatalogMovie;
use crate::store::CatalogStore;
use rand::Rng;

pub fn run<S: CatalogStore, R: Rng + ?Sized>(
    catalog: &mut LocalCatalog<S>,
    filter: &QueryFilter,
    add_tags: &[String],
    rng: &mut R,
) -> Result<CmdResult> {
    catalog.reload()?;
    if catalog.is_empty() {
        return Err(MovierError::Api(
            "Please, add some movie boxes, before searching in the local movie database"
                .to_string(),
        ));
    }

    let mut movies = catalog.query(filter, rng);
    let mut result = CmdResult::default();
    if movies.is_empty() {
        result.add_message(CmdMessage::info("No movies matched."));
        return Ok(result);
    }

    if !add_tags.is_empty() {
        let ids: Vec<String> = movies.iter().map(|m| m.id.clone()).collect();
        let updated = catalog.add_tags(&ids, add_tags)?;
        for movie in movies.iter_mut() {
            if let Some(fresh) = updated.iter().find(|u| u.id == movie.id) {
                movie.tags = fresh.tags.clone();
            }
        }
        let names: Vec<String> = add_tags.iter().map(|t| titleize(t.trim())).collect();
        result.add_message(CmdMessage::success(format!(
            "Added tags: '{}' to this search!",
            names.join(", ")
        )));
    }

    Ok(result.with_movies(movies))
}

/// Opens the biggest media file in the movie's folder.
pub fn play<L: MediaLauncher>(
    movie: &CatalogMovie,
    min_size: u64,
    launcher: &L,
) -> Result<CmdResult> {
    let file = largest_media_file(&movie.path, min_size).ok_or_else(|| {
        MovierError::NotFound(format!("media file in {}", movie.path.display()))
    })?;
    launcher.launch(&file)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(format!("Opening: {}", movie.nice_name())));
    Ok(result)
}
