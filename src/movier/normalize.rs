//! Conversion of provider records into catalog records.

use crate::model::{CatalogMovie, MovieDetails, NOT_AVAILABLE};
use std::path::{Path, PathBuf};

/// Builds the catalog shape of `details`.
///
/// `box_dir` is the source directory the movie was added from and
/// `marker_path` the `imdb.txt` file it was read from. The movie's `path` is the
/// marker's folder, and its local poster lives next to it.
pub fn normalize(details: &MovieDetails, box_dir: &Path, marker_path: &Path) -> CatalogMovie {
    let path = marker_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    CatalogMovie {
        id: details.external_id.clone(),
        hash: fingerprint(&details.nice_name()),
        title: details.title.clone(),
        year: details.year.clone(),
        rated: details.rated.clone(),
        released: details.released.clone(),
        runtime: details.runtime.clone(),
        genre: split_list(&details.genre),
        directors: split_list(&details.director),
        writers: split_list(&details.writer),
        actors: split_list(&details.actors),
        plot: details.plot.clone(),
        poster: details.poster.clone(),
        poster_local_path: poster_path(details, &path),
        rating: details.rating,
        votes: details.votes,
        weight: details.weight().max(0.0) as u64,
        kind: details.media_type.clone(),
        tags: Vec::new(),
        box_dir: box_dir.to_path_buf(),
        path,
    }
}

/// First 8 hex characters of the MD5 digest of `text`.
pub fn fingerprint(text: &str) -> String {
    let digest = format!("{:x}", md5::compute(text.as_bytes()));
    digest[..8].to_string()
}

/// Splits a comma separated provider field. `N/A` counts as empty.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != NOT_AVAILABLE)
        .map(str::to_string)
        .collect()
}

/// Where the downloaded poster is stored: `poster<ext>` in the movie folder.
pub fn poster_path(details: &MovieDetails, movie_dir: &Path) -> PathBuf {
    if !details.has_poster() {
        return PathBuf::new();
    }
    movie_dir.join(format!("poster{}", poster_extension(&details.poster)))
}

/// Extension of a poster URL, with its dot. Defaults to `.jpg`.
pub fn poster_extension(url: &str) -> String {
    let file = url
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .rsplit('/')
        .next()
        .unwrap_or_default();
    match file.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() && ext.len() <= 4 => format!(".{}", ext.to_lowercase()),
        _ => ".jpg".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::memory::fixtures::details;

    #[test]
    fn lists_are_split_and_trimmed() {
        assert_eq!(
            split_list(" Action,  Sci-Fi ,Drama"),
            vec!["Action", "Sci-Fi", "Drama"]
        );
        assert!(split_list("N/A").is_empty());
        assert!(split_list("").is_empty());
        assert_eq!(split_list("A,,B"), vec!["A", "B"]);
    }

    #[test]
    fn fingerprint_is_eight_hex_chars() {
        let hash = fingerprint("The Matrix [1999]");
        assert_eq!(hash.len(), 8);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash, fingerprint("The Matrix [1999]"));
        assert_ne!(hash, fingerprint("The Matrix [2000]"));
    }

    #[test]
    fn normalize_builds_catalog_record() {
        let mut d = details("tt0133093", "The Matrix", "1999", "8.5", "1,500,000");
        d.genre = "Action, Sci-Fi".to_string();
        d.director = "Lana Wachowski, Lilly Wachowski".to_string();

        let movie = normalize(
            &d,
            Path::new("/movies"),
            Path::new("/movies/English/8+/The Matrix (1999)/imdb.txt"),
        );

        assert_eq!(movie.id, "tt0133093");
        assert_eq!(movie.hash, fingerprint("The Matrix [1999]"));
        assert_eq!(movie.genre, vec!["Action", "Sci-Fi"]);
        assert_eq!(movie.directors, vec!["Lana Wachowski", "Lilly Wachowski"]);
        assert_eq!(movie.actors, vec!["Tom Hanks", "Meg Ryan"]);
        assert_eq!(movie.weight, 12_750_000);
        assert_eq!(movie.votes, 1_500_000);
        assert!(movie.tags.is_empty());
        assert_eq!(movie.box_dir, PathBuf::from("/movies"));
        assert_eq!(
            movie.path,
            PathBuf::from("/movies/English/8+/The Matrix (1999)")
        );
        assert_eq!(
            movie.poster_local_path,
            PathBuf::from("/movies/English/8+/The Matrix (1999)/poster.jpg")
        );
    }

    #[test]
    fn weight_is_truncated() {
        let d = details("tt1", "X", "2000", "7.3", "3");
        let movie = normalize(&d, Path::new("/b"), Path::new("/b/x/imdb.txt"));
        // 7.3 * 3 = 21.9
        assert_eq!(movie.weight, 21);
    }

    #[test]
    fn missing_fields_become_empty() {
        let mut d = details("tt1", "X", "2000", "N/A", "N/A");
        d.writer = "N/A".to_string();
        d.poster = "N/A".to_string();
        let movie = normalize(&d, Path::new("/b"), Path::new("/b/x/imdb.txt"));
        assert!(movie.writers.is_empty());
        assert_eq!(movie.rating, 0.0);
        assert_eq!(movie.weight, 0);
        assert_eq!(movie.poster_local_path, PathBuf::new());
    }

    #[test]
    fn poster_extension_comes_from_url() {
        assert_eq!(poster_extension("https://m.media-amazon.com/images/M/abc.PNG"), ".png");
        assert_eq!(poster_extension("https://img.example/x.jpeg?size=big"), ".jpeg");
        assert_eq!(poster_extension("https://img.example/noext"), ".jpg");
    }
}
