use crate::catalog::{titleize, MARKER_FILENAME};
use crate::commands::{CmdMessage, CmdResult, OrganizedMovie};
use crate::error::{MovierError, Result};
use crate::media::{list_media_files, move_file, FileFetcher};
use crate::model::{MovieDetails, MovieMarker, SourceFile};
use crate::normalize::poster_path;
use crate::prompt::Prompter;
use crate::provider::MetadataProvider;
use crate::resolver::{Resolution, ResolverLimits, TitleResolver};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct OrganizeOptions {
    pub source: PathBuf,
    /// Library root. Asked for when missing.
    pub target: Option<PathBuf>,
    /// Language for every file. Asked per file when missing.
    pub language: Option<String>,
    pub default_language: String,
    pub auto_guess: bool,
    pub min_size: u64,
    pub limits: ResolverLimits,
}

/// Whether `file` sits next to a marker, i.e. was organized before.
pub fn is_organized(file: &Path) -> bool {
    file.parent()
        .map(|dir| dir.join(MARKER_FILENAME).exists())
        .unwrap_or(false)
}

/// Canonical folder name for a language answer.
pub fn normalize_language(answer: &str) -> String {
    let answer = answer.trim();
    match answer.to_lowercase().as_str() {
        "" | "en" | "eng" | "english" => "English".to_string(),
        "hi" | "hindi" => "Hindi".to_string(),
        "fr" | "french" => "French".to_string(),
        _ => titleize(answer),
    }
}

/// `Title (Year)` with path separators and colons replaced.
pub fn folder_name(details: &MovieDetails) -> String {
    format!("{} ({})", details.title, details.year)
        .replace(['\\', '/', ':'], " - ")
}

/// `<target>/<Language>/<rating>+/<Title (Year)>`.
pub fn movie_dir(target: &Path, language: &str, details: &MovieDetails) -> PathBuf {
    target
        .join(language)
        .join(format!("{}+", details.rating.trunc() as u32))
        .join(folder_name(details))
}

pub fn run<P, Q, F>(
    provider: &P,
    prompter: &mut Q,
    fetcher: &F,
    options: &OrganizeOptions,
) -> Result<CmdResult>
where
    P: MetadataProvider,
    Q: Prompter,
    F: FileFetcher,
{
    let mut result = CmdResult::default();

    if !options.source.is_dir() {
        return Err(MovierError::NotFound(format!(
            "No such directory: {}",
            options.source.display()
        )));
    }

    let pending: Vec<PathBuf> = list_media_files(&options.source, options.min_size)
        .into_iter()
        .filter(|f| !is_organized(f))
        .collect();
    if pending.is_empty() {
        result.add_message(CmdMessage::success(
            "All movies have already been organized.",
        ));
        return Ok(result);
    }
    info!("Found approx {} movies", pending.len());

    let target = match &options.target {
        Some(target) => target.clone(),
        None => prompter.ask_directory("Where should the organized movies go?")?,
    };
    if !target.is_dir() {
        return Err(MovierError::NotFound(format!(
            "No such directory: {}",
            target.display()
        )));
    }

    for file in pending {
        info!(path = %file.display(), "Organizing..");
        match organize_file(provider, prompter, fetcher, options, &target, &file) {
            Ok(Some(organized)) => {
                result.add_message(CmdMessage::success(format!(
                    "{}: {} at {} points with {} votes",
                    if organized.guessed { "Guessed" } else { "Selected" },
                    organized.details.nice_name(),
                    organized.details.raw_rating,
                    organized.details.raw_votes,
                )));
                result.organized.push(organized);
            }
            Ok(None) => {}
            Err(e @ MovierError::Prompt(_)) => return Err(e),
            Err(e) => {
                warn!(path = %file.display(), error = %e, "could not organize");
                result.add_message(CmdMessage::warning(format!(
                    "Could not organize {}: {}",
                    file.display(),
                    e
                )));
            }
        }
    }

    if !result.organized.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "Organized {} movies into {}",
            result.organized.len(),
            target.display()
        )));
    }
    Ok(result)
}

fn organize_file<P, Q, F>(
    provider: &P,
    prompter: &mut Q,
    fetcher: &F,
    options: &OrganizeOptions,
    target: &Path,
    file: &Path,
) -> Result<Option<OrganizedMovie>>
where
    P: MetadataProvider,
    Q: Prompter,
    F: FileFetcher,
{
    let resolution = TitleResolver::new(provider, prompter)
        .with_limits(options.limits)
        .resolve(file, options.auto_guess)?;

    let movie = match resolution {
        Resolution::Resolved(movie) => *movie,
        Resolution::Skipped => {
            info!(path = %file.display(), "ignored");
            return Ok(None);
        }
        Resolution::NotFound => {
            warn!(path = %file.display(), "no movie found");
            return Ok(None);
        }
    };

    let language = match &options.language {
        Some(language) => language.clone(),
        None => prompter.ask_language(&options.default_language)?,
    };
    let language = normalize_language(&language);

    let to = rearrange(
        fetcher,
        file,
        target,
        &language,
        &movie.details,
        movie.source.clone(),
        movie.guessed,
    )?;

    Ok(Some(OrganizedMovie {
        details: movie.details,
        guessed: movie.guessed,
        from: file.to_path_buf(),
        to,
    }))
}

/// Moves `file` into the library, then writes its marker and poster.
pub fn rearrange<F: FileFetcher>(
    fetcher: &F,
    file: &Path,
    target: &Path,
    language: &str,
    details: &MovieDetails,
    source: SourceFile,
    guessed: bool,
) -> Result<PathBuf> {
    let dir = movie_dir(target, language, details);
    let ext = file
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let dest = dir.join(format!("{}{}", folder_name(details), ext));
    if dest.exists() {
        return Err(MovierError::Api(format!(
            "{} already exists",
            dest.display()
        )));
    }

    move_file(file, &dest)?;

    let marker = MovieMarker {
        source,
        guessed,
        organized_at: Some(Utc::now()),
        imdb: details.clone(),
    };
    fs::write(dir.join(MARKER_FILENAME), serde_yaml::to_string(&marker)?)?;

    if details.has_poster() {
        let poster = poster_path(details, &dir);
        if let Err(e) = fetcher.fetch(&details.poster, &poster) {
            warn!(url = %details.poster, error = %e, "could not download poster");
        }
    }

    Ok(dest)
}
