//! Side effects on media: downloading posters, moving files, launching a player.
//!
//! The organizer and the find command reach these through [`FileFetcher`] and
//! [`MediaLauncher`] so tests can record calls instead of hitting the network
//! or spawning processes.

use crate::error::{MovierError, Result};
use reqwest::blocking::Client;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;
use tracing::{debug, warn};
use walkdir::WalkDir;

pub trait FileFetcher {
    /// Downloads `url` into `dest`.
    fn fetch(&self, url: &str, dest: &Path) -> Result<()>;
}

pub trait MediaLauncher {
    /// Opens `file` with a media player, without waiting for it to exit.
    fn launch(&self, file: &Path) -> Result<()>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("movier/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| MovierError::Provider(format!("client: {}", e)))?;
        Ok(Self { client })
    }
}

impl FileFetcher for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<()> {
        debug!(url, dest = %dest.display(), "downloading");
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| MovierError::Api(format!("download failed: {}", e)))?;
        if !resp.status().is_success() {
            return Err(MovierError::Api(format!(
                "download failed: HTTP {}",
                resp.status()
            )));
        }
        let bytes = resp
            .bytes()
            .map_err(|e| MovierError::Api(format!("download failed: {}", e)))?;
        fs::write(dest, &bytes)?;
        Ok(())
    }
}

/// Runs a player command line with the movie file appended.
pub struct CommandLauncher {
    program: String,
    args: Vec<String>,
}

impl CommandLauncher {
    /// `player` is a command line such as `mpv --fs`. `None` picks the
    /// platform default.
    pub fn new(player: Option<&str>) -> Self {
        let line = player
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(default_player());
        let mut words = line.split_whitespace().map(str::to_string);
        let program = words.next().unwrap_or_default();
        Self {
            program,
            args: words.collect(),
        }
    }

    pub fn command_line(&self, file: &Path) -> Vec<String> {
        let mut line = vec![self.program.clone()];
        line.extend(self.args.iter().cloned());
        line.push(file.to_string_lossy().into_owned());
        line
    }
}

impl MediaLauncher for CommandLauncher {
    fn launch(&self, file: &Path) -> Result<()> {
        debug!(program = %self.program, file = %file.display(), "launching player");
        Command::new(&self.program)
            .args(&self.args)
            .arg(file)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| MovierError::Api(format!("Failed to start {}: {}", self.program, e)))?;
        Ok(())
    }
}

fn default_player() -> &'static str {
    #[cfg(target_os = "macos")]
    {
        "open -a VLC"
    }

    #[cfg(target_os = "windows")]
    {
        "explorer"
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        "xdg-open"
    }
}

/// Files under `root` at least `min_size` bytes, sorted by path.
pub fn list_media_files(root: &Path, min_size: u64) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.metadata().map(|m| m.len() >= min_size).unwrap_or(false))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// The biggest file of at least `min_size` bytes under `dir`.
pub fn largest_media_file(dir: &Path, min_size: u64) -> Option<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let len = e.metadata().ok()?.len();
            (len >= min_size).then(|| (len, e.into_path()))
        })
        .max_by_key(|(len, _)| *len)
        .map(|(_, path)| path)
}

/// Moves a file, falling back to copy and remove across filesystems.
pub fn move_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    warn!(from = %from.display(), to = %to.display(), "rename failed, copying instead");
    fs::copy(from, to)?;
    fs::remove_file(from)?;
    Ok(())
}

#[cfg(any(test, feature = "test_utils"))]
pub mod recording {
    use super::*;
    use std::cell::RefCell;

    /// Writes a placeholder instead of downloading. Fails for listed URLs.
    #[derive(Default)]
    pub struct RecordingFetcher {
        pub fetched: RefCell<Vec<(String, PathBuf)>>,
        pub failing: Vec<String>,
    }

    impl FileFetcher for RecordingFetcher {
        fn fetch(&self, url: &str, dest: &Path) -> Result<()> {
            if self.failing.iter().any(|u| u == url) {
                return Err(MovierError::Api(format!("download failed: {}", url)));
            }
            fs::write(dest, b"poster")?;
            self.fetched
                .borrow_mut()
                .push((url.to_string(), dest.to_path_buf()));
            Ok(())
        }
    }

    #[derive(Default)]
    pub struct RecordingLauncher {
        pub launched: RefCell<Vec<PathBuf>>,
    }

    impl MediaLauncher for RecordingLauncher {
        fn launch(&self, file: &Path) -> Result<()> {
            self.launched.borrow_mut().push(file.to_path_buf());
            Ok(())
        }
    }
}
