use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use super::{FetchError, Fetcher};

/// Serves a site from a local directory.
///
/// Leading slashes are resolved against the site root, so `/patterns.json`
/// and `patterns.json` name the same file.
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, FetchError> {
        let relative = Path::new(path.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(FetchError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl Fetcher for FsFetcher {
    fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let full = self.resolve(path)?;
        fs::read_to_string(&full).map_err(|e| match e.kind() {
            ErrorKind::NotFound => FetchError::NotFound(path.to_string()),
            _ => FetchError::Io {
                path: path.to_string(),
                source: e,
            },
        })
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}
