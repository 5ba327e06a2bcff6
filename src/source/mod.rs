//! Site sources: where the catalog and content fragments are read from.
//!
//! Every path handed to a [`Fetcher`] is relative to the site, in the same
//! form a browser would request it (`content/patterns.json`,
//! `/patterns.json`, ...).

pub mod fs;
#[cfg(feature = "network")]
pub mod http;
pub mod memory;

use thiserror::Error;

pub use fs::FsFetcher;
#[cfg(feature = "network")]
pub use http::HttpFetcher;
pub use memory::MemoryFetcher;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0}: not found")]
    NotFound(String),
    #[error("{path}: HTTP {status}")]
    Status { path: String, status: u16 },
    #[error("{0}: path escapes the site root")]
    InvalidPath(String),
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[cfg(feature = "network")]
    #[error("{path}: {source}")]
    Http {
        path: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Reads a site-relative path and returns its text.
///
/// Implementations are shared with content-load worker threads.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, path: &str) -> Result<String, FetchError>;

    /// Human-readable location of the site, for status lines and logs.
    fn describe(&self) -> String;
}
