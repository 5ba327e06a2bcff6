use thiserror::Error;

use crate::catalog::Catalog;
use crate::source::Fetcher;

/// Where the manifest may live, tried in order.
pub const DEFAULT_CATALOG_PATHS: &[&str] = &[
    "content/patterns.json",
    "/content/patterns.json",
    "patterns.json",
    "/patterns.json",
];

#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("no catalog locations configured")]
    NoCandidates,
    #[error("failed to load patterns data (tried {tried}): {last}", tried = .tried.join(", "))]
    NoCandidate { tried: Vec<String>, last: String },
}

/// Fetch and parse the catalog from the first candidate that yields a
/// non-empty object of patterns. Nothing is cached between calls.
pub fn load_catalog<S: AsRef<str>>(
    fetcher: &dyn Fetcher,
    candidates: &[S],
) -> Result<Catalog, CatalogLoadError> {
    let mut tried = Vec::new();
    let mut last = None;

    for candidate in candidates {
        let path = candidate.as_ref();
        log::debug!("attempting to load patterns data from {path}");
        tried.push(path.to_string());

        let text = match fetcher.fetch(path) {
            Ok(text) => text,
            Err(e) => {
                log::debug!("catalog candidate failed: {e}");
                last = Some(e.to_string());
                continue;
            }
        };

        match Catalog::from_json(&text) {
            Ok(catalog) => {
                log::info!(
                    "loaded {} patterns ({} problems) from {path}",
                    catalog.patterns().len(),
                    catalog.problem_count()
                );
                return Ok(catalog);
            }
            Err(e) => {
                log::warn!("catalog at {path} rejected: {e}");
                last = Some(format!("{path}: {e}"));
            }
        }
    }

    match last {
        Some(last) => Err(CatalogLoadError::NoCandidate { tried, last }),
        None => Err(CatalogLoadError::NoCandidates),
    }
}
