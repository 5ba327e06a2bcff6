use std::sync::Arc;
use std::thread;

use thiserror::Error;

use crate::content::paths::candidate_paths;
use crate::content::LoadRequest;
use crate::source::Fetcher;

#[derive(Debug, Error)]
pub enum ContentLoadError {
    #[error(
        "no content found for pattern '{pattern}', problem '{problem}' ({language}); tried {tried}",
        tried = .tried.join(", ")
    )]
    NotFound {
        pattern: String,
        problem: String,
        language: &'static str,
        tried: Vec<String>,
    },
}

/// A fetched fragment, before injection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedContent {
    pub path: String,
    pub html: String,
}

/// Outcome of a request, sent back to the UI thread.
#[derive(Debug)]
pub struct ContentResponse {
    pub request: LoadRequest,
    pub result: Result<LoadedContent, ContentLoadError>,
}

/// Try each candidate location in order; the first successful fetch wins
/// and the remaining candidates are never requested.
pub fn load_content(
    fetcher: &dyn Fetcher,
    request: &LoadRequest,
) -> Result<LoadedContent, ContentLoadError> {
    let position = &request.position;
    let candidates =
        candidate_paths(&position.pattern_id, &position.problem_id, request.language);
    let mut tried = Vec::with_capacity(candidates.len());

    for path in candidates {
        log::debug!("attempting to fetch {path}");
        match fetcher.fetch(&path) {
            Ok(html) => {
                log::info!("loaded content from {path}");
                return Ok(LoadedContent { path, html });
            }
            Err(e) => {
                log::debug!("content candidate failed: {e}");
                tried.push(path);
            }
        }
    }

    log::warn!("no content found for {position} ({})", request.language.to_key());
    Err(ContentLoadError::NotFound {
        pattern: position.pattern_id.clone(),
        problem: position.problem_id.clone(),
        language: request.language.to_key(),
        tried,
    })
}

/// Run [`load_content`] on a worker thread and hand the response to
/// `deliver`. Requests are never cancelled; the receiver is responsible for
/// dropping responses it no longer wants.
pub fn spawn_load<F>(fetcher: Arc<dyn Fetcher>, request: LoadRequest, deliver: F)
where
    F: FnOnce(ContentResponse) + Send + 'static,
{
    thread::spawn(move || {
        let result = load_content(fetcher.as_ref(), &request);
        deliver(ContentResponse { request, result });
    });
}
