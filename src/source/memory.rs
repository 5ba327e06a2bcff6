use std::collections::HashMap;
use std::sync::Mutex;

use super::{FetchError, Fetcher};

/// In-memory site. Records every requested path so callers can check the
/// order candidates were tried in.
#[derive(Default)]
pub struct MemoryFetcher {
    files: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, body: &str) -> Self {
        self.insert(path, body);
        self
    }

    pub fn insert(&mut self, path: &str, body: &str) {
        self.files
            .insert(path.trim_start_matches('/').to_string(), body.to_string());
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl Fetcher for MemoryFetcher {
    fn fetch(&self, path: &str) -> Result<String, FetchError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(path.to_string());
        }
        self.files
            .get(path.trim_start_matches('/'))
            .cloned()
            .ok_or_else(|| FetchError::NotFound(path.to_string()))
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
