use std::time::Duration;

use reqwest::Url;

use super::{FetchError, Fetcher};

/// Serves a site over HTTP(S).
///
/// Relative paths resolve against the base URL; paths with a leading slash
/// resolve against the host root, the way a browser resolves them.
pub struct HttpFetcher {
    base: Url,
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(base: &str) -> anyhow::Result<Self> {
        let mut base = Url::parse(base)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { base, client })
    }

    fn url_for(&self, path: &str) -> Result<Url, FetchError> {
        self.base
            .join(path)
            .map_err(|_| FetchError::InvalidPath(path.to_string()))
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let url = self.url_for(path)?;
        let http_err = |source| FetchError::Http {
            path: path.to_string(),
            source,
        };
        let response = self.client.get(url).send().map_err(http_err)?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().map_err(http_err)
    }

    fn describe(&self) -> String {
        self.base.to_string()
    }
}
