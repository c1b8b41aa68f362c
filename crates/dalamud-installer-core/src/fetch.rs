//! HTTP download
//!
//! Everything that touches the network goes through [`Fetch`], so the
//! catalog and installer can be driven by an in-memory fetcher in tests.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL};

use crate::error::{InstallerError, Result};
use crate::settings::HttpSettings;

/// Downloads the full body of a URL
pub trait Fetch: Send + Sync {
    fn get(&self, url: &str) -> Result<Vec<u8>>;
}

/// Blocking reqwest client with a fixed request timeout
pub struct HttpFetcher {
    client: Client,
    timeout_secs: u64,
}

impl HttpFetcher {
    pub fn new(settings: &HttpSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-transform"));

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(InstallerError::HttpClient)?;

        Ok(Self {
            client,
            timeout_secs: settings.timeout_secs,
        })
    }

    fn wrap(&self, url: &str, err: reqwest::Error) -> InstallerError {
        if err.is_timeout() {
            InstallerError::Timeout {
                url: url.to_string(),
                secs: self.timeout_secs,
                source: Box::new(err),
            }
        } else {
            InstallerError::Network {
                url: url.to_string(),
                source: Box::new(err),
            }
        }
    }
}

impl Fetch for HttpFetcher {
    fn get(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!(url = %url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| self.wrap(url, e))?;

        let body = response.bytes().map_err(|e| self.wrap(url, e))?;
        tracing::debug!(url = %url, bytes = body.len(), "Downloaded");

        Ok(body.to_vec())
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// In-memory fetcher that records every requested URL
    #[derive(Default)]
    pub struct MockFetcher {
        responses: HashMap<String, Vec<u8>>,
        requests: Mutex<Vec<String>>,
    }

    impl MockFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
            self.responses.insert(url.to_string(), body.into());
            self
        }

        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }

        pub fn request_count(&self, url: &str) -> usize {
            self.requests().iter().filter(|r| *r == url).count()
        }
    }

    impl Fetch for MockFetcher {
        fn get(&self, url: &str) -> Result<Vec<u8>> {
            self.requests.lock().unwrap().push(url.to_string());
            self.responses
                .get(url)
                .cloned()
                .ok_or_else(|| InstallerError::Network {
                    url: url.to_string(),
                    source: Box::new(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "404 Not Found",
                    )),
                })
        }
    }
}
