use std::fs;
use std::path::PathBuf;

use log::debug;
use reqwest::header::USER_AGENT;

use crate::error::{Error, Result};
use crate::http_client::http_client;

pub const DEFAULT_MATCHES_URL: &str = "http://live.mobileapp.fifa.com/api/wc/matches";

/// Source of the raw matches payload.
pub trait MatchFeed {
    fn fetch_matches(&self) -> Result<String>;
}

pub struct HttpFeed {
    pub url: String,
    pub timeout_secs: u64,
}

impl MatchFeed for HttpFeed {
    fn fetch_matches(&self) -> Result<String> {
        let client = http_client(self.timeout_secs)
            .map_err(|err| Error::UpstreamUnavailable(format!("{err:#}")))?;
        let resp = client
            .get(&self.url)
            .header(USER_AGENT, "Mozilla/5.0")
            .send()
            .map_err(|err| Error::UpstreamUnavailable(format!("GET {}: {err}", self.url)))?;
        let status = resp.status();
        let body = resp
            .text()
            .map_err(|err| Error::UpstreamUnavailable(format!("reading body: {err}")))?;
        if !status.is_success() {
            return Err(Error::UpstreamUnavailable(format!(
                "http {status} from {}",
                self.url
            )));
        }
        debug!("fetched {} bytes from {}", body.len(), self.url);
        Ok(body)
    }
}

/// Replays a payload saved to disk.
pub struct FileFeed {
    pub path: PathBuf,
}

impl MatchFeed for FileFeed {
    fn fetch_matches(&self) -> Result<String> {
        let body = fs::read_to_string(&self.path).map_err(|err| {
            Error::UpstreamUnavailable(format!("read {}: {err}", self.path.display()))
        })?;
        debug!("read {} bytes from {}", body.len(), self.path.display());
        Ok(body)
    }
}
