//! Record sources and fetch bookkeeping.
//!
//! A fetch runs on its own thread and reports back through the app channel.
//! Each fetch carries a request id; only the completion for the newest id is
//! adopted, so an older response can never overwrite a newer one.

use crate::record::{find_duplicate, parse_records, Record};
use crate::AppEvent;
use log::{debug, info};
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::time::Duration;

pub const DEFAULT_URL: &str = "http://localhost:4000/posts";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} failed: {reason}")]
    Http { url: String, reason: String },
    #[error("{url} returned {code} {text}")]
    Status { url: String, code: u16, text: String },
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed record data: {0}")]
    Malformed(String),
}

/// Parse and check one snapshot of records.
pub fn decode(body: &str) -> Result<Vec<Record>, FetchError> {
    let records = parse_records(body).map_err(|e| FetchError::Malformed(e.to_string()))?;
    if let Some(duplicate) = find_duplicate(&records) {
        return Err(FetchError::Malformed(duplicate.to_string()));
    }
    Ok(records)
}

pub trait RecordSource: Send + Sync {
    fn fetch(&self) -> Result<Vec<Record>, FetchError>;

    /// Short description for the title bar and the log.
    fn describe(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::new(DEFAULT_URL)
    }
}

impl RecordSource for HttpSource {
    fn fetch(&self) -> Result<Vec<Record>, FetchError> {
        let response = ureq::get(&self.url)
            .timeout(self.timeout)
            .call()
            .map_err(|e| match e {
                ureq::Error::Status(code, response) => FetchError::Status {
                    url: self.url.clone(),
                    code,
                    text: response.status_text().to_string(),
                },
                ureq::Error::Transport(t) => FetchError::Http {
                    url: self.url.clone(),
                    reason: t.to_string(),
                },
            })?;
        let body = response.into_string().map_err(|e| FetchError::Http {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;
        decode(&body)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for FileSource {
    fn fetch(&self) -> Result<Vec<Record>, FetchError> {
        let body = std::fs::read_to_string(&self.path).map_err(|source| FetchError::Io {
            path: self.path.clone(),
            source,
        })?;
        decode(&body)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Issues request ids and decides which completion wins.
#[derive(Debug, Default)]
pub struct FetchTracker {
    latest: u64,
    in_flight: bool,
}

impl FetchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.in_flight = true;
        self.latest
    }

    /// True if `request` is the newest one issued. Older completions are
    /// stale and must be dropped.
    pub fn accept(&mut self, request: u64) -> bool {
        if request == self.latest {
            self.in_flight = false;
            true
        } else {
            false
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }
}

/// Run `source.fetch()` on a background thread and post the outcome.
pub fn spawn_fetch(
    source: std::sync::Arc<dyn RecordSource>,
    request: u64,
    tx: Sender<AppEvent>,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        info!("fetch #{} from {}", request, source.describe());
        let result = source.fetch();
        if tx.send(AppEvent::Fetched { request, result }).is_err() {
            debug!("fetch #{} finished after the app exited", request);
        }
    })
}
