//! Data sources for the member list.
//!
//! The whole list arrives in one response; there is no paging or filtering at
//! the source. [`load_members`] is the one-shot load used at start-up and on
//! reload: failures are logged and produce an empty list.
//!
use std::path::PathBuf;
use std::time::Duration;

use tracing::{error, info};

use crate::error::SourceError;
use crate::member::Member;

/// Public endpoint serving the sample member list.
pub const DEFAULT_SOURCE_URL: &str =
    "https://geektrust.s3-ap-southeast-1.amazonaws.com/adminui-problem/members.json";

/// Something that can produce the full member list in one call.
pub trait MemberSource {
    /// Human-readable origin, used in logs and the status bar.
    fn describe(&self) -> String;

    fn fetch(&self) -> Result<Vec<Member>, SourceError>;
}

/// Single `GET` against a fixed JSON endpoint.
pub struct HttpSource {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpSource {
    /// `timeout` of `None` waits for as long as the server takes.
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Use a pre-built client (custom proxy or TLS settings).
    pub fn with_client(url: impl Into<String>, client: reqwest::blocking::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }
}

impl MemberSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<Vec<Member>, SourceError> {
        let response = self.client.get(&self.url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: self.url.clone(),
                status,
            });
        }
        let body = response.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// The same JSON array, read from disk.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MemberSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<Vec<Member>, SourceError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Fixed in-memory list.
#[derive(Clone, Debug, Default)]
pub struct StaticSource(pub Vec<Member>);

impl MemberSource for StaticSource {
    fn describe(&self) -> String {
        format!("{} static records", self.0.len())
    }

    fn fetch(&self) -> Result<Vec<Member>, SourceError> {
        Ok(self.0.clone())
    }
}

/// Fetch once. On failure the error is logged and an empty list is returned.
pub fn load_members(source: &dyn MemberSource) -> Vec<Member> {
    match source.fetch() {
        Ok(members) => {
            info!(source = %source.describe(), count = members.len(), "members loaded");
            members
        }
        Err(err) => {
            error!(source = %source.describe(), error = %err, "error fetching members");
            Vec::new()
        }
    }
}
