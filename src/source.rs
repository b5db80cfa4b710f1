use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;

use crate::config::Config;

/// Delivers the dashboard page that carries the embedded snapshots.
#[async_trait]
pub trait SnapshotSource {
    fn describe(&self) -> String;
    async fn load(&self) -> Result<String>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceKind {
    File(PathBuf),
    Http(String),
}

impl SourceKind {
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            SourceKind::Http(location.to_string())
        } else {
            SourceKind::File(PathBuf::from(location))
        }
    }

    pub fn from_env() -> Self {
        Self::parse(&Config::from_env().source)
    }

    pub fn build(self, cfg: &Config) -> Result<Box<dyn SnapshotSource + Send + Sync>> {
        match self {
            SourceKind::File(path) => Ok(Box::new(FileSource::new(path))),
            SourceKind::Http(url) => Ok(Box::new(HttpSource::new(url, cfg)?)),
        }
    }
}

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn load(&self) -> Result<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading dashboard page {}", self.path.display()))
    }
}

pub struct HttpSource {
    url: String,
    client: Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, cfg: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(cfg.http_timeout())
            .build()
            .context("building http client")?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait]
impl SnapshotSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn load(&self) -> Result<String> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("fetching {}", self.url))?
            .error_for_status()
            .with_context(|| format!("dashboard page status from {}", self.url))?;
        resp.text().await.context("reading dashboard page body")
    }
}
