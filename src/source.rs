//! Where the knowledge base comes from, and the memoized loader in front of it.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::error::{OraculumError, Result};
use crate::knowledge::KnowledgeBase;

#[async_trait]
pub trait KnowledgeSource: Send + Sync {
    async fn fetch(&self) -> Result<KnowledgeBase>;

    /// Human readable origin, used in logs
    fn describe(&self) -> String;
}

/// Knowledge base served as JSON over HTTP
pub struct HttpKnowledgeSource {
    client: Client,
    url: String,
}

impl HttpKnowledgeSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .connect_timeout(Duration::from_secs(5))
                .timeout(Duration::from_secs(15))
                .build()
                .unwrap_or_default(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl KnowledgeSource for HttpKnowledgeSource {
    async fn fetch(&self) -> Result<KnowledgeBase> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(OraculumError::source_unavailable)?;

        let status = response.status();
        if !status.is_success() {
            return Err(OraculumError::SourceUnavailable(format!(
                "{} returned HTTP status {}",
                self.url, status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(OraculumError::source_unavailable)?;
        KnowledgeBase::from_slice(&bytes)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Knowledge base stored in a local JSON file
pub struct FileKnowledgeSource {
    path: PathBuf,
}

impl FileKnowledgeSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl KnowledgeSource for FileKnowledgeSource {
    async fn fetch(&self) -> Result<KnowledgeBase> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|err| {
            OraculumError::SourceUnavailable(format!("{}: {}", self.path.display(), err))
        })?;
        KnowledgeBase::from_slice(&bytes)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Already loaded knowledge base
pub struct StaticKnowledgeSource {
    kb: KnowledgeBase,
}

impl StaticKnowledgeSource {
    pub fn new(kb: KnowledgeBase) -> Self {
        Self { kb }
    }
}

#[async_trait]
impl KnowledgeSource for StaticKnowledgeSource {
    async fn fetch(&self) -> Result<KnowledgeBase> {
        Ok(self.kb.clone())
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}

/// Loads the knowledge base at most once per process.
///
/// Concurrent callers share the in-flight load. A failed load leaves the
/// cache empty so the next caller tries again.
pub struct KnowledgeCache {
    source: Arc<dyn KnowledgeSource>,
    cell: OnceCell<Arc<KnowledgeBase>>,
}

impl KnowledgeCache {
    pub fn new(source: Arc<dyn KnowledgeSource>) -> Self {
        Self {
            source,
            cell: OnceCell::new(),
        }
    }

    /// Loaded knowledge base, `None` while the source is unavailable
    pub async fn get(&self) -> Option<Arc<KnowledgeBase>> {
        let loaded = self
            .cell
            .get_or_try_init(|| async {
                let kb = self.source.fetch().await?;
                info!(
                    source = %self.source.describe(),
                    records = kb.record_count(),
                    "Knowledge base loaded"
                );
                Ok::<_, OraculumError>(Arc::new(kb))
            })
            .await;

        match loaded {
            Ok(kb) => Some(Arc::clone(kb)),
            Err(err) => {
                warn!(source = %self.source.describe(), error = %err, "Knowledge base unavailable");
                None
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }
}
