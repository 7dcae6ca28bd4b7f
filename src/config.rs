//! Command line and environment configuration of the server binary.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use crate::completion::{CompletionService, GeminiClient};
use crate::engine::{EngineConfig, DEFAULT_HISTORY_CAPACITY};
use crate::locale::Locale;
use crate::logging::TransportMode;
use crate::source::{FileKnowledgeSource, HttpKnowledgeSource, KnowledgeSource};

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const KB_PATH_ENV: &str = "ORACULUM_KB_PATH";
pub const KB_URL_ENV: &str = "ORACULUM_KB_URL";

#[derive(Debug, Clone, Parser)]
#[command(name = "oraculum-rs", version, about = "Oraculum AI answer engine for the Belém tourism kiosk")]
pub struct Args {
    /// Serve streamable HTTP instead of stdio
    #[arg(short = 's', long)]
    pub stream: bool,

    /// HTTP port (stream mode)
    #[arg(short = 'p', long, default_value_t = 8000)]
    pub port: u16,

    /// HTTP bind address (stream mode)
    #[arg(short = 'b', long, default_value = "127.0.0.1")]
    pub bind: String,

    /// Knowledge base JSON file
    #[arg(long)]
    pub kb_path: Option<PathBuf>,

    /// Knowledge base URL, takes precedence over the file
    #[arg(long)]
    pub kb_url: Option<String>,

    /// Log file
    #[arg(short = 'l', long)]
    pub log: Option<String>,

    /// Language of canned answers (pt, en, es)
    #[arg(long, default_value = "pt")]
    pub locale: Locale,

    /// Minimum milliseconds between two answered queries
    #[arg(long, default_value_t = 2000)]
    pub cooldown_ms: u64,

    /// Disable the translation service
    #[arg(long)]
    pub no_translate: bool,
}

impl Args {
    pub fn transport_mode(&self) -> TransportMode {
        if self.stream {
            TransportMode::Stream
        } else {
            TransportMode::Stdio
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            cooldown: Duration::from_millis(self.cooldown_ms),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            locale: self.locale,
        }
    }

    /// Flag, then environment, then the default data file
    pub fn knowledge_source(&self) -> Arc<dyn KnowledgeSource> {
        let url = self
            .kb_url
            .clone()
            .or_else(|| std::env::var(KB_URL_ENV).ok().filter(|v| !v.is_empty()));
        if let Some(url) = url {
            return Arc::new(HttpKnowledgeSource::new(url));
        }

        let path = self
            .kb_path
            .clone()
            .or_else(|| std::env::var(KB_PATH_ENV).ok().map(PathBuf::from))
            .unwrap_or_else(default_kb_path);
        Arc::new(FileKnowledgeSource::new(path))
    }

    /// Gemini client when an API key is set
    pub fn completion_service(&self) -> Option<Arc<dyn CompletionService>> {
        let key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty())?;
        Some(Arc::new(GeminiClient::new(key)))
    }
}

pub fn default_kb_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("oraculum");
    path.push("belem_database.json");
    path
}
