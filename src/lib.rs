//! Oraculum AI: tiered knowledge-retrieval answers for the Belém tourism kiosk.

pub mod canned;
pub mod completion;
pub mod config;
pub mod engine;
pub mod error;
pub mod formatter;
pub mod http;
pub mod knowledge;
pub mod locale;
pub mod logging;
pub mod scorer;
pub mod selector;
pub mod source;
pub mod translate;

pub use engine::{AnswerSource, EngineConfig, Reply, TieredAnswerEngine};
pub use error::{OraculumError, Result};
pub use knowledge::{Category, KnowledgeBase, KnowledgeRecord};
pub use locale::Locale;
