use thiserror::Error;

use crate::knowledge::Category;

pub type Result<T> = std::result::Result<T, OraculumError>;

/// Failures inside the answer pipeline.
///
/// None of these reach the kiosk user: every tier logs its own failure and
/// degrades to the next one.
#[derive(Error, Debug)]
pub enum OraculumError {
    #[error("Knowledge source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Remote completion failed: {0}")]
    RemoteEnrichFailed(String),

    #[error("Translation failed: {0}")]
    TranslationFailed(String),

    #[error("Rate limit exceeded, retry in {retry_after_ms}ms")]
    RateLimitExceeded { retry_after_ms: u64 },

    #[error("Cannot format {category} record '{record}': {reason}")]
    FormatFailure {
        category: Category,
        record: String,
        reason: String,
    },

    #[error("Answer pipeline failed: {0}")]
    CatastrophicFailure(String),
}

impl OraculumError {
    pub(crate) fn source_unavailable(err: impl std::fmt::Display) -> Self {
        Self::SourceUnavailable(err.to_string())
    }

    pub(crate) fn remote(err: impl std::fmt::Display) -> Self {
        Self::RemoteEnrichFailed(err.to_string())
    }

    pub(crate) fn translation(err: impl std::fmt::Display) -> Self {
        Self::TranslationFailed(err.to_string())
    }
}
