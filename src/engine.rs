//! Tiered answer engine: local knowledge, remote enrichment, canned fallback.

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use futures::FutureExt;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::canned;
use crate::completion::{CompletionRequest, CompletionService};
use crate::error::{OraculumError, Result};
use crate::formatter;
use crate::knowledge::{Category, KnowledgeBase, KnowledgeRecord};
use crate::locale::Locale;
use crate::scorer::{self, CategoryScoreTable, ScoredCategory};
use crate::selector;
use crate::source::{KnowledgeCache, KnowledgeSource};
use crate::translate::Translator;

pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(2000);
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;
/// Longest query the kiosk input accepts
pub const MAX_QUERY_CHARS: usize = 200;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Minimum gap between two accepted queries
    pub cooldown: Duration,
    pub history_capacity: usize,
    pub locale: Locale,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cooldown: DEFAULT_COOLDOWN,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            locale: Locale::default(),
        }
    }
}

/// One user query and the reply it got
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exchange {
    pub user: String,
    pub bot: String,
}

/// Most recent exchanges, oldest first
#[derive(Debug)]
pub struct ConversationHistory {
    capacity: usize,
    entries: VecDeque<Exchange>,
}

impl ConversationHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity + 1),
        }
    }

    /// Append, evicting the oldest entries beyond capacity
    pub fn push(&mut self, exchange: Exchange) {
        self.entries.push_back(exchange);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Exchange> {
        self.entries.iter()
    }
}

/// Cooldown gate between accepted queries
#[derive(Debug)]
pub struct RateLimiter {
    cooldown: Duration,
    last_accepted: Option<Instant>,
}

impl RateLimiter {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_accepted: None,
        }
    }

    /// Accept a query at `now`, or report how long to wait.
    ///
    /// A rejected attempt does not move the window.
    pub fn try_acquire(&mut self, now: Instant) -> Result<()> {
        if let Some(last) = self.last_accepted {
            let elapsed = now.saturating_duration_since(last);
            if elapsed < self.cooldown {
                let retry_after = self.cooldown - elapsed;
                return Err(OraculumError::RateLimitExceeded {
                    retry_after_ms: retry_after.as_millis() as u64,
                });
            }
        }
        self.last_accepted = Some(now);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.last_accepted = None;
    }
}

/// Which tier produced a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    RemoteEnriched,
    LocalKnowledge,
    RemoteOnly,
    Canned,
    RateLimited,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub text: String,
    pub source: AnswerSource,
}

/// Result of one pipeline stage
#[derive(Debug)]
pub enum Outcome {
    Success(String),
    /// Nothing to contribute, try the next tier
    Degrade,
    Fail(OraculumError),
}

/// A scored record returned by [`TieredAnswerEngine::search`]
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub category: Category,
    pub score: u32,
    pub record: KnowledgeRecord,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub scores: Vec<ScoredCategory>,
    pub hits: Vec<SearchHit>,
}

/// Reject queries the kiosk input would never send
pub fn validate_query(query: &str) -> std::result::Result<(), String> {
    let chars = query.chars().count();
    if chars > MAX_QUERY_CHARS {
        return Err(format!(
            "query is {} characters long, the maximum is {}",
            chars, MAX_QUERY_CHARS
        ));
    }
    if query.chars().any(|c| c.is_control() && c != '\n' && c != '\t') {
        return Err("query contains control characters".to_string());
    }
    Ok(())
}

pub struct TieredAnswerEngine {
    table: CategoryScoreTable,
    knowledge: KnowledgeCache,
    completion: Option<Arc<dyn CompletionService>>,
    translator: Option<Translator>,
    history: Mutex<ConversationHistory>,
    limiter: Mutex<RateLimiter>,
    locale: Mutex<Locale>,
}

impl TieredAnswerEngine {
    pub fn new(
        config: EngineConfig,
        source: Arc<dyn KnowledgeSource>,
        completion: Option<Arc<dyn CompletionService>>,
        translator: Option<Translator>,
    ) -> Self {
        Self {
            table: CategoryScoreTable::belem(),
            knowledge: KnowledgeCache::new(source),
            completion,
            translator,
            history: Mutex::new(ConversationHistory::new(config.history_capacity)),
            limiter: Mutex::new(RateLimiter::new(config.cooldown)),
            locale: Mutex::new(config.locale),
        }
    }

    /// Replace the keyword table used for scoring
    pub fn with_score_table(mut self, table: CategoryScoreTable) -> Self {
        self.table = table;
        self
    }

    /// Preload the knowledge base; `false` when the source is unavailable
    pub async fn init(&self) -> bool {
        self.knowledge.get().await.is_some()
    }

    /// Answer one kiosk query.
    ///
    /// Blank input returns `None` and leaves all state untouched. Every other
    /// query gets a reply, and every accepted one is recorded in history.
    pub async fn ask(&self, query: &str) -> Option<Reply> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        let locale = self.locale();
        let gate = lock(&self.limiter).try_acquire(Instant::now());
        if let Err(err) = gate {
            debug!(error = %err, "Query rejected by cooldown");
            return Some(Reply {
                text: locale.rate_limit_notice().to_string(),
                source: AnswerSource::RateLimited,
            });
        }

        let answered = match AssertUnwindSafe(self.run_tiers(query)).catch_unwind().await {
            Ok(answered) => answered,
            Err(payload) => Err(OraculumError::CatastrophicFailure(panic_message(&*payload))),
        };
        let reply = answered.unwrap_or_else(|err| {
            error!(error = %err, "Answer pipeline failed");
            Reply {
                text: locale.unavailable_message().to_string(),
                source: AnswerSource::Unavailable,
            }
        });

        info!(source = ?reply.source, "Query answered");
        lock(&self.history).push(Exchange {
            user: query.to_string(),
            bot: reply.text.clone(),
        });
        Some(reply)
    }

    /// Local lookup, then remote, then canned. `Err` only for a failed
    /// local pipeline.
    async fn run_tiers(&self, query: &str) -> Result<Reply> {
        let reply = match self.local_lookup(query).await {
            Outcome::Success(local) => match self.remote_enrich(query, Some(&local)).await {
                Outcome::Success(enriched) => Reply {
                    text: enriched,
                    source: AnswerSource::RemoteEnriched,
                },
                _ => Reply {
                    text: local,
                    source: AnswerSource::LocalKnowledge,
                },
            },
            Outcome::Degrade => match self.remote_enrich(query, None).await {
                Outcome::Success(remote) => Reply {
                    text: remote,
                    source: AnswerSource::RemoteOnly,
                },
                _ => Reply {
                    text: self.canned_fallback(query),
                    source: AnswerSource::Canned,
                },
            },
            Outcome::Fail(err) => return Err(err),
        };
        Ok(reply)
    }

    /// Score, select and format against the knowledge base
    pub async fn local_lookup(&self, query: &str) -> Outcome {
        let Some(kb) = self.knowledge.get().await else {
            return Outcome::Degrade;
        };

        let table = &self.table;
        let rendered = panic::catch_unwind(AssertUnwindSafe(|| {
            let scores = scorer::score(query, table);
            let candidate = selector::select(&scores, &kb, query);
            debug!(selected = candidate.len(), "Local candidate selected");
            formatter::format(&candidate)
        }));

        match rendered {
            Ok(Some(text)) => Outcome::Success(text),
            Ok(None) => Outcome::Degrade,
            Err(payload) => Outcome::Fail(OraculumError::CatastrophicFailure(panic_message(&*payload))),
        }
    }

    /// Ask the completion service, with the local answer as context if any
    pub async fn remote_enrich(&self, query: &str, context: Option<&str>) -> Outcome {
        let Some(service) = &self.completion else {
            return Outcome::Degrade;
        };

        let request = CompletionRequest::for_query(query, context);
        match service.complete(&request).await {
            Ok(text) if !text.trim().is_empty() => Outcome::Success(text),
            Ok(_) => {
                debug!("Completion service returned empty text");
                Outcome::Degrade
            }
            Err(err) => {
                warn!(error = %err, "Remote enrichment failed");
                Outcome::Fail(err)
            }
        }
    }

    /// Canned answer in the active locale
    pub fn canned_fallback(&self, query: &str) -> String {
        canned::respond(query, self.locale())
    }

    /// Scores and selected records for `query`, without formatting.
    ///
    /// Not rate limited and not recorded. `None` when the knowledge base is
    /// unavailable.
    pub async fn search(&self, query: &str) -> Option<SearchResult> {
        let kb = self.knowledge.get().await?;
        let scores = scorer::score(query, &self.table);
        let hits = selector::select(&scores, &kb, query)
            .into_iter()
            .map(|selection| SearchHit {
                category: selection.category,
                score: selection.score,
                record: selection.record.clone(),
            })
            .collect();
        Some(SearchResult {
            scores: scorer::rank(&scores),
            hits,
        })
    }

    pub async fn knowledge(&self) -> Option<Arc<KnowledgeBase>> {
        self.knowledge.get().await
    }

    pub fn history(&self) -> Vec<Exchange> {
        lock(&self.history).iter().cloned().collect()
    }

    /// Forget the conversation, the cooldown and cached translations.
    ///
    /// The knowledge base stays loaded.
    pub fn reset_session(&self) {
        lock(&self.history).clear();
        lock(&self.limiter).reset();
        if let Some(translator) = &self.translator {
            translator.clear();
        }
        info!("Session reset");
    }

    pub fn locale(&self) -> Locale {
        *lock(&self.locale)
    }

    pub fn set_locale(&self, locale: Locale) {
        *lock(&self.locale) = locale;
    }

    /// Translate Portuguese text; unchanged when no translator is configured
    pub async fn translate(&self, text: &str, locale: Locale) -> String {
        match &self.translator {
            Some(translator) => translator.translate(text, locale).await,
            None => text.to_string(),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic in local pipeline".to_string()
    }
}
