//! Fact set generation — one model call per round, no retries.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{CompletionParams, LlmClient, LlmError};
use crate::trivia::models::FactSet;
use crate::trivia::prompts::FACT_SET_PROMPT;
use crate::trivia::sanitizer::{parse_fact_set, validate_fact_set, SanitizeError};

/// Sampling used for every round: varied topics, short answers.
pub const FACT_SET_PARAMS: CompletionParams = CompletionParams {
    temperature: 0.8,
    max_tokens: 500,
};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("fact generation request failed: {0}")]
    Transport(#[from] LlmError),

    #[error(transparent)]
    Sanitize(#[from] SanitizeError),

    #[error("prefetch worker stopped unexpectedly: {0}")]
    Worker(String),
}

/// Source of raw model text for a round.
///
/// Carried by the controller as `Arc<dyn FactSource>` so the prefetch task can
/// own a handle to it.
#[async_trait]
pub trait FactSource: Send + Sync {
    async fn generate(&self) -> Result<String, LlmError>;
}

/// Production source: the fixed fact-set prompt sent through the LLM client.
pub struct LlmFactSource {
    llm: LlmClient,
}

impl LlmFactSource {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl FactSource for LlmFactSource {
    async fn generate(&self) -> Result<String, LlmError> {
        self.llm
            .complete(JSON_ONLY_SYSTEM, FACT_SET_PROMPT, FACT_SET_PARAMS)
            .await
    }
}

/// Generates, sanitizes and validates one fact set.
pub async fn fetch_fact_set(source: &dyn FactSource) -> Result<FactSet, GenerationError> {
    let raw = source.generate().await.map_err(|e| {
        warn!("Fact generation failed: {e}");
        GenerationError::Transport(e)
    })?;
    debug!("Raw fact set response: {raw}");

    let set = parse_fact_set(&raw).map_err(|e| {
        warn!("Discarding unparseable fact set: {e}");
        GenerationError::Sanitize(e)
    })?;

    validate_fact_set(&set).map_err(|e| {
        warn!("Discarding fact set that breaks the one-lie rule: {e}");
        GenerationError::Sanitize(e)
    })?;

    Ok(set)
}
