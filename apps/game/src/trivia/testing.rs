//! Test doubles shared by the trivia test modules.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::llm_client::LlmError;
use crate::trivia::generator::FactSource;

/// Raw model output for a well-formed round. Statements read `"{tag} statement {i}"`.
pub fn fact_set_json(tag: &str, lie_index: usize) -> String {
    let facts: Vec<serde_json::Value> = (0..3)
        .map(|i| {
            serde_json::json!({
                "statement": format!("{tag} statement {i}"),
                "truth_value": if i == lie_index { "False" } else { "True" },
                "explanation": format!("{tag} explanation {i}"),
            })
        })
        .collect();
    serde_json::json!({ "facts": facts }).to_string()
}

/// Replays a fixed script of responses, one per `generate` call.
/// Once the script runs out every call fails with `EmptyContent`.
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<String, LlmError>>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<String, LlmError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            delay: None,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Well-formed rounds tagged `round0`, `round1`, ... with the lie at index 1.
    pub fn rounds(count: usize) -> Self {
        Self::new(
            (0..count)
                .map(|i| Ok(fact_set_json(&format!("round{i}"), 1)))
                .collect(),
        )
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FactSource for ScriptedSource {
    async fn generate(&self) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent));

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        next
    }
}
