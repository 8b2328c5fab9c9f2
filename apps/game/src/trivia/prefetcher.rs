//! Prefetcher — a single background slot that keeps the game one round ahead.
//!
//! At most one generation task exists at a time. A new task is only started once
//! the previous result has been joined, and an in-flight task is never cancelled.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::trivia::generator::{fetch_fact_set, FactSource, GenerationError};
use crate::trivia::models::FactSet;

pub type FetchOutcome = Result<FactSet, GenerationError>;

pub struct Prefetcher {
    source: Arc<dyn FactSource>,
    slot: Option<JoinHandle<FetchOutcome>>,
}

impl Prefetcher {
    pub fn new(source: Arc<dyn FactSource>) -> Self {
        Self { source, slot: None }
    }

    /// Starts a background fetch. Returns false, leaving the running task alone,
    /// if the slot is already occupied.
    pub fn start(&mut self) -> bool {
        if self.slot.is_some() {
            warn!("Prefetch already in flight; not starting another");
            return false;
        }

        let source = Arc::clone(&self.source);
        self.slot = Some(tokio::spawn(async move {
            fetch_fact_set(source.as_ref()).await
        }));
        debug!("Prefetch started");
        true
    }

    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }

    /// True once the in-flight task has finished and `join` will not wait.
    pub fn is_ready(&self) -> bool {
        self.slot.as_ref().is_some_and(|handle| handle.is_finished())
    }

    /// Waits for the in-flight task and empties the slot.
    /// Returns `None` if nothing was pending.
    pub async fn join(&mut self) -> Option<FetchOutcome> {
        let handle = self.slot.take()?;
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(e) => Err(GenerationError::Worker(e.to_string())),
        };
        debug!("Prefetch joined (ok={})", outcome.is_ok());
        Some(outcome)
    }

    /// Returns the next fact set, waiting on the background task if needed.
    /// With nothing pending the fetch runs in the slot and is awaited directly.
    pub async fn fetch_next(&mut self) -> FetchOutcome {
        if !self.is_pending() {
            self.start();
        }
        match self.join().await {
            Some(outcome) => outcome,
            None => Err(GenerationError::Worker("prefetch slot was empty".to_string())),
        }
    }
}
