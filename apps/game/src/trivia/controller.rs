//! Round controller — drives a session through initialize → select → advance.
//!
//! Owns the session's `RoundState` and the single prefetch slot. Every async step
//! awaits the model call it depends on; nothing here races two requests.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::trivia::generator::{fetch_fact_set, FactSource};
use crate::trivia::prefetcher::Prefetcher;
use crate::trivia::state::{Round, RoundFailure, RoundPhase, RoundState, SelectionError};

/// One statement's verdict, shown after the reveal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Explanation {
    pub truth_value: bool,
    pub explanation: String,
}

/// Read-only view of the session handed to the page.
#[derive(Debug, Clone, Serialize)]
pub struct RoundSnapshot {
    pub phase: RoundPhase,
    pub round_id: Option<Uuid>,
    pub generated_at: Option<DateTime<Utc>>,
    pub statements: Vec<String>,
    pub selected_index: Option<usize>,
    pub revealed: bool,
    pub correct: Option<bool>,
    /// Empty until the round is revealed.
    pub explanations: Vec<Explanation>,
    pub error: Option<RoundFailure>,
    pub next_ready: bool,
}

pub struct RoundController {
    source: Arc<dyn FactSource>,
    prefetcher: Prefetcher,
    state: RoundState,
}

impl RoundController {
    pub fn new(source: Arc<dyn FactSource>) -> Self {
        Self {
            prefetcher: Prefetcher::new(Arc::clone(&source)),
            source,
            state: RoundState::default(),
        }
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    /// Loads the first round and starts prefetching the second.
    ///
    /// Only the current round is awaited; the next one stays pending in the
    /// background. Calling this again restarts the session, after any
    /// in-flight prefetch has finished.
    pub async fn initialize(&mut self) {
        if self.prefetcher.join().await.is_some() {
            info!("Discarded in-flight prefetch before restart");
        }

        let current = Round::from_outcome(fetch_fact_set(self.source.as_ref()).await);
        log_round("Initialized", &current);

        self.state = RoundState::new(current);
        self.prefetcher.start();
    }

    /// Picks option `index` as the lie and reveals the round.
    pub fn select(&mut self, index: usize) -> Result<bool, SelectionError> {
        let correct = self.state.select(index)?;
        info!(
            "Selected option {index} in round {:?}: {}",
            self.state.current().id(),
            if correct { "correct" } else { "incorrect" }
        );
        Ok(correct)
    }

    /// Promotes the prefetched round to current and starts the next prefetch.
    /// Waits for the prefetch if it has not finished yet.
    pub async fn advance(&mut self) {
        if self.state.phase() == RoundPhase::Loading {
            self.initialize().await;
            return;
        }

        let next = match self.state.take_next() {
            Some(next) => next,
            None => Round::from_outcome(self.prefetcher.fetch_next().await),
        };
        log_round("Advanced to", &next);

        self.state.promote(next);
        self.prefetcher.start();
    }

    /// Moves a finished prefetch into the state without waiting.
    pub async fn poll_prefetch(&mut self) {
        if !self.prefetcher.is_ready() {
            return;
        }
        if let Some(outcome) = self.prefetcher.join().await {
            self.state.store_next(Round::from_outcome(outcome));
        }
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        let state = &self.state;
        let loaded = state.current().loaded();

        let statements = loaded
            .map(|r| r.facts.facts().iter().map(|f| f.statement.clone()).collect())
            .unwrap_or_default();

        let explanations = match loaded {
            Some(r) if state.revealed() => r
                .facts
                .facts()
                .iter()
                .map(|f| Explanation {
                    truth_value: f.truth_value,
                    explanation: f.explanation.clone(),
                })
                .collect(),
            _ => Vec::new(),
        };

        let error = match state.current() {
            Round::Failed(failure) => Some(failure.clone()),
            _ => None,
        };

        RoundSnapshot {
            phase: state.phase(),
            round_id: loaded.map(|r| r.id),
            generated_at: loaded.map(|r| r.generated_at),
            statements,
            selected_index: state.selected_index(),
            revealed: state.revealed(),
            correct: state.is_correct(),
            explanations,
            error,
            next_ready: state.next().is_some() || self.prefetcher.is_ready(),
        }
    }
}

fn log_round(action: &str, round: &Round) {
    match round {
        Round::Ready(r) => {
            info!("{action} round {}", r.id);
            debug!("Round {} lie is option {:?}", r.id, r.facts.lie_index());
        }
        Round::Failed(failure) => warn!("{action} failed round: {}", failure.message),
        Round::Loading => {}
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::llm_client::LlmError;
    use crate::trivia::state::FailureKind;
    use crate::trivia::testing::{fact_set_json, ScriptedSource};

    fn statements(controller: &RoundController) -> Vec<String> {
        controller.snapshot().statements
    }

    #[tokio::test]
    async fn test_new_controller_is_loading() {
        let controller = RoundController::new(Arc::new(ScriptedSource::rounds(0)));
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.phase, RoundPhase::Loading);
        assert!(snapshot.statements.is_empty());
        assert!(!snapshot.next_ready);
    }

    #[tokio::test]
    async fn test_initialize_loads_current_and_prefetches_next() {
        let source = Arc::new(ScriptedSource::rounds(2));
        let mut controller = RoundController::new(source.clone());

        controller.initialize().await;
        assert_eq!(controller.state().phase(), RoundPhase::Ready);
        assert_eq!(statements(&controller)[0], "round0 statement 0");
        assert!(controller.prefetcher.is_pending());

        controller.advance().await;
        assert!(controller.prefetcher.is_pending(), "advance starts the following prefetch");
        assert_eq!(source.max_in_flight(), 1);
    }

    #[tokio::test]
    async fn test_select_then_snapshot_reveals_explanations() {
        let mut controller = RoundController::new(Arc::new(ScriptedSource::rounds(2)));
        controller.initialize().await;

        assert!(controller.snapshot().explanations.is_empty());
        assert_eq!(controller.select(1), Ok(true));

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.phase, RoundPhase::Answered);
        assert_eq!(snapshot.correct, Some(true));
        assert_eq!(snapshot.explanations.len(), 3);
        assert!(!snapshot.explanations[1].truth_value);
        assert_eq!(snapshot.explanations[0].explanation, "round0 explanation 0");
    }

    #[tokio::test]
    async fn test_advance_promotes_prefetched_round_and_resets() {
        let mut controller = RoundController::new(Arc::new(ScriptedSource::rounds(3)));
        controller.initialize().await;
        controller.select(0).unwrap();

        controller.advance().await;

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.phase, RoundPhase::Ready);
        assert_eq!(snapshot.statements[0], "round1 statement 0");
        assert_eq!(snapshot.selected_index, None);
        assert!(!snapshot.revealed);
        assert_eq!(snapshot.correct, None);
    }

    #[tokio::test]
    async fn test_advance_current_equals_prior_next() {
        let mut controller = RoundController::new(Arc::new(ScriptedSource::rounds(3)));
        controller.initialize().await;

        // Wait for the prefetch so `next` is observable before advancing.
        while !controller.prefetcher.is_ready() {
            tokio::task::yield_now().await;
        }
        controller.poll_prefetch().await;
        let prior_next = controller.state().next().cloned().unwrap();

        controller.advance().await;
        assert_eq!(controller.state().current(), &prior_next);
    }

    #[tokio::test(start_paused = true)]
    async fn test_advance_waits_for_slow_prefetch_without_overlap() {
        let source = Arc::new(ScriptedSource::rounds(5).with_delay(Duration::from_secs(3)));
        let mut controller = RoundController::new(source.clone());
        controller.initialize().await;

        for expected in 1..4 {
            controller.advance().await;
            assert_eq!(
                statements(&controller)[0],
                format!("round{expected} statement 0")
            );
        }
        assert_eq!(source.max_in_flight(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_degrades_and_advance_recovers() {
        let source = Arc::new(ScriptedSource::new(vec![
            Err(LlmError::Api {
                status: 401,
                message: "bad key".to_string(),
            }),
            Ok(fact_set_json("retry", 0)),
        ]));
        let mut controller = RoundController::new(source);
        controller.initialize().await;

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.phase, RoundPhase::Ready);
        assert!(snapshot.statements.is_empty());
        assert_eq!(snapshot.error.unwrap().kind, FailureKind::Transport);
        assert_eq!(controller.select(0), Err(SelectionError::NoOptions));

        controller.advance().await;
        let snapshot = controller.snapshot();
        assert!(snapshot.error.is_none());
        assert_eq!(snapshot.statements[0], "retry statement 0");
    }

    #[tokio::test]
    async fn test_parse_failure_yields_empty_round() {
        let source = Arc::new(ScriptedSource::new(vec![
            Ok("{facts: [...]}".to_string()),
            Ok(fact_set_json("next", 2)),
        ]));
        let mut controller = RoundController::new(source);
        controller.initialize().await;

        let snapshot = controller.snapshot();
        assert!(snapshot.statements.is_empty());
        assert_eq!(snapshot.error.unwrap().kind, FailureKind::Parse);
    }

    #[tokio::test]
    async fn test_restart_waits_for_in_flight_prefetch() {
        let source = Arc::new(ScriptedSource::rounds(4));
        let mut controller = RoundController::new(source.clone());
        controller.initialize().await;
        controller.initialize().await;

        // round1 was the discarded prefetch; round2 is the new current.
        assert_eq!(statements(&controller)[0], "round2 statement 0");
        assert_eq!(source.max_in_flight(), 1);
    }

    #[tokio::test]
    async fn test_advance_from_loading_initializes() {
        let mut controller = RoundController::new(Arc::new(ScriptedSource::rounds(2)));
        controller.advance().await;
        assert_eq!(controller.state().phase(), RoundPhase::Ready);
        assert_eq!(statements(&controller)[0], "round0 statement 0");
    }
}
