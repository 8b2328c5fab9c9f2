//! Round state — the per-session value the controller owns and mutates.
//!
//! Pure transitions only: nothing in here performs I/O, so every rule of the
//! Loading → Ready → Answered cycle is checked synchronously.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::trivia::generator::GenerationError;
use crate::trivia::models::{FactSet, FACTS_PER_SET};
use crate::trivia::sanitizer::SanitizeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    Loading,
    Ready,
    Answered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Transport,
    Parse,
    Schema,
    Internal,
}

/// Why a round has no statements to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&GenerationError> for RoundFailure {
    fn from(err: &GenerationError) -> Self {
        let kind = match err {
            GenerationError::Transport(_) => FailureKind::Transport,
            GenerationError::Sanitize(SanitizeError::Parse(_)) => FailureKind::Parse,
            GenerationError::Sanitize(SanitizeError::SchemaViolation { .. }) => FailureKind::Schema,
            GenerationError::Worker(_) => FailureKind::Internal,
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedRound {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub facts: FactSet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Round {
    Loading,
    Ready(LoadedRound),
    Failed(RoundFailure),
}

impl Round {
    pub fn from_outcome(outcome: Result<FactSet, GenerationError>) -> Self {
        match outcome {
            Ok(facts) => Round::Ready(LoadedRound {
                id: Uuid::new_v4(),
                generated_at: Utc::now(),
                facts,
            }),
            Err(e) => Round::Failed(RoundFailure::from(&e)),
        }
    }

    pub fn loaded(&self) -> Option<&LoadedRound> {
        match self {
            Round::Ready(loaded) => Some(loaded),
            _ => None,
        }
    }

    pub fn id(&self) -> Option<Uuid> {
        self.loaded().map(|r| r.id)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("there are no statements to choose from")]
    NoOptions,

    #[error("option {index} does not exist; choose 0 to {max}", max = FACTS_PER_SET - 1)]
    OutOfRange { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    current: Round,
    /// `None` while the prefetch for the next round is still in flight.
    next: Option<Round>,
    selected_index: Option<usize>,
    revealed: bool,
}

impl Default for RoundState {
    fn default() -> Self {
        Self::new(Round::Loading)
    }
}

impl RoundState {
    pub fn new(current: Round) -> Self {
        Self {
            current,
            next: None,
            selected_index: None,
            revealed: false,
        }
    }

    pub fn current(&self) -> &Round {
        &self.current
    }

    pub fn next(&self) -> Option<&Round> {
        self.next.as_ref()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn revealed(&self) -> bool {
        self.revealed
    }

    pub fn phase(&self) -> RoundPhase {
        match (&self.current, self.revealed) {
            (Round::Loading, _) => RoundPhase::Loading,
            (_, true) => RoundPhase::Answered,
            (_, false) => RoundPhase::Ready,
        }
    }

    /// Records the player's pick and reveals the round. Returns whether the pick
    /// was the lie. A later pick in the same round replaces the earlier one.
    pub fn select(&mut self, index: usize) -> Result<bool, SelectionError> {
        let loaded = self.current.loaded().ok_or(SelectionError::NoOptions)?;
        let fact = loaded
            .facts
            .get(index)
            .ok_or(SelectionError::OutOfRange { index })?;
        let correct = !fact.truth_value;

        self.selected_index = Some(index);
        self.revealed = true;
        Ok(correct)
    }

    /// Correctness of the current pick, once revealed.
    pub fn is_correct(&self) -> Option<bool> {
        if !self.revealed {
            return None;
        }
        let fact = self.current.loaded()?.facts.get(self.selected_index?)?;
        Some(!fact.truth_value)
    }

    /// Parks a finished prefetch result until the player advances.
    pub fn store_next(&mut self, next: Round) {
        self.next = Some(next);
    }

    pub fn take_next(&mut self) -> Option<Round> {
        self.next.take()
    }

    /// Makes `next` the current round and clears the selection.
    pub fn promote(&mut self, next: Round) {
        self.current = next;
        self.selected_index = None;
        self.revealed = false;
    }
}
