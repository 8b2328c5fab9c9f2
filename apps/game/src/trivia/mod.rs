//! Two truths and a lie: fact generation, response sanitizing, background
//! prefetch and the per-session round state machine.
//!
//! Flow: FactSource::generate → sanitizer::parse_fact_set → sanitizer::validate_fact_set
//!       → Prefetcher (one round ahead) → RoundController → RoundState.

pub mod controller;
pub mod generator;
pub mod handlers;
pub mod models;
pub mod prefetcher;
pub mod prompts;
pub mod sanitizer;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;
