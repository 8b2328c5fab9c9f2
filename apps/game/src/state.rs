use std::sync::Arc;

use tokio::sync::Mutex;

use crate::trivia::controller::RoundController;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The one game session served by this instance. Holding the lock across an
    /// `advance` makes concurrent clicks queue behind the pending prefetch.
    pub session: Arc<Mutex<RoundController>>,
}

impl AppState {
    pub fn new(controller: RoundController) -> Self {
        Self {
            session: Arc::new(Mutex::new(controller)),
        }
    }
}
