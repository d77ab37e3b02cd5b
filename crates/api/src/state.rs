use std::sync::Arc;
use jobs::InMemRuns;
use solver_heur::HeurEngine;

/// Per-process handle to the run store; every request reads results by run id.
#[derive(Clone)]
pub struct AppState {
    pub runs: Arc<InMemRuns<HeurEngine>>,
}

impl AppState {
    pub fn new_default() -> Self {
        let runs = InMemRuns::new(HeurEngine::new());
        Self { runs: Arc::new(runs) }
    }
}
