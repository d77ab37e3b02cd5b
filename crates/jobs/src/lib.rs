//! Request-scoped store of engine runs, keyed by a generated run id.

use parking_lot::RwLock;
use sched_core::Engine;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};
use types::{GenerateRequest, GenerateResult};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, ToSchema, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct RunId(pub String);

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    Running,
    Done {
        result: GenerateResult,
        /// Kept so exports can rebuild the grid layout.
        request: GenerateRequest,
    },
    Failed {
        message: String,
    },
}

#[derive(Clone)]
pub struct InMemRuns<E: Engine> {
    inner: Arc<RwLock<HashMap<String, RunStatus>>>,
    engine: Arc<E>,
}

impl<E: Engine> InMemRuns<E> {
    pub fn new(engine: E) -> Self {
        Self {
            inner: Default::default(),
            engine: Arc::new(engine),
        }
    }

    /// Stores the run as queued and starts it on the tokio runtime.
    pub fn enqueue(&self, req: GenerateRequest) -> RunId {
        let id = Uuid::new_v4().to_string();
        self.inner.write().insert(id.clone(), RunStatus::Queued);

        let map = self.inner.clone();
        let engine = self.engine.clone();
        let id_for_task = id.clone();

        tokio::spawn(async move {
            map.write().insert(id_for_task.clone(), RunStatus::Running);
            match engine.generate(req.clone()).await {
                Ok(result) => {
                    info!(run = %id_for_task, sessions = result.metrics.total_sessions, "run done");
                    map.write()
                        .insert(id_for_task, RunStatus::Done { result, request: req });
                }
                Err(e) => {
                    error!(?e, run = %id_for_task, "run failed");
                    map.write().insert(
                        id_for_task,
                        RunStatus::Failed {
                            message: e.to_string(),
                        },
                    );
                }
            }
        });

        RunId(id)
    }

    pub fn get(&self, id: &str) -> Option<RunStatus> {
        self.inner.read().get(id).cloned()
    }
}
