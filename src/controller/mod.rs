pub mod state;

use crate::error::GuideError;
use crate::gemini::{GeminiClient, GuideRequester, ImageRequester};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub use state::{OperationState, Phase, GUIDE_FAILURE_MESSAGE};

struct Shared {
    guide_requester: Arc<dyn GuideRequester>,
    image_requester: Arc<dyn ImageRequester>,
    state: watch::Sender<OperationState>,
    generation: AtomicU64,
}

/// Runs the guide stage and then the image stage for the most recent query.
///
/// Every `submit` starts a new generation. Results that come back for an older
/// generation are dropped without touching the state, so a slow superseded
/// query can never overwrite a newer one.
#[derive(Clone)]
pub struct OrchestrationController {
    shared: Arc<Shared>,
}

/// Handle to a submitted query; await `wait` to know when its chain settled.
#[derive(Debug)]
pub struct QueryHandle {
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl QueryHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub async fn wait(self) {
        if let Some(task) = self.task {
            if let Err(e) = task.await {
                log::error!("Query #{} task ended abnormally: {}", self.generation, e);
            }
        }
    }
}

impl OrchestrationController {
    pub fn new(
        guide_requester: Arc<dyn GuideRequester>,
        image_requester: Arc<dyn ImageRequester>,
    ) -> Self {
        let (state, _) = watch::channel(OperationState::default());
        Self {
            shared: Arc::new(Shared {
                guide_requester,
                image_requester,
                state,
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Controller wired to both Gemini clients.
    pub fn from_client(client: &GeminiClient) -> Self {
        Self::new(client.guide(), client.image())
    }

    /// Starts a new query, superseding any query still in flight.
    ///
    /// When this returns the state already shows either `GuideLoading` or, for
    /// blank input, `GuideFailed(EmptyQuery)`. Must be called from within a
    /// tokio runtime.
    pub fn submit(&self, location: &str) -> QueryHandle {
        let query = location.trim().to_string();
        let mut generation = 0;

        self.shared.state.send_modify(|state| {
            generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *state = if query.is_empty() {
                OperationState::rejected(location, GuideError::EmptyQuery)
            } else {
                OperationState::loading(query.clone())
            };
        });

        if query.is_empty() {
            log::warn!("Query #{} rejected: location is empty", generation);
            return QueryHandle {
                generation,
                task: None,
            };
        }

        log::info!("Query #{} started for '{}'", generation, query);
        let shared = self.shared.clone();
        let task = tokio::spawn(async move { shared.run(generation, query).await });
        QueryHandle {
            generation,
            task: Some(task),
        }
    }

    pub fn state(&self) -> OperationState {
        self.shared.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<OperationState> {
        self.shared.state.subscribe()
    }
}

impl Shared {
    async fn run(&self, generation: u64, query: String) {
        let guide = match self.guide_requester.request_guide(&query).await {
            Ok(guide) => guide,
            Err(err) => {
                log::error!("Query #{} guide stage failed: {}", generation, err);
                self.apply(generation, |state| state.guide_failed(err));
                return;
            }
        };

        let prompt = guide.image_gen_prompt.clone();
        if !self.apply(generation, |state| state.guide_ready(guide)) {
            return;
        }
        if !self.apply(generation, |state| state.image_started()) {
            return;
        }

        match self.image_requester.request_image(&prompt).await {
            Ok(image) => {
                self.apply(generation, |state| state.image_ready(image));
            }
            Err(err) => {
                log::warn!("Query #{} image stage failed: {}", generation, err);
                self.apply(generation, |state| state.image_failed(err));
            }
        }
    }

    /// Applies `update` only if `generation` is still the current query.
    fn apply(&self, generation: u64, update: impl FnOnce(&mut OperationState)) -> bool {
        let applied = self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            update(state);
            true
        });
        if !applied {
            log::debug!("Discarding stale result of query #{}", generation);
        }
        applied
    }
}
