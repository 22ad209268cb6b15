use std::sync::{
    atomic::{AtomicU64, AtomicUsize, Ordering},
    Arc,
};

use shared::domain::Fact;
use tokio::{sync::broadcast, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    classifier::{classify, Classification, ConnectionNotice, DisplayInstruction},
    data_source::FactsDataSource,
};

pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchAction {
    FreeText(String),
    Category(String),
    Random,
}

impl SearchAction {
    pub fn name(&self) -> &'static str {
        match self {
            SearchAction::FreeText(_) => "free_text",
            SearchAction::Category(_) => "category",
            SearchAction::Random => "random",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    Idle,
    Fetching { in_flight: usize },
}

/// Runs one fetch per user action and publishes what the screen should show.
///
/// Prior fetches are never cancelled: two actions in quick succession both
/// complete and whichever settles last leaves its values on the channels.
pub struct RequestCoordinator {
    data_source: Arc<dyn FactsDataSource>,
    results: broadcast::Sender<Vec<Fact>>,
    panel: broadcast::Sender<DisplayInstruction>,
    connection: broadcast::Sender<ConnectionNotice>,
    in_flight: AtomicUsize,
    next_request_id: AtomicU64,
}

struct InFlightGuard<'a>(&'a AtomicUsize);

impl<'a> InFlightGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl RequestCoordinator {
    pub fn new(data_source: Arc<dyn FactsDataSource>) -> Arc<Self> {
        Self::with_capacity(data_source, DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(data_source: Arc<dyn FactsDataSource>, capacity: usize) -> Arc<Self> {
        let capacity = capacity.max(1);
        let (results, _) = broadcast::channel(capacity);
        let (panel, _) = broadcast::channel(capacity);
        let (connection, _) = broadcast::channel(capacity);
        Arc::new(Self {
            data_source,
            results,
            panel,
            connection,
            in_flight: AtomicUsize::new(0),
            next_request_id: AtomicU64::new(1),
        })
    }

    pub fn subscribe_results(&self) -> broadcast::Receiver<Vec<Fact>> {
        self.results.subscribe()
    }

    pub fn subscribe_panel(&self) -> broadcast::Receiver<DisplayInstruction> {
        self.panel.subscribe()
    }

    pub fn subscribe_connection(&self) -> broadcast::Receiver<ConnectionNotice> {
        self.connection.subscribe()
    }

    pub fn state(&self) -> CoordinatorState {
        match self.in_flight.load(Ordering::SeqCst) {
            0 => CoordinatorState::Idle,
            in_flight => CoordinatorState::Fetching { in_flight },
        }
    }

    pub async fn search_by_free_text(&self, query: &str) -> Classification {
        self.run(SearchAction::FreeText(query.to_string())).await
    }

    pub async fn search_by_category(&self, category: &str) -> Classification {
        self.run(SearchAction::Category(category.to_string())).await
    }

    pub async fn search_random(&self) -> Classification {
        self.run(SearchAction::Random).await
    }

    /// Spawns the fetch onto the runtime and returns immediately.
    pub fn dispatch(self: &Arc<Self>, action: SearchAction) -> JoinHandle<Classification> {
        let coordinator = Arc::clone(self);
        tokio::spawn(async move { coordinator.run(action).await })
    }

    pub async fn run(&self, action: SearchAction) -> Classification {
        let request_id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        let _guard = InFlightGuard::enter(&self.in_flight);
        debug!(request_id, action = action.name(), "facts: fetch started");

        let outcome = match &action {
            SearchAction::FreeText(query) => self.data_source.fetch_by_free_text(query).await,
            SearchAction::Category(category) => {
                self.data_source.fetch_by_category(category).await
            }
            SearchAction::Random => self.data_source.fetch_random().await,
        };
        info!(
            request_id,
            action = action.name(),
            outcome = outcome.kind(),
            "facts: fetch settled"
        );

        let classification = classify(outcome);
        self.publish(request_id, &classification);
        classification
    }

    fn publish(&self, request_id: u64, classification: &Classification) {
        if let Some(facts) = &classification.payload {
            if self.results.send(facts.clone()).is_err() {
                debug!(request_id, "facts: no results subscribers");
            }
        }
        if let Some(instruction) = classification.instruction {
            if self.panel.send(instruction).is_err() {
                debug!(request_id, "facts: no panel subscribers");
            }
        }
        if let Some(notice) = classification.notice {
            warn!(request_id, key = %notice.message, "facts: connection notice");
            if self.connection.send(notice).is_err() {
                debug!(request_id, "facts: no connection subscribers");
            }
        }
    }
}
