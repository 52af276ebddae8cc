//! Search orchestration
//!
//! A single task owns the [`SearchState`]. It reacts to three kinds of events:
//! commands from a [`SearchHandle`], expiry of the query-text debounce timer,
//! and completion of the outbound fetch. Whenever the effective query key
//! changes it starts exactly one fetch; responses from superseded fetches are
//! dropped so the state always reflects the latest request.

use super::models::{QueryKey, SearchPage, SearchState, Transition};
use crate::config::SearchSettings;
use crate::engines::{FetchError, RepositorySource};
use crate::licenses;
use crate::query::SearchRequest;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, trace, warn};

/// Errors returned to callers of [`SearchHandle`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("page numbers start at 1")]
    InvalidPage,

    #[error("search orchestrator has shut down")]
    Closed,
}

/// Source of the current date for the recency filter
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall clock, UTC
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// A clock stuck on one day
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[derive(Debug)]
enum Command {
    SetQueryText(String),
    SetLicense(String),
    SetPage(u32),
}

type Completion = (u64, Result<SearchPage, FetchError>);

/// Cloneable handle to a running orchestrator
///
/// Dropping every handle shuts the orchestrator down.
#[derive(Clone)]
pub struct SearchHandle {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<SearchState>,
}

impl SearchHandle {
    pub fn set_query_text(&self, text: impl Into<String>) -> Result<(), SearchError> {
        self.send(Command::SetQueryText(text.into()))
    }

    /// Empty `key` clears the license filter; surrounding whitespace is ignored
    pub fn set_license(&self, key: impl Into<String>) -> Result<(), SearchError> {
        let key: String = key.into();
        self.send(Command::SetLicense(key.trim().to_string()))
    }

    pub fn set_page(&self, page: u32) -> Result<(), SearchError> {
        if page == 0 {
            return Err(SearchError::InvalidPage);
        }
        self.send(Command::SetPage(page))
    }

    /// Snapshot of the current state
    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.clone()
    }

    fn send(&self, command: Command) -> Result<(), SearchError> {
        self.commands.send(command).map_err(|_| SearchError::Closed)
    }
}

/// Builder for the orchestrator task
pub struct Orchestrator {
    settings: SearchSettings,
    source: Arc<dyn RepositorySource>,
    clock: Arc<dyn Clock>,
}

impl Orchestrator {
    pub fn new(settings: SearchSettings, source: Arc<dyn RepositorySource>) -> Self {
        Self {
            settings,
            source,
            clock: Arc::new(SystemClock),
        }
    }

    /// Use a custom clock for the recency filter
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Start the orchestrator; the initial fetch is issued right away
    pub fn spawn(self) -> (SearchHandle, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(SearchState::new());

        let runner = Runner {
            debounce: Duration::from_millis(self.settings.debounce_ms),
            settings: self.settings,
            source: self.source,
            clock: self.clock,
            state: SearchState::new(),
            publisher: state_tx,
            settled_text: String::new(),
            debounce_deadline: None,
            last_key: None,
            sequence: 0,
            in_flight: None,
            completions: completion_tx,
        };

        let task = tokio::spawn(runner.run(command_rx, completion_rx));

        let handle = SearchHandle {
            commands: command_tx,
            state: state_rx,
        };

        (handle, task)
    }
}

struct Runner {
    settings: SearchSettings,
    source: Arc<dyn RepositorySource>,
    clock: Arc<dyn Clock>,
    debounce: Duration,
    state: SearchState,
    publisher: watch::Sender<SearchState>,
    /// Query text once it has been quiet for the debounce window
    settled_text: String,
    debounce_deadline: Option<Instant>,
    last_key: Option<QueryKey>,
    /// Sequence number of the latest fetch; older completions are stale
    sequence: u64,
    in_flight: Option<AbortHandle>,
    completions: mpsc::UnboundedSender<Completion>,
}

impl Runner {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut completions: mpsc::UnboundedReceiver<Completion>,
    ) {
        info!("Search orchestrator started (source: {})", self.source.name());
        self.refresh();

        loop {
            let deadline = self.debounce_deadline;
            let debounce = async move {
                match deadline {
                    Some(at) => sleep_until(at).await,
                    None => std::future::pending().await,
                }
            };

            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                Some((sequence, outcome)) = completions.recv() => {
                    self.handle_completion(sequence, outcome);
                }
                _ = debounce => self.settle_text(),
            }
        }

        if let Some(in_flight) = self.in_flight.take() {
            in_flight.abort();
        }
        info!("Search orchestrator stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::SetQueryText(text) => {
                self.state.apply(Transition::SetQueryText(text));
                // The page reset rides along with the debounced text
                self.debounce_deadline = Some(Instant::now() + self.debounce);
                self.publish();
            }
            Command::SetLicense(key) => {
                if !key.is_empty() && licenses::find(&key).is_none() {
                    debug!("License key '{}' is not in the catalog, passing through", key);
                }
                self.state.apply(Transition::SetLicense(key));
                self.publish();
                self.refresh();
            }
            Command::SetPage(page) => {
                self.state.apply(Transition::SetPage(page));
                self.publish();
                self.refresh();
            }
        }
    }

    fn settle_text(&mut self) {
        self.debounce_deadline = None;
        self.settled_text = self.state.query_text.clone();
        debug!("Query text settled: '{}'", self.settled_text);
        self.refresh();
    }

    /// Start a fetch if the effective query key changed
    fn refresh(&mut self) {
        let key = QueryKey {
            text: self.settled_text.clone(),
            license: self.state.license_key.clone(),
            page: self.state.page_number,
        };

        if self.last_key.as_ref() == Some(&key) {
            trace!("Query key unchanged, no fetch");
            return;
        }

        self.last_key = Some(key.clone());
        self.start_fetch(&key);
    }

    fn start_fetch(&mut self, key: &QueryKey) {
        self.sequence += 1;
        let sequence = self.sequence;

        if let Some(previous) = self.in_flight.take() {
            previous.abort();
        }

        self.state.apply(Transition::FetchStart);
        self.publish();

        let request = SearchRequest::build(key, &self.settings, self.clock.today());
        debug!(
            "Fetch #{}: q='{}' page={} per_page={}",
            sequence, request.expression, request.page, request.per_page
        );

        let source = self.source.clone();
        let completions = self.completions.clone();
        let task = tokio::spawn(async move {
            let outcome = source.search(&request).await;
            // The receiver only goes away during shutdown
            let _ = completions.send((sequence, outcome));
        });
        self.in_flight = Some(task.abort_handle());
    }

    fn handle_completion(&mut self, sequence: u64, outcome: Result<SearchPage, FetchError>) {
        if sequence != self.sequence {
            trace!(
                "Discarding response #{} (latest is #{})",
                sequence,
                self.sequence
            );
            return;
        }
        self.in_flight = None;

        match outcome {
            Ok(page) => {
                debug!(
                    "Fetch #{} returned {} items of {}",
                    sequence,
                    page.items.len(),
                    page.total_count
                );
                self.state.apply(Transition::FetchSuccess {
                    items: page.items,
                    total: page.total_count,
                });
            }
            Err(e) => {
                warn!("Fetch #{} failed: {}", sequence, e);
                self.state.apply(Transition::FetchFailure);
            }
        }
        self.publish();
    }

    fn publish(&self) {
        self.publisher.send_replace(self.state.clone());
    }
}
