//! Debounced free-text search.
//!
//! Text below [`MIN_SEARCH_LEN`] characters clears results immediately; longer
//! text is only searched once the input has been quiet for [`DEFAULT_QUIET`].
//! Every change restarts the quiet period.
use std::time::Duration;

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{Instant, sleep_until},
};

pub const DEFAULT_QUIET: Duration = Duration::from_millis(400);
pub const MIN_SEARCH_LEN: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DebounceConfig {
    pub quiet: Duration,
    pub min_len: usize,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            quiet: DEFAULT_QUIET,
            min_len: MIN_SEARCH_LEN,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchEvent {
    /// Text too short to search: drop accumulated results.
    Clear,
    /// Run a search for this text.
    Search(String),
}

/// Timer-free debounce state, driven by explicit instants.
#[derive(Clone, Debug, Default)]
pub struct SearchDebouncer {
    config: DebounceConfig,
    pending: Option<(String, Instant)>,
}

impl SearchDebouncer {
    pub fn new(config: DebounceConfig) -> Self {
        Self {
            config,
            pending: None,
        }
    }

    /// Registers a new input value at `now`.
    ///
    /// Returns `Some(SearchEvent::Clear)` right away for short text; otherwise
    /// (re)schedules the search and returns `None`.
    pub fn input(&mut self, text: &str, now: Instant) -> Option<SearchEvent> {
        let text = text.trim();
        if text.chars().count() < self.config.min_len {
            self.pending = None;
            return Some(SearchEvent::Clear);
        }
        self.pending = Some((text.to_string(), now + self.config.quiet));
        None
    }

    /// When the pending search becomes due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    /// Returns the pending search once its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<SearchEvent> {
        match &self.pending {
            Some((_, deadline)) if *deadline <= now => self
                .pending
                .take()
                .map(|(text, _)| SearchEvent::Search(text)),
            _ => None,
        }
    }

    /// Drops the pending search.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchCommand {
    Input(String),
    /// The query identity changed (e.g. another account): forget pending text.
    Cancel,
}

/// Runs the debounce loop until `commands` closes.
///
/// Closing the command channel drops any pending search.
pub async fn debounce_search(
    mut commands: mpsc::Receiver<SearchCommand>,
    events: mpsc::Sender<SearchEvent>,
    config: DebounceConfig,
) {
    let mut debouncer = SearchDebouncer::new(config);
    loop {
        let deadline = debouncer.deadline();
        let event = tokio::select! {
            command = commands.recv() => match command {
                Some(SearchCommand::Input(text)) => debouncer.input(&text, Instant::now()),
                Some(SearchCommand::Cancel) => {
                    debouncer.cancel();
                    None
                }
                None => return,
            },
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                debouncer.poll(Instant::now())
            }
        };

        if let Some(event) = event
            && events.send(event).await.is_err()
        {
            return;
        }
    }
}

/// Handle to a spawned [`debounce_search`] loop.
///
/// Dropping the handle stops the loop and its pending timer.
#[derive(Debug)]
pub struct SearchTrigger {
    commands: mpsc::Sender<SearchCommand>,
    task: JoinHandle<()>,
}

impl SearchTrigger {
    pub fn spawn(config: DebounceConfig) -> (Self, mpsc::Receiver<SearchEvent>) {
        let (commands, command_rx) = mpsc::channel(32);
        let (event_tx, events) = mpsc::channel(32);
        let task = tokio::spawn(debounce_search(command_rx, event_tx, config));
        (Self { commands, task }, events)
    }

    pub async fn input(&self, text: impl Into<String>) {
        if self
            .commands
            .send(SearchCommand::Input(text.into()))
            .await
            .is_err()
        {
            tracing::debug!("search trigger already stopped");
        }
    }

    pub async fn cancel(&self) {
        if self.commands.send(SearchCommand::Cancel).await.is_err() {
            tracing::debug!("search trigger already stopped");
        }
    }
}

impl Drop for SearchTrigger {
    fn drop(&mut self) {
        self.task.abort();
    }
}
