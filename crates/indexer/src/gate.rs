use log::debug;
use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePhase {
    NeverTriggered,
    Tracking,
}

#[derive(Debug, Default, Clone)]
struct DebounceState {
    last_query: Option<String>,
    last_query_at: Option<Instant>,
    last_trigger_at: Option<Instant>,
}

/// Decides per incoming query whether the index should be refreshed.
///
/// A valid query triggers when no previous query is recorded, when its first
/// character differs from the previous query's, or when the debounce interval
/// has passed since the last trigger. Every query, valid or not, is recorded.
#[derive(Debug)]
pub struct QueryGate {
    debounce: Duration,
    state: DebounceState,
}

impl QueryGate {
    #[must_use]
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            state: DebounceState::default(),
        }
    }

    #[must_use]
    pub const fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn should_refresh(&mut self, query: &str, is_valid: bool) -> bool {
        self.should_refresh_at(query, is_valid, Instant::now())
    }

    pub fn should_refresh_at(&mut self, query: &str, is_valid: bool, now: Instant) -> bool {
        let new_session = match &self.state.last_query {
            None => true,
            Some(previous) => previous.chars().next() != query.chars().next(),
        };
        let debounce_elapsed = self
            .state
            .last_trigger_at
            .map_or(true, |at| now.saturating_duration_since(at) > self.debounce);

        let trigger = is_valid && (new_session || debounce_elapsed);
        debug!(
            "gate: query={query:?} valid={is_valid} new_session={new_session} elapsed={debounce_elapsed} -> {trigger}"
        );

        if trigger {
            self.state.last_trigger_at = Some(now);
        }
        self.state.last_query = Some(query.to_string());
        self.state.last_query_at = Some(now);
        trigger
    }

    /// Forgets the recorded query so the next valid query triggers.
    pub fn reset(&mut self) {
        self.state.last_query = None;
    }

    #[must_use]
    pub fn phase(&self) -> GatePhase {
        if self.state.last_trigger_at.is_some() {
            GatePhase::Tracking
        } else {
            GatePhase::NeverTriggered
        }
    }

    #[must_use]
    pub fn last_query(&self) -> Option<&str> {
        self.state.last_query.as_deref()
    }

    #[must_use]
    pub fn last_query_at(&self) -> Option<Instant> {
        self.state.last_query_at
    }
}

impl Default for QueryGate {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
