//! Presentation state and the single reducer every loop funnels into.

use racefeed_core::{CategoryId, Event, WindowPolicy};
use tracing::debug;

/// What the renderer sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedState {
    /// Soonest first, at most `max_display` long
    pub visible_events: Vec<Event>,
    pub is_loading: bool,
    /// Set when the last fetch failed, cleared by the next success
    pub error_message: Option<String>,
}

impl FeedState {
    /// State before the first fetch has finished.
    pub fn loading() -> Self {
        Self {
            visible_events: Vec::new(),
            is_loading: true,
            error_message: None,
        }
    }

    /// Pick the single thing to show, in priority order: loading (only when
    /// there is nothing to keep on screen), error, empty, list.
    pub fn display_status(&self) -> DisplayStatus<'_> {
        if self.is_loading && self.visible_events.is_empty() {
            DisplayStatus::Loading
        } else if let Some(message) = &self.error_message {
            DisplayStatus::Error(message)
        } else if self.visible_events.is_empty() {
            DisplayStatus::Empty
        } else {
            DisplayStatus::Events(&self.visible_events)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayStatus<'a> {
    Loading,
    Error(&'a str),
    Empty,
    Events(&'a [Event]),
}

/// Mutations sent to the state owner by the scheduler, the ticker and the
/// session handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FeedCommand {
    FetchStarted {
        generation: u64,
    },
    FetchSucceeded {
        generation: u64,
        events: Vec<Event>,
    },
    FetchFailed {
        generation: u64,
        message: String,
    },
    Prune {
        now: i64,
    },
    SetFilter {
        filter: Option<CategoryId>,
    },
}

/// Owner of [`FeedState`]. Only the session actor holds one.
#[derive(Debug)]
pub(crate) struct FeedStore {
    state: FeedState,
    filter: Option<CategoryId>,
    generation: u64,
    policy: WindowPolicy,
}

impl FeedStore {
    pub fn new(policy: WindowPolicy, filter: Option<CategoryId>) -> Self {
        Self {
            state: FeedState::loading(),
            filter,
            generation: 0,
            policy,
        }
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn filter(&self) -> Option<&CategoryId> {
        self.filter.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Apply one command. Returns true when the visible state changed.
    ///
    /// Fetch results tagged with an older generation are dropped.
    pub fn apply(&mut self, command: FeedCommand) -> bool {
        match command {
            FeedCommand::SetFilter { filter } => {
                self.filter = filter;
                self.generation += 1;
                debug!(
                    "Filter set to {:?} (generation {})",
                    self.filter.as_ref().map(CategoryId::as_str),
                    self.generation
                );
                false
            }
            FeedCommand::Prune { now } => self.policy.prune(&mut self.state.visible_events, now),
            FeedCommand::FetchStarted { generation } => {
                if !self.is_current(generation) || self.state.is_loading {
                    return false;
                }
                self.state.is_loading = true;
                true
            }
            FeedCommand::FetchSucceeded { generation, events } => {
                if !self.is_current(generation) {
                    return false;
                }
                self.state = FeedState {
                    visible_events: events,
                    is_loading: false,
                    error_message: None,
                };
                true
            }
            FeedCommand::FetchFailed {
                generation,
                message,
            } => {
                if !self.is_current(generation) {
                    return false;
                }
                self.state.error_message = Some(message);
                self.state.is_loading = false;
                true
            }
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        if generation != self.generation {
            debug!(
                "Dropping result from stale generation {generation} (current {})",
                self.generation
            );
            return false;
        }
        true
    }
}
