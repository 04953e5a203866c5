//! Profile browsing state machine.
//!
//! The browser owns the batch, the cursor into it, the liked set and the
//! loading flag. Asynchronous work (the fetch and the card exit animation) is
//! split into a synchronous begin/finish pair so that whoever drives the
//! browser can await in between while the state stays consistent.

use std::collections::HashSet;

use shared::{
    domain::{Decision, Profile, ProfileId},
    error::FetchFailure,
};
use tracing::{debug, error, info};

use crate::view::{CardView, ErrorView, Screen, TerminalView, View};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserState {
    Idle,
    Loading,
    Ready { cursor: usize },
    Exhausted,
    Error,
}

/// Proof that a fetch was started. Handed back to [`ProfileBrowser::finish_fetch`].
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub struct FetchTicket(());

/// Identifies one pending card exit. Completing a ticket that no longer
/// matches the pending exit is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitTicket {
    generation: u64,
    cursor: usize,
    decision: Decision,
}

impl ExitTicket {
    pub fn decision(&self) -> Decision {
        self.decision
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

#[derive(Debug, Default)]
pub struct ProfileBrowser {
    batch: Vec<Profile>,
    cursor: usize,
    liked: Vec<Profile>,
    liked_ids: HashSet<ProfileId>,
    loading: bool,
    loaded_once: bool,
    generation: u64,
    pending_exit: Option<ExitTicket>,
    last_failure: Option<FetchFailure>,
}

impl ProfileBrowser {
    /// A browser in the `Idle` state: nothing fetched, nothing liked.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> BrowserState {
        if self.loading {
            BrowserState::Loading
        } else if self.last_failure.is_some() {
            BrowserState::Error
        } else if !self.loaded_once {
            BrowserState::Idle
        } else if self.cursor >= self.batch.len() {
            BrowserState::Exhausted
        } else {
            BrowserState::Ready {
                cursor: self.cursor,
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn batch(&self) -> &[Profile] {
        &self.batch
    }

    pub fn liked(&self) -> &[Profile] {
        &self.liked
    }

    pub fn liked_count(&self) -> usize {
        self.liked.len()
    }

    pub fn pending_exit(&self) -> Option<ExitTicket> {
        self.pending_exit
    }

    pub fn last_failure(&self) -> Option<&FetchFailure> {
        self.last_failure.as_ref()
    }

    /// The profile under the cursor, if the cursor is in range.
    pub fn current(&self) -> Option<&Profile> {
        self.batch.get(self.cursor)
    }

    /// Starts a fetch. Returns `None` when one is already in flight.
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        if self.loading {
            debug!("fetch already in flight; ignoring request");
            return None;
        }
        self.loading = true;
        self.pending_exit = None;
        self.last_failure = None;
        Some(FetchTicket(()))
    }

    pub fn finish_fetch(
        &mut self,
        _ticket: FetchTicket,
        result: Result<Vec<Profile>, FetchFailure>,
    ) {
        self.loading = false;
        match result {
            Ok(profiles) => {
                info!(count = profiles.len(), "loaded profile batch");
                self.batch = profiles;
                self.cursor = 0;
                self.generation = self.generation.wrapping_add(1);
                self.loaded_once = true;
            }
            Err(failure) => {
                error!("error fetching profiles: {failure}");
                self.last_failure = Some(failure);
            }
        }
    }

    /// Records a decision on the current profile and starts its exit.
    ///
    /// Ignored while loading, after a failed fetch, when the batch is used up
    /// or while a previous exit is still running.
    pub fn decide(&mut self, decision: Decision) -> Option<ExitTicket> {
        if self.loading || self.last_failure.is_some() || self.pending_exit.is_some() {
            return None;
        }
        let profile = self.batch.get(self.cursor)?;

        match decision {
            Decision::Accept => {
                if self.liked_ids.insert(profile.id) {
                    info!(id = %profile.id, "liked: {}", profile.first_name);
                    self.liked.push(profile.clone());
                }
            }
            Decision::Reject => info!(id = %profile.id, "noped: {}", profile.first_name),
        }

        let ticket = ExitTicket {
            generation: self.generation,
            cursor: self.cursor,
            decision,
        };
        self.pending_exit = Some(ticket);
        Some(ticket)
    }

    /// Finishes a card exit and advances the cursor. Returns whether it advanced.
    pub fn complete_exit(&mut self, ticket: ExitTicket) -> bool {
        if self.pending_exit != Some(ticket) {
            debug!(cursor = ticket.cursor, "ignoring stale exit completion");
            return false;
        }
        self.pending_exit = None;
        if self.cursor < self.batch.len() {
            self.cursor += 1;
        }
        true
    }

    /// Projects the state into what the presentation layer should show. This
    /// is the only place that decides whether decision controls are enabled.
    pub fn render(&self) -> Screen {
        let liked_count = self.liked.len();
        let (view, decisions_enabled) = if let Some(failure) = &self.last_failure {
            (View::Error(ErrorView::from_failure(failure)), false)
        } else if !self.loaded_once {
            (View::Blank, false)
        } else if let Some(profile) = self.current() {
            let card = CardView::from_profile(profile, self.cursor, self.batch.len());
            let enabled = !self.loading && self.pending_exit.is_none();
            (View::Card(card), enabled)
        } else {
            (View::Terminal(TerminalView { liked_count }), false)
        };

        Screen {
            view: if self.loading { View::Blank } else { view },
            loading: self.loading,
            decisions_enabled,
            liked_count,
            exiting: self.pending_exit,
        }
    }
}

#[cfg(test)]
#[path = "tests/browser_tests.rs"]
mod tests;
