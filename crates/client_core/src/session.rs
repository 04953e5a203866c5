use std::sync::Arc;

use shared::{domain::Decision, error::FetchFailure};
use tracing::warn;

use crate::{
    animation::{await_exit, ExitOutcome, ExitWaiter},
    browser::ProfileBrowser,
    config::Settings,
    source::ProfileSource,
    view::Screen,
};

/// Drives a [`ProfileBrowser`] against a profile source, awaiting the fetch
/// and the card exit between the begin/finish halves of each transition.
pub struct BrowserSession {
    browser: ProfileBrowser,
    source: Arc<dyn ProfileSource>,
    settings: Settings,
}

impl BrowserSession {
    pub fn new(source: Arc<dyn ProfileSource>, settings: Settings) -> Self {
        Self {
            browser: ProfileBrowser::new(),
            source,
            settings,
        }
    }

    pub fn browser(&self) -> &ProfileBrowser {
        &self.browser
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn screen(&self) -> Screen {
        self.browser.render()
    }

    /// Fetches a new batch. Returns false if a fetch was already running.
    /// Also serves as the load-more and retry action.
    pub async fn fetch_batch(&mut self) -> bool {
        let Some(ticket) = self.browser.begin_fetch() else {
            return false;
        };
        let result = self
            .source
            .fetch_batch(self.settings.batch_size)
            .await
            .map_err(|err| FetchFailure::new(format!("{err:#}")));
        self.browser.finish_fetch(ticket, result);
        true
    }

    /// Applies a decision, waits for the exit (or its fallback) and advances.
    /// Returns `None` when the decision was ignored.
    pub async fn decide(&mut self, decision: Decision, waiter: ExitWaiter) -> Option<ExitOutcome> {
        let ticket = self.browser.decide(decision)?;
        let outcome = await_exit(waiter, self.settings.exit_fallback()).await;
        if !self.browser.complete_exit(ticket) {
            warn!("exit completion was superseded");
        }
        Some(outcome)
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
