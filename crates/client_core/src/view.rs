//! View-model handed to the presentation layer. Nothing here knows how it is drawn.

use shared::{domain::Profile, error::FetchFailure};

use crate::browser::ExitTicket;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub view: View,
    pub loading: bool,
    pub decisions_enabled: bool,
    pub liked_count: usize,
    /// Set while the current card is leaving the screen.
    pub exiting: Option<ExitTicket>,
}

impl Screen {
    /// The follow-up action offered by terminal and error views.
    pub fn action(&self) -> Option<ViewAction> {
        match &self.view {
            View::Terminal(_) => Some(ViewAction::LoadMore),
            View::Error(_) => Some(ViewAction::Retry),
            View::Blank | View::Card(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Nothing loaded yet, or a fetch is in flight.
    Blank,
    Card(CardView),
    Terminal(TerminalView),
    Error(ErrorView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub profile_id: String,
    pub name: String,
    pub age: u32,
    pub location: String,
    pub image_url: String,
    pub position: usize,
    pub batch_len: usize,
}

impl CardView {
    pub fn from_profile(profile: &Profile, position: usize, batch_len: usize) -> Self {
        Self {
            profile_id: profile.id.to_string(),
            name: profile.display_name(),
            age: profile.age,
            location: profile.location(),
            image_url: profile.image_url.clone(),
            position,
            batch_len,
        }
    }

    pub fn subtitle(&self) -> String {
        format!("{} • {}", self.age, self.location)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalView {
    pub liked_count: usize,
}

impl TerminalView {
    pub fn headline(&self) -> &'static str {
        "No more profiles to show!"
    }

    pub fn summary(&self) -> String {
        format!("You've liked {} profile(s)", self.liked_count)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorView {
    pub message: String,
    pub detail: String,
}

impl ErrorView {
    pub fn from_failure(failure: &FetchFailure) -> Self {
        Self {
            message: "Failed to load profiles. Please check your internet connection or try again later."
                .to_string(),
            detail: failure.message.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAction {
    LoadMore,
    Retry,
}

impl ViewAction {
    pub fn label(self) -> &'static str {
        match self {
            ViewAction::LoadMore => "Load More Profiles",
            ViewAction::Retry => "Retry",
        }
    }
}
