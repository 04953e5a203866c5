//! UI/backend events and error modeling for desktop GUI controller.

use client_core::{ExitOutcome, ExitTicket};
use shared::{domain::Profile, error::FetchFailure};

use crate::ui::app::DecodedImage;

#[derive(Debug)]
pub enum UiEvent {
    Info(String),
    Error(UiError),
    BatchLoaded(Vec<Profile>),
    BatchFailed(FetchFailure),
    ImageLoaded { url: String, image: DecodedImage },
    ImageFailed { url: String, reason: String },
    ExitFinished {
        ticket: ExitTicket,
        outcome: ExitOutcome,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Decode,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Settings,
    ImageLoad,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("decode")
            || message_lower.contains("malformed")
            || message_lower.contains("unsupported")
            || message_lower.contains("format")
        {
            UiErrorCategory::Decode
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("dns")
            || message_lower.contains("network")
            || message_lower.contains("disconnect")
            || message_lower.contains("status")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// One-line text for the status bar.
    pub fn status_line(&self) -> String {
        let label = match self.category {
            UiErrorCategory::Transport => "Network",
            UiErrorCategory::Decode => "Decode",
            UiErrorCategory::Unknown => "Error",
        };
        let context = match self.context {
            UiErrorContext::BackendStartup => "backend startup",
            UiErrorContext::Settings => "settings",
            UiErrorContext::ImageLoad => "image",
        };
        format!("{label} ({context}): {}", self.message)
    }
}
