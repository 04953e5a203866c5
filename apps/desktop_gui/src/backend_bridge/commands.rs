//! Backend commands queued from UI to backend worker.

use client_core::{ExitTicket, ExitWaiter};

#[derive(Debug)]
pub enum BackendCommand {
    FetchBatch,
    LoadImage {
        url: String,
    },
    /// Wait for the card exit signal (or the fallback) and report back.
    AwaitExit {
        ticket: ExitTicket,
        waiter: ExitWaiter,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::FetchBatch => "fetch_batch",
            BackendCommand::LoadImage { .. } => "load_image",
            BackendCommand::AwaitExit { .. } => "await_exit",
        }
    }
}
