//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread, time::Duration};

use anyhow::{Context, Result};
use client_core::{await_exit, ProfileSource, RandomUserClient, Settings};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use reqwest::Client as HttpClient;
use shared::error::FetchFailure;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::ui::app::{decode_card_image, DecodedImage};

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: Settings) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let http = HttpClient::new();
            let source: Arc<dyn ProfileSource> =
                Arc::new(RandomUserClient::from_settings(&settings).with_http_client(http.clone()));
            let batch_size = settings.batch_size;
            let exit_fallback = settings.exit_fallback();
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::FetchBatch => {
                        let source = source.clone();
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let event = match source.fetch_batch(batch_size).await {
                                Ok(profiles) => UiEvent::BatchLoaded(profiles),
                                Err(err) => {
                                    UiEvent::BatchFailed(FetchFailure::new(format!("{err:#}")))
                                }
                            };
                            send_event(&ui_tx, event).await;
                        });
                    }
                    BackendCommand::LoadImage { url } => {
                        let http = http.clone();
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let event = match fetch_card_image(&http, &url).await {
                                Ok(image) => UiEvent::ImageLoaded { url, image },
                                Err(err) => UiEvent::ImageFailed {
                                    url,
                                    reason: format!("{err:#}"),
                                },
                            };
                            send_event(&ui_tx, event).await;
                        });
                    }
                    BackendCommand::AwaitExit { ticket, waiter } => {
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let outcome = await_exit(waiter, exit_fallback).await;
                            send_event(&ui_tx, UiEvent::ExitFinished { ticket, outcome }).await;
                        });
                    }
                }
            }
            tracing::info!("ui command queue closed; backend worker stopping");
        });
    });
}

const SEND_DEADLINE: Duration = Duration::from_secs(5);
const SEND_RETRY_INTERVAL: Duration = Duration::from_millis(10);

/// Events that change browser state must not be dropped, so a full queue is
/// retried until `SEND_DEADLINE` without blocking the runtime thread.
async fn send_event(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    let deadline = tokio::time::Instant::now() + SEND_DEADLINE;
    let mut event = event;
    loop {
        match ui_tx.try_send(event) {
            Ok(()) => return,
            Err(TrySendError::Disconnected(_)) => {
                tracing::error!("failed to deliver backend event to ui: queue disconnected");
                return;
            }
            Err(TrySendError::Full(pending)) => {
                if tokio::time::Instant::now() >= deadline {
                    tracing::error!("failed to deliver backend event to ui: queue full");
                    return;
                }
                event = pending;
                tokio::time::sleep(SEND_RETRY_INTERVAL).await;
            }
        }
    }
}

async fn fetch_card_image(http: &HttpClient, url: &str) -> Result<DecodedImage> {
    let bytes = http
        .get(url)
        .send()
        .await
        .with_context(|| format!("image request to {url} failed"))?
        .error_for_status()?
        .bytes()
        .await?;
    tokio::task::spawn_blocking(move || decode_card_image(&bytes))
        .await
        .context("image decode task panicked")?
}

#[cfg(test)]
mod tests {
    use super::send_event;
    use crate::controller::events::UiEvent;

    fn info(event: UiEvent) -> Option<String> {
        match event {
            UiEvent::Info(message) => Some(message),
            _ => None,
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn full_ui_queue_does_not_stall_other_tasks() {
        let (ui_tx, ui_rx) = crossbeam_channel::bounded(1);
        ui_tx
            .try_send(UiEvent::Info("first".to_string()))
            .expect("queue has room");

        let sender = tokio::spawn({
            let ui_tx = ui_tx.clone();
            async move { send_event(&ui_tx, UiEvent::Info("second".to_string())).await }
        });

        // Runs on the same thread as the pending send.
        tokio::time::sleep(std::time::Duration::from_millis(30)).await;
        assert!(!sender.is_finished());
        assert_eq!(ui_rx.try_recv().ok().and_then(info).as_deref(), Some("first"));

        sender.await.expect("sender task");
        assert_eq!(ui_rx.try_recv().ok().and_then(info).as_deref(), Some("second"));
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn gives_up_after_the_deadline_when_nobody_drains() {
        let (ui_tx, ui_rx) = crossbeam_channel::bounded(1);
        ui_tx
            .try_send(UiEvent::Info("first".to_string()))
            .expect("queue has room");

        send_event(&ui_tx, UiEvent::Info("dropped".to_string())).await;

        assert_eq!(ui_rx.len(), 1);
        assert_eq!(ui_rx.try_recv().ok().and_then(info).as_deref(), Some("first"));
    }
}
