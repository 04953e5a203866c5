use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use client_core::{load_settings, Settings};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::ui::SwipeApp;

#[derive(Parser, Debug)]
struct Args {
    /// Path to a swipe.toml config file.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    batch_size: Option<usize>,
}

/// Resolves settings, falling back to defaults so the window still opens
/// with the problem shown in the status bar.
fn resolve_settings(args: &Args) -> (Settings, Option<UiError>) {
    let mut settings = match load_settings(args.config.as_deref()) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::error!("failed to load settings, using defaults: {err}");
            return (
                Settings::default(),
                Some(UiError::from_message(UiErrorContext::Settings, err.to_string())),
            );
        }
    };
    if let Some(api_url) = &args.api_url {
        settings.api_url = api_url.clone();
    }
    if let Some(batch_size) = args.batch_size {
        settings.batch_size = batch_size;
    }
    match settings.validate() {
        Ok(()) => (settings, None),
        Err(err) => {
            tracing::error!("invalid command line settings, using defaults: {err}");
            (
                Settings::default(),
                Some(UiError::from_message(UiErrorContext::Settings, err.to_string())),
            )
        }
    }
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();
    let (settings, startup_error) = resolve_settings(&args);

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, settings.clone());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Swipe")
            .with_inner_size([480.0, 720.0])
            .with_min_inner_size([420.0, 640.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Swipe",
        options,
        Box::new(|_cc| {
            Ok(Box::new(SwipeApp::new(
                cmd_tx,
                ui_rx,
                settings,
                startup_error,
            )))
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::{resolve_settings, Args};
    use crate::controller::events::{UiError, UiErrorCategory, UiErrorContext};
    use crate::ui::app::decode_card_image;

    #[test]
    fn classifies_backend_disconnect_as_transport_error() {
        let err = UiError::from_message(
            UiErrorContext::BackendStartup,
            "Backend worker disconnected (possible startup/runtime failure)",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert!(err.status_line().starts_with("Network (backend startup)"));
    }

    #[test]
    fn classifies_bad_image_bytes_as_decode_error() {
        let reason = format!(
            "{:#}",
            decode_card_image(b"definitely not an image").expect_err("garbage must not decode")
        );
        let err = UiError::from_message(UiErrorContext::ImageLoad, reason);
        assert_eq!(err.category(), UiErrorCategory::Decode);
        assert_eq!(err.context(), UiErrorContext::ImageLoad);
    }

    #[test]
    fn decodes_and_bounds_card_images() {
        let mut png = Vec::new();
        let source = image::RgbaImage::from_pixel(1024, 768, image::Rgba([200, 10, 10, 255]));
        image::DynamicImage::ImageRgba8(source)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .expect("encode png");

        let decoded = decode_card_image(&png).expect("decode");
        assert_eq!((decoded.width, decoded.height), (512, 384));
        assert_eq!(decoded.rgba.len(), 512 * 384 * 4);
    }

    #[test]
    fn invalid_cli_batch_size_falls_back_to_defaults() {
        let dir = std::env::temp_dir().join(format!("swipe_gui_settings_{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let config = dir.join("swipe.toml");
        std::fs::write(&config, "batch_size = 3\n").expect("write config");

        let args = Args {
            config: Some(config.clone()),
            api_url: None,
            batch_size: Some(0),
        };
        let (settings, err) = resolve_settings(&args);
        assert_eq!(settings.batch_size, 10);
        assert!(err.is_some_and(|err| err.context() == UiErrorContext::Settings));

        let args = Args {
            batch_size: None,
            ..args
        };
        let (settings, err) = resolve_settings(&args);
        assert_eq!(settings.batch_size, 3);
        assert!(err.is_none());

        std::fs::remove_dir_all(dir).expect("cleanup");
    }
}
