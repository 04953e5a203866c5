use std::{collections::HashMap, time::Instant};

use anyhow::Result;
use client_core::{
    animation, exit_signal, ExitMotion, ExitSignal, ExitTicket, FetchTicket, ProfileBrowser,
    Screen, Settings, View, ViewAction,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use egui::TextureHandle;
use shared::{domain::Decision, error::FetchFailure};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;

const CARD_SIZE: egui::Vec2 = egui::vec2(340.0, 440.0);
const CARD_IMAGE_MAX_DIMENSION: u32 = 512;
const LIKE_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 107, 107);
const NOPE_COLOR: egui::Color32 = egui::Color32::from_rgb(120, 130, 150);
const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 53, 69);

#[derive(Clone)]
pub struct DecodedImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

pub fn decode_card_image(bytes: &[u8]) -> Result<DecodedImage> {
    let dynamic = image::load_from_memory(bytes)?;
    let resized = dynamic
        .thumbnail(CARD_IMAGE_MAX_DIMENSION, CARD_IMAGE_MAX_DIMENSION)
        .to_rgba8();
    let width = resized.width() as usize;
    let height = resized.height() as usize;
    Ok(DecodedImage {
        width,
        height,
        rgba: resized.into_raw(),
    })
}

enum CardImage {
    Loading,
    Ready(TextureHandle),
    Failed,
}

/// The card currently leaving the screen.
struct CardExit {
    ticket: ExitTicket,
    motion: ExitMotion,
    started_at: Instant,
    /// Taken when the animation reaches its end.
    signal: Option<ExitSignal>,
}

pub struct SwipeApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    settings: Settings,

    browser: ProfileBrowser,
    fetch_ticket: Option<FetchTicket>,
    exit: Option<CardExit>,
    images: HashMap<String, CardImage>,

    status: String,
}

impl SwipeApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        settings: Settings,
        startup_error: Option<UiError>,
    ) -> Self {
        let status = startup_error
            .map(|err| err.status_line())
            .unwrap_or_else(|| "Starting...".to_string());
        let mut app = Self {
            cmd_tx,
            ui_rx,
            settings,
            browser: ProfileBrowser::new(),
            fetch_ticket: None,
            exit: None,
            images: HashMap::new(),
            status,
        };
        app.request_fetch();
        app
    }

    fn request_fetch(&mut self) {
        let Some(ticket) = self.browser.begin_fetch() else {
            return;
        };
        if let Err(_cmd) =
            dispatch_backend_command(&self.cmd_tx, BackendCommand::FetchBatch, &mut self.status)
        {
            self.browser
                .finish_fetch(ticket, Err(FetchFailure::new(self.status.clone())));
            return;
        }
        self.exit = None;
        self.fetch_ticket = Some(ticket);
    }

    fn on_decision(&mut self, decision: Decision) {
        let Some(ticket) = self.browser.decide(decision) else {
            return;
        };
        let (signal, waiter) = exit_signal();
        let cmd = BackendCommand::AwaitExit { ticket, waiter };
        if dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status).is_err() {
            // Nobody will report the exit back; advance right away.
            self.browser.complete_exit(ticket);
            return;
        }
        self.exit = Some(CardExit {
            ticket,
            motion: ExitMotion::for_decision(decision),
            started_at: Instant::now(),
            signal: Some(signal),
        });
    }

    fn on_view_action(&mut self, action: ViewAction) {
        tracing::info!(action = action.label(), "reloading profiles");
        self.request_fetch();
    }

    fn request_image(&mut self, url: &str) {
        if self.images.contains_key(url) {
            return;
        }
        let cmd = BackendCommand::LoadImage {
            url: url.to_string(),
        };
        if dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status).is_ok() {
            self.images.insert(url.to_string(), CardImage::Loading);
        }
    }

    fn process_ui_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => self.status = message,
                UiEvent::Error(err) => {
                    tracing::error!(context = ?err.context(), "{}", err.message());
                    self.status = err.status_line();
                }
                UiEvent::BatchLoaded(profiles) => {
                    if let Some(ticket) = self.fetch_ticket.take() {
                        self.status = format!("Loaded {} profiles", profiles.len());
                        // Batches replace each other wholesale, so do the images.
                        self.images.clear();
                        self.browser.finish_fetch(ticket, Ok(profiles));
                    }
                }
                UiEvent::BatchFailed(failure) => {
                    if let Some(ticket) = self.fetch_ticket.take() {
                        self.status = failure.to_string();
                        self.browser.finish_fetch(ticket, Err(failure));
                    }
                }
                UiEvent::ImageLoaded { url, image } => {
                    let color_image = egui::ColorImage::from_rgba_unmultiplied(
                        [image.width, image.height],
                        &image.rgba,
                    );
                    let texture = ctx.load_texture(
                        format!("card:{url}"),
                        color_image,
                        egui::TextureOptions::LINEAR,
                    );
                    self.images.insert(url, CardImage::Ready(texture));
                }
                UiEvent::ImageFailed { url, reason } => {
                    let err = UiError::from_message(UiErrorContext::ImageLoad, reason);
                    tracing::warn!(%url, category = ?err.category(), "{}", err.message());
                    self.images.insert(url, CardImage::Failed);
                }
                UiEvent::ExitFinished { ticket, outcome } => {
                    tracing::debug!(?outcome, cursor = ticket.cursor(), "card exit finished");
                    self.browser.complete_exit(ticket);
                    if self.exit.as_ref().is_some_and(|exit| exit.ticket == ticket) {
                        self.exit = None;
                    }
                }
            }
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context, screen: &Screen) {
        if !screen.decisions_enabled {
            return;
        }
        let (like, nope) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::ArrowRight),
                i.key_pressed(egui::Key::ArrowLeft),
            )
        });
        if like {
            self.on_decision(Decision::Accept);
        } else if nope {
            self.on_decision(Decision::Reject);
        }
    }

    /// Progress of the running exit animation; fires the completion signal
    /// once it reaches the end.
    fn exit_progress(&mut self) -> Option<(ExitMotion, f32)> {
        let duration = self.settings.exit_animation();
        let exit = self.exit.as_mut()?;
        let progress = animation::progress(exit.started_at.elapsed(), duration);
        if progress >= 1.0 {
            if let Some(signal) = exit.signal.take() {
                signal.fire();
            }
        }
        Some((exit.motion, progress))
    }

    fn show_top_bar(&self, ctx: &egui::Context, screen: &Screen) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Swipe");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        egui::RichText::new(format!("♥ {}", screen.liked_count))
                            .color(LIKE_COLOR)
                            .strong(),
                    );
                    ui.label("Liked:");
                });
            });
        });
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.small(egui::RichText::new(&self.status).weak());
        });
    }

    fn show_controls(&mut self, ui: &mut egui::Ui, screen: &Screen) {
        ui.horizontal(|ui| {
            let spacing = (ui.available_width() - 2.0 * 120.0 - 24.0).max(0.0) / 2.0;
            ui.add_space(spacing);
            let nope = egui::Button::new(egui::RichText::new("✖ Nope").size(18.0).color(NOPE_COLOR))
                .min_size(egui::vec2(120.0, 44.0));
            if ui.add_enabled(screen.decisions_enabled, nope).clicked() {
                self.on_decision(Decision::Reject);
            }
            ui.add_space(24.0);
            let like = egui::Button::new(egui::RichText::new("♥ Like").size(18.0).color(LIKE_COLOR))
                .min_size(egui::vec2(120.0, 44.0));
            if ui.add_enabled(screen.decisions_enabled, like).clicked() {
                self.on_decision(Decision::Accept);
            }
        });
    }

    fn show_card(&mut self, ui: &mut egui::Ui, card: &client_core::CardView) {
        self.request_image(&card.image_url);
        if let Some(next) = self.browser.batch().get(card.position + 1) {
            let next_url = next.image_url.clone();
            self.request_image(&next_url);
        }

        let (slot, _) = ui.allocate_exact_size(CARD_SIZE, egui::Sense::hover());
        let frame = match self.exit_progress() {
            Some((motion, progress)) => motion.frame(progress, CARD_SIZE.x),
            None => ExitMotion::for_decision(Decision::Accept).frame(0.0, CARD_SIZE.x),
        };
        let rect = slot.translate(egui::vec2(frame.offset_x, 0.0));
        let alpha = (frame.opacity * 255.0).round() as u8;
        let painter = ui.painter();

        match self.images.get(&card.image_url) {
            Some(CardImage::Ready(texture)) => {
                egui::Image::from_texture(egui::load::SizedTexture::from_handle(texture))
                    .rotate(frame.rotation_rad, egui::Vec2::splat(0.5))
                    .tint(egui::Color32::from_white_alpha(alpha))
                    .paint_at(ui, rect);
            }
            Some(CardImage::Failed) => {
                painter.rect_filled(
                    rect,
                    12.0,
                    egui::Color32::from_gray(60).gamma_multiply(frame.opacity),
                );
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "image unavailable",
                    egui::FontId::proportional(14.0),
                    egui::Color32::from_gray(200).gamma_multiply(frame.opacity),
                );
            }
            Some(CardImage::Loading) | None => {
                painter.rect_filled(
                    rect,
                    12.0,
                    egui::Color32::from_gray(40).gamma_multiply(frame.opacity),
                );
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "loading photo…",
                    egui::FontId::proportional(14.0),
                    egui::Color32::from_gray(180).gamma_multiply(frame.opacity),
                );
            }
        }

        let info = egui::Rect::from_min_max(
            egui::pos2(rect.left(), rect.bottom() - 72.0),
            rect.right_bottom(),
        );
        painter.rect_filled(
            info,
            0.0,
            egui::Color32::from_black_alpha(150).gamma_multiply(frame.opacity),
        );
        let text_color = egui::Color32::WHITE.gamma_multiply(frame.opacity);
        painter.text(
            info.left_top() + egui::vec2(14.0, 10.0),
            egui::Align2::LEFT_TOP,
            &card.name,
            egui::FontId::proportional(22.0),
            text_color,
        );
        painter.text(
            info.left_top() + egui::vec2(14.0, 40.0),
            egui::Align2::LEFT_TOP,
            card.subtitle(),
            egui::FontId::proportional(15.0),
            text_color,
        );
    }

    fn show_action_view(
        &mut self,
        ui: &mut egui::Ui,
        lines: &[egui::RichText],
        action: Option<ViewAction>,
    ) {
        ui.add_space(CARD_SIZE.y / 3.0);
        for line in lines {
            ui.label(line.clone());
        }
        ui.add_space(12.0);
        if let Some(action) = action {
            if ui.button(action.label()).clicked() {
                self.on_view_action(action);
            }
        }
    }

    fn show_main(&mut self, ctx: &egui::Context, screen: &Screen) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(16.0);
                match &screen.view {
                    View::Blank => {
                        ui.add_space(CARD_SIZE.y / 2.0);
                        if screen.loading {
                            ui.add(egui::Spinner::new().size(40.0));
                            ui.label("Loading profiles…");
                        }
                    }
                    View::Card(card) => self.show_card(ui, card),
                    View::Terminal(terminal) => {
                        let lines = [
                            egui::RichText::new(terminal.headline()).size(18.0),
                            egui::RichText::new(terminal.summary()).color(LIKE_COLOR).strong(),
                        ];
                        self.show_action_view(ui, &lines, screen.action());
                    }
                    View::Error(error) => {
                        let lines = [
                            egui::RichText::new(&error.message).color(ERROR_COLOR),
                            egui::RichText::new(&error.detail).weak().small(),
                        ];
                        self.show_action_view(ui, &lines, screen.action());
                    }
                }
                ui.add_space(20.0);
                self.show_controls(ui, screen);
            });
        });
    }
}

impl eframe::App for SwipeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events(ctx);

        let screen = self.browser.render();
        self.handle_shortcuts(ctx, &screen);
        let screen = self.browser.render();

        self.show_top_bar(ctx, &screen);
        self.show_status_bar(ctx);
        self.show_main(ctx, &screen);

        if screen.loading || self.exit.is_some() {
            ctx.request_repaint_after(std::time::Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
