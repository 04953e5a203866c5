//! UI layer for desktop GUI: the card view, decision controls and status bar.

pub mod app;

pub use app::SwipeApp;
