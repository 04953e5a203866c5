//! Client side of the profile browser: the state machine, the view-model it
//! renders to, the profile API client and the async driver tying them together.

pub mod animation;
pub mod browser;
pub mod config;
pub mod session;
pub mod source;
pub mod view;

pub use animation::{await_exit, exit_signal, ExitMotion, ExitOutcome, ExitSignal, ExitWaiter};
pub use browser::{BrowserState, ExitTicket, FetchTicket, ProfileBrowser};
pub use config::{load_settings, Settings, SettingsError};
pub use session::BrowserSession;
pub use source::{ProfileSource, RandomUserClient};
pub use view::{CardView, ErrorView, Screen, TerminalView, View, ViewAction};
