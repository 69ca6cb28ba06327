//! MemeMeow Engine
//!
//! The client core between the UI and the backend process:
//! - a debounced, never-abort-early save cycle for the settings panel
//! - the shortcut recorder state machine
//! - transient notification surfaces mirrored to the UI channel
//! - controllers for the search, community and API endpoint panels
//! - the application root acting as error boundary
//!
//! Construct an [`AppController`] with a [`meow_gateway::Gateway`], a
//! [`config::Config`] and a UI channel, then drive the panels through it.
//! Timers are tokio tasks, so everything here must run inside a tokio runtime.

mod api_urls;
mod app;
mod community;
mod debounce;
mod error;
mod notification;
mod recorder;
mod save;
mod search;
mod settings;
mod timer;

pub use api_urls::{ApiUrlsController, validate_endpoint};
pub use app::AppController;
pub use community::CommunityController;
pub use debounce::{OnSaved, SaveCoordinator};
pub use error::{Error, Result, Severity};
pub use notification::{Notification, NotificationSurface};
pub use recorder::{
    KeyOutcome, MODIFIER_REQUIRED, PLACEHOLDER, RECORDING_TIMED_OUT, Recorder, RecorderState,
    ShortcutTarget,
};
pub use save::{PARTIALLY_SAVED, SAVED, SaveReport, SaveStatus, run_save_cycle};
pub use search::{COPIED, SearchController};
pub use settings::{PreferencesState, SettingsController};
pub use timer::Timers;
