//! Core types for mdfloat's global shortcut and overlay visibility.
//!
//! This crate has no platform dependencies. The OS hotkey API, the
//! animation and the persistence are reached through the traits in
//! [`registry`] and [`visibility`], implemented by the application.

pub mod binding;
mod config;
mod error;
pub mod recording;
pub mod registry;
pub mod validator;
pub mod visibility;

pub use binding::{HotkeyBinding, Modifiers, display_string, key_name};
pub use config::{Config, ConfigManager};
pub use error::{HotkeyError, Result};
pub use recording::{HotkeyRecorder, KeyPress, MessageTicket, RecordingOutcome};
pub use registry::{BindingStore, HotkeyBackend, HotkeyRegistry, PressHandler, Rebind};
pub use validator::Rejection;
pub use visibility::{OverlayDriver, Visibility, VisibilityCoordinator};

/// Application name
pub const APP_NAME: &str = "mdfloat";

/// Pretty application name for display
pub const APP_NAME_PRETTY: &str = "MarkdownFloat";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";
