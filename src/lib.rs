// Re-export from the core crate
pub use mdfloat_core::{
    APP_NAME, APP_NAME_PRETTY, Config, ConfigManager, DEFAULT_LOG_LEVEL, HotkeyBinding,
    HotkeyError, HotkeyRegistry, Visibility,
};

// App-specific modules
pub mod backend;
pub mod event;
pub mod icon;
pub mod keymap;
pub mod notify;
pub mod overlay;
pub mod schedule;

// Version from this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
