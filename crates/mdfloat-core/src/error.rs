use thiserror::Error;

use crate::binding::HotkeyBinding;
use crate::validator::Rejection;

/// Failures of the hotkey subsystem. None of them end the process.
#[derive(Debug, Error)]
pub enum HotkeyError {
    /// The candidate failed policy and never reached the OS.
    #[error(transparent)]
    ValidationRejected(#[from] Rejection),

    /// The OS refused a policy-valid binding, usually because another
    /// application already claimed it.
    #[error("failed to register {binding}: {reason}")]
    RegistrationFailed {
        binding: HotkeyBinding,
        reason: String,
    },

    /// Neither the requested binding nor the default could be registered.
    #[error("no global shortcut available (requested {requested}): {reason}")]
    StartupRegistrationFailed {
        requested: HotkeyBinding,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, HotkeyError>;
