//! Interactive capture of a new global shortcut.
//!
//! While a session is active the recorder sees every key-down from the
//! overlay before anything else does and swallows it, with the exception of
//! ⌘Q. Escape cancels and puts back the label of whatever shortcut the
//! registry holds at that point; anything else is validated and handed to the
//! registry.
//! Rejections are shown inline and fall back to the prompt after
//! [`MESSAGE_REVERT_DELAY`].

use std::time::Duration;

use tracing::{debug, info};

use crate::binding::{HotkeyBinding, Modifiers, keys};
use crate::registry::Rebind;
use crate::validator;

/// Shown while waiting for the user to press a shortcut.
pub const PROMPT: &str = "Type shortcut…";

/// Shown when the OS refuses a valid shortcut.
pub const UNAVAILABLE: &str = "Shortcut unavailable";

/// How long a rejection message stays up before the prompt returns.
pub const MESSAGE_REVERT_DELAY: Duration = Duration::from_millis(1200);

/// A raw key-down as seen by the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key_code: u32,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn new(key_code: u32, modifiers: Modifiers) -> Self {
        Self {
            key_code,
            modifiers,
        }
    }

    /// ⌘Q always reaches the application.
    pub fn is_quit(&self) -> bool {
        self.modifiers == Modifiers::COMMAND && self.key_code == keys::Q
    }

    fn binding(&self) -> HotkeyBinding {
        HotkeyBinding::new(self.key_code, self.modifiers)
    }
}

/// Identifies one inline message so a late revert timer cannot clear a
/// newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageTicket(u64);

/// What the recorder did with a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingOutcome {
    /// Not consumed; deliver the key normally.
    Forwarded,
    /// Session ended by Escape, the previous label is back.
    Cancelled,
    /// Session ended, the binding is now the global shortcut.
    Bound(HotkeyBinding),
    /// Still recording; `message` is displayed until `ticket` is reverted.
    Rejected {
        message: String,
        ticket: MessageTicket,
    },
}

#[derive(Debug, Default)]
struct Session {
    message: Option<MessageTicket>,
}

/// Owns the shortcut label and at most one recording session.
#[derive(Debug)]
pub struct HotkeyRecorder {
    label: String,
    session: Option<Session>,
    next_ticket: u64,
}

impl HotkeyRecorder {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            session: None,
            next_ticket: 0,
        }
    }

    /// The text to display for the shortcut field.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_recording(&self) -> bool {
        self.session.is_some()
    }

    /// Begins intercepting keys. Returns `false` if a session is already
    /// running.
    pub fn start(&mut self) -> bool {
        if self.session.is_some() {
            return false;
        }
        self.label = PROMPT.to_string();
        self.session = Some(Session::default());
        info!("shortcut recording started");
        true
    }

    /// Offers a key-down to the session.
    pub fn handle(&mut self, key: KeyPress, rebind: &mut impl Rebind) -> RecordingOutcome {
        if self.session.is_none() || key.is_quit() {
            return RecordingOutcome::Forwarded;
        }
        if key.key_code == keys::ESCAPE {
            self.cancel_if_active(&*rebind);
            return RecordingOutcome::Cancelled;
        }

        let candidate = key.binding();
        if let Err(rejection) = validator::check(&candidate) {
            debug!(candidate = %candidate, %rejection, "shortcut rejected");
            return self.reject(rejection.to_string());
        }

        match rebind.reregister(candidate) {
            Ok(()) => {
                self.session = None;
                self.label = candidate.to_string();
                info!(binding = %candidate, "shortcut recorded");
                RecordingOutcome::Bound(candidate)
            }
            Err(e) => {
                debug!(candidate = %candidate, error = %e, "shortcut refused");
                self.reject(UNAVAILABLE.to_string())
            }
        }
    }

    /// Ends the session as Escape would. Returns whether one was running.
    ///
    /// The label becomes whatever `rebind` holds now, which after a failed
    /// swap can differ from the one shown when the session started.
    pub fn cancel_if_active(&mut self, rebind: &impl Rebind) -> bool {
        if self.session.take().is_none() {
            return false;
        }
        self.label = rebind.label();
        info!("shortcut recording cancelled");
        true
    }

    /// Puts the prompt back if `ticket` is still the message on screen.
    pub fn revert_message(&mut self, ticket: MessageTicket) -> bool {
        match self.session.as_mut() {
            Some(session) if session.message == Some(ticket) => {
                session.message = None;
                self.label = PROMPT.to_string();
                true
            }
            _ => false,
        }
    }

    fn reject(&mut self, message: String) -> RecordingOutcome {
        self.next_ticket += 1;
        let ticket = MessageTicket(self.next_ticket);
        if let Some(session) = self.session.as_mut() {
            session.message = Some(ticket);
        }
        self.label = message.clone();
        RecordingOutcome::Rejected { message, ticket }
    }
}
