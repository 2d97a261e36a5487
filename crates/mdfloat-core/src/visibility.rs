//! Overlay visibility state machine.
//!
//! Show and hide are animated, so a toggle can arrive while an animation is
//! still running. Those toggles are coalesced into a single pending flag that
//! is drained when the running animation completes; a burst of presses
//! therefore produces at most one deferred transition.
//!
//! The coordinator never animates anything itself. Every transition is
//! driven through an [`OverlayDriver`] and completion is reported back via
//! [`VisibilityCoordinator::on_show_complete`] and
//! [`VisibilityCoordinator::on_hide_complete`]. There is no timeout: a driver
//! must report completion exactly once per started animation.

use std::fmt;

use tracing::{debug, info, warn};

/// The four states of the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Ordered out, waiting for the hotkey
    #[default]
    Hidden,
    /// Show animation running
    Showing,
    /// Fully shown
    Visible,
    /// Hide animation running
    Hiding,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Hidden => write!(f, "Hidden"),
            Visibility::Showing => write!(f, "Showing"),
            Visibility::Visible => write!(f, "Visible"),
            Visibility::Hiding => write!(f, "Hiding"),
        }
    }
}

/// Animation and presentation collaborators of the coordinator.
pub trait OverlayDriver {
    /// Starts the show animation. Completion must be reported with
    /// [`VisibilityCoordinator::on_show_complete`].
    fn animate_show(&mut self);

    /// Starts the hide animation. Completion must be reported with
    /// [`VisibilityCoordinator::on_hide_complete`].
    fn animate_hide(&mut self);

    /// The overlay finished showing.
    fn became_visible(&mut self) {}

    /// Called before the hide animation starts.
    fn about_to_hide(&mut self) {}

    /// The overlay finished hiding, before any pending toggle is drained.
    fn became_hidden(&mut self) {}
}

#[derive(Debug, Default)]
pub struct VisibilityCoordinator {
    state: Visibility,
    pending_toggle: bool,
}

impl VisibilityCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Visibility {
        self.state
    }

    pub fn pending_toggle(&self) -> bool {
        self.pending_toggle
    }

    /// Flips the overlay, or remembers the request if an animation is
    /// running.
    pub fn toggle(&mut self, driver: &mut impl OverlayDriver) {
        match self.state {
            Visibility::Hidden => {
                self.transition_to(Visibility::Showing);
                driver.animate_show();
            }
            Visibility::Visible => {
                driver.about_to_hide();
                self.transition_to(Visibility::Hiding);
                driver.animate_hide();
            }
            Visibility::Showing | Visibility::Hiding => {
                if !self.pending_toggle {
                    debug!(state = %self.state, "toggle deferred until animation completes");
                }
                self.pending_toggle = true;
            }
        }
    }

    /// The overlay's own close action. Unlike [`Self::toggle`] this never
    /// shows the overlay.
    pub fn close(&mut self, driver: &mut impl OverlayDriver) {
        match self.state {
            Visibility::Visible => self.toggle(driver),
            Visibility::Showing => self.pending_toggle = true,
            Visibility::Hiding => self.pending_toggle = false,
            Visibility::Hidden => {}
        }
    }

    pub fn on_show_complete(&mut self, driver: &mut impl OverlayDriver) {
        if self.state != Visibility::Showing {
            warn!(state = %self.state, "show completion outside of show animation, ignoring");
            return;
        }
        self.transition_to(Visibility::Visible);
        driver.became_visible();
        self.drain(driver);
    }

    pub fn on_hide_complete(&mut self, driver: &mut impl OverlayDriver) {
        if self.state != Visibility::Hiding {
            warn!(state = %self.state, "hide completion outside of hide animation, ignoring");
            return;
        }
        self.transition_to(Visibility::Hidden);
        driver.became_hidden();
        self.drain(driver);
    }

    fn drain(&mut self, driver: &mut impl OverlayDriver) {
        if std::mem::take(&mut self.pending_toggle) {
            debug!("draining deferred toggle");
            self.toggle(driver);
        }
    }

    fn transition_to(&mut self, new_state: Visibility) {
        info!(from = %self.state, to = %new_state, "visibility transition");
        self.state = new_state;
    }
}
