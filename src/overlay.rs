//! The overlay window and the glue between the event loop and the core
//! state machines.
//!
//! Everything here runs on the main thread. The hotkey hook and the timers
//! only post [`OverlayEvent`]s, which are handled by [`Overlay::handle_event`].

use std::time::Duration;

use mdfloat_core::binding::keys;
use mdfloat_core::recording::MESSAGE_REVERT_DELAY;
use mdfloat_core::{
    APP_NAME_PRETTY, ConfigManager, HotkeyBinding, HotkeyRecorder, HotkeyRegistry, KeyPress,
    OverlayDriver, RecordingOutcome, Visibility, VisibilityCoordinator,
};
use tao::event::{ElementState, KeyEvent};
use tao::keyboard::ModifiersState;
use tao::window::Window;
use tracing::{debug, info};

use crate::backend::GlobalBackend;
use crate::event::OverlayEvent;
use crate::keymap;
use crate::schedule::Scheduler;

pub type Registry = HotkeyRegistry<GlobalBackend, ConfigManager>;

/// Animation lengths, from the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub show: Duration,
    pub hide: Duration,
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResponse {
    Continue,
    Quit,
}

pub struct Overlay {
    window: Window,
    scheduler: Scheduler,
    timings: Timings,
    coordinator: VisibilityCoordinator,
    recorder: HotkeyRecorder,
    registry: Registry,
    modifiers: ModifiersState,
}

impl Overlay {
    pub fn new(window: Window, scheduler: Scheduler, timings: Timings, registry: Registry) -> Self {
        let recorder = HotkeyRecorder::new(registry.label());
        window.set_title(&title(recorder.label()));
        Self {
            window,
            scheduler,
            timings,
            coordinator: VisibilityCoordinator::new(),
            recorder,
            registry,
            modifiers: ModifiersState::empty(),
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.coordinator.state()
    }

    /// The live global shortcut.
    pub fn shortcut(&self) -> Option<HotkeyBinding> {
        self.registry.active()
    }

    pub fn toggle(&mut self) {
        let (coordinator, mut stage) = self.split();
        coordinator.toggle(&mut stage);
    }

    pub fn close(&mut self) {
        let (coordinator, mut stage) = self.split();
        coordinator.close(&mut stage);
    }

    pub fn handle_event(&mut self, event: OverlayEvent) {
        match event {
            OverlayEvent::HotkeyPressed => self.toggle(),
            OverlayEvent::ShowFinished => {
                let (coordinator, mut stage) = self.split();
                coordinator.on_show_complete(&mut stage);
            }
            OverlayEvent::HideFinished => {
                let (coordinator, mut stage) = self.split();
                coordinator.on_hide_complete(&mut stage);
            }
            OverlayEvent::RevertLabel(ticket) => {
                if self.recorder.revert_message(ticket) {
                    self.refresh_title();
                }
            }
        }
    }

    /// Opens the overlay if needed and starts a recording session.
    pub fn start_recording(&mut self) {
        match self.coordinator.state() {
            Visibility::Hiding => {
                info!("overlay is hiding, not starting shortcut recording");
                return;
            }
            Visibility::Hidden => self.toggle(),
            Visibility::Showing | Visibility::Visible => {}
        }
        if self.recorder.start() {
            self.refresh_title();
        }
    }

    pub fn set_modifiers(&mut self, modifiers: ModifiersState) {
        self.modifiers = modifiers;
    }

    /// Routes a key from the overlay window. A recording session sees it
    /// first, everything it does not consume is a normal overlay key.
    pub fn handle_key(&mut self, event: &KeyEvent) -> KeyResponse {
        if event.state != ElementState::Pressed {
            return KeyResponse::Continue;
        }
        let Some(key_code) = keymap::key_code_for(event.physical_key) else {
            debug!(key = ?event.physical_key, "key without a virtual key code");
            return KeyResponse::Continue;
        };
        let key = KeyPress::new(key_code, keymap::modifiers_from_state(self.modifiers));

        match self.recorder.handle(key, &mut self.registry) {
            RecordingOutcome::Forwarded => {}
            RecordingOutcome::Cancelled | RecordingOutcome::Bound(_) => {
                self.refresh_title();
                return KeyResponse::Continue;
            }
            RecordingOutcome::Rejected { ticket, .. } => {
                self.refresh_title();
                self.scheduler
                    .after(MESSAGE_REVERT_DELAY, OverlayEvent::RevertLabel(ticket));
                return KeyResponse::Continue;
            }
        }

        if key.is_quit() {
            return KeyResponse::Quit;
        }
        if key.key_code == keys::ESCAPE {
            self.close();
        }
        KeyResponse::Continue
    }

    /// Ends any recording session and releases the global shortcut.
    pub fn shutdown(&mut self) {
        self.recorder.cancel_if_active(&self.registry);
        self.registry.shutdown();
    }

    fn refresh_title(&self) {
        self.window.set_title(&title(self.recorder.label()));
    }

    fn split(&mut self) -> (&mut VisibilityCoordinator, Stage<'_>) {
        (
            &mut self.coordinator,
            Stage {
                window: &self.window,
                scheduler: &self.scheduler,
                timings: self.timings,
                recorder: &mut self.recorder,
                registry: &self.registry,
            },
        )
    }
}

fn title(label: &str) -> String {
    format!("{APP_NAME_PRETTY} · {label}")
}

/// The window side of a visibility transition. Animations are timed on the
/// scheduler; their completion comes back as an [`OverlayEvent`].
struct Stage<'a> {
    window: &'a Window,
    scheduler: &'a Scheduler,
    timings: Timings,
    recorder: &'a mut HotkeyRecorder,
    registry: &'a Registry,
}

impl OverlayDriver for Stage<'_> {
    fn animate_show(&mut self) {
        self.window.set_visible(true);
        self.window.set_focus();
        self.scheduler
            .after(self.timings.show, OverlayEvent::ShowFinished);
    }

    fn animate_hide(&mut self) {
        self.scheduler
            .after(self.timings.hide, OverlayEvent::HideFinished);
    }

    fn became_visible(&mut self) {
        self.window.set_focus();
    }

    fn about_to_hide(&mut self) {
        // a session must not outlive the overlay
        if self.recorder.cancel_if_active(self.registry) {
            self.window.set_title(&title(self.recorder.label()));
        }
    }

    fn became_hidden(&mut self) {
        self.window.set_visible(false);
    }
}
