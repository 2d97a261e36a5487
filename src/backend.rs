//! OS hotkey registration through `global-hotkey`.

use anyhow::{Context, anyhow};
use global_hotkey::hotkey::HotKey;
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use mdfloat_core::{HotkeyBackend, HotkeyBinding, PressHandler};
use tracing::{debug, warn};

use crate::keymap;

/// Registers bindings with the OS. Must live on the main thread.
#[derive(Default)]
pub struct GlobalBackend {
    manager: Option<GlobalHotKeyManager>,
}

impl GlobalBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn manager(&self) -> anyhow::Result<&GlobalHotKeyManager> {
        self.manager
            .as_ref()
            .ok_or_else(|| anyhow!("hotkey event hook is not installed"))
    }
}

impl HotkeyBackend for GlobalBackend {
    type Handle = HotKey;

    fn install_hook(&mut self, on_press: PressHandler) -> anyhow::Result<()> {
        let manager = GlobalHotKeyManager::new().context("Failed to create hotkey manager")?;

        // Only one shortcut is ever registered, so the id is not checked.
        GlobalHotKeyEvent::set_event_handler(Some(move |event: GlobalHotKeyEvent| {
            if event.state() == HotKeyState::Pressed {
                on_press();
            }
        }));

        self.manager = Some(manager);
        debug!("hotkey event hook installed");
        Ok(())
    }

    fn remove_hook(&mut self) {
        GlobalHotKeyEvent::set_event_handler(None::<fn(GlobalHotKeyEvent)>);
        self.manager.take();
        debug!("hotkey event hook removed");
    }

    fn register(&mut self, binding: HotkeyBinding) -> anyhow::Result<HotKey> {
        let hotkey = keymap::hotkey_for(&binding)
            .with_context(|| format!("{binding} has no OS key equivalent"))?;

        self.manager()?
            .register(hotkey)
            .with_context(|| format!("Failed to register {binding}"))?;
        Ok(hotkey)
    }

    fn unregister(&mut self, handle: HotKey) {
        let result = match self.manager() {
            Ok(manager) => manager.unregister(handle).map_err(anyhow::Error::from),
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            warn!(hotkey = handle.id(), "Failed to unregister hotkey: {e:#}");
        }
    }
}
