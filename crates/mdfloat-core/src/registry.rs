//! Ownership of the single process-wide global hotkey.
//!
//! The registry is the only component that talks to the OS hotkey API. It
//! holds at most one live registration, installs the key-event hook once,
//! and releases both on shutdown or drop. Callers only ever see bindings and
//! success or failure, never the OS handle.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::binding::HotkeyBinding;
use crate::error::{HotkeyError, Result};
use crate::validator;

/// Callback fired by the OS hook when the registered shortcut is pressed.
/// It may run on any thread.
pub type PressHandler = Arc<dyn Fn() + Send + Sync + 'static>;

/// The OS global-hotkey API.
pub trait HotkeyBackend {
    /// One live OS registration.
    type Handle;

    /// Installs the process-wide key-event hook that calls `on_press`.
    fn install_hook(&mut self, on_press: PressHandler) -> anyhow::Result<()>;

    /// Removes the hook installed by [`HotkeyBackend::install_hook`].
    fn remove_hook(&mut self);

    fn register(&mut self, binding: HotkeyBinding) -> anyhow::Result<Self::Handle>;

    fn unregister(&mut self, handle: Self::Handle);
}

/// Durable storage for the last successfully registered binding.
pub trait BindingStore {
    fn load_binding(&self) -> anyhow::Result<Option<HotkeyBinding>>;

    fn save_binding(&mut self, binding: HotkeyBinding) -> anyhow::Result<()>;
}

/// The part of the registry a recording session is allowed to use.
pub trait Rebind {
    /// Swaps the global shortcut for `candidate`, keeping the previous one
    /// if the OS refuses.
    fn reregister(&mut self, candidate: HotkeyBinding) -> Result<()>;

    /// Display form of the live shortcut.
    fn label(&self) -> String;
}

/// Label shown when no shortcut could be registered.
pub const UNBOUND_LABEL: &str = "Not set";

struct Registration<H> {
    binding: HotkeyBinding,
    handle: H,
}

pub struct HotkeyRegistry<B: HotkeyBackend, S: BindingStore> {
    backend: B,
    store: S,
    on_press: PressHandler,
    hook_installed: bool,
    active: Option<Registration<B::Handle>>,
}

impl<B: HotkeyBackend, S: BindingStore> HotkeyRegistry<B, S> {
    pub fn new<F>(backend: B, store: S, on_press: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            backend,
            store,
            on_press: Arc::new(on_press),
            hook_installed: false,
            active: None,
        }
    }

    /// Registers the persisted binding, or [`HotkeyBinding::DEFAULT`] when
    /// nothing usable is stored. See [`Self::register_initial`].
    pub fn register_stored(&mut self) -> Result<HotkeyBinding> {
        let requested = match self.store.load_binding() {
            Ok(stored) => stored.unwrap_or_default(),
            Err(e) => {
                warn!("failed to read persisted shortcut, using default: {e:#}");
                HotkeyBinding::DEFAULT
            }
        };
        self.register_initial(requested)
    }

    /// Installs the hook and registers `binding`, falling back to
    /// [`HotkeyBinding::DEFAULT`] when `binding` is unusable. Returns the
    /// binding that is now live.
    pub fn register_initial(&mut self, binding: HotkeyBinding) -> Result<HotkeyBinding> {
        if let Err(e) = self.ensure_hook() {
            return Err(HotkeyError::StartupRegistrationFailed {
                requested: binding,
                reason: format!("{e:#}"),
            });
        }
        self.release();

        let reason = match validator::check(&binding) {
            Ok(()) => match self.try_register(binding) {
                Ok(()) => {
                    info!(binding = %binding, "global shortcut registered");
                    return Ok(binding);
                }
                Err(e) => format!("{e:#}"),
            },
            Err(rejection) => rejection.to_string(),
        };

        if binding == HotkeyBinding::DEFAULT {
            return Err(HotkeyError::StartupRegistrationFailed {
                requested: binding,
                reason,
            });
        }

        warn!(
            binding = %binding,
            reason = %reason,
            fallback = %HotkeyBinding::DEFAULT,
            "configured shortcut unusable, falling back to default"
        );
        match self.try_register(HotkeyBinding::DEFAULT) {
            Ok(()) => {
                info!(binding = %HotkeyBinding::DEFAULT, "global shortcut registered");
                Ok(HotkeyBinding::DEFAULT)
            }
            Err(e) => Err(HotkeyError::StartupRegistrationFailed {
                requested: binding,
                reason: format!("{e:#}"),
            }),
        }
    }

    /// See [`Rebind::reregister`]. The candidate is persisted only once the
    /// OS has accepted it.
    pub fn reregister(&mut self, candidate: HotkeyBinding) -> Result<()> {
        validator::check(&candidate)?;

        let previous = self.release();
        match self.try_register(candidate) {
            Ok(()) => {
                let from = previous.map_or_else(|| UNBOUND_LABEL.to_string(), |b| b.to_string());
                info!(from = %from, to = %candidate, "global shortcut changed");
                if let Err(e) = self.store.save_binding(candidate) {
                    warn!(binding = %candidate, "failed to persist shortcut: {e:#}");
                }
                Ok(())
            }
            Err(e) => {
                let reason = format!("{e:#}");
                warn!(binding = %candidate, reason = %reason, "shortcut unavailable");
                if let Some(previous) = previous {
                    match self.try_register(previous) {
                        Ok(()) => debug!(binding = %previous, "previous shortcut restored"),
                        Err(e) => error!(binding = %previous, "failed to restore shortcut: {e:#}"),
                    }
                }
                Err(HotkeyError::RegistrationFailed {
                    binding: candidate,
                    reason,
                })
            }
        }
    }

    /// The live binding, if any.
    pub fn active(&self) -> Option<HotkeyBinding> {
        self.active.as_ref().map(|r| r.binding)
    }

    /// Display form of the live binding, or [`UNBOUND_LABEL`].
    pub fn label(&self) -> String {
        self.active()
            .map(|b| b.to_string())
            .unwrap_or_else(|| UNBOUND_LABEL.to_string())
    }

    /// Unregisters the shortcut and removes the hook. Safe to call twice.
    pub fn shutdown(&mut self) {
        if let Some(binding) = self.release() {
            info!(binding = %binding, "global shortcut unregistered");
        }
        if self.hook_installed {
            self.backend.remove_hook();
            self.hook_installed = false;
            debug!("hotkey hook removed");
        }
    }

    fn ensure_hook(&mut self) -> anyhow::Result<()> {
        if !self.hook_installed {
            self.backend.install_hook(Arc::clone(&self.on_press))?;
            self.hook_installed = true;
            debug!("hotkey hook installed");
        }
        Ok(())
    }

    fn try_register(&mut self, binding: HotkeyBinding) -> anyhow::Result<()> {
        debug_assert!(
            self.active.is_none(),
            "a live registration must be released first"
        );
        let handle = self.backend.register(binding)?;
        self.active = Some(Registration { binding, handle });
        Ok(())
    }

    fn release(&mut self) -> Option<HotkeyBinding> {
        let Registration { binding, handle } = self.active.take()?;
        self.backend.unregister(handle);
        Some(binding)
    }

    #[cfg(test)]
    fn backend(&self) -> &B {
        &self.backend
    }

    #[cfg(test)]
    fn store(&self) -> &S {
        &self.store
    }
}

impl<B: HotkeyBackend, S: BindingStore> Rebind for HotkeyRegistry<B, S> {
    fn reregister(&mut self, candidate: HotkeyBinding) -> Result<()> {
        HotkeyRegistry::reregister(self, candidate)
    }

    fn label(&self) -> String {
        HotkeyRegistry::label(self)
    }
}

impl<B: HotkeyBackend, S: BindingStore> Drop for HotkeyRegistry<B, S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
