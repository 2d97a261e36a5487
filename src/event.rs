//! Application events for the tao event loop.

use mdfloat_core::MessageTicket;

/// Events posted to the main thread from the hotkey hook and the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayEvent {
    /// The global shortcut was pressed
    HotkeyPressed,
    /// The show animation has run its course
    ShowFinished,
    /// The hide animation has run its course
    HideFinished,
    /// A transient shortcut message should give way to the shortcut label
    RevertLabel(MessageTicket),
}
