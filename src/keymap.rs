//! Translation between mdfloat's virtual key codes and the key types of
//! `global-hotkey` and `tao`.

use global_hotkey::hotkey::{Code, HotKey, Modifiers as HotKeyModifiers};
use mdfloat_core::{HotkeyBinding, Modifiers};
use tao::keyboard::{KeyCode, ModifiersState};

// Both crates name their physical keys after the W3C `code` values, so one
// identifier covers both columns.
macro_rules! key_table {
    ($($code:literal => $name:ident),* $(,)?) => {
        static KEYS: &[(u32, Code, KeyCode)] = &[$(($code, Code::$name, KeyCode::$name)),*];
    };
}

key_table! {
    0x00 => KeyA, 0x01 => KeyS, 0x02 => KeyD, 0x03 => KeyF, 0x04 => KeyH,
    0x05 => KeyG, 0x06 => KeyZ, 0x07 => KeyX, 0x08 => KeyC, 0x09 => KeyV,
    0x0B => KeyB, 0x0C => KeyQ, 0x0D => KeyW, 0x0E => KeyE, 0x0F => KeyR,
    0x10 => KeyY, 0x11 => KeyT, 0x12 => Digit1, 0x13 => Digit2, 0x14 => Digit3,
    0x15 => Digit4, 0x16 => Digit6, 0x17 => Digit5, 0x18 => Equal, 0x19 => Digit9,
    0x1A => Digit7, 0x1B => Minus, 0x1C => Digit8, 0x1D => Digit0,
    0x1E => BracketRight, 0x1F => KeyO, 0x20 => KeyU, 0x21 => BracketLeft,
    0x22 => KeyI, 0x23 => KeyP, 0x24 => Enter, 0x25 => KeyL, 0x26 => KeyJ,
    0x27 => Quote, 0x28 => KeyK, 0x29 => Semicolon, 0x2A => Backslash,
    0x2B => Comma, 0x2C => Slash, 0x2D => KeyN, 0x2E => KeyM, 0x2F => Period,
    0x30 => Tab, 0x31 => Space, 0x32 => Backquote, 0x33 => Backspace,
    0x35 => Escape,
    0x7A => F1, 0x78 => F2, 0x63 => F3, 0x76 => F4, 0x60 => F5, 0x61 => F6,
    0x62 => F7, 0x64 => F8, 0x65 => F9, 0x6D => F10, 0x67 => F11, 0x6F => F12,
    0x75 => Delete, 0x73 => Home, 0x77 => End, 0x74 => PageUp, 0x79 => PageDown,
    0x7E => ArrowUp, 0x7D => ArrowDown, 0x7B => ArrowLeft, 0x7C => ArrowRight,
}

/// The `global-hotkey` key for a virtual key code.
pub fn code_for(key_code: u32) -> Option<Code> {
    KEYS.iter()
        .find(|(code, _, _)| *code == key_code)
        .map(|(_, code, _)| *code)
}

/// The virtual key code for a key reported by the overlay window.
pub fn key_code_for(physical: KeyCode) -> Option<u32> {
    KEYS.iter()
        .find(|(_, _, key)| *key == physical)
        .map(|(code, _, _)| *code)
}

pub fn hotkey_modifiers(modifiers: Modifiers) -> HotKeyModifiers {
    let mut out = HotKeyModifiers::empty();
    if modifiers.contains(Modifiers::COMMAND) {
        out |= HotKeyModifiers::META;
    }
    if modifiers.contains(Modifiers::SHIFT) {
        out |= HotKeyModifiers::SHIFT;
    }
    if modifiers.contains(Modifiers::OPTION) {
        out |= HotKeyModifiers::ALT;
    }
    if modifiers.contains(Modifiers::CONTROL) {
        out |= HotKeyModifiers::CONTROL;
    }
    out
}

pub fn modifiers_from_state(state: ModifiersState) -> Modifiers {
    let mut out = Modifiers::NONE;
    if state.super_key() {
        out |= Modifiers::COMMAND;
    }
    if state.shift_key() {
        out |= Modifiers::SHIFT;
    }
    if state.alt_key() {
        out |= Modifiers::OPTION;
    }
    if state.control_key() {
        out |= Modifiers::CONTROL;
    }
    out
}

/// The OS registration for a binding, `None` when the key has no
/// `global-hotkey` equivalent.
pub fn hotkey_for(binding: &HotkeyBinding) -> Option<HotKey> {
    let code = code_for(binding.key_code)?;
    let modifiers = hotkey_modifiers(binding.modifiers);
    Some(HotKey::new(
        (!modifiers.is_empty()).then_some(modifiers),
        code,
    ))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use mdfloat_core::binding::keys;

    use super::*;

    #[test]
    fn test_table_has_no_duplicates() {
        let codes: HashSet<u32> = KEYS.iter().map(|(code, _, _)| *code).collect();
        assert_eq!(codes.len(), KEYS.len());
    }

    #[test]
    fn test_every_mapped_key_has_a_name() {
        for (code, _, _) in KEYS {
            assert_ne!(mdfloat_core::key_name(*code), "?", "key code {code:#04X}");
        }
    }

    #[test]
    fn test_default_binding_hotkey() {
        let hotkey = hotkey_for(&HotkeyBinding::DEFAULT).unwrap();
        assert_eq!(
            hotkey,
            HotKey::new(
                Some(HotKeyModifiers::META | HotKeyModifiers::SHIFT),
                Code::KeyM
            )
        );
    }

    #[test]
    fn test_unmapped_key_has_no_hotkey() {
        let binding = HotkeyBinding::new(0xFF, Modifiers::COMMAND);
        assert!(hotkey_for(&binding).is_none());
    }

    #[test]
    fn test_window_keys_map_back() {
        assert_eq!(key_code_for(KeyCode::Escape), Some(keys::ESCAPE));
        assert_eq!(key_code_for(KeyCode::KeyM), Some(keys::M));
        assert_eq!(key_code_for(KeyCode::Tab), Some(keys::TAB));
        assert_eq!(key_code_for(KeyCode::F13), None);
    }

    #[test]
    fn test_modifier_state_translation() {
        let state = ModifiersState::SUPER | ModifiersState::SHIFT;
        assert_eq!(
            modifiers_from_state(state),
            Modifiers::COMMAND | Modifiers::SHIFT
        );
        assert_eq!(
            modifiers_from_state(ModifiersState::empty()),
            Modifiers::NONE
        );
        assert_eq!(
            modifiers_from_state(ModifiersState::CONTROL | ModifiersState::ALT),
            Modifiers::CONTROL | Modifiers::OPTION
        );
    }
}
