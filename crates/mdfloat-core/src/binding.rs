//! Hotkey bindings and their display form.
//!
//! Key codes are macOS virtual key codes and the modifier mask uses the
//! Carbon bit values, so a binding written to the config file by one version
//! of the app reads back identically in the next.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Virtual key codes referenced directly by the app.
pub mod keys {
    pub const H: u32 = 0x04;
    pub const Q: u32 = 0x0C;
    pub const W: u32 = 0x0D;
    pub const M: u32 = 0x2E;
    pub const TAB: u32 = 0x30;
    pub const ESCAPE: u32 = 0x35;
}

/// Bitset over the four modifier keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(u32);

impl Modifiers {
    pub const NONE: Self = Self(0);
    pub const COMMAND: Self = Self(0x0100);
    pub const SHIFT: Self = Self(0x0200);
    pub const OPTION: Self = Self(0x0800);
    pub const CONTROL: Self = Self(0x1000);

    const ALL: u32 = Self::COMMAND.0 | Self::SHIFT.0 | Self::OPTION.0 | Self::CONTROL.0;

    /// Builds a mask from raw bits, dropping anything that is not one of the
    /// four modifiers (caps lock, the fn key, ...).
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Self(bits & Self::ALL)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when every bit of `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when any bit of `other` is set.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for Modifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Modifiers {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// A global shortcut: one key plus a set of modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HotkeyBinding {
    pub key_code: u32,
    pub modifiers: Modifiers,
}

impl HotkeyBinding {
    /// ⇧⌘M, used when nothing is persisted or the persisted binding is unusable.
    pub const DEFAULT: Self = Self::new(
        keys::M,
        Modifiers(Modifiers::COMMAND.0 | Modifiers::SHIFT.0),
    );

    pub const fn new(key_code: u32, modifiers: Modifiers) -> Self {
        Self {
            key_code,
            modifiers,
        }
    }

    /// Rebuilds a binding from the two integers kept in the config file.
    pub const fn from_raw(key_code: u32, modifier_bits: u32) -> Self {
        Self::new(key_code, Modifiers::from_bits_truncate(modifier_bits))
    }
}

impl Default for HotkeyBinding {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for HotkeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&display_string(self))
    }
}

/// Renders a binding the way macOS menus do: ⌃⌥⇧⌘ in that order, then the key.
pub fn display_string(binding: &HotkeyBinding) -> String {
    const ORDER: [(Modifiers, &str); 4] = [
        (Modifiers::CONTROL, "⌃"),
        (Modifiers::OPTION, "⌥"),
        (Modifiers::SHIFT, "⇧"),
        (Modifiers::COMMAND, "⌘"),
    ];

    let mut out = String::new();
    for (modifier, symbol) in ORDER {
        if binding.modifiers.contains(modifier) {
            out.push_str(symbol);
        }
    }
    out.push_str(key_name(binding.key_code));
    out
}

/// Human readable name for a virtual key code, `?` when unknown.
pub fn key_name(key_code: u32) -> &'static str {
    KEY_NAMES
        .iter()
        .find(|(code, _)| *code == key_code)
        .map(|(_, name)| *name)
        .unwrap_or("?")
}

static KEY_NAMES: &[(u32, &str)] = &[
    (0x00, "A"),
    (0x01, "S"),
    (0x02, "D"),
    (0x03, "F"),
    (0x04, "H"),
    (0x05, "G"),
    (0x06, "Z"),
    (0x07, "X"),
    (0x08, "C"),
    (0x09, "V"),
    (0x0B, "B"),
    (0x0C, "Q"),
    (0x0D, "W"),
    (0x0E, "E"),
    (0x0F, "R"),
    (0x10, "Y"),
    (0x11, "T"),
    (0x12, "1"),
    (0x13, "2"),
    (0x14, "3"),
    (0x15, "4"),
    (0x16, "6"),
    (0x17, "5"),
    (0x18, "="),
    (0x19, "9"),
    (0x1A, "7"),
    (0x1B, "-"),
    (0x1C, "8"),
    (0x1D, "0"),
    (0x1E, "]"),
    (0x1F, "O"),
    (0x20, "U"),
    (0x21, "["),
    (0x22, "I"),
    (0x23, "P"),
    (0x24, "↩"),
    (0x25, "L"),
    (0x26, "J"),
    (0x27, "'"),
    (0x28, "K"),
    (0x29, ";"),
    (0x2A, "\\"),
    (0x2B, ","),
    (0x2C, "/"),
    (0x2D, "N"),
    (0x2E, "M"),
    (0x2F, "."),
    (0x30, "⇥"),
    (0x31, "Space"),
    (0x32, "`"),
    (0x33, "⌫"),
    (0x35, "⎋"),
    (0x60, "F5"),
    (0x61, "F6"),
    (0x62, "F7"),
    (0x63, "F3"),
    (0x64, "F8"),
    (0x65, "F9"),
    (0x67, "F11"),
    (0x6D, "F10"),
    (0x6F, "F12"),
    (0x73, "↖"),
    (0x74, "⇞"),
    (0x75, "⌦"),
    (0x76, "F4"),
    (0x77, "↘"),
    (0x78, "F2"),
    (0x79, "⇟"),
    (0x7A, "F1"),
    (0x7B, "←"),
    (0x7C, "→"),
    (0x7D, "↓"),
    (0x7E, "↑"),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn render(key_code: u32, modifiers: Modifiers) -> String {
        display_string(&HotkeyBinding::new(key_code, modifiers))
    }

    #[test]
    fn test_key_name_letters() {
        let expected = [
            (0x00, "A"),
            (0x0C, "Q"),
            (0x0D, "W"),
            (0x04, "H"),
            (0x2D, "N"),
            (0x2E, "M"),
            (0x1F, "O"),
        ];
        for (code, name) in expected {
            assert_eq!(key_name(code), name, "key code {code:#04X}");
        }
    }

    #[test]
    fn test_key_name_digits_follow_layout_not_order() {
        assert_eq!(key_name(0x17), "5");
        assert_eq!(key_name(0x16), "6");
        assert_eq!(key_name(0x1A), "7");
        assert_eq!(key_name(0x1D), "0");
    }

    #[test]
    fn test_key_name_special_keys() {
        assert_eq!(key_name(keys::TAB), "⇥");
        assert_eq!(key_name(0x31), "Space");
        assert_eq!(key_name(0x33), "⌫");
        assert_eq!(key_name(0x24), "↩");
        assert_eq!(key_name(keys::ESCAPE), "⎋");
        assert_eq!(key_name(0x75), "⌦");
        assert_eq!(key_name(0x7E), "↑");
        assert_eq!(key_name(0x7B), "←");
    }

    #[test]
    fn test_key_name_function_keys() {
        let expected = [
            (0x7A, "F1"),
            (0x78, "F2"),
            (0x63, "F3"),
            (0x76, "F4"),
            (0x60, "F5"),
            (0x6D, "F10"),
            (0x67, "F11"),
            (0x6F, "F12"),
        ];
        for (code, name) in expected {
            assert_eq!(key_name(code), name, "key code {code:#04X}");
        }
    }

    #[test]
    fn test_key_name_unknown() {
        // 0x0A and 0x34 are gaps in the table
        assert_eq!(key_name(0x0A), "?");
        assert_eq!(key_name(0x34), "?");
        assert_eq!(key_name(0xFF), "?");
        assert_eq!(key_name(u32::MAX), "?");
    }

    #[test]
    fn test_default_binding_display() {
        assert_eq!(HotkeyBinding::DEFAULT.to_string(), "⇧⌘M");
        assert_eq!(HotkeyBinding::default(), HotkeyBinding::DEFAULT);
    }

    #[test]
    fn test_display_modifier_order_is_fixed() {
        let all = Modifiers::COMMAND | Modifiers::CONTROL | Modifiers::SHIFT | Modifiers::OPTION;
        assert_eq!(render(0x7A, all), "⌃⌥⇧⌘F1");
        assert_eq!(render(0x00, Modifiers::CONTROL | Modifiers::OPTION), "⌃⌥A");
        assert_eq!(render(0x7E, Modifiers::CONTROL | Modifiers::COMMAND), "⌃⌘↑");
        assert_eq!(render(0x12, Modifiers::OPTION | Modifiers::SHIFT), "⌥⇧1");
    }

    #[test]
    fn test_display_unknown_key() {
        assert_eq!(render(0xFF, Modifiers::COMMAND), "⌘?");
    }

    #[test]
    fn test_display_without_modifiers() {
        assert_eq!(render(0x31, Modifiers::NONE), "Space");
        assert_eq!(render(keys::ESCAPE, Modifiers::SHIFT), "⇧⎋");
    }

    #[test]
    fn test_from_raw_truncates_foreign_bits() {
        // 0x0400 is alphaLock, 0x0001 is not a modifier at all
        let binding = HotkeyBinding::from_raw(keys::M, 0x0100 | 0x0200 | 0x0400 | 0x0001);
        assert_eq!(binding, HotkeyBinding::DEFAULT);
        assert_eq!(binding.modifiers.bits(), 0x0300);
    }

    #[test]
    fn test_modifier_set_operations() {
        let mut mods = Modifiers::COMMAND;
        mods |= Modifiers::SHIFT;
        assert!(mods.contains(Modifiers::COMMAND));
        assert!(mods.contains(Modifiers::COMMAND | Modifiers::SHIFT));
        assert!(!mods.contains(Modifiers::COMMAND | Modifiers::CONTROL));
        assert!(mods.intersects(Modifiers::COMMAND | Modifiers::CONTROL));
        assert!(!mods.intersects(Modifiers::OPTION));
        assert!(Modifiers::NONE.is_empty());
    }
}
