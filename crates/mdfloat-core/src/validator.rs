//! Policy for which shortcuts may become the global hotkey.

use thiserror::Error;

use crate::binding::{HotkeyBinding, Modifiers, keys};

/// Keys that the desktop owns when pressed with ⌘ alone.
pub const RESERVED_KEYS: [u32; 4] = [keys::Q, keys::W, keys::H, keys::TAB];

/// Why a candidate binding was refused. The display text is what the
/// recorder shows inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Requires ⌘ or ⌃")]
    MissingModifier,

    #[error("Reserved by system")]
    Reserved,
}

/// Whether the mask carries ⌘ or ⌃. Shift and option alone collide with
/// ordinary typing.
pub fn has_required_modifier(modifiers: Modifiers) -> bool {
    modifiers.intersects(Modifiers::COMMAND | Modifiers::CONTROL)
}

/// Checks a candidate against the policy and reports the first violation.
pub fn check(binding: &HotkeyBinding) -> Result<(), Rejection> {
    if !has_required_modifier(binding.modifiers) {
        return Err(Rejection::MissingModifier);
    }
    if binding.modifiers == Modifiers::COMMAND && RESERVED_KEYS.contains(&binding.key_code) {
        return Err(Rejection::Reserved);
    }
    Ok(())
}

pub fn is_acceptable(binding: &HotkeyBinding) -> bool {
    check(binding).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn every_mask() -> impl Iterator<Item = Modifiers> {
        let parts = [
            Modifiers::COMMAND,
            Modifiers::SHIFT,
            Modifiers::OPTION,
            Modifiers::CONTROL,
        ];
        (0u8..16).map(move |n| {
            parts
                .iter()
                .enumerate()
                .filter(|(i, _)| n & (1 << i) != 0)
                .fold(Modifiers::NONE, |acc, (_, m)| acc | *m)
        })
    }

    #[test]
    fn test_rejects_masks_without_command_or_control() {
        for modifiers in every_mask().filter(|m| !has_required_modifier(*m)) {
            for key_code in 0..0x80 {
                let binding = HotkeyBinding::new(key_code, modifiers);
                assert!(!is_acceptable(&binding), "{binding:?} should be rejected");
                assert_eq!(check(&binding), Err(Rejection::MissingModifier));
            }
        }
    }

    #[test]
    fn test_required_modifier() {
        assert!(has_required_modifier(Modifiers::COMMAND));
        assert!(has_required_modifier(Modifiers::CONTROL));
        assert!(has_required_modifier(
            Modifiers::CONTROL | Modifiers::OPTION
        ));
        assert!(!has_required_modifier(Modifiers::NONE));
        assert!(!has_required_modifier(Modifiers::SHIFT));
        assert!(!has_required_modifier(Modifiers::SHIFT | Modifiers::OPTION));
    }

    #[test]
    fn test_reserved_combos_rejected_for_command_only() {
        for key_code in RESERVED_KEYS {
            let binding = HotkeyBinding::new(key_code, Modifiers::COMMAND);
            assert_eq!(check(&binding), Err(Rejection::Reserved));
        }
    }

    #[test]
    fn test_reserved_keys_accepted_with_shift() {
        for key_code in RESERVED_KEYS {
            let binding = HotkeyBinding::new(key_code, Modifiers::COMMAND | Modifiers::SHIFT);
            assert!(is_acceptable(&binding));
        }
    }

    #[test]
    fn test_reserved_keys_accepted_with_control() {
        for key_code in RESERVED_KEYS {
            let binding = HotkeyBinding::new(key_code, Modifiers::CONTROL);
            assert!(is_acceptable(&binding));
        }
    }

    #[test]
    fn test_default_binding_is_acceptable() {
        assert!(is_acceptable(&HotkeyBinding::DEFAULT));
    }

    #[test]
    fn test_rejection_messages() {
        assert_eq!(Rejection::MissingModifier.to_string(), "Requires ⌘ or ⌃");
        assert_eq!(Rejection::Reserved.to_string(), "Reserved by system");
    }
}
