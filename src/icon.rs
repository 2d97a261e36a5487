//! Tray icons, drawn at startup instead of shipped as assets.

use anyhow::Context;
use image::{Rgba, RgbaImage};
use mdfloat_core::HotkeyBinding;

const SIZE: u32 = 32;
const COLOR_READY: (u8, u8, u8) = (235, 235, 235);
const COLOR_UNBOUND: (u8, u8, u8) = (255, 149, 0);

/// What the tray icon tells the user about the global shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayState {
    /// A shortcut is registered
    Ready,
    /// No shortcut is registered, the tray menu is the only way in
    Unbound,
}

impl TrayState {
    pub fn for_shortcut(shortcut: Option<HotkeyBinding>) -> Self {
        match shortcut {
            Some(_) => TrayState::Ready,
            None => TrayState::Unbound,
        }
    }

    pub fn icon(self) -> anyhow::Result<tray_icon::Icon> {
        let image = render(self.color());
        let (width, height) = image.dimensions();
        tray_icon::Icon::from_rgba(image.into_raw(), width, height)
            .context("Failed to build tray icon")
    }

    fn color(self) -> (u8, u8, u8) {
        match self {
            TrayState::Ready => COLOR_READY,
            TrayState::Unbound => COLOR_UNBOUND,
        }
    }
}

fn render((r, g, b): (u8, u8, u8)) -> RgbaImage {
    RgbaImage::from_fn(SIZE, SIZE, |x, y| {
        if covered(x, y) {
            Rgba([r, g, b, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

/// A panel outline with two lines of text in it.
fn covered(x: u32, y: u32) -> bool {
    let (left, top, right, bottom) = (3, 5, SIZE - 4, SIZE - 6);
    if x < left || x > right || y < top || y > bottom {
        return false;
    }

    let corner = (x == left || x == right) && (y == top || y == bottom);
    let border = x < left + 2 || x > right - 2 || y < top + 2 || y > bottom - 2;
    let first_line = (13..=14).contains(&y) && (8..=23).contains(&x);
    let second_line = (19..=20).contains(&y) && (8..=18).contains(&x);

    (border && !corner) || first_line || second_line
}
