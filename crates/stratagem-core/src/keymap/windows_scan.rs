//! Windows Virtual Key and scan code tables for the engine's output keys, and
//! keypad classification of captured key-downs.
//!
//! Games that read raw input usually look at scan codes rather than virtual
//! keys, so the synthesizer sends both.  Cursor keys live on the extended
//! half of the scan code table and must carry the extended flag, otherwise
//! Windows reports them as the numeric keypad 8/2/4/6.
//!
//! Reference: https://learn.microsoft.com/windows/win32/inputdev/about-keyboard-input#scan-codes

use super::OutputKey;

/// First Virtual Key on the numeric keypad (`VK_NUMPAD0`).
const VK_NUMPAD0: u32 = 0x60;
/// Last Virtual Key on the numeric keypad (`VK_DIVIDE`).
const VK_DIVIDE: u32 = 0x6F;

/// Scan code of Enter; numpad Enter is the extended variant.
const SC_ENTER: u16 = 28;
/// Scan code of `/`; numpad `/` is the extended variant.
const SC_SLASH: u16 = 53;
/// Range of keypad scan codes that double as navigation keys with NumLock off.
const SC_KEYPAD_BLOCK: std::ops::RangeInclusive<u16> = 71..=83;

/// Windows code pair for one output key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowsKeyCode {
    pub vk: u16,
    pub scan_code: u16,
    pub extended: bool,
}

/// Returns the Virtual Key, scan code, and extended flag for `key`.
pub fn windows_code(key: OutputKey) -> WindowsKeyCode {
    let (vk, scan_code, extended) = match key {
        OutputKey::ArrowUp => (0x26, 0x48, true),
        OutputKey::ArrowDown => (0x28, 0x50, true),
        OutputKey::ArrowLeft => (0x25, 0x4B, true),
        OutputKey::ArrowRight => (0x27, 0x4D, true),
        OutputKey::W => (0x57, 0x11, false),
        OutputKey::A => (0x41, 0x1E, false),
        OutputKey::S => (0x53, 0x1F, false),
        OutputKey::D => (0x44, 0x20, false),
        OutputKey::E => (0x45, 0x12, false),
        OutputKey::F => (0x46, 0x21, false),
    };
    WindowsKeyCode {
        vk,
        scan_code,
        extended,
    }
}

/// Decides whether a captured key-down came from the numeric keypad.
///
/// Numpad Enter and `/` share scan codes with the main block and differ only
/// by the extended flag.  With NumLock off the keypad reports navigation
/// Virtual Keys (`VK_HOME`, `VK_UP`, …) but keeps its non-extended scan codes,
/// whereas the dedicated navigation cluster is extended.
pub fn is_keypad_key(vk: u32, scan_code: u16, extended: bool) -> bool {
    if (VK_NUMPAD0..=VK_DIVIDE).contains(&vk) {
        return true;
    }
    if extended {
        return scan_code == SC_ENTER || scan_code == SC_SLASH;
    }
    SC_KEYPAD_BLOCK.contains(&scan_code)
}

/// Decides whether a captured keyboard event is handed to the key handler.
///
/// Only physical key-downs are.  Key-ups always pass through untouched, and
/// so does injected input, which includes the engine's own synthetic presses.
pub fn consult_handler(is_key_down: bool, injected: bool) -> bool {
    is_key_down && !injected
}
