//! Windows key synthesis via the SendInput API.
//!
//! Each output key is sent with both its Virtual Key and its scan code
//! (`KEYEVENTF_SCANCODE`) so that games reading raw scan codes see the same
//! key as applications reading Virtual Keys.

#![cfg(target_os = "windows")]

use stratagem_core::keymap::windows_scan::windows_code;
use stratagem_core::OutputKey;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYEVENTF_EXTENDEDKEY,
    KEYEVENTF_KEYUP, KEYEVENTF_SCANCODE, VIRTUAL_KEY,
};

use crate::application::play_macro::{KeySynthesizer, SynthesisError};

/// Windows implementation of [`KeySynthesizer`] using SendInput.
#[derive(Debug, Default)]
pub struct WindowsKeySynthesizer;

impl WindowsKeySynthesizer {
    pub fn new() -> Self {
        Self
    }
}

impl KeySynthesizer for WindowsKeySynthesizer {
    fn key_down(&self, key: OutputKey) -> Result<(), SynthesisError> {
        send_key(key, false)
    }

    fn key_up(&self, key: OutputKey) -> Result<(), SynthesisError> {
        send_key(key, true)
    }
}

fn send_key(key: OutputKey, key_up: bool) -> Result<(), SynthesisError> {
    let code = windows_code(key);

    let mut flags = KEYEVENTF_SCANCODE;
    if key_up {
        flags |= KEYEVENTF_KEYUP;
    }
    if code.extended {
        flags |= KEYEVENTF_EXTENDEDKEY;
    }

    let input = INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: VIRTUAL_KEY(code.vk),
                wScan: code.scan_code,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    };
    // SAFETY: input is a valid KEYBDINPUT structure on the stack
    let inserted = unsafe { SendInput(&[input], std::mem::size_of::<INPUT>() as i32) };
    if inserted == 1 {
        Ok(())
    } else {
        // Blocked by UIPI or another process holding the input desktop.
        Err(SynthesisError::Platform(format!(
            "SendInput inserted {inserted} of 1 events for {key}"
        )))
    }
}
