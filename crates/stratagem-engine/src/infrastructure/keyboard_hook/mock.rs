//! Mock keyboard hook for unit and integration testing.
//!
//! Allows tests to inject key-downs without a Windows message loop or OS
//! hooks, and to observe how many times the hook was installed and removed.
//! Like the real backend, it refuses a second concurrent install.

use std::sync::{Arc, Mutex};

use stratagem_core::PhysicalKeyId;

use super::{HookError, HookHandle, HookVerdict, KeyDownEvent, KeyEventHandler, KeyboardHook};

#[derive(Default)]
struct MockHookState {
    handler: Option<Arc<dyn KeyEventHandler>>,
    installs: u32,
    releases: u32,
    fail_next_install: bool,
}

/// A mock implementation of [`KeyboardHook`] that allows tests to inject key-downs.
#[derive(Clone, Default)]
pub struct MockKeyboardHook {
    state: Arc<Mutex<MockHookState>>,
}

impl MockKeyboardHook {
    /// Creates a new mock hook with nothing installed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers a key-down as the OS would.
    ///
    /// Returns `None` when no hook is installed, meaning the key was never
    /// intercepted at all.
    pub fn inject_key_down(&self, event: KeyDownEvent) -> Option<HookVerdict> {
        // Clone the handler out so it runs without holding the lock, as the
        // real hook thread would.
        let handler = self.state.lock().expect("lock poisoned").handler.clone();
        handler.map(|h| h.on_key_down(&event))
    }

    /// Shorthand for a numeric keypad key-down.
    pub fn press_keypad(&self, scan_code: u16) -> Option<HookVerdict> {
        self.inject_key_down(KeyDownEvent {
            key: PhysicalKeyId(scan_code),
            vk_code: 0,
            is_extended: scan_code == 28 || scan_code == 53,
            is_keypad: true,
        })
    }

    /// Shorthand for a key-down outside the numeric keypad.
    pub fn press_main_block(&self, scan_code: u16) -> Option<HookVerdict> {
        self.inject_key_down(KeyDownEvent {
            key: PhysicalKeyId(scan_code),
            vk_code: 0,
            is_extended: false,
            is_keypad: false,
        })
    }

    /// Makes the next `install` call fail, as a platform refusal would.
    pub fn fail_next_install(&self) {
        self.state.lock().expect("lock poisoned").fail_next_install = true;
    }

    /// Total successful installs so far.
    pub fn install_count(&self) -> u32 {
        self.state.lock().expect("lock poisoned").installs
    }

    /// Total releases so far.
    pub fn release_count(&self) -> u32 {
        self.state.lock().expect("lock poisoned").releases
    }

    /// Whether a hook is currently installed.
    pub fn is_installed(&self) -> bool {
        self.state.lock().expect("lock poisoned").handler.is_some()
    }
}

impl KeyboardHook for MockKeyboardHook {
    fn install(&self, handler: Arc<dyn KeyEventHandler>) -> Result<HookHandle, HookError> {
        let mut state = self.state.lock().expect("lock poisoned");
        if std::mem::take(&mut state.fail_next_install) {
            return Err(HookError::InstallFailed("mock failure".into()));
        }
        if state.handler.is_some() {
            return Err(HookError::AlreadyInstalled);
        }
        state.handler = Some(handler);
        state.installs += 1;

        let shared = Arc::clone(&self.state);
        Ok(HookHandle::new(move || {
            let mut state = shared.lock().expect("lock poisoned");
            state.handler = None;
            state.releases += 1;
        }))
    }
}
