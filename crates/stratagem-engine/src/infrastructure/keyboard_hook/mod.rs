//! Global keyboard hook infrastructure.
//!
//! On Windows, this installs a low-level keyboard hook (WH_KEYBOARD_LL) on a
//! dedicated Win32 message loop thread.  Every physical key-down is handed to
//! a [`KeyEventHandler`] *synchronously*, because the suppression decision
//! has to be returned from the hook callback itself.
//!
//! # Windows-Specific Implementation
//!
//! The hook callback must complete within ~300ms or Windows silently removes
//! the hook.  Handlers therefore only do lookups and hand any slow work to
//! another thread; they never sleep.
//!
//! Key-up events and software-injected events (including the engine's own
//! synthetic output) are passed on without consulting the handler.
//!
//! # Ownership
//!
//! An installed hook is represented by a [`HookHandle`].  Dropping or
//! releasing the handle removes the hook, so the hook can never outlive its
//! owner, including on unwinding.
//!
//! # Testability
//!
//! The [`KeyboardHook`] trait allows tests to drive the engine with
//! [`mock::MockKeyboardHook`] instead of OS hooks.

use std::fmt;
use std::sync::Arc;

use stratagem_core::PhysicalKeyId;

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

/// A physical key-down delivered by the hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDownEvent {
    /// Hardware scan code.
    pub key: PhysicalKeyId,
    /// Windows Virtual Key code (0 on platforms without one).
    pub vk_code: u32,
    /// `true` for extended keys (e.g., numpad Enter, the cursor cluster).
    pub is_extended: bool,
    /// `true` if the key sits on the numeric keypad.
    pub is_keypad: bool,
}

/// What the hook should do with the original key-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookVerdict {
    /// Deliver the key to the next hook and the focused application.
    PassThrough,
    /// Swallow the key.
    Suppress,
}

/// Receives key-downs on the hook thread.
pub trait KeyEventHandler: Send + Sync {
    /// Decides the fate of one key-down.  Must return quickly.
    fn on_key_down(&self, event: &KeyDownEvent) -> HookVerdict;
}

/// Error type for hook installation.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("failed to install keyboard hook: {0}")]
    InstallFailed(String),
    #[error("a keyboard hook is already installed in this process")]
    AlreadyInstalled,
    #[error("platform not supported: {0}")]
    UnsupportedPlatform(String),
}

/// Exclusive ownership of one installed hook.
///
/// The release action runs exactly once: on [`HookHandle::release`] or on drop.
pub struct HookHandle {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl HookHandle {
    /// Wraps the action that removes the hook.
    pub fn new<F>(release: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Removes the hook now.  On return the handler is no longer called.
    pub fn release(mut self) {
        self.run_release();
    }

    fn run_release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for HookHandle {
    fn drop(&mut self) {
        self.run_release();
    }
}

impl fmt::Debug for HookHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookHandle")
            .field("installed", &self.release.is_some())
            .finish()
    }
}

/// Trait abstracting the OS keyboard hook.
///
/// The production implementation uses Windows hooks; tests use [`mock::MockKeyboardHook`].
pub trait KeyboardHook: Send + Sync {
    /// Installs the hook and routes key-downs to `handler` until the returned
    /// handle is released.
    fn install(&self, handler: Arc<dyn KeyEventHandler>) -> Result<HookHandle, HookError>;
}

/// Placeholder used where no global hook backend exists.
#[derive(Debug, Default)]
pub struct UnsupportedHook;

impl KeyboardHook for UnsupportedHook {
    fn install(&self, _handler: Arc<dyn KeyEventHandler>) -> Result<HookHandle, HookError> {
        Err(HookError::UnsupportedPlatform(
            std::env::consts::OS.to_string(),
        ))
    }
}

/// Returns the hook backend for the current platform.
pub fn platform_hook() -> Arc<dyn KeyboardHook> {
    #[cfg(target_os = "windows")]
    {
        Arc::new(windows::WindowsKeyboardHook::new())
    }

    #[cfg(not(target_os = "windows"))]
    {
        Arc::new(UnsupportedHook)
    }
}
