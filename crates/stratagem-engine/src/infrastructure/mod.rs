//! Infrastructure layer for the macro engine.
//!
//! Contains OS-facing adapters: the global keyboard hook, key synthesis,
//! the audio/status feedback adapters, and file-system config storage.

pub mod feedback;
pub mod key_synthesis;
pub mod keyboard_hook;
pub mod storage;
