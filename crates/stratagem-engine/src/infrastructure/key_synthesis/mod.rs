//! Platform-specific key synthesis implementations.
//!
//! The correct implementation is selected at compile time via `#[cfg(target_os = ...)]`.

use std::sync::Arc;

use stratagem_core::OutputKey;

use crate::application::play_macro::{KeySynthesizer, SynthesisError};

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

/// Synthesizer used where the platform has no input-injection backend.
/// Every call fails, so each playback step is skipped and logged.
#[derive(Debug, Default)]
pub struct UnsupportedSynthesizer;

impl KeySynthesizer for UnsupportedSynthesizer {
    fn key_down(&self, _key: OutputKey) -> Result<(), SynthesisError> {
        Err(SynthesisError::Unsupported)
    }

    fn key_up(&self, _key: OutputKey) -> Result<(), SynthesisError> {
        Err(SynthesisError::Unsupported)
    }
}

/// Returns the synthesizer for the current platform.
pub fn platform_synthesizer() -> Arc<dyn KeySynthesizer> {
    #[cfg(target_os = "windows")]
    {
        Arc::new(windows::WindowsKeySynthesizer::new())
    }

    #[cfg(not(target_os = "windows"))]
    {
        Arc::new(UnsupportedSynthesizer)
    }
}
