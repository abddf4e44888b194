//! Mock key synthesizer for unit testing.
//!
//! # Why a mock synthesizer?
//!
//! The real synthesizer calls `SendInput`, which:
//!
//! - Requires an interactive desktop session.
//! - Actually presses keys on the test machine.
//! - Cannot be observed directly from Rust test code.
//!
//! `MockKeySynthesizer` replaces the OS call with in-memory recording.  Each
//! emitted event is pushed into a `Mutex<Vec<...>>` together with the
//! instant it was emitted, so tests can assert order *and* spacing.
//!
//! # Failing keys
//!
//! [`MockKeySynthesizer::fail_key`] makes every press and release of one key
//! fail, simulating a driver that rejects synthetic input.

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Instant;

use stratagem_core::OutputKey;

use crate::application::play_macro::{KeySynthesizer, SynthesisError};

/// Press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Down,
    Up,
}

/// One recorded synthetic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticEvent {
    pub key: OutputKey,
    pub action: KeyAction,
    pub at: Instant,
}

/// A mock synthesizer that records all calls without performing OS API calls.
#[derive(Debug, Default)]
pub struct MockKeySynthesizer {
    events: Mutex<Vec<SyntheticEvent>>,
    failing: Mutex<HashSet<OutputKey>>,
}

impl MockKeySynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every press and release of `key` fail from now on.
    pub fn fail_key(&self, key: OutputKey) {
        self.failing.lock().unwrap().insert(key);
    }

    /// Every recorded event in emission order.
    pub fn events(&self) -> Vec<SyntheticEvent> {
        self.events.lock().unwrap().clone()
    }

    /// `(key, action)` pairs in emission order, without timestamps.
    pub fn trace(&self) -> Vec<(OutputKey, KeyAction)> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|e| (e.key, e.action))
            .collect()
    }

    /// Keys pressed, in order.
    pub fn presses(&self) -> Vec<OutputKey> {
        self.filtered(KeyAction::Down)
    }

    /// Keys released, in order.
    pub fn releases(&self) -> Vec<OutputKey> {
        self.filtered(KeyAction::Up)
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn filtered(&self, action: KeyAction) -> Vec<OutputKey> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.action == action)
            .map(|e| e.key)
            .collect()
    }

    fn record(&self, key: OutputKey, action: KeyAction) -> Result<(), SynthesisError> {
        if self.failing.lock().unwrap().contains(&key) {
            return Err(SynthesisError::Rejected(key));
        }
        self.events.lock().unwrap().push(SyntheticEvent {
            key,
            action,
            at: Instant::now(),
        });
        Ok(())
    }
}

impl KeySynthesizer for MockKeySynthesizer {
    fn key_down(&self, key: OutputKey) -> Result<(), SynthesisError> {
        self.record(key, KeyAction::Down)
    }

    fn key_up(&self, key: OutputKey) -> Result<(), SynthesisError> {
        self.record(key, KeyAction::Up)
    }
}
