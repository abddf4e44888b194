//! MacroPlayer: types a stratagem out as timed synthetic key presses.
//!
//! # Timing
//!
//! For every direction in the sequence the player resolves the output key
//! under the active binding scheme, then:
//!
//! ```text
//! key-down ─ hold latency ─ key-up ─ hold latency ─ next step …
//! ```
//!
//! so a sequence of N steps takes at least `2 × latency × N`.  Holds are tokio
//! timers raced against a [`CancellationToken`], so a playback can be stopped
//! at any step boundary.
//!
//! # Serialisation
//!
//! Every playback first takes the player's *lane*.  Two macros triggered
//! back to back therefore never interleave their keys; the second waits for
//! the first to finish.
//!
//! # The emission gate
//!
//! All synthetic output goes through an [`EmissionGate`].  It remembers which
//! keys are currently held down and, when closed, releases them and refuses
//! every further press.  Closing happens under the same lock as emitting, so
//! once [`EmissionGate::close`] returns nothing else is typed and no key is
//! left stuck down.
//!
//! The price is that [`EmissionGate::close`] waits for a synthesizer call
//! already in progress (one `SendInput`, never a whole step or a hold).  A
//! synthesizer that blocks indefinitely therefore blocks `disable()` too.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use stratagem_core::{resolve, BindingScheme, Direction, EngineSettings, OutputKey};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};
use uuid::Uuid;

use super::feedback::{CompletionEffects, PlaybackCompleted};

/// Error type for key synthesis.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("platform error: {0}")]
    Platform(String),
    #[error("synthetic input rejected for key {0}")]
    Rejected(OutputKey),
    #[error("key synthesis is not supported on this platform")]
    Unsupported,
}

/// Platform-agnostic key synthesis trait.
///
/// Each supported OS provides an implementation in the infrastructure layer.
pub trait KeySynthesizer: Send + Sync {
    /// Emits a synthetic key press.
    fn key_down(&self, key: OutputKey) -> Result<(), SynthesisError>;

    /// Emits a synthetic key release.
    fn key_up(&self, key: OutputKey) -> Result<(), SynthesisError>;
}

#[derive(Debug, Default)]
struct GateState {
    open: bool,
    held: Vec<OutputKey>,
}

/// Serialises synthetic output and stops it for good when closed.
///
/// The lock is held across each synthesizer call, so [`EmissionGate::close`]
/// returns only after any in-progress press or release has finished.  It
/// never waits on a hold between steps.
pub struct EmissionGate {
    synth: Arc<dyn KeySynthesizer>,
    state: Mutex<GateState>,
}

impl EmissionGate {
    /// Creates a closed gate in front of `synth`.
    pub fn new(synth: Arc<dyn KeySynthesizer>) -> Self {
        Self {
            synth,
            state: Mutex::new(GateState::default()),
        }
    }

    pub fn open(&self) {
        self.lock().open = true;
    }

    /// Closes the gate, releasing every key a playback left held down.
    pub fn close(&self) {
        let mut state = self.lock();
        state.open = false;
        for key in std::mem::take(&mut state.held) {
            if let Err(e) = self.synth.key_up(key) {
                warn!("failed to release held key {key}: {e}");
            } else {
                debug!("released held key {key}");
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    /// Presses `key` if the gate is open and `token` is live.
    ///
    /// Returns `Ok(false)` when the press was refused.
    ///
    /// # Errors
    ///
    /// Returns [`SynthesisError`] if the synthesizer failed; the key is then
    /// not considered held.
    pub fn press(&self, key: OutputKey, token: &CancellationToken) -> Result<bool, SynthesisError> {
        let mut state = self.lock();
        if !state.open || token.is_cancelled() {
            return Ok(false);
        }
        self.synth.key_down(key)?;
        state.held.push(key);
        trace!("down {key}");
        Ok(true)
    }

    /// Releases `key` if this gate still holds it.
    ///
    /// A key already released by [`EmissionGate::close`] is not released again.
    ///
    /// # Errors
    ///
    /// Returns [`SynthesisError`] if the synthesizer failed.
    pub fn release(&self, key: OutputKey) -> Result<(), SynthesisError> {
        let mut state = self.lock();
        let Some(index) = state.held.iter().position(|&k| k == key) else {
            return Ok(());
        };
        state.held.remove(index);
        self.synth.key_up(key)?;
        trace!("up {key}");
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Everything needed to play one triggered macro.
#[derive(Debug, Clone)]
pub struct PlaybackRequest {
    pub playback_id: Uuid,
    pub macro_name: String,
    pub sequence: Vec<Direction>,
    pub key_label: String,
    /// Snapshot taken when the key was pressed.
    pub settings: EngineSettings,
}

impl PlaybackRequest {
    pub fn new(
        macro_name: impl Into<String>,
        sequence: Vec<Direction>,
        key_label: impl Into<String>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            playback_id: Uuid::new_v4(),
            macro_name: macro_name.into(),
            sequence,
            key_label: key_label.into(),
            settings,
        }
    }
}

/// How a playback ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// Every step ran; `skipped` steps failed to synthesize.
    Completed { pressed: usize, skipped: usize },
    /// Stopped by cancellation before the last step.
    Cancelled,
    /// Nothing to play.
    Empty,
}

/// The Play Macro use case.
pub struct MacroPlayer {
    gate: Arc<EmissionGate>,
    effects: CompletionEffects,
    lane: tokio::sync::Mutex<()>,
}

impl MacroPlayer {
    pub fn new(gate: Arc<EmissionGate>, effects: CompletionEffects) -> Self {
        Self {
            gate,
            effects,
            lane: tokio::sync::Mutex::new(()),
        }
    }

    pub fn gate(&self) -> &Arc<EmissionGate> {
        &self.gate
    }

    pub fn effects(&self) -> &CompletionEffects {
        &self.effects
    }

    /// Plays `request` and, if it completed, fires the completion side effects.
    pub async fn play(&self, request: &PlaybackRequest, token: &CancellationToken) -> PlaybackOutcome {
        self.play_then(request, token, || {}).await
    }

    /// Like [`MacroPlayer::play`], calling `output_done` as soon as key output
    /// has ended, before any side effect runs.
    ///
    /// `output_done` runs exactly once whatever the outcome.  If the returned
    /// future is dropped early it is dropped uncalled.
    pub async fn play_then<F>(
        &self,
        request: &PlaybackRequest,
        token: &CancellationToken,
        output_done: F,
    ) -> PlaybackOutcome
    where
        F: FnOnce() + Send,
    {
        if request.sequence.is_empty() {
            output_done();
            return PlaybackOutcome::Empty;
        }

        let outcome = {
            let lane = tokio::select! {
                _ = token.cancelled() => None,
                lane = self.lane.lock() => Some(lane),
            };
            match lane {
                Some(_lane) => {
                    self.type_sequence(
                        &request.sequence,
                        request.settings.binding_scheme,
                        request.settings.latency(),
                        token,
                    )
                    .await
                }
                None => PlaybackOutcome::Cancelled,
            }
        };
        output_done();

        match outcome {
            PlaybackOutcome::Completed { pressed, skipped } => {
                debug!(
                    playback_id = %request.playback_id,
                    macro_name = %request.macro_name,
                    pressed,
                    skipped,
                    "playback completed"
                );
                let event = PlaybackCompleted {
                    playback_id: request.playback_id,
                    macro_name: request.macro_name.clone(),
                    sequence: request.sequence.clone(),
                    key_label: request.key_label.clone(),
                };
                self.effects.fire(event, &request.settings).await;
            }
            PlaybackOutcome::Cancelled => {
                debug!(playback_id = %request.playback_id, "playback cancelled");
            }
            PlaybackOutcome::Empty => {}
        }
        outcome
    }

    async fn type_sequence(
        &self,
        sequence: &[Direction],
        scheme: BindingScheme,
        latency: Duration,
        token: &CancellationToken,
    ) -> PlaybackOutcome {
        let mut pressed = 0;
        let mut skipped = 0;

        for (step, &direction) in sequence.iter().enumerate() {
            let key = resolve(direction, scheme);
            match self.gate.press(key, token) {
                Ok(true) => pressed += 1,
                Ok(false) => return PlaybackOutcome::Cancelled,
                Err(e) => {
                    warn!(step, %direction, "skipping step: {e}");
                    skipped += 1;
                    continue;
                }
            }

            // A key still held on cancellation is released by the gate on close.
            if !hold(latency, token).await {
                return PlaybackOutcome::Cancelled;
            }
            if let Err(e) = self.gate.release(key) {
                warn!(step, %direction, "failed to release key: {e}");
            }
            if !hold(latency, token).await {
                return PlaybackOutcome::Cancelled;
            }
        }

        PlaybackOutcome::Completed { pressed, skipped }
    }
}

/// Sleeps for `latency`; returns `false` if `token` fired first.
async fn hold(latency: Duration, token: &CancellationToken) -> bool {
    tokio::select! {
        _ = token.cancelled() => false,
        _ = tokio::time::sleep(latency) => true,
    }
}
