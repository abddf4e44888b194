//! PlaybackScheduler: hands playbacks off the hook thread onto tokio tasks.
//!
//! The hook callback must return within a few hundred milliseconds, while a
//! macro takes `2 × latency × steps`.  The scheduler bridges the two: the
//! hook thread calls [`PlaybackScheduler::dispatch`], which only spawns a task
//! on the runtime and returns immediately.
//!
//! # Generations
//!
//! Each enable period is one *generation* with its own
//! [`CancellationToken`].  [`PlaybackScheduler::halt`] cancels the current
//! token and closes the emission gate, which stops every queued or running
//! playback of that generation without waiting for their tasks.
//!
//! # Re-triggers
//!
//! While a slot's playback is queued or still typing, pressing the same key
//! again is dropped.  The slot is free again once its last key-up is out, even
//! if the completion feedback is still running.  Different slots queue up
//! behind each other on the player's lane.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use stratagem_core::PhysicalKeyId;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

use super::play_macro::{MacroPlayer, PlaybackRequest};

/// What happened to a dispatched trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A playback task was spawned.
    Scheduled(Uuid),
    /// The same slot already has a playback queued or typing.
    AlreadyPlaying,
    /// The scheduler is halted.
    Halted,
}

/// Removes a slot from the in-flight set when its task ends, however it ends.
struct InFlightGuard {
    in_flight: Arc<Mutex<HashSet<PhysicalKeyId>>>,
    key: PhysicalKeyId,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.key);
    }
}

/// Spawns and cancels playback tasks.
pub struct PlaybackScheduler {
    runtime: Handle,
    player: Arc<MacroPlayer>,
    generation: Mutex<CancellationToken>,
    in_flight: Arc<Mutex<HashSet<PhysicalKeyId>>>,
}

impl PlaybackScheduler {
    /// Creates a halted scheduler that spawns onto `runtime`.
    pub fn new(runtime: Handle, player: Arc<MacroPlayer>) -> Self {
        let token = CancellationToken::new();
        token.cancel();
        Self {
            runtime,
            player,
            generation: Mutex::new(token),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn player(&self) -> &Arc<MacroPlayer> {
        &self.player
    }

    /// Starts a new generation and opens the emission gate.
    pub fn resume(&self) {
        let mut generation = self.generation.lock().unwrap_or_else(|e| e.into_inner());
        if generation.is_cancelled() {
            *generation = CancellationToken::new();
        }
        self.player.gate().open();
    }

    /// Cancels the current generation and closes the emission gate.
    ///
    /// Does not wait for playback tasks; once this returns none of them can
    /// emit anything.
    pub fn halt(&self) {
        self.generation
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .cancel();
        self.player.gate().close();
    }

    pub fn is_halted(&self) -> bool {
        self.current_token().is_cancelled()
    }

    /// Number of slots with a playback queued or typing.
    pub fn in_flight(&self) -> usize {
        self.in_flight.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Schedules `request` for the slot `key`.  Never blocks.
    pub fn dispatch(&self, key: PhysicalKeyId, request: PlaybackRequest) -> DispatchOutcome {
        let token = self.current_token();
        if token.is_cancelled() {
            return DispatchOutcome::Halted;
        }
        if !self
            .in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key)
        {
            debug!(%key, "slot already playing; trigger dropped");
            return DispatchOutcome::AlreadyPlaying;
        }

        let guard = InFlightGuard {
            in_flight: Arc::clone(&self.in_flight),
            key,
        };
        let playback_id = request.playback_id;
        let player = Arc::clone(&self.player);
        self.runtime.spawn(async move {
            // The slot may be triggered again as soon as its keys are out,
            // even while the completion cue is still sounding.
            player
                .play_then(&request, &token, move || drop(guard))
                .await;
        });
        DispatchOutcome::Scheduled(playback_id)
    }

    fn current_token(&self) -> CancellationToken {
        self.generation
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
