//! stratagem-engine library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does the engine do? (for beginners)
//!
//! While enabled, the engine sees every physical key-down on the machine
//! before any application does.  When the key is a slot with a stratagem
//! assigned, the engine swallows the key press and, on a background task,
//! types the stratagem's direction sequence into the foreground window with
//! a fixed delay between presses and releases.
//!
//! 1. `infrastructure::keyboard_hook` installs the OS hook and calls the
//!    dispatcher synchronously for each key-down.
//! 2. `application::dispatch_key` decides *suppress* or *pass through* and
//!    hands work to the scheduler without blocking the hook thread.
//! 3. `application::schedule` runs each playback on a tokio task.
//! 4. `application::play_macro` emits the timed press/release pairs through a
//!    `KeySynthesizer` and fires the completion side effects.
//! 5. `application::lifecycle::MacroEngine` ties it together behind
//!    `enable()` / `disable()`.

/// Application layer: dispatch, playback, scheduling, lifecycle.
pub mod application;

/// Infrastructure layer: OS hook, key synthesis, feedback adapters, config storage.
pub mod infrastructure;

pub use application::lifecycle::{EngineError, EnginePorts, EngineState, MacroEngine};
pub use application::feedback::PlaybackCompleted;
