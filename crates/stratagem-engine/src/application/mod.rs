//! Application layer use cases for the macro engine.
//!
//! # What is the "application" layer? (for beginners)
//!
//! The application layer sits between the domain types in `stratagem-core`
//! (pure rules: directions, slots, stratagems) and the infrastructure (OS
//! hooks, `SendInput`, config files).  Use cases here depend on traits, so
//! the whole engine can be driven by mocks in tests.
//!
//! # Sub-modules
//!
//! - **`dispatch_key`** – Runs on the hook thread for every key-down and
//!   decides between pass-through and suppress-and-play.
//!
//! - **`schedule`** – Moves playbacks off the hook thread onto tokio tasks,
//!   drops same-slot re-triggers, and cancels everything on disable.
//!
//! - **`play_macro`** – Types a sequence out as timed key presses through the
//!   emission gate, then fires the completion feedback.
//!
//! - **`feedback`** – The completion bus and the audio/status ports.
//!
//! - **`lifecycle`** – The `MacroEngine` that owns the hook between
//!   `enable()` and `disable()`.

pub mod dispatch_key;
pub mod feedback;
pub mod lifecycle;
pub mod play_macro;
pub mod schedule;
