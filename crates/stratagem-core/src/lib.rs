//! # stratagem-core
//!
//! Shared library for the numpad stratagem macro engine containing the domain
//! entities, the built-in stratagem catalogue, and the key translation tables.
//!
//! This crate has zero dependencies on OS APIs, UI frameworks, or threads.
//!
//! # Architecture overview (for beginners)
//!
//! A *stratagem* is a named sequence of directions (up/down/left/right) that a
//! game expects to be typed quickly.  The user assigns stratagems to the keys
//! of their numeric keypad; pressing such a key makes the engine type the
//! whole sequence on their behalf.
//!
//! This crate defines:
//!
//! - **`domain`** – The things the engine reasons about: directions, slots
//!   (physical key → assigned stratagem), the stratagem lookup, and the
//!   settings snapshot read on every trigger.
//!
//! - **`keymap`** – The *direction mapper* that turns an abstract direction
//!   into the concrete key to press under the active binding scheme, and the
//!   Windows scan-code tables used at the capture and synthesis boundaries.

pub mod domain;
pub mod keymap;

// Re-export the most-used types at the crate root so callers can write
// `stratagem_core::Direction` instead of `stratagem_core::domain::direction::Direction`.
pub use domain::direction::Direction;
pub use domain::settings::{
    BindingScheme, EngineSettings, LayoutKind, SettingsSource, SharedSettings,
};
pub use domain::slot::{PhysicalKeyId, SlotAssignment, SlotRegistry, SlotTable};
pub use domain::stratagem::{Stratagem, StratagemBook, StratagemLookup};
pub use domain::DomainError;
pub use keymap::{resolve, resolve_token, OutputKey};
