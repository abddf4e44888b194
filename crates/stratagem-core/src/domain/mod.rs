//! Domain entities for the stratagem macro engine.
//!
//! This module contains pure business logic with no infrastructure dependencies.
//! Everything here can be compiled and tested on any platform without a
//! keyboard hook or an input-synthesis API.
//!
//! The engine *reads* these types; it never mutates slots or settings.  The
//! mutating methods (`SlotTable::assign`, `SharedSettings::update`, …) exist
//! for the surrounding application.

use thiserror::Error;

mod catalog;
pub mod direction;
pub mod settings;
pub mod slot;
pub mod stratagem;

/// Errors raised when building domain values from untrusted input
/// (configuration files, plugin data).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// A direction token is not one of `up`, `down`, `left`, `right`.
    #[error("unknown direction token: {0:?}")]
    UnknownDirection(String),

    /// A stratagem was defined with no steps.
    #[error("stratagem {0:?} has an empty sequence")]
    EmptySequence(String),

    /// A stratagem name was blank.
    #[error("stratagem name must not be empty")]
    EmptyName,

    /// A custom layout exceeded the supported number of keys.
    #[error("custom layout has {count} keys; at most {max} are supported")]
    TooManyCustomKeys { count: usize, max: usize },

    /// The same physical key appears twice in one layout.
    #[error("physical key {0} appears more than once in the layout")]
    DuplicateKey(u16),

    /// A slot operation referenced a key that is not part of the layout.
    #[error("physical key {0} is not part of the active layout")]
    UnknownSlot(u16),
}
