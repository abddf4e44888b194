//! Direction mapper and platform key tables.
//!
//! [`resolve`] is the *direction mapper*: a pure, total function from an
//! abstract [`Direction`] and the active [`BindingScheme`] to the concrete
//! [`OutputKey`] the engine presses.  Platform-specific codes for each output
//! key live in the sub-modules and are only consulted at the synthesis
//! boundary.

pub mod windows_scan;

use std::fmt;

use crate::domain::direction::Direction;
use crate::domain::settings::BindingScheme;

/// A key the engine can synthesize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKey {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    W,
    A,
    S,
    D,
    E,
    F,
}

impl OutputKey {
    /// Key name as understood by common keyboard libraries (`"up"`, `"w"`, …).
    pub fn name(self) -> &'static str {
        match self {
            OutputKey::ArrowUp => "up",
            OutputKey::ArrowDown => "down",
            OutputKey::ArrowLeft => "left",
            OutputKey::ArrowRight => "right",
            OutputKey::W => "w",
            OutputKey::A => "a",
            OutputKey::S => "s",
            OutputKey::D => "d",
            OutputKey::E => "e",
            OutputKey::F => "f",
        }
    }
}

impl fmt::Display for OutputKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maps a direction to the key that represents it under `scheme`.
pub fn resolve(direction: Direction, scheme: BindingScheme) -> OutputKey {
    use BindingScheme::*;
    use Direction::*;

    match (scheme, direction) {
        (Arrows, Up) => OutputKey::ArrowUp,
        (Arrows, Down) => OutputKey::ArrowDown,
        (Arrows, Left) => OutputKey::ArrowLeft,
        (Arrows, Right) => OutputKey::ArrowRight,

        (Wasd, Up) => OutputKey::W,
        (Wasd, Down) => OutputKey::S,
        (Wasd, Left) => OutputKey::A,
        (Wasd, Right) => OutputKey::D,

        (Esdf, Up) => OutputKey::E,
        (Esdf, Down) => OutputKey::D,
        (Esdf, Left) => OutputKey::S,
        (Esdf, Right) => OutputKey::F,
    }
}

/// Token-level variant of [`resolve`] for raw data-file values.
///
/// A token that is not a direction is returned unchanged.
pub fn resolve_token(token: &str, scheme: BindingScheme) -> String {
    match token.parse::<Direction>() {
        Ok(direction) => resolve(direction, scheme).name().to_string(),
        Err(_) => token.to_string(),
    }
}
