//! Stratagems (macros) and the lookup the engine resolves them through.

use std::collections::HashMap;

use super::catalog::BUILTIN;
use super::direction::{parse_sequence, Direction};
use super::DomainError;

/// A named, non-empty direction sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stratagem {
    name: String,
    sequence: Vec<Direction>,
}

impl Stratagem {
    /// Builds a stratagem, enforcing a non-blank name and a non-empty sequence.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyName`] or [`DomainError::EmptySequence`].
    pub fn new(name: impl Into<String>, sequence: Vec<Direction>) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::EmptyName);
        }
        if sequence.is_empty() {
            return Err(DomainError::EmptySequence(name));
        }
        Ok(Self { name, sequence })
    }

    /// Builds a stratagem from textual direction tokens as found in data files.
    ///
    /// # Errors
    ///
    /// Fails like [`Stratagem::new`], or with [`DomainError::UnknownDirection`].
    pub fn from_tokens<S: AsRef<str>>(
        name: impl Into<String>,
        tokens: &[S],
    ) -> Result<Self, DomainError> {
        Self::new(name, parse_sequence(tokens)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sequence(&self) -> &[Direction] {
        &self.sequence
    }
}

/// Resolves a stratagem name to its direction sequence.
///
/// Owned by the profile/plugin layer; the engine treats it as a pure lookup.
#[cfg_attr(test, mockall::automock)]
pub trait StratagemLookup: Send + Sync {
    /// Returns the sequence for `name`, or `None` if no such stratagem exists
    /// (deleted, or its plugin was disabled since it was assigned).
    fn lookup(&self, name: &str) -> Option<Vec<Direction>>;
}

/// In-memory stratagem catalogue keyed by exact name.
#[derive(Debug, Clone, Default)]
pub struct StratagemBook {
    entries: HashMap<String, Vec<Direction>>,
}

impl StratagemBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock catalogue.
    pub fn builtin() -> Self {
        let mut book = Self::new();
        for (name, sequence) in BUILTIN {
            book.entries.insert((*name).to_string(), sequence.to_vec());
        }
        book
    }

    /// Adds or replaces a stratagem, returning the sequence it replaced.
    pub fn insert(&mut self, stratagem: Stratagem) -> Option<Vec<Direction>> {
        let replaced = self
            .entries
            .insert(stratagem.name.clone(), stratagem.sequence);
        if replaced.is_some() {
            tracing::debug!(name = %stratagem.name, "stratagem definition replaced");
        }
        replaced
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<Direction>> {
        self.entries.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stratagem names in alphabetical order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl StratagemLookup for StratagemBook {
    fn lookup(&self, name: &str) -> Option<Vec<Direction>> {
        self.entries.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Direction::*;

    #[test]
    fn test_builtin_contains_machine_gun_sequence() {
        let book = StratagemBook::builtin();
        assert_eq!(
            book.lookup("Machine Gun"),
            Some(vec![Down, Left, Down, Up, Right])
        );
    }

    #[test]
    fn test_builtin_sequences_are_never_empty() {
        let book = StratagemBook::builtin();
        assert!(book.len() > 50);
        for name in book.names() {
            assert!(!book.lookup(name).unwrap().is_empty(), "{name} is empty");
        }
    }

    #[test]
    fn test_lookup_is_exact_match() {
        let book = StratagemBook::builtin();
        assert_eq!(book.lookup("machine gun"), None);
    }

    #[test]
    fn test_removed_stratagem_no_longer_resolves() {
        let mut book = StratagemBook::builtin();
        assert!(book.remove("Reinforce").is_some());
        assert_eq!(book.lookup("Reinforce"), None);
    }

    #[test]
    fn test_stratagem_rejects_empty_sequence_and_name() {
        assert_eq!(
            Stratagem::new("Nothing", vec![]),
            Err(DomainError::EmptySequence("Nothing".to_string()))
        );
        assert_eq!(Stratagem::new("  ", vec![Up]), Err(DomainError::EmptyName));
    }

    #[test]
    fn test_from_tokens_accepts_mixed_case() {
        let s = Stratagem::from_tokens("Flare", &["Right", "RIGHT", "left", "left"]).unwrap();
        assert_eq!(s.sequence(), &[Right, Right, Left, Left]);
    }

    #[test]
    fn test_insert_shadows_existing_entry() {
        let mut book = StratagemBook::builtin();
        let replaced = book.insert(Stratagem::new("Resupply", vec![Up, Up]).unwrap());
        assert!(replaced.is_some());
        assert_eq!(book.lookup("Resupply"), Some(vec![Up, Up]));
    }
}
