//! Card registry over a working list.
//!
//! The `CardRegistry` indexes a slice of cards by id and by catalog code.
//! It stores positions into the slice, so it is rebuilt whenever the list
//! is reordered or grows.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::card::Card;

/// Positions of every card sharing one catalog code.
///
/// Most codes have one or two entries (original plus a taboo revision).
pub type CodeSlots = SmallVec<[usize; 2]>;

/// Index of cards by id and by code.
///
/// ## Example
///
/// ```
/// use ccg_catalog::cards::{Card, CardRegistry, Face};
///
/// let cards = vec![
///     Card::new("01020", Face::named("Machete")),
///     Card::taboo_revision("01020", 1, Face::named("Machete")),
/// ];
/// let registry = CardRegistry::index(&cards);
///
/// assert_eq!(registry.position("01020-t1"), Some(1));
/// assert_eq!(registry.with_code("01020").len(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    by_id: FxHashMap<String, usize>,
    by_code: FxHashMap<String, CodeSlots>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index over `cards`.
    ///
    /// If an id occurs twice the first position wins.
    #[must_use]
    pub fn index(cards: &[Card]) -> Self {
        let mut registry = Self::new();
        for (position, card) in cards.iter().enumerate() {
            registry.register(card, position);
        }
        registry
    }

    /// Register a card at a position.
    ///
    /// Returns `false` if the id was already registered.
    pub fn register(&mut self, card: &Card, position: usize) -> bool {
        if self.by_id.contains_key(&card.id) {
            return false;
        }
        self.by_id.insert(card.id.clone(), position);
        self.by_code
            .entry(card.code.clone())
            .or_default()
            .push(position);
        true
    }

    /// Position of a card by id.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// Check if an id is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Positions of every card with `code`, in list order.
    #[must_use]
    pub fn with_code(&self, code: &str) -> &[usize] {
        self.by_code.get(code).map(|slots| slots.as_slice()).unwrap_or(&[])
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Face;

    #[test]
    fn test_index_and_lookup() {
        let cards = vec![
            Card::new("01001", Face::named("Roland")),
            Card::new("01002", Face::named("Daisy")),
        ];
        let registry = CardRegistry::index(&cards);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.position("01002"), Some(1));
        assert!(registry.position("09999").is_none());
        assert!(registry.contains("01001"));
    }

    #[test]
    fn test_code_groups() {
        let cards = vec![
            Card::new("01020", Face::named("Machete")),
            Card::new("01021", Face::named("Guard Dog")),
            Card::taboo_revision("01020", 2, Face::named("Machete")),
        ];
        let registry = CardRegistry::index(&cards);

        assert_eq!(registry.with_code("01020"), &[0, 2]);
        assert_eq!(registry.with_code("01021"), &[1]);
        assert!(registry.with_code("missing").is_empty());
    }

    #[test]
    fn test_duplicate_id_keeps_first() {
        let mut registry = CardRegistry::new();
        let card = Card::new("01001", Face::named("Roland"));

        assert!(registry.register(&card, 0));
        assert!(!registry.register(&card, 5));
        assert_eq!(registry.position("01001"), Some(0));
        assert_eq!(registry.with_code("01001"), &[0]);
    }

    #[test]
    fn test_empty() {
        let registry = CardRegistry::new();
        assert!(registry.is_empty());
    }
}
