//! Bonded companion grouping.
//!
//! Every visible card with a bonded owner and a positive quantity is filed
//! under the owner's display name, in canonical order. Resolving the
//! companions of a card at a taboo level walks its group from the end and
//! keeps, per code, the newest revision not above that level.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::cards::{sort_refs, Card};

/// Owner display name → bonded companions.
#[derive(Clone, Debug, Default)]
pub struct BondedIndex {
    groups: FxHashMap<String, Vec<Card>>,
    skip_ids: FxHashSet<String>,
}

impl BondedIndex {
    /// Group `cards` (already in canonical order) by bonded owner.
    ///
    /// Cards whose id is in `skip_ids` never report companions.
    pub fn build<'a, I>(cards: I, skip_ids: &FxHashSet<String>) -> Self
    where
        I: IntoIterator<Item = &'a Card>,
    {
        let mut groups: FxHashMap<String, Vec<Card>> = FxHashMap::default();
        for card in cards {
            if card.bonded_to.is_empty() || card.quantity == 0 || card.hidden {
                continue;
            }
            groups
                .entry(card.bonded_to.clone())
                .or_default()
                .push(card.clone());
        }
        Self {
            groups,
            skip_ids: skip_ids.clone(),
        }
    }

    /// Whether `card` has bonded companions.
    #[must_use]
    pub fn has_bonded(&self, card: &Card) -> bool {
        !self.skip_ids.contains(&card.id) && self.groups.contains_key(card.name())
    }

    /// Every companion filed under `owner`, in canonical order.
    #[must_use]
    pub fn group(&self, owner: &str) -> &[Card] {
        self.groups.get(owner).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Companions of `card` applicable at `taboo_level`.
    ///
    /// One card per companion code: the newest revision whose own level
    /// does not exceed `taboo_level`.
    #[must_use]
    pub fn companions(&self, card: &Card, taboo_level: u32) -> Vec<&Card> {
        if !self.has_bonded(card) {
            return Vec::new();
        }
        let mut chosen_codes: FxHashSet<&str> = FxHashSet::default();
        let mut chosen: Vec<&Card> = Vec::new();
        for companion in self.group(card.name()).iter().rev() {
            if companion.taboo_level > taboo_level
                || chosen_codes.contains(companion.code.as_str())
            {
                continue;
            }
            chosen_codes.insert(&companion.code);
            chosen.push(companion);
        }
        if chosen.len() > 1 {
            sort_refs(&mut chosen);
        }
        chosen
    }

    /// Owner names with at least one companion.
    pub fn owners(&self) -> impl Iterator<Item = &String> {
        self.groups.keys()
    }

    /// Number of owners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
