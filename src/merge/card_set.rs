//! The published, read-only result of a merge run.

use im::Vector;
use rustc_hash::FxHashMap;

use super::bonded::BondedIndex;
use super::parallel::ParallelIndex;
use crate::cards::Card;
use crate::config::{Configuration, ImageRemap};

/// Ordered, de-duplicated cards plus their derived indices.
///
/// Uses an `im::Vector` so exporters can hold cheap clones of the set.
#[derive(Clone, Debug, Default)]
pub struct CardSet {
    cards: Vector<Card>,
    by_id: FxHashMap<String, usize>,
    bonded: BondedIndex,
    parallel: ParallelIndex,
    image_remap: ImageRemap,
}

impl CardSet {
    /// Assemble a set from canonically ordered cards.
    #[must_use]
    pub fn new(
        cards: Vec<Card>,
        bonded: BondedIndex,
        parallel: ParallelIndex,
        image_remap: ImageRemap,
    ) -> Self {
        let by_id = cards
            .iter()
            .enumerate()
            .map(|(position, card)| (card.id.clone(), position))
            .collect();
        Self {
            cards: cards.into_iter().collect(),
            by_id,
            bonded,
            parallel,
            image_remap,
        }
    }

    /// Iterate over every card in canonical order, hidden ones included.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Iterate over the cards that pass the export visibility filter.
    pub fn visible<'a>(&'a self, config: &'a Configuration) -> impl Iterator<Item = &'a Card> + 'a {
        self.cards.iter().filter(move |card| config.is_included(card))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Look up a card by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Card> {
        self.by_id.get(id).and_then(|&position| self.cards.get(position))
    }

    /// Whether `card` has bonded companions.
    #[must_use]
    pub fn has_bonded(&self, card: &Card) -> bool {
        self.bonded.has_bonded(card)
    }

    /// Companions of `card` applicable at `taboo_level`.
    #[must_use]
    pub fn bonded_companions(&self, card: &Card, taboo_level: u32) -> Vec<&Card> {
        self.bonded.companions(card, taboo_level)
    }

    /// The bonded owner → companions index.
    #[must_use]
    pub fn bonded_groups(&self) -> &BondedIndex {
        &self.bonded
    }

    /// Hybrid ids synthesized from `code`.
    #[must_use]
    pub fn parallel_variants(&self, code: &str) -> &[String] {
        self.parallel.variants_of(code)
    }

    /// The source code → hybrids index.
    #[must_use]
    pub fn parallel_groups(&self) -> &ParallelIndex {
        &self.parallel
    }

    /// Id whose artwork `card` uses.
    #[must_use]
    pub fn image_id<'a>(&'a self, card: &'a Card) -> &'a str {
        self.image_remap.resolve(&card.id)
    }

    /// The run's image remap table (configured entries plus synthesized).
    #[must_use]
    pub fn image_remap(&self) -> &ImageRemap {
        &self.image_remap
    }
}

impl<'a> IntoIterator for &'a CardSet {
    type Item = &'a Card;
    type IntoIter = im::vector::Iter<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Face;

    fn set() -> CardSet {
        let cards = vec![
            Card::new("01001", Face::named("Roland")).with_pack("core", 1),
            Card::new("01002", Face::named("Daisy")).with_pack("dwl", 2),
            Card::new("01003", Face::named("Skids")).with_pack("core", 3).hidden(),
        ];
        CardSet::new(
            cards,
            BondedIndex::default(),
            ParallelIndex::default(),
            ImageRemap::new().with("01003", "01001"),
        )
    }

    #[test]
    fn test_lookup_and_order() {
        let set = set();
        assert_eq!(set.len(), 3);
        assert_eq!(set.get("01002").unwrap().name(), "Daisy");
        assert!(set.get("09999").is_none());

        let ids: Vec<&str> = set.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["01001", "01002", "01003"]);
    }

    #[test]
    fn test_visible_applies_filter() {
        let set = set();
        let config = Configuration::default().with_packs(["core"]);
        let ids: Vec<&str> = set.visible(&config).map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["01001"]);
    }

    #[test]
    fn test_image_id() {
        let set = set();
        let skids = set.get("01003").unwrap();
        assert_eq!(set.image_id(skids), "01001");
        assert_eq!(set.image_id(set.get("01002").unwrap()), "01002");
    }

    #[test]
    fn test_borrowed_iteration() {
        let set = set();
        let count = (&set).into_iter().count();
        assert_eq!(count, 3);
    }
}
