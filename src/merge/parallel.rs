//! Parallel card synthesis.
//!
//! For every configured pairing, each regular code is combined with each
//! parallel code. Every (regular card, parallel card) combination yields
//! two hybrids:
//! - parallel front with regular back
//! - regular front with parallel back
//!
//! Each combination takes the next two ordinals of its regular code, so
//! the hybrids sort right after their regular card, in configuration order.
//! Regular source cards are flagged as having parallel content.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::cards::{sort_refs, Card, CardRegistry};
use crate::config::{ImageRemap, ParallelPairing};
use crate::diagnostics::{Diagnostic, Diagnostics, PairingSide};

/// Source code → ids of the hybrids built from it.
///
/// Both the regular and the parallel source code of a hybrid are keys.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParallelIndex {
    variants: FxHashMap<String, Vec<String>>,
}

impl ParallelIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, source_code: &str, hybrid_id: &str) {
        let ids = self.variants.entry(source_code.to_string()).or_default();
        if !ids.iter().any(|id| id == hybrid_id) {
            ids.push(hybrid_id.to_string());
        }
    }

    /// Hybrid ids built from `code`, in synthesis order.
    #[must_use]
    pub fn variants_of(&self, code: &str) -> &[String] {
        self.variants.get(code).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether any hybrid was built from `code`.
    #[must_use]
    pub fn has_variants(&self, code: &str) -> bool {
        self.variants.contains_key(code)
    }

    /// Number of source codes with hybrids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Iterate over `(source code, hybrid ids)`.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.variants.iter()
    }
}

/// Sorted cards registered under `code`, excluding existing hybrids.
fn group<'a>(cards: &'a [Card], registry: &CardRegistry, code: &str) -> Vec<&'a Card> {
    let mut group: Vec<&Card> = registry
        .with_code(code)
        .iter()
        .map(|&position| &cards[position])
        .filter(|card| card.parallel.is_none())
        .collect();
    sort_refs(&mut group);
    group
}

/// Build hybrids for every pairing and append them to `cards`.
///
/// Hybrid ids are registered in `remap` against the card whose artwork
/// they reuse. The list is left unsorted; the caller re-sorts.
pub fn synthesize(
    cards: &mut Vec<Card>,
    pairings: &[ParallelPairing],
    remap: &mut ImageRemap,
    diagnostics: &mut Diagnostics,
) -> ParallelIndex {
    let registry = CardRegistry::index(cards);
    let mut index = ParallelIndex::new();
    let mut known_ids: FxHashSet<String> = cards.iter().map(|c| c.id.clone()).collect();
    let mut flagged: FxHashSet<String> = FxHashSet::default();
    let mut hybrids: Vec<Card> = Vec::new();

    for pairing in pairings {
        let shared_art: Option<String> = if pairing.same_art {
            pairing.regular.first().and_then(|code| {
                group(cards, &registry, code)
                    .first()
                    .map(|c| c.id.clone())
            })
        } else {
            None
        };

        for regular_code in &pairing.regular {
            // Hybrids sit in the regular code's own key range.
            let mut ordinal = 1u32;
            for parallel_code in &pairing.parallel {
                let regulars = group(cards, &registry, regular_code);
                let parallels = group(cards, &registry, parallel_code);

                let missing = match (regulars.is_empty(), parallels.is_empty()) {
                    (true, true) => Some(PairingSide::Both),
                    (true, false) => Some(PairingSide::Regular),
                    (false, true) => Some(PairingSide::Parallel),
                    (false, false) => None,
                };
                if let Some(missing) = missing {
                    diagnostics.report(Diagnostic::MissingParallelSide {
                        regular_code: regular_code.clone(),
                        parallel_code: parallel_code.clone(),
                        missing,
                    });
                    continue;
                }

                for regular in &regulars {
                    for parallel in &parallels {
                        let front = parallel.as_parallel_clone(regular, regular_code, ordinal);
                        let mirrored =
                            regular.as_parallel_clone(parallel, regular_code, ordinal + 1);
                        ordinal += 2;

                        let pair = [
                            (front, shared_art.as_deref().unwrap_or(&regular.id)),
                            (mirrored, shared_art.as_deref().unwrap_or(&parallel.id)),
                        ];
                        for (hybrid, art_source) in pair {
                            if !known_ids.insert(hybrid.id.clone()) {
                                diagnostics.report(Diagnostic::DuplicateCardId {
                                    card_id: hybrid.id.clone(),
                                });
                                continue;
                            }
                            remap.insert(hybrid.id.clone(), art_source);
                            index.record(&regular.code, &hybrid.id);
                            index.record(&parallel.code, &hybrid.id);
                            hybrids.push(hybrid);
                        }
                        flagged.insert(regular.id.clone());
                    }
                }
            }
        }
    }

    for card in cards.iter_mut() {
        if flagged.contains(&card.id) && !card.parallel_content {
            *card = card.clone().with_parallel_content();
        }
    }

    debug!(
        pairings = pairings.len(),
        hybrids = hybrids.len(),
        "synthesized parallel cards"
    );
    cards.extend(hybrids);
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Face;

    fn card(code: &str, name: &str) -> Card {
        Card::new(code, Face::named(name)).with_back(Face::named(format!("{name} back")))
    }

    #[test]
    fn test_single_pair_builds_two_hybrids() {
        let mut cards = vec![card("01001", "Roland"), card("90024", "Parallel Roland")];
        let mut remap = ImageRemap::new();
        let mut diags = Diagnostics::new();

        let index = synthesize(
            &mut cards,
            &[ParallelPairing::new(["01001"], ["90024"])],
            &mut remap,
            &mut diags,
        );

        assert_eq!(cards.len(), 4);
        assert!(cards[0].parallel_content);
        assert!(!cards[1].parallel_content);

        let front = &cards[2];
        assert_eq!(front.id, "90024+01001");
        assert_eq!(front.name(), "Parallel Roland");
        assert_eq!(front.back.as_ref().unwrap().name, "Roland back");
        assert_eq!(remap.get("90024+01001"), Some("01001"));

        let mirrored = &cards[3];
        assert_eq!(mirrored.id, "01001+90024");
        assert_eq!(mirrored.name(), "Roland");
        assert_eq!(mirrored.back.as_ref().unwrap().name, "Parallel Roland back");
        assert_eq!(remap.get("01001+90024"), Some("90024"));

        assert_eq!(index.variants_of("01001"), &["90024+01001", "01001+90024"]);
        assert_eq!(index.variants_of("90024").len(), 2);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_ordinals_advance_by_two() {
        let mut cards = vec![
            card("01001", "Roland"),
            card("90024", "Parallel Roland"),
            card("90025", "Parallel Roland Alt"),
        ];
        let mut remap = ImageRemap::new();
        let mut diags = Diagnostics::new();

        synthesize(
            &mut cards,
            &[ParallelPairing::new(["01001"], ["90024", "90025"])],
            &mut remap,
            &mut diags,
        );

        let ordinals: Vec<u32> = cards
            .iter()
            .filter_map(|c| c.parallel.as_ref().map(|o| o.ordinal))
            .collect();
        assert_eq!(ordinals, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_ordinals_restart_per_regular_code() {
        let mut cards = vec![
            card("01001", "Roland"),
            card("01002", "Daisy"),
            card("90024", "Parallel"),
        ];
        let mut remap = ImageRemap::new();
        let mut diags = Diagnostics::new();

        synthesize(
            &mut cards,
            &[ParallelPairing::new(["01001", "01002"], ["90024"])],
            &mut remap,
            &mut diags,
        );

        let ordinals: Vec<(&str, u32)> = cards
            .iter()
            .filter_map(|c| c.parallel.as_ref())
            .map(|o| (o.regular_code.as_str(), o.ordinal))
            .collect();
        assert_eq!(
            ordinals,
            vec![("01001", 1), ("01001", 2), ("01002", 1), ("01002", 2)]
        );
    }

    #[test]
    fn test_same_art_shares_first_regular() {
        let mut cards = vec![
            card("01001", "Roland"),
            card("01002", "Daisy"),
            card("90024", "Parallel"),
        ];
        let mut remap = ImageRemap::new();
        let mut diags = Diagnostics::new();

        synthesize(
            &mut cards,
            &[ParallelPairing::new(["01001", "01002"], ["90024"]).same_art()],
            &mut remap,
            &mut diags,
        );

        for id in ["90024+01001", "01001+90024", "90024+01002", "01002+90024"] {
            assert_eq!(remap.get(id), Some("01001"), "{id}");
        }
    }

    #[test]
    fn test_missing_side_skips_combination() {
        let mut cards = vec![card("01001", "Roland")];
        let mut remap = ImageRemap::new();
        let mut diags = Diagnostics::new();

        let index = synthesize(
            &mut cards,
            &[ParallelPairing::new(["01001"], ["90024"])],
            &mut remap,
            &mut diags,
        );

        assert_eq!(cards.len(), 1);
        assert!(!cards[0].parallel_content);
        assert!(index.is_empty());
        assert!(diags.mentions("01001/90024 has no parallel cards"));
    }

    #[test]
    fn test_taboo_revisions_cross_product() {
        let mut cards = vec![
            card("01001", "Roland"),
            Card::taboo_revision("01001", 1, Face::named("Roland")),
            card("90024", "Parallel Roland"),
        ];
        let mut remap = ImageRemap::new();
        let mut diags = Diagnostics::new();

        synthesize(
            &mut cards,
            &[ParallelPairing::new(["01001"], ["90024"])],
            &mut remap,
            &mut diags,
        );

        assert_eq!(cards.len(), 3 + 4);
        assert!(cards.iter().any(|c| c.id == "90024+01001-t1"));
        assert!(cards[1].parallel_content);
    }

    #[test]
    fn test_repeated_pairing_reports_duplicates() {
        let mut cards = vec![card("01001", "Roland"), card("90024", "Parallel Roland")];
        let pairing = ParallelPairing::new(["01001"], ["90024"]);
        let mut remap = ImageRemap::new();
        let mut diags = Diagnostics::new();

        synthesize(&mut cards, &[pairing.clone(), pairing], &mut remap, &mut diags);

        assert_eq!(cards.len(), 4);
        assert_eq!(diags.of_kind("duplicate_card_id").count(), 2);
    }
}
