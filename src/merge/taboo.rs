//! Taboo (errata) deduplication and gap filling.
//!
//! Cards sharing a code form a taboo family ordered by level. Walking a
//! canonically sorted list:
//! - a revision taboo-equal to the last retained member of its family is
//!   dropped;
//! - the highest level seen per family is tracked, dropped revisions
//!   included, since a dropped revision still means the card stayed on that
//!   taboo list.
//!
//! A family whose last retained revision still differs from the original
//! and whose highest level is below the latest known level gets a clone of
//! the original at `highest + 1`: the errata was lifted at that level. The
//! clone's artwork is remapped to the original.
//!
//! Running the stage on its own output changes nothing.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::cards::{canonical_sort, Card};
use crate::config::ImageRemap;
use crate::diagnostics::{Diagnostic, Diagnostics};

/// What one run of taboo resolution did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TabooReport {
    /// Ids of revisions dropped as duplicates.
    pub dropped: Vec<String>,
    /// Ids of synthesized carry-forward clones.
    pub synthesized: Vec<String>,
}

#[derive(Debug, Default)]
struct Family {
    /// Position of the level-0 original.
    template: Option<usize>,
    /// Position of the last retained member (original or revision).
    retained: Option<usize>,
    /// Whether any taboo revision exists for this code.
    has_revisions: bool,
    max_level: u32,
}

/// Deduplicate taboo revisions and fill the gap up to `latest_level`.
///
/// `cards` must already be in canonical order; it is re-sorted after
/// clones are inserted.
pub fn resolve(
    cards: &mut Vec<Card>,
    latest_level: u32,
    remap: &mut ImageRemap,
    diagnostics: &mut Diagnostics,
) -> TabooReport {
    let mut report = TabooReport::default();
    let mut families: FxHashMap<String, Family> = FxHashMap::default();
    // Codes in first-seen order, for deterministic clone insertion.
    let mut order: Vec<String> = Vec::new();
    let mut keep = vec![true; cards.len()];

    for (position, card) in cards.iter().enumerate() {
        if card.parallel.is_some() {
            continue;
        }
        let family = families.entry(card.code.clone()).or_insert_with(|| {
            order.push(card.code.clone());
            Family::default()
        });

        if card.is_original() {
            if family.template.is_none() {
                family.template = Some(position);
                if family.retained.is_none() {
                    family.retained = Some(position);
                }
            }
            continue;
        }
        if !card.is_taboo_revision() {
            continue;
        }

        family.has_revisions = true;
        family.max_level = family.max_level.max(card.taboo_level);

        let duplicate = family
            .retained
            .is_some_and(|last| cards[last].taboo_equals(card));
        if duplicate {
            keep[position] = false;
            report.dropped.push(card.id.clone());
        } else {
            family.retained = Some(position);
        }
    }

    let mut clones = Vec::new();
    for code in &order {
        let family = &families[code];
        if !family.has_revisions {
            continue;
        }
        let Some(template) = family.template else {
            diagnostics.report(Diagnostic::MissingTabooTemplate { code: code.clone() });
            continue;
        };
        if family.max_level >= latest_level {
            continue;
        }
        let lifted = family
            .retained
            .map_or(true, |last| cards[last].taboo_equals(&cards[template]));
        if lifted {
            continue;
        }

        let original = &cards[template];
        let clone = original.as_taboo_clone(family.max_level + 1);
        remap.insert(clone.id.clone(), original.id.clone());
        report.synthesized.push(clone.id.clone());
        clones.push(clone);
    }

    let mut position = 0;
    cards.retain(|_| {
        let kept = keep[position];
        position += 1;
        kept
    });
    cards.extend(clones);
    canonical_sort(cards, diagnostics);

    debug!(
        dropped = report.dropped.len(),
        synthesized = report.synthesized.len(),
        latest_level,
        "resolved taboo families"
    );
    report
}
