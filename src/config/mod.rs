//! Merge configuration.
//!
//! The configuration is the declarative rule set that parameterizes the
//! merge engine:
//! - ids to ignore, flip, or skip for bonded lookups
//! - per-id JSON overrides and literal extra cards
//! - parallel pairings
//! - the pack allow-list and named position exclusions used by the
//!   visibility filter
//! - the initial image remap table
//! - export-side bonded id overrides
//!
//! It is never mutated by a run. The engine snapshots `image_remap` and
//! extends its own copy.

pub mod remap;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cards::Card;
use crate::error::Result;

pub use remap::ImageRemap;

/// Two disjoint code sets whose cards are cross-combined into hybrids.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelPairing {
    /// Codes of the regular printings, in configuration order.
    pub regular: Vec<String>,
    /// Codes of the parallel printings, in configuration order.
    pub parallel: Vec<String>,
    /// All hybrids of the pairing share the first regular card's artwork.
    pub same_art: bool,
}

impl ParallelPairing {
    /// Create a pairing.
    pub fn new<R, P>(regular: R, parallel: P) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            regular: regular.into_iter().map(Into::into).collect(),
            parallel: parallel.into_iter().map(Into::into).collect(),
            same_art: false,
        }
    }

    /// Share artwork across the pairing (builder pattern).
    #[must_use]
    pub fn same_art(mut self) -> Self {
        self.same_art = true;
        self
    }
}

/// Cards of one pack whose position lies strictly between two bounds are
/// excluded from output.
///
/// Covers reprint packs that reuse positions belonging to another
/// product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionExclusion {
    pub pack_code: String,
    /// Exclusive lower bound.
    pub after: u32,
    /// Exclusive upper bound.
    pub before: u32,
}

impl PositionExclusion {
    /// Whether `card` falls inside this exclusion.
    #[must_use]
    pub fn excludes(&self, card: &Card) -> bool {
        card.pack_code == self.pack_code
            && card.position > self.after
            && card.position < self.before
    }
}

fn default_position_exclusions() -> Vec<PositionExclusion> {
    vec![PositionExclusion {
        pack_code: "rcore".to_string(),
        after: 103,
        before: 183,
    }]
}

/// The merge rule set.
///
/// ## Example
///
/// ```
/// use ccg_catalog::config::{Configuration, ParallelPairing};
///
/// let config = Configuration::default()
///     .with_packs(["core", "dwl"])
///     .with_ignored("01000")
///     .with_pairing(ParallelPairing::new(["01001"], ["90024"]));
///
/// assert!(config.ignored_ids.contains("01000"));
/// assert_eq!(config.parallel_pairings.len(), 1);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Records dropped before merging.
    pub ignored_ids: FxHashSet<String>,

    /// Cards whose front and back are swapped.
    pub flipped_ids: FxHashSet<String>,

    /// Cards that never report bonded companions.
    pub skip_bonded_ids: FxHashSet<String>,

    /// Card id → JSON merge patch over the card's serialized form.
    pub overrides: FxHashMap<String, Value>,

    /// Literal card definitions appended to the feed.
    pub extra_cards: Vec<Card>,

    /// Packs whose cards are exported.
    pub packs: FxHashSet<String>,

    pub parallel_pairings: Vec<ParallelPairing>,

    /// Initial image remap entries.
    pub image_remap: ImageRemap,

    pub position_exclusions: Vec<PositionExclusion>,

    /// Card id → bonded ids to publish instead of the resolved companions.
    ///
    /// Used by the tabletop export for cards whose companions are printed
    /// as separate investigator-style records.
    pub bonded_id_overrides: FxHashMap<String, Vec<String>>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            ignored_ids: FxHashSet::default(),
            flipped_ids: FxHashSet::default(),
            skip_bonded_ids: FxHashSet::default(),
            overrides: FxHashMap::default(),
            extra_cards: Vec::new(),
            packs: FxHashSet::default(),
            parallel_pairings: Vec::new(),
            image_remap: ImageRemap::default(),
            position_exclusions: default_position_exclusions(),
            bonded_id_overrides: FxHashMap::default(),
        }
    }
}

impl Configuration {
    /// Load a configuration from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Allow packs (builder pattern).
    #[must_use]
    pub fn with_packs<I>(mut self, packs: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.packs.extend(packs.into_iter().map(Into::into));
        self
    }

    /// Ignore an id (builder pattern).
    #[must_use]
    pub fn with_ignored(mut self, id: impl Into<String>) -> Self {
        self.ignored_ids.insert(id.into());
        self
    }

    /// Flip an id (builder pattern).
    #[must_use]
    pub fn with_flipped(mut self, id: impl Into<String>) -> Self {
        self.flipped_ids.insert(id.into());
        self
    }

    /// Skip bonded lookups for an id (builder pattern).
    #[must_use]
    pub fn with_skip_bonded(mut self, id: impl Into<String>) -> Self {
        self.skip_bonded_ids.insert(id.into());
        self
    }

    /// Add an override patch (builder pattern).
    #[must_use]
    pub fn with_override(mut self, id: impl Into<String>, patch: Value) -> Self {
        self.overrides.insert(id.into(), patch);
        self
    }

    /// Add an extra card (builder pattern).
    #[must_use]
    pub fn with_extra_card(mut self, card: Card) -> Self {
        self.extra_cards.push(card);
        self
    }

    /// Add a parallel pairing (builder pattern).
    #[must_use]
    pub fn with_pairing(mut self, pairing: ParallelPairing) -> Self {
        self.parallel_pairings.push(pairing);
        self
    }

    /// Add an image remap entry (builder pattern).
    #[must_use]
    pub fn with_image_remap(mut self, id: impl Into<String>, source: impl Into<String>) -> Self {
        self.image_remap.insert(id, source);
        self
    }

    /// Add a bonded id override (builder pattern).
    #[must_use]
    pub fn with_bonded_override<I>(mut self, id: impl Into<String>, bonded: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.bonded_id_overrides
            .insert(id.into(), bonded.into_iter().map(Into::into).collect());
        self
    }

    /// Whether a card appears in exports.
    ///
    /// Included iff not hidden, its pack is allowed, and no position
    /// exclusion covers it.
    #[must_use]
    pub fn is_included(&self, card: &Card) -> bool {
        !card.hidden
            && self.packs.contains(&card.pack_code)
            && !self.position_exclusions.iter().any(|e| e.excludes(card))
    }
}
