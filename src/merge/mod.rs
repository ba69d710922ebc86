//! Normalization and merge engine.
//!
//! Turns raw catalogue records into the authoritative card set. Stages run
//! in strict sequence over one owned working list:
//!
//! 1. `overrides`: configuration-driven cleanup (extras, ignores,
//!    overrides, flips, back links)
//! 2. canonical sort
//! 3. `taboo`: drop duplicate errata revisions, fill the gap to the latest
//!    taboo level
//! 4. `parallel`: synthesize parallel hybrids
//! 5. canonical sort
//! 6. `bonded`: group bonded companions by owner name
//!
//! No stage aborts the run. Problems are reported to `Diagnostics` and the
//! affected card or relationship is left out.

pub mod bonded;
pub mod card_set;
pub mod overrides;
pub mod parallel;
pub mod taboo;

use tracing::info;

use crate::cards::{canonical_sort, Card};
use crate::config::Configuration;
use crate::diagnostics::Diagnostics;
use crate::metadata::Metadata;

pub use bonded::BondedIndex;
pub use card_set::CardSet;
pub use parallel::ParallelIndex;
pub use taboo::TabooReport;

/// Runs the merge pipeline for one configuration and metadata pair.
///
/// ## Example
///
/// ```
/// use ccg_catalog::cards::{Card, Face};
/// use ccg_catalog::config::Configuration;
/// use ccg_catalog::diagnostics::Diagnostics;
/// use ccg_catalog::merge::MergeEngine;
/// use ccg_catalog::metadata::Metadata;
///
/// let config = Configuration::default().with_packs(["core"]);
/// let metadata = Metadata::new();
/// let mut diags = Diagnostics::new();
///
/// let raw = vec![
///     Card::new("01002", Face::named("Daisy Walker")).with_pack("core", 2),
///     Card::new("01001", Face::named("Roland Banks")).with_pack("core", 1),
/// ];
/// let set = MergeEngine::new(&config, &metadata).run(raw, &mut diags);
///
/// let names: Vec<&str> = set.iter().map(|c| c.name()).collect();
/// assert_eq!(names, ["Roland Banks", "Daisy Walker"]);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct MergeEngine<'a> {
    config: &'a Configuration,
    metadata: &'a Metadata,
}

impl<'a> MergeEngine<'a> {
    /// Create an engine.
    #[must_use]
    pub fn new(config: &'a Configuration, metadata: &'a Metadata) -> Self {
        Self { config, metadata }
    }

    /// Merge raw records into the final card set.
    pub fn run(&self, raw: Vec<Card>, diagnostics: &mut Diagnostics) -> CardSet {
        let raw_count = raw.len();
        let mut image_remap = self.config.image_remap.clone();

        let mut cards = overrides::normalize(raw, self.config, diagnostics);
        canonical_sort(&mut cards, diagnostics);

        let taboo = taboo::resolve(
            &mut cards,
            self.metadata.latest_taboo_level(),
            &mut image_remap,
            diagnostics,
        );

        let parallel = parallel::synthesize(
            &mut cards,
            &self.config.parallel_pairings,
            &mut image_remap,
            diagnostics,
        );
        canonical_sort(&mut cards, diagnostics);

        let bonded = BondedIndex::build(&cards, &self.config.skip_bonded_ids);

        info!(
            raw = raw_count,
            cards = cards.len(),
            taboo_dropped = taboo.dropped.len(),
            taboo_clones = taboo.synthesized.len(),
            bonded_owners = bonded.len(),
            diagnostics = diagnostics.len(),
            "merged card set"
        );
        CardSet::new(cards, bonded, parallel, image_remap)
    }
}
