//! Per-run diagnostic context.
//!
//! Nothing in the merge engine aborts a run. Every unresolvable reference
//! or malformed input is reported here, logged once through `tracing`, and
//! processing continues with the affected card or relationship omitted.
//!
//! A `Diagnostics` value lives for one run and is passed explicitly to the
//! stages that report into it. Identical diagnostics are recorded once.

use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::warn;

use crate::metadata::MetadataTable;

/// Which face of a parallel pairing had no cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PairingSide {
    Regular,
    Parallel,
    Both,
}

impl std::fmt::Display for PairingSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PairingSide::Regular => "regular",
            PairingSide::Parallel => "parallel",
            PairingSide::Both => "regular and parallel",
        })
    }
}

/// A recoverable problem found while building the card set.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum Diagnostic {
    /// A card's `back_link_id` names no record.
    #[error("card {card_id} links to missing back face {back_id}")]
    MissingBackLink { card_id: String, back_id: String },

    /// A code has taboo revisions but no level-0 original to clone from.
    #[error("code {code} has taboo revisions but no original to clone")]
    MissingTabooTemplate { code: String },

    /// A parallel pairing combination has no cards on one side.
    #[error("parallel pairing {regular_code}/{parallel_code} has no {missing} cards")]
    MissingParallelSide {
        regular_code: String,
        parallel_code: String,
        missing: PairingSide,
    },

    /// A flipped id names no card.
    #[error("flipped id {card_id} matches no card")]
    MissingFlipTarget { card_id: String },

    /// A flipped card has no back face.
    #[error("flipped card {card_id} has no back face")]
    MissingBackFace { card_id: String },

    /// An override names no card.
    #[error("override for {card_id} matches no card")]
    UnknownOverrideTarget { card_id: String },

    /// An override patch could not be applied.
    #[error("override for {card_id} rejected: {reason}")]
    InvalidOverride { card_id: String, reason: String },

    /// A second record with an id already present.
    #[error("duplicate card id {card_id}, later record dropped")]
    DuplicateCardId { card_id: String },

    /// A code with no entry in a metadata table.
    #[error("unknown {table} code {code}")]
    UnknownMetadataCode { table: MetadataTable, code: String },

    /// A card whose catalog code cannot be turned into a sort key.
    #[error("card {card_id} has unparseable code {code:?}, sorted first")]
    UnresolvableCode { card_id: String, code: String },

    /// A feed field name nothing maps.
    #[error("unhandled feed field {field}")]
    UnhandledField { field: String },

    /// A feed record that could not be decoded.
    #[error("feed record {index} skipped: {reason}")]
    MalformedRecord { index: usize, reason: String },
}

impl Diagnostic {
    /// Short machine-readable kind, used as a log field.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Diagnostic::MissingBackLink { .. } => "missing_back_link",
            Diagnostic::MissingTabooTemplate { .. } => "missing_taboo_template",
            Diagnostic::MissingParallelSide { .. } => "missing_parallel_side",
            Diagnostic::MissingFlipTarget { .. } => "missing_flip_target",
            Diagnostic::MissingBackFace { .. } => "missing_back_face",
            Diagnostic::UnknownOverrideTarget { .. } => "unknown_override_target",
            Diagnostic::InvalidOverride { .. } => "invalid_override",
            Diagnostic::DuplicateCardId { .. } => "duplicate_card_id",
            Diagnostic::UnknownMetadataCode { .. } => "unknown_metadata_code",
            Diagnostic::UnresolvableCode { .. } => "unresolvable_code",
            Diagnostic::UnhandledField { .. } => "unhandled_field",
            Diagnostic::MalformedRecord { .. } => "malformed_record",
        }
    }

    /// Whether this is a missing-reference problem.
    #[must_use]
    pub fn is_missing_reference(&self) -> bool {
        matches!(
            self,
            Diagnostic::MissingBackLink { .. }
                | Diagnostic::MissingTabooTemplate { .. }
                | Diagnostic::MissingParallelSide { .. }
                | Diagnostic::MissingFlipTarget { .. }
                | Diagnostic::UnknownOverrideTarget { .. }
                | Diagnostic::UnknownMetadataCode { .. }
        )
    }
}

/// Diagnostics collected during one run.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    seen: FxHashSet<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic. Repeats of an identical diagnostic are ignored.
    ///
    /// Returns `true` if this was the first report.
    pub fn report(&mut self, diagnostic: Diagnostic) -> bool {
        if self.seen.contains(&diagnostic) {
            return false;
        }
        warn!(kind = diagnostic.kind(), "{}", diagnostic);
        self.seen.insert(diagnostic.clone());
        self.entries.push(diagnostic);
        true
    }

    /// All diagnostics in report order.
    #[must_use]
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over diagnostics of one kind.
    pub fn of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.entries.iter().filter(move |d| d.kind() == kind)
    }

    /// Whether any diagnostic's message mentions `needle`.
    #[must_use]
    pub fn mentions(&self, needle: &str) -> bool {
        self.entries.iter().any(|d| d.to_string().contains(needle))
    }
}
