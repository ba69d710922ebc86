//! # ccg-catalog
//!
//! Card catalogue normalization and merge engine.
//!
//! Takes raw per-face records from an external card database, plus a small
//! declarative configuration, and produces one canonical, de-duplicated,
//! ordered card set for downstream exports.
//!
//! ## Design Principles
//!
//! 1. **Immutable Cards**: A `Card` is a value. Flips, taboo clones and
//!    parallel hybrids are new values built by transformation methods.
//!
//! 2. **Never Abort**: Missing references and malformed input are reported
//!    to a per-run `Diagnostics` context; the affected card or relationship
//!    is left out and the run completes.
//!
//! 3. **Strict Canonical Order**: Every card has a total order key derived
//!    from its catalog code, taboo level and id, recomputed on each sort.
//!
//! ## Pipeline
//!
//! raw records → `overrides` → sort → `taboo` → `parallel` → sort →
//! `bonded` → `CardSet`
//!
//! ## Modules
//!
//! - `cards`: Card records, attributes, canonical order, registry
//! - `config`: Merge rule set, image remap, visibility filter
//! - `metadata`: Code → display name lookups, latest taboo level
//! - `diagnostics`: Per-run recoverable problem reports
//! - `error`: Fatal errors for loading and export surfaces
//! - `feed`: Card feed decoding
//! - `merge`: The normalization and merge engine
//! - `export`: Reference export adapters

pub mod cards;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod export;
pub mod feed;
pub mod merge;
pub mod metadata;

// Re-export commonly used types
pub use crate::cards::{
    canonical_sort, code_sort_key, AttributeKey, AttributeValue, Attributes, Card, CardRegistry,
    Face, OrderKey, ParallelOrigin,
};

pub use crate::config::{Configuration, ImageRemap, ParallelPairing, PositionExclusion};

pub use crate::diagnostics::{Diagnostic, Diagnostics, PairingSide};

pub use crate::error::{CatalogError, Result};

pub use crate::feed::parse_feed;

pub use crate::merge::{BondedIndex, CardSet, MergeEngine, ParallelIndex, TabooReport};

pub use crate::metadata::{Metadata, MetadataTable, PackInfo};
