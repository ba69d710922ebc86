//! Card records, attributes, ordering and indexing.
//!
//! ## Key Types
//!
//! - `Card`: One printed card/variant with identity and relationship fields
//! - `Face`: One side of a card with free-form attributes
//! - `ParallelOrigin`: Provenance of a synthesized parallel hybrid
//! - `OrderKey`: Strict canonical order over a merged set
//! - `CardRegistry`: Id and code lookup over a working list

pub mod attributes;
pub mod card;
pub mod order;
pub mod registry;

pub use attributes::{AttributeKey, AttributeValue, Attributes};
pub use card::{parallel_id, taboo_id, Card, Face, ParallelOrigin, PARALLEL_SEPARATOR, TABOO_MARKER};
pub use order::{canonical_sort, card_sort_key, code_sort_key, sort_refs, OrderKey, SUFFIX_STRIDE};
pub use registry::{CardRegistry, CodeSlots};
