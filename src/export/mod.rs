//! Export adapters.
//!
//! Adapters only read a merged `CardSet`. They go through the set for the
//! visibility filter, bonded companion resolution and image remapping, and
//! never reach into the working list.

pub mod tabular;
pub mod tts;

pub use tabular::TabularExport;
pub use tts::{bonded_ids, bonded_table};
