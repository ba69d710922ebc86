//! Image id remapping.
//!
//! Synthetic cards (taboo clones, parallel hybrids) reuse artwork from a
//! source card. The remap table points a card id at the id whose image
//! should be used. Backed by `im::HashMap` so a run can take an O(1)
//! snapshot of the configured table and extend it without touching the
//! configuration.

use im::HashMap as ImHashMap;
use serde::{Deserialize, Serialize};

/// Longest remap chain followed before giving up.
const MAX_CHAIN: usize = 16;

/// Card id → image source id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRemap(ImHashMap<String, String>);

impl ImageRemap {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Point `id` at `source`'s artwork.
    pub fn insert(&mut self, id: impl Into<String>, source: impl Into<String>) {
        self.0.insert(id.into(), source.into());
    }

    /// Add a mapping (builder pattern).
    #[must_use]
    pub fn with(mut self, id: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(id, source);
        self
    }

    /// Direct mapping for `id`, if any.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    /// Final image id for `id`, following chained mappings.
    ///
    /// Chains longer than a fixed bound (including cycles) stop at the last
    /// id reached.
    #[must_use]
    pub fn resolve<'a>(&'a self, id: &'a str) -> &'a str {
        let mut current = id;
        for _ in 0..MAX_CHAIN {
            match self.0.get(current).map(String::as_str) {
                Some(next) if next != current => current = next,
                _ => break,
            }
        }
        current
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(id, source)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_direct_and_identity() {
        let remap = ImageRemap::new().with("01020-t3", "01020");
        assert_eq!(remap.resolve("01020-t3"), "01020");
        assert_eq!(remap.resolve("01021"), "01021");
        assert_eq!(remap.get("01021"), None);
    }

    #[test]
    fn test_resolve_chain() {
        let remap = ImageRemap::new()
            .with("90024+01001-t2", "01001-t2")
            .with("01001-t2", "01001");
        assert_eq!(remap.resolve("90024+01001-t2"), "01001");
    }

    #[test]
    fn test_resolve_cycle_terminates() {
        let remap = ImageRemap::new().with("a", "b").with("b", "a");
        let resolved = remap.resolve("a");
        assert!(resolved == "a" || resolved == "b");
    }

    #[test]
    fn test_snapshot_is_independent() {
        let base = ImageRemap::new().with("x", "y");
        let mut run = base.clone();
        run.insert("z", "y");
        assert_eq!(base.len(), 1);
        assert_eq!(run.len(), 2);
    }

    #[test]
    fn test_serde_as_plain_object() {
        let remap: ImageRemap = serde_json::from_str(r#"{"a": "b"}"#).unwrap();
        assert_eq!(remap.get("a"), Some("b"));
    }
}
