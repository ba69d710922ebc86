//! Read-only code → display name lookups.
//!
//! Metadata maps the external codes carried on cards (pack, cycle,
//! encounter set, taboo set, type, faction, subtype) to display names and
//! supplies the latest taboo level the merge engine fills gaps up to.
//!
//! Unknown codes fall back to the code itself and are reported once per
//! run through `Diagnostics`.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::Result;

/// The lookup tables metadata carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetadataTable {
    Pack,
    Cycle,
    EncounterSet,
    TabooSet,
    Type,
    Faction,
    Subtype,
}

impl std::fmt::Display for MetadataTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            MetadataTable::Pack => "pack",
            MetadataTable::Cycle => "cycle",
            MetadataTable::EncounterSet => "encounter set",
            MetadataTable::TabooSet => "taboo set",
            MetadataTable::Type => "type",
            MetadataTable::Faction => "faction",
            MetadataTable::Subtype => "subtype",
        })
    }
}

/// A pack entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackInfo {
    pub name: String,
    pub cycle_code: String,
    /// Release position within the cycle.
    pub position: u32,
}

/// Catalogue metadata.
///
/// ## Example
///
/// ```
/// use ccg_catalog::diagnostics::Diagnostics;
/// use ccg_catalog::metadata::{Metadata, MetadataTable};
///
/// let metadata = Metadata::new()
///     .with_pack("core", "Core Set", "core")
///     .with_taboo_set(1, "Taboo List 1.0");
///
/// let mut diags = Diagnostics::new();
/// assert_eq!(metadata.name(MetadataTable::Pack, "core", &mut diags), "Core Set");
/// assert_eq!(metadata.latest_taboo_level(), 1);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub packs: FxHashMap<String, PackInfo>,
    pub cycles: FxHashMap<String, String>,
    pub encounter_sets: FxHashMap<String, String>,
    /// Taboo level → taboo set name.
    pub taboo_sets: FxHashMap<u32, String>,
    pub types: FxHashMap<String, String>,
    pub factions: FxHashMap<String, String>,
    pub subtypes: FxHashMap<String, String>,
    /// Overrides the level derived from `taboo_sets`.
    pub latest_taboo_level: Option<u32>,
}

impl Metadata {
    /// Create empty metadata.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load metadata from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Add a pack (builder pattern).
    #[must_use]
    pub fn with_pack(
        mut self,
        code: impl Into<String>,
        name: impl Into<String>,
        cycle_code: impl Into<String>,
    ) -> Self {
        let position = self.packs.len() as u32 + 1;
        self.packs.insert(
            code.into(),
            PackInfo {
                name: name.into(),
                cycle_code: cycle_code.into(),
                position,
            },
        );
        self
    }

    /// Add a taboo set (builder pattern).
    #[must_use]
    pub fn with_taboo_set(mut self, level: u32, name: impl Into<String>) -> Self {
        self.taboo_sets.insert(level, name.into());
        self
    }

    /// Add a name to one of the string-keyed tables (builder pattern).
    ///
    /// `Pack` and `TabooSet` entries go through `with_pack` and
    /// `with_taboo_set`; for those tables this is a no-op.
    #[must_use]
    pub fn with_name(
        mut self,
        table: MetadataTable,
        code: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let map = match table {
            MetadataTable::Cycle => &mut self.cycles,
            MetadataTable::EncounterSet => &mut self.encounter_sets,
            MetadataTable::Type => &mut self.types,
            MetadataTable::Faction => &mut self.factions,
            MetadataTable::Subtype => &mut self.subtypes,
            MetadataTable::Pack | MetadataTable::TabooSet => return self,
        };
        map.insert(code.into(), name.into());
        self
    }

    /// Pin the latest taboo level (builder pattern).
    #[must_use]
    pub fn with_latest_taboo_level(mut self, level: u32) -> Self {
        self.latest_taboo_level = Some(level);
        self
    }

    /// Newest taboo level known, 0 when there are no taboo sets.
    #[must_use]
    pub fn latest_taboo_level(&self) -> u32 {
        self.latest_taboo_level
            .unwrap_or_else(|| self.taboo_sets.keys().copied().max().unwrap_or(0))
    }

    /// Display name for a code, without reporting misses.
    #[must_use]
    pub fn lookup(&self, table: MetadataTable, code: &str) -> Option<&str> {
        match table {
            MetadataTable::Pack => self.packs.get(code).map(|p| p.name.as_str()),
            MetadataTable::TabooSet => code
                .parse::<u32>()
                .ok()
                .and_then(|level| self.taboo_sets.get(&level))
                .map(String::as_str),
            MetadataTable::Cycle => self.cycles.get(code).map(String::as_str),
            MetadataTable::EncounterSet => self.encounter_sets.get(code).map(String::as_str),
            MetadataTable::Type => self.types.get(code).map(String::as_str),
            MetadataTable::Faction => self.factions.get(code).map(String::as_str),
            MetadataTable::Subtype => self.subtypes.get(code).map(String::as_str),
        }
    }

    /// Display name for a code, falling back to the code itself.
    ///
    /// Empty codes resolve to an empty name without a report.
    pub fn name(&self, table: MetadataTable, code: &str, diagnostics: &mut Diagnostics) -> String {
        if code.is_empty() {
            return String::new();
        }
        match self.lookup(table, code) {
            Some(name) => name.to_string(),
            None => {
                diagnostics.report(Diagnostic::UnknownMetadataCode {
                    table,
                    code: code.to_string(),
                });
                code.to_string()
            }
        }
    }

    /// Cycle name of a pack.
    pub fn cycle_of_pack(&self, pack_code: &str, diagnostics: &mut Diagnostics) -> String {
        match self.packs.get(pack_code) {
            Some(pack) => self.name(MetadataTable::Cycle, &pack.cycle_code, diagnostics),
            None => {
                diagnostics.report(Diagnostic::UnknownMetadataCode {
                    table: MetadataTable::Pack,
                    code: pack_code.to_string(),
                });
                String::new()
            }
        }
    }
}
