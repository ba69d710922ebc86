//! Tab-separated card table.

use std::io::Write;

use crate::config::Configuration;
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::merge::CardSet;
use crate::metadata::{Metadata, MetadataTable};

/// Column headers, in output order.
pub const COLUMNS: &[&str] = &[
    "id",
    "code",
    "name",
    "pack",
    "position",
    "quantity",
    "taboo_level",
    "bonded",
    "parallel",
    "image_id",
];

/// Writes the visible cards of a set as a TSV table.
#[derive(Clone, Copy, Debug)]
pub struct TabularExport<'a> {
    set: &'a CardSet,
    config: &'a Configuration,
    metadata: &'a Metadata,
}

impl<'a> TabularExport<'a> {
    #[must_use]
    pub fn new(set: &'a CardSet, config: &'a Configuration, metadata: &'a Metadata) -> Self {
        Self {
            set,
            config,
            metadata,
        }
    }

    /// Write the header and one row per visible card.
    ///
    /// Returns the number of card rows written.
    pub fn write<W: Write>(&self, mut out: W, diagnostics: &mut Diagnostics) -> Result<usize> {
        writeln!(out, "{}", COLUMNS.join("\t"))?;

        let mut rows = 0;
        for card in self.set.visible(self.config) {
            let pack = self
                .metadata
                .name(MetadataTable::Pack, &card.pack_code, diagnostics);
            let bonded: Vec<&str> = self
                .set
                .bonded_companions(card, card.taboo_level)
                .into_iter()
                .filter(|c| self.config.is_included(c))
                .map(|c| c.id.as_str())
                .collect();

            let row = [
                card.id.clone(),
                card.code.clone(),
                card.name().to_string(),
                pack,
                card.position.to_string(),
                card.quantity.to_string(),
                card.taboo_level.to_string(),
                bonded.join(","),
                if card.parallel_content { "1" } else { "0" }.to_string(),
                self.set.image_id(card).to_string(),
            ];
            let cells: Vec<String> = row.iter().map(|cell| escape(cell)).collect();
            writeln!(out, "{}", cells.join("\t"))?;
            rows += 1;
        }
        out.flush()?;
        Ok(rows)
    }
}

/// Keep a cell on one line and inside its column.
fn escape(cell: &str) -> String {
    cell.replace(['\t', '\n', '\r'], " ")
}
