//! Bonded id table for the tabletop simulator mod.
//!
//! Maps each visible card that has bonded companions to the ids of those
//! companions at the card's own taboo level. Companions hidden by the
//! visibility filter are left out. A configured `bonded_id_overrides` entry
//! replaces the resolved list for its card.

use serde_json::{Map, Value};

use crate::cards::Card;
use crate::config::Configuration;
use crate::merge::CardSet;

/// Bonded ids published for one card.
#[must_use]
pub fn bonded_ids(set: &CardSet, config: &Configuration, card: &Card) -> Vec<String> {
    if let Some(ids) = config.bonded_id_overrides.get(&card.id) {
        return ids.clone();
    }
    set.bonded_companions(card, card.taboo_level)
        .into_iter()
        .filter(|c| config.is_included(c))
        .map(|c| c.id.clone())
        .collect()
}

/// JSON object of card id → bonded ids, in canonical card order.
#[must_use]
pub fn bonded_table(set: &CardSet, config: &Configuration) -> Value {
    let mut table = Map::new();
    for card in set.visible(config) {
        let overridden = config.bonded_id_overrides.contains_key(&card.id);
        if !overridden && !set.has_bonded(card) {
            continue;
        }
        let ids = bonded_ids(set, config, card);
        if ids.is_empty() {
            continue;
        }
        table.insert(
            card.id.clone(),
            Value::Array(ids.into_iter().map(Value::String).collect()),
        );
    }
    Value::Object(table)
}
