//! Pre-merge normalization driven by the configuration.
//!
//! Applied in order:
//! 1. duplicate ids dropped (first record wins)
//! 2. extra cards appended
//! 3. ignored ids removed
//! 4. JSON overrides merged into matching cards
//! 5. flipped ids get their faces swapped
//! 6. back links resolved: the linked record's front becomes this card's
//!    back and the linked record is hidden

use rustc_hash::FxHashSet;
use serde_json::Value;
use tracing::debug;

use crate::cards::{Card, CardRegistry};
use crate::config::Configuration;
use crate::diagnostics::{Diagnostic, Diagnostics};

/// Run every normalization step over the raw list.
pub fn normalize(
    raw: Vec<Card>,
    config: &Configuration,
    diagnostics: &mut Diagnostics,
) -> Vec<Card> {
    let mut cards = dedupe_ids(raw, diagnostics);
    append_extra_cards(&mut cards, &config.extra_cards, diagnostics);
    remove_ignored(&mut cards, config);
    apply_overrides(&mut cards, config, diagnostics);
    apply_flips(&mut cards, config, diagnostics);
    resolve_back_links(&mut cards, diagnostics);
    cards
}

fn dedupe_ids(raw: Vec<Card>, diagnostics: &mut Diagnostics) -> Vec<Card> {
    let mut seen = FxHashSet::default();
    let mut cards = Vec::with_capacity(raw.len());
    for card in raw {
        if seen.insert(card.id.clone()) {
            cards.push(card);
        } else {
            diagnostics.report(Diagnostic::DuplicateCardId { card_id: card.id });
        }
    }
    cards
}

fn append_extra_cards(cards: &mut Vec<Card>, extra: &[Card], diagnostics: &mut Diagnostics) {
    let mut seen: FxHashSet<String> = cards.iter().map(|c| c.id.clone()).collect();
    for card in extra {
        if seen.insert(card.id.clone()) {
            cards.push(card.clone());
        } else {
            diagnostics.report(Diagnostic::DuplicateCardId {
                card_id: card.id.clone(),
            });
        }
    }
    debug!(count = extra.len(), "appended extra cards");
}

fn remove_ignored(cards: &mut Vec<Card>, config: &Configuration) {
    let before = cards.len();
    cards.retain(|card| !config.ignored_ids.contains(&card.id));
    debug!(removed = before - cards.len(), "removed ignored cards");
}

fn apply_overrides(cards: &mut [Card], config: &Configuration, diagnostics: &mut Diagnostics) {
    let registry = CardRegistry::index(cards);

    // Sorted so diagnostics come out in a stable order.
    let mut ids: Vec<&String> = config.overrides.keys().collect();
    ids.sort();

    for id in ids {
        let Some(position) = registry.position(id) else {
            diagnostics.report(Diagnostic::UnknownOverrideTarget { card_id: id.clone() });
            continue;
        };
        match apply_patch(&cards[position], &config.overrides[id]) {
            Ok(patched) => cards[position] = patched,
            Err(reason) => {
                diagnostics.report(Diagnostic::InvalidOverride {
                    card_id: id.clone(),
                    reason,
                });
            }
        }
    }
}

/// Apply a JSON merge patch to a card.
///
/// A patch may not change the card's id.
pub fn apply_patch(card: &Card, patch: &Value) -> Result<Card, String> {
    if !patch.is_object() {
        return Err("patch is not a JSON object".to_string());
    }
    let mut value = serde_json::to_value(card).map_err(|e| e.to_string())?;
    merge_json(&mut value, patch);
    let patched: Card = serde_json::from_value(value).map_err(|e| e.to_string())?;
    if patched.id != card.id {
        return Err(format!("patch changes id to {:?}", patched.id));
    }
    Ok(patched)
}

/// Recursive JSON merge: objects merge key by key, anything else replaces.
/// A `null` in the patch removes the key.
pub fn merge_json(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                if value.is_null() {
                    target.remove(key);
                } else {
                    merge_json(target.entry(key.clone()).or_insert(Value::Null), value);
                }
            }
        }
        (target, patch) => *target = patch.clone(),
    }
}

fn apply_flips(cards: &mut [Card], config: &Configuration, diagnostics: &mut Diagnostics) {
    let registry = CardRegistry::index(cards);

    let mut ids: Vec<&String> = config.flipped_ids.iter().collect();
    ids.sort();

    for id in ids {
        let Some(position) = registry.position(id) else {
            diagnostics.report(Diagnostic::MissingFlipTarget { card_id: id.clone() });
            continue;
        };
        match cards[position].with_flipped_sides() {
            Some(flipped) => cards[position] = flipped,
            None => {
                diagnostics.report(Diagnostic::MissingBackFace { card_id: id.clone() });
            }
        }
    }
}

fn resolve_back_links(cards: &mut [Card], diagnostics: &mut Diagnostics) {
    let registry = CardRegistry::index(cards);

    for position in 0..cards.len() {
        let back_id = cards[position].back_link_id.clone();
        if back_id.is_empty() {
            continue;
        }
        let Some(back_position) = registry.position(&back_id) else {
            diagnostics.report(Diagnostic::MissingBackLink {
                card_id: cards[position].id.clone(),
                back_id,
            });
            continue;
        };
        if back_position == position {
            continue;
        }

        let back_face = cards[back_position].front.clone();
        cards[position] = cards[position].clone().with_back(back_face);
        cards[back_position] = cards[back_position].clone().hidden();
    }
}
