//! Card feed decoding.
//!
//! The external card database publishes a JSON array of flat records, one
//! per printed face. Each record is decoded on its own; a malformed record
//! is reported and skipped rather than failing the whole feed.
//!
//! Field handling:
//! - identity, deckbuilding and face text fields map to `Card` / `Face`;
//! - known game fields land in the face attribute map (`back_*` variants on
//!   the back face);
//! - known presentation-only fields are dropped;
//! - anything else is reported once per run as an unhandled field.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::cards::{taboo_id, AttributeValue, Card, Face};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{CatalogError, Result};

/// Game fields kept as face attributes.
const ATTRIBUTE_FIELDS: &[&str] = &[
    "type_code",
    "subtype_code",
    "faction_code",
    "faction2_code",
    "faction3_code",
    "encounter_code",
    "encounter_position",
    "cost",
    "xp",
    "exceptional",
    "myriad",
    "permanent",
    "is_unique",
    "traits",
    "slot",
    "skill_willpower",
    "skill_intellect",
    "skill_combat",
    "skill_agility",
    "skill_wild",
    "health",
    "sanity",
    "health_per_investigator",
    "enemy_damage",
    "enemy_horror",
    "enemy_fight",
    "enemy_evade",
    "shroud",
    "clues",
    "clues_fixed",
    "doom",
    "stage",
    "victory",
    "vengeance",
    "illustrator",
    "restrictions",
    "deck_requirements",
    "deck_options",
    "customization_text",
    "customization_options",
    "tags",
    "errata_date",
    "exile",
];

/// Presentation fields the catalogue does not need.
const DROPPED_FIELDS: &[&str] = &[
    "url",
    "imagesrc",
    "backimagesrc",
    "pack_name",
    "type_name",
    "subtype_name",
    "faction_name",
    "faction2_name",
    "faction3_name",
    "encounter_name",
    "real_name",
    "real_text",
    "real_back_name",
    "real_back_text",
    "real_traits",
    "real_slot",
    "real_flavor",
    "real_back_flavor",
    "octgn_id",
    "spoiler",
    "duplicated_by",
    "duplicate_of_code",
    "duplicate_of_name",
    "alternate_of_code",
    "alternate_of_name",
    "linked_card",
    "linked_to_code",
    "linked_to_name",
    "bonded_cards",
    "bonded_count",
];

/// Prefix of back-face attribute fields.
const BACK_PREFIX: &str = "back_";

#[derive(Debug, Deserialize)]
struct FeedRecord {
    code: String,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    taboo_level: u32,
    #[serde(default)]
    name: String,
    #[serde(default)]
    subname: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    flavor: Option<String>,
    #[serde(default)]
    back_name: Option<String>,
    #[serde(default)]
    back_text: Option<String>,
    #[serde(default)]
    back_flavor: Option<String>,
    #[serde(default)]
    pack_code: String,
    #[serde(default)]
    position: u32,
    #[serde(default)]
    quantity: u32,
    #[serde(default)]
    deck_limit: Option<u32>,
    #[serde(default)]
    bonded_to: Option<String>,
    #[serde(default)]
    back_link: Option<String>,
    #[serde(default)]
    hidden: Option<bool>,
    #[serde(default)]
    double_sided: bool,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

/// Decode a feed document into cards, in feed order.
///
/// Fails only when the document is not valid JSON or not an array.
pub fn parse_feed(json: &str, diagnostics: &mut Diagnostics) -> Result<Vec<Card>> {
    let document: Value = serde_json::from_str(json)?;
    let Value::Array(records) = document else {
        return Err(CatalogError::InvalidFeed(
            "expected a JSON array of card records".to_string(),
        ));
    };

    let mut cards = Vec::with_capacity(records.len());
    for (index, value) in records.into_iter().enumerate() {
        match serde_json::from_value::<FeedRecord>(value) {
            Ok(record) => cards.push(into_card(record, diagnostics)),
            Err(e) => {
                diagnostics.report(Diagnostic::MalformedRecord {
                    index,
                    reason: e.to_string(),
                });
            }
        }
    }
    Ok(cards)
}

fn into_card(record: FeedRecord, diagnostics: &mut Diagnostics) -> Card {
    let mut front = Face {
        name: record.name,
        subname: record.subname.unwrap_or_default(),
        text: record.text.unwrap_or_default(),
        flavor: record.flavor.unwrap_or_default(),
        ..Face::default()
    };
    let has_back_text = record.back_name.is_some() || record.back_text.is_some();
    let mut back = Face {
        name: record.back_name.unwrap_or_default(),
        text: record.back_text.unwrap_or_default(),
        flavor: record.back_flavor.unwrap_or_default(),
        ..Face::default()
    };

    let mut fields: Vec<(String, Value)> = record.rest.into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    for (field, value) in fields {
        if let Some(back_field) = field.strip_prefix(BACK_PREFIX) {
            if ATTRIBUTE_FIELDS.contains(&back_field) {
                if let Some(value) = AttributeValue::from_json(&value) {
                    back.attributes.insert(back_field.into(), value);
                }
                continue;
            }
        }
        if ATTRIBUTE_FIELDS.contains(&field.as_str()) {
            if let Some(value) = AttributeValue::from_json(&value) {
                front.attributes.insert(field.into(), value);
            }
        } else if !DROPPED_FIELDS.contains(&field.as_str()) {
            diagnostics.report(Diagnostic::UnhandledField { field });
        }
    }

    let id = match record.id {
        Some(id) => id,
        None if record.taboo_level > 0 => taboo_id(&record.code, record.taboo_level),
        None => record.code.clone(),
    };
    let double_sided = record.double_sided || has_back_text || !back.attributes.is_empty();

    Card {
        id,
        code: record.code,
        taboo_level: record.taboo_level,
        pack_code: record.pack_code,
        position: record.position,
        quantity: record.quantity,
        deck_limit: record.deck_limit.unwrap_or(record.quantity),
        bonded_to: record.bonded_to.unwrap_or_default(),
        back_link_id: record.back_link.unwrap_or_default(),
        hidden: record.hidden.unwrap_or(false),
        double_sided,
        parallel_content: false,
        front,
        back: double_sided.then_some(back),
        parallel: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_record() {
        let mut diags = Diagnostics::new();
        let cards = parse_feed(
            r#"[{
                "code": "01016", "name": "Machete", "text": "Fight.",
                "pack_code": "core", "position": 16, "quantity": 2,
                "type_code": "asset", "cost": 3, "traits": "Item. Weapon. Melee.",
                "url": "https://example.invalid/card/01016"
            }]"#,
            &mut diags,
        )
        .unwrap();

        assert_eq!(cards.len(), 1);
        let card = &cards[0];
        assert_eq!(card.id, "01016");
        assert_eq!(card.deck_limit, 2);
        assert_eq!(card.front.get_attr("cost"), Some(&AttributeValue::Int(3)));
        assert!(card.back.is_none());
        assert!(diags.is_empty());
    }

    #[test]
    fn test_back_face_fields() {
        let mut diags = Diagnostics::new();
        let cards = parse_feed(
            r#"[{"code": "01001", "name": "Roland Banks", "back_name": "Roland Banks",
                 "back_text": "Deck size: 30.", "back_traits": "Agency. Detective.",
                 "double_sided": true}]"#,
            &mut diags,
        )
        .unwrap();

        let back = cards[0].back.as_ref().unwrap();
        assert_eq!(back.text, "Deck size: 30.");
        assert_eq!(back.get_attr("traits").and_then(|v| v.as_text()), Some("Agency. Detective."));
    }

    #[test]
    fn test_taboo_record_id() {
        let mut diags = Diagnostics::new();
        let cards = parse_feed(
            r#"[{"code": "01020", "name": "Machete", "taboo_level": 2}]"#,
            &mut diags,
        )
        .unwrap();
        assert_eq!(cards[0].id, "01020-t2");
        assert!(cards[0].is_taboo_revision());
    }

    #[test]
    fn test_unhandled_fields_reported_once() {
        let mut diags = Diagnostics::new();
        parse_feed(
            r#"[{"code": "1", "mystery": 1}, {"code": "2", "mystery": 2}]"#,
            &mut diags,
        )
        .unwrap();
        assert_eq!(diags.of_kind("unhandled_field").count(), 1);
        assert!(diags.mentions("mystery"));
    }

    #[test]
    fn test_malformed_record_skipped() {
        let mut diags = Diagnostics::new();
        let cards = parse_feed(r#"[{"name": "No code"}, {"code": "2"}]"#, &mut diags).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(diags.of_kind("malformed_record").count(), 1);
    }

    #[test]
    fn test_document_shape_errors() {
        let mut diags = Diagnostics::new();
        assert!(matches!(
            parse_feed(r#"{"code": "1"}"#, &mut diags),
            Err(CatalogError::InvalidFeed(_))
        ));
        assert!(matches!(parse_feed("[", &mut diags), Err(CatalogError::Json(_))));
    }

    #[test]
    fn test_null_attributes_skipped() {
        let mut diags = Diagnostics::new();
        let cards = parse_feed(r#"[{"code": "1", "cost": null}]"#, &mut diags).unwrap();
        assert!(cards[0].front.get_attr("cost").is_none());
    }
}
