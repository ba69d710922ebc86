//! Taboo resolution integration tests.
//!
//! These tests run taboo families through the full merge engine:
//! - duplicate revisions are dropped
//! - lifted errata get a carry-forward clone at the next level
//! - resolution is idempotent

use ccg_catalog::cards::{Card, Face};
use ccg_catalog::config::{Configuration, ImageRemap};
use ccg_catalog::diagnostics::Diagnostics;
use ccg_catalog::merge::{taboo, MergeEngine};
use ccg_catalog::metadata::Metadata;

fn revision(level: u32, text: &str) -> Card {
    let face = Face::named("Lucky Cigarette Case").with_text(text).with_attr("cost", 2i32);
    let card = if level == 0 {
        Card::new("02107", face)
    } else {
        Card::taboo_revision("02107", level, face)
    };
    card.with_pack("dwl", 107)
}

fn ids(cards: &[Card]) -> Vec<&str> {
    cards.iter().map(|c| c.id.as_str()).collect()
}

/// Test the documented dedup + gap-fill case end to end.
#[test]
fn test_dedup_and_gap_fill_through_engine() {
    let config = Configuration::default().with_packs(["dwl"]);
    let metadata = Metadata::new()
        .with_taboo_set(1, "Taboo 1")
        .with_taboo_set(2, "Taboo 2")
        .with_taboo_set(3, "Taboo 3");
    let mut diags = Diagnostics::new();

    let raw = vec![
        revision(2, "Draw 2. Exile."),
        revision(0, "Draw 1."),
        revision(1, "Draw 1."),
    ];
    let set = MergeEngine::new(&config, &metadata).run(raw, &mut diags);

    let got: Vec<&str> = set.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(got, vec!["02107", "02107-t2", "02107-t3"]);

    let clone = set.get("02107-t3").expect("clone synthesized");
    assert_eq!(clone.taboo_level, 3);
    assert_eq!(clone.front.text, "Draw 1.");
    assert_eq!(set.image_id(clone), "02107");
    assert_eq!(set.image_remap().get("02107-t3"), Some("02107"));
    assert!(diags.is_empty(), "{:?}", diags.entries());
}

/// Test that the configured remap table is not mutated by a run.
#[test]
fn test_configuration_remap_untouched() {
    let config = Configuration::default().with_image_remap("x", "y");
    let metadata = Metadata::new().with_latest_taboo_level(3);
    let mut diags = Diagnostics::new();

    let raw = vec![revision(0, "Draw 1."), revision(1, "Draw 2.")];
    let set = MergeEngine::new(&config, &metadata).run(raw, &mut diags);

    assert_eq!(config.image_remap.len(), 1);
    assert_eq!(set.image_remap().len(), 2);
    assert_eq!(set.image_remap().get("x"), Some("y"));
}

/// Test that resolving an already-resolved list is a no-op.
#[test]
fn test_resolution_idempotent() {
    let mut cards = vec![
        revision(0, "Draw 1."),
        revision(1, "Draw 1."),
        revision(2, "Draw 2. Exile."),
        Card::new("02108", Face::named("Other")),
    ];
    let mut remap = ImageRemap::new();
    let mut diags = Diagnostics::new();

    taboo::resolve(&mut cards, 5, &mut remap, &mut diags);
    let resolved = cards.clone();
    let remap_after_first = remap.clone();

    for _ in 0..3 {
        let report = taboo::resolve(&mut cards, 5, &mut remap, &mut diags);
        assert!(report.dropped.is_empty());
        assert!(report.synthesized.is_empty());
    }
    assert_eq!(cards, resolved);
    assert_eq!(ids(&cards), vec!["02107", "02107-t2", "02107-t3", "02108"]);
    assert_eq!(remap, remap_after_first);
}

/// Test that a family without an original degrades locally.
#[test]
fn test_missing_template_does_not_abort() {
    let config = Configuration::default();
    let metadata = Metadata::new().with_latest_taboo_level(2);
    let mut diags = Diagnostics::new();

    let raw = vec![revision(1, "Draw 2."), Card::new("02108", Face::named("Other"))];
    let set = MergeEngine::new(&config, &metadata).run(raw, &mut diags);

    assert_eq!(set.len(), 2);
    assert!(diags.mentions("02107"));
    assert_eq!(diags.of_kind("missing_taboo_template").count(), 1);
}
