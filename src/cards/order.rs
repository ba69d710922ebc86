//! Canonical card ordering.
//!
//! The catalog position of a code is `number * 100 + (letter - 'a')` for a
//! code made of a numeric prefix and at most one trailing letter, so
//! `"10" < "10b" < "10c" < "11"`. A parallel hybrid is positioned after its
//! regular side by its ordinal.
//!
//! `OrderKey` extends the position with taboo level and id so that the
//! order is strict over a merged set. Keys are computed once per sort,
//! never cached on the card.

use super::card::Card;
use crate::diagnostics::{Diagnostic, Diagnostics};

/// Positions reserved per numbered card for lettered variants and hybrids.
pub const SUFFIX_STRIDE: u64 = 100;

/// Catalog position of a code, or `None` if it cannot be parsed.
///
/// ```
/// use ccg_catalog::cards::code_sort_key;
///
/// assert_eq!(code_sort_key("123"), Some(12300));
/// assert_eq!(code_sort_key("123b"), Some(12301));
/// assert_eq!(code_sort_key("abc"), None);
/// ```
#[must_use]
pub fn code_sort_key(code: &str) -> Option<u64> {
    let code = code.trim();
    let digits_end = code
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(code.len());
    if digits_end == 0 {
        return None;
    }

    let number: u64 = code[..digits_end].parse().ok()?;
    let mut suffix = code[digits_end..].chars();
    let offset = match (suffix.next(), suffix.next()) {
        (None, _) => 0,
        (Some(letter), None) if letter.is_ascii_alphabetic() => {
            u64::from(letter.to_ascii_lowercase() as u8 - b'a')
        }
        _ => return None,
    };

    number.checked_mul(SUFFIX_STRIDE)?.checked_add(offset)
}

/// Catalog position of a card.
///
/// Parallel hybrids are anchored on their regular side's code.
#[must_use]
pub fn card_sort_key(card: &Card) -> Option<u64> {
    match &card.parallel {
        Some(origin) => {
            code_sort_key(&origin.regular_code).map(|key| key + u64::from(origin.ordinal))
        }
        None => code_sort_key(&card.code),
    }
}

/// Strict total order key for a card.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderKey {
    /// Catalog position, 0 when the code is unresolvable.
    pub position: u64,
    pub taboo_level: u32,
    pub id: String,
}

impl OrderKey {
    /// Key for a card; unresolvable codes sort first.
    #[must_use]
    pub fn of(card: &Card) -> Self {
        Self {
            position: card_sort_key(card).unwrap_or(0),
            taboo_level: card.taboo_level,
            id: card.id.clone(),
        }
    }

    /// Key for a card, reporting an unresolvable code.
    pub fn resolve(card: &Card, diagnostics: &mut Diagnostics) -> Self {
        if card_sort_key(card).is_none() {
            diagnostics.report(Diagnostic::UnresolvableCode {
                card_id: card.id.clone(),
                code: card.code.clone(),
            });
        }
        Self::of(card)
    }
}

/// Sort cards into canonical order in place.
pub fn canonical_sort(cards: &mut Vec<Card>, diagnostics: &mut Diagnostics) {
    let mut keyed: Vec<(OrderKey, Card)> = std::mem::take(cards)
        .into_iter()
        .map(|card| (OrderKey::resolve(&card, diagnostics), card))
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    cards.extend(keyed.into_iter().map(|(_, card)| card));
}

/// Sort borrowed cards into canonical order.
pub fn sort_refs(cards: &mut [&Card]) {
    cards.sort_by_cached_key(|card| OrderKey::of(card));
}
