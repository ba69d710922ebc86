//! Card records - one printed face/variant from the catalogue.
//!
//! `Card` is a plain value. The merge engine never mutates a card in
//! place; every derived variant (flipped, taboo clone, parallel hybrid) is
//! produced by a transformation method returning a new `Card`.

use serde::{Deserialize, Serialize};

use super::attributes::{AttributeKey, AttributeValue, Attributes};

/// Marker separating a catalog code from its taboo level inside an id.
pub const TABOO_MARKER: &str = "-t";

/// Separator between the front and back source ids of a parallel hybrid.
pub const PARALLEL_SEPARATOR: char = '+';

/// Build the id of a taboo revision: `"{code}-t{level}"`.
#[must_use]
pub fn taboo_id(code: &str, level: u32) -> String {
    format!("{code}{TABOO_MARKER}{level}")
}

/// Build the id of a parallel hybrid: `"{front_id}+{back_id}"`.
#[must_use]
pub fn parallel_id(front_id: &str, back_id: &str) -> String {
    format!("{front_id}{PARALLEL_SEPARATOR}{back_id}")
}

/// One side of a printed card.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Face {
    pub name: String,
    pub subname: String,
    pub text: String,
    pub flavor: String,
    /// Game-specific fields (type, faction, cost, traits, ...).
    pub attributes: Attributes,
}

impl Face {
    /// Create a face with just a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the rules text (builder pattern).
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Add an attribute (builder pattern).
    #[must_use]
    pub fn with_attr(
        mut self,
        key: impl Into<AttributeKey>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Get an attribute value.
    #[must_use]
    pub fn get_attr(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(&AttributeKey::new(key))
    }
}

/// Where a synthesized parallel card came from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelOrigin {
    /// Code of the card providing the front face.
    pub front_code: String,
    /// Code of the card providing the back face.
    pub back_code: String,
    /// The regular (non-parallel) side; ordering is anchored on it.
    pub regular_code: String,
    /// Offset after the regular card's catalog position.
    pub ordinal: u32,
}

/// A catalogue card.
///
/// ## Identity
///
/// - `code` is shared by every taboo revision of the same printed card.
/// - `id` is unique across the merged set. Taboo revisions use
///   `"{code}-t{level}"`, parallel hybrids `"{front_id}+{back_id}"`.
///
/// ## Example
///
/// ```
/// use ccg_catalog::cards::{Card, Face};
///
/// let card = Card::new("01016", Face::named("Machete").with_attr("cost", 3i32))
///     .with_pack("core", 16)
///     .with_quantity(2);
///
/// assert_eq!(card.id, "01016");
/// assert_eq!(card.name(), "Machete");
/// assert_eq!(card.as_taboo_clone(2).id, "01016-t2");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Card {
    /// Unique key.
    pub id: String,

    /// Catalog code (base identity shared across taboo revisions).
    pub code: String,

    /// Errata revision, 0 for the original printing.
    pub taboo_level: u32,

    pub pack_code: String,

    /// Numeric position within the pack.
    pub position: u32,

    pub quantity: u32,

    pub deck_limit: u32,

    /// Display name of the card this one is bonded to, or empty.
    pub bonded_to: String,

    /// Id of a separate record holding this card's back face, or empty.
    pub back_link_id: String,

    /// Suppressed from output.
    pub hidden: bool,

    pub double_sided: bool,

    /// Set on regular cards that have synthesized parallel variants.
    pub parallel_content: bool,

    pub front: Face,

    pub back: Option<Face>,

    /// Present only on synthesized parallel hybrids.
    pub parallel: Option<ParallelOrigin>,
}

impl Card {
    /// Create an original (taboo level 0) card whose id equals its code.
    #[must_use]
    pub fn new(code: impl Into<String>, front: Face) -> Self {
        let code = code.into();
        Self {
            id: code.clone(),
            code,
            quantity: 1,
            deck_limit: 1,
            front,
            ..Self::default()
        }
    }

    /// Create a taboo revision of `code` at `level`.
    #[must_use]
    pub fn taboo_revision(code: impl Into<String>, level: u32, front: Face) -> Self {
        let mut card = Self::new(code, front);
        card.id = taboo_id(&card.code, level);
        card.taboo_level = level;
        card
    }

    /// Set pack and position (builder pattern).
    #[must_use]
    pub fn with_pack(mut self, pack_code: impl Into<String>, position: u32) -> Self {
        self.pack_code = pack_code.into();
        self.position = position;
        self
    }

    /// Set quantity (builder pattern).
    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Set the bonded owner name (builder pattern).
    #[must_use]
    pub fn with_bonded_to(mut self, owner: impl Into<String>) -> Self {
        self.bonded_to = owner.into();
        self
    }

    /// Set the back-link id (builder pattern).
    #[must_use]
    pub fn with_back_link(mut self, back_id: impl Into<String>) -> Self {
        self.back_link_id = back_id.into();
        self
    }

    /// Replace the back face.
    #[must_use]
    pub fn with_back(mut self, back: Face) -> Self {
        self.back = Some(back);
        self.double_sided = true;
        self
    }

    /// Copy marked as suppressed from output.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Copy marked as having synthesized parallel variants.
    #[must_use]
    pub fn with_parallel_content(mut self) -> Self {
        self.parallel_content = true;
        self
    }

    /// Display name (the front face name).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.front.name
    }

    /// Copy with front and back faces swapped.
    ///
    /// Returns `None` when the card has no back face to swap in.
    #[must_use]
    pub fn with_flipped_sides(&self) -> Option<Self> {
        let back = self.back.clone()?;
        let mut flipped = self.clone();
        flipped.back = Some(std::mem::replace(&mut flipped.front, back));
        Some(flipped)
    }

    /// Copy re-identified as a taboo revision at `level`.
    #[must_use]
    pub fn as_taboo_clone(&self, level: u32) -> Self {
        let mut clone = self.clone();
        clone.id = taboo_id(&self.code, level);
        clone.taboo_level = level;
        clone
    }

    /// Hybrid with this card's front and `partner`'s back.
    ///
    /// The hybrid keeps this card's code and deckbuilding fields, takes the
    /// higher of the two taboo levels and links its back to the partner.
    #[must_use]
    pub fn as_parallel_clone(&self, partner: &Card, regular_code: &str, ordinal: u32) -> Self {
        let mut clone = self.clone();
        clone.id = parallel_id(&self.id, &partner.id);
        clone.taboo_level = self.taboo_level.max(partner.taboo_level);
        clone.back = partner.back.clone();
        clone.double_sided = partner.back.is_some();
        clone.back_link_id = partner.back_link_id.clone();
        clone.parallel_content = false;
        clone.parallel = Some(ParallelOrigin {
            front_code: self.code.clone(),
            back_code: partner.code.clone(),
            regular_code: regular_code.to_string(),
            ordinal,
        });
        clone
    }

    /// Whether this is an errata revision (id ends in `-t<digits>`).
    ///
    /// Parallel hybrids are never taboo revisions even when built from one.
    #[must_use]
    pub fn is_taboo_revision(&self) -> bool {
        if self.parallel.is_some() {
            return false;
        }
        match self.id.rfind(TABOO_MARKER) {
            Some(at) => {
                let level = &self.id[at + TABOO_MARKER.len()..];
                !level.is_empty() && level.bytes().all(|b| b.is_ascii_digit())
            }
            None => false,
        }
    }

    /// Whether this card is the level-0 original of its code.
    #[must_use]
    pub fn is_original(&self) -> bool {
        self.parallel.is_none() && self.taboo_level == 0 && !self.is_taboo_revision()
    }

    /// Equality ignoring `id` and `taboo_level`.
    ///
    /// Two revisions that are taboo-equal print identically, so the later
    /// one carries no information.
    #[must_use]
    pub fn taboo_equals(&self, other: &Card) -> bool {
        let Card {
            id: _,
            taboo_level: _,
            code,
            pack_code,
            position,
            quantity,
            deck_limit,
            bonded_to,
            back_link_id,
            hidden,
            double_sided,
            parallel_content,
            front,
            back,
            parallel,
        } = self;

        *code == other.code
            && *pack_code == other.pack_code
            && *position == other.position
            && *quantity == other.quantity
            && *deck_limit == other.deck_limit
            && *bonded_to == other.bonded_to
            && *back_link_id == other.back_link_id
            && *hidden == other.hidden
            && *double_sided == other.double_sided
            && *parallel_content == other.parallel_content
            && *front == other.front
            && *back == other.back
            && *parallel == other.parallel
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machete() -> Card {
        let face = Face::named("Machete")
            .with_text("Fight.")
            .with_attr("cost", 3i32);
        Card::new("01020", face)
            .with_pack("core", 20)
            .with_quantity(2)
    }

    #[test]
    fn test_new_card_identity() {
        let card = machete();
        assert_eq!(card.id, "01020");
        assert_eq!(card.code, "01020");
        assert_eq!(card.taboo_level, 0);
        assert!(card.is_original());
        assert!(!card.is_taboo_revision());
    }

    #[test]
    fn test_taboo_revision_detection() {
        let rev = Card::taboo_revision("01020", 3, Face::named("Machete"));
        assert_eq!(rev.id, "01020-t3");
        assert!(rev.is_taboo_revision());
        assert!(!rev.is_original());

        let odd = Card::new("01020-tx", Face::named("Odd"));
        assert!(!odd.is_taboo_revision());
    }

    #[test]
    fn test_flip_swaps_faces() {
        let card = Card::new("01104", Face::named("Front")).with_back(Face::named("Back"));
        let flipped = card.with_flipped_sides().unwrap();
        assert_eq!(flipped.name(), "Back");
        assert_eq!(flipped.back.as_ref().unwrap().name, "Front");
        // original untouched
        assert_eq!(card.name(), "Front");
    }

    #[test]
    fn test_flip_without_back() {
        assert!(machete().with_flipped_sides().is_none());
    }

    #[test]
    fn test_taboo_clone() {
        let clone = machete().as_taboo_clone(4);
        assert_eq!(clone.id, "01020-t4");
        assert_eq!(clone.code, "01020");
        assert_eq!(clone.taboo_level, 4);
        assert!(clone.is_taboo_revision());
        assert!(clone.taboo_equals(&machete()));
    }

    #[test]
    fn test_taboo_equals_detects_text_change() {
        let rev = Card::taboo_revision(
            "01020",
            1,
            Face::named("Machete").with_text("Fight. Chained.").with_attr("cost", 3i32),
        )
        .with_pack("core", 20)
        .with_quantity(2);
        assert!(!rev.taboo_equals(&machete()));
    }

    #[test]
    fn test_parallel_clone() {
        let regular =
            Card::new("01001", Face::named("Roland")).with_back(Face::named("Roland back"));
        let parallel = Card::new("90024", Face::named("Parallel Roland"))
            .with_back(Face::named("Parallel back"));

        let hybrid = parallel.as_parallel_clone(&regular, "01001", 1);
        assert_eq!(hybrid.id, "90024+01001");
        assert_eq!(hybrid.code, "90024");
        assert_eq!(hybrid.name(), "Parallel Roland");
        assert_eq!(hybrid.back.as_ref().unwrap().name, "Roland back");
        assert!(!hybrid.is_taboo_revision());

        let origin = hybrid.parallel.unwrap();
        assert_eq!(origin.front_code, "90024");
        assert_eq!(origin.back_code, "01001");
        assert_eq!(origin.regular_code, "01001");
        assert_eq!(origin.ordinal, 1);
    }

    #[test]
    fn test_parallel_clone_of_taboo_revision_is_not_revision() {
        let regular = Card::taboo_revision("01001", 2, Face::named("Roland"));
        let parallel = Card::new("90024", Face::named("Parallel Roland"));
        let hybrid = parallel.as_parallel_clone(&regular, "01001", 1);
        assert_eq!(hybrid.id, "90024+01001-t2");
        assert_eq!(hybrid.taboo_level, 2);
        assert!(!hybrid.is_taboo_revision());
    }

    #[test]
    fn test_serialization_defaults() {
        let card: Card =
            serde_json::from_str(r#"{"id":"x","code":"5","front":{"name":"X"}}"#).unwrap();
        assert_eq!(card.name(), "X");
        assert_eq!(card.quantity, 0);
        assert!(card.back.is_none());

        let json = serde_json::to_string(&machete()).unwrap();
        let back: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(back, machete());
    }
}
