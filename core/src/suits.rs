//! Suit analysis over marker groups.
//!
//! A marker group is the raw text of one parenthesized segment, e.g.
//! `K♥️K♣️5♣️`. Only the four card suits matter; card ranks and any other
//! characters are ignored. Decorative emoji forms collapse to the canonical
//! single-codepoint suits before any comparison.

use std::fmt;

use serde::Serialize;

/// Emoji presentation selector that may follow a suit symbol.
const VARIATION_SELECTOR: char = '\u{FE0F}';

/// Heavy black heart, used interchangeably with ♥.
const HEAVY_HEART: char = '\u{2764}';

/// One of the four card suits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Suit {
    Hearts,
    Spades,
    Diamonds,
    Clubs,
}

impl Suit {
    /// Canonical order. "First absent" lookups walk this order.
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Spades, Suit::Diamonds, Suit::Clubs];

    /// Canonical single-codepoint symbol.
    pub fn symbol(self) -> char {
        match self {
            Suit::Hearts => '♥',
            Suit::Spades => '♠',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
        }
    }

    /// Emoji form used in rendered announcements.
    pub fn display(self) -> &'static str {
        match self {
            Suit::Hearts => "♥️",
            Suit::Spades => "♠️",
            Suit::Diamonds => "♦️",
            Suit::Clubs => "♣️",
        }
    }

    /// Parse a canonical symbol (or the heavy heart variant).
    pub fn from_symbol(c: char) -> Option<Suit> {
        match canonical_char(c) {
            '♥' => Some(Suit::Hearts),
            '♠' => Some(Suit::Spades),
            '♦' => Some(Suit::Diamonds),
            '♣' => Some(Suit::Clubs),
            _ => None,
        }
    }

    /// Missing-to-predicted mapping: ♠ ↔ ♦ and ♣ ↔ ♥.
    ///
    /// The mapping is a pairwise swap, so `s.mapped().mapped() == s`.
    pub fn mapped(self) -> Suit {
        match self {
            Suit::Spades => Suit::Diamonds,
            Suit::Diamonds => Suit::Spades,
            Suit::Clubs => Suit::Hearts,
            Suit::Hearts => Suit::Clubs,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Suit::Hearts => 0b0001,
            Suit::Spades => 0b0010,
            Suit::Diamonds => 0b0100,
            Suit::Clubs => 0b1000,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

/// Set of distinct suits, packed into a nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SuitSet(u8);

impl SuitSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, suit: Suit) {
        self.0 |= suit.bit();
    }

    pub fn contains(self, suit: Suit) -> bool {
        self.0 & suit.bit() != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn union(self, other: SuitSet) -> SuitSet {
        SuitSet(self.0 | other.0)
    }

    /// Suits present, in canonical order.
    pub fn iter(self) -> impl Iterator<Item = Suit> {
        Suit::ALL.into_iter().filter(move |s| self.contains(*s))
    }

    /// First suit in canonical order that is not in the set.
    pub fn first_absent(self) -> Option<Suit> {
        Suit::ALL.into_iter().find(|s| !self.contains(*s))
    }

    /// The single absent suit, defined only when exactly three are present.
    pub fn missing(self) -> Option<Suit> {
        if self.len() == 3 {
            self.first_absent()
        } else {
            None
        }
    }
}

impl FromIterator<Suit> for SuitSet {
    fn from_iter<I: IntoIterator<Item = Suit>>(iter: I) -> Self {
        let mut set = SuitSet::new();
        for suit in iter {
            set.insert(suit);
        }
        set
    }
}

#[inline]
fn canonical_char(c: char) -> char {
    if c == HEAVY_HEART { '♥' } else { c }
}

/// Collapse decorative suit variants to canonical single codepoints.
///
/// `❤` becomes `♥`, and a variation selector directly following a suit is
/// dropped. Everything else passes through untouched. Idempotent.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut after_suit = false;
    for c in text.chars() {
        let c = canonical_char(c);
        if c == VARIATION_SELECTOR && after_suit {
            continue;
        }
        after_suit = Suit::from_symbol(c).is_some();
        out.push(c);
    }
    out
}

/// Every suit occurrence in a group, left to right.
///
/// Scanning raw text is equivalent to scanning `normalize(group)`: the
/// variation selector is never a suit and the heavy heart is mapped inline.
fn suits_in(group: &str) -> impl Iterator<Item = Suit> + '_ {
    group.chars().filter_map(Suit::from_symbol)
}

/// Total number of suit symbols (i.e. cards) in a group.
pub fn count_markers(group: &str) -> usize {
    suits_in(group).count()
}

/// Distinct suits present in a group.
pub fn present_markers(group: &str) -> SuitSet {
    suits_in(group).collect()
}

/// The absent suit when exactly three distinct suits are present.
///
/// Four, two or fewer distinct suits yield `None`; callers treat that as
/// "rule does not apply".
pub fn missing_marker(group: &str) -> Option<Suit> {
    present_markers(group).missing()
}

/// First suit in canonical order that does not appear in the group.
pub fn first_absent_marker(group: &str) -> Option<Suit> {
    present_markers(group).first_absent()
}

pub fn has_marker(group: &str, suit: Suit) -> bool {
    suits_in(group).any(|s| s == suit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_variants() {
        assert_eq!(normalize("K♥️K♣️5♣️"), "K♥K♣5♣");
        assert_eq!(normalize("❤️A♠️"), "♥A♠");
        assert_eq!(normalize("10♦️"), "10♦");
        assert_eq!(normalize("plain"), "plain");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = ["K♥️K♣️5♣️", "❤️❤♥️♥", "♠️️x\u{FE0F}", "", "#N12. ✅3(J♣️A♦️3♥️)"];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input {input:?}");
        }
    }

    #[test]
    fn test_selector_kept_when_not_after_suit() {
        assert_eq!(normalize("x\u{FE0F}"), "x\u{FE0F}");
    }

    #[test]
    fn test_count_and_presence() {
        assert_eq!(count_markers("K♥️K♣️5♣️"), 3);
        let present = present_markers("K♥️K♣️5♣️");
        assert_eq!(present.len(), 2);
        assert!(present.contains(Suit::Hearts));
        assert!(present.contains(Suit::Clubs));
        assert!(!present.contains(Suit::Spades));
        assert_eq!(count_markers("no cards"), 0);
    }

    #[test]
    fn test_missing_marker_requires_exactly_three() {
        assert_eq!(missing_marker("J♣️A♦️3♥️"), Some(Suit::Spades));
        assert_eq!(missing_marker("J♠A♦3♥"), Some(Suit::Clubs));
        assert_eq!(missing_marker("J♠A♦3♥5♣"), None);
        assert_eq!(missing_marker("K♥K♣5♣"), None);
        assert_eq!(missing_marker("K♥"), None);
        assert_eq!(missing_marker(""), None);
    }

    #[test]
    fn test_missing_marker_over_every_three_subset() {
        for absent in Suit::ALL {
            let group: String = Suit::ALL
                .iter()
                .filter(|s| **s != absent)
                .map(|s| s.display())
                .collect();
            assert_eq!(missing_marker(&group), Some(absent));
        }
    }

    #[test]
    fn test_first_absent_follows_canonical_order() {
        assert_eq!(first_absent_marker("K♥K♣5♣"), Some(Suit::Spades));
        assert_eq!(first_absent_marker("K♠K♣5♣"), Some(Suit::Hearts));
        assert_eq!(first_absent_marker("♥♠♦♣"), None);
    }

    #[test]
    fn test_mapping_round_trips() {
        for suit in Suit::ALL {
            assert_ne!(suit.mapped(), suit);
            assert_eq!(suit.mapped().mapped(), suit);
        }
        assert_eq!(Suit::Spades.mapped(), Suit::Diamonds);
        assert_eq!(Suit::Clubs.mapped(), Suit::Hearts);
    }

    #[test]
    fn test_has_marker_accepts_decorated_forms() {
        assert!(has_marker("A❤️", Suit::Hearts));
        assert!(has_marker("A♦️", Suit::Diamonds));
        assert!(!has_marker("A♦️", Suit::Spades));
    }

    #[test]
    fn test_union_of_sets() {
        let a = present_markers("K♥K♣");
        let b = present_markers("5♣8♦");
        let union = a.union(b);
        assert_eq!(union.len(), 3);
        assert_eq!(union.missing(), Some(Suit::Spades));
        assert_eq!(union.iter().collect::<Vec<_>>(), vec![Suit::Hearts, Suit::Diamonds, Suit::Clubs]);
    }
}
