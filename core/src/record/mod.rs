mod parser;

pub use parser::{
    MIN_GROUPS, ParseError, extract_groups, extract_sequence, is_finalized, parse_record,
};

use chrono::NaiveDateTime;

/// A finalized game result.
///
/// Immutable once parsed; the history ring owns it after insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    pub sequence: u32,
    /// Raw contents of each parenthesized segment, left to right.
    pub groups: Vec<String>,
    pub observed_at: NaiveDateTime,
}

impl GameRecord {
    /// The first marker group, the only one the rules look at.
    pub fn primary_group(&self) -> &str {
        self.groups.first().map(String::as_str).unwrap_or("")
    }
}
