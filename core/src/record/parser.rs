//! Record text parsing.
//!
//! A record looks like `#N767. ✅3(K♥️K♣️5♣️) - 1(J♣️A♦️3♥️) #T10`.
//! The source edits a record in place while the hand is being played; only
//! the final revision (completion marker present, no clock) is processed.

use chrono::NaiveDateTime;
use memchr::{memchr, memchr_iter};
use thiserror::Error;

use super::GameRecord;

/// Minimum number of marker groups for a record to be usable.
pub const MIN_GROUPS: usize = 2;

/// Marks a record still being revised by the source.
const IN_PROGRESS: char = '⏰';

/// Either of these marks a completed record.
const COMPLETION_MARKERS: [char; 2] = ['✅', '🔰'];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("record is not finalized")]
    NotFinalized,
    #[error("no sequence tag found")]
    MissingSequence,
    #[error("expected at least {min} marker groups, found {found}", min = MIN_GROUPS)]
    TooFewGroups { found: usize },
}

/// True when the text carries a completion marker and no in-progress marker.
pub fn is_finalized(text: &str) -> bool {
    if text.contains(IN_PROGRESS) {
        return false;
    }
    text.contains(COMPLETION_MARKERS)
}

/// Extract the sequence number from the first `#N<digits>` tag.
///
/// The `N` is case-insensitive and may be followed by whitespace before the
/// digits. A tag without digits is skipped and the search continues.
pub fn extract_sequence(text: &str) -> Option<u32> {
    let bytes = text.as_bytes();
    for hash in memchr_iter(b'#', bytes) {
        let mut pos = hash + 1;
        if !matches!(bytes.get(pos), Some(b'N' | b'n')) {
            continue;
        }
        pos += 1;
        while bytes.get(pos).is_some_and(|b| b.is_ascii_whitespace()) {
            pos += 1;
        }
        let digits_start = pos;
        while bytes.get(pos).is_some_and(|b| b.is_ascii_digit()) {
            pos += 1;
        }
        if pos == digits_start {
            continue;
        }
        // Digits are ASCII, so the slice is on char boundaries.
        if let Ok(sequence) = text[digits_start..pos].parse::<u32>() {
            return Some(sequence);
        }
    }
    None
}

/// Contents of every `(...)` segment, left to right.
///
/// A segment runs from an opening parenthesis to the next closing one; an
/// unterminated segment ends the scan.
pub fn extract_groups(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut groups = Vec::new();
    let mut start = 0;

    while let Some(open) = memchr(b'(', &bytes[start..]) {
        let open = start + open;
        let Some(close) = memchr(b')', &bytes[open + 1..]) else {
            break;
        };
        let close = open + 1 + close;
        groups.push(&text[open + 1..close]);
        start = close + 1;
    }

    groups
}

/// Parse a finalized record.
pub fn parse_record(text: &str, observed_at: NaiveDateTime) -> Result<GameRecord, ParseError> {
    if !is_finalized(text) {
        return Err(ParseError::NotFinalized);
    }
    let sequence = extract_sequence(text).ok_or(ParseError::MissingSequence)?;
    let groups = extract_groups(text);
    if groups.len() < MIN_GROUPS {
        return Err(ParseError::TooFewGroups {
            found: groups.len(),
        });
    }

    Ok(GameRecord {
        sequence,
        groups: groups.into_iter().map(str::to_string).collect(),
        observed_at,
    })
}
