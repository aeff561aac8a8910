//! Text rendering for prediction announcements.
//!
//! The notifier only ever sees strings produced here, so every channel shows
//! the same layout: a status line followed by the records the prediction was
//! derived from and the backup hint.

/// Display status of an announced prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusGlyph {
    /// Announced, waiting for the target record.
    Pending,
    /// Suit found in the target record.
    ConfirmedFirst,
    /// Suit found in the record right after the target.
    ConfirmedSecond,
    /// Both attempts missed.
    Failed,
    /// Dropped without verification.
    Expired,
}

impl StatusGlyph {
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Pending => "🔮",
            Self::ConfirmedFirst => "✅0️⃣",
            Self::ConfirmedSecond => "✅1️⃣",
            Self::Failed => "❌",
            Self::Expired => "⌛",
        }
    }

    /// Whether the status ends the prediction's life.
    pub fn is_final(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Format the headline of a prediction.
///
/// # Examples
/// ```
/// use suitcast_types::formatting::{format_status_line, StatusGlyph};
/// assert_eq!(format_status_line(772, "♠️", StatusGlyph::Pending), "772: √♠️ status :🔮");
/// assert_eq!(format_status_line(772, "♠️", StatusGlyph::Failed), "772: √♠️ status :❌");
/// ```
pub fn format_status_line(target: u32, suit: &str, status: StatusGlyph) -> String {
    format!("{}: √{} status :{}", target, suit, status.glyph())
}

/// Format the list of base records.
///
/// # Examples
/// ```
/// use suitcast_types::formatting::format_bases;
/// assert_eq!(format_bases(&[767, 769]), "#767 and #769");
/// assert_eq!(format_bases(&[767]), "#767");
/// assert_eq!(format_bases(&[1, 2, 3]), "#1, #2 and #3");
/// assert_eq!(format_bases(&[]), "-");
/// ```
pub fn format_bases(bases: &[u32]) -> String {
    match bases {
        [] => "-".to_string(),
        [only] => format!("#{}", only),
        [head @ .., last] => {
            let head: Vec<String> = head.iter().map(|b| format!("#{}", b)).collect();
            format!("{} and #{}", head.join(", "), last)
        }
    }
}

/// Render the full announcement body for a prediction.
///
/// While pending, the last line explains when the backup kicks in; once the
/// prediction is settled it only names the backup target.
///
/// # Examples
/// ```
/// use suitcast_types::formatting::{format_prediction, StatusGlyph};
/// let text = format_prediction(772, "♠️", StatusGlyph::Pending, &[767, 769], 777, "♦️");
/// assert!(text.starts_with("772: √♠️ status :🔮\n"));
/// assert!(text.contains("Based on: #767 and #769"));
/// assert!(text.ends_with("If 772 and 773 miss: 777♦️"));
/// ```
pub fn format_prediction(
    target: u32,
    suit: &str,
    status: StatusGlyph,
    bases: &[u32],
    backup_target: u32,
    alternate: &str,
) -> String {
    let mut text = format_status_line(target, suit, status);
    text.push_str("\n\n");
    text.push_str(&format!("Based on: {}\n", format_bases(bases)));
    text.push_str(&format!("Predicted suit: {}\n", suit));
    if status.is_final() {
        text.push_str(&format!("Backup: {}{}", backup_target, alternate));
    } else {
        text.push_str(&format!(
            "If {} and {} miss: {}{}",
            target,
            target.saturating_add(1),
            backup_target,
            alternate
        ));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_status_drops_miss_hint() {
        let text = format_prediction(120, "♦️", StatusGlyph::ConfirmedSecond, &[115], 125, "♠️");
        assert!(text.starts_with("120: √♦️ status :✅1️⃣"));
        assert!(text.ends_with("Backup: 125♠️"));
        assert!(!text.contains("miss"));
    }

    #[test]
    fn test_only_pending_is_not_final() {
        assert!(!StatusGlyph::Pending.is_final());
        assert!(StatusGlyph::ConfirmedFirst.is_final());
        assert!(StatusGlyph::Expired.is_final());
    }
}
