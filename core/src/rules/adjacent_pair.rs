use suitcast_types::RuleVariant;

use super::{RuleStrategy, Trigger};
use crate::record::GameRecord;
use crate::state::HistoryRing;
use crate::suits::{count_markers, first_absent_marker};

/// Cards required in the primary group of both records.
const REQUIRED_CARDS: usize = 3;

/// Fires when record N and record N-2 both show exactly three cards in their
/// primary group. Predicts the first suit absent from N's group at N+offset.
#[derive(Debug, Clone)]
pub struct AdjacentPair {
    offset: u32,
}

impl AdjacentPair {
    pub fn new(offset: u32) -> Self {
        Self { offset }
    }
}

impl RuleStrategy for AdjacentPair {
    fn variant(&self) -> RuleVariant {
        RuleVariant::AdjacentPair
    }

    fn evaluate(&self, record: &GameRecord, history: &HistoryRing) -> Option<Trigger> {
        let group = record.primary_group();
        if count_markers(group) != REQUIRED_CARDS {
            return None;
        }
        let predicted = first_absent_marker(group)?;

        let previous = history.lookback(record.sequence, 2)?;
        if count_markers(previous.primary_group()) != REQUIRED_CARDS {
            return None;
        }

        Some(Trigger {
            target: record.sequence.checked_add(self.offset)?,
            predicted,
            bases: vec![previous.sequence, record.sequence],
            variant: RuleVariant::AdjacentPair,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suits::Suit;
    use chrono::NaiveDateTime;

    fn record(sequence: u32, primary: &str) -> GameRecord {
        GameRecord {
            sequence,
            groups: vec![primary.to_string(), "8♦".to_string()],
            observed_at: NaiveDateTime::default(),
        }
    }

    fn history(records: &[GameRecord]) -> HistoryRing {
        let mut ring = HistoryRing::new(100);
        for r in records {
            ring.insert(r.clone());
        }
        ring
    }

    #[test]
    fn test_fires_on_three_card_pair() {
        let ring = history(&[record(765, "Q♠️2♦️9♥️"), record(766, "A♠A♥")]);
        let current = record(767, "K♥️K♣️5♣️");
        let trigger = AdjacentPair::new(5).evaluate(&current, &ring).unwrap();
        assert_eq!(trigger.target, 772);
        assert_eq!(trigger.predicted, Suit::Spades);
        assert_eq!(trigger.bases, vec![765, 767]);
        assert_eq!(trigger.variant, RuleVariant::AdjacentPair);
    }

    #[test]
    fn test_requires_three_cards_in_current() {
        let ring = history(&[record(765, "Q♠2♦9♥")]);
        assert!(AdjacentPair::new(5).evaluate(&record(767, "K♥K♣"), &ring).is_none());
        assert!(
            AdjacentPair::new(5)
                .evaluate(&record(767, "K♥K♣5♣2♦"), &ring)
                .is_none()
        );
    }

    #[test]
    fn test_requires_three_cards_two_back() {
        let ring = history(&[record(765, "Q♠2♦"), record(766, "Q♠2♦9♥")]);
        assert!(AdjacentPair::new(5).evaluate(&record(767, "K♥K♣5♣"), &ring).is_none());
    }

    #[test]
    fn test_requires_record_two_back() {
        let ring = history(&[record(766, "Q♠2♦9♥")]);
        assert!(AdjacentPair::new(5).evaluate(&record(767, "K♥K♣5♣"), &ring).is_none());
    }
}
