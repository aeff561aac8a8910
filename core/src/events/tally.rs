use serde::Serialize;

use super::{Attempt, PredictionSignal, SignalHandler};
use crate::scheduler::PredictionOrigin;

/// Outcome counters since the last reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeTally {
    pub queued: u32,
    pub backups_queued: u32,
    pub announced: u32,
    pub confirmed_first: u32,
    pub confirmed_second: u32,
    pub failed: u32,
    pub expired: u32,
    pub forwarded: u32,
}

impl OutcomeTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Predictions that reached a verdict.
    pub fn settled(&self) -> u32 {
        self.confirmed_first + self.confirmed_second + self.failed
    }

    pub fn confirmed(&self) -> u32 {
        self.confirmed_first + self.confirmed_second
    }
}

impl SignalHandler for OutcomeTally {
    fn handle_signal(&mut self, signal: &PredictionSignal) {
        match signal {
            PredictionSignal::Queued { origin, .. } => {
                self.queued += 1;
                if *origin == PredictionOrigin::Backup {
                    self.backups_queued += 1;
                }
            }
            PredictionSignal::Announced { .. } => self.announced += 1,
            PredictionSignal::Confirmed { attempt, .. } => match attempt {
                Attempt::First => self.confirmed_first += 1,
                Attempt::Second => self.confirmed_second += 1,
            },
            PredictionSignal::Failed { .. } => self.failed += 1,
            PredictionSignal::Expired { .. } => self.expired += 1,
            PredictionSignal::Forwarded { .. } => self.forwarded += 1,
            PredictionSignal::Reset => *self = Self::default(),
            PredictionSignal::Rejected { .. } | PredictionSignal::SecondChance { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suits::Suit;
    use suitcast_types::RuleVariant;

    #[test]
    fn test_counts_outcomes_and_resets() {
        let mut tally = OutcomeTally::new();
        tally.handle_signals(&[
            PredictionSignal::Queued {
                target: 10,
                suit: Suit::Spades,
                origin: PredictionOrigin::Rule(RuleVariant::AdjacentPair),
            },
            PredictionSignal::Announced {
                target: 10,
                suit: Suit::Spades,
                message: None,
            },
            PredictionSignal::SecondChance { target: 10 },
            PredictionSignal::Failed {
                target: 10,
                suit: Suit::Spades,
            },
            PredictionSignal::Queued {
                target: 15,
                suit: Suit::Diamonds,
                origin: PredictionOrigin::Backup,
            },
            PredictionSignal::Confirmed {
                target: 20,
                suit: Suit::Clubs,
                attempt: Attempt::Second,
            },
        ]);
        assert_eq!(tally.queued, 2);
        assert_eq!(tally.backups_queued, 1);
        assert_eq!(tally.announced, 1);
        assert_eq!(tally.failed, 1);
        assert_eq!(tally.confirmed_second, 1);
        assert_eq!(tally.settled(), 2);
        assert_eq!(tally.confirmed(), 1);

        tally.handle_signal(&PredictionSignal::Reset);
        assert_eq!(tally, OutcomeTally::default());
    }
}
