//! Prediction trigger rules.
//!
//! A rule looks at a freshly finalized record and the history that precedes
//! it and decides whether a prediction should be scheduled. Two rules are
//! in use and they disagree on both trigger condition and target distance,
//! so each is a separate strategy and the set to run is configured.

mod adjacent_pair;
mod union_of_two;

pub use adjacent_pair::AdjacentPair;
pub use union_of_two::UnionOfTwo;

use suitcast_types::{RuleConfig, RuleVariant};

use crate::record::GameRecord;
use crate::state::HistoryRing;
use crate::suits::Suit;

/// A rule's request to schedule a prediction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub target: u32,
    pub predicted: Suit,
    /// Records the trigger was derived from, ascending.
    pub bases: Vec<u32>,
    pub variant: RuleVariant,
}

pub trait RuleStrategy: Send {
    fn variant(&self) -> RuleVariant;

    /// Evaluate `record` against the records before it. `history` may or may
    /// not already contain `record` itself; rules only look backwards.
    fn evaluate(&self, record: &GameRecord, history: &HistoryRing) -> Option<Trigger>;
}

/// Instantiate the configured strategies, in configuration order.
pub fn build_strategies(config: &RuleConfig) -> Vec<Box<dyn RuleStrategy>> {
    let mut strategies: Vec<Box<dyn RuleStrategy>> = Vec::with_capacity(config.strategies.len());
    for variant in &config.strategies {
        if strategies.iter().any(|s| s.variant() == *variant) {
            tracing::warn!(?variant, "Rule listed twice, ignoring duplicate");
            continue;
        }
        match variant {
            RuleVariant::AdjacentPair => {
                strategies.push(Box::new(AdjacentPair::new(config.adjacent_offset)))
            }
            RuleVariant::UnionOfTwo => {
                strategies.push(Box::new(UnionOfTwo::new(config.union_offset)))
            }
        }
    }
    strategies
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_strategies_in_order_without_duplicates() {
        let config = RuleConfig {
            strategies: vec![
                RuleVariant::UnionOfTwo,
                RuleVariant::AdjacentPair,
                RuleVariant::UnionOfTwo,
            ],
            ..RuleConfig::default()
        };
        let variants: Vec<RuleVariant> =
            build_strategies(&config).iter().map(|s| s.variant()).collect();
        assert_eq!(variants, vec![RuleVariant::UnionOfTwo, RuleVariant::AdjacentPair]);
    }
}
