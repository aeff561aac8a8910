use suitcast_types::RuleVariant;

use super::{RuleStrategy, Trigger};
use crate::record::GameRecord;
use crate::state::HistoryRing;
use crate::suits::present_markers;

/// Fires when the primary groups of N-1 and N together show exactly three
/// suits. Predicts the mapped counterpart of the absent suit at N+offset.
#[derive(Debug, Clone)]
pub struct UnionOfTwo {
    offset: u32,
}

impl UnionOfTwo {
    pub fn new(offset: u32) -> Self {
        Self { offset }
    }
}

impl RuleStrategy for UnionOfTwo {
    fn variant(&self) -> RuleVariant {
        RuleVariant::UnionOfTwo
    }

    fn evaluate(&self, record: &GameRecord, history: &HistoryRing) -> Option<Trigger> {
        let previous = history.lookback(record.sequence, 1)?;
        let union = present_markers(previous.primary_group())
            .union(present_markers(record.primary_group()));
        let missing = union.missing()?;

        Some(Trigger {
            target: record.sequence.checked_add(self.offset)?,
            predicted: missing.mapped(),
            bases: vec![record.sequence],
            variant: RuleVariant::UnionOfTwo,
        })
    }
}
