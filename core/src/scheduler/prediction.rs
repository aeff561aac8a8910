use chrono::NaiveDateTime;
use serde::Serialize;
use suitcast_types::formatting::format_prediction;
use suitcast_types::{RuleVariant, StatusGlyph};

use crate::notifier::MessageHandle;
use crate::rules::Trigger;
use crate::suits::Suit;

/// Where a prediction came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PredictionOrigin {
    Rule(RuleVariant),
    /// Scheduled after an earlier prediction failed both attempts.
    Backup,
}

/// Lifecycle state.
///
/// `Confirmed` and `Failed` are terminal: the scheduler drops a prediction as
/// soon as it reaches either, so they only appear on values handed back to
/// callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PredictionState {
    Queued,
    Active,
    /// The target record missed; escalated to the record after it.
    AwaitingSecondChance,
    Confirmed,
    Failed,
}

impl PredictionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Confirmed | Self::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Record the prediction is verified against. Unique among tracked predictions.
    pub target: u32,
    pub predicted: Suit,
    /// Suit used by the backup if both attempts miss.
    pub alternate: Suit,
    pub backup_target: u32,
    pub bases: Vec<u32>,
    pub origin: PredictionOrigin,
    pub state: PredictionState,
    pub created_at: NaiveDateTime,
    /// Set once the announcement was published.
    pub message: Option<MessageHandle>,
}

impl Prediction {
    pub fn new(
        target: u32,
        predicted: Suit,
        bases: Vec<u32>,
        origin: PredictionOrigin,
        backup_offset: u32,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            target,
            predicted,
            alternate: predicted.mapped(),
            backup_target: target.saturating_add(backup_offset),
            bases,
            origin,
            state: PredictionState::Queued,
            created_at,
            message: None,
        }
    }

    pub fn from_trigger(trigger: Trigger, backup_offset: u32, created_at: NaiveDateTime) -> Self {
        Self::new(
            trigger.target,
            trigger.predicted,
            trigger.bases,
            PredictionOrigin::Rule(trigger.variant),
            backup_offset,
            created_at,
        )
    }

    /// The follow-up prediction scheduled when this one fails: alternate suit
    /// at the backup target, same base records.
    pub fn backup(&self, backup_offset: u32, created_at: NaiveDateTime) -> Self {
        Self::new(
            self.backup_target,
            self.alternate,
            self.bases.clone(),
            PredictionOrigin::Backup,
            backup_offset,
            created_at,
        )
    }

    /// Announcement text for the given status.
    pub fn render(&self, status: StatusGlyph) -> String {
        format_prediction(
            self.target,
            self.predicted.display(),
            status,
            &self.bases,
            self.backup_target,
            self.alternate.display(),
        )
    }
}
