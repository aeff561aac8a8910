use serde::Serialize;
use suitcast_types::RuleVariant;

use crate::notifier::MessageHandle;
use crate::scheduler::PredictionOrigin;
use crate::suits::Suit;

/// Which verification attempt found the predicted suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Attempt {
    /// The target record itself.
    First,
    /// The record right after the target.
    Second,
}

/// Lifecycle events emitted by the engine while processing a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PredictionSignal {
    /// A prediction entered the queue (rule trigger or backup).
    Queued {
        target: u32,
        suit: Suit,
        origin: PredictionOrigin,
    },
    /// A trigger collided with a prediction already tracked for its target.
    Rejected { target: u32, variant: Option<RuleVariant> },
    /// A queued prediction was promoted and announced.
    Announced {
        target: u32,
        suit: Suit,
        message: Option<MessageHandle>,
    },
    /// Dropped without verification. `announced` is false for queue expiry.
    Expired { target: u32, announced: bool },
    /// First attempt missed; the next record decides.
    SecondChance { target: u32 },
    Confirmed {
        target: u32,
        suit: Suit,
        attempt: Attempt,
    },
    /// Both attempts missed.
    Failed { target: u32, suit: Suit },
    /// A finalized record passed on to the admin, once per sequence.
    Forwarded { sequence: u32, text: String },
    /// All state was wiped by the daily reset.
    Reset,
}

impl PredictionSignal {
    pub fn target(&self) -> Option<u32> {
        match self {
            Self::Queued { target, .. }
            | Self::Rejected { target, .. }
            | Self::Announced { target, .. }
            | Self::Expired { target, .. }
            | Self::SecondChance { target }
            | Self::Confirmed { target, .. }
            | Self::Failed { target, .. } => Some(*target),
            Self::Forwarded { .. } | Self::Reset => None,
        }
    }
}
