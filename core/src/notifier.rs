//! Outbound announcements.
//!
//! The scheduler publishes a rendering of each prediction when it is
//! announced and amends it as the prediction settles. Delivery is best
//! effort: a failed call is logged by the caller and the prediction's state
//! advances regardless.

use serde::Serialize;
use thiserror::Error;

/// Handle to a published message, used to amend it later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MessageHandle(pub u64);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotifierError {
    #[error("notifier unavailable: {0}")]
    Unavailable(String),
    #[error("message {handle:?} rejected: {reason}")]
    Rejected {
        handle: Option<MessageHandle>,
        reason: String,
    },
}

pub trait Notifier {
    fn publish(&mut self, text: &str) -> Result<MessageHandle, NotifierError>;
    fn amend(&mut self, handle: MessageHandle, text: &str) -> Result<(), NotifierError>;
}
