//! Test doubles shared by unit tests.

use std::sync::{Arc, Mutex};

use crate::events::{PredictionSignal, SignalHandler};
use crate::notifier::{MessageHandle, Notifier, NotifierError};

/// Notifier that records every call and can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub published: Vec<(MessageHandle, String)>,
    pub amended: Vec<(MessageHandle, String)>,
    pub fail: bool,
    next_id: u64,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Text of the latest amendment to `handle`.
    pub fn last_amend(&self, handle: MessageHandle) -> Option<&str> {
        self.amended
            .iter()
            .rev()
            .find(|(h, _)| *h == handle)
            .map(|(_, text)| text.as_str())
    }
}

impl Notifier for RecordingNotifier {
    fn publish(&mut self, text: &str) -> Result<MessageHandle, NotifierError> {
        if self.fail {
            return Err(NotifierError::Unavailable("test".to_string()));
        }
        self.next_id += 1;
        let handle = MessageHandle(self.next_id);
        self.published.push((handle, text.to_string()));
        Ok(handle)
    }

    fn amend(&mut self, handle: MessageHandle, text: &str) -> Result<(), NotifierError> {
        if self.fail {
            return Err(NotifierError::Rejected {
                handle: Some(handle),
                reason: "test".to_string(),
            });
        }
        self.amended.push((handle, text.to_string()));
        Ok(())
    }
}

/// Shared view of a [`RecordingNotifier`] for tests that hand ownership of
/// the notifier to the engine.
#[derive(Debug, Clone, Default)]
pub struct SharedNotifier(pub Arc<Mutex<RecordingNotifier>>);

impl SharedNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<String> {
        let inner = self.0.lock().unwrap();
        inner.published.iter().map(|(_, text)| text.clone()).collect()
    }

    pub fn amended(&self) -> Vec<String> {
        let inner = self.0.lock().unwrap();
        inner.amended.iter().map(|(_, text)| text.clone()).collect()
    }
}

impl Notifier for SharedNotifier {
    fn publish(&mut self, text: &str) -> Result<MessageHandle, NotifierError> {
        self.0.lock().unwrap().publish(text)
    }

    fn amend(&mut self, handle: MessageHandle, text: &str) -> Result<(), NotifierError> {
        self.0.lock().unwrap().amend(handle, text)
    }
}

/// Signal handler that keeps every signal it receives.
#[derive(Debug, Clone, Default)]
pub struct SignalLog(pub Arc<Mutex<Vec<PredictionSignal>>>);

impl SignalLog {
    pub fn signals(&self) -> Vec<PredictionSignal> {
        self.0.lock().unwrap().clone()
    }
}

impl SignalHandler for SignalLog {
    fn handle_signal(&mut self, signal: &PredictionSignal) {
        self.0.lock().unwrap().push(signal.clone());
    }
}
