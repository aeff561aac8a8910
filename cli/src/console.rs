//! Console stand-ins for the outbound channels.

use std::io::Write;

use suitcast_core::events::{PredictionSignal, SignalHandler};
use suitcast_core::notifier::{MessageHandle, Notifier, NotifierError};

/// Prints every publish and amendment with its message id.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    next_id: u64,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn emit(&self, header: String, text: &str) -> Result<(), NotifierError> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "\n{header}\n{text}\n")
            .and_then(|_| out.flush())
            .map_err(|e| NotifierError::Unavailable(e.to_string()))
    }
}

impl Notifier for ConsoleNotifier {
    fn publish(&mut self, text: &str) -> Result<MessageHandle, NotifierError> {
        self.next_id += 1;
        let handle = MessageHandle(self.next_id);
        self.emit(format!("── message {} ──", handle.0), text)?;
        Ok(handle)
    }

    fn amend(&mut self, handle: MessageHandle, text: &str) -> Result<(), NotifierError> {
        if handle.0 == 0 || handle.0 > self.next_id {
            return Err(NotifierError::Rejected {
                handle: Some(handle),
                reason: "unknown message".to_string(),
            });
        }
        self.emit(format!("── message {} (edited) ──", handle.0), text)
    }
}

/// Echoes every forwarded record.
#[derive(Debug)]
pub struct ConsoleForwarder<W = std::io::Stdout> {
    out: W,
}

impl ConsoleForwarder {
    pub fn new() -> Self {
        Self {
            out: std::io::stdout(),
        }
    }
}

impl Default for ConsoleForwarder {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> ConsoleForwarder<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SignalHandler for ConsoleForwarder<W> {
    fn handle_signal(&mut self, signal: &PredictionSignal) {
        let PredictionSignal::Forwarded { sequence, text } = signal else {
            return;
        };
        if let Err(e) = writeln!(self.out, "📨 #{sequence} {text}").and_then(|_| self.out.flush()) {
            tracing::warn!(sequence, error = %e, "Failed to echo forwarded record");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forwarder_echoes_only_forwarded_records() {
        let mut forwarder = ConsoleForwarder::with_writer(Vec::new());
        forwarder.handle_signals(&[
            PredictionSignal::Forwarded {
                sequence: 12,
                text: "#N12. ✅3(K♥)(A♦)".to_string(),
            },
            PredictionSignal::Reset,
        ]);
        let out = String::from_utf8(forwarder.into_inner()).unwrap();
        assert_eq!(out, "📨 #12 #N12. ✅3(K♥)(A♦)\n");
    }

    #[test]
    fn test_amend_requires_published_handle() {
        let mut notifier = ConsoleNotifier::new();
        assert!(notifier.amend(MessageHandle(1), "x").is_err());
        let handle = notifier.publish("120: √♦️ status :🔮").unwrap();
        assert_eq!(handle, MessageHandle(1));
        assert!(notifier.amend(handle, "120: √♦️ status :✅0️⃣").is_ok());
    }
}
