//! Single-consumer command loop around the engine.
//!
//! One task owns the [`PredictionEngine`]. Message sources, the reset clock
//! and admin queries all talk to it through a cloneable [`ServiceHandle`], so
//! every pipeline run, reset and query is serialized.

mod handle;

pub use handle::{ServiceError, ServiceHandle};

use chrono::NaiveDateTime;
use tokio::sync::{mpsc, oneshot};

use crate::engine::{DispatchOutcome, EngineSnapshot, PredictionEngine};
use crate::events::OutcomeTally;

/// Default depth of the command queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Commands sent to the service task
#[derive(Debug)]
pub enum ServiceCommand {
    /// A delivered record revision
    Message {
        text: String,
        /// Label of the producer, for logging
        origin: String,
        received_at: NaiveDateTime,
        /// Receives the pipeline outcome, if the sender cares
        reply: Option<oneshot::Sender<DispatchOutcome>>,
    },
    /// Wipe all engine state
    DailyReset,
    /// Turn forwarding of finalized records on or off
    SetForwarding(bool),
    Snapshot(oneshot::Sender<EngineSnapshot>),
    Stats(oneshot::Sender<OutcomeTally>),
    /// Stop the loop after draining nothing further
    Shutdown,
}

pub struct PredictionService {
    engine: PredictionEngine,
    cmd_rx: mpsc::Receiver<ServiceCommand>,
}

impl PredictionService {
    pub fn new(engine: PredictionEngine, capacity: usize) -> (Self, ServiceHandle) {
        let (cmd_tx, cmd_rx) = mpsc::channel(capacity.max(1));
        (Self { engine, cmd_rx }, ServiceHandle { cmd_tx })
    }

    /// Process commands until shutdown or until every handle is dropped.
    /// Returns the engine so callers can inspect final state.
    pub async fn run(mut self) -> PredictionEngine {
        tracing::info!("Prediction service started");
        while let Some(cmd) = self.cmd_rx.recv().await {
            match cmd {
                ServiceCommand::Message {
                    text,
                    origin,
                    received_at,
                    reply,
                } => {
                    let outcome = self.engine.process_message(&text, received_at);
                    if let DispatchOutcome::Ignored(reason) = &outcome {
                        tracing::trace!(%origin, ?reason, "Message ignored");
                    }
                    if let Some(reply) = reply {
                        let _ = reply.send(outcome);
                    }
                }
                ServiceCommand::DailyReset => self.engine.reset(),
                ServiceCommand::SetForwarding(enabled) => self.engine.set_forwarding(enabled),
                ServiceCommand::Snapshot(reply) => {
                    let _ = reply.send(self.engine.snapshot());
                }
                ServiceCommand::Stats(reply) => {
                    let _ = reply.send(self.engine.stats().clone());
                }
                ServiceCommand::Shutdown => {
                    tracing::info!("Prediction service shutting down");
                    break;
                }
            }
        }
        self.engine
    }
}
