use chrono::Local;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use super::ServiceCommand;
use crate::engine::{DispatchOutcome, EngineSnapshot};
use crate::events::OutcomeTally;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ServiceError {
    #[error("prediction service is not running")]
    Closed,
}

// ─────────────────────────────────────────────────────────────────────────────
// Service Handle
// ─────────────────────────────────────────────────────────────────────────────

/// Handle to communicate with the prediction service
#[derive(Debug, Clone)]
pub struct ServiceHandle {
    pub cmd_tx: mpsc::Sender<ServiceCommand>,
}

impl ServiceHandle {
    /// Queue a record revision without waiting for it to be processed
    pub async fn submit(&self, text: impl Into<String>, origin: &str) -> Result<(), ServiceError> {
        self.send(ServiceCommand::Message {
            text: text.into(),
            origin: origin.to_string(),
            received_at: Local::now().naive_local(),
            reply: None,
        })
        .await
    }

    /// Queue a record revision and wait for the pipeline outcome
    pub async fn process(
        &self,
        text: impl Into<String>,
        origin: &str,
    ) -> Result<DispatchOutcome, ServiceError> {
        let (tx, rx) = oneshot::channel();
        self.send(ServiceCommand::Message {
            text: text.into(),
            origin: origin.to_string(),
            received_at: Local::now().naive_local(),
            reply: Some(tx),
        })
        .await?;
        rx.await.map_err(|_| ServiceError::Closed)
    }

    pub async fn daily_reset(&self) -> Result<(), ServiceError> {
        self.send(ServiceCommand::DailyReset).await
    }

    pub async fn set_forwarding(&self, enabled: bool) -> Result<(), ServiceError> {
        self.send(ServiceCommand::SetForwarding(enabled)).await
    }

    /// Current engine state, taken between pipeline runs
    pub async fn snapshot(&self) -> Result<EngineSnapshot, ServiceError> {
        let (tx, rx) = oneshot::channel();
        self.send(ServiceCommand::Snapshot(tx)).await?;
        rx.await.map_err(|_| ServiceError::Closed)
    }

    /// Outcome counters since the last reset
    pub async fn stats(&self) -> Result<OutcomeTally, ServiceError> {
        let (tx, rx) = oneshot::channel();
        self.send(ServiceCommand::Stats(tx)).await?;
        rx.await.map_err(|_| ServiceError::Closed)
    }

    pub async fn shutdown(&self) -> Result<(), ServiceError> {
        self.send(ServiceCommand::Shutdown).await
    }

    async fn send(&self, cmd: ServiceCommand) -> Result<(), ServiceError> {
        self.cmd_tx.send(cmd).await.map_err(|_| ServiceError::Closed)
    }
}
