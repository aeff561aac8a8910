pub mod config;
pub mod engine;
pub mod events;
pub mod notifier;
pub mod record;
pub mod reset_clock;
pub mod rules;
pub mod scheduler;
pub mod service;
pub mod source;
pub mod state;
pub mod suits;

#[cfg(test)]
mod testing;

// Re-exports for convenience
pub use config::{ConfigError, load_config};
pub use engine::{DispatchOutcome, DropReason, EngineSnapshot, PredictionEngine};
pub use events::{OutcomeTally, PredictionSignal, SignalHandler};
pub use notifier::{MessageHandle, Notifier, NotifierError};
pub use record::{GameRecord, ParseError};
pub use reset_clock::ResetSchedule;
pub use scheduler::{Prediction, PredictionOrigin, PredictionScheduler, PredictionState};
pub use service::{PredictionService, ServiceCommand, ServiceError, ServiceHandle};
pub use suits::Suit;
