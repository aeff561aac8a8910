pub mod handler;
pub mod signal;
pub mod tally;

pub use handler::SignalHandler;
pub use signal::{Attempt, PredictionSignal};
pub use tally::OutcomeTally;
