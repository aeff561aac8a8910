use super::PredictionSignal;

/// Receives prediction signals after each pipeline run.
pub trait SignalHandler {
    fn handle_signal(&mut self, signal: &PredictionSignal);

    fn handle_signals(&mut self, signals: &[PredictionSignal]) {
        for signal in signals {
            self.handle_signal(signal);
        }
    }
}
