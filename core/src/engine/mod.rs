//! The dispatch pipeline.
//!
//! [`PredictionEngine`] owns every piece of mutable state (history, dedup
//! store, scheduler, cursor) and runs one message through the full pipeline
//! per call. It is not thread-safe by itself; the service module puts it
//! behind a single-consumer command queue so pipeline runs and the daily
//! reset never interleave.


use chrono::NaiveDateTime;
use serde::Serialize;
use suitcast_types::AppConfig;

use crate::events::{OutcomeTally, PredictionSignal, SignalHandler};
use crate::notifier::Notifier;
use crate::record::{self, GameRecord};
use crate::rules::{RuleStrategy, build_strategies};
use crate::scheduler::{Prediction, PredictionScheduler};
use crate::state::{DedupStore, Fingerprint, HistoryRing};

/// Why a delivered message did not reach the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DropReason {
    /// Still being revised by the source.
    NotFinalized,
    /// No sequence tag.
    ParseFailure,
    /// Fewer marker groups than a record needs.
    AmbiguousGroup { found: usize },
    /// Same revision already processed.
    DuplicateRecord,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Processed {
        sequence: u32,
        signals: Vec<PredictionSignal>,
    },
    Ignored(DropReason),
}

impl DispatchOutcome {
    pub fn signals(&self) -> &[PredictionSignal] {
        match self {
            Self::Processed { signals, .. } => signals,
            Self::Ignored(_) => &[],
        }
    }
}

/// Point-in-time view of the engine for the admin surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineSnapshot {
    pub current_sequence: Option<u32>,
    pub active: Vec<Prediction>,
    pub queued: Vec<Prediction>,
    pub history_len: usize,
    pub dedup_len: usize,
    pub forwarding: bool,
    pub last_forwarded: Option<u32>,
}

pub struct PredictionEngine {
    history: HistoryRing,
    dedup: DedupStore,
    scheduler: PredictionScheduler,
    strategies: Vec<Box<dyn RuleStrategy>>,
    notifier: Box<dyn Notifier + Send>,
    handlers: Vec<Box<dyn SignalHandler + Send>>,
    tally: OutcomeTally,
    /// Highest sequence processed so far. `None` until the first record
    /// and again after every reset. Never moves backwards.
    current_sequence: Option<u32>,
    /// Sequence of the last record emitted as `Forwarded`.
    last_forwarded: Option<u32>,
    forwarding: bool,
    fingerprint_prefix_chars: usize,
    stale_active_after: Option<u32>,
}

impl PredictionEngine {
    pub fn new(config: &AppConfig, notifier: Box<dyn Notifier + Send>) -> Self {
        let strategies = build_strategies(&config.rules);
        tracing::info!(
            strategies = ?strategies.iter().map(|s| s.variant()).collect::<Vec<_>>(),
            history_capacity = config.engine.history_capacity,
            max_active = config.schedule.max_active,
            "Prediction engine initialized"
        );
        Self {
            history: HistoryRing::new(config.engine.history_capacity),
            dedup: DedupStore::new(config.engine.dedup_capacity, config.engine.dedup_policy),
            scheduler: PredictionScheduler::new(&config.schedule, config.rules.backup_offset),
            strategies,
            notifier,
            handlers: Vec::new(),
            tally: OutcomeTally::new(),
            current_sequence: None,
            last_forwarded: None,
            forwarding: config.engine.forward_finalized,
            fingerprint_prefix_chars: config.engine.fingerprint_prefix_chars,
            stale_active_after: (config.schedule.stale_active_after > 0)
                .then_some(config.schedule.stale_active_after),
        }
    }

    /// Register an extra consumer of prediction signals.
    pub fn add_signal_handler(&mut self, handler: Box<dyn SignalHandler + Send>) {
        self.handlers.push(handler);
    }

    /// Turn forwarding of finalized records on or off.
    pub fn set_forwarding(&mut self, enabled: bool) {
        tracing::info!(enabled, "Record forwarding toggled");
        self.forwarding = enabled;
    }

    pub fn forwarding(&self) -> bool {
        self.forwarding
    }

    /// Run one delivered message through the pipeline.
    ///
    /// Bad input is never an error: it is reported as
    /// [`DispatchOutcome::Ignored`] and leaves state untouched, apart from a
    /// fingerprint being recorded for records that got past dedup.
    pub fn process_message(&mut self, text: &str, observed_at: NaiveDateTime) -> DispatchOutcome {
        if !record::is_finalized(text) {
            tracing::trace!("Record not finalized, ignoring");
            return DispatchOutcome::Ignored(DropReason::NotFinalized);
        }

        let Some(sequence) = record::extract_sequence(text) else {
            tracing::debug!("Finalized record without sequence tag");
            return DispatchOutcome::Ignored(DropReason::ParseFailure);
        };

        let fingerprint = Fingerprint::new(sequence, text, self.fingerprint_prefix_chars);
        if !self.dedup.check_and_insert(fingerprint) {
            tracing::debug!(sequence, "Duplicate record, ignoring");
            return DispatchOutcome::Ignored(DropReason::DuplicateRecord);
        }

        let groups = record::extract_groups(text);
        if groups.len() < record::MIN_GROUPS {
            tracing::debug!(sequence, found = groups.len(), "Too few marker groups");
            return DispatchOutcome::Ignored(DropReason::AmbiguousGroup {
                found: groups.len(),
            });
        }

        let record = GameRecord {
            sequence,
            groups: groups.into_iter().map(str::to_string).collect(),
            observed_at,
        };
        let mut signals = Vec::new();
        if self.forwarding && self.last_forwarded != Some(sequence) {
            self.last_forwarded = Some(sequence);
            signals.push(PredictionSignal::Forwarded {
                sequence,
                text: text.to_string(),
            });
        } else if !self.forwarding {
            tracing::trace!(sequence, "Forwarding disabled, record handled silently");
        }

        let signals = self.run_pipeline(record, signals);
        DispatchOutcome::Processed { sequence, signals }
    }

    /// Pipeline steps after parsing: history, rules, verification,
    /// promotion, cursor and signal dispatch.
    ///
    /// A record below the cursor is a late revision of an old hand: it
    /// replaces the history entry but does not trigger, verify or promote,
    /// since its targets were already decided.
    pub fn process_record(&mut self, record: GameRecord) -> Vec<PredictionSignal> {
        self.run_pipeline(record, Vec::new())
    }

    fn run_pipeline(
        &mut self,
        record: GameRecord,
        mut signals: Vec<PredictionSignal>,
    ) -> Vec<PredictionSignal> {
        let sequence = record.sequence;
        let now = record.observed_at;

        if let Some(evicted) = self.history.insert(record.clone()) {
            tracing::trace!(evicted, "History full, evicted oldest record");
        }

        if let Some(cursor) = self.current_sequence
            && sequence < cursor
        {
            tracing::debug!(sequence, cursor, "Late revision of an old record, history only");
            self.dispatch(&signals);
            return signals;
        }

        for strategy in &self.strategies {
            let Some(trigger) = strategy.evaluate(&record, &self.history) else {
                continue;
            };
            let variant = trigger.variant;
            let prediction =
                Prediction::from_trigger(trigger, self.scheduler.backup_offset(), now);
            let (target, suit, origin) = (prediction.target, prediction.predicted, prediction.origin);
            if self.scheduler.enqueue(prediction) {
                signals.push(PredictionSignal::Queued {
                    target,
                    suit,
                    origin,
                });
            } else {
                signals.push(PredictionSignal::Rejected {
                    target,
                    variant: Some(variant),
                });
            }
        }

        signals.extend(self.scheduler.verify(
            sequence,
            record.primary_group(),
            now,
            self.notifier.as_mut(),
        ));
        signals.extend(self.scheduler.advance(sequence, self.notifier.as_mut()));

        if let Some(max_lag) = self.stale_active_after {
            signals.extend(
                self.scheduler
                    .expire_stale(sequence, max_lag, self.notifier.as_mut()),
            );
        }

        self.current_sequence = Some(sequence);
        self.dispatch(&signals);

        tracing::debug!(
            sequence,
            signals = signals.len(),
            active = self.scheduler.active_len(),
            queued = self.scheduler.queued_len(),
            "Record processed"
        );
        signals
    }

    /// Wipe all state. Announced predictions are dropped without an
    /// amendment.
    pub fn reset(&mut self) {
        tracing::info!(
            active = self.scheduler.active_len(),
            queued = self.scheduler.queued_len(),
            history = self.history.len(),
            "Daily reset, clearing engine state"
        );
        self.history.clear();
        self.dedup.clear();
        self.scheduler.clear();
        self.current_sequence = None;
        self.last_forwarded = None;
        self.dispatch(&[PredictionSignal::Reset]);
    }

    fn dispatch(&mut self, signals: &[PredictionSignal]) {
        if signals.is_empty() {
            return;
        }
        self.tally.handle_signals(signals);
        for handler in &mut self.handlers {
            handler.handle_signals(signals);
        }
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            current_sequence: self.current_sequence,
            active: self.scheduler.active().cloned().collect(),
            queued: self.scheduler.queued().cloned().collect(),
            history_len: self.history.len(),
            dedup_len: self.dedup.len(),
            forwarding: self.forwarding,
            last_forwarded: self.last_forwarded,
        }
    }

    pub fn stats(&self) -> &OutcomeTally {
        &self.tally
    }

    pub fn current_sequence(&self) -> Option<u32> {
        self.current_sequence
    }

    pub fn history(&self) -> &HistoryRing {
        &self.history
    }

    pub fn scheduler(&self) -> &PredictionScheduler {
        &self.scheduler
    }

    pub fn dedup(&self) -> &DedupStore {
        &self.dedup
    }
}
