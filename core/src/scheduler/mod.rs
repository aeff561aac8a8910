//! Prediction lifecycle.
//!
//! Predictions wait in a queue until the stream gets close to their target,
//! are then announced (subject to a cap on concurrently announced
//! predictions) and verified against the target record and, on a miss, the
//! record after it. A double miss schedules a backup prediction.
//!
//! ```text
//!  enqueue ──► Queued ──advance──► Active ──verify(target)──► Confirmed (1st)
//!                │                   │ miss
//!                │ target passed     ▼
//!                ▼             AwaitingSecondChance ──verify(target+1)──► Confirmed (2nd)
//!             dropped                │ miss
//!                                    ▼
//!                                  Failed ──► backup enqueued
//! ```

mod prediction;


pub use prediction::{Prediction, PredictionOrigin, PredictionState};

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use suitcast_types::{ScheduleConfig, StatusGlyph};

use crate::events::{Attempt, PredictionSignal};
use crate::notifier::Notifier;
use crate::suits::has_marker;

#[derive(Debug, Clone)]
pub struct PredictionScheduler {
    /// Not yet announced, keyed by target.
    queued: BTreeMap<u32, Prediction>,
    /// Announced and awaiting verification, keyed by target.
    active: BTreeMap<u32, Prediction>,
    max_active: usize,
    proximity_window: u32,
    backup_offset: u32,
}

impl PredictionScheduler {
    pub fn new(config: &ScheduleConfig, backup_offset: u32) -> Self {
        Self {
            queued: BTreeMap::new(),
            active: BTreeMap::new(),
            max_active: config.max_active,
            proximity_window: config.proximity_window,
            backup_offset,
        }
    }

    pub fn backup_offset(&self) -> u32 {
        self.backup_offset
    }

    /// Whether a prediction for `target` is queued or active.
    pub fn contains(&self, target: u32) -> bool {
        self.queued.contains_key(&target) || self.active.contains_key(&target)
    }

    /// Queue a prediction. Returns `false`, leaving state untouched, if its
    /// target is already tracked.
    pub fn enqueue(&mut self, mut prediction: Prediction) -> bool {
        if self.contains(prediction.target) {
            tracing::info!(
                target_seq = prediction.target,
                "Prediction already tracked for target, skipping"
            );
            return false;
        }
        prediction.state = PredictionState::Queued;
        tracing::info!(
            target_seq = prediction.target,
            suit = %prediction.predicted,
            origin = ?prediction.origin,
            "Prediction queued"
        );
        self.queued.insert(prediction.target, prediction);
        true
    }

    /// Drop expired queue entries and announce those within the proximity
    /// window, nearest first, while under the concurrency cap.
    pub fn advance(&mut self, current: u32, notifier: &mut dyn Notifier) -> Vec<PredictionSignal> {
        let mut signals = Vec::new();

        // Everything at or below `current` has passed.
        let pending = match current.checked_add(1) {
            Some(next) => self.queued.split_off(&next),
            None => BTreeMap::new(),
        };
        let expired = std::mem::replace(&mut self.queued, pending);
        for target in expired.into_keys() {
            tracing::info!(target_seq = target, current, "Queued prediction expired before announcement");
            signals.push(PredictionSignal::Expired {
                target,
                announced: false,
            });
        }

        while self.active.len() < self.max_active {
            let Some(entry) = self.queued.first_entry() else {
                break;
            };
            // Ascending order: if the nearest is out of range, all are.
            if entry.key() - current > self.proximity_window {
                break;
            }
            let mut prediction = entry.remove();
            prediction.state = PredictionState::Active;

            match notifier.publish(&prediction.render(StatusGlyph::Pending)) {
                Ok(handle) => prediction.message = Some(handle),
                Err(e) => {
                    tracing::warn!(target_seq = prediction.target, error = %e, "Failed to publish prediction");
                }
            }
            tracing::info!(
                target_seq = prediction.target,
                suit = %prediction.predicted,
                current,
                "Prediction announced"
            );
            signals.push(PredictionSignal::Announced {
                target: prediction.target,
                suit: prediction.predicted,
                message: prediction.message,
            });
            self.active.insert(prediction.target, prediction);
        }

        signals
    }

    /// Check the record at `current` against active predictions.
    ///
    /// The first attempt looks at a prediction targeting `current`; the
    /// second at one targeting `current - 1` that already missed once.
    pub fn verify(
        &mut self,
        current: u32,
        primary_group: &str,
        now: NaiveDateTime,
        notifier: &mut dyn Notifier,
    ) -> Vec<PredictionSignal> {
        let mut signals = Vec::new();

        let first_attempt = self
            .active
            .get(&current)
            .filter(|p| p.state == PredictionState::Active)
            .map(|p| has_marker(primary_group, p.predicted));
        match first_attempt {
            Some(true) => {
                if let Some(mut prediction) = self.active.remove(&current) {
                    prediction.state = PredictionState::Confirmed;
                    amend(notifier, &prediction, StatusGlyph::ConfirmedFirst);
                    tracing::info!(target_seq = current, suit = %prediction.predicted, "Prediction confirmed at target");
                    signals.push(PredictionSignal::Confirmed {
                        target: current,
                        suit: prediction.predicted,
                        attempt: Attempt::First,
                    });
                }
            }
            Some(false) => {
                if let Some(prediction) = self.active.get_mut(&current) {
                    prediction.state = PredictionState::AwaitingSecondChance;
                    tracing::info!(target_seq = current, suit = %prediction.predicted, "Suit missing at target, waiting for next record");
                    signals.push(PredictionSignal::SecondChance { target: current });
                }
            }
            None => {}
        }

        if let Some(previous) = current.checked_sub(1)
            && self
                .active
                .get(&previous)
                .is_some_and(|p| p.state == PredictionState::AwaitingSecondChance)
            && let Some(mut prediction) = self.active.remove(&previous)
        {
            if has_marker(primary_group, prediction.predicted) {
                prediction.state = PredictionState::Confirmed;
                amend(notifier, &prediction, StatusGlyph::ConfirmedSecond);
                tracing::info!(target_seq = previous, suit = %prediction.predicted, "Prediction confirmed on second attempt");
                signals.push(PredictionSignal::Confirmed {
                    target: previous,
                    suit: prediction.predicted,
                    attempt: Attempt::Second,
                });
            } else {
                prediction.state = PredictionState::Failed;
                amend(notifier, &prediction, StatusGlyph::Failed);
                tracing::info!(target_seq = previous, suit = %prediction.predicted, "Prediction failed, scheduling backup");
                signals.push(PredictionSignal::Failed {
                    target: previous,
                    suit: prediction.predicted,
                });

                let backup = prediction.backup(self.backup_offset, now);
                let (target, suit, origin) = (backup.target, backup.predicted, backup.origin);
                if self.enqueue(backup) {
                    signals.push(PredictionSignal::Queued {
                        target,
                        suit,
                        origin,
                    });
                } else {
                    signals.push(PredictionSignal::Rejected {
                        target,
                        variant: None,
                    });
                }
            }
        }

        signals
    }

    /// Drop announced predictions whose target trails `current` by more than
    /// `max_lag` records. Covers targets the stream skipped, which would
    /// otherwise hold an active slot until the daily reset.
    pub fn expire_stale(
        &mut self,
        current: u32,
        max_lag: u32,
        notifier: &mut dyn Notifier,
    ) -> Vec<PredictionSignal> {
        let stale: Vec<u32> = self
            .active
            .keys()
            .copied()
            .filter(|target| target.saturating_add(max_lag) < current)
            .collect();

        let mut signals = Vec::with_capacity(stale.len());
        for target in stale {
            if let Some(prediction) = self.active.remove(&target) {
                amend(notifier, &prediction, StatusGlyph::Expired);
                tracing::info!(target_seq = target, current, "Active prediction went stale");
                signals.push(PredictionSignal::Expired {
                    target,
                    announced: true,
                });
            }
        }
        signals
    }

    pub fn get(&self, target: u32) -> Option<&Prediction> {
        self.active.get(&target).or_else(|| self.queued.get(&target))
    }

    /// Active predictions in ascending target order.
    pub fn active(&self) -> impl Iterator<Item = &Prediction> {
        self.active.values()
    }

    /// Queued predictions in ascending target order.
    pub fn queued(&self) -> impl Iterator<Item = &Prediction> {
        self.queued.values()
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn queued_len(&self) -> usize {
        self.queued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.queued.is_empty()
    }

    pub fn clear(&mut self) {
        self.queued.clear();
        self.active.clear();
    }
}

fn amend(notifier: &mut dyn Notifier, prediction: &Prediction, status: StatusGlyph) {
    let Some(handle) = prediction.message else {
        tracing::debug!(target_seq = prediction.target, "No published message to amend");
        return;
    };
    if let Err(e) = notifier.amend(handle, &prediction.render(status)) {
        tracing::warn!(target_seq = prediction.target, error = %e, "Failed to amend prediction");
    }
}
