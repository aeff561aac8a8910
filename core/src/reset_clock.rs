//! Daily reset timer.
//!
//! All engine state is wiped once a day at a fixed wall-clock time in a fixed
//! UTC offset. The timer does not touch the engine: it posts a reset command
//! to the service queue, so the wipe lands between two pipeline runs.

use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveTime, TimeDelta, Utc};
use suitcast_types::ResetConfig;
use tokio::task::JoinHandle;

use crate::config::ConfigError;
use crate::service::ServiceHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetSchedule {
    time: NaiveTime,
    offset: FixedOffset,
}

impl ResetSchedule {
    pub fn new(time: NaiveTime, offset: FixedOffset) -> Self {
        Self { time, offset }
    }

    pub fn from_config(config: &ResetConfig) -> Result<Self, ConfigError> {
        let time = NaiveTime::parse_from_str(config.time.trim(), "%H:%M").map_err(|_| {
            ConfigError::InvalidResetTime {
                value: config.time.clone(),
            }
        })?;
        let offset = config
            .utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(ConfigError::InvalidUtcOffset {
                minutes: config.utc_offset_minutes,
            })?;
        Ok(Self { time, offset })
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// First instant strictly after `now` at which the local clock reads the
    /// reset time.
    pub fn next_reset_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let local = now.with_timezone(&self.offset).naive_local();
        let mut candidate = local.date().and_time(self.time);
        if candidate <= local {
            candidate += TimeDelta::days(1);
        }
        let utc_offset = TimeDelta::seconds(i64::from(self.offset.local_minus_utc()));
        (candidate - utc_offset).and_utc()
    }

    /// Run the timer until the service goes away.
    pub fn spawn(self, handle: ServiceHandle) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut last_fired: Option<DateTime<Utc>> = None;
            loop {
                let now = Utc::now();
                // Never fire the same boundary twice if the wall clock lags
                // the timer.
                let from = last_fired.map_or(now, |fired| fired.max(now));
                let next = self.next_reset_after(from);
                let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
                tracing::info!(next_reset = %next, "Daily reset scheduled");

                tokio::time::sleep(wait).await;
                if let Err(e) = handle.daily_reset().await {
                    tracing::debug!(error = %e, "Service closed, stopping reset clock");
                    break;
                }
                last_fired = Some(next);
            }
        })
    }
}
