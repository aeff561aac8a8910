//! Configuration types shared by the core engine and the CLI.
//!
//! Every field carries a serde default so partial TOML files (or none at all)
//! load cleanly. Validation lives in `suitcast-core`, which owns the semantics.

use serde::{Deserialize, Serialize};

/// Top-level configuration, stored as TOML by `confy`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub rules: RuleConfig,
    pub schedule: ScheduleConfig,
    pub reset: ResetConfig,
    pub source: SourceConfig,
}

// ─────────────────────────────────────────────────────────────────────────────
// Engine state bounds
// ─────────────────────────────────────────────────────────────────────────────

/// How the dedup store sheds fingerprints once it reaches its ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DedupPolicy {
    /// Drop every fingerprint at once when the ceiling is exceeded.
    #[default]
    Clear,
    /// Keep the newest fingerprints, evicting the oldest one at a time.
    EvictOldest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of records kept in the history ring.
    pub history_capacity: usize,
    /// Fingerprint ceiling for the dedup store.
    pub dedup_capacity: usize,
    pub dedup_policy: DedupPolicy,
    /// Number of leading characters of the raw text folded into a fingerprint.
    pub fingerprint_prefix_chars: usize,
    /// Emit every finalized record as a `Forwarded` signal, once per sequence.
    pub forward_finalized: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_capacity: 100,
            dedup_capacity: 200,
            dedup_policy: DedupPolicy::Clear,
            fingerprint_prefix_chars: 50,
            forward_finalized: true,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Trigger rules
// ─────────────────────────────────────────────────────────────────────────────

/// Trigger strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleVariant {
    /// Record N and N-2 both carry exactly three cards in their primary group.
    AdjacentPair,
    /// The primary groups of N-1 and N together show exactly three suits.
    UnionOfTwo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Strategies evaluated for every record, in order.
    pub strategies: Vec<RuleVariant>,
    /// Target distance for the adjacent-pair rule.
    pub adjacent_offset: u32,
    /// Target distance for the union-of-two rule.
    pub union_offset: u32,
    /// Distance from a failed target to its backup prediction.
    pub backup_offset: u32,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            strategies: vec![RuleVariant::AdjacentPair],
            adjacent_offset: 5,
            union_offset: 18,
            backup_offset: 5,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scheduler
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Maximum number of simultaneously announced predictions.
    pub max_active: usize,
    /// A queued prediction is announced once `target - current` is at most this.
    pub proximity_window: u32,
    /// Drop announced predictions whose target lags the stream by more than
    /// this many records. A target the stream skips otherwise holds its
    /// active slot until the daily reset. `0` disables the sweep.
    pub stale_active_after: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            max_active: 2,
            proximity_window: 5,
            stale_active_after: 2,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Daily reset
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResetConfig {
    pub enabled: bool,
    /// Local wall-clock time of the reset, `HH:MM` (24h).
    pub time: String,
    /// Offset of the local wall clock from UTC, in minutes.
    pub utc_offset_minutes: i32,
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            time: "00:00".to_string(),
            utc_offset_minutes: 0,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Message source
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// File tailed for incoming records, one record per line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tail_path: Option<String>,
    /// Replay the whole file before following appended lines.
    pub from_start: bool,
    pub poll_interval_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            tail_path: None,
            from_start: false,
            poll_interval_ms: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.rules.strategies, vec![RuleVariant::AdjacentPair]);
        assert_eq!(config.schedule.max_active, 2);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let toml = r#"
[rules]
strategies = ["adjacent_pair", "union_of_two"]
union_offset = 12

[engine]
dedup_policy = "evict_oldest"

[schedule]
stale_active_after = 3

[reset]
time = "04:30"
utc_offset_minutes = 60
"#;

        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(
            config.rules.strategies,
            vec![RuleVariant::AdjacentPair, RuleVariant::UnionOfTwo]
        );
        assert_eq!(config.rules.union_offset, 12);
        assert_eq!(config.rules.adjacent_offset, 5);
        assert_eq!(config.engine.dedup_policy, DedupPolicy::EvictOldest);
        assert_eq!(config.engine.history_capacity, 100);
        assert_eq!(config.schedule.stale_active_after, 3);
        assert!(config.engine.forward_finalized);
        assert_eq!(config.reset.time, "04:30");
        assert_eq!(config.reset.utc_offset_minutes, 60);
    }

    #[test]
    fn test_default_config_serializes() {
        let text = toml::to_string_pretty(&AppConfig::default()).unwrap();
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, AppConfig::default());
    }
}
