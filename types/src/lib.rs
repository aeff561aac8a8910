pub mod config;
pub mod formatting;

pub use config::{
    AppConfig, DedupPolicy, EngineConfig, ResetConfig, RuleConfig, RuleVariant, ScheduleConfig,
    SourceConfig,
};
pub use formatting::StatusGlyph;
