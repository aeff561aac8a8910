mod dedup;
mod history;

pub use dedup::{DedupStore, Fingerprint};
pub use history::HistoryRing;
