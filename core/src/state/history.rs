use std::collections::BTreeMap;

use crate::record::GameRecord;

/// Bounded store of recent records keyed by sequence number.
///
/// Once over capacity the numerically smallest sequence is evicted, which is
/// oldest-first as long as the source numbers records monotonically.
#[derive(Debug, Clone)]
pub struct HistoryRing {
    records: BTreeMap<u32, GameRecord>,
    capacity: usize,
}

impl HistoryRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: BTreeMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Insert a record, replacing any earlier revision with the same sequence.
    /// Returns the evicted sequence number, if any.
    pub fn insert(&mut self, record: GameRecord) -> Option<u32> {
        self.records.insert(record.sequence, record);
        if self.records.len() > self.capacity {
            return self.records.pop_first().map(|(sequence, _)| sequence);
        }
        None
    }

    pub fn get(&self, sequence: u32) -> Option<&GameRecord> {
        self.records.get(&sequence)
    }

    /// Record `distance` positions before `sequence`, if still held.
    pub fn lookback(&self, sequence: u32, distance: u32) -> Option<&GameRecord> {
        sequence
            .checked_sub(distance)
            .and_then(|prev| self.records.get(&prev))
    }

    pub fn contains(&self, sequence: u32) -> bool {
        self.records.contains_key(&sequence)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records in ascending sequence order.
    pub fn iter(&self) -> impl Iterator<Item = &GameRecord> {
        self.records.values()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn record(sequence: u32) -> GameRecord {
        GameRecord {
            sequence,
            groups: vec!["K♥".to_string(), "A♠".to_string()],
            observed_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn test_evicts_smallest_sequence() {
        let mut ring = HistoryRing::new(3);
        assert_eq!(ring.insert(record(10)), None);
        assert_eq!(ring.insert(record(12)), None);
        assert_eq!(ring.insert(record(11)), None);
        assert_eq!(ring.insert(record(13)), Some(10));
        assert_eq!(ring.len(), 3);
        assert!(!ring.contains(10));
        let order: Vec<u32> = ring.iter().map(|r| r.sequence).collect();
        assert_eq!(order, vec![11, 12, 13]);
    }

    #[test]
    fn test_reinsert_replaces_without_eviction() {
        let mut ring = HistoryRing::new(2);
        ring.insert(record(1));
        ring.insert(record(2));
        let mut edited = record(2);
        edited.groups[0] = "Q♦".to_string();
        assert_eq!(ring.insert(edited), None);
        assert_eq!(ring.len(), 2);
        assert_eq!(ring.get(2).unwrap().primary_group(), "Q♦");
    }

    #[test]
    fn test_lookback() {
        let mut ring = HistoryRing::new(10);
        ring.insert(record(5));
        ring.insert(record(7));
        assert_eq!(ring.lookback(7, 2).map(|r| r.sequence), Some(5));
        assert!(ring.lookback(7, 1).is_none());
        assert!(ring.lookback(1, 2).is_none());
    }

    #[test]
    fn test_clear() {
        let mut ring = HistoryRing::new(4);
        ring.insert(record(1));
        ring.clear();
        assert!(ring.is_empty());
    }
}
