use std::collections::VecDeque;

use hashbrown::HashSet;
use suitcast_types::DedupPolicy;

/// Identity of one delivered revision of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    pub sequence: u32,
    pub prefix: String,
}

impl Fingerprint {
    /// Sequence number plus the first `prefix_chars` characters of the text.
    pub fn new(sequence: u32, text: &str, prefix_chars: usize) -> Self {
        Self {
            sequence,
            prefix: text.chars().take(prefix_chars).collect(),
        }
    }
}

/// Bounded set of fingerprints already processed.
///
/// With [`DedupPolicy::Clear`] the whole set is dropped once it grows past
/// the ceiling, so a record seen just before the wipe can be processed
/// again. [`DedupPolicy::EvictOldest`] keeps the newest `capacity` entries.
#[derive(Debug, Clone)]
pub struct DedupStore {
    seen: HashSet<Fingerprint>,
    order: VecDeque<Fingerprint>,
    capacity: usize,
    policy: DedupPolicy,
}

impl DedupStore {
    pub fn new(capacity: usize, policy: DedupPolicy) -> Self {
        Self {
            seen: HashSet::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
            policy,
        }
    }

    /// Record a fingerprint. Returns `false` if it was already present.
    pub fn check_and_insert(&mut self, fingerprint: Fingerprint) -> bool {
        if self.seen.contains(&fingerprint) {
            return false;
        }

        match self.policy {
            DedupPolicy::Clear => {
                self.seen.insert(fingerprint);
                if self.seen.len() > self.capacity {
                    tracing::debug!(size = self.seen.len(), "Dedup store over ceiling, clearing");
                    self.seen.clear();
                }
            }
            DedupPolicy::EvictOldest => {
                self.order.push_back(fingerprint.clone());
                self.seen.insert(fingerprint);
                while self.order.len() > self.capacity {
                    if let Some(oldest) = self.order.pop_front() {
                        self.seen.remove(&oldest);
                    }
                }
            }
        }
        true
    }

    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.seen.contains(fingerprint)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn clear(&mut self) {
        self.seen.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fp(sequence: u32) -> Fingerprint {
        Fingerprint::new(sequence, &format!("#N{sequence}. ✅(K♥)(A♠)"), 50)
    }

    #[test]
    fn test_prefix_is_char_based() {
        let fp = Fingerprint::new(1, "♥♥♥♥", 2);
        assert_eq!(fp.prefix, "♥♥");
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut store = DedupStore::new(10, DedupPolicy::Clear);
        assert!(store.check_and_insert(fp(1)));
        assert!(!store.check_and_insert(fp(1)));
        assert!(store.check_and_insert(fp(2)));
    }

    #[test]
    fn test_clear_policy_wipes_past_ceiling() {
        let mut store = DedupStore::new(3, DedupPolicy::Clear);
        for seq in 1..=3 {
            store.check_and_insert(fp(seq));
        }
        assert_eq!(store.len(), 3);
        store.check_and_insert(fp(4));
        assert!(store.is_empty());
        // Seen before the wipe, accepted again.
        assert!(store.check_and_insert(fp(1)));
    }

    #[test]
    fn test_evict_oldest_keeps_newest() {
        let mut store = DedupStore::new(3, DedupPolicy::EvictOldest);
        for seq in 1..=5 {
            assert!(store.check_and_insert(fp(seq)));
        }
        assert_eq!(store.len(), 3);
        assert!(!store.contains(&fp(2)));
        assert!(store.contains(&fp(3)));
        assert!(store.contains(&fp(5)));
        assert!(!store.check_and_insert(fp(4)));
    }
}
