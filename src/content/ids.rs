use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Allocates identifiers for records created in in-memory mode.
///
/// Identifiers combine the current unix-millisecond timestamp, which keeps
/// them roughly time-ordered, with a process-wide monotonic counter that
/// guarantees uniqueness even when an entire bulk insert lands within the
/// same millisecond. The SQLite store never uses this, its rowids are
/// authoritative there.
pub struct IdAllocator {
    counter: AtomicU64,
}

impl IdAllocator {
    pub fn new() -> Self {
        IdAllocator {
            counter: AtomicU64::new(0),
        }
    }

    pub fn allocate(&self) -> String {
        let sequence = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", Utc::now().timestamp_millis(), sequence)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn identifiers_are_unique_within_a_burst() {
        let allocator = IdAllocator::new();
        let ids: HashSet<String> = (0..1000).map(|_| allocator.allocate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn identifiers_are_unique_across_threads() {
        let allocator = Arc::new(IdAllocator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let allocator = allocator.clone();
                std::thread::spawn(move || {
                    (0..250).map(|_| allocator.allocate()).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut all = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(all.insert(id));
            }
        }
        assert_eq!(all.len(), 1000);
    }
}
