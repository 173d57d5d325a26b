use std::sync::Mutex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// A mutex-guarded, insertion-ordered collection of records.
///
/// Sorting is stable in both directions: records with equal keys come back in
/// insertion order. Flyers and prayer requests rely on this for their
/// newest-first listings, so the descending case must not be implemented as
/// an ascending sort followed by a reverse.
pub struct MemoryCollection<R> {
    records: Mutex<Vec<R>>,
}

impl<R: Clone> MemoryCollection<R> {
    pub fn new() -> Self {
        MemoryCollection {
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn insert_one(&self, record: R) -> R {
        let mut records = self.records.lock().unwrap();
        records.push(record.clone());
        record
    }

    pub fn insert_many(&self, batch: Vec<R>) -> usize {
        let mut records = self.records.lock().unwrap();
        let count = batch.len();
        records.extend(batch);
        count
    }

    /// Returns every record ordered by the given key, ties broken by
    /// insertion order.
    pub fn list_by_key<K: Ord>(&self, direction: SortDirection, key: impl Fn(&R) -> K) -> Vec<R> {
        let mut items = self.records.lock().unwrap().clone();
        match direction {
            SortDirection::Ascending => items.sort_by(|a, b| key(a).cmp(&key(b))),
            SortDirection::Descending => items.sort_by(|a, b| key(b).cmp(&key(a))),
        }
        items
    }

    /// Removes the first record matching the predicate. Returns whether a
    /// record was found and removed.
    pub fn remove_first(&self, matches: impl Fn(&R) -> bool) -> bool {
        let mut records = self.records.lock().unwrap();
        match records.iter().position(matches) {
            Some(index) => {
                records.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<R: Clone> Default for MemoryCollection<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Record {
        key: u32,
        label: &'static str,
    }

    fn record(key: u32, label: &'static str) -> Record {
        Record { key, label }
    }

    #[test]
    fn lists_ascending_by_key() {
        let collection = MemoryCollection::new();
        collection.insert_one(record(3, "c"));
        collection.insert_one(record(1, "a"));
        collection.insert_one(record(2, "b"));

        let keys: Vec<u32> = collection
            .list_by_key(SortDirection::Ascending, |r| r.key)
            .into_iter()
            .map(|r| r.key)
            .collect();
        assert_eq!(keys, vec![1, 2, 3]);
    }

    #[test]
    fn descending_ties_keep_insertion_order() {
        let collection = MemoryCollection::new();
        collection.insert_one(record(1, "old"));
        collection.insert_one(record(2, "first"));
        collection.insert_one(record(2, "second"));
        collection.insert_one(record(2, "third"));

        let labels: Vec<&str> = collection
            .list_by_key(SortDirection::Descending, |r| r.key)
            .into_iter()
            .map(|r| r.label)
            .collect();
        assert_eq!(labels, vec!["first", "second", "third", "old"]);
    }

    #[test]
    fn remove_first_reports_absence() {
        let collection = MemoryCollection::new();
        collection.insert_many(vec![record(1, "a"), record(2, "b")]);

        assert!(collection.remove_first(|r| r.key == 2));
        assert_eq!(collection.len(), 1);

        assert!(!collection.remove_first(|r| r.key == 42));
        assert_eq!(collection.len(), 1);
    }
}
