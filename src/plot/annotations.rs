use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Identifies a plotted point: the series it belongs to and its exact coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnnotationKey {
    pub identity: String,
    pub x: DateTime<Utc>,
    pub y: u64,
}

/// Tooltip payload for one plotted point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationEntry {
    pub display_text: String,
    pub x: DateTime<Utc>,
    pub y: u64,
}

/// Flat map from `(identity, timestamp, retweet count)` to the tweet drawn there.
///
/// Keys are exact. Clicks resolve to a point index first and the stored
/// coordinates of that point are used for the lookup, so screen positions
/// never have to round-trip back to timestamps.
#[derive(Debug, Default, Clone)]
pub struct AnnotationIndex {
    entries: HashMap<AnnotationKey, AnnotationEntry>,
}

impl AnnotationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing and returning any entry already at that key.
    pub fn insert(
        &mut self,
        identity: &str,
        x: DateTime<Utc>,
        y: u64,
        display_text: String,
    ) -> Option<AnnotationEntry> {
        let key = AnnotationKey {
            identity: identity.to_string(),
            x,
            y,
        };
        self.entries.insert(key, AnnotationEntry { display_text, x, y })
    }

    pub fn lookup(&self, identity: &str, x: DateTime<Utc>, y: u64) -> Option<&AnnotationEntry> {
        let key = AnnotationKey {
            identity: identity.to_string(),
            x,
            y,
        };
        self.entries.get(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t1() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap()
    }

    #[test]
    fn test_lookup_inserted_entry() {
        let mut index = AnnotationIndex::new();
        index.insert("alice", t1(), 5, "hi".to_string());

        let entry = index.lookup("alice", t1(), 5).unwrap();
        assert_eq!(entry.display_text, "hi");
        assert_eq!(entry.x, t1());
        assert_eq!(entry.y, 5);
    }

    #[test]
    fn test_lookup_wrong_y_misses() {
        let mut index = AnnotationIndex::new();
        index.insert("alice", t1(), 5, "hi".to_string());
        assert!(index.lookup("alice", t1(), 6).is_none());
    }

    #[test]
    fn test_lookup_wrong_identity_misses() {
        let mut index = AnnotationIndex::new();
        index.insert("alice", t1(), 5, "hi".to_string());
        assert!(index.lookup("bob", t1(), 5).is_none());
    }

    #[test]
    fn test_lookup_off_by_one_second_misses() {
        let mut index = AnnotationIndex::new();
        index.insert("alice", t1(), 5, "hi".to_string());
        let later = t1() + chrono::Duration::seconds(1);
        assert!(index.lookup("alice", later, 5).is_none());
    }

    #[test]
    fn test_insert_replaces_existing_key() {
        let mut index = AnnotationIndex::new();
        assert!(index.insert("alice", t1(), 5, "first".to_string()).is_none());

        let replaced = index.insert("alice", t1(), 5, "second".to_string()).unwrap();
        assert_eq!(replaced.display_text, "first");
        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup("alice", t1(), 5).unwrap().display_text, "second");
    }

    #[test]
    fn test_empty_index() {
        let index = AnnotationIndex::new();
        assert!(index.is_empty());
        assert!(index.lookup("alice", t1(), 0).is_none());
    }
}
