//! Bounded document batch.

use csv_indexer_repository::config::MAX_BATCH_SIZE;
use csv_indexer_shared::Document;

/// Accumulates documents up to a fixed capacity.
///
/// Documents come back out in the order they were appended. The batch never
/// holds more than `capacity` documents: the append that fills it hands the
/// whole batch back and starts a new one.
#[derive(Debug)]
pub struct BatchAccumulator {
    capacity: usize,
    documents: Vec<Document>,
}

impl BatchAccumulator {
    /// Create an accumulator. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            documents: Vec::with_capacity(capacity),
        }
    }

    /// Append a document, returning the full batch once capacity is reached.
    #[must_use = "a full batch must be uploaded"]
    pub fn append(&mut self, document: Document) -> Option<Vec<Document>> {
        self.documents.push(document);
        if self.is_full() {
            Some(self.drain())
        } else {
            None
        }
    }

    pub fn is_full(&self) -> bool {
        self.documents.len() >= self.capacity
    }

    /// Take the current contents and reset to empty.
    pub fn drain(&mut self) -> Vec<Document> {
        std::mem::replace(&mut self.documents, Vec::with_capacity(self.capacity))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for BatchAccumulator {
    fn default() -> Self {
        Self::new(MAX_BATCH_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(key: usize) -> Document {
        Document::new("ID", key.to_string())
    }

    #[test]
    fn test_append_returns_batch_at_capacity() {
        let mut batch = BatchAccumulator::new(3);
        assert!(batch.append(doc(1)).is_none());
        assert!(batch.append(doc(2)).is_none());

        let full = batch.append(doc(3)).unwrap();
        let keys: Vec<&str> = full.iter().map(Document::key).collect();
        assert_eq!(keys, vec!["1", "2", "3"]);
        assert!(batch.is_empty());
    }

    #[test]
    fn test_capacity_is_never_exceeded() {
        let mut batch = BatchAccumulator::new(1000);
        let mut sizes = Vec::new();
        for i in 0..2500 {
            if let Some(full) = batch.append(doc(i)) {
                sizes.push(full.len());
            }
            assert!(batch.len() < 1000);
        }
        sizes.push(batch.drain().len());
        assert_eq!(sizes, vec![1000, 1000, 500]);
    }

    #[test]
    fn test_drain_resets() {
        let mut batch = BatchAccumulator::default();
        assert_eq!(batch.capacity(), 1000);
        let _ = batch.append(doc(1));
        assert_eq!(batch.len(), 1);
        assert!(!batch.is_full());

        assert_eq!(batch.drain().len(), 1);
        assert!(batch.is_empty());
        assert!(batch.drain().is_empty());
    }

    #[test]
    fn test_zero_capacity_is_one() {
        let mut batch = BatchAccumulator::new(0);
        assert_eq!(batch.capacity(), 1);
        assert_eq!(batch.append(doc(1)).map(|b| b.len()), Some(1));
    }
}
