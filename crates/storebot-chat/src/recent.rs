use std::collections::VecDeque;

/// Default number of page URLs remembered.
pub const RECENT_CAPACITY: usize = 10;

/// Bounded FIFO of recently suggested page URLs. Pushing past capacity
/// evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct RecentSuggestions {
    urls: VecDeque<String>,
    capacity: usize,
}

impl Default for RecentSuggestions {
    fn default() -> Self {
        Self::with_capacity(RECENT_CAPACITY)
    }
}

impl RecentSuggestions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            urls: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, url: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        while self.urls.len() >= self.capacity {
            self.urls.pop_front();
        }
        self.urls.push_back(url.into());
    }

    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.urls.iter().any(|u| u == url)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn clear(&mut self) {
        self.urls.clear();
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_exceeds_capacity() {
        let mut recent = RecentSuggestions::new();
        for i in 0..25 {
            recent.push(format!("https://shop.example/products/{i}"));
            assert!(recent.len() <= RECENT_CAPACITY);
        }
        assert_eq!(recent.len(), RECENT_CAPACITY);
    }

    #[test]
    fn eleventh_push_evicts_oldest() {
        let mut recent = RecentSuggestions::new();
        for i in 0..11 {
            recent.push(format!("p{i}"));
        }
        assert!(!recent.contains("p0"));
        assert!(recent.contains("p1"));
        assert!(recent.contains("p10"));
        assert_eq!(recent.iter().next(), Some("p1"));
    }

    #[test]
    fn duplicates_are_kept() {
        let mut recent = RecentSuggestions::with_capacity(3);
        recent.push("a");
        recent.push("a");
        assert_eq!(recent.len(), 2);
    }

    #[test]
    fn clear_empties() {
        let mut recent = RecentSuggestions::new();
        recent.push("a");
        recent.clear();
        assert!(recent.is_empty());
        assert!(!recent.contains("a"));
    }
}
