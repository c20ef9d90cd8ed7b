use std::collections::VecDeque;

/// Newest-first log with an optional cap; the oldest entry goes first.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(
        from = "EventLogRepr<T>",
        bound(deserialize = "T: serde::Deserialize<'de>")
    )
)]
pub struct EventLog<T> {
    entries: VecDeque<T>,
    capacity: Option<usize>,
    pushed: u64,
}

impl<T> EventLog<T> {
    pub const DEFAULT_CAPACITY: usize = 100;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(max: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: Some(max.max(1)),
            pushed: 0,
        }
    }

    pub fn unbounded() -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: None,
            pushed: 0,
        }
    }

    pub fn push(&mut self, entry: T) {
        self.entries.push_front(entry);
        self.pushed += 1;
        if let Some(max) = self.capacity {
            self.entries.truncate(max);
        }
    }

    pub fn latest(&self) -> Option<&T> {
        self.entries.front()
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Total pushes over the log's lifetime, including evicted entries.
    pub fn pushed(&self) -> u64 {
        self.pushed
    }

}

impl<T> Default for EventLog<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-capacity FIFO keeping the most recent `capacity` items in append order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(
        from = "SlidingWindowRepr<T>",
        bound(deserialize = "T: serde::Deserialize<'de>")
    )
)]
pub struct SlidingWindow<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> SlidingWindow<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, item: T) {
        self.items.push_back(item);
        while self.items.len() > self.capacity {
            self.items.pop_front();
        }
    }

    pub fn latest(&self) -> Option<&T> {
        self.items.back()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.iter().cloned().collect()
    }
}

// Deserialized shapes go back through the constructors so the capacity floor
// and the length cap hold for stored data too.

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct EventLogRepr<T> {
    entries: VecDeque<T>,
    capacity: Option<usize>,
    #[serde(default)]
    pushed: u64,
}

#[cfg(feature = "serde")]
impl<T> From<EventLogRepr<T>> for EventLog<T> {
    fn from(repr: EventLogRepr<T>) -> Self {
        let mut log = match repr.capacity {
            Some(max) => EventLog::with_capacity(max),
            None => EventLog::unbounded(),
        };
        log.pushed = repr.pushed.max(repr.entries.len() as u64);
        log.entries = repr.entries;
        if let Some(max) = log.capacity {
            log.entries.truncate(max);
        }
        log
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct SlidingWindowRepr<T> {
    items: VecDeque<T>,
    capacity: usize,
}

#[cfg(feature = "serde")]
impl<T> From<SlidingWindowRepr<T>> for SlidingWindow<T> {
    fn from(repr: SlidingWindowRepr<T>) -> Self {
        let mut window = SlidingWindow::new(repr.capacity);
        for item in repr.items {
            window.push(item);
        }
        window
    }
}
