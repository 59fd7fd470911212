//! Bounded linear history buffer.

use std::collections::VecDeque;
use tracing::trace;

/// Undo/redo history over values of type `T`.
///
/// `past` is ordered oldest first and grows at its tail. `future` is ordered
/// next-redo first and grows at its head. `present` is always defined.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct History<T> {
    past: VecDeque<T>,
    present: T,
    future: VecDeque<T>,
    /// Maximum number of past entries (None = unbounded).
    limit: Option<usize>,
}

impl<T> History<T> {
    /// Create an unbounded history with the given present value.
    pub fn new(present: T) -> Self {
        Self {
            past: VecDeque::new(),
            present,
            future: VecDeque::new(),
            limit: None,
        }
    }

    /// Create a history that keeps at most `limit` past entries.
    ///
    /// A limit of zero is treated as one.
    pub fn with_limit(present: T, limit: usize) -> Self {
        Self {
            limit: Some(limit.max(1)),
            ..Self::new(present)
        }
    }

    /// Create a history from an optional limit.
    pub fn bounded(present: T, limit: Option<usize>) -> Self {
        match limit {
            Some(limit) => Self::with_limit(present, limit),
            None => Self::new(present),
        }
    }

    /// Record a new present value. Clears the redo stack.
    pub fn set(&mut self, value: T) {
        let previous = std::mem::replace(&mut self.present, value);
        self.past.push_back(previous);
        self.future.clear();
        self.enforce_limit();
    }

    /// Step back one entry. Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop_back() else {
            return false;
        };

        let current = std::mem::replace(&mut self.present, previous);
        self.future.push_front(current);
        true
    }

    /// Step forward one entry. Returns false if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };

        let current = std::mem::replace(&mut self.present, next);
        self.past.push_back(current);
        self.enforce_limit();
        true
    }

    /// Drop both stacks and start over from `value`.
    pub fn reset(&mut self, value: T) {
        self.past.clear();
        self.future.clear();
        self.present = value;
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn present(&self) -> &T {
        &self.present
    }

    /// Past entries, oldest first.
    pub fn past(&self) -> impl ExactSizeIterator<Item = &T> + DoubleEndedIterator {
        self.past.iter()
    }

    /// Future entries, next redo first.
    pub fn future(&self) -> impl ExactSizeIterator<Item = &T> + DoubleEndedIterator {
        self.future.iter()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Consume the history, keeping only the present value.
    pub fn into_present(self) -> T {
        self.present
    }

    /// Derive a new present value from the current one and record it.
    pub fn update<F>(&mut self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let next = f(&self.present);
        self.set(next);
    }

    fn enforce_limit(&mut self) {
        if let Some(limit) = self.limit {
            while self.past.len() > limit {
                self.past.pop_front();
                trace!(limit, "discarded oldest history entry");
            }
        }
    }
}

impl<T: Default> Default for History<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_history_is_empty() {
        let history = History::new(0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.present(), &0);
    }

    #[test]
    fn test_set_enables_undo() {
        let mut history = History::new(0);
        history.set(1);
        assert!(history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.past().copied().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_undo_redo_on_empty_is_noop() {
        let mut history = History::new("only");
        assert!(!history.undo());
        assert!(!history.redo());
        assert_eq!(history.present(), &"only");
    }

    #[test]
    fn test_future_is_ordered_next_first() {
        let mut history = History::new(0);
        history.set(1);
        history.set(2);
        history.set(3);
        history.undo();
        history.undo();

        assert_eq!(history.present(), &1);
        assert_eq!(history.future().copied().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(history.past().copied().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_reset_clears_both_stacks() {
        let mut history = History::new(0);
        history.set(1);
        history.set(2);
        history.undo();
        history.reset(9);

        assert_eq!(history.present(), &9);
        assert_eq!(history.undo_depth(), 0);
        assert_eq!(history.redo_depth(), 0);
    }

    #[test]
    fn test_limit_discards_oldest() {
        let mut history = History::with_limit(0, 2);
        for i in 1..=5 {
            history.set(i);
        }

        assert_eq!(history.past().copied().collect::<Vec<_>>(), vec![3, 4]);
        assert!(history.undo());
        assert!(history.undo());
        assert!(!history.undo());
        assert_eq!(history.present(), &3);
    }

    #[test]
    fn test_limit_applies_to_redo() {
        let mut history = History::with_limit(0, 1);
        history.set(1);
        history.undo();
        history.redo();
        assert_eq!(history.undo_depth(), 1);
        assert_eq!(history.present(), &1);
    }

    #[test]
    fn test_zero_limit_clamped() {
        let mut history = History::with_limit(0, 0);
        assert_eq!(history.limit(), Some(1));
        history.set(1);
        assert!(history.can_undo());
    }

    #[test]
    fn test_update_derives_from_present() {
        let mut history = History::new(vec![1]);
        history.update(|v| {
            let mut next = v.clone();
            next.push(2);
            next
        });
        assert_eq!(history.present(), &vec![1, 2]);
        history.undo();
        assert_eq!(history.present(), &vec![1]);
    }

    #[test]
    fn test_update_without_clone() {
        #[derive(Debug, PartialEq)]
        struct Counter(u32);

        let mut history = History::new(Counter(0));
        history.update(|c| Counter(c.0 + 1));
        history.update(|c| Counter(c.0 * 10));
        assert_eq!(history.present(), &Counter(10));
        assert!(history.undo());
        assert_eq!(history.present(), &Counter(1));
    }
}
