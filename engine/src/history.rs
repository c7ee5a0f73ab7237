use std::collections::VecDeque;

pub const DEFAULT_HISTORY_DEPTH: usize = 200;

/// LIFO of pre-images. Once `depth` snapshots are held the oldest one is
/// forgotten, so undo reaches back at most `depth` steps.
#[derive(Debug, Clone)]
pub struct HistoryStack<T> {
    snapshots: VecDeque<T>,
    depth: usize,
}

impl<T> Default for HistoryStack<T> {
    fn default() -> Self {
        Self::with_depth(DEFAULT_HISTORY_DEPTH)
    }
}

impl<T> HistoryStack<T> {
    pub fn with_depth(depth: usize) -> Self {
        Self {
            snapshots: VecDeque::new(),
            depth: depth.max(1),
        }
    }

    pub fn push(&mut self, snapshot: T) {
        if self.snapshots.len() == self.depth {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(snapshot);
    }

    pub fn pop(&mut self) -> Option<T> {
        self.snapshots.pop_back()
    }

    pub fn peek(&self) -> Option<&T> {
        self.snapshots.back()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_reverse_push_order() {
        let mut stack = HistoryStack::default();
        stack.push(1);
        stack.push(2);
        stack.push(3);
        assert_eq!(stack.pop(), Some(3));
        assert_eq!(stack.pop(), Some(2));
        assert_eq!(stack.pop(), Some(1));
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn drops_oldest_snapshot_at_depth() {
        let mut stack = HistoryStack::with_depth(2);
        stack.push("a");
        stack.push("b");
        stack.push("c");
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.peek(), Some(&"c"));
        stack.pop();
        assert_eq!(stack.pop(), Some("b"));
        assert!(stack.is_empty());
    }
}
