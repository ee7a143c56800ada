use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Bounded best-K set of `(identifier, score)` pairs.
///
/// A min-heap of fixed capacity: while fewer than K entries are held,
/// every push is retained; once full, a new score replaces the
/// current minimum only when strictly greater, so the first-seen
/// entry wins a tie. Memory stays O(K) no matter how many scores are
/// offered.
#[derive(Debug)]
pub struct TopK {
    capacity: usize,
    heap: BinaryHeap<MinEntry>,
}

#[derive(Debug)]
struct MinEntry {
    identifier: String,
    score: f32,
}

// Inverted ordering so BinaryHeap's max is the smallest score.
impl Ord for MinEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.identifier.cmp(&self.identifier))
    }
}

impl PartialOrd for MinEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for MinEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MinEntry {}

impl TopK {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::with_capacity(capacity.min(1024)),
        }
    }

    /// Offers a score. Returns true if it was retained.
    ///
    /// NaN scores are never retained; with capacity 0 nothing is.
    pub fn push(&mut self, identifier: &str, score: f32) -> bool {
        if self.capacity == 0 || score.is_nan() {
            return false;
        }
        if self.heap.len() < self.capacity {
            self.heap.push(MinEntry {
                identifier: identifier.to_string(),
                score,
            });
            return true;
        }
        // Full: replace the minimum only on a strictly greater score.
        let min = self.heap.peek().map(|e| e.score).unwrap_or(f32::NEG_INFINITY);
        if score > min {
            self.heap.pop();
            self.heap.push(MinEntry {
                identifier: identifier.to_string(),
                score,
            });
            return true;
        }
        false
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Folds another bounded set into this one, keeping this set's
    /// capacity. Used to combine per-worker results of a sharded scan.
    pub fn merge(&mut self, other: TopK) {
        for e in other.heap {
            self.push(&e.identifier, e.score);
        }
    }

    /// Consumes the set, yielding pairs sorted by score descending.
    pub fn into_descending(self) -> Vec<(String, f32)> {
        let mut v: Vec<(String, f32)> = self
            .heap
            .into_iter()
            .map(|e| (e.identifier, e.score))
            .collect();
        v.sort_by(|a, b| b.1.total_cmp(&a.1));
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_highest_k() {
        let mut tk = TopK::new(3);
        for (id, s) in [("a", 5.0), ("b", 9.0), ("c", 1.0), ("d", 7.0), ("e", 9.0)] {
            tk.push(id, s);
        }
        let out = tk.into_descending();
        let scores: Vec<f32> = out.iter().map(|(_, s)| *s).collect();
        assert_eq!(scores, vec![9.0, 9.0, 7.0]);
    }

    #[test]
    fn under_capacity_keeps_everything() {
        let mut tk = TopK::new(10);
        tk.push("a", 1.0);
        tk.push("b", -2.0);
        assert_eq!(tk.len(), 2);
        let out = tk.into_descending();
        assert_eq!(out[0], ("a".to_string(), 1.0));
        assert_eq!(out[1], ("b".to_string(), -2.0));
    }

    #[test]
    fn tie_first_seen_wins() {
        let mut tk = TopK::new(1);
        assert!(tk.push("first", 9.0));
        assert!(!tk.push("second", 9.0));
        let out = tk.into_descending();
        assert_eq!(out, vec![("first".to_string(), 9.0)]);
    }

    #[test]
    fn capacity_zero_retains_nothing() {
        let mut tk = TopK::new(0);
        assert!(!tk.push("a", 100.0));
        assert!(tk.is_empty());
        assert!(tk.into_descending().is_empty());
    }

    #[test]
    fn nan_rejected() {
        let mut tk = TopK::new(2);
        assert!(!tk.push("bad", f32::NAN));
        assert!(tk.is_empty());
    }

    #[test]
    fn negative_scores_are_valid() {
        let mut tk = TopK::new(2);
        tk.push("a", -1.0);
        tk.push("b", -5.0);
        tk.push("c", -0.5);
        let out = tk.into_descending();
        assert_eq!(out[0].0, "c");
        assert_eq!(out[1].0, "a");
    }

    #[test]
    fn merge_preserves_bound() {
        let mut left = TopK::new(2);
        left.push("a", 3.0);
        left.push("b", 1.0);
        let mut right = TopK::new(2);
        right.push("c", 2.0);
        right.push("d", 5.0);

        left.merge(right);
        let out = left.into_descending();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], ("d".to_string(), 5.0));
        assert_eq!(out[1], ("a".to_string(), 3.0));
    }
}
