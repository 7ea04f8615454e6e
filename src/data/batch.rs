//! Cyclic shuffled minibatches over an index range.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Hands out fixed-size batches of indices into `0..len`.
///
/// Indices come from a shuffled permutation; when it runs out the
/// iterator wraps (reshuffling if enabled) and keeps filling the batch,
/// so every batch has exactly `batch_size` entries and every index is
/// visited once per pass.
pub struct BatchIterator {
    order: Vec<usize>,
    cursor: usize,
    batch_size: usize,
    reshuffle: bool,
    rng: StdRng,
}

impl BatchIterator {
    pub fn new(len: usize, batch_size: usize, seed: u64, reshuffle: bool) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut order: Vec<usize> = (0..len).collect();
        order.shuffle(&mut rng);
        Self {
            order,
            cursor: 0,
            batch_size,
            reshuffle,
            rng,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of indices in one pass.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The next batch. Empty only when there is nothing to iterate.
    pub fn next_indices(&mut self) -> Vec<usize> {
        if self.order.is_empty() {
            return Vec::new();
        }
        let mut batch = Vec::with_capacity(self.batch_size);
        while batch.len() < self.batch_size {
            if self.cursor == self.order.len() {
                self.cursor = 0;
                if self.reshuffle {
                    self.order.shuffle(&mut self.rng);
                }
            }
            let take = (self.batch_size - batch.len()).min(self.order.len() - self.cursor);
            batch.extend_from_slice(&self.order[self.cursor..self.cursor + take]);
            self.cursor += take;
        }
        batch
    }
}

impl Iterator for BatchIterator {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let batch = self.next_indices();
        if batch.is_empty() {
            None
        } else {
            Some(batch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn batches_have_fixed_size_across_wrap() {
        let mut it = BatchIterator::new(7, 3, 1, true);
        for _ in 0..10 {
            let batch = it.next_indices();
            assert_eq!(batch.len(), 3);
            assert!(batch.iter().all(|&i| i < 7));
        }
    }

    #[test]
    fn every_index_once_per_pass() {
        let n = 12;
        let mut it = BatchIterator::new(n, 4, 7, true);
        for _ in 0..3 {
            let pass: Vec<usize> = (0..n / 4).flat_map(|_| it.next_indices()).collect();
            let unique: HashSet<usize> = pass.iter().copied().collect();
            assert_eq!(pass.len(), n);
            assert_eq!(unique.len(), n);
        }
    }

    #[test]
    fn without_reshuffle_passes_repeat() {
        let mut it = BatchIterator::new(5, 5, 3, false);
        let first = it.next_indices();
        let second = it.next_indices();
        assert_eq!(first, second);
    }

    #[test]
    fn batch_larger_than_set_cycles() {
        let mut it = BatchIterator::new(2, 5, 0, false);
        let batch = it.next_indices();
        assert_eq!(batch.len(), 5);
        assert_eq!(batch[0], batch[2]);
        assert_eq!(batch[1], batch[3]);
    }

    #[test]
    fn empty_set_yields_nothing() {
        let mut it = BatchIterator::new(0, 4, 0, true);
        assert!(it.next_indices().is_empty());
        assert!(it.next().is_none());
    }

    #[test]
    fn same_seed_same_order() {
        let a: Vec<_> = BatchIterator::new(20, 6, 9, true).take(5).collect();
        let b: Vec<_> = BatchIterator::new(20, 6, 9, true).take(5).collect();
        assert_eq!(a, b);
    }
}
