//! An exhaustive approach of all-pair Jaccard distances on token sets.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use rayon::prelude::*;

use crate::errors::Cancelled;
use crate::token_set::TokenSet;

/// An exhaustive all-pair join, evaluating every unordered pair exactly once.
pub struct SimpleJoiner {
    sets: Vec<TokenSet>,
    parallel: bool,
    cancel: Option<Arc<AtomicBool>>,
}

impl Default for SimpleJoiner {
    fn default() -> Self {
        Self::new()
    }
}

impl SimpleJoiner {
    /// Creates an empty instance evaluating pairs in parallel.
    pub const fn new() -> Self {
        Self {
            sets: vec![],
            parallel: true,
            cancel: None,
        }
    }

    /// Evaluates pairs on the rayon thread pool?
    pub const fn parallel(mut self, yes: bool) -> Self {
        self.parallel = yes;
        self
    }

    /// Sets a flag that aborts the join with [`Cancelled`] once raised.
    /// The flag is polled once per row of the pair matrix.
    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Appends a token set.
    pub fn add(&mut self, set: TokenSet) {
        self.sets.push(set);
    }

    /// Computes the distances of all pairs, returning triplets of the left-side id,
    /// the right-side id, and their distance, where the left-side id is always smaller.
    ///
    /// # Errors
    ///
    /// [`Cancelled`] is returned if the cancellation flag is raised before completion.
    ///
    /// # Examples
    ///
    /// ```
    /// use all_pairs_jaccard::{SimpleJoiner, TokenSet};
    ///
    /// let mut joiner = SimpleJoiner::new();
    /// joiner.add(TokenSet::from_ids([0, 1, 2]));
    /// joiner.add(TokenSet::from_ids([0, 2, 3]));
    /// joiner.add(TokenSet::from_ids([4, 5]));
    ///
    /// let mut pairs = joiner.all_pairs().unwrap();
    /// pairs.sort_by_key(|&(i, j, _)| (i, j));
    /// assert_eq!(pairs, vec![(0, 1, 0.5), (0, 2, 1.), (1, 2, 1.)]);
    /// ```
    pub fn all_pairs(&self) -> Result<Vec<(usize, usize, f64)>> {
        let n = self.sets.len();
        tracing::debug!(
            num_sets = n,
            num_pairs = self.num_pairs(),
            parallel = self.parallel,
            "[SimpleJoiner::all_pairs] start"
        );

        // Each row writes into its own slice of the output.
        let mut matched = vec![(0, 0, 0.); self.num_pairs()];
        let mut rows = Vec::with_capacity(n);
        let mut rest = matched.as_mut_slice();
        for i in 0..n {
            let (row, tail) = std::mem::take(&mut rest).split_at_mut(n - 1 - i);
            rows.push(row);
            rest = tail;
        }

        let fill = |(i, row): (usize, &mut [(usize, usize, f64)])| {
            if self.is_cancelled() {
                return Err(Cancelled);
            }
            let x = &self.sets[i];
            for (slot, j) in row.iter_mut().zip(i + 1..n) {
                *slot = (i, j, x.jaccard_distance(&self.sets[j]));
            }
            Ok(())
        };
        if self.parallel {
            rows.into_par_iter().enumerate().try_for_each(fill)?;
        } else {
            rows.into_iter().enumerate().try_for_each(fill)?;
        }
        tracing::debug!(
            num_matched = matched.len(),
            "[SimpleJoiner::all_pairs] done"
        );
        Ok(matched)
    }

    /// Gets the number of stored sets.
    pub fn num_sets(&self) -> usize {
        self.sets.len()
    }

    /// Gets the number of unordered pairs, `n * (n - 1) / 2`.
    pub fn num_pairs(&self) -> usize {
        let n = self.sets.len();
        n * n.saturating_sub(1) / 2
    }

    /// Gets the memory usage in bytes.
    pub fn memory_in_bytes(&self) -> usize {
        self.sets.iter().map(TokenSet::memory_in_bytes).sum()
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map_or(false, |flag| flag.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use hashbrown::HashSet;
    use rand::{Rng, SeedableRng};

    fn example_sets() -> Vec<Vec<u32>> {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        (0..40)
            .map(|_| {
                let len = rng.gen_range(0..12);
                (0..len).map(|_| rng.gen_range(0..20)).collect()
            })
            .collect()
    }

    fn naive_search(sets: &[Vec<u32>]) -> Vec<(usize, usize, f64)> {
        let mut results = vec![];
        for i in 0..sets.len() {
            let x = HashSet::<u32>::from_iter(sets[i].iter().cloned());
            for j in i + 1..sets.len() {
                let y = HashSet::<u32>::from_iter(sets[j].iter().cloned());
                let union = x.union(&y).count();
                let dist = if union == 0 {
                    1.
                } else {
                    1. - x.intersection(&y).count() as f64 / union as f64
                };
                results.push((i, j, dist));
            }
        }
        results
    }

    fn build(sets: &[Vec<u32>], parallel: bool) -> SimpleJoiner {
        let mut joiner = SimpleJoiner::new().parallel(parallel);
        for s in sets {
            joiner.add(TokenSet::from_ids(s.iter().cloned()));
        }
        joiner
    }

    #[test]
    fn test_all_pairs_sequential() {
        let sets = example_sets();
        let expected = naive_search(&sets);
        let results = build(&sets, false).all_pairs().unwrap();
        assert_eq!(results, expected);
    }

    #[test]
    fn test_all_pairs_parallel() {
        let sets = example_sets();
        let expected = naive_search(&sets);
        let mut results = build(&sets, true).all_pairs().unwrap();
        results.sort_by_key(|&(i, j, _)| (i, j));
        assert_eq!(results, expected);
    }

    #[test]
    fn test_count_and_no_self_pairs() {
        let sets = example_sets();
        let joiner = build(&sets, true);
        let results = joiner.all_pairs().unwrap();
        assert_eq!(results.len(), sets.len() * (sets.len() - 1) / 2);
        assert_eq!(results.len(), joiner.num_pairs());
        let unique: HashSet<_> = results.iter().map(|&(i, j, _)| (i, j)).collect();
        assert_eq!(unique.len(), results.len());
        assert!(results.iter().all(|&(i, j, d)| i < j && (0. ..=1.).contains(&d)));
    }

    #[test]
    fn test_tiny_inputs() {
        assert!(SimpleJoiner::new().all_pairs().unwrap().is_empty());
        let mut joiner = SimpleJoiner::new();
        joiner.add(TokenSet::from_ids([1, 2]));
        assert!(joiner.all_pairs().unwrap().is_empty());
        assert_eq!(joiner.num_pairs(), 0);
    }

    #[test]
    fn test_result_is_exactly_sized() {
        let sets = example_sets();
        let results = build(&sets, true).all_pairs().unwrap();
        assert_eq!(results.capacity(), results.len());
    }

    #[test]
    fn test_memory_in_bytes() {
        let mut joiner = SimpleJoiner::new();
        joiner.add(TokenSet::from_ids([1, 2, 3]));
        joiner.add(TokenSet::from_ids([4, 4]));
        assert_eq!(joiner.memory_in_bytes(), 4 * std::mem::size_of::<u32>());
    }

    #[test]
    fn test_cancelled() {
        let flag = Arc::new(AtomicBool::new(true));
        let mut joiner = SimpleJoiner::new().cancel_flag(flag);
        joiner.add(TokenSet::from_ids([1]));
        joiner.add(TokenSet::from_ids([2]));
        let err = joiner.all_pairs().unwrap_err();
        assert!(err.is::<Cancelled>());
    }
}
