//! Sets of interned tokens and the Jaccard distance between them.
use std::cmp::Ordering;

/// Distance assigned to a pair whose union is empty, i.e., two empty sets.
///
/// The Jaccard index is undefined in that case; the pair is treated as
/// having nothing in common.
pub const EMPTY_UNION_DISTANCE: f64 = 1.;

/// A set of token ids, stored sorted and without duplicates.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TokenSet {
    ids: Vec<u32>,
}

impl TokenSet {
    /// Creates an empty set.
    pub const fn new() -> Self {
        Self { ids: vec![] }
    }

    /// Creates a set from arbitrary ids. Duplicates collapse to one element.
    pub fn from_ids<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        let mut ids: Vec<_> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        Self { ids }
    }

    /// Gets the number of distinct tokens.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Checks if the set has no token.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Gets the sorted token ids.
    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    /// Counts the tokens shared with the other set.
    pub fn intersection_len(&self, rhs: &Self) -> usize {
        let (xs, ys) = (&self.ids, &rhs.ids);
        let (mut i, mut j) = (0, 0);
        let mut count = 0;
        while i < xs.len() && j < ys.len() {
            match xs[i].cmp(&ys[j]) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    count += 1;
                    i += 1;
                    j += 1;
                }
            }
        }
        count
    }

    /// Computes the Jaccard distance `1 - |A ∩ B| / |A ∪ B|`.
    ///
    /// Two empty sets are at [`EMPTY_UNION_DISTANCE`].
    ///
    /// # Examples
    ///
    /// ```
    /// use all_pairs_jaccard::TokenSet;
    ///
    /// let x = TokenSet::from_ids([1, 2, 4]);
    /// let y = TokenSet::from_ids([1, 2, 5, 7]);
    /// assert_eq!(x.jaccard_distance(&y), 0.6);
    /// ```
    pub fn jaccard_distance(&self, rhs: &Self) -> f64 {
        let inter = self.intersection_len(rhs);
        let union = self.len() + rhs.len() - inter;
        if union == 0 {
            return EMPTY_UNION_DISTANCE;
        }
        1. - inter as f64 / union as f64
    }

    /// Gets the memory usage in bytes.
    pub fn memory_in_bytes(&self) -> usize {
        self.ids.len() * std::mem::size_of::<u32>()
    }
}

impl FromIterator<u32> for TokenSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self::from_ids(iter)
    }
}
