//! Permutation algebra: composition, inversion, and parity of the
//! row/column permutations used by permuted views and pivoting.
//!
//! A [`Perm`] wraps `Option<Vec<usize>>`. `None` is the identity
//! sentinel: the common "no permutation" case allocates nothing and keeps
//! downstream fast paths active, and the optional is type-checked rather
//! than a null convention.

use alloc::vec::Vec;

/// A permutation of `[0, n)`, or the identity.
///
/// `perm[i]` is the source index mapped to destination `i`: applying the
/// permutation to rows of `B` yields `B'[i] = B[perm[i]]`.
///
/// # Example
///
/// ```
/// use lamina::Perm;
///
/// let p = Perm::from_vec(vec![2, 0, 1]);
/// assert_eq!(p.apply(0), 2);
/// assert_eq!(p.invert().apply(2), 0);
/// assert_eq!(p.parity(), 1); // one 3-cycle: (-1)^2
///
/// let id = Perm::identity();
/// assert!(p.clone().combine(&id) == p);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Perm(Option<Vec<usize>>);

impl Perm {
    /// The identity permutation. Valid for any size; allocates nothing.
    pub fn identity() -> Self {
        Perm(None)
    }

    /// Build from an index array, validating that it is a bijection on
    /// `[0, len)`. Collapses to the identity sentinel when every index
    /// maps to itself.
    ///
    /// Panics on a non-bijective array: that is a programmer error.
    pub fn from_vec(indices: Vec<usize>) -> Self {
        let n = indices.len();
        let mut seen = alloc::vec![false; n];
        for &i in &indices {
            assert!(i < n, "permutation entry {} out of range for length {}", i, n);
            assert!(!seen[i], "permutation entry {} repeated", i);
            seen[i] = true;
        }
        if indices.iter().enumerate().all(|(i, &p)| i == p) {
            return Perm(None);
        }
        Perm(Some(indices))
    }

    /// Whether this is the identity sentinel.
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.0.is_none()
    }

    /// Length of the underlying array, or `None` for the identity
    /// (which is compatible with every size).
    #[inline]
    pub fn len(&self) -> Option<usize> {
        self.0.as_ref().map(Vec::len)
    }

    /// Source index mapped to destination `i`.
    #[inline]
    pub fn apply(&self, i: usize) -> usize {
        match &self.0 {
            Some(p) => p[i],
            None => i,
        }
    }

    /// Apply `next` on top of `self`: `combined[i] = self[next[i]]`.
    ///
    /// Combining with the identity returns the other operand unchanged
    /// (no allocation); a composition that lands back on the identity
    /// collapses to the sentinel.
    pub fn combine(self, next: &Perm) -> Perm {
        let existing = match self.0 {
            None => return next.clone(),
            Some(p) => p,
        };
        let next = match &next.0 {
            None => return Perm(Some(existing)),
            Some(p) => p,
        };
        assert_eq!(
            existing.len(),
            next.len(),
            "cannot combine permutations of lengths {} and {}",
            existing.len(),
            next.len(),
        );
        let combined: Vec<usize> = next.iter().map(|&i| existing[i]).collect();
        Perm::from_vec(combined)
    }

    /// Inverse permutation: `q[self[i]] = i`. Identity stays identity.
    pub fn invert(&self) -> Perm {
        match &self.0 {
            None => Perm(None),
            Some(p) => {
                let mut inv = alloc::vec![0usize; p.len()];
                for (i, &src) in p.iter().enumerate() {
                    inv[src] = i;
                }
                Perm(Some(inv))
            }
        }
    }

    /// Sign of the permutation: `+1` for even, `-1` for odd.
    ///
    /// Walks cycles; a cycle of length L contributes `(-1)^(L-1)`.
    /// The identity has parity `+1`.
    pub fn parity(&self) -> i32 {
        let p = match &self.0 {
            None => return 1,
            Some(p) => p,
        };
        let mut visited = alloc::vec![false; p.len()];
        let mut sign = 1;
        for start in 0..p.len() {
            if visited[start] {
                continue;
            }
            let mut len = 0usize;
            let mut i = start;
            while !visited[i] {
                visited[i] = true;
                i = p[i];
                len += 1;
            }
            if len % 2 == 0 {
                sign = -sign;
            }
        }
        sign
    }

    /// Swap two destinations in place, materializing the index array if
    /// this is still the identity sentinel. `max_len` sizes that array.
    ///
    /// Used by the pivoting loops, which record swaps one at a time.
    pub fn swap(&mut self, a: usize, b: usize, max_len: usize) {
        if a == b {
            return;
        }
        let p = self.0.get_or_insert_with(|| (0..max_len).collect());
        p.swap(a, b);
    }

    /// Collapse back to the sentinel if the swaps cancelled out.
    pub fn normalize(self) -> Perm {
        match self.0 {
            Some(p) => Perm::from_vec(p),
            None => Perm(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn identity_is_absent() {
        let id = Perm::identity();
        assert!(id.is_identity());
        assert_eq!(id.apply(7), 7);
        assert_eq!(id.parity(), 1);
        assert_eq!(id.len(), None);
    }

    #[test]
    fn from_vec_collapses_identity() {
        let p = Perm::from_vec(vec![0, 1, 2, 3]);
        assert!(p.is_identity());
    }

    #[test]
    #[should_panic(expected = "repeated")]
    fn from_vec_rejects_duplicates() {
        let _ = Perm::from_vec(vec![0, 0, 2]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn from_vec_rejects_out_of_range() {
        let _ = Perm::from_vec(vec![0, 3]);
    }

    #[test]
    fn combine_applies_on_top() {
        // existing maps i -> existing[i]; next picks rows of the existing result.
        let existing = Perm::from_vec(vec![1, 2, 0]);
        let next = Perm::from_vec(vec![2, 1, 0]);
        let combined = existing.combine(&next);
        assert_eq!(combined.apply(0), 0);
        assert_eq!(combined.apply(1), 2);
        assert_eq!(combined.apply(2), 1);
    }

    #[test]
    fn combine_with_identity_is_noop() {
        let p = Perm::from_vec(vec![2, 0, 1]);
        assert_eq!(p.clone().combine(&Perm::identity()), p);
        assert_eq!(Perm::identity().combine(&p), p);
    }

    #[test]
    fn combine_collapses_to_identity() {
        let p = Perm::from_vec(vec![2, 0, 1]);
        let q = p.invert();
        // q[p[i]] = i, so applying p then q is the identity.
        assert!(q.combine(&p).is_identity());
    }

    #[test]
    fn invert_roundtrip() {
        let p = Perm::from_vec(vec![3, 1, 0, 2]);
        assert_eq!(p.invert().invert(), p);
        assert!(Perm::identity().invert().is_identity());
    }

    #[test]
    fn parity_counts_transpositions() {
        // One swap: odd.
        assert_eq!(Perm::from_vec(vec![1, 0, 2]).parity(), -1);
        // 3-cycle: even.
        assert_eq!(Perm::from_vec(vec![1, 2, 0]).parity(), 1);
        // Two disjoint swaps: even.
        assert_eq!(Perm::from_vec(vec![1, 0, 3, 2]).parity(), 1);
        // 4-cycle: odd.
        assert_eq!(Perm::from_vec(vec![1, 2, 3, 0]).parity(), -1);
    }

    #[test]
    fn parity_of_cancelled_combination() {
        let p = Perm::from_vec(vec![2, 0, 1]);
        assert_eq!(p.clone().combine(&p.invert()).parity(), 1);
    }

    #[test]
    fn swap_materializes_and_normalizes() {
        let mut p = Perm::identity();
        p.swap(0, 2, 4);
        assert!(!p.is_identity());
        assert_eq!(p.apply(0), 2);
        p.swap(0, 2, 4);
        assert!(p.normalize().is_identity());
    }
}
