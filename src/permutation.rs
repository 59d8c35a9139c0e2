//! # Permutations
//!
//! A `Permutation` represents a bijection on the positions `0..n` of a puzzle
//! state. Every move of the operation alphabet (cyclic shifts, prefix
//! reversal) compiles into one, which is what makes the orbit of a repeated
//! move sequence provably finite: compositions of bijections on a finite set
//! close into cycles.
//!
//! ## Key Features:
//!
//! - **Representation**: stored by its direct mapping (`map[i]` is the image
//!   of `i`) and its inverse mapping.
//! - **Construction**: `Permutation::id(n)`, `Permutation::from_map(vec![...])`,
//!   `Permutation::from_inv(vec![...])`, and the puzzle-move constructors
//!   `cyclic_left(n)`, `cyclic_right(n)`, `prefix_reversal(n, k)`.
//! - **Basic Operations**: `inverse()`, `compose()`, `pow(k)`, `sign()`,
//!   `is_identity()`.
//! - **Application**: `apply_slice(data)` returns a new `Vec`;
//!   `apply_slice_in_place(data_mut)` permutes in place via transpositions.
//! - **Cycle Utilities**: `find_cycles()`, `transpositions()`, `order()`.
//!
//! `Display` prints cycle notation followed by one-line notation, which is
//! the form orbit analyses are usually read in.

use std::fmt;

use thiserror::Error;

/// A permutation of `0..n`, with the ability to apply itself (or its inverse) to slices.
///
/// # Examples
///
/// ```
/// use topspin::permutation::Permutation;
///
/// // Create a permutation that maps 0->2, 1->0, 2->1, 3->3
/// let p = Permutation::from_map(vec![2, 0, 1, 3]);
///
/// // Apply the permutation to a slice
/// let data = vec![10, 20, 30, 40];
/// let permuted = p.apply_slice(&data);
/// assert_eq!(permuted, vec![20, 30, 10, 40]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Permutation {
    map: Vec<usize>,
    inv: Vec<usize>,
}

/// Implement ordering comparisons for permutations based on their `map` field.
impl PartialOrd for Permutation {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.map.partial_cmp(&other.map)
    }
}

impl Permutation {
    // --------------------------------------------------------------------------------------------
    // Basic Constructors and Accessors
    // --------------------------------------------------------------------------------------------

    /// Creates the identity permutation of length `n`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use topspin::permutation::Permutation;
    /// let p = Permutation::id(4);
    /// assert_eq!(p.apply_slice(&[10,20,30,40]), vec![10,20,30,40]);
    /// ```
    pub fn id(n: usize) -> Self {
        Permutation {
            map: (0..n).collect(),
            inv: (0..n).collect(),
        }
    }

    /// Creates a permutation from a mapping vector.
    /// The `map` vector states where index `i` is sent: `map[i]` is the image of `i`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use topspin::permutation::Permutation;
    /// let p = Permutation::from_map(vec![2, 0, 1]);
    /// assert_eq!(p.apply_slice(&[10,20,30]), vec![20,30,10]);
    /// ```
    pub fn from_map(map: Vec<usize>) -> Self {
        let mut inv = vec![0; map.len()];
        for (i, &j) in map.iter().enumerate() {
            inv[j] = i;
        }
        Permutation { map, inv }
    }

    /// Creates a permutation from a inverse mapping vector.
    /// The `inv` vector states that index `i` is actually inv[i]
    pub fn from_inv(inv: Vec<usize>) -> Self {
        let mut map = vec![0; inv.len()];
        for (i, &j) in inv.iter().enumerate() {
            map[j] = i;
        }
        Permutation { map, inv }
    }

    /// Returns the internal mapping as a slice.
    pub fn map(&self) -> &[usize] {
        &self.map
    }

    /// Returns the inverse mapping as a slice.
    pub fn inv(&self) -> &[usize] {
        &self.inv
    }

    /// Returns the length `n` of the permutation.
    pub fn length(&self) -> usize {
        self.map.len()
    }

    // --------------------------------------------------------------------------------------------
    // Puzzle-Move Constructors
    // --------------------------------------------------------------------------------------------

    /// The one-step left rotation of `0..n`: the element in position 0 moves
    /// to position `n - 1`, everything else shifts down by one.
    ///
    /// # Examples
    ///
    /// ```
    /// # use topspin::permutation::Permutation;
    /// let p = Permutation::cyclic_left(5);
    /// assert_eq!(p.apply_slice(&[1, 2, 3, 4, 5]), vec![2, 3, 4, 5, 1]);
    /// ```
    pub fn cyclic_left(n: usize) -> Self {
        if n == 0 {
            return Self::id(0);
        }
        Self::from_inv((0..n).map(|i| (i + 1) % n).collect())
    }

    /// The one-step right rotation of `0..n`: the element in position `n - 1`
    /// moves to position 0. Inverse of [`Permutation::cyclic_left`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use topspin::permutation::Permutation;
    /// let p = Permutation::cyclic_right(5);
    /// assert_eq!(p.apply_slice(&[1, 2, 3, 4, 5]), vec![5, 1, 2, 3, 4]);
    /// ```
    pub fn cyclic_right(n: usize) -> Self {
        if n == 0 {
            return Self::id(0);
        }
        Self::from_inv((0..n).map(|i| (i + n - 1) % n).collect())
    }

    /// The reversal of the first `k` positions of `0..n`, fixing the rest.
    /// An involution: composed with itself it is the identity.
    ///
    /// Caller contract: `1 <= k <= n`. Panics if `k > n`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use topspin::permutation::Permutation;
    /// let p = Permutation::prefix_reversal(10, 4);
    /// assert_eq!(
    ///     p.apply_slice(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]),
    ///     vec![4, 3, 2, 1, 5, 6, 7, 8, 9, 10]
    /// );
    /// ```
    pub fn prefix_reversal(n: usize, k: usize) -> Self {
        assert!(k <= n, "prefix length {k} out of bounds for size {n}");
        Self::from_inv((0..n).map(|i| if i < k { k - 1 - i } else { i }).collect())
    }

    // --------------------------------------------------------------------------------------------
    // Group Operations
    // --------------------------------------------------------------------------------------------

    /// Returns the inverse of the permutation.
    ///
    /// # Examples
    ///
    /// ```
    /// # use topspin::permutation::Permutation;
    /// let p = Permutation::from_map(vec![2, 0, 1]);
    /// let inv = p.inverse();
    /// assert_eq!(inv.apply_slice(&[10,20,30]), vec![30, 10, 20]);
    /// ```
    pub fn inverse(&self) -> Self {
        Permutation {
            map: self.inv.clone(),
            inv: self.map.clone(),
        }
    }

    /// Composes `self` with another permutation `other`, returning a new permutation:
    /// `(self ∘ other)(i) = self.map[other.map[i]]`.
    pub fn compose(&self, other: &Self) -> Self {
        let map = other.map.iter().map(|&i| self.map[i]).collect();
        Self::from_map(map)
    }

    /// Computes the k-th power of the permutation (composition with itself k times).
    /// For k = 0, it returns the identity of the same size.
    ///
    /// # Examples
    ///
    /// ```
    /// # use topspin::permutation::Permutation;
    /// let p = Permutation::from_map(vec![1, 2, 0]);
    /// // p^2 maps 0->p(1)=2, 1->p(2)=0, 2->p(0)=1 => [2,0,1]
    /// let p2 = p.pow(2);
    /// assert_eq!(p2.map(), &[2, 0, 1]);
    /// ```
    pub fn pow(&self, k: usize) -> Self {
        if k == 0 {
            return Permutation::id(self.map.len());
        }
        let mut result = Permutation::id(self.map.len());
        let mut base = self.clone();
        let mut exp = k;

        while exp > 0 {
            if exp % 2 == 1 {
                result = result.compose(&base);
            }
            base = base.compose(&base);
            exp /= 2;
        }
        result
    }

    /// Returns `true` if the permutation fixes every position.
    pub fn is_identity(&self) -> bool {
        self.map.iter().enumerate().all(|(i, &m)| i == m)
    }

    /// Returns the sign (+1 or -1) of the permutation,
    /// indicating whether it is an even (+1) or odd (-1) permutation.
    ///
    /// # Examples
    ///
    /// ```
    /// # use topspin::permutation::Permutation;
    /// let p = Permutation::from_map(vec![1,0,3,2]);
    /// assert_eq!(p.sign(), 1); // even
    ///
    /// let q = Permutation::from_map(vec![2,1,0]);
    /// assert_eq!(q.sign(), -1); // odd
    /// ```
    pub fn sign(&self) -> i8 {
        let mut sign = 1i8;
        for cycle in self.find_cycles() {
            // Each cycle of length k contributes (k-1) to the total parity
            let k = cycle.len();
            if k > 1 && (k - 1) % 2 == 1 {
                sign = -sign;
            }
        }
        sign
    }

    // --------------------------------------------------------------------------------------------
    // Application to Slices
    // --------------------------------------------------------------------------------------------

    /// Applies `self` to a slice, returning a new `Vec<T>` in permuted order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use topspin::permutation::Permutation;
    /// let p = Permutation::from_map(vec![2, 0, 1]);
    /// let data = vec![10, 20, 30];
    /// assert_eq!(p.apply_slice(&data), vec![20, 30, 10]);
    /// ```
    pub fn apply_slice<T: Clone, S>(&self, slice: S) -> Vec<T>
    where
        S: AsRef<[T]>,
    {
        let s = slice.as_ref();
        self.inv.iter().map(|&idx| s[idx].clone()).collect()
    }

    /// Applies `self` in-place to the provided slice by using transpositions
    /// derived from the cycle decomposition.
    ///
    /// # Examples
    ///
    /// ```
    /// # use topspin::permutation::Permutation;
    /// let p = Permutation::from_map(vec![2, 0, 1]);
    /// let mut data = vec![10, 20, 30];
    /// p.apply_slice_in_place(&mut data);
    /// assert_eq!(data, vec![20, 30, 10]);
    /// ```
    pub fn apply_slice_in_place<T, S>(&self, slice: &mut S)
    where
        S: AsMut<[T]>,
    {
        let transpositions = self.transpositions();
        for (i, j) in transpositions.iter().rev() {
            slice.as_mut().swap(*i, *j);
        }
    }

    // --------------------------------------------------------------------------------------------
    // Cycles and Transpositions
    // --------------------------------------------------------------------------------------------

    /// Returns the cycle decomposition of `self` as a `Vec` of cycles,
    /// each cycle represented as a `Vec<usize>`.
    /// Each cycle lists the indices of a single cycle, e.g. `[0, 2, 1]` means `0->2, 2->1, 1->0`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use topspin::permutation::Permutation;
    /// let p = Permutation::from_map(vec![2, 0, 1, 3]);
    /// let cycles = p.find_cycles();
    /// // cycles might be [[0, 2, 1], [3]]
    /// assert_eq!(cycles.len(), 2);
    /// ```
    pub fn find_cycles(&self) -> Vec<Vec<usize>> {
        let mut visited = vec![false; self.map.len()];
        let mut cycles = Vec::new();
        for i in 0..self.map.len() {
            if visited[i] {
                continue;
            }
            let mut cycle = Vec::new();
            let mut j = i;
            while !visited[j] {
                visited[j] = true;
                cycle.push(j);
                j = self.map[j];
            }
            if !cycle.is_empty() {
                cycles.push(cycle);
            }
        }
        cycles
    }

    /// Converts a single cycle to a list of transpositions that produce that cycle.
    fn cycle_to_transpositions(cycle: &[usize]) -> Vec<(usize, usize)> {
        let mut transpositions = Vec::new();
        for i in (1..cycle.len()).rev() {
            transpositions.push((cycle[0], cycle[i]));
        }
        transpositions
    }

    /// Returns a list of transpositions whose right-to-left composition
    /// equals `self`.
    pub fn transpositions(&self) -> Vec<(usize, usize)> {
        let mut transpositions = Vec::new();
        for cycle in self.find_cycles() {
            transpositions.extend(Self::cycle_to_transpositions(&cycle));
        }
        transpositions
    }

    /// The order of the permutation in the symmetric group: the smallest
    /// `m >= 1` with `self.pow(m)` equal to the identity. Computed as the
    /// least common multiple of the cycle lengths.
    ///
    /// For a state whose labels are all distinct, this is exactly the number
    /// of times a move must be repeated before the state recurs.
    ///
    /// # Examples
    ///
    /// ```
    /// # use topspin::permutation::Permutation;
    /// assert_eq!(Permutation::cyclic_left(5).order(), 5);
    /// assert_eq!(Permutation::prefix_reversal(10, 4).order(), 2);
    /// assert_eq!(Permutation::id(3).order(), 1);
    /// ```
    pub fn order(&self) -> usize {
        self.find_cycles()
            .into_iter()
            .fold(1, |acc, cycle| lcm(acc, cycle.len()))
    }
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

fn lcm(a: usize, b: usize) -> usize {
    if a == 0 || b == 0 {
        0
    } else {
        a / gcd(a, b) * b
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermutationError {
    #[error("map value {0} out of range")]
    ValueOutOfRange(usize),

    #[error("map value {0} appears more than once")]
    DuplicateValue(usize),
}

impl Permutation {
    /// Like [`Permutation::from_map`] but validating that the vector really
    /// is a bijection on `0..n` instead of silently producing garbage.
    pub fn try_from_map(map: Vec<usize>) -> Result<Self, PermutationError> {
        let n = map.len();
        let mut seen = vec![false; n];
        for &to in &map {
            if to >= n {
                return Err(PermutationError::ValueOutOfRange(to));
            }
            if std::mem::replace(&mut seen[to], true) {
                return Err(PermutationError::DuplicateValue(to));
            }
        }
        Ok(Self::from_map(map))
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First show cycle notation
        let cycles = self.find_cycles();
        let mut first = true;
        for cycle in cycles {
            if cycle.len() > 1 {
                // Only show non-trivial cycles
                if !first {
                    write!(f, " ")?;
                }
                write!(f, "(")?;
                for (i, &x) in cycle.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{x}")?;
                }
                write!(f, ")")?;
                first = false;
            }
        }
        if first {
            // If no cycles were printed (identity permutation)
            write!(f, "()")?;
        }

        // Then show one-line notation
        write!(f, " [")?;
        for (i, &x) in self.map.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{x}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_from_map_roundtrip() {
        let p = Permutation::from_map(vec![2, 0, 1, 3]);
        assert_eq!(p.map(), &[2, 0, 1, 3]);
        assert_eq!(p.inv(), &[1, 2, 0, 3]);
        assert_eq!(Permutation::from_inv(p.inv().to_vec()), p);
    }

    #[test]
    fn test_cyclic_shifts_are_mutual_inverses() {
        for n in 1..=8 {
            let l = Permutation::cyclic_left(n);
            let r = Permutation::cyclic_right(n);
            assert_eq!(l.inverse(), r);
            assert!(l.compose(&r).is_identity());
            assert!(r.compose(&l).is_identity());
        }
    }

    #[test]
    fn test_prefix_reversal_is_involution() {
        for k in 1..=6 {
            let x = Permutation::prefix_reversal(6, k);
            assert!(x.compose(&x).is_identity());
            assert_eq!(x.order(), if k == 1 { 1 } else { 2 });
        }
    }

    #[test]
    fn test_prefix_reversal_full_width() {
        let x = Permutation::prefix_reversal(4, 4);
        assert_eq!(x.apply_slice(&[1, 2, 3, 4]), vec![4, 3, 2, 1]);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_prefix_reversal_oversized_panics() {
        let _ = Permutation::prefix_reversal(3, 4);
    }

    #[test]
    fn test_order_of_cyclic_shift() {
        for n in 1..=10 {
            assert_eq!(Permutation::cyclic_left(n).order(), n);
        }
    }

    #[test]
    fn test_order_lcm_of_cycles() {
        // (0 1)(2 3 4) has order lcm(2, 3) = 6
        let p = Permutation::from_map(vec![1, 0, 3, 4, 2]);
        assert_eq!(p.order(), 6);
        assert!(p.pow(6).is_identity());
        assert!(!p.pow(3).is_identity());
        assert!(!p.pow(2).is_identity());
    }

    #[test]
    fn test_try_from_map() {
        assert!(Permutation::try_from_map(vec![1, 2, 0]).is_ok());
        assert_eq!(
            Permutation::try_from_map(vec![1, 1, 0]).unwrap_err(),
            PermutationError::DuplicateValue(1)
        );
        assert_eq!(
            Permutation::try_from_map(vec![0, 3]).unwrap_err(),
            PermutationError::ValueOutOfRange(3)
        );
    }

    #[test]
    fn test_display_cycle_notation() {
        let p = Permutation::from_map(vec![1, 2, 0, 3]);
        assert_eq!(p.to_string(), "(0 1 2) [1 2 0 3]");
        assert_eq!(Permutation::id(3).to_string(), "() [0 1 2]");
    }

    // Arbitrary permutations are generated by sorting positions on random keys.
    proptest! {
        #[test]
        fn prop_inverse_undoes(keys in proptest::collection::vec(0u64..1000, 1..12)) {
            let mut idx: Vec<usize> = (0..keys.len()).collect();
            idx.sort_by_key(|&i| keys[i]);
            let p = Permutation::from_inv(idx);
            let data: Vec<u64> = (0..keys.len() as u64).collect();
            let there = p.apply_slice(&data);
            let back = p.inverse().apply_slice(&there);
            prop_assert_eq!(back, data);
        }

        #[test]
        fn prop_in_place_matches_out_of_place(keys in proptest::collection::vec(0u64..1000, 1..12)) {
            let mut idx: Vec<usize> = (0..keys.len()).collect();
            idx.sort_by_key(|&i| keys[i]);
            let p = Permutation::from_inv(idx);
            let data: Vec<u64> = (100..100 + keys.len() as u64).collect();
            let expected = p.apply_slice(&data);
            let mut in_place = data;
            p.apply_slice_in_place(&mut in_place);
            prop_assert_eq!(in_place, expected);
        }

        #[test]
        fn prop_pow_order_is_identity(keys in proptest::collection::vec(0u64..1000, 1..10)) {
            let mut idx: Vec<usize> = (0..keys.len()).collect();
            idx.sort_by_key(|&i| keys[i]);
            let p = Permutation::from_inv(idx);
            prop_assert!(p.pow(p.order()).is_identity());
        }
    }
}
