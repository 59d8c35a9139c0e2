//! # Operation alphabet
//!
//! The moves a TopSpin-style puzzle admits: a one-step cyclic shift in either
//! direction and the reversal of a fixed-width prefix (the "turntable"). Each
//! move exists under two aliases, a letter code and a numeric code, which
//! must resolve identically:
//!
//! | kind             | letter | numeric |
//! |------------------|--------|---------|
//! | shift left       | `L`    | `1`     |
//! | shift right      | `R`    | `2`     |
//! | reverse prefix   | `X`    | `3`     |
//!
//! An unrecognized code is a hard configuration error
//! ([`OpError::UnknownCode`]), never a silent no-op.
//!
//! The prefix width `k` is a run-wide parameter, not per-operation: every
//! `X` in a run reverses the same first `k` positions.

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use thiserror::Error;

use crate::permutation::Permutation;

/// Rotates the state one step left: the first element moves to the last
/// position. Identity for states of length <= 1.
///
/// # Examples
///
/// ```
/// # use topspin::ops::shift_left;
/// assert_eq!(shift_left(&[1, 2, 3, 4, 5]), vec![2, 3, 4, 5, 1]);
/// ```
pub fn shift_left<T: Clone>(state: &[T]) -> Vec<T> {
    let n = state.len();
    if n <= 1 {
        return state.to_vec();
    }
    let mut out = Vec::with_capacity(n);
    out.extend_from_slice(&state[1..]);
    out.push(state[0].clone());
    out
}

/// Rotates the state one step right: the last element moves to the first
/// position. Inverse of [`shift_left`].
///
/// # Examples
///
/// ```
/// # use topspin::ops::shift_right;
/// assert_eq!(shift_right(&[1, 2, 3, 4, 5]), vec![5, 1, 2, 3, 4]);
/// ```
pub fn shift_right<T: Clone>(state: &[T]) -> Vec<T> {
    let n = state.len();
    if n <= 1 {
        return state.to_vec();
    }
    let mut out = Vec::with_capacity(n);
    out.push(state[n - 1].clone());
    out.extend_from_slice(&state[..n - 1]);
    out
}

/// Reverses the first `k` elements of the state, leaving the rest in order.
///
/// Caller contract: `1 <= k <= state.len()`, checked once at exploration or
/// search setup, not here. Panics on `k > state.len()`.
///
/// # Examples
///
/// ```
/// # use topspin::ops::reverse_prefix;
/// assert_eq!(
///     reverse_prefix(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10], 4),
///     vec![4, 3, 2, 1, 5, 6, 7, 8, 9, 10]
/// );
/// ```
pub fn reverse_prefix<T: Clone>(state: &[T], k: usize) -> Vec<T> {
    let mut out = state.to_vec();
    out[..k].reverse();
    out
}

/// One move of the operation alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Op {
    /// Cyclic shift left (`"L"` / `"1"`).
    ShiftLeft,
    /// Cyclic shift right (`"R"` / `"2"`).
    ShiftRight,
    /// Reversal of the first `k` positions (`"X"` / `"3"`).
    ReversePrefix,
}

impl Op {
    /// All three operation kinds, in canonical order.
    pub const ALL: [Op; 3] = [Op::ShiftLeft, Op::ShiftRight, Op::ReversePrefix];

    /// Resolves a symbolic code to its operation kind. Both alias forms of a
    /// kind resolve to the same variant, so they produce bit-identical
    /// results wherever they are substituted for each other.
    ///
    /// # Examples
    ///
    /// ```
    /// # use topspin::ops::Op;
    /// assert_eq!(Op::from_code("L").unwrap(), Op::from_code("1").unwrap());
    /// assert!(Op::from_code("Q").is_err());
    /// ```
    pub fn from_code(code: &str) -> Result<Self, OpError> {
        match code {
            "L" | "1" => Ok(Op::ShiftLeft),
            "R" | "2" => Ok(Op::ShiftRight),
            "X" | "3" => Ok(Op::ReversePrefix),
            _ => Err(OpError::UnknownCode(code.to_string())),
        }
    }

    /// The canonical (letter) code of the operation.
    pub fn code(&self) -> &'static str {
        match self {
            Op::ShiftLeft => "L",
            Op::ShiftRight => "R",
            Op::ReversePrefix => "X",
        }
    }

    /// Applies the operation to a state, returning the new state. `k` is the
    /// run-wide prefix width, only read by [`Op::ReversePrefix`].
    pub fn apply<T: Clone>(&self, state: &[T], k: usize) -> Vec<T> {
        match self {
            Op::ShiftLeft => shift_left(state),
            Op::ShiftRight => shift_right(state),
            Op::ReversePrefix => reverse_prefix(state, k),
        }
    }

    /// Compiles the operation into the position [`Permutation`] it induces on
    /// a state of length `n`. Applying the permutation to a slice is
    /// equivalent to [`Op::apply`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use topspin::ops::Op;
    /// let p = Op::ShiftLeft.permutation(5, 1);
    /// assert_eq!(p.apply_slice(&[1, 2, 3, 4, 5]), vec![2, 3, 4, 5, 1]);
    /// ```
    pub fn permutation(&self, n: usize, k: usize) -> Permutation {
        match self {
            Op::ShiftLeft => Permutation::cyclic_left(n),
            Op::ShiftRight => Permutation::cyclic_right(n),
            Op::ReversePrefix => Permutation::prefix_reversal(n, k),
        }
    }
}

impl FromStr for Op {
    type Err = OpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Op::from_code(s)
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Parses a whole sequence of symbolic codes in order. The first unknown
/// code aborts the parse, so a bad code can never be silently skipped by a
/// caller composing multiple operations.
pub fn parse_sequence<S: AsRef<str>>(codes: &[S]) -> Result<Vec<Op>, OpError> {
    codes.iter().map(|c| Op::from_code(c.as_ref())).collect()
}

/// The canonical string key of a code sequence: the codes joined with no
/// separator (every recognized alias is a single character). Used for
/// dedup in the random search and as the sequence column of its results.
pub fn seq_key<S: AsRef<str>>(codes: &[S]) -> String {
    codes.iter().map(|c| c.as_ref()).join("")
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OpError {
    #[error("unknown operation code `{0}`")]
    UnknownCode(String),
}
