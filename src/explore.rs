//! # Orbit exploration
//!
//! Replays a fixed operation sequence cyclically from a start state until
//! the state recurs, and reports the cycle that the sequence generates in
//! the puzzle's Cayley graph.
//!
//! Two variants share the recurrence algorithm:
//!
//! - [`explore`] keeps the full state history and applied-operation list
//!   and packages them as an [`Orbit`], with a tabular projection
//!   ([`Orbit::trace`]) and a one-line summary ([`Orbit::summary`]).
//!   Memory grows with the total move count.
//! - [`explore_stats`] discards the history and keeps only the counts,
//!   bounding memory by the number of *unique* visited states. The random
//!   search calls it thousands of times.
//!
//! Termination needs no move cap: every operation compiles to a bijection
//! on positions ([`Op::permutation`]), so the replay map is a bijection on
//! a finite permutation space and its orbit through the start state closes
//! back onto the start state. The loop is still written as a plain
//! loop-until-recurrence rather than trusting that argument per call.

use std::fmt;
use std::hash::Hash;

use ahash::AHashSet;
use itertools::Itertools;
use thiserror::Error;

use crate::ops::{parse_sequence, Op, OpError};
use crate::permutation::Permutation;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExploreError {
    #[error(transparent)]
    Op(#[from] OpError),

    #[error("prefix length {k} out of range for state of length {n}")]
    PrefixOutOfRange { k: usize, n: usize },

    #[error("operation sequence is empty")]
    EmptySequence,
}

/// Cycle statistics of one exploration: the total number of applied moves
/// until the start state recurred, and the number of distinct states seen
/// (start state included).
///
/// `unique_states <= total_moves + 1` always; equality means no state
/// repeated before the cycle closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrbitStats {
    pub total_moves: usize,
    pub unique_states: usize,
}

/// Full record of one exploration: every visited state in order, every
/// applied operation, and the cycle statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Orbit<T> {
    states: Vec<Vec<T>>,
    ops: Vec<Op>,
    stats: OrbitStats,
    prefix_len: usize,
}

/// One row of the tabular projection of an [`Orbit`]: the state *before*
/// the operation in this row is applied, the operation about to be applied,
/// and the 1-based step index. The final row carries the final (= start)
/// state with no pending operation and no step.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraceRow<T> {
    pub state: Vec<T>,
    pub op: Option<Op>,
    pub step: Option<usize>,
}

impl<T> Orbit<T> {
    /// All visited states in order. Element 0 is the start state; the last
    /// element equals the start state again. Length is `total_moves() + 1`.
    pub fn states(&self) -> &[Vec<T>] {
        &self.states
    }

    /// The operations applied, in order. Length is `total_moves()`.
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn stats(&self) -> OrbitStats {
        self.stats
    }

    pub fn total_moves(&self) -> usize {
        self.stats.total_moves
    }

    pub fn unique_states(&self) -> usize {
        self.stats.unique_states
    }

    /// States seen more than once before the cycle closed:
    /// `total_moves + 1 - unique_states`.
    pub fn redundant_states(&self) -> usize {
        self.stats.total_moves + 1 - self.stats.unique_states
    }
}

impl<T: Clone> Orbit<T> {
    /// The tabular projection: row `i` holds the state before the `i`-th
    /// operation, that operation, and step index `i + 1`; the final row
    /// holds the recurred start state with `None`/`None`.
    pub fn trace(&self) -> Vec<TraceRow<T>> {
        let mut rows: Vec<TraceRow<T>> = self
            .states
            .iter()
            .take(self.stats.total_moves)
            .zip(&self.ops)
            .enumerate()
            .map(|(i, (state, &op))| TraceRow {
                state: state.clone(),
                op: Some(op),
                step: Some(i + 1),
            })
            .collect();
        rows.push(TraceRow {
            state: self.states[self.stats.total_moves].clone(),
            op: None,
            step: None,
        });
        rows
    }
}

impl<T: Clone + fmt::Display> Orbit<T> {
    /// Renders [`Orbit::trace`] as a plain text table, one row per line,
    /// with `-` standing in for the final row's absent operation and step.
    pub fn trace_table(&self) -> String {
        self.trace()
            .iter()
            .map(|row| {
                let state = row.state.iter().join(" ");
                let op = row.op.map_or("-", |o| o.code());
                let step = row.step.map_or_else(|| "-".to_string(), |s| s.to_string());
                format!("[{state}]  {op}  {step}")
            })
            .join("\n")
    }

    /// One-line human-readable summary: state length, prefix width, the
    /// alphabet of operations the sequence actually used, and the cycle
    /// statistics.
    pub fn summary(&self) -> String {
        let n = self.states[0].len();
        let alphabet = self.ops.iter().map(Op::code).unique().join(", ");
        format!(
            "n = {}, k = {}, ops = [{}], total moves = {}, unique states = {}, redundant states = {}",
            n,
            self.prefix_len,
            alphabet,
            self.stats.total_moves,
            self.stats.unique_states,
            self.redundant_states()
        )
    }
}

/// Parses the sequence and checks the prefix width once, up front. The
/// width is only constrained when the sequence actually contains a prefix
/// reversal.
fn setup<S: AsRef<str>>(codes: &[S], n: usize, k: usize) -> Result<Vec<Op>, ExploreError> {
    if codes.is_empty() {
        return Err(ExploreError::EmptySequence);
    }
    let ops = parse_sequence(codes)?;
    if ops.contains(&Op::ReversePrefix) && (k < 1 || k > n) {
        return Err(ExploreError::PrefixOutOfRange { k, n });
    }
    Ok(ops)
}

/// Replays `codes` cyclically from `start` until the state equals `start`
/// again, recording every intermediate state and operation.
///
/// # Examples
///
/// ```
/// let orbit = topspin::explore::explore(&[1, 2, 3, 4, 5], &["L"], 1).unwrap();
/// assert_eq!(orbit.total_moves(), 5);
/// assert_eq!(orbit.unique_states(), 5);
/// assert_eq!(orbit.states()[1], vec![2, 3, 4, 5, 1]);
/// ```
pub fn explore<T, S>(start: &[T], codes: &[S], k: usize) -> Result<Orbit<T>, ExploreError>
where
    T: Clone + Eq + Hash,
    S: AsRef<str>,
{
    let ops = setup(codes, start.len(), k)?;

    let start = start.to_vec();
    let mut visited = AHashSet::new();
    visited.insert(start.clone());
    let mut states = vec![start.clone()];
    let mut applied = Vec::new();
    let mut current = start.clone();
    let mut total_moves = 0;
    let mut unique_states = 1;

    'replay: loop {
        for &op in &ops {
            current = op.apply(&current, k);
            total_moves += 1;
            applied.push(op);
            states.push(current.clone());
            if visited.insert(current.clone()) {
                unique_states += 1;
            }
            if current == start {
                break 'replay;
            }
        }
    }

    Ok(Orbit {
        states,
        ops: applied,
        stats: OrbitStats {
            total_moves,
            unique_states,
        },
        prefix_len: k,
    })
}

/// Same recurrence detection as [`explore`], keeping only the counts.
///
/// The sequence is compiled to position permutations once and the state is
/// stepped in place, so per-call memory is bounded by the unique visited
/// states however long the cycle runs.
///
/// # Examples
///
/// ```
/// let stats = topspin::explore::explore_stats(&[1, 2, 3, 4, 5], &["L"], 1).unwrap();
/// assert_eq!(stats.total_moves, 5);
/// assert_eq!(stats.unique_states, 5);
/// ```
pub fn explore_stats<T, S>(start: &[T], codes: &[S], k: usize) -> Result<OrbitStats, ExploreError>
where
    T: Clone + Eq + Hash,
    S: AsRef<str>,
{
    let n = start.len();
    let ops = setup(codes, n, k)?;
    let perms: Vec<Permutation> = ops.iter().map(|op| op.permutation(n, k)).collect();

    let mut visited = AHashSet::new();
    visited.insert(start.to_vec());
    let mut current = start.to_vec();
    let mut total_moves = 0;
    let mut unique_states = 1;

    'replay: loop {
        for perm in &perms {
            perm.apply_slice_in_place(&mut current);
            total_moves += 1;
            if !visited.contains(&current) {
                visited.insert(current.clone());
                unique_states += 1;
            }
            if current == start {
                break 'replay;
            }
        }
    }

    Ok(OrbitStats {
        total_moves,
        unique_states,
    })
}
