//! # Random sequence search
//!
//! Samples random operation sequences of a fixed length and ranks them by
//! the length of the cycle they generate, using the lightweight explorer
//! ([`crate::explore::explore_stats`]) so memory stays bounded however many
//! candidates are evaluated.
//!
//! Sampling draws codes uniformly with replacement, dedups whole sequences
//! by their canonical key, and stops once the requested number of distinct
//! successful samples is in hand or the attempt budget (a fixed multiple of
//! the sample count) runs out. The budget is the safety valve for alphabets
//! with too few distinct sequences of the requested length.
//!
//! A failure inside one sample's evaluation (an unknown code in the
//! alphabet) is caught at the sample boundary, reported, and does not count
//! toward the sample budget; the search carries on.

use std::hash::Hash;

use ahash::AHashSet;
use itertools::Itertools;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use thiserror::Error;

use crate::explore::explore_stats;
use crate::ops::seq_key;

/// Draw budget per requested sample. Every draw counts, duplicates included.
const ATTEMPT_BUDGET_FACTOR: usize = 10;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("operation alphabet is empty")]
    EmptyAlphabet,

    #[error("sequence length must be at least 1")]
    ZeroSequenceLength,

    #[error("sample count must be at least 1")]
    ZeroSamples,

    #[error("prefix length {k} out of range for state of length {n}")]
    PrefixOutOfRange { k: usize, n: usize },
}

/// One ranked candidate: the sequence's canonical key and its cycle
/// statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchEntry {
    pub sequence: String,
    pub total_moves: usize,
    pub unique_states: usize,
}

/// One sampled sequence whose evaluation failed, with the error message.
/// Failures never abort the search and never count toward the sample budget.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleFailure {
    pub sequence: String,
    pub error: String,
}

/// Outcome of one search run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchReport {
    /// The top-ranked entries: `total_moves` descending, ties broken by
    /// `unique_states` descending, cut to the configured top-N.
    pub entries: Vec<SearchEntry>,
    /// Per-sample failures, in the order they occurred.
    pub failures: Vec<SampleFailure>,
    /// Total draws made, duplicate keys included.
    pub attempts: usize,
    /// Set when the attempt budget ran out before the requested number of
    /// distinct successful samples was collected.
    pub budget_exhausted: bool,
}

impl SearchReport {
    /// True when not a single sampled sequence evaluated successfully —
    /// distinct from a populated report whose cycles are merely short.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the ranked entries as a plain text table, one entry per line.
    pub fn table(&self) -> String {
        self.entries
            .iter()
            .map(|e| {
                format!(
                    "{}  total_moves = {}  unique_states = {}",
                    e.sequence, e.total_moves, e.unique_states
                )
            })
            .join("\n")
    }
}

/// A validated search configuration over a fixed start state.
///
/// The alphabet is raw symbolic codes, deliberately not parsed up front: a
/// bad code surfaces as a reported per-sample failure at evaluation time,
/// not as a construction error.
///
/// # Examples
///
/// ```
/// use topspin::search::RandomSearch;
///
/// let search = RandomSearch::new(
///     ["L", "R", "X"],
///     4,              // sequence length
///     20,             // distinct successful samples wanted
///     5,              // keep the top 5
///     (1..=10u64).collect(),
///     4,              // prefix width
/// )
/// .unwrap();
/// let report = search.run_seeded(7);
/// assert!(report.entries.len() <= 5);
/// ```
#[derive(Debug, Clone)]
pub struct RandomSearch<T> {
    alphabet: Vec<String>,
    seq_len: usize,
    n_samples: usize,
    n_top: usize,
    start: Vec<T>,
    prefix_len: usize,
}

impl<T: Clone + Eq + Hash> RandomSearch<T> {
    pub fn new<A, S>(
        alphabet: A,
        seq_len: usize,
        n_samples: usize,
        n_top: usize,
        start: Vec<T>,
        prefix_len: usize,
    ) -> Result<Self, SearchError>
    where
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let alphabet: Vec<String> = alphabet.into_iter().map(Into::into).collect();
        if alphabet.is_empty() {
            return Err(SearchError::EmptyAlphabet);
        }
        if seq_len == 0 {
            return Err(SearchError::ZeroSequenceLength);
        }
        if n_samples == 0 {
            return Err(SearchError::ZeroSamples);
        }
        if prefix_len < 1 || prefix_len > start.len() {
            return Err(SearchError::PrefixOutOfRange {
                k: prefix_len,
                n: start.len(),
            });
        }
        Ok(RandomSearch {
            alphabet,
            seq_len,
            n_samples,
            n_top,
            start,
            prefix_len,
        })
    }

    /// Runs the search with the given random source.
    pub fn run(&self, rng: &mut impl Rng) -> SearchReport {
        let budget = self.n_samples * ATTEMPT_BUDGET_FACTOR;
        let mut tried: AHashSet<String> = AHashSet::new();
        let mut entries: Vec<SearchEntry> = Vec::new();
        let mut failures: Vec<SampleFailure> = Vec::new();
        let mut attempts = 0;

        while entries.len() < self.n_samples && attempts < budget {
            attempts += 1;

            let seq: Vec<&str> = (0..self.seq_len)
                .map(|_| self.alphabet[rng.gen_range(0..self.alphabet.len())].as_str())
                .collect();
            let key = seq_key(&seq);
            if !tried.insert(key.clone()) {
                continue;
            }

            match explore_stats(&self.start, &seq, self.prefix_len) {
                Ok(stats) => {
                    log::debug!(
                        "sequence {key}: total_moves = {}, unique_states = {}",
                        stats.total_moves,
                        stats.unique_states
                    );
                    entries.push(SearchEntry {
                        sequence: key,
                        total_moves: stats.total_moves,
                        unique_states: stats.unique_states,
                    });
                }
                Err(err) => {
                    log::warn!("sequence {key} failed: {err}");
                    failures.push(SampleFailure {
                        sequence: key,
                        error: err.to_string(),
                    });
                }
            }
        }

        let budget_exhausted = entries.len() < self.n_samples;
        entries.sort_by(|a, b| {
            b.total_moves
                .cmp(&a.total_moves)
                .then(b.unique_states.cmp(&a.unique_states))
        });
        entries.truncate(self.n_top);

        if entries.is_empty() {
            log::warn!(
                "random search over alphabet [{}] produced no successful samples in {attempts} attempts",
                self.alphabet.iter().join(", ")
            );
        }

        SearchReport {
            entries,
            failures,
            attempts,
            budget_exhausted,
        }
    }

    /// Runs the search with a small seeded RNG, for reproducible runs.
    pub fn run_seeded(&self, seed: u64) -> SearchReport {
        self.run(&mut SmallRng::seed_from_u64(seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start5() -> Vec<u64> {
        (1..=5).collect()
    }

    #[test]
    fn test_config_validation() {
        assert_eq!(
            RandomSearch::new(Vec::<&str>::new(), 2, 5, 5, start5(), 2).unwrap_err(),
            SearchError::EmptyAlphabet
        );
        assert_eq!(
            RandomSearch::new(["L"], 0, 5, 5, start5(), 2).unwrap_err(),
            SearchError::ZeroSequenceLength
        );
        assert_eq!(
            RandomSearch::new(["L"], 2, 0, 5, start5(), 2).unwrap_err(),
            SearchError::ZeroSamples
        );
        assert_eq!(
            RandomSearch::new(["L"], 2, 5, 5, start5(), 6).unwrap_err(),
            SearchError::PrefixOutOfRange { k: 6, n: 5 }
        );
        assert_eq!(
            RandomSearch::new(["L"], 2, 5, 5, start5(), 0).unwrap_err(),
            SearchError::PrefixOutOfRange { k: 0, n: 5 }
        );
    }

    #[test]
    fn test_too_few_distinct_sequences_exhausts_budget() {
        // Alphabet ["L"], length 1: exactly one distinct sequence exists.
        let search = RandomSearch::new(["L"], 1, 3, 3, start5(), 1).unwrap();
        let report = search.run_seeded(0);
        assert!(report.budget_exhausted);
        assert_eq!(report.attempts, 30);
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].sequence, "L");
        assert_eq!(report.entries[0].total_moves, 5);
        assert!(report.failures.is_empty());
        assert!(!report.is_empty());
    }

    #[test]
    fn test_bad_alphabet_yields_empty_report() {
        let search = RandomSearch::new(["Q"], 2, 4, 4, start5(), 1).unwrap();
        let report = search.run_seeded(1);
        assert!(report.is_empty());
        assert!(report.budget_exhausted);
        assert!(!report.failures.is_empty());
        assert_eq!(report.failures[0].sequence, "QQ");
        assert!(report.failures[0].error.contains('Q'));
    }

    #[test]
    fn test_partially_bad_alphabet_keeps_searching() {
        // "Q" samples fail and are reported; "L" samples succeed.
        let search = RandomSearch::new(["L", "Q"], 1, 1, 1, start5(), 1).unwrap();
        let report = search.run_seeded(3);
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].sequence, "L");
        assert!(!report.budget_exhausted);
    }

    #[test]
    fn test_equal_cycle_alphabet_fills_top_exactly() {
        // "L" and "1" are aliases: every length-2 sequence nets a two-step
        // left rotation, so all four distinct keys have the same cycle.
        let search = RandomSearch::new(["L", "1"], 2, 4, 4, start5(), 1).unwrap();
        let report = search.run_seeded(42);
        assert_eq!(report.entries.len(), 4);
        assert!(report.entries.iter().all(|e| e.total_moves == 10));
        let keys: AHashSet<&str> = report.entries.iter().map(|e| e.sequence.as_str()).collect();
        assert_eq!(keys.len(), 4);
    }

    #[test]
    fn test_ranking_order() {
        let search = RandomSearch::new(["L", "R", "X"], 3, 15, 15, start5(), 4).unwrap();
        let report = search.run_seeded(9);
        assert!(!report.is_empty());
        for pair in report.entries.windows(2) {
            let better = (pair[0].total_moves, pair[0].unique_states);
            let worse = (pair[1].total_moves, pair[1].unique_states);
            assert!(better >= worse);
        }
    }

    #[test]
    fn test_top_cut() {
        let search = RandomSearch::new(["L", "R", "X"], 3, 10, 2, start5(), 4).unwrap();
        let report = search.run_seeded(5);
        assert!(report.entries.len() <= 2);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let search = RandomSearch::new(["L", "R", "X"], 4, 8, 8, start5(), 3).unwrap();
        assert_eq!(search.run_seeded(11), search.run_seeded(11));
    }

    #[test]
    fn test_report_table_lists_entries_in_rank_order() {
        let search = RandomSearch::new(["L"], 1, 1, 1, start5(), 1).unwrap();
        let report = search.run_seeded(0);
        assert_eq!(report.table(), "L  total_moves = 5  unique_states = 5");
    }
}
