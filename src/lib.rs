//! # Topspin
//!
//! Topspin is a Rust library for exploring the Cayley graph that a fixed,
//! cyclically repeated sequence of moves generates on a permutation puzzle
//! (TopSpin-style: cyclic shifts plus a fixed-width prefix reversal).
//!
//! It replays a move sequence from a start state until the state recurs,
//! characterizes the resulting orbit (cycle length, unique states, full
//! trace), and randomly searches the space of move sequences for the ones
//! generating the longest cycles.

pub mod explore;
pub mod ops;
pub mod permutation;
pub mod search;
