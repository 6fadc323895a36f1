//! # cardcnf - Exactly-k Cardinality Constraints as DIMACS CNF
//!
//! `cardcnf` translates the constraint "exactly `k` of the `n` input literals
//! are true" into CNF. The encoding chains the inputs through a bit-serial
//! ripple-carry adder: a binary sum register is carried from input to input,
//! every stage forbids overflow, and the final register is pinned to `k`.
//!
//! ## Example
//!
//! ```
//! use cardcnf::{encodings::card, ipasir_lit};
//!
//! let lits = [ipasir_lit![1], ipasir_lit![2]];
//! let dimacs = card::exactly_k_dimacs(&lits, 1).unwrap();
//! assert!(dimacs.starts_with("p cnf "));
//! ```
//!
//! ## Minimum Supported Rust Version (MSRV)
//!
//! Currently, the MSRV is 1.76.0.

pub mod encodings;
pub mod instances;
pub mod types;

mod utils;
