//! # Encodings for Cardinality Constraints to CNF
//!
//! Clause-level building blocks ([`atomics`], [`gates`]) and the
//! exactly-k cardinality encoding in [`card`].

use thiserror::Error;

use crate::types::Clause;

pub mod atomics;
pub mod card;
pub mod gates;

/// Trait for collecting clauses. Mainly used when generating encodings and implemented by
/// [`crate::instances::Cnf`].
pub trait CollectClauses: Extend<Clause> {
    /// Gets the number of clauses in the collection
    fn n_clauses(&self) -> usize;

    /// Adds a single clause
    fn add_clause(&mut self, clause: Clause) {
        self.extend([clause]);
    }

    /// Adds a human-readable comment before the clauses that follow. Comments
    /// are not clauses. Collections that cannot store comments ignore them.
    fn add_comment(&mut self, _comment: String) {}
}

/// Errors from encodings
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// No assignment of the input literals has exactly `bound` true literals
    #[error("no assignment of {n_lits} literals has exactly {bound} true")]
    InvalidCardinality {
        /// The requested number of true literals
        bound: usize,
        /// The number of input literals
        n_lits: usize,
    },
    /// Encode was not called before using the encoding
    #[error("not encoded")]
    NotEncoded,
    /// Encode was called on an encoding that is already built
    #[error("already encoded")]
    AlreadyEncoded,
    /// The encoding needs more fresh variables than remain below
    /// [`crate::types::Var::MAX_IDX`]
    #[error("encoding needs {needed} fresh variables but only {available} are left")]
    VarsExhausted {
        /// The number of fresh variables the encoding would allocate
        needed: u64,
        /// The number of variables still free
        available: u64,
    },
    /// A register position outside of the encoding was requested
    #[error("position {position} out of range (encoding has {n_positions} positions)")]
    OutOfRange {
        /// The requested position
        position: usize,
        /// The number of positions in the encoding
        n_positions: usize,
    },
}

/// Trait for encodings that track statistics.
pub trait EncodeStats {
    /// Gets the number of clauses in the encoding
    fn n_clauses(&self) -> usize;

    /// Gets the number of variables in the encoding
    fn n_vars(&self) -> u32;
}
