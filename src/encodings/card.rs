//! # CNF Encodings for Cardinality Constraints
//!
//! Encodes `sum of lits = k` ("exactly k of n") into CNF with the
//! [`BinaryCounter`] encoding.
//!
//! ## Example Usage
//!
//! ```
//! use cardcnf::{
//!     encodings::card::{BinaryCounter, BoundEq},
//!     instances::{BasicVarManager, Cnf, ManageVars},
//!     lit,
//! };
//!
//! let mut var_manager = BasicVarManager::with_n_used(4);
//!
//! let mut enc = BinaryCounter::from(vec![lit![0], lit![1], lit![2], lit![3]]);
//! let mut encoding = Cnf::new();
//! enc.encode_eq(2, &mut encoding, &mut var_manager).unwrap();
//! let dimacs = encoding.to_dimacs_string(var_manager.max_var());
//! assert!(dimacs.starts_with("p cnf 22 "));
//! ```

use super::{CollectClauses, Error};
use crate::{
    instances::{BasicVarManager, Cnf, ManageVars},
    types::Lit,
};

pub mod bincounter;
pub use bincounter::{BinaryCounter, CounterTable};

/// Trait for all cardinality encodings of form `sum of lits <> rhs`
pub trait Encode {
    /// Gets the number of input literals in the encoding
    fn n_lits(&self) -> usize;
}

/// Trait for cardinality encodings of the form `sum of lits = k`
pub trait BoundEq: Encode {
    /// Builds the encoding forcing exactly `bound` input literals to be true.
    /// `var_manager` is used for new variables; it is first advanced past
    /// every input variable.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidCardinality`] if `bound` exceeds the number of inputs,
    /// in which case nothing is allocated or emitted.
    fn encode_eq<Col>(
        &mut self,
        bound: usize,
        collector: &mut Col,
        var_manager: &mut dyn ManageVars,
    ) -> Result<(), Error>
    where
        Col: CollectClauses;
}

/// Encodes `sum of lits = k` into a new [`Cnf`]
///
/// # Errors
///
/// [`Error::InvalidCardinality`] if `k` is larger than the number of literals.
pub fn exactly_k(lits: &[Lit], k: usize, var_manager: &mut dyn ManageVars) -> Result<Cnf, Error> {
    let mut enc = BinaryCounter::from(lits);
    let mut cnf = Cnf::new();
    enc.encode_eq(k, &mut cnf, var_manager)?;
    Ok(cnf)
}

/// Encodes `sum of lits = k` and renders it as a DIMACS CNF document. The
/// header declares every variable up to the highest one used, inputs
/// included.
///
/// # Errors
///
/// [`Error::InvalidCardinality`] if `k` is larger than the number of literals.
pub fn exactly_k_dimacs(lits: &[Lit], k: usize) -> Result<String, Error> {
    let mut var_manager = BasicVarManager::default();
    let cnf = exactly_k(lits, k, &mut var_manager)?;
    Ok(cnf.to_dimacs_string(var_manager.max_var()))
}
