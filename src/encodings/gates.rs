//! # Gate Equivalences
//!
//! Tseitin-style clause bundles that force an output literal to equal a
//! boolean function of two input literals. Both encoders are pure: the same
//! three literals always yield the same clauses in the same order.

use super::atomics;
use crate::{
    clause,
    types::{Clause, Lit},
};

/// Clauses forcing `a XOR b = s`
///
/// Each of the four clauses excludes the assignments of `a` and `b` for which
/// `s` would disagree with `a XOR b`.
#[must_use]
pub fn xor_equiv(a: Lit, b: Lit, s: Lit) -> [Clause; 4] {
    [
        clause![a, b, !s],
        clause![a, !b, s],
        clause![!a, b, s],
        clause![!a, !b, !s],
    ]
}

/// Clauses forcing `a AND b = c`
#[must_use]
pub fn and_equiv(a: Lit, b: Lit, c: Lit) -> [Clause; 3] {
    [
        atomics::cube_impl_lit(&[a, b], c),
        clause![a, !c],
        clause![b, !c],
    ]
}
