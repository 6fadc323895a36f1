//! # Constraint Types
//!
//! The only constraint type needed for CNF output is [`Clause`].

use std::{fmt, ops};

use super::{Assignment, Lit, TernaryVal};

/// Type representing a clause, the disjunction of its literals.
/// Literal order is preserved as given.
#[derive(Eq, PartialEq, PartialOrd, Ord, Hash, Clone, Default)]
pub struct Clause {
    lits: Vec<Lit>,
}

impl Clause {
    /// Creates a new empty clause
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the clause as a slice of literals
    #[must_use]
    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }

    /// Gets the length of the clause
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.lits.len()
    }

    /// Checks if the clause is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    /// Adds a literal to the clause
    pub fn add(&mut self, lit: Lit) {
        self.lits.push(lit);
    }

    /// Evaluates a clause under a given assignment
    #[must_use]
    pub fn evaluate(&self, assignment: &Assignment) -> TernaryVal {
        self.iter()
            .fold(TernaryVal::False, |val, l| match assignment.lit_value(*l) {
                TernaryVal::True => TernaryVal::True,
                TernaryVal::DontCare => {
                    if val == TernaryVal::False {
                        TernaryVal::DontCare
                    } else {
                        val
                    }
                }
                TernaryVal::False => val,
            })
    }

    /// Checks whether the clause is satisfied by the assignment
    #[must_use]
    pub fn is_sat(&self, assignment: &Assignment) -> bool {
        self.evaluate(assignment) == TernaryVal::True
    }

    /// Gets an iterator over the clause
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Lit> {
        self.lits.iter()
    }
}

impl<const N: usize> From<[Lit; N]> for Clause {
    fn from(value: [Lit; N]) -> Self {
        Self {
            lits: Vec::from(value),
        }
    }
}

impl From<&[Lit]> for Clause {
    fn from(value: &[Lit]) -> Self {
        Self {
            lits: Vec::from(value),
        }
    }
}

impl ops::Index<usize> for Clause {
    type Output = Lit;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.lits[index]
    }
}

impl<'a> IntoIterator for &'a Clause {
    type Item = &'a Lit;

    type IntoIter = std::slice::Iter<'a, Lit>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.lits.iter()
    }
}

impl IntoIterator for Clause {
    type Item = Lit;

    type IntoIter = std::vec::IntoIter<Lit>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.lits.into_iter()
    }
}

impl FromIterator<Lit> for Clause {
    fn from_iter<T: IntoIterator<Item = Lit>>(iter: T) -> Self {
        Self {
            lits: Vec::from_iter(iter),
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, lit) in self.iter().enumerate() {
            if i != 0 {
                write!(f, "|")?;
            }
            write!(f, "{lit}")?;
        }
        write!(f, ")")
    }
}

impl fmt::Debug for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Creates a clause from a list of literals
///
/// # Examples
///
/// ```
/// use cardcnf::{clause, lit};
///
/// let cl = clause![lit![0], !lit![1]];
/// assert_eq!(cl.len(), 2);
/// ```
#[macro_export]
macro_rules! clause {
    ( $($l:expr),* ) => {
        {
            let mut tmp_clause = $crate::types::Clause::new();
            $(
                tmp_clause.add($l);
            )*
            tmp_clause
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::{
        lit,
        types::{Assignment, TernaryVal},
    };

    #[test]
    fn clause_evaluate() {
        let cl = clause![lit![0], !lit![1], lit![2]];
        let assign = Assignment::from_iter([!lit![0], lit![1]]);
        assert_eq!(cl.evaluate(&assign), TernaryVal::DontCare);
        let assign = Assignment::from_iter([!lit![0], lit![1], lit![2]]);
        assert_eq!(cl.evaluate(&assign), TernaryVal::True);
        let assign = Assignment::from_iter([!lit![0], lit![1], !lit![2]]);
        assert_eq!(cl.evaluate(&assign), TernaryVal::False);
        assert!(!cl.is_sat(&assign));
    }

    #[test]
    fn clause_display() {
        let cl = clause![lit![0], !lit![1]];
        assert_eq!(format!("{cl}"), "(x0|~x1)");
    }
}
