//! # Common Types for CNF Encodings
//!
//! Variables, literals and (partial) assignments. Variables are indexed from
//! 0 internally and are shifted by one when written in DIMACS/IPASIR form, so
//! the DIMACS terminator `0` never names a variable.

use core::ffi::c_int;
use std::{fmt, ops};

use thiserror::Error;

pub mod constraints;
pub use constraints::Clause;

/// Type representing boolean variables. Variable indexing starts from 0 and
/// the maximum index is `i32::MAX - 1`, the highest index whose DIMACS integer
/// (index plus one) still fits a `c_int`.
#[derive(Hash, Eq, PartialEq, PartialOrd, Ord, Clone, Copy, Debug, Default)]
#[repr(transparent)]
pub struct Var {
    idx: u32,
}

impl Var {
    /// The maximum index that can be represented.
    #[allow(clippy::cast_sign_loss)]
    pub const MAX_IDX: u32 = c_int::MAX as u32 - 1;

    /// Creates a new variable with a given index.
    ///
    /// # Panics
    ///
    /// If `idx > Var::MAX_IDX`.
    #[must_use]
    pub fn new(idx: u32) -> Var {
        assert!(idx <= Var::MAX_IDX, "variable index too high");
        Var { idx }
    }

    /// Creates a new variable with a given index.
    ///
    /// # Errors
    ///
    /// [`TypeError::IdxTooHigh`] if `idx > Var::MAX_IDX`.
    pub fn new_with_error(idx: u32) -> Result<Var, TypeError> {
        if idx > Var::MAX_IDX {
            return Err(TypeError::IdxTooHigh(idx, Var::MAX_IDX));
        }
        Ok(Var { idx })
    }

    /// Creates a literal that is not negated.
    #[inline]
    #[must_use]
    pub fn pos_lit(self) -> Lit {
        Lit::new_unchecked(self.idx, false)
    }

    /// Returns the index of the variable as a `usize` for indexing data
    /// structures.
    #[inline]
    #[must_use]
    pub fn idx(&self) -> usize {
        self.idx as usize
    }

    /// Returns the 32 bit index of the variable.
    #[inline]
    #[must_use]
    pub fn idx32(&self) -> u32 {
        self.idx
    }

    /// Converts the variable to its DIMACS/IPASIR integer (index plus one).
    /// Every variable up to [`Var::MAX_IDX`] maps into `1..=c_int::MAX`.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn to_ipasir(self) -> c_int {
        debug_assert!(self.idx <= Var::MAX_IDX, "variable index too high");
        (self.idx + 1) as c_int
    }
}

impl ops::Add<u32> for Var {
    type Output = Var;

    fn add(self, rhs: u32) -> Self::Output {
        Var {
            idx: self.idx + rhs,
        }
    }
}

impl ops::AddAssign<u32> for Var {
    fn add_assign(&mut self, rhs: u32) {
        self.idx += rhs;
    }
}

impl ops::Sub<u32> for Var {
    type Output = Var;

    fn sub(self, rhs: u32) -> Self::Output {
        Var {
            idx: self.idx - rhs,
        }
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.idx)
    }
}

/// More easily creates variables. Mainly used in tests.
///
/// # Examples
///
/// ```
/// use cardcnf::{var, types::Var};
///
/// assert_eq!(var![42], Var::new(42));
/// ```
#[macro_export]
macro_rules! var {
    ($v:expr) => {
        $crate::types::Var::new($v)
    };
}

/// Type representing literals, possibly negated boolean variables.
#[derive(Hash, Eq, PartialEq, PartialOrd, Ord, Clone, Copy, Debug)]
#[repr(transparent)]
pub struct Lit {
    /// `idx << 1` with the lowest bit set if the literal is negated
    lidx: u32,
}

impl Lit {
    #[inline]
    fn represent(idx: u32, negated: bool) -> u32 {
        (idx << 1) + u32::from(negated)
    }

    /// Creates a new (negated or not) literal with a given index.
    ///
    /// # Panics
    ///
    /// If `idx > Var::MAX_IDX`.
    #[must_use]
    pub fn new(idx: u32, negated: bool) -> Lit {
        assert!(idx <= Var::MAX_IDX, "variable index too high");
        Lit {
            lidx: Lit::represent(idx, negated),
        }
    }

    /// Creates a new (negated or not) literal with a given index.
    ///
    /// # Errors
    ///
    /// [`TypeError::IdxTooHigh`] if `idx > Var::MAX_IDX`.
    pub fn new_with_error(idx: u32, negated: bool) -> Result<Lit, TypeError> {
        if idx > Var::MAX_IDX {
            return Err(TypeError::IdxTooHigh(idx, Var::MAX_IDX));
        }
        Ok(Lit {
            lidx: Lit::represent(idx, negated),
        })
    }

    #[inline]
    fn new_unchecked(idx: u32, negated: bool) -> Lit {
        Lit {
            lidx: Lit::represent(idx, negated),
        }
    }

    /// Creates a new positive literal with a given index.
    #[inline]
    #[must_use]
    pub fn positive(idx: u32) -> Lit {
        Lit::new(idx, false)
    }

    /// Creates a new negated literal with a given index.
    #[inline]
    #[must_use]
    pub fn negative(idx: u32) -> Lit {
        Lit::new(idx, true)
    }

    /// Creates a literal from a DIMACS/IPASIR integer.
    ///
    /// # Errors
    ///
    /// [`TypeError::IpasirZero`] if the value is zero, or
    /// [`TypeError::IdxTooHigh`] if the index is too high.
    pub fn from_ipasir(val: c_int) -> Result<Lit, TypeError> {
        if val == 0 {
            return Err(TypeError::IpasirZero);
        }
        let negated = val < 0;
        let idx = val.unsigned_abs();
        Lit::new_with_error(idx - 1, negated)
    }

    /// Gets the variable index of the literal
    #[inline]
    #[must_use]
    pub fn vidx(&self) -> usize {
        (self.lidx >> 1) as usize
    }

    /// Gets the variable that the literal corresponds to.
    #[inline]
    #[must_use]
    pub fn var(&self) -> Var {
        Var {
            idx: self.lidx >> 1,
        }
    }

    /// True if the literal is positive.
    #[inline]
    #[must_use]
    pub fn is_pos(&self) -> bool {
        (self.lidx & 1) == 0
    }

    /// True if the literal is negated.
    #[inline]
    #[must_use]
    pub fn is_neg(&self) -> bool {
        (self.lidx & 1) == 1
    }

    /// Converts the literal to its DIMACS/IPASIR integer: index plus one,
    /// negative if the literal is negated.
    #[must_use]
    pub fn to_ipasir(self) -> c_int {
        let idx = self.var().to_ipasir();
        if self.is_neg() {
            -idx
        } else {
            idx
        }
    }
}

impl ops::Not for Lit {
    type Output = Lit;

    #[inline]
    fn not(self) -> Lit {
        Lit {
            lidx: self.lidx ^ 1,
        }
    }
}

impl ops::Neg for Lit {
    type Output = Lit;

    #[inline]
    fn neg(self) -> Lit {
        !self
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_neg() {
            write!(f, "~x{}", self.vidx())
        } else {
            write!(f, "x{}", self.vidx())
        }
    }
}

/// More easily creates literals. Mainly used in tests.
///
/// # Examples
///
/// ```
/// use cardcnf::{lit, types::Lit};
///
/// assert_eq!(lit![42], Lit::positive(42));
/// assert_eq!(!lit![42], Lit::negative(42));
/// ```
#[macro_export]
macro_rules! lit {
    ($l:expr) => {
        $crate::types::Lit::positive($l)
    };
}

/// More easily creates literals with DIMACS indexing (starts from 1) and
/// negation (negative value is negation). Mainly used in tests.
///
/// # Examples
///
/// ```
/// use cardcnf::{lit, ipasir_lit};
///
/// assert_eq!(ipasir_lit![42], lit![41]);
/// assert_eq!(ipasir_lit![-42], !lit![41]);
/// ```
#[macro_export]
macro_rules! ipasir_lit {
    ($l:expr) => {
        $crate::types::Lit::from_ipasir($l).unwrap()
    };
}

/// Ternary value assigned to a literal or variable, including possible "don't care"
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum TernaryVal {
    /// Positive assignment.
    True,
    /// Negative assignment.
    False,
    /// Unassigned.
    DontCare,
}

impl ops::Not for TernaryVal {
    type Output = TernaryVal;

    fn not(self) -> Self::Output {
        match self {
            TernaryVal::True => TernaryVal::False,
            TernaryVal::False => TernaryVal::True,
            TernaryVal::DontCare => TernaryVal::DontCare,
        }
    }
}

impl fmt::Display for TernaryVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TernaryVal::True => write!(f, "1"),
            TernaryVal::False => write!(f, "0"),
            TernaryVal::DontCare => write!(f, "_"),
        }
    }
}

impl From<bool> for TernaryVal {
    fn from(value: bool) -> Self {
        if value {
            return TernaryVal::True;
        }
        TernaryVal::False
    }
}

/// Type representing a (partial) assignment of variables.
#[derive(Clone, PartialEq, Eq, Default, Debug)]
#[repr(transparent)]
pub struct Assignment {
    assignment: Vec<TernaryVal>,
}

impl Assignment {
    /// Gets the value of a variable. Variables outside of the assignment are
    /// [`TernaryVal::DontCare`].
    #[must_use]
    pub fn var_value(&self, var: Var) -> TernaryVal {
        self.assignment
            .get(var.idx())
            .copied()
            .unwrap_or(TernaryVal::DontCare)
    }

    /// Same as [`Assignment::var_value`], but for literals.
    #[must_use]
    pub fn lit_value(&self, lit: Lit) -> TernaryVal {
        if lit.is_neg() {
            !self.var_value(lit.var())
        } else {
            self.var_value(lit.var())
        }
    }

    /// Assigns a variable in the assignment
    pub fn assign_var(&mut self, var: Var, val: TernaryVal) {
        if self.assignment.len() < var.idx() + 1 {
            self.assignment.resize(var.idx() + 1, TernaryVal::DontCare);
        }
        self.assignment[var.idx()] = val;
    }

    /// Assigns a literal to true
    pub fn assign_lit(&mut self, lit: Lit) {
        self.assign_var(lit.var(), TernaryVal::from(lit.is_pos()));
    }

    /// Gets the maximum variable in the assignment
    #[must_use]
    pub fn max_var(&self) -> Option<Var> {
        let len = u32::try_from(self.assignment.len()).ok()?;
        len.checked_sub(1).map(Var::new)
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.assignment
            .iter()
            .try_for_each(|tv| write!(f, "{tv}"))
    }
}

impl FromIterator<Lit> for Assignment {
    fn from_iter<T: IntoIterator<Item = Lit>>(iter: T) -> Self {
        let mut assignment = Assignment::default();
        iter.into_iter().for_each(|l| assignment.assign_lit(l));
        assignment
    }
}

/// Errors related to types
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TypeError {
    /// The requested index is too high.
    /// Contains the requested and the maximum index.
    #[error("index {0} is too high (maximum {1})")]
    IdxTooHigh(u32, u32),
    /// IPASIR index is zero
    #[error("zero is an invalid IPASIR literal")]
    IpasirZero,
}
