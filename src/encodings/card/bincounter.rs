//! # Binary Counter Encoding for Exactly-k Constraints
//!
//! Chains one ripple-carry adder stage per input literal. Stage `i` adds the
//! `i`-th input, placed at the lowest bit of an otherwise zero counter
//! register, to the running sum of the first `i` inputs. Each adder bit is
//! one XOR gate (sum bit) and one AND gate (carry into the next bit), both
//! from [`gates`].
//!
//! The running sum register is `bits` wide, where `bits` is the number of
//! binary digits of the bound. Overflowing it is forbidden at every stage by
//! forcing the top carry of each counter register to false. Since the
//! running sum never decreases, this only excludes assignments with more
//! than `2^bits - 1 >= k` true inputs, which violate the constraint anyway.
//!
//! ## Variable and clause order
//!
//! Fresh variables are allocated position by position, first all counter
//! carries (`bits` per input) and then all sum registers (`bits` for each of
//! the `n + 1` positions). Clauses come in the order
//!
//! 1. units forcing the initial sum register to zero,
//! 2. for each stage and bit, the XOR then the AND clauses,
//! 3. units pinning the final sum register to the binary value of `k`
//!    (least significant bit first),
//! 4. units forbidding a carry out of the top bit of each counter register.

use log::{debug, trace};

use crate::{
    clause,
    encodings::{gates, CollectClauses, EncodeStats, Error},
    instances::ManageVars,
    types::{Assignment, Lit, TernaryVal, Var},
    utils,
};

use super::{BoundEq, Encode};

/// A dense, row-major table of literals indexed by `(position, bit)`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CounterTable {
    lits: Vec<Lit>,
    width: usize,
}

impl CounterTable {
    fn with_width(width: usize, capacity: usize) -> CounterTable {
        CounterTable {
            lits: Vec::with_capacity(width * capacity),
            width,
        }
    }

    fn push_row<I: IntoIterator<Item = Lit>>(&mut self, row: I) {
        let len = self.lits.len();
        self.lits.extend(row);
        debug_assert_eq!(self.lits.len() - len, self.width);
    }

    /// Gets the number of rows (positions) in the table
    #[must_use]
    pub fn n_rows(&self) -> usize {
        if self.width == 0 {
            0
        } else {
            self.lits.len() / self.width
        }
    }

    /// Gets the number of literals per row
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Gets the literal at a position and bit, if both are in range
    #[must_use]
    pub fn get(&self, pos: usize, bit: usize) -> Option<Lit> {
        if bit >= self.width || pos >= self.n_rows() {
            return None;
        }
        Some(self.lits[pos * self.width + bit])
    }

    /// Gets the row at a position, least significant bit first
    #[must_use]
    pub fn row(&self, pos: usize) -> Option<&[Lit]> {
        if pos >= self.n_rows() {
            return None;
        }
        Some(&self.lits[pos * self.width..(pos + 1) * self.width])
    }
}

impl std::ops::Index<(usize, usize)> for CounterTable {
    type Output = Lit;

    fn index(&self, (pos, bit): (usize, usize)) -> &Self::Output {
        assert!(
            bit < self.width && pos < self.n_rows(),
            "index ({pos}, {bit}) out of range for {}x{} table",
            self.n_rows(),
            self.width
        );
        &self.lits[pos * self.width + bit]
    }
}

/// Implementation of the binary counter encoding for `sum of lits = k`
///
/// Input literals may be negated and need not be contiguous; the encoding
/// only relies on the variable manager to hand out variables not used by the
/// inputs.
#[derive(Default, Clone, Debug)]
pub struct BinaryCounter {
    /// Input literals to the counter
    in_lits: Vec<Lit>,
    /// Whether to emit a comment before each gate's clauses
    annotate: bool,
    /// The bound the counter was encoded for
    bound: Option<usize>,
    /// Counter registers, `n x (bits + 1)`; bit 0 of each is its input literal
    counters: CounterTable,
    /// Running sum registers, `(n + 1) x bits`
    sums: CounterTable,
    /// The number of variables in the encoding
    n_vars: u32,
    /// The number of clauses in the encoding
    n_clauses: usize,
}

impl BinaryCounter {
    /// Enables or disables the gate comments emitted during encoding
    #[must_use]
    pub fn with_annotations(mut self, annotate: bool) -> Self {
        self.annotate = annotate;
        self
    }

    /// Gets the input literals
    #[must_use]
    pub fn in_lits(&self) -> &[Lit] {
        &self.in_lits
    }

    /// Gets the width of the running sum registers, if encoded
    #[must_use]
    pub fn bits(&self) -> Option<usize> {
        self.bound.map(|_| self.sums.width())
    }

    /// Gets the counter registers. Empty until encoded.
    #[must_use]
    pub fn counters(&self) -> &CounterTable {
        &self.counters
    }

    /// Gets the running sum registers. Empty until encoded.
    #[must_use]
    pub fn sums(&self) -> &CounterTable {
        &self.sums
    }

    /// Decodes the running sum register at `position` (the count of true
    /// literals among the first `position` inputs) from an assignment.
    /// Returns `None` if a bit of the register is unassigned.
    ///
    /// # Errors
    ///
    /// [`Error::NotEncoded`] before encoding, [`Error::OutOfRange`] if
    /// `position` exceeds the number of inputs.
    pub fn decode_sum(
        &self,
        position: usize,
        assignment: &Assignment,
    ) -> Result<Option<usize>, Error> {
        if self.bound.is_none() {
            return Err(Error::NotEncoded);
        }
        if position > self.in_lits.len() {
            return Err(Error::OutOfRange {
                position,
                n_positions: self.in_lits.len() + 1,
            });
        }
        let Some(row) = self.sums.row(position) else {
            // no registers for an empty input
            return Ok(Some(0));
        };
        let mut val = 0;
        for (bit, lit) in row.iter().enumerate() {
            match assignment.lit_value(*lit) {
                TernaryVal::True => val |= 1 << bit,
                TernaryVal::False => (),
                TernaryVal::DontCare => return Ok(None),
            }
        }
        Ok(Some(val))
    }

    /// Counts the true input literals in an assignment. Returns `None` if an
    /// input is unassigned.
    #[must_use]
    pub fn count_true(&self, assignment: &Assignment) -> Option<usize> {
        let mut cnt = 0;
        for lit in &self.in_lits {
            match assignment.lit_value(*lit) {
                TernaryVal::True => cnt += 1,
                TernaryVal::False => (),
                TernaryVal::DontCare => return None,
            }
        }
        Some(cnt)
    }

    fn allocate(&mut self, bits: usize, var_manager: &mut dyn ManageVars) {
        let n = self.in_lits.len();
        let mut counters = CounterTable::with_width(bits + 1, n);
        for &lit in &self.in_lits {
            counters.push_row(
                std::iter::once(lit).chain((0..bits).map(|_| var_manager.new_var().pos_lit())),
            );
        }
        let mut sums = CounterTable::with_width(bits, n + 1);
        for _ in 0..=n {
            sums.push_row((0..bits).map(|_| var_manager.new_var().pos_lit()));
        }
        self.counters = counters;
        self.sums = sums;
    }

    fn encode_adder_bit<Col: CollectClauses>(&self, pos: usize, bit: usize, collector: &mut Col) {
        let counter = self.counters[(pos - 1, bit)];
        let sum = self.sums[(pos - 1, bit)];
        let next_sum = self.sums[(pos, bit)];
        let carry = self.counters[(pos - 1, bit + 1)];
        if self.annotate {
            collector.add_comment(format!(
                "XOR clauses for {} XOR {} = {}",
                counter.to_ipasir(),
                sum.to_ipasir(),
                next_sum.to_ipasir()
            ));
        }
        collector.extend(gates::xor_equiv(counter, sum, next_sum));
        if self.annotate {
            collector.add_comment(format!(
                "AND clauses for {} AND {} = {}",
                counter.to_ipasir(),
                sum.to_ipasir(),
                carry.to_ipasir()
            ));
        }
        collector.extend(gates::and_equiv(counter, sum, carry));
    }
}

impl Encode for BinaryCounter {
    fn n_lits(&self) -> usize {
        self.in_lits.len()
    }
}

impl BoundEq for BinaryCounter {
    fn encode_eq<Col>(
        &mut self,
        bound: usize,
        collector: &mut Col,
        var_manager: &mut dyn ManageVars,
    ) -> Result<(), Error>
    where
        Col: CollectClauses,
    {
        if self.bound.is_some() {
            return Err(Error::AlreadyEncoded);
        }
        let n = self.in_lits.len();
        if bound > n {
            return Err(Error::InvalidCardinality { bound, n_lits: n });
        }
        if n == 0 {
            debug!("empty input with bound 0, nothing to encode");
            self.bound = Some(bound);
            return Ok(());
        }

        let bits = utils::digits(bound, 2) as usize;
        // counters hold `bits` carries per input, sums `bits` per position
        let needed = (2 * n as u64 + 1) * bits as u64;
        let seed = self
            .in_lits
            .iter()
            .map(|lit| u64::from(lit.var().idx32()) + 1)
            .fold(u64::from(var_manager.n_used()), u64::max);
        let available = (u64::from(Var::MAX_IDX) + 1).saturating_sub(seed);
        if needed > available {
            return Err(Error::VarsExhausted { needed, available });
        }

        for lit in &self.in_lits {
            var_manager.mark_used(lit.var());
        }
        let n_vars_before = var_manager.n_used();
        let n_clauses_before = collector.n_clauses();

        debug!("encoding exactly {bound} of {n} literals with {bits}-bit registers");
        self.allocate(bits, var_manager);

        // running sum starts at zero
        for bit in 0..bits {
            collector.add_clause(clause![!self.sums[(0, bit)]]);
        }

        for pos in 1..=n {
            trace!("adder stage {pos} for input {}", self.in_lits[pos - 1]);
            for bit in 0..bits {
                self.encode_adder_bit(pos, bit, collector);
            }
        }

        // final sum equals the bound
        for bit in 0..bits {
            let lit = self.sums[(n, bit)];
            if (bound >> bit) & 1 == 1 {
                collector.add_clause(clause![lit]);
            } else {
                collector.add_clause(clause![!lit]);
            }
        }

        // no stage may overflow the register
        for pos in 0..n {
            collector.add_clause(clause![!self.counters[(pos, bits)]]);
        }

        self.bound = Some(bound);
        self.n_vars += var_manager.n_used() - n_vars_before;
        self.n_clauses += collector.n_clauses() - n_clauses_before;
        debug!(
            "binary counter uses {} variables and {} clauses",
            self.n_vars, self.n_clauses
        );
        Ok(())
    }
}

impl EncodeStats for BinaryCounter {
    fn n_clauses(&self) -> usize {
        self.n_clauses
    }

    fn n_vars(&self) -> u32 {
        self.n_vars
    }
}

impl From<Vec<Lit>> for BinaryCounter {
    fn from(lits: Vec<Lit>) -> Self {
        BinaryCounter {
            in_lits: lits,
            ..Default::default()
        }
    }
}

impl From<&[Lit]> for BinaryCounter {
    fn from(lits: &[Lit]) -> Self {
        BinaryCounter::from(lits.to_vec())
    }
}

impl FromIterator<Lit> for BinaryCounter {
    fn from_iter<T: IntoIterator<Item = Lit>>(iter: T) -> Self {
        Self::from(Vec::from_iter(iter))
    }
}
