//! # Instance Representations
//!
//! Variable management and the CNF clause collection that encodings emit
//! into.

use crate::types::Var;

mod sat;
pub use sat::{Cnf, CnfLine};

pub mod fio;

/// Trait for variable managers keeping track of used variables
pub trait ManageVars {
    /// Uses up the next free variable
    ///
    /// # Panics
    ///
    /// If no variable up to [`Var::MAX_IDX`] is left.
    fn new_var(&mut self) -> Var;
    /// Gets the used variable with the highest index
    fn max_var(&self) -> Option<Var>;
    /// Increases the next free variable index if the provided variable has a
    /// higher index than the next variable in the manager.
    /// Returns true if the next free index has been increased and false otherwise.
    fn increase_next_free(&mut self, v: Var) -> bool;
    /// Marks variables up to the given one as used. Returns true if the next
    /// free index has been increased and false otherwise.
    fn mark_used(&mut self, v: Var) -> bool {
        self.increase_next_free(v + 1)
    }
    /// Gets the number of used variables. Typically this is just the index of
    /// the next free variable.
    fn n_used(&self) -> u32;
}

/// Simple counting variable manager
///
/// Every variable it hands out is strictly greater than all variables handed
/// out before and than the seed it was created from.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct BasicVarManager {
    next_var: Var,
}

impl BasicVarManager {
    /// Creates a new variable manager from a next free variable
    #[must_use]
    pub fn from_next_free(next_var: Var) -> BasicVarManager {
        BasicVarManager { next_var }
    }

    /// Creates a variable manager for which the first `n_used` variables
    /// (DIMACS `1..=n_used`) are already taken
    #[must_use]
    pub fn with_n_used(n_used: u32) -> BasicVarManager {
        BasicVarManager::from_next_free(Var::new(n_used))
    }
}

impl ManageVars for BasicVarManager {
    fn new_var(&mut self) -> Var {
        assert!(
            self.next_var.idx32() <= Var::MAX_IDX,
            "no free variable left below the DIMACS limit"
        );
        let v = self.next_var;
        self.next_var += 1;
        v
    }

    fn max_var(&self) -> Option<Var> {
        if self.next_var == Var::new(0) {
            None
        } else {
            Some(self.next_var - 1)
        }
    }

    fn increase_next_free(&mut self, v: Var) -> bool {
        if v > self.next_var {
            self.next_var = v;
            return true;
        };
        false
    }

    fn n_used(&self) -> u32 {
        self.next_var.idx32()
    }
}

#[cfg(test)]
mod tests {
    use super::{BasicVarManager, ManageVars};
    use crate::{types::Var, var};

    #[test]
    fn fresh_vars_increase() {
        let mut vm = BasicVarManager::with_n_used(3);
        assert_eq!(vm.max_var(), Some(var![2]));
        assert_eq!(vm.new_var(), var![3]);
        assert_eq!(vm.new_var(), var![4]);
        assert_eq!(vm.n_used(), 5);
    }

    #[test]
    fn empty_manager() {
        let mut vm = BasicVarManager::default();
        assert_eq!(vm.max_var(), None);
        assert_eq!(vm.new_var(), var![0]);
        assert_eq!(vm.max_var(), Some(var![0]));
    }

    #[test]
    fn last_var() {
        let mut vm = BasicVarManager::from_next_free(Var::new(Var::MAX_IDX));
        assert_eq!(vm.new_var(), Var::new(Var::MAX_IDX));
        assert_eq!(vm.max_var(), Some(Var::new(Var::MAX_IDX)));
        assert_eq!(vm.n_used(), Var::MAX_IDX + 1);
    }

    #[test]
    #[should_panic(expected = "no free variable left")]
    fn exhausted() {
        let mut vm = BasicVarManager::from_next_free(Var::new(Var::MAX_IDX));
        vm.new_var();
        vm.new_var();
    }

    #[test]
    fn mark_used() {
        let mut vm = BasicVarManager::with_n_used(2);
        assert!(vm.mark_used(var![6]));
        assert!(!vm.mark_used(var![3]));
        assert_eq!(vm.new_var(), var![7]);
    }
}
