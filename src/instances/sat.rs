//! # CNF Clause Collection

use std::io;

use crate::{
    encodings::CollectClauses,
    types::{Assignment, Clause, Lit, TernaryVal, Var},
};

use super::fio;

/// A single line of a CNF: either a clause or a comment annotating the
/// clauses that follow it
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum CnfLine {
    /// A comment line, written with a leading `c`
    Comment(String),
    /// A clause
    Clause(Clause),
}

impl CnfLine {
    /// Gets the clause of the line, if it is one
    #[must_use]
    pub fn clause(&self) -> Option<&Clause> {
        match self {
            CnfLine::Comment(_) => None,
            CnfLine::Clause(cl) => Some(cl),
        }
    }

    /// Converts the line into its clause, dropping comments
    #[must_use]
    pub fn into_clause(self) -> Option<Clause> {
        match self {
            CnfLine::Comment(_) => None,
            CnfLine::Clause(cl) => Some(cl),
        }
    }
}

/// Simple type representing a CNF formula. Clauses and comments are kept in
/// the order they were added, and comments do not count as clauses.
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct Cnf {
    lines: Vec<CnfLine>,
    n_clauses: usize,
}

impl Cnf {
    /// Creates a new [`Cnf`]
    #[must_use]
    pub fn new() -> Cnf {
        Cnf::default()
    }

    /// Adds a clause to the CNF
    #[inline]
    pub fn add_clause(&mut self, clause: Clause) {
        self.n_clauses += 1;
        self.lines.push(CnfLine::Clause(clause));
    }

    /// Adds a comment line. The text is written after `c `.
    pub fn add_comment(&mut self, comment: String) {
        self.lines.push(CnfLine::Comment(comment));
    }

    /// Checks if the CNF contains no clauses
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n_clauses == 0
    }

    /// Returns the number of clauses in the CNF
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.n_clauses
    }

    /// Returns an iterator over references to the clauses
    pub fn iter(&self) -> impl Iterator<Item = &Clause> {
        self.lines.iter().filter_map(CnfLine::clause)
    }

    /// Returns all lines, comments included, in insertion order
    #[must_use]
    pub fn lines(&self) -> &[CnfLine] {
        &self.lines
    }

    /// Gets the highest variable occurring in any clause
    #[must_use]
    pub fn max_var(&self) -> Option<Var> {
        self.iter()
            .flat_map(|cl| cl.iter().map(Lit::var))
            .max()
    }

    /// Evaluates the CNF under a (partial) assignment
    #[must_use]
    pub fn evaluate(&self, assignment: &Assignment) -> TernaryVal {
        let mut val = TernaryVal::True;
        for cl in self.iter() {
            match cl.evaluate(assignment) {
                TernaryVal::False => return TernaryVal::False,
                TernaryVal::DontCare => val = TernaryVal::DontCare,
                TernaryVal::True => (),
            }
        }
        val
    }

    /// Checks whether every clause is satisfied by the assignment
    #[must_use]
    pub fn is_sat(&self, assignment: &Assignment) -> bool {
        self.evaluate(assignment) == TernaryVal::True
    }

    /// Writes the CNF in DIMACS format. `max_var` is the highest variable to
    /// declare in the header; it must be at least [`Cnf::max_var`].
    ///
    /// # Errors
    ///
    /// If writing fails.
    pub fn write_dimacs<W: io::Write>(&self, writer: &mut W, max_var: Option<Var>) -> io::Result<()> {
        fio::dimacs::write_cnf_annotated(writer, self, max_var)
    }

    /// Renders the CNF to a DIMACS string, see [`Cnf::write_dimacs`]
    #[must_use]
    pub fn to_dimacs_string(&self, max_var: Option<Var>) -> String {
        fio::dimacs::DisplayCnf::new(self, max_var).to_string()
    }
}

impl CollectClauses for Cnf {
    fn n_clauses(&self) -> usize {
        self.n_clauses
    }

    fn add_comment(&mut self, comment: String) {
        Cnf::add_comment(self, comment);
    }
}

impl IntoIterator for Cnf {
    type Item = Clause;

    type IntoIter = std::iter::FilterMap<std::vec::IntoIter<CnfLine>, fn(CnfLine) -> Option<Clause>>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines
            .into_iter()
            .filter_map(CnfLine::into_clause as fn(CnfLine) -> Option<Clause>)
    }
}

impl FromIterator<Clause> for Cnf {
    fn from_iter<T: IntoIterator<Item = Clause>>(iter: T) -> Self {
        let mut cnf = Cnf::new();
        cnf.extend(iter);
        cnf
    }
}

impl FromIterator<CnfLine> for Cnf {
    fn from_iter<T: IntoIterator<Item = CnfLine>>(iter: T) -> Self {
        let mut cnf = Cnf::new();
        for line in iter {
            match line {
                CnfLine::Comment(c) => cnf.add_comment(c),
                CnfLine::Clause(cl) => cnf.add_clause(cl),
            }
        }
        cnf
    }
}

impl Extend<Clause> for Cnf {
    fn extend<Iter: IntoIterator<Item = Clause>>(&mut self, iter: Iter) {
        iter.into_iter().for_each(|cl| self.add_clause(cl));
    }
}
