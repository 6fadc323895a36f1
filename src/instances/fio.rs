//! # Module for File IO (Writing and Parsing)
//!
//! DIMACS CNF reading and writing, and parsing of the output of a SAT solver
//! run on an encoding so that its model can be decoded.

use std::{
    fs::File,
    io::{self, BufRead},
    path::Path,
};
use thiserror::Error;

use crate::types::{Assignment, Lit, TernaryVal, Var};

pub mod dimacs;

/// Opens a buffered writer for the file at Path
///
/// # Errors
///
/// If the file cannot be created.
pub fn open_write<P: AsRef<Path>>(path: P) -> Result<io::BufWriter<File>, io::Error> {
    Ok(io::BufWriter::new(File::create(path)?))
}

/// Opens a buffered reader for the file at Path
///
/// # Errors
///
/// If the file cannot be opened.
pub fn open_read<P: AsRef<Path>>(path: P) -> Result<io::BufReader<File>, io::Error> {
    Ok(io::BufReader::new(File::open(path)?))
}

/// The result reported by a SAT solver
#[derive(Debug, PartialEq, Eq)]
pub enum SolverOutput {
    /// The instance is satisfiable, with the reported model
    Sat(Assignment),
    /// The instance is unsatisfiable
    Unsat,
    /// The solver did not decide the instance
    Unknown,
}

/// Errors in the output of a SAT solver
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SatSolverOutputError {
    #[error("no solution line found in the output")]
    NoSline,
    #[error("no value line found in the output")]
    NoVline,
    #[error("invalid solution line found in the output: {0}")]
    InvalidSLine(String),
}

/// Errors in a value line of a SAT solver output
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InvalidVLine {
    #[error("the value line does not start with 'v '")]
    InvalidTag,
    #[error("invalid literal in value line: {0}")]
    InvalidLit(String),
    #[error("the value line assigns {0} different values")]
    ConflictingAssignment(Var),
}

impl Assignment {
    /// Creates an assignment from a solver value line (`v 1 -2 3 0`)
    ///
    /// # Errors
    ///
    /// If the line is not a valid value line.
    pub fn from_vline(line: &str) -> Result<Self, InvalidVLine> {
        let mut assignment = Assignment::default();
        assignment.extend_from_vline(line)?;
        Ok(assignment)
    }

    /// Extends the assignment with the literals of a further value line
    ///
    /// # Errors
    ///
    /// If the line is not a valid value line or contradicts the assignment.
    pub fn extend_from_vline(&mut self, line: &str) -> Result<(), InvalidVLine> {
        let Some(lits) = line.strip_prefix("v ") else {
            return Err(InvalidVLine::InvalidTag);
        };
        for token in lits.split_whitespace() {
            let val: i32 = token
                .parse()
                .map_err(|_| InvalidVLine::InvalidLit(String::from(token)))?;
            if val == 0 {
                break;
            }
            let lit = Lit::from_ipasir(val)
                .map_err(|_| InvalidVLine::InvalidLit(String::from(token)))?;
            if self.lit_value(lit) == TernaryVal::False {
                return Err(InvalidVLine::ConflictingAssignment(lit.var()));
            }
            self.assign_lit(lit);
        }
        Ok(())
    }
}

/// Parses the output of a SAT solver in the SAT competition format
///
/// # Errors
///
/// If the output has no or an invalid solution line, or a satisfiable result
/// comes without a model.
pub fn parse_sat_solver_output<R: BufRead>(reader: R) -> anyhow::Result<SolverOutput> {
    let mut is_sat = false;
    let mut solution: Option<Assignment> = None;

    for line in reader.lines() {
        let line = line?;

        // Solution line
        if let Some(status) = line.strip_prefix("s ") {
            match status.trim() {
                "UNSATISFIABLE" => return Ok(SolverOutput::Unsat),
                "UNKNOWN" | "INDETERMINATE" => return Ok(SolverOutput::Unknown),
                "SATISFIABLE" => is_sat = true,
                _ => anyhow::bail!(SatSolverOutputError::InvalidSLine(line.clone())),
            }
        }

        // Value line
        if line.starts_with("v ") {
            match &mut solution {
                Some(assign) => assign.extend_from_vline(&line)?,
                None => solution = Some(Assignment::from_vline(&line)?),
            }
        }
    }

    // Without a solution line the output can not be trusted
    if !is_sat {
        anyhow::bail!(SatSolverOutputError::NoSline);
    }

    match solution {
        Some(solution) => Ok(SolverOutput::Sat(solution)),
        None => anyhow::bail!(SatSolverOutputError::NoVline),
    }
}
