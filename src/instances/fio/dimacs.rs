//! # Parsing and Writing DIMACS CNF Files
//!
//! The approach is to accept input instances, even if they do not strictly
//! follow the format description, as long as the input is still reasonable.
//!
//! ## References
//!
//! - [DIMACS CNF](http://www.satcompetition.org/2011/format-benchmarks2011.html)

use crate::{
    instances::{Cnf, CnfLine},
    types::{Clause, Lit, Var},
};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{i32, line_ending, multispace0, multispace1, u64},
    combinator::{all_consuming, map_res, recognize, success},
    error::{Error as NomError, ErrorKind, ParseError},
    multi::separated_list0,
    sequence::{pair, terminated, tuple},
    IResult,
};
use std::{
    fmt,
    io::{self, BufRead, BufReader, Read, Write},
};
use thiserror::Error;

/// A parsed DIMACS CNF file together with the counts its header declares
#[derive(Debug, PartialEq, Eq)]
pub struct DimacsCnf {
    /// The number of variables declared in the p-line
    pub n_vars: usize,
    /// The number of clauses declared in the p-line
    pub n_clauses: usize,
    /// The clauses and comments of the body
    pub cnf: Cnf,
}

impl DimacsCnf {
    /// Checks that the header counts match the body: the clause count must be
    /// exact and no clause may mention a variable above the declared count
    ///
    /// # Errors
    ///
    /// [`Error::HeaderMismatch`] if the body disagrees with the header.
    pub fn check_header(&self) -> Result<(), Error> {
        let max_var = self.cnf.max_var().map_or(0, |v| v.idx() + 1);
        if self.cnf.len() != self.n_clauses || max_var > self.n_vars {
            return Err(Error::HeaderMismatch {
                declared: (self.n_vars, self.n_clauses),
                found: (max_var, self.cnf.len()),
            });
        }
        Ok(())
    }
}

/// Parses a CNF instance from a reader
///
/// Comment lines before the p-line are skipped, comment lines in the body are
/// kept as [`CnfLine::Comment`]. A line may hold several clauses, as in
/// `1 -2 0 3 0`.
///
/// # Errors
///
/// If reading fails or the input is not a DIMACS CNF.
pub fn parse_cnf<R: Read>(reader: R) -> Result<DimacsCnf, Error> {
    let mut reader = BufReader::new(reader);
    let (n_vars, n_clauses) = parse_preamble(&mut reader)?;
    let mut cnf = Cnf::new();
    let mut buf = String::new();
    loop {
        buf.clear();
        let len = reader.read_line(&mut buf).map_err(Error::IOError)?;
        if len == 0 {
            return Ok(DimacsCnf {
                n_vars,
                n_clauses,
                cnf,
            });
        }
        // a line may hold several `0`-terminated clauses
        let mut rest = buf.as_str();
        loop {
            let (remain, line) = parse_cnf_line(rest).map_err(unwrap_dimacs_error)?;
            match line {
                Some(CnfLine::Comment(c)) => cnf.add_comment(c),
                Some(CnfLine::Clause(cl)) => cnf.add_clause(cl),
                None => break,
            }
            if remain.len() == rest.len() {
                break;
            }
            rest = remain;
        }
    }
}

/// Errors occuring within the DIMACS parsing module
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid literal in the file
    #[error("invalid literal: {0}")]
    Lit(String),
    /// Invalid ending of a clause
    #[error("invalid clause ending: {0}")]
    ClauseEnding(String),
    /// The input ended before a p-line
    #[error("preamble never ends")]
    PreambleNoEnd,
    /// P line value is too large to fit in a [`usize`]
    #[error("value in p-line too large to fit usize: {0}")]
    PValTooLarge(u64),
    /// Invalid p line
    #[error("invalid p-line: {0}")]
    PLine(String),
    /// The header counts do not match the body
    #[error("header declares {declared:?} (variables, clauses) but body has {found:?}")]
    HeaderMismatch {
        /// Declared variables and clauses
        declared: (usize, usize),
        /// Highest variable and number of clauses in the body
        found: (usize, usize),
    },
    /// IO error reading file
    #[error("IO error: {0}")]
    IOError(io::Error),
    /// Base error from nom parsing
    #[error("nom error: {0} ({1:?})")]
    NomError(String, ErrorKind),
    /// Incomplete nom error
    #[error("nom parser requested more data")]
    NomIncomplete,
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Lit(l0), Self::Lit(r0))
            | (Self::ClauseEnding(l0), Self::ClauseEnding(r0))
            | (Self::PLine(l0), Self::PLine(r0)) => l0 == r0,
            (Self::PValTooLarge(l0), Self::PValTooLarge(r0)) => l0 == r0,
            (
                Self::HeaderMismatch {
                    declared: ld,
                    found: lf,
                },
                Self::HeaderMismatch {
                    declared: rd,
                    found: rf,
                },
            ) => ld == rd && lf == rf,
            (Self::IOError(_), Self::IOError(_)) => true,
            (Self::NomError(l0, l1), Self::NomError(r0, r1)) => l0 == r0 && l1 == r1,
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

impl ParseError<&str> for Error {
    fn from_error_kind(input: &str, kind: ErrorKind) -> Self {
        Self::NomError(String::from(input), kind)
    }

    fn append(_: &str, _: ErrorKind, other: Self) -> Self {
        // Other error always has precedence. This should prefer more meaningful
        // errors than [`Error::NomError`]
        other
    }
}

fn unwrap_dimacs_error(err: nom::Err<Error>) -> Error {
    match err {
        nom::Err::Incomplete(_) => Error::NomIncomplete,
        nom::Err::Error(e) | nom::Err::Failure(e) => e,
    }
}

/// Skips leading comments and parses the p-line
fn parse_preamble<R: BufRead>(reader: &mut R) -> Result<(usize, usize), Error> {
    let mut buf = String::new();
    loop {
        buf.clear();
        let len = reader.read_line(&mut buf).map_err(Error::IOError)?;
        if len == 0 {
            return Err(Error::PreambleNoEnd);
        }
        if buf.starts_with('c') || buf.trim().is_empty() {
            continue;
        }
        let (_, counts) = parse_p_line(&buf).map_err(unwrap_dimacs_error)?;
        return Ok(counts);
    }
}

/// Parses a `p cnf <vars> <clauses>` line
fn parse_p_line(input: &str) -> IResult<&str, (usize, usize), Error> {
    let full_p_line = String::from(input.trim_end());
    let (input, _) = tuple::<_, _, NomError<_>, _>((
        tag("p"),
        multispace1,
        tag("cnf"),
        multispace1,
    ))(input)
    .map_err(|e| e.map(|_| Error::PLine(full_p_line.clone())))?;
    let (input, (n_vars, _, n_clauses)) =
        tuple::<_, _, NomError<_>, _>((u64, multispace1, u64))(input)
            .map_err(|e| e.map(|_| Error::PLine(full_p_line)))?;
    let n_vars =
        usize::try_from(n_vars).map_err(|_| nom::Err::Error(Error::PValTooLarge(n_vars)))?;
    let n_clauses =
        usize::try_from(n_clauses).map_err(|_| nom::Err::Error(Error::PValTooLarge(n_clauses)))?;
    Ok((input, (n_vars, n_clauses)))
}

/// Parses a CNF line, either a comment or a clause
fn parse_cnf_line(input: &str) -> IResult<&str, Option<CnfLine>, Error> {
    let (input, _) = multispace0::<&str, Error>(input)?;
    if input.trim().is_empty() {
        // Tolerate empty lines
        return Ok((input, None));
    }
    match tag::<&str, &str, NomError<&str>>("c")(input) {
        Ok((comment, _)) => Ok(("", Some(CnfLine::Comment(String::from(comment.trim()))))),
        Err(_) => {
            // Line is not a comment
            let (input, clause) =
                terminated(separated_list0(multispace1, parse_lit), parse_clause_ending)(input)?;
            Ok((input, Some(CnfLine::Clause(Clause::from_iter(clause)))))
        }
    }
}

/// Nuclear parser for literal
fn parse_lit(input: &str) -> IResult<&str, Lit, Error> {
    map_res(i32, Lit::from_ipasir)(input)
        .map_err(|e| e.map(|e: NomError<&str>| Error::Lit(String::from(e.input))))
}

/// Parses the end of a clause
/// A '0' followed by a linebreak, as well as a '0' followed by
/// whitespace or only a linebreak are treated as valid clause endings.
/// This is more lenient than the file format description.
fn parse_clause_ending(input: &str) -> IResult<&str, &str, Error> {
    recognize(pair(
        multispace0,
        alt((
            recognize(all_consuming(success(""))),
            recognize(all_consuming(tag("0"))),
            recognize(terminated(tag("0"), line_ending)),
            recognize(terminated(tag("0"), multispace1)),
            recognize(line_ending),
        )),
    ))(input)
    .map_err(|e| e.map(|e: NomError<&str>| Error::ClauseEnding(String::from(e.input))))
}

/// Displays a [`Cnf`] as a DIMACS CNF document: the p-line declaring
/// `max_var` variables, followed by every line of the CNF in insertion order
#[derive(Clone, Copy, Debug)]
pub struct DisplayCnf<'a> {
    cnf: &'a Cnf,
    max_var: Option<Var>,
}

impl<'a> DisplayCnf<'a> {
    /// Creates the display adaptor. `max_var` must be at least
    /// [`Cnf::max_var`].
    #[must_use]
    pub fn new(cnf: &'a Cnf, max_var: Option<Var>) -> Self {
        DisplayCnf { cnf, max_var }
    }
}

impl fmt::Display for DisplayCnf<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "p cnf {} {}",
            self.max_var.map_or(0, Var::to_ipasir),
            self.cnf.len()
        )?;
        self.cnf.lines().iter().try_for_each(|line| match line {
            CnfLine::Comment(c) => writeln!(f, "c {c}"),
            CnfLine::Clause(cl) => {
                cl.iter()
                    .try_for_each(|l| write!(f, "{} ", l.to_ipasir()))?;
                writeln!(f, "0")
            }
        })
    }
}

/// Writes a CNF to a DIMACS CNF file, see [`DisplayCnf`]
///
/// # Errors
///
/// If writing fails.
pub fn write_cnf_annotated<W: Write>(
    writer: &mut W,
    cnf: &Cnf,
    max_var: Option<Var>,
) -> Result<(), io::Error> {
    write!(writer, "{}", DisplayCnf::new(cnf, max_var))?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::{
        parse_clause_ending, parse_cnf, parse_cnf_line, parse_lit, parse_p_line,
        write_cnf_annotated, Error,
    };
    use crate::{
        clause,
        instances::{Cnf, CnfLine},
        ipasir_lit, var,
    };
    use nom::error::ErrorKind;
    use std::io::Cursor;

    #[test]
    fn parse_lit_pass() {
        assert_eq!(parse_lit("3"), Ok(("", ipasir_lit![3])));
        assert_eq!(parse_lit("-42 0"), Ok((" 0", ipasir_lit![-42])));
    }

    #[test]
    fn parse_lit_fail() {
        assert_eq!(
            parse_lit("abc "),
            Err(nom::Err::Error(Error::Lit(String::from("abc "))))
        );
        assert!(parse_lit("0").is_err());
    }

    #[test]
    fn parse_p_line_pass() {
        assert_eq!(parse_p_line("p cnf 23 42\n"), Ok(("\n", (23, 42))));
        assert_eq!(parse_p_line("p  cnf\t2 0"), Ok(("", (2, 0))));
    }

    #[test]
    fn parse_p_line_fail() {
        assert_eq!(
            parse_p_line("p wcnf 23 42"),
            Err(nom::Err::Error(Error::PLine(String::from("p wcnf 23 42"))))
        );
        assert_eq!(
            parse_p_line("p cnf ab 3"),
            Err(nom::Err::Error(Error::PLine(String::from("p cnf ab 3"))))
        );
    }

    #[test]
    fn parse_clause_ending_pass() {
        assert_eq!(parse_clause_ending(" 0\n"), Ok(("", " 0\n")));
        assert_eq!(parse_clause_ending(""), Ok(("", "")));
        assert_eq!(parse_clause_ending("0"), Ok(("", "0")));
    }

    #[test]
    fn parse_clause_ending_fail() {
        assert_eq!(
            parse_clause_ending("test"),
            Err(nom::Err::Error(Error::ClauseEnding(String::from("test"))))
        );
    }

    #[test]
    fn parse_cnf_line_pass() {
        assert_eq!(
            parse_cnf_line("c XOR clauses\n"),
            Ok(("", Some(CnfLine::Comment(String::from("XOR clauses")))))
        );
        assert_eq!(
            parse_cnf_line("42 34 -16 0\n"),
            Ok((
                "",
                Some(CnfLine::Clause(clause![
                    ipasir_lit![42],
                    ipasir_lit![34],
                    ipasir_lit![-16]
                ]))
            ))
        );
        assert_eq!(parse_cnf_line("   \n"), Ok(("", None)));
    }

    #[test]
    fn parse_cnf_line_fail() {
        assert_eq!(
            parse_cnf_line("42 34 a -16 0"),
            Err(nom::Err::Error(Error::ClauseEnding(String::from("a -16 0"))))
        );
    }

    #[test]
    fn cnf_no_header() {
        let data = "c only a comment\n";
        assert_eq!(parse_cnf(Cursor::new(data)), Err(Error::PreambleNoEnd));
    }

    #[test]
    fn nom_error_kind_kept() {
        let err = Error::NomError(String::from("x"), ErrorKind::Tag);
        assert_eq!(err, Error::NomError(String::from("x"), ErrorKind::Tag));
    }

    #[test]
    fn write_parse_cnf() {
        let mut cnf = Cnf::new();
        cnf.add_comment(String::from("first"));
        cnf.add_clause(clause![ipasir_lit![1], ipasir_lit![-3]]);
        cnf.add_clause(clause![ipasir_lit![-2]]);

        let mut buf = Vec::new();
        write_cnf_annotated(&mut buf, &cnf, Some(var![2])).unwrap();
        assert_eq!(
            String::from_utf8(buf.clone()).unwrap(),
            "p cnf 3 2\nc first\n1 -3 0\n-2 0\n"
        );

        let parsed = parse_cnf(Cursor::new(buf)).unwrap();
        assert_eq!(parsed.n_vars, 3);
        assert_eq!(parsed.n_clauses, 2);
        assert_eq!(parsed.cnf, cnf);
        assert_eq!(parsed.check_header(), Ok(()));
    }

    #[test]
    fn several_clauses_per_line() {
        let data = "p cnf 3 3\n1 0 2 0\n-1 -3 0 c trailing\n";
        let parsed = parse_cnf(Cursor::new(data)).unwrap();
        parsed.check_header().unwrap();
        let mut ground_truth = Cnf::new();
        ground_truth.add_clause(clause![ipasir_lit![1]]);
        ground_truth.add_clause(clause![ipasir_lit![2]]);
        ground_truth.add_clause(clause![ipasir_lit![-1], ipasir_lit![-3]]);
        ground_truth.add_comment(String::from("trailing"));
        assert_eq!(parsed.cnf, ground_truth);
    }

    #[test]
    fn header_mismatch() {
        let data = "p cnf 2 1\n1 2 0\n-3 0\n";
        let parsed = parse_cnf(Cursor::new(data)).unwrap();
        assert_eq!(
            parsed.check_header(),
            Err(Error::HeaderMismatch {
                declared: (2, 1),
                found: (3, 2)
            })
        );
    }
}
