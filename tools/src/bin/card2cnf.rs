//! # `card2cnf`
//!
//! Writes a DIMACS CNF instance that is satisfied exactly by the assignments
//! setting `K` of `N` input literals to true. With `--solution`, checks a SAT
//! solver's model for such an instance instead and decodes the count.

use std::{
    fmt,
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::Context;
use cardcnf::{
    encodings::{
        card::{BinaryCounter, BoundEq, Encode},
        EncodeStats,
    },
    instances::{
        fio::{self, SolverOutput},
        BasicVarManager, Cnf, ManageVars,
    },
    types::Lit,
};
use clap::Parser;
use log::{info, LevelFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The number of input literals
    n: usize,
    /// The number of input literals that must be true
    k: usize,
    /// The input literals as comma separated DIMACS integers (negative values
    /// are negated literals, e.g. `--lits=-1,2`). Defaults to the variables
    /// `1..=N`.
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    lits: Option<Vec<i32>>,
    /// The output path. Writes to `stdout` if not given.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Do not write a comment before the clauses of each gate
    #[arg(long)]
    no_comments: bool,
    /// Instead of writing the instance, check a SAT solver output for it.
    /// `-` reads from `stdin`.
    #[arg(long)]
    solution: Option<PathBuf>,
    /// Increase the log verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// The outcome of checking a solver output against the instance
#[derive(Debug, PartialEq, Eq)]
enum Verdict {
    Sat {
        /// Number of true input literals in the model
        count: usize,
        /// Value of the final sum register, if assigned
        sum: Option<usize>,
    },
    Unsat,
    Unknown,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Sat { count, sum } => {
                writeln!(f, "true inputs: {count}")?;
                match sum {
                    Some(sum) => write!(f, "final sum: {sum}"),
                    None => write!(f, "final sum: unassigned"),
                }
            }
            Verdict::Unsat => write!(f, "UNSATISFIABLE"),
            Verdict::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

fn input_lits(n: usize, lits: Option<&[i32]>) -> anyhow::Result<Vec<Lit>> {
    let Some(lits) = lits else {
        let n = u32::try_from(n).context("too many input literals")?;
        return Ok((0..n).map(Lit::positive).collect());
    };
    anyhow::ensure!(
        lits.len() == n,
        "expected {n} input literals but got {}",
        lits.len()
    );
    lits.iter()
        .map(|&lit| Lit::from_ipasir(lit).with_context(|| format!("invalid input literal {lit}")))
        .collect()
}

fn encode(args: &Args) -> anyhow::Result<(BinaryCounter, Cnf, BasicVarManager)> {
    let lits = input_lits(args.n, args.lits.as_deref())?;
    let mut enc = BinaryCounter::from(lits).with_annotations(!args.no_comments);
    let mut cnf = Cnf::new();
    let mut var_manager = BasicVarManager::default();
    enc.encode_eq(args.k, &mut cnf, &mut var_manager)?;
    info!(
        "encoded exactly {} of {} with {} variables and {} clauses",
        args.k,
        args.n,
        enc.n_vars(),
        enc.n_clauses()
    );
    Ok((enc, cnf, var_manager))
}

fn check_solution<R: BufRead>(
    reader: R,
    enc: &BinaryCounter,
    cnf: &Cnf,
) -> anyhow::Result<Verdict> {
    let model = match fio::parse_sat_solver_output(reader)? {
        SolverOutput::Sat(model) => model,
        SolverOutput::Unsat => return Ok(Verdict::Unsat),
        SolverOutput::Unknown => return Ok(Verdict::Unknown),
    };
    anyhow::ensure!(cnf.is_sat(&model), "the model does not satisfy the instance");
    let count = enc
        .count_true(&model)
        .context("the model does not assign every input literal")?;
    let sum = enc.decode_sum(enc.n_lits(), &model)?;
    Ok(Verdict::Sat { count, sum })
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let (enc, cnf, var_manager) = encode(&args)?;

    if let Some(path) = &args.solution {
        let verdict = if path.as_os_str() == "-" {
            check_solution(io::stdin().lock(), &enc, &cnf)?
        } else {
            let reader = fio::open_read(path)
                .with_context(|| format!("could not open {}", path.display()))?;
            check_solution(reader, &enc, &cnf)?
        };
        println!("{verdict}");
        return Ok(());
    }

    let mut writer: Box<dyn Write> = match &args.out {
        Some(path) => Box::new(
            fio::open_write(path).with_context(|| format!("could not create {}", path.display()))?,
        ),
        None => Box::new(io::BufWriter::new(io::stdout().lock())),
    };
    cnf.write_dimacs(&mut writer, var_manager.max_var())?;
    writer.flush()?;
    Ok(())
}
