use cardcnf::{
    encodings::{
        card::{self, BinaryCounter, BoundEq},
        EncodeStats, Error,
    },
    instances::{fio::dimacs, BasicVarManager, Cnf, ManageVars},
    lit,
    types::{Assignment, Lit, TernaryVal},
};
use itertools::Itertools;

/// Unit propagation to fixpoint. Returns `None` on a conflict.
fn propagate(cnf: &Cnf, mut assignment: Assignment) -> Option<Assignment> {
    loop {
        let mut changed = false;
        for cl in cnf.iter() {
            match cl.evaluate(&assignment) {
                TernaryVal::True => (),
                TernaryVal::False => return None,
                TernaryVal::DontCare => {
                    let mut open = cl
                        .iter()
                        .filter(|l| assignment.lit_value(**l) == TernaryVal::DontCare);
                    let first = *open.next().unwrap();
                    if open.next().is_none() {
                        assignment.assign_lit(first);
                        changed = true;
                    }
                }
            }
        }
        if !changed {
            return Some(assignment);
        }
    }
}

/// Decides the encoding under a full assignment of the inputs. The adder
/// network is functional, so propagation assigns every auxiliary variable.
fn solve_under(cnf: &Cnf, inputs: &[Lit], values: &[bool]) -> Option<Assignment> {
    let assignment: Assignment = inputs
        .iter()
        .zip(values)
        .map(|(&l, &val)| if val { l } else { !l })
        .collect();
    let model = propagate(cnf, assignment)?;
    assert!(
        cnf.is_sat(&model),
        "propagation left the encoding undecided for {values:?}"
    );
    Some(model)
}

fn encode(lits: &[Lit], k: usize) -> (BinaryCounter, Cnf, BasicVarManager) {
    let mut enc = BinaryCounter::from(lits);
    let mut cnf = Cnf::new();
    let mut var_manager = BasicVarManager::default();
    enc.encode_eq(k, &mut cnf, &mut var_manager).unwrap();
    (enc, cnf, var_manager)
}

/// Checks that exactly the input assignments with `k` true literals are
/// satisfying and that every running sum holds its prefix count. Returns
/// the satisfying input assignments.
macro_rules! test_card {
    ( $lits:expr, $k:expr ) => {{
        let lits: Vec<Lit> = $lits;
        let k: usize = $k;
        let (enc, cnf, _) = encode(&lits, k);
        let mut sat = vec![];
        for values in (0..lits.len()).map(|_| [false, true]).multi_cartesian_product() {
            let count = values.iter().filter(|v| **v).count();
            match solve_under(&cnf, &lits, &values) {
                Some(model) => {
                    assert_eq!(count, k, "satisfied with {values:?}");
                    assert_eq!(enc.count_true(&model), Some(k));
                    for pos in 0..=lits.len() {
                        let prefix = values[..pos].iter().filter(|v| **v).count();
                        assert_eq!(enc.decode_sum(pos, &model), Ok(Some(prefix)));
                    }
                    sat.push(values);
                }
                None => assert_ne!(count, k, "not satisfied with {values:?}"),
            }
        }
        sat
    }};
}

fn first_n(n: u32) -> Vec<Lit> {
    (0..n).map(|idx| lit![idx]).collect()
}

#[test]
fn two_choose_one() {
    let sat = test_card!(first_n(2), 1);
    assert_eq!(sat, vec![vec![false, true], vec![true, false]]);
}

#[test]
fn none_of_three() {
    let sat = test_card!(first_n(3), 0);
    assert_eq!(sat, vec![vec![false, false, false]]);
}

#[test]
fn all_of_three() {
    let sat = test_card!(first_n(3), 3);
    assert_eq!(sat, vec![vec![true, true, true]]);
}

#[test]
fn half_of_four() {
    let sat = test_card!(first_n(4), 2);
    assert_eq!(sat.len(), 6);
}

#[test]
fn all_bounds_up_to_six() {
    for n in 1..=6 {
        for k in 0..=n {
            let sat = test_card!(first_n(n), k as usize);
            let expected = (0..n as usize).combinations(k as usize).count();
            assert_eq!(sat.len(), expected, "n={n} k={k}");
        }
    }
}

#[test]
fn more_inputs_than_register_capacity() {
    // a 1-bit register holds at most 1, a 2-bit one at most 3
    test_card!(first_n(7), 1);
    test_card!(first_n(8), 2);
    test_card!(first_n(9), 3);
}

#[test]
fn negated_and_sparse_inputs() {
    let sat = test_card!(vec![lit![5], !lit![2], lit![9]], 1);
    assert_eq!(sat.len(), 3);
    let sat = test_card!(vec![!lit![0], !lit![1], !lit![2], lit![3]], 2);
    assert_eq!(sat.len(), 6);
}

#[test]
fn bound_larger_than_inputs() {
    for n in 0..4 {
        let lits = first_n(n);
        let mut var_manager = BasicVarManager::default();
        let res = card::exactly_k(&lits, n as usize + 1, &mut var_manager);
        assert_eq!(
            res,
            Err(Error::InvalidCardinality {
                bound: n as usize + 1,
                n_lits: n as usize,
            })
        );
        assert_eq!(var_manager.n_used(), 0);
    }
}

#[test]
fn header_matches_content() {
    for (n, k) in [(1, 0), (1, 1), (2, 1), (5, 3), (8, 4), (12, 7)] {
        let lits = first_n(n);
        let (enc, cnf, var_manager) = encode(&lits, k);
        let text = cnf.to_dimacs_string(var_manager.max_var());
        let parsed = dimacs::parse_cnf(text.as_bytes()).unwrap();
        parsed.check_header().unwrap();
        assert_eq!(parsed.n_clauses, cnf.len());
        assert_eq!(parsed.n_clauses, enc.n_clauses());
        assert_eq!(parsed.n_vars, var_manager.n_used() as usize);
        assert_eq!(parsed.n_vars, n as usize + enc.n_vars() as usize);
        assert_eq!(parsed.cnf, cnf);
    }
}

#[test]
fn annotated_header_matches_content() {
    let lits = first_n(4);
    let mut enc = BinaryCounter::from(lits.as_slice()).with_annotations(true);
    let mut cnf = Cnf::new();
    let mut var_manager = BasicVarManager::default();
    enc.encode_eq(2, &mut cnf, &mut var_manager).unwrap();
    let text = cnf.to_dimacs_string(var_manager.max_var());
    assert!(text.contains("c XOR clauses for 1 XOR "));
    let parsed = dimacs::parse_cnf(text.as_bytes()).unwrap();
    parsed.check_header().unwrap();
    assert_eq!(parsed.cnf.len(), cnf.len());
    assert_eq!(parsed.cnf.lines().len(), cnf.lines().len());
}

#[test]
fn idempotent() {
    let lits = first_n(6);
    let a = card::exactly_k_dimacs(&lits, 4).unwrap();
    let b = card::exactly_k_dimacs(&lits, 4).unwrap();
    assert_eq!(a, b);

    let (_, cnf_a, _) = encode(&lits, 4);
    let (_, cnf_b, _) = encode(&lits, 4);
    assert_eq!(cnf_a, cnf_b);
}

#[test]
fn empty_input() {
    assert_eq!(card::exactly_k_dimacs(&[], 0).unwrap(), "p cnf 0 0\n");
}
