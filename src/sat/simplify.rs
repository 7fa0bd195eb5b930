#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Simplification rules over an owned formula.
//!
//! These are the rules the Davis-Putnam procedure applies to fixpoint
//! between branches. They mutate the formula destructively: satisfied
//! clauses are dropped and falsified literals are deleted, so they only
//! suit the copy-per-branch engine. The trail-based engines apply the same
//! rules through their journals instead.
//!
//! Rule 1 (tautology elimination) runs once, at formula construction; the
//! remaining rules never add literals, so tautologies cannot reappear.
//!
//! Each rule strictly shrinks the pair (clause count, total literal count),
//! so the fixpoint iteration terminates.

use crate::sat::clause_storage::LiteralStorage;
use crate::sat::cnf::Cnf;
use crate::sat::literal::Literal;
use crate::sat::occurrence::OccurrenceCounts;

/// Internal signal that a clause became empty under simplification: the
/// formula is unsatisfiable on this branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict;

/// Rule 2, unit propagation, applied to fixpoint.
///
/// While a unit clause `{l}` exists (lowest clause id first, for
/// reproducibility): every clause containing `l` is satisfied and removed,
/// `¬l` is deleted wherever it occurs, and `l` is recorded in `context`.
///
/// # Errors
///
/// Returns [`Conflict`] when deleting `¬l` empties a clause.
pub fn propagate_units<L: Literal, S: LiteralStorage<L>>(
    cnf: &mut Cnf<L, S>,
    context: &mut Vec<L>,
) -> Result<bool, Conflict> {
    let mut changed = false;
    loop {
        let Some(unit) = cnf.iter().find(|c| c.is_unit()).map(|c| c[0]) else {
            return Ok(changed);
        };
        changed = true;

        cnf.retain(|c| !c.contains(unit));

        let negated = unit.negated();
        let mut conflict = false;
        for clause in cnf.iter_mut() {
            if clause.remove_literal(negated).is_some() && clause.is_empty() {
                conflict = true;
            }
        }
        if conflict {
            return Err(Conflict);
        }
        context.push(unit);
    }
}

/// Rule 3, pure-literal elimination, applied to fixpoint.
///
/// Every clause containing a pure literal is satisfied by assigning the
/// literal true, so the clauses are removed and the literal recorded in
/// `context`. Removing clauses can make further literals pure, hence the
/// outer loop. Cannot conflict: a pure literal's negation occurs nowhere.
pub fn eliminate_pures<L: Literal, S: LiteralStorage<L>>(
    cnf: &mut Cnf<L, S>,
    context: &mut Vec<L>,
) -> bool {
    let mut changed = false;
    loop {
        let counts = OccurrenceCounts::from_cnf(cnf);
        let pures: Vec<L> = counts.pure_literals(|_| true);
        if pures.is_empty() {
            return changed;
        }
        changed = true;
        for pure in pures {
            cnf.retain(|c| !c.contains(pure));
            context.push(pure);
        }
    }
}

/// Rule 4, subsumption: a clause strictly containing another clause is
/// redundant and dropped.
///
/// Quadratic in the clause count; the DP engine keeps it off by default
/// because its measured cost exceeds its benefit on benchmark inputs.
pub fn eliminate_subsumed<L: Literal, S: LiteralStorage<L>>(cnf: &mut Cnf<L, S>) -> bool {
    let n = cnf.len();
    let mut removed = vec![false; n];

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&i| cnf[i].len());

    for (pos, &small) in order.iter().enumerate() {
        if removed[small] {
            continue;
        }
        for &large in &order[pos + 1..] {
            if !removed[large] && cnf[large].is_subsumed_by(&cnf[small]) {
                removed[large] = true;
            }
        }
    }

    if removed.iter().any(|&r| r) {
        let mut idx = 0;
        cnf.retain(|_| {
            let keep = !removed[idx];
            idx += 1;
            keep
        });
        true
    } else {
        false
    }
}

/// Runs rules 2 and 3 (and rule 4 when enabled) to a joint fixpoint.
///
/// # Errors
///
/// Returns [`Conflict`] when unit propagation empties a clause.
pub fn simplify_to_fixpoint<L: Literal, S: LiteralStorage<L>>(
    cnf: &mut Cnf<L, S>,
    context: &mut Vec<L>,
    subsumption: bool,
) -> Result<bool, Conflict> {
    let mut changed = false;
    loop {
        let mut round = propagate_units(cnf, context)?;
        round |= eliminate_pures(cnf, context);
        if subsumption {
            round |= eliminate_subsumed(cnf);
        }
        if !round {
            return Ok(changed);
        }
        changed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::literal::PackedLiteral;

    type TestCnf = Cnf;

    fn dimacs(cnf: &TestCnf) -> Vec<Vec<i32>> {
        cnf.iter()
            .map(|c| {
                let mut lits: Vec<i32> = c.iter().map(|l| l.to_dimacs()).collect();
                lits.sort_by_key(|l| l.unsigned_abs());
                lits
            })
            .collect()
    }

    #[test]
    fn unit_propagation_cascades() {
        let mut cnf: TestCnf = Cnf::new(vec![vec![1], vec![-1, 2], vec![-2, 3], vec![3, 4]]);
        let mut context = Vec::new();

        let changed = propagate_units(&mut cnf, &mut context).unwrap();
        assert!(changed);
        assert!(cnf.is_empty());

        let assigned: Vec<i32> = context.iter().map(|l| l.to_dimacs()).collect();
        assert_eq!(assigned, vec![1, 2, 3]);
    }

    #[test]
    fn unit_propagation_reports_conflict() {
        let mut cnf: TestCnf = Cnf::new(vec![vec![1], vec![-1]]);
        let mut context = Vec::new();
        assert_eq!(propagate_units(&mut cnf, &mut context), Err(Conflict));
    }

    #[test]
    fn unit_propagation_noop_without_units() {
        let mut cnf: TestCnf = Cnf::new(vec![vec![1, 2], vec![-1, -2]]);
        let before = cnf.clone();
        let mut context = Vec::new();
        assert_eq!(propagate_units(&mut cnf, &mut context), Ok(false));
        assert_eq!(cnf, before);
        assert!(context.is_empty());
    }

    #[test]
    fn pure_elimination_cascades() {
        // 1 is pure; removing its clauses makes -2 pure.
        let mut cnf: TestCnf = Cnf::new(vec![vec![1, 2], vec![1, -3], vec![-2, -3], vec![3, -2]]);
        let mut context = Vec::new();

        assert!(eliminate_pures(&mut cnf, &mut context));
        assert!(cnf.is_empty());

        let assigned: Vec<i32> = context.iter().map(|l| l.to_dimacs()).collect();
        assert_eq!(assigned, vec![1, -2]);
    }

    #[test]
    fn subsumption_drops_strict_supersets() {
        let mut cnf: TestCnf = Cnf::new(vec![vec![1, 2, 3], vec![1, 2], vec![2, 3], vec![4]]);
        assert!(eliminate_subsumed(&mut cnf));
        assert_eq!(dimacs(&cnf), vec![vec![1, 2], vec![2, 3], vec![4]]);
    }

    #[test]
    fn subsumption_keeps_equal_clauses() {
        let mut cnf: TestCnf = Cnf::new(vec![vec![1, 2], vec![2, 1]]);
        assert!(!eliminate_subsumed(&mut cnf));
        assert_eq!(cnf.len(), 2);
    }

    #[test]
    fn fixpoint_is_idempotent() {
        // Subsumption exposes a pure literal, so the fixpoint needs a
        // second round before it settles.
        let clauses = vec![
            vec![1, 2],
            vec![-1, 2],
            vec![1, -2],
            vec![-1, -2],
            vec![1, 2, 3],
            vec![-1, -3],
        ];
        let mut once: TestCnf = Cnf::new(clauses);
        let mut context = Vec::new();
        assert_eq!(simplify_to_fixpoint(&mut once, &mut context, true), Ok(true));
        assert_eq!(dimacs(&once), vec![vec![1, 2], vec![-1, 2], vec![1, -2], vec![-1, -2]]);

        let mut twice = once.clone();
        let mut second_context = Vec::new();
        assert_eq!(
            simplify_to_fixpoint(&mut twice, &mut second_context, true),
            Ok(false)
        );
        assert_eq!(once, twice);
        assert!(second_context.is_empty());
    }
}
