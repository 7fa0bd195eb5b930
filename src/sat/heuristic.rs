//! Branching literal selection.
//!
//! The heuristic variants pick the unassigned variable with the highest
//! total occurrence count (ties broken by smallest variable id) and the
//! polarity with the larger individual count. A variable occurring often
//! resolves many clauses per assignment, and the frequent polarity
//! satisfies the most clauses immediately. The classical variants instead
//! take the first literal of the first active clause.

use crate::sat::literal::{Literal, Variable};
use crate::sat::occurrence::OccurrenceCounts;

/// How an engine picks its decision literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Branching {
    /// First literal of the first active clause.
    FirstLiteral,
    /// Frequency-scored pick over the occurrence counts.
    #[default]
    MostFrequent,
}

/// Picks the decision literal by occurrence frequency.
///
/// Returns `None` when no candidate variable occurs in an active clause,
/// which the callers read as "the formula is empty, report SAT".
pub fn most_frequent_literal<L: Literal, F: FnMut(Variable) -> bool>(
    counts: &OccurrenceCounts,
    mut unassigned: F,
) -> Option<L> {
    let mut best: Option<(u32, Variable)> = None;
    for var in 1..counts.num_vars() {
        #[allow(clippy::cast_possible_truncation)]
        let var = var as Variable;
        if !unassigned(var) {
            continue;
        }
        let total = counts.total(var);
        if total == 0 {
            continue;
        }
        if best.map_or(true, |(t, _)| total > t) {
            best = Some((total, var));
        }
    }
    best.map(|(_, var)| L::new(var, counts.pos(var) >= counts.neg(var)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::cnf::Cnf;
    use crate::sat::literal::PackedLiteral;

    fn pick(clauses: Vec<Vec<i32>>) -> Option<i32> {
        let cnf: Cnf = Cnf::new(clauses);
        let counts = OccurrenceCounts::from_cnf(&cnf);
        most_frequent_literal::<PackedLiteral, _>(&counts, |_| true).map(|l| l.to_dimacs())
    }

    #[test]
    fn picks_most_frequent_variable() {
        // Variable 2 occurs three times, the others at most twice.
        assert_eq!(pick(vec![vec![1, 2], vec![-2, 3], vec![2, -3]]), Some(2));
    }

    #[test]
    fn polarity_follows_larger_count() {
        assert_eq!(pick(vec![vec![-1, 2], vec![-1, 3], vec![1, 4]]), Some(-1));
    }

    #[test]
    fn ties_break_to_smallest_variable() {
        assert_eq!(pick(vec![vec![1, 2], vec![1, 2]]), Some(1));
    }

    #[test]
    fn equal_polarities_prefer_positive() {
        assert_eq!(pick(vec![vec![1, 1], vec![1, 2], vec![-1, -1], vec![-1, 3]]), Some(1));
    }

    #[test]
    fn empty_counts_give_no_literal() {
        assert_eq!(pick(Vec::new()), None);
    }

    #[test]
    fn assigned_variables_are_skipped() {
        let cnf: Cnf = Cnf::new(vec![vec![1, 1], vec![1, 2], vec![2, 3]]);
        let counts = OccurrenceCounts::from_cnf(&cnf);
        let lit = most_frequent_literal::<PackedLiteral, _>(&counts, |v| v != 1);
        assert_eq!(lit.map(|l| l.to_dimacs()), Some(2));
    }
}
