#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The formula model: a conjunction of clauses over integer-coded
//! variables.
//!
//! A [`Cnf`] owns its clause table; engines reference clauses by index.
//! Tautological clauses are dropped as they enter the formula (rule 1 of
//! the simplification set — the rules only remove literals, so tautologies
//! can never reappear later). An explicitly empty clause makes the formula
//! unsatisfiable by construction and is recorded as such rather than
//! stored.

use crate::sat::clause::Clause;
use crate::sat::clause_storage::LiteralStorage;
use crate::sat::literal::{Literal, PackedLiteral};
use crate::sat::solver::Solutions;
use smallvec::SmallVec;
use std::fmt::Display;
use std::num::NonZeroI32;
use std::ops::{Index, IndexMut};

/// A boolean formula in conjunctive normal form.
///
/// # Type Parameters
///
/// * `L`: The literal representation. Defaults to [`PackedLiteral`].
/// * `S`: The literal storage of each clause.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cnf<L: Literal = PackedLiteral, S: LiteralStorage<L> = SmallVec<[L; 8]>> {
    /// The clause table. Indices into this vector are the clause ids used
    /// by occurrence lists and watcher lists.
    pub clauses: Vec<Clause<L, S>>,
    /// One past the highest variable id; variables are numbered
    /// `1..num_vars` and slot 0 of per-variable tables is unused.
    pub num_vars: usize,
    /// Set when an explicitly empty clause was added: the formula is
    /// unsatisfiable regardless of the remaining clauses.
    pub contains_empty: bool,
}

impl<L: Literal, S: LiteralStorage<L>> Cnf<L, S> {
    /// Builds a formula from clauses of DIMACS-style signed integers.
    ///
    /// Duplicate literals within a clause are deduplicated, tautological
    /// clauses are dropped, and an explicitly empty clause marks the whole
    /// formula unsatisfiable.
    pub fn new<J: IntoIterator<Item = i32>, I: IntoIterator<Item = J>>(clauses: I) -> Self {
        let mut cnf = Self {
            clauses: Vec::new(),
            num_vars: 1,
            contains_empty: false,
        };
        for dimacs in clauses {
            cnf.add_clause(dimacs.into_iter().collect());
        }
        cnf
    }

    /// Inserts a clause, applying the entry rules described on [`Cnf`].
    pub fn add_clause(&mut self, clause: Clause<L, S>) {
        if clause.is_empty() {
            self.contains_empty = true;
            return;
        }
        if clause.is_tautology() {
            return;
        }
        let max_var = clause
            .iter()
            .map(|l| l.variable() as usize)
            .max()
            .unwrap_or_default();
        self.num_vars = self.num_vars.max(max_var + 1);
        self.clauses.push(clause);
    }

    /// Widens the variable range to cover `1..=n`, e.g. when a DIMACS
    /// header declares variables that occur in no clause.
    pub fn declare_vars(&mut self, n: usize) {
        self.num_vars = self.num_vars.max(n + 1);
    }

    /// Number of clauses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// `true` if the formula has no clauses, which makes it trivially
    /// satisfiable (unless [`Self::contains_empty`] is set).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Iterates over the clauses in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Clause<L, S>> {
        self.clauses.iter()
    }

    /// Mutable iteration over the clauses.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Clause<L, S>> {
        self.clauses.iter_mut()
    }

    /// Keeps only the clauses satisfying `keep`. Clause ids are not stable
    /// across this call; it is used by the copy-based DP engine only.
    pub fn retain(&mut self, keep: impl FnMut(&Clause<L, S>) -> bool) {
        self.clauses.retain(keep);
    }

    /// The first literal of the first clause, the branching literal of the
    /// classical (uninformed) variants.
    #[must_use]
    pub fn first_literal(&self) -> Option<L> {
        self.clauses.first().map(|c| c[0])
    }

    /// Checks a model against the formula: every clause must contain at
    /// least one literal that the model makes true.
    #[must_use]
    pub fn verify(&self, solutions: &Solutions) -> bool {
        !self.contains_empty
            && self.iter().all(|clause| {
                clause
                    .iter()
                    .any(|&lit| NonZeroI32::new(lit.to_dimacs()).is_some_and(|l| solutions.check(l)))
            })
    }

    /// Re-encodes the formula with a different literal or storage type.
    pub fn convert<T: Literal, U: LiteralStorage<T>>(&self) -> Cnf<T, U> {
        Cnf {
            clauses: self
                .clauses
                .iter()
                .map(|c| c.iter().map(|l| crate::sat::literal::convert::<L, T>(*l)).collect())
                .collect(),
            num_vars: self.num_vars,
            contains_empty: self.contains_empty,
        }
    }
}

impl<L: Literal, S: LiteralStorage<L>> Index<usize> for Cnf<L, S> {
    type Output = Clause<L, S>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.clauses[index]
    }
}

impl<L: Literal, S: LiteralStorage<L>> IndexMut<usize> for Cnf<L, S> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.clauses[index]
    }
}

impl<L: Literal, S: LiteralStorage<L>> From<Vec<Vec<i32>>> for Cnf<L, S> {
    fn from(clauses: Vec<Vec<i32>>) -> Self {
        Self::new(clauses)
    }
}

impl<L: Literal, S: LiteralStorage<L>> FromIterator<Clause<L, S>> for Cnf<L, S> {
    fn from_iter<I: IntoIterator<Item = Clause<L, S>>>(iter: I) -> Self {
        let mut cnf = Self {
            clauses: Vec::new(),
            num_vars: 1,
            contains_empty: false,
        };
        for clause in iter {
            cnf.add_clause(clause);
        }
        cnf
    }
}

impl<L: Literal, S: LiteralStorage<L>> Display for Cnf<L, S> {
    /// Formats the formula in DIMACS CNF syntax.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "p cnf {} {}", self.num_vars.saturating_sub(1), self.len())?;
        for clause in &self.clauses {
            for &lit in clause.iter() {
                write!(f, "{} ", lit.to_dimacs())?;
            }
            writeln!(f, "0")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_from_dimacs() {
        let cnf: Cnf = Cnf::new(vec![vec![1, -2], vec![-1, 2, 3]]);
        assert_eq!(cnf.len(), 2);
        assert_eq!(cnf.num_vars, 3 + 1);
        assert!(!cnf.contains_empty);
    }

    #[test]
    fn tautologies_dropped_on_entry() {
        let cnf: Cnf = Cnf::new(vec![vec![1, -1, 2], vec![2, 3]]);
        assert_eq!(cnf.len(), 1);
    }

    #[test]
    fn empty_clause_marks_unsat() {
        let cnf: Cnf = Cnf::new(vec![vec![1, 2], Vec::new()]);
        assert!(cnf.contains_empty);
        assert_eq!(cnf.len(), 1);
    }

    #[test]
    fn declare_vars_widens_range() {
        let mut cnf: Cnf = Cnf::new(vec![vec![1]]);
        assert_eq!(cnf.num_vars, 2);
        cnf.declare_vars(5);
        assert_eq!(cnf.num_vars, 6);
        cnf.declare_vars(2);
        assert_eq!(cnf.num_vars, 6);
    }

    #[test]
    fn verify_model() {
        let cnf: Cnf = Cnf::new(vec![vec![1, -2], vec![-1, 2, 3]]);

        let good = Solutions::new(&[1, -2, 3]);
        assert!(cnf.verify(&good));

        let bad = Solutions::new(&[-1, 2, -3]);
        assert!(!cnf.verify(&bad));
    }

    #[test]
    fn convert_changes_encoding_only() {
        use crate::sat::literal::NegativeLiteral;

        let cnf: Cnf = Cnf::new(vec![vec![1, -2], vec![2, 3]]);
        let converted: Cnf<NegativeLiteral, Vec<NegativeLiteral>> = cnf.convert();

        assert_eq!(converted.len(), cnf.len());
        assert_eq!(converted.num_vars, cnf.num_vars);
        assert!(converted[0].contains(NegativeLiteral::from_dimacs(-2)));
    }

    #[test]
    fn display_round_trip_shape() {
        let cnf: Cnf = Cnf::new(vec![vec![1, -2], vec![2, 3]]);
        let text = format!("{cnf}");
        assert!(text.contains("p cnf 3 2"));
        assert!(text.contains("1 -2 0"));
        assert!(text.contains("2 3 0"));
    }
}
