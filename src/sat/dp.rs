#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The Davis-Putnam procedure.
//!
//! The engine simplifies the formula to fixpoint, then branches on a
//! literal `l` by recursing on `F ∪ {{l}}` and `F ∪ {{¬l}}`: the added
//! unit clause is consumed by the next round of unit propagation. State
//! restoration is by value — every branch owns an independent copy of the
//! formula — which is memory-heavy but simple and correct.
//!
//! Two flavours exist: [`Dp::classical`] branches on the first literal of
//! the first clause, [`Dp::new`] on the frequency heuristic. Subsumption
//! (rule 4) is available behind [`Dp::with_subsumption`] and off by
//! default.

use crate::sat::assignment::{Assignment, VecAssignment};
use crate::sat::clause::Clause;
use crate::sat::clause_storage::LiteralStorage;
use crate::sat::cnf::Cnf;
use crate::sat::heuristic::{most_frequent_literal, Branching};
use crate::sat::literal::{Literal, PackedLiteral};
use crate::sat::occurrence::OccurrenceCounts;
use crate::sat::simplify::simplify_to_fixpoint;
use crate::sat::solver::{Solutions, SolveStats, Solver};
use smallvec::SmallVec;
use std::mem;

/// Davis-Putnam engine with by-value branching.
#[derive(Debug, Clone)]
pub struct Dp<L: Literal = PackedLiteral, S: LiteralStorage<L> = SmallVec<[L; 8]>> {
    cnf: Cnf<L, S>,
    branching: Branching,
    subsumption: bool,
    stats: SolveStats,
}

impl<L: Literal, S: LiteralStorage<L>> Dp<L, S> {
    /// The `dp_default` variant: uninformed first-literal branching.
    #[must_use]
    pub fn classical(cnf: Cnf<L, S>) -> Self {
        Self {
            cnf,
            branching: Branching::FirstLiteral,
            subsumption: false,
            stats: SolveStats::default(),
        }
    }

    /// Enables subsumption (rule 4) inside the simplification fixpoint.
    #[must_use]
    pub const fn with_subsumption(mut self) -> Self {
        self.subsumption = true;
        self
    }

    fn pick_literal(&self, cnf: &Cnf<L, S>) -> Option<L> {
        match self.branching {
            Branching::FirstLiteral => cnf.first_literal(),
            Branching::MostFrequent => {
                most_frequent_literal(&OccurrenceCounts::from_cnf(cnf), |_| true)
            }
        }
    }

    /// The recursive search. `context` accumulates the literals made true
    /// on the current branch; it is truncated to its entry length when a
    /// branch fails.
    fn search(&mut self, mut cnf: Cnf<L, S>, context: &mut Vec<L>) -> bool {
        let before = context.len();
        if simplify_to_fixpoint(&mut cnf, context, self.subsumption).is_err() {
            return false;
        }
        self.stats.propagations += context.len() - before;

        if cnf.is_empty() {
            return true;
        }
        if cnf.iter().any(Clause::is_empty) {
            return false;
        }

        let Some(lit) = self.pick_literal(&cnf) else {
            return true;
        };

        let mark = context.len();

        self.stats.decisions += 1;
        let mut left = cnf.clone();
        left.add_clause(Clause::new(&[lit]));
        if self.search(left, context) {
            return true;
        }
        context.truncate(mark);

        self.stats.decisions += 1;
        cnf.add_clause(Clause::new(&[lit.negated()]));
        if self.search(cnf, context) {
            return true;
        }
        context.truncate(mark);

        false
    }
}

impl<L: Literal, S: LiteralStorage<L>> Solver<L, S> for Dp<L, S> {
    /// The `dp` variant: frequency-heuristic branching, no subsumption.
    fn new(cnf: Cnf<L, S>) -> Self {
        Self {
            cnf,
            branching: Branching::MostFrequent,
            subsumption: false,
            stats: SolveStats::default(),
        }
    }

    fn solve(&mut self) -> Option<Solutions> {
        self.stats = SolveStats::default();
        if self.cnf.contains_empty {
            return None;
        }

        let num_vars = self.cnf.num_vars;
        let cnf = mem::take(&mut self.cnf);
        let mut context = Vec::with_capacity(num_vars);

        if !self.search(cnf, &mut context) {
            return None;
        }

        let mut assignment = VecAssignment::new(num_vars);
        for lit in context {
            assignment.assign(lit);
        }
        Some(assignment.to_solutions())
    }

    fn stats(&self) -> SolveStats {
        self.stats
    }
}
