#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Trail-based DPLL.
//!
//! Instead of copying the formula per branch, this engine mutates it in
//! place and journals every mutation: deactivating a clause that contains
//! the assigned literal, and deleting the negated literal from the clauses
//! that contain it. Backtracking replays the journal in reverse to the
//! mark taken at the decision, which restores the formula, the occurrence
//! counts, and the active set exactly.
//!
//! [`Dpll::classical`] branches on the first literal of the first active
//! clause and skips the pure-literal rule, matching the naive textbook
//! procedure; [`Dpll::new`] branches by occurrence frequency and applies
//! pure-literal elimination between propagation and branching.

use crate::sat::assignment::{Assignment, VecAssignment};
use crate::sat::clause_storage::LiteralStorage;
use crate::sat::cnf::Cnf;
use crate::sat::heuristic::{most_frequent_literal, Branching};
use crate::sat::journal::Journal;
use crate::sat::literal::{Literal, PackedLiteral};
use crate::sat::occurrence::OccurrenceCounts;
use crate::sat::solver::{Solutions, SolveStats, Solver};
use crate::sat::trail::{Reason, Trail};
use bit_vec::BitVec;
use smallvec::SmallVec;

/// A journaled mutation of the formula state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change<L: Literal> {
    /// The clause left the active set (it contained the assigned literal).
    ClauseDeactivated(usize),
    /// `lit` was deleted from the clause; it sat at index `at`.
    LiteralRemoved { clause: usize, lit: L, at: usize },
}

/// Position in the trail and the journal at a decision point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Mark {
    trail: usize,
    journal: usize,
}

/// Conflict signal local to the engine; never surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Conflict;

/// Trail-based DPLL engine.
#[derive(Debug, Clone)]
pub struct Dpll<
    L: Literal = PackedLiteral,
    S: LiteralStorage<L> = SmallVec<[L; 8]>,
    A: Assignment = VecAssignment,
> {
    cnf: Cnf<L, S>,
    active: BitVec,
    active_count: usize,
    counts: OccurrenceCounts,
    assignment: A,
    trail: Trail<L>,
    journal: Journal<Change<L>>,
    branching: Branching,
    use_pure: bool,
    stats: SolveStats,
}

impl<L: Literal, S: LiteralStorage<L>, A: Assignment> Dpll<L, S, A> {
    /// The `classical_dpll` variant: first-literal branching, no
    /// pure-literal elimination.
    #[must_use]
    pub fn classical(cnf: Cnf<L, S>) -> Self {
        let mut engine = Self::new(cnf);
        engine.branching = Branching::FirstLiteral;
        engine.use_pure = false;
        engine
    }

    fn mark(&self) -> Mark {
        Mark {
            trail: self.trail.len(),
            journal: self.journal.len(),
        }
    }

    fn deactivate(&mut self, cid: usize) {
        self.active.set(cid, false);
        self.active_count -= 1;
        self.counts.uncount_clause(&self.cnf[cid]);
        self.journal.record(Change::ClauseDeactivated(cid));
    }

    /// Makes `lit` true and applies its effect on every active clause.
    ///
    /// Clauses containing `lit` are deactivated; `¬lit` is deleted where it
    /// occurs. An emptied clause is a conflict.
    fn assign(&mut self, lit: L, reason: Reason) -> Result<(), Conflict> {
        debug_assert!(!self.assignment.is_assigned(lit.variable()));
        self.trail.push(lit, reason);
        self.assignment.assign(lit);

        let negated = lit.negated();
        let mut conflict = false;
        for cid in 0..self.cnf.len() {
            if !self.active[cid] {
                continue;
            }
            if self.cnf[cid].contains(lit) {
                self.deactivate(cid);
            } else if let Some(at) = self.cnf[cid].remove_literal(negated) {
                self.counts.uncount_literal(negated);
                self.journal.record(Change::LiteralRemoved {
                    clause: cid,
                    lit: negated,
                    at,
                });
                if self.cnf[cid].is_empty() {
                    conflict = true;
                }
            }
        }

        if conflict {
            Err(Conflict)
        } else {
            Ok(())
        }
    }

    /// Unit propagation to fixpoint: repeatedly assigns the literal of the
    /// lowest-id active unit clause.
    fn propagate(&mut self) -> Result<(), Conflict> {
        loop {
            let mut unit = None;
            for cid in 0..self.cnf.len() {
                if !self.active[cid] {
                    continue;
                }
                self.stats.inspections += 1;
                if self.cnf[cid].is_unit() {
                    unit = Some(self.cnf[cid][0]);
                    break;
                }
            }
            let Some(lit) = unit else {
                return Ok(());
            };
            self.stats.propagations += 1;
            self.assign(lit, Reason::Propagated)?;
        }
    }

    /// Pure-literal elimination to fixpoint. Assigning a pure literal only
    /// deactivates clauses, so it cannot conflict or create units.
    fn eliminate_pures(&mut self) {
        loop {
            let assignment = &self.assignment;
            let pures: Vec<L> = self
                .counts
                .pure_literals(|v| !assignment.is_assigned(v));
            if pures.is_empty() {
                return;
            }
            for lit in pures {
                if self.assignment.is_assigned(lit.variable()) {
                    continue;
                }
                self.stats.propagations += 1;
                self.assign(lit, Reason::Pure)
                    .expect("pure literal assignment cannot empty a clause");
            }
        }
    }

    fn pick_literal(&self) -> Option<L> {
        match self.branching {
            Branching::FirstLiteral => (0..self.cnf.len())
                .find(|&cid| self.active[cid])
                .map(|cid| self.cnf[cid][0]),
            Branching::MostFrequent => {
                let assignment = &self.assignment;
                most_frequent_literal(&self.counts, |v| !assignment.is_assigned(v))
            }
        }
    }

    /// Rolls the formula state and the trail back to `mark`.
    fn undo_to(&mut self, mark: Mark) {
        let cnf = &mut self.cnf;
        let active = &mut self.active;
        let counts = &mut self.counts;
        let mut reactivated = 0;
        for change in self.journal.drain_to(mark.journal) {
            match change {
                Change::ClauseDeactivated(cid) => {
                    active.set(cid, true);
                    reactivated += 1;
                    counts.count_clause(&cnf.clauses[cid]);
                }
                Change::LiteralRemoved { clause, lit, at } => {
                    cnf.clauses[clause].restore_literal(lit, at);
                    counts.count_literal(lit);
                }
            }
        }
        self.active_count += reactivated;

        let assignment = &mut self.assignment;
        for step in self.trail.pop_to(mark.trail) {
            assignment.unassign(step.lit.variable());
        }
    }

    fn search(&mut self) -> bool {
        if self.propagate().is_err() {
            return false;
        }
        if self.use_pure {
            self.eliminate_pures();
        }
        if self.active_count == 0 {
            return true;
        }

        let Some(lit) = self.pick_literal() else {
            return true;
        };
        let mark = self.mark();

        self.stats.decisions += 1;
        if self.assign(lit, Reason::Decision).is_ok() && self.search() {
            return true;
        }
        self.undo_to(mark);

        self.stats.decisions += 1;
        if self.assign(lit.negated(), Reason::Decision).is_ok() && self.search() {
            return true;
        }
        self.undo_to(mark);

        false
    }
}

impl<L: Literal, S: LiteralStorage<L>, A: Assignment> Solver<L, S> for Dpll<L, S, A> {
    /// The `dpll` variant: heuristic branching with pure-literal
    /// elimination.
    fn new(cnf: Cnf<L, S>) -> Self {
        let num_clauses = cnf.len();
        let counts = OccurrenceCounts::from_cnf(&cnf);
        let assignment = A::new(cnf.num_vars);
        let trail = Trail::new(cnf.num_vars);

        Self {
            active: BitVec::from_elem(num_clauses, true),
            active_count: num_clauses,
            counts,
            assignment,
            trail,
            journal: Journal::new(num_clauses),
            branching: Branching::MostFrequent,
            use_pure: true,
            stats: SolveStats::default(),
            cnf,
        }
    }

    fn solve(&mut self) -> Option<Solutions> {
        self.stats = SolveStats::default();
        if self.cnf.contains_empty {
            return None;
        }
        if self.search() {
            Some(self.assignment.to_solutions())
        } else {
            None
        }
    }

    fn stats(&self) -> SolveStats {
        self.stats
    }
}
