#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! DPLL driven by a two-literal watcher index.
//!
//! Clause literals are never deleted here. Each active non-unit clause has
//! exactly two watched literals; only when a watched literal becomes false
//! does the clause need inspection, so propagation touches a small slice of
//! the formula per assignment. Satisfaction is marked eagerly through
//! per-literal occurrence lists, which keeps the occurrence counts exact
//! over the active clause set and the pure-literal query cheap.
//!
//! The watcher index owns all watch state: the per-clause watched pair and
//! the per-literal lists of watching clauses. Clauses are referenced by id
//! throughout.
//!
//! Backtracking uses the same journal mechanism as the scanning DPLL
//! engine: satisfied marks and watcher moves are recorded and inverted in
//! reverse order.

use crate::sat::assignment::{Assignment, VecAssignment};
use crate::sat::clause_storage::LiteralStorage;
use crate::sat::cnf::Cnf;
use crate::sat::heuristic::most_frequent_literal;
use crate::sat::journal::Journal;
use crate::sat::literal::{Literal, PackedLiteral};
use crate::sat::occurrence::OccurrenceCounts;
use crate::sat::solver::{Solutions, SolveStats, Solver};
use crate::sat::trail::{Reason, Trail};
use bit_vec::BitVec;
use smallvec::SmallVec;
use std::collections::VecDeque;

/// A journaled mutation of the watcher state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change<L: Literal> {
    /// The clause was marked satisfied and left the active set.
    ClauseSatisfied(usize),
    /// The clause stopped watching `from` and now watches `to`.
    WatchMoved { clause: usize, from: L, to: L },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Mark {
    trail: usize,
    journal: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Conflict;

/// DPLL engine with watched-literal propagation (`dpll_watchers`).
#[derive(Debug, Clone)]
pub struct WatcherEngine<
    L: Literal = PackedLiteral,
    S: LiteralStorage<L> = SmallVec<[L; 8]>,
    A: Assignment = VecAssignment,
> {
    cnf: Cnf<L, S>,
    /// Satisfied flag per clause; a clause is active while unset.
    satisfied: BitVec,
    satisfied_count: usize,
    /// Clause ids containing each literal, indexed by [`Literal::index`].
    occurrences: Vec<SmallVec<[usize; 8]>>,
    counts: OccurrenceCounts,
    /// The watched pair of each clause; a unit clause watches its single
    /// literal in both slots.
    watched: Vec<(L, L)>,
    /// Clause ids watching each literal, indexed by [`Literal::index`].
    watch_lists: Vec<SmallVec<[usize; 4]>>,
    queue: VecDeque<(L, Reason)>,
    assignment: A,
    trail: Trail<L>,
    journal: Journal<Change<L>>,
    stats: SolveStats,
}

impl<L: Literal, S: LiteralStorage<L>, A: Assignment> WatcherEngine<L, S, A> {
    fn mark(&self) -> Mark {
        Mark {
            trail: self.trail.len(),
            journal: self.journal.len(),
        }
    }

    fn is_active(&self, cid: usize) -> bool {
        !self.satisfied[cid]
    }

    fn mark_satisfied(&mut self, cid: usize) {
        self.satisfied.set(cid, true);
        self.satisfied_count += 1;
        self.counts.uncount_clause(&self.cnf[cid]);
        self.journal.record(Change::ClauseSatisfied(cid));
    }

    /// Re-points the watcher of `cid` from the falsified `from` to `to`.
    /// `other` is the clause's remaining watcher.
    fn move_watch(&mut self, cid: usize, from: L, to: L, other: L) {
        self.watched[cid] = (other, to);
        let list = &mut self.watch_lists[from.index()];
        if let Some(pos) = list.iter().position(|&c| c == cid) {
            list.swap_remove(pos);
        }
        self.watch_lists[to.index()].push(cid);
        self.journal.record(Change::WatchMoved {
            clause: cid,
            from,
            to,
        });
    }

    /// Applies the effect of `lit` having become true: eagerly satisfies
    /// the clauses containing it, then services the clauses watching
    /// `¬lit`.
    fn apply(&mut self, lit: L) -> Result<(), Conflict> {
        let containing = self.occurrences[lit.index()].clone();
        for cid in containing {
            if self.is_active(cid) {
                self.mark_satisfied(cid);
            }
        }

        let negated = lit.negated();
        let watching = self.watch_lists[negated.index()].clone();
        for cid in watching {
            if !self.is_active(cid) {
                continue;
            }
            self.stats.inspections += 1;

            let (a, b) = self.watched[cid];
            if a == b {
                // A unit clause watching its single literal, which just
                // became false.
                return Err(Conflict);
            }
            let other = if a == negated { b } else { a };
            if self.assignment.literal_value(other) == Some(true) {
                self.mark_satisfied(cid);
                continue;
            }

            let replacement = self.cnf[cid]
                .iter()
                .copied()
                .find(|&l| l != other && l != negated && self.assignment.literal_value(l) != Some(false));

            if let Some(new_watch) = replacement {
                self.move_watch(cid, negated, new_watch, other);
            } else {
                match self.assignment.literal_value(other) {
                    None => self.queue.push_back((other, Reason::Propagated)),
                    Some(false) => return Err(Conflict),
                    Some(true) => {}
                }
            }
        }
        Ok(())
    }

    /// Drains the propagation queue in FIFO order. Duplicates are skipped
    /// at dequeue; a dequeued literal whose variable already holds the
    /// opposite value is a conflict.
    fn propagate(&mut self) -> Result<(), Conflict> {
        while let Some((lit, reason)) = self.queue.pop_front() {
            match self.assignment.literal_value(lit) {
                Some(true) => continue,
                Some(false) => return Err(Conflict),
                None => {}
            }
            if reason != Reason::Decision {
                self.stats.propagations += 1;
            }
            self.trail.push(lit, reason);
            self.assignment.assign(lit);
            self.apply(lit)?;
        }
        Ok(())
    }

    /// Enqueues pure literals until none remain.
    fn eliminate_pures(&mut self) -> Result<(), Conflict> {
        loop {
            let assignment = &self.assignment;
            let pures: Vec<L> = self
                .counts
                .pure_literals(|v| !assignment.is_assigned(v));
            if pures.is_empty() {
                return Ok(());
            }
            for lit in pures {
                self.queue.push_back((lit, Reason::Pure));
            }
            self.propagate()?;
        }
    }

    fn undo_to(&mut self, mark: Mark) {
        self.queue.clear();

        let cnf = &self.cnf;
        let satisfied = &mut self.satisfied;
        let counts = &mut self.counts;
        let watched = &mut self.watched;
        let watch_lists = &mut self.watch_lists;
        let mut unsatisfied = 0;
        for change in self.journal.drain_to(mark.journal) {
            match change {
                Change::ClauseSatisfied(cid) => {
                    satisfied.set(cid, false);
                    unsatisfied += 1;
                    counts.count_clause(&cnf.clauses[cid]);
                }
                Change::WatchMoved { clause, from, to } => {
                    let (x, y) = watched[clause];
                    let other = if x == to { y } else { x };
                    watched[clause] = (other, from);
                    let list = &mut watch_lists[to.index()];
                    if let Some(pos) = list.iter().position(|&c| c == clause) {
                        list.swap_remove(pos);
                    }
                    watch_lists[from.index()].push(clause);
                }
            }
        }
        self.satisfied_count -= unsatisfied;

        let assignment = &mut self.assignment;
        for step in self.trail.pop_to(mark.trail) {
            assignment.unassign(step.lit.variable());
        }
    }

    fn search(&mut self) -> bool {
        if self.propagate().is_err() {
            return false;
        }
        if self.eliminate_pures().is_err() {
            return false;
        }
        if cfg!(debug_assertions) {
            self.check_watch_invariant();
        }
        if self.satisfied_count == self.cnf.len() {
            return true;
        }

        let assignment = &self.assignment;
        let Some(lit) = most_frequent_literal::<L, _>(&self.counts, |v| !assignment.is_assigned(v))
        else {
            return true;
        };
        let mark = self.mark();

        self.stats.decisions += 1;
        self.queue.push_back((lit, Reason::Decision));
        if self.search() {
            return true;
        }
        self.undo_to(mark);

        self.stats.decisions += 1;
        self.queue.push_back((lit.negated(), Reason::Decision));
        if self.search() {
            return true;
        }
        self.undo_to(mark);

        false
    }

    /// At quiescence every active non-unit clause watches two distinct,
    /// unfalsified literals of its own, and both appear in the watch
    /// lists.
    fn check_watch_invariant(&self) {
        for cid in 0..self.cnf.len() {
            if !self.is_active(cid) || self.cnf[cid].is_unit() {
                continue;
            }
            let (a, b) = self.watched[cid];
            debug_assert_ne!(a, b, "clause {cid} watches one literal twice");
            for watch in [a, b] {
                debug_assert!(
                    self.cnf[cid].contains(watch),
                    "clause {cid} watches a foreign literal"
                );
                debug_assert_ne!(
                    self.assignment.literal_value(watch),
                    Some(false),
                    "clause {cid} watches a falsified literal at quiescence"
                );
                debug_assert!(
                    self.watch_lists[watch.index()].contains(&cid),
                    "watch list for clause {cid} is out of sync"
                );
            }
        }
    }
}

impl<L: Literal, S: LiteralStorage<L>, A: Assignment> Solver<L, S> for WatcherEngine<L, S, A> {
    fn new(cnf: Cnf<L, S>) -> Self {
        let num_clauses = cnf.len();
        let num_lit_indices = cnf.num_vars * 2;
        let counts = OccurrenceCounts::from_cnf(&cnf);

        let mut occurrences = vec![SmallVec::new(); num_lit_indices];
        let mut watch_lists = vec![SmallVec::new(); num_lit_indices];
        let mut watched = Vec::with_capacity(num_clauses);

        for (cid, clause) in cnf.iter().enumerate() {
            for &lit in clause.iter() {
                occurrences[lit.index()].push(cid);
            }
            if clause.is_unit() {
                let only = clause[0];
                watched.push((only, only));
                watch_lists[only.index()].push(cid);
            } else {
                let (a, b) = (clause[0], clause[1]);
                watched.push((a, b));
                watch_lists[a.index()].push(cid);
                watch_lists[b.index()].push(cid);
            }
        }

        let assignment = A::new(cnf.num_vars);
        let trail = Trail::new(cnf.num_vars);

        Self {
            satisfied: BitVec::from_elem(num_clauses, false),
            satisfied_count: 0,
            occurrences,
            counts,
            watched,
            watch_lists,
            queue: VecDeque::new(),
            assignment,
            trail,
            journal: Journal::new(num_clauses),
            stats: SolveStats::default(),
            cnf,
        }
    }

    fn solve(&mut self) -> Option<Solutions> {
        self.stats = SolveStats::default();
        if self.cnf.contains_empty {
            return None;
        }

        for clause in self.cnf.iter() {
            if clause.is_unit() {
                self.queue.push_back((clause[0], Reason::Propagated));
            }
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
