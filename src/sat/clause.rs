#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A clause is a disjunction of literals (e.g. `x1 OR !x2 OR x3`), stored as
//! a duplicate-free small vector.
//!
//! Clauses carry no solver state of their own: activity bitmaps, occurrence
//! counts, and watcher pairs all live in the engines and reference clauses
//! by their index in the formula's clause table.

use crate::sat::clause_storage::LiteralStorage;
use crate::sat::literal::{Literal, PackedLiteral};
use itertools::Itertools;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use std::marker::PhantomData;
use std::ops::Index;

/// A set of literals interpreted as their disjunction.
///
/// # Type Parameters
///
/// * `L`: The literal representation. Defaults to [`PackedLiteral`].
/// * `S`: The storage for the literals. Defaults to `SmallVec<[L; 8]>`,
///   which keeps typical benchmark clauses inline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Clause<L: Literal = PackedLiteral, S: LiteralStorage<L> = SmallVec<[L; 8]>> {
    /// The literals forming the clause, free of duplicates.
    pub literals: S,
    marker: PhantomData<*const L>,
}

impl<L: Literal, S: LiteralStorage<L>> FromIterator<L> for Clause<L, S> {
    /// Collects literals into a clause, dropping duplicates.
    fn from_iter<I: IntoIterator<Item = L>>(iter: I) -> Self {
        Self {
            literals: iter.into_iter().unique().collect(),
            marker: PhantomData,
        }
    }
}

impl<L: Literal, S: LiteralStorage<L>> Clause<L, S> {
    /// Creates a clause from a slice of literals, deduplicating on entry.
    #[must_use]
    pub fn new(literals: &[L]) -> Self {
        literals.iter().copied().collect()
    }

    /// Number of literals in the clause.
    #[must_use]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// `true` for the empty clause, which is unsatisfiable by construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// `true` if the clause contains exactly one literal.
    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.len() == 1
    }

    /// Checks whether the clause contains both a literal and its negation.
    ///
    /// Computed once when a clause enters the formula; the simplification
    /// rules only ever remove literals, so a non-tautological clause stays
    /// that way.
    #[must_use]
    pub fn is_tautology(&self) -> bool {
        let mut seen = FxHashSet::with_capacity_and_hasher(self.len(), Default::default());
        for &lit in self.literals.iter() {
            if seen.contains(&lit.negated()) {
                return true;
            }
            seen.insert(lit);
        }
        false
    }

    /// Membership test for a single literal.
    #[must_use]
    pub fn contains(&self, literal: L) -> bool {
        self.literals.contains(literal)
    }

    /// Iterates over the literals.
    pub fn iter(&self) -> impl Iterator<Item = &L> {
        self.literals.iter()
    }

    /// Adds a literal unless it is already present.
    pub fn push(&mut self, literal: L) {
        if !self.contains(literal) {
            self.literals.push(literal);
        }
    }

    /// Swaps two literals by index. Used by the watcher engine to keep its
    /// replacement scan cheap.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is out of bounds.
    pub fn swap(&mut self, i: usize, j: usize) {
        self.literals.swap(i, j);
    }

    /// Removes `literal` via `swap_remove` if present and returns the index
    /// it occupied; the last literal takes the vacated position.
    pub fn remove_literal(&mut self, literal: L) -> Option<usize> {
        let idx = self.literals.iter().position(|&l| l == literal)?;
        self.literals.swap_remove(idx);
        Some(idx)
    }

    /// Undoes a [`Self::remove_literal`]: re-appends the literal and swaps
    /// it back to the position it was removed from.
    pub fn restore_literal(&mut self, literal: L, at: usize) {
        self.literals.push(literal);
        let last = self.literals.len() - 1;
        self.literals.swap(at, last);
    }

    /// `true` if `other` is a strict subset of this clause, making this
    /// clause redundant under subsumption.
    #[must_use]
    pub fn is_subsumed_by(&self, other: &Self) -> bool {
        other.len() < self.len() && other.iter().all(|&l| self.contains(l))
    }
}

impl<L: Literal, S: LiteralStorage<L>> Index<usize> for Clause<L, S> {
    type Output = L;

    /// Accesses the literal at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    fn index(&self, index: usize) -> &Self::Output {
        &self.literals.as_ref()[index]
    }
}

impl<L: Literal, S: LiteralStorage<L>> From<Vec<i32>> for Clause<L, S> {
    /// Builds a clause from DIMACS-style signed integers, deduplicating.
    fn from(dimacs: Vec<i32>) -> Self {
        dimacs.into_iter().map(L::from_dimacs).collect()
    }
}

impl<L: Literal, S: LiteralStorage<L>> FromIterator<i32> for Clause<L, S> {
    fn from_iter<I: IntoIterator<Item = i32>>(iter: I) -> Self {
        iter.into_iter().map(L::from_dimacs).collect()
    }
}
