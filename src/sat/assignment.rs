#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Variable assignment state.
//!
//! The [`Assignment`] trait tracks whether each variable is currently true,
//! false, or unassigned. [`VecAssignment`] is the dense default;
//! [`HashMapAssignment`] serves sparse or non-contiguous variable sets.

use crate::sat::literal::{Literal, Variable};
use crate::sat::solver::Solutions;
use rustc_hash::FxHashMap;
use std::fmt::Debug;

/// The assignment state of a single propositional variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum VarState {
    /// No truth value yet.
    #[default]
    Unassigned,
    /// Assigned the contained truth value.
    Assigned(bool),
}

impl VarState {
    /// `true` if the variable holds a truth value.
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        matches!(self, Self::Assigned(_))
    }

    /// `true` if the variable holds no truth value.
    #[must_use]
    pub const fn is_unassigned(self) -> bool {
        !self.is_assigned()
    }
}

impl From<VarState> for Option<bool> {
    fn from(s: VarState) -> Self {
        match s {
            VarState::Assigned(b) => Some(b),
            VarState::Unassigned => None,
        }
    }
}

/// Interface for tracking variable states during a solve.
///
/// Variables are numbered from 1; implementations must accept every
/// variable in `1..num_vars`.
pub trait Assignment: Debug + Clone {
    /// Creates a tracker for variables `1..n_vars`, all unassigned.
    fn new(n_vars: usize) -> Self;

    /// One past the highest variable this tracker covers.
    fn num_vars(&self) -> usize;

    /// Gives `var` the truth value `b`.
    fn set(&mut self, var: Variable, b: bool);

    /// Returns `var` to the unassigned state.
    fn unassign(&mut self, var: Variable);

    /// The state of `var`.
    fn state(&self, var: Variable) -> VarState;

    /// Makes the literal true: its variable takes the literal's polarity.
    fn assign(&mut self, l: impl Literal) {
        self.set(l.variable(), l.polarity());
    }

    /// `true` if `var` holds a truth value.
    fn is_assigned(&self, var: Variable) -> bool {
        self.state(var).is_assigned()
    }

    /// The truth value of `var`, if any.
    fn var_value(&self, var: Variable) -> Option<bool> {
        self.state(var).into()
    }

    /// The truth value of a literal under the current assignment, `None`
    /// while its variable is unassigned.
    fn literal_value(&self, l: impl Literal) -> Option<bool> {
        self.var_value(l.variable()).map(|b| b == l.polarity())
    }

    /// Extracts the model as signed DIMACS literals, completing variables
    /// never touched by the search with negative polarity (the choice is
    /// arbitrary; any completion satisfies a formula whose clauses are all
    /// satisfied or inactive).
    fn to_solutions(&self) -> Solutions {
        let mut solutions = Solutions::default();
        for var in 1..self.num_vars() {
            #[allow(clippy::cast_possible_truncation)]
            let var = var as Variable;
            #[allow(clippy::cast_possible_wrap)]
            let signed = var as i32;
            match self.var_value(var) {
                Some(true) => solutions.push(signed),
                Some(false) | None => solutions.push(-signed),
            }
        }
        solutions
    }
}

/// Dense assignment tracker backed by a `Vec<VarState>`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VecAssignment {
    states: Vec<VarState>,
}

impl Assignment for VecAssignment {
    fn new(n_vars: usize) -> Self {
        Self {
            states: vec![VarState::Unassigned; n_vars.max(1)],
        }
    }

    fn num_vars(&self) -> usize {
        self.states.len()
    }

    fn set(&mut self, var: Variable, b: bool) {
        self.states[var as usize] = VarState::Assigned(b);
    }

    fn unassign(&mut self, var: Variable) {
        self.states[var as usize] = VarState::Unassigned;
    }

    fn state(&self, var: Variable) -> VarState {
        self.states[var as usize]
    }
}

/// Sparse assignment tracker backed by an `FxHashMap`. Absent entries read
/// as unassigned.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HashMapAssignment {
    map: FxHashMap<Variable, VarState>,
    num_vars: usize,
}

impl Assignment for HashMapAssignment {
    fn new(n_vars: usize) -> Self {
        Self {
            map: FxHashMap::default(),
            num_vars: n_vars.max(1),
        }
    }

    fn num_vars(&self) -> usize {
        self.num_vars
    }

    fn set(&mut self, var: Variable, b: bool) {
        self.map.insert(var, VarState::Assigned(b));
    }

    fn unassign(&mut self, var: Variable) {
        self.map.remove(&var);
    }

    fn state(&self, var: Variable) -> VarState {
        self.map.get(&var).copied().unwrap_or_default()
    }
}
