//! The assignment trail: the ordered record of every literal the search
//! has made true, each tagged with the reason it was assigned.

use crate::sat::literal::Literal;

/// Why a literal entered the trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Reason {
    /// Chosen by the branching heuristic.
    #[default]
    Decision,
    /// Forced by a unit clause.
    Propagated,
    /// A pure literal; satisfiability-preserving rather than implied.
    Pure,
}

/// One trail entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step<L: Literal> {
    pub lit: L,
    pub reason: Reason,
}

/// Ordered stack of assignments. Engines take a mark before a decision and
/// pop back to it on backtrack, unassigning the popped variables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Trail<L: Literal> {
    steps: Vec<Step<L>>,
}

impl<L: Literal> Trail<L> {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            steps: Vec::with_capacity(capacity),
        }
    }

    /// Current height; used as the backtrack mark.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn push(&mut self, lit: L, reason: Reason) {
        self.steps.push(Step { lit, reason });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Step<L>> {
        self.steps.iter()
    }

    /// Pops every entry above `mark`, newest first.
    pub fn pop_to(&mut self, mark: usize) -> impl Iterator<Item = Step<L>> + '_ {
        self.steps.drain(mark..).rev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::literal::PackedLiteral;

    fn lit(value: i32) -> PackedLiteral {
        PackedLiteral::from_dimacs(value)
    }

    #[test]
    fn push_and_pop_to_mark() {
        let mut trail: Trail<PackedLiteral> = Trail::new(4);
        trail.push(lit(1), Reason::Propagated);

        let mark = trail.len();
        trail.push(lit(2), Reason::Decision);
        trail.push(lit(-3), Reason::Propagated);
        assert_eq!(trail.len(), 3);

        let popped: Vec<i32> = trail.pop_to(mark).map(|s| s.lit.to_dimacs()).collect();
        assert_eq!(popped, vec![-3, 2]);
        assert_eq!(trail.len(), 1);
        assert_eq!(trail.iter().next().unwrap().reason, Reason::Propagated);
    }

    #[test]
    fn variables_appear_once() {
        let mut trail: Trail<PackedLiteral> = Trail::new(4);
        trail.push(lit(1), Reason::Decision);
        trail.push(lit(2), Reason::Propagated);
        trail.push(lit(-3), Reason::Pure);

        let mut vars: Vec<u32> = trail.iter().map(|s| s.lit.variable()).collect();
        vars.sort_unstable();
        vars.dedup();
        assert_eq!(vars.len(), trail.len());
    }
}
