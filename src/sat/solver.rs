#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The solver façade: verdict types, the engine interface, and the variant
//! dispatcher.
//!
//! A solve either produces a model ([`Solutions`]) or nothing, meaning the
//! formula is unsatisfiable. Conflicts encountered during search are
//! internal signals and never surface as errors.

use crate::sat::clause_storage::LiteralStorage;
use crate::sat::cnf::Cnf;
use crate::sat::dp::Dp;
use crate::sat::dpll::Dpll;
use crate::sat::literal::{Literal, PackedLiteral, Variable};
use crate::sat::watchers::WatcherEngine;
use itertools::Itertools;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use std::fmt::Display;
use std::num::NonZeroI32;
use std::str::FromStr;

/// A satisfying assignment, stored as signed DIMACS literals: `v` when the
/// variable is true, `-v` when false. Covers every variable of the formula;
/// variables the search never touched are completed with an arbitrary
/// (negative) polarity.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Solutions {
    literals: FxHashSet<NonZeroI32>,
}

impl Solutions {
    /// Builds a model from signed literals. Zeros are ignored.
    #[must_use]
    pub fn new(literals: &[i32]) -> Self {
        Self {
            literals: literals.iter().copied().filter_map(NonZeroI32::new).collect(),
        }
    }

    /// Adds a signed literal; `0` is ignored.
    pub fn push(&mut self, literal: i32) {
        if let Some(l) = NonZeroI32::new(literal) {
            self.literals.insert(l);
        }
    }

    /// `true` if the model makes the given literal true.
    #[must_use]
    pub fn check(&self, literal: NonZeroI32) -> bool {
        self.literals.contains(&literal)
    }

    /// The polarity the model assigns to `var`, if any.
    #[must_use]
    pub fn value_of(&self, var: Variable) -> Option<bool> {
        #[allow(clippy::cast_possible_wrap)]
        let signed = var as i32;
        NonZeroI32::new(signed).and_then(|v| {
            if self.literals.contains(&v) {
                Some(true)
            } else if self.literals.contains(&-v) {
                Some(false)
            } else {
                None
            }
        })
    }

    /// Number of assigned variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// `true` when no variable is assigned (the model of the empty
    /// formula).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// The literals of the model, ordered by variable.
    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.literals
            .iter()
            .map(|l| l.get())
            .sorted_by_key(|l| l.unsigned_abs())
    }
}

impl Display for Solutions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.iter().join(" "))
    }
}

/// Counters reported by an engine after a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolveStats {
    /// Branching decisions taken (both polarities of a split count).
    pub decisions: usize,
    /// Literals assigned by unit propagation or pure-literal elimination.
    pub propagations: usize,
    /// Clauses examined while hunting for units or servicing watchers.
    pub inspections: usize,
}

/// Common interface of the search engines.
pub trait Solver<L: Literal = PackedLiteral, S: LiteralStorage<L> = SmallVec<[L; 8]>> {
    /// Builds the engine in its default configuration for `cnf`.
    fn new(cnf: Cnf<L, S>) -> Self;

    /// Runs the search to completion. `Some` carries a model, `None` means
    /// unsatisfiable.
    fn solve(&mut self) -> Option<Solutions>;

    /// Counters accumulated by the last [`Self::solve`] call.
    fn stats(&self) -> SolveStats;
}

/// The search procedure to dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Davis-Putnam with first-literal branching.
    DpDefault,
    /// Davis-Putnam with frequency-heuristic branching.
    Dp,
    /// Trail-based DPLL, first-literal branching, no pure-literal rule.
    ClassicalDpll,
    /// Trail-based DPLL with heuristic branching and pure literals.
    Dpll,
    /// DPLL driven by the two-literal watcher index.
    DpllWatchers,
}

impl Variant {
    /// All variants, in dependency order. Handy for agreement tests and the
    /// benchmark driver.
    pub const ALL: [Self; 5] = [
        Self::DpDefault,
        Self::Dp,
        Self::ClassicalDpll,
        Self::Dpll,
        Self::DpllWatchers,
    ];

    /// The name used on the command line and in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::DpDefault => "dp_default",
            Self::Dp => "dp",
            Self::ClassicalDpll => "classical_dpll",
            Self::Dpll => "dpll",
            Self::DpllWatchers => "dpll_watchers",
        }
    }
}

impl Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dp_default" => Ok(Self::DpDefault),
            "dp" => Ok(Self::Dp),
            "classical_dpll" => Ok(Self::ClassicalDpll),
            "dpll" => Ok(Self::Dpll),
            "dpll_watchers" => Ok(Self::DpllWatchers),
            other => Err(format!("unknown solver variant: {other}")),
        }
    }
}

/// Solves `cnf` with the selected variant.
pub fn solve<L: Literal, S: LiteralStorage<L>>(
    cnf: Cnf<L, S>,
    variant: Variant,
) -> Option<Solutions> {
    solve_with_stats(cnf, variant).0
}

/// Solves `cnf` and also reports the engine counters, for hosts that log
/// per-run statistics.
pub fn solve_with_stats<L: Literal, S: LiteralStorage<L>>(
    cnf: Cnf<L, S>,
    variant: Variant,
) -> (Option<Solutions>, SolveStats) {
    match variant {
        Variant::DpDefault => {
            let mut engine = Dp::classical(cnf);
            (engine.solve(), engine.stats())
        }
        Variant::Dp => {
            let mut engine = Dp::new(cnf);
            (engine.solve(), engine.stats())
        }
        Variant::ClassicalDpll => {
            let mut engine: Dpll<L, S> = Dpll::classical(cnf);
            (engine.solve(), engine.stats())
        }
        Variant::Dpll => {
            let mut engine: Dpll<L, S> = Dpll::new(cnf);
            (engine.solve(), engine.stats())
        }
        Variant::DpllWatchers => {
            let mut engine: WatcherEngine<L, S> = WatcherEngine::new(cnf);
            (engine.solve(), engine.stats())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::literal::NegativeLiteral;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn solve_dimacs(clauses: Vec<Vec<i32>>, variant: Variant) -> Option<Solutions> {
        let cnf: Cnf = Cnf::new(clauses);
        solve(cnf, variant)
    }

    fn check_all_variants(clauses: &[Vec<i32>], expect_sat: bool) {
        for variant in Variant::ALL {
            let cnf: Cnf = Cnf::new(clauses.to_vec());
            let result = solve(cnf.clone(), variant);
            assert_eq!(
                result.is_some(),
                expect_sat,
                "variant {variant} disagrees on {clauses:?}"
            );
            if let Some(model) = result {
                assert!(
                    cnf.verify(&model),
                    "variant {variant} returned a bad model {model} for {clauses:?}"
                );
            }
        }
    }

    #[test]
    fn empty_formula_is_sat() {
        check_all_variants(&[], true);
    }

    #[test]
    fn explicit_empty_clause_is_unsat() {
        check_all_variants(&[vec![1, 2], Vec::new()], false);
    }

    #[test]
    fn single_unit_clause() {
        for variant in Variant::ALL {
            let model = solve_dimacs(vec![vec![3]], variant).expect("satisfiable");
            assert_eq!(model.value_of(3), Some(true));
        }
    }

    #[test]
    fn contradictory_units_are_unsat() {
        check_all_variants(&[vec![1], vec![-1]], false);
    }

    #[test]
    fn small_satisfiable_formula() {
        // One witness: 1=true, 3=true, 2 either way.
        check_all_variants(
            &[vec![1, 2], vec![-1, 3], vec![-2, -3], vec![1, -3]],
            true,
        );
    }

    #[test]
    fn all_clauses_over_three_vars_is_unsat() {
        let clauses = vec![
            vec![1, 2, 3],
            vec![1, 2, -3],
            vec![1, -2, 3],
            vec![1, -2, -3],
            vec![-1, 2, 3],
            vec![-1, 2, -3],
            vec![-1, -2, 3],
            vec![-1, -2, -3],
        ];
        check_all_variants(&clauses, false);
    }

    #[test]
    fn tautology_only_formula_is_sat() {
        check_all_variants(&[vec![1, -1, 2]], true);
    }

    #[test]
    fn pure_literal_formula() {
        for variant in Variant::ALL {
            let model =
                solve_dimacs(vec![vec![1, 2], vec![1, -2]], variant).expect("satisfiable");
            assert_eq!(model.value_of(1), Some(true), "variant {variant}");
        }
    }

    /// Pigeonhole PHP(3,2): three pigeons into two holes. Variable
    /// `2p + h - 2` means pigeon `p` sits in hole `h`.
    fn pigeonhole_3_2() -> Vec<Vec<i32>> {
        vec![
            vec![1, 2],
            vec![3, 4],
            vec![5, 6],
            vec![-1, -3],
            vec![-1, -5],
            vec![-3, -5],
            vec![-2, -4],
            vec![-2, -6],
            vec![-4, -6],
        ]
    }

    #[test]
    fn pigeonhole_is_unsat_for_every_variant() {
        check_all_variants(&pigeonhole_3_2(), false);
    }

    #[test]
    fn negative_literal_encoding_agrees() {
        let clauses = vec![vec![1, 2], vec![-1, 3], vec![-2, -3], vec![1, -3]];
        let cnf: Cnf<NegativeLiteral, Vec<NegativeLiteral>> = Cnf::new(clauses);
        let model = solve(cnf.clone(), Variant::DpllWatchers).expect("satisfiable");
        assert!(cnf.verify(&model));
    }

    #[test]
    fn variant_names_round_trip() {
        for variant in Variant::ALL {
            assert_eq!(variant.name().parse::<Variant>(), Ok(variant));
        }
        assert!("cdcl".parse::<Variant>().is_err());
    }

    fn random_3sat(rng: &mut StdRng, num_vars: i32, num_clauses: usize) -> Vec<Vec<i32>> {
        (0..num_clauses)
            .map(|_| {
                let mut clause = Vec::with_capacity(3);
                while clause.len() < 3 {
                    let var = rng.gen_range(1..=num_vars);
                    if clause.as_slice().iter().any(|&l: &i32| l.abs() == var) {
                        continue;
                    }
                    clause.push(if rng.gen_bool(0.5) { var } else { -var });
                }
                clause
            })
            .collect()
    }

    #[test]
    fn variants_agree_on_random_3sat() {
        let mut rng = StdRng::seed_from_u64(0x5EED);
        for _ in 0..30 {
            let clauses = random_3sat(&mut rng, 12, 50);
            let reference = solve_dimacs(clauses.clone(), Variant::DpDefault).is_some();
            for variant in Variant::ALL {
                let cnf: Cnf = Cnf::new(clauses.clone());
                let result = solve(cnf.clone(), variant);
                assert_eq!(result.is_some(), reference, "variant {variant} disagrees");
                if let Some(model) = result {
                    assert!(cnf.verify(&model), "variant {variant} model fails");
                }
            }
        }
    }

    /// Sanity check that the watcher index is engaged: on phase-transition
    /// random 3-SAT the watcher engine should inspect far fewer clauses
    /// than the scanning DPLL on most instances.
    #[test]
    fn watchers_inspect_fewer_clauses_than_naive_dpll() {
        let mut rng = StdRng::seed_from_u64(0xF00D);
        let instances = 20;
        let mut watchers_cheaper = 0;
        for _ in 0..instances {
            let clauses = random_3sat(&mut rng, 50, 213);

            let cnf: Cnf = Cnf::new(clauses.clone());
            let (naive_result, naive) = solve_with_stats(cnf, Variant::Dpll);

            let cnf: Cnf = Cnf::new(clauses);
            let (watch_result, watched) = solve_with_stats(cnf, Variant::DpllWatchers);

            assert_eq!(naive_result.is_some(), watch_result.is_some());
            if watched.inspections < naive.inspections {
                watchers_cheaper += 1;
            }
        }
        assert!(
            watchers_cheaper * 10 >= instances * 8,
            "watchers cheaper on only {watchers_cheaper}/{instances} instances"
        );
    }
}
