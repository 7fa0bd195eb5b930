use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sat_engine::sat::cnf::Cnf;
use sat_engine::sat::solver::{solve, Variant};
use std::hint::black_box;
use std::time::Duration;

/// Pigeonhole PHP(3,2): three pigeons, two holes, unsatisfiable.
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

/// Uniform random 3-SAT; 4.26 clauses per variable sits at the phase
/// transition.
fn random_3sat(rng: &mut StdRng, num_vars: i32, num_clauses: usize) -> Vec<Vec<i32>> {
    (0..num_clauses)
        .map(|_| {
            let mut clause = Vec::with_capacity(3);
            while clause.len() < 3 {
                let var = rng.gen_range(1..=num_vars);
                if clause.iter().any(|&l: &i32| l.abs() == var) {
                    continue;
                }
                clause.push(if rng.gen_bool(0.5) { var } else { -var });
            }
            clause
        })
        .collect()
}

fn bench_pigeonhole(c: &mut Criterion) {
    let clauses = pigeonhole_3_2();
    let mut group = c.benchmark_group("pigeonhole_3_2");

    for variant in Variant::ALL {
        group.bench_with_input(
            BenchmarkId::from_parameter(variant),
            &clauses,
            |b, clauses| {
                b.iter(|| {
                    let cnf: Cnf = Cnf::new(clauses.clone());
                    black_box(solve(cnf, variant))
                })
            },
        );
    }
    group.finish();
}

fn bench_random_3sat(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let instances: Vec<Vec<Vec<i32>>> = (0..10).map(|_| random_3sat(&mut rng, 30, 128)).collect();

    let mut group = c.benchmark_group("random_3sat_30");
    group.sample_size(30);
    group.measurement_time(Duration::from_secs(10));

    // The copy-based DP engines are orders of magnitude slower here; the
    // trail engines are the interesting comparison.
    for variant in [Variant::ClassicalDpll, Variant::Dpll, Variant::DpllWatchers] {
        group.bench_with_input(
            BenchmarkId::from_parameter(variant),
            &instances,
            |b, instances| {
                b.iter(|| {
                    for clauses in instances {
                        let cnf: Cnf = Cnf::new(clauses.clone());
                        black_box(solve(cnf, variant));
                    }
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_pigeonhole, bench_random_3sat);
criterion_main!(benches);
