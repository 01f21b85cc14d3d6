//! Timing benchmark for the core group operators.
//!
//! Measures the typed layer (fixed-size nalgebra types) and the validating
//! matrix layer side by side, for every group, on seeded random inputs.
//!
//! ## Timing Methodology:
//! - Inputs are sampled before the clock starts
//! - Each operation runs over the whole input set, `ROUNDS` times
//! - Results are reported as nanoseconds per call
//!
//! ```bash
//! cargo bench --bench group_ops
//! RUST_LOG=warn cargo bench --bench group_ops --features parallel
//! ```

use lieops::init_logger;
use lieops::manifold::matrix::MatrixGroup;
use lieops::manifold::{LieGroup, Tangent};
use lieops::{SE2, SE3, SO2, SO3};
use nalgebra::{DMatrix, DVector};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::hint::black_box;
use std::time::Instant;
use tracing::info;

const SAMPLES: usize = 1_000;
const ROUNDS: usize = 20;

/// Run `op` over every input `ROUNDS` times and log the mean cost per call.
fn time_op<T, F>(group: &str, operation: &str, inputs: &[T], mut op: F)
where
    F: FnMut(&T),
{
    let start = Instant::now();
    for _ in 0..ROUNDS {
        for input in inputs {
            op(black_box(input));
        }
    }
    let per_call = start.elapsed().as_nanos() as f64 / (ROUNDS * inputs.len()) as f64;
    info!("{group:>6} {operation:<20} {per_call:>10.1} ns/call");
}

fn bench_group<G: LieGroup>(seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let group = MatrixGroup::<G>::new();

    let elements: Vec<G> = (0..SAMPLES).map(|_| G::random_with(&mut rng)).collect();
    let tangents: Vec<G::TangentVector> = (0..SAMPLES)
        .map(|_| G::TangentVector::random_with(&mut rng))
        .collect();
    let matrices: Vec<DMatrix<f64>> = (0..SAMPLES).map(|_| group.random_with(&mut rng)).collect();
    let vectors: Vec<DVector<f64>> = tangents.iter().map(|t| t.to_dvector()).collect();

    time_op(G::NAME, "typed exp", &tangents, |t| {
        black_box(t.exp(None));
    });
    time_op(G::NAME, "typed log", &elements, |g| {
        black_box(g.log(None));
    });
    time_op(G::NAME, "typed compose", &elements, |g| {
        black_box(g.compose(g, None, None));
    });
    time_op(G::NAME, "typed left_jacobian", &tangents, |t| {
        black_box(t.left_jacobian());
    });
    time_op(G::NAME, "typed left_jac_inv", &tangents, |t| {
        black_box(t.left_jacobian_inv());
    });

    time_op(G::NAME, "matrix Exp", &vectors, |x| {
        black_box(group.exp_vector(x).ok());
    });
    time_op(G::NAME, "matrix Log", &matrices, |x| {
        black_box(group.log_vector(x).ok());
    });
    time_op(G::NAME, "matrix adjoint", &matrices, |x| {
        black_box(group.adjoint(x).ok());
    });

    let start = Instant::now();
    for _ in 0..ROUNDS {
        black_box(group.log_batch(&matrices).ok());
    }
    let per_call = start.elapsed().as_nanos() as f64 / (ROUNDS * SAMPLES) as f64;
    info!("{:>6} {:<20} {per_call:>10.1} ns/call", G::NAME, "matrix log_batch");
}

fn main() {
    init_logger();

    info!("Benchmarking group operators ({SAMPLES} samples x {ROUNDS} rounds)");
    bench_group::<SO2>(1);
    bench_group::<SO3>(2);
    bench_group::<SE2>(3);
    bench_group::<SE3>(4);
}
