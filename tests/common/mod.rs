//! Shared helpers for the integration tests.

#![allow(dead_code)]

use nalgebra::{DMatrix, DVector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Number of random samples drawn per property.
pub const SAMPLES: usize = 50;

/// Deterministic generator so failures are reproducible.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Vector with entries uniform in [-scale, scale].
pub fn random_vector<R: Rng>(rng: &mut R, len: usize, scale: f64) -> DVector<f64> {
    DVector::from_fn(len, |_, _| rng.random_range(-scale..scale))
}

/// Largest absolute entry-wise difference.
pub fn max_abs_diff(a: &DMatrix<f64>, b: &DMatrix<f64>) -> f64 {
    assert_eq!(a.shape(), b.shape(), "shape mismatch in comparison");
    (a - b).amax()
}

/// Principal matrix square root by the Denman-Beavers iteration.
fn sqrtm(a: &DMatrix<f64>) -> DMatrix<f64> {
    let n = a.nrows();
    let mut y = a.clone();
    let mut z = DMatrix::<f64>::identity(n, n);

    for _ in 0..100 {
        let y_inv = y.clone().try_inverse().expect("Denman-Beavers iterate is singular");
        let z_inv = z.clone().try_inverse().expect("Denman-Beavers iterate is singular");
        let y_next = (&y + z_inv) * 0.5;
        let z_next = (&z + y_inv) * 0.5;
        let step = (&y_next - &y).norm();
        y = y_next;
        z = z_next;
        if step < 1e-15 * y.norm() {
            break;
        }
    }

    y
}

/// Principal matrix logarithm by inverse scaling and squaring.
///
/// Square roots are taken until the matrix is close to the identity, then the
/// series of log(I + E) is summed and scaled back by 2^k.
pub fn matrix_log(a: &DMatrix<f64>) -> DMatrix<f64> {
    let n = a.nrows();
    let identity = DMatrix::<f64>::identity(n, n);

    let mut x = a.clone();
    let mut k = 0;
    while (&x - &identity).norm() > 0.05 {
        assert!(k < 60, "matrix logarithm oracle failed to converge");
        x = sqrtm(&x);
        k += 1;
    }

    let e = &x - &identity;
    let mut sum = DMatrix::<f64>::zeros(n, n);
    let mut power = identity.clone();
    for j in 1..=40 {
        power = &power * &e;
        let sign = if j % 2 == 1 { 1.0 } else { -1.0 };
        sum += &power * (sign / j as f64);
    }

    sum * 2f64.powi(k)
}

#[test]
fn test_matrix_log_oracle_on_known_rotation() {
    let angle: f64 = 2.5;
    let r = DMatrix::from_row_slice(
        2,
        2,
        &[angle.cos(), -angle.sin(), angle.sin(), angle.cos()],
    );
    let log = matrix_log(&r);
    let expected = DMatrix::from_row_slice(2, 2, &[0.0, -angle, angle, 0.0]);
    assert!(max_abs_diff(&log, &expected) < 1e-10);
}
