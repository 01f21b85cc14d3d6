//! Matrix-level Lie group API.
//!
//! [`MatrixGroup`] exposes the operators of a [`LieGroup`] over heap-allocated
//! `DMatrix<f64>` / `DVector<f64>` values. Every input is validated before any
//! computation:
//!
//! - vectors must have length `DOF` ([`ManifoldError::DimensionMismatch`]),
//! - matrices must have shape `SHAPE` ([`ManifoldError::ShapeMismatch`]),
//! - all entries must be finite ([`ManifoldError::InvalidNumber`]),
//! - with [`MatrixGroupConfig::check_membership`] enabled, group matrices must
//!   satisfy the group constraints ([`ManifoldError::NotInGroup`]) and algebra
//!   matrices must lie in the Lie algebra ([`ManifoldError::NotInAlgebra`]).
//!
//! Failures are reported as [`LieError::Operation`] naming the group and the
//! operation.
//!
//! # Example
//! ```rust
//! use lieops::manifold::matrix::SE3Group;
//! use nalgebra::DVector;
//!
//! let group = SE3Group::new();
//! let xi = DVector::from_vec(vec![0.1, -0.2, 0.3, 0.01, 0.02, -0.03]);
//! let pose = group.exp_vector(&xi).unwrap();
//! let back = group.log_vector(&pose).unwrap();
//! assert!((back - xi).norm() < 1e-12);
//! ```

use crate::error::{LieError, LieResult};
use crate::manifold::{
    DenseMatrix, LieGroup, ManifoldError, ManifoldResult, Tangent, se2::SE2, se3::SE3, so2::SO2,
    so3::SO3,
};
use nalgebra::{DMatrix, DVector};
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::fmt;
use std::marker::PhantomData;
use tracing::debug;

/// Matrix layer for SO(2).
pub type SO2Group = MatrixGroup<SO2>;
/// Matrix layer for SO(3).
pub type SO3Group = MatrixGroup<SO3>;
/// Matrix layer for SE(2).
pub type SE2Group = MatrixGroup<SE2>;
/// Matrix layer for SE(3).
pub type SE3Group = MatrixGroup<SE3>;

/// Configuration of the matrix layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixGroupConfig {
    /// Reject matrix inputs that are not group (or algebra) elements
    pub check_membership: bool,
    /// Element-wise tolerance of the membership tests
    pub membership_tolerance: f64,
}

impl Default for MatrixGroupConfig {
    fn default() -> Self {
        Self {
            check_membership: true,
            membership_tolerance: 1e-6,
        }
    }
}

impl MatrixGroupConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable membership validation of matrix inputs
    pub fn with_check_membership(mut self, check_membership: bool) -> Self {
        self.check_membership = check_membership;
        self
    }

    /// Set the membership tolerance
    pub fn with_membership_tolerance(mut self, membership_tolerance: f64) -> Self {
        self.membership_tolerance = membership_tolerance;
        self
    }

    fn validate(&self) -> LieResult<()> {
        if !self.membership_tolerance.is_finite() || self.membership_tolerance <= 0.0 {
            return Err(LieError::InvalidConfig {
                field: "membership_tolerance",
                reason: format!(
                    "must be finite and positive, got {}",
                    self.membership_tolerance
                ),
            });
        }
        Ok(())
    }
}

/// Descriptor and matrix-level operators of the group `G`.
pub struct MatrixGroup<G: LieGroup> {
    config: MatrixGroupConfig,
    _group: PhantomData<fn() -> G>,
}

impl<G: LieGroup> Clone for MatrixGroup<G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<G: LieGroup> Copy for MatrixGroup<G> {}

impl<G: LieGroup> fmt::Debug for MatrixGroup<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatrixGroup")
            .field("group", &G::NAME)
            .field("config", &self.config)
            .finish()
    }
}

impl<G: LieGroup> Default for MatrixGroup<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: LieGroup> MatrixGroup<G> {
    /// Degrees of freedom (tangent vector length)
    pub const DOF: usize = G::DOF;

    /// Shape of group and algebra matrices
    pub const SHAPE: (usize, usize) = (G::MATRIX_SIZE, G::MATRIX_SIZE);

    /// Create a matrix layer with the default configuration.
    pub fn new() -> Self {
        Self {
            config: MatrixGroupConfig::default(),
            _group: PhantomData,
        }
    }

    /// Create a matrix layer with the given configuration.
    ///
    /// # Errors
    /// [`LieError::InvalidConfig`] if the membership tolerance is not finite and positive.
    pub fn with_config(config: MatrixGroupConfig) -> LieResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            _group: PhantomData,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &MatrixGroupConfig {
        &self.config
    }

    /// Group name, e.g. `"SE(3)"`.
    pub fn name(&self) -> &'static str {
        G::NAME
    }

    pub fn dof(&self) -> usize {
        Self::DOF
    }

    pub fn shape(&self) -> (usize, usize) {
        Self::SHAPE
    }

    /// Map a tangent vector to its Lie algebra matrix.
    pub fn wedge(&self, x: &DVector<f64>) -> LieResult<DMatrix<f64>> {
        let tangent = self.tangent("wedge", x)?;
        Ok(tangent.hat().to_dense())
    }

    /// Map a Lie algebra matrix to its tangent vector (length `DOF`).
    pub fn vee(&self, xi: &DMatrix<f64>) -> LieResult<DVector<f64>> {
        let tangent = self.algebra("vee", xi)?;
        Ok(tangent.to_dvector())
    }

    /// Matrix exponential of a Lie algebra matrix.
    pub fn exp(&self, xi: &DMatrix<f64>) -> LieResult<DMatrix<f64>> {
        let tangent = self.algebra("exp", xi)?;
        Ok(tangent.exp(None).matrix().to_dense())
    }

    /// Matrix logarithm of a group matrix, on the principal branch.
    pub fn log(&self, x: &DMatrix<f64>) -> LieResult<DMatrix<f64>> {
        let element = self.element("log", x)?;
        Ok(element.log(None).hat().to_dense())
    }

    /// Capital Exp: `exp(wedge(x))`.
    pub fn exp_vector(&self, x: &DVector<f64>) -> LieResult<DMatrix<f64>> {
        let tangent = self.tangent("Exp", x)?;
        Ok(tangent.exp(None).matrix().to_dense())
    }

    /// Capital Log: `vee(log(x))`, always of length `DOF`.
    pub fn log_vector(&self, x: &DMatrix<f64>) -> LieResult<DVector<f64>> {
        let element = self.element("Log", x)?;
        Ok(element.log(None).to_dvector())
    }

    pub fn inverse(&self, x: &DMatrix<f64>) -> LieResult<DMatrix<f64>> {
        let element = self.element("inverse", x)?;
        Ok(element.inverse(None).matrix().to_dense())
    }

    /// Group product `a · b`.
    pub fn compose(&self, a: &DMatrix<f64>, b: &DMatrix<f64>) -> LieResult<DMatrix<f64>> {
        let a = self.element("compose", a)?;
        let b = self.element("compose", b)?;
        Ok(a.compose(&b, None, None).matrix().to_dense())
    }

    /// Left Jacobian `J_l(x)`, `DOF × DOF`.
    pub fn left_jacobian(&self, x: &DVector<f64>) -> LieResult<DMatrix<f64>> {
        let tangent = self.tangent("left_jacobian", x)?;
        Ok(tangent.left_jacobian().to_dense())
    }

    /// Closed-form inverse of the left Jacobian.
    pub fn left_jacobian_inv(&self, x: &DVector<f64>) -> LieResult<DMatrix<f64>> {
        let tangent = self.tangent("left_jacobian_inv", x)?;
        Ok(tangent.left_jacobian_inv().to_dense())
    }

    /// Right Jacobian `J_r(x) = J_l(-x)`.
    pub fn right_jacobian(&self, x: &DVector<f64>) -> LieResult<DMatrix<f64>> {
        let tangent = self.tangent("right_jacobian", x)?;
        Ok(tangent.right_jacobian().to_dense())
    }

    pub fn right_jacobian_inv(&self, x: &DVector<f64>) -> LieResult<DMatrix<f64>> {
        let tangent = self.tangent("right_jacobian_inv", x)?;
        Ok(tangent.right_jacobian_inv().to_dense())
    }

    /// Adjoint matrix of a group element, `DOF × DOF`.
    pub fn adjoint(&self, x: &DMatrix<f64>) -> LieResult<DMatrix<f64>> {
        let element = self.element("adjoint", x)?;
        Ok(element.adjoint().to_dense())
    }

    /// Small adjoint `ad(x)`, the adjoint of the Lie algebra.
    pub fn curlywedge(&self, x: &DVector<f64>) -> LieResult<DMatrix<f64>> {
        let tangent = self.tangent("curlywedge", x)?;
        Ok(tangent.small_adj().to_dense())
    }

    /// Odot matrix of a point: `wedge(a) · b == odot(b) · a`.
    ///
    /// Pose groups take a homogeneous point; a Cartesian point (one entry
    /// shorter) is homogenised with a trailing 1.
    pub fn odot(&self, b: &DVector<f64>) -> LieResult<DMatrix<f64>> {
        let point = self
            .point(b)
            .map_err(|source| self.fail("odot", source))?;
        Ok(G::TangentVector::odot(&point).to_dense())
    }

    /// Random group element from the thread-local generator.
    pub fn random(&self) -> DMatrix<f64> {
        G::random().matrix().to_dense()
    }

    /// Random group element from the given generator.
    pub fn random_with<R: Rng + ?Sized>(&self, rng: &mut R) -> DMatrix<f64> {
        G::random_with(rng).matrix().to_dense()
    }

    /// Whether `x` is a group element within the configured tolerance.
    ///
    /// Checks membership regardless of [`MatrixGroupConfig::check_membership`].
    pub fn is_element(&self, x: &DMatrix<f64>) -> bool {
        self.check_shape(x)
            .and_then(|_| check_group_membership::<G>(x, self.config.membership_tolerance))
            .is_ok()
    }

    /// Capital Exp over a batch of tangent vectors. The first error aborts the batch.
    pub fn exp_batch(&self, xs: &[DVector<f64>]) -> LieResult<Vec<DMatrix<f64>>> {
        debug!("{} exp_batch over {} vectors", G::NAME, xs.len());

        #[cfg(feature = "parallel")]
        let result = xs.par_iter().map(|x| self.exp_vector(x)).collect();
        #[cfg(not(feature = "parallel"))]
        let result = xs.iter().map(|x| self.exp_vector(x)).collect();

        result
    }

    /// Capital Log over a batch of group matrices. The first error aborts the batch.
    pub fn log_batch(&self, xs: &[DMatrix<f64>]) -> LieResult<Vec<DVector<f64>>> {
        debug!("{} log_batch over {} matrices", G::NAME, xs.len());

        #[cfg(feature = "parallel")]
        let result = xs.par_iter().map(|x| self.log_vector(x)).collect();
        #[cfg(not(feature = "parallel"))]
        let result = xs.iter().map(|x| self.log_vector(x)).collect();

        result
    }

    fn fail(&self, operation: &'static str, source: ManifoldError) -> LieError {
        debug!("{} {operation} rejected its input: {source}", G::NAME);
        LieError::Operation {
            group: G::NAME,
            operation,
            source,
        }
    }

    fn tangent(&self, operation: &'static str, x: &DVector<f64>) -> LieResult<G::TangentVector> {
        G::TangentVector::from_dvector(x).map_err(|source| self.fail(operation, source))
    }

    fn element(&self, operation: &'static str, x: &DMatrix<f64>) -> LieResult<G> {
        self.parse_element(x)
            .map_err(|source| self.fail(operation, source))
    }

    fn algebra(&self, operation: &'static str, xi: &DMatrix<f64>) -> LieResult<G::TangentVector> {
        self.parse_algebra(xi)
            .map_err(|source| self.fail(operation, source))
    }

    fn check_shape(&self, x: &DMatrix<f64>) -> ManifoldResult<()> {
        if x.shape() != Self::SHAPE {
            return Err(ManifoldError::ShapeMismatch {
                expected: Self::SHAPE,
                actual: x.shape(),
            });
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(ManifoldError::InvalidNumber);
        }
        Ok(())
    }

    fn parse_element(&self, x: &DMatrix<f64>) -> ManifoldResult<G> {
        self.check_shape(x)?;
        if self.config.check_membership {
            check_group_membership::<G>(x, self.config.membership_tolerance)?;
        }
        Ok(G::from_matrix(&G::LieAlgebra::from_dense_slice(x.as_slice())))
    }

    fn parse_algebra(&self, xi: &DMatrix<f64>) -> ManifoldResult<G::TangentVector> {
        self.check_shape(xi)?;
        let tangent = G::TangentVector::vee(&G::LieAlgebra::from_dense_slice(xi.as_slice()));

        if self.config.check_membership {
            let deviation = (tangent.hat().to_dense() - xi).amax();
            if deviation > self.config.membership_tolerance {
                return Err(ManifoldError::NotInAlgebra {
                    group: G::NAME,
                    reason: format!(
                        "entries deviate from the algebra structure by {deviation:e}"
                    ),
                });
            }
        }

        Ok(tangent)
    }

    fn point(&self, b: &DVector<f64>) -> ManifoldResult<G::Point> {
        let rows = <G::Point as DenseMatrix>::ROWS;
        let homogeneous = G::MATRIX_SIZE == G::DIM + 1;

        let data = if b.len() == rows {
            b.clone()
        } else if homogeneous && b.len() == G::DIM {
            DVector::from_iterator(rows, b.iter().copied().chain(std::iter::once(1.0)))
        } else {
            return Err(ManifoldError::DimensionMismatch {
                expected: rows,
                actual: b.len(),
            });
        };

        if data.iter().any(|v| !v.is_finite()) {
            return Err(ManifoldError::InvalidNumber);
        }

        Ok(G::Point::from_dense_slice(data.as_slice()))
    }
}

/// Check the group constraints of a matrix already known to have the right shape:
/// an orthogonal rotation block with determinant +1 and, for pose groups, the
/// homogeneous bottom row `[0 … 0 1]`.
fn check_group_membership<G: LieGroup>(x: &DMatrix<f64>, tolerance: f64) -> ManifoldResult<()> {
    let n = G::DIM;
    let rotation = x.view((0, 0), (n, n)).clone_owned();

    let orthogonality = (rotation.transpose() * &rotation - DMatrix::identity(n, n)).amax();
    if orthogonality > tolerance {
        return Err(ManifoldError::NotInGroup {
            group: G::NAME,
            reason: format!("rotation block is not orthogonal (max |RᵀR - I| = {orthogonality:e})"),
        });
    }

    let det = rotation.determinant();
    if (det - 1.0).abs() > tolerance {
        return Err(ManifoldError::NotInGroup {
            group: G::NAME,
            reason: format!("rotation block has determinant {det}, expected 1"),
        });
    }

    if G::MATRIX_SIZE == n + 1 {
        let bottom_ok = (0..n).all(|j| x[(n, j)].abs() <= tolerance)
            && (x[(n, n)] - 1.0).abs() <= tolerance;
        if !bottom_ok {
            return Err(ManifoldError::NotInGroup {
                group: G::NAME,
                reason: format!(
                    "bottom row is {:?}, expected [0 ... 0 1]",
                    x.row(n).iter().collect::<Vec<_>>()
                ),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const TOLERANCE: f64 = 1e-12;

    #[test]
    fn test_descriptor_constants() {
        assert_eq!(SO2Group::DOF, 1);
        assert_eq!(SO2Group::SHAPE, (2, 2));
        assert_eq!(SO3Group::DOF, 3);
        assert_eq!(SO3Group::SHAPE, (3, 3));
        assert_eq!(SE2Group::DOF, 3);
        assert_eq!(SE2Group::SHAPE, (3, 3));
        assert_eq!(SE3Group::DOF, 6);
        assert_eq!(SE3Group::SHAPE, (4, 4));
        assert_eq!(SE3Group::new().name(), "SE(3)");
    }

    #[test]
    fn test_config_defaults_and_builder() {
        let config = MatrixGroupConfig::new();
        assert!(config.check_membership);
        assert_eq!(config.membership_tolerance, 1e-6);

        let config = MatrixGroupConfig::new()
            .with_check_membership(false)
            .with_membership_tolerance(1e-3);
        let group = SO3Group::with_config(config).unwrap();
        assert!(!group.config().check_membership);
        assert_eq!(group.config().membership_tolerance, 1e-3);
    }

    #[test]
    fn test_config_rejects_bad_tolerance() {
        for tolerance in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = MatrixGroupConfig::new().with_membership_tolerance(tolerance);
            let err = SE2Group::with_config(config).unwrap_err();
            assert!(matches!(
                err,
                LieError::InvalidConfig {
                    field: "membership_tolerance",
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_so3_wedge_scenario() {
        let group = SO3Group::new();
        let x = DVector::from_vec(vec![0.05, -0.02, 0.1]);
        let xi = group.wedge(&x).unwrap();
        let expected = DMatrix::from_row_slice(
            3,
            3,
            &[0.0, -0.1, -0.02, 0.1, 0.0, -0.05, 0.02, 0.05, 0.0],
        );
        assert_eq!(xi, expected);
        assert_eq!(group.vee(&xi).unwrap(), x);
    }

    #[test]
    fn test_so2_vee_is_a_column() {
        let group = SO2Group::new();
        let x = DVector::from_vec(vec![0.4]);
        let v = group.vee(&group.wedge(&x).unwrap()).unwrap();
        assert_eq!(v.shape(), (1, 1));
        assert_eq!(group.log_vector(&group.exp_vector(&x).unwrap()).unwrap().len(), 1);
    }

    #[test]
    fn test_wedge_wrong_length() {
        let err = SE3Group::new()
            .wedge(&DVector::from_vec(vec![1.0, 2.0, 3.0]))
            .unwrap_err();
        assert_eq!(
            err.manifold_error(),
            Some(&ManifoldError::DimensionMismatch {
                expected: 6,
                actual: 3
            })
        );
        assert_eq!(err.to_string(), "SE(3) wedge failed");
        assert!(err.chain().contains("expected vector of length 6, got 3"));
    }

    #[test]
    fn test_vee_wrong_shape() {
        let err = SE2Group::new().vee(&DMatrix::zeros(4, 4)).unwrap_err();
        assert_eq!(
            err.manifold_error(),
            Some(&ManifoldError::ShapeMismatch {
                expected: (3, 3),
                actual: (4, 4)
            })
        );
        assert!(err.chain_compact().contains("expected 3x3 matrix, got 4x4"));
    }

    #[test]
    fn test_nan_input_rejected() {
        let group = SO3Group::new();
        let err = group
            .exp_vector(&DVector::from_vec(vec![0.1, f64::NAN, 0.0]))
            .unwrap_err();
        assert_eq!(err.manifold_error(), Some(&ManifoldError::InvalidNumber));

        let mut m = DMatrix::identity(3, 3);
        m[(0, 0)] = f64::INFINITY;
        assert!(group.log(&m).is_err());
    }

    #[test]
    fn test_non_group_element_rejected() {
        let group = SE3Group::new();
        let mut m = DMatrix::identity(4, 4);
        m[(0, 0)] = 2.0;
        let err = group.log_vector(&m).unwrap_err();
        assert!(matches!(
            err.manifold_error(),
            Some(ManifoldError::NotInGroup { group: "SE(3)", .. })
        ));

        let mut m = DMatrix::identity(4, 4);
        m[(3, 0)] = 0.5;
        assert!(group.inverse(&m).is_err());

        // Reflection: orthogonal but det = -1
        let mut m = DMatrix::identity(3, 3);
        m[(2, 2)] = -1.0;
        assert!(SO3Group::new().adjoint(&m).is_err());
    }

    #[test]
    fn test_membership_check_can_be_disabled() {
        let config = MatrixGroupConfig::new().with_check_membership(false);
        let group = SO2Group::with_config(config).unwrap();
        let m = DMatrix::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 2.0]);
        assert!(group.log(&m).is_ok());
        assert!(!group.is_element(&m));
    }

    #[test]
    fn test_non_algebra_matrix_rejected() {
        let group = SO3Group::new();
        let xi = DMatrix::from_row_slice(3, 3, &[0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let err = group.exp(&xi).unwrap_err();
        assert!(matches!(
            err.manifold_error(),
            Some(ManifoldError::NotInAlgebra { .. })
        ));

        let mut xi = DMatrix::zeros(4, 4);
        xi[(3, 3)] = 1.0;
        assert!(SE3Group::new().vee(&xi).is_err());
    }

    #[test]
    fn test_is_element() {
        let group = SE2Group::new();
        let mut rng = StdRng::seed_from_u64(11);
        assert!(group.is_element(&group.random_with(&mut rng)));
        assert!(group.is_element(&DMatrix::identity(3, 3)));
        assert!(!group.is_element(&DMatrix::identity(4, 4)));
        assert!(!group.is_element(&DMatrix::zeros(3, 3)));
    }

    #[test]
    fn test_odot_homogenises_cartesian_points() {
        let group = SE3Group::new();
        let cartesian = DVector::from_vec(vec![1.0, -2.0, 0.5]);
        let homogeneous = DVector::from_vec(vec![1.0, -2.0, 0.5, 1.0]);
        let a = group.odot(&cartesian).unwrap();
        let b = group.odot(&homogeneous).unwrap();
        assert_eq!(a.shape(), (4, 6));
        assert_eq!(a, b);

        let err = group
            .odot(&DVector::from_vec(vec![1.0, 2.0]))
            .unwrap_err();
        assert_eq!(
            err.manifold_error(),
            Some(&ManifoldError::DimensionMismatch {
                expected: 4,
                actual: 2
            })
        );
    }

    #[test]
    fn test_odot_rotation_group_needs_full_point() {
        let group = SO3Group::new();
        assert_eq!(group.odot(&DVector::from_vec(vec![1.0, 2.0, 3.0])).unwrap().shape(), (3, 3));
        assert!(group.odot(&DVector::from_vec(vec![1.0, 2.0])).is_err());
    }

    #[test]
    fn test_compose_and_inverse() {
        let group = SE3Group::new();
        let mut rng = StdRng::seed_from_u64(3);
        let a = group.random_with(&mut rng);
        let b = group.random_with(&mut rng);
        let ab = group.compose(&a, &b).unwrap();
        assert!((&ab - &a * &b).norm() < TOLERANCE);
        let identity = group.compose(&a, &group.inverse(&a).unwrap()).unwrap();
        assert!((identity - DMatrix::identity(4, 4)).norm() < TOLERANCE);
    }

    #[test]
    fn test_right_jacobian_is_left_at_negated() {
        let group = SE2Group::new();
        let x = DVector::from_vec(vec![0.3, -0.4, 0.9]);
        let jr = group.right_jacobian(&x).unwrap();
        let jl = group.left_jacobian(&(-&x)).unwrap();
        assert!((jr - jl).norm() < TOLERANCE);
        let product = group.right_jacobian(&x).unwrap() * group.right_jacobian_inv(&x).unwrap();
        assert!((product - DMatrix::identity(3, 3)).norm() < TOLERANCE);
    }

    #[test]
    fn test_curlywedge_gives_lie_bracket() {
        let group = SO3Group::new();
        let a = DVector::from_vec(vec![0.1, 0.2, -0.3]);
        let b = DVector::from_vec(vec![-0.5, 0.4, 0.2]);
        let wa = group.wedge(&a).unwrap();
        let wb = group.wedge(&b).unwrap();
        let bracket = group.vee(&(&wa * &wb - &wb * &wa)).unwrap();
        assert!((group.curlywedge(&a).unwrap() * b - bracket).norm() < TOLERANCE);
    }

    #[test]
    fn test_batch_matches_single() {
        let group = SE3Group::new();
        let mut rng = StdRng::seed_from_u64(21);
        let xs: Vec<DVector<f64>> = (0..16)
            .map(|_| DVector::from_fn(6, |_, _| rng.random_range(-1.0..1.0)))
            .collect();

        let poses = group.exp_batch(&xs).unwrap();
        for (x, pose) in xs.iter().zip(&poses) {
            assert_eq!(pose, &group.exp_vector(x).unwrap());
        }

        let logs = group.log_batch(&poses).unwrap();
        for (x, log) in xs.iter().zip(&logs) {
            assert!((x - log).norm() < 1e-10);
        }
    }

    #[test]
    fn test_batch_propagates_errors() {
        let group = SO2Group::new();
        let xs = vec![DVector::from_vec(vec![0.1]), DVector::from_vec(vec![0.1, 0.2])];
        assert!(group.exp_batch(&xs).is_err());
    }
}
