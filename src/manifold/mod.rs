//! Matrix Lie groups used in robotics and state estimation.
//!
//! This module provides the groups and their tangent spaces:
//! - **SO(2)**: Rotations in 2D
//! - **SO(3)**: Rotations in 3D
//! - **SE(2)**: Rigid transformations in 2D
//! - **SE(3)**: Rigid transformations in 3D
//!
//! Lie group M,° | shape | dof | X ∈ M           | Constraint          | tangent τ           | Exp(τ)        | Action
//! ------------- | ----- | --- | --------------- | ------------------- | ------------------- | ------------- | ------
//! Rotation      | 2×2   | 1   | R               | RᵀR = I, det R = 1  | [θ]                 | R = exp([θ]×) | Rx
//! Rigid motion  | 3×3   | 3   | M = [R t; 0 1]  | RᵀR = I, det R = 1  | [ρx, ρy, θ]         | Exp([τ]^)     | Rx+t
//! Rotation      | 3×3   | 3   | R               | RᵀR = I, det R = 1  | [θx, θy, θz]        | R = exp([θ]×) | Rx
//! Rigid motion  | 4×4   | 6   | M = [R t; 0 1]  | RᵀR = I, det R = 1  | [ρ(3), θ(3)]        | Exp([τ]^)     | Rx+t
//!
//! Two layers sit on top of each other:
//! - the typed layer ([`LieGroup`] and [`Tangent`], one struct per group) built on
//!   fixed-size nalgebra types,
//! - the matrix layer ([`matrix::MatrixGroup`]) working on `DMatrix`/`DVector`
//!   with shape and membership validation.
//!
//! Conventions follow the [manif](https://github.com/artivis/manif) C++ library
//! and Barfoot's *State Estimation for Robotics*: translation components come
//! first in pose tangents. Jacobians returned through `Option<&mut _>` arguments
//! follow manif's right-perturbation convention.

use nalgebra::{DMatrix, DVector, SMatrix};
use rand::Rng;
use std::fmt::Debug;
use std::ops::{Index, Mul, Neg};
use thiserror::Error;
use tracing::{debug, warn};

pub mod matrix;
pub mod se2;
pub mod se3;
pub mod so2;
pub mod so3;

/// Squared rotation angle below which closed forms switch to their Taylor expansions.
pub const SMALL_ANGLE_SQ: f64 = 1e-8;

/// Distance from π under which the logarithm's principal branch is ambiguous.
pub const NEAR_PI_TOLERANCE: f64 = 1e-6;

/// Errors that can occur during manifold operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ManifoldError {
    /// Tangent vector (or point) has the wrong length
    #[error("Dimension mismatch: expected vector of length {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Matrix argument has the wrong shape
    #[error(
        "Shape mismatch: expected {}x{} matrix, got {}x{}",
        .expected.0, .expected.1, .actual.0, .actual.1
    )]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// Matrix claimed to be a group element violates the group constraints
    #[error("Not an element of {group}: {reason}")]
    NotInGroup { group: &'static str, reason: String },

    /// Matrix claimed to be an algebra element has entries outside the algebra
    #[error("Not an element of the Lie algebra of {group}: {reason}")]
    NotInAlgebra { group: &'static str, reason: String },

    /// NaN or Inf detected in an input
    #[error("Invalid number: NaN or Inf detected")]
    InvalidNumber,
}

/// Result type for manifold operations.
pub type ManifoldResult<T> = Result<T, ManifoldError>;

/// Near-singular regimes reported while evaluating closed forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NumericalRegime {
    /// Rotation angle close to zero, Taylor expansion used
    SmallAngle,
    /// Rotation angle close to ±π, principal branch ambiguous
    NearPi,
}

/// Report a numerical-instability warning. The result is still computed by the
/// caller through the stable branch.
pub(crate) fn report_instability(
    group: &'static str,
    operation: &'static str,
    regime: NumericalRegime,
    angle: f64,
) {
    match regime {
        NumericalRegime::SmallAngle => {
            debug!("{group} {operation}: small-angle branch taken (angle = {angle:e})")
        }
        NumericalRegime::NearPi => warn!(
            "{group} {operation}: rotation angle {angle} is within {NEAR_PI_TOLERANCE:e} of π, \
             the principal branch is ambiguous"
        ),
    }
}

/// Fixed-size matrix types that can cross into the dynamically-sized matrix layer.
pub trait DenseMatrix: Clone + Debug + PartialEq + Send + Sync {
    /// Number of rows
    const ROWS: usize;
    /// Number of columns
    const COLS: usize;

    /// Copy into a heap-allocated matrix.
    fn to_dense(&self) -> DMatrix<f64>;

    /// Build from column-major data. `data.len()` must be `ROWS * COLS`.
    fn from_dense_slice(data: &[f64]) -> Self;
}

impl<const R: usize, const C: usize> DenseMatrix for SMatrix<f64, R, C> {
    const ROWS: usize = R;
    const COLS: usize = C;

    fn to_dense(&self) -> DMatrix<f64> {
        DMatrix::from_column_slice(R, C, self.as_slice())
    }

    fn from_dense_slice(data: &[f64]) -> Self {
        SMatrix::<f64, R, C>::from_column_slice(data)
    }
}

/// Core trait for Lie group operations.
///
/// This trait provides the fundamental operations for Lie groups, including:
/// - Group operations (composition, inverse, identity)
/// - The logarithmic map and the matrix representation
/// - Lie group plus/minus operations with Jacobians
/// - Adjoint and group action
/// - Random sampling through an injected RNG
///
/// # Dimensions
///
/// - `DIM`: dimension of the space the group acts on (2 for SE(2), 3 for SO(3))
/// - `DOF`: degrees of freedom, the tangent space dimension
/// - `MATRIX_SIZE`: side length of the square matrix representation
pub trait LieGroup: Clone + PartialEq + Debug + Send + Sync {
    /// The tangent space vector type
    type TangentVector: Tangent<Self>;

    /// The Jacobian matrix type (`DOF × DOF`)
    type JacobianMatrix: DenseMatrix
        + Neg<Output = Self::JacobianMatrix>
        + Mul<Output = Self::JacobianMatrix>
        + Index<(usize, usize), Output = f64>;

    /// Square matrix type shared by group elements and Lie algebra elements
    type LieAlgebra: DenseMatrix;

    /// Vector the group acts on (homogeneous for pose groups)
    type Point: DenseMatrix;

    /// Matrix produced by the odot operator, `Point` rows by `DOF` columns
    type OdotMatrix: DenseMatrix;

    /// Human-readable group name used in errors and logs
    const NAME: &'static str;

    /// Dimension of the space the group acts on
    const DIM: usize;

    /// Degrees of freedom
    const DOF: usize;

    /// Side length of the matrix representation
    const MATRIX_SIZE: usize;

    /// The neutral element e such that e ∘ g = g ∘ e = g.
    fn identity() -> Self;

    /// Compute the inverse of this group element.
    ///
    /// # Arguments
    /// * `jacobian` - Optional mutable reference to store the Jacobian ∂(g⁻¹)/∂g
    fn inverse(&self, jacobian: Option<&mut Self::JacobianMatrix>) -> Self;

    /// Compose this element with another (group multiplication).
    ///
    /// # Arguments
    /// * `other` - The right operand for composition
    /// * `jacobian_self` - Optional Jacobian ∂(g₁ ∘ g₂)/∂g₁
    /// * `jacobian_other` - Optional Jacobian ∂(g₁ ∘ g₂)/∂g₂
    fn compose(
        &self,
        other: &Self,
        jacobian_self: Option<&mut Self::JacobianMatrix>,
        jacobian_other: Option<&mut Self::JacobianMatrix>,
    ) -> Self;

    /// Logarithmic map from the group to tangent space: log(g)^∨.
    ///
    /// Rotation angles are returned on the principal branch `[-π, π]`.
    ///
    /// # Arguments
    /// * `jacobian` - Optional right Jacobian inverse of the returned tangent
    fn log(&self, jacobian: Option<&mut Self::JacobianMatrix>) -> Self::TangentVector;

    /// Act on a point: g ⊙ p = M·p.
    ///
    /// # Arguments
    /// * `point` - Point to transform (homogeneous for pose groups)
    /// * `jacobian_self` - Optional Jacobian of the result wrt a left perturbation
    ///   of g, which is `odot(g ⊙ p)`
    fn act(&self, point: &Self::Point, jacobian_self: Option<&mut Self::OdotMatrix>)
    -> Self::Point;

    /// Adjoint matrix Ad(g), such that (Ad(g) φ)^ = g φ^ g⁻¹.
    fn adjoint(&self) -> Self::JacobianMatrix;

    /// Square matrix representation of this element.
    fn matrix(&self) -> Self::LieAlgebra;

    /// Build an element from its matrix representation.
    ///
    /// The matrix is assumed to satisfy the group constraints; the rotation block is
    /// re-normalized but nothing is validated. [`matrix::MatrixGroup`] validates
    /// before calling this.
    fn from_matrix(matrix: &Self::LieAlgebra) -> Self;

    /// Draw a random element using the given generator.
    fn random_with<R: Rng + ?Sized>(rng: &mut R) -> Self;

    /// Draw a random element from the thread-local generator.
    fn random() -> Self {
        Self::random_with(&mut rand::rng())
    }

    /// Identity matrix in the Jacobian dimension.
    fn jacobian_identity() -> Self::JacobianMatrix;

    /// Zero matrix in the Jacobian dimension.
    fn zero_jacobian() -> Self::JacobianMatrix;

    /// Project the element back onto the manifold (renormalize the rotation).
    fn normalize(&mut self);

    /// Check if the internal representation is approximately on the manifold.
    fn is_valid(&self, tolerance: f64) -> bool;

    /// Check if the element is approximately equal to another element.
    fn is_approx(&self, other: &Self, tolerance: f64) -> bool {
        self.right_minus(other, None, None).is_zero(tolerance)
    }

    /// Right plus operation: g ⊞ φ = g ∘ exp(φ^∧).
    ///
    /// # Notes
    /// J_R⊕θ_R = Ad(exp(θ))⁻¹
    /// J_R⊕θ_θ = J_r(θ)
    fn right_plus(
        &self,
        tangent: &Self::TangentVector,
        jacobian_self: Option<&mut Self::JacobianMatrix>,
        jacobian_tangent: Option<&mut Self::JacobianMatrix>,
    ) -> Self {
        let exp_tangent = tangent.exp(None);

        if let Some(jac_tangent) = jacobian_tangent {
            *jac_tangent = tangent.right_jacobian();
        }

        self.compose(&exp_tangent, jacobian_self, None)
    }

    /// Right minus operation: g₁ ⊟ g₂ = log(g₂⁻¹ ∘ g₁)^∨.
    ///
    /// # Notes
    /// J_Q⊖R_Q = J_r⁻¹(θ)
    /// J_Q⊖R_R = -J_l⁻¹(θ)
    fn right_minus(
        &self,
        other: &Self,
        jacobian_self: Option<&mut Self::JacobianMatrix>,
        jacobian_other: Option<&mut Self::JacobianMatrix>,
    ) -> Self::TangentVector {
        let result = other.inverse(None).compose(self, None, None).log(None);

        if let Some(jac_self) = jacobian_self {
            *jac_self = result.right_jacobian_inv();
        }

        if let Some(jac_other) = jacobian_other {
            *jac_other = -result.left_jacobian_inv();
        }

        result
    }

    /// Left plus operation: φ ⊞ g = exp(φ^∧) ∘ g.
    ///
    /// Jacobians are expressed in the tangent space at the result, as for the
    /// right operations.
    fn left_plus(
        &self,
        tangent: &Self::TangentVector,
        jacobian_tangent: Option<&mut Self::JacobianMatrix>,
        jacobian_self: Option<&mut Self::JacobianMatrix>,
    ) -> Self {
        let result = tangent.exp(None).compose(self, None, None);

        if let Some(jac_self) = jacobian_self {
            *jac_self = Self::jacobian_identity();
        }

        if let Some(jac_tangent) = jacobian_tangent {
            *jac_tangent = self.inverse(None).adjoint() * tangent.right_jacobian();
        }

        result
    }

    /// Left minus operation: g₁ ⊟ g₂ = log(g₁ ∘ g₂⁻¹)^∨.
    fn left_minus(
        &self,
        other: &Self,
        jacobian_self: Option<&mut Self::JacobianMatrix>,
        jacobian_other: Option<&mut Self::JacobianMatrix>,
    ) -> Self::TangentVector {
        let result = self.compose(&other.inverse(None), None, None).log(None);

        if let Some(jac_self) = jacobian_self {
            *jac_self = result.right_jacobian_inv() * other.adjoint();
        }

        if let Some(jac_other) = jacobian_other {
            *jac_other = -(result.right_jacobian_inv() * other.adjoint());
        }

        result
    }

    /// Convenience method for right_plus. Equivalent to g ⊞ φ.
    fn plus(
        &self,
        tangent: &Self::TangentVector,
        jacobian_self: Option<&mut Self::JacobianMatrix>,
        jacobian_tangent: Option<&mut Self::JacobianMatrix>,
    ) -> Self {
        self.right_plus(tangent, jacobian_self, jacobian_tangent)
    }

    /// Convenience method for right_minus. Equivalent to g₁ ⊟ g₂.
    fn minus(
        &self,
        other: &Self,
        jacobian_self: Option<&mut Self::JacobianMatrix>,
        jacobian_other: Option<&mut Self::JacobianMatrix>,
    ) -> Self::TangentVector {
        self.right_minus(other, jacobian_self, jacobian_other)
    }

    /// Compute g₁⁻¹ ∘ g₂ (relative transformation).
    fn between(
        &self,
        other: &Self,
        jacobian_self: Option<&mut Self::JacobianMatrix>,
        jacobian_other: Option<&mut Self::JacobianMatrix>,
    ) -> Self {
        let result = self.inverse(None).compose(other, None, None);

        if let Some(jac_self) = jacobian_self {
            *jac_self = -result.inverse(None).adjoint();
        }

        if let Some(jac_other) = jacobian_other {
            *jac_other = Self::jacobian_identity();
        }

        result
    }

    /// Dimension of the tangent space for this element.
    fn tangent_dim(&self) -> usize {
        Self::DOF
    }
}

/// Trait for Lie algebra operations.
///
/// Vectors in the tangent space at the identity, with the wedge/vee isomorphism to
/// the matrix Lie algebra, the exponential map and its Jacobians.
pub trait Tangent<Group: LieGroup>: Clone + PartialEq + Debug + Send + Sync {
    /// Dimension of the tangent space
    const DIM: usize;

    /// Exponential map to the group: exp(φ^∧).
    ///
    /// # Arguments
    /// * `jacobian` - Optional right Jacobian of the map
    fn exp(&self, jacobian: Option<&mut Group::JacobianMatrix>) -> Group;

    /// Right Jacobian Jr, with exp((φ + δφ)^∧) ≈ exp(φ^∧) ∘ exp((Jr δφ)^∧).
    fn right_jacobian(&self) -> Group::JacobianMatrix;

    /// Left Jacobian Jl, with exp((φ + δφ)^∧) ≈ exp((Jl δφ)^∧) ∘ exp(φ^∧).
    fn left_jacobian(&self) -> Group::JacobianMatrix;

    /// Inverse of the right Jacobian, in closed form.
    fn right_jacobian_inv(&self) -> Group::JacobianMatrix;

    /// Inverse of the left Jacobian, in closed form.
    fn left_jacobian_inv(&self) -> Group::JacobianMatrix;

    /// Hat (wedge) operator: φ^∧ (vector to matrix).
    fn hat(&self) -> Group::LieAlgebra;

    /// Vee operator, the inverse of [`Tangent::hat`] on the Lie algebra.
    ///
    /// Entries outside the algebra basis positions are ignored.
    fn vee(algebra: &Group::LieAlgebra) -> Self;

    /// Odot operator: the matrix with `φ^∧ p = p^⊙ φ` for every tangent φ.
    fn odot(point: &Group::Point) -> Group::OdotMatrix;

    /// Small adjoint (curly wedge) ad(φ), with ad(φ) ψ = [φ, ψ].
    fn small_adj(&self) -> Group::JacobianMatrix;

    /// Lie bracket [φ, ψ] = (φ^ ψ^ - ψ^ φ^)^∨.
    fn lie_bracket(&self, other: &Self) -> Self;

    /// Check if the tangent vector is approximately equal to another tangent vector.
    fn is_approx(&self, other: &Self, tolerance: f64) -> bool;

    /// The i-th generator Eᵢ of the Lie algebra.
    ///
    /// # Panics
    /// Panics if `i >= DIM`.
    fn generator(i: usize) -> Group::LieAlgebra {
        assert!(
            i < Self::DIM,
            "{} only has generators for indices 0..{}",
            Group::NAME,
            Self::DIM
        );
        let mut basis = DVector::zeros(Self::DIM);
        basis[i] = 1.0;
        Self::from_dvector_unchecked(&basis).hat()
    }

    /// Coefficients as a heap-allocated column of length `DIM`.
    fn to_dvector(&self) -> DVector<f64>;

    /// Build from a column of length `DIM`.
    fn from_dvector(data: &DVector<f64>) -> ManifoldResult<Self> {
        if data.len() != Self::DIM {
            return Err(ManifoldError::DimensionMismatch {
                expected: Self::DIM,
                actual: data.len(),
            });
        }
        if data.iter().any(|v| !v.is_finite()) {
            return Err(ManifoldError::InvalidNumber);
        }
        Ok(Self::from_dvector_unchecked(data))
    }

    /// Build from a column whose length is already known to be `DIM`.
    fn from_dvector_unchecked(data: &DVector<f64>) -> Self;

    /// Zero tangent vector.
    fn zero() -> Self;

    /// Random tangent vector with coefficients uniform in [-1, 1].
    fn random_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let data = DVector::from_fn(Self::DIM, |_, _| rng.random_range(-1.0..1.0));
        Self::from_dvector_unchecked(&data)
    }

    /// Random tangent vector from the thread-local generator.
    fn random() -> Self {
        Self::random_with(&mut rand::rng())
    }

    /// Check if the tangent vector is approximately zero.
    fn is_zero(&self, tolerance: f64) -> bool {
        self.to_dvector().norm() < tolerance
    }

    /// Normalize the tangent vector to unit norm (no-op for the zero vector).
    fn normalize(&mut self) {
        *self = self.normalized();
    }

    /// Return a unit tangent vector in the same direction.
    fn normalized(&self) -> Self {
        let data = self.to_dvector();
        let norm = data.norm();
        if norm > f64::EPSILON {
            Self::from_dvector_unchecked(&(data / norm))
        } else {
            Self::zero()
        }
    }
}
