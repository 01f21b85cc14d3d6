//! SO(2) - Special Orthogonal Group in 2D
//!
//! This module implements the Special Orthogonal group SO(2), which represents
//! rotations in 2D space.
//!
//! SO(2) elements are represented using nalgebra's UnitComplex internally.
//! SO(2) tangent elements are represented as a single angle in radians, and all
//! Jacobians use the minimal 1×1 representation.

use crate::manifold::{
    LieGroup, NEAR_PI_TOLERANCE, NumericalRegime, Tangent, report_instability,
};
use nalgebra::{DVector, Matrix1, Matrix2, UnitComplex, Vector2};
use rand::Rng;
use std::f64::consts::PI;
use std::{
    fmt,
    fmt::{Display, Formatter},
};

/// SO(2) group element representing rotations in 2D.
///
/// Internally represented using nalgebra's UnitComplex<f64> for efficient rotations.
#[derive(Debug, Clone, PartialEq)]
pub struct SO2 {
    /// Internal representation as a unit complex number
    complex: UnitComplex<f64>,
}

impl Display for SO2 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "SO2(angle: {:.4})", self.complex.angle())
    }
}

impl SO2 {
    /// Create a new SO(2) element from a unit complex number.
    pub fn new(complex: UnitComplex<f64>) -> Self {
        SO2 { complex }
    }

    /// Create SO(2) from an angle in radians.
    pub fn from_angle(angle: f64) -> Self {
        SO2::new(UnitComplex::from_angle(angle))
    }

    /// Get the underlying unit complex number.
    pub fn complex(&self) -> UnitComplex<f64> {
        self.complex
    }

    /// Get the rotation angle in radians, in (-π, π].
    pub fn angle(&self) -> f64 {
        self.complex.angle()
    }

    /// Get the rotation matrix (2x2).
    pub fn rotation_matrix(&self) -> Matrix2<f64> {
        self.complex.to_rotation_matrix().into_inner()
    }
}

impl LieGroup for SO2 {
    type TangentVector = SO2Tangent;
    type JacobianMatrix = Matrix1<f64>;
    type LieAlgebra = Matrix2<f64>;
    type Point = Vector2<f64>;
    type OdotMatrix = Vector2<f64>;

    const NAME: &'static str = "SO(2)";
    const DIM: usize = 2;
    const DOF: usize = 1;
    const MATRIX_SIZE: usize = 2;

    fn identity() -> Self {
        SO2 {
            complex: UnitComplex::identity(),
        }
    }

    /// SO2 inverse.
    ///
    /// # Notes
    /// R(θ)⁻¹ = R(-θ)
    /// J_R⁻¹_R = -I
    fn inverse(&self, jacobian: Option<&mut Self::JacobianMatrix>) -> Self {
        if let Some(jac) = jacobian {
            *jac = -Matrix1::identity();
        }

        SO2 {
            complex: self.complex.inverse(),
        }
    }

    /// SO2 composition. Both Jacobians are identity since SO(2) is commutative.
    fn compose(
        &self,
        other: &Self,
        jacobian_self: Option<&mut Self::JacobianMatrix>,
        jacobian_other: Option<&mut Self::JacobianMatrix>,
    ) -> Self {
        if let Some(jac_self) = jacobian_self {
            *jac_self = Matrix1::identity();
        }

        if let Some(jac_other) = jacobian_other {
            *jac_other = Matrix1::identity();
        }

        SO2 {
            complex: self.complex * other.complex,
        }
    }

    /// SO2 logarithm: θ = atan2(sin θ, cos θ).
    fn log(&self, jacobian: Option<&mut Self::JacobianMatrix>) -> Self::TangentVector {
        let angle = self.complex.angle();

        if PI - angle.abs() < NEAR_PI_TOLERANCE {
            report_instability(Self::NAME, "log", NumericalRegime::NearPi, angle);
        }

        if let Some(jac) = jacobian {
            *jac = Matrix1::identity();
        }

        SO2Tangent { data: angle }
    }

    fn act(
        &self,
        point: &Self::Point,
        jacobian_self: Option<&mut Self::OdotMatrix>,
    ) -> Self::Point {
        let result = self.complex * point;

        if let Some(jac_self) = jacobian_self {
            *jac_self = SO2Tangent::odot(&result);
        }

        result
    }

    fn adjoint(&self) -> Self::JacobianMatrix {
        Matrix1::identity()
    }

    fn matrix(&self) -> Self::LieAlgebra {
        self.rotation_matrix()
    }

    fn from_matrix(matrix: &Self::LieAlgebra) -> Self {
        SO2::from_angle(f64::atan2(matrix[(1, 0)], matrix[(0, 0)]))
    }

    fn random_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        SO2::from_angle(rng.random_range(-PI..PI))
    }

    fn jacobian_identity() -> Self::JacobianMatrix {
        Matrix1::identity()
    }

    fn zero_jacobian() -> Self::JacobianMatrix {
        Matrix1::zeros()
    }

    fn normalize(&mut self) {
        self.complex.renormalize();
    }

    fn is_valid(&self, tolerance: f64) -> bool {
        (self.complex.norm() - 1.0).abs() < tolerance
    }
}

/// SO(2) tangent space element, a single rotation angle.
#[derive(Debug, Clone, PartialEq)]
pub struct SO2Tangent {
    /// Rotation angle in radians
    data: f64,
}

impl fmt::Display for SO2Tangent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "so2(angle: {:.4})", self.data)
    }
}

impl SO2Tangent {
    /// Create a new SO2Tangent from an angle in radians.
    pub fn new(angle: f64) -> Self {
        SO2Tangent { data: angle }
    }

    /// Get the angle.
    pub fn angle(&self) -> f64 {
        self.data
    }
}

impl Tangent<SO2> for SO2Tangent {
    const DIM: usize = 1;

    /// SO2 exponential map: R(θ) = [cos θ, -sin θ; sin θ, cos θ].
    fn exp(&self, jacobian: Option<&mut <SO2 as LieGroup>::JacobianMatrix>) -> SO2 {
        if let Some(jac) = jacobian {
            *jac = Matrix1::identity();
        }

        SO2::from_angle(self.data)
    }

    fn right_jacobian(&self) -> <SO2 as LieGroup>::JacobianMatrix {
        Matrix1::identity()
    }

    fn left_jacobian(&self) -> <SO2 as LieGroup>::JacobianMatrix {
        Matrix1::identity()
    }

    fn right_jacobian_inv(&self) -> <SO2 as LieGroup>::JacobianMatrix {
        Matrix1::identity()
    }

    fn left_jacobian_inv(&self) -> <SO2 as LieGroup>::JacobianMatrix {
        Matrix1::identity()
    }

    /// [θ]× = [0, -θ; θ, 0]
    fn hat(&self) -> <SO2 as LieGroup>::LieAlgebra {
        Matrix2::new(0.0, -self.data, self.data, 0.0)
    }

    fn vee(algebra: &<SO2 as LieGroup>::LieAlgebra) -> Self {
        SO2Tangent {
            data: algebra[(1, 0)],
        }
    }

    /// p^⊙ = [-p₁, p₀]ᵀ
    fn odot(point: &<SO2 as LieGroup>::Point) -> <SO2 as LieGroup>::OdotMatrix {
        Vector2::new(-point.y, point.x)
    }

    /// The algebra is one-dimensional and abelian.
    fn small_adj(&self) -> <SO2 as LieGroup>::JacobianMatrix {
        Matrix1::zeros()
    }

    fn lie_bracket(&self, _other: &Self) -> Self {
        SO2Tangent { data: 0.0 }
    }

    fn is_approx(&self, other: &Self, tolerance: f64) -> bool {
        (self.data - other.data).abs() < tolerance
    }

    fn to_dvector(&self) -> DVector<f64> {
        DVector::from_element(1, self.data)
    }

    fn from_dvector_unchecked(data: &DVector<f64>) -> Self {
        SO2Tangent { data: data[0] }
    }

    fn zero() -> Self {
        SO2Tangent { data: 0.0 }
    }
}
