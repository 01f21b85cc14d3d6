//! SE(2) - Special Euclidean Group in 2D
//!
//! This module implements the Special Euclidean group SE(2), which represents
//! rigid body transformations in 2D space (rotation + translation).
//!
//! SE(2) elements are represented as a combination of 2D rotation and Vector2 translation.
//! SE(2) tangent elements are represented as [x, y, theta] = 3 components,
//! where [x, y] is the translational part ρ and theta is the rotation angle.
//!
//! With V(θ) = [a, -b; b, a], a = sin θ / θ and b = (1 - cos θ) / θ:
//! - Exp([ρ, θ]) = [R(θ), V(θ) ρ; 0, 1]
//! - Log([R, t; 0, 1]) = [V(θ)⁻¹ t, θ]

use crate::manifold::{
    LieGroup, NEAR_PI_TOLERANCE, NumericalRegime, SMALL_ANGLE_SQ, Tangent, report_instability,
    so2::SO2,
};
use nalgebra::{DVector, Matrix2, Matrix3, UnitComplex, Vector2, Vector3};
use rand::Rng;
use std::f64::consts::PI;
use std::{
    fmt,
    fmt::{Display, Formatter},
};

/// SE(2) group element representing rigid body transformations in 2D.
#[derive(Debug, Clone, PartialEq)]
pub struct SE2 {
    /// Translation part as Vector2
    translation: Vector2<f64>,
    /// Rotation part as UnitComplex
    rotation: UnitComplex<f64>,
}

impl Display for SE2 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SE2(translation: [{:.4}, {:.4}], rotation: {:.4})",
            self.translation.x,
            self.translation.y,
            self.angle()
        )
    }
}

impl SE2 {
    /// Create a new SE2 element from translation and rotation.
    pub fn new(translation: Vector2<f64>, rotation: UnitComplex<f64>) -> Self {
        SE2 {
            translation,
            rotation,
        }
    }

    /// Create SE2 from x, y and an angle in radians.
    pub fn from_xy_angle(x: f64, y: f64, theta: f64) -> Self {
        SE2::new(Vector2::new(x, y), UnitComplex::new(theta))
    }

    /// Create SE2 from a translation and an SO2 rotation.
    pub fn from_translation_so2(translation: Vector2<f64>, rotation: SO2) -> Self {
        SE2::new(translation, rotation.complex())
    }

    /// Get the translation part.
    pub fn translation(&self) -> Vector2<f64> {
        self.translation
    }

    /// Get the rotation as an SO2 element.
    pub fn rotation_so2(&self) -> SO2 {
        SO2::new(self.rotation)
    }

    /// Get the 2x2 rotation matrix.
    pub fn rotation_matrix(&self) -> Matrix2<f64> {
        self.rotation.to_rotation_matrix().into_inner()
    }

    /// Get the x component of translation.
    pub fn x(&self) -> f64 {
        self.translation.x
    }

    /// Get the y component of translation.
    pub fn y(&self) -> f64 {
        self.translation.y
    }

    /// Get the rotation angle in (-π, π].
    pub fn angle(&self) -> f64 {
        self.rotation.angle()
    }
}

/// Rotation-dependent scalars shared by exp, log and the Jacobians.
struct AngleCoefficients {
    /// sin θ / θ
    a: f64,
    /// (1 - cos θ) / θ
    b: f64,
    /// (1 - cos θ) / θ²
    c1: f64,
    /// (θ - sin θ) / θ²
    c2: f64,
    /// (θ/2) cot(θ/2)
    alpha: f64,
}

impl AngleCoefficients {
    fn new(theta: f64, operation: &'static str) -> Self {
        let theta_sq = theta * theta;
        if theta_sq < SMALL_ANGLE_SQ {
            report_instability(SE2::NAME, operation, NumericalRegime::SmallAngle, theta);
            let theta_4 = theta_sq * theta_sq;
            AngleCoefficients {
                a: 1.0 - theta_sq / 6.0 + theta_4 / 120.0,
                b: theta * (0.5 - theta_sq / 24.0 + theta_4 / 720.0),
                c1: 0.5 - theta_sq / 24.0 + theta_4 / 720.0,
                c2: theta * (1.0 / 6.0 - theta_sq / 120.0 + theta_4 / 5040.0),
                alpha: 1.0 - theta_sq / 12.0 - theta_4 / 720.0,
            }
        } else {
            let half = 0.5 * theta;
            let (sin_half, cos_half) = half.sin_cos();
            let one_minus_cos = 2.0 * sin_half * sin_half;
            AngleCoefficients {
                a: theta.sin() / theta,
                b: one_minus_cos / theta,
                c1: one_minus_cos / theta_sq,
                c2: (theta - theta.sin()) / theta_sq,
                alpha: half * cos_half / sin_half,
            }
        }
    }
}

impl LieGroup for SE2 {
    type TangentVector = SE2Tangent;
    type JacobianMatrix = Matrix3<f64>;
    type LieAlgebra = Matrix3<f64>;
    type Point = Vector3<f64>;
    type OdotMatrix = Matrix3<f64>;

    const NAME: &'static str = "SE(2)";
    const DIM: usize = 2;
    const DOF: usize = 3;
    const MATRIX_SIZE: usize = 3;

    fn identity() -> Self {
        SE2 {
            translation: Vector2::zeros(),
            rotation: UnitComplex::identity(),
        }
    }

    /// SE2 inverse: [Rᵀ, -Rᵀ t; 0, 1].
    ///
    /// # Notes
    /// J_M⁻¹_M = -Ad(M)
    fn inverse(&self, jacobian: Option<&mut Self::JacobianMatrix>) -> Self {
        let rot_inv = self.rotation.inverse();

        if let Some(jac) = jacobian {
            *jac = -self.adjoint();
        }

        SE2 {
            translation: -(rot_inv * self.translation),
            rotation: rot_inv,
        }
    }

    /// SE2 composition.
    ///
    /// # Notes
    /// J_MN_M = Ad(N⁻¹)
    /// J_MN_N = I
    fn compose(
        &self,
        other: &Self,
        jacobian_self: Option<&mut Self::JacobianMatrix>,
        jacobian_other: Option<&mut Self::JacobianMatrix>,
    ) -> Self {
        if let Some(jac_self) = jacobian_self {
            *jac_self = other.inverse(None).adjoint();
        }

        if let Some(jac_other) = jacobian_other {
            *jac_other = Matrix3::identity();
        }

        SE2 {
            translation: self.translation + self.rotation * other.translation,
            rotation: self.rotation * other.rotation,
        }
    }

    /// SE2 logarithm.
    ///
    /// # Notes
    /// ρ = V(θ)⁻¹ t with V(θ)⁻¹ = [α, θ/2; -θ/2, α], α = (θ/2) cot(θ/2)
    fn log(&self, jacobian: Option<&mut Self::JacobianMatrix>) -> Self::TangentVector {
        let theta = self.angle();

        if PI - theta.abs() < NEAR_PI_TOLERANCE {
            report_instability(Self::NAME, "log", NumericalRegime::NearPi, theta);
        }

        let coeffs = AngleCoefficients::new(theta, "log");
        let half = 0.5 * theta;
        let x = coeffs.alpha * self.x() + half * self.y();
        let y = -half * self.x() + coeffs.alpha * self.y();

        let result = SE2Tangent::new(x, y, theta);

        if let Some(jac) = jacobian {
            *jac = result.right_jacobian_inv();
        }

        result
    }

    fn act(
        &self,
        point: &Self::Point,
        jacobian_self: Option<&mut Self::OdotMatrix>,
    ) -> Self::Point {
        let result = self.matrix() * point;

        if let Some(jac_self) = jacobian_self {
            *jac_self = SE2Tangent::odot(&result);
        }

        result
    }

    /// Ad(M) = [R, (y, -x)ᵀ; 0, 1]
    fn adjoint(&self) -> Self::JacobianMatrix {
        let mut adjoint_matrix = Matrix3::identity();
        adjoint_matrix
            .fixed_view_mut::<2, 2>(0, 0)
            .copy_from(&self.rotation_matrix());
        adjoint_matrix[(0, 2)] = self.y();
        adjoint_matrix[(1, 2)] = -self.x();

        adjoint_matrix
    }

    fn matrix(&self) -> Self::LieAlgebra {
        let mut matrix = Matrix3::identity();
        matrix
            .fixed_view_mut::<2, 2>(0, 0)
            .copy_from(&self.rotation_matrix());
        matrix[(0, 2)] = self.translation.x;
        matrix[(1, 2)] = self.translation.y;

        matrix
    }

    fn from_matrix(matrix: &Self::LieAlgebra) -> Self {
        SE2::from_xy_angle(
            matrix[(0, 2)],
            matrix[(1, 2)],
            f64::atan2(matrix[(1, 0)], matrix[(0, 0)]),
        )
    }

    /// Uniform rotation, translation uniform in [-1, 1]².
    fn random_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let translation = Vector2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0));
        let rotation = SO2::random_with(rng);
        SE2::from_translation_so2(translation, rotation)
    }

    fn jacobian_identity() -> Self::JacobianMatrix {
        Matrix3::identity()
    }

    fn zero_jacobian() -> Self::JacobianMatrix {
        Matrix3::zeros()
    }

    fn normalize(&mut self) {
        self.rotation.renormalize();
    }

    fn is_valid(&self, tolerance: f64) -> bool {
        (self.rotation.norm() - 1.0).abs() < tolerance
    }
}

/// SE(2) tangent space element representing elements in the Lie algebra se(2).
///
/// Internally represented as [x, y, theta].
#[derive(Debug, Clone, PartialEq)]
pub struct SE2Tangent {
    /// Internal data: [x, y, theta]
    data: Vector3<f64>,
}

impl fmt::Display for SE2Tangent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "se2(x: {:.4}, y: {:.4}, theta: {:.4})",
            self.data.x, self.data.y, self.data.z
        )
    }
}

impl SE2Tangent {
    /// Create a new SE2Tangent from x, y and theta.
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        SE2Tangent {
            data: Vector3::new(x, y, theta),
        }
    }

    /// Get the x component.
    pub fn x(&self) -> f64 {
        self.data.x
    }

    /// Get the y component.
    pub fn y(&self) -> f64 {
        self.data.y
    }

    /// Get the rotation angle.
    pub fn angle(&self) -> f64 {
        self.data.z
    }

    /// Get the translational part ρ.
    pub fn translation(&self) -> Vector2<f64> {
        Vector2::new(self.data.x, self.data.y)
    }

    /// Get the coefficients [x, y, theta].
    pub fn coeffs(&self) -> Vector3<f64> {
        self.data
    }

    fn negated(&self) -> Self {
        SE2Tangent { data: -self.data }
    }
}

impl Tangent<SE2> for SE2Tangent {
    const DIM: usize = 3;

    /// SE2 exponential map.
    ///
    /// # Notes
    /// M = [R(θ), V(θ) ρ; 0, 1]
    fn exp(&self, jacobian: Option<&mut <SE2 as LieGroup>::JacobianMatrix>) -> SE2 {
        let theta = self.angle();
        let coeffs = AngleCoefficients::new(theta, "exp");

        let translation = Vector2::new(
            coeffs.a * self.x() - coeffs.b * self.y(),
            coeffs.b * self.x() + coeffs.a * self.y(),
        );

        if let Some(jac) = jacobian {
            *jac = self.right_jacobian();
        }

        SE2::new(translation, UnitComplex::new(theta))
    }

    /// J_r(ξ) = J_l(-ξ)
    fn right_jacobian(&self) -> <SE2 as LieGroup>::JacobianMatrix {
        self.negated().left_jacobian()
    }

    /// Left Jacobian for SE(2)
    ///
    /// # Notes
    /// J_l = [a, -b, c₁ y + c₂ x; b, a, -c₁ x + c₂ y; 0, 0, 1]
    fn left_jacobian(&self) -> <SE2 as LieGroup>::JacobianMatrix {
        let (x, y) = (self.x(), self.y());
        let coeffs = AngleCoefficients::new(self.angle(), "left_jacobian");

        Matrix3::new(
            coeffs.a,
            -coeffs.b,
            coeffs.c1 * y + coeffs.c2 * x,
            coeffs.b,
            coeffs.a,
            -coeffs.c1 * x + coeffs.c2 * y,
            0.0,
            0.0,
            1.0,
        )
    }

    fn right_jacobian_inv(&self) -> <SE2 as LieGroup>::JacobianMatrix {
        self.negated().left_jacobian_inv()
    }

    /// Left Jacobian inverse for SE(2)
    ///
    /// # Notes
    /// J_l⁻¹ = [V⁻¹, -V⁻¹ w; 0, 1] with V⁻¹ = [α, θ/2; -θ/2, α] and w the
    /// translational column of J_l
    fn left_jacobian_inv(&self) -> <SE2 as LieGroup>::JacobianMatrix {
        let (x, y, theta) = (self.x(), self.y(), self.angle());
        let coeffs = AngleCoefficients::new(theta, "left_jacobian_inv");
        let half = 0.5 * theta;

        let w0 = coeffs.c1 * y + coeffs.c2 * x;
        let w1 = -coeffs.c1 * x + coeffs.c2 * y;

        Matrix3::new(
            coeffs.alpha,
            half,
            -(coeffs.alpha * w0 + half * w1),
            -half,
            coeffs.alpha,
            half * w0 - coeffs.alpha * w1,
            0.0,
            0.0,
            1.0,
        )
    }

    /// ξ^ = [0, -θ, x; θ, 0, y; 0, 0, 0]
    fn hat(&self) -> <SE2 as LieGroup>::LieAlgebra {
        Matrix3::new(
            0.0,
            -self.data.z,
            self.data.x,
            self.data.z,
            0.0,
            self.data.y,
            0.0,
            0.0,
            0.0,
        )
    }

    fn vee(algebra: &<SE2 as LieGroup>::LieAlgebra) -> Self {
        SE2Tangent::new(algebra[(0, 2)], algebra[(1, 2)], algebra[(1, 0)])
    }

    /// p^⊙ = [p₂, 0, -p₁; 0, p₂, p₀; 0, 0, 0] for a homogeneous point p
    fn odot(point: &<SE2 as LieGroup>::Point) -> <SE2 as LieGroup>::OdotMatrix {
        Matrix3::new(
            point.z, 0.0, -point.y, 0.0, point.z, point.x, 0.0, 0.0, 0.0,
        )
    }

    /// ad(ξ) = [0, -θ, y; θ, 0, -x; 0, 0, 0]
    fn small_adj(&self) -> <SE2 as LieGroup>::JacobianMatrix {
        Matrix3::new(
            0.0,
            -self.data.z,
            self.data.y,
            self.data.z,
            0.0,
            -self.data.x,
            0.0,
            0.0,
            0.0,
        )
    }

    fn lie_bracket(&self, other: &Self) -> Self {
        SE2Tangent {
            data: self.small_adj() * other.data,
        }
    }

    fn is_approx(&self, other: &Self, tolerance: f64) -> bool {
        (self.data - other.data).norm() < tolerance
    }

    fn to_dvector(&self) -> DVector<f64> {
        DVector::from_column_slice(self.data.as_slice())
    }

    fn from_dvector_unchecked(data: &DVector<f64>) -> Self {
        SE2Tangent::new(data[0], data[1], data[2])
    }

    fn zero() -> Self {
        SE2Tangent {
            data: Vector3::zeros(),
        }
    }
}
