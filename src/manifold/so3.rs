//! SO3 - Special Orthogonal Group in 3D
//!
//! This module implements the Special Orthogonal group SO(3), which represents
//! rotations in 3D space.
//!
//! SO(3) elements are represented using nalgebra's UnitQuaternion internally.
//! SO(3) tangent elements are represented as axis-angle vectors in R³,
//! where the direction gives the axis of rotation and the magnitude gives the angle.

use crate::manifold::{
    LieGroup, NEAR_PI_TOLERANCE, NumericalRegime, SMALL_ANGLE_SQ, Tangent, report_instability,
};
use nalgebra::{DVector, Matrix3, Quaternion, Rotation3, Unit, UnitQuaternion, Vector3};
use rand::Rng;
use std::f64::consts::PI;
use std::{
    fmt,
    fmt::{Display, Formatter},
};

/// SO(3) group element representing rotations in 3D.
///
/// Internally represented using nalgebra's UnitQuaternion<f64> for efficient rotations.
#[derive(Debug, Clone, PartialEq)]
pub struct SO3 {
    /// Internal representation as a unit quaternion
    quaternion: UnitQuaternion<f64>,
}

impl Display for SO3 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let q = self.quaternion.quaternion();
        write!(
            f,
            "SO3(quaternion: [w: {:.4}, x: {:.4}, y: {:.4}, z: {:.4}])",
            q.w, q.i, q.j, q.k
        )
    }
}

impl SO3 {
    /// Create a new SO(3) element from a unit quaternion.
    pub fn new(quaternion: UnitQuaternion<f64>) -> Self {
        SO3 { quaternion }
    }

    /// Create SO(3) from quaternion coefficients, normalizing them.
    pub fn from_quaternion_coeffs(x: f64, y: f64, z: f64, w: f64) -> Self {
        SO3::new(UnitQuaternion::from_quaternion(Quaternion::new(w, x, y, z)))
    }

    /// Create SO(3) from Euler angles (roll, pitch, yaw).
    pub fn from_euler_angles(roll: f64, pitch: f64, yaw: f64) -> Self {
        SO3::new(UnitQuaternion::from_euler_angles(roll, pitch, yaw))
    }

    /// Create SO(3) from a rotation axis (normalized here) and an angle.
    pub fn from_axis_angle(axis: &Vector3<f64>, angle: f64) -> Self {
        let unit_axis = Unit::new_normalize(*axis);
        SO3::new(UnitQuaternion::from_axis_angle(&unit_axis, angle))
    }

    /// Get the quaternion representation.
    pub fn quaternion(&self) -> UnitQuaternion<f64> {
        self.quaternion
    }

    /// Get the rotation matrix (3x3).
    pub fn rotation_matrix(&self) -> Matrix3<f64> {
        self.quaternion.to_rotation_matrix().into_inner()
    }

    /// Get coefficients as array [w, x, y, z].
    pub fn coeffs(&self) -> [f64; 4] {
        let q = self.quaternion.quaternion();
        [q.w, q.i, q.j, q.k]
    }

    /// Geodesic distance: the angle of the relative rotation.
    pub fn distance(&self, other: &Self) -> f64 {
        self.between(other, None, None).log(None).angle()
    }
}

impl LieGroup for SO3 {
    type TangentVector = SO3Tangent;
    type JacobianMatrix = Matrix3<f64>;
    type LieAlgebra = Matrix3<f64>;
    type Point = Vector3<f64>;
    type OdotMatrix = Matrix3<f64>;

    const NAME: &'static str = "SO(3)";
    const DIM: usize = 3;
    const DOF: usize = 3;
    const MATRIX_SIZE: usize = 3;

    fn identity() -> Self {
        SO3 {
            quaternion: UnitQuaternion::identity(),
        }
    }

    /// SO3 inverse.
    ///
    /// # Notes
    /// R⁻¹ = Rᵀ, for quaternions: q⁻¹ = q*
    /// J_R⁻¹_R = -Adj(R) = -R
    fn inverse(&self, jacobian: Option<&mut Self::JacobianMatrix>) -> Self {
        if let Some(jac) = jacobian {
            *jac = -self.adjoint();
        }

        SO3 {
            quaternion: self.quaternion.inverse(),
        }
    }

    /// SO3 composition.
    ///
    /// # Notes
    /// J_QR_Q = Adj(R⁻¹) = Rᵀ
    /// J_QR_R = I
    fn compose(
        &self,
        other: &Self,
        jacobian_self: Option<&mut Self::JacobianMatrix>,
        jacobian_other: Option<&mut Self::JacobianMatrix>,
    ) -> Self {
        if let Some(jac_self) = jacobian_self {
            *jac_self = other.rotation_matrix().transpose();
        }

        if let Some(jac_other) = jacobian_other {
            *jac_other = Matrix3::identity();
        }

        SO3 {
            quaternion: self.quaternion * other.quaternion,
        }
    }

    /// SO3 logarithm through the unit quaternion.
    ///
    /// # Notes
    /// θu = Log(q) = (2 / ||v||) * v * atan2(||v||, w) ∈ R³
    ///
    /// A quaternion with w < 0 is read as -q so the angle stays within [-π, π].
    fn log(&self, jacobian: Option<&mut Self::JacobianMatrix>) -> Self::TangentVector {
        let q = self.quaternion.quaternion();
        let sin_half_sq = q.i * q.i + q.j * q.j + q.k * q.k;

        let log_coeff = if sin_half_sq > SMALL_ANGLE_SQ {
            let sin_half = sin_half_sq.sqrt();
            let cos_half = q.w;

            let angle = 2.0
                * if cos_half < 0.0 {
                    f64::atan2(-sin_half, -cos_half)
                } else {
                    f64::atan2(sin_half, cos_half)
                };

            if PI - angle.abs() < NEAR_PI_TOLERANCE {
                report_instability(Self::NAME, "log", NumericalRegime::NearPi, angle);
            }

            angle / sin_half
        } else {
            // atan2(s, w)/s for s → 0, with w = ±√(1 - s²)
            report_instability(
                Self::NAME,
                "log",
                NumericalRegime::SmallAngle,
                2.0 * sin_half_sq.sqrt(),
            );
            let w = q.w;
            2.0 / w - 2.0 * sin_half_sq / (3.0 * w * w * w)
        };

        let tangent = SO3Tangent::new(Vector3::new(q.i, q.j, q.k) * log_coeff);

        if let Some(jac) = jacobian {
            *jac = tangent.right_jacobian_inv();
        }

        tangent
    }

    fn act(
        &self,
        point: &Self::Point,
        jacobian_self: Option<&mut Self::OdotMatrix>,
    ) -> Self::Point {
        let result = self.quaternion * point;

        if let Some(jac_self) = jacobian_self {
            *jac_self = SO3Tangent::odot(&result);
        }

        result
    }

    fn adjoint(&self) -> Self::JacobianMatrix {
        self.rotation_matrix()
    }

    fn matrix(&self) -> Self::LieAlgebra {
        self.rotation_matrix()
    }

    fn from_matrix(matrix: &Self::LieAlgebra) -> Self {
        let rotation = Rotation3::from_matrix_unchecked(*matrix);
        let q = UnitQuaternion::from_rotation_matrix(&rotation);
        SO3::new(UnitQuaternion::from_quaternion(q.into_inner()))
    }

    /// Uniform rotation from Shoemake's subgroup algorithm.
    fn random_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let u1: f64 = rng.random();
        let u2: f64 = rng.random_range(0.0..2.0 * PI);
        let u3: f64 = rng.random_range(0.0..2.0 * PI);

        let a = (1.0 - u1).sqrt();
        let b = u1.sqrt();
        let q = Quaternion::new(b * u3.cos(), a * u2.sin(), a * u2.cos(), b * u3.sin());

        SO3 {
            quaternion: UnitQuaternion::from_quaternion(q),
        }
    }

    fn jacobian_identity() -> Self::JacobianMatrix {
        Matrix3::identity()
    }

    fn zero_jacobian() -> Self::JacobianMatrix {
        Matrix3::zeros()
    }

    fn normalize(&mut self) {
        self.quaternion.renormalize();
    }

    fn is_valid(&self, tolerance: f64) -> bool {
        (self.quaternion.norm() - 1.0).abs() < tolerance
    }
}

/// SO(3) tangent space element representing elements in the Lie algebra so(3).
///
/// Internally represented as axis-angle vectors in R³ where:
/// - Direction: axis of rotation (unit vector)
/// - Magnitude: angle of rotation (radians)
#[derive(Debug, Clone, PartialEq)]
pub struct SO3Tangent {
    /// Internal data: axis-angle vector [θx, θy, θz]
    data: Vector3<f64>,
}

impl fmt::Display for SO3Tangent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "so3(axis-angle: [{:.4}, {:.4}, {:.4}])",
            self.data.x, self.data.y, self.data.z
        )
    }
}

impl SO3Tangent {
    /// Create a new SO3Tangent from an axis-angle vector.
    pub fn new(axis_angle: Vector3<f64>) -> Self {
        SO3Tangent { data: axis_angle }
    }

    /// Create SO3Tangent from individual components.
    pub fn from_components(x: f64, y: f64, z: f64) -> Self {
        SO3Tangent::new(Vector3::new(x, y, z))
    }

    /// Get the angle of rotation.
    pub fn angle(&self) -> f64 {
        self.data.norm()
    }

    /// Get the axis of rotation (normalized), or the x axis for a zero rotation.
    pub fn axis(&self) -> Vector3<f64> {
        let norm = self.data.norm();
        if norm < f64::EPSILON {
            Vector3::x()
        } else {
            self.data / norm
        }
    }

    /// Get the coefficients as a vector.
    pub fn coeffs(&self) -> Vector3<f64> {
        self.data
    }
}

/// Skew-symmetric matrix [v]× with [v]× w = v × w.
pub(crate) fn skew(v: &Vector3<f64>) -> Matrix3<f64> {
    Matrix3::new(0.0, -v.z, v.y, v.z, 0.0, -v.x, -v.y, v.x, 0.0)
}

/// Left Jacobian of SO(3) evaluated at the axis-angle vector `theta`.
pub(crate) fn left_jacobian_so3(theta: &Vector3<f64>) -> Matrix3<f64> {
    let theta_sq = theta.norm_squared();
    let k = skew(theta);

    let (a, b) = if theta_sq < SMALL_ANGLE_SQ {
        (
            0.5 - theta_sq / 24.0 + theta_sq * theta_sq / 720.0,
            1.0 / 6.0 - theta_sq / 120.0 + theta_sq * theta_sq / 5040.0,
        )
    } else {
        let angle = theta_sq.sqrt();
        let sin_half = (0.5 * angle).sin();
        (
            2.0 * sin_half * sin_half / theta_sq,
            (angle - angle.sin()) / (theta_sq * angle),
        )
    };

    Matrix3::identity() + a * k + b * k * k
}

/// Inverse left Jacobian of SO(3), using the half-angle cotangent so that the
/// coefficient stays finite up to θ = π.
pub(crate) fn left_jacobian_inv_so3(theta: &Vector3<f64>) -> Matrix3<f64> {
    let theta_sq = theta.norm_squared();
    let k = skew(theta);

    let c = if theta_sq < SMALL_ANGLE_SQ {
        1.0 / 12.0 + theta_sq / 720.0 + theta_sq * theta_sq / 30240.0
    } else {
        let angle = theta_sq.sqrt();
        let half = 0.5 * angle;
        1.0 / theta_sq - half.cos() / (2.0 * angle * half.sin())
    };

    Matrix3::identity() - 0.5 * k + c * k * k
}

impl Tangent<SO3> for SO3Tangent {
    const DIM: usize = 3;

    /// SO3 exponential map.
    ///
    /// # Notes
    /// q = Exp(θu) = cos(θ/2) + u sin(θ/2) ∈ H
    fn exp(&self, jacobian: Option<&mut <SO3 as LieGroup>::JacobianMatrix>) -> SO3 {
        let theta_sq = self.data.norm_squared();

        let quaternion = if theta_sq > SMALL_ANGLE_SQ {
            UnitQuaternion::from_scaled_axis(self.data)
        } else {
            report_instability(
                SO3::NAME,
                "exp",
                NumericalRegime::SmallAngle,
                theta_sq.sqrt(),
            );
            // cos(θ/2) ≈ 1 - θ²/8, sin(θ/2)/θ ≈ 1/2 - θ²/48
            let w = 1.0 - theta_sq / 8.0;
            let v = self.data * (0.5 - theta_sq / 48.0);
            UnitQuaternion::from_quaternion(Quaternion::new(w, v.x, v.y, v.z))
        };

        if let Some(jac) = jacobian {
            *jac = self.right_jacobian();
        }

        SO3 { quaternion }
    }

    /// Right Jacobian for SO(3): J_r(θ) = J_l(θ)ᵀ = J_l(-θ).
    fn right_jacobian(&self) -> <SO3 as LieGroup>::JacobianMatrix {
        self.left_jacobian().transpose()
    }

    /// Left Jacobian for SO(3)
    ///
    /// # Notes
    /// J_l(θ) = I + (1 - cos θ)/θ² [θ]× + (θ - sin θ)/θ³ [θ]×²
    fn left_jacobian(&self) -> <SO3 as LieGroup>::JacobianMatrix {
        left_jacobian_so3(&self.data)
    }

    fn right_jacobian_inv(&self) -> <SO3 as LieGroup>::JacobianMatrix {
        self.left_jacobian_inv().transpose()
    }

    /// Left Jacobian inverse for SO(3)
    ///
    /// # Notes
    /// J_l⁻¹(θ) = I - ½[θ]× + (1/θ² - cot(θ/2)/(2θ)) [θ]×²
    fn left_jacobian_inv(&self) -> <SO3 as LieGroup>::JacobianMatrix {
        left_jacobian_inv_so3(&self.data)
    }

    /// Hat map for SO(3)
    ///
    /// # Notes
    /// [θ]× = [0 -θz θy; θz 0 -θx; -θy θx 0]
    fn hat(&self) -> <SO3 as LieGroup>::LieAlgebra {
        skew(&self.data)
    }

    fn vee(algebra: &<SO3 as LieGroup>::LieAlgebra) -> Self {
        SO3Tangent::new(Vector3::new(
            algebra[(2, 1)],
            algebra[(0, 2)],
            algebra[(1, 0)],
        ))
    }

    /// p^⊙ = -[p]×, since [θ]× p = θ × p = -p × θ.
    fn odot(point: &<SO3 as LieGroup>::Point) -> <SO3 as LieGroup>::OdotMatrix {
        -skew(point)
    }

    /// For SO(3), the small adjoint is the skew-symmetric matrix (hat operator).
    fn small_adj(&self) -> <SO3 as LieGroup>::JacobianMatrix {
        self.hat()
    }

    fn lie_bracket(&self, other: &Self) -> Self {
        SO3Tangent::new(self.small_adj() * other.data)
    }

    fn is_approx(&self, other: &Self, tolerance: f64) -> bool {
        (self.data - other.data).norm() < tolerance
    }

    fn to_dvector(&self) -> DVector<f64> {
        DVector::from_column_slice(self.data.as_slice())
    }

    fn from_dvector_unchecked(data: &DVector<f64>) -> Self {
        SO3Tangent::new(Vector3::new(data[0], data[1], data[2]))
    }

    fn zero() -> Self {
        SO3Tangent::new(Vector3::zeros())
    }
}
