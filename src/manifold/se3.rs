//! SE(3) - Special Euclidean Group in 3D
//!
//! This module implements the Special Euclidean group SE(3), which represents
//! rigid body transformations in 3D space (rotation + translation).
//!
//! SE(3) elements are represented as a combination of SO(3) rotation and Vector3 translation.
//! SE(3) tangent elements are represented as [rho(3), theta(3)] = 6 components,
//! where rho is the translational component and theta is the rotational component.
//!
//! The left Jacobian has the block form
//! ```text
//! J_l(ξ) = [ J(θ)  Q(ρ, θ) ]
//!          [  0     J(θ)   ]
//! ```
//! with J the SO(3) left Jacobian and Q from Barfoot, *State Estimation for
//! Robotics*, eq. 7.86b.

use crate::manifold::{
    LieGroup, NumericalRegime, Tangent, report_instability,
    so3::{SO3, SO3Tangent, left_jacobian_inv_so3, left_jacobian_so3, skew},
};
use nalgebra::{
    DVector, Isometry3, Matrix3, Matrix4, Matrix4x6, Matrix6, Translation3, UnitQuaternion,
    Vector3, Vector4, Vector6,
};
use rand::Rng;
use std::{
    fmt,
    fmt::{Display, Formatter},
};

/// Squared angle under which the Q-block coefficients use their Taylor expansions.
///
/// Larger than [`SMALL_ANGLE_SQ`](crate::manifold::SMALL_ANGLE_SQ) because the
/// closed forms cancel up to the fifth power of the angle.
const Q_BLOCK_SMALL_ANGLE_SQ: f64 = 1e-4;

/// SE(3) group element representing rigid body transformations in 3D.
#[derive(Debug, Clone, PartialEq)]
pub struct SE3 {
    /// Rotation part as SO(3) element
    rotation: SO3,
    /// Translation part as Vector3
    translation: Vector3<f64>,
}

impl Display for SE3 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let t = self.translation;
        let q = self.rotation_quaternion();
        write!(
            f,
            "SE3(translation: [{:.4}, {:.4}, {:.4}], rotation: [w: {:.4}, x: {:.4}, y: {:.4}, z: {:.4}])",
            t.x, t.y, t.z, q.w, q.i, q.j, q.k
        )
    }
}

impl SE3 {
    /// Create a new SE3 element from translation and rotation.
    pub fn new(translation: Vector3<f64>, rotation: UnitQuaternion<f64>) -> Self {
        SE3 {
            rotation: SO3::new(rotation),
            translation,
        }
    }

    /// Create SE3 from translation components and Euler angles.
    pub fn from_translation_euler(x: f64, y: f64, z: f64, roll: f64, pitch: f64, yaw: f64) -> Self {
        SE3 {
            rotation: SO3::from_euler_angles(roll, pitch, yaw),
            translation: Vector3::new(x, y, z),
        }
    }

    /// Create SE3 from an nalgebra Isometry3.
    pub fn from_isometry(isometry: Isometry3<f64>) -> Self {
        SE3::new(isometry.translation.vector, isometry.rotation)
    }

    /// Create SE3 from a translation and an SO3 rotation.
    pub fn from_translation_so3(translation: Vector3<f64>, rotation: SO3) -> Self {
        SE3 {
            rotation,
            translation,
        }
    }

    /// Get the translation part.
    pub fn translation(&self) -> Vector3<f64> {
        self.translation
    }

    /// Get the rotation part as SO3.
    pub fn rotation_so3(&self) -> SO3 {
        self.rotation.clone()
    }

    /// Get the rotation part as a unit quaternion.
    pub fn rotation_quaternion(&self) -> UnitQuaternion<f64> {
        self.rotation.quaternion()
    }

    /// Get as an nalgebra Isometry3.
    pub fn isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(
            Translation3::from(self.translation),
            self.rotation.quaternion(),
        )
    }
}

impl LieGroup for SE3 {
    type TangentVector = SE3Tangent;
    type JacobianMatrix = Matrix6<f64>;
    type LieAlgebra = Matrix4<f64>;
    type Point = Vector4<f64>;
    type OdotMatrix = Matrix4x6<f64>;

    const NAME: &'static str = "SE(3)";
    const DIM: usize = 3;
    const DOF: usize = 6;
    const MATRIX_SIZE: usize = 4;

    fn identity() -> Self {
        SE3 {
            rotation: SO3::identity(),
            translation: Vector3::zeros(),
        }
    }

    /// SE3 inverse: [Rᵀ, -Rᵀ t; 0, 1].
    ///
    /// # Notes
    /// J_M⁻¹_M = -Ad(M)
    fn inverse(&self, jacobian: Option<&mut Self::JacobianMatrix>) -> Self {
        let rot_inv = self.rotation.inverse(None);
        let trans_inv = -(rot_inv.quaternion() * self.translation);

        if let Some(jac) = jacobian {
            *jac = -self.adjoint();
        }

        SE3 {
            rotation: rot_inv,
            translation: trans_inv,
        }
    }

    /// SE3 composition.
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
            *jac_other = Matrix6::identity();
        }

        SE3 {
            rotation: self.rotation.compose(&other.rotation, None, None),
            translation: self.translation + self.rotation.quaternion() * other.translation,
        }
    }

    /// SE3 logarithm.
    ///
    /// # Notes
    /// θ = Log(R), ρ = J_l(θ)⁻¹ t
    fn log(&self, jacobian: Option<&mut Self::JacobianMatrix>) -> Self::TangentVector {
        let theta = self.rotation.log(None).coeffs();
        let rho = left_jacobian_inv_so3(&theta) * self.translation;

        let result = SE3Tangent::new(rho, theta);

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
            *jac_self = SE3Tangent::odot(&result);
        }

        result
    }

    /// Ad(M) = [R, [t]× R; 0, R]
    fn adjoint(&self) -> Self::JacobianMatrix {
        let rotation = self.rotation.rotation_matrix();
        let mut adjoint_matrix = Matrix6::zeros();

        adjoint_matrix
            .fixed_view_mut::<3, 3>(0, 0)
            .copy_from(&rotation);
        adjoint_matrix
            .fixed_view_mut::<3, 3>(3, 3)
            .copy_from(&rotation);
        adjoint_matrix
            .fixed_view_mut::<3, 3>(0, 3)
            .copy_from(&(skew(&self.translation) * rotation));

        adjoint_matrix
    }

    fn matrix(&self) -> Self::LieAlgebra {
        let mut matrix = Matrix4::identity();
        matrix
            .fixed_view_mut::<3, 3>(0, 0)
            .copy_from(&self.rotation.rotation_matrix());
        matrix
            .fixed_view_mut::<3, 1>(0, 3)
            .copy_from(&self.translation);

        matrix
    }

    fn from_matrix(matrix: &Self::LieAlgebra) -> Self {
        let rotation: Matrix3<f64> = matrix.fixed_view::<3, 3>(0, 0).into_owned();
        let translation: Vector3<f64> = matrix.fixed_view::<3, 1>(0, 3).into_owned();
        SE3 {
            rotation: SO3::from_matrix(&rotation),
            translation,
        }
    }

    /// Uniform rotation, translation uniform in [-1, 1]³.
    fn random_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let translation = Vector3::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        );
        SE3 {
            rotation: SO3::random_with(rng),
            translation,
        }
    }

    fn jacobian_identity() -> Self::JacobianMatrix {
        Matrix6::identity()
    }

    fn zero_jacobian() -> Self::JacobianMatrix {
        Matrix6::zeros()
    }

    fn normalize(&mut self) {
        self.rotation.normalize();
    }

    fn is_valid(&self, tolerance: f64) -> bool {
        self.rotation.is_valid(tolerance)
    }
}

/// SE(3) tangent space element representing elements in the Lie algebra se(3).
///
/// Internally represented as [rho_x, rho_y, rho_z, theta_x, theta_y, theta_z].
#[derive(Debug, Clone, PartialEq)]
pub struct SE3Tangent {
    /// Internal data: [rho (3), theta (3)]
    data: Vector6<f64>,
}

impl fmt::Display for SE3Tangent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rho = self.rho();
        let theta = self.theta();
        write!(
            f,
            "se3(rho: [{:.4}, {:.4}, {:.4}], theta: [{:.4}, {:.4}, {:.4}])",
            rho.x, rho.y, rho.z, theta.x, theta.y, theta.z
        )
    }
}

impl SE3Tangent {
    /// Create a new SE3Tangent from rho (translational) and theta (rotational) components.
    pub fn new(rho: Vector3<f64>, theta: Vector3<f64>) -> Self {
        let mut data = Vector6::zeros();
        data.fixed_rows_mut::<3>(0).copy_from(&rho);
        data.fixed_rows_mut::<3>(3).copy_from(&theta);
        SE3Tangent { data }
    }

    /// Create SE3Tangent from individual components.
    pub fn from_components(
        rho_x: f64,
        rho_y: f64,
        rho_z: f64,
        theta_x: f64,
        theta_y: f64,
        theta_z: f64,
    ) -> Self {
        SE3Tangent {
            data: Vector6::new(rho_x, rho_y, rho_z, theta_x, theta_y, theta_z),
        }
    }

    /// Get the rho (translational) part.
    pub fn rho(&self) -> Vector3<f64> {
        self.data.fixed_rows::<3>(0).into_owned()
    }

    /// Get the theta (rotational) part.
    pub fn theta(&self) -> Vector3<f64> {
        self.data.fixed_rows::<3>(3).into_owned()
    }

    /// Get the coefficients [rho, theta].
    pub fn coeffs(&self) -> Vector6<f64> {
        self.data
    }

    /// Q block of the SE(3) left Jacobian.
    ///
    /// # Notes
    /// Q(ρ, θ) = ½ρ× + b (θ×ρ× + ρ×θ× + θ×ρ×θ×)
    ///         + c (θ×θ×ρ× + ρ×θ×θ× - 3θ×ρ×θ×)
    ///         + d (θ×ρ×θ×θ× + θ×θ×ρ×θ×)
    ///
    /// b = (φ - sin φ)/φ³, c = (φ² + 2cos φ - 2)/(2φ⁴), d = (2φ - 3sin φ + φ cos φ)/(2φ⁵)
    pub fn q_block_jacobian_matrix(rho: Vector3<f64>, theta: Vector3<f64>) -> Matrix3<f64> {
        let rho_skew = skew(&rho);
        let theta_skew = skew(&theta);
        let theta_sq = theta.norm_squared();

        let (b, c, d) = if theta_sq < Q_BLOCK_SMALL_ANGLE_SQ {
            let theta_4 = theta_sq * theta_sq;
            (
                1.0 / 6.0 - theta_sq / 120.0 + theta_4 / 5040.0,
                1.0 / 24.0 - theta_sq / 720.0 + theta_4 / 40320.0,
                1.0 / 120.0 - theta_sq / 2520.0 + theta_4 / 120960.0,
            )
        } else {
            let angle = theta_sq.sqrt();
            let (sin_angle, cos_angle) = angle.sin_cos();
            let theta_4 = theta_sq * theta_sq;
            (
                (angle - sin_angle) / (theta_sq * angle),
                (theta_sq + 2.0 * cos_angle - 2.0) / (2.0 * theta_4),
                (2.0 * angle - 3.0 * sin_angle + angle * cos_angle) / (2.0 * theta_4 * angle),
            )
        };

        let tr = theta_skew * rho_skew;
        let rt = rho_skew * theta_skew;
        let trt = tr * theta_skew;
        let ttr = theta_skew * tr;
        let rtt = rt * theta_skew;

        let m1 = rho_skew;
        let m2 = tr + rt + trt;
        let m3 = ttr + rtt - 3.0 * trt;
        let m4 = trt * theta_skew + theta_skew * trt;

        m1 * 0.5 + m2 * b + m3 * c + m4 * d
    }

    fn negated(&self) -> Self {
        SE3Tangent { data: -self.data }
    }
}

impl Tangent<SE3> for SE3Tangent {
    const DIM: usize = 6;

    /// SE3 exponential map.
    ///
    /// # Notes
    /// M = exp(τ) = [ R(θ)   J_l(θ) ρ ]
    ///              [ 0        1      ]
    fn exp(&self, jacobian: Option<&mut <SE3 as LieGroup>::JacobianMatrix>) -> SE3 {
        let theta = self.theta();
        let rotation = SO3Tangent::new(theta).exp(None);
        let translation = left_jacobian_so3(&theta) * self.rho();

        if let Some(jac) = jacobian {
            *jac = self.right_jacobian();
        }

        SE3::from_translation_so3(translation, rotation)
    }

    /// J_r(ξ) = J_l(-ξ)
    fn right_jacobian(&self) -> <SE3 as LieGroup>::JacobianMatrix {
        self.negated().left_jacobian()
    }

    fn left_jacobian(&self) -> <SE3 as LieGroup>::JacobianMatrix {
        let theta = self.theta();
        let theta_sq = theta.norm_squared();
        if theta_sq < Q_BLOCK_SMALL_ANGLE_SQ {
            report_instability(
                SE3::NAME,
                "left_jacobian",
                NumericalRegime::SmallAngle,
                theta_sq.sqrt(),
            );
        }

        let jac_so3 = left_jacobian_so3(&theta);
        let q_block = Self::q_block_jacobian_matrix(self.rho(), theta);

        let mut jac = Matrix6::zeros();
        jac.fixed_view_mut::<3, 3>(0, 0).copy_from(&jac_so3);
        jac.fixed_view_mut::<3, 3>(3, 3).copy_from(&jac_so3);
        jac.fixed_view_mut::<3, 3>(0, 3).copy_from(&q_block);
        jac
    }

    fn right_jacobian_inv(&self) -> <SE3 as LieGroup>::JacobianMatrix {
        self.negated().left_jacobian_inv()
    }

    /// # Notes
    /// J_l⁻¹(ξ) = [J⁻¹, -J⁻¹ Q J⁻¹; 0, J⁻¹]
    fn left_jacobian_inv(&self) -> <SE3 as LieGroup>::JacobianMatrix {
        let theta = self.theta();
        let jac_so3_inv = left_jacobian_inv_so3(&theta);
        let q_block = Self::q_block_jacobian_matrix(self.rho(), theta);

        let mut jac_inv = Matrix6::zeros();
        jac_inv
            .fixed_view_mut::<3, 3>(0, 0)
            .copy_from(&jac_so3_inv);
        jac_inv
            .fixed_view_mut::<3, 3>(3, 3)
            .copy_from(&jac_so3_inv);
        jac_inv
            .fixed_view_mut::<3, 3>(0, 3)
            .copy_from(&(-jac_so3_inv * q_block * jac_so3_inv));
        jac_inv
    }

    /// ξ^ = [θ×, ρ; 0, 0]
    fn hat(&self) -> <SE3 as LieGroup>::LieAlgebra {
        let mut lie_alg = Matrix4::zeros();
        lie_alg
            .fixed_view_mut::<3, 3>(0, 0)
            .copy_from(&skew(&self.theta()));
        lie_alg
            .fixed_view_mut::<3, 1>(0, 3)
            .copy_from(&self.rho());
        lie_alg
    }

    fn vee(algebra: &<SE3 as LieGroup>::LieAlgebra) -> Self {
        SE3Tangent::from_components(
            algebra[(0, 3)],
            algebra[(1, 3)],
            algebra[(2, 3)],
            algebra[(2, 1)],
            algebra[(0, 2)],
            algebra[(1, 0)],
        )
    }

    /// p^⊙ = [p₃ I, -[p₀..₂]×; 0, 0] for a homogeneous point p
    fn odot(point: &<SE3 as LieGroup>::Point) -> <SE3 as LieGroup>::OdotMatrix {
        let xyz = Vector3::new(point.x, point.y, point.z);
        let mut result = Matrix4x6::zeros();
        result
            .fixed_view_mut::<3, 3>(0, 0)
            .copy_from(&(Matrix3::identity() * point.w));
        result
            .fixed_view_mut::<3, 3>(0, 3)
            .copy_from(&(-skew(&xyz)));
        result
    }

    /// ad(ξ) = [θ×, ρ×; 0, θ×]
    fn small_adj(&self) -> <SE3 as LieGroup>::JacobianMatrix {
        let theta_skew = skew(&self.theta());
        let mut small_adj = Matrix6::zeros();
        small_adj
            .fixed_view_mut::<3, 3>(0, 0)
            .copy_from(&theta_skew);
        small_adj
            .fixed_view_mut::<3, 3>(3, 3)
            .copy_from(&theta_skew);
        small_adj
            .fixed_view_mut::<3, 3>(0, 3)
            .copy_from(&skew(&self.rho()));
        small_adj
    }

    fn lie_bracket(&self, other: &Self) -> Self {
        SE3Tangent {
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
        SE3Tangent::from_components(data[0], data[1], data[2], data[3], data[4], data[5])
    }

    fn zero() -> Self {
        SE3Tangent {
            data: Vector6::zeros(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::f64::consts::PI;

    const TOLERANCE: f64 = 1e-12;

    #[test]
    fn test_se3_identity() {
        let se3 = SE3::identity();
        assert_eq!(se3.matrix(), Matrix4::identity());
        assert!(se3.log(None).is_zero(TOLERANCE));
    }

    #[test]
    fn test_se3_inverse() {
        let se3 = SE3::from_translation_euler(1.0, -2.0, 0.5, 0.3, -0.2, 1.4);
        let product = se3.compose(&se3.inverse(None), None, None);
        assert!(product.is_approx(&SE3::identity(), TOLERANCE));
        assert!((se3.inverse(None).matrix() - se3.matrix().try_inverse().unwrap()).norm() < TOLERANCE);
    }

    #[test]
    fn test_se3_compose_matches_matrix_product() {
        let a = SE3::from_translation_euler(0.1, 0.2, 0.3, 0.4, 0.5, 0.6);
        let b = SE3::from_translation_euler(-1.0, 0.0, 2.0, -0.3, 0.1, 0.9);
        let c = a.compose(&b, None, None);
        assert!((c.matrix() - a.matrix() * b.matrix()).norm() < TOLERANCE);
    }

    #[test]
    fn test_se3_exp_log() {
        let tangent = SE3Tangent::from_components(0.5, -1.0, 2.0, 0.4, -0.9, 1.3);
        let recovered = tangent.exp(None).log(None);
        assert!(tangent.is_approx(&recovered, 1e-11));
    }

    #[test]
    fn test_se3_small_angle_exp_log() {
        let tangent = SE3Tangent::from_components(0.5, -1.0, 2.0, 1e-7, -2e-7, 3e-8);
        let recovered = tangent.exp(None).log(None);
        assert!(tangent.is_approx(&recovered, TOLERANCE));
    }

    #[test]
    fn test_se3_exp_pure_translation() {
        let tangent = SE3Tangent::from_components(1.0, 2.0, 3.0, 0.0, 0.0, 0.0);
        let se3 = tangent.exp(None);
        assert!((se3.translation() - Vector3::new(1.0, 2.0, 3.0)).norm() < TOLERANCE);
    }

    #[test]
    fn test_se3_hat_vee() {
        let tangent = SE3Tangent::from_components(1.0, 2.0, 3.0, 0.1, 0.2, 0.3);
        let hat = tangent.hat();
        assert_eq!(hat[(0, 3)], 1.0);
        assert_eq!(hat[(1, 0)], 0.3);
        assert_eq!(hat.row(3).norm(), 0.0);
        assert_eq!(SE3Tangent::vee(&hat), tangent);
    }

    #[test]
    fn test_se3_matrix_roundtrip() {
        let se3 = SE3::from_translation_euler(0.3, 0.2, -0.1, 2.0, -1.0, 0.4);
        let recovered = SE3::from_matrix(&se3.matrix());
        assert!(se3.is_approx(&recovered, TOLERANCE));
    }

    #[test]
    fn test_se3_left_jacobian_inverse() {
        let tangent = SE3Tangent::from_components(0.3, -0.8, 1.1, 1.2, 0.4, -0.9);
        let product = tangent.left_jacobian() * tangent.left_jacobian_inv();
        assert!((product - Matrix6::identity()).norm() < 1e-12);

        let product = tangent.right_jacobian() * tangent.right_jacobian_inv();
        assert!((product - Matrix6::identity()).norm() < 1e-12);
    }

    #[test]
    fn test_se3_left_jacobian_matches_series() {
        // J_l = Σ ad(ξ)ⁿ / (n+1)!
        let tangent = SE3Tangent::from_components(0.4, -0.2, 0.7, 0.5, 0.3, -0.6);
        let ad = tangent.small_adj();
        let mut series = Matrix6::zeros();
        let mut term = Matrix6::identity();
        for n in 0..30 {
            series += term / ((n + 1) as f64);
            term = term * ad / ((n + 1) as f64);
        }
        assert!((tangent.left_jacobian() - series).norm() < 1e-11);
    }

    #[test]
    fn test_se3_q_block_branches_agree() {
        // Just below and above the Taylor threshold the Q block is continuous
        let rho = Vector3::new(0.7, -1.1, 0.4);
        let axis = Vector3::new(0.3, -0.5, 0.8).normalize();
        let below = SE3Tangent::q_block_jacobian_matrix(rho, axis * 0.999e-2);
        let above = SE3Tangent::q_block_jacobian_matrix(rho, axis * 1.001e-2);
        assert!((below - above).norm() < 1e-4);
        let mid = SE3Tangent::q_block_jacobian_matrix(rho, axis * 1e-2);
        assert!((2.0 * mid - below - above).norm() < 1e-8);
    }

    #[test]
    fn test_se3_right_left_jacobian_relationship() {
        let tangent = SE3Tangent::from_components(0.3, -0.9, 0.6, 0.2, -0.4, 0.8);
        let lhs = tangent.left_jacobian();
        let rhs = tangent.exp(None).adjoint() * tangent.right_jacobian();
        assert!((lhs - rhs).norm() < 1e-11);
    }

    #[test]
    fn test_se3_adjoint_identity() {
        let se3 = SE3::from_translation_euler(0.5, -1.5, 2.0, 0.1, 0.7, -0.3);
        let xi = SE3Tangent::from_components(0.2, 0.5, -0.4, 0.3, -0.1, 0.6);
        let lhs = SE3Tangent {
            data: se3.adjoint() * xi.coeffs(),
        }
        .hat();
        let rhs = se3.matrix() * xi.hat() * se3.inverse(None).matrix();
        assert!((lhs - rhs).norm() < TOLERANCE);
    }

    #[test]
    fn test_se3_odot_matches_hat() {
        let a = SE3Tangent::from_components(0.3, -0.6, 1.2, -0.5, 0.2, 0.9);
        let p = Vector4::new(2.0, -1.0, 0.5, 1.0);
        let lhs = a.hat() * p;
        let rhs = SE3Tangent::odot(&p) * a.coeffs();
        assert!((lhs - rhs).norm() < TOLERANCE);
    }

    #[test]
    fn test_se3_act() {
        let se3 = SE3::new(
            Vector3::new(1.0, 2.0, 3.0),
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), PI / 2.0),
        );
        let mut jac = Matrix4x6::zeros();
        let p = se3.act(&Vector4::new(1.0, 0.0, 0.0, 1.0), Some(&mut jac));
        assert!((p - Vector4::new(1.0, 3.0, 3.0, 1.0)).norm() < TOLERANCE);
        assert!((jac - SE3Tangent::odot(&p)).norm() < TOLERANCE);
    }

    #[test]
    fn test_se3_lie_bracket_matches_commutator() {
        let a = SE3Tangent::from_components(0.1, 0.2, 0.3, 0.4, 0.5, 0.6);
        let b = SE3Tangent::from_components(-0.4, 0.5, 0.6, 0.1, -0.2, 0.3);
        let commutator = a.hat() * b.hat() - b.hat() * a.hat();
        assert!((a.lie_bracket(&b).hat() - commutator).norm() < TOLERANCE);
    }

    #[test]
    fn test_se3_random_with_seed() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            let se3 = SE3::random_with(&mut rng);
            assert!(se3.is_valid(TOLERANCE));
            assert!(se3.translation().amax() <= 1.0);
        }
    }

    #[test]
    fn test_se3_isometry_roundtrip() {
        let se3 = SE3::from_translation_euler(1.0, 2.0, 3.0, 0.1, 0.2, 0.3);
        let recovered = SE3::from_isometry(se3.isometry());
        assert!(se3.is_approx(&recovered, TOLERANCE));
    }

    #[test]
    fn test_se3_generators() {
        let e0 = SE3Tangent::generator(0);
        assert_eq!(e0[(0, 3)], 1.0);
        assert_eq!(e0.norm(), 1.0);
        let e5 = SE3Tangent::generator(5);
        assert_eq!(e5[(1, 0)], 1.0);
        assert_eq!(e5[(0, 1)], -1.0);
    }
}
