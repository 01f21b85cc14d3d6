//! # lieops
//!
//! Matrix Lie groups for robotics and state estimation: rotations and rigid
//! transformations in 2D and 3D together with the operators that move between
//! group matrices and tangent vectors.
//!
//! ## Features
//!
//! - **Groups**: SO(2), SO(3), SE(2), SE(3)
//! - **Closed forms**: wedge/vee, exp/log, left Jacobians and their analytic
//!   inverses, adjoint, odot, with Taylor branches near the identity
//! - **Two layers**: fixed-size typed elements ([`manifold::LieGroup`]) and a
//!   validating matrix API ([`manifold::matrix::MatrixGroup`])
//! - **Seedable sampling**: every group draws random elements from an injected
//!   `rand::Rng`
//!
//! ## Conventions
//!
//! - Pose tangents put translation first: SE(2) `[ρx, ρy, θ]`, SE(3) `[ρ, θ]`.
//! - `Exp(x) = exp(wedge(x))` and `Log(X) = vee(log(X))`.
//! - Near-singular branches are reported through `tracing`, never as errors.
//!
//! ```rust
//! use lieops::{SO3Group, LieResult};
//! use nalgebra::DVector;
//!
//! fn main() -> LieResult<()> {
//!     let so3 = SO3Group::new();
//!     let x = DVector::from_vec(vec![0.05, -0.02, 0.1]);
//!     let r = so3.exp_vector(&x)?;
//!     let jl = so3.left_jacobian(&x)?;
//!     assert!((so3.log_vector(&r)? - &x).norm() < 1e-12);
//!     assert!((jl * so3.left_jacobian_inv(&x)? - nalgebra::DMatrix::identity(3, 3)).norm() < 1e-12);
//!     Ok(())
//! }
//! ```

pub mod error;
#[cfg(feature = "logging")]
pub mod logger;
pub mod manifold;

pub use error::{LieError, LieResult};
#[cfg(feature = "logging")]
pub use logger::{init_logger, init_logger_with_level};
pub use manifold::matrix::{
    MatrixGroup, MatrixGroupConfig, SE2Group, SE3Group, SO2Group, SO3Group,
};
pub use manifold::{
    LieGroup, ManifoldError, ManifoldResult, Tangent,
    se2::{SE2, SE2Tangent},
    se3::{SE3, SE3Tangent},
    so2::{SO2, SO2Tangent},
    so3::{SO3, SO3Tangent},
};
