//! # Apex Quaternion
//!
//! Quaternion algebra for geometry kernels.
//!
//! ## Features
//!
//! - **Field arithmetic**: addition, Hamilton product, scalar scaling and safe scalar division
//! - **Inversion**: a silent `inverse()` and a checked `invert()`
//! - **Rotations**: axis-angle construction and extraction, vector rotation, frame-to-frame rotations
//! - **Matrix form**: the 4×4 real matrix representation of the quaternion algebra
//! - **Binary interchange**: `#[repr(C)]` layout of four consecutive doubles (a, b, c, d)

pub mod error;
pub mod frame;
pub mod logger;
pub mod quaternion;

pub use error::{QuaternionError, QuaternionResult};
pub use frame::Frame;
pub use logger::{init_logger, init_logger_with_level};
pub use quaternion::{AxisAngle, Quaternion};
