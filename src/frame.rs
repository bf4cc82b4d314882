//! Orthonormal 3D frames.
//!
//! A [`Frame`] is an origin plus three right-handed orthonormal axes. Frames are
//! the inputs of [`Quaternion::rotation_between`](crate::Quaternion::rotation_between)
//! and the output of [`Quaternion::to_frame`](crate::Quaternion::to_frame).

use crate::error::{QuaternionError, QuaternionResult};
use nalgebra::{Matrix3, Point3, Vector3};
use std::fmt;
use tracing::debug;

/// Relative tolerance below which two axes are treated as parallel.
const PARALLEL_TOLERANCE: f64 = 1e-12;

/// Tolerance used by [`Frame::is_valid`].
const ORTHONORMAL_TOLERANCE: f64 = 1e-9;

/// A right-handed orthonormal frame in 3D space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    origin: Point3<f64>,
    x_axis: Vector3<f64>,
    y_axis: Vector3<f64>,
    z_axis: Vector3<f64>,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frame(origin: [{:.4}, {:.4}, {:.4}], x: [{:.4}, {:.4}, {:.4}], y: [{:.4}, {:.4}, {:.4}], z: [{:.4}, {:.4}, {:.4}])",
            self.origin.x,
            self.origin.y,
            self.origin.z,
            self.x_axis.x,
            self.x_axis.y,
            self.x_axis.z,
            self.y_axis.x,
            self.y_axis.y,
            self.y_axis.z,
            self.z_axis.x,
            self.z_axis.y,
            self.z_axis.z
        )
    }
}

impl Frame {
    /// Create a frame from an origin and two in-plane directions.
    ///
    /// `x_axis` is normalized as given. `y_axis` is made orthogonal to it
    /// (Gram-Schmidt) and normalized, and the z axis is `x × y`.
    ///
    /// # Errors
    /// [`QuaternionError::InvalidFrame`] if either direction is zero or the two
    /// directions are parallel.
    pub fn new(
        origin: Point3<f64>,
        x_axis: &Vector3<f64>,
        y_axis: &Vector3<f64>,
    ) -> QuaternionResult<Self> {
        let x_len = x_axis.norm();
        if x_len <= f64::MIN_POSITIVE || !x_len.is_finite() {
            debug!("rejecting frame with x axis {:?}", x_axis);
            return Err(QuaternionError::InvalidFrame(
                "x axis has zero length".to_string(),
            ));
        }
        let x = x_axis / x_len;

        let y_len_in = y_axis.norm();
        let y_perp = y_axis - x * x.dot(y_axis);
        let y_len = y_perp.norm();
        if y_len <= f64::MIN_POSITIVE
            || !y_len.is_finite()
            || y_len <= PARALLEL_TOLERANCE * y_len_in
        {
            debug!("rejecting frame with axes {:?} and {:?}", x_axis, y_axis);
            return Err(QuaternionError::InvalidFrame(
                "y axis is zero or parallel to x axis".to_string(),
            ));
        }
        let y = y_perp / y_len;

        Ok(Self {
            origin,
            x_axis: x,
            y_axis: y,
            z_axis: x.cross(&y),
        })
    }

    /// The world XY frame: origin at 0 with the canonical basis vectors as axes.
    pub fn world_xy() -> Self {
        Self {
            origin: Point3::origin(),
            x_axis: Vector3::x(),
            y_axis: Vector3::y(),
            z_axis: Vector3::z(),
        }
    }

    /// Build a frame from axes that are already orthonormal.
    pub(crate) fn from_axes_unchecked(
        origin: Point3<f64>,
        x_axis: Vector3<f64>,
        y_axis: Vector3<f64>,
        z_axis: Vector3<f64>,
    ) -> Self {
        Self {
            origin,
            x_axis,
            y_axis,
            z_axis,
        }
    }

    #[inline]
    pub fn origin(&self) -> Point3<f64> {
        self.origin
    }

    #[inline]
    pub fn x_axis(&self) -> Vector3<f64> {
        self.x_axis
    }

    #[inline]
    pub fn y_axis(&self) -> Vector3<f64> {
        self.y_axis
    }

    #[inline]
    pub fn z_axis(&self) -> Vector3<f64> {
        self.z_axis
    }

    /// Check that the axes are unit length, mutually orthogonal and right-handed.
    pub fn is_valid(&self) -> bool {
        let finite = self.origin.coords.iter().all(|v| v.is_finite())
            && self.axes_matrix().iter().all(|v| v.is_finite());
        if !finite {
            return false;
        }

        let unit = [self.x_axis, self.y_axis, self.z_axis]
            .iter()
            .all(|axis| (axis.norm() - 1.0).abs() < ORTHONORMAL_TOLERANCE);
        let orthogonal = self.x_axis.dot(&self.y_axis).abs() < ORTHONORMAL_TOLERANCE
            && self.y_axis.dot(&self.z_axis).abs() < ORTHONORMAL_TOLERANCE
            && self.z_axis.dot(&self.x_axis).abs() < ORTHONORMAL_TOLERANCE;
        let right_handed =
            (self.x_axis.cross(&self.y_axis) - self.z_axis).norm() < ORTHONORMAL_TOLERANCE;

        unit && orthogonal && right_handed
    }

    /// Matrix whose columns are the x, y and z axes.
    pub fn axes_matrix(&self) -> Matrix3<f64> {
        Matrix3::from_columns(&[self.x_axis, self.y_axis, self.z_axis])
    }

    /// Rotation matrix `R` mapping this frame's axes onto `other`'s axes.
    ///
    /// R = [x₁ y₁ z₁] · [x₀ y₀ z₀]ᵀ, origins are ignored.
    pub fn rotation_matrix_to(&self, other: &Frame) -> Matrix3<f64> {
        other.axes_matrix() * self.axes_matrix().transpose()
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::world_xy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    #[test]
    fn test_world_xy_is_valid() {
        let frame = Frame::world_xy();
        assert!(frame.is_valid());
        assert_eq!(frame.axes_matrix(), Matrix3::identity());
    }

    #[test]
    fn test_new_orthonormalizes() {
        let frame = Frame::new(
            Point3::new(1.0, 2.0, 3.0),
            &Vector3::new(2.0, 0.0, 0.0),
            &Vector3::new(1.0, 3.0, 0.0),
        )
        .unwrap();

        assert!(frame.is_valid());
        assert!((frame.x_axis() - Vector3::x()).norm() < TOLERANCE);
        assert!((frame.y_axis() - Vector3::y()).norm() < TOLERANCE);
        assert!((frame.z_axis() - Vector3::z()).norm() < TOLERANCE);
        assert_eq!(frame.origin(), Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_new_rejects_zero_axis() {
        let result = Frame::new(Point3::origin(), &Vector3::zeros(), &Vector3::y());
        assert!(matches!(result, Err(QuaternionError::InvalidFrame(_))));
    }

    #[test]
    fn test_new_rejects_non_finite_y_axis() {
        for y_axis in [
            Vector3::new(f64::NAN, 1.0, 0.0),
            Vector3::new(0.0, f64::INFINITY, 0.0),
        ] {
            let result = Frame::new(Point3::origin(), &Vector3::x(), &y_axis);
            assert!(matches!(result, Err(QuaternionError::InvalidFrame(_))));
        }
    }

    #[test]
    fn test_new_rejects_parallel_axes() {
        let result = Frame::new(
            Point3::origin(),
            &Vector3::new(1.0, 1.0, 0.0),
            &Vector3::new(-2.0, -2.0, 0.0),
        );
        assert!(matches!(result, Err(QuaternionError::InvalidFrame(_))));
    }

    #[test]
    fn test_rotation_matrix_to_maps_axes() {
        let from = Frame::world_xy();
        let to = Frame::new(
            Point3::origin(),
            &Vector3::new(0.0, 1.0, 0.0),
            &Vector3::new(-1.0, 0.0, 0.0),
        )
        .unwrap();

        let r = from.rotation_matrix_to(&to);
        assert!((r * from.x_axis() - to.x_axis()).norm() < TOLERANCE);
        assert!((r * from.y_axis() - to.y_axis()).norm() < TOLERANCE);
        assert!((r * from.z_axis() - to.z_axis()).norm() < TOLERANCE);
        assert!((r.determinant() - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_is_valid_detects_left_handed() {
        let frame = Frame::from_axes_unchecked(
            Point3::origin(),
            Vector3::x(),
            Vector3::y(),
            -Vector3::z(),
        );
        assert!(!frame.is_valid());
    }
}
