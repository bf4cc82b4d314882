//! Quaternion algebra.
//!
//! This module provides a general (not necessarily unit) quaternion
//! `a + b·i + c·j + d·k` with the full field arithmetic, inversion, axis-angle
//! and frame rotation conversions, and the 4×4 real matrix form.
//!
//! # Failure conventions
//!
//! Two failure conventions apply:
//!
//! - Read-only derived values never fail. [`Quaternion::inverse`] of the zero
//!   quaternion is the zero quaternion, and dividing by a zero scalar yields
//!   [`Quaternion::ZERO`].
//! - Mutating and extracting operations ([`Quaternion::invert`],
//!   [`Quaternion::unitize`], [`Quaternion::to_axis_angle`],
//!   [`Quaternion::to_frame`]) return a [`QuaternionResult`]. An `Err` carries
//!   no partial value.
//!
//! # Examples
//!
//! ```
//! use apex_quaternion::Quaternion;
//! use nalgebra::Vector3;
//!
//! let q = Quaternion::rotation(std::f64::consts::FRAC_PI_2, &Vector3::z());
//! let rotated = q.rotate(&Vector3::x());
//! assert!((rotated - Vector3::y()).norm() < 1e-12);
//!
//! assert_eq!(Quaternion::I * Quaternion::J, Quaternion::K);
//! assert_eq!(Quaternion::J * Quaternion::I, -Quaternion::K);
//! ```

use crate::error::{QuaternionError, QuaternionResult};
use crate::frame::Frame;
use bytemuck::{Pod, Zeroable};
use nalgebra::{Matrix3, Matrix4, Point3, Vector3, Vector4};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

mod ops;

/// A quaternion `a + b·i + c·j + d·k`.
///
/// Laid out as four consecutive `f64` values in the order a, b, c, d, so slices
/// of quaternions can be handed to numeric code expecting that layout (see
/// [`Quaternion::as_flat_slice`]).
///
/// Equality is exact component-wise comparison; use [`Quaternion::is_approx`]
/// when a tolerance is needed.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Quaternion {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
}

/// Result of [`Quaternion::to_axis_angle`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisAngle {
    /// Rotation angle in radians, in [0, 2π]
    pub angle: f64,
    /// Unit rotation axis
    pub axis: Vector3<f64>,
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Quaternion(a: {:.4}, b: {:.4}, c: {:.4}, d: {:.4})",
            self.a, self.b, self.c, self.d
        )
    }
}

impl Quaternion {
    /// The zero quaternion (0, 0, 0, 0).
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// The multiplicative identity (1, 0, 0, 0).
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 0.0);
    /// The imaginary unit i = (0, 1, 0, 0).
    pub const I: Self = Self::new(0.0, 1.0, 0.0, 0.0);
    /// The imaginary unit j = (0, 0, 1, 0).
    pub const J: Self = Self::new(0.0, 0.0, 1.0, 0.0);
    /// The imaginary unit k = (0, 0, 0, 1).
    pub const K: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Create a quaternion from its four components.
    ///
    /// # Arguments
    /// * `a` - Real (scalar) part
    /// * `b` - i component
    /// * `c` - j component
    /// * `d` - k component
    #[inline]
    pub const fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self::ZERO
    }

    #[inline]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    #[inline]
    pub fn a(&self) -> f64 {
        self.a
    }

    #[inline]
    pub fn b(&self) -> f64 {
        self.b
    }

    #[inline]
    pub fn c(&self) -> f64 {
        self.c
    }

    #[inline]
    pub fn d(&self) -> f64 {
        self.d
    }

    #[inline]
    pub fn set_a(&mut self, a: f64) {
        self.a = a;
    }

    #[inline]
    pub fn set_b(&mut self, b: f64) {
        self.b = b;
    }

    #[inline]
    pub fn set_c(&mut self, c: f64) {
        self.c = c;
    }

    #[inline]
    pub fn set_d(&mut self, d: f64) {
        self.d = d;
    }

    /// Overwrite all four components.
    pub fn set(&mut self, a: f64, b: f64, c: f64, d: f64) {
        *self = Self::new(a, b, c, d);
    }

    /// Get all components as an array [a, b, c, d].
    #[inline]
    pub fn coords(&self) -> [f64; 4] {
        [self.a, self.b, self.c, self.d]
    }

    /// Borrow the components as an array, without copying.
    #[inline]
    pub fn as_array(&self) -> &[f64; 4] {
        bytemuck::cast_ref(self)
    }

    /// View a slice of quaternions as a flat slice of `4 * len` doubles.
    pub fn as_flat_slice(quaternions: &[Quaternion]) -> &[f64] {
        bytemuck::cast_slice(quaternions)
    }

    /// View a flat slice of doubles as quaternions.
    ///
    /// # Errors
    /// [`QuaternionError::InvalidInput`] if the length is not a multiple of 4.
    pub fn from_flat_slice(values: &[f64]) -> QuaternionResult<&[Quaternion]> {
        bytemuck::try_cast_slice(values).map_err(|err| {
            QuaternionError::InvalidInput(format!(
                "cannot view {} doubles as quaternions: {err}",
                values.len()
            ))
        })
    }

    /// Components as a column vector [a, b, c, d].
    #[inline]
    pub fn to_vector4(&self) -> Vector4<f64> {
        Vector4::new(self.a, self.b, self.c, self.d)
    }

    /// The real part a.
    #[inline]
    pub fn scalar(&self) -> f64 {
        self.a
    }

    /// The imaginary part (b, c, d).
    #[inline]
    pub fn vector(&self) -> Vector3<f64> {
        Vector3::new(self.b, self.c, self.d)
    }

    /// True if a, b, c and d are all finite.
    pub fn is_valid(&self) -> bool {
        self.a.is_finite() && self.b.is_finite() && self.c.is_finite() && self.d.is_finite()
    }

    /// True if a, b, c and d are all zero.
    pub fn is_zero(&self) -> bool {
        self.a == 0.0 && self.b == 0.0 && self.c == 0.0 && self.d == 0.0
    }

    /// True if b, c and d are all zero.
    pub fn is_scalar(&self) -> bool {
        self.b == 0.0 && self.c == 0.0 && self.d == 0.0
    }

    /// True if a is zero and at least one of b, c or d is not.
    pub fn is_vector(&self) -> bool {
        self.a == 0.0 && (self.b != 0.0 || self.c != 0.0 || self.d != 0.0)
    }

    /// a² + b² + c² + d²
    #[inline]
    pub fn length_squared(&self) -> f64 {
        self.a * self.a + self.b * self.b + self.c * self.c + self.d * self.d
    }

    /// The Euclidean norm √(a² + b² + c² + d²).
    ///
    /// Components are scaled by the largest magnitude first, so the result does
    /// not overflow or underflow for any finite input.
    pub fn length(&self) -> f64 {
        if !self.is_valid() {
            return self.length_squared().sqrt();
        }

        let [fa, fb, fc, fd] = self.coords().map(f64::abs);
        let max = fa.max(fb).max(fc).max(fd);

        if max > f64::MIN_POSITIVE {
            let inv = 1.0 / max;
            let (sa, sb, sc, sd) = (fa * inv, fb * inv, fc * inv, fd * inv);
            max * (sa * sa + sb * sb + sc * sc + sd * sd).sqrt()
        } else {
            // subnormal or zero: squaring would flush to zero
            max
        }
    }

    /// Length of the difference `q - self`.
    pub fn distance_to(&self, q: &Quaternion) -> f64 {
        (*q - *self).length()
    }

    /// Length of the difference `q - p`.
    pub fn distance(p: &Quaternion, q: &Quaternion) -> f64 {
        p.distance_to(q)
    }

    /// The conjugate (a, -b, -c, -d).
    #[inline]
    pub fn conjugate(&self) -> Self {
        Self::new(self.a, -self.b, -self.c, -self.d)
    }

    /// The multiplicative inverse (a, -b, -c, -d) / (a² + b² + c² + d²).
    ///
    /// Returns [`Quaternion::ZERO`] for the zero quaternion, or when the inverse
    /// is not representable. Use [`Quaternion::invert`] to detect that case.
    pub fn inverse(&self) -> Self {
        self.checked_inverse().unwrap_or(Self::ZERO)
    }

    /// Replace this quaternion by its multiplicative inverse.
    ///
    /// # Errors
    /// [`QuaternionError::NotInvertible`] if the quaternion is zero or its
    /// inverse is not finite. `self` is left unchanged in that case.
    pub fn invert(&mut self) -> QuaternionResult<()> {
        match self.checked_inverse() {
            Some(inv) => {
                *self = inv;
                Ok(())
            }
            None => {
                debug!("cannot invert {}", self);
                Err(QuaternionError::NotInvertible)
            }
        }
    }

    // Divides by |q| twice so |q|² never has to be formed.
    fn checked_inverse(&self) -> Option<Self> {
        if self.is_zero() {
            return None;
        }
        let x = 1.0 / self.length();
        let inv = self.conjugate().scaled(x).scaled(x);
        inv.is_valid().then_some(inv)
    }

    /// Scale so that a² + b² + c² + d² = 1.
    ///
    /// # Errors
    /// [`QuaternionError::ZeroLength`] if the quaternion is (numerically) zero.
    /// `self` is left unchanged in that case.
    pub fn unitize(&mut self) -> QuaternionResult<()> {
        let len = self.length();
        if len <= f64::MIN_POSITIVE || !len.is_finite() {
            debug!("cannot unitize {}", self);
            return Err(QuaternionError::ZeroLength);
        }
        *self = self.scaled(1.0 / len);
        Ok(())
    }

    /// Component-wise comparison within an absolute tolerance.
    pub fn is_approx(&self, other: &Self, tolerance: f64) -> bool {
        (self.a - other.a).abs() <= tolerance
            && (self.b - other.b).abs() <= tolerance
            && (self.c - other.c).abs() <= tolerance
            && (self.d - other.d).abs() <= tolerance
    }

    #[inline]
    pub(crate) fn scaled(self, x: f64) -> Self {
        Self::new(self.a * x, self.b * x, self.c * x, self.d * x)
    }

    // ------------------------------------------------------------------------
    // Rotations
    // ------------------------------------------------------------------------

    /// The unit quaternion for a rotation of `angle` radians about `axis`.
    ///
    /// # Formula
    /// q = cos(θ/2) + sin(θ/2) * (ux*i + uy*j + uz*k)
    /// where (ux, uy, uz) is the normalized axis
    ///
    /// A zero `axis` yields (cos(θ/2), 0, 0, 0).
    pub fn rotation(angle: f64, axis: &Vector3<f64>) -> Self {
        let axis_len = axis.norm();
        let s = if axis_len > 0.0 {
            (0.5 * angle).sin() / axis_len
        } else {
            0.0
        };
        Self::new((0.5 * angle).cos(), s * axis.x, s * axis.y, s * axis.z)
    }

    /// Set this quaternion to [`Quaternion::rotation`]`(angle, axis)`.
    pub fn set_rotation(&mut self, angle: f64, axis: &Vector3<f64>) {
        *self = Self::rotation(angle, axis);
    }

    /// Recover the rotation angle and unit axis.
    ///
    /// Non-unit quaternions report the rotation of their unitized form. The angle
    /// is 2·acos(a/|q|), in [0, 2π].
    ///
    /// # Errors
    /// [`QuaternionError::DegenerateRotation`] if the quaternion is (numerically)
    /// zero or its vector part is zero. The identity has no defined axis and
    /// therefore fails too.
    pub fn to_axis_angle(&self) -> QuaternionResult<AxisAngle> {
        let s = self.length();
        if s <= f64::MIN_POSITIVE || !s.is_finite() {
            debug!("no rotation for {}", self);
            return Err(QuaternionError::DegenerateRotation(
                "quaternion has zero or non-finite length".to_string(),
            ));
        }

        let v = self.vector();
        let v_len = v.norm();
        if v_len <= f64::MIN_POSITIVE {
            debug!("no rotation axis for {}", self);
            return Err(QuaternionError::DegenerateRotation(
                "vector part is zero".to_string(),
            ));
        }

        Ok(AxisAngle {
            angle: 2.0 * (self.a / s).clamp(-1.0, 1.0).acos(),
            axis: v / v_len,
        })
    }

    /// Rotate a 3D vector by the rotation this quaternion represents.
    ///
    /// Computes (q · (0, v) · q̄) / |q|², so non-unit quaternions rotate like
    /// their unitized form. A quaternion that cannot be unitized (zero,
    /// subnormal or non-finite) maps every vector to zero.
    pub fn rotate(&self, v: &Vector3<f64>) -> Vector3<f64> {
        let mut unit = *self;
        if unit.unitize().is_err() {
            return Vector3::zeros();
        }

        // v' = (a² - |u|²) v + 2 (u·v) u + 2a (u × v), u = (b, c, d), |q| = 1
        let a = unit.a;
        let u = unit.vector();
        v * (a * a - u.norm_squared()) + u * (2.0 * u.dot(v)) + u.cross(v) * (2.0 * a)
    }

    /// The unit quaternion rotating `frame0`'s axes onto `frame1`'s axes.
    ///
    /// Frame origins are ignored.
    pub fn rotation_between(frame0: &Frame, frame1: &Frame) -> Self {
        Self::from_rotation_matrix(&frame0.rotation_matrix_to(frame1))
    }

    /// Set this quaternion to [`Quaternion::rotation_between`]`(frame0, frame1)`.
    pub fn set_rotation_between(&mut self, frame0: &Frame, frame1: &Frame) {
        *self = Self::rotation_between(frame0, frame1);
    }

    /// The frame obtained by rotating the world axes, with origin at 0.
    ///
    /// # Errors
    /// [`QuaternionError::DegenerateRotation`] for a zero or non-finite
    /// quaternion, or when the rotated axes are not finite.
    pub fn to_frame(&self) -> QuaternionResult<Frame> {
        if !self.is_valid() || self.length() <= f64::MIN_POSITIVE {
            debug!("no frame for {}", self);
            return Err(QuaternionError::DegenerateRotation(
                "quaternion has zero or non-finite length".to_string(),
            ));
        }

        let x = self.rotate(&Vector3::x());
        let y = self.rotate(&Vector3::y());
        let z = self.rotate(&Vector3::z());
        if [x, y, z].iter().any(|axis| axis.iter().any(|c| !c.is_finite())) {
            debug!("rotated axes of {} are not finite", self);
            return Err(QuaternionError::DegenerateRotation(
                "rotated axes are not finite".to_string(),
            ));
        }

        Ok(Frame::from_axes_unchecked(Point3::origin(), x, y, z))
    }

    /// Unit quaternion from a proper 3×3 rotation matrix (Shepperd's method).
    fn from_rotation_matrix(m: &Matrix3<f64>) -> Self {
        let trace = m[(0, 0)] + m[(1, 1)] + m[(2, 2)];

        let (a, b, c, d) = if trace > 0.0 {
            let s = (trace + 1.0).sqrt() * 2.0; // s = 4*a
            (
                0.25 * s,
                (m[(2, 1)] - m[(1, 2)]) / s,
                (m[(0, 2)] - m[(2, 0)]) / s,
                (m[(1, 0)] - m[(0, 1)]) / s,
            )
        } else if m[(0, 0)] > m[(1, 1)] && m[(0, 0)] > m[(2, 2)] {
            let s = (1.0 + m[(0, 0)] - m[(1, 1)] - m[(2, 2)]).sqrt() * 2.0; // s = 4*b
            (
                (m[(2, 1)] - m[(1, 2)]) / s,
                0.25 * s,
                (m[(0, 1)] + m[(1, 0)]) / s,
                (m[(0, 2)] + m[(2, 0)]) / s,
            )
        } else if m[(1, 1)] > m[(2, 2)] {
            let s = (1.0 + m[(1, 1)] - m[(0, 0)] - m[(2, 2)]).sqrt() * 2.0; // s = 4*c
            (
                (m[(0, 2)] - m[(2, 0)]) / s,
                (m[(0, 1)] + m[(1, 0)]) / s,
                0.25 * s,
                (m[(1, 2)] + m[(2, 1)]) / s,
            )
        } else {
            let s = (1.0 + m[(2, 2)] - m[(0, 0)] - m[(1, 1)]).sqrt() * 2.0; // s = 4*d
            (
                (m[(1, 0)] - m[(0, 1)]) / s,
                (m[(0, 2)] + m[(2, 0)]) / s,
                (m[(1, 2)] + m[(2, 1)]) / s,
                0.25 * s,
            )
        };

        Self::new(a, b, c, d)
    }

    // ------------------------------------------------------------------------
    // Matrix form and products
    // ------------------------------------------------------------------------

    /// The 4×4 real matrix form
    ///
    /// ```text
    ///  a  b  c  d
    /// -b  a -d  c
    /// -c  d  a -b
    /// -d -c  b  a
    /// ```
    ///
    /// For a row 4-vector x, xᵀ·M(q) = x * q, and M(p)·M(q) = M(p * q).
    ///
    /// This is not the rotation matrix of the quaternion.
    pub fn matrix_form(&self) -> Matrix4<f64> {
        let (a, b, c, d) = (self.a, self.b, self.c, self.d);
        #[rustfmt::skip]
        let m = Matrix4::new(
             a,  b,  c,  d,
            -b,  a, -d,  c,
            -c,  d,  a, -b,
            -d, -c,  b,  a,
        );
        m
    }

    /// The Hamilton product `p * q`.
    #[inline]
    pub fn product(p: &Quaternion, q: &Quaternion) -> Self {
        *p * *q
    }

    /// The vector cross product (0, p.vector() × q.vector()).
    ///
    /// Not the same as the Hamilton product `p * q`.
    pub fn cross_product(p: &Quaternion, q: &Quaternion) -> Self {
        Self::new(
            0.0,
            p.c * q.d - p.d * q.c,
            p.d * q.b - p.b * q.d,
            p.b * q.c - p.c * q.b,
        )
    }
}

impl From<[f64; 4]> for Quaternion {
    fn from([a, b, c, d]: [f64; 4]) -> Self {
        Self::new(a, b, c, d)
    }
}

impl From<Quaternion> for [f64; 4] {
    fn from(q: Quaternion) -> Self {
        q.coords()
    }
}

impl From<Vector4<f64>> for Quaternion {
    fn from(v: Vector4<f64>) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

// ============================================================================
// Tests
// ============================================================================
