//! Arithmetic operators for [`Quaternion`].
//!
//! Scalars of type `i32`, `f32` and `f64` scale component-wise from either side.
//! Division by a zero scalar yields [`Quaternion::ZERO`].

use super::Quaternion;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

impl Add for Quaternion {
    type Output = Quaternion;

    fn add(self, rhs: Quaternion) -> Quaternion {
        Quaternion::new(
            self.a + rhs.a,
            self.b + rhs.b,
            self.c + rhs.c,
            self.d + rhs.d,
        )
    }
}

impl Sub for Quaternion {
    type Output = Quaternion;

    fn sub(self, rhs: Quaternion) -> Quaternion {
        Quaternion::new(
            self.a - rhs.a,
            self.b - rhs.b,
            self.c - rhs.c,
            self.d - rhs.d,
        )
    }
}

impl Neg for Quaternion {
    type Output = Quaternion;

    fn neg(self) -> Quaternion {
        Quaternion::new(-self.a, -self.b, -self.c, -self.d)
    }
}

impl AddAssign for Quaternion {
    fn add_assign(&mut self, rhs: Quaternion) {
        *self = *self + rhs;
    }
}

impl SubAssign for Quaternion {
    fn sub_assign(&mut self, rhs: Quaternion) {
        *self = *self - rhs;
    }
}

/// Hamilton product. Not commutative.
///
/// For p = a + b*i + c*j + d*k and q = e + f*i + g*j + h*k:
/// p * q = (ae - bf - cg - dh) +
///         (af + be + ch - dg)*i +
///         (ag - bh + ce + df)*j +
///         (ah + bg - cf + de)*k
impl Mul for Quaternion {
    type Output = Quaternion;

    fn mul(self, q: Quaternion) -> Quaternion {
        let p = self;
        Quaternion::new(
            p.a * q.a - p.b * q.b - p.c * q.c - p.d * q.d,
            p.a * q.b + p.b * q.a + p.c * q.d - p.d * q.c,
            p.a * q.c - p.b * q.d + p.c * q.a + p.d * q.b,
            p.a * q.d + p.b * q.c - p.c * q.b + p.d * q.a,
        )
    }
}

impl MulAssign for Quaternion {
    fn mul_assign(&mut self, rhs: Quaternion) {
        *self = *self * rhs;
    }
}

macro_rules! impl_scalar_ops {
    ($($t:ty),*) => {$(
        impl Mul<$t> for Quaternion {
            type Output = Quaternion;

            fn mul(self, x: $t) -> Quaternion {
                self.scaled(f64::from(x))
            }
        }

        impl Mul<Quaternion> for $t {
            type Output = Quaternion;

            fn mul(self, q: Quaternion) -> Quaternion {
                q.scaled(f64::from(self))
            }
        }

        impl Div<$t> for Quaternion {
            type Output = Quaternion;

            fn div(self, y: $t) -> Quaternion {
                let y = f64::from(y);
                let x = if y != 0.0 { 1.0 / y } else { 0.0 };
                self.scaled(x)
            }
        }

        impl MulAssign<$t> for Quaternion {
            fn mul_assign(&mut self, x: $t) {
                *self = *self * x;
            }
        }

        impl DivAssign<$t> for Quaternion {
            fn div_assign(&mut self, y: $t) {
                *self = *self / y;
            }
        }
    )*};
}

impl_scalar_ops!(i32, f32, f64);
