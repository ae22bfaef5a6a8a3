use std::ops::{Mul, MulAssign};

use super::Point;

/// A 3x3 matrix of which only 6 of the 9 values can be specified.
///
/// The full matrix is of the form:
///
/// [a b 0]
/// [c d 0]
/// [e f 1]
///
/// Points are treated as row vectors, so in a product `m1 * m2` the
/// transform `m1` is applied first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Mul<Matrix> for Matrix {
    type Output = Matrix;
    fn mul(self, other: Matrix) -> Self::Output {
        let a = self.a * other.a + self.b * other.c;
        let c = self.c * other.a + self.d * other.c;
        let e = self.e * other.a + self.f * other.c + other.e;

        let b = self.a * other.b + self.b * other.d;
        let d = self.c * other.b + self.d * other.d;
        let f = self.e * other.b + self.f * other.d + other.f;

        Matrix::new(a, b, c, d, e, f)
    }
}

impl MulAssign<Matrix> for Matrix {
    fn mul_assign(&mut self, rhs: Matrix) {
        *self = *self * rhs;
    }
}

impl Matrix {
    pub fn identity() -> Self {
        Matrix {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn translation(x: f32, y: f32) -> Self {
        let mut identity = Self::identity();

        identity.e = x;
        identity.f = y;

        identity
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        let mut identity = Self::identity();

        identity.a = sx;
        identity.d = sy;

        identity
    }

    pub fn a(&self) -> f32 {
        self.a
    }

    pub fn e(&self) -> f32 {
        self.e
    }

    pub fn map(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }
}
