use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::errors::SimulationError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    pub fn new(x: f64, y: f64) -> Self {
        Vector2D { x, y }
    }

    pub fn zero() -> Self {
        Vector2D::new(0.0, 0.0)
    }

    pub fn magnitude(&self) -> f64 {
        (self.x.powi(2) + self.y.powi(2)).sqrt()
    }

    pub fn dot(&self, other: &Vector2D) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn angle(&self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Unit vector in the same direction. A zero-magnitude vector has no
    /// direction, so normalization is reported as an error instead of
    /// propagating NaN components.
    pub fn normalized(&self) -> Result<Self, SimulationError> {
        let mag = self.magnitude();
        if mag == 0.0 {
            Err(SimulationError::DegenerateVector)
        } else {
            Ok(Vector2D::new(self.x / mag, self.y / mag))
        }
    }

    /// Rotates the vector into the local frame whose radial axis points along
    /// the polar angle `theta`, returning `(radial, tangential)` components.
    pub fn to_local_frame(&self, theta: f64) -> (f64, f64) {
        let radial = self.x * theta.cos() + self.y * theta.sin();
        let tangential = self.x * theta.sin() - self.y * theta.cos();
        (radial, tangential)
    }
}

impl Add for Vector2D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Vector2D::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vector2D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Vector2D::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for Vector2D {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        Vector2D::new(self.x * scalar, self.y * scalar)
    }
}

impl Mul<Vector2D> for f64 {
    type Output = Vector2D;

    fn mul(self, vector: Vector2D) -> Vector2D {
        Vector2D::new(self * vector.x, self * vector.y)
    }
}

impl Div<f64> for Vector2D {
    type Output = Self;

    fn div(self, scalar: f64) -> Self {
        Vector2D::new(self.x / scalar, self.y / scalar)
    }
}

impl Neg for Vector2D {
    type Output = Self;

    fn neg(self) -> Self {
        Vector2D::new(-self.x, -self.y)
    }
}
