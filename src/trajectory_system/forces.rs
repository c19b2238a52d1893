use std::f64::consts::PI;

use crate::constants::{EARTH_MASS, EARTH_RADIUS, GRAVITATIONAL_CONSTANT, PROJECTILE_DENSITY};
use crate::errors::SimulationError;
use crate::trajectory_system::atmosphere;
use crate::utils::vector2d::Vector2D;

/// Point-mass force model: inverse-square gravity toward Earth's center plus
/// optional atmospheric drag.
#[derive(Debug, Clone)]
pub struct ForceModel {
    pub mass: f64,
    pub drag_coefficient: f64,
    pub cross_section_area: f64,
    pub drag_enabled: bool,
}

impl ForceModel {
    pub fn new(mass: f64, drag_coefficient: f64, drag_enabled: bool) -> Self {
        ForceModel {
            mass,
            drag_coefficient,
            cross_section_area: cross_section_area(mass),
            drag_enabled,
        }
    }

    /// Gravitational acceleration at `position`, pointing back toward Earth's
    /// center. Fails only if the position coincides with the center itself.
    pub fn gravitational_acceleration(
        &self,
        position: Vector2D,
    ) -> Result<Vector2D, SimulationError> {
        let from_center = position_from_center(position);
        let r = from_center.magnitude();
        let magnitude = -(GRAVITATIONAL_CONSTANT * EARTH_MASS) / r.powi(2);

        Ok(from_center.normalized()? * magnitude)
    }

    /// Drag force magnitude `0.5·ρ·cd·A·|v|²` at the current surface height.
    pub fn drag_force(
        &self,
        position: Vector2D,
        velocity: Vector2D,
    ) -> Result<f64, SimulationError> {
        let density = atmosphere::air_density(surface_height(position))?;
        let speed = velocity.magnitude();

        Ok(0.5 * density * self.drag_coefficient * self.cross_section_area * speed.powi(2))
    }

    /// Drag applied opposite the velocity unit vector, per unit mass. A
    /// projectile at rest has no drag direction and sees zero drag.
    pub fn drag_acceleration(
        &self,
        position: Vector2D,
        velocity: Vector2D,
    ) -> Result<Vector2D, SimulationError> {
        if velocity.magnitude() == 0.0 {
            return Ok(Vector2D::zero());
        }

        let force = self.drag_force(position, velocity)?;
        Ok(-velocity.normalized()? * (force / self.mass))
    }

    /// Combined acceleration acting on the projectile. With drag disabled the
    /// drag term contributes exactly zero.
    pub fn total_acceleration(
        &self,
        position: Vector2D,
        velocity: Vector2D,
    ) -> Result<Vector2D, SimulationError> {
        let gravity = self.gravitational_acceleration(position)?;

        if self.drag_enabled {
            Ok(gravity + self.drag_acceleration(position, velocity)?)
        } else {
            Ok(gravity)
        }
    }
}

/// Cross-sectional area of a solid sphere of the assumed projectile density
/// and the given mass.
pub fn cross_section_area(mass: f64) -> f64 {
    (PI / 4.0) * ((4.0 * mass) / (PI * PROJECTILE_DENSITY)).powf(2.0 / 3.0)
}

/// Position vector measured from Earth's center. Launch coordinates put the
/// origin on the surface directly below the launch site.
pub fn position_from_center(position: Vector2D) -> Vector2D {
    Vector2D::new(position.x, position.y + EARTH_RADIUS)
}

/// Distance from Earth's center, in meters.
pub fn radial_height(position: Vector2D) -> f64 {
    position_from_center(position).magnitude()
}

/// Altitude above the spherical surface, in meters.
pub fn surface_height(position: Vector2D) -> f64 {
    radial_height(position) - EARTH_RADIUS
}
