use crate::constants::EQUATORIAL_ROTATION_VELOCITY;
use crate::control::launch::LaunchConfig;
use crate::errors::SimulationError;
use crate::trajectory_system::atmosphere;
use crate::trajectory_system::forces::{self, ForceModel};
use crate::utils::vector2d::Vector2D;

/// Raw Cartesian state of the projectile, advanced in place by the Verlet
/// stepper. `x` is horizontal surface distance and `y` altitude above sea
/// level at the launch meridian; Earth's center sits at `(0, -EARTH_RADIUS)`.
///
/// The stored acceleration is always the force model's most recent output for
/// this state; the Verlet step depends on that cached value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationState {
    pub time: f64,
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub acceleration: Vector2D,
}

/// Quantities derived from the raw state for reporting, recomputed each step
/// and never fed back into the integration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    pub time: f64,
    pub position: Vector2D,
    pub height: f64,
    pub radial_velocity: f64,
    pub tangential_velocity: f64,
    pub speed: f64,
    pub radial_acceleration: f64,
    pub tangential_acceleration: f64,
    pub acceleration: f64,
    pub air_density: f64,
    pub drag_force: f64,
}

impl StepReport {
    /// Archival row: time, x, y, radial/tangential velocity, radial/tangential
    /// acceleration, surface height, tab-separated.
    pub fn tsv_row(&self) -> String {
        format!(
            "{:.5}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.time,
            self.position.x,
            self.position.y,
            self.radial_velocity,
            self.tangential_velocity,
            self.radial_acceleration,
            self.tangential_acceleration,
            self.height
        )
    }
}

impl SimulationState {
    /// Builds the launch state: converts the launch angle to radians, credits
    /// Earth's rotational velocity to the horizontal component and evaluates
    /// the launch-site acceleration so the Verlet cache starts consistent.
    pub fn initiate(config: &LaunchConfig, forces: &ForceModel) -> Result<Self, SimulationError> {
        let angle = config.launch_angle.to_radians();
        let position = Vector2D::new(0.0, config.launch_height);
        let velocity = Vector2D::new(
            config.launch_velocity * angle.cos() + EQUATORIAL_ROTATION_VELOCITY,
            config.launch_velocity * angle.sin(),
        );
        let acceleration = forces.total_acceleration(position, velocity)?;

        Ok(SimulationState {
            time: 0.0,
            position,
            velocity,
            acceleration,
        })
    }

    /// Advances the state by one velocity-Verlet step of `timestep` seconds.
    ///
    /// The new acceleration is evaluated at the updated position with the
    /// pre-step velocity (no iteration toward a velocity-consistent drag
    /// force); the velocity update then averages the cached and the new
    /// acceleration.
    pub fn advance(&mut self, forces: &ForceModel, timestep: f64) -> Result<(), SimulationError> {
        let old_velocity = self.velocity;

        self.position = self.position
            + self.velocity * timestep
            + self.acceleration * (0.5 * timestep.powi(2));

        let new_acceleration = forces.total_acceleration(self.position, old_velocity)?;

        self.velocity = self.velocity + (self.acceleration + new_acceleration) * (0.5 * timestep);
        self.acceleration = new_acceleration;
        self.time += timestep;

        self.check_finite()
    }

    /// Altitude above the spherical surface, in meters.
    pub fn surface_height(&self) -> f64 {
        forces::surface_height(self.position)
    }

    /// Derives the reportable quantities for the current state: surface
    /// height, radial/tangential projections of velocity and acceleration,
    /// local air density and drag force. Pure; repeated calls return
    /// identical values.
    pub fn derive_report(&self, forces: &ForceModel) -> Result<StepReport, SimulationError> {
        let height = self.surface_height();
        let theta = forces::position_from_center(self.position).angle();

        let (radial_velocity, tangential_velocity) = self.velocity.to_local_frame(theta);
        let (radial_acceleration, tangential_acceleration) =
            self.acceleration.to_local_frame(theta);

        let air_density = atmosphere::air_density(height)?;
        let drag_force = forces.drag_force(self.position, self.velocity)?;

        Ok(StepReport {
            time: self.time,
            position: self.position,
            height,
            radial_velocity,
            tangential_velocity,
            speed: self.velocity.magnitude(),
            radial_acceleration,
            tangential_acceleration,
            acceleration: self.acceleration.magnitude(),
            air_density,
            drag_force,
        })
    }

    fn check_finite(&self) -> Result<(), SimulationError> {
        let components = [
            self.position.x,
            self.position.y,
            self.velocity.x,
            self.velocity.y,
            self.acceleration.x,
            self.acceleration.y,
        ];

        if components.iter().all(|value| value.is_finite()) {
            Ok(())
        } else {
            Err(SimulationError::NumericDivergence(format!(
                "non-finite state at t = {:.3} s",
                self.time
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn reference_config() -> LaunchConfig {
        LaunchConfig::default()
    }

    fn force_model(config: &LaunchConfig) -> ForceModel {
        ForceModel::new(config.mass, config.drag_coefficient, config.drag_enabled)
    }

    #[test]
    fn test_initiate_launch_state() {
        let config = reference_config();
        let forces = force_model(&config);
        let state = SimulationState::initiate(&config, &forces).unwrap();

        assert_eq!(state.time, 0.0);
        assert_eq!(state.position, Vector2D::new(0.0, 0.0));

        // 8000 m/s at 30°, plus the rotational credit on the horizontal part
        let angle = 30.0_f64.to_radians();
        assert_relative_eq!(
            state.velocity.x,
            8_000.0 * angle.cos() + EQUATORIAL_ROTATION_VELOCITY,
            epsilon = 1e-9
        );
        assert_relative_eq!(state.velocity.y, 8_000.0 * angle.sin(), epsilon = 1e-9);

        // The cached acceleration matches the force model at launch.
        let expected = forces
            .total_acceleration(state.position, state.velocity)
            .unwrap();
        assert_eq!(state.acceleration, expected);
    }

    #[test]
    fn test_advance_matches_hand_computed_step() {
        let mut config = reference_config();
        config.drag_enabled = false;
        let forces = force_model(&config);
        let mut state = SimulationState::initiate(&config, &forces).unwrap();

        let before = state;
        let dt = 0.01;
        state.advance(&forces, dt).unwrap();

        let expected_position =
            before.position + before.velocity * dt + before.acceleration * (0.5 * dt * dt);
        assert_abs_diff_eq!(state.position.x, expected_position.x, epsilon = 1e-9);
        assert_abs_diff_eq!(state.position.y, expected_position.y, epsilon = 1e-9);

        let new_acceleration = forces
            .total_acceleration(expected_position, before.velocity)
            .unwrap();
        let expected_velocity =
            before.velocity + (before.acceleration + new_acceleration) * (0.5 * dt);
        assert_abs_diff_eq!(state.velocity.x, expected_velocity.x, epsilon = 1e-9);
        assert_abs_diff_eq!(state.velocity.y, expected_velocity.y, epsilon = 1e-9);

        assert_eq!(state.acceleration, new_acceleration);
        assert_abs_diff_eq!(state.time, dt, epsilon = 1e-12);
    }

    #[test]
    fn test_advance_keeps_acceleration_cache_synchronized() {
        let config = reference_config();
        let forces = force_model(&config);
        let mut state = SimulationState::initiate(&config, &forces).unwrap();

        for _ in 0..50 {
            let velocity_before = state.velocity;
            state.advance(&forces, 0.01).unwrap();

            // The cache holds the force model's output for the new position
            // and the pre-step velocity.
            let expected = forces
                .total_acceleration(state.position, velocity_before)
                .unwrap();
            assert_eq!(state.acceleration, expected);
        }
    }

    #[test]
    fn test_derive_report_is_idempotent() {
        let config = reference_config();
        let forces = force_model(&config);
        let mut state = SimulationState::initiate(&config, &forces).unwrap();
        for _ in 0..10 {
            state.advance(&forces, 0.01).unwrap();
        }

        let first = state.derive_report(&forces).unwrap();
        let second = state.derive_report(&forces).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_report_projections_preserve_magnitudes() {
        let config = reference_config();
        let forces = force_model(&config);
        let mut state = SimulationState::initiate(&config, &forces).unwrap();
        for _ in 0..100 {
            state.advance(&forces, 0.01).unwrap();
        }

        let report = state.derive_report(&forces).unwrap();
        let projected_speed =
            (report.radial_velocity.powi(2) + report.tangential_velocity.powi(2)).sqrt();
        assert_relative_eq!(projected_speed, report.speed, epsilon = 1e-9);

        let projected_acceleration =
            (report.radial_acceleration.powi(2) + report.tangential_acceleration.powi(2)).sqrt();
        assert_relative_eq!(projected_acceleration, report.acceleration, epsilon = 1e-9);
    }

    #[test]
    fn test_vertical_launch_starts_radial() {
        // Straight up from the launch site, the radial velocity is the launch
        // speed and the tangential part is the rotational credit.
        let mut config = reference_config();
        config.launch_angle = 90.0;
        config.launch_velocity = 1_000.0;
        let forces = force_model(&config);
        let state = SimulationState::initiate(&config, &forces).unwrap();

        let report = state.derive_report(&forces).unwrap();
        assert_relative_eq!(report.radial_velocity, 1_000.0, epsilon = 1e-9);
        assert_relative_eq!(
            report.tangential_velocity.abs(),
            EQUATORIAL_ROTATION_VELOCITY,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_tsv_row_has_eight_columns() {
        let config = reference_config();
        let forces = force_model(&config);
        let state = SimulationState::initiate(&config, &forces).unwrap();
        let row = state.derive_report(&forces).unwrap().tsv_row();

        let fields: Vec<&str> = row.split('\t').collect();
        assert_eq!(fields.len(), 8, "row was: {row}");
        for field in fields {
            field.parse::<f64>().expect("every column parses as f64");
        }
    }
}
