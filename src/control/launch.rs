use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_END_TIME, DEFAULT_TIME_STEP};
use crate::errors::SimulationError;

/// Immutable launch parameters for one simulation run.
///
/// Defaults reproduce the reference flight: sea-level launch at 30° and
/// 8000 m/s, a 500 kg projectile with cd 0.12 and drag enabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    /// Initial height above sea level, m.
    pub launch_height: f64,
    /// Launch angle above the horizon, degrees.
    pub launch_angle: f64,
    /// Launch speed along the launch angle, m/s.
    pub launch_velocity: f64,
    /// Projectile mass, kg.
    pub mass: f64,
    /// Dimensionless drag coefficient.
    pub drag_coefficient: f64,
    /// Whether atmospheric drag acts on the projectile.
    pub drag_enabled: bool,
    /// Fixed integration step, s.
    pub timestep: f64,
    /// Simulation time cap, s.
    pub end_time: f64,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        LaunchConfig {
            launch_height: 0.0,
            launch_angle: 30.0,
            launch_velocity: 8_000.0,
            mass: 500.0,
            drag_coefficient: 0.12,
            drag_enabled: true,
            timestep: DEFAULT_TIME_STEP,
            end_time: DEFAULT_END_TIME,
        }
    }
}

impl LaunchConfig {
    /// Loads and validates a launch configuration from a YAML file. Absent
    /// fields fall back to the reference-flight defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SimulationError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SimulationError::ConfigurationError(format!(
                "configuration file not found: {}",
                path.display()
            )));
        }

        let contents = fs::read_to_string(path)?;
        let config: LaunchConfig = serde_yaml::from_str(&contents)?;
        config.validate()?;

        Ok(config)
    }

    /// Rejects parameter combinations the physics cannot represent before a
    /// run starts.
    pub fn validate(&self) -> Result<(), SimulationError> {
        let finite = [
            self.launch_height,
            self.launch_angle,
            self.launch_velocity,
            self.mass,
            self.drag_coefficient,
            self.timestep,
            self.end_time,
        ]
        .iter()
        .all(|value| value.is_finite());
        if !finite {
            return Err(SimulationError::ConfigurationError(
                "all launch parameters must be finite".to_string(),
            ));
        }

        if self.mass <= 0.0 {
            return Err(SimulationError::ConfigurationError(format!(
                "mass must be positive, got {}",
                self.mass
            )));
        }
        if self.launch_velocity < 0.0 {
            return Err(SimulationError::ConfigurationError(format!(
                "launch velocity cannot be negative, got {}",
                self.launch_velocity
            )));
        }
        if self.launch_height < 0.0 {
            return Err(SimulationError::ConfigurationError(format!(
                "launch height cannot be below sea level, got {}",
                self.launch_height
            )));
        }
        if self.drag_coefficient < 0.0 {
            return Err(SimulationError::ConfigurationError(format!(
                "drag coefficient cannot be negative, got {}",
                self.drag_coefficient
            )));
        }
        if self.timestep <= 0.0 {
            return Err(SimulationError::ConfigurationError(format!(
                "timestep must be positive, got {}",
                self.timestep
            )));
        }
        if self.end_time <= 0.0 {
            return Err(SimulationError::ConfigurationError(format!(
                "end time must be positive, got {}",
                self.end_time
            )));
        }

        Ok(())
    }
}
