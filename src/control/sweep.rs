use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::constants::{
    EARTH_MASS, EARTH_RADIUS, GRAVITATIONAL_CONSTANT, STANDARD_GRAVITY,
};
use crate::control::driver::{fly, MaxHeightTracker, TsvWriter};
use crate::control::launch::LaunchConfig;
use crate::errors::SimulationError;

/// Search ceiling for the minimum-velocity refinement. Anything above this is
/// treated as an unreachable target rather than looping forever.
const VELOCITY_SEARCH_CEILING: f64 = 50_000.0; // m/s

/// Which launch parameter a sweep varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepVariable {
    LaunchHeight,
    LaunchAngle,
    LaunchVelocity,
    Mass,
}

impl SweepVariable {
    pub fn label(&self) -> &'static str {
        match self {
            SweepVariable::LaunchHeight => "height",
            SweepVariable::LaunchAngle => "angle",
            SweepVariable::LaunchVelocity => "velocity",
            SweepVariable::Mass => "mass",
        }
    }

    fn apply(&self, config: &mut LaunchConfig, value: f64) {
        match self {
            SweepVariable::LaunchHeight => config.launch_height = value,
            SweepVariable::LaunchAngle => config.launch_angle = value,
            SweepVariable::LaunchVelocity => config.launch_velocity = value,
            SweepVariable::Mass => config.mass = value,
        }
    }
}

/// Runs one flight per swept value and collects `(value, max surface height)`
/// pairs. A failed run is logged and skipped; it does not abort the sweep.
pub fn sweep_max_height(
    base: &LaunchConfig,
    variable: SweepVariable,
    values: &[f64],
) -> Vec<(f64, f64)> {
    let mut results = Vec::with_capacity(values.len());

    for &value in values {
        let mut config = base.clone();
        variable.apply(&mut config, value);

        let mut tracker = MaxHeightTracker::new();
        match fly(&config, &mut tracker) {
            Ok(summary) => {
                debug!(
                    variable = variable.label(),
                    value,
                    max_height = summary.max_height,
                    "sweep run complete"
                );
                results.push((value, summary.max_height));
            }
            Err(error) => {
                warn!(
                    variable = variable.label(),
                    value,
                    %error,
                    "skipping failed sweep run"
                );
            }
        }
    }

    results
}

/// Runs one flight per swept value, archiving the full trajectory of each as
/// a tab-separated file `<prefix><value>.txt` in `directory`. Returns the
/// paths written. Failed runs are logged and skipped like `sweep_max_height`.
pub fn gather_trajectories(
    base: &LaunchConfig,
    variable: SweepVariable,
    values: &[f64],
    directory: &Path,
    prefix: &str,
) -> Result<Vec<PathBuf>, SimulationError> {
    std::fs::create_dir_all(directory)?;
    let mut written = Vec::with_capacity(values.len());

    for &value in values {
        let mut config = base.clone();
        variable.apply(&mut config, value);

        let path = directory.join(format!("{prefix}{value}.txt"));
        let file = File::create(&path)?;
        let mut sink = TsvWriter::new(BufWriter::new(file));

        match fly(&config, &mut sink) {
            Ok(summary) => {
                info!(
                    variable = variable.label(),
                    value,
                    path = %path.display(),
                    steps = summary.steps,
                    "trajectory archived"
                );
                written.push(path);
            }
            Err(error) => {
                warn!(
                    variable = variable.label(),
                    value,
                    %error,
                    "skipping failed gather run"
                );
            }
        }
    }

    Ok(written)
}

/// Minimum-velocity search result for one launch angle.
#[derive(Debug, Clone, Copy)]
pub struct OrbitInsertion {
    /// Launch angle searched, degrees.
    pub launch_angle: f64,
    /// Smallest launch velocity whose trajectory reaches the target height,
    /// at the finest refinement step, m/s.
    pub min_velocity: f64,
    /// Tangential velocity at the apogee of the minimal flight, m/s.
    pub apogee_tangential_velocity: f64,
    /// Kinetic energy at launch for the minimal velocity, J.
    pub kinetic_energy: f64,
    /// Payload mass left after circularizing at the target height via the
    /// rocket equation, kg.
    pub remaining_mass: f64,
}

impl OrbitInsertion {
    /// Archival row: angle, minimum velocity, apogee tangential velocity,
    /// kinetic energy, remaining mass, tab-separated.
    pub fn tsv_row(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}",
            self.launch_angle,
            self.min_velocity,
            self.apogee_tangential_velocity,
            self.kinetic_energy,
            self.remaining_mass
        )
    }
}

/// Finds the minimum launch velocity that lifts the projectile to
/// `target_height`, refining the velocity step from 1000 m/s down to 10 m/s.
/// Each refinement round backs off one step and re-approaches the threshold
/// with ten times the resolution.
pub fn minimum_orbit_velocity(
    base: &LaunchConfig,
    launch_angle: f64,
    target_height: f64,
    specific_impulse: f64,
) -> Result<OrbitInsertion, SimulationError> {
    if target_height <= 0.0 {
        return Err(SimulationError::ConfigurationError(format!(
            "target height must be positive, got {target_height}"
        )));
    }

    let mut velocity = 0.0;
    let mut finest_step = 1_000.0;
    let mut apogee_tangential_velocity = 0.0;

    for refinement in 0..3 {
        let step = 1_000.0 / 10_f64.powi(refinement);
        finest_step = step;

        let mut max_height = 0.0;
        while max_height < target_height {
            velocity += step;
            if velocity > VELOCITY_SEARCH_CEILING {
                return Err(SimulationError::SearchFailed(format!(
                    "target height {target_height} m unreachable below \
                     {VELOCITY_SEARCH_CEILING} m/s at angle {launch_angle}°"
                )));
            }

            let mut config = base.clone();
            config.launch_angle = launch_angle;
            config.launch_velocity = velocity;

            let mut tracker = MaxHeightTracker::new();
            let summary = fly(&config, &mut tracker)?;
            max_height = summary.max_height;
            apogee_tangential_velocity = summary.apogee_tangential_velocity;

            debug!(velocity, max_height, step, "velocity search step");
        }
        // Back off below the threshold before re-approaching it at ten times
        // the resolution.
        velocity -= step;
    }
    // The loop left us one finest step below the smallest passing velocity.
    velocity += finest_step;

    let kinetic_energy = 0.5 * base.mass * velocity.powi(2);
    let remaining_mass = circularization_mass(
        base.mass,
        apogee_tangential_velocity,
        target_height,
        specific_impulse,
    );

    info!(
        launch_angle,
        min_velocity = velocity,
        target_height,
        "minimum orbit velocity found"
    );

    Ok(OrbitInsertion {
        launch_angle,
        min_velocity: velocity,
        apogee_tangential_velocity,
        kinetic_energy,
        remaining_mass,
    })
}

/// Runs the minimum-velocity search for each angle, skipping angles whose
/// search fails.
pub fn minimum_orbit_sweep(
    base: &LaunchConfig,
    angles: &[f64],
    target_height: f64,
    specific_impulse: f64,
) -> Vec<OrbitInsertion> {
    let mut results = Vec::with_capacity(angles.len());

    for &angle in angles {
        match minimum_orbit_velocity(base, angle, target_height, specific_impulse) {
            Ok(insertion) => results.push(insertion),
            Err(error) => {
                warn!(angle, %error, "skipping failed minimum-velocity search");
            }
        }
    }

    results
}

/// Payload mass remaining after burning to circular orbital speed at
/// `target_height`, starting from tangential velocity `tangential_velocity`,
/// per the rocket equation.
fn circularization_mass(
    mass: f64,
    tangential_velocity: f64,
    target_height: f64,
    specific_impulse: f64,
) -> f64 {
    let orbital_velocity =
        ((GRAVITATIONAL_CONSTANT * EARTH_MASS) / (target_height + EARTH_RADIUS)).sqrt();
    mass * (-(orbital_velocity - tangential_velocity) / (specific_impulse * STANDARD_GRAVITY)).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coarse_config() -> LaunchConfig {
        // A coarser step keeps sweep tests quick without changing the physics
        // being exercised.
        LaunchConfig {
            timestep: 0.1,
            ..LaunchConfig::default()
        }
    }

    #[test]
    fn test_max_height_grows_with_launch_velocity() {
        let results = sweep_max_height(
            &coarse_config(),
            SweepVariable::LaunchVelocity,
            &[500.0, 1_000.0, 2_000.0],
        );

        assert_eq!(results.len(), 3);
        for pair in results.windows(2) {
            assert!(
                pair[1].1 > pair[0].1,
                "Faster launches should fly higher: {:?}",
                results
            );
        }
    }

    #[test]
    fn test_sweep_skips_invalid_runs() {
        let results = sweep_max_height(
            &coarse_config(),
            SweepVariable::Mass,
            &[-10.0, 500.0],
        );

        // The negative mass fails validation and is skipped, not fatal.
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, 500.0);
    }

    #[test]
    fn test_minimum_velocity_reaches_target() {
        let base = coarse_config();
        let target = 20_000.0;
        let insertion = minimum_orbit_velocity(&base, 30.0, target, 400.0).unwrap();

        // The found velocity must clear the target...
        let mut config = base.clone();
        config.launch_angle = 30.0;
        config.launch_velocity = insertion.min_velocity;
        let mut tracker = MaxHeightTracker::new();
        fly(&config, &mut tracker).unwrap();
        assert!(tracker.max_height() >= target);

        // ...and one finest-step less must not.
        config.launch_velocity = insertion.min_velocity - 10.0;
        let mut tracker = MaxHeightTracker::new();
        fly(&config, &mut tracker).unwrap();
        assert!(tracker.max_height() < target);
    }

    #[test]
    fn test_unreachable_target_fails_the_search() {
        // A one-second time cap ends every candidate flight far below the
        // target, so the search must give up at its ceiling instead of
        // climbing forever.
        let base = LaunchConfig {
            drag_enabled: false,
            end_time: 1.0,
            timestep: 0.1,
            ..LaunchConfig::default()
        };
        let result = minimum_orbit_velocity(&base, 30.0, 500_000.0, 400.0);

        assert!(matches!(result, Err(SimulationError::SearchFailed(_))));
    }

    #[test]
    fn test_circularization_spends_propellant() {
        let remaining = circularization_mass(2_000.0, 1_000.0, 50_000.0, 400.0);
        assert!(remaining < 2_000.0);
        assert!(remaining > 0.0);
    }
}
