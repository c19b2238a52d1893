use std::io::Write;

use tracing::{debug, info};

use crate::control::launch::LaunchConfig;
use crate::errors::SimulationError;
use crate::trajectory_system::forces::ForceModel;
use crate::trajectory_system::integrator::{SimulationState, StepReport};

/// Receives one report per integration step. Implementations decide what to
/// keep: nothing, everything, a running maximum, or an archive file.
pub trait ReportSink {
    fn record(&mut self, report: &StepReport) -> Result<(), SimulationError>;
}

/// Discards every report; used when only the flight summary matters.
pub struct NullSink;

impl ReportSink for NullSink {
    fn record(&mut self, _report: &StepReport) -> Result<(), SimulationError> {
        Ok(())
    }
}

/// Buffers every report in memory.
#[derive(Debug, Default)]
pub struct SampleBuffer {
    pub samples: Vec<StepReport>,
}

impl SampleBuffer {
    pub fn new() -> Self {
        SampleBuffer::default()
    }
}

impl ReportSink for SampleBuffer {
    fn record(&mut self, report: &StepReport) -> Result<(), SimulationError> {
        self.samples.push(*report);
        Ok(())
    }
}

/// Tracks only the maximum surface height seen during the flight.
#[derive(Debug)]
pub struct MaxHeightTracker {
    max_height: f64,
}

impl MaxHeightTracker {
    pub fn new() -> Self {
        MaxHeightTracker {
            max_height: f64::NEG_INFINITY,
        }
    }

    pub fn max_height(&self) -> f64 {
        self.max_height
    }
}

impl Default for MaxHeightTracker {
    fn default() -> Self {
        MaxHeightTracker::new()
    }
}

impl ReportSink for MaxHeightTracker {
    fn record(&mut self, report: &StepReport) -> Result<(), SimulationError> {
        if report.height > self.max_height {
            self.max_height = report.height;
        }
        Ok(())
    }
}

/// Streams the archival tab-separated rows to any writer.
pub struct TsvWriter<W: Write> {
    writer: W,
}

impl<W: Write> TsvWriter<W> {
    pub fn new(writer: W) -> Self {
        TsvWriter { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for TsvWriter<W> {
    fn record(&mut self, report: &StepReport) -> Result<(), SimulationError> {
        writeln!(self.writer, "{}", report.tsv_row())?;
        Ok(())
    }
}

/// Aggregate results of a completed flight.
#[derive(Debug, Clone, Copy)]
pub struct FlightSummary {
    /// Simulation time when the flight ended, s.
    pub flight_time: f64,
    /// Highest surface height reached, m.
    pub max_height: f64,
    /// Tangential velocity at the highest point, m/s.
    pub apogee_tangential_velocity: f64,
    /// Largest speed seen during the flight, m/s.
    pub max_speed: f64,
    /// Horizontal surface distance at the end of the flight, m.
    pub impact_range: f64,
    /// Number of integration steps taken.
    pub steps: u64,
    /// True when the time cap ended the flight instead of surface impact.
    pub reached_end_time: bool,
}

/// One projectile flight. Owns the simulation state exclusively and steps it
/// to termination, feeding every step's report to the caller's sink.
pub struct Simulation {
    config: LaunchConfig,
    forces: ForceModel,
    state: SimulationState,
}

impl Simulation {
    pub fn new(config: LaunchConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let forces = ForceModel::new(config.mass, config.drag_coefficient, config.drag_enabled);
        let state = SimulationState::initiate(&config, &forces)?;

        Ok(Simulation {
            config,
            forces,
            state,
        })
    }

    pub fn config(&self) -> &LaunchConfig {
        &self.config
    }

    pub fn forces(&self) -> &ForceModel {
        &self.forces
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Runs the flight to termination: the projectile falls below the surface
    /// or the simulation time exceeds the configured cap.
    pub fn run(&mut self, sink: &mut dyn ReportSink) -> Result<FlightSummary, SimulationError> {
        info!(
            angle_deg = self.config.launch_angle,
            velocity = self.config.launch_velocity,
            height = self.config.launch_height,
            mass = self.config.mass,
            drag = self.config.drag_enabled,
            "starting flight"
        );

        let mut max_height = f64::NEG_INFINITY;
        let mut apogee_tangential_velocity = 0.0;
        let mut max_speed = 0.0;
        let mut steps: u64 = 0;

        let mut height = self.state.surface_height();
        while height >= 0.0 && self.state.time <= self.config.end_time {
            self.state.advance(&self.forces, self.config.timestep)?;
            let report = self.state.derive_report(&self.forces)?;
            sink.record(&report)?;

            if report.height > max_height {
                max_height = report.height;
                apogee_tangential_velocity = report.tangential_velocity;
            }
            if report.speed > max_speed {
                max_speed = report.speed;
            }

            height = report.height;
            steps += 1;
        }

        let reached_end_time = height >= 0.0;
        let summary = FlightSummary {
            flight_time: self.state.time,
            max_height,
            apogee_tangential_velocity,
            max_speed,
            impact_range: self.state.position.x,
            steps,
            reached_end_time,
        };

        if reached_end_time {
            debug!(time = self.state.time, "flight hit the simulation time cap");
        }
        info!(
            flight_time = summary.flight_time,
            max_height = summary.max_height,
            impact_range = summary.impact_range,
            steps = summary.steps,
            "flight ended"
        );

        Ok(summary)
    }
}

/// Convenience wrapper: build a simulation from `config` and fly it into
/// `sink`.
pub fn fly(config: &LaunchConfig, sink: &mut dyn ReportSink) -> Result<FlightSummary, SimulationError> {
    Simulation::new(config.clone())?.run(sink)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_flight_config() -> LaunchConfig {
        LaunchConfig {
            launch_angle: 80.0,
            launch_velocity: 50.0,
            timestep: 0.01,
            ..LaunchConfig::default()
        }
    }

    #[test]
    fn test_flight_terminates_at_impact() {
        let summary = fly(&short_flight_config(), &mut NullSink).unwrap();

        assert!(
            !summary.reached_end_time,
            "A 50 m/s lob should come back down before the time cap"
        );
        assert!(summary.max_height > 0.0);
        assert!(summary.flight_time > 0.0);
        assert!(summary.steps > 0);
    }

    #[test]
    fn test_sample_buffer_collects_every_step() {
        let mut buffer = SampleBuffer::new();
        let summary = fly(&short_flight_config(), &mut buffer).unwrap();

        assert_eq!(buffer.samples.len() as u64, summary.steps);

        // Reports arrive in time order, one timestep apart.
        for pair in buffer.samples.windows(2) {
            assert!(pair[1].time > pair[0].time);
        }
    }

    #[test]
    fn test_max_height_tracker_agrees_with_buffer() {
        let mut buffer = SampleBuffer::new();
        fly(&short_flight_config(), &mut buffer).unwrap();

        let mut tracker = MaxHeightTracker::new();
        let summary = fly(&short_flight_config(), &mut tracker).unwrap();

        let buffered_max = buffer
            .samples
            .iter()
            .map(|report| report.height)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(tracker.max_height(), buffered_max);
        assert_eq!(summary.max_height, buffered_max);
    }

    #[test]
    fn test_tsv_writer_produces_one_row_per_step() {
        let mut writer = TsvWriter::new(Vec::new());
        let summary = fly(&short_flight_config(), &mut writer).unwrap();

        let output = String::from_utf8(writer.into_inner()).unwrap();
        let rows: Vec<&str> = output.lines().collect();
        assert_eq!(rows.len() as u64, summary.steps);
        assert_eq!(rows[0].split('\t').count(), 8);
    }

    #[test]
    fn test_invalid_config_is_rejected_up_front() {
        let config = LaunchConfig {
            mass: -1.0,
            ..LaunchConfig::default()
        };
        assert!(Simulation::new(config).is_err());
    }
}
