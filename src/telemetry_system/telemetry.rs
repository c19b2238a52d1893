use std::io::Write;

use crate::control::driver::ReportSink;
use crate::errors::SimulationError;
use crate::trajectory_system::integrator::StepReport;

/// In-memory flight recorder. Keeps every step report plus running maxima,
/// replays the archival rows on demand and prints a human-readable summary.
pub struct Telemetry {
    pub samples: Vec<StepReport>,
    max_speed: f64,
    max_height: f64,
    max_acceleration: f64,
    max_drag_force: f64,
}

impl Telemetry {
    pub fn new() -> Self {
        Telemetry {
            samples: Vec::new(),
            max_speed: 0.0,
            max_height: 0.0,
            max_acceleration: 0.0,
            max_drag_force: 0.0,
        }
    }

    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    pub fn max_height(&self) -> f64 {
        self.max_height
    }

    pub fn max_acceleration(&self) -> f64 {
        self.max_acceleration
    }

    pub fn max_drag_force(&self) -> f64 {
        self.max_drag_force
    }

    fn format_time(elapsed_time: f64) -> String {
        if elapsed_time >= 3600.0 {
            let hours = (elapsed_time / 3600.0).floor();
            let minutes = ((elapsed_time % 3600.0) / 60.0).floor();
            let seconds = elapsed_time % 60.0;
            format!("{:.0}h {:.0}m {:.2}s", hours, minutes, seconds)
        } else if elapsed_time >= 60.0 {
            let minutes = (elapsed_time / 60.0).floor();
            let seconds = elapsed_time % 60.0;
            format!("{:.0}m {:.2}s", minutes, seconds)
        } else {
            format!("{:.2}s", elapsed_time)
        }
    }

    fn format_distance(distance: f64) -> String {
        if distance >= 1000.0 {
            format!("{:.2} km", distance / 1000.0)
        } else {
            format!("{:.2} m", distance)
        }
    }

    /// Writes the archival tab-separated rows for every recorded step.
    pub fn write_tsv<W: Write>(&self, writer: &mut W) -> Result<(), SimulationError> {
        for report in &self.samples {
            writeln!(writer, "{}", report.tsv_row())?;
        }
        Ok(())
    }

    pub fn display_summary(&self) {
        println!("--- Flight Summary ---");
        if let Some(last) = self.samples.last() {
            println!("Flight time: {}", Self::format_time(last.time));
            println!("Impact range: {}", Self::format_distance(last.position.x));
        }
        println!("Max height: {}", Self::format_distance(self.max_height));
        println!("Max speed: {:.2} m/s", self.max_speed);
        println!("Max acceleration: {:.2} m/s²", self.max_acceleration);
        println!("Max drag force: {:.2} N", self.max_drag_force);
        println!("Recorded steps: {}", self.samples.len());
    }
}

impl Default for Telemetry {
    fn default() -> Self {
        Telemetry::new()
    }
}

impl ReportSink for Telemetry {
    fn record(&mut self, report: &StepReport) -> Result<(), SimulationError> {
        if report.speed > self.max_speed {
            self.max_speed = report.speed;
        }
        if report.height > self.max_height {
            self.max_height = report.height;
        }
        if report.acceleration > self.max_acceleration {
            self.max_acceleration = report.acceleration;
        }
        if report.drag_force > self.max_drag_force {
            self.max_drag_force = report.drag_force;
        }

        self.samples.push(*report);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::driver::fly;
    use crate::control::launch::LaunchConfig;

    fn lob_config() -> LaunchConfig {
        LaunchConfig {
            launch_angle: 75.0,
            launch_velocity: 60.0,
            timestep: 0.01,
            ..LaunchConfig::default()
        }
    }

    #[test]
    fn test_telemetry_tracks_maxima() {
        let mut telemetry = Telemetry::new();
        fly(&lob_config(), &mut telemetry).unwrap();

        assert!(!telemetry.samples.is_empty());
        let sampled_max = telemetry
            .samples
            .iter()
            .map(|report| report.height)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(telemetry.max_height(), sampled_max);
        assert!(telemetry.max_speed() > 0.0);
        assert!(telemetry.max_drag_force() > 0.0);
    }

    #[test]
    fn test_write_tsv_round_trips_step_count() {
        let mut telemetry = Telemetry::new();
        fly(&lob_config(), &mut telemetry).unwrap();

        let mut buffer = Vec::new();
        telemetry.write_tsv(&mut buffer).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(output.lines().count(), telemetry.samples.len());
    }

    #[test]
    fn test_time_formatting() {
        assert_eq!(Telemetry::format_time(42.5), "42.50s");
        assert_eq!(Telemetry::format_time(90.0), "1m 30.00s");
        assert_eq!(Telemetry::format_time(3_725.0), "1h 2m 5.00s");
    }
}
