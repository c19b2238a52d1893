pub mod constants;
pub mod control;
pub mod errors;
pub mod telemetry_system;
pub mod trajectory_system;
pub mod utils;

pub use constants::*;
pub use control::driver::{
    fly, FlightSummary, MaxHeightTracker, NullSink, ReportSink, SampleBuffer, Simulation,
    TsvWriter,
};
pub use control::launch::LaunchConfig;
pub use control::sweep::{
    gather_trajectories, minimum_orbit_sweep, minimum_orbit_velocity, sweep_max_height,
    OrbitInsertion, SweepVariable,
};
pub use errors::SimulationError;

// Re-export commonly used items from trajectory_system
pub use trajectory_system::atmosphere;
pub use trajectory_system::forces::ForceModel;
pub use trajectory_system::integrator::{SimulationState, StepReport};

// Re-export commonly used items from telemetry_system
pub use telemetry_system::telemetry::Telemetry;

// Re-export commonly used utilities
pub use utils::vector2d::Vector2D;
