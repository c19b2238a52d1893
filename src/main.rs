use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use projectile_simulation::{
    gather_trajectories, minimum_orbit_sweep, sweep_max_height, LaunchConfig, Simulation,
    SweepVariable, Telemetry, DEFAULT_SPECIFIC_IMPULSE,
};

#[derive(Parser)]
#[command(
    name = "projectile_sim",
    version,
    about = "Ballistic projectile trajectories under inverse-square gravity and atmospheric drag"
)]
struct Cli {
    /// Launch configuration file (.yaml); omitted fields use the reference flight
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Fly one trajectory and print its summary
    Single {
        /// Archive per-step rows (tab-separated) to this file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Disable atmospheric drag for this run
        #[arg(long)]
        no_drag: bool,
    },
    /// Fly one trajectory per value of a launch variable and report max heights
    Sweep {
        /// Which launch parameter to vary
        #[arg(value_enum)]
        variable: Variable,

        /// First swept value
        #[arg(long)]
        start: f64,

        /// Last swept value (inclusive)
        #[arg(long)]
        end: f64,

        /// Increment between swept values
        #[arg(long)]
        step: f64,

        /// Archive every trajectory into this directory, one file per value
        #[arg(long, value_name = "DIR")]
        gather: Option<PathBuf>,
    },
    /// Find the minimum launch velocity to reach a target orbit altitude
    MinVelocity {
        /// Target stable orbit altitude, m
        #[arg(long, default_value_t = 50_000.0)]
        target_height: f64,

        /// Specific impulse for the circularization estimate, s
        #[arg(long, default_value_t = DEFAULT_SPECIFIC_IMPULSE)]
        specific_impulse: f64,

        /// First launch angle, degrees
        #[arg(long, default_value_t = 10.0)]
        start_angle: f64,

        /// Last launch angle (inclusive), degrees
        #[arg(long, default_value_t = 90.0)]
        end_angle: f64,

        /// Increment between angles, degrees
        #[arg(long, default_value_t = 10.0)]
        angle_step: f64,

        /// Archive the per-angle results (tab-separated) to this file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Variable {
    Height,
    Angle,
    Velocity,
    Mass,
}

impl From<Variable> for SweepVariable {
    fn from(variable: Variable) -> Self {
        match variable {
            Variable::Height => SweepVariable::LaunchHeight,
            Variable::Angle => SweepVariable::LaunchAngle,
            Variable::Velocity => SweepVariable::LaunchVelocity,
            Variable::Mass => SweepVariable::Mass,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => LaunchConfig::from_file(path)?,
        None => LaunchConfig::default(),
    };

    match cli.command.unwrap_or(Command::Single {
        output: None,
        no_drag: false,
    }) {
        Command::Single { output, no_drag } => run_single(config, output, no_drag),
        Command::Sweep {
            variable,
            start,
            end,
            step,
            gather,
        } => run_sweep(config, variable.into(), start, end, step, gather),
        Command::MinVelocity {
            target_height,
            specific_impulse,
            start_angle,
            end_angle,
            angle_step,
            output,
        } => run_min_velocity(
            config,
            target_height,
            specific_impulse,
            start_angle,
            end_angle,
            angle_step,
            output,
        ),
    }
}

fn run_single(
    mut config: LaunchConfig,
    output: Option<PathBuf>,
    no_drag: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if no_drag {
        config.drag_enabled = false;
    }

    let mut telemetry = Telemetry::new();
    let mut simulation = Simulation::new(config)?;
    simulation.run(&mut telemetry)?;

    if let Some(path) = output {
        let mut writer = BufWriter::new(File::create(&path)?);
        telemetry.write_tsv(&mut writer)?;
        writer.flush()?;
        println!("Trajectory written to {}", path.display());
    }

    telemetry.display_summary();
    Ok(())
}

fn run_sweep(
    config: LaunchConfig,
    variable: SweepVariable,
    start: f64,
    end: f64,
    step: f64,
    gather: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let values = range_values(start, end, step)?;

    if let Some(directory) = gather {
        let prefix = format!("{}_", variable.label());
        let written = gather_trajectories(&config, variable, &values, &directory, &prefix)?;
        println!(
            "{} trajectories archived in {}",
            written.len(),
            directory.display()
        );
    } else {
        let results = sweep_max_height(&config, variable, &values);
        println!("{}\tmax_height", variable.label());
        for (value, max_height) in results {
            println!("{value}\t{max_height}");
        }
    }

    Ok(())
}

fn run_min_velocity(
    config: LaunchConfig,
    target_height: f64,
    specific_impulse: f64,
    start_angle: f64,
    end_angle: f64,
    angle_step: f64,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let angles = range_values(start_angle, end_angle, angle_step)?;
    let results = minimum_orbit_sweep(&config, &angles, target_height, specific_impulse);

    println!("angle\tmin_velocity\ttangential_velocity\tkinetic_energy\tremaining_mass");
    for insertion in &results {
        println!("{}", insertion.tsv_row());
    }

    if let Some(path) = output {
        let mut writer = BufWriter::new(File::create(&path)?);
        for insertion in &results {
            writeln!(writer, "{}", insertion.tsv_row())?;
        }
        writer.flush()?;
        println!("Results written to {}", path.display());
    }

    Ok(())
}

fn range_values(start: f64, end: f64, step: f64) -> Result<Vec<f64>, Box<dyn std::error::Error>> {
    if step <= 0.0 || end < start {
        return Err("sweep range requires start <= end and a positive step".into());
    }

    let mut values = Vec::new();
    let mut value = start;
    while value <= end + step * 1e-9 {
        values.push(value);
        value += step;
    }

    Ok(values)
}
