// Physical Constants
pub const EARTH_RADIUS: f64 = 6_371_000.0; // meters
pub const EARTH_MASS: f64 = 5.972e24; // kg
pub const GRAVITATIONAL_CONSTANT: f64 = 6.6743e-11; // N⋅m²/kg²
pub const STANDARD_GRAVITY: f64 = 9.81; // m/s²

// Atmospheric Constants
pub const AIR_DENSITY_SEA_LEVEL: f64 = 1.225; // kg/m³
pub const SEA_LEVEL_TEMPERATURE: f64 = 288.0; // K
pub const MOLAR_MASS_AIR: f64 = 0.0289644; // kg/mol
pub const GAS_CONSTANT: f64 = 8.3144598; // J/(mol·K)
pub const TROPOSPHERE_CEILING: f64 = 11_000.0; // m
pub const STRATOSPHERE_CEILING: f64 = 25_000.0; // m

// Projectile Constants
pub const PROJECTILE_DENSITY: f64 = 5_000.0; // kg/m³ (solid sphere assumption)
// Horizontal velocity credit from Earth's rotation near the equator, applied
// unconditionally at launch regardless of direction.
pub const EQUATORIAL_ROTATION_VELOCITY: f64 = 400.0; // m/s

// Simulation Parameters
pub const DEFAULT_TIME_STEP: f64 = 0.01; // s
pub const DEFAULT_END_TIME: f64 = 30_000.0; // s

// Orbit Insertion Constants
pub const DEFAULT_SPECIFIC_IMPULSE: f64 = 400.0; // s
