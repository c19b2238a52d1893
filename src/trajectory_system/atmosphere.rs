use crate::constants::{STRATOSPHERE_CEILING, TROPOSPHERE_CEILING};
use crate::errors::SimulationError;

/// Local air properties from the NASA piecewise atmosphere fit
/// (https://www.grc.nasa.gov/WWW/K-12/airplane/atmosmet.html).
///
/// Temperature is in °C and pressure in kPa, matching the fit's coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtmosphericConditions {
    pub temperature: f64, // °C
    pub pressure: f64,    // kPa
    pub density: f64,     // kg/m³
}

/// Air temperature, pressure and density at `height` meters above the surface.
///
/// Each altitude band uses its own closed-form fit; the bands agree at the
/// boundaries to within the fit's accuracy. Extreme inputs that overflow the
/// power laws are reported as a divergence instead of propagating NaN into
/// the force model.
pub fn conditions_at(height: f64) -> Result<AtmosphericConditions, SimulationError> {
    let (temperature, pressure) = if height > STRATOSPHERE_CEILING {
        // Upper stratosphere and above
        let t = -131.21 + 0.00299 * height;
        (t, 2.488 * ((t + 273.1) / 216.6).powf(-11.388))
    } else if height > TROPOSPHERE_CEILING {
        // Lower stratosphere, isothermal band
        let t = -56.46;
        (t, 22.65 * (1.73 - 0.000157 * height).exp())
    } else {
        // Troposphere
        let t = 15.04 - 0.00649 * height;
        (t, 101.29 * ((t + 273.1) / 288.08).powf(5.256))
    };

    let density = pressure / (0.2869 * (temperature + 273.1));
    if !density.is_finite() {
        return Err(SimulationError::NumericDivergence(format!(
            "air density is not finite at height {height} m"
        )));
    }

    Ok(AtmosphericConditions {
        temperature,
        pressure,
        density,
    })
}

/// Air density at `height` meters above the surface, in kg/m³.
pub fn air_density(height: f64) -> Result<f64, SimulationError> {
    Ok(conditions_at(height)?.density)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_sea_level_conditions() {
        let conditions = conditions_at(0.0).unwrap();

        assert_abs_diff_eq!(conditions.temperature, 15.04, epsilon = 0.01); // °C
        assert_abs_diff_eq!(conditions.pressure, 101.4, epsilon = 0.2); // kPa
        assert_abs_diff_eq!(conditions.density, 1.225, epsilon = 0.005); // kg/m³
    }

    #[test]
    fn test_density_decreases_with_height() {
        let heights = [0.0, 5_000.0, 11_000.0, 18_000.0, 25_000.0, 40_000.0];
        let densities: Vec<f64> = heights
            .iter()
            .map(|&h| air_density(h).unwrap())
            .collect();

        for pair in densities.windows(2) {
            assert!(
                pair[1] < pair[0],
                "Density should fall with height, got {} then {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_continuity_at_tropopause() {
        let below = air_density(TROPOSPHERE_CEILING).unwrap();
        let above = air_density(TROPOSPHERE_CEILING + 1e-6).unwrap();

        // The fits are independent per band, so agreement is approximate.
        assert_abs_diff_eq!(below, above, epsilon = 1e-3);
    }

    #[test]
    fn test_continuity_at_stratosphere_ceiling() {
        let below = air_density(STRATOSPHERE_CEILING).unwrap();
        let above = air_density(STRATOSPHERE_CEILING + 1e-6).unwrap();

        assert_abs_diff_eq!(below, above, epsilon = 1e-3);
    }

    #[test]
    fn test_stratosphere_temperature_is_constant() {
        let low = conditions_at(12_000.0).unwrap();
        let high = conditions_at(24_000.0).unwrap();

        assert_abs_diff_eq!(low.temperature, -56.46, epsilon = 1e-9);
        assert_abs_diff_eq!(high.temperature, -56.46, epsilon = 1e-9);
        assert!(high.pressure < low.pressure);
    }
}
