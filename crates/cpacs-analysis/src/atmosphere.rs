//! Standard atmosphere sampling.
//!
//! Force reconstruction needs air density and speed of sound at the
//! altitude of every table row. [`IsaAtmosphere`] implements the ICAO
//! standard atmosphere as a layered model, valid from 5 km below sea
//! level up to 80 km.

use crate::error::{AnalysisError, Result};

/// Air state at one altitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtmosphereSample {
    /// Air density in kg/m^3.
    pub density: f64,
    /// Speed of sound in m/s.
    pub speed_of_sound: f64,
}

/// Source of air state for force reconstruction.
pub trait AtmosphereModel {
    /// Samples the model at `altitude` in meters.
    fn sample(&self, altitude: f64) -> Result<AtmosphereSample>;
}

/// One layer of the ICAO standard atmosphere.
#[derive(Debug, Clone)]
struct AtmosphereLayer {
    /// Base altitude of this layer (m).
    base_altitude: f64,
    /// Temperature at the layer base (K).
    base_temperature: f64,
    /// Pressure at the layer base (Pa).
    base_pressure: f64,
    /// Temperature lapse rate (K/m).
    lapse_rate: f64,
}

const G_ACCEL: f64 = 9.80665;
const R_AIR: f64 = 287.0531;
const GAMMA: f64 = 1.4;

/// ICAO standard atmosphere layers up to 84 km. Altitudes below the
/// first base extrapolate the troposphere lapse rate downwards.
const ICAO_LAYERS: &[AtmosphereLayer] = &[
    // Troposphere (0 - 11 km)
    AtmosphereLayer {
        base_altitude: 0.0,
        base_temperature: 288.15,
        base_pressure: 101_325.0,
        lapse_rate: -0.0065,
    },
    // Tropopause (11 - 20 km)
    AtmosphereLayer {
        base_altitude: 11_000.0,
        base_temperature: 216.65,
        base_pressure: 22_632.1,
        lapse_rate: 0.0,
    },
    // Stratosphere 1 (20 - 32 km)
    AtmosphereLayer {
        base_altitude: 20_000.0,
        base_temperature: 216.65,
        base_pressure: 5_474.89,
        lapse_rate: 0.001,
    },
    // Stratosphere 2 (32 - 47 km)
    AtmosphereLayer {
        base_altitude: 32_000.0,
        base_temperature: 228.65,
        base_pressure: 868.02,
        lapse_rate: 0.0028,
    },
    // Stratopause (47 - 51 km)
    AtmosphereLayer {
        base_altitude: 47_000.0,
        base_temperature: 270.65,
        base_pressure: 110.91,
        lapse_rate: 0.0,
    },
    // Mesosphere 1 (51 - 71 km)
    AtmosphereLayer {
        base_altitude: 51_000.0,
        base_temperature: 270.65,
        base_pressure: 66.94,
        lapse_rate: -0.0028,
    },
    // Mesosphere 2 (71 - 84 km)
    AtmosphereLayer {
        base_altitude: 71_000.0,
        base_temperature: 214.65,
        base_pressure: 3.96,
        lapse_rate: -0.002,
    },
];

/// The ICAO standard atmosphere.
///
/// This is the model behind the `"ISA"` atmospheric-model tag carried
/// by every aeromap.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsaAtmosphere;

impl IsaAtmosphere {
    /// Lowest altitude the model accepts, in meters.
    pub const MIN_ALTITUDE: f64 = -5000.0;
    /// Highest altitude the model accepts, in meters.
    pub const MAX_ALTITUDE: f64 = 80_000.0;

    /// Temperature and pressure at `altitude`, from the layer table.
    fn temperature_and_pressure(altitude: f64) -> (f64, f64) {
        let layer = ICAO_LAYERS
            .iter()
            .rev()
            .find(|layer| altitude >= layer.base_altitude)
            .unwrap_or(&ICAO_LAYERS[0]);

        let height = altitude - layer.base_altitude;
        let temperature = layer.base_temperature + layer.lapse_rate * height;

        let pressure = if layer.lapse_rate == 0.0 {
            // Isothermal layer
            layer.base_pressure * (-G_ACCEL * height / (R_AIR * layer.base_temperature)).exp()
        } else {
            let ratio = temperature / layer.base_temperature;
            layer.base_pressure * ratio.powf(-G_ACCEL / (layer.lapse_rate * R_AIR))
        };

        (temperature, pressure)
    }
}

impl AtmosphereModel for IsaAtmosphere {
    fn sample(&self, altitude: f64) -> Result<AtmosphereSample> {
        if !(Self::MIN_ALTITUDE..=Self::MAX_ALTITUDE).contains(&altitude) {
            return Err(AnalysisError::AltitudeOutOfRange {
                altitude,
                min: Self::MIN_ALTITUDE,
                max: Self::MAX_ALTITUDE,
            });
        }
        let (temperature, pressure) = Self::temperature_and_pressure(altitude);
        Ok(AtmosphereSample {
            density: pressure / (R_AIR * temperature),
            speed_of_sound: (GAMMA * R_AIR * temperature).sqrt(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sea_level() {
        let sample = IsaAtmosphere.sample(0.0).unwrap();
        assert!((sample.density - 1.225).abs() < 1e-3);
        assert!((sample.speed_of_sound - 340.29).abs() < 0.01);
    }

    #[test]
    fn test_tropopause() {
        let sample = IsaAtmosphere.sample(11_000.0).unwrap();
        assert!((sample.density - 0.3639).abs() < 1e-3);
        assert!((sample.speed_of_sound - 295.07).abs() < 0.01);
    }

    #[test]
    fn test_isothermal_layer() {
        // 15 km sits inside the isothermal tropopause layer
        let sample = IsaAtmosphere.sample(15_000.0).unwrap();
        assert!((sample.density - 0.1937).abs() < 1e-3);
        assert!((sample.speed_of_sound - 295.07).abs() < 0.01);
    }

    #[test]
    fn test_below_sea_level() {
        let sample = IsaAtmosphere.sample(-1000.0).unwrap();
        assert!((sample.density - 1.347).abs() < 1e-3);
        assert!(sample.speed_of_sound > 340.29);
    }

    #[test]
    fn test_layer_boundaries_are_continuous() {
        for boundary in [11_000.0, 20_000.0, 32_000.0, 47_000.0, 51_000.0, 71_000.0] {
            let below = IsaAtmosphere.sample(boundary - 0.1).unwrap();
            let above = IsaAtmosphere.sample(boundary + 0.1).unwrap();
            assert!(
                (below.density - above.density).abs() < 1e-4,
                "density jump at {boundary} m"
            );
        }
    }

    #[test]
    fn test_out_of_range_altitudes() {
        assert!(matches!(
            IsaAtmosphere.sample(-6000.0).unwrap_err(),
            AnalysisError::AltitudeOutOfRange { .. }
        ));
        assert!(matches!(
            IsaAtmosphere.sample(90_000.0).unwrap_err(),
            AnalysisError::AltitudeOutOfRange { .. }
        ));
        assert!(matches!(
            IsaAtmosphere.sample(f64::NAN).unwrap_err(),
            AnalysisError::AltitudeOutOfRange { .. }
        ));
    }
}
