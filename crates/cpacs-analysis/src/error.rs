//! Error types for derived aerodynamic analyses.

use cpacs_aeromap::AeroMapError;
use thiserror::Error;

/// Errors that can occur when deriving quantities from an aeromap.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// An altitude lies outside the atmosphere model's validity range.
    #[error("altitude {altitude} m is outside the supported range {min} m to {max} m")]
    AltitudeOutOfRange {
        /// The requested altitude in meters.
        altitude: f64,
        /// Lowest supported altitude in meters.
        min: f64,
        /// Highest supported altitude in meters.
        max: f64,
    },

    /// A drag polar fit was requested over repeated angles of attack.
    #[error("angle of attack values must be unique to fit a drag polar")]
    NonUniqueAngleOfAttack,

    /// Error from the underlying aeromap.
    #[error(transparent)]
    AeroMap(#[from] AeroMapError),
}

/// Result alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
