//! Derived aerodynamic analyses over CPACS aeromaps.
//!
//! Everything here consumes the tables of [`cpacs_aeromap`] and turns
//! coefficients into higher level results: a full [ICAO standard
//! atmosphere](IsaAtmosphere) for air state, force and moment
//! reconstruction per table row, drag polar regression with the Oswald
//! efficiency factor, and static stability screening along the three
//! body axes.
//!
//! ```
//! use cpacs_aeromap::{AeroMap, Coefficients, FlightPoint, RowFilter};
//! use cpacs_analysis::{StabilityAxis, check_stability};
//!
//! # fn main() -> cpacs_analysis::Result<()> {
//! let mut aeromap = AeroMap::new("cruise")?;
//! for (aoa, cms) in [(0.0, 0.3), (5.0, 0.1)] {
//!     aeromap.add_row(
//!         FlightPoint::new(11000.0, 0.78, 0.0, aoa),
//!         Coefficients {
//!             cms: Some(cms),
//!             ..Coefficients::default()
//!         },
//!     )?;
//! }
//! let result = check_stability(&aeromap, StabilityAxis::Longitudinal, &RowFilter::new())?;
//! assert_eq!(result.stability, Some(true));
//! # Ok(())
//! # }
//! ```

mod atmosphere;
mod error;
mod forces;
mod polar;
mod stability;

pub use atmosphere::{AtmosphereModel, AtmosphereSample, IsaAtmosphere};
pub use error::{AnalysisError, Result};
pub use forces::calculate_forces;
pub use polar::{DragPolar, drag_polar_fit};
pub use stability::{StabilityAssessment, StabilityAxis, StabilityNote, check_stability};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
