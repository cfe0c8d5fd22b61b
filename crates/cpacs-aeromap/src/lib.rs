//! Aerodynamic performance maps stored in CPACS documents.
//!
//! A CPACS file can carry any number of aeromaps: tables of aerodynamic
//! coefficients over altitude, Mach number, sideslip angle and angle of
//! attack, optionally extended by damping derivative columns. This
//! crate loads them from a [`cpacs_document::Document`], lets callers
//! query and edit them through a small filter algebra, and writes them
//! back or exchanges them as CSV.
//!
//! ```
//! use cpacs_aeromap::{AeroMap, Coefficient, Coefficients, Column, FlightPoint, RowFilter};
//!
//! # fn main() -> cpacs_aeromap::Result<()> {
//! let mut aeromap = AeroMap::new("cruise")?;
//! aeromap.add_row(
//!     FlightPoint::new(11000.0, 0.78, 0.0, 2.0),
//!     Coefficients {
//!         cd: Some(0.022),
//!         cl: Some(0.48),
//!         ..Coefficients::default()
//!     },
//! )?;
//! let cl = aeromap.get(
//!     Column::Coefficient(Coefficient::Cl),
//!     &RowFilter::new().with_altitudes(&[11000.0]),
//! )?;
//! assert_eq!(cl, [0.48]);
//! # Ok(())
//! # }
//! ```

mod aeromap;
mod aircraft;
mod columns;
mod cpacs;
mod csv;
mod error;
mod filter;
mod paths;
mod table;

pub use aeromap::AeroMap;
pub use aircraft::{
    Aircraft, GeometryConfiguration, ReferenceWingSnapshot, WingGeometry, WingSet,
    main_wing_index,
};
pub use columns::{
    COLUMN_COUNT, Coefficient, Column, DampingDerivative, DerivedForce, Parameter, RateFamily,
    RotationAxis,
};
pub use cpacs::Cpacs;
pub use error::{AeroMapError, Result};
pub use filter::RowFilter;
pub use paths::{
    AEROPERFORMANCE_XPATH, AIRCRAFT_NAME_XPATH, AIRCRAFT_XPATH, REFERENCE_XPATH, WINGS_XPATH,
};
pub use table::{AeroTable, Coefficients, FlightPoint, Row};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
