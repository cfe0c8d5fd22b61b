//! Force and moment reconstruction from coefficients.

use cpacs_aeromap::{AeroMap, Aircraft, Coefficient, Column, DerivedForce, Parameter, RowFilter};
use tracing::warn;

use crate::atmosphere::AtmosphereModel;
use crate::error::Result;

/// Fills the derived force and moment columns of an aeromap.
///
/// For every row, dynamic pressure follows from the atmosphere sampled
/// at the row's altitude and the row's Mach number, and each stored
/// coefficient scales to `0.5 * rho * ref_area * (mach * a)^2 * coef`.
/// Moment coefficients are additionally scaled by the reference
/// length. Coefficient columns absent from the table are skipped with
/// a warning and leave their derived column absent. Rows without a
/// value for a coefficient get no derived value for it.
///
/// The derived columns live in memory only, they are never written to
/// the document.
pub fn calculate_forces(
    aeromap: &mut AeroMap,
    aircraft: &Aircraft,
    atmosphere: &impl AtmosphereModel,
) -> Result<()> {
    let everything = RowFilter::new();
    let altitudes = aeromap.get(Column::Parameter(Parameter::Altitude), &everything)?;
    let mach_numbers = aeromap.get(Column::Parameter(Parameter::MachNumber), &everything)?;

    for coefficient in Coefficient::ALL {
        let column = Column::Coefficient(coefficient);
        let derived = DerivedForce::for_coefficient(coefficient);
        if !aeromap.table().is_active(column) {
            warn!(
                "{} will not be calculated because there is no {} coefficient in the aeromap",
                derived.as_str(),
                coefficient.as_str()
            );
            continue;
        }
        let values = aeromap.get(column, &everything)?;
        for (index, value) in values.iter().enumerate() {
            let sample = atmosphere.sample(altitudes[index])?;
            let velocity = mach_numbers[index] * sample.speed_of_sound;
            let mut force = 0.5 * sample.density * aircraft.ref_area * velocity * velocity * value;
            if derived.is_moment() {
                force *= aircraft.ref_length;
            }
            aeromap
                .table_mut()
                .set_cell(index, Column::Derived(derived), force)?;
        }
    }
    Ok(())
}
