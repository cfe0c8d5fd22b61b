//! Drag polar regression.
//!
//! Fits `cd = cd0 + k * cl^2` over the selected rows and derives the
//! Oswald efficiency factor from the induced-drag slope.

use cpacs_aeromap::{AeroMap, Coefficient, Column, Parameter, RowFilter};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AnalysisError, Result};

/// Result of a drag polar fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragPolar {
    /// Zero-lift drag coefficient, the intercept of the regression.
    pub cd0: f64,
    /// Oswald efficiency factor `1 / (k * aspect_ratio * pi)`.
    pub oswald_efficiency: f64,
}

/// Fits a drag polar over the rows passing `filter`.
///
/// The angle of attack must be unique across the selected rows, one
/// operating point per angle. Rows with `cl < 0` or without a lift
/// coefficient are discarded before the least squares fit of `cd`
/// against `cl^2`. Fewer than two retained points leave the fit
/// undefined and yield NaN results rather than an error.
pub fn drag_polar_fit(aeromap: &AeroMap, aspect_ratio: f64, filter: &RowFilter) -> Result<DragPolar> {
    let attack_angles = aeromap.get(Column::Parameter(Parameter::AngleOfAttack), filter)?;
    let mut sorted = attack_angles.clone();
    sorted.sort_by(f64::total_cmp);
    if sorted.windows(2).any(|pair| pair[0].total_cmp(&pair[1]).is_eq()) {
        return Err(AnalysisError::NonUniqueAngleOfAttack);
    }

    let cl = aeromap.get(Column::Coefficient(Coefficient::Cl), filter)?;
    let cd = aeromap.get(Column::Coefficient(Coefficient::Cd), filter)?;
    let points: Vec<(f64, f64)> = cl
        .iter()
        .zip(&cd)
        .filter(|(cl, _)| **cl >= 0.0)
        .map(|(cl, cd)| (cl * cl, *cd))
        .collect();

    let (slope, intercept) = linear_fit(&points);
    let polar = DragPolar {
        cd0: intercept,
        oswald_efficiency: 1.0 / (slope * aspect_ratio * std::f64::consts::PI),
    };
    info!(
        cd0 = polar.cd0,
        oswald_efficiency = polar.oswald_efficiency,
        points = points.len(),
        "fitted drag polar"
    );
    Ok(polar)
}

/// First degree least squares fit, returning `(slope, intercept)`.
///
/// Degenerate inputs (fewer than two points, or a single repeated
/// abscissa) return NaN components.
pub(crate) fn linear_fit(points: &[(f64, f64)]) -> (f64, f64) {
    let n = points.len() as f64;
    let x_mean = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let y_mean = points.iter().map(|(_, y)| y).sum::<f64>() / n;
    let numerator: f64 = points
        .iter()
        .map(|(x, y)| (x - x_mean) * (y - y_mean))
        .sum();
    let denominator: f64 = points.iter().map(|(x, _)| (x - x_mean).powi(2)).sum();
    let slope = numerator / denominator;
    (slope, y_mean - slope * x_mean)
}
