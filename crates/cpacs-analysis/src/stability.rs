//! Static stability screening from moment coefficient slopes.
//!
//! Each axis correlates one moment coefficient with one flight
//! parameter over the selected rows and classifies the aircraft by the
//! sign of the least squares slope.

use std::fmt;

use cpacs_aeromap::{AeroMap, Coefficient, Column, Parameter, RowFilter};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::polar::linear_fit;

/// The stability axis to screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StabilityAxis {
    /// Pitching moment over angle of attack.
    Longitudinal,
    /// Yawing moment over angle of sideslip.
    Directional,
    /// Rolling moment over angle of sideslip.
    Lateral,
}

impl StabilityAxis {
    /// All axes.
    pub const ALL: [Self; 3] = [Self::Longitudinal, Self::Directional, Self::Lateral];

    /// The moment coefficient screened on this axis.
    #[must_use]
    pub const fn moment(self) -> Coefficient {
        match self {
            Self::Longitudinal => Coefficient::Cms,
            Self::Directional => Coefficient::Cml,
            Self::Lateral => Coefficient::Cmd,
        }
    }

    /// The flight parameter the moment is correlated against.
    #[must_use]
    pub const fn against(self) -> Parameter {
        match self {
            Self::Longitudinal => Parameter::AngleOfAttack,
            Self::Directional | Self::Lateral => Parameter::AngleOfSideslip,
        }
    }

    /// Whether a falling moment means a restoring one.
    ///
    /// With the CPACS body axis convention, cms over angle of attack
    /// and cmd over sideslip must fall to restore the aircraft, while
    /// cml over sideslip must rise.
    const fn stable_when_decreasing(self) -> bool {
        matches!(self, Self::Longitudinal | Self::Lateral)
    }

    /// Lowercase axis name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Longitudinal => "longitudinal",
            Self::Directional => "directional",
            Self::Lateral => "lateral",
        }
    }
}

impl fmt::Display for StabilityAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remark qualifying a stability assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StabilityNote {
    /// Fewer than two distinct values of the correlated parameter.
    InsufficientData,
    /// The moment does not change over the parameter.
    NeutralStability,
    /// The filter spans several altitudes or Mach numbers at once.
    MultipleConditions,
}

impl fmt::Display for StabilityNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::InsufficientData => "not enough values to check stability",
            Self::NeutralStability => "neutral stability",
            Self::MultipleConditions => {
                "stability should be checked for one flight condition at a time"
            }
        };
        f.write_str(text)
    }
}

/// Outcome of a stability screening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StabilityAssessment {
    /// `Some(true)` stable, `Some(false)` unstable or neutral, `None`
    /// when the data does not support a verdict.
    pub stability: Option<bool>,
    /// Qualifying remark, if any.
    pub note: Option<StabilityNote>,
}

/// Screens one stability axis over the rows passing `filter`.
///
/// Rows without a value for the moment coefficient are ignored. The
/// remaining rows must cover at least two distinct values of the
/// correlated parameter, otherwise no verdict is possible. A slope of
/// exactly zero reports neutral stability with `stability` set to
/// `Some(false)`. A filter listing more than one altitude or Mach
/// number still produces an aggregate verdict but carries a note that
/// flight conditions should be checked one at a time.
pub fn check_stability(
    aeromap: &AeroMap,
    axis: StabilityAxis,
    filter: &RowFilter,
) -> Result<StabilityAssessment> {
    let spans_conditions =
        filter.altitudes().len() > 1 || filter.mach_numbers().len() > 1;

    let angles = aeromap.get(Column::Parameter(axis.against()), filter)?;
    let moments = aeromap.get(Column::Coefficient(axis.moment()), filter)?;
    let points: Vec<(f64, f64)> = angles
        .iter()
        .zip(&moments)
        .filter(|(_, moment)| !moment.is_nan())
        .map(|(angle, moment)| (*angle, *moment))
        .collect();

    let mut distinct: Vec<f64> = points.iter().map(|(angle, _)| *angle).collect();
    distinct.sort_by(f64::total_cmp);
    distinct.dedup_by(|a, b| a.total_cmp(b).is_eq());
    if distinct.len() < 2 {
        return Ok(StabilityAssessment {
            stability: None,
            note: Some(StabilityNote::InsufficientData),
        });
    }

    let (slope, _) = linear_fit(&points);
    if slope == 0.0 {
        return Ok(StabilityAssessment {
            stability: Some(false),
            note: Some(StabilityNote::NeutralStability),
        });
    }
    let stable = if axis.stable_when_decreasing() {
        slope < 0.0
    } else {
        slope > 0.0
    };
    Ok(StabilityAssessment {
        stability: Some(stable),
        note: spans_conditions.then_some(StabilityNote::MultipleConditions),
    })
}
