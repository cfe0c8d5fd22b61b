//! Column identities of an aeromap table.
//!
//! An aeromap row spans four flight parameters, six aerodynamic
//! coefficients, 36 damping derivative columns (two rate families, six
//! coefficients, three rotation axes) and six derived force columns
//! which are computed in memory and never persisted.

use std::fmt;
use std::str::FromStr;

use crate::error::{AeroMapError, Result};

/// Total number of addressable columns.
pub const COLUMN_COUNT: usize = 52;

/// One of the four flight parameters keying every aeromap row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    /// Altitude in meters.
    Altitude,
    /// Mach number.
    MachNumber,
    /// Sideslip angle in degrees.
    AngleOfSideslip,
    /// Angle of attack in degrees.
    AngleOfAttack,
}

impl Parameter {
    /// All parameters in storage order.
    pub const ALL: [Self; 4] = [
        Self::Altitude,
        Self::MachNumber,
        Self::AngleOfSideslip,
        Self::AngleOfAttack,
    ];

    /// The CPACS element name of this parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Altitude => "altitude",
            Self::MachNumber => "machNumber",
            Self::AngleOfSideslip => "angleOfSideslip",
            Self::AngleOfAttack => "angleOfAttack",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == token)
    }

    const fn ordinal(self) -> usize {
        match self {
            Self::Altitude => 0,
            Self::MachNumber => 1,
            Self::AngleOfSideslip => 2,
            Self::AngleOfAttack => 3,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the six aerodynamic coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coefficient {
    /// Drag coefficient.
    Cd,
    /// Lift coefficient.
    Cl,
    /// Side force coefficient.
    Cs,
    /// Roll moment coefficient.
    Cmd,
    /// Yaw moment coefficient.
    Cml,
    /// Pitch moment coefficient.
    Cms,
}

impl Coefficient {
    /// All coefficients in storage order.
    pub const ALL: [Self; 6] = [
        Self::Cd,
        Self::Cl,
        Self::Cs,
        Self::Cmd,
        Self::Cml,
        Self::Cms,
    ];

    /// All coefficients in alphabetical order, the order damping
    /// derivative columns are laid out in.
    pub const ALPHABETICAL: [Self; 6] = [
        Self::Cd,
        Self::Cl,
        Self::Cmd,
        Self::Cml,
        Self::Cms,
        Self::Cs,
    ];

    /// The CPACS element name of this coefficient.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cd => "cd",
            Self::Cl => "cl",
            Self::Cs => "cs",
            Self::Cmd => "cmd",
            Self::Cml => "cml",
            Self::Cms => "cms",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == token)
    }

    const fn ordinal(self) -> usize {
        match self {
            Self::Cd => 0,
            Self::Cl => 1,
            Self::Cs => 2,
            Self::Cmd => 3,
            Self::Cml => 4,
            Self::Cms => 5,
        }
    }

    const fn alphabetical_ordinal(self) -> usize {
        match self {
            Self::Cd => 0,
            Self::Cl => 1,
            Self::Cmd => 2,
            Self::Cml => 3,
            Self::Cms => 4,
            Self::Cs => 5,
        }
    }
}

impl fmt::Display for Coefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Coefficient {
    type Err = AeroMapError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_token(s).ok_or_else(|| AeroMapError::UnknownCoefficient {
            token: s.to_string(),
        })
    }
}

/// Sign of the rotation rate a damping derivative belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateFamily {
    /// Negative rotation rates.
    Negative,
    /// Positive rotation rates.
    Positive,
}

impl RateFamily {
    /// Both families in storage order.
    pub const ALL: [Self; 2] = [Self::Negative, Self::Positive];

    /// The CPACS branch name of this family.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Negative => "negativeRates",
            Self::Positive => "positiveRates",
        }
    }

    /// Resolves a user-facing rate keyword.
    ///
    /// Accepts `positive`, `pos` and `p` for the positive family and
    /// `negative`, `neg` and `n` for the negative one.
    pub fn parse_alias(token: &str) -> Result<Self> {
        match token {
            "positive" | "pos" | "p" => Ok(Self::Positive),
            "negative" | "neg" | "n" => Ok(Self::Negative),
            _ => Err(AeroMapError::UnknownRate {
                token: token.to_string(),
            }),
        }
    }

    /// Classifies a numeric rotation rate by its sign.
    ///
    /// A rate of zero (or NaN) carries no sign and is rejected.
    pub fn from_rate(rate: f64) -> Result<Self> {
        if rate > 0.0 {
            Ok(Self::Positive)
        } else if rate < 0.0 {
            Ok(Self::Negative)
        } else {
            Err(AeroMapError::ZeroRotationRate)
        }
    }

    const fn ordinal(self) -> usize {
        match self {
            Self::Negative => 0,
            Self::Positive => 1,
        }
    }
}

impl fmt::Display for RateFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body axis a damping derivative is taken about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationAxis {
    /// Roll rate axis (`dp`).
    Roll,
    /// Pitch rate axis (`dq`).
    Pitch,
    /// Yaw rate axis (`dr`).
    Yaw,
}

impl RotationAxis {
    /// All axes in storage order.
    pub const ALL: [Self; 3] = [Self::Roll, Self::Pitch, Self::Yaw];

    /// The CPACS token of this axis.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Roll => "dp",
            Self::Pitch => "dq",
            Self::Yaw => "dr",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == token)
    }

    const fn ordinal(self) -> usize {
        match self {
            Self::Roll => 0,
            Self::Pitch => 1,
            Self::Yaw => 2,
        }
    }
}

impl fmt::Display for RotationAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RotationAxis {
    type Err = AeroMapError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_token(s).ok_or_else(|| AeroMapError::UnknownAxis {
            token: s.to_string(),
        })
    }
}

/// Identity of one damping derivative column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DampingDerivative {
    /// Rate family the derivative belongs to.
    pub family: RateFamily,
    /// Coefficient the derivative is taken of.
    pub coefficient: Coefficient,
    /// Axis the derivative is taken about.
    pub axis: RotationAxis,
}

impl DampingDerivative {
    /// Builds a damping derivative identity.
    #[must_use]
    pub const fn new(family: RateFamily, coefficient: Coefficient, axis: RotationAxis) -> Self {
        Self {
            family,
            coefficient,
            axis,
        }
    }

    /// Element name under the rate family branch, e.g. `dcldpStar`.
    #[must_use]
    pub fn element_name(self) -> String {
        format!("d{}{}Star", self.coefficient, self.axis)
    }

    /// Full column name, e.g. `dampingDerivatives_negativeRates_dcldpStar`.
    #[must_use]
    pub fn column_name(self) -> String {
        format!(
            "dampingDerivatives_{}_d{}{}Star",
            self.family, self.coefficient, self.axis
        )
    }

    /// All 36 damping derivative columns in storage order: negative
    /// rates before positive ones, coefficients alphabetical, axes
    /// `dp`, `dq`, `dr`.
    pub fn all() -> impl Iterator<Item = Self> {
        RateFamily::ALL.into_iter().flat_map(|family| {
            Coefficient::ALPHABETICAL.into_iter().flat_map(move |coefficient| {
                RotationAxis::ALL
                    .into_iter()
                    .map(move |axis| Self::new(family, coefficient, axis))
            })
        })
    }

    const fn ordinal(self) -> usize {
        self.family.ordinal() * 18
            + self.coefficient.alphabetical_ordinal() * 3
            + self.axis.ordinal()
    }
}

impl fmt::Display for DampingDerivative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dampingDerivatives_{}_d{}{}Star",
            self.family, self.coefficient, self.axis
        )
    }
}

/// Force or moment column derived from a coefficient.
///
/// Derived columns only ever live in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DerivedForce {
    /// Drag force in Newtons, from `cd`.
    Drag,
    /// Lift force in Newtons, from `cl`.
    Lift,
    /// Side force in Newtons, from `cs`.
    Side,
    /// Roll moment in Newton meters, from `cmd`.
    MomentD,
    /// Yaw moment in Newton meters, from `cml`.
    MomentL,
    /// Pitch moment in Newton meters, from `cms`.
    MomentS,
}

impl DerivedForce {
    /// All derived columns in storage order.
    pub const ALL: [Self; 6] = [
        Self::Drag,
        Self::Lift,
        Self::Side,
        Self::MomentD,
        Self::MomentL,
        Self::MomentS,
    ];

    /// The column name of this derived quantity.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Drag => "drag",
            Self::Lift => "lift",
            Self::Side => "side",
            Self::MomentD => "md",
            Self::MomentL => "ml",
            Self::MomentS => "ms",
        }
    }

    /// The derived column fed by a coefficient.
    #[must_use]
    pub const fn for_coefficient(coefficient: Coefficient) -> Self {
        match coefficient {
            Coefficient::Cd => Self::Drag,
            Coefficient::Cl => Self::Lift,
            Coefficient::Cs => Self::Side,
            Coefficient::Cmd => Self::MomentD,
            Coefficient::Cml => Self::MomentL,
            Coefficient::Cms => Self::MomentS,
        }
    }

    /// Whether this column scales with the reference length.
    #[must_use]
    pub const fn is_moment(self) -> bool {
        matches!(self, Self::MomentD | Self::MomentL | Self::MomentS)
    }

    fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == token)
    }

    const fn ordinal(self) -> usize {
        match self {
            Self::Drag => 0,
            Self::Lift => 1,
            Self::Side => 2,
            Self::MomentD => 3,
            Self::MomentL => 4,
            Self::MomentS => 5,
        }
    }
}

impl fmt::Display for DerivedForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any addressable column of an aeromap table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// One of the four flight parameters.
    Parameter(Parameter),
    /// One of the six aerodynamic coefficients.
    Coefficient(Coefficient),
    /// One of the 36 damping derivative columns.
    Damping(DampingDerivative),
    /// One of the six in-memory force columns.
    Derived(DerivedForce),
}

impl Column {
    /// All columns in storage order: parameters, coefficients, damping
    /// derivatives, derived forces.
    pub fn all() -> impl Iterator<Item = Self> {
        Parameter::ALL
            .into_iter()
            .map(Self::Parameter)
            .chain(Coefficient::ALL.into_iter().map(Self::Coefficient))
            .chain(DampingDerivative::all().map(Self::Damping))
            .chain(DerivedForce::ALL.into_iter().map(Self::Derived))
    }

    /// Position of this column in storage order, `0..COLUMN_COUNT`.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Parameter(p) => p.ordinal(),
            Self::Coefficient(c) => 4 + c.ordinal(),
            Self::Damping(d) => 10 + d.ordinal(),
            Self::Derived(d) => 46 + d.ordinal(),
        }
    }

    /// The column name as used in CSV headers and error messages.
    #[must_use]
    pub fn name(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parameter(p) => f.write_str(p.as_str()),
            Self::Coefficient(c) => f.write_str(c.as_str()),
            Self::Damping(d) => d.fmt(f),
            Self::Derived(d) => f.write_str(d.as_str()),
        }
    }
}

impl FromStr for Column {
    type Err = AeroMapError;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(p) = Parameter::from_token(s) {
            return Ok(Self::Parameter(p));
        }
        if let Some(c) = Coefficient::from_token(s) {
            return Ok(Self::Coefficient(c));
        }
        if let Some(d) = DerivedForce::from_token(s) {
            return Ok(Self::Derived(d));
        }
        parse_damping_name(s)
            .map(Self::Damping)
            .ok_or_else(|| AeroMapError::unknown_column(s))
    }
}

/// Parses a full damping derivative column name.
fn parse_damping_name(s: &str) -> Option<DampingDerivative> {
    if !s.is_ascii() {
        return None;
    }
    let rest = s.strip_prefix("dampingDerivatives_")?;
    let (family_token, element) = rest.split_once('_')?;
    let family = match family_token {
        "negativeRates" => RateFamily::Negative,
        "positiveRates" => RateFamily::Positive,
        _ => return None,
    };
    let body = element.strip_prefix('d')?.strip_suffix("Star")?;
    let axis_at = body.len().checked_sub(2)?;
    let (coefficient_token, axis_token) = body.split_at(axis_at);
    let coefficient = Coefficient::from_token(coefficient_token)?;
    let axis = RotationAxis::from_token(axis_token)?;
    Some(DampingDerivative::new(family, coefficient, axis))
}
