//! Row selection over the four flight parameters.

use crate::columns::Parameter;

/// Selects aeromap rows by flight parameter values.
///
/// Each parameter carries a list of accepted values and an empty list
/// leaves that parameter unconstrained. A row matches when every
/// constrained parameter holds one of the accepted values, so the
/// default filter matches every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowFilter {
    altitudes: Vec<f64>,
    mach_numbers: Vec<f64>,
    sideslip_angles: Vec<f64>,
    attack_angles: Vec<f64>,
}

impl RowFilter {
    /// An unconstrained filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrains the altitude to the given values.
    #[must_use]
    pub fn with_altitudes(mut self, values: &[f64]) -> Self {
        self.altitudes = values.to_vec();
        self
    }

    /// Constrains the Mach number to the given values.
    #[must_use]
    pub fn with_mach_numbers(mut self, values: &[f64]) -> Self {
        self.mach_numbers = values.to_vec();
        self
    }

    /// Constrains the sideslip angle to the given values.
    #[must_use]
    pub fn with_sideslip_angles(mut self, values: &[f64]) -> Self {
        self.sideslip_angles = values.to_vec();
        self
    }

    /// Constrains the angle of attack to the given values.
    #[must_use]
    pub fn with_attack_angles(mut self, values: &[f64]) -> Self {
        self.attack_angles = values.to_vec();
        self
    }

    /// Accepted altitudes, empty when unconstrained.
    #[must_use]
    pub fn altitudes(&self) -> &[f64] {
        &self.altitudes
    }

    /// Accepted Mach numbers, empty when unconstrained.
    #[must_use]
    pub fn mach_numbers(&self) -> &[f64] {
        &self.mach_numbers
    }

    /// Accepted sideslip angles, empty when unconstrained.
    #[must_use]
    pub fn sideslip_angles(&self) -> &[f64] {
        &self.sideslip_angles
    }

    /// Accepted angles of attack, empty when unconstrained.
    #[must_use]
    pub fn attack_angles(&self) -> &[f64] {
        &self.attack_angles
    }

    /// Whether no parameter is constrained.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.altitudes.is_empty()
            && self.mach_numbers.is_empty()
            && self.sideslip_angles.is_empty()
            && self.attack_angles.is_empty()
    }

    /// Whether a parameter cell passes this filter.
    ///
    /// An unset cell only passes when the parameter is unconstrained.
    /// NaN never matches a constraint.
    #[must_use]
    pub fn allows(&self, parameter: Parameter, value: Option<f64>) -> bool {
        let accepted = self.accepted(parameter);
        accepted.is_empty() || value.is_some_and(|v| accepted.contains(&v))
    }

    fn accepted(&self, parameter: Parameter) -> &[f64] {
        match parameter {
            Parameter::Altitude => &self.altitudes,
            Parameter::MachNumber => &self.mach_numbers,
            Parameter::AngleOfSideslip => &self.sideslip_angles,
            Parameter::AngleOfAttack => &self.attack_angles,
        }
    }
}
