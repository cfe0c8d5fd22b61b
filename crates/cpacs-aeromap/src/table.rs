//! In-memory aeromap table.
//!
//! Rows are keyed by the four flight parameters. Coefficient columns are
//! always addressable, damping derivative columns only once a value has
//! been stored in them, and derived force columns only after a force
//! calculation filled them in.

use crate::columns::{
    COLUMN_COUNT, Coefficient, Column, DampingDerivative, Parameter, RateFamily, RotationAxis,
};
use crate::error::{AeroMapError, Result};
use crate::filter::RowFilter;

/// The four flight parameters keying one aeromap row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightPoint {
    /// Altitude in meters.
    pub altitude: f64,
    /// Mach number.
    pub mach_number: f64,
    /// Sideslip angle in degrees.
    pub angle_of_sideslip: f64,
    /// Angle of attack in degrees.
    pub angle_of_attack: f64,
}

impl FlightPoint {
    /// Builds a flight point from the four parameters.
    #[must_use]
    pub const fn new(
        altitude: f64,
        mach_number: f64,
        angle_of_sideslip: f64,
        angle_of_attack: f64,
    ) -> Self {
        Self {
            altitude,
            mach_number,
            angle_of_sideslip,
            angle_of_attack,
        }
    }

    fn value(self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::Altitude => self.altitude,
            Parameter::MachNumber => self.mach_number,
            Parameter::AngleOfSideslip => self.angle_of_sideslip,
            Parameter::AngleOfAttack => self.angle_of_attack,
        }
    }
}

/// Coefficient values attached to one row.
///
/// Entries left at `None` store as unset cells.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Coefficients {
    /// Drag coefficient.
    pub cd: Option<f64>,
    /// Lift coefficient.
    pub cl: Option<f64>,
    /// Side force coefficient.
    pub cs: Option<f64>,
    /// Roll moment coefficient.
    pub cmd: Option<f64>,
    /// Yaw moment coefficient.
    pub cml: Option<f64>,
    /// Pitch moment coefficient.
    pub cms: Option<f64>,
}

impl Coefficients {
    /// The value stored for one coefficient.
    #[must_use]
    pub const fn get(self, coefficient: Coefficient) -> Option<f64> {
        match coefficient {
            Coefficient::Cd => self.cd,
            Coefficient::Cl => self.cl,
            Coefficient::Cs => self.cs,
            Coefficient::Cmd => self.cmd,
            Coefficient::Cml => self.cml,
            Coefficient::Cms => self.cms,
        }
    }
}

/// One aeromap row, a cell per addressable column.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    cells: [Option<f64>; COLUMN_COUNT],
}

impl Row {
    fn new(point: FlightPoint) -> Self {
        let mut row = Self::empty();
        for parameter in Parameter::ALL {
            row.cells[Column::Parameter(parameter).index()] = Some(point.value(parameter));
        }
        row
    }

    pub(crate) fn empty() -> Self {
        Self {
            cells: [None; COLUMN_COUNT],
        }
    }

    /// The value stored in one cell, `None` when unset.
    #[must_use]
    pub fn get(&self, column: Column) -> Option<f64> {
        self.cells[column.index()]
    }

    pub(crate) fn set(&mut self, column: Column, value: Option<f64>) {
        self.cells[column.index()] = value;
    }

    /// The flight point of this row, `None` while any parameter is unset.
    #[must_use]
    pub fn point(&self) -> Option<FlightPoint> {
        Some(FlightPoint::new(
            self.parameter(Parameter::Altitude)?,
            self.parameter(Parameter::MachNumber)?,
            self.parameter(Parameter::AngleOfSideslip)?,
            self.parameter(Parameter::AngleOfAttack)?,
        ))
    }

    fn parameter(&self, parameter: Parameter) -> Option<f64> {
        self.cells[Column::Parameter(parameter).index()]
    }

    fn matches_key(&self, point: FlightPoint) -> bool {
        Parameter::ALL
            .into_iter()
            .all(|p| self.parameter(p) == Some(point.value(p)))
    }

    fn passes(&self, filter: &RowFilter) -> bool {
        Parameter::ALL
            .into_iter()
            .all(|p| filter.allows(p, self.parameter(p)))
    }
}

/// Coefficient and damping cells treat NaN as unset.
fn sanitize(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}

/// Tabular aerodynamic data addressed by column identity.
#[derive(Debug, Clone, PartialEq)]
pub struct AeroTable {
    rows: Vec<Row>,
    active: [bool; COLUMN_COUNT],
}

impl AeroTable {
    /// An empty table with the four parameter and six coefficient
    /// columns addressable.
    #[must_use]
    pub fn new() -> Self {
        let mut active = [false; COLUMN_COUNT];
        for parameter in Parameter::ALL {
            active[Column::Parameter(parameter).index()] = true;
        }
        for coefficient in Coefficient::ALL {
            active[Column::Coefficient(coefficient).index()] = true;
        }
        Self {
            rows: Vec::new(),
            active,
        }
    }

    /// An empty table with exactly the given columns addressable, the
    /// parameters always included. Used when importing CSV files whose
    /// headers decide the schema.
    pub(crate) fn with_active_columns(columns: impl IntoIterator<Item = Column>) -> Self {
        let mut active = [false; COLUMN_COUNT];
        for parameter in Parameter::ALL {
            active[Column::Parameter(parameter).index()] = true;
        }
        for column in columns {
            active[column.index()] = true;
        }
        Self {
            rows: Vec::new(),
            active,
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in insertion order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Whether a column is addressable.
    #[must_use]
    pub fn is_active(&self, column: Column) -> bool {
        self.active[column.index()]
    }

    /// All addressable columns in storage order.
    pub fn active_columns(&self) -> impl Iterator<Item = Column> + '_ {
        Column::all().filter(|column| self.active[column.index()])
    }

    /// Appends a row keyed by `point`, holding the given coefficients.
    ///
    /// Fails when a row with the same four parameter values already
    /// exists. All six coefficient columns become addressable, so a
    /// table imported without one of them grows it here, earlier rows
    /// reading as unset.
    pub fn add_row(&mut self, point: FlightPoint, coefficients: Coefficients) -> Result<()> {
        if self.rows.iter().any(|row| row.matches_key(point)) {
            return Err(AeroMapError::DuplicateRow {
                altitude: point.altitude,
                mach_number: point.mach_number,
                angle_of_sideslip: point.angle_of_sideslip,
                angle_of_attack: point.angle_of_attack,
            });
        }
        let mut row = Row::new(point);
        for coefficient in Coefficient::ALL {
            let column = Column::Coefficient(coefficient);
            row.set(column, sanitize(coefficients.get(coefficient)));
            self.active[column.index()] = true;
        }
        self.rows.push(row);
        Ok(())
    }

    /// Removes every row keyed by `point` and returns how many were
    /// removed. Fails when no row matches.
    pub fn remove_row(&mut self, point: FlightPoint) -> Result<usize> {
        let before = self.rows.len();
        self.rows.retain(|row| !row.matches_key(point));
        let removed = before - self.rows.len();
        if removed == 0 {
            return Err(AeroMapError::RowNotFound {
                altitude: point.altitude,
                mach_number: point.mach_number,
                angle_of_sideslip: point.angle_of_sideslip,
                angle_of_attack: point.angle_of_attack,
            });
        }
        Ok(removed)
    }

    /// Replaces the six coefficient cells of every row keyed by `point`.
    ///
    /// Coefficients left at `None` become unset, so a call always
    /// overwrites the full coefficient set. Returns the number of rows
    /// updated and fails when no row matches.
    pub fn add_coefficients(
        &mut self,
        point: FlightPoint,
        coefficients: Coefficients,
    ) -> Result<usize> {
        let mut updated = 0;
        for row in &mut self.rows {
            if !row.matches_key(point) {
                continue;
            }
            for coefficient in Coefficient::ALL {
                row.set(
                    Column::Coefficient(coefficient),
                    sanitize(coefficients.get(coefficient)),
                );
            }
            updated += 1;
        }
        if updated == 0 {
            return Err(AeroMapError::RowNotFound {
                altitude: point.altitude,
                mach_number: point.mach_number,
                angle_of_sideslip: point.angle_of_sideslip,
                angle_of_attack: point.angle_of_attack,
            });
        }
        for coefficient in Coefficient::ALL {
            self.active[Column::Coefficient(coefficient).index()] = true;
        }
        Ok(updated)
    }

    /// Stores a damping derivative on every row keyed by `point`.
    ///
    /// The sign of `rate` selects the rate family, so a rate of zero is
    /// rejected. The touched column becomes addressable.
    pub fn add_damping_derivative(
        &mut self,
        point: FlightPoint,
        coefficient: Coefficient,
        axis: RotationAxis,
        rate: f64,
        value: f64,
    ) -> Result<()> {
        let family = RateFamily::from_rate(rate)?;
        let column = Column::Damping(DampingDerivative::new(family, coefficient, axis));
        let mut updated = 0;
        for row in &mut self.rows {
            if !row.matches_key(point) {
                continue;
            }
            row.set(column, sanitize(Some(value)));
            updated += 1;
        }
        if updated == 0 {
            return Err(AeroMapError::RowNotFound {
                altitude: point.altitude,
                mach_number: point.mach_number,
                angle_of_sideslip: point.angle_of_sideslip,
                angle_of_attack: point.angle_of_attack,
            });
        }
        self.active[column.index()] = true;
        Ok(())
    }

    /// The values of one column over the rows passing `filter`, unset
    /// cells reported as NaN.
    ///
    /// Fails when the column is not addressable in this table. An empty
    /// result is not an error.
    pub fn get(&self, column: Column, filter: &RowFilter) -> Result<Vec<f64>> {
        if !self.is_active(column) {
            return Err(AeroMapError::column_not_present(column.name()));
        }
        Ok(self
            .rows
            .iter()
            .filter(|row| row.passes(filter))
            .map(|row| row.get(column).unwrap_or(f64::NAN))
            .collect())
    }

    /// Sorted distinct values of one parameter over all rows.
    #[must_use]
    pub fn unique_values(&self, parameter: Parameter) -> Vec<f64> {
        let column = Column::Parameter(parameter);
        let mut values: Vec<f64> = self.rows.iter().filter_map(|row| row.get(column)).collect();
        values.sort_by(f64::total_cmp);
        values.dedup_by(|a, b| a.total_cmp(b).is_eq());
        values
    }

    /// Verifies that every row has all four parameters set, NaN
    /// counting as unset.
    pub fn ensure_complete_parameters(&self) -> Result<()> {
        for (index, row) in self.rows.iter().enumerate() {
            for parameter in Parameter::ALL {
                if row.get(Column::Parameter(parameter)).is_none_or(f64::is_nan) {
                    return Err(AeroMapError::IncompleteParameters {
                        row: index,
                        parameter,
                    });
                }
            }
        }
        Ok(())
    }

    /// Overwrites one non-parameter cell by row index, making the column
    /// addressable. Parameter cells are the row key and stay immutable.
    pub fn set_cell(&mut self, index: usize, column: Column, value: f64) -> Result<()> {
        if matches!(column, Column::Parameter(_)) {
            return Err(AeroMapError::ImmutableColumn {
                name: column.name(),
            });
        }
        let rows = self.rows.len();
        let row = self
            .rows
            .get_mut(index)
            .ok_or(AeroMapError::RowIndexOutOfRange { index, rows })?;
        row.set(column, sanitize(Some(value)));
        self.active[column.index()] = true;
        Ok(())
    }

    pub(crate) fn push_row_unchecked(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Fills one column from a slice of per-row values, NaN entries
    /// becoming unset cells. The caller checks the length beforehand.
    pub(crate) fn fill_column(&mut self, column: Column, values: &[f64]) {
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.set(column, sanitize(Some(*value)));
        }
        self.active[column.index()] = true;
    }
}

impl Default for AeroTable {
    fn default() -> Self {
        Self::new()
    }
}
