//! One aeromap and its CPACS persistence.

use std::fmt;

use cpacs_document::{Document, DocumentError, UID_ATTRIBUTE, format_g};
use tracing::warn;

use crate::columns::{
    Coefficient, Column, DampingDerivative, Parameter, RateFamily, RotationAxis,
};
use crate::error::{AeroMapError, Result};
use crate::filter::RowFilter;
use crate::paths::AEROPERFORMANCE_XPATH;
use crate::table::{AeroTable, Coefficients, FlightPoint, Row};

/// Tabular aerodynamic performance data of one aircraft.
///
/// An aeromap is identified by its uID inside a CPACS document. It is
/// edited in memory and only written back on [`AeroMap::save`].
#[derive(Debug, Clone)]
pub struct AeroMap {
    uid: String,
    /// Display name, defaults to the uID.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Atmospheric model tag, defaults to `ISA`.
    pub atmospheric_model: String,
    table: AeroTable,
    xpath: Option<String>,
}

impl AeroMap {
    /// Builds an empty aeromap not yet tied to a document.
    ///
    /// The uID must be non-empty and free of whitespace.
    pub fn new(uid: &str) -> Result<Self> {
        if uid.is_empty() {
            return Err(AeroMapError::EmptyUid);
        }
        if uid.chars().any(char::is_whitespace) {
            return Err(AeroMapError::WhitespaceUid {
                uid: uid.to_string(),
            });
        }
        Ok(Self {
            uid: uid.to_string(),
            name: uid.to_string(),
            description: String::new(),
            atmospheric_model: "ISA".to_string(),
            table: AeroTable::new(),
            xpath: None,
        })
    }

    /// Loads the aeromap stored under `uid` in a CPACS document.
    ///
    /// The four parameter vectors must be present; coefficient and
    /// damping derivative vectors are picked up when they exist. All
    /// stored vectors must have the same length.
    pub fn from_document(document: &Document, uid: &str) -> Result<Self> {
        let aeromap_xpath = document.uid_xpath(uid).map_err(|err| match err {
            DocumentError::UidNotFound { .. } => AeroMapError::UnknownUid {
                uid: uid.to_string(),
            },
            other => AeroMapError::Document(other),
        })?;
        let perf_xpath = format!("{aeromap_xpath}/aeroPerformanceMap");

        let mut parameters = Vec::with_capacity(Parameter::ALL.len());
        for parameter in Parameter::ALL {
            let values = document.get_float_vector(&format!("{perf_xpath}/{parameter}"))?;
            parameters.push(values);
        }
        let states = parameters[0].len();
        for (parameter, values) in Parameter::ALL.iter().zip(&parameters) {
            if values.len() != states {
                return Err(AeroMapError::VectorLengthMismatch {
                    uid: uid.to_string(),
                    column: parameter.to_string(),
                    expected: states,
                    actual: values.len(),
                });
            }
        }

        let mut table = AeroTable::new();
        for state in 0..states {
            let mut row = Row::empty();
            for (parameter, values) in Parameter::ALL.iter().zip(&parameters) {
                row.set(Column::Parameter(*parameter), Some(values[state]));
            }
            table.push_row_unchecked(row);
        }

        for coefficient in Coefficient::ALL {
            let coef_xpath = format!("{perf_xpath}/{coefficient}");
            if !document.element_exists(&coef_xpath) {
                continue;
            }
            let values = document.get_float_vector(&coef_xpath)?;
            let column = Column::Coefficient(coefficient);
            check_length(uid, column, states, values.len())?;
            table.fill_column(column, &values);
        }

        for damping in DampingDerivative::all() {
            let damping_xpath = format!(
                "{perf_xpath}/dampingDerivatives/{}/{}",
                damping.family,
                damping.element_name()
            );
            if !document.element_exists(&damping_xpath) {
                continue;
            }
            let values = document.get_float_vector(&damping_xpath)?;
            let column = Column::Damping(damping);
            check_length(uid, column, states, values.len())?;
            table.fill_column(column, &values);
        }

        let name_xpath = format!("{aeromap_xpath}/name");
        let name = if document.element_exists(&name_xpath) {
            document.get_text(&name_xpath)?.to_string()
        } else {
            uid.to_string()
        };
        let description_xpath = format!("{aeromap_xpath}/description");
        let description = if document.element_exists(&description_xpath) {
            document.get_text(&description_xpath)?.to_string()
        } else {
            String::new()
        };
        let model_xpath = format!("{aeromap_xpath}/boundaryConditions/atmosphericModel");
        let atmospheric_model = if document.element_exists(&model_xpath) {
            document.get_text(&model_xpath)?.to_string()
        } else {
            "ISA".to_string()
        };

        Ok(Self {
            uid: uid.to_string(),
            name,
            description,
            atmospheric_model,
            table,
            xpath: Some(perf_xpath),
        })
    }

    /// The uID identifying this aeromap.
    #[must_use]
    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// Path of the stored aeroPerformanceMap element, `None` until the
    /// aeromap has been saved to a document.
    #[must_use]
    pub fn xpath(&self) -> Option<&str> {
        self.xpath.as_deref()
    }

    /// The underlying table.
    #[must_use]
    pub fn table(&self) -> &AeroTable {
        &self.table
    }

    /// Mutable access to the underlying table.
    pub fn table_mut(&mut self) -> &mut AeroTable {
        &mut self.table
    }

    /// Appends a row, see [`AeroTable::add_row`].
    pub fn add_row(&mut self, point: FlightPoint, coefficients: Coefficients) -> Result<()> {
        self.table.add_row(point, coefficients)
    }

    /// Removes all rows keyed by `point`, see [`AeroTable::remove_row`].
    pub fn remove_row(&mut self, point: FlightPoint) -> Result<usize> {
        self.table.remove_row(point)
    }

    /// Replaces the coefficients of the rows keyed by `point`, see
    /// [`AeroTable::add_coefficients`].
    pub fn add_coefficients(
        &mut self,
        point: FlightPoint,
        coefficients: Coefficients,
    ) -> Result<usize> {
        self.table.add_coefficients(point, coefficients)
    }

    /// Stores a damping derivative, see
    /// [`AeroTable::add_damping_derivative`].
    pub fn add_damping_derivatives(
        &mut self,
        point: FlightPoint,
        coefficient: Coefficient,
        axis: RotationAxis,
        rate: f64,
        value: f64,
    ) -> Result<()> {
        self.table
            .add_damping_derivative(point, coefficient, axis, rate, value)
    }

    /// The values of one column over the rows passing `filter`.
    pub fn get(&self, column: Column, filter: &RowFilter) -> Result<Vec<f64>> {
        self.table.get(column, filter)
    }

    /// The values of one damping derivative column.
    ///
    /// `rates` accepts the keywords `positive`, `pos`, `p`, `negative`,
    /// `neg` and `n`. Fails when the column has never been populated.
    pub fn get_damping_derivatives(
        &self,
        coefficient: Coefficient,
        axis: RotationAxis,
        rates: &str,
        filter: &RowFilter,
    ) -> Result<Vec<f64>> {
        let family = RateFamily::parse_alias(rates)?;
        let column = Column::Damping(DampingDerivative::new(family, coefficient, axis));
        self.table.get(column, filter)
    }

    /// Writes the aeromap back into a CPACS document.
    ///
    /// A not yet persisted aeromap gets a fresh `aeroMap` element under
    /// the aeroPerformance branch. Every row must have all four
    /// parameters set. Coefficient columns holding no values are
    /// skipped with a warning and damping derivative columns that were
    /// never touched are left alone.
    pub fn save(&mut self, document: &mut Document) -> Result<()> {
        self.table.ensure_complete_parameters()?;

        let perf_xpath = match &self.xpath {
            Some(xpath) => xpath.clone(),
            None => {
                document.create_branch(AEROPERFORMANCE_XPATH)?;
                let present =
                    document.count_named_children(AEROPERFORMANCE_XPATH, "aeroMap")?;
                document.create_element(AEROPERFORMANCE_XPATH, "aeroMap")?;
                let aeromap_xpath =
                    format!("{AEROPERFORMANCE_XPATH}/aeroMap[{}]", present + 1);
                document.set_attribute(&aeromap_xpath, UID_ATTRIBUTE, &self.uid)?;
                let perf_xpath = format!("{aeromap_xpath}/aeroPerformanceMap");
                document.create_branch(&perf_xpath)?;
                self.xpath = Some(perf_xpath.clone());
                perf_xpath
            }
        };

        let everything = RowFilter::new();
        for parameter in Parameter::ALL {
            let values = self.table.get(Column::Parameter(parameter), &everything)?;
            document.set_float_vector(&format!("{perf_xpath}/{parameter}"), &values)?;
        }

        for coefficient in Coefficient::ALL {
            let column = Column::Coefficient(coefficient);
            if !self.table.is_active(column) {
                continue;
            }
            let coef_xpath = format!("{perf_xpath}/{coefficient}");
            if self.column_is_empty(column) {
                warn!(
                    "coefficient {} of aeromap {:?} holds no values and is not written",
                    coefficient, self.uid
                );
                self.remove_stale(document, &coef_xpath)?;
                continue;
            }
            let values = self.table.get(column, &everything)?;
            document.set_float_vector(&coef_xpath, &values)?;
        }

        for damping in DampingDerivative::all() {
            let column = Column::Damping(damping);
            if !self.table.is_active(column) {
                continue;
            }
            let damping_xpath = format!(
                "{perf_xpath}/dampingDerivatives/{}/{}",
                damping.family,
                damping.element_name()
            );
            if self.column_is_empty(column) {
                warn!(
                    "damping derivative {} of aeromap {:?} holds no values and is not written",
                    damping.column_name(),
                    self.uid
                );
                self.remove_stale(document, &damping_xpath)?;
                continue;
            }
            let values = self.table.get(column, &everything)?;
            document.set_float_vector(&damping_xpath, &values)?;
        }

        let aeromap_xpath = parent_of(&perf_xpath).to_string();
        let name_xpath = format!("{aeromap_xpath}/name");
        document.create_branch(&name_xpath)?;
        document.set_text(&name_xpath, &self.name)?;
        let description_xpath = format!("{aeromap_xpath}/description");
        document.create_branch(&description_xpath)?;
        document.set_text(&description_xpath, &self.description)?;
        let model_xpath = format!("{aeromap_xpath}/boundaryConditions/atmosphericModel");
        document.create_branch(&model_xpath)?;
        document.set_text(&model_xpath, &self.atmospheric_model)?;

        Ok(())
    }

    /// Writes the table to a CSV file: the addressable columns in
    /// storage order, `%g` formatted cells and `NaN` for unset cells.
    pub fn export_csv(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        crate::csv::write_table(&self.table, file)
    }

    fn column_is_empty(&self, column: Column) -> bool {
        self.table.rows().iter().all(|row| row.get(column).is_none())
    }

    /// Drops a stored vector that no longer holds any value, so a
    /// reload cannot pick up stale data.
    fn remove_stale(&self, document: &mut Document, xpath: &str) -> Result<()> {
        if document.element_exists(xpath) {
            document.remove_element(xpath)?;
        }
        Ok(())
    }

    pub(crate) fn duplicate_as(&self, uid: &str) -> Result<Self> {
        let mut duplicate = Self::new(uid)?;
        duplicate.description = format!("{} (duplicate from \"{}\")", self.description, self.uid);
        duplicate.atmospheric_model = self.atmospheric_model.clone();
        duplicate.table = self.table.clone();
        Ok(duplicate)
    }

    pub(crate) fn set_xpath(&mut self, xpath: Option<String>) {
        self.xpath = xpath;
    }
}

fn parent_of(xpath: &str) -> &str {
    xpath.rsplit_once('/').map_or(xpath, |(parent, _)| parent)
}

fn check_length(uid: &str, column: Column, expected: usize, actual: usize) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(AeroMapError::VectorLengthMismatch {
            uid: uid.to_string(),
            column: column.name(),
            expected,
            actual,
        })
    }
}

impl fmt::Display for AeroMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AeroMap uid: {}", self.uid)?;
        writeln!(f, "AeroMap xpath: {}", self.xpath.as_deref().unwrap_or("not saved yet"))?;
        writeln!(f, "AeroMap description: {}", self.description)?;
        writeln!(f, "Atmospheric model: {}", self.atmospheric_model)?;
        writeln!(f, "Number of states: {}", self.table.len())?;
        for parameter in Parameter::ALL {
            let rendered: Vec<String> = self
                .table
                .unique_values(parameter)
                .into_iter()
                .map(format_g)
                .collect();
            writeln!(f, "Unique {parameter}: {}", rendered.join(", "))?;
        }
        let columns: Vec<String> = self.table.active_columns().map(Column::name).collect();
        writeln!(f, "Parameters and coefficients: {}", columns.join(", "))
    }
}
