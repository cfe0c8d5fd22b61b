//! CSV import and export of aeromap tables.
//!
//! Exported files hold the addressable columns in storage order, one
//! header row and `%g` formatted cells with unset cells written as
//! `NaN`. A file exported by this module reimports to the same table
//! and re-exports byte for byte.

use std::io;

use cpacs_document::format_g;

use crate::columns::{Column, Parameter};
use crate::error::{AeroMapError, Result};
use crate::table::{AeroTable, Row};

pub(crate) fn write_table<W: io::Write>(table: &AeroTable, writer: W) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    let columns: Vec<Column> = table.active_columns().collect();
    out.write_record(columns.iter().map(|column| column.name()))?;
    for row in table.rows() {
        out.write_record(columns.iter().map(|column| render_cell(row, *column)))?;
    }
    out.flush()?;
    Ok(())
}

fn render_cell(row: &Row, column: Column) -> String {
    match row.get(column) {
        Some(value) => format_g(value),
        None => "NaN".to_string(),
    }
}

pub(crate) fn read_table<R: io::Read>(reader: R) -> Result<AeroTable> {
    let mut input = csv::Reader::from_reader(reader);

    let mut columns = Vec::new();
    for header in input.headers()? {
        columns.push(header.parse::<Column>()?);
    }
    for parameter in Parameter::ALL {
        if !columns.contains(&Column::Parameter(parameter)) {
            return Err(AeroMapError::MissingCsvColumn {
                name: parameter.to_string(),
            });
        }
    }

    let mut table = AeroTable::with_active_columns(columns.iter().copied());
    for record in input.records() {
        let record = record?;
        let mut row = Row::empty();
        for (column, cell) in columns.iter().zip(record.iter()) {
            row.set(*column, parse_cell(*column, cell)?);
        }
        table.push_row_unchecked(row);
    }
    Ok(table)
}

/// Empty and NaN cells are unset.
fn parse_cell(column: Column, cell: &str) -> Result<Option<f64>> {
    if cell.is_empty() {
        return Ok(None);
    }
    let value: f64 = cell.parse().map_err(|_| AeroMapError::MalformedCsvCell {
        column: column.name(),
        value: cell.to_string(),
    })?;
    Ok(Some(value).filter(|v| !v.is_nan()))
}
