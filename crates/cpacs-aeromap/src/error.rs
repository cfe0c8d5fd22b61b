//! Error types for aeromap handling.

use std::path::PathBuf;

use cpacs_document::DocumentError;
use thiserror::Error;

use crate::columns::Parameter;

/// Errors that can occur when building, querying or persisting aeromaps.
#[derive(Debug, Error)]
pub enum AeroMapError {
    /// An aeromap uID was empty.
    #[error("aeromap uID must not be empty")]
    EmptyUid,

    /// An aeromap uID contained whitespace.
    #[error("aeromap uID {uid:?} must not contain whitespace")]
    WhitespaceUid {
        /// The offending uID.
        uid: String,
    },

    /// An aeromap with the same uID already exists in the document.
    #[error("an aeromap with uID {uid:?} already exists")]
    DuplicateUid {
        /// The requested uID.
        uid: String,
    },

    /// No aeromap with the requested uID exists in the document.
    #[error("no aeromap with uID {uid:?} found")]
    UnknownUid {
        /// The requested uID.
        uid: String,
    },

    /// A row with the same four flight parameters already exists.
    #[error(
        "a row with altitude={altitude}, machNumber={mach_number}, \
         angleOfSideslip={angle_of_sideslip}, angleOfAttack={angle_of_attack} already exists"
    )]
    DuplicateRow {
        /// Altitude in meters.
        altitude: f64,
        /// Mach number.
        mach_number: f64,
        /// Sideslip angle in degrees.
        angle_of_sideslip: f64,
        /// Angle of attack in degrees.
        angle_of_attack: f64,
    },

    /// No row matches the requested four flight parameters.
    #[error(
        "no row with altitude={altitude}, machNumber={mach_number}, \
         angleOfSideslip={angle_of_sideslip}, angleOfAttack={angle_of_attack} found"
    )]
    RowNotFound {
        /// Altitude in meters.
        altitude: f64,
        /// Mach number.
        mach_number: f64,
        /// Sideslip angle in degrees.
        angle_of_sideslip: f64,
        /// Angle of attack in degrees.
        angle_of_attack: f64,
    },

    /// The requested column has never been populated in this aeromap.
    #[error("column {name:?} is not present in this aeromap")]
    ColumnNotPresent {
        /// The column name.
        name: String,
    },

    /// A column name is not part of the aeromap schema.
    #[error("unknown aeromap column {name:?}")]
    UnknownColumn {
        /// The offending name.
        name: String,
    },

    /// A token does not name an aerodynamic coefficient.
    #[error("unknown coefficient {token:?}, expected one of cd, cl, cs, cmd, cml, cms")]
    UnknownCoefficient {
        /// The offending token.
        token: String,
    },

    /// A token does not name a rotation axis.
    #[error("unknown rotation axis {token:?}, expected one of dp, dq, dr")]
    UnknownAxis {
        /// The offending token.
        token: String,
    },

    /// A token does not name a rotation rate sign.
    #[error("unknown rate {token:?}, expected positive, pos, p, negative, neg or n")]
    UnknownRate {
        /// The offending token.
        token: String,
    },

    /// A damping derivative was given with a rotation rate of zero.
    #[error("damping derivative rate must not be zero")]
    ZeroRotationRate,

    /// A row is missing one of the four flight parameters.
    #[error("row {row} has no value for parameter {parameter}")]
    IncompleteParameters {
        /// Zero-based row index.
        row: usize,
        /// The missing parameter.
        parameter: Parameter,
    },

    /// Stored column vectors of one aeromap disagree in length.
    #[error(
        "aeromap {uid:?}: column {column:?} has {actual} values, expected {expected} \
         to match the flight parameters"
    )]
    VectorLengthMismatch {
        /// The aeromap uID.
        uid: String,
        /// The offending column.
        column: String,
        /// Length of the parameter vectors.
        expected: usize,
        /// Length of the offending vector.
        actual: usize,
    },

    /// An attempt was made to overwrite a flight parameter cell.
    #[error("column {name:?} holds flight parameters and cannot be overwritten")]
    ImmutableColumn {
        /// The column name.
        name: String,
    },

    /// A row index is outside the table.
    #[error("row index {index} out of range, table has {rows} rows")]
    RowIndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of rows in the table.
        rows: usize,
    },

    /// The CSV file to import does not exist.
    #[error("CSV file not found at {path:?}")]
    MissingCsvFile {
        /// The requested path.
        path: PathBuf,
    },

    /// A CSV file lacks one of the four mandatory parameter columns.
    #[error("CSV file is missing mandatory column {name:?}")]
    MissingCsvColumn {
        /// The missing column name.
        name: String,
    },

    /// A CSV cell could not be parsed as a float.
    #[error("CSV column {column:?} contains unparsable value {value:?}")]
    MalformedCsvCell {
        /// The column the cell belongs to.
        column: String,
        /// The raw cell content.
        value: String,
    },

    /// A save target does not end in `.xml`.
    #[error("CPACS files must use the .xml extension, got {path:?}")]
    NotAnXmlPath {
        /// The rejected path.
        path: PathBuf,
    },

    /// A wing index is outside the configuration.
    #[error("wing index {index} out of range, configuration has {wings} wings")]
    WingIndexOutOfRange {
        /// The requested 1-based index.
        index: usize,
        /// Number of wings in the configuration.
        wings: usize,
    },

    /// No wing with the requested uID exists in the configuration.
    #[error("no wing with uID {uid:?} found")]
    UnknownWingUid {
        /// The requested uID.
        uid: String,
    },

    /// The configuration has no wings at all.
    #[error("the aircraft configuration has no wings")]
    NoWings,

    /// Error from the underlying CPACS document.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Error from CSV reading or writing.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AeroMapError {
    /// Convenience constructor for [`AeroMapError::UnknownColumn`].
    pub fn unknown_column(name: impl Into<String>) -> Self {
        Self::UnknownColumn { name: name.into() }
    }

    /// Convenience constructor for [`AeroMapError::ColumnNotPresent`].
    pub fn column_not_present(name: impl Into<String>) -> Self {
        Self::ColumnNotPresent { name: name.into() }
    }
}

/// Result alias for aeromap operations.
pub type Result<T> = std::result::Result<T, AeroMapError>;
