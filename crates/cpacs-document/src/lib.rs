//! CPACS document handle built on an in-memory XML tree.
//!
//! CPACS stores aircraft definitions as deeply nested XML. This crate keeps
//! the whole document in memory and exposes the small navigation surface the
//! rest of the workspace needs: absolute element paths with 1-based
//! `[index]` selectors, float vectors with a literal `nan` token, idempotent
//! branch creation, uID lookup, and typed default-aware reads.
//!
//! # Example
//!
//! ```
//! use cpacs_document::Document;
//!
//! let mut doc: Document = "<cpacs><vehicles/></cpacs>".parse().unwrap();
//! doc.create_branch("/cpacs/vehicles/aircraft").unwrap();
//! doc.set_float_vector("/cpacs/vehicles/aircraft/altitude", &[0.0, 1000.0])
//!     .unwrap();
//!
//! let altitude = doc
//!     .get_float_vector("/cpacs/vehicles/aircraft/altitude")
//!     .unwrap();
//! assert_eq!(altitude, vec![0.0, 1000.0]);
//! ```

mod document;
mod error;
mod format;
mod node;
mod path;

pub use document::{Document, UID_ATTRIBUTE, Value};
pub use error::{DocumentError, Result};
pub use format::format_g;
pub use node::XmlNode;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
