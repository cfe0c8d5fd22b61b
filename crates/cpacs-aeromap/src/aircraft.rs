//! Aircraft reference values and wing geometry.

use std::fmt;

use cpacs_document::Document;
use serde::{Deserialize, Serialize};

use crate::error::{AeroMapError, Result};
use crate::paths::REFERENCE_XPATH;

/// Geometry of one wing as reported by the configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WingGeometry {
    /// uID of the wing.
    pub uid: String,
    /// Whether the wing is mirrored at the symmetry plane.
    pub symmetric: bool,
    /// Span of the modeled half in meters.
    pub half_span: f64,
    /// Surface area in square meters.
    pub surface_area: f64,
    /// Aspect ratio.
    pub aspect_ratio: f64,
}

/// Source of wing geometry for an aircraft configuration.
///
/// Wing indices are 1-based, matching how CPACS tools number wings.
pub trait GeometryConfiguration {
    /// Number of wings.
    fn wing_count(&self) -> usize;

    /// The wing at a 1-based index.
    fn wing(&self, index: usize) -> Result<WingGeometry>;

    /// The 1-based index of the wing with the given uID.
    fn wing_index(&self, uid: &str) -> Result<usize>;
}

/// Plain in-memory wing list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WingSet {
    wings: Vec<WingGeometry>,
}

impl WingSet {
    /// Builds a wing list.
    #[must_use]
    pub fn new(wings: Vec<WingGeometry>) -> Self {
        Self { wings }
    }

    /// Appends a wing.
    pub fn push(&mut self, wing: WingGeometry) {
        self.wings.push(wing);
    }
}

impl GeometryConfiguration for WingSet {
    fn wing_count(&self) -> usize {
        self.wings.len()
    }

    fn wing(&self, index: usize) -> Result<WingGeometry> {
        index
            .checked_sub(1)
            .and_then(|i| self.wings.get(i))
            .cloned()
            .ok_or(AeroMapError::WingIndexOutOfRange {
                index,
                wings: self.wings.len(),
            })
    }

    fn wing_index(&self, uid: &str) -> Result<usize> {
        self.wings
            .iter()
            .position(|wing| wing.uid == uid)
            .map(|i| i + 1)
            .ok_or_else(|| AeroMapError::UnknownWingUid {
                uid: uid.to_string(),
            })
    }
}

/// Reference wing values derived from one wing's geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceWingSnapshot {
    /// uID of the reference wing.
    pub uid: String,
    /// 1-based index of the wing in the configuration.
    pub index: usize,
    /// Full span in meters, both halves when the wing is mirrored.
    pub span: f64,
    /// Surface area in square meters.
    pub area: f64,
    /// Aspect ratio.
    pub aspect_ratio: f64,
}

impl ReferenceWingSnapshot {
    fn from_wing(index: usize, wing: &WingGeometry) -> Self {
        let halves = if wing.symmetric { 2.0 } else { 1.0 };
        Self {
            uid: wing.uid.clone(),
            index,
            span: wing.half_span * halves,
            area: wing.surface_area,
            aspect_ratio: wing.aspect_ratio,
        }
    }
}

/// Reference values and wing data of the aircraft in a CPACS document.
#[derive(Debug, Clone, PartialEq)]
pub struct Aircraft {
    /// Reference length in meters.
    pub ref_length: f64,
    /// Reference area in square meters.
    pub ref_area: f64,
    /// Moment reference point, x coordinate in meters.
    pub ref_point_x: f64,
    /// Moment reference point, y coordinate in meters.
    pub ref_point_y: f64,
    /// Moment reference point, z coordinate in meters.
    pub ref_point_z: f64,
    reference_wing: Option<ReferenceWingSnapshot>,
}

impl Aircraft {
    /// Aircraft with explicit reference values, the moment reference
    /// point at the origin and no reference wing.
    #[must_use]
    pub fn new(ref_length: f64, ref_area: f64) -> Self {
        Self {
            ref_length,
            ref_area,
            ref_point_x: 0.0,
            ref_point_y: 0.0,
            ref_point_z: 0.0,
            reference_wing: None,
        }
    }

    /// Reads the reference values of a CPACS document.
    ///
    /// Missing values are written back into the document with their
    /// defaults: length and area 1, point coordinates 0.
    pub fn from_document(document: &mut Document) -> Result<Self> {
        Ok(Self {
            ref_length: document.float_or_default(&format!("{REFERENCE_XPATH}/length"), 1.0)?,
            ref_area: document.float_or_default(&format!("{REFERENCE_XPATH}/area"), 1.0)?,
            ref_point_x: document.float_or_default(&format!("{REFERENCE_XPATH}/point/x"), 0.0)?,
            ref_point_y: document.float_or_default(&format!("{REFERENCE_XPATH}/point/y"), 0.0)?,
            ref_point_z: document.float_or_default(&format!("{REFERENCE_XPATH}/point/z"), 0.0)?,
            reference_wing: None,
        })
    }

    /// Like [`Aircraft::from_document`], additionally picking the main
    /// wing of the configuration as reference wing.
    pub fn with_geometry(
        document: &mut Document,
        configuration: &impl GeometryConfiguration,
    ) -> Result<Self> {
        let mut aircraft = Self::from_document(document)?;
        if configuration.wing_count() > 0 {
            let index = main_wing_index(configuration)?;
            aircraft.set_reference_wing(configuration, index)?;
        }
        Ok(aircraft)
    }

    /// The current reference wing, `None` without geometry.
    #[must_use]
    pub fn reference_wing(&self) -> Option<&ReferenceWingSnapshot> {
        self.reference_wing.as_ref()
    }

    /// Selects the reference wing by 1-based index and returns its
    /// derived values.
    pub fn set_reference_wing(
        &mut self,
        configuration: &impl GeometryConfiguration,
        index: usize,
    ) -> Result<ReferenceWingSnapshot> {
        let wing = configuration.wing(index)?;
        let snapshot = ReferenceWingSnapshot::from_wing(index, &wing);
        self.reference_wing = Some(snapshot.clone());
        Ok(snapshot)
    }

    /// Selects the reference wing by uID.
    pub fn set_reference_wing_by_uid(
        &mut self,
        configuration: &impl GeometryConfiguration,
        uid: &str,
    ) -> Result<ReferenceWingSnapshot> {
        let index = configuration.wing_index(uid)?;
        self.set_reference_wing(configuration, index)
    }
}

impl Default for Aircraft {
    /// The reference values a document without a reference branch
    /// falls back to.
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

/// The 1-based index of the wing with the largest surface area.
pub fn main_wing_index(configuration: &impl GeometryConfiguration) -> Result<usize> {
    let mut best: Option<(usize, f64)> = None;
    for index in 1..=configuration.wing_count() {
        let area = configuration.wing(index)?.surface_area;
        if best.is_none_or(|(_, largest)| area > largest) {
            best = Some((index, area));
        }
    }
    best.map(|(index, _)| index).ok_or(AeroMapError::NoWings)
}

impl fmt::Display for Aircraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Reference length: {} [m]", self.ref_length)?;
        writeln!(f, "Reference area: {} [m^2]", self.ref_area)?;
        writeln!(
            f,
            "Reference point: ({},{},{}) [m]",
            self.ref_point_x, self.ref_point_y, self.ref_point_z
        )?;
        if let Some(wing) = &self.reference_wing {
            writeln!(f, "Reference wing index: {}", wing.index)?;
            writeln!(f, "Wing span: {} [m]", wing.span)?;
            writeln!(f, "Wing area: {} [m^2]", wing.area)?;
            writeln!(f, "Wing AR: {} [-]", wing.aspect_ratio)?;
        }
        Ok(())
    }
}
