//! A CPACS document and the aeromaps stored in it.

use std::fmt;
use std::path::{Path, PathBuf};

use cpacs_document::{Document, UID_ATTRIBUTE};
use tracing::info;

use crate::aeromap::AeroMap;
use crate::aircraft::{Aircraft, GeometryConfiguration};
use crate::error::{AeroMapError, Result};
use crate::paths::{AEROPERFORMANCE_XPATH, AIRCRAFT_NAME_XPATH};

/// An open CPACS file with its aircraft data and aeromaps.
///
/// All aeromaps present in the document are loaded up front and edited
/// in memory. Changes reach the document through
/// [`Cpacs::save_aeromap`] and the filesystem through
/// [`Cpacs::save_cpacs`].
#[derive(Debug)]
pub struct Cpacs {
    document: Document,
    path: PathBuf,
    aircraft_name: Option<String>,
    /// Reference values and wing data of the aircraft.
    pub aircraft: Aircraft,
    aeromaps: Vec<AeroMap>,
}

impl Cpacs {
    /// Opens a CPACS file without wing geometry.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut document = Document::open(&path)?;
        let aircraft = Aircraft::from_document(&mut document)?;
        Self::assemble(document, path, aircraft)
    }

    /// Opens a CPACS file and picks the configuration's main wing as
    /// reference wing.
    pub fn open_with_geometry(
        path: impl AsRef<Path>,
        configuration: &impl GeometryConfiguration,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut document = Document::open(&path)?;
        let aircraft = Aircraft::with_geometry(&mut document, configuration)?;
        Self::assemble(document, path, aircraft)
    }

    fn assemble(document: Document, path: PathBuf, aircraft: Aircraft) -> Result<Self> {
        let aircraft_name = if document.element_exists(AIRCRAFT_NAME_XPATH) {
            Some(document.get_text(AIRCRAFT_NAME_XPATH)?.to_string())
        } else {
            None
        };
        let mut cpacs = Self {
            document,
            path,
            aircraft_name,
            aircraft,
            aeromaps: Vec::new(),
        };
        cpacs.load_all_aeromaps()?;
        Ok(cpacs)
    }

    fn load_all_aeromaps(&mut self) -> Result<()> {
        self.aeromaps.clear();
        let uids = self.aeromap_uids()?;
        if uids.is_empty() {
            info!("no aeroMap found in {:?}", self.path);
        }
        for uid in uids {
            self.aeromaps.push(AeroMap::from_document(&self.document, &uid)?);
        }
        Ok(())
    }

    /// The uIDs of the aeromaps stored in the document, in document
    /// order.
    pub fn aeromap_uids(&self) -> Result<Vec<String>> {
        if !self.document.element_exists(AEROPERFORMANCE_XPATH) {
            return Ok(Vec::new());
        }
        let count = self
            .document
            .count_named_children(AEROPERFORMANCE_XPATH, "aeroMap")?;
        (1..=count)
            .map(|i| {
                let xpath = format!("{AEROPERFORMANCE_XPATH}/aeroMap[{i}]");
                Ok(self.document.attribute(&xpath, UID_ATTRIBUTE)?.to_string())
            })
            .collect()
    }

    /// All loaded aeromaps.
    #[must_use]
    pub fn aeromaps(&self) -> &[AeroMap] {
        &self.aeromaps
    }

    /// The aeromap with the given uID.
    pub fn aeromap_by_uid(&self, uid: &str) -> Result<&AeroMap> {
        self.aeromaps
            .iter()
            .find(|aeromap| aeromap.uid() == uid)
            .ok_or_else(|| AeroMapError::UnknownUid {
                uid: uid.to_string(),
            })
    }

    /// Mutable access to the aeromap with the given uID.
    pub fn aeromap_by_uid_mut(&mut self, uid: &str) -> Result<&mut AeroMap> {
        self.aeromaps
            .iter_mut()
            .find(|aeromap| aeromap.uid() == uid)
            .ok_or_else(|| AeroMapError::UnknownUid {
                uid: uid.to_string(),
            })
    }

    /// Creates an empty aeromap under a fresh uID.
    ///
    /// The uID must be non-empty, free of whitespace and not taken by
    /// any loaded or stored aeromap.
    pub fn create_aeromap(&mut self, uid: &str) -> Result<&mut AeroMap> {
        let aeromap = AeroMap::new(uid)?;
        if self.aeromaps.iter().any(|existing| existing.uid() == uid) {
            return Err(AeroMapError::DuplicateUid {
                uid: uid.to_string(),
            });
        }
        self.aeromaps.push(aeromap);
        let index = self.aeromaps.len() - 1;
        Ok(&mut self.aeromaps[index])
    }

    /// Creates an aeromap from a CSV file.
    ///
    /// Without an explicit uID the file stem is used. The file decides
    /// which columns the new aeromap carries.
    pub fn create_aeromap_from_csv(
        &mut self,
        csv_path: impl AsRef<Path>,
        uid: Option<&str>,
    ) -> Result<&mut AeroMap> {
        let csv_path = csv_path.as_ref();
        let stem = csv_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let uid = uid.unwrap_or(&stem);

        if !csv_path.exists() {
            return Err(AeroMapError::MissingCsvFile {
                path: csv_path.to_path_buf(),
            });
        }
        let file = std::fs::File::open(csv_path)?;
        let table = crate::csv::read_table(file)?;

        let aeromap = self.create_aeromap(uid)?;
        *aeromap.table_mut() = table;
        Ok(aeromap)
    }

    /// Copies an aeromap under a new uID.
    ///
    /// The copy carries the table and the base description with a note
    /// appended, and starts out unsaved.
    pub fn duplicate_aeromap(
        &mut self,
        uid_base: &str,
        uid_duplicate: &str,
    ) -> Result<&mut AeroMap> {
        if self.aeromaps.iter().any(|existing| existing.uid() == uid_duplicate) {
            return Err(AeroMapError::DuplicateUid {
                uid: uid_duplicate.to_string(),
            });
        }
        let duplicate = self.aeromap_by_uid(uid_base)?.duplicate_as(uid_duplicate)?;
        self.aeromaps.push(duplicate);
        let index = self.aeromaps.len() - 1;
        Ok(&mut self.aeromaps[index])
    }

    /// Removes an aeromap from the collection and, when it was saved,
    /// from the document.
    pub fn delete_aeromap(&mut self, uid: &str) -> Result<()> {
        let index = self
            .aeromaps
            .iter()
            .position(|aeromap| aeromap.uid() == uid)
            .ok_or_else(|| AeroMapError::UnknownUid {
                uid: uid.to_string(),
            })?;
        let aeromap = self.aeromaps.remove(index);
        if aeromap.xpath().is_some() {
            let element_xpath = self.document.uid_xpath(uid)?;
            self.document.remove_element(&element_xpath)?;
            // Sibling indices may have shifted
            for survivor in &mut self.aeromaps {
                if survivor.xpath().is_some() {
                    let xpath = self.document.uid_xpath(survivor.uid())?;
                    survivor.set_xpath(Some(format!("{xpath}/aeroPerformanceMap")));
                }
            }
        }
        Ok(())
    }

    /// Writes one aeromap into the document, see [`AeroMap::save`].
    pub fn save_aeromap(&mut self, uid: &str) -> Result<()> {
        let aeromap = self
            .aeromaps
            .iter_mut()
            .find(|aeromap| aeromap.uid() == uid)
            .ok_or_else(|| AeroMapError::UnknownUid {
                uid: uid.to_string(),
            })?;
        aeromap.save(&mut self.document)
    }

    /// Writes every loaded aeromap into the document.
    pub fn save_all_aeromaps(&mut self) -> Result<()> {
        for aeromap in &mut self.aeromaps {
            aeromap.save(&mut self.document)?;
        }
        Ok(())
    }

    /// Saves the document to an `.xml` file and returns the path
    /// actually written.
    ///
    /// When the target exists and `overwrite` is false, the first free
    /// `name_{i}.xml` sibling is used instead.
    pub fn save_cpacs(&self, path: impl AsRef<Path>, overwrite: bool) -> Result<PathBuf> {
        let path = path.as_ref();
        if !path.extension().is_some_and(|ext| ext == "xml") {
            return Err(AeroMapError::NotAnXmlPath {
                path: path.to_path_buf(),
            });
        }
        let target = if path.exists() && !overwrite {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let mut i = 1;
            loop {
                let candidate = path.with_file_name(format!("{stem}_{i}.xml"));
                if !candidate.exists() {
                    break candidate;
                }
                i += 1;
            }
        } else {
            path.to_path_buf()
        };
        self.document.save(&target)?;
        Ok(target)
    }

    /// The underlying document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The path the document was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The aircraft name from the CPACS header, when present.
    #[must_use]
    pub fn aircraft_name(&self) -> Option<&str> {
        self.aircraft_name.as_deref()
    }
}

impl fmt::Display for Cpacs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Aircraft name: {}",
            self.aircraft_name.as_deref().unwrap_or("unknown")
        )?;
        writeln!(f, "CPACS file path: {}", self.path.display())?;
        writeln!(f, "List of AeroMaps:")?;
        for aeromap in &self.aeromaps {
            writeln!(f, "  {}", aeromap.uid())?;
        }
        Ok(())
    }
}
