//! Catalogue document types and JSON parsing.

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::CatalogueError;

/// Current supported catalogue version.
const SUPPORTED_VERSION: u32 = 1;

/// Catalogue shipped with the crate, used when no file is configured.
pub const BUNDLED_CATALOGUE: &str = include_str!("../fixtures/labs.json");

/// A validated laboratory catalogue.
///
/// Lab names are trimmed, non-empty and unique. Capacities, when present,
/// are positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueDocument {
    version: u32,
    labs: Vec<LabSeed>,
}

impl CatalogueDocument {
    /// Parses a catalogue from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError`] if:
    /// - The JSON is malformed or misses required fields
    /// - The version is unsupported
    /// - The labs array is empty
    /// - A name is blank or repeated
    /// - A capacity is zero or negative
    pub fn from_json(json: &str) -> Result<Self, CatalogueError> {
        let raw: RawCatalogue =
            serde_json::from_str(json).map_err(|e| CatalogueError::ParseError {
                message: e.to_string(),
            })?;

        Self::from_raw(raw)
    }

    /// Returns the catalogue bundled with this crate.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError`] only if the bundled fixture is corrupt.
    pub fn bundled() -> Result<Self, CatalogueError> {
        Self::from_json(BUNDLED_CATALOGUE)
    }

    fn from_raw(raw: RawCatalogue) -> Result<Self, CatalogueError> {
        if raw.version != SUPPORTED_VERSION {
            return Err(CatalogueError::UnsupportedVersion {
                expected: SUPPORTED_VERSION,
                actual: raw.version,
            });
        }

        if raw.labs.is_empty() {
            return Err(CatalogueError::EmptyCatalogue);
        }

        let mut seen = HashSet::with_capacity(raw.labs.len());
        let labs = raw
            .labs
            .into_iter()
            .enumerate()
            .map(|(index, lab)| {
                let seed = LabSeed::from_raw(index, lab)?;
                if !seen.insert(seed.name.clone()) {
                    return Err(CatalogueError::DuplicateName { name: seed.name });
                }
                Ok(seed)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            version: raw.version,
            labs,
        })
    }

    /// Returns the catalogue version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns the labs in document order.
    #[must_use]
    pub fn labs(&self) -> &[LabSeed] {
        &self.labs
    }

    /// Consumes the document, yielding its labs.
    #[must_use]
    pub fn into_labs(self) -> Vec<LabSeed> {
        self.labs
    }
}

/// A single lab entry ready to be inserted into storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabSeed {
    name: String,
    staff: Option<String>,
    capacity: Option<u32>,
}

impl LabSeed {
    fn from_raw(index: usize, raw: RawLab) -> Result<Self, CatalogueError> {
        let name = raw.name.trim();
        if name.is_empty() {
            return Err(CatalogueError::BlankName { index });
        }
        let name = name.to_owned();

        let capacity = match raw.capacity {
            None => None,
            Some(value) => match u32::try_from(value) {
                Ok(positive) if positive > 0 => Some(positive),
                _ => {
                    return Err(CatalogueError::NonPositiveCapacity {
                        name,
                        capacity: value,
                    });
                }
            },
        };

        let staff = raw
            .staff
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty());

        Ok(Self {
            name,
            staff,
            capacity,
        })
    }

    /// Returns the lab's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the supervising staff, if listed.
    #[must_use]
    pub fn staff(&self) -> Option<&str> {
        self.staff.as_deref()
    }

    /// Returns the advertised capacity, if listed.
    #[must_use]
    pub const fn capacity(&self) -> Option<u32> {
        self.capacity
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawCatalogue {
    version: u32,
    labs: Vec<RawLab>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawLab {
    name: String,
    #[serde(default)]
    staff: Option<String>,
    #[serde(default)]
    capacity: Option<i64>,
}
