//! Laboratory catalogue entries.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Validation errors for lab values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LabValidationError {
    /// The identifier was zero, negative or not a number.
    #[error("lab id must be a positive integer")]
    InvalidId,
    /// The name was blank.
    #[error("lab name must not be empty")]
    EmptyName,
    /// The capacity was zero or negative.
    #[error("lab capacity must be positive")]
    InvalidCapacity,
}

/// Positive integer identifying a lab.
///
/// # Examples
/// ```
/// use labrank::domain::LabId;
///
/// let id: LabId = " 7 ".parse().expect("positive id");
/// assert_eq!(id.get(), 7);
/// assert!("0".parse::<LabId>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct LabId(i32);

impl LabId {
    /// Validate and wrap a storage identifier.
    pub fn new(id: i32) -> Result<Self, LabValidationError> {
        if id > 0 {
            Ok(Self(id))
        } else {
            Err(LabValidationError::InvalidId)
        }
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for LabId {
    type Error = LabValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LabId> for i32 {
    fn from(value: LabId) -> Self {
        value.0
    }
}

impl FromStr for LabId {
    type Err = LabValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<i32>()
            .map_err(|_| LabValidationError::InvalidId)?;
        Self::new(value)
    }
}

impl fmt::Display for LabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A laboratory students can rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lab {
    id: LabId,
    name: String,
    staff: Option<String>,
    capacity: Option<NonZeroU32>,
}

impl Lab {
    /// Construct a lab, validating its name.
    pub fn new(
        id: LabId,
        name: impl Into<String>,
        staff: Option<String>,
        capacity: Option<NonZeroU32>,
    ) -> Result<Self, LabValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(LabValidationError::EmptyName);
        }
        Ok(Self {
            id,
            name,
            staff,
            capacity,
        })
    }

    /// Lab identifier.
    #[must_use]
    pub fn id(&self) -> LabId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Supervising staff.
    #[must_use]
    pub fn staff(&self) -> Option<&str> {
        self.staff.as_deref()
    }

    /// Advertised capacity; `None` means unconstrained.
    #[must_use]
    pub fn capacity(&self) -> Option<NonZeroU32> {
        self.capacity
    }
}

/// A lab waiting to be inserted by catalogue bootstrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLab {
    /// Display name.
    pub name: String,
    /// Supervising staff.
    pub staff: Option<String>,
    /// Advertised capacity.
    pub capacity: Option<NonZeroU32>,
}

impl From<&lab_catalogue::LabSeed> for NewLab {
    fn from(seed: &lab_catalogue::LabSeed) -> Self {
        Self {
            name: seed.name().to_owned(),
            staff: seed.staff().map(str::to_owned),
            capacity: seed.capacity().and_then(NonZeroU32::new),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", Some(1))]
    #[case(" 24 ", Some(24))]
    #[case("0", None)]
    #[case("-4", None)]
    #[case("abc", None)]
    #[case("", None)]
    #[case("99999999999", None)]
    fn parses_positive_ids(#[case] raw: &str, #[case] expected: Option<i32>) {
        assert_eq!(raw.parse::<LabId>().ok().map(LabId::get), expected);
    }

    #[rstest]
    fn rejects_blank_names() {
        let id = LabId::new(1).expect("positive");
        assert_eq!(
            Lab::new(id, "  ", None, None),
            Err(LabValidationError::EmptyName)
        );
    }

    #[rstest]
    fn converts_catalogue_seeds() {
        let doc = lab_catalogue::CatalogueDocument::from_json(
            r#"{"version":1,"labs":[{"name":"Frog Lab","staff":"K. Ito","capacity":4}]}"#,
        )
        .expect("valid catalogue");
        let new_lab = NewLab::from(&doc.labs()[0]);
        assert_eq!(new_lab.name, "Frog Lab");
        assert_eq!(new_lab.staff.as_deref(), Some("K. Ito"));
        assert_eq!(new_lab.capacity.map(NonZeroU32::get), Some(4));
    }
}
