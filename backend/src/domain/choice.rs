//! Ranked lab choices submitted by a student.
//!
//! A submission is three lab references for priorities 1, 2 and 3. The
//! references arrive as optional strings (HTML form semantics) and are
//! validated in a fixed order: presence, then syntax, then distinctness.

use serde_json::{Value, json};

use super::lab::LabId;

/// Rank position of a choice; 1 is most preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    /// Most preferred.
    First,
    /// Second preference.
    Second,
    /// Third preference.
    Third,
}

impl Priority {
    /// All priorities in rank order.
    pub const ALL: [Self; 3] = [Self::First, Self::Second, Self::Third];

    /// Numeric rank as stored in the database.
    #[must_use]
    pub const fn rank(self) -> i16 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
        }
    }

    /// Parse a stored numeric rank.
    #[must_use]
    pub const fn from_rank(rank: i16) -> Option<Self> {
        match rank {
            1 => Some(Self::First),
            2 => Some(Self::Second),
            3 => Some(Self::Third),
            _ => None,
        }
    }

    /// Request field carrying this priority.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::First => "choice1",
            Self::Second => "choice2",
            Self::Third => "choice3",
        }
    }
}

/// Why a submission was rejected before touching storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChoiceValidationError {
    /// One or more references were absent or blank.
    #[error("all three choices are required")]
    Missing {
        /// Offending request fields.
        fields: Vec<&'static str>,
    },
    /// One or more references were not positive integers.
    #[error("choices must be lab identifiers")]
    Invalid {
        /// Offending request fields.
        fields: Vec<&'static str>,
    },
    /// The same lab appeared more than once.
    #[error("each choice must name a different lab")]
    Duplicate {
        /// Request fields that repeat an earlier choice.
        fields: Vec<&'static str>,
    },
}

impl ChoiceValidationError {
    /// Stable machine-readable code for error details.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "missing_choice",
            Self::Invalid { .. } => "invalid_choice",
            Self::Duplicate { .. } => "duplicate_choice",
        }
    }

    /// Request fields the error refers to.
    #[must_use]
    pub fn fields(&self) -> &[&'static str] {
        match self {
            Self::Missing { fields } | Self::Invalid { fields } | Self::Duplicate { fields } => {
                fields
            }
        }
    }

    /// Structured details for the error envelope.
    #[must_use]
    pub fn details(&self) -> Value {
        json!({ "code": self.code(), "fields": self.fields() })
    }
}

/// Three pairwise-distinct labs in priority order.
///
/// # Examples
/// ```
/// use labrank::domain::{LabId, Priority, RankedChoices};
///
/// let choices = RankedChoices::from_form(Some("3"), Some("1"), Some("2")).expect("valid");
/// assert_eq!(choices.lab_for(Priority::First), LabId::new(3).expect("id"));
/// assert!(RankedChoices::from_form(Some("1"), Some("1"), Some("2")).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedChoices {
    first: LabId,
    second: LabId,
    third: LabId,
}

impl RankedChoices {
    /// Build from already-parsed identifiers, enforcing distinctness.
    pub fn new(first: LabId, second: LabId, third: LabId) -> Result<Self, ChoiceValidationError> {
        let mut fields = Vec::new();
        if second == first {
            fields.push(Priority::Second.field());
        }
        if third == first || third == second {
            fields.push(Priority::Third.field());
        }
        if !fields.is_empty() {
            return Err(ChoiceValidationError::Duplicate { fields });
        }
        Ok(Self {
            first,
            second,
            third,
        })
    }

    /// Validate raw form references.
    pub fn from_form(
        choice1: Option<&str>,
        choice2: Option<&str>,
        choice3: Option<&str>,
    ) -> Result<Self, ChoiceValidationError> {
        let raw = [
            (Priority::First, choice1),
            (Priority::Second, choice2),
            (Priority::Third, choice3),
        ];

        let missing: Vec<_> = raw
            .iter()
            .filter(|(_, value)| value.is_none_or(|v| v.trim().is_empty()))
            .map(|(priority, _)| priority.field())
            .collect();
        if !missing.is_empty() {
            return Err(ChoiceValidationError::Missing { fields: missing });
        }

        let parsed: Vec<_> = raw
            .iter()
            .map(|(priority, value)| {
                (
                    *priority,
                    value.and_then(|v| v.parse::<LabId>().ok()),
                )
            })
            .collect();
        let invalid: Vec<_> = parsed
            .iter()
            .filter(|(_, id)| id.is_none())
            .map(|(priority, _)| priority.field())
            .collect();
        if !invalid.is_empty() {
            return Err(ChoiceValidationError::Invalid { fields: invalid });
        }

        match parsed.as_slice() {
            [(_, Some(first)), (_, Some(second)), (_, Some(third))] => {
                Self::new(*first, *second, *third)
            }
            _ => Err(ChoiceValidationError::Invalid {
                fields: Priority::ALL.iter().map(|p| p.field()).collect(),
            }),
        }
    }

    /// Rebuild from stored `(priority, lab)` rows.
    ///
    /// Returns `None` unless exactly one row exists per priority and the labs
    /// are distinct.
    #[must_use]
    pub fn from_rows(rows: &[(Priority, LabId)]) -> Option<Self> {
        if rows.len() != Priority::ALL.len() {
            return None;
        }
        let lab_for = |wanted: Priority| {
            rows.iter()
                .find(|(priority, _)| *priority == wanted)
                .map(|(_, lab)| *lab)
        };
        Self::new(
            lab_for(Priority::First)?,
            lab_for(Priority::Second)?,
            lab_for(Priority::Third)?,
        )
        .ok()
    }

    /// Lab ranked at `priority`.
    #[must_use]
    pub const fn lab_for(&self, priority: Priority) -> LabId {
        match priority {
            Priority::First => self.first,
            Priority::Second => self.second,
            Priority::Third => self.third,
        }
    }

    /// `(priority, lab)` pairs in rank order.
    #[must_use]
    pub fn entries(&self) -> [(Priority, LabId); 3] {
        Priority::ALL.map(|priority| (priority, self.lab_for(priority)))
    }
}
