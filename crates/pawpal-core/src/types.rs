//! Core type definitions with validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// A task must take at least one minute.
    #[error("duration must be greater than 0 minutes")]
    ZeroDuration,

    /// A pet's age was negative.
    #[error("age cannot be negative, got {value}")]
    NegativeAge { value: i64 },

    /// A pet's age does not fit the stored range.
    #[error("age is out of range, got {value}")]
    AgeOutOfRange { value: i64 },

    /// Due time plus duration runs past the last representable instant.
    #[error("task ends past the supported date range")]
    EndOutOfRange,

    /// Every id of this kind has been handed out.
    #[error("no {kind} ids left to assign")]
    IdsExhausted { kind: &'static str },

    /// Priority text did not match any known spelling.
    #[error("unknown priority: {value}")]
    UnknownPriority { value: String },

    /// Frequency text did not match any known spelling.
    #[error("unknown frequency: {value}")]
    UnknownFrequency { value: String },

    /// Two tasks share an id.
    #[error("duplicate task id: {id}")]
    DuplicateTaskId { id: TaskId },

    /// Two pets share an id.
    #[error("duplicate pet id: {id}")]
    DuplicatePetId { id: PetId },

    /// A task is stored under a pet it does not reference.
    #[error("task {task} references pet {expected} but is held by pet {actual}")]
    PetMismatch {
        task: TaskId,
        expected: PetId,
        actual: PetId,
    },
}

/// Generates a numeric ID newtype with common trait implementations.
macro_rules! define_numeric_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wraps a raw id value.
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Returns the raw id value.
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

define_numeric_id!(
    /// Identifier of a task.
    ///
    /// Assigned monotonically by the owner and never reused, so it is unique
    /// across every pet.
    TaskId
);

define_numeric_id!(
    /// Identifier of a pet.
    PetId
);

/// How urgent a task is.
///
/// Variants are declared in rank order, so the derived `Ord` puts `High` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Every accepted spelling, matched case-insensitively.
const PRIORITY_NAMES: &[(&str, Priority)] = &[
    ("high", Priority::High),
    ("medium", Priority::Medium),
    ("med", Priority::Medium),
    ("low", Priority::Low),
];

impl Priority {
    /// Canonical string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }

    /// Sort rank; lower sorts first.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        PRIORITY_NAMES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(needle))
            .map(|(_, priority)| *priority)
            .ok_or_else(|| ValidationError::UnknownPriority {
                value: s.to_string(),
            })
    }
}

impl Serialize for Priority {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// How often a task repeats once completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Frequency {
    #[default]
    OneTime,
    Daily,
    Weekly,
    Monthly,
}

const FREQUENCY_NAMES: &[(&str, Frequency)] = &[
    ("one_time", Frequency::OneTime),
    ("one-time", Frequency::OneTime),
    ("onetime", Frequency::OneTime),
    ("once", Frequency::OneTime),
    ("daily", Frequency::Daily),
    ("weekly", Frequency::Weekly),
    ("monthly", Frequency::Monthly),
];

impl Frequency {
    /// String representation for storage and display.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OneTime => "one_time",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Whether completing a task with this frequency produces a successor.
    #[must_use]
    pub const fn is_recurring(self) -> bool {
        !matches!(self, Self::OneTime)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        FREQUENCY_NAMES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(needle))
            .map(|(_, frequency)| *frequency)
            .ok_or_else(|| ValidationError::UnknownFrequency {
                value: s.to_string(),
            })
    }
}

impl Serialize for Frequency {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Frequency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Returns the trimmed value, or an error naming `field` if nothing is left.
pub(crate) fn require_non_empty(
    value: impl Into<String>,
    field: &'static str,
) -> Result<String, ValidationError> {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(trimmed.to_string())
}
