//! Validated value types shared across the surgery workspace.
//!
//! - [`NonEmptyText`]: text that must contain at least one non-whitespace character.
//! - [`SurgeryStatus`]: the closed set of lifecycle states a surgery can be in.

use std::fmt;
use std::str::FromStr;

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("text cannot be blank")]
    Blank,
}

/// A string that contains at least one non-whitespace character.
///
/// Unlike a trimmed identifier, the content is kept exactly as supplied so that what a client
/// submits is what it reads back.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Wraps `input` if it is not blank.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Blank`] if `input` is empty or whitespace only.
    pub fn new(input: impl Into<String>) -> Result<Self, TextError> {
        let input = input.into();
        if input.trim().is_empty() {
            return Err(TextError::Blank);
        }
        Ok(Self(input))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(s).map_err(serde::de::Error::custom)
    }
}

/// Lifecycle state of a surgery.
///
/// New surgeries start as [`SurgeryStatus::Scheduled`]. Cancellation is a soft terminal state:
/// records are never deleted.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum SurgeryStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

impl SurgeryStatus {
    pub const ALL: [SurgeryStatus; 3] = [
        SurgeryStatus::Scheduled,
        SurgeryStatus::Completed,
        SurgeryStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SurgeryStatus::Scheduled => "scheduled",
            SurgeryStatus::Completed => "completed",
            SurgeryStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SurgeryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the known statuses.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("`{0}` is not a valid status (expected scheduled, completed or cancelled)")]
pub struct UnknownStatus(pub String);

impl FromStr for SurgeryStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SurgeryStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_owned()))
    }
}
