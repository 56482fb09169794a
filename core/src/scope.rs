//! Scope identification for queue partitions.
//!
//! A [`Scope`] names the partition within which queue numbers and ordering are
//! independent: one office on one calendar day. Tickets booked under
//! `registrar/2024-05-01` never share numbering or positions with tickets
//! booked under any other scope.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for [`Scope`] parsing.
///
/// A malformed scope key is fatal to the request that carried it, never to the
/// process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid scope: {0}")]
pub struct ParseScopeError(String);

impl ParseScopeError {
    pub(crate) fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// The partition key for queue numbering and ordering: office + date.
///
/// # Canonical form
///
/// Scopes render and parse as `office/YYYY-MM-DD`:
///
/// - `"registrar/2024-05-01"`
/// - `"cashier/2025-01-15"`
///
/// # Validation
///
/// - `FromStr::from_str()`: validates input (non-empty office with no `/`,
///   ISO-8601 date). Use this for external/user input.
/// - [`Scope::new`]: no string parsing, for application-controlled data.
///
/// # Examples
///
/// ```
/// use deskline_core::scope::Scope;
/// use chrono::NaiveDate;
///
/// let scope: Scope = "registrar/2024-05-01".parse().unwrap();
/// assert_eq!(scope.office(), "registrar");
/// assert_eq!(scope.date(), NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
/// assert_eq!(scope.to_string(), "registrar/2024-05-01");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    office: String,
    date: NaiveDate,
}

impl Scope {
    /// Create a new `Scope` from an office name and a date.
    #[must_use]
    pub fn new(office: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            office: office.into(),
            date,
        }
    }

    /// The office component of this scope.
    #[must_use]
    pub fn office(&self) -> &str {
        &self.office
    }

    /// The calendar date component of this scope.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.office, self.date.format("%Y-%m-%d"))
    }
}

impl FromStr for Scope {
    type Err = ParseScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((office, date)) = s.rsplit_once('/') else {
            return Err(ParseScopeError::new(format!(
                "expected 'office/YYYY-MM-DD', got '{s}'"
            )));
        };

        if office.is_empty() {
            return Err(ParseScopeError::new("office must not be empty"));
        }
        if office.contains('/') {
            return Err(ParseScopeError::new(format!(
                "office must not contain '/': '{office}'"
            )));
        }

        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| ParseScopeError::new(format!("invalid date '{date}': {e}")))?;

        Ok(Self {
            office: office.to_string(),
            date,
        })
    }
}
