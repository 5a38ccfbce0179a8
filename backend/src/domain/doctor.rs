//! Doctor registry entities.
//!
//! ## Invariants
//! - A [`DoctorName`] is trimmed, non-empty, and at most
//!   [`DOCTOR_NAME_MAX_CHARS`] characters; longer input is truncated.
//! - [`DaysOff`] is an ordered set, so re-adding a date is a no-op.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::SchedulingError;
use super::identifiers::define_uuid_id;

/// Maximum number of characters kept from a doctor's name.
pub const DOCTOR_NAME_MAX_CHARS: usize = 20;

define_uuid_id! {
    /// Server-assigned doctor identifier.
    DoctorId
}

/// Display name of a doctor.
///
/// # Examples
/// ```
/// use rota::domain::DoctorName;
///
/// let name = DoctorName::new("  Dr. Bartholomew Fitzgerald  ").unwrap();
/// assert_eq!(name.as_ref(), "Dr. Bartholomew Fitz");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DoctorName(String);

impl DoctorName {
    /// Trim, validate, and truncate a raw name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, SchedulingError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(SchedulingError::validation("name", "must not be empty"));
        }
        let truncated: String = trimmed.chars().take(DOCTOR_NAME_MAX_CHARS).collect();
        Ok(Self(truncated.trim_end().to_owned()))
    }

    /// Case-insensitive key used for the uniqueness rule.
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }
}

impl AsRef<str> for DoctorName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DoctorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DoctorName {
    type Error = SchedulingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DoctorName> for String {
    fn from(value: DoctorName) -> Self {
        value.0
    }
}

/// Ordered set of dates a doctor cannot work.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DaysOff(BTreeSet<NaiveDate>);

impl DaysOff {
    /// Add a date, returning `false` when it was already present.
    pub fn insert(&mut self, date: NaiveDate) -> bool {
        self.0.insert(date)
    }

    /// Remove a date, returning `false` when it was absent.
    pub fn remove(&mut self, date: &NaiveDate) -> bool {
        self.0.remove(date)
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.0.contains(date)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate dates in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &NaiveDate> {
        self.0.iter()
    }
}

impl FromIterator<NaiveDate> for DaysOff {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A registered doctor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    id: DoctorId,
    name: DoctorName,
    days_off: DaysOff,
}

impl Doctor {
    pub fn new(id: DoctorId, name: DoctorName, days_off: DaysOff) -> Self {
        Self { id, name, days_off }
    }

    pub fn id(&self) -> DoctorId {
        self.id
    }

    pub fn name(&self) -> &DoctorName {
        &self.name
    }

    pub fn days_off(&self) -> &DaysOff {
        &self.days_off
    }

    /// Whether the doctor may be rostered on `date`.
    pub fn is_available_on(&self, date: &NaiveDate) -> bool {
        !self.days_off.contains(date)
    }

    pub fn rename(&mut self, name: DoctorName) {
        self.name = name;
    }

    /// Replace the whole days-off set.
    pub fn set_days_off(&mut self, days_off: DaysOff) {
        self.days_off = days_off;
    }

    pub fn add_day_off(&mut self, date: NaiveDate) -> bool {
        self.days_off.insert(date)
    }

    pub fn remove_day_off(&mut self, date: &NaiveDate) -> bool {
        self.days_off.remove(date)
    }
}
