//! Per-day staffing bounds.
//!
//! Bounds never reject a write: requested values are clamped into the valid
//! region for the current number of registered doctors.
//!
//! ```text
//! cap  = max(doctor_count, 1)
//! max' = clamp(max, 1, cap)
//! min' = clamp(min, 1, max')
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::SchedulingError;

fn staff_cap(doctor_count: usize) -> u32 {
    u32::try_from(doctor_count).unwrap_or(u32::MAX).max(1)
}

/// Minimum and maximum number of doctors on duty for one day.
///
/// # Examples
/// ```
/// use rota::domain::StaffBound;
///
/// let bound = StaffBound::clamped(1, 5, 2, 4);
/// assert_eq!((bound.min_staff(), bound.max_staff()), (2, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffBound {
    day: u32,
    min_staff: u32,
    max_staff: u32,
}

impl StaffBound {
    /// Clamp requested bounds into the valid region for `doctor_count`.
    pub fn clamped(day: u32, min_staff: u32, max_staff: u32, doctor_count: usize) -> Self {
        let max_staff = max_staff.clamp(1, staff_cap(doctor_count));
        let min_staff = min_staff.clamp(1, max_staff);
        Self {
            day,
            min_staff,
            max_staff,
        }
    }

    /// Default bound for a new schedule: one doctor minimum, everyone maximum.
    pub fn default_for(day: u32, doctor_count: usize) -> Self {
        Self::clamped(day, 1, staff_cap(doctor_count), doctor_count)
    }

    /// Re-apply the clamp after the doctor count changed.
    pub fn reclamped(self, doctor_count: usize) -> Self {
        Self::clamped(self.day, self.min_staff, self.max_staff, doctor_count)
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn min_staff(&self) -> u32 {
        self.min_staff
    }

    pub fn max_staff(&self) -> u32 {
        self.max_staff
    }
}

/// Resource bounds table for every day of one schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceBounds {
    days: BTreeMap<u32, StaffBound>,
    doctor_count: usize,
}

impl ResourceBounds {
    /// Build a table covering `days`, filling gaps with defaults.
    ///
    /// Stored entries for days outside `days` are ignored; every stored entry
    /// is re-clamped against `doctor_count`.
    pub fn from_entries(
        days: &[u32],
        stored: impl IntoIterator<Item = StaffBound>,
        doctor_count: usize,
    ) -> Self {
        let mut table: BTreeMap<u32, StaffBound> = days
            .iter()
            .map(|day| (*day, StaffBound::default_for(*day, doctor_count)))
            .collect();
        for bound in stored {
            if let Some(slot) = table.get_mut(&bound.day()) {
                *slot = bound.reclamped(doctor_count);
            }
        }
        Self {
            days: table,
            doctor_count,
        }
    }

    /// Set one day's bounds, clamping the requested values.
    ///
    /// Returns [`SchedulingError::Validation`] when `day` is not part of the
    /// month.
    pub fn set(
        &mut self,
        day: u32,
        min_staff: u32,
        max_staff: u32,
    ) -> Result<StaffBound, SchedulingError> {
        let Some(slot) = self.days.get_mut(&day) else {
            return Err(SchedulingError::validation(
                "day",
                format!("day {day} is outside the schedule's month"),
            ));
        };
        *slot = StaffBound::clamped(day, min_staff, max_staff, self.doctor_count);
        Ok(*slot)
    }

    /// Current bounds for `day`.
    pub fn get(&self, day: u32) -> Option<StaffBound> {
        self.days.get(&day).copied()
    }

    /// All bounds in day order.
    pub fn iter(&self) -> impl Iterator<Item = &StaffBound> {
        self.days.values()
    }

    pub fn to_vec(&self) -> Vec<StaffBound> {
        self.days.values().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
