//! Roster generation: matching doctors to calendar days.
//!
//! [`ScheduleGenerator::generate`] is a pure, blocking computation. Every
//! roster it returns satisfies:
//!
//! - each day is staffed within its `[min_staff, max_staff]` bounds (days are
//!   staffed at exactly `min_staff`),
//! - no doctor works on one of their days off,
//! - no doctor works twice on the same date.
//!
//! Among valid rosters it prefers the one with the smallest maximum
//! per-doctor load, then evens out the lightest loads and avoids
//! back-to-back shifts. The search honours a time budget and reports
//! [`GenerationError::Timeout`] once it is spent.

mod solver;

use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::debug;

use super::calendar::{Month, date_of, days_of};
use super::{Doctor, ResourceBounds, ScheduleId, SchedulingError, ShiftAssignment};
use solver::{DayDemand, Deadline, SolveError};

/// Default time budget for one generation run.
pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_secs(5);

/// Why a roster could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// These days have fewer available doctors than their minimum.
    #[error("not enough doctors available on days {days:?}")]
    InfeasibleConstraints { days: Vec<u32> },
    /// The time budget ran out.
    #[error("roster search timed out")]
    Timeout,
    /// The period cannot be represented as calendar dates.
    #[error("year {year} is out of range")]
    InvalidPeriod { year: i32 },
}

impl From<GenerationError> for SchedulingError {
    fn from(value: GenerationError) -> Self {
        match value {
            GenerationError::InfeasibleConstraints { days } => {
                SchedulingError::InfeasibleConstraints { days }
            }
            GenerationError::Timeout => SchedulingError::GenerationTimeout,
            GenerationError::InvalidPeriod { year } => {
                SchedulingError::validation("year", format!("{year} is out of range"))
            }
        }
    }
}

/// Tuning knobs for the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Wall-clock budget for one run.
    pub time_budget: Duration,
    /// Fixed RNG seed; `None` draws a fresh seed per run.
    pub seed: Option<u64>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            time_budget: DEFAULT_TIME_BUDGET,
            seed: None,
        }
    }
}

/// Everything one generation run consumes.
#[derive(Debug, Clone)]
pub struct GenerationInput {
    pub schedule_id: ScheduleId,
    pub month: Month,
    pub year: i32,
    pub doctors: Vec<Doctor>,
    pub bounds: ResourceBounds,
}

/// Constraint solver producing shift assignments.
///
/// # Examples
/// ```
/// use rota::domain::{
///     DaysOff, Doctor, DoctorId, DoctorName, GenerationInput, GeneratorOptions, Month,
///     ResourceBounds, ScheduleGenerator, ScheduleId, days_of,
/// };
///
/// let doctors: Vec<Doctor> = ["Ross", "Green"]
///     .into_iter()
///     .map(|name| {
///         let name = DoctorName::new(name).unwrap();
///         Doctor::new(DoctorId::random(), name, DaysOff::default())
///     })
///     .collect();
/// let days = days_of(Month::February, 2024);
/// let input = GenerationInput {
///     schedule_id: ScheduleId::random(),
///     month: Month::February,
///     year: 2024,
///     bounds: ResourceBounds::from_entries(&days, [], doctors.len()),
///     doctors,
/// };
/// let roster = ScheduleGenerator::new(GeneratorOptions::default())
///     .generate(&input)
///     .unwrap();
/// assert_eq!(roster.len(), 29);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduleGenerator {
    options: GeneratorOptions,
}

impl ScheduleGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> GeneratorOptions {
        self.options
    }

    /// Produce a roster for `input`, or explain why none exists.
    pub fn generate(
        &self,
        input: &GenerationInput,
    ) -> Result<Vec<ShiftAssignment>, GenerationError> {
        let deadline = Deadline::at(Instant::now() + self.options.time_budget);
        let days = days_of(input.month, input.year);
        let dates = days
            .iter()
            .map(|day| date_of(input.month, input.year, *day))
            .collect::<Option<Vec<_>>>()
            .ok_or(GenerationError::InvalidPeriod { year: input.year })?;
        let bounds =
            ResourceBounds::from_entries(&days, input.bounds.to_vec(), input.doctors.len());

        let mut demands = Vec::with_capacity(days.len());
        let mut infeasible = Vec::new();
        for (day, date) in days.iter().zip(&dates) {
            let available: Vec<usize> = input
                .doctors
                .iter()
                .enumerate()
                .filter(|(_, doctor)| doctor.is_available_on(date))
                .map(|(index, _)| index)
                .collect();
            let required = bounds
                .get(*day)
                .map_or(1, |bound| bound.min_staff() as usize);
            if available.len() < required {
                infeasible.push(*day);
            }
            demands.push(DayDemand {
                available,
                required,
            });
        }
        if !infeasible.is_empty() {
            return Err(GenerationError::InfeasibleConstraints { days: infeasible });
        }

        let mut rng = match self.options.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let roster = solver::solve(input.doctors.len(), &demands, &mut rng, &deadline).map_err(
            |error| match error {
                SolveError::Expired => GenerationError::Timeout,
                SolveError::Unstaffable => GenerationError::InfeasibleConstraints {
                    days: days.clone(),
                },
            },
        )?;

        debug!(
            schedule_id = %input.schedule_id,
            doctors = input.doctors.len(),
            max_load = roster.loads().iter().max().copied().unwrap_or_default(),
            "roster solved"
        );

        let mut assignments = Vec::new();
        for (day_index, date) in dates.iter().enumerate() {
            for (doctor_index, doctor) in input.doctors.iter().enumerate() {
                if roster.is_assigned(doctor_index, day_index) {
                    assignments.push(ShiftAssignment::new(
                        input.schedule_id,
                        doctor.id(),
                        *date,
                    ));
                }
            }
        }
        Ok(assignments)
    }
}
