//! In-memory adapter implementing every rota repository port.
//!
//! Used when no database URL is configured and by integration tests. One
//! mutex guards the whole store, so each port call is atomic and the cascade
//! and uniqueness rules match the PostgreSQL constraints.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::ports::{
    DoctorRepository, DoctorRepositoryError, ResourceBoundsRepository,
    ResourceBoundsRepositoryError, ScheduleRepository, ScheduleRepositoryError,
    ShiftAssignmentRepository, ShiftAssignmentRepositoryError,
};
use crate::domain::{
    Doctor, DoctorId, Month, Schedule, ScheduleFilter, ScheduleId, ShiftAssignment, StaffBound,
};

#[derive(Debug, Default)]
struct RotaState {
    doctors: HashMap<DoctorId, Doctor>,
    schedules: HashMap<ScheduleId, Schedule>,
    bounds: HashMap<ScheduleId, BTreeMap<u32, StaffBound>>,
    assignments: HashMap<ScheduleId, Vec<ShiftAssignment>>,
}

impl RotaState {
    fn name_taken(&self, doctor: &Doctor) -> bool {
        let key = doctor.name().normalized();
        self.doctors
            .values()
            .any(|other| other.id() != doctor.id() && other.name().normalized() == key)
    }
}

/// Process-local store for doctors, schedules, bounds, and assignments.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use rota::domain::DoctorRegistryService;
/// use rota::outbound::memory::InMemoryRotaStore;
///
/// let store = Arc::new(InMemoryRotaStore::default());
/// let _registry = DoctorRegistryService::new(store.clone(), store);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryRotaStore {
    state: Mutex<RotaState>,
}

impl InMemoryRotaStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RotaState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl DoctorRepository for InMemoryRotaStore {
    async fn list(&self) -> Result<Vec<Doctor>, DoctorRepositoryError> {
        let state = self.lock();
        let mut doctors: Vec<Doctor> = state.doctors.values().cloned().collect();
        doctors.sort_by_cached_key(|doctor| (doctor.name().normalized(), doctor.id()));
        Ok(doctors)
    }

    async fn find_by_id(&self, id: &DoctorId) -> Result<Option<Doctor>, DoctorRepositoryError> {
        Ok(self.lock().doctors.get(id).cloned())
    }

    async fn insert(&self, doctor: &Doctor) -> Result<(), DoctorRepositoryError> {
        let mut state = self.lock();
        if state.name_taken(doctor) {
            return Err(DoctorRepositoryError::duplicate_name(doctor.name().to_string()));
        }
        if state.doctors.contains_key(&doctor.id()) {
            return Err(DoctorRepositoryError::query("doctor id already stored"));
        }
        state.doctors.insert(doctor.id(), doctor.clone());
        Ok(())
    }

    async fn update(&self, doctor: &Doctor) -> Result<bool, DoctorRepositoryError> {
        let mut state = self.lock();
        if !state.doctors.contains_key(&doctor.id()) {
            return Ok(false);
        }
        if state.name_taken(doctor) {
            return Err(DoctorRepositoryError::duplicate_name(doctor.name().to_string()));
        }
        state.doctors.insert(doctor.id(), doctor.clone());
        Ok(true)
    }

    async fn delete(&self, id: &DoctorId) -> Result<bool, DoctorRepositoryError> {
        let mut state = self.lock();
        if state.doctors.remove(id).is_none() {
            return Ok(false);
        }
        for assignments in state.assignments.values_mut() {
            assignments.retain(|assignment| assignment.doctor_id != *id);
        }
        Ok(true)
    }
}

#[async_trait]
impl ScheduleRepository for InMemoryRotaStore {
    async fn insert(&self, schedule: &Schedule) -> Result<(), ScheduleRepositoryError> {
        let mut state = self.lock();
        let clash = state.schedules.values().any(|existing| {
            existing.month() == schedule.month() && existing.year() == schedule.year()
        });
        if clash {
            return Err(ScheduleRepositoryError::duplicate_period(
                schedule.month().number(),
                schedule.year(),
            ));
        }
        state.schedules.insert(schedule.id(), schedule.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &ScheduleId,
    ) -> Result<Option<Schedule>, ScheduleRepositoryError> {
        Ok(self.lock().schedules.get(id).cloned())
    }

    async fn find_by_period(
        &self,
        month: Month,
        year: i32,
    ) -> Result<Option<Schedule>, ScheduleRepositoryError> {
        Ok(self
            .lock()
            .schedules
            .values()
            .find(|schedule| schedule.month() == month && schedule.year() == year)
            .cloned())
    }

    async fn list(&self, filter: ScheduleFilter) -> Result<Vec<Schedule>, ScheduleRepositoryError> {
        let state = self.lock();
        let mut schedules: Vec<Schedule> = state
            .schedules
            .values()
            .filter(|schedule| filter.matches(schedule))
            .cloned()
            .collect();
        schedules.sort_by_key(|schedule| {
            std::cmp::Reverse((schedule.year(), schedule.month().number()))
        });
        Ok(schedules)
    }

    async fn save_status(&self, schedule: &Schedule) -> Result<bool, ScheduleRepositoryError> {
        let mut state = self.lock();
        match state.schedules.get_mut(&schedule.id()) {
            Some(stored) => {
                *stored = schedule.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &ScheduleId) -> Result<bool, ScheduleRepositoryError> {
        let mut state = self.lock();
        if state.schedules.remove(id).is_none() {
            return Ok(false);
        }
        state.bounds.remove(id);
        state.assignments.remove(id);
        Ok(true)
    }
}

#[async_trait]
impl ResourceBoundsRepository for InMemoryRotaStore {
    async fn list(
        &self,
        schedule_id: &ScheduleId,
    ) -> Result<Vec<StaffBound>, ResourceBoundsRepositoryError> {
        Ok(self
            .lock()
            .bounds
            .get(schedule_id)
            .map(|days| days.values().copied().collect())
            .unwrap_or_default())
    }

    async fn upsert(
        &self,
        schedule_id: &ScheduleId,
        bounds: &[StaffBound],
    ) -> Result<(), ResourceBoundsRepositoryError> {
        let mut state = self.lock();
        if !state.schedules.contains_key(schedule_id) {
            return Err(ResourceBoundsRepositoryError::query(format!(
                "schedule {schedule_id} does not exist"
            )));
        }
        let days = state.bounds.entry(*schedule_id).or_default();
        for bound in bounds {
            days.insert(bound.day(), *bound);
        }
        Ok(())
    }
}

#[async_trait]
impl ShiftAssignmentRepository for InMemoryRotaStore {
    async fn replace_for_schedule(
        &self,
        schedule: &Schedule,
        assignments: &[ShiftAssignment],
    ) -> Result<(), ShiftAssignmentRepositoryError> {
        let schedule_id = schedule.id();
        let mut state = self.lock();
        let Some(stored_schedule) = state.schedules.get_mut(&schedule_id) else {
            return Err(ShiftAssignmentRepositoryError::query(format!(
                "schedule {schedule_id} does not exist"
            )));
        };
        *stored_schedule = schedule.clone();
        let mut stored = assignments.to_vec();
        stored.sort_by_key(|assignment| (assignment.date, assignment.doctor_id));
        state.assignments.insert(schedule_id, stored);
        Ok(())
    }

    async fn list_by_schedule(
        &self,
        schedule_id: &ScheduleId,
    ) -> Result<Vec<ShiftAssignment>, ShiftAssignmentRepositoryError> {
        Ok(self
            .lock()
            .assignments
            .get(schedule_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn find_by_doctor_and_date(
        &self,
        doctor_id: &DoctorId,
        date: NaiveDate,
    ) -> Result<Option<ShiftAssignment>, ShiftAssignmentRepositoryError> {
        Ok(self
            .lock()
            .assignments
            .values()
            .flatten()
            .find(|assignment| assignment.doctor_id == *doctor_id && assignment.date == date)
            .copied())
    }

    async fn list_by_doctor(
        &self,
        doctor_id: &DoctorId,
    ) -> Result<Vec<ShiftAssignment>, ShiftAssignmentRepositoryError> {
        let state = self.lock();
        let mut assignments: Vec<ShiftAssignment> = state
            .assignments
            .values()
            .flatten()
            .filter(|assignment| assignment.doctor_id == *doctor_id)
            .copied()
            .collect();
        assignments.sort_by_key(|assignment| assignment.date);
        Ok(assignments)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{DaysOff, DoctorName, ScheduleStatus};
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> InMemoryRotaStore {
        InMemoryRotaStore::new()
    }

    fn doctor(name: &str) -> Doctor {
        Doctor::new(
            DoctorId::random(),
            DoctorName::new(name).expect("valid name"),
            DaysOff::default(),
        )
    }

    fn schedule(month: Month, year: i32) -> Schedule {
        let now = Utc
            .with_ymd_and_hms(2026, 1, 5, 12, 0, 0)
            .single()
            .expect("valid timestamp");
        Schedule::draft(ScheduleId::random(), month, year, now)
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).expect("valid date")
    }

    #[rstest]
    #[tokio::test]
    async fn doctor_names_are_unique_ignoring_case(store: InMemoryRotaStore) {
        DoctorRepository::insert(&store, &doctor("House"))
            .await
            .expect("first insert");
        let err = DoctorRepository::insert(&store, &doctor("HOUSE"))
            .await
            .expect_err("duplicate");
        assert_eq!(err, DoctorRepositoryError::duplicate_name("HOUSE"));
    }

    #[rstest]
    #[tokio::test]
    async fn renaming_onto_another_doctor_is_refused(store: InMemoryRotaStore) {
        let house = doctor("House");
        let mut wilson = doctor("Wilson");
        DoctorRepository::insert(&store, &house).await.expect("insert");
        DoctorRepository::insert(&store, &wilson).await.expect("insert");

        wilson.rename(DoctorName::new("house").expect("valid name"));
        let err = DoctorRepository::update(&store, &wilson)
            .await
            .expect_err("clash");
        assert!(matches!(err, DoctorRepositoryError::DuplicateName { .. }));
    }

    #[rstest]
    #[case(ScheduleFilter::default(), &[(2027, 1), (2026, 3), (2026, 1)])]
    #[case(ScheduleFilter { month: Some(Month::January), year: None }, &[(2027, 1), (2026, 1)])]
    #[case(ScheduleFilter { month: None, year: Some(2026) }, &[(2026, 3), (2026, 1)])]
    #[case(ScheduleFilter { month: Some(Month::March), year: Some(2027) }, &[])]
    #[tokio::test]
    async fn schedule_history_honours_period_filters(
        store: InMemoryRotaStore,
        #[case] filter: ScheduleFilter,
        #[case] expected: &[(i32, u32)],
    ) {
        let periods = [
            (Month::January, 2026),
            (Month::January, 2027),
            (Month::March, 2026),
        ];
        for (month, year) in periods {
            ScheduleRepository::insert(&store, &schedule(month, year))
                .await
                .expect("insert");
        }
        let periods: Vec<(i32, u32)> = ScheduleRepository::list(&store, filter)
            .await
            .expect("list")
            .iter()
            .map(|schedule| (schedule.year(), schedule.month().number()))
            .collect();
        assert_eq!(periods, expected);
    }

    #[rstest]
    #[tokio::test]
    async fn doctors_list_in_name_order(store: InMemoryRotaStore) {
        for name in ["wilson", "Cuddy", "house"] {
            DoctorRepository::insert(&store, &doctor(name))
                .await
                .expect("insert");
        }
        let names: Vec<String> = DoctorRepository::list(&store)
            .await
            .expect("list")
            .iter()
            .map(|doctor| doctor.name().to_string())
            .collect();
        assert_eq!(names, ["Cuddy", "house", "wilson"]);
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_a_doctor_drops_their_assignments(store: InMemoryRotaStore) {
        let house = doctor("House");
        let wilson = doctor("Wilson");
        let march = schedule(Month::March, 2026);
        DoctorRepository::insert(&store, &house).await.expect("insert");
        DoctorRepository::insert(&store, &wilson).await.expect("insert");
        ScheduleRepository::insert(&store, &march).await.expect("insert");
        store
            .replace_for_schedule(
                &march,
                &[
                    ShiftAssignment::new(march.id(), house.id(), date(1)),
                    ShiftAssignment::new(march.id(), wilson.id(), date(1)),
                ],
            )
            .await
            .expect("replace");

        assert!(DoctorRepository::delete(&store, &house.id()).await.expect("delete"));
        let remaining = store.list_by_schedule(&march.id()).await.expect("list");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].doctor_id, wilson.id());
        assert!(!DoctorRepository::delete(&store, &house.id()).await.expect("delete"));
    }

    #[rstest]
    #[tokio::test]
    async fn one_schedule_per_period(store: InMemoryRotaStore) {
        ScheduleRepository::insert(&store, &schedule(Month::May, 2026))
            .await
            .expect("insert");
        let err = ScheduleRepository::insert(&store, &schedule(Month::May, 2026))
            .await
            .expect_err("duplicate");
        assert_eq!(err, ScheduleRepositoryError::duplicate_period(5u32, 2026));
    }

    #[rstest]
    #[tokio::test]
    async fn schedules_list_newest_period_first(store: InMemoryRotaStore) {
        let periods = [
            (Month::December, 2025),
            (Month::February, 2026),
            (Month::May, 2025),
        ];
        for (month, year) in periods {
            ScheduleRepository::insert(&store, &schedule(month, year))
                .await
                .expect("insert");
        }
        let periods: Vec<(i32, u32)> = ScheduleRepository::list(&store, ScheduleFilter::default())
            .await
            .expect("list")
            .iter()
            .map(|schedule| (schedule.year(), schedule.month().number()))
            .collect();
        assert_eq!(periods, [(2026, 2), (2025, 12), (2025, 5)]);
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_a_schedule_cascades(store: InMemoryRotaStore) {
        let house = doctor("House");
        let march = schedule(Month::March, 2026);
        DoctorRepository::insert(&store, &house).await.expect("insert");
        ScheduleRepository::insert(&store, &march).await.expect("insert");
        store
            .upsert(&march.id(), &[StaffBound::clamped(1, 1, 1, 1)])
            .await
            .expect("upsert");
        store
            .replace_for_schedule(
                &march,
                &[ShiftAssignment::new(march.id(), house.id(), date(1))],
            )
            .await
            .expect("replace");

        assert!(ScheduleRepository::delete(&store, &march.id()).await.expect("delete"));
        assert!(ResourceBoundsRepository::list(&store, &march.id())
            .await
            .expect("bounds")
            .is_empty());
        assert!(store
            .find_by_doctor_and_date(&house.id(), date(1))
            .await
            .expect("lookup")
            .is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn upsert_overwrites_only_the_given_days(store: InMemoryRotaStore) {
        let march = schedule(Month::March, 2026);
        ScheduleRepository::insert(&store, &march).await.expect("insert");
        store
            .upsert(
                &march.id(),
                &[StaffBound::clamped(1, 1, 2, 3), StaffBound::clamped(2, 2, 3, 3)],
            )
            .await
            .expect("upsert");
        store
            .upsert(&march.id(), &[StaffBound::clamped(2, 1, 1, 3)])
            .await
            .expect("upsert");

        let stored = ResourceBoundsRepository::list(&store, &march.id())
            .await
            .expect("bounds");
        assert_eq!(
            stored,
            [StaffBound::clamped(1, 1, 2, 3), StaffBound::clamped(2, 1, 1, 3)]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn replacing_assignments_leaves_no_stale_rows(store: InMemoryRotaStore) {
        let house = doctor("House");
        let march = schedule(Month::March, 2026);
        DoctorRepository::insert(&store, &house).await.expect("insert");
        ScheduleRepository::insert(&store, &march).await.expect("insert");
        let first = [
            ShiftAssignment::new(march.id(), house.id(), date(1)),
            ShiftAssignment::new(march.id(), house.id(), date(2)),
        ];
        let second = [ShiftAssignment::new(march.id(), house.id(), date(3))];

        store
            .replace_for_schedule(&march, &first)
            .await
            .expect("first");
        store
            .replace_for_schedule(&march, &second)
            .await
            .expect("second");

        assert_eq!(
            store.list_by_schedule(&march.id()).await.expect("list"),
            second
        );
        assert_eq!(store.list_by_doctor(&house.id()).await.expect("list"), second);
    }

    #[rstest]
    #[tokio::test]
    async fn replacing_assignments_stores_the_schedule_status(store: InMemoryRotaStore) {
        let mut march = schedule(Month::March, 2026);
        ScheduleRepository::insert(&store, &march).await.expect("insert");
        let later = march.updated_at() + chrono::Duration::minutes(5);
        march.transition(ScheduleStatus::Generated, later);

        store.replace_for_schedule(&march, &[]).await.expect("replace");

        let stored = ScheduleRepository::find_by_id(&store, &march.id())
            .await
            .expect("lookup")
            .expect("schedule stored");
        assert_eq!(stored.status(), ScheduleStatus::Generated);
        assert_eq!(stored.updated_at(), later);
    }

    #[rstest]
    #[tokio::test]
    async fn writes_for_unknown_schedules_fail(store: InMemoryRotaStore) {
        let err = store
            .replace_for_schedule(&schedule(Month::April, 2026), &[])
            .await
            .expect_err("missing schedule");
        assert!(matches!(err, ShiftAssignmentRepositoryError::Query { .. }));
    }
}
