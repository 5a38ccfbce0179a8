//! Doctor registry service implementing the [`DoctorRegistry`] driving port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::info;

use crate::domain::ports::{
    DoctorDetail, DoctorRegistry, DoctorRepository, DoctorUpdate, ShiftAssignmentRepository,
};
use crate::domain::rota_service_support::{
    map_assignment_repository_error, map_doctor_repository_error,
};
use crate::domain::{DaysOff, Doctor, DoctorId, DoctorName, Error, SchedulingError};

/// Registry of doctors and their days off.
#[derive(Clone)]
pub struct DoctorRegistryService<D, A> {
    doctors: Arc<D>,
    assignments: Arc<A>,
}

impl<D, A> DoctorRegistryService<D, A> {
    pub fn new(doctors: Arc<D>, assignments: Arc<A>) -> Self {
        Self {
            doctors,
            assignments,
        }
    }
}

impl<D, A> DoctorRegistryService<D, A>
where
    D: DoctorRepository,
    A: ShiftAssignmentRepository,
{
    async fn load(&self, id: &DoctorId) -> Result<Doctor, Error> {
        self.doctors
            .find_by_id(id)
            .await
            .map_err(map_doctor_repository_error)?
            .ok_or_else(|| SchedulingError::not_found("doctor", id).into())
    }

    async fn store(&self, doctor: &Doctor) -> Result<(), Error> {
        let updated = self
            .doctors
            .update(doctor)
            .await
            .map_err(map_doctor_repository_error)?;
        if updated {
            Ok(())
        } else {
            Err(SchedulingError::not_found("doctor", doctor.id()).into())
        }
    }
}

#[async_trait]
impl<D, A> DoctorRegistry for DoctorRegistryService<D, A>
where
    D: DoctorRepository,
    A: ShiftAssignmentRepository,
{
    async fn add(&self, name: &str, days_off: Vec<NaiveDate>) -> Result<Doctor, Error> {
        let name = DoctorName::new(name)?;
        let doctor = Doctor::new(DoctorId::random(), name, days_off.into_iter().collect());
        self.doctors
            .insert(&doctor)
            .await
            .map_err(map_doctor_repository_error)?;
        info!(doctor_id = %doctor.id(), days_off = doctor.days_off().len(), "doctor added");
        Ok(doctor)
    }

    async fn list(&self) -> Result<Vec<Doctor>, Error> {
        self.doctors
            .list()
            .await
            .map_err(map_doctor_repository_error)
    }

    async fn get(&self, id: &DoctorId) -> Result<DoctorDetail, Error> {
        let doctor = self.load(id).await?;
        let assignments = self
            .assignments
            .list_by_doctor(id)
            .await
            .map_err(map_assignment_repository_error)?;
        Ok(DoctorDetail {
            doctor,
            assignments,
        })
    }

    async fn update(&self, id: &DoctorId, update: DoctorUpdate) -> Result<Doctor, Error> {
        let mut doctor = self.load(id).await?;
        if let Some(name) = update.name {
            doctor.rename(DoctorName::new(name)?);
        }
        if let Some(days_off) = update.days_off {
            doctor.set_days_off(days_off.into_iter().collect::<DaysOff>());
        }
        self.store(&doctor).await?;
        info!(doctor_id = %doctor.id(), "doctor updated");
        Ok(doctor)
    }

    async fn remove(&self, id: &DoctorId) -> Result<(), Error> {
        let removed = self
            .doctors
            .delete(id)
            .await
            .map_err(map_doctor_repository_error)?;
        if !removed {
            return Err(SchedulingError::not_found("doctor", id).into());
        }
        info!(doctor_id = %id, "doctor removed");
        Ok(())
    }

    async fn add_day_off(&self, id: &DoctorId, date: NaiveDate) -> Result<Doctor, Error> {
        let mut doctor = self.load(id).await?;
        if doctor.add_day_off(date) {
            self.store(&doctor).await?;
        }
        Ok(doctor)
    }

    async fn remove_day_off(&self, id: &DoctorId, date: NaiveDate) -> Result<Doctor, Error> {
        let mut doctor = self.load(id).await?;
        if doctor.remove_day_off(&date) {
            self.store(&doctor).await?;
        }
        Ok(doctor)
    }
}
