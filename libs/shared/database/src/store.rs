use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use shared_models::{Appointment, Doctor, NewAppointment, NewDoctor, NewPatient, Patient};

use crate::error::StoreError;

/// Persistence boundary for patients, doctors and appointments.
///
/// Implementations generate ids and creation timestamps on insert. Time
/// windows are half-open: `start` inclusive, `end` exclusive.
#[cfg_attr(feature = "mocks", mockall::automock)]
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn get_patient(&self, id: Uuid) -> Result<Option<Patient>, StoreError>;

    /// Fails with `StoreError::Conflict` when the email is already registered.
    async fn insert_patient(&self, patient: NewPatient) -> Result<Patient, StoreError>;

    async fn get_doctor(&self, id: Uuid) -> Result<Option<Doctor>, StoreError>;

    async fn insert_doctor(&self, doctor: NewDoctor) -> Result<Doctor, StoreError>;

    /// Fails with `StoreError::Conflict` when the doctor already has an
    /// overlapping appointment, and `StoreError::MissingReference` when the
    /// patient or doctor does not exist.
    async fn insert_appointment(
        &self,
        appointment: NewAppointment,
    ) -> Result<Appointment, StoreError>;

    /// Appointments of `doctor_id` whose interval intersects `[start, end)`.
    async fn appointments_overlapping(
        &self,
        doctor_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, StoreError>;

    /// Appointments starting in `[from, to)`, optionally for one doctor,
    /// ordered by start time.
    async fn appointments_starting_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        doctor_id: Option<Uuid>,
    ) -> Result<Vec<Appointment>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
