use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use shared_models::{Appointment, Doctor, NewAppointment, NewDoctor, NewPatient, Patient};

use crate::error::StoreError;
use crate::store::EntityStore;

#[derive(Debug, Default)]
struct Tables {
    patients: HashMap<Uuid, Patient>,
    doctors: HashMap<Uuid, Doctor>,
    // Insertion order doubles as storage order
    appointments: Vec<Appointment>,
}

/// Process-local store with the same constraints as the SQL schema: unique
/// patient email, foreign keys, and no overlapping appointments per doctor.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn appointment_count(&self) -> usize {
        self.tables.read().await.appointments.len()
    }
}

#[async_trait]
impl EntityStore for InMemoryStore {
    async fn get_patient(&self, id: Uuid) -> Result<Option<Patient>, StoreError> {
        Ok(self.tables.read().await.patients.get(&id).cloned())
    }

    async fn insert_patient(&self, patient: NewPatient) -> Result<Patient, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.patients.values().any(|p| p.email.eq_ignore_ascii_case(&patient.email)) {
            return Err(StoreError::Conflict(format!(
                "patient email {} already registered",
                patient.email
            )));
        }

        let now = Utc::now();
        let record = Patient {
            id: Uuid::new_v4(),
            first_name: patient.first_name,
            last_name: patient.last_name,
            email: patient.email,
            phone: patient.phone,
            created_at: now,
            updated_at: now,
        };
        tables.patients.insert(record.id, record.clone());
        debug!("Stored patient {}", record.id);

        Ok(record)
    }

    async fn get_doctor(&self, id: Uuid) -> Result<Option<Doctor>, StoreError> {
        Ok(self.tables.read().await.doctors.get(&id).cloned())
    }

    async fn insert_doctor(&self, doctor: NewDoctor) -> Result<Doctor, StoreError> {
        let record = Doctor {
            id: Uuid::new_v4(),
            name: doctor.name,
            specialty: doctor.specialty,
            active: doctor.active,
            created_at: Utc::now(),
        };
        self.tables.write().await.doctors.insert(record.id, record.clone());
        debug!("Stored doctor {}", record.id);

        Ok(record)
    }

    async fn insert_appointment(
        &self,
        appointment: NewAppointment,
    ) -> Result<Appointment, StoreError> {
        let mut tables = self.tables.write().await;

        if !tables.patients.contains_key(&appointment.patient_id) {
            return Err(StoreError::MissingReference(format!(
                "patient {}",
                appointment.patient_id
            )));
        }
        if !tables.doctors.contains_key(&appointment.doctor_id) {
            return Err(StoreError::MissingReference(format!(
                "doctor {}",
                appointment.doctor_id
            )));
        }

        let start = appointment.apt_start;
        let end = appointment.apt_end();
        if tables
            .appointments
            .iter()
            .any(|existing| existing.doctor_id == appointment.doctor_id && existing.overlaps(start, end))
        {
            return Err(StoreError::Conflict(format!(
                "doctor {} already booked between {} and {}",
                appointment.doctor_id, start, end
            )));
        }

        let record = Appointment {
            id: Uuid::new_v4(),
            patient_id: appointment.patient_id,
            doctor_id: appointment.doctor_id,
            reason: appointment.reason,
            apt_start: appointment.apt_start,
            apt_duration: appointment.apt_duration,
            apt_created_at: Utc::now(),
        };
        tables.appointments.push(record.clone());
        debug!("Stored appointment {} for doctor {}", record.id, record.doctor_id);

        Ok(record)
    }

    async fn appointments_overlapping(
        &self,
        doctor_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .appointments
            .iter()
            .filter(|apt| apt.doctor_id == doctor_id && apt.overlaps(start, end))
            .cloned()
            .collect())
    }

    async fn appointments_starting_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        doctor_id: Option<Uuid>,
    ) -> Result<Vec<Appointment>, StoreError> {
        let tables = self.tables.read().await;
        let mut matches: Vec<Appointment> = tables
            .appointments
            .iter()
            .filter(|apt| apt.apt_start >= from && apt.apt_start < to)
            .filter(|apt| doctor_id.map_or(true, |id| apt.doctor_id == id))
            .cloned()
            .collect();
        // Stable sort keeps storage order among equal starts
        matches.sort_by_key(|apt| apt.apt_start);

        Ok(matches)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
