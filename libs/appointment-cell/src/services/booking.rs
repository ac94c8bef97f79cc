use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{EntityStore, StoreError};
use shared_models::{Appointment, NewAppointment};
use shared_utils::Clock;

use crate::models::{
    day_window, parse_aware_start, AppointmentError, AppointmentValidationRules,
    CreateAppointmentRequest, SchedulingRejection,
};
use crate::services::conflict::ConflictDetectionService;
use crate::services::consistency::SchedulingLocks;

pub struct AppointmentBookingService {
    store: Arc<dyn EntityStore>,
    conflict_service: ConflictDetectionService,
    locks: SchedulingLocks,
    clock: Arc<dyn Clock>,
    validation_rules: AppointmentValidationRules,
}

impl AppointmentBookingService {
    pub fn new(config: &AppConfig, store: Arc<dyn EntityStore>, clock: Arc<dyn Clock>) -> Self {
        Self::with_rules(AppointmentValidationRules::from_config(config), store, clock)
    }

    pub fn with_rules(
        validation_rules: AppointmentValidationRules,
        store: Arc<dyn EntityStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            conflict_service: ConflictDetectionService::new(Arc::clone(&store)),
            store,
            locks: SchedulingLocks::new(),
            clock,
            validation_rules,
        }
    }

    /// Validate and persist an appointment.
    ///
    /// Checks run in a fixed order: timestamp shape, duration bounds, start in
    /// the future, doctor active, patient known, no overlap for the doctor.
    /// The doctor is checked once before taking its scheduling lock and again
    /// under it; the remaining checks and the insert also run under the lock,
    /// so two overlapping requests can never both succeed.
    #[instrument(skip(self, request), fields(doctor_id = %request.doctor_id, patient_id = %request.patient_id))]
    pub async fn schedule_appointment(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        let apt_start = parse_aware_start(&request.apt_start)?;
        let duration = self.validation_rules.check_duration(request.apt_duration)?;
        let apt_end = apt_start + duration;

        let now = self.clock.now();
        if apt_start <= now {
            debug!("Rejecting start {} at or before {}", apt_start, now);
            return Err(AppointmentError::Rejected(SchedulingRejection::PastStart));
        }

        // Unknown or inactive doctors never reach the lock table
        self.verify_doctor_available(request.doctor_id).await?;

        let _guard = self.locks.acquire(request.doctor_id).await;

        self.verify_doctor_available(request.doctor_id).await?;
        self.verify_patient_exists(request.patient_id).await?;

        let conflicts = self.conflict_service
            .check_conflicts(request.doctor_id, apt_start, apt_end)
            .await?;
        if conflicts.has_conflict {
            return Err(AppointmentError::Rejected(SchedulingRejection::Conflict));
        }

        let appointment = self.store
            .insert_appointment(NewAppointment {
                patient_id: request.patient_id,
                doctor_id: request.doctor_id,
                reason: request.reason,
                apt_start,
                apt_duration: request.apt_duration,
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict(detail) => {
                    warn!("Store rejected overlapping appointment: {}", detail);
                    AppointmentError::Rejected(SchedulingRejection::Conflict)
                }
                other => AppointmentError::DatabaseError(other.to_string()),
            })?;

        info!("Appointment {} booked with doctor {} at {} for {} minutes",
              appointment.id, appointment.doctor_id, appointment.apt_start, appointment.apt_duration);

        Ok(appointment)
    }

    /// Doctors with a booking currently in flight.
    pub fn doctors_being_scheduled(&self) -> usize {
        self.locks.tracked_doctors()
    }

    /// Appointments starting within the UTC calendar day, ordered by start.
    pub async fn list_appointments_for_date(
        &self,
        apt_date: NaiveDate,
        doctor_id: Option<Uuid>,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let (from, to) = day_window(apt_date);
        debug!("Listing appointments from {} to {} (doctor: {:?})", from, to, doctor_id);

        self.store
            .appointments_starting_between(from, to, doctor_id)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))
    }

    async fn verify_doctor_available(&self, doctor_id: Uuid) -> Result<(), AppointmentError> {
        let doctor = self.store.get_doctor(doctor_id).await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        match doctor {
            Some(doctor) if doctor.accepts_appointments() => Ok(()),
            Some(_) => {
                info!("Doctor {} is inactive", doctor_id);
                Err(AppointmentError::Rejected(SchedulingRejection::DoctorUnavailable))
            }
            None => {
                info!("Doctor {} does not exist", doctor_id);
                Err(AppointmentError::Rejected(SchedulingRejection::DoctorUnavailable))
            }
        }
    }

    async fn verify_patient_exists(&self, patient_id: Uuid) -> Result<(), AppointmentError> {
        let patient = self.store.get_patient(patient_id).await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        if patient.is_none() {
            return Err(AppointmentError::PatientNotFound);
        }

        Ok(())
    }
}
