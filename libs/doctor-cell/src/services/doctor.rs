use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use shared_database::EntityStore;
use shared_models::Doctor;

use crate::models::{CreateDoctorRequest, DoctorError};

pub struct DoctorService {
    store: Arc<dyn EntityStore>,
}

impl DoctorService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Create a new doctor profile
    pub async fn create_doctor(&self, request: CreateDoctorRequest) -> Result<Doctor, DoctorError> {
        debug!("Creating doctor profile for: {}", request.name);

        let new_doctor = request.validate()?;
        let doctor = self.store.insert_doctor(new_doctor).await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        info!("Doctor profile created with ID: {} (active: {})", doctor.id, doctor.active);
        Ok(doctor)
    }

    /// Get doctor by ID
    pub async fn get_doctor(&self, doctor_id: Uuid) -> Result<Doctor, DoctorError> {
        debug!("Fetching doctor profile: {}", doctor_id);

        self.store.get_doctor(doctor_id).await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?
            .ok_or(DoctorError::NotFound)
    }
}
