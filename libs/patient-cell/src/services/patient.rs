use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use shared_database::{EntityStore, StoreError};
use shared_models::Patient;

use crate::models::{CreatePatientRequest, PatientError};

pub struct PatientService {
    store: Arc<dyn EntityStore>,
}

impl PatientService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    pub async fn create_patient(
        &self,
        request: CreatePatientRequest,
    ) -> Result<Patient, PatientError> {
        debug!("Creating new patient profile for: {}", request.email);

        let new_patient = request.validate()?;
        let email = new_patient.email.clone();

        let patient = self.store.insert_patient(new_patient).await
            .map_err(|e| match e {
                StoreError::Conflict(_) => PatientError::EmailAlreadyExists { email },
                other => PatientError::DatabaseError(other.to_string()),
            })?;

        info!("Patient profile created successfully with ID: {}", patient.id);
        Ok(patient)
    }

    pub async fn get_patient(&self, patient_id: Uuid) -> Result<Patient, PatientError> {
        debug!("Fetching patient profile: {}", patient_id);

        self.store.get_patient(patient_id).await
            .map_err(|e| PatientError::DatabaseError(e.to_string()))?
            .ok_or(PatientError::NotFound)
    }
}
