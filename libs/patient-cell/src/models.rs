use serde::{Deserialize, Serialize};

use shared_models::NewPatient;
use shared_utils::validation::{normalize_phone, require_non_blank, validate_email};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl CreatePatientRequest {
    /// Checks contact fields and normalizes the phone number to digits.
    pub fn validate(self) -> Result<NewPatient, PatientError> {
        let first_name = require_non_blank("first_name", &self.first_name)
            .map_err(PatientError::ValidationError)?;
        let last_name = require_non_blank("last_name", &self.last_name)
            .map_err(PatientError::ValidationError)?;
        let email = validate_email(&self.email)
            .map_err(|e| PatientError::ValidationError(e.to_string()))?;
        let phone = normalize_phone(&self.phone)
            .map_err(|e| PatientError::ValidationError(e.to_string()))?;

        Ok(NewPatient {
            first_name,
            last_name,
            email,
            phone,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error("Patient with email {email} already exists")]
    EmailAlreadyExists { email: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
