use serde::{Deserialize, Serialize};

use shared_models::NewDoctor;
use shared_utils::validation::require_non_blank;

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDoctorRequest {
    pub name: String,
    pub specialty: String,
    #[serde(default = "default_active", alias = "active_status")]
    pub active: bool,
}

impl CreateDoctorRequest {
    pub fn validate(self) -> Result<NewDoctor, DoctorError> {
        let name = require_non_blank("name", &self.name).map_err(DoctorError::ValidationError)?;
        let specialty = require_non_blank("specialty", &self.specialty)
            .map_err(DoctorError::ValidationError)?;

        Ok(NewDoctor {
            name,
            specialty,
            active: self.active,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_active_defaults_to_true() {
        let request: CreateDoctorRequest =
            serde_json::from_str(r#"{"name": "Dr. Smith", "specialty": "Cardiology"}"#).unwrap();
        assert!(request.active);

        let inactive: CreateDoctorRequest = serde_json::from_str(
            r#"{"name": "Dr. Snow", "specialty": "Radiology", "active_status": false}"#,
        )
        .unwrap();
        assert!(!inactive.active);
    }

    #[test]
    fn test_blank_specialty_is_rejected() {
        let request = CreateDoctorRequest {
            name: "Dr. Smith".to_string(),
            specialty: "".to_string(),
            active: true,
        };
        assert_matches!(
            request.validate(),
            Err(DoctorError::ValidationError(msg)) if msg == "specialty must not be empty"
        );
    }
}
