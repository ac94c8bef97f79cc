use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::{NewDoctor, NewPatient};

use crate::clock::FixedClock;

pub struct TestConfig {
    pub supabase_url: String,
    pub supabase_service_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_service_key: "test-service-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            supabase_url: url.into(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_service_key: self.supabase_service_key.clone(),
            ..AppConfig::default()
        }
    }
}

/// Instant every time-sensitive test starts from: 2030-03-04 08:00:00 UTC.
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 3, 4, 8, 0, 0).unwrap()
}

pub fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(test_now()))
}

pub struct TestData;

impl TestData {
    pub fn patient(email: &str) -> NewPatient {
        NewPatient {
            first_name: "Asha".to_string(),
            last_name: "Verma".to_string(),
            email: email.to_string(),
            phone: "9876543210".to_string(),
        }
    }

    pub fn doctor(name: &str, active: bool) -> NewDoctor {
        NewDoctor {
            name: name.to_string(),
            specialty: "Cardiology".to_string(),
            active,
        }
    }
}

/// Rows shaped the way PostgREST returns them.
pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn patient_row(patient_id: &str, email: &str) -> Value {
        json!({
            "id": patient_id,
            "first_name": "Asha",
            "last_name": "Verma",
            "email": email,
            "phone": "9876543210",
            "created_at": "2030-01-01T00:00:00Z",
            "updated_at": "2030-01-01T00:00:00Z"
        })
    }

    pub fn doctor_row(doctor_id: &str, name: &str, active: bool) -> Value {
        json!({
            "id": doctor_id,
            "name": name,
            "specialty": "Cardiology",
            "active": active,
            "created_at": "2030-01-01T00:00:00Z"
        })
    }

    pub fn appointment_row(
        appointment_id: &str,
        patient_id: &str,
        doctor_id: &str,
        apt_start: &str,
        apt_duration: i64,
    ) -> Value {
        json!({
            "id": appointment_id,
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "reason": "Check-up",
            "apt_start": apt_start,
            "apt_duration": apt_duration,
            "apt_created_at": "2030-01-01T00:00:00Z"
        })
    }

    pub fn random_id() -> String {
        Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Clock;

    #[test]
    fn test_config_conversion() {
        let config = TestConfig::with_url("http://127.0.0.1:9999").to_app_config();
        assert_eq!(config.supabase_url, "http://127.0.0.1:9999");
        assert!(config.is_configured());
    }

    #[test]
    fn test_fixed_clock_starts_at_test_now() {
        assert_eq!(fixed_clock().now(), test_now());
    }
}
