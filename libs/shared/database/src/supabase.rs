use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION},
    Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, error, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::{Appointment, Doctor, NewAppointment, NewDoctor, NewPatient, Patient};

use crate::error::StoreError;
use crate::store::EntityStore;

// Postgres SQLSTATE codes surfaced by PostgREST
const UNIQUE_VIOLATION: &str = "23505";
const EXCLUSION_VIOLATION: &str = "23P01";
const FOREIGN_KEY_VIOLATION: &str = "23503";

pub struct SupabaseClient {
    client: Client,
    base_url: String,
    service_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            service_key: config.supabase_service_key.clone(),
        }
    }

    fn get_headers(&self) -> Result<HeaderMap, StoreError> {
        let mut headers = HeaderMap::new();

        let api_key = HeaderValue::from_str(&self.service_key)
            .map_err(|e| StoreError::Backend(format!("Invalid service key header: {}", e)))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.service_key))
            .map_err(|e| StoreError::Backend(format!("Invalid service key header: {}", e)))?;

        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(headers)
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T, StoreError>
    where T: DeserializeOwned {
        self.request_with_headers(method, path, body, None).await
    }

    pub async fn request_with_headers<T>(&self, method: Method, path: &str,
                                         body: Option<Value>, extra_headers: Option<HeaderMap>)
                                         -> Result<T, StoreError>
    where T: DeserializeOwned {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let mut headers = self.get_headers()?;
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url)
            .headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("API error ({}): {}", status, error_text);
            return Err(classify_error(status, &error_text));
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    /// Inserts one row and returns its stored representation.
    pub async fn insert_returning<T>(&self, table: &str, row: Value) -> Result<T, StoreError>
    where T: DeserializeOwned {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let mut rows: Vec<T> = self.request_with_headers(
            Method::POST,
            &format!("/rest/v1/{}", table),
            Some(row),
            Some(headers),
        ).await?;

        if rows.is_empty() {
            return Err(StoreError::Backend(format!("Insert into {} returned no rows", table)));
        }

        Ok(rows.swap_remove(0))
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}

fn classify_error(status: StatusCode, body: &str) -> StoreError {
    let code = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("code").and_then(Value::as_str).map(str::to_owned));

    match code.as_deref() {
        Some(UNIQUE_VIOLATION) | Some(EXCLUSION_VIOLATION) => StoreError::Conflict(body.to_string()),
        Some(FOREIGN_KEY_VIOLATION) => StoreError::MissingReference(body.to_string()),
        _ if status == StatusCode::CONFLICT => StoreError::Conflict(body.to_string()),
        _ => StoreError::Backend(format!("API error ({}): {}", status, body)),
    }
}

fn timestamp_param(ts: DateTime<Utc>) -> String {
    urlencoding::encode(&ts.to_rfc3339_opts(SecondsFormat::Micros, true)).into_owned()
}

/// Entity store backed by a Supabase project's PostgREST API.
///
/// The `appointments` table carries a persisted `apt_end` column so the
/// overlap query runs server side; see `migrations/0001_init.sql`.
pub struct SupabaseStore {
    supabase: SupabaseClient,
}

impl SupabaseStore {
    pub fn new(config: &AppConfig) -> Self {
        info!("Using Supabase entity store at {}", config.supabase_url);
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    async fn fetch_one<T>(&self, table: &str, id: Uuid) -> Result<Option<T>, StoreError>
    where T: DeserializeOwned {
        let path = format!("/rest/v1/{}?id=eq.{}", table, id);
        let mut rows: Vec<T> = self.supabase.request(Method::GET, &path, None).await?;

        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(rows.swap_remove(0)))
    }
}

#[async_trait]
impl EntityStore for SupabaseStore {
    async fn get_patient(&self, id: Uuid) -> Result<Option<Patient>, StoreError> {
        self.fetch_one("patients", id).await
    }

    async fn insert_patient(&self, patient: NewPatient) -> Result<Patient, StoreError> {
        let now = Utc::now().to_rfc3339();
        let row = json!({
            "id": Uuid::new_v4(),
            "first_name": patient.first_name,
            "last_name": patient.last_name,
            "email": patient.email,
            "phone": patient.phone,
            "created_at": now,
            "updated_at": now
        });

        self.supabase.insert_returning("patients", row).await
    }

    async fn get_doctor(&self, id: Uuid) -> Result<Option<Doctor>, StoreError> {
        self.fetch_one("doctors", id).await
    }

    async fn insert_doctor(&self, doctor: NewDoctor) -> Result<Doctor, StoreError> {
        let row = json!({
            "id": Uuid::new_v4(),
            "name": doctor.name,
            "specialty": doctor.specialty,
            "active": doctor.active,
            "created_at": Utc::now().to_rfc3339()
        });

        self.supabase.insert_returning("doctors", row).await
    }

    async fn insert_appointment(
        &self,
        appointment: NewAppointment,
    ) -> Result<Appointment, StoreError> {
        let row = json!({
            "id": Uuid::new_v4(),
            "patient_id": appointment.patient_id,
            "doctor_id": appointment.doctor_id,
            "reason": appointment.reason,
            "apt_start": appointment.apt_start.to_rfc3339(),
            "apt_end": appointment.apt_end().to_rfc3339(),
            "apt_duration": appointment.apt_duration,
            "apt_created_at": Utc::now().to_rfc3339()
        });

        self.supabase.insert_returning("appointments", row).await
    }

    async fn appointments_overlapping(
        &self,
        doctor_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, StoreError> {
        let query_parts = vec![
            format!("doctor_id=eq.{}", doctor_id),
            format!("apt_start=lt.{}", timestamp_param(end)),
            format!("apt_end=gt.{}", timestamp_param(start)),
        ];

        let path = format!("/rest/v1/appointments?{}&order=apt_start.asc",
                           query_parts.join("&"));

        self.supabase.request(Method::GET, &path, None).await
    }

    async fn appointments_starting_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        doctor_id: Option<Uuid>,
    ) -> Result<Vec<Appointment>, StoreError> {
        let mut query_parts = vec![
            format!("apt_start=gte.{}", timestamp_param(from)),
            format!("apt_start=lt.{}", timestamp_param(to)),
        ];

        if let Some(id) = doctor_id {
            query_parts.push(format!("doctor_id=eq.{}", id));
        }

        let path = format!("/rest/v1/appointments?{}&order=apt_start.asc",
                           query_parts.join("&"));

        self.supabase.request(Method::GET, &path, None).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let _: Vec<Value> = self.supabase
            .request(Method::GET, "/rest/v1/doctors?select=id&limit=1", None)
            .await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), StoreError> {
        info!("Closing Supabase entity store for {}", self.supabase.get_base_url());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    #[test]
    fn test_classify_postgrest_errors() {
        let unique = r#"{"code":"23505","message":"duplicate key value"}"#;
        assert_matches!(classify_error(StatusCode::CONFLICT, unique), StoreError::Conflict(_));

        let exclusion = r#"{"code":"23P01","message":"conflicting key value violates exclusion constraint"}"#;
        assert_matches!(classify_error(StatusCode::CONFLICT, exclusion), StoreError::Conflict(_));

        let fk = r#"{"code":"23503","message":"violates foreign key constraint"}"#;
        assert_matches!(classify_error(StatusCode::CONFLICT, fk), StoreError::MissingReference(_));

        assert_matches!(
            classify_error(StatusCode::SERVICE_UNAVAILABLE, "upstream down"),
            StoreError::Backend(_)
        );
    }

    #[test]
    fn test_timestamp_param_is_url_safe() {
        let ts = Utc.with_ymd_and_hms(2030, 6, 1, 10, 0, 0).unwrap();
        assert_eq!(timestamp_param(ts), "2030-06-01T10%3A00%3A00.000000Z");
    }
}
