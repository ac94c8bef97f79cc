use assert_matches::assert_matches;
use chrono::{TimeZone, Utc};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_database::{EntityStore, StoreError, SupabaseStore};
use shared_models::NewAppointment;
use shared_utils::test_utils::{MockSupabaseResponses, TestConfig, TestData};

async fn store_for(mock_server: &MockServer) -> SupabaseStore {
    SupabaseStore::new(&TestConfig::with_url(mock_server.uri()).to_app_config())
}

#[tokio::test]
async fn test_get_patient_found_and_missing() {
    let mock_server = MockServer::start().await;
    let patient_id = MockSupabaseResponses::random_id();

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("id", format!("eq.{}", patient_id)))
        .and(header("apikey", "test-service-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::patient_row(&patient_id, "asha@example.com")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server).await;

    let found = store.get_patient(patient_id.parse().unwrap()).await.unwrap();
    assert_eq!(found.unwrap().email, "asha@example.com");

    let missing = store.get_patient(Uuid::new_v4()).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_insert_doctor_returns_representation() {
    let mock_server = MockServer::start().await;
    let doctor_id = MockSupabaseResponses::random_id();

    Mock::given(method("POST"))
        .and(path("/rest/v1/doctors"))
        .and(header("Prefer", "return=representation"))
        .and(body_partial_json(json!({ "name": "Dr. Mehta", "active": true })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::doctor_row(&doctor_id, "Dr. Mehta", true)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server).await;
    let doctor = store.insert_doctor(TestData::doctor("Dr. Mehta", true)).await.unwrap();

    assert_eq!(doctor.id.to_string(), doctor_id);
    assert!(doctor.active);
}

#[tokio::test]
async fn test_duplicate_email_maps_to_conflict() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": "23505",
            "message": "duplicate key value violates unique constraint \"patients_email_lower_key\""
        })))
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server).await;
    let result = store.insert_patient(TestData::patient("asha@example.com")).await;

    assert_matches!(result, Err(StoreError::Conflict(_)));
}

#[tokio::test]
async fn test_exclusion_violation_on_appointment_maps_to_conflict() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .and(body_partial_json(json!({ "apt_duration": 30 })))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": "23P01",
            "message": "conflicting key value violates exclusion constraint \"appointments_no_overlap\""
        })))
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server).await;
    let result = store
        .insert_appointment(NewAppointment {
            patient_id: Uuid::new_v4(),
            doctor_id: Uuid::new_v4(),
            reason: String::new(),
            apt_start: Utc.with_ymd_and_hms(2030, 6, 1, 10, 0, 0).unwrap(),
            apt_duration: 30,
        })
        .await;

    assert_matches!(result, Err(StoreError::Conflict(_)));
}

#[tokio::test]
async fn test_overlap_query_filters_server_side() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();
    let apt_id = MockSupabaseResponses::random_id();

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("doctor_id", format!("eq.{}", doctor_id)))
        .and(query_param("apt_start", "lt.2030-06-01T10:45:00.000000Z"))
        .and(query_param("apt_end", "gt.2030-06-01T10:15:00.000000Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::appointment_row(
                &apt_id,
                &MockSupabaseResponses::random_id(),
                &doctor_id.to_string(),
                "2030-06-01T10:00:00Z",
                30,
            )
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server).await;
    let hits = store
        .appointments_overlapping(
            doctor_id,
            Utc.with_ymd_and_hms(2030, 6, 1, 10, 15, 0).unwrap(),
            Utc.with_ymd_and_hms(2030, 6, 1, 10, 45, 0).unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id.to_string(), apt_id);
}

#[tokio::test]
async fn test_server_error_is_backend_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(503).set_body_string("database unavailable"))
        .mount(&mock_server)
        .await;

    let store = store_for(&mock_server).await;

    assert_matches!(store.ping().await, Err(StoreError::Backend(_)));
    assert_matches!(store.get_doctor(Uuid::new_v4()).await, Err(StoreError::Backend(_)));
}
