use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::router::appointment_routes;
use doctor_cell::router::doctor_routes;
use monitoring_cell::router::monitoring_routes;
use patient_cell::router::patient_routes;
use shared_config::AppConfig;
use shared_database::EntityStore;
use shared_utils::Clock;

pub const GREETING: &str = "This is a patient encounter system";

pub fn create_router(
    config: &AppConfig,
    store: Arc<dyn EntityStore>,
    clock: Arc<dyn Clock>,
) -> Router {
    Router::new()
        .route("/", get(|| async { GREETING }))
        .nest("/patients", patient_routes(store.clone()))
        .nest("/doctors", doctor_routes(store.clone()))
        .nest("/appointments", appointment_routes(config, store.clone(), clock))
        .merge(monitoring_routes(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use shared_database::InMemoryStore;
    use shared_utils::test_utils::fixed_clock;
    use tower::ServiceExt;

    fn app() -> Router {
        create_router(&AppConfig::default(), Arc::new(InMemoryStore::new()), fixed_clock())
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_root_greeting() {
        let (status, body) = send(&app(), Request::builder().uri("/").body(Body::empty()).unwrap()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, GREETING.as_bytes());
    }

    #[tokio::test]
    async fn test_health_is_merged_at_root() {
        let (status, body) = send(&app(), Request::builder().uri("/health").body(Body::empty()).unwrap()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_slice::<Value>(&body).unwrap(), json!({ "status": "UP" }));
    }

    #[tokio::test]
    async fn test_booking_flow_across_cells() {
        let app = app();

        let (status, patient) = send(&app, post_json("/patients", json!({
            "first_name": "John",
            "last_name": "Doe",
            "email": "johndoe@example.com",
            "phone": "+1 234-567-8901"
        }))).await;
        assert_eq!(status, StatusCode::CREATED);
        let patient: Value = serde_json::from_slice(&patient).unwrap();

        let (status, doctor) = send(&app, post_json("/doctors", json!({
            "name": "Dr. Mehta",
            "specialty": "Cardiology"
        }))).await;
        assert_eq!(status, StatusCode::CREATED);
        let doctor: Value = serde_json::from_slice(&doctor).unwrap();

        let booking = |start: &str| json!({
            "patient_id": patient["id"],
            "doctor_id": doctor["id"],
            "reason": "Annual check-up",
            "apt_start": start,
            "apt_duration": 30
        });

        let (status, _) = send(&app, post_json("/appointments", booking("2030-03-05T10:00:00Z"))).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = send(&app, post_json("/appointments", booking("2030-03-05T10:15:00Z"))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, listed) = send(
            &app,
            Request::builder().uri("/appointments?apt_date=2030-03-05").body(Body::empty()).unwrap(),
        ).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_slice::<Value>(&listed).unwrap().as_array().unwrap().len(), 1);
    }
}
