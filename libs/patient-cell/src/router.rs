use std::sync::Arc;
use axum::{routing::{get, post}, Router};
use shared_database::EntityStore;

use crate::handlers::*;
use crate::services::PatientService;

pub fn patient_routes(store: Arc<dyn EntityStore>) -> Router {
    let service = Arc::new(PatientService::new(store));

    Router::new()
        .route("/", post(create_patient))
        .route("/{id}", get(get_patient))
        .with_state(service)
}
