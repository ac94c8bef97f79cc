use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use shared_database::EntityStore;

use crate::handlers;
use crate::services::DoctorService;

pub fn doctor_routes(store: Arc<dyn EntityStore>) -> Router {
    let service = Arc::new(DoctorService::new(store));

    Router::new()
        .route("/", post(handlers::create_doctor))
        .route("/{doctor_id}", get(handlers::get_doctor))
        .with_state(service)
}
