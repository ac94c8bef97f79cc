// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{routing::post, Router};

use shared_config::AppConfig;
use shared_database::EntityStore;
use shared_utils::Clock;

use crate::handlers;
use crate::services::booking::AppointmentBookingService;

pub fn appointment_routes(
    config: &AppConfig,
    store: Arc<dyn EntityStore>,
    clock: Arc<dyn Clock>,
) -> Router {
    let service = Arc::new(AppointmentBookingService::new(config, store, clock));

    Router::new()
        .route("/", post(handlers::create_appointment).get(handlers::list_appointments))
        .with_state(service)
}
