// =====================================================================================
// MONITORING CELL ROUTER
// =====================================================================================

use std::sync::Arc;

use axum::{routing::get, Router};

use shared_database::EntityStore;

use crate::handlers::{get_health_status, get_readiness};
use crate::services::HealthMonitorService;

pub fn monitoring_routes(store: Arc<dyn EntityStore>) -> Router {
    let service = Arc::new(HealthMonitorService::new(store));

    Router::new()
        .route("/health", get(get_health_status))
        .route("/health/ready", get(get_readiness))
        .with_state(service)
}
