// =====================================================================================
// MONITORING CELL HANDLERS
// =====================================================================================

use std::sync::Arc;

use axum::extract::State;
use tracing::instrument;

use crate::models::HealthCheckResponse;
use crate::services::HealthMonitorService;

/// Liveness probe; answers as long as the process serves requests.
pub async fn get_health_status() -> HealthCheckResponse {
    HealthCheckResponse::up()
}

#[instrument(skip(service))]
pub async fn get_readiness(
    State(service): State<Arc<HealthMonitorService>>,
) -> HealthCheckResponse {
    service.check_readiness().await
}
