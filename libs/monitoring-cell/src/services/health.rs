// =====================================================================================
// HEALTH MONITORING SERVICE
// =====================================================================================

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, instrument, warn};

use shared_database::EntityStore;

use crate::models::{HealthCheck, HealthCheckResponse, HealthStatus};

pub struct HealthMonitorService {
    start_time: Instant,
    store: Arc<dyn EntityStore>,
}

impl HealthMonitorService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self {
            start_time: Instant::now(),
            store,
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Readiness: every backing component must answer.
    #[instrument(skip(self))]
    pub async fn check_readiness(&self) -> HealthCheckResponse {
        let checks = vec![self.check_store_health().await];
        let response = HealthCheckResponse::from_checks(checks);

        debug!("Readiness {:?} after {}s uptime", response.status, self.uptime_seconds());
        response
    }

    async fn check_store_health(&self) -> HealthCheck {
        let start = Instant::now();

        let (status, error_message) = match self.store.ping().await {
            Ok(()) => (HealthStatus::Up, None),
            Err(e) => {
                warn!("Entity store health check failed: {}", e);
                (HealthStatus::Down, Some(e.to_string()))
            }
        };

        HealthCheck {
            component: "entity_store".to_string(),
            status,
            response_time_ms: start.elapsed().as_millis() as u64,
            last_checked: chrono::Utc::now(),
            error_message,
        }
    }
}
