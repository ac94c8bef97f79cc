// =====================================================================================
// MONITORING CELL - LIVENESS & READINESS PROBES
// =====================================================================================

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{HealthCheck, HealthCheckResponse, HealthStatus};
pub use router::monitoring_routes;
pub use services::HealthMonitorService;
