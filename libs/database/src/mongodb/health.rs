use mongodb::Database;
use mongodb::bson::doc;
use std::time::Instant;
use tracing::debug;

/// Outcome of a timed MongoDB ping
#[derive(Debug, Clone)]
pub struct HealthStatus {
    pub healthy: bool,
    /// Driver error text when unhealthy
    pub message: Option<String>,
    pub response_time_ms: u64,
}

/// `true` when the server answers `{ ping: 1 }` on `database`.
///
/// Uses `ping` rather than listing databases so it works for users whose
/// role is scoped to a single database.
pub async fn check_health(database: &Database) -> bool {
    check_health_detailed(database).await.healthy
}

/// Ping `database` and report latency and any error.
pub async fn check_health_detailed(database: &Database) -> HealthStatus {
    let start = Instant::now();
    let result = database.run_command(doc! { "ping": 1 }).await;
    let response_time_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(_) => HealthStatus {
            healthy: true,
            message: None,
            response_time_ms,
        },
        Err(e) => {
            debug!(error = %e, "MongoDB ping failed");
            HealthStatus {
                healthy: false,
                message: Some(e.to_string()),
                response_time_ms,
            }
        }
    }
}
