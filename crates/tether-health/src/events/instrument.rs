use std::future::Future;

use tokio::time::Instant;
use tracing::warn;

use tether_core::ApiError;

use super::bus::HealthEventBus;
use super::types::{HealthSnapshot, HealthStatus};

/// Drive a request future to completion and publish one health snapshot
/// describing its outcome.
///
/// The underlying result is passed through untouched; instrumentation
/// never changes request semantics. Abort-classified errors publish
/// `Aborted`, everything else `Error`, successes `Ok`.
pub async fn observe_request<T, F>(bus: &HealthEventBus, request: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    let started = Instant::now();
    let result = request.await;
    let duration_ms = started.elapsed().as_millis() as u64;

    match &result {
        Ok(_) => {
            bus.publish(HealthSnapshot::now(HealthStatus::Ok, duration_ms, None));
        }
        Err(err) => {
            let status = if err.is_aborted() {
                HealthStatus::Aborted
            } else {
                HealthStatus::Error
            };
            warn!(
                event = "health.api.request_failed",
                status = %status,
                duration_ms,
                error = %err,
            );
            bus.publish(HealthSnapshot::now(
                status,
                duration_ms,
                Some(err.message.clone()),
            ));
        }
    }

    result
}
