//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Record store**: Calls the store's own health endpoint
/// 2. **Sessions**: Reports the number of live browser sessions
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "record_store": {
///       "status": "ok",
///       "message": "Reachable"
///     },
///     "sessions": {
///       "status": "ok",
///       "message": "Active: 3"
///     }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let store_check = check_record_store(&state).await;

    let sessions_check = check_sessions(&state);

    let all_healthy = store_check.status == "ok" && sessions_check.status == "ok";

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            record_store: store_check,
            sessions: sessions_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Checks that the record store answers its health probe.
async fn check_record_store(state: &AppState) -> CheckStatus {
    match state.login_service.backend().health().await {
        Ok(()) => CheckStatus {
            status: "ok".to_string(),
            message: Some("Reachable".to_string()),
        },
        Err(e) => {
            tracing::warn!(error = %e, "Record store health check failed");
            CheckStatus {
                status: "error".to_string(),
                message: Some(format!("Record store error: {}", e)),
            }
        }
    }
}

/// Reports the session store size.
fn check_sessions(state: &AppState) -> CheckStatus {
    CheckStatus {
        status: "ok".to_string(),
        message: Some(format!("Active: {}", state.sessions.len())),
    }
}
