use std::{path::PathBuf, sync::Arc};

use axum::{
    Extension,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::Json,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    management::{Sources, collector},
    success, warning,
};

/// Shared state of the trigger server.
#[derive(Debug, Clone)]
pub struct AppState {
    pub database_path: PathBuf,
    pub sources: Sources,
}

#[derive(Debug, Deserialize)]
pub struct CollectRequest {
    pub user_id: Option<String>,
}

/// `POST /collect-data`
///
/// Starts a collection run for the bearer token in the `Authorization`
/// header and acknowledges with 202 before the run finishes. The run itself
/// executes on the blocking pool; its outcome only shows up in the logs.
///
/// The token decides whose data is collected. `user_id` is echoed back and
/// a warning is logged when the token resolves to a different user.
pub async fn collect_data(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<CollectRequest>,
) -> (StatusCode, Json<Value>) {
    let Some(token) = bearer_token(&headers) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Missing or invalid bearer token" })),
        );
    };

    let Some(user_id) = request.user_id.filter(|id| !id.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "user_id is required" })),
        );
    };

    let run_user = user_id.clone();
    tokio::task::spawn_blocking(move || {
        match collector::run_for_token(&token, &state.database_path, &state.sources) {
            Ok(report) => {
                if let Some(message) = user_mismatch(&run_user, &report.user_id) {
                    warning!("{}", message);
                }
                let failed = report.failed_tables();
                if failed == 0 {
                    success!("Collection for {} finished", run_user);
                } else {
                    warning!(
                        "Collection for {} finished with {} failed tables",
                        run_user,
                        failed
                    );
                }
            }
            Err(e) => warning!("Collection for {} failed: {}", run_user, e),
        }
    });

    (
        StatusCode::ACCEPTED,
        Json(json!({
            "message": "Data collection started",
            "user_id": user_id
        })),
    )
}

/// Message for a run whose token belongs to another user than requested.
pub fn user_mismatch(requested: &str, collected: &str) -> Option<String> {
    (requested != collected).then(|| {
        format!(
            "Requested collection for {} but the token belongs to {}",
            requested, collected
        )
    })
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}
