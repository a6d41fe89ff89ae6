use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::Json,
};
use tracing::{debug, warn};
use workflow::{Actor, WorkflowError};

use crate::schemas::{AppState, ErrorResponse};

/// Header carrying the id of the acting account, set by the authenticating
/// proxy in front of the service.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// The acting account of the current request.
#[derive(Debug, Clone, Copy)]
pub struct CurrentActor(pub Actor);

#[async_trait]
impl FromRequestParts<AppState> for CurrentActor {
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let account_id = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i32>().ok())
            .ok_or_else(|| {
                warn!("Request without a valid {} header", ACTOR_HEADER);
                unauthorized(
                    "MISSING_ACTOR",
                    format!("Header {} with an account id is required", ACTOR_HEADER),
                )
            })?;

        match state.accounts.resolve_actor(account_id).await {
            Ok(actor) => {
                debug!("Acting as account {} ({})", actor.id, actor.role);
                Ok(CurrentActor(actor))
            }
            Err(WorkflowError::NotFound(_)) => {
                warn!("Unknown actor id {}", account_id);
                Err(unauthorized(
                    "UNKNOWN_ACTOR",
                    format!("Account {} does not exist", account_id),
                ))
            }
            Err(e) => Err(crate::handlers::error_response(&e)),
        }
    }
}

fn unauthorized(code: &str, error: String) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error,
            code: code.to_string(),
            success: false,
        }),
    )
}
