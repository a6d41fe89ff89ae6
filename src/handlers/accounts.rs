use axum::{extract::State, http::StatusCode, response::Json};
use model::AccountRole;
use rust_decimal::Decimal;
use tracing::{info, instrument, trace};
use workflow::{NewAccount, WorkflowError};

use super::{account_dto, error_response, HandlerError};
use crate::actor::CurrentActor;
use crate::schemas::{AccountDto, ApiResponse, AppState, CreateAccountRequest, ErrorResponse};

/// Create a new account
#[utoipa::path(
    post,
    path = "/api/v1/accounts",
    tag = "accounts",
    request_body = CreateAccountRequest,
    params(("x-actor-id" = i32, Header, description = "Acting account id")),
    responses(
        (status = 201, description = "Account created successfully", body = ApiResponse<AccountDto>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Only superadmins manage accounts", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_account(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(request): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AccountDto>>), HandlerError> {
    trace!("Entering create_account function");

    let role = request
        .role
        .parse::<AccountRole>()
        .map_err(|e| error_response(&WorkflowError::Validation(e)))?;

    let account = state
        .accounts
        .create(
            &actor,
            NewAccount {
                name: request.name,
                role,
                balance: request.balance.unwrap_or(Decimal::ZERO),
            },
        )
        .await
        .map_err(|e| error_response(&e))?;

    info!("Account created successfully with ID: {}, name: {}", account.id, account.name);
    let response = ApiResponse {
        data: account_dto(account),
        message: "Account created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Get all accounts
#[utoipa::path(
    get,
    path = "/api/v1/accounts",
    tag = "accounts",
    params(("x-actor-id" = i32, Header, description = "Acting account id")),
    responses(
        (status = 200, description = "Accounts retrieved successfully", body = ApiResponse<Vec<AccountDto>>),
        (status = 403, description = "Only superadmins manage accounts", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_accounts(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<(StatusCode, Json<ApiResponse<Vec<AccountDto>>>), HandlerError> {
    trace!("Entering get_accounts function");

    let accounts = state
        .accounts
        .list(&actor)
        .await
        .map_err(|e| error_response(&e))?;

    info!("Successfully retrieved {} accounts", accounts.len());
    let response = ApiResponse {
        data: accounts.into_iter().map(account_dto).collect(),
        message: "Accounts retrieved successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::OK, Json(response)))
}
