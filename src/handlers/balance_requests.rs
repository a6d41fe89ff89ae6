use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use model::RequestStatus;
use serde::Deserialize;
use tracing::{debug, info, instrument, trace};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;
use workflow::{NewBalanceRequest, RequestFilter, WorkflowError, WorkflowEvent};

use super::{account_dto, error_response, notification_dto, request_dto, HandlerError};
use crate::actor::CurrentActor;
use crate::schemas::{
    AccountDto, ApiResponse, AppState, BalanceRequestDto, BalanceRequestOutcome,
    CreateBalanceRequest, ErrorResponse, NotificationDto,
};

/// Query parameters for listing balance requests
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct BalanceRequestQuery {
    /// Page number (default: 1)
    #[validate(range(min = 1, max = 10000))]
    pub page: Option<u64>,
    /// Page size (default: 50)
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<u64>,
    /// Filter by status: pending, approved or rejected
    pub status: Option<String>,
}

impl BalanceRequestQuery {
    fn filter(&self) -> Result<RequestFilter, WorkflowError> {
        let defaults = RequestFilter::default();
        let status = match self.status.as_deref() {
            Some(raw) => Some(raw.parse::<RequestStatus>().map_err(WorkflowError::Validation)?),
            None => None,
        };

        Ok(RequestFilter {
            status,
            page: self.page.unwrap_or(defaults.page),
            limit: self.limit.unwrap_or(defaults.limit),
        })
    }
}

/// List the balance requests visible to the acting account
#[utoipa::path(
    get,
    path = "/api/v1/balance-requests",
    tag = "balance-requests",
    params(BalanceRequestQuery, ("x-actor-id" = i32, Header, description = "Acting account id")),
    responses(
        (status = 200, description = "Balance requests retrieved successfully", body = ApiResponse<Vec<BalanceRequestDto>>),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 401, description = "Missing or unknown actor", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_balance_requests(
    Valid(Query(query)): Valid<Query<BalanceRequestQuery>>,
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<(StatusCode, Json<ApiResponse<Vec<BalanceRequestDto>>>), HandlerError> {
    trace!("Entering get_balance_requests function");
    let filter = query.filter().map_err(|e| error_response(&e))?;
    debug!("Listing balance requests with {:?}", filter);

    let requests = state
        .requests
        .list(&actor, filter)
        .await
        .map_err(|e| error_response(&e))?;

    info!("Returning {} balance requests to {}", requests.len(), actor.id);
    let response = ApiResponse {
        data: requests.into_iter().map(request_dto).collect(),
        message: "Balance requests retrieved successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::OK, Json(response)))
}

/// File a new balance request
#[utoipa::path(
    post,
    path = "/api/v1/balance-requests",
    tag = "balance-requests",
    request_body = CreateBalanceRequest,
    params(("x-actor-id" = i32, Header, description = "Acting account id")),
    responses(
        (status = 201, description = "Balance request created", body = ApiResponse<BalanceRequestOutcome>),
        (status = 400, description = "Invalid amount or approver", body = ErrorResponse),
        (status = 401, description = "Missing or unknown actor", body = ErrorResponse),
        (status = 403, description = "Only admins can create balance requests", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_balance_request(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(request): Json<CreateBalanceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BalanceRequestOutcome>>), HandlerError> {
    trace!("Entering create_balance_request function");

    let created = state
        .requests
        .create(
            &actor,
            NewBalanceRequest {
                amount: request.amount,
                approver_id: request.approver_id,
            },
        )
        .await
        .map_err(|e| error_response(&e))?;

    let notification = WorkflowEvent::RequestCreated {
        request_id: created.id,
        requester_id: created.requester_id,
        amount: created.amount,
    }
    .notification();

    info!("Balance request {} created", created.id);
    Ok((StatusCode::CREATED, Json(outcome(request_dto(created), notification_dto(notification)))))
}

/// Get a balance request by ID
#[utoipa::path(
    get,
    path = "/api/v1/balance-requests/{request_id}",
    tag = "balance-requests",
    params(
        ("request_id" = i32, Path, description = "Balance request ID"),
        ("x-actor-id" = i32, Header, description = "Acting account id"),
    ),
    responses(
        (status = 200, description = "Balance request retrieved successfully", body = ApiResponse<BalanceRequestDto>),
        (status = 403, description = "Request belongs to another admin", body = ErrorResponse),
        (status = 404, description = "Balance request not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_balance_request(
    Path(request_id): Path<i32>,
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<(StatusCode, Json<ApiResponse<BalanceRequestDto>>), HandlerError> {
    trace!("Entering get_balance_request function for request_id: {}", request_id);

    let request = state
        .requests
        .get(&actor, request_id)
        .await
        .map_err(|e| error_response(&e))?;

    let response = ApiResponse {
        data: request_dto(request),
        message: "Balance request retrieved successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::OK, Json(response)))
}

/// Delete a balance request
#[utoipa::path(
    delete,
    path = "/api/v1/balance-requests/{request_id}",
    tag = "balance-requests",
    params(
        ("request_id" = i32, Path, description = "Balance request ID"),
        ("x-actor-id" = i32, Header, description = "Acting account id"),
    ),
    responses(
        (status = 200, description = "Balance request deleted", body = ApiResponse<NotificationDto>),
        (status = 403, description = "Only superadmins can delete", body = ErrorResponse),
        (status = 404, description = "Balance request not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_balance_request(
    Path(request_id): Path<i32>,
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<(StatusCode, Json<ApiResponse<NotificationDto>>), HandlerError> {
    trace!("Entering delete_balance_request function for request_id: {}", request_id);

    state
        .requests
        .delete(&actor, request_id)
        .await
        .map_err(|e| error_response(&e))?;

    let notification = notification_dto(
        WorkflowEvent::RequestDeleted {
            request_id,
            actor_id: actor.id,
        }
        .notification(),
    );
    let response = ApiResponse {
        message: notification.body.clone(),
        data: notification,
        success: true,
    };
    Ok((StatusCode::OK, Json(response)))
}

/// Approve a pending balance request
#[utoipa::path(
    post,
    path = "/api/v1/balance-requests/{request_id}/approve",
    tag = "balance-requests",
    params(
        ("request_id" = i32, Path, description = "Balance request ID"),
        ("x-actor-id" = i32, Header, description = "Acting account id"),
    ),
    responses(
        (status = 200, description = "Balance request approved", body = ApiResponse<BalanceRequestOutcome>),
        (status = 403, description = "Only superadmins can approve", body = ErrorResponse),
        (status = 404, description = "Balance request not found", body = ErrorResponse),
        (status = 409, description = "Balance request is no longer pending", body = ErrorResponse),
        (status = 422, description = "Insufficient balance", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn approve_balance_request(
    Path(request_id): Path<i32>,
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<(StatusCode, Json<ApiResponse<BalanceRequestOutcome>>), HandlerError> {
    trace!("Entering approve_balance_request function for request_id: {}", request_id);

    let approval = state
        .requests
        .approve(&actor, request_id)
        .await
        .map_err(|e| error_response(&e))?;

    let notification = WorkflowEvent::RequestApproved {
        request_id,
        approver_id: actor.id,
        amount: approval.request.amount,
        remaining_balance: approval.remaining_balance,
    }
    .notification();

    info!(
        "Balance request {} approved, approver {} has {} left",
        request_id, actor.id, approval.remaining_balance
    );
    Ok((
        StatusCode::OK,
        Json(outcome(request_dto(approval.request), notification_dto(notification))),
    ))
}

/// Reject a pending balance request
#[utoipa::path(
    post,
    path = "/api/v1/balance-requests/{request_id}/reject",
    tag = "balance-requests",
    params(
        ("request_id" = i32, Path, description = "Balance request ID"),
        ("x-actor-id" = i32, Header, description = "Acting account id"),
    ),
    responses(
        (status = 200, description = "Balance request rejected", body = ApiResponse<BalanceRequestOutcome>),
        (status = 403, description = "Only superadmins can reject", body = ErrorResponse),
        (status = 404, description = "Balance request not found", body = ErrorResponse),
        (status = 409, description = "Balance request is no longer pending", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn reject_balance_request(
    Path(request_id): Path<i32>,
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<(StatusCode, Json<ApiResponse<BalanceRequestOutcome>>), HandlerError> {
    trace!("Entering reject_balance_request function for request_id: {}", request_id);

    let rejected = state
        .requests
        .reject(&actor, request_id)
        .await
        .map_err(|e| error_response(&e))?;

    let notification = WorkflowEvent::RequestRejected {
        request_id,
        approver_id: actor.id,
    }
    .notification();

    Ok((
        StatusCode::OK,
        Json(outcome(request_dto(rejected), notification_dto(notification))),
    ))
}

/// Superadmins a balance request can be addressed to
#[utoipa::path(
    get,
    path = "/api/v1/approvers",
    tag = "balance-requests",
    params(("x-actor-id" = i32, Header, description = "Acting account id")),
    responses(
        (status = 200, description = "Approvers retrieved successfully", body = ApiResponse<Vec<AccountDto>>),
        (status = 401, description = "Missing or unknown actor", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_approvers(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<(StatusCode, Json<ApiResponse<Vec<AccountDto>>>), HandlerError> {
    trace!("Entering get_approvers function");

    let approvers = state
        .requests
        .approvers(&actor)
        .await
        .map_err(|e| error_response(&e))?;

    let response = ApiResponse {
        data: approvers.into_iter().map(account_dto).collect(),
        message: "Approvers retrieved successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::OK, Json(response)))
}

fn outcome(
    request: BalanceRequestDto,
    notification: NotificationDto,
) -> ApiResponse<BalanceRequestOutcome> {
    ApiResponse {
        message: notification.body.clone(),
        data: BalanceRequestOutcome {
            request,
            notification,
        },
        success: true,
    }
}
