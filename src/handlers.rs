pub mod accounts;
pub mod balance_requests;
pub mod health;

use axum::{http::StatusCode, response::Json};
use common::{format_amount, AccountDto, BalanceRequestDto, NotificationDto};
use model::entities::{account, balance_request};
use tracing::{error, warn};
use workflow::{Notification, WorkflowError};

use crate::schemas::ErrorResponse;

/// Error half of every handler result
pub type HandlerError = (StatusCode, Json<ErrorResponse>);

/// Map a workflow error onto its HTTP status and error body.
pub fn error_response(err: &WorkflowError) -> HandlerError {
    let status = match err {
        WorkflowError::Validation(_) => StatusCode::BAD_REQUEST,
        WorkflowError::Authorization(_) => StatusCode::FORBIDDEN,
        WorkflowError::NotFound(_) => StatusCode::NOT_FOUND,
        WorkflowError::StateConflict(_) => StatusCode::CONFLICT,
        WorkflowError::InsufficientBalance { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        WorkflowError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        error!("Request failed: {}", err);
    } else {
        warn!("Request rejected with {}: {}", status, err);
    }

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            code: err.code().to_string(),
            success: false,
        }),
    )
}

pub fn request_dto(model: balance_request::Model) -> BalanceRequestDto {
    BalanceRequestDto {
        id: model.id,
        requester_id: model.requester_id,
        nominated_approver_id: model.nominated_approver_id,
        amount: model.amount,
        amount_display: format_amount(model.amount),
        status: model.status.to_string(),
        approver_id: model.approver_id,
        created_at: model.created_at,
        resolved_at: model.resolved_at,
    }
}

pub fn account_dto(model: account::Model) -> AccountDto {
    AccountDto {
        id: model.id,
        name: model.name,
        role: model.role.to_string(),
        balance: model.balance,
        created_at: model.created_at,
    }
}

pub fn notification_dto(notification: Notification) -> NotificationDto {
    NotificationDto {
        title: notification.title,
        body: notification.body,
        severity: notification.severity.as_str().to_string(),
    }
}
