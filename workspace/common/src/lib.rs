//! Common transport-layer types shared between the server and its clients.
//! These structs are the request/response payloads of the HTTP API, so a
//! client can deserialize responses without duplicating shapes.

mod money;

pub use money::{format_amount, MINOR_UNIT_DIGITS};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic API response wrapper used by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}

// ===================== Accounts =====================

/// Request body for creating a panel account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct CreateAccountRequest {
    /// Display name (must be unique)
    pub name: String,
    /// "admin" or "superadmin"
    pub role: String,
    /// Opening balance (default: 0)
    #[schema(value_type = Option<String>, example = "1000.00")]
    pub balance: Option<Decimal>,
}

/// Account response model.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct AccountDto {
    pub id: i32,
    pub name: String,
    pub role: String,
    #[schema(value_type = String, example = "1000.00")]
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
}

// ===================== Balance requests =====================

/// Request body for filing a balance request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct CreateBalanceRequest {
    /// Requested amount as a decimal string, e.g. "500.00"
    #[schema(example = "500.00")]
    pub amount: String,
    /// The superadmin asked to approve the request
    pub approver_id: Option<i32>,
}

/// Balance request response model.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct BalanceRequestDto {
    pub id: i32,
    pub requester_id: i32,
    pub nominated_approver_id: i32,
    #[schema(value_type = String, example = "500.00")]
    pub amount: Decimal,
    /// Amount formatted with currency, for display
    pub amount_display: String,
    /// "pending", "approved" or "rejected"
    pub status: String,
    /// The superadmin that resolved the request, if any
    pub approver_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// A user facing message describing the outcome of an action.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct NotificationDto {
    pub title: String,
    pub body: String,
    /// "success", "warning" or "danger"
    pub severity: String,
}

/// Result of a state changing action on a balance request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct BalanceRequestOutcome {
    pub request: BalanceRequestDto,
    pub notification: NotificationDto,
}
