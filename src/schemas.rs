pub use common::{
    AccountDto, ApiResponse, BalanceRequestDto, BalanceRequestOutcome, CreateAccountRequest,
    CreateBalanceRequest, NotificationDto,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use workflow::{AccountDirectory, BalanceRequestWorkflow};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Balance request workflow
    pub requests: BalanceRequestWorkflow,
    /// Accounts and actor resolution
    pub accounts: AccountDirectory,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::balance_requests::get_balance_requests,
        crate::handlers::balance_requests::create_balance_request,
        crate::handlers::balance_requests::get_balance_request,
        crate::handlers::balance_requests::delete_balance_request,
        crate::handlers::balance_requests::approve_balance_request,
        crate::handlers::balance_requests::reject_balance_request,
        crate::handlers::balance_requests::get_approvers,
        crate::handlers::accounts::get_accounts,
        crate::handlers::accounts::create_account,
    ),
    components(
        schemas(
            ApiResponse<BalanceRequestOutcome>,
            ApiResponse<BalanceRequestDto>,
            ApiResponse<Vec<BalanceRequestDto>>,
            ApiResponse<NotificationDto>,
            ApiResponse<AccountDto>,
            ApiResponse<Vec<AccountDto>>,
            ErrorResponse,
            HealthResponse,
            CreateBalanceRequest,
            CreateAccountRequest,
            BalanceRequestDto,
            BalanceRequestOutcome,
            NotificationDto,
            AccountDto,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "balance-requests", description = "Balance request workflow"),
        (name = "accounts", description = "Account administration"),
    ),
    info(
        title = "fundsadmin API",
        description = "Balance request approval service. Admins ask superadmins for funds; superadmins approve from their own balance or reject.",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
