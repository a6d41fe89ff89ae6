use rust_decimal::Decimal;
use thiserror::Error;

/// Error types for the balance request workflow.
///
/// Every variant except `Database` is a definitive business-rule violation;
/// none of them is retried.
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// The actor lacks the role for the action or acts outside its visibility
    #[error("Not authorized: {0}")]
    Authorization(String),

    /// Malformed input, e.g. a non-positive amount or a missing approver
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The approver cannot fund the request at decision time
    #[error("Insufficient balance: {available} available, {requested} requested")]
    InsufficientBalance {
        available: Decimal,
        requested: Decimal,
    },

    /// The request (or the approver's balance) changed under us
    #[error("State conflict: {0}")]
    StateConflict(String),

    /// The referenced record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl WorkflowError {
    /// Stable machine readable code, used by the HTTP layer and in events.
    pub fn code(&self) -> &'static str {
        match self {
            WorkflowError::Authorization(_) => "FORBIDDEN",
            WorkflowError::Validation(_) => "VALIDATION_ERROR",
            WorkflowError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            WorkflowError::StateConflict(_) => "STATE_CONFLICT",
            WorkflowError::NotFound(_) => "NOT_FOUND",
            WorkflowError::Database(_) => "DATABASE_ERROR",
        }
    }

    pub fn request_not_found(request_id: i32) -> Self {
        WorkflowError::NotFound(format!("Balance request {} does not exist", request_id))
    }

    pub fn not_pending(request_id: i32) -> Self {
        WorkflowError::StateConflict(format!("Balance request {} is no longer pending", request_id))
    }
}

/// Type alias for Result with WorkflowError
pub type Result<T> = std::result::Result<T, WorkflowError>;
