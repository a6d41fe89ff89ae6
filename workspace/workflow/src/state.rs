//! The balance request state machine and the balance arithmetic around it.
//!
//! Everything here is pure; persistence and atomicity are handled by
//! [`crate::requests`].

use std::str::FromStr;

use common::MINOR_UNIT_DIGITS;
use model::RequestStatus;
use rust_decimal::Decimal;

use crate::error::{Result, WorkflowError};

/// The two ways a pending request can be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Approve,
    Reject,
}

impl Resolution {
    pub fn target(&self) -> RequestStatus {
        match self {
            Resolution::Approve => RequestStatus::Approved,
            Resolution::Reject => RequestStatus::Rejected,
        }
    }
}

/// Next status for `current` under `resolution`.
///
/// Only `pending` can be left, and only once.
pub fn transition(
    request_id: i32,
    current: RequestStatus,
    resolution: Resolution,
) -> Result<RequestStatus> {
    match current {
        RequestStatus::Pending => Ok(resolution.target()),
        RequestStatus::Approved | RequestStatus::Rejected => {
            Err(WorkflowError::not_pending(request_id))
        }
    }
}

/// Parse a user supplied amount.
///
/// The amount must be a plain decimal, strictly positive and carry at most
/// [`MINOR_UNIT_DIGITS`] fractional digits.
pub fn parse_amount(raw: &str) -> Result<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(WorkflowError::Validation("Amount is required".to_string()));
    }
    if !is_plain_decimal(trimmed) {
        return Err(WorkflowError::Validation(format!("Amount '{}' is not a number", trimmed)));
    }

    let amount = Decimal::from_str(trimmed)
        .map_err(|_| WorkflowError::Validation(format!("Amount '{}' is not a number", trimmed)))?;

    validate_amount(amount)?;
    Ok(amount.normalize())
}

/// An optional sign, then digits with at most one decimal point. Rejects the
/// exponent and digit separator forms `Decimal::from_str` would accept.
fn is_plain_decimal(raw: &str) -> bool {
    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    let mut parts = unsigned.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next().unwrap_or_default();
    let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());

    (!whole.is_empty() || !fraction.is_empty()) && all_digits(whole) && all_digits(fraction)
}

/// Check an already numeric amount.
pub fn validate_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(WorkflowError::Validation(format!(
            "Amount must be greater than zero, got {}",
            amount
        )));
    }
    if amount.normalize().scale() > MINOR_UNIT_DIGITS {
        return Err(WorkflowError::Validation(format!(
            "Amount {} has more than {} decimal places",
            amount, MINOR_UNIT_DIGITS
        )));
    }
    Ok(())
}

/// Balance left after paying `amount` out of `balance`.
pub fn debit(balance: Decimal, amount: Decimal) -> Result<Decimal> {
    if balance < amount {
        return Err(WorkflowError::InsufficientBalance {
            available: balance,
            requested: amount,
        });
    }
    Ok(balance - amount)
}
