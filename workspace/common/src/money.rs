//! Money formatting for display purposes.
//!
//! Amounts are stored and transported as plain decimals; this module turns
//! them into the human readable form the panel shows (Bangladeshi taka).

use rust_decimal::Decimal;
use rusty_money::{iso, Money};

/// Number of fractional digits a monetary amount may carry.
pub const MINOR_UNIT_DIGITS: u32 = 2;

/// Format an amount for display, e.g. in notifications and list views.
pub fn format_amount(amount: Decimal) -> String {
    Money::from_decimal(amount.round_dp(MINOR_UNIT_DIGITS), iso::BDT).to_string()
}
