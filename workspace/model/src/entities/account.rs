use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The role an account holds in the funds administration panel.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    /// May create balance requests and see its own.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// May resolve balance requests; approvals are funded from its balance.
    #[sea_orm(string_value = "superadmin")]
    Superadmin,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Admin => "admin",
            AccountRole::Superadmin => "superadmin",
        }
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountRole {
    type Err = String;

    /// Role names are matched case-insensitively ("SUPERADMIN" is accepted).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(AccountRole::Admin),
            "superadmin" => Ok(AccountRole::Superadmin),
            other => Err(format!("Unknown account role: {}", other)),
        }
    }
}

/// An account of the panel. Admins request funds, superadmins hold the
/// balance that approved requests are paid from.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub role: AccountRole,
    /// Never negative.
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub balance: Decimal,
    /// Bumped on every balance change; guards concurrent debits.
    pub version: i32,
    pub created_at: DateTimeUtc,
}

impl Model {
    pub fn is_superadmin(&self) -> bool {
        self.role == AccountRole::Superadmin
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
