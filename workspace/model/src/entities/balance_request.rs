use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::account;

/// Lifecycle state of a balance request.
///
/// `Pending` is the only initial state; `Approved` and `Rejected` are terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(RequestStatus::Pending),
            "approved" => Ok(RequestStatus::Approved),
            "rejected" => Ok(RequestStatus::Rejected),
            other => Err(format!("Unknown request status: {}", other)),
        }
    }
}

/// An admin's request for a superadmin to transfer funds into the admin's
/// available balance.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "balance_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// The admin that created the request.
    pub requester_id: i32,
    /// The superadmin selected when the request was filed. Informational only:
    /// any superadmin may resolve the request.
    pub nominated_approver_id: i32,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub amount: Decimal,
    pub status: RequestStatus,
    /// The superadmin that resolved the request; set iff status is terminal.
    pub approver_id: Option<i32>,
    pub created_at: DateTimeUtc,
    pub resolved_at: Option<DateTimeUtc>,
}

impl Model {
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::RequesterId",
        to = "super::account::Column::Id"
    )]
    Requester,
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::NominatedApproverId",
        to = "super::account::Column::Id"
    )]
    NominatedApprover,
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::ApproverId",
        to = "super::account::Column::Id"
    )]
    Approver,
}

impl Related<account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Requester.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
