use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, Set};

use model::entities::{account, balance_request};
use model::{AccountRole, RequestStatus};

use crate::actor::Actor;

pub type Result<T> = std::result::Result<T, DbErr>;

pub async fn new_account(
    db: &DatabaseConnection,
    name: &str,
    role: AccountRole,
    balance: i64,
) -> Result<(account::Model, Actor)> {
    let account = account::ActiveModel {
        name: Set(name.to_string()),
        role: Set(role),
        balance: Set(Decimal::new(balance, 0)),
        version: Set(0),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let actor = Actor::from(&account);
    Ok((account, actor))
}

pub async fn new_admin(db: &DatabaseConnection, name: &str) -> Result<(account::Model, Actor)> {
    new_account(db, name, AccountRole::Admin, 0).await
}

pub async fn new_superadmin(
    db: &DatabaseConnection,
    name: &str,
    balance: i64,
) -> Result<(account::Model, Actor)> {
    new_account(db, name, AccountRole::Superadmin, balance).await
}

/// Insert a pending request directly, `age_minutes` in the past.
pub async fn new_pending_request(
    db: &DatabaseConnection,
    requester: &Actor,
    approver: &Actor,
    amount: i64,
    age_minutes: i64,
) -> Result<balance_request::Model> {
    balance_request::ActiveModel {
        requester_id: Set(requester.id),
        nominated_approver_id: Set(approver.id),
        amount: Set(Decimal::new(amount, 0)),
        status: Set(RequestStatus::Pending),
        approver_id: Set(None),
        created_at: Set(Utc::now() - Duration::minutes(age_minutes)),
        resolved_at: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn balance_of(db: &DatabaseConnection, account_id: i32) -> Result<Decimal> {
    let account = account::Entity::find_by_id(account_id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("account {}", account_id)))?;
    Ok(account.balance)
}

pub async fn reload(db: &DatabaseConnection, request_id: i32) -> Result<balance_request::Model> {
    balance_request::Entity::find_by_id(request_id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("balance request {}", request_id)))
}

pub async fn request_count(db: &DatabaseConnection) -> Result<usize> {
    Ok(balance_request::Entity::find().all(db).await?.len())
}
