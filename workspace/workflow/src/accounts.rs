//! Account administration and actor resolution.

use chrono::Utc;
use common::MINOR_UNIT_DIGITS;
use model::entities::account;
use model::AccountRole;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{debug, info, instrument, warn};

use crate::actor::Actor;
use crate::error::{Result, WorkflowError};
use crate::policy::{self, Action};

/// Input of [`AccountDirectory::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub name: String,
    pub role: AccountRole,
    pub balance: Decimal,
}

#[derive(Clone, Debug)]
pub struct AccountDirectory {
    db: DatabaseConnection,
}

impl AccountDirectory {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create an account on behalf of a superadmin.
    #[instrument(skip(self))]
    pub async fn create(&self, actor: &Actor, input: NewAccount) -> Result<account::Model> {
        policy::authorize(actor, Action::ManageAccounts, None)?;
        self.insert(input).await
    }

    /// Create an account without an acting account. Used by the CLI to seed
    /// the first superadmin.
    #[instrument(skip(self))]
    pub async fn bootstrap(&self, input: NewAccount) -> Result<account::Model> {
        self.insert(input).await
    }

    async fn insert(&self, input: NewAccount) -> Result<account::Model> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(WorkflowError::Validation("Account name is required".to_string()));
        }
        if input.balance < Decimal::ZERO {
            return Err(WorkflowError::Validation(format!(
                "Opening balance cannot be negative, got {}",
                input.balance
            )));
        }
        if input.balance.normalize().scale() > MINOR_UNIT_DIGITS {
            return Err(WorkflowError::Validation(format!(
                "Opening balance {} has more than {} decimal places",
                input.balance, MINOR_UNIT_DIGITS
            )));
        }

        let taken = account::Entity::find()
            .filter(account::Column::Name.eq(name.as_str()))
            .one(&self.db)
            .await?;
        if taken.is_some() {
            warn!("Account name '{}' already taken", name);
            return Err(WorkflowError::Validation(format!(
                "Account name '{}' is already taken",
                name
            )));
        }

        let account = account::ActiveModel {
            name: Set(name),
            role: Set(input.role),
            balance: Set(input.balance.normalize()),
            version: Set(0),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!(
            "Created {} account {} ({}) with balance {}",
            account.role, account.id, account.name, account.balance
        );
        Ok(account)
    }

    #[instrument(skip(self))]
    pub async fn list(&self, actor: &Actor) -> Result<Vec<account::Model>> {
        policy::authorize(actor, Action::ManageAccounts, None)?;

        let accounts = account::Entity::find()
            .order_by_asc(account::Column::Id)
            .all(&self.db)
            .await?;
        debug!("Listed {} accounts", accounts.len());
        Ok(accounts)
    }

    pub async fn find(&self, account_id: i32) -> Result<account::Model> {
        account::Entity::find_by_id(account_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| WorkflowError::NotFound(format!("Account {} does not exist", account_id)))
    }

    /// The [`Actor`] for an account id.
    pub async fn resolve_actor(&self, account_id: i32) -> Result<Actor> {
        let account = self.find(account_id).await?;
        Ok(Actor::from(&account))
    }
}
