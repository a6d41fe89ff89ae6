//! The balance request workflow: create, resolve, list and delete requests.
//!
//! Resolutions run inside a single database transaction and only commit if
//! the request is still `pending` and the approver's balance has not moved
//! since it was read. Any error drops the transaction, so callers never see a
//! half-applied approval.

use std::sync::Arc;

use chrono::Utc;
use model::entities::{account, balance_request};
use model::{AccountRole, RequestStatus};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info, instrument, trace, warn};

use crate::actor::Actor;
use crate::error::{Result, WorkflowError};
use crate::events::{EventSink, TracingSink, WorkflowEvent};
use crate::policy::{self, Action, Scope};
use crate::state::{self, Resolution};

/// Default page size of [`BalanceRequestWorkflow::list`].
pub const DEFAULT_PAGE_SIZE: u64 = 50;

/// Input of [`BalanceRequestWorkflow::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBalanceRequest {
    /// Raw amount as typed by the admin
    pub amount: String,
    /// The superadmin asked to approve
    pub approver_id: Option<i32>,
}

/// Listing options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestFilter {
    pub status: Option<RequestStatus>,
    /// 1-based page number
    pub page: u64,
    pub limit: u64,
}

impl Default for RequestFilter {
    fn default() -> Self {
        Self {
            status: None,
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// A successful approval together with what it cost the approver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Approval {
    pub request: balance_request::Model,
    pub remaining_balance: Decimal,
}

#[derive(Clone, Debug)]
pub struct BalanceRequestWorkflow {
    db: DatabaseConnection,
    events: Arc<dyn EventSink>,
}

impl BalanceRequestWorkflow {
    pub fn new(db: DatabaseConnection, events: Arc<dyn EventSink>) -> Self {
        Self { db, events }
    }

    /// Workflow whose events only go to the log.
    pub fn with_tracing(db: DatabaseConnection) -> Self {
        Self::new(db, Arc::new(TracingSink))
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// File a new pending request on behalf of an admin.
    #[instrument(skip(self))]
    pub async fn create(
        &self,
        actor: &Actor,
        input: NewBalanceRequest,
    ) -> Result<balance_request::Model> {
        let result = self.try_create(actor, input).await;
        self.emit(Action::CreateRequest, actor, None, &result, |request| {
            WorkflowEvent::RequestCreated {
                request_id: request.id,
                requester_id: request.requester_id,
                amount: request.amount,
            }
        });
        result
    }

    async fn try_create(
        &self,
        actor: &Actor,
        input: NewBalanceRequest,
    ) -> Result<balance_request::Model> {
        trace!("Entering try_create");
        policy::authorize(actor, Action::CreateRequest, None)?;

        let amount = state::parse_amount(&input.amount)?;
        let approver_id = input
            .approver_id
            .ok_or_else(|| WorkflowError::Validation("A superadmin must be selected".to_string()))?;

        match account::Entity::find_by_id(approver_id).one(&self.db).await? {
            Some(approver) if approver.is_superadmin() => {
                debug!("Nominated approver {} ({})", approver.id, approver.name);
            }
            Some(other) => {
                return Err(WorkflowError::Validation(format!(
                    "Account {} is not a superadmin",
                    other.id
                )));
            }
            None => {
                return Err(WorkflowError::Validation(format!(
                    "Superadmin {} does not exist",
                    approver_id
                )));
            }
        }

        let request = balance_request::ActiveModel {
            requester_id: Set(actor.id),
            nominated_approver_id: Set(approver_id),
            amount: Set(amount),
            status: Set(RequestStatus::Pending),
            approver_id: Set(None),
            created_at: Set(Utc::now()),
            resolved_at: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!(
            "Balance request {} created by {} for {}",
            request.id, actor.id, request.amount
        );
        Ok(request)
    }

    /// Approve a pending request, paying it out of the acting superadmin's
    /// balance.
    #[instrument(skip(self))]
    pub async fn approve(&self, actor: &Actor, request_id: i32) -> Result<Approval> {
        let result = self.try_approve(actor, request_id).await;
        self.emit(Action::ApproveRequest, actor, Some(request_id), &result, |approval| {
            WorkflowEvent::RequestApproved {
                request_id: approval.request.id,
                approver_id: actor.id,
                amount: approval.request.amount,
                remaining_balance: approval.remaining_balance,
            }
        });
        result
    }

    async fn try_approve(&self, actor: &Actor, request_id: i32) -> Result<Approval> {
        trace!("Entering try_approve for request {}", request_id);
        let txn = self.db.begin().await?;

        let request = find_request(&txn, request_id).await?;
        state::transition(request.id, request.status, Resolution::Approve)?;
        policy::authorize(actor, Action::ApproveRequest, Some(&request))?;

        let approver = account::Entity::find_by_id(actor.id)
            .one(&txn)
            .await?
            .ok_or_else(|| WorkflowError::NotFound(format!("Account {} does not exist", actor.id)))?;
        let remaining_balance = state::debit(approver.balance, request.amount)?;
        debug!(
            "Approver {} balance {} -> {}",
            approver.id, approver.balance, remaining_balance
        );

        mark_resolved(&txn, &request, Resolution::Approve, actor).await?;
        store_balance(&txn, &approver, remaining_balance).await?;

        let request = find_request(&txn, request_id).await?;
        txn.commit().await?;

        info!(
            "Balance request {} approved by {}, remaining balance {}",
            request.id, actor.id, remaining_balance
        );
        Ok(Approval {
            request,
            remaining_balance,
        })
    }

    /// Reject a pending request. Balances are not touched.
    #[instrument(skip(self))]
    pub async fn reject(&self, actor: &Actor, request_id: i32) -> Result<balance_request::Model> {
        let result = self.try_reject(actor, request_id).await;
        self.emit(Action::RejectRequest, actor, Some(request_id), &result, |request| {
            WorkflowEvent::RequestRejected {
                request_id: request.id,
                approver_id: actor.id,
            }
        });
        result
    }

    async fn try_reject(&self, actor: &Actor, request_id: i32) -> Result<balance_request::Model> {
        trace!("Entering try_reject for request {}", request_id);
        let txn = self.db.begin().await?;

        let request = find_request(&txn, request_id).await?;
        state::transition(request.id, request.status, Resolution::Reject)?;
        policy::authorize(actor, Action::RejectRequest, Some(&request))?;

        mark_resolved(&txn, &request, Resolution::Reject, actor).await?;

        let request = find_request(&txn, request_id).await?;
        txn.commit().await?;

        info!("Balance request {} rejected by {}", request.id, actor.id);
        Ok(request)
    }

    /// Requests visible to the actor, newest first.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        actor: &Actor,
        filter: RequestFilter,
    ) -> Result<Vec<balance_request::Model>> {
        policy::authorize(actor, Action::ListRequests, None)?;

        let mut query = balance_request::Entity::find();
        if let Scope::RequestedBy(requester_id) = policy::list_scope(actor) {
            query = query.filter(balance_request::Column::RequesterId.eq(requester_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(balance_request::Column::Status.eq(status));
        }

        let requests = query
            .order_by_desc(balance_request::Column::CreatedAt)
            .order_by_desc(balance_request::Column::Id)
            .paginate(&self.db, filter.limit.max(1))
            .fetch_page(filter.page.max(1) - 1)
            .await?;

        debug!("Actor {} sees {} balance requests", actor.id, requests.len());
        Ok(requests)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, actor: &Actor, request_id: i32) -> Result<balance_request::Model> {
        let request = find_request(&self.db, request_id).await?;
        policy::authorize(actor, Action::ViewRequest, Some(&request))?;
        Ok(request)
    }

    /// Remove a request. Only superadmins may do this.
    #[instrument(skip(self))]
    pub async fn delete(&self, actor: &Actor, request_id: i32) -> Result<()> {
        let result = self.try_delete(actor, request_id).await;
        self.emit(Action::DeleteRequest, actor, Some(request_id), &result, |_| {
            WorkflowEvent::RequestDeleted {
                request_id,
                actor_id: actor.id,
            }
        });
        result
    }

    async fn try_delete(&self, actor: &Actor, request_id: i32) -> Result<()> {
        let request = find_request(&self.db, request_id).await?;
        policy::authorize(actor, Action::DeleteRequest, Some(&request))?;

        let deleted = balance_request::Entity::delete_by_id(request_id)
            .exec(&self.db)
            .await?;
        if deleted.rows_affected == 0 {
            return Err(WorkflowError::request_not_found(request_id));
        }

        info!("Balance request {} deleted by {}", request_id, actor.id);
        Ok(())
    }

    /// Superadmins a request can be addressed to, by name.
    #[instrument(skip(self))]
    pub async fn approvers(&self, actor: &Actor) -> Result<Vec<account::Model>> {
        policy::authorize(actor, Action::ListApprovers, None)?;

        let approvers = account::Entity::find()
            .filter(account::Column::Role.eq(AccountRole::Superadmin))
            .order_by_asc(account::Column::Name)
            .all(&self.db)
            .await?;
        Ok(approvers)
    }

    fn emit<T>(
        &self,
        action: Action,
        actor: &Actor,
        request_id: Option<i32>,
        result: &Result<T>,
        on_success: impl FnOnce(&T) -> WorkflowEvent,
    ) {
        let event = match result {
            Ok(value) => on_success(value),
            Err(error) => WorkflowEvent::failed(action, actor.id, request_id, error),
        };
        self.events.publish(&event);
    }
}

async fn find_request<C: ConnectionTrait>(
    conn: &C,
    request_id: i32,
) -> Result<balance_request::Model> {
    balance_request::Entity::find_by_id(request_id)
        .one(conn)
        .await?
        .ok_or_else(|| WorkflowError::request_not_found(request_id))
}

/// Move a request out of `pending`, unless someone else already did.
pub(crate) async fn mark_resolved<C: ConnectionTrait>(
    conn: &C,
    request: &balance_request::Model,
    resolution: Resolution,
    actor: &Actor,
) -> Result<()> {
    let updated = balance_request::Entity::update_many()
        .col_expr(balance_request::Column::Status, Expr::value(resolution.target()))
        .col_expr(balance_request::Column::ApproverId, Expr::value(actor.id))
        .col_expr(balance_request::Column::ResolvedAt, Expr::value(Utc::now()))
        .filter(balance_request::Column::Id.eq(request.id))
        .filter(balance_request::Column::Status.eq(RequestStatus::Pending))
        .exec(conn)
        .await?;

    if updated.rows_affected == 0 {
        warn!("Balance request {} was resolved concurrently", request.id);
        return Err(WorkflowError::not_pending(request.id));
    }
    Ok(())
}

/// Write `balance` to the account, unless its version moved past the one in
/// `account`.
pub(crate) async fn store_balance<C: ConnectionTrait>(
    conn: &C,
    account: &account::Model,
    balance: Decimal,
) -> Result<()> {
    let updated = account::Entity::update_many()
        .col_expr(account::Column::Balance, Expr::value(balance))
        .col_expr(account::Column::Version, Expr::value(account.version + 1))
        .filter(account::Column::Id.eq(account.id))
        .filter(account::Column::Version.eq(account.version))
        .exec(conn)
        .await?;

    if updated.rows_affected == 0 {
        warn!("Balance of account {} changed during approval", account.id);
        return Err(WorkflowError::StateConflict(format!(
            "Balance of account {} changed concurrently",
            account.id
        )));
    }
    Ok(())
}
