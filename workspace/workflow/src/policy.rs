//! Authorization policy.
//!
//! Every entry point asks [`evaluate`] (or [`authorize`]) whether the actor
//! may perform an action on a resource. Role checks live nowhere else.

use std::fmt;

use model::entities::balance_request;
use model::AccountRole;
use tracing::debug;

use crate::actor::Actor;
use crate::error::{Result, WorkflowError};

/// Everything an actor can attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    CreateRequest,
    ViewRequest,
    ListRequests,
    ApproveRequest,
    RejectRequest,
    DeleteRequest,
    ListApprovers,
    ManageAccounts,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::CreateRequest => "create",
            Action::ViewRequest => "view",
            Action::ListRequests => "list",
            Action::ApproveRequest => "approve",
            Action::RejectRequest => "reject",
            Action::DeleteRequest => "delete",
            Action::ListApprovers => "list_approvers",
            Action::ManageAccounts => "manage_accounts",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a policy evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(String),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Which balance requests an actor may see in a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    All,
    RequestedBy(i32),
}

/// Map (actor role, action, resource) to a decision.
pub fn evaluate(
    actor: &Actor,
    action: Action,
    resource: Option<&balance_request::Model>,
) -> Decision {
    use AccountRole::*;
    use Action::*;

    let decision = match (actor.role, action) {
        (Admin, CreateRequest) => Decision::Allow,
        (Superadmin, CreateRequest) => {
            Decision::Deny("Only admins can create balance requests".to_string())
        }

        (Admin, ViewRequest) => match resource {
            Some(request) if request.requester_id == actor.id => Decision::Allow,
            Some(request) => Decision::Deny(format!(
                "Balance request {} belongs to another admin",
                request.id
            )),
            None => Decision::Allow,
        },
        (Superadmin, ViewRequest) => Decision::Allow,

        (_, ListRequests) | (_, ListApprovers) => Decision::Allow,

        (Superadmin, ApproveRequest) | (Superadmin, RejectRequest) => Decision::Allow,
        (Admin, ApproveRequest) | (Admin, RejectRequest) => {
            Decision::Deny("Only superadmins can resolve balance requests".to_string())
        }

        (Superadmin, DeleteRequest) => Decision::Allow,
        (Admin, DeleteRequest) => {
            Decision::Deny("Only superadmins can delete balance requests".to_string())
        }

        (Superadmin, ManageAccounts) => Decision::Allow,
        (Admin, ManageAccounts) => {
            Decision::Deny("Only superadmins can manage accounts".to_string())
        }
    };

    debug!(actor_id = actor.id, role = %actor.role, %action, ?decision, "Policy evaluated");
    decision
}

/// Like [`evaluate`], but a denial becomes [`WorkflowError::Authorization`].
pub fn authorize(
    actor: &Actor,
    action: Action,
    resource: Option<&balance_request::Model>,
) -> Result<()> {
    match evaluate(actor, action, resource) {
        Decision::Allow => Ok(()),
        Decision::Deny(reason) => Err(WorkflowError::Authorization(reason)),
    }
}

/// Admins only ever see their own requests.
pub fn list_scope(actor: &Actor) -> Scope {
    match actor.role {
        AccountRole::Admin => Scope::RequestedBy(actor.id),
        AccountRole::Superadmin => Scope::All,
    }
}
