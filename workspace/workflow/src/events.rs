//! Workflow events and the notifications derived from them.
//!
//! The workflow publishes one event per attempted mutation to an
//! [`EventSink`]. Presentation layers turn them into toasts via
//! [`WorkflowEvent::notification`].

use std::fmt;
use std::sync::Mutex;

use common::format_amount;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::error::WorkflowError;
use crate::policy::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Danger,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Danger => "danger",
        }
    }
}

/// A user facing message: title, body and how alarming it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub severity: Severity,
}

impl Notification {
    fn new(title: &str, body: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.to_string(),
            body: body.into(),
            severity,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowEvent {
    RequestCreated {
        request_id: i32,
        requester_id: i32,
        amount: Decimal,
    },
    RequestApproved {
        request_id: i32,
        approver_id: i32,
        amount: Decimal,
        remaining_balance: Decimal,
    },
    RequestRejected {
        request_id: i32,
        approver_id: i32,
    },
    RequestDeleted {
        request_id: i32,
        actor_id: i32,
    },
    ActionFailed {
        action: Action,
        actor_id: i32,
        request_id: Option<i32>,
        code: &'static str,
        message: String,
    },
}

impl WorkflowEvent {
    pub fn failed(
        action: Action,
        actor_id: i32,
        request_id: Option<i32>,
        error: &WorkflowError,
    ) -> Self {
        WorkflowEvent::ActionFailed {
            action,
            actor_id,
            request_id,
            code: error.code(),
            message: error.to_string(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, WorkflowEvent::ActionFailed { .. })
    }

    pub fn notification(&self) -> Notification {
        match self {
            WorkflowEvent::RequestCreated { amount, .. } => Notification::new(
                "Balance Request Submitted",
                format!("Your request for {} has been sent for approval.", format_amount(*amount)),
                Severity::Success,
            ),
            WorkflowEvent::RequestApproved { .. } => Notification::new(
                "Balance Request Approved",
                "You have successfully approved the balance request.",
                Severity::Success,
            ),
            WorkflowEvent::RequestRejected { .. } => Notification::new(
                "Balance Request Rejected",
                "The balance request has been rejected.",
                Severity::Warning,
            ),
            WorkflowEvent::RequestDeleted { .. } => Notification::new(
                "Balance Request Deleted",
                "The balance request has been deleted.",
                Severity::Success,
            ),
            WorkflowEvent::ActionFailed { code, message, .. } => match *code {
                "INSUFFICIENT_BALANCE" => Notification::new(
                    "Insufficient Balance",
                    "You do not have enough balance to approve this request.",
                    Severity::Danger,
                ),
                "STATE_CONFLICT" => Notification::new(
                    "Request Already Resolved",
                    "This balance request is no longer pending.",
                    Severity::Warning,
                ),
                "FORBIDDEN" => Notification::new("Action Not Allowed", message.clone(), Severity::Danger),
                "VALIDATION_ERROR" => {
                    Notification::new("Invalid Balance Request", message.clone(), Severity::Danger)
                }
                "NOT_FOUND" => Notification::new("Not Found", message.clone(), Severity::Danger),
                _ => Notification::new(
                    "Something Went Wrong",
                    "The action could not be completed. Please try again later.",
                    Severity::Danger,
                ),
            },
        }
    }
}

/// Consumer of workflow events.
pub trait EventSink: Send + Sync + fmt::Debug {
    fn publish(&self, event: &WorkflowEvent);
}

/// Writes every event to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn publish(&self, event: &WorkflowEvent) {
        let notification = event.notification();
        if event.is_failure() {
            warn!(?event, title = %notification.title, "Balance request action failed");
        } else {
            info!(?event, title = %notification.title, "Balance request action succeeded");
        }
    }
}

/// Keeps every published event in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<WorkflowEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<WorkflowEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, event: &WorkflowEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
