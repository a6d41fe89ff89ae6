//! The balance request workflow.
//!
//! Admins file balance requests addressed to a superadmin. Superadmins approve
//! them (paying the amount out of their own balance) or reject them. Every
//! call names its [`Actor`] explicitly and is checked against a single
//! [`policy`].

pub mod accounts;
pub mod actor;
pub mod error;
pub mod events;
pub mod policy;
pub mod requests;
pub mod state;


pub use accounts::{AccountDirectory, NewAccount};
pub use actor::Actor;
pub use error::{Result, WorkflowError};
pub use events::{EventSink, Notification, RecordingSink, Severity, TracingSink, WorkflowEvent};
pub use policy::{Action, Decision};
pub use requests::{Approval, BalanceRequestWorkflow, NewBalanceRequest, RequestFilter};
pub use state::Resolution;
