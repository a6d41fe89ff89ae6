//! Root of all SeaORM entity modules.
//! Accounts hold roles and balances, balance requests move through the
//! pending/approved/rejected lifecycle.

pub mod account;
pub mod balance_request;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::account::{AccountRole, Entity as Account};
    pub use super::balance_request::{Entity as BalanceRequest, RequestStatus};
}
