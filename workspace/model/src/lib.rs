pub mod entities;

pub use entities::account::AccountRole;
pub use entities::balance_request::RequestStatus;
