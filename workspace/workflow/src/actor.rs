use model::entities::account;
use model::AccountRole;

/// The account on whose behalf an operation runs.
///
/// Callers resolve it from their own authentication layer and pass it into
/// every workflow call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: i32,
    pub role: AccountRole,
}

impl Actor {
    pub fn new(id: i32, role: AccountRole) -> Self {
        Self { id, role }
    }

    pub fn is_superadmin(&self) -> bool {
        self.role == AccountRole::Superadmin
    }
}

impl From<&account::Model> for Actor {
    fn from(model: &account::Model) -> Self {
        Self::new(model.id, model.role)
    }
}
