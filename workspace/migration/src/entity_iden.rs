use model::entities::prelude::{Account, BalanceRequest};
use sea_orm::entity::prelude::*;
use sea_orm_migration::prelude::Alias;

/// Table and column identifiers taken from the SeaORM entities, so migrations
/// and the model always agree on names.
pub trait EntityIden: EntityTrait {
    /// Table identifier for this entity.
    fn table() -> Alias {
        Alias::new(Self::default().table_name())
    }

    /// Column identifier for one of this entity's columns.
    fn column<C: ColumnTrait>(column: C) -> Alias {
        Alias::new(column.as_str())
    }
}

impl EntityIden for Account {}
impl EntityIden for BalanceRequest {}
