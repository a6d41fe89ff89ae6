use rust_decimal::Decimal;
use sea_orm::DbErr;

use super::helpers::{new_admin, new_superadmin};
use super::setup_db;
use crate::accounts::{AccountDirectory, NewAccount};
use crate::error::WorkflowError;
use model::AccountRole;

fn account(name: &str, role: AccountRole, balance: Decimal) -> NewAccount {
    NewAccount {
        name: name.to_string(),
        role,
        balance,
    }
}

#[tokio::test]
async fn test_bootstrap_and_resolve_actor() -> Result<(), DbErr> {
    let directory = AccountDirectory::new(setup_db().await?);

    let boss = directory
        .bootstrap(account("  head  ", AccountRole::Superadmin, Decimal::new(100_000, 2)))
        .await
        .unwrap();
    assert_eq!(boss.name, "head");
    assert_eq!(boss.balance, Decimal::new(1000, 0));
    assert_eq!(boss.version, 0);

    let actor = directory.resolve_actor(boss.id).await.unwrap();
    assert!(actor.is_superadmin());
    assert_eq!(actor.id, boss.id);

    assert!(matches!(
        directory.resolve_actor(boss.id + 1).await.unwrap_err(),
        WorkflowError::NotFound(_)
    ));
    Ok(())
}

#[tokio::test]
async fn test_only_superadmins_manage_accounts() -> Result<(), DbErr> {
    let db = setup_db().await?;
    let directory = AccountDirectory::new(db.clone());
    let (_, admin) = new_admin(&db, "branch").await?;
    let (_, boss) = new_superadmin(&db, "head", 0).await?;

    let err = directory
        .create(&admin, account("sneaky", AccountRole::Superadmin, Decimal::ZERO))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Authorization(_)));
    assert!(matches!(
        directory.list(&admin).await.unwrap_err(),
        WorkflowError::Authorization(_)
    ));

    directory
        .create(&boss, account("new-branch", AccountRole::Admin, Decimal::ZERO))
        .await
        .unwrap();
    let names: Vec<String> = directory
        .list(&boss)
        .await
        .unwrap()
        .into_iter()
        .map(|account| account.name)
        .collect();
    assert_eq!(names, vec!["branch", "head", "new-branch"]);
    Ok(())
}

#[tokio::test]
async fn test_account_validation() -> Result<(), DbErr> {
    let directory = AccountDirectory::new(setup_db().await?);
    directory
        .bootstrap(account("head", AccountRole::Superadmin, Decimal::ZERO))
        .await
        .unwrap();

    for input in [
        account("   ", AccountRole::Admin, Decimal::ZERO),
        account("broke", AccountRole::Admin, Decimal::new(-1, 0)),
        account("precise", AccountRole::Admin, Decimal::new(1001, 3)),
        account("head", AccountRole::Admin, Decimal::ZERO),
    ] {
        let err = directory.bootstrap(input.clone()).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)), "{:?} gave {:?}", input, err);
    }
    Ok(())
}
