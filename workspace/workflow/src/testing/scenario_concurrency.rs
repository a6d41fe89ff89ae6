use rust_decimal::Decimal;
use sea_orm::DbErr;
use tempfile::TempDir;

use super::helpers::{balance_of, new_admin, new_pending_request, new_superadmin, reload};
use super::{setup_shared_workflow, setup_workflow};
use crate::error::WorkflowError;
use crate::requests::{mark_resolved, store_balance};
use crate::state::Resolution;
use model::RequestStatus;

const ROUNDS: usize = 10;

/// How a losing approval may end: it saw the winner's commit, or SQLite
/// aborted it on the write lock.
fn lost_the_race(err: &WorkflowError) -> bool {
    match err {
        WorkflowError::StateConflict(_) | WorkflowError::InsufficientBalance { .. } => true,
        WorkflowError::Database(db) => db.to_string().contains("locked"),
        _ => false,
    }
}

#[tokio::test]
async fn test_double_approval_pays_once() -> Result<(), DbErr> {
    let (workflow, sink) = setup_workflow().await?;
    let db = workflow.db().clone();
    let (_, admin) = new_admin(&db, "branch").await?;
    let (_, boss) = new_superadmin(&db, "head", 700).await?;
    let request = new_pending_request(&db, &admin, &boss, 500, 0).await?;

    let first = workflow.clone();
    let second = workflow.clone();
    let (a, b) = tokio::join!(first.approve(&boss, request.id), second.approve(&boss, request.id));

    let (won, lost) = match (a, b) {
        (Ok(won), Err(lost)) | (Err(lost), Ok(won)) => (won, lost),
        other => panic!("exactly one approval must succeed, got {:?}", other),
    };
    assert!(matches!(lost, WorkflowError::StateConflict(_)), "loser got {:?}", lost);
    assert_eq!(won.request.status, RequestStatus::Approved);

    assert_eq!(balance_of(&db, boss.id).await?, Decimal::new(200, 0));
    assert_eq!(reload(&db, request.id).await?.status, RequestStatus::Approved);
    assert_eq!(sink.events().iter().filter(|event| event.is_failure()).count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_parallel_approvals_from_one_balance_never_overdraw() -> Result<(), DbErr> {
    let (workflow, _) = setup_workflow().await?;
    let db = workflow.db().clone();
    let (_, admin) = new_admin(&db, "branch").await?;
    let (_, boss) = new_superadmin(&db, "head", 1000).await?;
    let first = new_pending_request(&db, &admin, &boss, 600, 1).await?;
    let second = new_pending_request(&db, &admin, &boss, 600, 0).await?;

    let (a, b) = tokio::join!(workflow.approve(&boss, first.id), workflow.approve(&boss, second.id));

    let outcomes = [a, b];
    let approved = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    assert_eq!(approved, 1);
    for outcome in &outcomes {
        if let Err(err) = outcome {
            assert!(
                matches!(
                    err,
                    WorkflowError::InsufficientBalance { .. } | WorkflowError::StateConflict(_)
                ),
                "unexpected error {:?}",
                err
            );
        }
    }

    assert_eq!(balance_of(&db, boss.id).await?, Decimal::new(400, 0));
    let statuses = [
        reload(&db, first.id).await?.status,
        reload(&db, second.id).await?.status,
    ];
    assert_eq!(statuses.iter().filter(|s| **s == RequestStatus::Pending).count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_approve_and_reject_race() -> Result<(), DbErr> {
    let (workflow, _) = setup_workflow().await?;
    let db = workflow.db().clone();
    let (_, admin) = new_admin(&db, "branch").await?;
    let (_, boss) = new_superadmin(&db, "head", 1000).await?;
    let (_, deputy) = new_superadmin(&db, "deputy", 1000).await?;
    let request = new_pending_request(&db, &admin, &boss, 250, 0).await?;

    let (approved, rejected) = tokio::join!(
        workflow.approve(&boss, request.id),
        workflow.reject(&deputy, request.id)
    );
    assert!(approved.is_ok() != rejected.is_ok());

    let stored = reload(&db, request.id).await?;
    match stored.status {
        RequestStatus::Approved => {
            assert_eq!(stored.approver_id, Some(boss.id));
            assert_eq!(balance_of(&db, boss.id).await?, Decimal::new(750, 0));
        }
        RequestStatus::Rejected => {
            assert_eq!(stored.approver_id, Some(deputy.id));
            assert_eq!(balance_of(&db, boss.id).await?, Decimal::new(1000, 0));
        }
        RequestStatus::Pending => panic!("request must be resolved"),
    }
    assert_eq!(balance_of(&db, deputy.id).await?, Decimal::new(1000, 0));
    Ok(())
}

#[tokio::test]
async fn test_resolving_an_already_resolved_request_is_refused() -> Result<(), DbErr> {
    let (workflow, _) = setup_workflow().await?;
    let db = workflow.db().clone();
    let (_, admin) = new_admin(&db, "branch").await?;
    let (_, boss) = new_superadmin(&db, "head", 1000).await?;
    let (_, deputy) = new_superadmin(&db, "deputy", 1000).await?;
    let stale = new_pending_request(&db, &admin, &boss, 300, 0).await?;

    workflow.approve(&boss, stale.id).await.unwrap();

    // `stale` still says pending; the stored row does not
    let err = mark_resolved(&db, &stale, Resolution::Reject, &deputy).await.unwrap_err();
    assert!(matches!(err, WorkflowError::StateConflict(_)), "got {:?}", err);

    let stored = reload(&db, stale.id).await?;
    assert_eq!(stored.status, RequestStatus::Approved);
    assert_eq!(stored.approver_id, Some(boss.id));
    Ok(())
}

#[tokio::test]
async fn test_balance_write_from_an_old_read_is_refused() -> Result<(), DbErr> {
    let (workflow, _) = setup_workflow().await?;
    let db = workflow.db().clone();
    let (stale, _) = new_superadmin(&db, "head", 1000).await?;

    store_balance(&db, &stale, Decimal::new(900, 0)).await.unwrap();

    let err = store_balance(&db, &stale, Decimal::new(100, 0)).await.unwrap_err();
    assert!(matches!(err, WorkflowError::StateConflict(_)), "got {:?}", err);
    assert_eq!(balance_of(&db, stale.id).await?, Decimal::new(900, 0));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_double_approval_across_connections_pays_once() -> Result<(), DbErr> {
    let dir = TempDir::new().unwrap();
    let workflow = setup_shared_workflow(&dir).await?;
    let db = workflow.db().clone();

    for round in 0..ROUNDS {
        let (_, admin) = new_admin(&db, &format!("branch-{}", round)).await?;
        let (_, boss) = new_superadmin(&db, &format!("head-{}", round), 700).await?;
        let request_id = new_pending_request(&db, &admin, &boss, 500, 0).await?.id;

        let first = tokio::spawn({
            let workflow = workflow.clone();
            async move { workflow.approve(&boss, request_id).await }
        });
        let second = tokio::spawn({
            let workflow = workflow.clone();
            async move { workflow.approve(&boss, request_id).await }
        });
        let outcomes = [first.await.unwrap(), second.await.unwrap()];

        assert_eq!(outcomes.iter().filter(|o| o.is_ok()).count(), 1, "round {}", round);
        for outcome in &outcomes {
            if let Err(err) = outcome {
                assert!(lost_the_race(err), "round {}: unexpected error {:?}", round, err);
            }
        }
        assert_eq!(balance_of(&db, boss.id).await?, Decimal::new(200, 0));
        assert_eq!(reload(&db, request_id).await?.status, RequestStatus::Approved);
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_shared_balance_across_connections_never_overdraws() -> Result<(), DbErr> {
    let dir = TempDir::new().unwrap();
    let workflow = setup_shared_workflow(&dir).await?;
    let db = workflow.db().clone();

    for round in 0..ROUNDS {
        let (_, admin) = new_admin(&db, &format!("branch-{}", round)).await?;
        let (_, boss) = new_superadmin(&db, &format!("head-{}", round), 1000).await?;
        let first = new_pending_request(&db, &admin, &boss, 600, 1).await?;
        let second = new_pending_request(&db, &admin, &boss, 600, 0).await?;

        let handles = [first.id, second.id].map(|request_id| {
            let workflow = workflow.clone();
            tokio::spawn(async move { workflow.approve(&boss, request_id).await })
        });
        let mut outcomes = Vec::new();
        for handle in handles {
            outcomes.push(handle.await.unwrap());
        }

        assert_eq!(outcomes.iter().filter(|o| o.is_ok()).count(), 1, "round {}", round);
        for outcome in &outcomes {
            if let Err(err) = outcome {
                assert!(lost_the_race(err), "round {}: unexpected error {:?}", round, err);
            }
        }
        assert_eq!(balance_of(&db, boss.id).await?, Decimal::new(400, 0));
        let pending = [reload(&db, first.id).await?, reload(&db, second.id).await?]
            .iter()
            .filter(|request| request.status == RequestStatus::Pending)
            .count();
        assert_eq!(pending, 1);
    }
    Ok(())
}
