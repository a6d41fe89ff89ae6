use rust_decimal::Decimal;
use sea_orm::DbErr;

use super::helpers::{new_admin, new_superadmin, request_count};
use super::setup_workflow;
use crate::error::WorkflowError;
use crate::events::WorkflowEvent;
use crate::policy::Action;
use crate::requests::NewBalanceRequest;
use model::RequestStatus;

fn input(amount: &str, approver_id: Option<i32>) -> NewBalanceRequest {
    NewBalanceRequest {
        amount: amount.to_string(),
        approver_id,
    }
}

#[tokio::test]
async fn test_admin_creates_pending_request() -> Result<(), DbErr> {
    let (workflow, sink) = setup_workflow().await?;
    let (_, admin) = new_admin(workflow.db(), "branch").await?;
    let (_, boss) = new_superadmin(workflow.db(), "head", 1000).await?;

    let request = workflow.create(&admin, input("500", Some(boss.id))).await.unwrap();

    assert_eq!(request.requester_id, admin.id);
    assert_eq!(request.nominated_approver_id, boss.id);
    assert_eq!(request.amount, Decimal::new(500, 0));
    assert_eq!(request.status, RequestStatus::Pending);
    assert_eq!(request.approver_id, None);
    assert_eq!(request.resolved_at, None);

    let events = sink.events();
    assert_eq!(events.len(), 1);
    match &events[0] {
        WorkflowEvent::RequestCreated { request_id, requester_id, .. } => {
            assert_eq!(*request_id, request.id);
            assert_eq!(*requester_id, admin.id);
        }
        other => panic!("unexpected event {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_non_positive_amount_is_never_persisted() -> Result<(), DbErr> {
    let (workflow, _) = setup_workflow().await?;
    let (_, admin) = new_admin(workflow.db(), "branch").await?;
    let (_, boss) = new_superadmin(workflow.db(), "head", 1000).await?;

    for amount in ["0", "0.00", "-1", "-500", "-0.01"] {
        let err = workflow.create(&admin, input(amount, Some(boss.id))).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)), "{} gave {:?}", amount, err);
    }

    assert_eq!(request_count(workflow.db()).await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_non_numeric_amount_is_rejected() -> Result<(), DbErr> {
    let (workflow, _) = setup_workflow().await?;
    let (_, admin) = new_admin(workflow.db(), "branch").await?;
    let (_, boss) = new_superadmin(workflow.db(), "head", 1000).await?;

    for amount in ["", "five hundred", "5OO", "1.001"] {
        let err = workflow.create(&admin, input(amount, Some(boss.id))).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)), "{:?} gave {:?}", amount, err);
    }

    assert_eq!(request_count(workflow.db()).await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_superadmin_cannot_create() -> Result<(), DbErr> {
    let (workflow, sink) = setup_workflow().await?;
    let (_, boss) = new_superadmin(workflow.db(), "head", 1000).await?;
    let (_, other_boss) = new_superadmin(workflow.db(), "regional", 1000).await?;

    let err = workflow.create(&boss, input("100", Some(other_boss.id))).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Authorization(_)));

    // Authorization is decided before the input is looked at
    let err = workflow.create(&boss, input("-1", None)).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Authorization(_)));

    assert_eq!(request_count(workflow.db()).await?, 0);
    assert!(sink.events().iter().all(|event| matches!(
        event,
        WorkflowEvent::ActionFailed { action: Action::CreateRequest, code: "FORBIDDEN", .. }
    )));
    Ok(())
}

#[tokio::test]
async fn test_approver_must_be_an_existing_superadmin() -> Result<(), DbErr> {
    let (workflow, _) = setup_workflow().await?;
    let (_, admin) = new_admin(workflow.db(), "branch").await?;
    let (_, colleague) = new_admin(workflow.db(), "other-branch").await?;

    let missing = workflow.create(&admin, input("100", None)).await.unwrap_err();
    assert!(matches!(missing, WorkflowError::Validation(_)));

    let unknown = workflow.create(&admin, input("100", Some(4242))).await.unwrap_err();
    assert!(matches!(unknown, WorkflowError::Validation(_)));

    let not_superadmin = workflow
        .create(&admin, input("100", Some(colleague.id)))
        .await
        .unwrap_err();
    assert!(matches!(not_superadmin, WorkflowError::Validation(_)));

    assert_eq!(request_count(workflow.db()).await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_fractional_amount_is_kept() -> Result<(), DbErr> {
    let (workflow, _) = setup_workflow().await?;
    let (_, admin) = new_admin(workflow.db(), "branch").await?;
    let (_, boss) = new_superadmin(workflow.db(), "head", 1000).await?;

    let request = workflow.create(&admin, input("12.50", Some(boss.id))).await.unwrap();
    assert_eq!(request.amount, Decimal::new(1250, 2));
    Ok(())
}
