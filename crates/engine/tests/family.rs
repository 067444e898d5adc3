mod common;

use engine::{
    EngineError, FamilyInvite, LinkDecision, LinkStatus, TransactionInput, TransactionKind,
    WalletInput,
};

use common::{RecordingMailer, RecordingNotifier, fixture, fixture_with, register};

fn invite_of(email: &str) -> FamilyInvite {
    FamilyInvite {
        member_email: email.to_string(),
        ..Default::default()
    }
}

fn expense(amount_minor: i64) -> TransactionInput {
    TransactionInput {
        kind: TransactionKind::Expense,
        amount_minor,
        note: None,
        category_id: None,
        occurred_at: None,
    }
}

#[tokio::test]
async fn view_without_link_is_forbidden() {
    let f = fixture().await;
    let owner = register(&f.engine, "owner@example.com").await;
    let member = register(&f.engine, "member@example.com").await;

    let err = f
        .engine
        .view_member_transactions(owner.id, member.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
}

#[tokio::test]
async fn view_requires_accepted_status() {
    let f = fixture().await;
    let owner = register(&f.engine, "owner@example.com").await;
    let member = register(&f.engine, "member@example.com").await;
    f.engine.new_transaction(member.id, expense(500)).await.unwrap();

    let link = f
        .engine
        .invite(owner.id, invite_of("member@example.com"))
        .await
        .unwrap();
    assert_eq!(link.status, LinkStatus::Pending);
    assert!(matches!(
        f.engine.view_member_transactions(owner.id, member.id).await,
        Err(EngineError::Forbidden(_))
    ));

    f.engine
        .respond(member.id, link.id, LinkDecision::Accept)
        .await
        .unwrap();
    let txs = f
        .engine
        .view_member_transactions(owner.id, member.id)
        .await
        .unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].amount_minor, 500);
}

#[tokio::test]
async fn rejected_link_stays_forbidden() {
    let f = fixture().await;
    let owner = register(&f.engine, "owner@example.com").await;
    let member = register(&f.engine, "member@example.com").await;

    let link = f
        .engine
        .invite(owner.id, invite_of("member@example.com"))
        .await
        .unwrap();
    let link = f
        .engine
        .respond(member.id, link.id, LinkDecision::Reject)
        .await
        .unwrap();
    assert_eq!(link.status, LinkStatus::Rejected);

    assert!(matches!(
        f.engine.view_member_transactions(owner.id, member.id).await,
        Err(EngineError::Forbidden(_))
    ));
}

#[tokio::test]
async fn view_is_directional() {
    let f = fixture().await;
    let owner = register(&f.engine, "owner@example.com").await;
    let member = register(&f.engine, "member@example.com").await;

    let link = f
        .engine
        .invite(owner.id, invite_of("member@example.com"))
        .await
        .unwrap();
    f.engine
        .respond(member.id, link.id, LinkDecision::Accept)
        .await
        .unwrap();

    assert!(matches!(
        f.engine.view_member_transactions(member.id, owner.id).await,
        Err(EngineError::Forbidden(_))
    ));
}

#[tokio::test]
async fn invite_twice_returns_same_link_and_keeps_status() {
    let f = fixture().await;
    let owner = register(&f.engine, "owner@example.com").await;
    let member = register(&f.engine, "member@example.com").await;

    let first = f
        .engine
        .invite(owner.id, invite_of("member@example.com"))
        .await
        .unwrap();
    f.engine
        .respond(member.id, first.id, LinkDecision::Accept)
        .await
        .unwrap();

    let second = f
        .engine
        .invite(
            owner.id,
            FamilyInvite {
                member_email: "MEMBER@example.com".to_string(),
                display_name: Some("Kid".to_string()),
                group_name: Some("Other".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.status, LinkStatus::Accepted);
    assert_eq!(second.group_name, "Family");

    let outgoing = f.engine.list_outgoing(owner.id).await.unwrap();
    assert_eq!(outgoing.len(), 1);
}

#[tokio::test]
async fn self_invite_is_invalid_request() {
    let f = fixture().await;
    let owner = register(&f.engine, "owner@example.com").await;

    let err = f
        .engine
        .invite(owner.id, invite_of("  Owner@Example.com "))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidRequest(_)));
}

#[tokio::test]
async fn invite_unknown_email_is_not_found() {
    let f = fixture().await;
    let owner = register(&f.engine, "owner@example.com").await;

    let err = f
        .engine
        .invite(owner.id, invite_of("ghost@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn only_the_member_can_respond() {
    let f = fixture().await;
    let owner = register(&f.engine, "owner@example.com").await;
    let member = register(&f.engine, "member@example.com").await;
    let stranger = register(&f.engine, "stranger@example.com").await;

    let link = f
        .engine
        .invite(owner.id, invite_of("member@example.com"))
        .await
        .unwrap();

    for actor in [owner.id, stranger.id] {
        let err = f
            .engine
            .respond(actor, link.id, LinkDecision::Accept)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::KeyNotFound(_)));
    }

    let pending = f.engine.list_incoming_pending(member.id).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].status, LinkStatus::Pending);
}

#[tokio::test]
async fn repeating_a_decision_is_allowed() {
    let f = fixture().await;
    let owner = register(&f.engine, "owner@example.com").await;
    let member = register(&f.engine, "member@example.com").await;

    let link = f
        .engine
        .invite(owner.id, invite_of("member@example.com"))
        .await
        .unwrap();
    f.engine
        .respond(member.id, link.id, LinkDecision::Accept)
        .await
        .unwrap();
    let again = f
        .engine
        .respond(member.id, link.id, LinkDecision::Accept)
        .await
        .unwrap();
    assert_eq!(again.status, LinkStatus::Accepted);
}

#[tokio::test]
async fn leave_only_from_accepted_link() {
    let f = fixture().await;
    let owner = register(&f.engine, "owner@example.com").await;
    let member = register(&f.engine, "member@example.com").await;

    let link = f
        .engine
        .invite(owner.id, invite_of("member@example.com"))
        .await
        .unwrap();
    let err = f.engine.leave_family(member.id, link.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    f.engine
        .respond(member.id, link.id, LinkDecision::Accept)
        .await
        .unwrap();
    // the owner is not the member of this link
    assert!(f.engine.leave_family(owner.id, link.id).await.is_err());

    f.engine.leave_family(member.id, link.id).await.unwrap();
    assert!(f.engine.list_joined(member.id).await.unwrap().is_empty());
    assert!(f.engine.list_outgoing(owner.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn remove_deletes_link_in_any_status() {
    let f = fixture().await;
    let owner = register(&f.engine, "owner@example.com").await;
    let member = register(&f.engine, "member@example.com").await;

    f.engine
        .invite(owner.id, invite_of("member@example.com"))
        .await
        .unwrap();
    f.engine.remove_member(owner.id, member.id).await.unwrap();
    assert!(f.engine.list_outgoing(owner.id).await.unwrap().is_empty());

    let err = f
        .engine
        .remove_member(owner.id, member.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn outgoing_aggregates_only_for_accepted_links() {
    let f = fixture().await;
    let owner = register(&f.engine, "owner@example.com").await;
    let member = register(&f.engine, "member@example.com").await;
    f.engine
        .new_wallet(
            member.id,
            WalletInput {
                name: Some("Cash".to_string()),
                balance_minor: 10_000,
            },
        )
        .await
        .unwrap();
    f.engine.new_transaction(member.id, expense(2_000)).await.unwrap();

    let link = f
        .engine
        .invite(
            owner.id,
            FamilyInvite {
                member_email: "member@example.com".to_string(),
                display_name: Some("Kiddo".to_string()),
                group_name: Some("Home".to_string()),
            },
        )
        .await
        .unwrap();

    let outgoing = f.engine.list_outgoing(owner.id).await.unwrap();
    assert_eq!(outgoing.len(), 1);
    assert_eq!(outgoing[0].status, LinkStatus::Pending);
    assert_eq!(outgoing[0].display_name, "Kiddo");
    assert_eq!(outgoing[0].group_name, "Home");
    assert_eq!(outgoing[0].totals.total_expense_minor, 0);
    assert_eq!(outgoing[0].totals.wallet_balance_minor, 0);

    f.engine
        .respond(member.id, link.id, LinkDecision::Accept)
        .await
        .unwrap();
    let outgoing = f.engine.list_outgoing(owner.id).await.unwrap();
    assert_eq!(outgoing[0].totals.total_expense_minor, 2_000);
    assert_eq!(outgoing[0].totals.wallet_balance_minor, 8_000);
}

#[tokio::test]
async fn joined_lists_owner_details() {
    let f = fixture().await;
    let owner = register(&f.engine, "owner@example.com").await;
    let member = register(&f.engine, "member@example.com").await;

    let link = f
        .engine
        .invite(owner.id, invite_of("member@example.com"))
        .await
        .unwrap();
    assert!(f.engine.list_joined(member.id).await.unwrap().is_empty());

    f.engine
        .respond(member.id, link.id, LinkDecision::Accept)
        .await
        .unwrap();
    let joined = f.engine.list_joined(member.id).await.unwrap();
    assert_eq!(joined.len(), 1);
    assert_eq!(joined[0].owner_id, owner.id);
    assert_eq!(joined[0].owner_email, "owner@example.com");
    assert_eq!(joined[0].owner_display_name, "owner");
    assert!(
        f.engine
            .list_incoming_pending(member.id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn invite_and_accept_push_to_tokens() {
    let f = fixture().await;
    let owner = register(&f.engine, "owner@example.com").await;
    let member = register(&f.engine, "member@example.com").await;
    f.engine.set_push_token(owner.id, "owner-device").await.unwrap();
    f.engine
        .set_push_token(member.id, "member-device")
        .await
        .unwrap();

    let link = f
        .engine
        .invite(owner.id, invite_of("member@example.com"))
        .await
        .unwrap();
    f.engine
        .respond(member.id, link.id, LinkDecision::Accept)
        .await
        .unwrap();

    let sent = f.notifier.messages();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].token, "member-device");
    assert_eq!(sent[0].data["type"], "family_invite");
    assert_eq!(sent[0].data["owner_id"], owner.id.to_string());
    assert_eq!(sent[1].token, "owner-device");
    assert_eq!(sent[1].data["type"], "family_accept");
    assert_eq!(sent[1].data["member_id"], member.id.to_string());
}

#[tokio::test]
async fn push_failure_does_not_fail_invite() {
    let f = fixture_with(RecordingNotifier::failing(), RecordingMailer::default()).await;
    let owner = register(&f.engine, "owner@example.com").await;
    let member = register(&f.engine, "member@example.com").await;
    f.engine
        .set_push_token(member.id, "member-device")
        .await
        .unwrap();

    let link = f
        .engine
        .invite(owner.id, invite_of("member@example.com"))
        .await
        .unwrap();
    assert_eq!(f.notifier.messages().len(), 1);
    assert_eq!(
        f.engine.list_incoming_pending(member.id).await.unwrap()[0].link_id,
        link.id
    );
}

#[tokio::test]
async fn new_transaction_notifies_accepted_owners_only() {
    let f = fixture().await;
    let accepted_owner = register(&f.engine, "a@example.com").await;
    let pending_owner = register(&f.engine, "p@example.com").await;
    let silent_owner = register(&f.engine, "s@example.com").await;
    let member = register(&f.engine, "member@example.com").await;
    f.engine
        .set_push_token(accepted_owner.id, "accepted-device")
        .await
        .unwrap();
    f.engine
        .set_push_token(pending_owner.id, "pending-device")
        .await
        .unwrap();

    for owner in [&accepted_owner, &pending_owner, &silent_owner] {
        f.engine
            .invite(owner.id, invite_of("member@example.com"))
            .await
            .unwrap();
    }
    let pending = f.engine.list_incoming_pending(member.id).await.unwrap();
    for invitation in pending
        .iter()
        .filter(|i| i.owner_id != pending_owner.id)
    {
        f.engine
            .respond(member.id, invitation.link_id, LinkDecision::Accept)
            .await
            .unwrap();
    }

    let tx = f.engine.new_transaction(member.id, expense(1_250)).await.unwrap();

    let sent: Vec<_> = f
        .notifier
        .messages()
        .into_iter()
        .filter(|m| m.data["type"] == "family_tx")
        .collect();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].token, "accepted-device");
    assert_eq!(sent[0].data["tx_id"], tx.id.to_string());
    assert_eq!(sent[0].data["tx_type"], "expense");
    assert_eq!(sent[0].data["member_id"], member.id.to_string());
}
