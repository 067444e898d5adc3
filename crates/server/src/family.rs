//! Family sharing API endpoints.

use api_types::{
    Deleted,
    family::{Invitation, Invite, Joined, Link, LinkStatus as ApiStatus, Member},
    transaction::TransactionView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{FamilyInvite, FamilyLink, LinkDecision, LinkStatus, User};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, transactions::transaction_view};

fn status_to_api(status: LinkStatus) -> ApiStatus {
    match status {
        LinkStatus::Pending => ApiStatus::Pending,
        LinkStatus::Accepted => ApiStatus::Accepted,
        LinkStatus::Rejected => ApiStatus::Rejected,
    }
}

fn link_view(link: FamilyLink) -> Link {
    Link {
        id: link.id,
        owner_id: link.owner_id,
        member_id: link.member_id,
        display_name: link.display_name,
        group_name: link.group_name,
        status: status_to_api(link.status),
        created_at: link.created_at,
    }
}

pub async fn list_outgoing(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<Member>>, ServerError> {
    let members = state.engine.list_outgoing(user.id).await?;
    Ok(Json(
        members
            .into_iter()
            .map(|m| Member {
                id: m.link_id,
                member_id: m.member_id,
                email: m.email,
                display_name: m.display_name,
                group_name: m.group_name,
                status: status_to_api(m.status),
                total_income_minor: m.totals.total_income_minor,
                total_expense_minor: m.totals.total_expense_minor,
                total_wallet_balance_minor: m.totals.wallet_balance_minor,
            })
            .collect(),
    ))
}

pub async fn invite(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<Invite>,
) -> Result<(StatusCode, Json<Link>), ServerError> {
    let link = state
        .engine
        .invite(
            user.id,
            FamilyInvite {
                member_email: payload.email,
                display_name: payload.display_name,
                group_name: payload.group_name,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(link_view(link))))
}

pub async fn list_invitations(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<Invitation>>, ServerError> {
    let invitations = state.engine.list_incoming_pending(user.id).await?;
    Ok(Json(
        invitations
            .into_iter()
            .map(|i| Invitation {
                id: i.link_id,
                owner_id: i.owner_id,
                owner_email: i.owner_email,
                owner_display_name: i.owner_display_name,
                group_name: i.group_name,
                status: status_to_api(i.status),
                created_at: i.created_at,
            })
            .collect(),
    ))
}

pub async fn accept(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(link_id): Path<Uuid>,
) -> Result<Json<Link>, ServerError> {
    let link = state
        .engine
        .respond(user.id, link_id, LinkDecision::Accept)
        .await?;
    Ok(Json(link_view(link)))
}

pub async fn reject(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(link_id): Path<Uuid>,
) -> Result<Json<Link>, ServerError> {
    let link = state
        .engine
        .respond(user.id, link_id, LinkDecision::Reject)
        .await?;
    Ok(Json(link_view(link)))
}

pub async fn list_joined(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<Joined>>, ServerError> {
    let joined = state.engine.list_joined(user.id).await?;
    Ok(Json(
        joined
            .into_iter()
            .map(|j| Joined {
                id: j.link_id,
                owner_id: j.owner_id,
                owner_email: j.owner_email,
                owner_display_name: j.owner_display_name,
                group_name: j.group_name,
            })
            .collect(),
    ))
}

pub async fn leave(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(link_id): Path<Uuid>,
) -> Result<Json<Deleted>, ServerError> {
    state.engine.leave_family(user.id, link_id).await?;
    Ok(Json(Deleted { deleted: true }))
}

pub async fn member_transactions(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(member_id): Path<Uuid>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let txs = state
        .engine
        .view_member_transactions(user.id, member_id)
        .await?;
    Ok(Json(txs.into_iter().map(transaction_view).collect()))
}

pub async fn remove(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(member_id): Path<Uuid>,
) -> Result<Json<Deleted>, ServerError> {
    state.engine.remove_member(user.id, member_id).await?;
    Ok(Json(Deleted { deleted: true }))
}
