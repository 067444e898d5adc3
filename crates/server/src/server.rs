use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use std::sync::Arc;

use crate::{TokenIssuer, auth, bank, budgets, categories, family, transactions, wallets};
use engine::{Engine, EngineError};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub tokens: Arc<TokenIssuer>,
}

/// Resolves `Authorization: Bearer` to an existing user and stores it in the
/// request extensions.
async fn require_user(
    auth_header: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(TypedHeader(Authorization(bearer))) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    let user_id = state
        .tokens
        .verify(bearer.token())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let user = match state.engine.user(user_id).await {
        Ok(user) => user,
        Err(EngineError::KeyNotFound(_)) => return Err(StatusCode::UNAUTHORIZED),
        Err(err) => {
            tracing::error!("failed to load user {user_id}: {err}");
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    let public = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/forgot-password", post(auth::forgot_password));

    let protected = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/auth/push-token", post(auth::push_token))
        .route("/auth/change-password", post(auth::change_password))
        .route("/wallets", get(wallets::list).post(wallets::create))
        .route("/wallets/balance", get(wallets::balance))
        .route("/wallets/{id}", put(wallets::update).delete(wallets::remove))
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/{id}",
            put(categories::update).delete(categories::remove),
        )
        .route(
            "/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route(
            "/transactions/{id}",
            put(transactions::update).delete(transactions::remove),
        )
        .route("/budgets", get(budgets::list).post(budgets::create))
        .route("/budgets/{id}", put(budgets::update).delete(budgets::remove))
        .route("/bank/accounts", get(bank::list).post(bank::open))
        .route("/bank/accounts/{id}", delete(bank::remove))
        .route(
            "/bank/accounts/{id}/transactions",
            get(bank::list_transactions).post(bank::simulate),
        )
        .route("/bank/accounts/{id}/simulate-tx", post(bank::simulate))
        .route("/family", get(family::list_outgoing).post(family::invite))
        .route("/family/invitations", get(family::list_invitations))
        .route("/family/invitations/{id}/accept", post(family::accept))
        .route("/family/invitations/{id}/reject", post(family::reject))
        .route("/family/joined", get(family::list_joined))
        .route("/family/joined/{link_id}", delete(family::leave))
        .route(
            "/family/{member_id}/transactions",
            get(family::member_transactions),
        )
        .route("/family/{member_id}", delete(family::remove))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_user));

    public.merge(protected).with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    tokens: TokenIssuer,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        tokens: Arc::new(tokens),
    };

    axum::serve(listener, router(state)).await
}
