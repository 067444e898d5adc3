use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use engine::{BcryptHasher, Engine};
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use serde_json::{Value, json};
use server::{ServerState, TokenIssuer, router, run_with_listener};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};
use tower::ServiceExt;

async fn engine() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    Engine::builder()
        .database(db)
        .hasher(Arc::new(BcryptHasher::with_cost(4)))
        .build()
        .await
        .unwrap()
}

async fn app() -> Router {
    router(ServerState {
        engine: Arc::new(engine().await),
        tokens: Arc::new(TokenIssuer::new("test-secret", 60)),
    })
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn sign_up(app: &Router, email: &str) -> String {
    let (status, _) = call(
        app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "email": email, "password": "pw" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = call(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": "pw" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn protected_routes_require_bearer_token() {
    let app = app().await;

    let (status, _) = call(&app, "GET", "/wallets", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(&app, "GET", "/wallets", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = app().await;
    sign_up(&app, "alice@example.com").await;

    let (status, body) = call(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "alice@example.com", "password": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = app().await;
    sign_up(&app, "alice@example.com").await;

    let (status, _) = call(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "email": "ALICE@example.com", "password": "pw" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn me_returns_display_name() {
    let app = app().await;
    let token = sign_up(&app, "carol@example.com").await;

    let (status, body) = call(&app, "GET", "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "carol@example.com");
    assert_eq!(body["display_name"], "carol");
}

#[tokio::test]
async fn wallet_balance_combines_seeds_and_transactions() {
    let app = app().await;
    let token = sign_up(&app, "alice@example.com").await;

    let (status, _) = call(
        &app,
        "POST",
        "/wallets",
        Some(&token),
        Some(json!({ "name": "Cash", "balance_minor": 10000 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    for (kind, amount) in [("income", 5000), ("expense", 2000)] {
        let (status, _) = call(
            &app,
            "POST",
            "/transactions",
            Some(&token),
            Some(json!({ "type": kind, "amount_minor": amount })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = call(&app, "GET", "/wallets/balance", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["wallet_balance_minor"], 13000);
    assert_eq!(body["total_income_minor"], 5000);
    assert_eq!(body["total_expense_minor"], 2000);
}

#[tokio::test]
async fn non_positive_amount_is_unprocessable() {
    let app = app().await;
    let token = sign_up(&app, "alice@example.com").await;

    let (status, _) = call(
        &app,
        "POST",
        "/transactions",
        Some(&token),
        Some(json!({ "type": "expense", "amount_minor": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn family_flow_over_http() {
    let app = app().await;
    let owner = sign_up(&app, "owner@example.com").await;
    let member = sign_up(&app, "member@example.com").await;

    let (status, me) = call(&app, "GET", "/auth/me", Some(&member), None).await;
    assert_eq!(status, StatusCode::OK);
    let member_id = me["id"].as_str().unwrap().to_string();

    let (status, link) = call(
        &app,
        "POST",
        "/family",
        Some(&owner),
        Some(json!({ "email": "member@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(link["status"], "pending");
    assert_eq!(link["group_name"], "Family");
    let link_id = link["id"].as_str().unwrap().to_string();

    let uri = format!("/family/{member_id}/transactions");
    let (status, _) = call(&app, "GET", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, invitations) =
        call(&app, "GET", "/family/invitations", Some(&member), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(invitations.as_array().unwrap().len(), 1);
    assert_eq!(invitations[0]["owner_email"], "owner@example.com");

    let accept = format!("/family/invitations/{link_id}/accept");
    let (status, _) = call(&app, "POST", &accept, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, link) = call(&app, "POST", &accept, Some(&member), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(link["status"], "accepted");

    let (status, _) = call(
        &app,
        "POST",
        "/transactions",
        Some(&member),
        Some(json!({ "type": "expense", "amount_minor": 750, "note": "lunch" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, txs) = call(&app, "GET", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(txs.as_array().unwrap().len(), 1);
    assert_eq!(txs[0]["note"], "lunch");

    let (status, members) = call(&app, "GET", "/family", Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(members[0]["total_expense_minor"], 750);
    assert_eq!(members[0]["total_wallet_balance_minor"], -750);

    let leave = format!("/family/joined/{link_id}");
    let (status, body) = call(&app, "DELETE", &leave, Some(&member), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], true);

    let (status, _) = call(&app, "GET", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn self_invite_is_bad_request() {
    let app = app().await;
    let token = sign_up(&app, "alice@example.com").await;

    let (status, _) = call(
        &app,
        "POST",
        "/family",
        Some(&token),
        Some(json!({ "email": "Alice@Example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn forgot_password_without_mailer_is_bad_gateway() {
    let app = app().await;
    sign_up(&app, "alice@example.com").await;

    let (status, _) = call(
        &app,
        "POST",
        "/auth/forgot-password",
        None,
        Some(json!({ "email": "alice@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    // Old password still works after the failed reset.
    let (status, _) = call(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "alice@example.com", "password": "pw" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn bank_simulation_tracks_balance_after() {
    let app = app().await;
    let token = sign_up(&app, "alice@example.com").await;

    let (status, account) = call(
        &app,
        "POST",
        "/bank/accounts",
        Some(&token),
        Some(json!({ "bank_name": "ACME", "account_number": "0001" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!(
        "/bank/accounts/{}/transactions",
        account["id"].as_str().unwrap()
    );

    let (_, first) = call(
        &app,
        "POST",
        &uri,
        Some(&token),
        Some(json!({ "type": "income", "amount_minor": 10000 })),
    )
    .await;
    let (_, second) = call(
        &app,
        "POST",
        &uri,
        Some(&token),
        Some(json!({ "type": "expense", "amount_minor": 3000 })),
    )
    .await;
    assert_eq!(first["balance_after_minor"], 10000);
    assert_eq!(second["balance_after_minor"], 7000);

    let (_, accounts) = call(&app, "GET", "/bank/accounts", Some(&token), None).await;
    assert_eq!(accounts[0]["balance_minor"], 7000);
}

#[tokio::test]
async fn listener_serves_the_router() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let tokens = TokenIssuer::new("test-secret", 60);
    tokio::spawn(run_with_listener(engine().await, tokens, listener));

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /auth/me HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    assert!(response.starts_with("HTTP/1.1 401"), "{response}");
}
