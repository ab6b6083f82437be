//! Integration test harness for the GatherLove client.
//!
//! Spins up an in-process `axum` stub that speaks both backend dialects
//! (identity service under `/auth` plus `/api/users`, core application
//! service under `/api`) on one ephemeral port, and wires a real
//! [`Client`] at it with an isolated state directory per test.
//!
//! The stub implements just enough behavior to exercise the client: account
//! registration and login with JWT-shaped tokens, two-step identity
//! resolution, a wallet ledger, donations, and an admin statistics endpoint
//! that counts how often it was actually reached.
//!
//! ```no_run
//! # async fn run() {
//! use gatherlove_integration_tests::TestContext;
//!
//! let ctx = TestContext::start().await;
//! ctx.seed_account("donor@example.com", "hunter2", "Donor", &["DONOR"]);
//! ctx.client.session().initialize().await.unwrap();
//! # }
//! ```

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};

use gatherlove_client::{Client, config::ClientConfig};

/// One seeded or registered account.
#[derive(Clone)]
struct Account {
    id: String,
    name: String,
    email: String,
    password: String,
    roles: Vec<String>,
}

/// One wallet ledger entry.
#[derive(Clone)]
struct TxRecord {
    id: String,
    amount: i64,
    direction: &'static str,
    description: String,
    original_type: &'static str,
    created_at: String,
}

impl TxRecord {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "amount": self.amount,
            "type": self.direction,
            "description": self.description,
            "originalType": self.original_type,
            "createdAt": self.created_at,
        })
    }
}

#[derive(Clone)]
struct DonationRecord {
    donation_id: String,
    user_id: String,
    campaign_id: String,
    amount: i64,
    message: Option<String>,
    created_at: String,
}

#[derive(Default)]
struct StubInner {
    accounts: HashMap<String, Account>,
    balances: HashMap<String, i64>,
    transactions: HashMap<String, Vec<TxRecord>>,
    donations: Vec<DonationRecord>,
    admin_requests: usize,
    identity_delay_ms: u64,
    next_id: u64,
}

impl StubInner {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{:04}", self.next_id)
    }

    fn account_by_id(&self, user_id: &str) -> Option<&Account> {
        self.accounts.values().find(|a| a.id == user_id)
    }
}

#[derive(Clone, Default)]
struct StubState(Arc<Mutex<StubInner>>);

/// Build a JWT-shaped token the stub (and the client's expiry check) can read.
#[must_use]
pub fn issue_token(email: &str, exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(json!({ "email": email, "exp": exp }).to_string());
    format!("{header}.{payload}.stub")
}

/// Read the email claim back out of a stub-issued token.
#[must_use]
pub fn token_email(token: &str) -> Option<String> {
    email_from_token(token)
}

fn email_from_token(token: &str) -> Option<String> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: Value = serde_json::from_slice(&bytes).ok()?;
    Some(claims.get("email")?.as_str()?.to_owned())
}

fn bearer_email(state: &StubState, headers: &HeaderMap) -> Option<(String, String)> {
    let raw = headers.get("authorization")?.to_str().ok()?;
    let token = raw.strip_prefix("Bearer ")?;
    let email = email_from_token(token)?;
    let inner = state.0.lock().unwrap();
    let account = inner.accounts.get(&email)?;
    Some((account.id.clone(), email))
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn profile_json(account: &Account) -> Value {
    json!({
        "id": account.id,
        "name": account.name,
        "email": account.email,
        "roles": account.roles,
        "active": true,
    })
}

// -----------------------------------------------------------------------------
// Identity service handlers
// -----------------------------------------------------------------------------

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

async fn login(State(state): State<StubState>, Json(body): Json<LoginRequest>) -> Response {
    let inner = state.0.lock().unwrap();
    match inner.accounts.get(&body.email) {
        Some(account) if account.password == body.password => {
            let token = issue_token(&account.email, Utc::now().timestamp() + 3_600);
            Json(json!({ "token": token })).into_response()
        }
        _ => error_body(StatusCode::UNAUTHORIZED, "Invalid email or password"),
    }
}

#[derive(Deserialize)]
struct RegisterRequest {
    name: String,
    email: String,
    password: String,
}

async fn register(State(state): State<StubState>, Json(body): Json<RegisterRequest>) -> Response {
    let mut inner = state.0.lock().unwrap();
    if inner.accounts.contains_key(&body.email) {
        return error_body(StatusCode::BAD_REQUEST, "Email already registered");
    }

    let id = inner.next_id("user");
    inner.balances.insert(id.clone(), 0);
    inner.accounts.insert(
        body.email.clone(),
        Account {
            id,
            name: body.name,
            email: body.email.clone(),
            password: body.password,
            roles: vec!["DONOR".to_owned()],
        },
    );
    StatusCode::CREATED.into_response()
}

async fn me(State(state): State<StubState>, headers: HeaderMap) -> Response {
    let delay = state.0.lock().unwrap().identity_delay_ms;
    if delay > 0 {
        tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
    }

    match bearer_email(&state, &headers) {
        Some((_, email)) => Json(json!({ "email": email })).into_response(),
        None => error_body(StatusCode::UNAUTHORIZED, "Unauthorized"),
    }
}

async fn profile_by_email(
    State(state): State<StubState>,
    Path(email): Path<String>,
) -> Response {
    let inner = state.0.lock().unwrap();
    match inner.accounts.get(&email) {
        Some(account) => Json(profile_json(account)).into_response(),
        None => error_body(StatusCode::NOT_FOUND, "User not found"),
    }
}

#[derive(Deserialize)]
struct ProfileUpdateRequest {
    name: String,
}

async fn update_profile(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<ProfileUpdateRequest>,
) -> Response {
    let Some((_, email)) = bearer_email(&state, &headers) else {
        return error_body(StatusCode::UNAUTHORIZED, "Unauthorized");
    };

    let mut inner = state.0.lock().unwrap();
    let account = inner.accounts.get_mut(&email).expect("account exists");
    account.name = body.name;
    StatusCode::OK.into_response()
}

async fn upgrade(State(state): State<StubState>, headers: HeaderMap) -> Response {
    let Some((_, email)) = bearer_email(&state, &headers) else {
        return error_body(StatusCode::UNAUTHORIZED, "Unauthorized");
    };

    let mut inner = state.0.lock().unwrap();
    let account = inner.accounts.get_mut(&email).expect("account exists");
    if !account.roles.iter().any(|r| r == "FUNDRAISER") {
        account.roles.push("FUNDRAISER".to_owned());
    }
    StatusCode::OK.into_response()
}

// -----------------------------------------------------------------------------
// Wallet handlers
// -----------------------------------------------------------------------------

#[derive(Deserialize)]
struct WalletQuery {
    #[serde(rename = "userId")]
    user_id: String,
    page: Option<usize>,
    size: Option<usize>,
    limit: Option<usize>,
}

async fn wallet_balance(
    State(state): State<StubState>,
    Query(query): Query<WalletQuery>,
) -> Response {
    let inner = state.0.lock().unwrap();
    let balance = inner.balances.get(&query.user_id).copied().unwrap_or(0);
    Json(json!({ "balance": balance })).into_response()
}

async fn wallet_transactions(
    State(state): State<StubState>,
    Query(query): Query<WalletQuery>,
) -> Response {
    let inner = state.0.lock().unwrap();
    let all = inner
        .transactions
        .get(&query.user_id)
        .cloned()
        .unwrap_or_default();

    if let Some(limit) = query.limit {
        let recent: Vec<Value> = all.iter().rev().take(limit).map(TxRecord::to_json).collect();
        return Json(Value::Array(recent)).into_response();
    }

    let size = query.size.unwrap_or(10).max(1);
    let page = query.page.unwrap_or(0);
    let content: Vec<Value> = all
        .iter()
        .skip(page * size)
        .take(size)
        .map(TxRecord::to_json)
        .collect();

    Json(json!({
        "content": content,
        "totalElements": all.len(),
        "totalPages": all.len().div_ceil(size).max(1),
        "number": page,
        "size": size,
    }))
    .into_response()
}

#[derive(Deserialize)]
struct TopUpRequest {
    #[serde(rename = "userId")]
    user_id: String,
    amount: i64,
}

async fn wallet_top_up(
    State(state): State<StubState>,
    Json(body): Json<TopUpRequest>,
) -> Response {
    if body.amount <= 0 {
        return error_body(StatusCode::BAD_REQUEST, "Amount must be positive");
    }

    let mut inner = state.0.lock().unwrap();
    if inner.account_by_id(&body.user_id).is_none() {
        return error_body(StatusCode::NOT_FOUND, "User not found");
    }

    let id = inner.next_id("tx");
    *inner.balances.entry(body.user_id.clone()).or_insert(0) += body.amount;
    inner
        .transactions
        .entry(body.user_id)
        .or_default()
        .push(TxRecord {
            id,
            amount: body.amount,
            direction: "DEPOSIT",
            description: "Wallet top-up".to_owned(),
            original_type: "TOP_UP",
            created_at: Utc::now().to_rfc3339(),
        });
    StatusCode::CREATED.into_response()
}

async fn wallet_delete_transaction(
    State(state): State<StubState>,
    Path(id): Path<String>,
    Query(query): Query<WalletQuery>,
) -> Response {
    let mut inner = state.0.lock().unwrap();
    let Some(entries) = inner.transactions.get_mut(&query.user_id) else {
        return error_body(StatusCode::NOT_FOUND, "Transaction not found");
    };
    let Some(index) = entries.iter().position(|tx| tx.id == id) else {
        return error_body(StatusCode::NOT_FOUND, "Transaction not found");
    };
    if entries.get(index).is_none_or(|tx| tx.original_type != "TOP_UP") {
        return error_body(StatusCode::BAD_REQUEST, "Only top-ups can be deleted");
    }

    let removed = entries.remove(index);
    *inner.balances.entry(query.user_id).or_insert(0) -= removed.amount;
    StatusCode::NO_CONTENT.into_response()
}

// -----------------------------------------------------------------------------
// Donation handlers
// -----------------------------------------------------------------------------

#[derive(Deserialize)]
struct DonateRequest {
    #[serde(rename = "campaignId")]
    campaign_id: String,
    amount: i64,
    message: Option<String>,
}

async fn donate(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<DonateRequest>,
) -> Response {
    let Some((user_id, _)) = bearer_email(&state, &headers) else {
        return error_body(StatusCode::UNAUTHORIZED, "Unauthorized");
    };
    if !(1_000..=10_000_000).contains(&body.amount) {
        return error_body(StatusCode::BAD_REQUEST, "Donation amount out of range");
    }

    let mut inner = state.0.lock().unwrap();
    let donation_id = inner.next_id("don");
    let tx_id = inner.next_id("tx");
    let now = Utc::now().to_rfc3339();

    *inner.balances.entry(user_id.clone()).or_insert(0) -= body.amount;
    inner
        .transactions
        .entry(user_id.clone())
        .or_default()
        .push(TxRecord {
            id: tx_id,
            amount: body.amount,
            direction: "WITHDRAWAL",
            description: format!("Donation to {}", body.campaign_id),
            original_type: "DONATION",
            created_at: now.clone(),
        });
    inner.donations.push(DonationRecord {
        donation_id,
        user_id,
        campaign_id: body.campaign_id,
        amount: body.amount,
        message: body.message,
        created_at: now,
    });
    StatusCode::CREATED.into_response()
}

async fn my_donations(State(state): State<StubState>, headers: HeaderMap) -> Response {
    let Some((user_id, _)) = bearer_email(&state, &headers) else {
        return error_body(StatusCode::UNAUTHORIZED, "Unauthorized");
    };

    let inner = state.0.lock().unwrap();
    let donations: Vec<Value> = inner
        .donations
        .iter()
        .filter(|d| d.user_id == user_id)
        .map(|d| {
            json!({
                "donationId": d.donation_id,
                "campaignId": d.campaign_id,
                "amount": d.amount,
                "message": d.message,
                "stateName": "COMPLETED",
                "createdAt": d.created_at,
            })
        })
        .collect();
    Json(Value::Array(donations)).into_response()
}

// -----------------------------------------------------------------------------
// Admin handlers
// -----------------------------------------------------------------------------

async fn admin_statistics(State(state): State<StubState>, headers: HeaderMap) -> Response {
    if bearer_email(&state, &headers).is_none() {
        return error_body(StatusCode::UNAUTHORIZED, "Unauthorized");
    }

    let mut inner = state.0.lock().unwrap();
    inner.admin_requests += 1;
    Json(json!({
        "totalUsers": inner.accounts.len(),
        "totalCampaigns": 0,
        "totalDonations": inner.donations.len(),
        "pendingCampaigns": 0,
        "totalAmount": inner.donations.iter().map(|d| d.amount).sum::<i64>(),
    }))
    .into_response()
}

fn router(state: StubState) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/me", get(me))
        .route("/auth/upgrade", post(upgrade))
        .route("/api/users/email/{email}", get(profile_by_email))
        .route("/api/users/profile/me", put(update_profile))
        .route("/api/wallet/balance", get(wallet_balance))
        .route("/api/wallet/transactions", get(wallet_transactions))
        .route("/api/wallet/top-ups", post(wallet_top_up))
        .route(
            "/api/wallet/transactions/{id}",
            delete(wallet_delete_transaction),
        )
        .route("/api/donations", post(donate))
        .route("/api/donations/self", get(my_donations))
        .route("/api/admin/dashboard/statistics", get(admin_statistics))
        .with_state(state)
}

// -----------------------------------------------------------------------------
// Test context
// -----------------------------------------------------------------------------

/// One stub backend plus a real client pointed at it.
pub struct TestContext {
    /// The client under test.
    pub client: Client,
    config: ClientConfig,
    state: StubState,
    state_dir: PathBuf,
}

impl TestContext {
    /// Start the stub on an ephemeral port and build a client against it.
    pub async fn start() -> Self {
        let state = StubState::default();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub local addr");
        let app = router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve stub");
        });

        let base_url: url::Url = format!("http://{addr}").parse().expect("stub base url");
        let state_dir =
            std::env::temp_dir().join(format!("gl-itest-{}", uuid::Uuid::new_v4()));

        // One stub serves both backend roles; the paths are disjoint.
        let config = ClientConfig::new(base_url.clone(), base_url, state_dir.clone());
        let client = Client::new(config.clone()).expect("client construction");

        Self {
            client,
            config,
            state,
            state_dir,
        }
    }

    /// A fresh client over the same stub and state directory, as a new
    /// process start would see it.
    #[must_use]
    pub fn new_client(&self) -> Client {
        Client::new(self.config.clone()).expect("client construction")
    }

    /// Seed an account without going through registration.
    pub fn seed_account(&self, email: &str, password: &str, name: &str, roles: &[&str]) {
        let mut inner = self.state.0.lock().unwrap();
        let id = inner.next_id("user");
        inner.balances.insert(id.clone(), 0);
        inner.accounts.insert(
            email.to_owned(),
            Account {
                id,
                name: name.to_owned(),
                email: email.to_owned(),
                password: password.to_owned(),
                roles: roles.iter().map(|&r| r.to_owned()).collect(),
            },
        );
    }

    /// Slow down identity resolution (`/auth/me`) by this many milliseconds,
    /// widening the window concurrency tests race against.
    pub fn set_identity_delay_ms(&self, millis: u64) {
        self.state.0.lock().unwrap().identity_delay_ms = millis;
    }

    /// How many admin endpoints were actually reached.
    #[must_use]
    pub fn admin_request_count(&self) -> usize {
        self.state.0.lock().unwrap().admin_requests
    }

    /// Write a raw token into the persisted store, as a previous run would.
    pub fn write_persisted_token(&self, token: &str) {
        std::fs::create_dir_all(&self.state_dir).expect("state dir");
        std::fs::write(self.state_dir.join("token"), token).expect("write token");
    }

    /// The currently persisted token, if any.
    #[must_use]
    pub fn persisted_token(&self) -> Option<String> {
        std::fs::read_to_string(self.state_dir.join("token")).ok()
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.state_dir);
    }
}
