//! Integration tests for Shop Probe.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shop-probe-integration-tests
//! ```
//!
//! No external services are needed: every test spawns its own
//! [`MockShopApi`] on `127.0.0.1:0` and points the probe at it.
//!
//! # Mock behavior
//!
//! The mock serves the same routes and status codes as the real shop API:
//!
//! - `GET /swagger/index.html` - 200 with an HTML page
//! - `POST /api/auth/register` - 400 on blank email/password/nickname, a
//!   malformed email or a password shorter than 8; 409 on a taken email
//!   or phone; 200 `{id, message}` otherwise
//! - `POST /api/auth/login` - 400 on blank fields, 404 for an unknown
//!   identifier, 401 for a wrong password, 200 `{token, user}` otherwise
//! - `GET /api/cart`, `POST /api/cart/add`, `DELETE /api/cart/{productId}` -
//!   401 without a valid bearer token; adding an unknown product is a 400,
//!   repeated adds accumulate the quantity
//!
//! [`MockOptions`] injects the failures the real API would not produce on
//! demand: slow answers, wrong statuses and malformed bodies.

use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{FromRequestParts, Path, State};
use axum::http::request::Parts;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::{Value, json};
use shop_probe_core::{
    AddToCartRequest, CartAck, CartItem, Email, LoginRequest, LoginResponse, Price, ProductId,
    RegisterRequest, RegisterResponse, UserId,
};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 8;

// =============================================================================
// Options
// =============================================================================

/// A product the mock can put in carts.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
}

/// Knobs for the mock's behavior.
#[derive(Debug, Clone)]
pub struct MockOptions {
    /// Status served for the Swagger page.
    pub swagger_status: StatusCode,
    /// Answer every login with 401, even with the right password.
    pub reject_logins: bool,
    /// Leave `user` out of successful login bodies.
    pub login_omits_user: bool,
    /// Serve this as `token` in successful login bodies instead of a session
    /// token.
    pub login_token: Option<Value>,
    /// Delay before answering a registration.
    pub register_delay: Duration,
    /// Delay before answering a login.
    pub login_delay: Duration,
    /// Delay before answering a cart listing.
    pub cart_delay: Duration,
    /// Status served for cart listings. Non-2xx statuses carry no cart.
    pub cart_status: StatusCode,
    /// Answer cart listings with a 200 body that is not JSON.
    pub malformed_cart: bool,
    /// Answer deletes with 200 without removing anything.
    pub ignore_deletes: bool,
    /// Products that exist. Adding anything else is a 400.
    pub catalog: Vec<Product>,
}

impl Default for MockOptions {
    fn default() -> Self {
        Self {
            swagger_status: StatusCode::OK,
            reject_logins: false,
            login_omits_user: false,
            login_token: None,
            register_delay: Duration::ZERO,
            login_delay: Duration::ZERO,
            cart_delay: Duration::ZERO,
            cart_status: StatusCode::OK,
            malformed_cart: false,
            ignore_deletes: false,
            catalog: vec![
                Product {
                    id: ProductId::new(101),
                    name: "USB-C 数据线".to_string(),
                    price: Price::from_cents(1999),
                },
                Product {
                    id: ProductId::new(102),
                    name: "Wireless Mouse".to_string(),
                    price: Price::from_cents(8900),
                },
            ],
        }
    }
}

// =============================================================================
// State
// =============================================================================

/// User record as the API returns it from login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUser {
    pub user_id: UserId,
    pub email: String,
    pub phone: Option<String>,
    pub nick_name: String,
    pub role: u8,
    pub created_at: DateTime<Utc>,
}

struct Account {
    user: ApiUser,
    password: SecretString,
}

#[derive(Default)]
struct Store {
    next_user_id: i64,
    accounts: Vec<Account>,
    /// Bearer token -> user
    sessions: HashMap<String, UserId>,
    carts: HashMap<UserId, BTreeMap<ProductId, i32>>,
}

impl Store {
    fn find(&self, identifier: &str) -> Option<&Account> {
        self.accounts.iter().find(|account| {
            account.user.email == identifier || account.user.phone.as_deref() == Some(identifier)
        })
    }
}

struct MockState {
    options: MockOptions,
    store: Mutex<Store>,
}

type SharedState = Arc<MockState>;

// =============================================================================
// Server
// =============================================================================

/// A running mock shop API. The server stops when this is dropped.
pub struct MockShopApi {
    addr: SocketAddr,
    state: SharedState,
    task: JoinHandle<()>,
}

impl MockShopApi {
    /// Start a mock with default options.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn start() -> std::io::Result<Self> {
        Self::start_with(MockOptions::default()).await
    }

    /// Start a mock with `options`.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn start_with(options: MockOptions) -> std::io::Result<Self> {
        let state = Arc::new(MockState {
            options,
            store: Mutex::new(Store {
                next_user_id: 1,
                ..Store::default()
            }),
        });

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = router(Arc::clone(&state));

        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Mock shop API stopped: {e}");
            }
        });

        Ok(Self { addr, state, task })
    }

    /// Base URL to point the probe at.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Emails of every registered account, in registration order.
    pub async fn registered_emails(&self) -> Vec<String> {
        let store = self.state.store.lock().await;
        store
            .accounts
            .iter()
            .map(|account| account.user.email.clone())
            .collect()
    }

    /// Nickname stored for `email`, if registered.
    pub async fn nickname_of(&self, email: &str) -> Option<String> {
        let store = self.state.store.lock().await;
        store.find(email).map(|account| account.user.nick_name.clone())
    }

    /// Cart lines of the account registered as `email`, keyed by product.
    pub async fn cart_of(&self, email: &str) -> BTreeMap<ProductId, i32> {
        let store = self.state.store.lock().await;
        store
            .find(email)
            .and_then(|account| store.carts.get(&account.user.user_id))
            .cloned()
            .unwrap_or_default()
    }
}

impl Drop for MockShopApi {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn router(state: SharedState) -> Router {
    Router::new()
        .route("/swagger/index.html", get(swagger))
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/cart", get(cart))
        .route("/api/cart/add", post(add_to_cart))
        .route("/api/cart/{product_id}", delete(remove_from_cart))
        .with_state(state)
}

// =============================================================================
// Auth
// =============================================================================

/// User resolved from the `Authorization: Bearer` header.
struct AuthUser(UserId);

impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let store = state.store.lock().await;
        store
            .sessions
            .get(token)
            .copied()
            .map(Self)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}

fn bad_request(message: impl Into<String>) -> Response {
    (StatusCode::BAD_REQUEST, Json(message.into())).into_response()
}

// =============================================================================
// Handlers
// =============================================================================

async fn swagger(State(state): State<SharedState>) -> Response {
    (
        state.options.swagger_status,
        Html("<!DOCTYPE html><html><head><title>Swagger UI</title></head><body><div id=\"swagger-ui\"></div></body></html>"),
    )
        .into_response()
}

async fn register(
    State(state): State<SharedState>,
    Json(body): Json<RegisterRequest>,
) -> Response {
    tokio::time::sleep(state.options.register_delay).await;
    if body.email.trim().is_empty() || body.password.trim().is_empty() {
        return bad_request("email and password are required");
    }
    let nick_name = match body.nick_name.as_deref().map(str::trim) {
        Some(nick) if !nick.is_empty() => nick.to_string(),
        _ => return bad_request("nickname is required"),
    };
    if !Email::parse(&body.email).is_ok_and(|email| email.has_dotted_domain()) {
        return bad_request("email format is invalid");
    }
    if body.password.len() < MIN_PASSWORD_LENGTH {
        return bad_request(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        ));
    }

    let mut store = state.store.lock().await;
    let phone_taken = body
        .phone
        .as_deref()
        .is_some_and(|phone| store.find(phone).is_some());
    if store.find(&body.email).is_some() || phone_taken {
        return (
            StatusCode::CONFLICT,
            Json("email or phone is already registered"),
        )
            .into_response();
    }

    let user_id = UserId::new(store.next_user_id);
    store.next_user_id += 1;
    store.accounts.push(Account {
        user: ApiUser {
            user_id,
            email: body.email,
            phone: body.phone,
            nick_name,
            role: 0,
            created_at: Utc::now(),
        },
        password: SecretString::from(body.password),
    });

    Json(RegisterResponse {
        id: user_id,
        message: "registered".to_string(),
    })
    .into_response()
}

async fn login(State(state): State<SharedState>, Json(body): Json<LoginRequest>) -> Response {
    if body.identifier.trim().is_empty() || body.password.trim().is_empty() {
        return bad_request("identifier and password are required");
    }
    tokio::time::sleep(state.options.login_delay).await;

    let mut store = state.store.lock().await;
    let Some(account) = store.find(&body.identifier) else {
        return (StatusCode::NOT_FOUND, Json("user does not exist")).into_response();
    };

    if state.options.reject_logins || account.password.expose_secret() != body.password {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let user = account.user.clone();
    let token = uuid::Uuid::new_v4().to_string();
    store.sessions.insert(token.clone(), user.user_id);

    if state.options.login_omits_user {
        return Json(json!({ "token": token })).into_response();
    }
    if let Some(token) = &state.options.login_token {
        return Json(json!({ "token": token, "user": user })).into_response();
    }
    Json(LoginResponse { token, user }).into_response()
}

async fn cart(State(state): State<SharedState>, AuthUser(user_id): AuthUser) -> Response {
    tokio::time::sleep(state.options.cart_delay).await;
    if !state.options.cart_status.is_success() {
        return (state.options.cart_status, Json("cart unavailable")).into_response();
    }
    if state.options.malformed_cart {
        return (
            [(header::CONTENT_TYPE, "application/json")],
            "[{\"productId\": 101,",
        )
            .into_response();
    }

    let store = state.store.lock().await;
    let items = store
        .carts
        .get(&user_id)
        .map(|lines| {
            lines
                .iter()
                .filter_map(|(product_id, quantity)| {
                    let product = state.options.catalog.iter().find(|p| p.id == *product_id)?;
                    Some(CartItem {
                        product_id: *product_id,
                        name: product.name.clone(),
                        price: product.price,
                        quantity: *quantity,
                    })
                })
                .collect()
        })
        .unwrap_or_default();
    Json::<Vec<CartItem>>(items).into_response()
}

async fn add_to_cart(
    State(state): State<SharedState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<AddToCartRequest>,
) -> Response {
    if !state.options.catalog.iter().any(|p| p.id == body.product_id) {
        return bad_request(format!("product {} does not exist", body.product_id));
    }

    let mut store = state.store.lock().await;
    *store
        .carts
        .entry(user_id)
        .or_default()
        .entry(body.product_id)
        .or_default() += body.quantity;

    Json(CartAck {
        success: true,
        message: "added to cart".to_string(),
    })
    .into_response()
}

async fn remove_from_cart(
    State(state): State<SharedState>,
    AuthUser(user_id): AuthUser,
    Path(product_id): Path<ProductId>,
) -> Json<CartAck> {
    let mut store = state.store.lock().await;
    if !state.options.ignore_deletes
        && let Some(lines) = store.carts.get_mut(&user_id)
    {
        lines.remove(&product_id);
    }

    Json(CartAck {
        success: true,
        message: "removed".to_string(),
    })
}
