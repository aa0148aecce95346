//! HTTP client for the target shop API.
//!
//! Each method makes exactly one request. An HTTP-level failure (non-2xx)
//! comes back as `Ok` with a negative result; only transport and decoding
//! problems are `Err`.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use shop_probe_core::{AddToCartRequest, LoginRequest, ProductId, RegisterRequest};
use tracing::{debug, instrument, warn};

use crate::config::ProbeConfig;
use crate::error::ProbeError;
use crate::identity::Identity;

const SWAGGER_PATH: &str = "/swagger/index.html";
const REGISTER_PATH: &str = "/api/auth/register";
const LOGIN_PATH: &str = "/api/auth/login";
const CART_PATH: &str = "/api/cart";
const CART_ADD_PATH: &str = "/api/cart/add";

/// Bearer token and user record returned by a login.
///
/// An anonymous session (empty token, empty user object) stands for a
/// rejected login.
#[derive(Clone)]
pub struct Session {
    token: SecretString,
    pub user: Value,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

impl Session {
    #[must_use]
    pub fn new(token: impl Into<String>, user: Value) -> Self {
        let token: String = token.into();
        Self {
            token: SecretString::from(token),
            user,
        }
    }

    /// The session of a rejected login.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::new(String::new(), Value::Object(serde_json::Map::new()))
    }

    /// Whether login produced a token the cart endpoints can use.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.token.expose_secret().is_empty()
    }

    fn token(&self) -> &str {
        self.token.expose_secret()
    }
}

/// Result of a cart listing: whether it succeeded, and its body if so.
#[derive(Debug, Clone, PartialEq)]
pub struct CartSnapshot {
    pub ok: bool,
    pub body: Option<Value>,
}

impl CartSnapshot {
    /// Whether the listing succeeded with a JSON-falsy body.
    #[must_use]
    pub fn is_empty_cart(&self) -> bool {
        self.ok && self.body.as_ref().is_none_or(is_falsy)
    }

    /// The body serialized as JSON, `null` when absent.
    #[must_use]
    pub fn body_json(&self) -> String {
        self.body
            .as_ref()
            .map_or_else(|| "null".to_string(), Value::to_string)
    }
}

/// JSON truthiness: `null`, `false`, zero, and empty strings, arrays and
/// objects are falsy.
#[must_use]
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

/// Client for the shop API endpoints the probe exercises.
#[derive(Debug, Clone)]
pub struct ShopApiClient {
    client: Client,
    config: ProbeConfig,
}

impl ShopApiClient {
    /// Create a client for the configured base URL.
    ///
    /// No client-wide timeout is set; only the auth calls carry one.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(config: &ProbeConfig) -> Result<Self, ProbeError> {
        let client = Client::builder().build().map_err(ProbeError::Client)?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    #[must_use]
    pub const fn config(&self) -> &ProbeConfig {
        &self.config
    }

    // =========================================================================
    // Documentation
    // =========================================================================

    /// Fetch the Swagger UI page and return its status.
    ///
    /// # Errors
    ///
    /// Returns an error if the request does not complete.
    #[instrument(skip(self))]
    pub async fn swagger_status(&self) -> Result<StatusCode, ProbeError> {
        let response = send(SWAGGER_PATH, self.client.get(self.config.url(SWAGGER_PATH))).await?;
        Ok(response.status())
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Register `identity`. Returns whether the API answered 2xx.
    ///
    /// # Errors
    ///
    /// Returns an error if the request does not complete within the auth
    /// timeout.
    #[instrument(skip(self, identity), fields(email = %identity.email))]
    pub async fn register(&self, identity: &Identity) -> Result<bool, ProbeError> {
        let body = RegisterRequest {
            email: identity.email.to_string(),
            password: identity.password.expose_secret().to_string(),
            phone: None,
            nick_name: Some(identity.nickname().to_string()),
        };

        let request = self
            .client
            .post(self.config.url(REGISTER_PATH))
            .timeout(self.config.auth_timeout)
            .json(&body);

        let response = send(REGISTER_PATH, request).await?;
        Ok(check_success(REGISTER_PATH, &response))
    }

    /// Log in as `identity`.
    ///
    /// A non-2xx answer, or a 2xx body whose `token` is `null`, yields
    /// [`Session::anonymous`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request does not complete within the auth
    /// timeout, or if a 2xx body is not JSON, lacks `token` or `user`, or
    /// has a `token` that is neither a string nor `null`.
    #[instrument(skip(self, identity), fields(email = %identity.email))]
    pub async fn login(&self, identity: &Identity) -> Result<Session, ProbeError> {
        let body = LoginRequest {
            identifier: identity.email.to_string(),
            password: identity.password.expose_secret().to_string(),
        };

        let request = self
            .client
            .post(self.config.url(LOGIN_PATH))
            .timeout(self.config.auth_timeout)
            .json(&body);

        let response = send(LOGIN_PATH, request).await?;
        if !check_success(LOGIN_PATH, &response) {
            return Ok(Session::anonymous());
        }

        let mut data: Value = decode(LOGIN_PATH, response).await?;

        let token = match data.get("token") {
            Some(Value::String(token)) => Some(token.clone()),
            Some(Value::Null) => None,
            Some(other) => return Err(wrong_type(LOGIN_PATH, "token", "a string", other)),
            None => return Err(missing(LOGIN_PATH, "token")),
        };
        let user = data
            .get_mut("user")
            .map(Value::take)
            .ok_or_else(|| missing(LOGIN_PATH, "user"))?;

        let Some(token) = token else {
            warn!("Login answered without a token");
            return Ok(Session::anonymous());
        };

        debug!(user = %user, "Logged in");
        Ok(Session::new(token, user))
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add `quantity` of `product_id` to the session's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request does not complete.
    #[instrument(skip(self, session))]
    pub async fn add_to_cart(
        &self,
        session: &Session,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<bool, ProbeError> {
        let body = AddToCartRequest {
            product_id,
            quantity,
        };

        let request = self
            .client
            .post(self.config.url(CART_ADD_PATH))
            .bearer_auth(session.token())
            .json(&body);

        let response = send(CART_ADD_PATH, request).await?;
        Ok(check_success(CART_ADD_PATH, &response))
    }

    /// List the session's cart. The body is decoded only on 2xx.
    ///
    /// # Errors
    ///
    /// Returns an error if the request does not complete or a 2xx body is
    /// not JSON.
    #[instrument(skip(self, session))]
    pub async fn cart(&self, session: &Session) -> Result<CartSnapshot, ProbeError> {
        let request = self
            .client
            .get(self.config.url(CART_PATH))
            .bearer_auth(session.token());

        let response = send(CART_PATH, request).await?;
        if !check_success(CART_PATH, &response) {
            return Ok(CartSnapshot {
                ok: false,
                body: None,
            });
        }

        let body: Value = decode(CART_PATH, response).await?;
        Ok(CartSnapshot {
            ok: true,
            body: Some(body),
        })
    }

    /// Remove `product_id` from the session's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request does not complete.
    #[instrument(skip(self, session))]
    pub async fn remove_from_cart(
        &self,
        session: &Session,
        product_id: ProductId,
    ) -> Result<bool, ProbeError> {
        let path = format!("{CART_PATH}/{product_id}");
        let request = self
            .client
            .delete(self.config.url(&path))
            .bearer_auth(session.token());

        let response = send(&path, request).await?;
        Ok(check_success(&path, &response))
    }
}

async fn send(path: &str, request: RequestBuilder) -> Result<Response, ProbeError> {
    request.send().await.map_err(|source| ProbeError::Request {
        path: path.to_string(),
        source,
    })
}

async fn decode<T: serde::de::DeserializeOwned>(
    path: &str,
    response: Response,
) -> Result<T, ProbeError> {
    response.json().await.map_err(|source| ProbeError::Decode {
        path: path.to_string(),
        source,
    })
}

fn check_success(path: &str, response: &Response) -> bool {
    let status = response.status();
    if status.is_success() {
        debug!(path, %status, "Request succeeded");
        true
    } else {
        warn!(path, %status, "Request rejected");
        false
    }
}

fn missing(path: &str, field: &'static str) -> ProbeError {
    ProbeError::MissingField {
        path: path.to_string(),
        field,
    }
}

fn wrong_type(
    path: &str,
    field: &'static str,
    expected: &'static str,
    value: &Value,
) -> ProbeError {
    ProbeError::WrongType {
        path: path.to_string(),
        field,
        expected,
        found: json_type(value),
    }
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
