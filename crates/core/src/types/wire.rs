//! JSON bodies exchanged with the target shop API.
//!
//! Field names follow the API's camelCase convention. The probe serializes
//! the request types; the mock API in the integration tests deserializes
//! them and serializes the response types.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId, UserId};

/// `POST /api/auth/register` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nick_name: Option<String>,
}

/// `POST /api/auth/register` success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub id: UserId,
    pub message: String,
}

/// `POST /api/auth/login` body.
///
/// `identifier` is either the email or the phone number of the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

/// `POST /api/auth/login` success body.
///
/// The probe treats `user` as opaque JSON, so it is generic here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse<U = serde_json::Value> {
    pub token: String,
    pub user: U,
}

/// `POST /api/cart/add` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// One line of the `GET /api/cart` listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    pub quantity: i32,
}

/// Acknowledgement returned by the cart mutation endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartAck {
    pub success: bool,
    pub message: String,
}
