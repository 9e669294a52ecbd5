//! Uniform response envelope returned by every endpoint

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// `{ success, message?, data?, total?, user?, token? }`
#[derive(Debug, Serialize)]
pub struct Envelope<T, U = ()> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<U>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl<T, U> Envelope<T, U> {
    fn empty(success: bool) -> Self {
        Self {
            success,
            message: None,
            data: None,
            total: None,
            user: None,
            token: None,
        }
    }

    /// Successful response carrying a single payload
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            ..Self::empty(true)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach the public view of a user account
    pub fn with_user<V>(self, user: V) -> Envelope<T, V> {
        Envelope {
            success: self.success,
            message: self.message,
            data: self.data,
            total: self.total,
            user: Some(user),
            token: self.token,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

impl Envelope<()> {
    /// Successful response with only a message
    pub fn done(message: impl Into<String>) -> Self {
        Self::empty(true).with_message(message)
    }

    /// Failed response with a client-facing message
    pub fn failure(message: impl Into<String>) -> Self {
        Self::empty(false).with_message(message)
    }
}

impl<T> Envelope<Vec<T>> {
    /// Successful list response; `total` is the number of records
    pub fn list(items: Vec<T>) -> Self {
        Self {
            total: Some(items.len()),
            data: Some(items),
            ..Self::empty(true)
        }
    }
}

impl<T: Serialize, U: Serialize> IntoResponse for Envelope<T, U> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
