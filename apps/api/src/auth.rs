//! Bearer-token authentication.
//!
//! Handlers take an [`AuthenticatedUser`] argument; the extractor pulls the
//! `Authorization: Bearer <token>` header and asks the configured
//! [`AuthVerifier`] who it belongs to. Any failure rejects with 401.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::AppError;
use crate::state::AppState;

const IDENTITY_TOOLKIT_LOOKUP_URL: &str =
    "https://identitytoolkit.googleapis.com/v1/accounts:lookup";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Bearer token not provided")]
    MissingToken,

    #[error("Invalid authentication credentials: {0}")]
    InvalidToken(String),

    #[error("Identity provider unreachable: {0}")]
    Http(#[from] reqwest::Error),
}

/// The verified caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub email: Option<String>,
}

#[async_trait]
pub trait AuthVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError>;
}

/// Verifies Firebase ID tokens through the Identity Toolkit `accounts:lookup`
/// endpoint. The project's web API key scopes the lookup to that project.
#[derive(Clone)]
pub struct FirebaseAuthVerifier {
    client: Client,
    api_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    id_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LookupError {
    error: LookupErrorBody,
}

#[derive(Debug, Deserialize)]
struct LookupErrorBody {
    message: String,
}

impl FirebaseAuthVerifier {
    pub fn new(api_key: String) -> Result<Self, AuthError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()?,
            api_key,
        })
    }
}

#[async_trait]
impl AuthVerifier for FirebaseAuthVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let response = self
            .client
            .post(IDENTITY_TOOLKIT_LOOKUP_URL)
            .query(&[("key", self.api_key.as_str())])
            .json(&LookupRequest { id_token: token })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<LookupError>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("status {status}"));
            return Err(AuthError::InvalidToken(message));
        }

        let lookup: LookupResponse = response.json().await?;
        identity_from_lookup(lookup)
    }
}

fn identity_from_lookup(lookup: LookupResponse) -> Result<Identity, AuthError> {
    let user = lookup
        .users
        .into_iter()
        .next()
        .ok_or_else(|| AuthError::InvalidToken("no user for token".to_string()))?;
    Ok(Identity {
        uid: user.local_id,
        email: user.email,
    })
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let (scheme, token) = value.split_once(' ').ok_or(AuthError::MissingToken)?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

/// Extractor for routes that require a signed-in caller.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = bearer_token(&parts.headers)?;
        let identity = state.auth.verify(token).await?;
        Ok(AuthenticatedUser(identity))
    }
}
