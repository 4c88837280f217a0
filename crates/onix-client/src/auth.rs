//! Access tokens for the WAPI
//!
//! The WAPI accepts no authentication, HTTP basic authentication, or an
//! OAuth 2.0 bearer token obtained with the resource owner password flow.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use crate::error::{ClientError, Result};
use crate::http::ClientSettings;

/// Authentication mode selected by `auth_mode`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    #[default]
    None,
    Basic,
    Oidc,
}

impl FromStr for AuthMode {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(AuthMode::None),
            "basic" => Ok(AuthMode::Basic),
            "oidc" => Ok(AuthMode::Oidc),
            _ => Err(ClientError::Validation(format!(
                "auth_mode {s} is not supported"
            ))),
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AuthMode::None => "none",
            AuthMode::Basic => "basic",
            AuthMode::Oidc => "oidc",
        })
    }
}

/// Credentials used by the basic and oidc modes
#[derive(Clone, Default)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
    /// OAuth 2.0 token endpoint
    pub token_uri: Option<String>,
    /// OAuth 2.0 client id
    pub client_id: Option<String>,
    /// OAuth 2.0 client secret
    pub secret: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("token_uri", &self.token_uri)
            .field("client_id", &self.client_id)
            .field("secret", &self.secret.as_ref().map(|_| "***"))
            .finish()
    }
}

fn required<'a>(value: Option<&'a String>, name: &str, mode: AuthMode) -> Result<&'a str> {
    value
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ClientError::Validation(format!("{name} is required for auth_mode {mode}")))
}

/// `Basic base64(username:password)`
#[must_use]
pub fn basic_token(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

/// Source of the `Authorization` header value
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    /// Issue a token; `None` means requests go out unauthenticated
    async fn issue(&self) -> Result<Option<String>>;
}

/// No authentication
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

#[async_trait]
impl TokenIssuer for NoAuth {
    async fn issue(&self) -> Result<Option<String>> {
        Ok(None)
    }
}

/// HTTP basic authentication
#[derive(Clone)]
pub struct BasicAuth {
    username: String,
    password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

#[async_trait]
impl TokenIssuer for BasicAuth {
    async fn issue(&self) -> Result<Option<String>> {
        Ok(Some(basic_token(&self.username, &self.password)))
    }
}

#[derive(Debug, Deserialize)]
struct OAuthTokenResponse {
    access_token: String,
}

/// OAuth 2.0 resource owner password flow
#[derive(Clone)]
pub struct OidcAuth {
    client: Client,
    token_uri: Url,
    client_id: String,
    secret: String,
    username: String,
    password: String,
}

impl OidcAuth {
    /// Form body sent to the token endpoint
    fn form_body(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", "password")
            .append_pair("username", &self.username)
            .append_pair("password", &self.password)
            .append_pair("scope", "openid onix")
            .finish()
    }
}

#[async_trait]
impl TokenIssuer for OidcAuth {
    #[instrument(skip(self), fields(token_uri = %self.token_uri))]
    async fn issue(&self) -> Result<Option<String>> {
        debug!("requesting access token");

        let response = self
            .client
            .post(self.token_uri.clone())
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, basic_token(&self.client_id, &self.secret))
            .header(CACHE_CONTROL, "no-cache")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(self.form_body())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let body = body.trim();
            return Err(ClientError::Transport {
                message: format!("token request returned HTTP status {status}"),
                body: (!body.is_empty()).then(|| body.to_string()),
            });
        }

        let token: OAuthTokenResponse = serde_json::from_str(&body)?;
        Ok(Some(format!("Bearer {}", token.access_token)))
    }
}

/// Build the issuer for `mode`, validating the credentials it needs
///
/// # Errors
/// Returns [`ClientError::Validation`] when a required credential is missing
/// or the token URI is invalid.
pub fn issuer(
    mode: AuthMode,
    credentials: &Credentials,
    settings: &ClientSettings,
) -> Result<Box<dyn TokenIssuer>> {
    match mode {
        AuthMode::None => Ok(Box::new(NoAuth)),
        AuthMode::Basic => {
            let username = required(credentials.username.as_ref(), "username", mode)?;
            let password = required(credentials.password.as_ref(), "password", mode)?;
            Ok(Box::new(BasicAuth::new(username, password)))
        }
        AuthMode::Oidc => {
            let token_uri = required(credentials.token_uri.as_ref(), "token_uri", mode)?;
            Ok(Box::new(OidcAuth {
                client: settings.http_client()?,
                token_uri: Url::parse(token_uri)?,
                client_id: required(credentials.client_id.as_ref(), "client_id", mode)?.to_string(),
                secret: required(credentials.secret.as_ref(), "secret", mode)?.to_string(),
                username: required(credentials.username.as_ref(), "username", mode)?.to_string(),
                password: required(credentials.password.as_ref(), "password", mode)?.to_string(),
            }))
        }
    }
}
