//! HTTP client for the Onix WAPI

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

use onix_api::{InventoryDocument, Resource, WapiResult};

use crate::error::{ClientError, Result};

const JSON: &str = "application/json";

/// Connection settings shared by the WAPI client and the token issuer
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// WAPI base URI; `https://` is assumed when no scheme is given
    pub uri: String,
    /// Verify the server TLS certificate
    pub verify_ssl: bool,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ClientSettings {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            verify_ssl: true,
            timeout: Duration::from_secs(30),
        }
    }

    /// Build the underlying `reqwest::Client`
    ///
    /// # Errors
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn http_client(&self) -> Result<Client> {
        Ok(Client::builder()
            .danger_accept_invalid_certs(!self.verify_ssl)
            .timeout(self.timeout)
            .build()?)
    }
}

/// Prefix `https://` when the address has no scheme and drop trailing slashes
#[must_use]
pub fn normalize_uri(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

/// Onix WAPI client
#[derive(Debug, Clone)]
pub struct WapiClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl WapiClient {
    /// Create a client; an empty or missing token sends no `Authorization` header
    ///
    /// # Errors
    /// Returns an error if the URI is invalid or the HTTP client cannot be built.
    pub fn new(settings: &ClientSettings, token: Option<String>) -> Result<Self> {
        Self::with_client(settings, settings.http_client()?, token)
    }

    /// Create a client around an existing `reqwest::Client`
    ///
    /// # Errors
    /// Returns an error if the URI is invalid.
    pub fn with_client(
        settings: &ClientSettings,
        client: Client,
        token: Option<String>,
    ) -> Result<Self> {
        let base_url = Url::parse(&normalize_uri(&settings.uri))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Validation(format!(
                "cannot use {base_url} as a base URL"
            )));
        }

        Ok(Self {
            client,
            base_url,
            token: token.filter(|token| !token.is_empty()),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build a full URL by appending path segments to the base URL
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ClientError::Validation(format!("cannot use {} as a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Attach headers, send, and return the body of a successful response
    async fn send(&self, request: RequestBuilder) -> Result<String> {
        let mut request = request.header(CONTENT_TYPE, JSON);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let body = body.trim();
            return Err(ClientError::Transport {
                message: format!("HTTP status {status}"),
                body: (!body.is_empty()).then(|| body.to_string()),
            });
        }

        Ok(body)
    }

    /// Fetch the items and links tagged `tag` under inventory `key`
    ///
    /// Slashes are removed from both values before they are placed in the path.
    ///
    /// # Errors
    /// Returns [`ClientError::Transport`] if the request fails and
    /// [`ClientError::Parse`] if the body is not an inventory document.
    #[instrument(skip(self))]
    pub async fn fetch_inventory(&self, key: &str, tag: &str) -> Result<InventoryDocument> {
        let key = key.replace('/', "");
        let tag = tag.replace('/', "");
        let url = self.url(&["data", &key, "tag", &tag])?;
        debug!(%url, "fetching inventory");

        let body = self.send(self.client.get(url)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Create or update `{resource}/{key}`
    ///
    /// # Errors
    /// Returns an error if the request fails or the result cannot be parsed.
    #[instrument(skip(self, payload))]
    pub async fn put<T: Serialize + ?Sized>(
        &self,
        resource: Resource,
        key: &str,
        payload: &T,
    ) -> Result<WapiResult> {
        let url = self.url(&[resource.path_segment(), key])?;
        let body = serde_json::to_vec(payload)
            .map_err(|e| ClientError::Validation(format!("invalid payload: {e}")))?;
        debug!(%url, "putting resource");

        let body = self.send(self.client.put(url).body(body)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Delete `{resource}/{key}`
    ///
    /// # Errors
    /// Returns an error if the request fails or the result cannot be parsed.
    #[instrument(skip(self))]
    pub async fn delete(&self, resource: Resource, key: &str) -> Result<WapiResult> {
        let url = self.url(&[resource.path_segment(), key])?;
        debug!(%url, "deleting resource");

        let body = self.send(self.client.delete(url)).await?;
        Ok(serde_json::from_str(&body)?)
    }
}
