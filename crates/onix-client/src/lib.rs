//! onix-client: Onix WAPI HTTP client
//!
//! Fetches tagged inventory snapshots and performs CRUD calls against the
//! Onix CMDB Web API, authenticating with no token, a basic token or an
//! OAuth 2.0 bearer token.
//!
//! # Example
//!
//! ```no_run
//! use onix_client::{AuthMode, ClientSettings, Credentials, WapiClient, issuer};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = ClientSettings::new("cmdb.example.com");
//! let credentials = Credentials {
//!     username: Some("admin".into()),
//!     password: Some("secret".into()),
//!     ..Credentials::default()
//! };
//!
//! let token = issuer(AuthMode::Basic, &credentials, &settings)?.issue().await?;
//! let client = WapiClient::new(&settings, token)?;
//! let document = client.fetch_inventory("prod", "v1").await?;
//! println!("{} items", document.items.len());
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod error;
pub mod http;

pub use auth::{AuthMode, Credentials, TokenIssuer, basic_token, issuer};
pub use error::{ClientError, Result};
pub use http::{ClientSettings, WapiClient, normalize_uri};
