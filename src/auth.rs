//! Credentials and access token acquisition.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::DEFAULT_AUTH_HOSTNAME;
use crate::errors::{Error, Result};
use crate::transport::{HttpTransport, ReqwestTransport, Request};

const API_KEY_HEADER: &str = "x-api-key";
const TOKEN_PATH: &str = "/v1/auth/token";

/// An access token issued by the authentication API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AccessToken {
    pub access_token: String,

    /// Usually "Bearer". Treated as "Bearer" when empty.
    #[serde(default)]
    pub token_type: String,

    /// Lifetime in seconds.
    pub expires_in: Option<u64>,
}

impl AccessToken {
    /// Wrap a raw bearer token string.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            access_token: token.into(),
            token_type: "Bearer".to_string(),
            expires_in: None,
        }
    }
}

/// How requests authenticate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// Sent as the `x-api-key` header.
    ApiKey(String),
    /// Sent as `Authorization: <token_type> <access_token>`.
    Bearer(AccessToken),
}

impl Credential {
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey(key.into())
    }

    /// Bearer credential from a raw token string.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer(AccessToken::bearer(token))
    }

    /// Resolve into the header attached to every request.
    pub fn to_header(&self) -> Result<AuthHeader> {
        let (name, value) = match self {
            Self::ApiKey(key) => (HeaderName::from_static(API_KEY_HEADER), key.clone()),
            Self::Bearer(token) => {
                let kind = if token.token_type.is_empty() {
                    "Bearer"
                } else {
                    token.token_type.as_str()
                };
                (AUTHORIZATION, format!("{kind} {}", token.access_token))
            }
        };

        let mut value = HeaderValue::from_str(&value)
            .map_err(|_| Error::InvalidCredential("credential contains invalid header characters".into()))?;
        value.set_sensitive(true);

        Ok(AuthHeader { name, value })
    }
}

impl From<AccessToken> for Credential {
    fn from(token: AccessToken) -> Self {
        Self::Bearer(token)
    }
}

/// A resolved credential: one header added to each request.
#[derive(Debug, Clone)]
pub struct AuthHeader {
    pub name: HeaderName,
    pub value: HeaderValue,
}

impl AuthHeader {
    pub(crate) fn apply(&self, request: Request) -> Request {
        request.header(self.name.clone(), self.value.clone())
    }
}

/// Exchanges an app key and secret for an [`AccessToken`].
///
/// ```no_run
/// use dolbyio_rest::{Client, TokenProvider};
///
/// # async fn example() -> dolbyio_rest::Result<()> {
/// let token = TokenProvider::new("app_key", "app_secret")?
///     .fetch(Some(3600))
///     .await?;
/// let client = Client::builder().credential(token).build()?;
/// # Ok(())
/// # }
/// ```
pub struct TokenProvider {
    app_key: String,
    app_secret: String,
    hostname: String,
    transport: Arc<dyn HttpTransport>,
}

impl TokenProvider {
    pub fn new(app_key: impl Into<String>, app_secret: impl Into<String>) -> Result<Self> {
        Ok(Self {
            app_key: app_key.into(),
            app_secret: app_secret.into(),
            hostname: DEFAULT_AUTH_HOSTNAME.to_string(),
            transport: Arc::new(ReqwestTransport::new()?),
        })
    }

    /// Override the authentication host (defaults to `api.dolby.io`).
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = transport;
        self
    }

    /// Request a new token, optionally with a lifetime in seconds.
    pub async fn fetch(&self, expires_in: Option<u32>) -> Result<AccessToken> {
        let basic = STANDARD.encode(format!("{}:{}", self.app_key, self.app_secret));
        let mut authorization = HeaderValue::from_str(&format!("Basic {basic}"))
            .map_err(|_| Error::InvalidCredential("app key contains invalid characters".into()))?;
        authorization.set_sensitive(true);

        let mut form = vec![("grant_type".to_string(), "client_credentials".to_string())];
        if let Some(expires_in) = expires_in {
            form.push(("expires_in".to_string(), expires_in.to_string()));
        }

        let request = Request::post(&self.hostname, TOKEN_PATH)
            .header(AUTHORIZATION, authorization)
            .form(form);

        debug!(hostname = %self.hostname, "requesting access token");
        let body = self.transport.send(&request).await?;
        serde_json::from_value(body).map_err(|e| Error::decode("access token", e))
    }
}
