use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::auth::{AuthHeader, Credential};
use crate::config::Hostnames;
use crate::errors::{Error, Result};
use crate::pagination::PageLimits;
use crate::transport::{HttpTransport, ReqwestTransport, Request, DEFAULT_TIMEOUT};

/// Environment variable read when no credential is configured.
pub const ACCESS_TOKEN_ENV: &str = "DOLBYIO_ACCESS_TOKEN";

/// Builder for constructing a [`Client`] with custom configuration.
///
/// # Example
///
/// ```no_run
/// use dolbyio_rest::{ClientBuilder, Credential, Hostnames};
/// use std::time::Duration;
///
/// # fn example() -> dolbyio_rest::Result<()> {
/// let client = ClientBuilder::new()
///     .credential(Credential::api_key("my_api_key"))
///     .hostnames(Hostnames::default().media("media.staging.example.com"))
///     .timeout(Duration::from_secs(120))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    credential: Option<Credential>,
    hostnames: Hostnames,
    timeout: Duration,
    page_limits: PageLimits,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            credential: None,
            hostnames: Hostnames::default(),
            timeout: DEFAULT_TIMEOUT,
            page_limits: PageLimits::default(),
            transport: None,
        }
    }

    /// Set the credential used to authenticate every request.
    pub fn credential(mut self, credential: impl Into<Credential>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    /// Override the platform hosts.
    pub fn hostnames(mut self, hostnames: Hostnames) -> Self {
        self.hostnames = hostnames;
        self
    }

    /// Set the HTTP request timeout (defaults to 60 seconds).
    ///
    /// Ignored when a custom transport is supplied.
    pub fn timeout(mut self, d: Duration) -> Self {
        self.timeout = d;
        self
    }

    /// Bound the `list_all_*` calls. Unbounded by default.
    pub fn page_limits(mut self, limits: PageLimits) -> Self {
        self.page_limits = limits;
        self
    }

    /// Send requests through a custom transport instead of reqwest.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the [`Client`].
    ///
    /// If no credential was set via [`credential`](Self::credential), the
    /// builder reads a bearer token from the `DOLBYIO_ACCESS_TOKEN`
    /// environment variable.
    ///
    /// Returns [`Error::Authentication`] if no credential is available and
    /// [`Error::InvalidCredential`] if it cannot be sent as a header.
    pub fn build(self) -> Result<Client> {
        let credential = self
            .credential
            .or_else(|| std::env::var(ACCESS_TOKEN_ENV).ok().map(Credential::bearer))
            .ok_or_else(|| Error::Authentication {
                message: "a credential is required. Pass it to ClientBuilder::credential() \
                          or set the DOLBYIO_ACCESS_TOKEN environment variable."
                    .into(),
            })?;
        let auth = credential.to_header()?;

        let reqwest_transport = ReqwestTransport::with_timeout(self.timeout)?;
        let http = reqwest_transport.client().clone();
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(reqwest_transport),
        };

        Ok(Client {
            inner: Arc::new(Inner {
                hostnames: self.hostnames,
                auth,
                transport,
                http,
                page_limits: self.page_limits,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The Dolby.io REST API client.
///
/// One client carries one credential. Endpoint methods are grouped by
/// platform: communications monitoring, media processing and streaming.
/// Cloning is cheap and shares the underlying connection pool.
///
/// # Example
///
/// ```no_run
/// use dolbyio_rest::{Client, ConferenceFilter};
///
/// # async fn example() -> dolbyio_rest::Result<()> {
/// let client = Client::new("my_access_token")?;
///
/// let conferences = client
///     .list_all_conferences(&ConferenceFilter { max: Some(100), ..Default::default() })
///     .await?;
/// println!("{} conferences", conferences.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

struct Inner {
    hostnames: Hostnames,
    auth: AuthHeader,
    transport: Arc<dyn HttpTransport>,
    /// Raw client for transfers that bypass the JSON transport (signed URL uploads).
    http: reqwest::Client,
    page_limits: PageLimits,
}

impl Client {
    /// Create a client authenticating with a bearer token and default settings.
    ///
    /// For customization, use [`ClientBuilder`] instead.
    pub fn new(access_token: impl Into<String>) -> Result<Self> {
        ClientBuilder::new()
            .credential(Credential::bearer(access_token))
            .build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn hostnames(&self) -> &Hostnames {
        &self.inner.hostnames
    }

    // -----------------------------------------------------------------------
    // Crate-internal helpers shared by the endpoint modules
    // -----------------------------------------------------------------------

    pub(crate) fn transport(&self) -> &dyn HttpTransport {
        self.inner.transport.as_ref()
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }

    pub(crate) fn page_limits(&self) -> PageLimits {
        self.inner.page_limits
    }

    /// Attach the credential header.
    pub(crate) fn authorize(&self, request: Request) -> Request {
        self.inner.auth.apply(request)
    }

    /// Send an authorized request and return the raw JSON body.
    pub(crate) async fn send_raw(&self, request: Request) -> Result<Value> {
        let request = self.authorize(request);
        self.transport().send(&request).await
    }

    /// Send an authorized request and decode the body into `T`.
    pub(crate) async fn send<T: DeserializeOwned>(&self, request: Request) -> Result<T> {
        let context = format!("{} {}", request.method, request.path);
        let body = self.send_raw(request).await?;
        serde_json::from_value(body).map_err(|e| Error::decode(context, e))
    }
}
