//! # Dolby.io REST APIs for Rust
//!
//! Typed async client for the Dolby.io REST APIs: communications monitoring
//! (conferences, participants, recordings, webhooks), media processing
//! (uploads, enhance and analyze jobs) and streaming (publish tokens,
//! clusters).
//!
//! ## Quick start
//!
//! ```no_run
//! use dolbyio_rest::{Client, ConferenceFilter};
//!
//! #[tokio::main]
//! async fn main() -> dolbyio_rest::Result<()> {
//!     let client = Client::new("my_access_token")?;
//!
//!     // Follows the `next` cursor until every page has been read.
//!     let filter = ConferenceFilter { max: Some(100), ..Default::default() };
//!     for conf in client.list_all_conferences(&filter).await? {
//!         println!("{} ({})", conf.conf_alias, conf.conf_id);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Builder pattern
//!
//! ```no_run
//! use dolbyio_rest::{ClientBuilder, Credential, Hostnames, PageLimits, TokenProvider};
//! use std::time::Duration;
//!
//! # async fn example() -> dolbyio_rest::Result<()> {
//! let token = TokenProvider::new("app_key", "app_secret")?.fetch(None).await?;
//! let client = ClientBuilder::new()
//!     .credential(token)
//!     .hostnames(Hostnames::default().communications("comms.staging.example.com"))
//!     .page_limits(PageLimits::max_pages(500))
//!     .timeout(Duration::from_secs(120))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

mod auth;
mod client;
mod communications;
mod config;
mod errors;
mod media;
mod models;
pub mod pagination;
mod streaming;
pub mod transport;

pub use auth::{AccessToken, AuthHeader, Credential, TokenProvider};
pub use client::{Client, ClientBuilder, ACCESS_TOKEN_ENV};
pub use config::Hostnames;
pub use errors::{Error, Result};
pub use models::{
    ClusterInfo, ClusterRegion, Conference, ConferenceFilter, ConferenceOwner, CreatePublishToken,
    MediaJob, MediaJobError, MediaJobKind, MediaJobRequest, MediaJobStatus, ParticipantConnection,
    ParticipantFilter, ParticipantStatistics, PollOptions, PublishToken, Recording,
    RecordingFilter, RecordingMix, TokenStream, WebhookEvent, WebhookFilter, WebhookResponse,
};
pub use pagination::{MapPage, Page, PageLimits};
pub use transport::{HttpTransport, ReqwestTransport, Request, RequestBody};
