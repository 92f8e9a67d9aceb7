use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Communications: monitoring
// ---------------------------------------------------------------------------

/// A conference as reported by the monitoring API.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conference {
    pub conf_id: String,
    pub conf_alias: String,

    /// Epoch milliseconds.
    pub start: u64,

    /// Epoch milliseconds. Absent while the conference is live.
    pub end: Option<u64>,

    #[serde(default)]
    pub live: bool,

    /// Milliseconds.
    pub duration: Option<u64>,

    /// e.g. "RTC", "STREAMING".
    #[serde(rename = "type")]
    pub kind: Option<String>,

    pub region: Option<String>,
    pub dolby_voice: Option<bool>,
    pub nb_users: Option<u32>,
    pub nb_listeners: Option<u32>,
    pub nb_pstn: Option<u32>,
    pub owner: Option<ConferenceOwner>,

    /// Present when `livestats` was requested. Shape varies with the product.
    pub statistics: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceOwner {
    pub user_id: String,
    pub client: Option<String>,
    pub metadata: Option<Value>,
}

/// Per-participant statistics, keyed by user id in listings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantStatistics {
    pub user_id: Option<String>,
    pub external_id: Option<String>,
    pub name: Option<String>,

    #[serde(default)]
    pub connections: Vec<ParticipantConnection>,

    pub stats: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantConnection {
    pub ip_address: Option<String>,
    /// Epoch milliseconds.
    pub start: Option<u64>,
    /// Epoch milliseconds.
    pub end: Option<u64>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recording {
    pub conf_id: String,
    pub conf_alias: String,
    pub region: Option<String>,

    /// Epoch milliseconds the recording became available.
    pub ts: u64,

    /// Epoch milliseconds.
    pub start_time: Option<u64>,

    /// Milliseconds.
    pub duration: Option<u64>,

    /// Bytes.
    pub size: Option<u64>,

    pub url: Option<String>,
    pub mix: Option<RecordingMix>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingMix {
    pub mix_id: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub layout_url: Option<String>,
}

/// One delivery of a webhook notification.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    pub id: String,
    /// Event type, e.g. "Conference.Created".
    pub webhook: String,
    pub url: String,
    pub conf_id: Option<String>,
    pub third_party_id: Option<String>,

    /// Epoch milliseconds.
    pub ts: u64,

    pub response: Option<WebhookResponse>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WebhookResponse {
    pub status: u16,
    pub headers: Option<Value>,
    pub body: Option<String>,
}

/// Filters for `list_conferences` / `list_all_conferences`.
///
/// `start` is only honoured by the single-page call; the multi-page call
/// manages the cursor itself.
#[derive(Debug, Clone, Default)]
pub struct ConferenceFilter {
    /// Epoch milliseconds, inclusive.
    pub from: Option<u64>,
    /// Epoch milliseconds, exclusive.
    pub to: Option<u64>,
    /// Page size.
    pub max: Option<u32>,
    pub start: Option<String>,
    /// Regular expression on the conference alias.
    pub alias: Option<String>,
    /// Only conferences still in progress.
    pub active: bool,
    /// Only conferences joined by this external id.
    pub external_id: Option<String>,
    /// Attach live statistics to each conference.
    pub livestats: bool,
}

impl ConferenceFilter {
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = window_pairs(self.from, self.to, self.max, self.start.as_deref());
        if let Some(alias) = &self.alias {
            pairs.push(("alias", alias.clone()));
        }
        if self.active {
            pairs.push(("active", "true".to_string()));
        }
        if let Some(exid) = &self.external_id {
            pairs.push(("exid", exid.clone()));
        }
        if self.livestats {
            pairs.push(("livestats", "true".to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParticipantFilter {
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub max: Option<u32>,
    pub start: Option<String>,
    /// e.g. "USER", "LISTENER", "PSTN".
    pub participant_type: Option<String>,
    pub user_id: Option<String>,
}

impl ParticipantFilter {
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = window_pairs(self.from, self.to, self.max, self.start.as_deref());
        if let Some(kind) = &self.participant_type {
            pairs.push(("type", kind.clone()));
        }
        if let Some(user_id) = &self.user_id {
            pairs.push(("userId", user_id.clone()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingFilter {
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub max: Option<u32>,
    pub start: Option<String>,
    pub conf_id: Option<String>,
    pub region: Option<String>,
}

impl RecordingFilter {
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = window_pairs(self.from, self.to, self.max, self.start.as_deref());
        if let Some(conf_id) = &self.conf_id {
            pairs.push(("confId", conf_id.clone()));
        }
        if let Some(region) = &self.region {
            pairs.push(("region", region.clone()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Default)]
pub struct WebhookFilter {
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub max: Option<u32>,
    pub start: Option<String>,
    /// Event type, e.g. "Recording.MP4.Available".
    pub event: Option<String>,
    pub conf_id: Option<String>,
}

impl WebhookFilter {
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = window_pairs(self.from, self.to, self.max, self.start.as_deref());
        if let Some(event) = &self.event {
            pairs.push(("type", event.clone()));
        }
        if let Some(conf_id) = &self.conf_id {
            pairs.push(("confId", conf_id.clone()));
        }
        pairs
    }
}

fn window_pairs(
    from: Option<u64>,
    to: Option<u64>,
    max: Option<u32>,
    start: Option<&str>,
) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();
    if let Some(from) = from {
        pairs.push(("from", from.to_string()));
    }
    if let Some(to) = to {
        pairs.push(("to", to.to_string()));
    }
    if let Some(max) = max {
        pairs.push(("max", max.to_string()));
    }
    if let Some(start) = start {
        pairs.push(("start", start.to_string()));
    }
    pairs
}

// ---------------------------------------------------------------------------
// Media
// ---------------------------------------------------------------------------

/// The kind of asynchronous media job, which also picks its endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaJobKind {
    Enhance,
    Analyze,
    AnalyzeSpeech,
    Transcode,
}

impl MediaJobKind {
    pub fn path(self) -> &'static str {
        match self {
            Self::Enhance => "/media/enhance",
            Self::Analyze => "/media/analyze",
            Self::AnalyzeSpeech => "/media/analyze/speech",
            Self::Transcode => "/media/transcode",
        }
    }
}

/// Body of a job submission. Job specific settings go into `options` and are
/// sent as top-level fields next to `input` and `output`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MediaJobRequest {
    /// `dlb://` or `https://` location of the source media.
    pub input: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl MediaJobRequest {
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: Some(output.into()),
            options: Map::new(),
        }
    }

    /// Add a job specific setting, e.g. `("content", json!({"type": "podcast"}))`.
    pub fn option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum MediaJobStatus {
    Pending,
    Running,
    Success,
    Failed,
    InternalError,
    Cancelled,
    /// A status this version of the crate does not know about.
    #[serde(other)]
    Unknown,
}

/// Current state of a media job. Check `status` or use the `is_*` helpers.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MediaJob {
    pub path: Option<String>,
    pub status: MediaJobStatus,

    /// Percent, 0 to 100.
    #[serde(default)]
    pub progress: u8,

    pub api_version: Option<String>,

    /// Job output once `status` is `Success` (analyze jobs carry their report here).
    pub result: Option<Value>,

    pub error: Option<MediaJobError>,
}

impl MediaJob {
    /// Terminal = won't change anymore.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            MediaJobStatus::Success
                | MediaJobStatus::Failed
                | MediaJobStatus::InternalError
                | MediaJobStatus::Cancelled
        )
    }

    pub fn is_success(&self) -> bool {
        self.status == MediaJobStatus::Success
    }

    /// Failed, InternalError or Cancelled.
    pub fn is_failed(&self) -> bool {
        self.is_terminal() && !self.is_success()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MediaJobError {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub title: Option<String>,
    pub detail: Option<String>,
}

/// Polling config for `wait_for_job`.
pub struct PollOptions {
    /// Default: 5s.
    pub poll_interval: Duration,
    /// Default: 1h.
    pub timeout: Duration,
    /// Called on each poll iteration with the current `MediaJob`.
    #[allow(clippy::type_complexity)]
    pub on_progress: Option<Box<dyn Fn(&MediaJob) + Send + Sync>>,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            timeout: Duration::from_secs(60 * 60),
            on_progress: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Streaming
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishToken {
    pub id: u64,
    pub label: String,
    pub token: String,
    /// ISO 8601.
    pub added_on: String,
    /// ISO 8601. `None` for tokens that never expire.
    pub expires_on: Option<String>,
    pub is_active: bool,
    pub streams: Vec<TokenStream>,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    #[serde(default)]
    pub allowed_ip_addresses: Vec<String>,
    pub origin_cluster: Option<String>,
    #[serde(default)]
    pub record: bool,
    #[serde(default)]
    pub multisource: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenStream {
    pub stream_name: String,
    #[serde(default)]
    pub is_regex: bool,
}

impl TokenStream {
    pub fn named(stream_name: impl Into<String>) -> Self {
        Self {
            stream_name: stream_name.into(),
            is_regex: false,
        }
    }

    /// Matches every stream name the regular expression accepts.
    pub fn pattern(regex: impl Into<String>) -> Self {
        Self {
            stream_name: regex.into(),
            is_regex: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePublishToken {
    pub label: String,
    pub streams: Vec<TokenStream>,
    /// ISO 8601.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_on: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_origins: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_ip_addresses: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_cluster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multisource: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ClusterInfo {
    pub default: ClusterRegion,
    #[serde(default)]
    pub available: Vec<ClusterRegion>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ClusterRegion {
    pub id: String,
    pub name: String,
    pub rtmp: Option<String>,
}

// ---------------------------------------------------------------------------
// Internal deserialization helpers (not part of the public API surface)
// ---------------------------------------------------------------------------

/// Streaming responses wrap their payload in `{ "status": ..., "data": ... }`.
#[derive(Deserialize)]
pub(crate) struct Envelope<T> {
    #[allow(dead_code)]
    pub status: Option<String>,
    pub data: T,
}

/// POST /media/{kind} response.
#[derive(Deserialize)]
pub(crate) struct JobCreated {
    pub job_id: String,
}

/// POST /media/input response.
#[derive(Deserialize)]
pub(crate) struct UploadUrl {
    pub url: String,
}
