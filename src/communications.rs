//! Communications monitoring endpoints (`/v1/monitor`).

use std::collections::HashMap;

use crate::client::Client;
use crate::errors::Result;
use crate::models::{
    Conference, ConferenceFilter, ParticipantFilter, ParticipantStatistics, Recording,
    RecordingFilter, WebhookEvent, WebhookFilter,
};
use crate::pagination::{self, MapPage, Page, CURSOR_PARAM};
use crate::transport::{path_segment, Request};

const MONITOR: &str = "/v1/monitor";

impl Client {
    /// Fetch one page of conferences.
    ///
    /// Pass [`Page::next`] back as [`ConferenceFilter::start`] to continue,
    /// or use [`list_all_conferences`](Self::list_all_conferences).
    pub async fn list_conferences(&self, filter: &ConferenceFilter) -> Result<Page<Conference>> {
        let request = self.monitor_request("/conferences", filter.query_pairs());
        let body = self.send_raw(request).await?;
        Page::from_value(&body, "conferences")
    }

    /// Fetch every conference matching the filter, following all pages.
    pub async fn list_all_conferences(&self, filter: &ConferenceFilter) -> Result<Vec<Conference>> {
        let request = self.monitor_listing("/conferences", filter.query_pairs());
        pagination::get_all(self.transport(), request, "conferences", self.page_limits()).await
    }

    /// Fetch a single conference by id.
    pub async fn get_conference(&self, conference_id: &str, livestats: bool) -> Result<Conference> {
        let mut request = self.monitor_request(
            &format!("/conferences/{}", path_segment(conference_id)),
            Vec::new(),
        );
        if livestats {
            request = request.query("livestats", "true");
        }
        self.send(request).await
    }

    /// Fetch one page of participant statistics, keyed by user id.
    pub async fn list_participants(
        &self,
        conference_id: &str,
        filter: &ParticipantFilter,
    ) -> Result<MapPage<ParticipantStatistics>> {
        let request = self.monitor_request(
            &format!("/conferences/{}/participants", path_segment(conference_id)),
            filter.query_pairs(),
        );
        let body = self.send_raw(request).await?;
        MapPage::from_value(&body, "participants")
    }

    /// Fetch the statistics of every participant of a conference, keyed by
    /// user id. A participant listed on several pages keeps its latest entry.
    pub async fn list_all_participants(
        &self,
        conference_id: &str,
        filter: &ParticipantFilter,
    ) -> Result<HashMap<String, ParticipantStatistics>> {
        let request = self.monitor_listing(
            &format!("/conferences/{}/participants", path_segment(conference_id)),
            filter.query_pairs(),
        );
        pagination::get_all_map(self.transport(), request, "participants", self.page_limits()).await
    }

    /// Fetch one page of recordings.
    pub async fn list_recordings(&self, filter: &RecordingFilter) -> Result<Page<Recording>> {
        let request = self.monitor_request("/recordings", filter.query_pairs());
        let body = self.send_raw(request).await?;
        Page::from_value(&body, "recordings")
    }

    /// Fetch every recording matching the filter, following all pages.
    pub async fn list_all_recordings(&self, filter: &RecordingFilter) -> Result<Vec<Recording>> {
        let request = self.monitor_listing("/recordings", filter.query_pairs());
        pagination::get_all(self.transport(), request, "recordings", self.page_limits()).await
    }

    /// Fetch one page of webhook deliveries.
    pub async fn list_webhooks(&self, filter: &WebhookFilter) -> Result<Page<WebhookEvent>> {
        let request = self.monitor_request("/webhooks", filter.query_pairs());
        let body = self.send_raw(request).await?;
        Page::from_value(&body, "webhooks")
    }

    /// Fetch every webhook delivery matching the filter, following all pages.
    pub async fn list_all_webhooks(&self, filter: &WebhookFilter) -> Result<Vec<WebhookEvent>> {
        let request = self.monitor_listing("/webhooks", filter.query_pairs());
        pagination::get_all(self.transport(), request, "webhooks", self.page_limits()).await
    }

    fn monitor_request(&self, path: &str, pairs: Vec<(&'static str, String)>) -> Request {
        let request = Request::get(&self.hostnames().communications, format!("{MONITOR}{path}"));
        if pairs.is_empty() {
            request
        } else {
            request.query_pairs(pairs)
        }
    }

    /// Authorized first page request of a multi-page listing. The paginator
    /// owns the cursor, so any caller supplied `start` is dropped.
    fn monitor_listing(&self, path: &str, pairs: Vec<(&'static str, String)>) -> Request {
        let pairs = pairs.into_iter().filter(|(k, _)| *k != CURSOR_PARAM).collect();
        self.authorize(self.monitor_request(path, pairs))
    }
}
