//! Media processing endpoints.

use std::path::Path;

use reqwest::header::CONTENT_TYPE;
use serde_json::json;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::client::Client;
use crate::errors::{Error, Result};
use crate::models::{JobCreated, MediaJob, MediaJobKind, MediaJobRequest, PollOptions, UploadUrl};
use crate::transport::{error_for_status, Request};

impl Client {
    /// Obtain a pre-signed URL to upload a file to media storage at `dlb_url`
    /// (e.g. `dlb://in/meeting.wav`).
    pub async fn get_upload_url(&self, dlb_url: &str) -> Result<String> {
        let request =
            Request::post(&self.hostnames().media, "/media/input").json(json!({ "url": dlb_url }));
        let resp: UploadUrl = self.send(request).await?;
        Ok(resp.url)
    }

    /// Upload a local file to media storage at `dlb_url`.
    ///
    /// This performs two HTTP calls:
    /// 1. `POST /media/input` to obtain a pre-signed upload URL.
    /// 2. `PUT` the file bytes to that URL.
    ///
    /// # Errors
    ///
    /// - [`Error::Io`] if the file cannot be read.
    /// - [`Error::Api`] (or another status error) if the upload is rejected.
    pub async fn upload_file(&self, dlb_url: &str, path: impl AsRef<Path>) -> Result<()> {
        let file_bytes = tokio::fs::read(path.as_ref()).await.map_err(Error::Io)?;
        let upload_url = self.get_upload_url(dlb_url).await?;

        debug!(%dlb_url, bytes = file_bytes.len(), "uploading media file");
        let upload_resp = self
            .http()
            .put(&upload_url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(file_bytes)
            .send()
            .await
            .map_err(Error::Http)?;

        let status = upload_resp.status();
        if !status.is_success() {
            let text = upload_resp.text().await.unwrap_or_default();
            return Err(error_for_status(status.as_u16(), None, &text));
        }
        Ok(())
    }

    /// Submit a job and return its id.
    pub async fn start_job(&self, kind: MediaJobKind, job: &MediaJobRequest) -> Result<String> {
        let body = serde_json::to_value(job).map_err(|e| Error::encode("media job request", e))?;
        let request = Request::post(&self.hostnames().media, kind.path()).json(body);
        let created: JobCreated = self.send(request).await?;
        info!(?kind, job_id = %created.job_id, "media job submitted");
        Ok(created.job_id)
    }

    /// Submit an enhance job and return its id.
    pub async fn start_enhance(&self, job: &MediaJobRequest) -> Result<String> {
        self.start_job(MediaJobKind::Enhance, job).await
    }

    /// Submit an analyze job and return its id.
    pub async fn start_analyze(&self, job: &MediaJobRequest) -> Result<String> {
        self.start_job(MediaJobKind::Analyze, job).await
    }

    /// Fetch the current state of a job.
    pub async fn get_job_status(&self, kind: MediaJobKind, job_id: &str) -> Result<MediaJob> {
        let request = Request::get(&self.hostnames().media, kind.path()).query("job_id", job_id);
        self.send(request).await
    }

    /// Ask the platform to stop a pending or running job.
    pub async fn cancel_job(&self, job_id: &str) -> Result<()> {
        let request =
            Request::post(&self.hostnames().media, "/media/jobs/cancel").query("job_id", job_id);
        self.send_raw(request).await?;
        Ok(())
    }

    /// Poll a job until it reaches a terminal status or the timeout is exceeded.
    ///
    /// # Errors
    ///
    /// - [`Error::Timeout`] if polling exceeds `opts.timeout`.
    /// - [`Error::JobFailed`] if the job ends `Failed`, `InternalError` or `Cancelled`.
    pub async fn wait_for_job(
        &self,
        kind: MediaJobKind,
        job_id: &str,
        opts: &PollOptions,
    ) -> Result<MediaJob> {
        let deadline = Instant::now() + opts.timeout;

        loop {
            let job = self.get_job_status(kind, job_id).await?;

            if let Some(ref cb) = opts.on_progress {
                cb(&job);
            }

            if job.is_failed() {
                let detail = job
                    .error
                    .as_ref()
                    .and_then(|e| e.detail.as_deref().or(e.title.as_deref()))
                    .unwrap_or("no detail");
                return Err(Error::JobFailed(format!(
                    "job {job_id} ended with status {:?}: {detail}",
                    job.status
                )));
            }

            if job.is_success() {
                return Ok(job);
            }

            if Instant::now() >= deadline {
                return Err(Error::Timeout(opts.timeout));
            }

            tokio::time::sleep(opts.poll_interval).await;
        }
    }
}
