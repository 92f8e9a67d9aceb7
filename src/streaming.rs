//! Streaming endpoints. Every response is wrapped as `{ "status", "data" }`.

use serde::de::DeserializeOwned;

use crate::client::Client;
use crate::errors::{Error, Result};
use crate::models::{ClusterInfo, CreatePublishToken, Envelope, PublishToken};
use crate::transport::Request;

impl Client {
    /// Create a publish token.
    pub async fn create_publish_token(&self, token: &CreatePublishToken) -> Result<PublishToken> {
        let body =
            serde_json::to_value(token).map_err(|e| Error::encode("publish token request", e))?;
        let request = Request::post(&self.hostnames().streaming, "/api/publish_token").json(body);
        self.send_data(request).await
    }

    /// Read a publish token by id.
    pub async fn read_publish_token(&self, token_id: u64) -> Result<PublishToken> {
        let request = Request::get(
            &self.hostnames().streaming,
            format!("/api/publish_token/{token_id}"),
        );
        self.send_data(request).await
    }

    /// Delete a publish token. Returns what the platform reports, normally `true`.
    pub async fn delete_publish_token(&self, token_id: u64) -> Result<bool> {
        let request = Request::delete(
            &self.hostnames().streaming,
            format!("/api/publish_token/{token_id}"),
        );
        self.send_data(request).await
    }

    /// Default and available clusters of the account.
    pub async fn read_cluster(&self) -> Result<ClusterInfo> {
        let request = Request::get(&self.hostnames().streaming, "/api/cluster");
        self.send_data(request).await
    }

    async fn send_data<T: DeserializeOwned>(&self, request: Request) -> Result<T> {
        let envelope: Envelope<T> = self.send(request).await?;
        Ok(envelope.data)
    }
}
