//! REST client for the exhibition backend.
//!
//! Every resource lives under `{api_url}/api/{endpoint}`; single records
//! under `{endpoint}/{id}`. Protected calls carry `Authorization: Bearer
//! {token}`; reference lists for selects are fetched anonymously.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use serde::de::DeserializeOwned;
use serde_json::Value;

use expo_admin_core::allowlist::{AllowlistReply, NewAdmin, TelegramAdmin};
use expo_admin_core::api::{AdminAllowlistApi, ApiError, ResourceApi};
use expo_admin_core::payload::{FileAttachment, Part, Payload};
use expo_admin_core::record::Record;
use expo_admin_core::resource::{DetailShape, ResourceDescriptor};
use expo_admin_core::session::Token;
use expo_admin_core::types::DbId;

use crate::config::ClientConfig;

/// HTTP implementation of [`ResourceApi`] and [`AdminAllowlistApi`].
#[derive(Debug, Clone)]
pub struct HttpResourceApi {
    client: reqwest::Client,
    api_url: String,
}

impl HttpResourceApi {
    /// Build a client with the configured request timeout.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(transport)?;
        Ok(Self::with_client(client, config.api_url.clone()))
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self { client, api_url }
    }

    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}/api/{}", self.api_url, path.trim_start_matches('/'))
    }

    pub fn collection_url(&self, resource: &ResourceDescriptor) -> String {
        self.endpoint_url(resource.endpoint)
    }

    pub fn record_url(&self, resource: &ResourceDescriptor, id: DbId) -> String {
        format!("{}/{id}", self.collection_url(resource))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await.map_err(transport)?;
        ensure_success(response).await
    }

    /// Attach a write payload to a request.
    async fn with_payload(
        request: reqwest::RequestBuilder,
        payload: &Payload,
    ) -> Result<reqwest::RequestBuilder, ApiError> {
        match payload {
            Payload::Json(body) => Ok(request.json(body)),
            Payload::Multipart(parts) => Ok(request.multipart(multipart_form(parts).await?)),
        }
    }
}

fn transport(error: reqwest::Error) -> ApiError {
    if error.is_decode() {
        ApiError::Decode(error.to_string())
    } else {
        ApiError::Transport(error.to_string())
    }
}

/// Map a 401 to [`ApiError::Unauthorized`] and any other non-2xx to
/// [`ApiError::Status`] carrying the body text.
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status == reqwest::StatusCode::UNAUTHORIZED {
        tracing::info!(url = %response.url(), "Server rejected the token");
        return Err(ApiError::Unauthorized);
    }
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        tracing::warn!(status = status.as_u16(), body = %body, "Request failed");
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await.map_err(transport)?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Write responses vary by resource: the stored row, a message object, or
/// nothing at all. Only an echoed object is kept.
async fn parse_write_response(response: reqwest::Response) -> Result<Record, ApiError> {
    let bytes = response.bytes().await.map_err(transport)?;
    Ok(match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => Record::from(map),
        _ => Record::default(),
    })
}

/// Unwrap a detail body according to the resource's shape. An empty
/// array yields an empty record.
pub fn detail_record(shape: DetailShape, body: Value) -> Result<Record, ApiError> {
    match (shape, body) {
        (_, Value::Object(map)) => Ok(Record::from(map)),
        (DetailShape::ArrayFirst, Value::Array(items)) => match items.into_iter().next() {
            Some(Value::Object(map)) => Ok(Record::from(map)),
            Some(other) => Err(ApiError::Decode(format!("expected an object, got {other}"))),
            None => Ok(Record::default()),
        },
        (_, other) => Err(ApiError::Decode(format!("expected an object, got {other}"))),
    }
}

/// Guess a part's content type from the file extension.
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

async fn file_part(file: &FileAttachment) -> Result<multipart::Part, ApiError> {
    let bytes = tokio::fs::read(file.path()).await.map_err(|e| {
        ApiError::Transport(format!("cannot read {}: {e}", file.path().display()))
    })?;
    multipart::Part::bytes(bytes)
        .file_name(file.file_name.clone())
        .mime_str(mime_for(file.path()))
        .map_err(transport)
}

/// Build the multipart form, preserving part order.
async fn multipart_form(parts: &[Part]) -> Result<multipart::Form, ApiError> {
    let mut form = multipart::Form::new();
    for part in parts {
        form = match part {
            Part::Text { name, value } => form.text(name.clone(), value.clone()),
            Part::File { name, file } => form.part(name.clone(), file_part(file).await?),
        };
    }
    Ok(form)
}

#[async_trait]
impl ResourceApi for HttpResourceApi {
    async fn list(
        &self,
        token: &Token,
        resource: &ResourceDescriptor,
    ) -> Result<Vec<Record>, ApiError> {
        let url = self.collection_url(resource);
        tracing::debug!(url = %url, "GET");
        let response = self
            .send(self.client.get(url).header("Authorization", token.bearer()))
            .await?;
        parse_response(response).await
    }

    async fn get(
        &self,
        token: &Token,
        resource: &ResourceDescriptor,
        id: DbId,
    ) -> Result<Record, ApiError> {
        let url = self.record_url(resource, id);
        tracing::debug!(url = %url, "GET");
        let response = self
            .send(self.client.get(url).header("Authorization", token.bearer()))
            .await?;
        let body: Value = parse_response(response).await?;
        detail_record(resource.detail_shape, body)
    }

    async fn create(
        &self,
        token: &Token,
        resource: &ResourceDescriptor,
        payload: &Payload,
    ) -> Result<Record, ApiError> {
        let url = self.collection_url(resource);
        tracing::debug!(url = %url, "POST");
        let request = self.client.post(url).header("Authorization", token.bearer());
        let request = Self::with_payload(request, payload).await?;
        parse_write_response(self.send(request).await?).await
    }

    async fn update(
        &self,
        token: &Token,
        resource: &ResourceDescriptor,
        id: DbId,
        payload: &Payload,
    ) -> Result<Record, ApiError> {
        let url = self.record_url(resource, id);
        tracing::debug!(url = %url, "PUT");
        let request = self.client.put(url).header("Authorization", token.bearer());
        let request = Self::with_payload(request, payload).await?;
        parse_write_response(self.send(request).await?).await
    }

    async fn remove(
        &self,
        token: &Token,
        resource: &ResourceDescriptor,
        id: DbId,
    ) -> Result<(), ApiError> {
        let url = self.record_url(resource, id);
        tracing::debug!(url = %url, "DELETE");
        self.send(self.client.delete(url).header("Authorization", token.bearer()))
            .await?;
        Ok(())
    }

    async fn reference_list(&self, resource: &ResourceDescriptor) -> Result<Vec<Record>, ApiError> {
        let url = self.collection_url(resource);
        tracing::debug!(url = %url, "GET (anonymous)");
        let response = self.send(self.client.get(url)).await?;
        parse_response(response).await
    }
}

impl HttpResourceApi {
    /// `POST` to `admin/add` or `admin/remove`.
    async fn allowlist_call(
        &self,
        token: &Token,
        path: &str,
        body: &Value,
    ) -> Result<AllowlistReply, ApiError> {
        let url = self.endpoint_url(path);
        tracing::debug!(url = %url, "POST");
        let response = self
            .client
            .post(url)
            .header("Authorization", token.bearer())
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        read_allowlist_reply(response).await
    }
}

/// Allowlist endpoints answer refusals with a non-2xx status and a
/// readable `{success, error}` body; the body wins over the status.
async fn read_allowlist_reply(response: reqwest::Response) -> Result<AllowlistReply, ApiError> {
    let status = response.status();
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }
    let bytes = response.bytes().await.map_err(transport)?;
    match serde_json::from_slice::<AllowlistReply>(&bytes) {
        Ok(reply) => Ok(reply),
        Err(_) if !status.is_success() => Err(ApiError::Status {
            status: status.as_u16(),
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }),
        Err(e) => Err(ApiError::Decode(e.to_string())),
    }
}

#[async_trait]
impl AdminAllowlistApi for HttpResourceApi {
    async fn list_admins(&self, token: &Token) -> Result<Vec<TelegramAdmin>, ApiError> {
        let url = self.endpoint_url("admin/all");
        tracing::debug!(url = %url, "GET");
        let response = self
            .send(self.client.get(url).header("Authorization", token.bearer()))
            .await?;
        parse_response(response).await
    }

    async fn add_admin(&self, token: &Token, admin: &NewAdmin) -> Result<AllowlistReply, ApiError> {
        let body = serde_json::to_value(admin).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.allowlist_call(token, "admin/add", &body).await
    }

    async fn remove_admin(
        &self,
        token: &Token,
        username: &str,
    ) -> Result<AllowlistReply, ApiError> {
        self.allowlist_call(token, "admin/remove", &serde_json::json!({ "username": username }))
            .await
    }
}
