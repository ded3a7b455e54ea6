use std::time::Duration;

use reqwest::header::{HeaderValue, COOKIE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::time::timeout;

use crate::api::error::ApiError;
use crate::api::image::ImageUpload;
use crate::api::types::{ClassificationPayload, HistoryRecord, ModelId};
use crate::api::{ClassificationService, HistoryService};
use crate::config::ServiceConfig;

const UPLOAD_PATH: &str = "api/upload/";
const HISTORY_PATH: &str = "api/history/";

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Credentials are refused up front rather than dropped from requests.
pub(crate) fn header_value(
    header: &'static str,
    value: &str,
) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(value).map_err(|source| ApiError::InvalidHeader { header, source })
}

/// HTTP client for the classification service.
pub struct ApiClient {
    client: Client,
    base_url: Url,
    request_timeout: Duration,
    session_cookie: Option<HeaderValue>,
    csrf_token: Option<HeaderValue>,
}

impl ApiClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(&config.base_url).map_err(|e| {
            ApiError::Decode(format!("invalid base_url '{}': {}", config.base_url, e))
        })?;
        // Url::join replaces the last segment unless the base ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(ApiError::Connection)?;

        let session_cookie = config
            .session_cookie
            .as_deref()
            .map(|value| header_value("session_cookie", &format!("sessionid={}", value)))
            .transpose()?;
        let csrf_token = config
            .csrf_token
            .as_deref()
            .map(|value| header_value("csrf_token", value))
            .transpose()?;

        Ok(Self {
            client,
            base_url,
            request_timeout: config.request_timeout(),
            session_cookie,
            csrf_token,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::Decode(format!("invalid endpoint '{}': {}", path, e)))
    }

    fn decorate(&self, mut builder: RequestBuilder) -> RequestBuilder {
        builder = builder.header("X-Request-Id", uuid::Uuid::new_v4().to_string());
        if let Some(cookie) = &self.session_cookie {
            builder = builder.header(COOKIE, cookie.clone());
        }
        if let Some(token) = &self.csrf_token {
            builder = builder.header("X-CSRFToken", token.clone());
        }
        builder
    }

    /// Send the request under the configured timeout and turn non-2xx
    /// responses into [`ApiError::Upstream`].
    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = match timeout(self.request_timeout, self.decorate(builder).send()).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) if e.is_timeout() => {
                return Err(ApiError::Timeout {
                    duration: self.request_timeout.as_secs(),
                })
            }
            Ok(Err(e)) => return Err(ApiError::Connection(e)),
            Err(_) => {
                return Err(ApiError::Timeout {
                    duration: self.request_timeout.as_secs(),
                })
            }
        };

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown error").to_string());

        Err(ApiError::Upstream {
            status: status.as_u16(),
            message,
        })
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Decode(format!("failed to read response body: {}", e)))?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl ClassificationService for ApiClient {
    async fn classify(
        &self,
        image: &ImageUpload,
        model: ModelId,
    ) -> Result<ClassificationPayload, ApiError> {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(image.mime_type)
            .map_err(|e| ApiError::Decode(format!("invalid mime type: {}", e)))?;
        let form = Form::new()
            .part("image", part)
            .text("model_name", model.as_str());

        let url = self.endpoint(UPLOAD_PATH)?;
        tracing::debug!(url = %url, model = %model, bytes = image.bytes.len(), "Uploading image");

        let response = self.send(self.client.post(url).multipart(form)).await?;
        Self::read_json(response).await
    }
}

impl HistoryService for ApiClient {
    async fn fetch_history(&self) -> Result<Vec<HistoryRecord>, ApiError> {
        let url = self.endpoint(HISTORY_PATH)?;
        let response = self.send(self.client.get(url)).await?;
        Self::read_json(response).await
    }

    async fn delete_record(&self, image_id: u64) -> Result<(), ApiError> {
        let url = self.endpoint(HISTORY_PATH)?;
        let body = serde_json::json!({ "image_id": image_id });
        self.send(self.client.delete(url).json(&body)).await?;
        Ok(())
    }
}
