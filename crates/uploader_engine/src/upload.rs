use bytes::BytesMut;
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use uploader_logging::{uploader_debug, uploader_warn};

use crate::{FailureKind, UploadError, UploadOutput, UploadRequest, UploadSettings, SERVER_FAILURE_MESSAGE};

#[async_trait::async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(&self, request: &UploadRequest) -> Result<UploadOutput, UploadError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestUploader {
    settings: UploadSettings,
}

impl ReqwestUploader {
    pub fn new(settings: UploadSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, UploadError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = self.settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|err| UploadError::new(FailureKind::Network, err.to_string()))
    }

    async fn build_form(&self, request: &UploadRequest) -> Result<Form, UploadError> {
        let contents = tokio::fs::read(&request.path).await.map_err(|err| {
            UploadError::new(
                FailureKind::FileRead,
                format!("could not read {}: {err}", request.file_name),
            )
        })?;
        let part = Part::bytes(contents)
            .file_name(request.file_name.clone())
            .mime_str(mime_for(&request.file_name))
            .map_err(|err| UploadError::new(FailureKind::Network, err.to_string()))?;
        Ok(Form::new().part(self.settings.field_name.clone(), part))
    }
}

#[async_trait::async_trait]
impl Uploader for ReqwestUploader {
    async fn upload(&self, request: &UploadRequest) -> Result<UploadOutput, UploadError> {
        let endpoint = reqwest::Url::parse(&self.settings.endpoint)
            .map_err(|err| UploadError::new(FailureKind::InvalidEndpoint, err.to_string()))?;
        let client = self.build_client()?;
        let form = self.build_form(request).await?;

        let response = client
            .post(endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            // The body is not shown to the user; keep any detail for the log.
            let body = response.text().await.unwrap_or_default();
            match error_detail(&body) {
                Some(detail) => uploader_warn!(
                    "request_id={} rejected with {}: {}",
                    request.request_id,
                    status,
                    detail
                ),
                None => uploader_warn!("request_id={} rejected with {}", request.request_id, status),
            }
            return Err(UploadError::new(
                FailureKind::HttpStatus(status.as_u16()),
                SERVER_FAILURE_MESSAGE,
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut body = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk
                .map_err(|err| UploadError::new(FailureKind::Body, err.to_string()))?;
            body.extend_from_slice(&chunk);
        }
        uploader_debug!(
            "request_id={} received {} bytes ({:?})",
            request.request_id,
            body.len(),
            content_type
        );

        Ok(UploadOutput {
            bytes: body.freeze(),
            content_type,
        })
    }
}

/// Extracts `{"error": "..."}` from a failure body, if present.
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(|detail| detail.as_str())
        .map(ToOwned::to_owned)
}

fn mime_for(file_name: &str) -> &'static str {
    let is_pdf = file_name
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("pdf"));
    if is_pdf {
        "application/pdf"
    } else {
        "application/octet-stream"
    }
}

fn map_reqwest_error(err: reqwest::Error) -> UploadError {
    if err.is_timeout() {
        return UploadError::new(FailureKind::Timeout, err.to_string());
    }
    UploadError::new(FailureKind::Network, err.to_string())
}
