use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::multipart;
use serde::{Deserialize, Serialize};

use mapper_core::{Options, Payload};

use crate::{ArtifactResponse, ClientEvent, FailureKind, JobId, JobProgress, Stage, SubmitError};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/api".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 32 * 1024 * 1024,
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ClientEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<ClientEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<ClientEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: ClientEvent) {
        let _ = self.tx.send(event);
    }
}

/// JSON body for the text and url endpoints.
#[derive(Serialize)]
struct UploadBody<'a> {
    payload: &'a str,
    options: &'a Options,
}

/// Structured error body the service sends with non-2xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

#[async_trait::async_trait]
pub trait ConversionApi: Send + Sync {
    /// Issues exactly one outbound call for the payload and, on success,
    /// returns the raw artifact bytes plus response metadata. No retries,
    /// no concurrency guard; one-in-flight is the caller's policy.
    async fn submit(
        &self,
        job_id: JobId,
        payload: &Payload,
        options: &Options,
        sink: &dyn ProgressSink,
    ) -> Result<ArtifactResponse, SubmitError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestClient {
    settings: ClientSettings,
}

impl ReqwestClient {
    pub fn new(settings: ClientSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, SubmitError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| SubmitError::new(FailureKind::Network, err.to_string()))
    }

    fn endpoint(&self, path: &str) -> Result<reqwest::Url, SubmitError> {
        let joined = format!("{}{}", self.settings.base_url.trim_end_matches('/'), path);
        reqwest::Url::parse(&joined)
            .map_err(|err| SubmitError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    fn build_request(
        &self,
        client: &reqwest::Client,
        payload: &Payload,
        options: &Options,
    ) -> Result<reqwest::RequestBuilder, SubmitError> {
        match payload {
            Payload::Text(text) => Ok(client.post(self.endpoint("/text")?).json(&UploadBody {
                payload: text,
                options,
            })),
            Payload::Url(url) => Ok(client.post(self.endpoint("/url")?).json(&UploadBody {
                payload: url,
                options,
            })),
            Payload::File { name, bytes } => {
                let options_json = serde_json::to_string(options)
                    .map_err(|err| SubmitError::new(FailureKind::Serialize, err.to_string()))?;
                let part = multipart::Part::bytes(bytes.clone()).file_name(name.clone());
                let form = multipart::Form::new()
                    .part("file", part)
                    .text("options", options_json);
                Ok(client.post(self.endpoint("/file-upload")?).multipart(form))
            }
        }
    }
}

#[async_trait::async_trait]
impl ConversionApi for ReqwestClient {
    async fn submit(
        &self,
        job_id: JobId,
        payload: &Payload,
        options: &Options,
        sink: &dyn ProgressSink,
    ) -> Result<ArtifactResponse, SubmitError> {
        let client = self.build_client()?;
        let request = self.build_request(&client, payload, options)?;

        sink.emit(ClientEvent::Progress(JobProgress {
            job_id,
            stage: Stage::Sending,
            bytes: None,
        }));

        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            // The body is only parsed on the error path; a success body is an
            // opaque binary artifact.
            let body = response.bytes().await.unwrap_or_default();
            let detail = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .map(|err| err.detail);
            let reason = status.canonical_reason().unwrap_or("unknown status");
            return Err(
                SubmitError::new(FailureKind::HttpStatus(status.as_u16()), reason)
                    .with_detail(detail),
            );
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(SubmitError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let disposition = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        sink.emit(ClientEvent::Progress(JobProgress {
            job_id,
            stage: Stage::Downloading,
            bytes: Some(0),
        }));

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(SubmitError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
            sink.emit(ClientEvent::Progress(JobProgress {
                job_id,
                stage: Stage::Downloading,
                bytes: Some(bytes.len() as u64),
            }));
        }

        Ok(ArtifactResponse {
            bytes,
            disposition,
            content_type,
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> SubmitError {
    if err.is_timeout() {
        return SubmitError::new(FailureKind::Timeout, err.to_string());
    }
    SubmitError::new(FailureKind::Network, err.to_string())
}
