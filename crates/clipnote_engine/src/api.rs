use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    ApiError, MediaPayload, NoteOptions, Quality, RemoteStatus, SegmentPayload, SourcePlatform,
    StatusSnapshot, TranscriptPayload,
};

#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Backend root, e.g. `http://127.0.0.1:8000`.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The remote job API, abstracted so the orchestrator and tests can run
/// against a stub.
#[async_trait]
pub trait NoteBackend: Send + Sync {
    /// Create one note job from a remote video link. Returns the task id.
    async fn create_from_url(
        &self,
        video_url: &str,
        platform: SourcePlatform,
        quality: Quality,
        options: NoteOptions,
    ) -> Result<String, ApiError>;

    /// Create one note job from an uploaded file. Returns the task id.
    async fn create_from_upload(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
        quality: Quality,
        options: NoteOptions,
    ) -> Result<String, ApiError>;

    /// Fetch a task's authoritative status.
    async fn task_status(&self, task_id: &str) -> Result<StatusSnapshot, ApiError>;

    /// Delete a task remotely, keyed by video identifier (or task id for
    /// local uploads) plus platform tag.
    async fn delete_task(&self, video_id: &str, platform: SourcePlatform)
        -> Result<(), ApiError>;
}

/// Reqwest implementation of [`NoteBackend`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: reqwest::Url,
}

impl HttpBackend {
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::Transport(err.to_string()))?;

        // A trailing slash keeps Url::join from eating the last path
        // segment of a prefixed base like `http://host/api`.
        let mut base = settings.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = reqwest::Url::parse(&base)
            .map_err(|err| ApiError::Transport(format!("invalid base url: {err}")))?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<reqwest::Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|err| ApiError::Transport(format!("invalid endpoint {path}: {err}")))
    }
}

#[async_trait]
impl NoteBackend for HttpBackend {
    async fn create_from_url(
        &self,
        video_url: &str,
        platform: SourcePlatform,
        quality: Quality,
        options: NoteOptions,
    ) -> Result<String, ApiError> {
        let request = GenerateNoteRequest {
            video_url,
            platform: platform.as_str(),
            quality: quality.as_str(),
            screenshot: options.screenshot,
            link: options.link,
        };
        let response = self
            .client
            .post(self.endpoint("generate_note")?)
            .json(&request)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let envelope: CreatedEnvelope = decode(response).await?;
        accepted_task_id(envelope)
    }

    async fn create_from_upload(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
        quality: Quality,
        options: NoteOptions,
    ) -> Result<String, ApiError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|err| ApiError::Transport(format!("invalid content type: {err}")))?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("quality", quality.as_str())
            .text("screenshot", options.screenshot.to_string())
            .text("link", options.link.to_string());

        let response = self
            .client
            .post(self.endpoint("upload_generate_note")?)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let envelope: CreatedEnvelope = decode(response).await?;
        accepted_task_id(envelope)
    }

    async fn task_status(&self, task_id: &str) -> Result<StatusSnapshot, ApiError> {
        let response = self
            .client
            .get(self.endpoint(&format!("task_status/{task_id}"))?)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let envelope: StatusEnvelope = decode(response).await?;
        if envelope.code != 0 {
            return Err(ApiError::Rejected {
                code: envelope.code,
                message: envelope.msg,
            });
        }
        envelope_to_snapshot(envelope)
    }

    async fn delete_task(
        &self,
        video_id: &str,
        platform: SourcePlatform,
    ) -> Result<(), ApiError> {
        let request = DeleteTaskRequest {
            video_id,
            platform: platform.as_str(),
        };
        let response = self
            .client
            .post(self.endpoint("delete_task")?)
            .json(&request)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let envelope: AckEnvelope = decode(response).await?;
        if envelope.code != 0 {
            return Err(ApiError::Rejected {
                code: envelope.code,
                message: envelope.msg,
            });
        }
        Ok(())
    }
}

/// Checks the HTTP layer, then decodes the JSON envelope. A non-2xx status
/// or an undecodable body never reached the backend contract, so both are
/// transport failures.
async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Transport(format!("http status {status}")));
    }
    response.json::<T>().await.map_err(map_reqwest_error)
}

fn accepted_task_id(envelope: CreatedEnvelope) -> Result<String, ApiError> {
    if envelope.code != 0 {
        return Err(ApiError::Rejected {
            code: envelope.code,
            message: envelope.msg,
        });
    }
    envelope
        .data
        .map(|data| data.task_id)
        .ok_or_else(|| ApiError::Transport("response missing task id".to_string()))
}

fn envelope_to_snapshot(envelope: StatusEnvelope) -> Result<StatusSnapshot, ApiError> {
    let tag = envelope
        .status
        .ok_or_else(|| ApiError::Transport("response missing task status".to_string()))?;
    let status = RemoteStatus::parse(&tag)
        .ok_or_else(|| ApiError::Transport(format!("unknown task status {tag:?}")))?;

    let transcript = envelope.transcript.map(|wire| TranscriptPayload {
        full_text: wire.full_text,
        language: wire.language,
        segments: wire
            .segments
            .into_iter()
            .map(|segment| SegmentPayload {
                start: segment.start,
                end: segment.end,
                text: segment.text,
            })
            .collect(),
    });
    let media = envelope.audio_meta.map(|wire| MediaPayload {
        cover_url: wire.cover_url,
        duration: wire.duration,
        file_path: wire.file_path,
        platform: wire.platform,
        title: wire.title,
        video_id: wire.video_id,
        raw_info: wire.raw_info.map(|value| value.to_string()),
    });

    Ok(StatusSnapshot {
        status,
        markdown: envelope.markdown,
        transcript,
        media,
    })
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::Transport("request timed out".to_string());
    }
    ApiError::Transport(err.to_string())
}

// Wire DTOs for the backend's JSON envelopes.

#[derive(Debug, Serialize)]
struct GenerateNoteRequest<'a> {
    video_url: &'a str,
    platform: &'a str,
    quality: &'a str,
    screenshot: bool,
    link: bool,
}

#[derive(Debug, Serialize)]
struct DeleteTaskRequest<'a> {
    video_id: &'a str,
    platform: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreatedEnvelope {
    code: i64,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    data: Option<CreatedData>,
}

#[derive(Debug, Deserialize)]
struct CreatedData {
    task_id: String,
}

#[derive(Debug, Deserialize)]
struct AckEnvelope {
    code: i64,
    #[serde(default)]
    msg: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusEnvelope {
    code: i64,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    markdown: Option<String>,
    #[serde(default)]
    transcript: Option<TranscriptWire>,
    #[serde(default)]
    audio_meta: Option<MediaWire>,
}

#[derive(Debug, Deserialize)]
struct TranscriptWire {
    #[serde(default)]
    full_text: String,
    #[serde(default)]
    language: String,
    #[serde(default)]
    segments: Vec<SegmentWire>,
}

#[derive(Debug, Deserialize)]
struct SegmentWire {
    #[serde(default)]
    start: f64,
    #[serde(default)]
    end: f64,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct MediaWire {
    #[serde(default)]
    cover_url: String,
    #[serde(default)]
    duration: f64,
    #[serde(default)]
    file_path: String,
    #[serde(default)]
    platform: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    video_id: String,
    #[serde(default)]
    raw_info: Option<serde_json::Value>,
}
