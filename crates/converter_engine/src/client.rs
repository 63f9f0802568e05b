use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use converter_logging::{conv_debug, conv_info};
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, Url};
use serde::Deserialize;

use crate::filename::local_filename;
use crate::persist::AtomicFileWriter;
use crate::{ApiError, FailureKind, StatusResponse};

#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Root of the conversion service, e.g. `http://localhost:5000`.
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Whole-request timeout. `None` leaves requests unbounded; the poll loop
    /// already retries status checks.
    pub request_timeout: Option<Duration>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }
}

/// Receives byte counts while a download streams in.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, filename: &str, bytes: u64, total: Option<u64>);
}

/// The conversion service, as seen by the client.
#[async_trait::async_trait]
pub trait ConversionApi: Send + Sync {
    /// `POST /convert`; returns the new job's id.
    async fn start_conversion(&self, url: &str) -> Result<String, ApiError>;

    /// `GET /status/{id}`.
    async fn check_status(&self, job_id: &str) -> Result<StatusResponse, ApiError>;

    /// `DELETE /clear/{id}`.
    async fn release(&self, job_id: &str) -> Result<(), ApiError>;

    /// `GET /download/{filename}` into `dest_dir`; returns the written path.
    async fn download(
        &self,
        filename: &str,
        dest_dir: &Path,
        sink: &dyn ProgressSink,
    ) -> Result<PathBuf, ApiError>;
}

#[derive(Deserialize)]
struct StartResponse {
    conversion_id: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReqwestApi {
    base: Url,
    client: reqwest::Client,
}

impl ReqwestApi {
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be used as a base url", settings.base_url),
            ));
        }

        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { base, client })
    }

    /// Base URL with `segments` appended, each percent-encoded as one segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::new(FailureKind::InvalidUrl, "base url has no path"))?
            .pop_if_empty()
            .extend(segments.iter().copied());
        Ok(url)
    }
}

#[async_trait::async_trait]
impl ConversionApi for ReqwestApi {
    async fn start_conversion(&self, url: &str) -> Result<String, ApiError> {
        let endpoint = self.endpoint(&["convert"])?;
        let body = serde_json::json!({ "url": url }).to_string();
        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let bytes = checked_body(response).await?;
        let started: StartResponse = decode(&bytes)?;
        conv_info!("Conversion started id={}", started.conversion_id);
        Ok(started.conversion_id)
    }

    async fn check_status(&self, job_id: &str) -> Result<StatusResponse, ApiError> {
        let endpoint = self.endpoint(&["status", job_id])?;
        let response = self
            .client
            .get(endpoint)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let bytes = checked_body(response).await?;
        decode(&bytes)
    }

    async fn release(&self, job_id: &str) -> Result<(), ApiError> {
        let endpoint = self.endpoint(&["clear", job_id])?;
        let response = self
            .client
            .delete(endpoint)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        checked_body(response).await.map(|_| ())
    }

    async fn download(
        &self,
        filename: &str,
        dest_dir: &Path,
        sink: &dyn ProgressSink,
    ) -> Result<PathBuf, ApiError> {
        let endpoint = self.endpoint(&["download", filename])?;
        let response = self
            .client
            .get(endpoint)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = checked(response).await?;
        let total = response.content_length();

        let writer = AtomicFileWriter::new(dest_dir.to_path_buf());
        let mut tmp = writer
            .begin()
            .map_err(|err| ApiError::new(FailureKind::Io, err.to_string()))?;

        let mut written = 0u64;
        let mut stream = response.bytes_stream();
        sink.on_progress(filename, 0, total);
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            tmp.write_all(&chunk)
                .map_err(|err| ApiError::new(FailureKind::Io, err.to_string()))?;
            written += chunk.len() as u64;
            sink.on_progress(filename, written, total);
        }

        let path = writer
            .commit_unique(tmp, &local_filename(filename))
            .map_err(|err| ApiError::new(FailureKind::Io, err.to_string()))?;
        conv_debug!("Downloaded {} bytes to {:?}", written, path);
        Ok(path)
    }
}

/// Passes success responses through; turns the rest into errors, preferring
/// the server's `{error}` message.
async fn checked(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let bytes = response.bytes().await.unwrap_or_default();
    let message = serde_json::from_slice::<ErrorBody>(&bytes)
        .ok()
        .and_then(|body| body.error)
        .filter(|message| !message.trim().is_empty());
    Err(match message {
        Some(message) => ApiError::new(
            FailureKind::Rejected {
                status: status.as_u16(),
            },
            message,
        ),
        None => ApiError::new(FailureKind::HttpStatus(status.as_u16()), status.to_string()),
    })
}

async fn checked_body(response: Response) -> Result<Vec<u8>, ApiError> {
    let response = checked(response).await?;
    let bytes = response.bytes().await.map_err(map_reqwest_error)?;
    Ok(bytes.to_vec())
}

fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(bytes).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::Decode, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
