use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

use crate::app_config::TranscriberConfig;
use crate::errors::TranscriberError;

use super::{Transcriber, TranscriptSegment, Transcription};

/// Client for OpenAI-compatible audio transcription endpoints.
///
/// Holds the endpoint, key and model explicitly; one instance is constructed
/// at startup from validated configuration rather than living as a
/// process-wide global.
#[derive(Debug)]
pub struct WhisperApi {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication (may be empty for local servers)
    api_key: String,
    /// Service base URL
    endpoint: String,
    /// Model name (e.g. "whisper-1", "large-v3")
    model: String,
}

/// Wire format of a verbose transcription response.
///
/// Either `segments` or `text` may be present; some servers send both,
/// some send only a flat text field.
#[derive(Debug, Deserialize)]
struct WhisperResponse {
    /// Structured timed segments
    #[serde(default)]
    segments: Option<Vec<WhisperSegment>>,
    /// Flat transcription text
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WhisperSegment {
    start: f64,
    end: f64,
    text: String,
}

impl WhisperApi {
    /// Create a new client from transcriber configuration
    pub fn new(config: &TranscriberConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: config.api_key.clone(),
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
        }
    }

    /// Full URL of the transcription endpoint
    fn transcriptions_url(&self) -> String {
        format!(
            "{}/v1/audio/transcriptions",
            self.endpoint.trim_end_matches('/')
        )
    }

    /// Convert a wire response into the tagged result type
    fn into_transcription(response: WhisperResponse) -> Result<Transcription, TranscriberError> {
        if let Some(segments) = response.segments {
            if !segments.is_empty() {
                let segments = segments
                    .into_iter()
                    .map(|s| TranscriptSegment {
                        start: s.start,
                        end: s.end,
                        text: s.text,
                    })
                    .collect();
                return Ok(Transcription::Segments(segments));
            }
        }

        match response.text {
            Some(text) => Ok(Transcription::RawText(text)),
            None => Err(TranscriberError::ParseError(
                "response carried neither segments nor text".to_string(),
            )),
        }
    }
}

#[async_trait]
impl Transcriber for WhisperApi {
    async fn transcribe(
        &self,
        audio_path: &Path,
        language: Option<&str>,
    ) -> Result<Transcription, TranscriberError> {
        let audio = tokio::fs::read(audio_path).await.map_err(|e| {
            TranscriberError::RequestFailed(format!(
                "failed to read audio file {:?}: {}",
                audio_path, e
            ))
        })?;

        let file_name = audio_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio.wav".to_string());

        debug!(
            "Uploading {} bytes of audio to {} (model {}, language {})",
            audio.len(),
            self.transcriptions_url(),
            self.model,
            language.unwrap_or("auto")
        );

        let mut form = Form::new()
            .part("file", Part::bytes(audio).file_name(file_name))
            .text("model", self.model.clone())
            .text("response_format", "verbose_json");

        if let Some(language) = language {
            form = form.text("language", language.to_string());
        }

        let mut request = self.client.post(self.transcriptions_url()).multipart(form);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TranscriberError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Transcription API error ({}): {}", status, error_text);

            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(TranscriberError::AuthenticationError(error_text));
            }
            return Err(TranscriberError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        let parsed = response
            .json::<WhisperResponse>()
            .await
            .map_err(|e| TranscriberError::ParseError(e.to_string()))?;

        Self::into_transcription(parsed)
    }

    async fn test_connection(&self) -> Result<(), TranscriberError> {
        // Models listing is the cheapest authenticated call these servers offer
        let url = format!("{}/v1/models", self.endpoint.trim_end_matches('/'));
        let mut request = self.client.get(&url);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TranscriberError::ConnectionError(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(TranscriberError::ApiError {
                status_code: response.status().as_u16(),
                message: "model listing failed".to_string(),
            })
        }
    }
}
