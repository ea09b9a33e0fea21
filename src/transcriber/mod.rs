/*!
 * Speech-to-text service clients.
 *
 * This module contains client implementations for transcription services:
 * - WhisperApi: OpenAI-compatible `/v1/audio/transcriptions` endpoints,
 *   remote or self-hosted (faster-whisper-server and friends)
 * - Mock: Deterministic client for tests
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::path::Path;

use crate::errors::TranscriberError;

/// One timed segment of recognized speech, times in fractional seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Segment start, seconds
    pub start: f64,
    /// Segment end, seconds
    pub end: f64,
    /// Recognized text
    pub text: String,
}

/// Tagged transcription result.
///
/// Services either return structured timed segments or an already-rendered
/// subtitle text blob; the tag makes downstream formatting exhaustive instead
/// of probing the payload with nested parse attempts.
#[derive(Debug, Clone, PartialEq)]
pub enum Transcription {
    /// Structured timed segments
    Segments(Vec<TranscriptSegment>),
    /// A raw subtitle text blob
    RawText(String),
}

/// Common trait for all transcription clients
///
/// This trait defines the interface that all transcriber implementations must
/// follow, allowing them to be used interchangeably by the controller.
#[async_trait]
pub trait Transcriber: Send + Sync + Debug {
    /// Transcribe an audio artifact.
    ///
    /// # Arguments
    /// * `audio_path` - Path to the audio file (mono 16 kHz WAV)
    /// * `language` - Optional language hint, passed through verbatim
    ///
    /// # Returns
    /// * `Result<Transcription, TranscriberError>` - The tagged result or an error
    async fn transcribe(
        &self,
        audio_path: &Path,
        language: Option<&str>,
    ) -> Result<Transcription, TranscriberError>;

    /// Test the connection to the service
    ///
    /// # Returns
    /// * `Result<(), TranscriberError>` - Ok if the service is reachable
    async fn test_connection(&self) -> Result<(), TranscriberError>;
}

pub mod mock;
pub mod whisper_api;
