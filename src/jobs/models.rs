/*!
 * Job record and lifecycle state definitions.
 */

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::errors::JobError;

/// Lifecycle state of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Video registered, nothing processed yet
    Uploaded,
    /// Audio artifact extracted from the video
    AudioExtracted,
    /// Transcription finished and subtitle file written
    Transcribed,
    /// Subtitles burned into the rendered output
    Rendered,
}

impl JobState {
    /// Stable string identifier used in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Uploaded => "uploaded",
            JobState::AudioExtracted => "audio_extracted",
            JobState::Transcribed => "transcribed",
            JobState::Rendered => "rendered",
        }
    }

    /// Parse a stable string identifier
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "uploaded" => Ok(JobState::Uploaded),
            "audio_extracted" => Ok(JobState::AudioExtracted),
            "transcribed" => Ok(JobState::Transcribed),
            "rendered" => Ok(JobState::Rendered),
            _ => Err(anyhow!("Unknown job state: {}", s)),
        }
    }

    /// Whether moving to `next` is an allowed lifecycle transition
    pub fn can_transition_to(&self, next: JobState) -> bool {
        matches!(
            (self, next),
            (JobState::Uploaded, JobState::AudioExtracted)
                | (JobState::AudioExtracted, JobState::Transcribed)
                | (JobState::Transcribed, JobState::Rendered)
        )
    }

    /// Validate a transition, producing a typed error when it is not allowed
    pub fn checked_transition(&self, next: JobState) -> Result<JobState, JobError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(JobError::InvalidTransition {
                from: self.as_str().to_string(),
                to: next.as_str().to_string(),
            })
        }
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One job: a source video and the artifacts derived from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Opaque job identifier (UUID v4)
    pub id: String,

    /// Source video path
    pub video_path: String,

    /// Extracted audio artifact, set once extraction succeeds
    pub audio_path: Option<String>,

    /// Generated subtitle file, set once transcription succeeds
    pub subtitle_path: Option<String>,

    /// Burned-in render output, set once rendering succeeds
    pub rendered_path: Option<String>,

    /// Lifecycle state
    pub state: JobState,

    /// SHA-256 of the source video contents
    pub file_hash: String,

    /// Language hint the job was created with
    pub language: Option<String>,

    /// Creation timestamp (RFC 3339)
    pub created_at: String,

    /// Last update timestamp (RFC 3339)
    pub updated_at: String,
}

impl JobRecord {
    /// Create a fresh record in the `uploaded` state
    pub fn new(
        id: String,
        video_path: String,
        file_hash: String,
        language: Option<String>,
    ) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id,
            video_path,
            audio_path: None,
            subtitle_path: None,
            rendered_path: None,
            state: JobState::Uploaded,
            file_hash,
            language,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// All artifact paths currently recorded for this job, excluding the
    /// source video itself
    pub fn artifact_paths(&self) -> Vec<String> {
        [
            self.audio_path.clone(),
            self.subtitle_path.clone(),
            self.rendered_path.clone(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
