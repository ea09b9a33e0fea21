use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use uuid::Uuid;
use walkdir::WalkDir;

use crate::app_config::Config;
use crate::file_utils::{FileManager, FileType};
use crate::jobs::{self, JobRecord, JobState, JobStore};
use crate::media;
use crate::pipeline::SubtitlePipeline;
use crate::transcriber::whisper_api::WhisperApi;
use crate::transcriber::{Transcriber, Transcription};

// @module: Application controller for subtitle generation

/// Options for a generation run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Overwrite existing output files
    pub force_overwrite: bool,
    /// Burn the generated subtitles into a rendered copy of the video
    pub render: bool,
    /// Limit the render to the first N seconds (preview mode)
    pub preview_secs: Option<u32>,
}

/// Main application controller for subtitle generation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Transcription service client
    transcriber: Box<dyn Transcriber>,
    // @field: Job registry
    store: JobStore,
}

impl Controller {
    // @method: Create a controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;

        let transcriber = Box::new(WhisperApi::new(&config.transcriber));
        let store = JobStore::new_default()?;

        Ok(Self {
            config,
            transcriber,
            store,
        })
    }

    /// Create a controller with explicit collaborators (used by tests)
    pub fn with_parts(config: Config, transcriber: Box<dyn Transcriber>, store: JobStore) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self {
            config,
            transcriber,
            store,
        })
    }

    /// The job registry this controller records into
    pub fn store(&self) -> &JobStore {
        &self.store
    }

    /// The formatting pipeline configured for this controller
    pub fn pipeline(&self) -> SubtitlePipeline {
        SubtitlePipeline::new(self.config.formatting.max_line_length)
    }

    /// Turn a transcription result into final, reflowed SRT text.
    ///
    /// Pure with respect to the filesystem; the surrounding run methods do
    /// all the I/O.
    pub fn format_transcription(&self, transcription: &Transcription) -> String {
        let pipeline = self.pipeline();
        if self.config.formatting.split_long_cues {
            pipeline.format_transcription(transcription)
        } else {
            // Normalization only: cues keep their original line structure
            pipeline.normalize_transcription(transcription)
        }
    }

    /// Run the full workflow for one video file
    pub async fn run(&self, input_file: PathBuf, options: &RunOptions) -> Result<()> {
        let start_time = std::time::Instant::now();

        if !input_file.exists() {
            return Err(anyhow::anyhow!("Input file does not exist: {:?}", input_file));
        }

        let output_dir = PathBuf::from(&self.config.output_dir);
        FileManager::ensure_dir(&output_dir)?;

        let subtitle_path = FileManager::generate_output_path(&input_file, &output_dir, "", "srt");
        if subtitle_path.exists() && !options.force_overwrite {
            warn!(
                "Skipping file, subtitles already exist (use -f to force overwrite): {:?}",
                subtitle_path
            );
            return Ok(());
        }

        // Fail fast on an unreachable service before any tool runs
        self.transcriber
            .test_connection()
            .await
            .context("Transcription service is unreachable")?;

        // Register the job before touching any tool
        let job_id = Uuid::new_v4().to_string();
        let file_hash = jobs::hash_file(&input_file)?;
        let record = JobRecord::new(
            job_id.clone(),
            input_file.to_string_lossy().to_string(),
            file_hash,
            self.config.language.clone(),
        );
        self.store.insert(&record)?;
        info!("Processing {:?} as job {}", input_file, &job_id[..8]);

        // Extract audio to a temp artifact
        let audio_path = std::env::temp_dir().join(format!("subgen_{}.wav", job_id));
        media::extract_audio(&input_file, &audio_path).await?;
        self.store.set_audio_path(&job_id, &audio_path)?;
        self.store.transition(&job_id, JobState::AudioExtracted)?;
        debug!("Audio extracted to {:?}", audio_path);

        // Transcribe and format; the temp artifact is removed either way
        let transcription = self
            .transcriber
            .transcribe(&audio_path, self.config.language.as_deref())
            .await;
        if audio_path.exists() {
            let _ = std::fs::remove_file(&audio_path);
        }
        let transcription = transcription.context("Transcription failed")?;

        let srt_text = self.format_transcription(&transcription);
        FileManager::write_to_file(&subtitle_path, &srt_text)?;
        self.store.set_subtitle_path(&job_id, &subtitle_path)?;
        self.store.transition(&job_id, JobState::Transcribed)?;
        info!("Wrote subtitles to {:?}", subtitle_path);

        if options.render {
            let rendered_path =
                FileManager::generate_output_path(&input_file, &output_dir, "_subtitled", "mp4");
            media::render_subtitles(
                &input_file,
                &subtitle_path,
                &rendered_path,
                &self.config.style,
                options.preview_secs,
            )
            .await?;
            self.store.set_rendered_path(&job_id, &rendered_path)?;
            self.store.transition(&job_id, JobState::Rendered)?;
            info!("Rendered video to {:?}", rendered_path);
        }

        info!(
            "Finished job {} in {:.1}s",
            &job_id[..8],
            start_time.elapsed().as_secs_f64()
        );
        Ok(())
    }

    /// Run the workflow for every video file under a directory
    pub async fn run_folder(&self, input_dir: PathBuf, options: &RunOptions) -> Result<()> {
        info!("Processing directory: {:?}", input_dir);

        let mut processed_count = 0;
        for entry in WalkDir::new(&input_dir).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();

            if path.is_dir() || !Self::is_video_file(path) {
                continue;
            }

            if let Err(e) = self.run(path.to_path_buf(), options).await {
                error!("Error processing {:?}: {}", path, e);
            } else {
                processed_count += 1;
            }
        }

        info!("Finished processing {} file(s)", processed_count);
        Ok(())
    }

    /// Check whether a path looks like a video file
    fn is_video_file(path: &Path) -> bool {
        matches!(
            FileManager::detect_file_type(path),
            Ok(FileType::Video)
        )
    }
}
