use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::app_config::Config;
use crate::audio_extractor::AudioExtractor;
use crate::file_utils::FileManager;
use crate::subtitle_converter::SubtitleConverter;
use crate::transcriber::Transcriber;

// @module: Application controller for the batch video-to-subtitle pipeline

/// Main application controller driving the per-file pipeline
pub struct Controller {
    // @field: App configuration
    config: Config,
}

/// Per-folder processing tally, reported at the end of a run
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BatchSummary {
    /// Files fully converted to subtitles
    pub success_count: usize,

    /// Files whose pipeline failed (extraction, transcription, or conversion)
    pub error_count: usize,

    /// Files skipped because their subtitle already existed
    pub skip_count: usize,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        !self.config.language.is_empty() && self.config.initial_batch_size > 0
    }

    /// Run the full pipeline for a single video file.
    ///
    /// Extraction, transcription, and conversion run strictly in sequence;
    /// the next stage starts only once the previous one completed.
    pub async fn run(&self, video_file: &Path, force_overwrite: bool) -> Result<PathBuf> {
        let start_time = Instant::now();

        if !video_file.exists() {
            return Err(anyhow::anyhow!("Input file does not exist: {:?}", video_file));
        }

        self.prepare_directories()?;

        // Skip if the subtitle already exists and no force flag
        let srt_path =
            FileManager::sibling_path(video_file, &self.config.directories.subtitles, "srt");
        if srt_path.exists() && !force_overwrite {
            warn!("Skipping file, subtitle already exists (use -f to force overwrite)");
            return Ok(srt_path);
        }

        info!("Converting video to audio file...");
        let audio_path =
            AudioExtractor::extract(video_file, &self.config.directories.audio).await?;
        let extraction_elapsed = start_time.elapsed();

        info!("Transcribing audio using \"{}\"...", self.config.language);
        let transcriber = Transcriber::from_config(&self.config);
        let transcript_path = transcriber
            .transcribe(&audio_path, &self.config.directories.transcripts)
            .await?;
        let transcription_elapsed = start_time.elapsed() - extraction_elapsed;

        let srt_path =
            SubtitleConverter::convert_file(&transcript_path, &self.config.directories.subtitles)?;

        info!(
            "Pipeline complete. Extraction: {} - Transcription: {}",
            Self::format_duration(extraction_elapsed),
            Self::format_duration(transcription_elapsed)
        );

        Ok(srt_path)
    }

    /// Run the workflow in folder mode, processing all video files in the
    /// configured videos directory.
    ///
    /// Files are processed strictly sequentially. A failing file is logged
    /// and counted but never aborts the rest of the batch.
    pub async fn run_folder(&self, force_overwrite: bool) -> Result<BatchSummary> {
        let start_time = Instant::now();

        let input_dir = &self.config.directories.videos;
        if !input_dir.exists() {
            return Err(anyhow::anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        self.prepare_directories()?;

        let video_files = FileManager::find_video_files(input_dir)?;
        if video_files.is_empty() {
            return Err(anyhow::anyhow!("No video files found in directory: {:?}", input_dir));
        }

        let total_files = video_files.len();
        info!("Processing {} video file(s) in {:?}", total_files, input_dir);

        // Folder-level progress bar
        let folder_pb = ProgressBar::new(total_files as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Processing files");

        let mut summary = BatchSummary::default();

        for (position, video_file) in video_files.iter().enumerate() {
            let file_name = video_file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());

            info!(
                "Processing file {}/{}: {}",
                position + 1,
                total_files,
                file_name
            );
            folder_pb.set_message(format!("Processing: {}", file_name));

            // Skip before running any stage when the subtitle is already there
            let srt_path = FileManager::sibling_path(
                video_file,
                &self.config.directories.subtitles,
                "srt",
            );
            if srt_path.exists() && !force_overwrite {
                warn!("Skipping file, subtitle already exists (use -f to force overwrite)");
                summary.skip_count += 1;
                folder_pb.inc(1);
                continue;
            }

            // Per-file error isolation: one failed file never stops the batch
            match self.run(video_file, force_overwrite).await {
                Ok(_) => {
                    summary.success_count += 1;
                }
                Err(e) => {
                    error!("Error processing file {}: {}", file_name, e);
                    summary.error_count += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");

        let duration = start_time.elapsed();
        let summary_message = format!(
            "Folder processing completed: {} processed, {} skipped, {} errors",
            summary.success_count, summary.skip_count, summary.error_count
        );
        info!("{}", summary_message);

        // Append the run summary to the issues log next to the videos
        let log_file_path = input_dir.join("vidscribe.issues.log");
        if let Err(e) = FileManager::append_to_log_file(
            &log_file_path,
            &format!(
                "{} - Duration: {}",
                summary_message,
                Self::format_duration(duration)
            ),
        ) {
            warn!("Failed to write folder logs to file: {}", e);
        } else {
            info!("Folder processing logs written to {}", log_file_path.display());
        }

        Ok(summary)
    }

    /// Create the audio, transcript, and subtitle directories when missing
    fn prepare_directories(&self) -> Result<()> {
        FileManager::ensure_dir(&self.config.directories.audio)
            .context("Failed to create audio directory")?;
        FileManager::ensure_dir(&self.config.directories.transcripts)
            .context("Failed to create transcript directory")?;
        FileManager::ensure_dir(&self.config.directories.subtitles)
            .context("Failed to create subtitle directory")?;
        Ok(())
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
