use anyhow::{anyhow, Result};
use log::{error, info};
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::errors::ExtractionError;
use crate::file_utils::FileManager;

// @module: Audio extraction from video files via ffmpeg

// ffmpeg occasionally hangs on damaged containers, bound each extraction
const EXTRACTION_TIMEOUT_SECS: u64 = 600;

/// Extracts the audio track of a video file into an mp3 sibling artifact.
pub struct AudioExtractor;

impl AudioExtractor {
    /// Extract the audio of a video file into the output directory.
    ///
    /// The mp3 filename is the video stem with an `.mp3` extension. Any
    /// pre-existing output file is removed first. Failure here is fatal for
    /// the file's pipeline and is propagated, not retried.
    pub async fn extract<P1: AsRef<Path>, P2: AsRef<Path>>(
        video_path: P1,
        audio_output_dir: P2,
    ) -> Result<PathBuf> {
        let video_path = video_path.as_ref();

        if !video_path.exists() {
            return Err(anyhow!("Video file does not exist: {:?}", video_path));
        }

        let audio_path = FileManager::sibling_path(video_path, audio_output_dir, "mp3");

        // ffmpeg refuses to overwrite without -y; removing keeps reruns clean
        if audio_path.exists() {
            std::fs::remove_file(&audio_path)?;
        }

        let ffmpeg_future = Command::new("ffmpeg")
            .args([
                "-i",
                video_path.to_str().unwrap_or_default(),
                "-q:a",
                "0",
                "-map",
                "a",
                audio_path.to_str().unwrap_or_default(),
            ])
            .output();

        let timeout_duration = std::time::Duration::from_secs(EXTRACTION_TIMEOUT_SECS);
        let result = tokio::select! {
            result = ffmpeg_future => {
                result.map_err(|e| anyhow!("Failed to execute ffmpeg command for audio extraction: {}", e))?
            },
            _ = tokio::time::sleep(timeout_duration) => {
                return Err(ExtractionError::TimedOut(EXTRACTION_TIMEOUT_SECS).into());
            }
        };

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let filtered = Self::filter_ffmpeg_stderr(&stderr);
            error!("Audio extraction failed: {}", filtered);
            return Err(ExtractionError::CommandFailed(filtered).into());
        }

        info!("Audio extracted to {}", audio_path.display());

        Ok(audio_path)
    }

    /// Filter ffmpeg stderr to only show meaningful error lines, stripping the
    /// version banner, build configuration, and stream metadata noise.
    fn filter_ffmpeg_stderr(stderr: &str) -> String {
        let dominated_prefixes = [
            "ffmpeg version",
            "  built with",
            "  configuration:",
            "  lib",
            "Input #",
            "  Metadata:",
            "  Duration:",
            "  Chapter",
            "    Chapter",
            "  Stream #",
            "      Metadata:",
            "        title",
            "        BPS",
            "        DURATION",
            "        NUMBER_OF",
            "        _STATISTICS",
            "Output #",
            "Stream mapping:",
            "Press [q]",
            "size=",
        ];

        let meaningful: Vec<&str> = stderr
            .lines()
            .filter(|line| {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    return false;
                }
                !dominated_prefixes.iter().any(|p| trimmed.starts_with(p))
            })
            .collect();

        if meaningful.is_empty() {
            "unknown ffmpeg error (stderr was empty after filtering)".to_string()
        } else {
            meaningful.join("\n")
        }
    }
}
