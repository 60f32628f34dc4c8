use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::PathBuf;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Spoken language of the source audio (language name, e.g. "Chinese")
    #[serde(default = "default_language")]
    pub language: String,

    /// Batch size for the first transcription attempt
    #[serde(default = "default_batch_size")]
    pub initial_batch_size: u32,

    /// Pipeline directories
    #[serde(default)]
    pub directories: DirectoriesConfig,

    /// Transcription engine config
    #[serde(default)]
    pub engine: EngineConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Directories used by the batch pipeline.
///
/// All four are created before processing begins when missing.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DirectoriesConfig {
    /// Input directory holding the video files
    #[serde(default = "default_videos_dir")]
    pub videos: PathBuf,

    /// Intermediate directory for extracted audio
    #[serde(default = "default_audio_dir")]
    pub audio: PathBuf,

    /// Intermediate directory for transcript JSON documents
    #[serde(default = "default_transcripts_dir")]
    pub transcripts: PathBuf,

    /// Output directory for SRT subtitle files
    #[serde(default = "default_subtitles_dir")]
    pub subtitles: PathBuf,
}

impl Default for DirectoriesConfig {
    fn default() -> Self {
        Self {
            videos: default_videos_dir(),
            audio: default_audio_dir(),
            transcripts: default_transcripts_dir(),
            subtitles: default_subtitles_dir(),
        }
    }
}

/// Transcription engine configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EngineConfig {
    /// Engine binary name or path
    #[serde(default = "default_engine_binary")]
    pub binary: String,

    /// Device target passed to the engine (e.g. "mps", "0" for CUDA)
    #[serde(default = "default_device_id")]
    pub device_id: String,

    /// Model identifier passed to the engine
    #[serde(default = "default_engine_model")]
    pub model: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            binary: default_engine_binary(),
            device_id: default_device_id(),
            model: default_engine_model(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_language() -> String {
    "Chinese".to_string()
}

fn default_batch_size() -> u32 {
    12
}

fn default_videos_dir() -> PathBuf {
    PathBuf::from("video")
}

fn default_audio_dir() -> PathBuf {
    PathBuf::from("audio")
}

fn default_transcripts_dir() -> PathBuf {
    PathBuf::from("json")
}

fn default_subtitles_dir() -> PathBuf {
    PathBuf::from("srt")
}

fn default_engine_binary() -> String {
    "insanely-fast-whisper".to_string()
}

fn default_device_id() -> String {
    "mps".to_string()
}

fn default_engine_model() -> String {
    "openai/whisper-large-v2".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.language.trim().is_empty() {
            return Err(anyhow!("A source language is required"));
        }

        if self.initial_batch_size == 0 {
            return Err(anyhow!("Initial batch size must be positive"));
        }

        if self.engine.binary.trim().is_empty() {
            return Err(anyhow!("Transcription engine binary must be set"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            language: default_language(),
            initial_batch_size: default_batch_size(),
            directories: DirectoriesConfig::default(),
            engine: EngineConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
