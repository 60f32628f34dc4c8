/*!
 * Error types for the vidscribe application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while driving the transcription engine
#[derive(Error, Debug)]
pub enum TranscriptionError {
    /// The engine reported an out-of-memory condition in its output stream
    #[error("Transcription engine ran out of memory (batch size {batch_size})")]
    ResourceExhausted {
        /// Batch size in effect when the marker was seen
        batch_size: u32,
    },

    /// The engine process failed without an out-of-memory marker
    #[error("Transcription engine failed (batch size {batch_size}): {message}")]
    EngineFailure {
        /// Batch size in effect when the process failed
        batch_size: u32,
        /// Exit status or spawn error description
        message: String,
    },

    /// The batch size reached the floor without a successful attempt
    #[error("Unable to transcribe {path:?} due to repeated resource exhaustion (last batch size {batch_size})")]
    RetryBudgetExhausted {
        /// Audio file that could not be transcribed
        path: PathBuf,
        /// Last batch size that was attempted
        batch_size: u32,
    },
}

/// Errors that can occur during audio extraction
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// ffmpeg exited with a non-zero status
    #[error("ffmpeg audio extraction failed: {0}")]
    CommandFailed(String),

    /// ffmpeg did not finish within the watchdog timeout
    #[error("ffmpeg audio extraction timed out after {0} seconds")]
    TimedOut(u64),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the transcription driver
    #[error("Transcription error: {0}")]
    Transcription(#[from] TranscriptionError),

    /// Error from audio extraction
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
