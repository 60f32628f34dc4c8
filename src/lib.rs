/*!
 * # vidscribe - Batch video transcription to subtitles
 *
 * A Rust library for batch-converting video files into SRT subtitles using an
 * external speech-transcription engine.
 *
 * ## Features
 *
 * - Extract audio tracks from video files with ffmpeg
 * - Drive an external transcription engine with adaptive batch-size retries
 *   (out-of-memory failures shrink the batch size until the floor)
 * - Convert the engine's timestamped transcript JSON into SRT subtitles
 * - Sequential folder processing with per-file error isolation
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `audio_extractor`: ffmpeg audio extraction
 * - `transcriber`: Transcription engine driver and retry protocol
 * - `transcript`: Transcript document data model
 * - `subtitle_converter`: Transcript to SRT conversion
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod audio_extractor;
pub mod errors;
pub mod file_utils;
pub mod subtitle_converter;
pub mod transcriber;
pub mod transcript;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{BatchSummary, Controller};
pub use errors::{AppError, ExtractionError, TranscriptionError};
pub use subtitle_converter::{SubtitleConverter, SubtitleCue};
pub use transcriber::{AttemptOutcome, Stopwatch, Transcriber};
pub use transcript::{Segment, TranscriptChunk, TranscriptDocument};
