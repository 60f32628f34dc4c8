use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// @module: Transcript document data model

/// One timestamped chunk of transcribed speech as emitted by the engine.
///
/// The engine writes `"timestamp": [start, end]` where either endpoint may be
/// `null` when the engine could not pin the boundary down.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptChunk {
    // @field: Start/end seconds, either may be missing
    pub timestamp: (Option<f64>, Option<f64>),

    // @field: Transcribed text for this interval
    #[serde(default)]
    pub text: String,
}

/// A validated chunk with both endpoints present.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Seconds from media start
    pub start: f64,

    /// Seconds from media start, >= start
    pub end: f64,

    /// Transcribed text (may be empty)
    pub text: String,
}

impl TranscriptChunk {
    /// Creates a chunk with both endpoints present - used by tests and external consumers
    #[allow(dead_code)]
    pub fn new(start: f64, end: f64, text: &str) -> Self {
        TranscriptChunk {
            timestamp: (Some(start), Some(end)),
            text: text.to_string(),
        }
    }

    // @returns: Validated segment, or None when an endpoint is missing
    // A chunk without a start or end is invalid and must never be coerced to zero.
    pub fn segment(&self) -> Option<Segment> {
        match self.timestamp {
            (Some(start), Some(end)) => Some(Segment {
                start,
                end,
                text: self.text.clone(),
            }),
            _ => None,
        }
    }
}

/// Ordered sequence of transcript chunks for one audio input.
///
/// Insertion order is chronological speech order and must be preserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptDocument {
    /// Chunks in chronological order
    #[serde(default)]
    pub chunks: Vec<TranscriptChunk>,
}

impl TranscriptDocument {
    /// Load a transcript document from a JSON file produced by the engine
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read transcript file: {:?}", path))?;
        Self::parse(&content)
    }

    /// Parse a transcript document from its JSON text
    pub fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse transcript JSON")
    }
}
