use anyhow::Result;
use log::{info, warn};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::file_utils::FileManager;
use crate::transcript::TranscriptDocument;

// @module: Transcript to SRT conversion

// @struct: Single numbered subtitle cue
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleCue {
    // @field: 1-based output position
    pub index: usize,

    // @field: Start time as HH:MM:SS,mmm
    pub start_code: String,

    // @field: End time as HH:MM:SS,mmm
    pub end_code: String,

    // @field: Cue text, verbatim from the segment
    pub text: String,
}

impl fmt::Display for SubtitleCue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{} --> {}", self.start_code, self.end_code)?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Converts transcript documents into SRT subtitle text.
///
/// This is a pure, order-preserving transform: cues come out in document
/// order, numbered contiguously from 1, with chunks missing a timestamp
/// endpoint dropped along the way.
pub struct SubtitleConverter;

impl SubtitleConverter {
    /// Format a time in seconds to SRT format (HH:MM:SS,mmm).
    ///
    /// Milliseconds are taken from the original fractional value before the
    /// integer second is truncated; extracting them afterwards would always
    /// yield zero.
    pub fn format_timestamp(seconds: f64) -> String {
        let hours = (seconds / 3600.0).floor() as u64;
        let minutes = ((seconds % 3600.0) / 60.0).floor() as u64;
        let whole_seconds = (seconds % 60.0).floor() as u64;
        let milliseconds = ((seconds % 1.0) * 1000.0).floor() as u64;

        format!(
            "{:02}:{:02}:{:02},{:03}",
            hours, minutes, whole_seconds, milliseconds
        )
    }

    /// Convert a transcript document into a sequence of numbered cues.
    ///
    /// Chunks with a missing start or end are skipped with a diagnostic and
    /// do not consume an index; the result is numbered 1..N contiguously.
    pub fn convert(document: &TranscriptDocument) -> Vec<SubtitleCue> {
        let mut cues = Vec::with_capacity(document.chunks.len());
        let mut index = 1;

        for chunk in &document.chunks {
            let Some(segment) = chunk.segment() else {
                warn!(
                    "Skipping chunk with invalid timestamps: {:?} {:?}",
                    chunk.timestamp, chunk.text
                );
                continue;
            };

            cues.push(SubtitleCue {
                index,
                start_code: Self::format_timestamp(segment.start),
                end_code: Self::format_timestamp(segment.end),
                text: segment.text,
            });
            index += 1;
        }

        cues
    }

    /// Render a transcript document as SRT text
    pub fn convert_to_srt(document: &TranscriptDocument) -> String {
        let mut lines = Vec::new();

        for cue in Self::convert(document) {
            lines.push(cue.index.to_string());
            lines.push(format!("{} --> {}", cue.start_code, cue.end_code));
            lines.push(cue.text);
            lines.push(String::new()); // Blank line to separate entries
        }

        lines.join("\n")
    }

    /// Convert a transcript JSON file to an SRT file in the output directory.
    ///
    /// The SRT filename is the transcript stem with an `.srt` extension.
    pub fn convert_file<P1: AsRef<Path>, P2: AsRef<Path>>(
        transcript_path: P1,
        srt_output_dir: P2,
    ) -> Result<PathBuf> {
        let transcript_path = transcript_path.as_ref();

        let document = TranscriptDocument::load_from_file(transcript_path)?;
        let srt_path = FileManager::sibling_path(transcript_path, srt_output_dir, "srt");

        let srt_content = Self::convert_to_srt(&document);
        FileManager::write_to_file(&srt_path, &srt_content)?;

        info!("Conversion complete. SRT file saved as {}", srt_path.display());

        Ok(srt_path)
    }
}
