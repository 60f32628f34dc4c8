/*!
 * Tests for transcript to SRT conversion
 */

use anyhow::Result;
use std::fmt::Write;
use vidscribe::subtitle_converter::{SubtitleConverter, SubtitleCue};
use vidscribe::transcript::{TranscriptChunk, TranscriptDocument};
use crate::common;

/// Test timestamp formatting at zero
#[test]
fn test_format_timestamp_withZeroSeconds_shouldFormatAllZero() {
    assert_eq!(SubtitleConverter::format_timestamp(0.0), "00:00:00,000");
}

/// Test timestamp formatting with minutes and milliseconds
#[test]
fn test_format_timestamp_withMinutesAndMillis_shouldFormatCorrectly() {
    assert_eq!(SubtitleConverter::format_timestamp(61.234), "00:01:01,234");
}

/// Test timestamp formatting with hours
#[test]
fn test_format_timestamp_withHours_shouldFormatCorrectly() {
    assert_eq!(SubtitleConverter::format_timestamp(3725.5), "01:02:05,500");
}

/// Milliseconds must come from the fractional seconds before integer
/// truncation; extracting them after truncating always yields ,000
#[test]
fn test_format_timestamp_withFractionalSeconds_shouldKeepMilliseconds() {
    assert_eq!(SubtitleConverter::format_timestamp(1.5), "00:00:01,500");
    assert_eq!(SubtitleConverter::format_timestamp(59.999), "00:00:59,999");
    assert_ne!(SubtitleConverter::format_timestamp(61.234), "00:01:01,000");
}

/// Test timestamp formatting with exact integer seconds
#[test]
fn test_format_timestamp_withIntegerSeconds_shouldHaveZeroMillis() {
    assert_eq!(SubtitleConverter::format_timestamp(3.0), "00:00:03,000");
    assert_eq!(SubtitleConverter::format_timestamp(3600.0), "01:00:00,000");
}

/// Test cue rendering via the Display implementation
#[test]
fn test_subtitle_cue_display_withValidCue_shouldFormatBlock() {
    let cue = SubtitleCue {
        index: 1,
        start_code: "00:00:05,000".to_string(),
        end_code: "00:00:10,000".to_string(),
        text: "Test subtitle".to_string(),
    };

    let mut output = String::new();
    write!(output, "{}", cue).unwrap();

    assert_eq!(output, "1\n00:00:05,000 --> 00:00:10,000\nTest subtitle\n\n");
}

/// Test that valid chunks become contiguously numbered cues
#[test]
fn test_convert_withValidChunks_shouldNumberCuesFromOne() {
    let document = TranscriptDocument {
        chunks: vec![
            TranscriptChunk::new(0.0, 1.0, "first"),
            TranscriptChunk::new(1.0, 2.0, "second"),
            TranscriptChunk::new(2.0, 3.0, "third"),
        ],
    };

    let cues = SubtitleConverter::convert(&document);

    assert_eq!(cues.len(), 3);
    assert_eq!(cues[0].index, 1);
    assert_eq!(cues[1].index, 2);
    assert_eq!(cues[2].index, 3);
    assert_eq!(cues[0].text, "first");
    assert_eq!(cues[2].text, "third");
}

/// A chunk with a missing endpoint is skipped without consuming an index
#[test]
fn test_convert_withInvalidChunksInterleaved_shouldSkipAndKeepNumberingContiguous() {
    let document = TranscriptDocument {
        chunks: vec![
            TranscriptChunk {
                timestamp: (None, Some(1.0)),
                text: "no start".to_string(),
            },
            TranscriptChunk::new(0.0, 1.0, "kept one"),
            TranscriptChunk {
                timestamp: (Some(1.0), None),
                text: "no end".to_string(),
            },
            TranscriptChunk::new(1.0, 2.0, "kept two"),
            TranscriptChunk {
                timestamp: (None, None),
                text: "neither".to_string(),
            },
        ],
    };

    let cues = SubtitleConverter::convert(&document);

    assert_eq!(cues.len(), 2);
    assert_eq!(cues[0].index, 1);
    assert_eq!(cues[0].text, "kept one");
    assert_eq!(cues[1].index, 2);
    assert_eq!(cues[1].text, "kept two");
}

/// Test exact SRT body shape for two simple segments
#[test]
fn test_convert_to_srt_withTwoSegments_shouldEmitTwoBlocks() {
    let document = TranscriptDocument {
        chunks: vec![
            TranscriptChunk::new(0.0, 1.0, "a"),
            TranscriptChunk::new(1.0, 2.0, "b"),
        ],
    };

    let srt = SubtitleConverter::convert_to_srt(&document);

    let expected = "1\n00:00:00,000 --> 00:00:01,000\na\n\n2\n00:00:01,000 --> 00:00:02,000\nb\n";
    assert_eq!(srt, expected);
}

/// Cue text is carried over verbatim, punctuation included
#[test]
fn test_convert_to_srt_withPunctuatedText_shouldPreserveTextVerbatim() {
    let document = TranscriptDocument {
        chunks: vec![TranscriptChunk::new(0.0, 2.5, "Wait... what?! (pause)")],
    };

    let srt = SubtitleConverter::convert_to_srt(&document);

    assert!(srt.contains("Wait... what?! (pause)"));
}

/// Test conversion of an empty document
#[test]
fn test_convert_to_srt_withEmptyDocument_shouldProduceEmptyBody() {
    let document = TranscriptDocument { chunks: Vec::new() };
    assert_eq!(SubtitleConverter::convert_to_srt(&document), "");
}

/// Test file-to-file conversion with the sibling naming scheme
#[test]
fn test_convert_file_withTranscriptFile_shouldWriteSrtSibling() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let transcript_path = common::create_test_transcript(&dir, "episode01.json")?;

    let srt_path = SubtitleConverter::convert_file(&transcript_path, &dir)?;

    assert_eq!(srt_path, dir.join("episode01.srt"));
    let content = std::fs::read_to_string(&srt_path)?;
    assert!(content.starts_with("1\n00:00:00,000 --> 00:00:01,500\n"));
    assert!(content.contains("This is a test transcript."));
    assert!(content.contains("3\n00:00:04,000 --> 00:00:07,250\nFor testing purposes."));

    Ok(())
}
