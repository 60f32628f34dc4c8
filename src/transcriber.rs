use anyhow::Result;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::app_config::{Config, EngineConfig};
use crate::errors::TranscriptionError;
use crate::file_utils::FileManager;

// @module: Transcription engine driver with adaptive batch-size retries

/// Substrings in the engine's output that signal memory exhaustion.
/// Matching is case-sensitive, exactly as the engine prints them.
pub const EXHAUSTION_MARKERS: [&str; 2] = ["CUDA out of memory", "out of memory"];

/// Amount the batch size shrinks after every failed attempt
pub const BATCH_SIZE_STEP: u32 = 4;

/// Outcome of a single engine invocation
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    /// Zero exit with no exhaustion marker in the output
    Success,

    /// An exhaustion marker was seen in the output stream
    ResourceExhausted,

    /// Non-zero exit, spawn failure, or stream error without a marker
    EngineFailure(String),
}

/// Compute the batch size for the next attempt after a failure.
///
/// Returns None when the reduced value would be zero or below; the engine is
/// never invoked with a non-positive batch size.
pub fn next_batch_size(current: u32) -> Option<u32> {
    current.checked_sub(BATCH_SIZE_STEP).filter(|reduced| *reduced > 0)
}

// @returns: Whether a single output line carries an exhaustion marker
pub fn line_has_exhaustion_marker(line: &str) -> bool {
    EXHAUSTION_MARKERS.iter().any(|marker| line.contains(marker))
}

/// Background task that reports elapsed wall-clock time once per second
/// while an engine attempt is running.
///
/// Purely observational. The task holds no shared state beyond its stop
/// signal and must be stopped and joined before the attempt concludes.
pub struct Stopwatch {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Stopwatch {
    /// Start the elapsed-time reporter
    pub fn start() -> Self {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let start_time = Instant::now();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(1));
            // The first tick fires immediately, skip it
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let elapsed = start_time.elapsed().as_secs();
                        debug!("Elapsed time: {:02}:{:02} minutes", elapsed / 60, elapsed % 60);
                    }
                    _ = stop_rx.changed() => break,
                }
            }
        });

        Stopwatch { stop_tx, handle }
    }

    /// Signal the reporter to stop and wait for it to finish
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        let _ = self.handle.await;
    }
}

/// Drives the external transcription engine for one audio file at a time.
///
/// Each attempt spawns the engine as a child process and scans its combined
/// output for the exhaustion markers. Failed attempts shrink the batch size
/// until an attempt succeeds or the batch size reaches the floor.
pub struct Transcriber {
    // @field: Engine binary and model settings
    engine: EngineConfig,

    // @field: Spoken language passed to the engine
    language: String,

    // @field: Batch size for the first attempt
    initial_batch_size: u32,
}

impl Transcriber {
    // @method: Create a transcriber from the application configuration
    pub fn from_config(config: &Config) -> Self {
        Transcriber {
            engine: config.engine.clone(),
            language: config.language.clone(),
            initial_batch_size: config.initial_batch_size,
        }
    }

    /// Create a transcriber with explicit settings - used by tests and external consumers
    #[allow(dead_code)]
    pub fn new(engine: EngineConfig, language: &str, initial_batch_size: u32) -> Self {
        Transcriber {
            engine,
            language: language.to_string(),
            initial_batch_size,
        }
    }

    /// Transcribe one audio file, retrying with a smaller batch size on failure.
    ///
    /// Returns the path of the transcript JSON written by the engine, or a
    /// permanent error once the batch size reaches the floor.
    pub async fn transcribe<P1: AsRef<Path>, P2: AsRef<Path>>(
        &self,
        audio_path: P1,
        transcript_output_dir: P2,
    ) -> Result<PathBuf> {
        let audio_path = audio_path.as_ref();
        let transcript_path =
            FileManager::sibling_path(audio_path, transcript_output_dir, "json");

        let mut batch_size = self.initial_batch_size;

        while batch_size > 0 {
            info!(
                "Transcribing {:?} (language: {}, batch size: {})",
                audio_path, self.language, batch_size
            );

            let stopwatch = Stopwatch::start();
            let command = self.engine_command(audio_path, &transcript_path, batch_size);
            let outcome = run_engine_attempt(command).await;
            stopwatch.stop().await;

            match outcome {
                AttemptOutcome::Success => {
                    // A clean exit without a transcript on disk is still a failure
                    if transcript_path.exists() {
                        return Ok(transcript_path);
                    }
                    warn!(
                        "Engine exited cleanly but wrote no transcript at {:?}",
                        transcript_path
                    );
                }
                AttemptOutcome::ResourceExhausted => {
                    warn!(
                        "{}",
                        TranscriptionError::ResourceExhausted { batch_size }
                    );
                }
                AttemptOutcome::EngineFailure(message) => {
                    warn!(
                        "{}",
                        TranscriptionError::EngineFailure {
                            batch_size,
                            message,
                        }
                    );
                }
            }

            match next_batch_size(batch_size) {
                Some(reduced) => {
                    warn!("Error encountered. Reducing batch size to {}", reduced);
                    batch_size = reduced;
                }
                None => {
                    return Err(TranscriptionError::RetryBudgetExhausted {
                        path: audio_path.to_path_buf(),
                        batch_size,
                    }
                    .into());
                }
            }
        }

        // Unreachable with a validated positive initial batch size
        Err(TranscriptionError::RetryBudgetExhausted {
            path: audio_path.to_path_buf(),
            batch_size,
        }
        .into())
    }

    // @builds: Engine command line for one attempt
    fn engine_command(&self, audio_path: &Path, transcript_path: &Path, batch_size: u32) -> Command {
        let mut command = Command::new(&self.engine.binary);
        command.args([
            "--device-id",
            &self.engine.device_id,
            "--model-name",
            &self.engine.model,
            "--language",
            &self.language,
            "--batch-size",
            &batch_size.to_string(),
            "--transcript-path",
            transcript_path.to_str().unwrap_or_default(),
            "--file-name",
            audio_path.to_str().unwrap_or_default(),
        ]);
        command
    }
}

/// Run one engine attempt to completion and classify the outcome.
///
/// Both output streams are scanned line-by-line for the exhaustion markers.
/// A marker fails the attempt immediately, before process exit, but the child
/// is always reaped before this function returns.
pub async fn run_engine_attempt(mut command: Command) -> AttemptOutcome {
    command.stdout(Stdio::piped()).stderr(Stdio::piped());

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            // Missing binary or malformed invocation retries like any other failure
            return AttemptOutcome::EngineFailure(format!("failed to spawn engine: {}", e));
        }
    };

    let scan_result = scan_output_for_markers(&mut child).await;

    // Reap the child on every path, including marker detection and stream errors
    let wait_result = child.wait().await;

    let marker_seen = match scan_result {
        Ok(marker_seen) => marker_seen,
        Err(e) => {
            return AttemptOutcome::EngineFailure(format!("failed to read engine output: {}", e));
        }
    };

    if marker_seen {
        return AttemptOutcome::ResourceExhausted;
    }

    match wait_result {
        Ok(status) if status.success() => AttemptOutcome::Success,
        Ok(status) => AttemptOutcome::EngineFailure(format!("engine exited with {}", status)),
        Err(e) => AttemptOutcome::EngineFailure(format!("failed to wait for engine: {}", e)),
    }
}

/// Scan the child's stdout and stderr line-by-line, returning true as soon as
/// an exhaustion marker is seen, or false once both streams are exhausted.
async fn scan_output_for_markers(child: &mut Child) -> Result<bool> {
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow::anyhow!("engine stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow::anyhow!("engine stderr was not piped"))?;

    let mut stdout_lines = BufReader::new(stdout).lines();
    let mut stderr_lines = BufReader::new(stderr).lines();
    let mut stdout_done = false;
    let mut stderr_done = false;

    while !(stdout_done && stderr_done) {
        let line = tokio::select! {
            line = stdout_lines.next_line(), if !stdout_done => {
                match line? {
                    Some(line) => line,
                    None => {
                        stdout_done = true;
                        continue;
                    }
                }
            }
            line = stderr_lines.next_line(), if !stderr_done => {
                match line? {
                    Some(line) => line,
                    None => {
                        stderr_done = true;
                        continue;
                    }
                }
            }
        };

        debug!("engine: {}", line);

        if line_has_exhaustion_marker(&line) {
            return Ok(true);
        }
    }

    Ok(false)
}
