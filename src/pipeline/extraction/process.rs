use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use serde_json::Value;
use tokio::process::Command;

use super::types::OcrEngine;
use super::ExtractionError;
use crate::models::DocumentType;
use crate::pipeline::import::UploadFormat;

const MAX_STDERR_CHARS: usize = 2_000;

/// OCR through a local extractor script.
///
/// Invoked as `<interpreter> <script> <file> <doc_type>`; the script prints a
/// single JSON object on stdout.
///
/// `extract` blocks on the tokio runtime it is called under, so async callers
/// must go through `spawn_blocking`. Outside any runtime it drives its own.
pub struct ProcessOcrEngine {
    interpreter: PathBuf,
    script: PathBuf,
    timeout: Duration,
}

impl ProcessOcrEngine {
    pub fn new(interpreter: impl Into<PathBuf>, script: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            interpreter: interpreter.into(),
            script: script.into(),
            timeout,
        }
    }

    fn program(&self) -> String {
        self.interpreter.display().to_string()
    }

    /// Run the script against `file`. The child is killed when the timeout
    /// drops the pending wait.
    async fn run(&self, file: &Path, doc_type: DocumentType) -> Result<Value, ExtractionError> {
        let child = Command::new(&self.interpreter)
            .arg(&self.script)
            .arg(file)
            .arg(doc_type.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ExtractionError::Spawn {
                program: self.program(),
                source,
            })?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(output) => output?,
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.timeout.as_secs(),
                    doc_type = %doc_type,
                    "OCR process timed out, killed"
                );
                return Err(ExtractionError::Timeout {
                    secs: self.timeout.as_secs(),
                });
            }
        };

        if !output.status.success() {
            let stderr: String = String::from_utf8_lossy(&output.stderr)
                .trim()
                .chars()
                .take(MAX_STDERR_CHARS)
                .collect();
            return Err(ExtractionError::ProcessFailed {
                code: output.status.code(),
                stderr,
            });
        }

        let value = parse_ocr_stdout(&String::from_utf8_lossy(&output.stdout))?;
        tracing::debug!(doc_type = %doc_type, "OCR process finished");
        Ok(value)
    }
}

impl OcrEngine for ProcessOcrEngine {
    fn extract(
        &self,
        bytes: &[u8],
        format: UploadFormat,
        doc_type: DocumentType,
    ) -> Result<Value, ExtractionError> {
        // Removed on drop, whatever the outcome.
        let mut staged = tempfile::Builder::new()
            .prefix("merit-upload-")
            .suffix(&format!(".{}", format.extension()))
            .tempfile()?;
        staged.write_all(bytes)?;
        staged.flush()?;

        let run = self.run(staged.path(), doc_type);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle.block_on(run),
            Err(_) => tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?
                .block_on(run),
        }
    }
}

/// Parse extractor stdout. Falls back to the last non-empty line when the
/// script printed diagnostics before its JSON.
pub fn parse_ocr_stdout(stdout: &str) -> Result<Value, ExtractionError> {
    let trimmed = stdout.trim();
    match serde_json::from_str(trimmed) {
        Ok(value) => Ok(value),
        Err(err) => {
            let last_line = trimmed.lines().rev().map(str::trim).find(|l| !l.is_empty());
            match last_line {
                Some(line) if line != trimmed => {
                    serde_json::from_str(line).map_err(|_| ExtractionError::InvalidOutput(err))
                }
                _ => Err(ExtractionError::InvalidOutput(err)),
            }
        }
    }
}
