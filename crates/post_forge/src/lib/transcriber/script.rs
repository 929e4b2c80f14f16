use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Stdio,
};

use reqwest::Url;
use tokio::process::Command;

use crate::{
    error::{Error, Result},
    transcriber::{
        output::{parse_error_output, parse_output},
        Transcriber,
    },
    types::{TranscriptionRequest, TranscriptionResult},
};

/// Runs the external transcription tool once per request.
///
/// Invoked as `<executable> <script> <video_reference> [--improve]`. Every call spawns
/// its own child process, collects both output streams to completion and discards
/// the handle, so concurrent calls share nothing.
#[derive(Debug, Clone)]
pub struct ScriptTranscriber {
    executable: PathBuf,
    script: PathBuf,
}

/// Exit status and both output streams of a finished transcription process
#[derive(Debug, Clone)]
pub struct ProcessCapture {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ScriptTranscriber {
    pub const DEFAULT_EXECUTABLE: &str = "python3";
    pub const DEFAULT_SCRIPT: &str = "video_to_text/video_to_text.py";
    pub const IMPROVE_FLAG: &str = "--improve";

    pub fn new(executable: impl Into<PathBuf>, script: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            script: script.into(),
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn script(&self) -> &Path {
        &self.script
    }

    /// Arguments passed after the executable, in order
    pub fn args(&self, request: &TranscriptionRequest) -> Vec<OsString> {
        let mut args = vec![
            self.script.clone().into_os_string(),
            OsString::from(request.video_reference.trim()),
        ];
        if request.wants_improved_text {
            args.push(OsString::from(Self::IMPROVE_FLAG));
        }
        args
    }

    #[tracing::instrument(skip(self), fields(executable = %self.executable.display()))]
    async fn run(&self, request: &TranscriptionRequest) -> Result<ProcessCapture> {
        let output = Command::new(&self.executable)
            .args(self.args(request))
            .stdin(Stdio::null())
            .output()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to spawn transcription process"))
            .map_err(|e| Error::ExternalProcess {
                message: format!("Failed to start transcription process: {e}"),
                stderr: String::new(),
                exit_code: None,
            })?;

        Ok(ProcessCapture {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

impl Default for ScriptTranscriber {
    fn default() -> Self {
        Self::new(Self::DEFAULT_EXECUTABLE, Self::DEFAULT_SCRIPT)
    }
}

impl Transcriber for ScriptTranscriber {
    async fn transcribe(&self, request: &TranscriptionRequest) -> Result<TranscriptionResult> {
        validate_reference(&request.video_reference)?;

        let capture = self.run(request).await?;
        interpret(capture)
    }
}

/// Rejects empty references and anything that is not an absolute http(s) url.
pub fn validate_reference(reference: &str) -> Result<Url> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(Error::invalid_input("video url is required"));
    }

    let url = Url::parse(reference)
        .map_err(|e| Error::invalid_input(format!("malformed video url '{reference}': {e}")))?;

    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        _ => Err(Error::invalid_input(format!(
            "unsupported video url '{reference}': expected an http(s) link"
        ))),
    }
}

/// Turns a finished process into a result according to the exit code and output contracts.
pub fn interpret(capture: ProcessCapture) -> Result<TranscriptionResult> {
    let ProcessCapture {
        exit_code,
        stdout,
        stderr,
    } = capture;

    if !stderr.trim().is_empty() {
        tracing::debug!(exit_code = ?exit_code, stderr = %stderr.trim(), "Transcription process stderr");
    }

    if exit_code != Some(0) {
        let message = parse_error_output(&stderr)
            .or_else(|| Some(stderr.trim().to_string()).filter(|s| !s.is_empty()))
            .unwrap_or_else(|| match exit_code {
                Some(code) => format!("Transcription process exited with status {code}"),
                None => "Transcription process was terminated by a signal".to_string(),
            });

        tracing::error!(exit_code = ?exit_code, %message, "Transcription process failed");
        return Err(Error::ExternalProcess {
            message,
            stderr,
            exit_code,
        });
    }

    match parse_output(&stdout) {
        Some((contract, result)) => {
            tracing::info!(
                contract = contract.name(),
                has_title = result.title.is_some(),
                has_improved = result.improved_text.is_some(),
                "Parsed transcription output"
            );
            Ok(result)
        }
        None => {
            tracing::error!(stdout_len = stdout.len(), "Unrecognized transcription output");
            Err(Error::ExternalProcess {
                message: "Failed to parse transcription output".to_string(),
                stderr,
                exit_code,
            })
        }
    }
}
