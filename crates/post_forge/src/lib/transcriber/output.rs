//! Parsers for the two output contracts the transcription tooling may speak.
//!
//! The structured contract is a single JSON object on stdout. The legacy contract
//! delimits the title with marker lines and the transcripts with labelled blocks.
//! Strategies are attempted in [`OutputContract::PRIORITY`] order and the first
//! one that recognizes the output wins.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{ErrorPayload, ScriptOutput, TranscriptionResult};

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)===VIDEO_TITLE_START===[ \t]*\r?\n(.*?)\r?\n?[ \t]*===VIDEO_TITLE_END===")
        .unwrap()
});

static ORIGINAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?sm)^Original transcription:[ \t]*(?:\r?\n)?(.*?)(?:\r?\n)?(?:^Improved transcription:|^===VIDEO_TITLE_START===|\z)",
    )
    .unwrap()
});

static IMPROVED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?sm)^Improved transcription:[ \t]*(?:\r?\n)?(.*?)(?:\r?\n)?(?:^Original transcription:|^===VIDEO_TITLE_START===|\z)",
    )
    .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputContract {
    /// `{"title": ..., "original": ..., "improved": ...}` on stdout
    Json,
    /// `===VIDEO_TITLE_START===` markers and `Original transcription:` blocks
    Markers,
}

impl OutputContract {
    pub const PRIORITY: [OutputContract; 2] = [OutputContract::Json, OutputContract::Markers];

    pub fn name(self) -> &'static str {
        match self {
            OutputContract::Json => "json",
            OutputContract::Markers => "markers",
        }
    }

    pub fn parse(self, stdout: &str) -> Option<TranscriptionResult> {
        match self {
            OutputContract::Json => parse_json(stdout),
            OutputContract::Markers => parse_markers(stdout),
        }
    }
}

/// Runs every contract in priority order, returning the first successful parse.
pub fn parse_output(stdout: &str) -> Option<(OutputContract, TranscriptionResult)> {
    OutputContract::PRIORITY
        .into_iter()
        .find_map(|contract| contract.parse(stdout).map(|result| (contract, result)))
}

/// Extracts a human readable message from a failed process' stderr.
///
/// The tooling writes `{"error": "..."}` as its last line, possibly after progress
/// chatter. Anything else is surfaced verbatim.
pub fn parse_error_output(stderr: &str) -> Option<String> {
    json_candidates(stderr)
        .find_map(|candidate| serde_json::from_str::<ErrorPayload>(candidate).ok())
        .map(|payload| payload.message())
}

/// Whole trimmed text first, then the last line that looks like a JSON object
fn json_candidates(text: &str) -> impl Iterator<Item = &str> {
    let trimmed = text.trim();
    let last_object_line = trimmed
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| line.starts_with('{'))
        .filter(|line| *line != trimmed);

    std::iter::once(trimmed)
        .filter(|t| t.starts_with('{'))
        .chain(last_object_line)
}

fn parse_json(stdout: &str) -> Option<TranscriptionResult> {
    let output = json_candidates(stdout)
        .find_map(|candidate| serde_json::from_str::<ScriptOutput>(candidate).ok())?;

    let improved = output
        .improved
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    Some(TranscriptionResult::new(
        output.title,
        output.original.trim(),
        improved,
    ))
}

fn parse_markers(stdout: &str) -> Option<TranscriptionResult> {
    let title = capture_block(&TITLE_RE, stdout);
    let original = capture_block(&ORIGINAL_RE, stdout);
    let improved = capture_block(&IMPROVED_RE, stdout);

    if title.is_none() && original.is_none() && improved.is_none() {
        return None;
    }

    Some(TranscriptionResult::new(
        title,
        original.unwrap_or_default(),
        improved.filter(|t| !t.is_empty()),
    ))
}

/// `Some("")` when the marker is present with an empty body, `None` when absent
fn capture_block(re: &Regex, text: &str) -> Option<String> {
    re.captures(text).map(|cap| {
        cap.get(1)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default()
    })
}
