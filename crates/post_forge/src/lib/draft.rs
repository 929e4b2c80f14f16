//! Assembles pipeline results into the fields of a blog post draft.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::processor::PipelineReport;

static HTML_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Longest excerpt, in characters, used as a fallback summary
pub const EXCERPT_MAX_CHARS: usize = 200;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PostDraft {
    /// `None` when the video title is unknown and must be entered by hand
    pub title: Option<String>,
    pub summary: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
}

impl PostDraft {
    /// Builds a draft from whatever parts of the report succeeded. Never fails.
    pub fn assemble(report: &PipelineReport) -> Self {
        let transcript = report.transcription.ok();

        let title = transcript.and_then(|t| t.title.clone());
        let content = transcript
            .map(|t| t.best_text().to_string())
            .unwrap_or_default();

        let summary = report
            .summarization
            .as_ref()
            .and_then(|outcome| outcome.ok())
            .map(|s| s.summary.clone())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| excerpt(&content));

        let cover = report
            .image
            .as_ref()
            .and_then(|outcome| outcome.ok())
            .map(|img| img.image.to_string());

        Self {
            title,
            summary,
            content,
            cover,
        }
    }
}

/// First line of `text` with HTML tags removed, cut to [`EXCERPT_MAX_CHARS`] plus `...`.
pub fn excerpt(text: &str) -> String {
    let plain = HTML_TAG_RE.replace_all(text, "");
    let first_line = plain.split('\n').next().unwrap_or_default();

    match first_line.char_indices().nth(EXCERPT_MAX_CHARS) {
        Some((cut, _)) => format!("{}...", &first_line[..cut]),
        None => first_line.to_string(),
    }
}
