// Model Response Parsing - Extracts a beat from a language-model reply
// Replies are expected to be a bare JSON object, sometimes wrapped in a code fence

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::types::{BeatPattern, PatternError};

const FENCE: &str = "```";

/// Errors that can occur while reading a model reply
#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Response does not contain a beat")]
    MissingBeat,

    #[error("Invalid beat: {0}")]
    Pattern(#[from] PatternError),
}

/// A generated or refined beat with its accompanying prose
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatResponse {
    pub beat: BeatPattern,

    /// Friendly explanation of what was created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,

    /// One music theory insight about the beat
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theory_tip: Option<String>,
}

/// Strip a surrounding code fence (and its `json` tag) from a reply
pub fn strip_code_fence(text: &str) -> &str {
    let content = text.trim();

    if !content.starts_with(FENCE) {
        return content;
    }

    // Keep what sits between the first and second fence
    let inner = content.split(FENCE).nth(1).unwrap_or("");
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.trim()
}

/// Parse a model reply into a beat response
pub fn parse_beat_response(text: &str) -> Result<BeatResponse, ResponseError> {
    let value: Value = serde_json::from_str(strip_code_fence(text))?;

    let beat = match value.get("beat") {
        Some(beat) if !beat.is_null() => BeatPattern::from_value(beat)?,
        _ => return Err(ResponseError::MissingBeat),
    };

    let text_field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_string);

    Ok(BeatResponse {
        beat,
        explanation: text_field("explanation"),
        theory_tip: text_field("theory_tip"),
    })
}
