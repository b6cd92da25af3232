//! Response parsing for draft stages
//!
//! LLM replies are parsed with a fixed chain: strict JSON, then a text
//! heuristic, then a deterministic default. The chain position that produced
//! a value is kept in [`ParseOutcome`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use domain::ProspectProfile;

/// Which step of the parse chain produced a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseBranch {
    /// Strict JSON (or, for plain-text stages, the raw reply)
    Parsed,
    /// Recovered from free text
    Heuristic,
    /// Deterministic default
    Fallback,
}

/// A parsed value tagged with the branch that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome<T> {
    Parsed(T),
    Heuristic(T),
    Fallback(T),
}

impl<T> ParseOutcome<T> {
    pub const fn branch(&self) -> ParseBranch {
        match self {
            Self::Parsed(_) => ParseBranch::Parsed,
            Self::Heuristic(_) => ParseBranch::Heuristic,
            Self::Fallback(_) => ParseBranch::Fallback,
        }
    }

    pub const fn value(&self) -> &T {
        match self {
            Self::Parsed(v) | Self::Heuristic(v) | Self::Fallback(v) => v,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Self::Parsed(v) | Self::Heuristic(v) | Self::Fallback(v) => v,
        }
    }
}

/// Outcome of one refinement pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refinement {
    pub refined_content: String,
    pub needs_another_iteration: bool,
}

#[derive(Debug, Deserialize)]
struct RefinementReply {
    #[serde(default)]
    refined_content: Option<String>,
    #[serde(default)]
    needs_another_iteration: Option<bool>,
}

/// Tokens that mark free text as an email body
const GREETING_TOKENS: [&str; 3] = ["Dear ", "Hi ", "Hello"];

/// Characters stripped around a value recovered after a label
const LABEL_PUNCTUATION: &[char] = &['"', '\'', '`', ':', ',', '{', '}', '*', ' ', '\t', '\r', '\n'];

/// Remove a surrounding Markdown code fence, if any
pub fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let without_close = without_open.trim().strip_suffix("```").unwrap_or(without_open);
    without_close.trim()
}

/// Extract the JSON object from a possibly fenced or chatty response
pub fn extract_json(response: &str) -> &str {
    let unfenced = strip_code_fence(response);

    // start <= end guards against inputs like "} {"
    match (unfenced.find('{'), unfenced.rfind('}')) {
        (Some(start), Some(end)) if start <= end => &unfenced[start..=end],
        _ => unfenced,
    }
}

/// Read a non-empty string field from a JSON reply
fn json_string_field(response: &str, key: &str) -> Result<String, String> {
    let value: Value =
        serde_json::from_str(extract_json(response)).map_err(|e| format!("JSON parse error: {e}"))?;

    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .ok_or_else(|| format!("missing or empty `{key}` field"))
}

/// Recover the value written after `label` in free text
///
/// Matches the label case-insensitively and keeps the rest of that line.
pub fn extract_labeled_value(text: &str, label: &str) -> Option<String> {
    // ASCII lowercasing keeps byte offsets aligned with `text`
    let start = text
        .to_ascii_lowercase()
        .find(&label.to_ascii_lowercase())?
        + label.len();

    let value = text[start..]
        .trim_start_matches(LABEL_PUNCTUATION)
        .lines()
        .next()?
        .trim_end_matches(LABEL_PUNCTUATION)
        .trim();

    (!value.is_empty()).then(|| value.to_string())
}

/// Whether free text plausibly is an email body for this prospect
pub fn looks_like_email(text: &str, prospect: &ProspectProfile) -> bool {
    GREETING_TOKENS.iter().any(|token| text.contains(token))
        || (!prospect.author.is_empty() && text.contains(&prospect.author))
}

/// Parse a subject reply: `{"subject": ...}`
pub fn parse_subject(response: &str, fallback: &str) -> ParseOutcome<String> {
    match json_string_field(response, "subject") {
        Ok(subject) => ParseOutcome::Parsed(subject),
        Err(error) => {
            warn!(%error, raw = %response, "Failed to parse subject reply");
            match extract_labeled_value(strip_code_fence(response), "subject") {
                Some(subject) => {
                    debug!(%subject, "Recovered subject from free text");
                    ParseOutcome::Heuristic(subject)
                },
                None => ParseOutcome::Fallback(fallback.to_string()),
            }
        },
    }
}

/// Parse a content reply: `{"content": ...}`
///
/// `fallback` is only evaluated when neither JSON nor the raw text is usable.
pub fn parse_content(
    response: &str,
    prospect: &ProspectProfile,
    fallback: impl FnOnce() -> String,
) -> ParseOutcome<String> {
    match json_string_field(response, "content") {
        Ok(content) => ParseOutcome::Parsed(content),
        Err(error) => {
            warn!(%error, raw = %response, "Failed to parse content reply");
            let cleaned = strip_code_fence(response);
            if !cleaned.is_empty() && looks_like_email(cleaned, prospect) {
                ParseOutcome::Heuristic(cleaned.to_string())
            } else {
                ParseOutcome::Fallback(fallback())
            }
        },
    }
}

/// Parse a refinement reply: `{"refined_content": ..., "needs_another_iteration": ...}`
///
/// Missing keys default to the unchanged text and `false`.
pub fn parse_refinement(response: &str, current_text: &str) -> ParseOutcome<Refinement> {
    match serde_json::from_str::<RefinementReply>(extract_json(response)) {
        Ok(reply) => ParseOutcome::Parsed(Refinement {
            refined_content: reply
                .refined_content
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| current_text.to_string()),
            needs_another_iteration: reply.needs_another_iteration.unwrap_or(false),
        }),
        Err(error) => {
            warn!(%error, raw = %response, "Failed to parse refinement reply");
            unchanged_refinement(current_text)
        },
    }
}

/// Refinement fallback: keep the text, stop iterating
pub fn unchanged_refinement(current_text: &str) -> ParseOutcome<Refinement> {
    ParseOutcome::Fallback(Refinement {
        refined_content: current_text.to_string(),
        needs_another_iteration: false,
    })
}

/// Take a plain-text final email; empty replies are rejected
pub fn parse_final_email(response: &str) -> Option<String> {
    let trimmed = response.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
