use crate::models::GeneratedPayload;
use anyhow::{Result, anyhow, bail};
use regex::Regex;
use serde_json::Value;

// Fenced region, optionally annotated "json". Models routinely wrap their
// JSON in one of these with prose around it.
const FENCE_PATTERN: &str = r"(?s)```(?:json)?\s*(.*?)```";

/// Recover a JSON value from raw model output.
///
/// A fenced code block takes precedence; failing that, the whole response
/// is parsed directly. Both failing is a parse failure.
pub fn extract_candidate(raw: &str) -> Result<Value> {
    if let Some(inner) = fenced_block(raw) {
        if let Ok(value) = serde_json::from_str(&inner) {
            return Ok(value);
        }
        tracing::debug!("fenced block was not valid JSON, trying the whole response");
    }

    serde_json::from_str(raw.trim()).map_err(|e| anyhow!("response is not valid JSON: {}", e))
}

fn fenced_block(raw: &str) -> Option<String> {
    let fence = Regex::new(FENCE_PATTERN).ok()?;
    fence
        .captures(raw)
        .map(|caps| caps[1].trim().to_string())
}

/// Check a candidate value against the payload schema.
///
/// Accepted only as an object whose `blocks` field is a non-empty array of
/// well-formed blocks. Anything else is an error so the caller degrades to
/// the fallback payload, never to a partially populated one.
pub fn validate_payload(candidate: Value) -> Result<GeneratedPayload> {
    if !candidate.get("blocks").is_some_and(Value::is_array) {
        bail!("response has no blocks array");
    }

    let payload: GeneratedPayload = serde_json::from_value(candidate)
        .map_err(|e| anyhow!("blocks do not match the content schema: {}", e))?;

    if payload.blocks.is_empty() {
        bail!("response contained an empty blocks array");
    }

    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BlockType;

    #[test]
    fn fenced_block_beats_whole_text_parse() {
        let raw = "Here is the slide content you asked for:\n\n```json\n{\"blocks\": [{\"type\": \"title\", \"content\": \"Q3 Results\"}]}\n```\n\nLet me know if you want changes!";
        let value = extract_candidate(raw).unwrap();
        assert_eq!(value["blocks"][0]["content"], "Q3 Results");
    }

    #[test]
    fn fence_without_language_tag_is_extracted() {
        let raw = "```\n{\"blocks\": [{\"type\": \"text\", \"content\": \"hi\"}]}\n```";
        let value = extract_candidate(raw).unwrap();
        assert_eq!(value["blocks"][0]["type"], "text");
    }

    #[test]
    fn bare_json_parses_without_a_fence() {
        let raw = "  {\"blocks\": [{\"type\": \"bullet\", \"content\": \"point one\"}]}  ";
        let value = extract_candidate(raw).unwrap();
        assert_eq!(value["blocks"][0]["type"], "bullet");
    }

    #[test]
    fn plain_prose_is_a_parse_failure() {
        let raw = "Sure! The slide should cover the company history and key milestones.";
        assert!(extract_candidate(raw).is_err());
    }

    #[test]
    fn well_formed_candidate_is_accepted() {
        let candidate = serde_json::json!({
            "blocks": [
                {"type": "title", "content": "Roadmap"},
                {"type": "chart", "content": "Revenue", "data": {"series": [1, 2, 3]}}
            ],
            "notes": "keep it short"
        });

        let payload = validate_payload(candidate).unwrap();
        assert_eq!(payload.blocks.len(), 2);
        assert_eq!(payload.blocks[0].block_type, BlockType::Title);
        assert!(payload.blocks[1].data.is_some());
        assert_eq!(payload.notes.as_deref(), Some("keep it short"));
    }

    #[test]
    fn missing_blocks_field_is_rejected() {
        let candidate = serde_json::json!({"content": "not a payload"});
        assert!(validate_payload(candidate).is_err());
    }

    #[test]
    fn blocks_that_are_not_an_array_are_rejected() {
        let candidate = serde_json::json!({"blocks": "oops"});
        assert!(validate_payload(candidate).is_err());
    }

    #[test]
    fn empty_blocks_array_is_rejected() {
        let candidate = serde_json::json!({"blocks": []});
        assert!(validate_payload(candidate).is_err());
    }

    #[test]
    fn unknown_block_type_is_rejected() {
        let candidate = serde_json::json!({
            "blocks": [{"type": "hologram", "content": "nope"}]
        });
        assert!(validate_payload(candidate).is_err());
    }
}
