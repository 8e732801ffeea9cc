//! Structured response decoding.
//!
//! Turns the raw text a provider returned into a [`BrandResult`]. Anything
//! that is not a JSON object with the expected field types is rejected; no
//! name is ever guessed from prose.

use serde::Deserialize;

use crate::error::DecodeError;
use crate::types::BrandResult;

/// Wire shape of the model answer.
#[derive(Debug, Deserialize)]
struct BrandPayload {
    #[serde(default, alias = "company_name")]
    brand_name: Option<String>,
    #[serde(default)]
    is_confident: Option<bool>,
    #[serde(default)]
    reasoning: Option<String>,
}

/// Decode a provider payload into a [`BrandResult`].
///
/// The payload may be a bare JSON object or text wrapping exactly one object
/// (markdown fences, a leading sentence). When `is_confident` is absent the
/// answer counts as unrecognized regardless of `brand_name`.
pub fn decode_brand(raw: &str) -> Result<BrandResult, DecodeError> {
    let value = parse_json(raw)?;
    if !value.is_object() {
        return Err(DecodeError::InvalidShape(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    }

    let payload: BrandPayload =
        serde_json::from_value(value).map_err(|e| DecodeError::InvalidShape(e.to_string()))?;

    let reasoning = payload
        .reasoning
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());

    let Some(is_confident) = payload.is_confident else {
        tracing::debug!("Response has no is_confident field; treating as unrecognized");
        return Ok(BrandResult {
            reasoning,
            ..BrandResult::unrecognized()
        });
    };

    Ok(BrandResult {
        brand_name: payload.brand_name.unwrap_or_default().trim().to_string(),
        is_confident,
        reasoning,
    })
}

/// Parse the whole payload, or failing that the outermost `{...}` span in it.
fn parse_json(raw: &str) -> Result<serde_json::Value, DecodeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DecodeError::NotJson("empty payload".to_string()));
    }

    let whole_err = match serde_json::from_str(trimmed) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    let span = match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => return Err(DecodeError::NotJson(format!("{whole_err} in {:?}", preview(trimmed)))),
    };

    serde_json::from_str(span)
        .map_err(|e| DecodeError::NotJson(format!("{e} in {:?}", preview(trimmed))))
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// First 80 characters, for error messages.
fn preview(text: &str) -> String {
    text.chars().take(80).collect()
}
