use regex::Regex;
use serde_json::Value;

use crate::schema::Prediction;

const EXPLANATION_CHAR_LIMIT: usize = 100;

/// Best-effort extraction of a star-rating prediction from raw model output.
///
/// Three stages, strictest first, each failing independently into the next:
/// a full JSON parse of the fence-stripped text, a scan for a flat JSON
/// object carrying `predicted_stars`, and finally a direct match on the
/// digit itself. Every stage enforces the 1..=5 range; a garbled rating is
/// a stage failure, never a clamped value.
pub fn parse_prediction(response: &str) -> Option<Prediction> {
    if response.is_empty() {
        return None;
    }

    stage_strict(response)
        .or_else(|| stage_object_scan(response))
        .or_else(|| stage_digit_rescue(response))
}

/// Stage 1: strip markdown fences and parse the whole text as JSON.
fn stage_strict(response: &str) -> Option<Prediction> {
    let cleaned = response.replace("```json", "").replace("```", "");
    let data: Value = serde_json::from_str(cleaned.trim()).ok()?;

    let stars = coerce_stars(data.get("predicted_stars")?)?;
    let explanation = explanation_text(&data, "No explanation");

    Some(Prediction {
        predicted_stars: stars,
        explanation,
    })
}

/// Stage 2: find the first brace-delimited object mentioning the key and
/// parse just that slice. The pattern rejects nested braces, so a response
/// whose object contains a nested object or array falls through to stage 3.
fn stage_object_scan(response: &str) -> Option<Prediction> {
    let object_re = Regex::new(r#"\{[^{}]*"predicted_stars"[^}]*\}"#).unwrap();
    let candidate = object_re
        .find(response)?
        .as_str()
        .replace('\n', " ")
        .replace("  ", " ");

    let data: Value = serde_json::from_str(&candidate).ok()?;

    let stars = coerce_stars(data.get("predicted_stars")?)?;
    let explanation = explanation_text(&data, "");

    Some(Prediction {
        predicted_stars: stars,
        explanation,
    })
}

/// Stage 3: no JSON parse at all, just pull the digit and, if present, the
/// quoted explanation straight out of the text.
fn stage_digit_rescue(response: &str) -> Option<Prediction> {
    let stars_re = Regex::new(r#""predicted_stars"\s*:\s*([1-5])"#).unwrap();
    let stars: u8 = stars_re.captures(response)?[1].parse().ok()?;

    let explanation_re = Regex::new(r#""explanation"\s*:\s*"([^"]*)""#).unwrap();
    let explanation = explanation_re
        .captures(response)
        .map(|captures| captures[1].to_string())
        .unwrap_or_else(|| "Extracted from response".to_string());

    Some(Prediction {
        predicted_stars: stars,
        explanation: truncate_chars(&explanation, EXPLANATION_CHAR_LIMIT),
    })
}

/// Coerce a JSON value into a star rating. Integers, floats (truncated) and
/// numeric strings are accepted; anything outside 1..=5 is rejected.
fn coerce_stars(value: &Value) -> Option<u8> {
    let stars = match value {
        Value::Number(number) => {
            if let Some(integer) = number.as_i64() {
                integer
            } else {
                number.as_f64()?.trunc() as i64
            }
        }
        Value::String(text) => text.trim().parse::<i64>().ok()?,
        _ => return None,
    };

    (1..=5).contains(&stars).then_some(stars as u8)
}

fn explanation_text(data: &Value, missing: &str) -> String {
    let explanation = match data.get("explanation") {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => missing.to_string(),
    };
    truncate_chars(&explanation, EXPLANATION_CHAR_LIMIT)
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
