//! Text clean-up applied to model output and forwarded upstream bodies.

use serde_json::Value;

/// Markers removed from free-text analysis output.
pub const HTML_FENCES: &[&str] = &["```html", "```"];

/// Markers removed from structured JSON output.
pub const JSON_FENCES: &[&str] = &["```json", "```"];

const REDACTED: &str = "[REDACTED]";

/// Remove every occurrence of the given fence markers.
///
/// Scans left to right; at each position the first marker in `markers` that
/// matches is dropped. Markers are not paired, so a stray fence in the middle
/// of prose is removed as well.
pub fn strip_fences(text: &str, markers: &[&str]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    'scan: while !rest.is_empty() {
        for marker in markers {
            if !marker.is_empty() && rest.starts_with(marker) {
                rest = &rest[marker.len()..];
                continue 'scan;
            }
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }

    out
}

/// Replace every occurrence of `secret` in string values and object keys.
pub fn redact_secret(value: Value, secret: &str) -> Value {
    if secret.is_empty() {
        return value;
    }

    match value {
        Value::String(s) => Value::String(redact_str(&s, secret)),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| redact_secret(item, secret))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (redact_str(&k, secret), redact_secret(v, secret)))
                .collect(),
        ),
        other => other,
    }
}

fn redact_str(s: &str, secret: &str) -> String {
    if s.contains(secret) {
        s.replace(secret, REDACTED)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_html_fences() {
        assert_eq!(
            strip_fences("```html<b>Buy</b>```", HTML_FENCES),
            "<b>Buy</b>"
        );
    }

    #[test]
    fn strips_every_occurrence_regardless_of_pairing() {
        assert_eq!(
            strip_fences("a```b```html c ``` d```", HTML_FENCES),
            "ab c  d"
        );
    }

    #[test]
    fn leaves_text_without_markers_untouched() {
        let text = "Sharpe ratio looks <i>fine</i>, keep 20/50 MA";
        assert_eq!(strip_fences(text, HTML_FENCES), text);
    }

    #[test]
    fn first_marker_wins_at_each_position() {
        // Four backticks: the bare fence matches first, leaving "`html".
        assert_eq!(strip_fences("````html", HTML_FENCES), "`html");
        assert_eq!(strip_fences("``````html", HTML_FENCES), "");
    }

    #[test]
    fn json_fences_keep_newlines_for_caller_to_trim() {
        assert_eq!(
            strip_fences("```json\n{\"a\":1}\n```", JSON_FENCES),
            "\n{\"a\":1}\n"
        );
    }

    #[test]
    fn handles_multibyte_text() {
        assert_eq!(strip_fences("```html→ 買い ```", HTML_FENCES), "→ 買い ");
    }

    #[test]
    fn redacts_nested_strings_and_keys() {
        let body = json!({
            "error": {
                "message": "API key sk-123 not valid",
                "details": [{ "reason": "sk-123" }, 7, null],
                "sk-123": true
            }
        });

        let redacted = redact_secret(body, "sk-123");
        assert!(!redacted.to_string().contains("sk-123"));
        assert_eq!(
            redacted["error"]["message"],
            "API key [REDACTED] not valid"
        );
        assert_eq!(redacted["error"]["details"][1], 7);
        assert_eq!(redacted["error"]["[REDACTED]"], true);
    }

    #[test]
    fn empty_secret_is_a_no_op() {
        let body = json!({ "message": "hello" });
        assert_eq!(redact_secret(body.clone(), ""), body);
    }
}
