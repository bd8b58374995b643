//! Interpretation of free-form model replies into invoice JSON.

use serde_json::Value;
use tracing::{debug, warn};

use super::Result;
use crate::error::InterpretError;

/// Outcome of interpreting a model reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Interpretation {
    /// The candidate parsed as JSON and was re-serialized.
    Normalized {
        /// Pretty-printed JSON, two-space indentation, keys in reply order.
        json: String,
        /// The parsed value.
        value: Value,
    },
    /// The candidate is not valid JSON; kept verbatim for display.
    Unparsed(String),
}

impl Interpretation {
    /// Text to show as the extracted JSON.
    pub fn json_text(&self) -> &str {
        match self {
            Self::Normalized { json, .. } => json,
            Self::Unparsed(raw) => raw,
        }
    }

    /// The parsed value, if the candidate was valid JSON.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Normalized { value, .. } => Some(value),
            Self::Unparsed(_) => None,
        }
    }

    /// Whether the candidate parsed.
    pub fn is_normalized(&self) -> bool {
        matches!(self, Self::Normalized { .. })
    }
}

/// Trait for strategies that recover invoice JSON from a model reply.
pub trait ResponseInterpreter {
    /// Interpret a raw completion.
    fn interpret(&self, response: &str) -> Result<Interpretation>;
}

/// Takes the span from the first `{` to the last `}` and parses it.
///
/// Models often wrap their JSON in prose or code fences despite being told
/// not to. Text outside the outermost braces is dropped; a span that does
/// not parse is passed through unchanged so it can still be shown.
#[derive(Debug, Clone, Copy, Default)]
pub struct BraceScanInterpreter;

impl BraceScanInterpreter {
    /// Create a new interpreter.
    pub fn new() -> Self {
        Self
    }
}

impl ResponseInterpreter for BraceScanInterpreter {
    fn interpret(&self, response: &str) -> Result<Interpretation> {
        let candidate = find_json_candidate(response).ok_or(InterpretError::NoJsonFound)?;

        match serde_json::from_str::<Value>(candidate) {
            Ok(value) => match serde_json::to_string_pretty(&value) {
                Ok(json) => {
                    debug!("Normalized {} chars of JSON from model reply", candidate.len());
                    Ok(Interpretation::Normalized { json, value })
                }
                Err(e) => {
                    warn!("Could not re-serialize parsed JSON: {}", e);
                    Ok(Interpretation::Unparsed(candidate.to_string()))
                }
            },
            Err(e) => {
                warn!("Model reply is not valid JSON ({}), keeping raw candidate", e);
                Ok(Interpretation::Unparsed(candidate.to_string()))
            }
        }
    }
}

/// Interpret a reply with [`BraceScanInterpreter`].
pub fn interpret(response: &str) -> Result<Interpretation> {
    BraceScanInterpreter::new().interpret(response)
}

/// Inclusive span between the first `{` and the last `}`, if the last
/// closing brace comes after the first opening one.
pub fn find_json_candidate(response: &str) -> Option<&str> {
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    (end > start).then(|| &response[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::{InvoiceField, InvoiceRecord};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_extracts_object_from_prose() {
        let result = interpret("Sure! {\"Invoice Number\":\"A1\"} thanks").unwrap();
        assert_eq!(result.json_text(), "{\n  \"Invoice Number\": \"A1\"\n}");
        assert_eq!(result.value(), Some(&json!({ "Invoice Number": "A1" })));
    }

    #[test]
    fn test_keeps_reply_key_order() {
        let reply = r#"```json
{"Tax": "5", "Invoice Number": "B-2", "Customer Name": "Zoë GmbH"}
```"#;
        let result = interpret(reply).unwrap();
        assert_eq!(
            result.json_text(),
            "{\n  \"Tax\": \"5\",\n  \"Invoice Number\": \"B-2\",\n  \"Customer Name\": \"Zoë GmbH\"\n}"
        );
    }

    #[test]
    fn test_nested_braces_use_outermost_span() {
        let reply = "Result: {\"a\": {\"b\": 1}} done } trailing";
        assert_eq!(find_json_candidate(reply), Some("{\"a\": {\"b\": 1}} done }"));
        assert!(matches!(interpret(reply).unwrap(), Interpretation::Unparsed(_)));
    }

    #[test]
    fn test_invalid_json_returns_raw_candidate() {
        let result = interpret("here: {invoice: A1} ok").unwrap();
        assert_eq!(result, Interpretation::Unparsed("{invoice: A1}".to_string()));
        assert!(result.value().is_none());
        assert!(!result.is_normalized());
    }

    #[test]
    fn test_no_braces_is_no_json_found() {
        for reply in ["", "no json here", "only open {", "only close }", "} backwards {"] {
            assert_eq!(interpret(reply), Err(InterpretError::NoJsonFound), "reply: {:?}", reply);
        }
    }

    #[test]
    fn test_empty_object() {
        let result = interpret("{}").unwrap();
        assert_eq!(result.json_text(), "{}");
        assert!(result.is_normalized());
    }

    #[test]
    fn test_large_numbers_keep_their_digits() {
        let result = interpret(r#"{"Invoice Number": 123456789012345678901234, "Total Amount": 1200.50}"#)
            .unwrap();
        assert_eq!(
            result.json_text(),
            "{\n  \"Invoice Number\": 123456789012345678901234,\n  \"Total Amount\": 1200.50\n}"
        );

        let record = InvoiceRecord::from_json(result.value().unwrap()).unwrap();
        assert_eq!(
            record.get(InvoiceField::InvoiceNumber),
            Some("123456789012345678901234")
        );
    }

    #[test]
    fn test_interpreter_does_not_add_missing_fields() {
        let result = interpret("{\"Invoice Number\": \"A1\", \"Total Amount\": 12.5}").unwrap();
        let object = result.value().unwrap().as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert!(!object.contains_key("Tax"));
    }
}
