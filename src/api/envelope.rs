use serde_json::Value;

// ---------------------------------------------------------------------------
// Error envelope
//
// The backend answers failures with one of three JSON shapes:
//
//   { "message": "Sensor não encontrado" }
//   { "title": "One or more validation errors occurred.", ... }
//   { "errors": { "Temperatura": ["must be <= 100"], "SensorId": ["..."] } }
//
// ASP.NET problem details carry both `title` and `errors`; `title` wins.
// Anything else is `Unrecognized` and the message falls back to the status
// line.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorEnvelope {
    Message(String),
    Title(String),
    /// Flattened field messages, in body order.
    FieldErrors(Vec<String>),
    Unrecognized,
}

impl ErrorEnvelope {
    /// Classify a raw error body. Unparsable or empty bodies are `Unrecognized`.
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => Self::from_value(&value),
            Err(_) => Self::Unrecognized,
        }
    }

    pub fn from_value(value: &Value) -> Self {
        match (
            non_empty_str(value.get("message")),
            non_empty_str(value.get("title")),
            value.get("errors"),
        ) {
            (Some(message), _, _) => Self::Message(message.to_owned()),
            (None, Some(title), _) => Self::Title(title.to_owned()),
            (None, None, Some(errors)) => match flatten_field_errors(errors) {
                Some(messages) => Self::FieldErrors(messages),
                None => Self::Unrecognized,
            },
            (None, None, None) => Self::Unrecognized,
        }
    }

    /// The single user-facing message for a failed call.
    pub fn into_message(self, status: u16, status_text: &str) -> String {
        match self {
            Self::Message(message) | Self::Title(message) => message,
            Self::FieldErrors(messages) => messages.join(", "),
            Self::Unrecognized => format!("Erro {status}: {status_text}"),
        }
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// `{ field: [msg, ...] }` → `[msg, ...]`. A bare string value counts as a
/// one-element list, and a top-level array is read like the object's values.
/// Returns `None` when nothing usable is found.
fn flatten_field_errors(errors: &Value) -> Option<Vec<String>> {
    let entries: Vec<&Value> = match errors {
        Value::Object(fields) => fields.values().collect(),
        Value::Array(items) => items.iter().collect(),
        _ => return None,
    };

    let messages: Vec<String> = entries
        .into_iter()
        .flat_map(|entry| match entry {
            Value::Array(items) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_owned))
                .collect::<Vec<_>>(),
            Value::String(s) => vec![s.clone()],
            _ => Vec::new(),
        })
        .collect();

    if messages.is_empty() {
        None
    } else {
        Some(messages)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn message_for(body: &str) -> String {
        ErrorEnvelope::from_body(body.as_bytes()).into_message(400, "Bad Request")
    }

    #[test]
    fn message_field_wins_over_everything() {
        let body = json!({
            "message": "Sensor não encontrado",
            "title": "Not Found",
            "errors": { "x": ["y"] }
        })
        .to_string();
        assert_eq!(message_for(&body), "Sensor não encontrado");
    }

    #[test]
    fn title_wins_over_errors() {
        let body = json!({
            "title": "One or more validation errors occurred.",
            "errors": { "Nome": ["required"] }
        })
        .to_string();
        assert_eq!(message_for(&body), "One or more validation errors occurred.");
    }

    #[test]
    fn errors_are_flattened_in_body_order() {
        let body = json!({
            "errors": {
                "Temperatura": ["must be <= 100", "must be a number"],
                "DataHora": ["required"]
            }
        })
        .to_string();
        assert_eq!(
            ErrorEnvelope::from_body(body.as_bytes()),
            ErrorEnvelope::FieldErrors(vec![
                "must be <= 100".to_owned(),
                "must be a number".to_owned(),
                "required".to_owned(),
            ])
        );
        assert_eq!(message_for(&body), "must be <= 100, must be a number, required");
    }

    #[test]
    fn errors_given_as_a_list_are_joined() {
        let body = r#"{"errors":["Sensor inexistente","Data no futuro"]}"#;
        assert_eq!(message_for(body), "Sensor inexistente, Data no futuro");
        assert_eq!(message_for(r#"{"errors":[]}"#), "Erro 400: Bad Request");
    }

    #[test]
    fn single_field_error_is_returned_verbatim() {
        let body = r#"{"errors":{"temperatura":["must be <= 100"]}}"#;
        assert_eq!(message_for(body), "must be <= 100");
    }

    #[test]
    fn empty_message_falls_through_to_title() {
        let body = r#"{"message":"","title":"Conflict"}"#;
        assert_eq!(message_for(body), "Conflict");
    }

    #[test]
    fn unparsable_body_uses_status_line() {
        assert_eq!(message_for("<html>oops</html>"), "Erro 400: Bad Request");
        assert_eq!(message_for(""), "Erro 400: Bad Request");
    }

    #[test]
    fn unknown_shape_uses_status_line() {
        assert_eq!(message_for(r#"{"detail":"nope"}"#), "Erro 400: Bad Request");
        assert_eq!(message_for(r#"{"errors":{}}"#), "Erro 400: Bad Request");
        assert_eq!(message_for(r#"["a","b"]"#), "Erro 400: Bad Request");
    }
}
