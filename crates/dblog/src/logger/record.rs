use serde_json::Value as JsonValue;
use tracing::Level;

/// State key names carried by every record.
///
/// Log formatters depend on these names; they are part of the public contract.
pub mod keys {
    /// Elapsed milliseconds of the delegated call.
    pub const ELAPSED: &str = "elapsed";
    /// The caller-supplied context.
    pub const CONTEXT: &str = "@context";
    /// Output of the configured connection projector.
    pub const CONNECTION: &str = "@connection";
    /// SQL text of an executed command.
    pub const QUERY: &str = "query";
    /// Rendered parameter list of an executed command.
    pub const PARAMS: &str = "params";
    /// The unrendered message template.
    pub const ORIGINAL_FORMAT: &str = "{OriginalFormat}";
}

/// One structured log event.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub level: Level,
    /// Category of the logger that produced the record.
    pub category: String,
    /// The message with template holes filled in.
    pub message: String,
    /// Ordered state, always ending with [`keys::ORIGINAL_FORMAT`].
    pub state: Vec<(&'static str, JsonValue)>,
}

impl LogRecord {
    /// Build a record, rendering `template` against `state`.
    pub fn new(
        level: Level,
        category: impl Into<String>,
        template: &str,
        mut state: Vec<(&'static str, JsonValue)>,
    ) -> Self {
        let message = super::render(template, &state);
        state.push((keys::ORIGINAL_FORMAT, JsonValue::String(template.to_string())));
        Self {
            level,
            category: category.into(),
            message,
            state,
        }
    }

    /// Look up a state value by key.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.state.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// The unrendered template.
    pub fn template(&self) -> &str {
        self.get(keys::ORIGINAL_FORMAT)
            .and_then(JsonValue::as_str)
            .unwrap_or_default()
    }

    /// State as a JSON object.
    pub fn state_json(&self) -> JsonValue {
        JsonValue::Object(
            self.state
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
        )
    }
}
