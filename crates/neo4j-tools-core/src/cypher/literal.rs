use serde_json::{Map as JsonMap, Value as JsonValue};

use super::ValueBinding;

/// Render a JSON value as a Cypher literal.
///
/// Strings are single-quoted with `\` and `'` escaped; numbers and booleans are
/// written as-is; lists and maps are rendered recursively.
pub fn format_literal(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "null".to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => format!("'{}'", escape_string(s)),
        JsonValue::Array(items) => format!(
            "[{}]",
            items.iter().map(format_literal).collect::<Vec<_>>().join(", ")
        ),
        JsonValue::Object(map) => format!(
            "{{{}}}",
            map.iter()
                .map(|(k, v)| format!("{}: {}", k, format_literal(v)))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

fn escape_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            _ => out.push(c),
        }
    }
    out
}

/// Writes property values into a statement, either inline or as numbered parameters.
///
/// One renderer is used per statement so parameter names stay unique.
#[derive(Debug)]
pub(crate) struct ValueRenderer {
    binding: ValueBinding,
    params: JsonMap<String, JsonValue>,
}

impl ValueRenderer {
    pub(crate) fn new(binding: ValueBinding) -> Self {
        Self {
            binding,
            params: JsonMap::new(),
        }
    }

    pub(crate) fn value(&mut self, value: &JsonValue) -> String {
        match self.binding {
            ValueBinding::Inline => format_literal(value),
            ValueBinding::Parameters => {
                let name = format!("p{}", self.params.len());
                self.params.insert(name.clone(), value.clone());
                format!("${}", name)
            }
        }
    }

    /// `key: value` pairs joined by `, `, without the surrounding braces
    pub(crate) fn properties(&mut self, map: &JsonMap<String, JsonValue>) -> String {
        map.iter()
            .map(|(k, v)| format!("{}: {}", k, self.value(v)))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub(crate) fn into_params(self) -> JsonMap<String, JsonValue> {
        self.params
    }
}
