//! Nested error detection in response payloads
//!
//! Engines that resolve fields independently often report partial failures
//! inside `data` rather than in the top-level `errors` list: a mapping carrying
//! an `"errors"` sequence or an `"error"` value somewhere deep in the tree.
//! The scanner walks an arbitrary decoded JSON value, finds those markers and
//! reports each one with the path where it was found.
//!
//! The walk is total over `serde_json::Value`: shapes that do not follow the
//! convention (an `"errors"` string, an `"error"` number, ...) are simply
//! descended into like any other value.

use std::fmt;

use serde_json::{Map, Value};

use crate::engine::GraphqlError;

/// One step from a value into one of its children
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Field(String),
    Index(usize),
}

/// Location of a value inside the payload
///
/// Renders as dot-joined field names with array indices in brackets, e.g.
/// `users[0].posts`. The empty path renders as `root`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(Vec<Segment>);

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    fn field(&self, name: &str) -> Self {
        self.child(Segment::Field(name.to_string()))
    }

    fn index(&self, index: usize) -> Self {
        self.child(Segment::Index(index))
    }

    fn child(&self, segment: Segment) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        Self(segments)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("root");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Field(name) if i == 0 => f.write_str(name)?,
                Segment::Field(name) => write!(f, ".{}", name)?,
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// An error marker found inside the payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Path of the mapping that carries the marker
    pub path: FieldPath,
    /// Rendered message, `Error at <path>...: <detail>`
    pub message: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Combine every error source for one query into an ordered message list
///
/// Order is fixed: the execution error first, then the engine's structured
/// errors as given, then findings from the payload in walk order.
pub fn scan(
    execution_error: Option<&str>,
    errors: Option<&[GraphqlError]>,
    data: Option<&Value>,
) -> Vec<String> {
    let mut messages = Vec::new();

    if let Some(err) = execution_error {
        messages.push(format!("Execution error: {}", err));
    }

    if let Some(errors) = errors {
        messages.extend(errors.iter().map(|e| e.message.clone()));
    }

    if let Some(data) = data {
        messages.extend(collect_findings(data).into_iter().map(|f| f.message));
    }

    messages
}

/// Decode a raw payload for scanning
///
/// Empty or undecodable input yields `None`: a payload that cannot be read has
/// no nested findings, and is not an error of its own.
pub fn decode_payload(raw: &[u8]) -> Option<Value> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    match serde_json::from_slice(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(error = %e, "Response payload is not valid JSON, skipping nested scan");
            None
        }
    }
}

/// Walk a value depth-first and collect every error marker
///
/// Mapping keys are visited in lexicographic order so the result is stable
/// across runs.
pub fn collect_findings(value: &Value) -> Vec<Finding> {
    let mut findings = Vec::new();
    walk(value, &FieldPath::root(), &mut findings);
    findings
}

fn walk(value: &Value, path: &FieldPath, findings: &mut Vec<Finding>) {
    match value {
        Value::Object(map) => {
            check_errors_list(map, path, findings);
            check_single_error(map, path, findings);

            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            for (key, child) in entries {
                walk(child, &path.field(key), findings);
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                walk(item, &path.index(i), findings);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}

/// `"errors": [...]`, one finding per element
fn check_errors_list(map: &Map<String, Value>, path: &FieldPath, findings: &mut Vec<Finding>) {
    let Some(Value::Array(errors)) = map.get("errors") else {
        return;
    };

    for (i, error) in errors.iter().enumerate() {
        let detail = match message_of(error) {
            Some(message) => message.to_string(),
            None => render_value(error),
        };
        findings.push(Finding {
            path: path.clone(),
            message: format!("Error at {}[{}]: {}", path, i, detail),
        });
    }
}

/// `"error": "..."` or `"error": {"message": "..."}`
///
/// Any other shape (numbers, booleans, mappings without a string message) is
/// not reported.
fn check_single_error(map: &Map<String, Value>, path: &FieldPath, findings: &mut Vec<Finding>) {
    let detail = match map.get("error") {
        Some(Value::String(s)) if !s.is_empty() => s.as_str(),
        Some(other) => match message_of(other) {
            Some(message) => message,
            None => return,
        },
        _ => return,
    };

    findings.push(Finding {
        path: path.clone(),
        message: format!("Error at {}: {}", path, detail),
    });
}

fn message_of(value: &Value) -> Option<&str> {
    value.as_object()?.get("message")?.as_str()
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
