//! Push-based JSON token writer.
//!
//! [`JsonTokenWriter`] accepts tokens one at a time, checks that they form a
//! well-nested document, and assembles a [`serde_json::Value`].  It also keeps
//! the emitted token sequence so tests can compare token streams directly.
//!
//! A call that would break the document structure (a value inside an object
//! without a property name, an end token that does not match, a second
//! top-level value) is rejected with a [`TokenError`] and leaves the writer
//! unchanged.

use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::error::TokenError;
use crate::token::{flatten, JsonToken, TokenKind};

/// An open container on the writer stack.
#[derive(Debug)]
enum Frame {
    Object {
        members: Map<String, Value>,
        pending_name: Option<String>,
    },
    Array(Vec<Value>),
}

/// Builds a JSON document from a sequence of write calls.
#[derive(Debug, Default)]
pub struct JsonTokenWriter {
    tokens: Vec<JsonToken>,
    stack: Vec<Frame>,
    root: Option<Value>,
}

impl JsonTokenWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The tokens written so far.
    pub fn tokens(&self) -> &[JsonToken] {
        &self.tokens
    }

    /// Returns `true` once a complete top-level value has been written.
    pub fn is_complete(&self) -> bool {
        self.stack.is_empty() && self.root.is_some()
    }

    /// Returns the finished document.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Incomplete`] if nothing was written or a
    /// container is still open.
    pub fn into_value(self) -> Result<Value, TokenError> {
        if !self.is_complete() {
            return Err(TokenError::Incomplete);
        }
        self.root.ok_or(TokenError::Incomplete)
    }

    /// Returns the finished document as compact JSON text.
    pub fn into_string(self) -> Result<String, TokenError> {
        self.into_value().map(|value| value.to_string())
    }

    /// Returns the finished document as indented JSON text.
    pub fn into_pretty_string(self) -> Result<String, TokenError> {
        self.into_value().map(|value| format!("{value:#}"))
    }

    // ── Placement checks ──────────────────────────────────────────────────────

    /// Verifies that a value may be written at the current position.
    fn check_value_slot(&self) -> Result<(), TokenError> {
        match self.stack.last() {
            None if self.root.is_some() => Err(TokenError::DocumentComplete),
            None => Ok(()),
            Some(Frame::Object {
                pending_name: None, ..
            }) => Err(TokenError::MissingPropertyName),
            Some(_) => Ok(()),
        }
    }

    /// Stores a finished value in the innermost container or as the root.
    fn place(&mut self, value: Value) {
        match self.stack.last_mut() {
            None => self.root = Some(value),
            Some(Frame::Array(items)) => items.push(value),
            Some(Frame::Object {
                members,
                pending_name,
            }) => {
                if let Some(name) = pending_name.take() {
                    members.insert(name, value);
                }
            }
        }
    }

    fn write_scalar(&mut self, value: Value, token: JsonToken) -> Result<(), TokenError> {
        self.check_value_slot()?;
        self.place(value);
        self.tokens.push(token);
        Ok(())
    }

    // ── Containers ────────────────────────────────────────────────────────────

    pub fn write_start_object(&mut self) -> Result<(), TokenError> {
        self.check_value_slot()?;
        self.stack.push(Frame::Object {
            members: Map::new(),
            pending_name: None,
        });
        self.tokens.push(JsonToken::StartObject);
        Ok(())
    }

    pub fn write_end_object(&mut self) -> Result<(), TokenError> {
        match self.stack.last() {
            Some(Frame::Object {
                pending_name: Some(_),
                ..
            }) => return Err(TokenError::Incomplete),
            Some(Frame::Object { .. }) => {}
            _ => return Err(TokenError::UnbalancedEnd(TokenKind::EndObject)),
        }
        if let Some(Frame::Object { members, .. }) = self.stack.pop() {
            self.place(Value::Object(members));
        }
        self.tokens.push(JsonToken::EndObject);
        Ok(())
    }

    pub fn write_start_array(&mut self) -> Result<(), TokenError> {
        self.check_value_slot()?;
        self.stack.push(Frame::Array(Vec::new()));
        self.tokens.push(JsonToken::StartArray);
        Ok(())
    }

    pub fn write_end_array(&mut self) -> Result<(), TokenError> {
        if !matches!(self.stack.last(), Some(Frame::Array(_))) {
            return Err(TokenError::UnbalancedEnd(TokenKind::EndArray));
        }
        if let Some(Frame::Array(items)) = self.stack.pop() {
            self.place(Value::Array(items));
        }
        self.tokens.push(JsonToken::EndArray);
        Ok(())
    }

    /// Writes the name of the next property of the innermost object.
    pub fn write_property_name(&mut self, name: &str) -> Result<(), TokenError> {
        match self.stack.last_mut() {
            Some(Frame::Object { pending_name, .. }) if pending_name.is_none() => {
                *pending_name = Some(name.to_string());
                self.tokens.push(JsonToken::PropertyName(name.to_string()));
                Ok(())
            }
            _ => Err(TokenError::UnexpectedPropertyName),
        }
    }

    // ── Scalars ───────────────────────────────────────────────────────────────

    pub fn write_string(&mut self, value: &str) -> Result<(), TokenError> {
        self.write_scalar(
            Value::String(value.to_string()),
            JsonToken::String(value.to_string()),
        )
    }

    pub fn write_bool(&mut self, value: bool) -> Result<(), TokenError> {
        self.write_scalar(Value::Bool(value), JsonToken::Bool(value))
    }

    pub fn write_null(&mut self) -> Result<(), TokenError> {
        self.write_scalar(Value::Null, JsonToken::Null)
    }

    pub fn write_number(&mut self, value: Number) -> Result<(), TokenError> {
        self.write_scalar(Value::Number(value.clone()), JsonToken::Number(value))
    }

    pub fn write_i64(&mut self, value: i64) -> Result<(), TokenError> {
        self.write_number(Number::from(value))
    }

    pub fn write_u64(&mut self, value: u64) -> Result<(), TokenError> {
        self.write_number(Number::from(value))
    }

    /// Writes a floating-point number.  NaN and infinities are rejected.
    pub fn write_f64(&mut self, value: f64) -> Result<(), TokenError> {
        let number = Number::from_f64(value).ok_or(TokenError::NonFiniteNumber(value))?;
        self.write_number(number)
    }

    /// Writes an entire value, emitting the tokens of any nested structure.
    pub fn write_value(&mut self, value: &Value) -> Result<(), TokenError> {
        self.check_value_slot()?;
        self.place(value.clone());
        flatten(value, &mut self.tokens);
        Ok(())
    }

    /// Serializes `value` with serde and writes the result.
    pub fn serialize<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), TokenError> {
        let value = serde_json::to_value(value).map_err(|e| TokenError::Serialize(e.to_string()))?;
        self.write_value(&value)
    }

    // ── Property shortcuts ────────────────────────────────────────────────────

    pub fn write_string_property(&mut self, name: &str, value: &str) -> Result<(), TokenError> {
        self.write_property_name(name)?;
        self.write_string(value)
    }

    pub fn write_bool_property(&mut self, name: &str, value: bool) -> Result<(), TokenError> {
        self.write_property_name(name)?;
        self.write_bool(value)
    }

    pub fn write_i64_property(&mut self, name: &str, value: i64) -> Result<(), TokenError> {
        self.write_property_name(name)?;
        self.write_i64(value)
    }

    pub fn write_u64_property(&mut self, name: &str, value: u64) -> Result<(), TokenError> {
        self.write_property_name(name)?;
        self.write_u64(value)
    }

    pub fn write_f64_property(&mut self, name: &str, value: f64) -> Result<(), TokenError> {
        self.write_property_name(name)?;
        self.write_f64(value)
    }

    pub fn write_null_property(&mut self, name: &str) -> Result<(), TokenError> {
        self.write_property_name(name)?;
        self.write_null()
    }

    pub fn write_value_property(&mut self, name: &str, value: &Value) -> Result<(), TokenError> {
        self.write_property_name(name)?;
        self.write_value(value)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_writer_builds_nested_document() {
        // Arrange
        let mut w = JsonTokenWriter::new();

        // Act
        w.write_start_object().unwrap();
        w.write_string_property("name", "Alice").unwrap();
        w.write_property_name("tags").unwrap();
        w.write_start_array().unwrap();
        w.write_i64(1).unwrap();
        w.write_null().unwrap();
        w.write_end_array().unwrap();
        w.write_end_object().unwrap();

        // Assert
        assert!(w.is_complete());
        assert_eq!(
            w.into_value().unwrap(),
            json!({"name": "Alice", "tags": [1, null]})
        );
    }

    #[test]
    fn test_writer_records_tokens_in_order() {
        let mut w = JsonTokenWriter::new();
        w.write_start_object().unwrap();
        w.write_bool_property("on", true).unwrap();
        w.write_end_object().unwrap();

        assert_eq!(
            w.tokens(),
            &[
                JsonToken::StartObject,
                JsonToken::PropertyName("on".to_string()),
                JsonToken::Bool(true),
                JsonToken::EndObject,
            ]
        );
    }

    #[test]
    fn test_value_inside_object_requires_property_name() {
        let mut w = JsonTokenWriter::new();
        w.write_start_object().unwrap();
        assert_eq!(w.write_bool(true), Err(TokenError::MissingPropertyName));
        // The rejected call left no trace.
        assert_eq!(w.tokens().len(), 1);
    }

    #[test]
    fn test_property_name_outside_object_is_rejected() {
        let mut w = JsonTokenWriter::new();
        assert_eq!(
            w.write_property_name("a"),
            Err(TokenError::UnexpectedPropertyName)
        );
        w.write_start_array().unwrap();
        assert_eq!(
            w.write_property_name("a"),
            Err(TokenError::UnexpectedPropertyName)
        );
    }

    #[test]
    fn test_two_property_names_in_a_row_are_rejected() {
        let mut w = JsonTokenWriter::new();
        w.write_start_object().unwrap();
        w.write_property_name("a").unwrap();
        assert_eq!(
            w.write_property_name("b"),
            Err(TokenError::UnexpectedPropertyName)
        );
    }

    #[test]
    fn test_mismatched_end_is_rejected() {
        let mut w = JsonTokenWriter::new();
        w.write_start_array().unwrap();
        assert_eq!(
            w.write_end_object(),
            Err(TokenError::UnbalancedEnd(TokenKind::EndObject))
        );
    }

    #[test]
    fn test_end_object_with_dangling_name_is_rejected() {
        let mut w = JsonTokenWriter::new();
        w.write_start_object().unwrap();
        w.write_property_name("a").unwrap();
        assert_eq!(w.write_end_object(), Err(TokenError::Incomplete));
    }

    #[test]
    fn test_second_top_level_value_is_rejected() {
        let mut w = JsonTokenWriter::new();
        w.write_u64(1).unwrap();
        assert_eq!(w.write_u64(2), Err(TokenError::DocumentComplete));
    }

    #[test]
    fn test_into_value_fails_while_container_open() {
        let mut w = JsonTokenWriter::new();
        w.write_start_object().unwrap();
        assert_eq!(w.into_value(), Err(TokenError::Incomplete));
        assert_eq!(JsonTokenWriter::new().into_value(), Err(TokenError::Incomplete));
    }

    #[test]
    fn test_write_f64_rejects_nan() {
        let mut w = JsonTokenWriter::new();
        assert!(matches!(
            w.write_f64(f64::NAN),
            Err(TokenError::NonFiniteNumber(_))
        ));
    }

    #[test]
    fn test_write_value_emits_nested_tokens() {
        let mut w = JsonTokenWriter::new();
        w.write_start_object().unwrap();
        w.write_value_property("inner", &json!({"x": [1]})).unwrap();
        w.write_end_object().unwrap();

        assert_eq!(w.tokens().len(), 9);
        assert_eq!(w.into_value().unwrap(), json!({"inner": {"x": [1]}}));
    }

    #[test]
    fn test_serialize_writes_serde_value() {
        #[derive(Serialize)]
        struct Point {
            x: i32,
            y: i32,
        }

        let mut w = JsonTokenWriter::new();
        w.serialize(&Point { x: 1, y: 2 }).unwrap();
        assert_eq!(w.into_string().unwrap(), r#"{"x":1,"y":2}"#);
    }

    #[test]
    fn test_into_pretty_string_indents_output() {
        let mut w = JsonTokenWriter::new();
        w.write_start_object().unwrap();
        w.write_u64_property("a", 1).unwrap();
        w.write_end_object().unwrap();

        assert_eq!(w.into_pretty_string().unwrap(), "{\n  \"a\": 1\n}");
    }
}
