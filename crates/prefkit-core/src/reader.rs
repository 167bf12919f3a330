//! Pull-based cursor over the tokens of a JSON document.
//!
//! [`JsonTokenReader`] flattens a parsed [`serde_json::Value`] into a token
//! sequence and lets the codec walk it one token at a time.  Parsing the text
//! is left to `serde_json`; this module only exposes the result as a stream.
//!
//! # Cursor rules
//!
//! - A fresh reader is positioned **on** the first token.
//! - [`advance`](JsonTokenReader::advance) moves to the next token and returns
//!   `false` once the stream is exhausted.
//! - After a property name, `advance` moves to the first token of that
//!   property's value.
//! - [`skip`](JsonTokenReader::skip) and
//!   [`read_value`](JsonTokenReader::read_value) leave the cursor on the
//!   *last* token of the value they consumed, so the caller's next `advance`
//!   lands on whatever follows it.

use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};

use crate::error::{CodecError, TokenError};
use crate::token::{flatten, JsonToken, TokenKind};

/// Cursor over a flat JSON token sequence.
#[derive(Debug, Clone)]
pub struct JsonTokenReader {
    tokens: Vec<JsonToken>,
    position: usize,
    depth: usize,
}

impl JsonTokenReader {
    /// Creates a reader over the tokens of `value`.
    pub fn from_value(value: &Value) -> Self {
        let mut tokens = Vec::new();
        flatten(value, &mut tokens);
        Self::from_tokens(tokens)
    }

    /// Parses `text` as JSON and creates a reader over it.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::SchemaViolation`] if `text` is not valid JSON.
    pub fn parse(text: &str) -> Result<Self, CodecError> {
        let value: Value = serde_json::from_str(text).map_err(|e| CodecError::malformed(&e))?;
        Ok(Self::from_value(&value))
    }

    /// Parses UTF-8 `bytes` as JSON and creates a reader over it.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::SchemaViolation`] if `bytes` is not valid JSON.
    pub fn parse_slice(bytes: &[u8]) -> Result<Self, CodecError> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| CodecError::malformed(&e))?;
        Ok(Self::from_value(&value))
    }

    /// Creates a reader over an arbitrary token sequence.
    ///
    /// The sequence is not checked for balance; a malformed sequence surfaces
    /// as errors while it is consumed.
    pub fn from_tokens(tokens: Vec<JsonToken>) -> Self {
        Self {
            tokens,
            position: 0,
            depth: 0,
        }
    }

    /// The token under the cursor, or `None` once the stream is exhausted.
    pub fn current(&self) -> Option<&JsonToken> {
        self.tokens.get(self.position)
    }

    /// The kind of the token under the cursor.
    pub fn kind(&self) -> Option<TokenKind> {
        self.current().map(JsonToken::kind)
    }

    /// Nesting depth of the current token.  Top-level tokens have depth 0;
    /// the members of a top-level object have depth 1.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Moves to the next token.  Returns `false` when there is none.
    pub fn advance(&mut self) -> bool {
        let Some(previous) = self.current().map(JsonToken::kind) else {
            return false;
        };
        self.position += 1;
        let Some(next) = self.kind() else {
            return false;
        };
        if matches!(previous, TokenKind::Object | TokenKind::Array) {
            self.depth += 1;
        }
        if matches!(next, TokenKind::EndObject | TokenKind::EndArray) {
            self.depth = self.depth.saturating_sub(1);
        }
        true
    }

    fn advance_or_end(&mut self) -> Result<(), TokenError> {
        if self.advance() {
            Ok(())
        } else {
            Err(TokenError::EndOfStream)
        }
    }

    fn expect(&self, expected: TokenKind) -> Result<&JsonToken, TokenError> {
        let token = self.current().ok_or(TokenError::EndOfStream)?;
        if token.kind() == expected {
            Ok(token)
        } else {
            Err(TokenError::UnexpectedToken {
                expected,
                found: token.kind(),
            })
        }
    }

    // ── Scalar getters ────────────────────────────────────────────────────────

    /// Returns the text of the current string token.
    pub fn get_str(&self) -> Result<&str, TokenError> {
        match self.expect(TokenKind::String)? {
            JsonToken::String(s) => Ok(s),
            other => Err(TokenError::UnexpectedToken {
                expected: TokenKind::String,
                found: other.kind(),
            }),
        }
    }

    /// Returns an owned copy of the current string token.
    pub fn get_string(&self) -> Result<String, TokenError> {
        self.get_str().map(str::to_owned)
    }

    /// Returns the name of the current property-name token.
    pub fn get_property_name(&self) -> Result<&str, TokenError> {
        match self.expect(TokenKind::PropertyName)? {
            JsonToken::PropertyName(name) => Ok(name),
            other => Err(TokenError::UnexpectedToken {
                expected: TokenKind::PropertyName,
                found: other.kind(),
            }),
        }
    }

    /// Returns the value of the current boolean token.
    pub fn get_bool(&self) -> Result<bool, TokenError> {
        match self.expect(TokenKind::Bool)? {
            JsonToken::Bool(b) => Ok(*b),
            other => Err(TokenError::UnexpectedToken {
                expected: TokenKind::Bool,
                found: other.kind(),
            }),
        }
    }

    /// Returns the current number token unchanged.
    pub fn get_number(&self) -> Result<&Number, TokenError> {
        match self.expect(TokenKind::Number)? {
            JsonToken::Number(n) => Ok(n),
            other => Err(TokenError::UnexpectedToken {
                expected: TokenKind::Number,
                found: other.kind(),
            }),
        }
    }

    /// Returns the current number as `i64`.
    ///
    /// Fractional numbers and numbers outside the `i64` range are rejected.
    pub fn get_i64(&self) -> Result<i64, TokenError> {
        let n = self.get_number()?;
        n.as_i64().ok_or_else(|| TokenError::NumberOutOfRange {
            value: n.to_string(),
            target: "i64",
        })
    }

    /// Returns the current number as `u64`.
    pub fn get_u64(&self) -> Result<u64, TokenError> {
        let n = self.get_number()?;
        n.as_u64().ok_or_else(|| TokenError::NumberOutOfRange {
            value: n.to_string(),
            target: "u64",
        })
    }

    /// Returns the current number as `f64`.
    pub fn get_f64(&self) -> Result<f64, TokenError> {
        let n = self.get_number()?;
        n.as_f64().ok_or_else(|| TokenError::NumberOutOfRange {
            value: n.to_string(),
            target: "f64",
        })
    }

    // ── Whole values ──────────────────────────────────────────────────────────

    /// Skips the current value.
    ///
    /// - On a start token, moves to the matching end token.
    /// - On a property name, moves to the last token of that property's value.
    /// - On a scalar, stays put.
    ///
    /// Fails with [`TokenError::NotAValue`] on a token that cannot begin a
    /// value.
    pub fn skip(&mut self) -> Result<(), TokenError> {
        let mut kind = self.kind().ok_or(TokenError::EndOfStream)?;
        if kind == TokenKind::PropertyName {
            self.advance_or_end()?;
            kind = self.kind().ok_or(TokenError::EndOfStream)?;
        }
        if !kind.is_value() {
            return Err(TokenError::NotAValue(kind));
        }
        if !matches!(kind, TokenKind::Object | TokenKind::Array) {
            return Ok(());
        }

        // Only the matching end token brings the depth back to the start.
        let start = self.depth();
        loop {
            self.advance_or_end()?;
            if self.depth() == start {
                return Ok(());
            }
        }
    }

    /// Materialises the value starting at the cursor.
    ///
    /// Works for every shape, including nested containers.  The cursor ends on
    /// the last token of the value.
    pub fn read_value(&mut self) -> Result<Value, TokenError> {
        let token = self.current().cloned().ok_or(TokenError::EndOfStream)?;
        match token {
            JsonToken::String(s) => Ok(Value::String(s)),
            JsonToken::Number(n) => Ok(Value::Number(n)),
            JsonToken::Bool(b) => Ok(Value::Bool(b)),
            JsonToken::Null => Ok(Value::Null),
            JsonToken::StartArray => {
                let mut items = Vec::new();
                loop {
                    self.advance_or_end()?;
                    if self.kind() == Some(TokenKind::EndArray) {
                        break;
                    }
                    items.push(self.read_value()?);
                }
                Ok(Value::Array(items))
            }
            JsonToken::StartObject => {
                let mut map = Map::new();
                loop {
                    self.advance_or_end()?;
                    match self.current().cloned() {
                        Some(JsonToken::EndObject) => break,
                        Some(JsonToken::PropertyName(name)) => {
                            self.advance_or_end()?;
                            let value = self.read_value()?;
                            map.insert(name, value);
                        }
                        Some(other) => {
                            return Err(TokenError::UnexpectedToken {
                                expected: TokenKind::PropertyName,
                                found: other.kind(),
                            })
                        }
                        None => return Err(TokenError::EndOfStream),
                    }
                }
                Ok(Value::Object(map))
            }
            JsonToken::EndObject | JsonToken::EndArray | JsonToken::PropertyName(_) => {
                Err(TokenError::NotAValue(token.kind()))
            }
        }
    }

    /// Materialises the current value and converts it with serde.
    pub fn deserialize<T: DeserializeOwned>(&mut self) -> Result<T, TokenError> {
        let value = self.read_value()?;
        serde_json::from_value(value).map_err(|e| TokenError::Deserialize(e.to_string()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn collect_kinds(reader: &mut JsonTokenReader) -> Vec<TokenKind> {
        let mut kinds = Vec::new();
        loop {
            if let Some(kind) = reader.kind() {
                kinds.push(kind);
            }
            if !reader.advance() {
                break;
            }
        }
        kinds
    }

    #[test]
    fn test_reader_starts_on_first_token() {
        let reader = JsonTokenReader::from_value(&json!({"a": 1}));
        assert_eq!(reader.current(), Some(&JsonToken::StartObject));
        assert_eq!(reader.depth(), 0);
    }

    #[test]
    fn test_reader_flattens_nested_document_in_order() {
        // Arrange
        let mut reader = JsonTokenReader::from_value(&json!({"a": [true, null], "b": "x"}));

        // Act
        let kinds = collect_kinds(&mut reader);

        // Assert
        assert_eq!(
            kinds,
            vec![
                TokenKind::Object,
                TokenKind::PropertyName,
                TokenKind::Array,
                TokenKind::Bool,
                TokenKind::Null,
                TokenKind::EndArray,
                TokenKind::PropertyName,
                TokenKind::String,
                TokenKind::EndObject,
            ]
        );
    }

    #[test]
    fn test_advance_returns_false_past_the_end() {
        let mut reader = JsonTokenReader::from_value(&json!(1));
        assert!(!reader.advance());
        assert_eq!(reader.current(), None);
        assert!(!reader.advance());
    }

    #[test]
    fn test_depth_tracks_nesting() {
        let mut reader = JsonTokenReader::from_value(&json!({"a": {"b": 1}}));
        reader.advance(); // "a"
        assert_eq!(reader.depth(), 1);
        reader.advance(); // {
        assert_eq!(reader.depth(), 1);
        reader.advance(); // "b"
        assert_eq!(reader.depth(), 2);
        reader.advance(); // 1
        reader.advance(); // }
        assert_eq!(reader.depth(), 1);
        reader.advance(); // }
        assert_eq!(reader.depth(), 0);
    }

    #[test]
    fn test_parse_rejects_invalid_text() {
        let result = JsonTokenReader::parse("{\"a\": ");
        assert!(matches!(result, Err(CodecError::SchemaViolation { .. })));
    }

    #[test]
    fn test_parse_slice_accepts_utf8_bytes() {
        let reader = JsonTokenReader::parse_slice(br#""hello""#).unwrap();
        assert_eq!(reader.get_str().unwrap(), "hello");
    }

    #[test]
    fn test_scalar_getters_read_matching_tokens() {
        let mut reader = JsonTokenReader::from_value(&json!([1, -2, 2.5, false, "s"]));
        reader.advance();
        assert_eq!(reader.get_u64().unwrap(), 1);
        reader.advance();
        assert_eq!(reader.get_i64().unwrap(), -2);
        reader.advance();
        assert!((reader.get_f64().unwrap() - 2.5).abs() < f64::EPSILON);
        reader.advance();
        assert!(!reader.get_bool().unwrap());
        reader.advance();
        assert_eq!(reader.get_string().unwrap(), "s");
    }

    #[test]
    fn test_getter_on_wrong_token_reports_both_kinds() {
        let reader = JsonTokenReader::from_value(&json!(5));
        assert_eq!(
            reader.get_str(),
            Err(TokenError::UnexpectedToken {
                expected: TokenKind::String,
                found: TokenKind::Number,
            })
        );
    }

    #[test]
    fn test_get_u64_rejects_negative_numbers() {
        let reader = JsonTokenReader::from_value(&json!(-1));
        assert!(matches!(
            reader.get_u64(),
            Err(TokenError::NumberOutOfRange { target: "u64", .. })
        ));
    }

    #[test]
    fn test_skip_on_container_moves_to_matching_end() {
        // Arrange
        let mut reader = JsonTokenReader::from_value(&json!({"a": {"b": [1, {"c": 2}]}, "d": 3}));
        reader.advance(); // "a"
        reader.advance(); // {

        // Act
        reader.skip().unwrap();

        // Assert
        assert_eq!(reader.kind(), Some(TokenKind::EndObject));
        reader.advance();
        assert_eq!(reader.get_property_name().unwrap(), "d");
    }

    #[test]
    fn test_skip_on_property_name_skips_its_value() {
        let mut reader = JsonTokenReader::from_value(&json!({"a": [1, 2], "b": true}));
        reader.advance(); // "a"
        reader.skip().unwrap();
        assert_eq!(reader.kind(), Some(TokenKind::EndArray));
        reader.advance();
        assert_eq!(reader.get_property_name().unwrap(), "b");
    }

    #[test]
    fn test_skip_on_scalar_stays_put() {
        let mut reader = JsonTokenReader::from_value(&json!("x"));
        reader.skip().unwrap();
        assert_eq!(reader.get_str().unwrap(), "x");
    }

    #[test]
    fn test_skip_rejects_end_token() {
        let mut reader = JsonTokenReader::from_value(&json!({}));
        reader.advance();
        assert_eq!(
            reader.skip(),
            Err(TokenError::NotAValue(TokenKind::EndObject))
        );
    }

    #[test]
    fn test_skip_reports_truncated_stream() {
        let mut reader =
            JsonTokenReader::from_tokens(vec![JsonToken::StartArray, JsonToken::Null]);
        assert_eq!(reader.skip(), Err(TokenError::EndOfStream));
    }

    #[test]
    fn test_read_value_materialises_nested_value() {
        // Arrange
        let original = json!({"a": [1, {"b": null}], "c": "d"});
        let mut reader = JsonTokenReader::from_value(&original);

        // Act
        let value = reader.read_value().unwrap();

        // Assert
        assert_eq!(value, original);
        assert_eq!(reader.kind(), Some(TokenKind::EndObject));
        assert!(!reader.advance());
    }

    #[test]
    fn test_read_value_rejects_end_token() {
        let mut reader = JsonTokenReader::from_tokens(vec![JsonToken::EndObject]);
        assert_eq!(
            reader.read_value(),
            Err(TokenError::NotAValue(TokenKind::EndObject))
        );
    }

    #[test]
    fn test_deserialize_converts_current_value() {
        let mut reader = JsonTokenReader::from_value(&json!([1, 2, 3]));
        let items: Vec<u8> = reader.deserialize().unwrap();
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[test]
    fn test_deserialize_reports_type_mismatch() {
        let mut reader = JsonTokenReader::from_value(&json!("nope"));
        let result: Result<Vec<u8>, _> = reader.deserialize();
        assert!(matches!(result, Err(TokenError::Deserialize(_))));
    }
}
