//! JSON token model shared by the reader, the writer and the codec.
//!
//! # What is a token? (for beginners)
//!
//! A JSON document such as `{"name":"Alice","tags":["a"]}` can be viewed as a
//! flat sequence of *tokens*:
//!
//! ```text
//! StartObject
//!   PropertyName("name")  String("Alice")
//!   PropertyName("tags")  StartArray  String("a")  EndArray
//! EndObject
//! ```
//!
//! The codec never looks at raw text.  It walks this token sequence, checks the
//! *shape* of each value against a schema, and hands the cursor to
//! type-specific code to extract the actual content.
//!
//! # Kinds versus kind sets
//!
//! [`TokenKind`] names the shape of a single token.  [`TokenKinds`] is a small
//! set of value shapes used by a schema to say "this property may be a string
//! or a number".

use std::fmt;

use serde_json::{Number, Value};

/// A single JSON token.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonToken {
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    PropertyName(String),
    String(String),
    Number(Number),
    Bool(bool),
    Null,
}

impl JsonToken {
    /// Returns the shape of this token.
    pub fn kind(&self) -> TokenKind {
        match self {
            JsonToken::StartObject => TokenKind::Object,
            JsonToken::EndObject => TokenKind::EndObject,
            JsonToken::StartArray => TokenKind::Array,
            JsonToken::EndArray => TokenKind::EndArray,
            JsonToken::PropertyName(_) => TokenKind::PropertyName,
            JsonToken::String(_) => TokenKind::String,
            JsonToken::Number(_) => TokenKind::Number,
            JsonToken::Bool(_) => TokenKind::Bool,
            JsonToken::Null => TokenKind::Null,
        }
    }
}

/// The structural category of a token, independent of its content.
///
/// `Object` and `Array` denote the *start* tokens of those containers; the
/// matching end tokens have their own kinds so that a cursor can tell them
/// apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Object,
    Array,
    String,
    Number,
    Bool,
    Null,
    EndObject,
    EndArray,
    PropertyName,
}

impl TokenKind {
    /// Returns `true` for kinds that begin a JSON value.
    pub fn is_value(self) -> bool {
        !matches!(
            self,
            TokenKind::EndObject | TokenKind::EndArray | TokenKind::PropertyName
        )
    }

    /// Shape of the first token of `value`.
    pub fn of_value(value: &Value) -> TokenKind {
        match value {
            Value::Null => TokenKind::Null,
            Value::Bool(_) => TokenKind::Bool,
            Value::Number(_) => TokenKind::Number,
            Value::String(_) => TokenKind::String,
            Value::Array(_) => TokenKind::Array,
            Value::Object(_) => TokenKind::Object,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            TokenKind::Object => "object",
            TokenKind::Array => "array",
            TokenKind::String => "string",
            TokenKind::Number => "number",
            TokenKind::Bool => "bool",
            TokenKind::Null => "null",
            TokenKind::EndObject => "end of object",
            TokenKind::EndArray => "end of array",
            TokenKind::PropertyName => "property name",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Appends the tokens of `value` to `out` in document order.
pub(crate) fn flatten(value: &Value, out: &mut Vec<JsonToken>) {
    match value {
        Value::Null => out.push(JsonToken::Null),
        Value::Bool(b) => out.push(JsonToken::Bool(*b)),
        Value::Number(n) => out.push(JsonToken::Number(n.clone())),
        Value::String(s) => out.push(JsonToken::String(s.clone())),
        Value::Array(items) => {
            out.push(JsonToken::StartArray);
            for item in items {
                flatten(item, out);
            }
            out.push(JsonToken::EndArray);
        }
        Value::Object(map) => {
            out.push(JsonToken::StartObject);
            for (name, member) in map {
                out.push(JsonToken::PropertyName(name.clone()));
                flatten(member, out);
            }
            out.push(JsonToken::EndObject);
        }
    }
}

// ── Kind sets ─────────────────────────────────────────────────────────────────

/// A set of value shapes a schema property accepts.
///
/// Stored as a bitmask so the set is `Copy` and can be built in `const`
/// context.  `null` is deliberately not a member: nullability is a separate
/// flag on the property definition.
///
/// # Examples
///
/// ```rust
/// use prefkit_core::token::{TokenKind, TokenKinds};
///
/// let kinds = TokenKinds::STRING.union(TokenKinds::NUMBER);
/// assert!(kinds.contains(TokenKind::Number));
/// assert!(!kinds.contains(TokenKind::Bool));
/// assert_eq!(kinds.to_string(), "string | number");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TokenKinds(u8);

impl TokenKinds {
    pub const NONE: TokenKinds = TokenKinds(0);
    pub const OBJECT: TokenKinds = TokenKinds(1 << 0);
    pub const ARRAY: TokenKinds = TokenKinds(1 << 1);
    pub const STRING: TokenKinds = TokenKinds(1 << 2);
    pub const NUMBER: TokenKinds = TokenKinds(1 << 3);
    pub const BOOL: TokenKinds = TokenKinds(1 << 4);
    pub const ANY: TokenKinds = TokenKinds(0b1_1111);

    /// Returns the set containing every member of `self` and `other`.
    pub const fn union(self, other: TokenKinds) -> TokenKinds {
        TokenKinds(self.0 | other.0)
    }

    /// Returns `true` when the set has no members.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if a token of `kind` is a member of this set.
    ///
    /// Structural kinds and `null` are never members.
    pub fn contains(self, kind: TokenKind) -> bool {
        match Self::bit(kind) {
            Some(bit) => self.0 & bit.0 != 0,
            None => false,
        }
    }

    fn bit(kind: TokenKind) -> Option<TokenKinds> {
        match kind {
            TokenKind::Object => Some(Self::OBJECT),
            TokenKind::Array => Some(Self::ARRAY),
            TokenKind::String => Some(Self::STRING),
            TokenKind::Number => Some(Self::NUMBER),
            TokenKind::Bool => Some(Self::BOOL),
            TokenKind::Null
            | TokenKind::EndObject
            | TokenKind::EndArray
            | TokenKind::PropertyName => None,
        }
    }

    /// Iterates over the member kinds in declaration order.
    pub fn iter(self) -> impl Iterator<Item = TokenKind> {
        [
            TokenKind::Object,
            TokenKind::Array,
            TokenKind::String,
            TokenKind::Number,
            TokenKind::Bool,
        ]
        .into_iter()
        .filter(move |kind| self.contains(*kind))
    }
}

impl From<TokenKind> for TokenKinds {
    fn from(kind: TokenKind) -> Self {
        Self::bit(kind).unwrap_or(Self::NONE)
    }
}

impl std::ops::BitOr for TokenKinds {
    type Output = TokenKinds;

    fn bitor(self, rhs: TokenKinds) -> TokenKinds {
        self.union(rhs)
    }
}

impl fmt::Display for TokenKinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("nothing");
        }
        let mut first = true;
        for kind in self.iter() {
            if !first {
                f.write_str(" | ")?;
            }
            first = false;
            write!(f, "{kind}")?;
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
