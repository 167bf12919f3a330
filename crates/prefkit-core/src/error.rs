//! Error types for the codec and its building blocks.
//!
//! # Two layers of errors
//!
//! [`CodecError`] is the *schema-level* error: every failure of
//! [`decode_object`](crate::codec::decode_object) or
//! [`encode_object`](crate::codec::encode_object) is reported as one of its
//! variants.  The other types in this module ([`TokenError`], [`SessionError`],
//! [`SchemaError`]) describe misuse of a single building block.  When one of
//! them escapes a codec extension point it is wrapped into
//! [`CodecError::Extraction`], [`CodecError::Construction`] or
//! [`CodecError::Write`] together with the property and type being processed.
//!
//! A `CodecError` raised inside an extension point (for example by a nested
//! codec) is passed through unchanged, so the innermost context wins.

use thiserror::Error;

use crate::token::TokenKind;

/// Boxed error returned by codec extension points.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Schema-level failure of a decode or encode call.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The token stream does not have the shape the schema requires.
    #[error("schema violation for type \"{type_name}\": {message}")]
    SchemaViolation { type_name: String, message: String },

    /// The object contains a property the schema does not declare.
    #[error("property \"{property}\" is not part of type \"{type_name}\"")]
    UnknownProperty { type_name: String, property: String },

    /// Type-specific value extraction failed.
    #[error("an error occurred while reading property \"{property}\" of type \"{type_name}\"")]
    Extraction {
        type_name: String,
        property: String,
        #[source]
        source: BoxError,
    },

    /// Assembling the final value from the collected properties failed.
    #[error("an error occurred while creating a value of type \"{type_name}\"")]
    Construction {
        type_name: String,
        #[source]
        source: BoxError,
    },

    /// A codec declares a property in its schema but has no extractor for it.
    ///
    /// Raised by [`ObjectReaderSession::unhandled_property`](crate::session::ObjectReaderSession::unhandled_property)
    /// and always points at a bug in the codec, never at bad input.
    #[error("codec for type \"{type_name}\" does not handle declared property \"{property}\"")]
    UnhandledProperty { type_name: String, property: String },

    /// Writing the properties of a value failed.
    #[error("an error occurred while writing type \"{type_name}\"")]
    Write {
        type_name: String,
        #[source]
        source: BoxError,
    },
}

impl CodecError {
    pub(crate) fn schema_violation(type_name: &str, message: impl Into<String>) -> Self {
        CodecError::SchemaViolation {
            type_name: type_name.to_string(),
            message: message.into(),
        }
    }

    /// Reports text that could not be parsed as JSON at all.
    pub(crate) fn malformed(source: &serde_json::Error) -> Self {
        CodecError::SchemaViolation {
            type_name: "JSON document".to_string(),
            message: format!("unparseable input: {source}"),
        }
    }

    /// Name of the type being decoded or encoded when the error occurred.
    pub fn type_name(&self) -> &str {
        match self {
            CodecError::SchemaViolation { type_name, .. }
            | CodecError::UnknownProperty { type_name, .. }
            | CodecError::Extraction { type_name, .. }
            | CodecError::UnhandledProperty { type_name, .. }
            | CodecError::Construction { type_name, .. }
            | CodecError::Write { type_name, .. } => type_name,
        }
    }

    /// Name of the offending property, when the error concerns one.
    pub fn property(&self) -> Option<&str> {
        match self {
            CodecError::UnknownProperty { property, .. }
            | CodecError::Extraction { property, .. }
            | CodecError::UnhandledProperty { property, .. } => Some(property),
            _ => None,
        }
    }
}

/// Misuse of the token reader or writer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TokenError {
    /// A getter was called while the cursor is on a different kind of token.
    #[error("expected a {expected} token, found {found}")]
    UnexpectedToken { expected: TokenKind, found: TokenKind },

    /// The cursor ran past the last token.
    #[error("unexpected end of token stream")]
    EndOfStream,

    /// The cursor is on a token that cannot begin a value.
    #[error("{0} does not begin a value")]
    NotAValue(TokenKind),

    /// A materialised value could not be converted into the requested type.
    #[error("value does not match the requested type: {0}")]
    Deserialize(String),

    /// A Rust value could not be represented as JSON.
    #[error("value cannot be represented as JSON: {0}")]
    Serialize(String),

    /// A JSON number does not fit the requested Rust type.
    #[error("number {value} is out of range for {target}")]
    NumberOutOfRange { value: String, target: &'static str },

    /// JSON has no representation for NaN or infinity.
    #[error("non-finite number {0} cannot be written as JSON")]
    NonFiniteNumber(f64),

    /// A value was written inside an object without a preceding property name.
    #[error("a property name must precede every value inside an object")]
    MissingPropertyName,

    /// A property name was written outside of an object, or twice in a row.
    #[error("a property name is not allowed here")]
    UnexpectedPropertyName,

    /// An end token does not match the innermost open container.
    #[error("{0} does not match the innermost open container")]
    UnbalancedEnd(TokenKind),

    /// A second top-level value was written.
    #[error("the document already holds a complete top-level value")]
    DocumentComplete,

    /// The document was finished while containers were still open.
    #[error("the document is incomplete")]
    Incomplete,
}

/// Misuse of an [`ObjectReaderSession`](crate::session::ObjectReaderSession).
#[derive(Debug, Error)]
pub enum SessionError {
    /// A required property was not present in the input.
    #[error("property \"{0}\" was not read")]
    Missing(String),

    /// The stored raw value has a different Rust type than requested.
    #[error("property \"{property}\" does not hold a value of type {expected}")]
    TypeMismatch {
        property: String,
        expected: &'static str,
    },

    /// The schema default could not be converted into the requested type.
    #[error("default value of property \"{property}\" is invalid: {source}")]
    InvalidDefault {
        property: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Invalid schema declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Two definitions share the same property name.
    #[error("property \"{0}\" is declared more than once")]
    DuplicateProperty(String),
}

// ── Tests ─────────────────────────────────────────────────────────────────────
