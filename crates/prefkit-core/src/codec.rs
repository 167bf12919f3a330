//! Schema-validated object codec.
//!
//! # How it fits together
//!
//! ```text
//!   JsonTokenReader ──► decode_object ──► ObjectCodec::read_property (per property)
//!                          │   ▲                  │
//!                          │   └── RawValue ──────┘
//!                          ▼
//!                  ObjectReaderSession ──► ObjectCodec::create ──► T
//!
//!   T ──► encode_object ──► ObjectCodec::write_properties ──► JsonTokenWriter
//! ```
//!
//! An implementation of [`ObjectCodec`] supplies only the type-specific parts:
//! its [`PropertySchema`], how to turn one validated property value into a
//! Rust value, how to assemble the final object, and how to write an object
//! back out.  [`decode_object`] and [`encode_object`] do everything else:
//! they check the object wrapper, look every property up in the schema,
//! verify the token shape and nullability, and attach the property and type
//! name to every error.
//!
//! # Error wrapping
//!
//! Extension points return [`BoxError`].  If the boxed error is already a
//! [`CodecError`] (for example from a nested `decode_object` call) it is
//! returned unchanged; any other error is wrapped into
//! [`CodecError::Extraction`], [`CodecError::Construction`] or
//! [`CodecError::Write`].

use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{BoxError, CodecError};
use crate::reader::JsonTokenReader;
use crate::schema::PropertySchema;
use crate::session::{ObjectReaderSession, RawValue};
use crate::token::{JsonToken, TokenKind};
use crate::writer::JsonTokenWriter;

/// Type-specific half of a JSON object codec.
///
/// # Example
///
/// ```rust
/// use prefkit_core::codec::{ObjectCodec, ObjectCodecExt};
/// use prefkit_core::error::BoxError;
/// use prefkit_core::reader::JsonTokenReader;
/// use prefkit_core::schema::{PropertyDefinition, PropertySchema};
/// use prefkit_core::session::{ObjectReaderSession, RawValue};
/// use prefkit_core::token::TokenKinds;
/// use prefkit_core::writer::JsonTokenWriter;
///
/// struct Tag { label: String }
///
/// struct TagCodec { schema: PropertySchema }
///
/// impl ObjectCodec for TagCodec {
///     type Value = Tag;
///
///     fn schema(&self) -> &PropertySchema {
///         &self.schema
///     }
///
///     fn read_property(
///         &self,
///         reader: &mut JsonTokenReader,
///         _session: &mut ObjectReaderSession<'_>,
///         _property: &str,
///     ) -> Result<RawValue, BoxError> {
///         Ok(RawValue::new(reader.get_string()?))
///     }
///
///     fn create(&self, mut session: ObjectReaderSession<'_>) -> Result<Tag, BoxError> {
///         Ok(Tag { label: session.take_required("label")? })
///     }
///
///     fn write_properties(&self, writer: &mut JsonTokenWriter, tag: &Tag) -> Result<(), BoxError> {
///         writer.write_string_property("label", &tag.label)?;
///         Ok(())
///     }
/// }
///
/// let codec = TagCodec {
///     schema: PropertySchema::builder()
///         .property("label", PropertyDefinition::new(TokenKinds::STRING))
///         .build()
///         .unwrap(),
/// };
/// let tag = codec.decode_str(r#"{"label":"urgent"}"#).unwrap();
/// assert_eq!(tag.label, "urgent");
/// assert_eq!(codec.encode_to_string(&tag).unwrap(), r#"{"label":"urgent"}"#);
/// ```
pub trait ObjectCodec {
    /// The Rust type this codec reads and writes.
    type Value;

    /// Name used in error messages.  Defaults to the unqualified Rust type name.
    fn type_name(&self) -> &str {
        short_type_name::<Self::Value>()
    }

    /// Declared properties of the JSON object.
    fn schema(&self) -> &PropertySchema;

    /// Whether a property missing from the schema fails decoding.  When
    /// `false`, the property and its entire value are skipped.
    fn error_on_unknown_property(&self) -> bool {
        true
    }

    /// Extracts the value of `property`.
    ///
    /// Called with the cursor on the first token of the value, after the shape
    /// has been validated against the schema.  The implementation must consume
    /// exactly the tokens of the value and leave the cursor on its last token
    /// (for a scalar, the cursor does not move).
    fn read_property(
        &self,
        reader: &mut JsonTokenReader,
        session: &mut ObjectReaderSession<'_>,
        property: &str,
    ) -> Result<RawValue, BoxError>;

    /// Builds the final value from every property that was read.
    fn create(&self, session: ObjectReaderSession<'_>) -> Result<Self::Value, BoxError>;

    /// Writes the properties of `value`.  The surrounding object tokens are
    /// written by [`encode_object`].
    fn write_properties(
        &self,
        writer: &mut JsonTokenWriter,
        value: &Self::Value,
    ) -> Result<(), BoxError>;
}

/// Unqualified name of `T`, e.g. `Person` for `my_crate::model::Person`.
///
/// Generic types keep their full name.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    if full.contains('<') {
        return full;
    }
    full.rsplit("::").next().unwrap_or(full)
}

/// Returns a `CodecError` unchanged, or wraps any other error with `wrap`.
fn promote(source: BoxError, wrap: impl FnOnce(BoxError) -> CodecError) -> CodecError {
    match source.downcast::<CodecError>() {
        Ok(codec_error) => *codec_error,
        Err(other) => wrap(other),
    }
}

fn describe(kind: Option<TokenKind>) -> String {
    match kind {
        Some(kind) => kind.to_string(),
        None => "end of input".to_string(),
    }
}

// ── Decoding ──────────────────────────────────────────────────────────────────

/// Decodes one object starting at the reader's current token.
///
/// On success the cursor is left on the object's end token.
///
/// # Errors
///
/// - [`CodecError::SchemaViolation`] if the current token is not an object
///   start, a member is not a property name, a property value has a shape the
///   schema does not allow, or a required property is missing.
/// - [`CodecError::UnknownProperty`] for an undeclared property when the codec
///   errors on unknown properties.
/// - [`CodecError::Extraction`] / [`CodecError::Construction`] when an
///   extension point fails.
pub fn decode_object<C>(codec: &C, reader: &mut JsonTokenReader) -> Result<C::Value, CodecError>
where
    C: ObjectCodec + ?Sized,
{
    let type_name = codec.type_name();
    let schema = codec.schema();

    if reader.kind() != Some(TokenKind::Object) {
        return Err(CodecError::schema_violation(
            type_name,
            format!("expected an object, found {}", describe(reader.kind())),
        ));
    }
    trace!(type_name, "decoding object");

    let mut session = ObjectReaderSession::new(type_name, schema);

    loop {
        if !reader.advance() {
            return Err(CodecError::schema_violation(
                type_name,
                "unexpected end of input inside object",
            ));
        }

        let property = match reader.current() {
            Some(JsonToken::EndObject) => break,
            Some(JsonToken::PropertyName(name)) => name.clone(),
            other => {
                return Err(CodecError::schema_violation(
                    type_name,
                    format!(
                        "expected a property name, found {}",
                        describe(other.map(JsonToken::kind))
                    ),
                ))
            }
        };

        let Some(definition) = schema.get(&property) else {
            if codec.error_on_unknown_property() {
                return Err(CodecError::UnknownProperty {
                    type_name: type_name.to_string(),
                    property,
                });
            }
            debug!(type_name, property = %property, "skipping unknown property");
            reader.skip().map_err(|e| {
                CodecError::schema_violation(
                    type_name,
                    format!("malformed value for unknown property \"{property}\": {e}"),
                )
            })?;
            continue;
        };

        if !reader.advance() {
            return Err(CodecError::schema_violation(
                type_name,
                format!("missing value for property \"{property}\""),
            ));
        }
        let kind = describe(reader.kind());
        if !reader.kind().is_some_and(|k| definition.accepts(k)) {
            let nullable = if definition.is_nullable() { " or null" } else { "" };
            return Err(CodecError::schema_violation(
                type_name,
                format!(
                    "expected {}{nullable} token for property \"{property}\", found {kind}",
                    definition.kinds()
                ),
            ));
        }

        let raw = codec
            .read_property(reader, &mut session, &property)
            .map_err(|source| {
                promote(source, |source| CodecError::Extraction {
                    type_name: type_name.to_string(),
                    property: property.clone(),
                    source,
                })
            })?;
        trace!(type_name, property = %property, "property read");
        session.insert(&property, raw);
    }

    if let Some(missing) = schema.required_names().find(|name| !session.contains(name)) {
        return Err(CodecError::schema_violation(
            type_name,
            format!("missing required property \"{missing}\""),
        ));
    }

    codec.create(session).map_err(|source| {
        promote(source, |source| CodecError::Construction {
            type_name: type_name.to_string(),
            source,
        })
    })
}

// ── Encoding ──────────────────────────────────────────────────────────────────

/// Writes `value` as one JSON object.
///
/// # Errors
///
/// Returns [`CodecError::Write`] (or a `CodecError` raised by a nested codec)
/// if the properties cannot be written.  On failure the closing object token
/// is not written and the writer's partial content must be discarded.
pub fn encode_object<C>(
    codec: &C,
    value: &C::Value,
    writer: &mut JsonTokenWriter,
) -> Result<(), CodecError>
where
    C: ObjectCodec + ?Sized,
{
    let type_name = codec.type_name();
    let wrap = |source: BoxError| CodecError::Write {
        type_name: type_name.to_string(),
        source,
    };

    writer.write_start_object().map_err(|e| wrap(Box::new(e)))?;
    codec
        .write_properties(writer, value)
        .map_err(|source| promote(source, wrap))?;
    writer.write_end_object().map_err(|e| wrap(Box::new(e)))?;
    trace!(type_name, "encoded object");
    Ok(())
}

// ── Convenience entry points ──────────────────────────────────────────────────

/// Whole-document helpers available on every [`ObjectCodec`].
pub trait ObjectCodecExt: ObjectCodec {
    /// Parses `text` and decodes the top-level object.
    fn decode_str(&self, text: &str) -> Result<Self::Value, CodecError> {
        let mut reader = JsonTokenReader::parse(text)?;
        decode_object(self, &mut reader)
    }

    /// Parses UTF-8 `bytes` and decodes the top-level object.
    fn decode_slice(&self, bytes: &[u8]) -> Result<Self::Value, CodecError> {
        let mut reader = JsonTokenReader::parse_slice(bytes)?;
        decode_object(self, &mut reader)
    }

    /// Decodes an already parsed document.
    fn decode_value(&self, value: &Value) -> Result<Self::Value, CodecError> {
        let mut reader = JsonTokenReader::from_value(value);
        decode_object(self, &mut reader)
    }

    /// Encodes `value` into a standalone document.
    fn encode_to_value(&self, value: &Self::Value) -> Result<Value, CodecError> {
        let mut writer = JsonTokenWriter::new();
        encode_object(self, value, &mut writer)?;
        writer.into_value().map_err(|e| CodecError::Write {
            type_name: self.type_name().to_string(),
            source: Box::new(e),
        })
    }

    /// Encodes `value` as compact JSON text.
    fn encode_to_string(&self, value: &Self::Value) -> Result<String, CodecError> {
        self.encode_to_value(value).map(|doc| doc.to_string())
    }

    /// Encodes `value` as indented JSON text.
    fn encode_to_pretty_string(&self, value: &Self::Value) -> Result<String, CodecError> {
        self.encode_to_value(value).map(|doc| format!("{doc:#}"))
    }
}

impl<C: ObjectCodec + ?Sized> ObjectCodecExt for C {}

// ── Tests ─────────────────────────────────────────────────────────────────────
