//! Per-call accumulator for raw property values.
//!
//! One [`ObjectReaderSession`] is created for every
//! [`decode_object`](crate::codec::decode_object) call.  The codec driver
//! stores the value returned by each
//! [`read_property`](crate::codec::ObjectCodec::read_property) call under its
//! property name, then moves the finished session into
//! [`create`](crate::codec::ObjectCodec::create).  A session is never shared
//! between calls.
//!
//! # Why type-erased values?
//!
//! Different properties of one object usually decode to different Rust types
//! (a `String` name, a `u32` age, a nested struct).  [`RawValue`] boxes each
//! of them behind `dyn Any` so a single map can hold them all, and the
//! construction step recovers the concrete type with
//! [`take`](ObjectReaderSession::take).

use std::any::{type_name, Any};
use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;

use crate::error::{CodecError, SessionError};
use crate::schema::PropertySchema;

/// A type-erased property value produced by value extraction.
pub struct RawValue(Box<dyn Any + Send>);

impl RawValue {
    pub fn new<T: Any + Send>(value: T) -> Self {
        RawValue(Box::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Recovers the boxed value, or returns `self` unchanged on a type mismatch.
    pub fn downcast<T: Any>(self) -> Result<T, RawValue> {
        self.0.downcast::<T>().map(|boxed| *boxed).map_err(RawValue)
    }
}

impl fmt::Debug for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawValue(..)")
    }
}

/// Raw values collected while decoding one object.
#[derive(Debug)]
pub struct ObjectReaderSession<'s> {
    type_name: &'s str,
    schema: &'s PropertySchema,
    values: BTreeMap<String, RawValue>,
}

impl<'s> ObjectReaderSession<'s> {
    /// Creates an empty session for a value of `type_name` described by `schema`.
    pub fn new(type_name: &'s str, schema: &'s PropertySchema) -> Self {
        Self {
            type_name,
            schema,
            values: BTreeMap::new(),
        }
    }

    pub fn type_name(&self) -> &str {
        self.type_name
    }

    /// The schema the session was created for.
    pub fn schema(&self) -> &'s PropertySchema {
        self.schema
    }

    /// Error for a declared property that the codec's extractor has no arm
    /// for.  Return it from the fallback arm of `read_property`.
    pub fn unhandled_property(&self, property: &str) -> CodecError {
        CodecError::UnhandledProperty {
            type_name: self.type_name.to_string(),
            property: property.to_string(),
        }
    }

    /// Stores the raw value of `name`, replacing any earlier value.
    ///
    /// JSON allows a name to appear twice in one object; the last occurrence
    /// wins, as with `serde_json`.
    pub fn insert(&mut self, name: &str, value: RawValue) {
        self.values.insert(name.to_string(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Names of the properties read so far, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Borrows the value of `name` if it was read and is a `T`.
    pub fn get<T: Any>(&self, name: &str) -> Option<&T> {
        self.values.get(name).and_then(RawValue::downcast_ref::<T>)
    }

    /// Removes and returns the value of `name`.
    ///
    /// Returns `Ok(None)` when the property was not read.  On a type mismatch
    /// the value stays in the session.
    pub fn take<T: Any>(&mut self, name: &str) -> Result<Option<T>, SessionError> {
        let Some(raw) = self.values.remove(name) else {
            return Ok(None);
        };
        match raw.downcast::<T>() {
            Ok(value) => Ok(Some(value)),
            Err(raw) => {
                self.values.insert(name.to_string(), raw);
                Err(SessionError::TypeMismatch {
                    property: name.to_string(),
                    expected: type_name::<T>(),
                })
            }
        }
    }

    /// Like [`take`](Self::take) but fails when the property was not read.
    pub fn take_required<T: Any>(&mut self, name: &str) -> Result<T, SessionError> {
        self.take(name)?
            .ok_or_else(|| SessionError::Missing(name.to_string()))
    }

    /// Like [`take`](Self::take) but falls back to `fallback` when the property
    /// was not read.
    pub fn take_or<T: Any>(&mut self, name: &str, fallback: T) -> Result<T, SessionError> {
        Ok(self.take(name)?.unwrap_or(fallback))
    }

    /// Like [`take`](Self::take) but falls back to the schema's advertised
    /// default, converted with serde.
    ///
    /// Returns `Ok(None)` when the property was neither read nor has a default.
    pub fn take_or_default<T: Any + DeserializeOwned>(
        &mut self,
        name: &str,
    ) -> Result<Option<T>, SessionError> {
        if let Some(value) = self.take(name)? {
            return Ok(Some(value));
        }
        let Some(default) = self.schema.get(name).and_then(|def| def.default_value()) else {
            return Ok(None);
        };
        serde_json::from_value(default.clone())
            .map(Some)
            .map_err(|source| SessionError::InvalidDefault {
                property: name.to_string(),
                source,
            })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
