//! Declarative property schemas.
//!
//! A [`PropertySchema`] maps each property name of a JSON object to a
//! [`PropertyDefinition`] describing which token shapes its value may take.
//! Codecs declare their schema once (usually in their constructor) and the
//! codec driver consults it for every property it reads.
//!
//! # Example
//!
//! ```rust
//! use prefkit_core::schema::{PropertyDefinition, PropertySchema};
//! use prefkit_core::token::TokenKinds;
//!
//! let schema = PropertySchema::builder()
//!     .property("name", PropertyDefinition::new(TokenKinds::STRING))
//!     .property("age", PropertyDefinition::new(TokenKinds::NUMBER).nullable())
//!     .build()
//!     .unwrap();
//!
//! assert!(schema.contains("age"));
//! assert_eq!(schema.names().collect::<Vec<_>>(), vec!["age", "name"]);
//! ```

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::SchemaError;
use crate::token::{TokenKind, TokenKinds};

/// Validation rule for a single property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDefinition {
    kinds: TokenKinds,
    nullable: bool,
    required: bool,
    default_value: Option<Value>,
}

impl PropertyDefinition {
    /// A non-nullable, optional property accepting the given shapes.
    pub fn new(kinds: TokenKinds) -> Self {
        Self {
            kinds,
            nullable: false,
            required: false,
            default_value: None,
        }
    }

    /// Accept `null` in addition to the declared shapes.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Fail decoding when the property is absent from the input.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Advertise the value used when the property is absent.
    ///
    /// The codec does not fill defaults itself; construction code reads them
    /// through [`ObjectReaderSession::take_or_default`](crate::session::ObjectReaderSession::take_or_default).
    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn kinds(&self) -> TokenKinds {
        self.kinds
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    /// Returns `true` if a value token of `kind` satisfies this definition.
    pub fn accepts(&self, kind: TokenKind) -> bool {
        (self.nullable && kind == TokenKind::Null) || self.kinds.contains(kind)
    }
}

/// Immutable mapping from property name to [`PropertyDefinition`].
///
/// Iteration is ordered by name so error messages and diagnostics are
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertySchema {
    properties: BTreeMap<String, PropertyDefinition>,
}

impl PropertySchema {
    pub fn builder() -> PropertySchemaBuilder {
        PropertySchemaBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&PropertyDefinition> {
        self.properties.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Property names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    /// `(name, definition)` pairs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyDefinition)> {
        self.properties.iter().map(|(name, def)| (name.as_str(), def))
    }

    /// Names of the properties marked [`required`](PropertyDefinition::required).
    pub fn required_names(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, def)| def.is_required())
            .map(|(name, _)| name)
    }
}

/// Collects definitions and rejects duplicate names on [`build`](Self::build).
#[derive(Debug, Default)]
pub struct PropertySchemaBuilder {
    properties: BTreeMap<String, PropertyDefinition>,
    duplicate: Option<String>,
}

impl PropertySchemaBuilder {
    pub fn property(mut self, name: impl Into<String>, definition: PropertyDefinition) -> Self {
        let name = name.into();
        if self.properties.contains_key(&name) {
            self.duplicate.get_or_insert(name);
        } else {
            self.properties.insert(name, definition);
        }
        self
    }

    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateProperty`] naming the first property
    /// that was declared twice.
    pub fn build(self) -> Result<PropertySchema, SchemaError> {
        match self.duplicate {
            Some(name) => Err(SchemaError::DuplicateProperty(name)),
            None => Ok(PropertySchema {
                properties: self.properties,
            }),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
