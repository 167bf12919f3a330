//! # prefkit-core
//!
//! Schema-validated JSON object codec.  A codec for a Rust type declares which
//! properties its JSON object may carry and which token shapes each property
//! accepts; the shared driver in [`codec`] validates every incoming property
//! against that declaration before the type-specific code ever sees it.
//!
//! This crate has no file system or OS dependencies.  The settings store in
//! `prefkit-settings` builds on it.
//!
//! # Architecture overview (for beginners)
//!
//! Decoding a JSON object with hand-written `serde` impls usually mixes two
//! jobs: checking that the input has the right *shape* ("is `age` a number?")
//! and turning the values into Rust types.  This crate separates them:
//!
//! - **`token`** – The vocabulary.  A JSON document is viewed as a flat
//!   sequence of [`JsonToken`]s (start object, property name, string, …).
//!   [`TokenKinds`] is a small bit set naming the shapes a property allows.
//!
//! - **`reader`** / **`writer`** – A forward-only cursor over tokens
//!   ([`JsonTokenReader`]) and its mirror image, a token sink that builds a
//!   document ([`JsonTokenWriter`]).
//!
//! - **`schema`** – [`PropertySchema`]: property name → allowed shapes,
//!   nullability, required flag and advertised default.
//!
//! - **`session`** – [`ObjectReaderSession`]: the per-call bag of already
//!   decoded property values, handed to the construction step.
//!
//! - **`codec`** – [`ObjectCodec`], the trait a type implements, plus the
//!   driver functions [`decode_object`] and [`encode_object`].
//!
//! - **`error`** – Every error type in the crate.

pub mod codec;
pub mod error;
pub mod reader;
pub mod schema;
pub mod session;
pub mod token;
pub mod writer;

// Re-export the most-used types at the crate root so callers can write
// `prefkit_core::PropertySchema` instead of `prefkit_core::schema::PropertySchema`.
pub use codec::{decode_object, encode_object, ObjectCodec, ObjectCodecExt};
pub use error::{BoxError, CodecError, SchemaError, SessionError, TokenError};
pub use reader::JsonTokenReader;
pub use schema::{PropertyDefinition, PropertySchema};
pub use session::{ObjectReaderSession, RawValue};
pub use token::{JsonToken, TokenKind, TokenKinds};
pub use writer::JsonTokenWriter;
