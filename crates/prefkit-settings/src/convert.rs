//! Building blocks for [`SettingsSchema::convert`](crate::store::SettingsSchema::convert).
//!
//! Each helper validates one stored JSON value and returns the value to keep.
//! A value of the wrong shape becomes [`ConvertError::InvalidData`], which the
//! store recovers from by keeping the default.
//!
//! ```rust
//! use prefkit_settings::convert::convert_serde;
//! use serde::{Deserialize, Serialize};
//! use serde_json::json;
//!
//! #[derive(Serialize, Deserialize)]
//! enum Theme { Dark, Light }
//!
//! assert_eq!(convert_serde::<Theme>(&json!("Dark")).unwrap(), json!("Dark"));
//! assert!(convert_serde::<Theme>(&json!("Purple")).is_err());
//! ```

use prefkit_core::{ObjectCodec, ObjectCodecExt, TokenKind, TokenKinds};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConvertError;

/// Round-trips `value` through `T`.
///
/// The returned value is `T`'s own serialization, so for example a number
/// stored as `1.0` for an integer setting comes back as `1`.  Unit enum
/// variants deserialize from (and serialize to) their string name.
pub fn convert_serde<T>(value: &Value) -> Result<Value, ConvertError>
where
    T: Serialize + DeserializeOwned,
{
    let typed = T::deserialize(value).map_err(|e| ConvertError::InvalidData(e.to_string()))?;
    serde_json::to_value(&typed).map_err(|e| ConvertError::Other(Box::new(e)))
}

/// Validates `value` with a schema-checked object codec and re-encodes it.
///
/// Any decode failure is treated as invalid data.
pub fn convert_with_codec<C>(codec: &C, value: &Value) -> Result<Value, ConvertError>
where
    C: ObjectCodec + ?Sized,
{
    let decoded = codec
        .decode_value(value)
        .map_err(|e| ConvertError::InvalidData(e.to_string()))?;
    codec
        .encode_to_value(&decoded)
        .map_err(|e| ConvertError::Other(Box::new(e)))
}

/// Accepts `value` unchanged if its shape is one of `kinds`.
pub fn convert_kinds(kinds: TokenKinds, value: &Value) -> Result<Value, ConvertError> {
    let kind = TokenKind::of_value(value);
    if kinds.contains(kind) {
        Ok(value.clone())
    } else {
        Err(ConvertError::InvalidData(format!(
            "expected {kinds}, found {kind}"
        )))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
