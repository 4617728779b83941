//! Serde-backed doc types.
//!
//! Any `Serialize + DeserializeOwned` type can be stored without writing
//! conversion functions by hand:
//!
//! - [`json`] / [`json_named`] — UTF-8 JSON via `serde_json`
//! - [`bincode_named`] — compact binary via `bincode`

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::doctype::DocType;
use crate::error::{DocTypeError, Result};

/// JSON doc type named after the simple name of `T`.
///
/// `json::<shop::Order>()` produces a doc type named `Order`, so orders are
/// stored as `<key>.Order`.
pub fn json<T>() -> Result<DocType<T>>
where
    T: Serialize + DeserializeOwned + 'static,
{
    json_named(simple_type_name::<T>())
}

/// JSON doc type with an explicit name.
pub fn json_named<T>(name: impl Into<String>) -> Result<DocType<T>>
where
    T: Serialize + DeserializeOwned + 'static,
{
    DocType::new(
        name,
        |value: &T| serde_json::to_vec(value).map_err(|e| DocTypeError::Encode(e.to_string())),
        |bytes: &[u8]| {
            serde_json::from_slice(bytes).map_err(|e| DocTypeError::Decode(e.to_string()))
        },
    )
}

/// Bincode doc type with an explicit name.
pub fn bincode_named<T>(name: impl Into<String>) -> Result<DocType<T>>
where
    T: Serialize + DeserializeOwned + 'static,
{
    DocType::new(
        name,
        |value: &T| bincode::serialize(value).map_err(|e| DocTypeError::Encode(e.to_string())),
        |bytes: &[u8]| {
            bincode::deserialize(bytes).map_err(|e| DocTypeError::Decode(e.to_string()))
        },
    )
}

/// Last path segment of `T`'s type name, without generic arguments.
pub fn simple_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
