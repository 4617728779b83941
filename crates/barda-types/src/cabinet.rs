//! Cabinet name validation.
//!
//! A cabinet name becomes a single directory under the store root, so it
//! must be one non-empty path segment:
//! - Must not be `.` or `..`
//! - Must not contain `/`, `\` or NUL

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Characters that would split or truncate the cabinet path segment.
const FORBIDDEN_CHARS: &[char] = &['/', '\\', '\0'];

/// Validate a cabinet name, returning `Ok(())` if valid.
///
/// # Examples
///
/// ```
/// use barda_types::validate_cabinet_name;
///
/// assert!(validate_cabinet_name("orders").is_ok());
/// assert!(validate_cabinet_name("").is_err());
/// assert!(validate_cabinet_name("../etc").is_err());
/// ```
pub fn validate_cabinet_name(name: &str) -> Result<(), TypeError> {
    let invalid = |reason: &str| TypeError::InvalidCabinetName {
        name: name.to_string(),
        reason: reason.into(),
    };

    if name.is_empty() {
        return Err(invalid("cabinet name must not be empty"));
    }

    if name == "." || name == ".." {
        return Err(invalid("cabinet name must not be a relative directory marker"));
    }

    if let Some(ch) = name.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        return Err(invalid(&format!("contains forbidden character: {ch:?}")));
    }

    Ok(())
}

/// A validated cabinet name.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CabinetName(String);

impl CabinetName {
    /// Validate and wrap a cabinet name.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        validate_cabinet_name(&name)?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CabinetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CabinetName({})", self.0)
    }
}

impl fmt::Display for CabinetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CabinetName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CabinetName {
    type Error = TypeError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::new(name)
    }
}

impl TryFrom<&str> for CabinetName {
    type Error = TypeError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        Self::new(name)
    }
}

impl From<CabinetName> for String {
    fn from(name: CabinetName) -> Self {
        name.0
    }
}
