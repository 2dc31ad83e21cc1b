//! Slug: the storage key of a counter.
//!
//! Slugs are opaque and case-sensitive. The only rule is that they are
//! non-empty once percent-decoding has happened at the HTTP boundary.

use std::fmt;

use serde::Serialize;

use crate::error::{Result, ViewCounterError};

/// Message returned to clients for an empty slug.
pub const SLUG_REQUIRED: &str = "Slug required";

/// Validated, already-decoded counter key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(ViewCounterError::Validation(SLUG_REQUIRED.into()));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn empty_slug_is_rejected() {
        let err = Slug::new("").unwrap_err();
        assert_eq!(err.to_string(), SLUG_REQUIRED);
    }

    #[test]
    fn slug_is_kept_verbatim() {
        let slug = Slug::new("Posts/Hello World").unwrap();
        assert_eq!(slug.as_str(), "Posts/Hello World");
        assert_ne!(slug, Slug::new("posts/hello world").unwrap());
    }
}
