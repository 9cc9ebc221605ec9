//! URL handling module for Link-Atlas
//!
//! This module provides the canonical page key type, origin capture from the
//! seed URL, and the same-origin link normalizer used by graph crawls.

mod normalize;
mod origin;

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

// Re-export main functions
pub use normalize::{canonical_form, normalize};
pub use origin::{parse_seed, Origin};

/// A normalized absolute page URL, used as an opaque key
///
/// Two `PageUrl`s that denote the same resource compare equal: scheme, host,
/// port and path only, no query or fragment, no trailing slash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageUrl(String);

impl PageUrl {
    /// Wraps an already-canonical URL string
    pub(crate) fn from_canonical(canonical: String) -> Self {
        Self(canonical)
    }

    /// Returns the URL as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the key and returns the underlying string
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PageUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lets graph lookups use plain `&str` keys.
impl Borrow<str> for PageUrl {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<PageUrl> for String {
    fn from(url: PageUrl) -> Self {
        url.0
    }
}
