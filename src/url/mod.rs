//! URL handling module for kb-harvest
//!
//! This module provides URL normalization, host extraction, and the
//! same-host filter that keeps a crawl on its origin site.

mod domain;
mod normalize;

use serde::{Serialize, Serializer};
use std::fmt;
use url::Url;

// Re-export main functions
pub use domain::{extract_domain, same_host};
pub use normalize::{normalize, normalize_entry};

/// A URL in canonical form
///
/// Values of this type can only be produced by [`normalize`] and
/// [`normalize_entry`], so they always carry an `http`/`https` scheme, a
/// host, no fragment and a normalized path. Two values compare equal iff
/// their string forms are identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedUrl(Url);

impl NormalizedUrl {
    /// Returns the canonical string form
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the underlying parsed URL
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Returns the lowercase host
    pub fn host(&self) -> &str {
        self.0.host_str().unwrap_or("")
    }

    /// Returns the normalized path (always starts with `/`)
    pub fn path(&self) -> &str {
        self.0.path()
    }

    /// Consumes the wrapper and returns the parsed URL
    pub fn into_url(self) -> Url {
        self.0
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for NormalizedUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Serialize for NormalizedUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
