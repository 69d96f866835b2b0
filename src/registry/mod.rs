//! Registry abstraction for package metadata lookups.
//!
//! The [`Registry`] trait is the seam between the dependency aggregator and
//! the network. [`PyPiRegistry`] talks to the PyPI JSON API; tests substitute
//! [`MockRegistry`].

mod pypi;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::http::FetchError;
use crate::package::PackageName;

pub use pypi::{DEFAULT_INDEX_URL, PyPiRegistry};

/// What the registry declares about a package's latest published version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ReleaseMetadata {
    /// Project name as the registry spells it.
    pub name: Option<String>,
    pub version: Option<String>,
    /// Raw dependency specifiers in registry order. Empty when none declared.
    pub requires_dist: Vec<String>,
}

/// A package index that can describe the latest release of a package.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Registry: Send + Sync {
    /// Base URL of the index.
    fn index_url(&self) -> &str;

    /// Fetch metadata for the latest published version of `name`.
    async fn latest_release(&self, name: &PackageName) -> Result<ReleaseMetadata, FetchError>;
}
