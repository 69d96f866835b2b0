//! Package set management.
//!
//! A [`PackageName`] is a validated, lowercase-normalized PyPI project name.
//! A [`PackageSet`] keeps those names unique and enumerates them in the order
//! they were added, so reports built from it are reproducible.

mod name;
mod set;

pub use name::{PackageName, ValidationError};
pub use set::PackageSet;
