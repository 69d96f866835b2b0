//! Collect a set of PyPI packages and report the declared runtime
//! dependencies of each package's latest release.

pub mod commands;
pub mod http;
pub mod package;
pub mod registry;
pub mod report;
pub mod runtime;
pub mod session;
