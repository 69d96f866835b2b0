//! Command-line use cases.
//!
//! - `show` - one-shot report for packages given on the command line or in a file
//! - `shell` - interactive add/remove session with a live report
//! - `export` - save a report to a file

pub mod config;
mod export;
mod shell;
mod show;

pub use config::{Config, Settings};
pub use export::export;
pub use shell::{ShellCommand, shell};
pub use show::{parse_package_list, show};
