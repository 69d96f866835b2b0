use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;

use crate::package::{PackageSet, ValidationError};
use crate::registry::Registry;
use crate::report::Aggregator;
use crate::runtime::Runtime;

use super::config::Config;
use super::export::export;

/// Extracts package names from a requirements-style list: one name per line,
/// blank lines and `#` comments ignored.
pub fn parse_package_list(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Message for a rejected input line, naming the input where the error
/// itself does not.
pub(crate) fn describe_rejection(raw: &str, error: &ValidationError) -> String {
    match error {
        ValidationError::InvalidFormat { input } => format!("'{}': {}", input, error),
        ValidationError::Empty => format!("'{}': {}", raw, error),
        ValidationError::Duplicate { .. } => error.to_string(),
    }
}

/// One-shot report: collect packages from `packages` and `file`, look them up
/// once, then print the report or save it to `output`.
#[tracing::instrument(skip(config, packages, out))]
pub async fn show<R: Runtime, G: Registry, W: Write>(
    config: Config<R, G>,
    packages: &[String],
    file: Option<&Path>,
    output: Option<&Path>,
    out: &mut W,
) -> Result<()> {
    let Config { runtime, registry } = config;

    let mut inputs = Vec::new();
    if let Some(path) = file {
        let text = runtime
            .read_to_string(path)
            .with_context(|| format!("Failed to read package list {:?}", path))?;
        inputs.extend(parse_package_list(&text));
    }
    inputs.extend(packages.iter().cloned());
    debug!("Collected {} package input(s)", inputs.len());

    let mut set = PackageSet::new();
    for raw in &inputs {
        if let Err(e) = set.add(raw) {
            debug!("Skipping {:?}: {}", raw, e.kind());
            eprintln!("warning: {}", describe_rejection(raw, &e));
        }
    }

    let report = Aggregator::new(registry).compute_report(&set).await;

    match output {
        Some(path) => {
            export(&runtime, path, &report)?;
            writeln!(out, "Saved dependencies of {} package(s) to {}", set.len(), path.display())?;
        }
        None => writeln!(out, "{}", report)?,
    }

    Ok(())
}
