use std::path::Path;

use anyhow::{Context, Result, bail};
use log::info;

use crate::report::DependencyReport;
use crate::runtime::Runtime;

/// Writes the report text to `path`.
///
/// Refuses to write the placeholder or an empty report.
#[tracing::instrument(skip(runtime, report))]
pub fn export<R: Runtime>(runtime: &R, path: &Path, report: &DependencyReport) -> Result<()> {
    let text = report.to_string();
    if report.is_placeholder() || text.trim().is_empty() {
        bail!("Nothing to copy!");
    }

    runtime
        .write(path, format!("{}\n", text).as_bytes())
        .with_context(|| format!("Failed to save report to {:?}", path))?;
    info!("Saved report to {:?}", path);
    Ok(())
}
