use crate::http::FetchError;
use crate::package::PackageName;
use crate::registry::ReleaseMetadata;

use super::{ReportGroup, ReportLine};

/// Classified result of one metadata lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    NotFound,
    HttpError(u16),
    TransportOrParseError(String),
    Success(ReleaseMetadata),
}

impl From<Result<ReleaseMetadata, FetchError>> for LookupOutcome {
    fn from(result: Result<ReleaseMetadata, FetchError>) -> Self {
        match result {
            Ok(release) => LookupOutcome::Success(release),
            Err(FetchError::NotFound) => LookupOutcome::NotFound,
            Err(FetchError::Status(status)) => LookupOutcome::HttpError(status),
            Err(FetchError::Transport(message))
            | Err(FetchError::Timeout(message))
            | Err(FetchError::Decode(message)) => LookupOutcome::TransportOrParseError(message),
        }
    }
}

impl LookupOutcome {
    /// Renders the outcome as the report group for `name`.
    ///
    /// Failures produce a single diagnostic line that names the package.
    /// Successes produce a header followed by the requirements in ordinal
    /// order, or a "no direct dependencies" line.
    pub fn into_group(self, name: &PackageName) -> ReportGroup {
        let lines = match self {
            LookupOutcome::NotFound => vec![ReportLine::comment(format!(
                "Error: Package '{}' not found on PyPI.",
                name
            ))],
            LookupOutcome::HttpError(status) => vec![ReportLine::comment(format!(
                "Error fetching '{}': HTTP Status {}",
                name, status
            ))],
            LookupOutcome::TransportOrParseError(message) => vec![ReportLine::comment(format!(
                "Network Error fetching '{}': {}",
                name, message
            ))],
            LookupOutcome::Success(release) => {
                let header = match release.version.as_deref() {
                    Some(version) => {
                        format!("Dependencies for {} {} (latest version):", name, version)
                    }
                    None => format!("Dependencies for {} (latest version):", name),
                };

                let mut requires = release.requires_dist;
                requires.sort();

                let mut lines = Vec::with_capacity(requires.len() + 1);
                lines.push(ReportLine::comment(header));
                if requires.is_empty() {
                    lines.push(ReportLine::comment("No direct dependencies found."));
                } else {
                    lines.extend(requires.into_iter().map(ReportLine::Requirement));
                }
                lines
            }
        };

        ReportGroup::new(name.clone(), lines)
    }
}
