//! Dependency reports.
//!
//! A [`DependencyReport`] is an ordered list of [`ReportGroup`]s, one per
//! package, rendered as plain text. The [`Aggregator`] builds one from a
//! [`PackageSet`](crate::package::PackageSet).

mod aggregator;
mod outcome;

use std::fmt;

use crate::package::PackageName;

pub use aggregator::Aggregator;
pub use outcome::LookupOutcome;

/// Text shown when no packages are selected.
pub const PLACEHOLDER: &str = "Add package names to see dependencies.";

/// One line of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportLine {
    /// Header, status or error text, rendered as `# text`.
    Comment(String),
    /// A dependency specifier exactly as declared by the registry.
    Requirement(String),
}

impl ReportLine {
    pub fn comment(text: impl Into<String>) -> Self {
        ReportLine::Comment(text.into())
    }

    pub fn requirement(spec: impl Into<String>) -> Self {
        ReportLine::Requirement(spec.into())
    }
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportLine::Comment(text) => write!(f, "# {}", text),
            ReportLine::Requirement(spec) => f.write_str(spec),
        }
    }
}

/// The lines reported for a single package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportGroup {
    /// `None` only for the placeholder group.
    pub package: Option<PackageName>,
    pub lines: Vec<ReportLine>,
}

impl ReportGroup {
    pub fn new(package: PackageName, lines: Vec<ReportLine>) -> Self {
        Self {
            package: Some(package),
            lines,
        }
    }

    /// Dependency specifiers in this group, in report order.
    pub fn requirements(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(|line| match line {
            ReportLine::Requirement(spec) => Some(spec.as_str()),
            ReportLine::Comment(_) => None,
        })
    }
}

impl fmt::Display for ReportGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// A fully computed report. Its `Display` form is the user-visible text:
/// groups in package order, separated by one blank line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyReport {
    groups: Vec<ReportGroup>,
}

impl DependencyReport {
    pub fn new(groups: Vec<ReportGroup>) -> Self {
        Self { groups }
    }

    /// The single-line report for an empty package set.
    pub fn placeholder() -> Self {
        Self {
            groups: vec![ReportGroup {
                package: None,
                lines: vec![ReportLine::comment(PLACEHOLDER)],
            }],
        }
    }

    /// True when the report has no package groups.
    pub fn is_placeholder(&self) -> bool {
        self.groups.iter().all(|g| g.package.is_none())
    }

    pub fn groups(&self) -> &[ReportGroup] {
        &self.groups
    }

    /// The group reported for `name`, if any.
    pub fn group(&self, name: &str) -> Option<&ReportGroup> {
        self.groups
            .iter()
            .find(|g| g.package.as_ref().is_some_and(|p| p.as_str() == name))
    }
}

impl Default for DependencyReport {
    fn default() -> Self {
        Self::placeholder()
    }
}

impl fmt::Display for DependencyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, group) in self.groups.iter().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            write!(f, "{}", group)?;
        }
        Ok(())
    }
}
