use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Letters, digits, underscores, hyphens and periods; nothing else.
static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("package name pattern compiles"));

/// User input rejected before any network activity.
///
/// The `Display` text is what the user sees in the error slot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a package name.")]
    Empty,

    #[error(
        "Invalid package name format. Use only letters, numbers, hyphens, underscores, or periods."
    )]
    InvalidFormat { input: String },

    /// `input` keeps the casing the user typed.
    #[error("'{input}' is already added.")]
    Duplicate { input: String },
}

impl ValidationError {
    /// Short machine-readable tag for the error.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::Empty => "empty",
            ValidationError::InvalidFormat { .. } => "invalid-format",
            ValidationError::Duplicate { .. } => "duplicate",
        }
    }
}

/// A validated package identifier in its canonical lowercase form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageName(String);

impl PackageName {
    /// Trims, validates and lowercases raw user input.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty);
        }
        if !NAME_PATTERN.is_match(trimmed) {
            return Err(ValidationError::InvalidFormat {
                input: trimmed.to_string(),
            });
        }
        Ok(PackageName(trimmed.to_lowercase()))
    }

    /// Lowercases input without validating it. Used for lookups that must
    /// never fail, such as removal. The result may not be a valid name, so
    /// it only serves as a key into existing collections.
    pub(super) fn lookup_key(raw: &str) -> Self {
        PackageName(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for PackageName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PackageName::parse(s)
    }
}
