use std::collections::HashSet;

use log::debug;

use super::{PackageName, ValidationError};

/// Deduplicated package names, enumerated in insertion order.
///
/// `order` drives enumeration; `index` answers membership. Both always hold
/// exactly the same names.
#[derive(Debug, Clone, Default)]
pub struct PackageSet {
    order: Vec<PackageName>,
    index: HashSet<PackageName>,
}

impl PackageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates raw input and inserts its normalized form.
    ///
    /// Fails with [`ValidationError::Duplicate`] (echoing the trimmed input
    /// as typed) when the normalized name is already present.
    pub fn add(&mut self, raw: &str) -> Result<(), ValidationError> {
        let name = PackageName::parse(raw)?;
        if self.index.contains(&name) {
            return Err(ValidationError::Duplicate {
                input: raw.trim().to_string(),
            });
        }
        debug!("Adding package {}", name);
        self.insert(name);
        Ok(())
    }

    /// Inserts an already validated name. Returns `false` if it was present.
    pub fn insert(&mut self, name: PackageName) -> bool {
        if !self.index.insert(name.clone()) {
            return false;
        }
        self.order.push(name);
        true
    }

    /// Removes a package if present. Absent names are a no-op.
    ///
    /// Returns whether anything was removed.
    pub fn remove(&mut self, identifier: &str) -> bool {
        let key = PackageName::lookup_key(identifier);
        if !self.index.remove(&key) {
            debug!("Package {} not in set, nothing to remove", key);
            return false;
        }
        self.order.retain(|name| *name != key);
        debug!("Removed package {}", key);
        true
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.index.contains(&PackageName::lookup_key(identifier))
    }

    /// Enumerates names in insertion order. Restartable and side-effect free.
    pub fn iter(&self) -> std::slice::Iter<'_, PackageName> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<'a> IntoIterator for &'a PackageSet {
    type Item = &'a PackageName;
    type IntoIter = std::slice::Iter<'a, PackageName>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
