use log::{debug, info, warn};

use crate::package::PackageSet;
use crate::registry::Registry;

use super::{DependencyReport, LookupOutcome};

/// Builds dependency reports by querying a registry once per package.
pub struct Aggregator<G: Registry> {
    registry: G,
}

impl<G: Registry> Aggregator<G> {
    pub fn new(registry: G) -> Self {
        Self { registry }
    }

    /// Looks up every package in enumeration order, one request at a time,
    /// and assembles the report.
    ///
    /// A failed lookup becomes a diagnostic group; it never stops the
    /// remaining lookups. An empty set yields the placeholder without any
    /// network activity.
    #[tracing::instrument(skip(self, packages), fields(count = packages.len()))]
    pub async fn compute_report(&self, packages: &PackageSet) -> DependencyReport {
        if packages.is_empty() {
            debug!("No packages selected, returning placeholder report");
            return DependencyReport::placeholder();
        }

        let mut groups = Vec::with_capacity(packages.len());
        for name in packages {
            let outcome = LookupOutcome::from(self.registry.latest_release(name).await);
            match &outcome {
                LookupOutcome::Success(release) => debug!(
                    "{}: {} declared requirement(s)",
                    name,
                    release.requires_dist.len()
                ),
                LookupOutcome::NotFound => info!("{}: not found on {}", name, self.registry.index_url()),
                LookupOutcome::HttpError(status) => warn!("{}: HTTP status {}", name, status),
                LookupOutcome::TransportOrParseError(message) => {
                    warn!("{}: lookup failed: {}", name, message)
                }
            }
            groups.push(outcome.into_group(name));
        }

        DependencyReport::new(groups)
    }
}
