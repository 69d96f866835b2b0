//! Interactive session state.
//!
//! A [`Session`] owns the selected packages, the last validation message and
//! the visible report. Every successful mutation recomputes the whole report.
//! Recomputations are tagged with a generation from [`ReportSlot`] so a slow,
//! superseded computation can never overwrite a newer result.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::debug;

use crate::package::{PackageName, PackageSet, ValidationError};
use crate::registry::Registry;
use crate::report::{Aggregator, DependencyReport};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The single visible report, guarded by a generation counter.
pub struct ReportSlot {
    latest: AtomicU64,
    published: Mutex<Published>,
}

struct Published {
    generation: u64,
    report: DependencyReport,
}

impl ReportSlot {
    /// Starts at generation 0 showing the placeholder.
    pub fn new() -> Self {
        Self {
            latest: AtomicU64::new(0),
            published: Mutex::new(Published {
                generation: 0,
                report: DependencyReport::placeholder(),
            }),
        }
    }

    /// Reserves the next generation. Only the most recently reserved
    /// generation may publish.
    pub fn begin(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Replaces the visible report if `generation` is still the latest.
    /// Returns whether the report was written.
    pub fn publish(&self, generation: u64, report: DependencyReport) -> bool {
        let mut published = lock(&self.published);
        let latest = self.latest.load(Ordering::SeqCst);
        if generation != latest || generation <= published.generation {
            debug!(
                "Discarding stale report (generation {}, latest {})",
                generation, latest
            );
            return false;
        }
        published.generation = generation;
        published.report = report;
        true
    }

    pub fn current(&self) -> DependencyReport {
        lock(&self.published).report.clone()
    }

    /// Generation of the report currently visible.
    pub fn generation(&self) -> u64 {
        lock(&self.published).generation
    }
}

impl Default for ReportSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// What the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub report: String,
    pub error: Option<String>,
}

pub struct Session<G: Registry> {
    aggregator: Aggregator<G>,
    packages: Mutex<PackageSet>,
    error: Mutex<Option<String>>,
    report: ReportSlot,
}

impl<G: Registry> Session<G> {
    pub fn new(registry: G) -> Self {
        Self {
            aggregator: Aggregator::new(registry),
            packages: Mutex::new(PackageSet::new()),
            error: Mutex::new(None),
            report: ReportSlot::new(),
        }
    }

    /// Validates and adds a package, then recomputes the report.
    ///
    /// On rejection the message lands in the error slot and the report is
    /// left untouched.
    pub async fn add(&self, raw: &str) -> Result<(), ValidationError> {
        self.set_error(None);

        let (generation, snapshot) = {
            let mut packages = lock(&self.packages);
            if let Err(e) = packages.add(raw) {
                debug!("Rejected '{}': {}", raw.trim(), e.kind());
                self.set_error(Some(e.to_string()));
                return Err(e);
            }
            (self.report.begin(), packages.clone())
        };

        self.recompute(generation, snapshot).await;
        Ok(())
    }

    /// Removes a package (absent names are a no-op) and recomputes the report.
    pub async fn remove(&self, identifier: &str) -> bool {
        self.set_error(None);

        let (removed, generation, snapshot) = {
            let mut packages = lock(&self.packages);
            let removed = packages.remove(identifier);
            (removed, self.report.begin(), packages.clone())
        };

        self.recompute(generation, snapshot).await;
        removed
    }

    /// Recomputes the report for the current selection without changing it.
    pub async fn refresh(&self) {
        let (generation, snapshot) = {
            let packages = lock(&self.packages);
            (self.report.begin(), packages.clone())
        };
        self.recompute(generation, snapshot).await;
    }

    async fn recompute(&self, generation: u64, snapshot: PackageSet) {
        let report = self.aggregator.compute_report(&snapshot).await;
        if self.report.publish(generation, report) {
            debug!("Published report generation {}", generation);
        }
    }

    /// Selected packages in insertion order.
    pub fn packages(&self) -> Vec<PackageName> {
        lock(&self.packages).iter().cloned().collect()
    }

    pub fn report(&self) -> DependencyReport {
        self.report.current()
    }

    pub fn error_message(&self) -> Option<String> {
        lock(&self.error).clone()
    }

    pub fn view(&self) -> View {
        View {
            report: self.report().to_string(),
            error: self.error_message(),
        }
    }

    fn set_error(&self, message: Option<String>) {
        *lock(&self.error) = message;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::FetchError;
    use crate::registry::{MockRegistry, ReleaseMetadata};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::time::Duration;

    fn release(requires: &[&str]) -> ReleaseMetadata {
        ReleaseMetadata {
            name: None,
            version: None,
            requires_dist: requires.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn mock_registry() -> MockRegistry {
        let mut registry = MockRegistry::new();
        registry
            .expect_index_url()
            .return_const("https://pypi.org".to_string());
        registry
    }

    /// Registry that answers every package with no requirements after a
    /// per-package delay.
    struct DelayedRegistry {
        delays: HashMap<String, Duration>,
    }

    #[async_trait]
    impl Registry for DelayedRegistry {
        fn index_url(&self) -> &str {
            "https://pypi.org"
        }

        async fn latest_release(&self, name: &PackageName) -> Result<ReleaseMetadata, FetchError> {
            if let Some(delay) = self.delays.get(name.as_str()) {
                tokio::time::sleep(*delay).await;
            }
            Ok(release(&["dep"]))
        }
    }

    #[test]
    fn test_report_slot_rejects_stale_generation() {
        let slot = ReportSlot::new();
        let first = slot.begin();
        let second = slot.begin();
        assert!(second > first);

        let newer = DependencyReport::new(vec![]);
        assert!(slot.publish(second, newer.clone()));
        assert_eq!(slot.generation(), second);

        assert!(!slot.publish(first, DependencyReport::placeholder()));
        assert_eq!(slot.current(), newer);
    }

    #[test]
    fn test_report_slot_rejects_superseded_before_publish() {
        let slot = ReportSlot::new();
        let first = slot.begin();
        let _second = slot.begin();

        assert!(!slot.publish(first, DependencyReport::new(vec![])));
        assert_eq!(slot.generation(), 0);
        assert!(slot.current().is_placeholder());
    }

    #[tokio::test]
    async fn test_new_session_shows_placeholder() {
        let session = Session::new(mock_registry());
        let view = session.view();
        assert_eq!(view.report, "# Add package names to see dependencies.");
        assert_eq!(view.error, None);
    }

    #[tokio::test]
    async fn test_add_recomputes_report() {
        let mut registry = mock_registry();
        registry
            .expect_latest_release()
            .times(1)
            .returning(|_| Ok(release(&["urllib3", "certifi"])));

        let session = Session::new(registry);
        session.add("Requests").await.unwrap();

        assert_eq!(session.packages()[0].as_str(), "requests");
        assert_eq!(
            session.view().report,
            "# Dependencies for requests (latest version):\ncertifi\nurllib3"
        );
    }

    #[tokio::test]
    async fn test_validation_error_sets_error_slot_without_lookup() {
        let mut registry = mock_registry();
        registry.expect_latest_release().never();

        let session = Session::new(registry);
        let err = session.add("foo/bar").await.unwrap_err();

        assert_eq!(err.kind(), "invalid-format");
        let view = session.view();
        assert!(view.error.unwrap().starts_with("Invalid package name format."));
        assert_eq!(view.report, "# Add package names to see dependencies.");
    }

    #[tokio::test]
    async fn test_duplicate_add_keeps_single_entry() {
        let mut registry = mock_registry();
        registry
            .expect_latest_release()
            .times(1)
            .returning(|_| Ok(release(&[])));

        let session = Session::new(registry);
        session.add("flask").await.unwrap();
        let err = session.add("FLASK").await.unwrap_err();

        assert_eq!(err.kind(), "duplicate");
        assert_eq!(session.packages().len(), 1);
        assert_eq!(
            session.error_message().as_deref(),
            Some("'FLASK' is already added.")
        );
    }

    #[tokio::test]
    async fn test_successful_mutation_clears_error() {
        let mut registry = mock_registry();
        registry
            .expect_latest_release()
            .returning(|_| Ok(release(&[])));

        let session = Session::new(registry);
        assert!(session.add("").await.is_err());
        assert!(session.error_message().is_some());

        session.add("six").await.unwrap();
        assert_eq!(session.error_message(), None);
    }

    #[tokio::test]
    async fn test_remove_absent_is_noop_and_recomputes() {
        let mut registry = mock_registry();
        registry
            .expect_latest_release()
            .times(2)
            .returning(|_| Ok(release(&["a"])));

        let session = Session::new(registry);
        session.add("six").await.unwrap();
        assert!(!session.remove("missing").await);
        assert_eq!(session.packages().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_last_package_restores_placeholder() {
        let mut registry = mock_registry();
        registry
            .expect_latest_release()
            .times(1)
            .returning(|_| Ok(release(&["a"])));

        let session = Session::new(registry);
        session.add("six").await.unwrap();
        assert!(session.remove("six").await);
        assert!(session.report().is_placeholder());
    }

    #[tokio::test]
    async fn test_slow_superseded_computation_is_discarded() {
        let registry = DelayedRegistry {
            delays: HashMap::from([("slow".to_string(), Duration::from_millis(200))]),
        };
        let session = Session::new(registry);

        let (added, removed) = tokio::join!(session.add("slow"), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            session.remove("slow").await
        });

        assert!(added.is_ok());
        assert!(removed);
        assert!(session.packages().is_empty());
        assert!(session.report().is_placeholder());
        assert_eq!(session.report.generation(), 2);
    }

    #[tokio::test]
    async fn test_refresh_recomputes_current_selection() {
        let mut registry = mock_registry();
        registry
            .expect_latest_release()
            .times(2)
            .returning(|_| Err(FetchError::Status(503)));

        let session = Session::new(registry);
        session.add("six").await.unwrap();
        session.refresh().await;

        assert_eq!(
            session.view().report,
            "# Error fetching 'six': HTTP Status 503"
        );
    }
}
