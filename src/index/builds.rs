//! In-flight index build registry
//!
//! Builds run in the build subsystem and register themselves here. The drop
//! operation derives `KillCriteria` from its selector and cancels every
//! matching build before touching the catalog. Cancellation is cooperative:
//! the registry sets the build's cancel flag and removes the entry, which is
//! the acknowledgment the drop path waits on; reclaiming storage for the
//! half-built index stays the build subsystem's concern.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use crate::catalog::descriptor::KeyPattern;
use crate::index::selector::IndexSelector;

/// What the drop path learns about each build it cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildDescriptor {
    pub build_id: u64,
    pub namespace: String,
    pub index_name: String,
    pub key_pattern: KeyPattern,
}

/// Handle held by the build executor; it polls `is_cancelled` at its own
/// suspension points.
#[derive(Debug, Clone)]
pub struct BuildHandle {
    build_id: u64,
    cancel_flag: Arc<AtomicBool>,
}

impl BuildHandle {
    pub fn build_id(&self) -> u64 {
        self.build_id
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Acquire)
    }
}

struct InProgressBuild {
    descriptor: BuildDescriptor,
    cancel_flag: Arc<AtomicBool>,
}

/// Which in-flight builds a drop request targets. Transient; derived from
/// the selector and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KillCriteria {
    namespace: String,
    name: Option<String>,
    key_pattern: Option<KeyPattern>,
}

impl KillCriteria {
    /// All builds on the namespace.
    pub fn for_namespace(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: None,
            key_pattern: None,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_key_pattern(mut self, pattern: KeyPattern) -> Self {
        self.key_pattern = Some(pattern);
        self
    }

    pub fn from_selector(namespace: &str, selector: &IndexSelector) -> Self {
        let criteria = Self::for_namespace(namespace);
        match selector {
            IndexSelector::AllNonPrimary => criteria,
            IndexSelector::Name(name) => criteria.with_name(name),
            IndexSelector::KeyPattern(pattern) => criteria.with_key_pattern(pattern.clone()),
        }
    }

    fn matches(&self, descriptor: &BuildDescriptor) -> bool {
        if descriptor.namespace != self.namespace {
            return false;
        }
        if let Some(name) = &self.name {
            if descriptor.index_name != *name {
                return false;
            }
        }
        if let Some(pattern) = &self.key_pattern {
            if descriptor.key_pattern != *pattern {
                return false;
            }
        }
        true
    }
}

/// Registry of index builds currently in progress, across all namespaces.
#[derive(Default)]
pub struct IndexBuildRegistry {
    builds: DashMap<u64, InProgressBuild>,
    next_build_id: AtomicU64,
}

impl IndexBuildRegistry {
    pub fn new() -> Self {
        Self {
            builds: DashMap::new(),
            next_build_id: AtomicU64::new(1),
        }
    }

    /// Called by the build subsystem when a build starts.
    pub fn register_build(
        &self,
        namespace: &str,
        index_name: &str,
        key_pattern: KeyPattern,
    ) -> BuildHandle {
        let build_id = self.next_build_id.fetch_add(1, Ordering::Relaxed);
        let cancel_flag = Arc::new(AtomicBool::new(false));
        self.builds.insert(
            build_id,
            InProgressBuild {
                descriptor: BuildDescriptor {
                    build_id,
                    namespace: namespace.to_string(),
                    index_name: index_name.to_string(),
                    key_pattern,
                },
                cancel_flag: Arc::clone(&cancel_flag),
            },
        );
        BuildHandle {
            build_id,
            cancel_flag,
        }
    }

    /// Normal completion path: the build unregisters itself.
    pub fn finish_build(&self, build_id: u64) {
        self.builds.remove(&build_id);
    }

    /// Cancel every matching build and return their descriptors. Cancelling
    /// zero builds is normal.
    pub fn cancel_matching(&self, criteria: &KillCriteria) -> Vec<BuildDescriptor> {
        let matching: Vec<u64> = self
            .builds
            .iter()
            .filter(|entry| criteria.matches(&entry.descriptor))
            .map(|entry| *entry.key())
            .collect();

        let mut cancelled = Vec::with_capacity(matching.len());
        for build_id in matching {
            if let Some((_, build)) = self.builds.remove(&build_id) {
                build.cancel_flag.store(true, Ordering::Release);
                cancelled.push(build.descriptor);
            }
        }
        cancelled.sort_by_key(|d| d.build_id);
        cancelled
    }

    pub fn in_progress(&self, namespace: &str) -> usize {
        self.builds
            .iter()
            .filter(|entry| entry.descriptor.namespace == namespace)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.builds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with_builds() -> (IndexBuildRegistry, BuildHandle, BuildHandle, BuildHandle) {
        let registry = IndexBuildRegistry::new();
        let a = registry.register_build("db.coll", "a_1", KeyPattern::ascending("a"));
        let b = registry.register_build("db.coll", "b_1", KeyPattern::ascending("b"));
        let other = registry.register_build("db.other", "a_1", KeyPattern::ascending("a"));
        (registry, a, b, other)
    }

    #[test]
    fn test_cancel_all_on_namespace() {
        let (registry, a, b, other) = registry_with_builds();

        let cancelled = registry.cancel_matching(&KillCriteria::for_namespace("db.coll"));
        assert_eq!(cancelled.len(), 2);
        assert!(a.is_cancelled());
        assert!(b.is_cancelled());
        assert!(!other.is_cancelled());
        assert_eq!(registry.in_progress("db.coll"), 0);
        assert_eq!(registry.in_progress("db.other"), 1);
    }

    #[test]
    fn test_cancel_by_name() {
        let (registry, a, b, _) = registry_with_builds();

        let criteria = KillCriteria::for_namespace("db.coll").with_name("a_1");
        let cancelled = registry.cancel_matching(&criteria);
        assert_eq!(cancelled.len(), 1);
        assert_eq!(cancelled[0].index_name, "a_1");
        assert!(a.is_cancelled());
        assert!(!b.is_cancelled());
    }

    #[test]
    fn test_cancel_by_key_pattern() {
        let (registry, a, b, _) = registry_with_builds();

        let criteria =
            KillCriteria::for_namespace("db.coll").with_key_pattern(KeyPattern::ascending("b"));
        let cancelled = registry.cancel_matching(&criteria);
        assert_eq!(cancelled.len(), 1);
        assert_eq!(cancelled[0].index_name, "b_1");
        assert!(!a.is_cancelled());
        assert!(b.is_cancelled());
    }

    #[test]
    fn test_cancel_zero_builds_is_ok() {
        let registry = IndexBuildRegistry::new();
        let cancelled = registry.cancel_matching(&KillCriteria::for_namespace("db.coll"));
        assert!(cancelled.is_empty());
    }

    #[test]
    fn test_finished_build_is_not_cancelled() {
        let registry = IndexBuildRegistry::new();
        let handle = registry.register_build("db.coll", "a_1", KeyPattern::ascending("a"));
        registry.finish_build(handle.build_id());

        let cancelled = registry.cancel_matching(&KillCriteria::for_namespace("db.coll"));
        assert!(cancelled.is_empty());
        assert!(!handle.is_cancelled());
    }

    #[test]
    fn test_criteria_from_selector() {
        let wildcard = KillCriteria::from_selector("db.coll", &IndexSelector::AllNonPrimary);
        assert_eq!(wildcard, KillCriteria::for_namespace("db.coll"));

        let by_name = KillCriteria::from_selector("db.coll", &IndexSelector::name("a_1"));
        assert_eq!(
            by_name,
            KillCriteria::for_namespace("db.coll").with_name("a_1")
        );

        let by_pattern = KillCriteria::from_selector(
            "db.coll",
            &IndexSelector::KeyPattern(KeyPattern::ascending("a")),
        );
        assert_eq!(
            by_pattern,
            KillCriteria::for_namespace("db.coll").with_key_pattern(KeyPattern::ascending("a"))
        );
    }
}
