//! End-of-build install coordination
//!
//! In a multi-module build every module reports its install outcome here.
//! When `install-at-end` is requested, batches are retained until the last
//! participating module has reported, then flushed in declaration order as
//! one store call per module. The coordinator is an explicit per-build
//! object shared by reference between build workers; all state lives behind
//! one mutex so two workers can never both decide they are "the last one".

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::batch::InstallBatch;
use crate::error::{Result, build_graph_inconsistency, store_rejected};
use crate::project::ModuleId;
use crate::store::RepositoryStore;

/// Terminal phase of a module's install step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModulePhase {
    Skipped,
    Installed,
    Deferred,
}

/// What a module's install step decided to do.
#[derive(Debug)]
pub enum ModuleDisposition {
    /// Installation bypassed; no store call now or at flush time.
    Skip,
    /// Install immediately and synchronously.
    Install(InstallBatch),
    /// Retain the batch until every module has reported.
    Defer(InstallBatch),
}

struct ModuleState {
    phase: ModulePhase,
    pending: Option<InstallBatch>,
}

struct CoordinatorState {
    /// Modules carrying an install step, in build declaration order.
    declared: Vec<ModuleId>,
    declared_set: HashSet<ModuleId>,
    /// Modules that have entered `submit`; guards against double reports
    /// while an immediate install runs outside the lock.
    reported: HashSet<ModuleId>,
    phases: HashMap<ModuleId, ModuleState>,
    flushed: bool,
}

/// Per-build aggregator for the install-at-end protocol.
pub struct BuildInstallCoordinator {
    store: Arc<dyn RepositoryStore>,
    state: Mutex<CoordinatorState>,
}

impl BuildInstallCoordinator {
    /// `declared` lists the modules that carry an install step, in the order
    /// they appear in the build; flush order follows it regardless of the
    /// order modules finish.
    pub fn new(declared: Vec<ModuleId>, store: Arc<dyn RepositoryStore>) -> Self {
        let declared_set = declared.iter().cloned().collect();
        Self {
            store,
            state: Mutex::new(CoordinatorState {
                declared,
                declared_set,
                reported: HashSet::new(),
                phases: HashMap::new(),
                flushed: false,
            }),
        }
    }

    /// Records one module's install outcome, exactly once per module per
    /// build. Immediate installs happen before returning; the end-of-build
    /// flush runs inside the call that completes the build.
    pub fn submit(&self, id: &ModuleId, disposition: ModuleDisposition) -> Result<()> {
        self.register(id)?;

        let (phase, pending) = match disposition {
            ModuleDisposition::Skip => (ModulePhase::Skipped, None),
            ModuleDisposition::Defer(batch) => (ModulePhase::Deferred, Some(batch)),
            ModuleDisposition::Install(batch) => {
                // The store call runs outside the lock so different modules'
                // installs may interleave. The flush cannot race past us:
                // this module has no phase yet, so the all-terminal check
                // fails until we record below.
                if let Err(e) = self.store.install(batch) {
                    self.unregister(id);
                    return Err(e);
                }
                (ModulePhase::Installed, None)
            }
        };

        self.record_and_maybe_flush(id, phase, pending)
    }

    /// Phase a module ended in, if it has reported.
    pub fn phase(&self, id: &ModuleId) -> Option<ModulePhase> {
        #[allow(clippy::unwrap_used)] // mutex poisoning is unrecoverable here
        let state = self.state.lock().unwrap();
        state.phases.get(id).map(|s| s.phase)
    }

    /// Whether the end-of-build flush has run.
    pub fn is_flushed(&self) -> bool {
        #[allow(clippy::unwrap_used)]
        let state = self.state.lock().unwrap();
        state.flushed
    }

    fn register(&self, id: &ModuleId) -> Result<()> {
        #[allow(clippy::unwrap_used)]
        let mut state = self.state.lock().unwrap();
        if !state.declared_set.contains(id) {
            return Err(build_graph_inconsistency(format!(
                "module {id} reported an install step but is not part of this build"
            )));
        }
        if state.flushed {
            return Err(build_graph_inconsistency(format!(
                "module {id} reported after the end-of-build flush already ran"
            )));
        }
        if !state.reported.insert(id.clone()) {
            return Err(build_graph_inconsistency(format!(
                "module {id} reported its install step twice"
            )));
        }
        Ok(())
    }

    fn unregister(&self, id: &ModuleId) {
        #[allow(clippy::unwrap_used)]
        let mut state = self.state.lock().unwrap();
        state.reported.remove(id);
    }

    /// Records the terminal phase and, if this was the last module, flushes
    /// all deferred batches while still holding the lock. The decision and
    /// the flush are one atomic step relative to other transitions.
    fn record_and_maybe_flush(
        &self,
        id: &ModuleId,
        phase: ModulePhase,
        pending: Option<InstallBatch>,
    ) -> Result<()> {
        #[allow(clippy::unwrap_used)]
        let mut state = self.state.lock().unwrap();
        state.phases.insert(id.clone(), ModuleState { phase, pending });

        let all_terminal = state
            .declared
            .iter()
            .all(|module| state.phases.contains_key(module));
        if !all_terminal || state.flushed {
            return Ok(());
        }
        state.flushed = true;

        // Flush in declaration order, one store call per module so errors
        // stay attributable. Best-effort drain: keep going past failures.
        let mut failures: Vec<String> = Vec::new();
        let order = state.declared.clone();
        for module in &order {
            let batch = state
                .phases
                .get_mut(module)
                .filter(|s| s.phase == ModulePhase::Deferred)
                .and_then(|s| s.pending.take());
            if let Some(batch) = batch {
                if let Err(e) = self.store.install(batch) {
                    failures.push(format!("{module}: {e}"));
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(store_rejected(format!(
                "deferred install failed for {} module(s): {}",
                failures.len(),
                failures.join("; ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::ArtifactRecord;
    use crate::coordinate::ArtifactCoordinate;
    use crate::error::MinstallError;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store double that records the artifactId of each installed batch.
    #[derive(Default)]
    struct RecordingStore {
        calls: Mutex<Vec<String>>,
        fail_on: Option<String>,
    }

    impl RecordingStore {
        fn failing_on(artifact_id: &str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on: Some(artifact_id.to_string()),
            }
        }

        fn installed(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl RepositoryStore for RecordingStore {
        fn path_for_local_artifact(&self, coordinate: &ArtifactCoordinate) -> PathBuf {
            PathBuf::from("/repo").join(&coordinate.artifact_id)
        }

        fn install(&self, batch: InstallBatch) -> Result<()> {
            let id = batch.records()[0].coordinate.artifact_id.clone();
            self.calls.lock().unwrap().push(id.clone());
            if self.fail_on.as_deref() == Some(id.as_str()) {
                return Err(store_rejected(format!("simulated failure for {id}")));
            }
            Ok(())
        }
    }

    fn module_id(artifact_id: &str) -> ModuleId {
        ModuleId::new("com.x", artifact_id, "1.0")
    }

    fn batch_for(artifact_id: &str) -> InstallBatch {
        let mut batch = InstallBatch::new();
        batch.add(ArtifactRecord::new(
            ArtifactCoordinate::new("com.x", artifact_id, "1.0", "", "pom"),
            format!("/w/{artifact_id}/pom.xml"),
        ));
        batch
    }

    #[test]
    fn test_immediate_install_calls_store_synchronously() {
        let store = Arc::new(RecordingStore::default());
        let coordinator = BuildInstallCoordinator::new(vec![module_id("m1")], store.clone());

        coordinator
            .submit(&module_id("m1"), ModuleDisposition::Install(batch_for("m1")))
            .unwrap();

        assert_eq!(store.installed(), vec!["m1"]);
        assert_eq!(coordinator.phase(&module_id("m1")), Some(ModulePhase::Installed));
    }

    #[test]
    fn test_flush_runs_in_declaration_order_not_completion_order() {
        let store = Arc::new(RecordingStore::default());
        let declared = vec![module_id("m1"), module_id("m2"), module_id("m3")];
        let coordinator = BuildInstallCoordinator::new(declared, store.clone());

        // Completion order m3, m1, m2 simulates parallel execution.
        coordinator
            .submit(&module_id("m3"), ModuleDisposition::Defer(batch_for("m3")))
            .unwrap();
        coordinator
            .submit(&module_id("m1"), ModuleDisposition::Defer(batch_for("m1")))
            .unwrap();
        assert!(store.installed().is_empty());
        assert!(!coordinator.is_flushed());

        coordinator
            .submit(&module_id("m2"), ModuleDisposition::Defer(batch_for("m2")))
            .unwrap();

        assert!(coordinator.is_flushed());
        assert_eq!(store.installed(), vec!["m1", "m2", "m3"]);
    }

    #[test]
    fn test_skipped_module_never_reaches_store_and_never_blocks() {
        let store = Arc::new(RecordingStore::default());
        let declared = vec![module_id("m1"), module_id("m2")];
        let coordinator = BuildInstallCoordinator::new(declared, store.clone());

        coordinator
            .submit(&module_id("m1"), ModuleDisposition::Skip)
            .unwrap();
        coordinator
            .submit(&module_id("m2"), ModuleDisposition::Defer(batch_for("m2")))
            .unwrap();

        assert!(coordinator.is_flushed());
        assert_eq!(store.installed(), vec!["m2"]);
        assert_eq!(coordinator.phase(&module_id("m1")), Some(ModulePhase::Skipped));
    }

    #[test]
    fn test_mixed_immediate_and_deferred() {
        let store = Arc::new(RecordingStore::default());
        let declared = vec![module_id("m1"), module_id("m2"), module_id("m3")];
        let coordinator = BuildInstallCoordinator::new(declared, store.clone());

        coordinator
            .submit(&module_id("m2"), ModuleDisposition::Install(batch_for("m2")))
            .unwrap();
        coordinator
            .submit(&module_id("m1"), ModuleDisposition::Defer(batch_for("m1")))
            .unwrap();
        coordinator
            .submit(&module_id("m3"), ModuleDisposition::Defer(batch_for("m3")))
            .unwrap();

        // m2 went immediately, the deferred pair flushed in declaration order.
        assert_eq!(store.installed(), vec!["m2", "m1", "m3"]);
    }

    #[test]
    fn test_double_report_is_build_graph_inconsistency() {
        let store = Arc::new(RecordingStore::default());
        let declared = vec![module_id("m1"), module_id("m2")];
        let coordinator = BuildInstallCoordinator::new(declared, store);

        coordinator
            .submit(&module_id("m1"), ModuleDisposition::Skip)
            .unwrap();
        let err = coordinator
            .submit(&module_id("m1"), ModuleDisposition::Skip)
            .unwrap_err();
        assert!(matches!(err, MinstallError::BuildGraphInconsistency { .. }));
        assert!(err.to_string().contains("twice"));
    }

    #[test]
    fn test_undeclared_module_is_build_graph_inconsistency() {
        let store = Arc::new(RecordingStore::default());
        let coordinator = BuildInstallCoordinator::new(vec![module_id("m1")], store);

        let err = coordinator
            .submit(&module_id("ghost"), ModuleDisposition::Skip)
            .unwrap_err();
        assert!(matches!(err, MinstallError::BuildGraphInconsistency { .. }));
    }

    #[test]
    fn test_failed_immediate_install_surfaces_store_error() {
        let store = Arc::new(RecordingStore::failing_on("m1"));
        let declared = vec![module_id("m1"), module_id("m2")];
        let coordinator = BuildInstallCoordinator::new(declared, store.clone());

        let err = coordinator
            .submit(&module_id("m1"), ModuleDisposition::Install(batch_for("m1")))
            .unwrap_err();
        assert!(err.to_string().contains("simulated failure for m1"));
        assert_eq!(coordinator.phase(&module_id("m1")), None);
    }

    #[test]
    fn test_flush_drains_past_failures() {
        let store = Arc::new(RecordingStore::failing_on("m2"));
        let declared = vec![module_id("m1"), module_id("m2"), module_id("m3")];
        let coordinator = BuildInstallCoordinator::new(declared, store.clone());

        coordinator
            .submit(&module_id("m1"), ModuleDisposition::Defer(batch_for("m1")))
            .unwrap();
        coordinator
            .submit(&module_id("m2"), ModuleDisposition::Defer(batch_for("m2")))
            .unwrap();
        let err = coordinator
            .submit(&module_id("m3"), ModuleDisposition::Defer(batch_for("m3")))
            .unwrap_err();

        // m3's store call was still attempted after m2 failed.
        assert_eq!(store.installed(), vec!["m1", "m2", "m3"]);
        assert!(err.to_string().contains("m2"));
        assert!(err.to_string().contains("simulated failure"));
    }

    #[test]
    fn test_concurrent_submissions_flush_exactly_once() {
        let store = Arc::new(RecordingStore::default());
        let declared: Vec<ModuleId> = (0..8).map(|i| module_id(&format!("m{i}"))).collect();
        let coordinator = Arc::new(BuildInstallCoordinator::new(declared.clone(), store.clone()));
        let flush_errors = Arc::new(AtomicUsize::new(0));

        std::thread::scope(|scope| {
            // Submit in reverse order from separate threads.
            for id in declared.iter().rev() {
                let coordinator = Arc::clone(&coordinator);
                let flush_errors = Arc::clone(&flush_errors);
                scope.spawn(move || {
                    let batch = batch_for(&id.artifact_id);
                    if coordinator.submit(id, ModuleDisposition::Defer(batch)).is_err() {
                        flush_errors.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });

        assert_eq!(flush_errors.load(Ordering::SeqCst), 0);
        assert!(coordinator.is_flushed());
        // Exactly one flush, in declaration order.
        let expected: Vec<String> = (0..8).map(|i| format!("m{i}")).collect();
        assert_eq!(store.installed(), expected);
    }
}
