//! Resolution and caching of the running PixPin executable's path.
//!
//! Enumerating processes and reading their executable paths is slow, so the
//! result is cached until [`ExecutableResolver::refresh`] runs. When nothing
//! is found the configured fallback path is used instead.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLock};

use tracing::{debug, info};

use crate::process::ProcessTable;

/// Cached outcome of the last detection pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathState {
    /// No detection has run yet.
    Unresolved,
    Resolved(PathBuf),
    NotFound,
}

impl PathState {
    pub fn path(&self) -> Option<&Path> {
        match self {
            PathState::Resolved(path) => Some(path),
            _ => None,
        }
    }
}

/// Find the executable of the first running process named `name`.
///
/// Never fails: enumeration errors, unreadable executable paths and paths
/// that no longer exist on disk all yield [`PathState::NotFound`].
pub fn detect<T: ProcessTable>(table: &T, name: &str) -> PathState {
    let entries = match table.list_by_name(name) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Process enumeration failed: {}", e);
            return PathState::NotFound;
        }
    };

    let Some(first) = entries.into_iter().next() else {
        debug!("No running process named '{}'", name);
        return PathState::NotFound;
    };

    match first.main_module_path {
        Some(path) if path.exists() => {
            info!("Detected PixPin at {}", path.display());
            PathState::Resolved(path)
        }
        Some(path) => {
            debug!("Detected path {} does not exist", path.display());
            PathState::NotFound
        }
        None => {
            debug!("Executable path of pid {} is not readable", first.pid);
            PathState::NotFound
        }
    }
}

/// Lazily detected, cached executable path.
pub struct ExecutableResolver<T> {
    table: T,
    process_name: String,
    fallback: PathBuf,
    state: RwLock<PathState>,
    /// Serialises detection so concurrent refreshes never interleave.
    detecting: Mutex<()>,
}

impl<T: ProcessTable> ExecutableResolver<T> {
    pub fn new(table: T, process_name: impl Into<String>, fallback: impl Into<PathBuf>) -> Self {
        Self {
            table,
            process_name: process_name.into(),
            fallback: fallback.into(),
            state: RwLock::new(PathState::Unresolved),
            detecting: Mutex::new(()),
        }
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    pub fn process_name(&self) -> &str {
        &self.process_name
    }

    /// Snapshot of the cache without triggering detection.
    pub fn state(&self) -> PathState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Cached path, detecting first if nothing has been resolved yet.
    pub fn cached_path(&self) -> Option<PathBuf> {
        match self.state() {
            PathState::Resolved(path) => Some(path),
            PathState::NotFound => None,
            PathState::Unresolved => self
                .detect_unless(|state| *state != PathState::Unresolved)
                .path()
                .map(Path::to_path_buf),
        }
    }

    /// Like [`Self::cached_path`], but a cached miss is detected again.
    ///
    /// For liveness checks: PixPin may have been started by someone else
    /// since the last pass found nothing.
    pub fn detected_path(&self) -> Option<PathBuf> {
        match self.state() {
            PathState::Resolved(path) => Some(path),
            PathState::Unresolved | PathState::NotFound => self
                .detect_unless(|state| matches!(state, PathState::Resolved(_)))
                .path()
                .map(Path::to_path_buf),
        }
    }

    /// Path to launch: the cached path, or the fallback when none was found.
    pub fn current_path(&self) -> PathBuf {
        match self.cached_path() {
            Some(path) => {
                debug!("Using cached executable path {}", path.display());
                path
            }
            None => self.fallback.clone(),
        }
    }

    /// Detect again and replace the cache.
    ///
    /// Readers keep seeing the previous state until the new one is stored.
    pub fn refresh(&self) -> PathState {
        let _detecting = self.detecting.lock().unwrap_or_else(PoisonError::into_inner);
        let state = detect(&self.table, &self.process_name);
        self.store(state.clone());
        state
    }

    fn detect_unless(&self, settled: impl Fn(&PathState) -> bool) -> PathState {
        let _detecting = self.detecting.lock().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have finished detection while we waited.
        let current = self.state();
        if settled(&current) {
            return current;
        }
        let state = detect(&self.table, &self.process_name);
        self.store(state.clone());
        state
    }

    fn store(&self, state: PathState) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::fakes::FakeTable;
    use crate::process::ProcessEntry;
    use std::io;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::mpsc;

    fn existing_executable() -> tempfile::NamedTempFile {
        tempfile::NamedTempFile::new().unwrap()
    }

    #[test]
    fn test_detect_existing_path() {
        let exe = existing_executable();
        let table = FakeTable::with_path(exe.path());
        assert_eq!(
            detect(&table, "pixpin"),
            PathState::Resolved(exe.path().to_path_buf())
        );
    }

    #[test]
    fn test_detect_missing_path_is_not_found() {
        let table = FakeTable::with_path("/nonexistent/pixpin.exe");
        assert_eq!(detect(&table, "pixpin"), PathState::NotFound);
    }

    #[test]
    fn test_detect_unreadable_path_is_not_found() {
        let table = FakeTable::empty();
        table.set_running(None);
        assert_eq!(detect(&table, "pixpin"), PathState::NotFound);
    }

    #[test]
    fn test_detect_enumeration_error_is_not_found() {
        let table = FakeTable::empty();
        *table.fail.lock().unwrap() = true;
        assert_eq!(detect(&table, "pixpin"), PathState::NotFound);
    }

    #[test]
    fn test_detect_uses_first_match() {
        struct TwoProcesses(PathBuf, PathBuf);
        impl ProcessTable for TwoProcesses {
            fn list_by_name(&self, _name: &str) -> io::Result<Vec<ProcessEntry>> {
                Ok(vec![
                    ProcessEntry {
                        pid: 1,
                        main_module_path: Some(self.0.clone()),
                    },
                    ProcessEntry {
                        pid: 2,
                        main_module_path: Some(self.1.clone()),
                    },
                ])
            }
        }

        let first = existing_executable();
        let second = existing_executable();
        let table = TwoProcesses(first.path().to_path_buf(), second.path().to_path_buf());
        assert_eq!(
            detect(&table, "pixpin"),
            PathState::Resolved(first.path().to_path_buf())
        );
    }

    #[test]
    fn test_current_path_is_cached_until_refresh() {
        let exe = existing_executable();
        let table = FakeTable::with_path(exe.path());
        let resolver = ExecutableResolver::new(&table, "pixpin", "pixpin.exe");

        for _ in 0..5 {
            assert_eq!(resolver.current_path(), exe.path());
        }
        assert_eq!(table.calls(), 1);

        resolver.refresh();
        assert_eq!(resolver.current_path(), exe.path());
        assert_eq!(table.calls(), 2);
    }

    #[test]
    fn test_current_path_falls_back_when_not_running() {
        let table = FakeTable::empty();
        let resolver = ExecutableResolver::new(&table, "pixpin", "host.exe");

        assert_eq!(resolver.current_path(), PathBuf::from("host.exe"));
        assert_eq!(resolver.cached_path(), None);
        assert_eq!(resolver.state(), PathState::NotFound);
        // A failed detection is cached too.
        resolver.current_path();
        assert_eq!(table.calls(), 1);
    }

    #[test]
    fn test_refresh_picks_up_started_process() {
        let exe = existing_executable();
        let table = FakeTable::empty();
        let resolver = ExecutableResolver::new(&table, "pixpin", "pixpin.exe");

        assert_eq!(resolver.current_path(), PathBuf::from("pixpin.exe"));

        table.set_running(Some(exe.path().to_path_buf()));
        assert_eq!(resolver.current_path(), PathBuf::from("pixpin.exe"));

        assert_eq!(
            resolver.refresh(),
            PathState::Resolved(exe.path().to_path_buf())
        );
        assert_eq!(resolver.current_path(), exe.path());
    }

    #[test]
    fn test_detected_path_retries_a_miss() {
        let exe = existing_executable();
        let table = FakeTable::empty();
        let resolver = ExecutableResolver::new(&table, "pixpin", "pixpin.exe");

        assert_eq!(resolver.detected_path(), None);
        assert_eq!(resolver.state(), PathState::NotFound);

        table.set_running(Some(exe.path().to_path_buf()));
        assert_eq!(resolver.detected_path(), Some(exe.path().to_path_buf()));
        assert_eq!(resolver.current_path(), exe.path());
        assert_eq!(table.calls(), 2);

        // A hit is not detected again.
        resolver.detected_path();
        assert_eq!(table.calls(), 2);
    }

    /// Hands out `path` and, while `hold` is set, parks inside the lookup
    /// until released.
    struct SlowTable {
        path: Mutex<PathBuf>,
        hold: AtomicBool,
        entered: mpsc::Sender<()>,
        release: Mutex<mpsc::Receiver<()>>,
    }

    impl ProcessTable for SlowTable {
        fn list_by_name(&self, _name: &str) -> io::Result<Vec<ProcessEntry>> {
            if self.hold.load(Ordering::SeqCst) {
                self.entered.send(()).unwrap();
                self.release.lock().unwrap().recv().unwrap();
            }
            Ok(vec![ProcessEntry {
                pid: 1,
                main_module_path: Some(self.path.lock().unwrap().clone()),
            }])
        }
    }

    #[test]
    fn test_readers_see_old_path_during_refresh() {
        let old = existing_executable();
        let new = existing_executable();
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let table = SlowTable {
            path: Mutex::new(old.path().to_path_buf()),
            hold: AtomicBool::new(false),
            entered: entered_tx,
            release: Mutex::new(release_rx),
        };
        let resolver = ExecutableResolver::new(&table, "pixpin", "pixpin.exe");
        assert_eq!(resolver.current_path(), old.path());

        *table.path.lock().unwrap() = new.path().to_path_buf();
        table.hold.store(true, Ordering::SeqCst);

        let resolver = &resolver;
        let old_path = old.path();
        std::thread::scope(|s| {
            let refresh = s.spawn(move || resolver.refresh());
            entered_rx.recv().unwrap();

            let mut readers = Vec::new();
            for _ in 0..4 {
                readers.push(s.spawn(move || {
                    for _ in 0..50 {
                        assert_eq!(resolver.current_path(), old_path);
                        assert_eq!(resolver.state(), PathState::Resolved(old_path.to_path_buf()));
                    }
                }));
            }
            for reader in readers {
                reader.join().unwrap();
            }

            release_tx.send(()).unwrap();
            assert_eq!(
                refresh.join().unwrap(),
                PathState::Resolved(new.path().to_path_buf())
            );
        });

        assert_eq!(resolver.current_path(), new.path());
    }

    #[test]
    fn test_state_does_not_detect() {
        let table = FakeTable::empty();
        let resolver = ExecutableResolver::new(&table, "pixpin", "pixpin.exe");
        assert_eq!(resolver.state(), PathState::Unresolved);
        assert_eq!(table.calls(), 0);
    }
}
