//! OS process capabilities: spawning PixPin and enumerating running processes.
//!
//! Both are traits so the resolver, executor and availability tracker can be
//! exercised against in-memory fakes.

use std::ffi::OsString;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use pixpin_core::error::{ExecutionError, Result};
use pixpin_core::protocol::InvocationOutcome;
use sysinfo::System;
use tracing::debug;

/// How a process should be started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnOptions {
    /// Pipe stdout and stderr back to the caller.
    pub capture_output: bool,
    /// Wait for the process to exit before returning.
    pub wait_for_exit: bool,
    /// Upper bound on the wait; ignored when not waiting.
    pub timeout: Option<Duration>,
}

impl SpawnOptions {
    /// Start and return immediately; the child outlives the caller.
    pub fn detached() -> Self {
        Self::default()
    }

    /// Start, wait, and capture output.
    pub fn captured(timeout: Option<Duration>) -> Self {
        Self {
            capture_output: true,
            wait_for_exit: true,
            timeout,
        }
    }
}

/// What a spawn reported back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnOutcome {
    pub pid: Option<u32>,
    /// Present only when the caller waited for exit.
    pub output: Option<InvocationOutcome>,
}

/// Capability to start external processes.
pub trait ProcessSpawner {
    fn spawn(
        &self,
        program: &Path,
        args: &[OsString],
        options: SpawnOptions,
    ) -> impl Future<Output = Result<SpawnOutcome>>;
}

/// One running process matching a name lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEntry {
    pub pid: u32,
    /// Executable of the process, when the OS lets us read it.
    pub main_module_path: Option<PathBuf>,
}

/// Capability to list running processes by name.
pub trait ProcessTable {
    fn list_by_name(&self, name: &str) -> io::Result<Vec<ProcessEntry>>;
}

impl<T: ProcessTable> ProcessTable for &T {
    fn list_by_name(&self, name: &str) -> io::Result<Vec<ProcessEntry>> {
        (**self).list_by_name(name)
    }
}

impl<P: ProcessSpawner> ProcessSpawner for &P {
    fn spawn(
        &self,
        program: &Path,
        args: &[OsString],
        options: SpawnOptions,
    ) -> impl Future<Output = Result<SpawnOutcome>> {
        (**self).spawn(program, args, options)
    }
}

/// Normalise a process name for comparison: lowercase, without `.exe`.
pub(crate) fn normalize_process_name(name: &str) -> String {
    let lower = name.trim().to_ascii_lowercase();
    match lower.strip_suffix(".exe") {
        Some(stem) => stem.to_string(),
        None => lower,
    }
}

/// Process table backed by `sysinfo`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcessTable;

impl ProcessTable for SystemProcessTable {
    fn list_by_name(&self, name: &str) -> io::Result<Vec<ProcessEntry>> {
        let wanted = normalize_process_name(name);
        let system = System::new_all();

        let mut entries: Vec<ProcessEntry> = system
            .processes()
            .iter()
            .filter(|(_, process)| {
                normalize_process_name(&process.name().to_string_lossy()) == wanted
            })
            .map(|(pid, process)| ProcessEntry {
                pid: pid.as_u32(),
                main_module_path: process.exe().map(Path::to_path_buf),
            })
            .collect();

        // sysinfo iterates a hash map; order by pid so "first" is stable.
        entries.sort_by_key(|entry| entry.pid);
        debug!("Found {} process(es) named '{}'", entries.len(), wanted);
        Ok(entries)
    }
}

/// Spawner backed by `tokio::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemSpawner;

impl ProcessSpawner for SystemSpawner {
    async fn spawn(
        &self,
        program: &Path,
        args: &[OsString],
        options: SpawnOptions,
    ) -> Result<SpawnOutcome> {
        let program_name = program.display().to_string();
        let mut command = tokio::process::Command::new(program);
        command.args(args).stdin(Stdio::null());

        if options.capture_output {
            command.stdout(Stdio::piped()).stderr(Stdio::piped());
        } else {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }

        if !options.wait_for_exit {
            // New process group so the child survives the terminal closing.
            #[cfg(unix)]
            command.process_group(0);

            let child = command
                .spawn()
                .map_err(|e| ExecutionError::launch_failed(&program_name, &e.to_string()))?;
            return Ok(SpawnOutcome {
                pid: child.id(),
                output: None,
            });
        }

        command.kill_on_drop(true);
        let child = command
            .spawn()
            .map_err(|e| ExecutionError::launch_failed(&program_name, &e.to_string()))?;
        let pid = child.id();

        let waited = match options.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| ExecutionError::timeout(limit))?,
            None => child.wait_with_output().await,
        };
        let output =
            waited.map_err(|e| ExecutionError::launch_failed(&program_name, &e.to_string()))?;

        Ok(SpawnOutcome {
            pid,
            output: Some(InvocationOutcome {
                exit_code: output.status.code().unwrap_or(-1),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }),
        })
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    //! In-memory process capabilities that count calls.

    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// Process table whose contents can change between calls.
    #[derive(Debug, Default)]
    pub struct FakeTable {
        pub entries: Mutex<Vec<ProcessEntry>>,
        pub fail: Mutex<bool>,
        pub calls: AtomicUsize,
    }

    impl FakeTable {
        pub fn empty() -> Self {
            Self::default()
        }

        pub fn with_path(path: impl Into<PathBuf>) -> Self {
            let table = Self::default();
            table.set_running(Some(path.into()));
            table
        }

        pub fn set_running(&self, path: Option<PathBuf>) {
            *self.entries.lock().unwrap() = vec![ProcessEntry {
                pid: 4242,
                main_module_path: path,
            }];
        }

        pub fn set_stopped(&self) {
            self.entries.lock().unwrap().clear();
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ProcessTable for FakeTable {
        fn list_by_name(&self, _name: &str) -> io::Result<Vec<ProcessEntry>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if *self.fail.lock().unwrap() {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
            }
            Ok(self.entries.lock().unwrap().clone())
        }
    }

    /// One recorded spawn call.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SpawnCall {
        pub program: PathBuf,
        pub args: Vec<String>,
        pub options: SpawnOptions,
    }

    /// Spawner answering from a queue of outcomes; succeeds with exit 0 when empty.
    #[derive(Debug, Default)]
    pub struct FakeSpawner {
        pub calls: Mutex<Vec<SpawnCall>>,
        pub outcomes: Mutex<VecDeque<Result<InvocationOutcome>>>,
    }

    impl FakeSpawner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_output(&self, exit_code: i32, stdout: &str, stderr: &str) {
            self.outcomes.lock().unwrap().push_back(Ok(InvocationOutcome {
                exit_code,
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            }));
        }

        pub fn push_error(&self, error: ExecutionError) {
            self.outcomes.lock().unwrap().push_back(Err(error));
        }

        pub fn calls(&self) -> Vec<SpawnCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ProcessSpawner for FakeSpawner {
        async fn spawn(
            &self,
            program: &Path,
            args: &[OsString],
            options: SpawnOptions,
        ) -> Result<SpawnOutcome> {
            self.calls.lock().unwrap().push(SpawnCall {
                program: program.to_path_buf(),
                args: args
                    .iter()
                    .map(|arg| arg.to_string_lossy().into_owned())
                    .collect(),
                options,
            });
            let outcome = self
                .outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(InvocationOutcome::default()))?;
            Ok(SpawnOutcome {
                pid: Some(1),
                output: options.wait_for_exit.then_some(outcome),
            })
        }
    }
}
