//! The dispatch capability the command API is built on.
//!
//! [`crate::api::PixPin`] only formats scripts; whatever it holds as a
//! [`ScriptSink`] decides how they reach PixPin. The process-backed client
//! lives in `pixpin-host`; [`RecordingSink`] keeps scripts in memory for
//! tests and dry runs.

use std::collections::VecDeque;
use std::future::Future;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use crate::decode::{decode, ScriptValue};
use crate::error::{ExecutionError, Result};
use crate::protocol::{ScriptInvocation, ScriptSource};

/// Something that can execute PixPin scripts.
pub trait ScriptSink {
    /// Dispatch a script without waiting for it to finish.
    fn fire(&self, script: &str) -> impl Future<Output = Result<()>>;

    /// Run a script to completion and return its stdout.
    fn run(&self, script: &str) -> impl Future<Output = Result<String>>;

    /// Dispatch a script file without waiting for it to finish.
    fn run_file(&self, path: &Path) -> impl Future<Output = Result<()>>;

    /// Run a script and decode its stdout as `T`.
    fn invoke<T: ScriptValue>(&self, script: &str) -> impl Future<Output = Result<T>> {
        async move {
            let stdout = self.run(script).await?;
            decode(&stdout)
        }
    }
}

impl<S: ScriptSink> ScriptSink for &S {
    fn fire(&self, script: &str) -> impl Future<Output = Result<()>> {
        (**self).fire(script)
    }

    fn run(&self, script: &str) -> impl Future<Output = Result<String>> {
        (**self).run(script)
    }

    fn run_file(&self, path: &Path) -> impl Future<Output = Result<()>> {
        (**self).run_file(path)
    }
}

/// In-memory sink that records every dispatch.
///
/// `run` answers from a queue of canned responses, or with empty stdout
/// once the queue is drained.
#[derive(Debug, Default)]
pub struct RecordingSink {
    invocations: Mutex<Vec<ScriptInvocation>>,
    responses: Mutex<VecDeque<Result<String>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue stdout for the next `run`.
    pub fn push_response(&self, stdout: impl Into<String>) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Ok(stdout.into()));
    }

    /// Queue a failure for the next `run`.
    pub fn push_error(&self, error: ExecutionError) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Err(error));
    }

    pub fn invocations(&self) -> Vec<ScriptInvocation> {
        self.invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Inline script texts in dispatch order; file dispatches are skipped.
    pub fn scripts(&self) -> Vec<String> {
        self.invocations()
            .into_iter()
            .filter_map(|invocation| match invocation.source {
                ScriptSource::Inline(script) => Some(script),
                ScriptSource::File(_) => None,
            })
            .collect()
    }

    /// Remove and return everything recorded so far.
    pub fn take(&self) -> Vec<ScriptInvocation> {
        std::mem::take(&mut *self.invocations.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn record(&self, invocation: ScriptInvocation) {
        self.invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(invocation);
    }
}

impl ScriptSink for RecordingSink {
    async fn fire(&self, script: &str) -> Result<()> {
        self.record(ScriptInvocation::fire(script));
        Ok(())
    }

    async fn run(&self, script: &str) -> Result<String> {
        self.record(ScriptInvocation::wait(script));
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }

    async fn run_file(&self, path: &Path) -> Result<()> {
        self.record(ScriptInvocation::file(path));
        Ok(())
    }
}
