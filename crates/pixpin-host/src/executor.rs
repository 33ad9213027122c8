//! Dispatching scripts to the PixPin executable.

use std::path::Path;
use std::time::Duration;

use pixpin_core::decode::{decode, ScriptValue};
use pixpin_core::error::{ExecutionError, Result};
use pixpin_core::protocol::{render_command_line, ScriptInvocation};
use tracing::{debug, info};

use crate::process::{ProcessSpawner, ProcessTable, SpawnOptions};
use crate::resolver::ExecutableResolver;

/// Launches PixPin with `-r`/`-f` arguments.
///
/// The executable comes from the resolver on every dispatch, so a refresh
/// is picked up immediately.
pub struct ScriptExecutor<P> {
    spawner: P,
    timeout: Option<Duration>,
    log_scripts: bool,
}

impl<P: ProcessSpawner> ScriptExecutor<P> {
    pub fn new(spawner: P, timeout: Option<Duration>, log_scripts: bool) -> Self {
        Self {
            spawner,
            timeout,
            log_scripts,
        }
    }

    pub fn spawner(&self) -> &P {
        &self.spawner
    }

    /// Start the dispatch and return once the OS has created the process.
    ///
    /// The exit code is never inspected, so scripts PixPin rejects fail
    /// silently here.
    pub async fn fire<T: ProcessTable>(
        &self,
        resolver: &ExecutableResolver<T>,
        script: &str,
    ) -> Result<()> {
        self.dispatch(resolver, ScriptInvocation::fire(script))
            .await
            .map(|_| ())
    }

    pub async fn fire_file<T: ProcessTable>(
        &self,
        resolver: &ExecutableResolver<T>,
        path: &Path,
    ) -> Result<()> {
        self.dispatch(resolver, ScriptInvocation::file(path))
            .await
            .map(|_| ())
    }

    /// Run to completion and return stdout.
    ///
    /// A non-zero exit fails with the captured stderr.
    pub async fn run<T: ProcessTable>(
        &self,
        resolver: &ExecutableResolver<T>,
        script: &str,
    ) -> Result<String> {
        self.dispatch(resolver, ScriptInvocation::wait(script))
            .await
            .map(Option::unwrap_or_default)
    }

    /// Run to completion and decode stdout as `V`.
    pub async fn invoke<T: ProcessTable, V: ScriptValue>(
        &self,
        resolver: &ExecutableResolver<T>,
        script: &str,
    ) -> Result<V> {
        let stdout = self.run(resolver, script).await?;
        decode(&stdout)
    }

    /// Returns stdout for waited invocations, `None` otherwise.
    async fn dispatch<T: ProcessTable>(
        &self,
        resolver: &ExecutableResolver<T>,
        invocation: ScriptInvocation,
    ) -> Result<Option<String>> {
        let program = resolver.current_path();
        let args = invocation.args();

        if self.log_scripts {
            info!(
                "Executing: {}",
                render_command_line(&program.to_string_lossy(), &args)
            );
        } else {
            debug!("Dispatching {:?} to {}", invocation.mode, program.display());
        }

        if !invocation.waits_for_result() {
            self.spawner
                .spawn(&program, &args, SpawnOptions::detached())
                .await?;
            return Ok(None);
        }

        let outcome = self
            .spawner
            .spawn(&program, &args, SpawnOptions::captured(self.timeout))
            .await?;
        let output = outcome.output.unwrap_or_default();

        if !output.success() {
            return Err(ExecutionError::non_zero_exit(
                output.exit_code,
                &output.stderr,
            ));
        }

        if self.log_scripts {
            info!("Result: {}", output.stdout.trim());
        }
        Ok(Some(output.stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::fakes::{FakeSpawner, FakeTable};
    use pixpin_core::error::ErrorCode;
    use pixpin_core::types::SystemCommandResult;
    use std::path::PathBuf;

    fn resolver(table: &FakeTable) -> ExecutableResolver<&FakeTable> {
        ExecutableResolver::new(table, "pixpin", "host.exe")
    }

    #[tokio::test]
    async fn test_fire_spawns_once_with_inline_args() {
        let table = FakeTable::empty();
        let resolver = resolver(&table);
        let executor = ScriptExecutor::new(FakeSpawner::new(), None, false);

        executor.fire(&resolver, "cmd.doThing()").await.unwrap();

        let calls = executor.spawner().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, PathBuf::from("host.exe"));
        assert_eq!(calls[0].args, vec!["-r", "cmd.doThing()"]);
        assert!(!calls[0].options.wait_for_exit);
    }

    #[tokio::test]
    async fn test_fire_ignores_exit_code() {
        let table = FakeTable::empty();
        let resolver = resolver(&table);
        let spawner = FakeSpawner::new();
        spawner.push_output(1, "", "rejected");
        let executor = ScriptExecutor::new(spawner, None, false);

        assert!(executor.fire(&resolver, "bad(").await.is_ok());
    }

    #[tokio::test]
    async fn test_fire_surfaces_launch_failure() {
        let table = FakeTable::empty();
        let resolver = resolver(&table);
        let spawner = FakeSpawner::new();
        spawner.push_error(ExecutionError::launch_failed("host.exe", "not found"));
        let executor = ScriptExecutor::new(spawner, None, false);

        let err = executor.fire(&resolver, "x()").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::LaunchFailed);
    }

    #[tokio::test]
    async fn test_fire_file_args() {
        let table = FakeTable::empty();
        let resolver = resolver(&table);
        let executor = ScriptExecutor::new(FakeSpawner::new(), None, false);

        executor
            .fire_file(&resolver, Path::new("/scripts/batch.js"))
            .await
            .unwrap();
        assert_eq!(
            executor.spawner().calls()[0].args,
            vec!["-f", "/scripts/batch.js"]
        );
    }

    #[tokio::test]
    async fn test_invoke_non_zero_exit_surfaces_stderr() {
        let table = FakeTable::empty();
        let resolver = resolver(&table);
        let spawner = FakeSpawner::new();
        spawner.push_output(1, "", "boom");
        let executor = ScriptExecutor::new(spawner, None, false);

        let err = executor
            .invoke::<_, bool>(&resolver, "pixpin.isAllPinHide()")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NonZeroExit);
        assert!(err.message.contains("boom"));
    }

    #[tokio::test]
    async fn test_invoke_waits_with_timeout() {
        let table = FakeTable::empty();
        let resolver = resolver(&table);
        let spawner = FakeSpawner::new();
        spawner.push_output(0, " True \n", "");
        let executor = ScriptExecutor::new(spawner, Some(Duration::from_secs(30)), false);

        let hidden: bool = executor
            .invoke(&resolver, "pixpin.isAllPinHide()")
            .await
            .unwrap();
        assert!(hidden);

        let call = &executor.spawner().calls()[0];
        assert!(call.options.wait_for_exit);
        assert!(call.options.capture_output);
        assert_eq!(call.options.timeout, Some(Duration::from_secs(30)));
    }

    #[tokio::test]
    async fn test_invoke_structured_fallback() {
        let table = FakeTable::empty();
        let resolver = resolver(&table);
        let spawner = FakeSpawner::new();
        spawner.push_output(0, "oops", "");
        let executor = ScriptExecutor::new(spawner, None, true);

        let result: SystemCommandResult = executor
            .invoke(&resolver, "pixpin.runSystemSync(\"dir\")")
            .await
            .unwrap();
        assert_eq!(result.output, "oops");
    }

    #[tokio::test]
    async fn test_invoke_decode_failure() {
        let table = FakeTable::empty();
        let resolver = resolver(&table);
        let spawner = FakeSpawner::new();
        spawner.push_output(0, "undefined", "");
        let executor = ScriptExecutor::new(spawner, None, false);

        let err = executor
            .invoke::<_, i32>(&resolver, "pixpin.count()")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DecodeFailed);
    }

    #[tokio::test]
    async fn test_dispatch_uses_cached_path() {
        let exe = tempfile::NamedTempFile::new().unwrap();
        let table = FakeTable::with_path(exe.path());
        let resolver = resolver(&table);
        let executor = ScriptExecutor::new(FakeSpawner::new(), None, false);

        for _ in 0..3 {
            executor.fire(&resolver, "pixpin.closeAllPin()").await.unwrap();
        }

        assert!(executor
            .spawner()
            .calls()
            .iter()
            .all(|call| call.program == exe.path()));
        assert_eq!(table.calls(), 1);
    }
}
