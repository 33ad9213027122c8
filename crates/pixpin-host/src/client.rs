//! Process-backed PixPin client.

use std::path::{Path, PathBuf};

use pixpin_core::api::PixPin;
use pixpin_core::error::Result;
use pixpin_core::sink::ScriptSink;
use tracing::warn;

use crate::availability::{HostAvailabilityTracker, HostState};
use crate::config::ClientConfig;
use crate::executor::ScriptExecutor;
use crate::process::{ProcessSpawner, ProcessTable, SystemProcessTable, SystemSpawner};
use crate::resolver::{ExecutableResolver, PathState};

/// Drives a local PixPin installation.
///
/// Implements [`ScriptSink`], so it plugs into [`PixPin`] directly:
///
/// ```ignore
/// let client = PixPinClient::new(ClientConfig::default());
/// client.ensure_running().await?;
/// client.commands().capture_full_screen().await?;
/// ```
pub struct PixPinClient<T = SystemProcessTable, P = SystemSpawner> {
    config: ClientConfig,
    resolver: ExecutableResolver<T>,
    executor: ScriptExecutor<P>,
    tracker: HostAvailabilityTracker,
}

impl PixPinClient {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_parts(config, SystemProcessTable, SystemSpawner)
    }
}

impl<T: ProcessTable, P: ProcessSpawner> PixPinClient<T, P> {
    /// Build a client over custom process capabilities.
    pub fn with_parts(config: ClientConfig, table: T, spawner: P) -> Self {
        let resolver = ExecutableResolver::new(
            table,
            config.process_name.clone(),
            config.executable_path.clone(),
        );
        let executor = ScriptExecutor::new(
            spawner,
            Some(config.execution_timeout),
            config.log_scripts,
        );
        let tracker = HostAvailabilityTracker::new(config.startup_delay);
        Self {
            config,
            resolver,
            executor,
            tracker,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn resolver(&self) -> &ExecutableResolver<T> {
        &self.resolver
    }

    /// Typed command API dispatching through this client.
    pub fn commands(&self) -> PixPin<&Self> {
        PixPin::new(self)
    }

    /// Executable the next dispatch will launch.
    pub fn executable_path(&self) -> PathBuf {
        self.resolver.current_path()
    }

    /// Detected path, or `None` when PixPin was not found.
    pub fn cached_path(&self) -> Option<PathBuf> {
        self.resolver.cached_path()
    }

    pub fn refresh(&self) -> PathState {
        self.resolver.refresh()
    }

    pub fn is_running(&self) -> bool {
        self.tracker.is_running(&self.resolver)
    }

    pub fn is_available(&self) -> bool {
        self.tracker.is_available(&self.resolver)
    }

    pub fn state(&self) -> HostState {
        self.tracker.state(&self.resolver)
    }

    /// Start PixPin if it is not running. Returns `true` if a start was attempted.
    pub async fn ensure_running(&self) -> Result<bool> {
        self.tracker
            .ensure_running(&self.resolver, self.executor.spawner())
            .await
    }

    /// [`Self::ensure_running`] when auto start is enabled, otherwise nothing.
    pub async fn prepare(&self) -> Result<()> {
        if self.config.auto_start {
            self.ensure_running().await?;
        }
        Ok(())
    }

    fn suppress<V>(&self, result: Result<V>, fallback: V) -> Result<V> {
        match result {
            Err(e) if !self.config.raise_errors => {
                warn!("PixPin execution failed: {}", e);
                Ok(fallback)
            }
            other => other,
        }
    }
}

impl<T: ProcessTable, P: ProcessSpawner> ScriptSink for PixPinClient<T, P> {
    async fn fire(&self, script: &str) -> Result<()> {
        let result = self.executor.fire(&self.resolver, script).await;
        self.suppress(result, ())
    }

    async fn run(&self, script: &str) -> Result<String> {
        let result = self.executor.run(&self.resolver, script).await;
        self.suppress(result, String::new())
    }

    async fn run_file(&self, path: &Path) -> Result<()> {
        let result = self.executor.fire_file(&self.resolver, path).await;
        self.suppress(result, ())
    }
}
