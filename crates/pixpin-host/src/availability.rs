//! Liveness checks and on-demand start of PixPin.

use std::time::Duration;

use pixpin_core::error::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::process::{ProcessSpawner, ProcessTable, SpawnOptions};
use crate::resolver::ExecutableResolver;

/// What a liveness probe found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HostState {
    NotRunning,
    RunningPathKnown,
    RunningPathUnknown,
}

/// Answers whether PixPin is up, and starts it when it is not.
#[derive(Debug, Clone, Copy)]
pub struct HostAvailabilityTracker {
    startup_delay: Duration,
}

impl HostAvailabilityTracker {
    pub fn new(startup_delay: Duration) -> Self {
        Self { startup_delay }
    }

    /// Process-name check only; enumeration errors read as "not running".
    pub fn is_running<T: ProcessTable>(&self, resolver: &ExecutableResolver<T>) -> bool {
        match resolver.table().list_by_name(resolver.process_name()) {
            Ok(entries) => !entries.is_empty(),
            Err(e) => {
                debug!("Process enumeration failed: {}", e);
                false
            }
        }
    }

    /// Running and with a known executable path.
    ///
    /// Stricter than [`Self::is_running`]: a cached path may belong to an
    /// instance that has since exited. A cached miss is detected again.
    pub fn is_available<T: ProcessTable>(&self, resolver: &ExecutableResolver<T>) -> bool {
        self.is_running(resolver) && resolver.detected_path().is_some()
    }

    pub fn state<T: ProcessTable>(&self, resolver: &ExecutableResolver<T>) -> HostState {
        if !self.is_running(resolver) {
            HostState::NotRunning
        } else if resolver.detected_path().is_some() {
            HostState::RunningPathKnown
        } else {
            HostState::RunningPathUnknown
        }
    }

    /// Start PixPin unless it is already running.
    ///
    /// After a start, waits out the startup delay and refreshes the
    /// resolver so later dispatches use the new instance's path. Returns
    /// `true` if a start was attempted.
    pub async fn ensure_running<T: ProcessTable, P: ProcessSpawner>(
        &self,
        resolver: &ExecutableResolver<T>,
        spawner: &P,
    ) -> Result<bool> {
        if self.is_running(resolver) {
            debug!("PixPin already running");
            return Ok(false);
        }

        let program = resolver.current_path();
        info!("PixPin not running, starting {}", program.display());
        spawner
            .spawn(&program, &[], SpawnOptions::detached())
            .await?;

        tokio::time::sleep(self.startup_delay).await;
        resolver.refresh();
        Ok(true)
    }
}
