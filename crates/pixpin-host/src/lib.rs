//! Process-backed PixPin client.
//!
//! Finds the running PixPin instance, launches it with `-r`/`-f` scripts and
//! starts it when needed. The command API itself lives in `pixpin-core`;
//! [`PixPinClient`] is the [`pixpin_core::ScriptSink`] that feeds it.
//!
//! # Modules
//!
//! - [`config`]: presets, config file and environment layering
//! - [`process`]: spawn and process-table capabilities
//! - [`resolver`]: cached executable path detection
//! - [`executor`]: script dispatch and output capture
//! - [`availability`]: liveness checks and on-demand start
//! - [`client`]: the composed client

pub mod availability;
pub mod client;
pub mod config;
pub mod executor;
pub mod process;
pub mod resolver;

pub use availability::{HostAvailabilityTracker, HostState};
pub use client::PixPinClient;
pub use config::{ClientConfig, ConfigError, Profile};
pub use resolver::{ExecutableResolver, PathState};
