//! Core types and logic for driving PixPin.
//!
//! This crate knows how to phrase PixPin commands and how to read PixPin's
//! answers. It never starts a process itself; dispatch goes through a
//! [`sink::ScriptSink`], which `pixpin-host` implements on top of the real
//! executable.
//!
//! # Modules
//!
//! - [`error`]: execution errors with actionable suggestions
//! - [`types`]: shot actions, rects and command results
//! - [`script`]: script text for every PixPin command
//! - [`protocol`]: command-line contract with the executable
//! - [`decode`]: ordered decode strategies for script output
//! - [`sink`]: the dispatch capability and an in-memory recorder
//! - [`api`]: typed command API
//! - [`workflows`]: multi-step conveniences
//!
//! # Dispatch modes
//!
//! | Mode | Waits | Output |
//! |------|-------|--------|
//! | **Fire** | no | none |
//! | **Invoke** | yes | stdout decoded as the requested type |

pub mod api;
pub mod decode;
pub mod error;
pub mod protocol;
pub mod script;
pub mod sink;
pub mod types;
pub mod workflows;

pub use api::PixPin;
pub use error::{ErrorCode, ExecutionError, Result};
pub use sink::{RecordingSink, ScriptSink};
pub use types::{Area, PixRect, ShotAction, SpecialRectType, SystemCommandResult};
