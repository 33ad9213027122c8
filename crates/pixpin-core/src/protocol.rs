//! Invocation contract between this SDK and the PixPin executable.
//!
//! PixPin is driven entirely through its command line: `-r <script>` runs
//! inline script text, `-f <path>` runs a script file. Exit code 0 means
//! success; anything else means stderr explains what went wrong.

use std::ffi::OsString;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Flag selecting inline script text.
pub const INLINE_FLAG: &str = "-r";

/// Flag selecting a script file.
pub const FILE_FLAG: &str = "-f";

/// Where the script text comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ScriptSource {
    Inline(String),
    File(PathBuf),
}

/// Whether the caller waits for the process and reads its output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    #[default]
    FireAndForget,
    WaitForResult,
}

/// One dispatch of one script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptInvocation {
    pub source: ScriptSource,
    pub mode: DispatchMode,
}

impl ScriptInvocation {
    pub fn fire(script: impl Into<String>) -> Self {
        Self {
            source: ScriptSource::Inline(script.into()),
            mode: DispatchMode::FireAndForget,
        }
    }

    pub fn wait(script: impl Into<String>) -> Self {
        Self {
            source: ScriptSource::Inline(script.into()),
            mode: DispatchMode::WaitForResult,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            source: ScriptSource::File(path.into()),
            mode: DispatchMode::FireAndForget,
        }
    }

    /// Argument vector passed to the executable.
    ///
    /// The script is a single argument token; the OS layer handles quoting,
    /// so no escaping is applied here.
    pub fn args(&self) -> Vec<OsString> {
        match &self.source {
            ScriptSource::Inline(script) => {
                vec![OsString::from(INLINE_FLAG), OsString::from(script)]
            }
            ScriptSource::File(path) => {
                vec![OsString::from(FILE_FLAG), path.clone().into_os_string()]
            }
        }
    }

    pub fn waits_for_result(&self) -> bool {
        self.mode == DispatchMode::WaitForResult
    }
}

/// Captured result of a waited-for process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationOutcome {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl InvocationOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Quote one argument for a POSIX shell.
///
/// Arguments made only of safe characters are returned as-is; everything
/// else is wrapped in single quotes with embedded single quotes spelled `'\''`.
pub fn quote_arg(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@%+,".contains(c));
    if safe {
        return arg.to_string();
    }
    format!("'{}'", arg.replace('\'', r"'\''"))
}

/// Render a full command line for logs and dry runs.
pub fn render_command_line(program: &str, args: &[OsString]) -> String {
    std::iter::once(quote_arg(program))
        .chain(args.iter().map(|arg| quote_arg(&arg.to_string_lossy())))
        .collect::<Vec<_>>()
        .join(" ")
}
