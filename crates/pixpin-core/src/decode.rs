//! Decoding PixPin's stdout into typed values.
//!
//! PixPin prints whatever the script evaluated to, with no fixed schema.
//! Each decodable type lists an ordered set of strategies; the first one
//! that yields a value wins.
//!
//! | Type | Strategies, in order |
//! |------|----------------------|
//! | `bool` | strict literal, case-insensitive literal, default `false` |
//! | [`SystemCommandResult`] | JSON, raw stdout as `output` |
//! | [`PixRect`] | JSON |
//! | scalars, `String`, `serde_json::Value` | JSON, trimmed text conversion |

use std::str::FromStr;

use serde::de::DeserializeOwned;
use tracing::trace;

use crate::error::{ExecutionError, Result};
use crate::types::{PixRect, SystemCommandResult};

/// One attempt at reading stdout as `T`.
pub type Strategy<T> = fn(&str) -> Option<T>;

/// A type that can be produced from script output.
pub trait ScriptValue: Sized {
    /// Strategies tried in order by [`decode`].
    fn strategies() -> Vec<Strategy<Self>>;
}

/// Decode stdout as `T`, failing only when every strategy declines.
pub fn decode<T: ScriptValue>(stdout: &str) -> Result<T> {
    for (index, strategy) in T::strategies().into_iter().enumerate() {
        if let Some(value) = strategy(stdout) {
            trace!(
                "Decoded {} with strategy #{}",
                std::any::type_name::<T>(),
                index
            );
            return Ok(value);
        }
    }
    Err(ExecutionError::decode_failed(
        std::any::type_name::<T>(),
        stdout,
    ))
}

/// Structured decode of the whole output.
pub fn json<T: DeserializeOwned>(stdout: &str) -> Option<T> {
    serde_json::from_str(stdout).ok()
}

/// Direct conversion of the trimmed output.
pub fn scalar<T: FromStr>(stdout: &str) -> Option<T> {
    stdout.trim().parse().ok()
}

/// Exact `true` / `false`, ignoring surrounding whitespace.
fn bool_literal(stdout: &str) -> Option<bool> {
    match stdout.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn bool_case_insensitive(stdout: &str) -> Option<bool> {
    let trimmed = stdout.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Some(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Anything unrecognised reads as `false`.
///
/// This masks host-side failures that print something other than a boolean;
/// kept for compatibility with existing callers that treat it as "no".
fn bool_default(_stdout: &str) -> Option<bool> {
    Some(false)
}

fn raw_output(stdout: &str) -> Option<SystemCommandResult> {
    Some(SystemCommandResult {
        output: stdout.to_string(),
        ..Default::default()
    })
}

fn text_value(stdout: &str) -> Option<serde_json::Value> {
    Some(serde_json::Value::String(stdout.trim().to_string()))
}

impl ScriptValue for bool {
    fn strategies() -> Vec<Strategy<Self>> {
        vec![bool_literal as Strategy<Self>, bool_case_insensitive, bool_default]
    }
}

impl ScriptValue for SystemCommandResult {
    fn strategies() -> Vec<Strategy<Self>> {
        vec![json::<SystemCommandResult> as Strategy<Self>, raw_output]
    }
}

impl ScriptValue for PixRect {
    fn strategies() -> Vec<Strategy<Self>> {
        vec![json::<PixRect> as Strategy<Self>]
    }
}

impl ScriptValue for serde_json::Value {
    fn strategies() -> Vec<Strategy<Self>> {
        vec![json::<serde_json::Value> as Strategy<Self>, text_value]
    }
}

macro_rules! scalar_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ScriptValue for $ty {
                fn strategies() -> Vec<Strategy<Self>> {
                    vec![json::<$ty> as Strategy<Self>, scalar::<$ty>]
                }
            }
        )*
    };
}

scalar_value!(String, i32, i64, u32, u64, f32, f64);
