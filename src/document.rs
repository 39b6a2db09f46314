use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::thread;

/// Document written to the collection, one per log event.
///
/// All eight fields are present on every document; `thread` and `process`
/// nest two keys each. `timestamp` is stored as a native BSON datetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogDocument {
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub timestamp: DateTime<Utc>,
    pub msg: String,
    pub level: String,
    pub module: String,
    pub function: String,
    pub lineno: u32,
    pub thread: ThreadInfo,
    pub process: ProcessInfo,
}

/// Threading context, nested under the `thread` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadInfo {
    #[serde(rename = "thread")]
    pub id: u64,
    #[serde(rename = "thread_name")]
    pub name: String,
}

impl ThreadInfo {
    /// Capture the calling thread.
    pub fn current() -> Self {
        let current = thread::current();
        ThreadInfo {
            id: thread_id_as_u64(current.id()),
            name: current
                .name()
                .map(str::to_string)
                .unwrap_or_else(|| "<unnamed>".to_string()),
        }
    }
}

/// Process context, nested under the `process` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessInfo {
    #[serde(rename = "process_name")]
    pub name: String,
    #[serde(rename = "process_id")]
    pub id: u32,
}

impl ProcessInfo {
    /// Capture the current process. The name is the executable file name,
    /// resolved once and cached for the lifetime of the process.
    pub fn current() -> Self {
        static PROCESS: OnceLock<ProcessInfo> = OnceLock::new();
        PROCESS
            .get_or_init(|| ProcessInfo {
                name: process_name(),
                id: std::process::id(),
            })
            .clone()
    }
}

fn process_name() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|path| {
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "<unknown>".to_string())
}

// `ThreadId::as_u64` is unstable; the stable `Debug` form is "ThreadId(n)".
fn thread_id_as_u64(id: thread::ThreadId) -> u64 {
    let repr = format!("{:?}", id);
    repr.trim_start_matches("ThreadId(")
        .trim_end_matches(')')
        .parse()
        .unwrap_or(0)
}
