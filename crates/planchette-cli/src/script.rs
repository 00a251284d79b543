//! JSON-lines command scripts.
//!
//! Each non-blank line is `{"name": "<command>", "arguments": {...}}`. Lines
//! are dispatched in order through a [`ToolSet`] and every result (report or
//! `Error: ...`) is written out followed by a blank line.

use planchette::tools::ToolSet;
use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::config::SessionConfig;

/// One scripted tool call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptLine {
    pub name: String,
    #[serde(default = "empty_arguments")]
    pub arguments: serde_json::Value,
}

fn empty_arguments() -> serde_json::Value {
    serde_json::json!({})
}

impl ScriptLine {
    /// Arguments as the raw JSON string a tool expects. A string value is
    /// taken to be already-encoded JSON.
    pub fn raw_arguments(&self) -> String {
        match &self.arguments {
            serde_json::Value::String(raw) => raw.clone(),
            other => other.to_string(),
        }
    }
}

/// Counts from a finished script.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScriptSummary {
    pub executed: usize,
    pub failed: usize,
}

/// Run every line of `input` through `tools`, writing results to `output`.
pub async fn run_script<R, W>(
    tools: &ToolSet,
    config: &SessionConfig,
    input: R,
    mut output: W,
) -> std::io::Result<ScriptSummary>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut summary = ScriptSummary::default();
    let mut lines = input.lines();
    let mut number = 0usize;

    while let Some(line) = lines.next_line().await? {
        number += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let result = match serde_json::from_str::<ScriptLine>(line) {
            Ok(call) => {
                let name = config.tool_name(&call.name);
                debug!("Script line {number}: {name}");
                tools.execute(&name, &call.raw_arguments()).await
            }
            Err(e) => format!("Error: line {number}: {e}"),
        };

        summary.executed += 1;
        if result.starts_with("Error:") {
            summary.failed += 1;
            warn!("Script line {number} failed");
        }
        output.write_all(result.as_bytes()).await?;
        output.write_all(b"\n\n").await?;
    }

    output.flush().await?;
    Ok(summary)
}
