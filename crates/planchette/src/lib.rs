//! A cursor-and-selection text workspace for LLM agents.
//!
//! `planchette` lets an agent "see" a handful of open text files through a
//! bounded markdown report and change them with a few cursor-relative
//! primitives: open, close and focus a file; place the cursor before or
//! after some text; select or drag over a range; replace the selection;
//! scroll.
//!
//! # Where to find things
//!
//! - **The text engine:** [`Window`](window::Window) holds one file's buffer
//!   with its cursor, selection and scroll position. Every navigation call
//!   re-derives offsets by literal substring search.
//!
//! - **Open files and focus order:** [`Workspace`](workspace::Workspace)
//!   keeps windows most-recently-focused first. The front window is the
//!   target of every command that does not name a file.
//!
//! - **What the agent sees:** [`Display`](display::Display) renders the
//!   workspace as markdown under a character budget, hiding the least
//!   recently focused windows first.
//!
//! - **Storage:** the [`Storage`](storage::Storage) trait with
//!   [`LocalStorage`](storage::LocalStorage),
//!   [`MemoryStorage`](storage::MemoryStorage), and the path-resolving
//!   [`Home`](storage::Home) wrapper.
//!
//! - **Driving it from an agent:** [`Command`](tools::commands::Command) is
//!   the typed command table; [`Session`](session::Session) pairs a shared
//!   workspace with a display; [`WorkspaceToolsExt`](tools::WorkspaceToolsExt)
//!   registers one [`Tool`](tools::core::Tool) per command on a
//!   [`ToolSet`](tools::core::ToolSet).
//!
//! # Example
//!
//! ```ignore
//! use planchette::prelude::*;
//! use std::sync::Arc;
//!
//! let config = WorkspaceConfig::default();
//! let session = config.build_session(Arc::new(Home::local(".")));
//! let tools = ToolSet::new().with_workspace_tools(&session);
//!
//! let report = tools.execute("open", r#"{"file": "src/main.rs"}"#).await;
//! let report = tools.execute("after", r#"{"target": "fn main() {"}"#).await;
//! let report = tools.execute("edit", r#"{"content": "\n    init();"}"#).await;
//! println!("{report}");
//! ```

pub mod config;
pub mod display;
pub mod error;
pub mod file;
pub mod prelude;
pub mod session;
pub mod storage;
pub mod tools;
pub mod window;
pub mod workspace;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use config::WorkspaceConfig;
pub use display::Display;
pub use error::{Error, Result, StorageError};
pub use session::Session;
pub use window::{Anchor, Window};
pub use workspace::Workspace;

// Re-export schemars for downstream crates.
pub use schemars;

// ── Schema generation ──────────────────────────────────────────────

/// Generate a JSON Schema `serde_json::Value` from a type that implements
/// `schemars::JsonSchema`.
///
/// # Example
///
/// ```
/// use planchette::json_schema_for;
/// use schemars::JsonSchema;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, JsonSchema)]
/// struct OpenArgs {
///     file: String,
/// }
///
/// let schema = json_schema_for::<OpenArgs>();
/// assert_eq!(schema["type"], "object");
/// assert!(schema["required"].as_array().unwrap().contains(&"file".into()));
/// ```
pub fn json_schema_for<T: JsonSchema>() -> serde_json::Value {
    let schema = schemars::schema_for!(T);
    serde_json::to_value(schema)
        .unwrap_or_else(|_| serde_json::json!({"type": "object", "properties": {}}))
}

// ── Tool types ─────────────────────────────────────────────────────

/// The type of a tool definition. Currently always `Function`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum ToolType {
    #[serde(rename = "function")]
    Function,
}

/// Tool definition in OpenAI function-calling format.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ToolDef {
    #[serde(rename = "type")]
    pub tool_type: ToolType,
    pub function: FunctionDef,
}

impl ToolDef {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            tool_type: ToolType::Function,
            function: FunctionDef {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FunctionDef {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}
