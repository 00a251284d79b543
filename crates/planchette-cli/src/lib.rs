//! Command-line driver for a planchette workspace.
//!
//! Wires a [`SessionConfig`] into a ready [`ToolSet`](planchette::tools::ToolSet)
//! over a home directory, and provides the system prompt section a host
//! agent can include so the model knows how to use the tools.
//!
//! # Library usage
//!
//! ```ignore
//! use planchette_cli::{SessionConfig, workspace_system_prompt};
//!
//! let config = SessionConfig::default();
//! let session = config.build_session();
//! let tools = config.build_tool_set(&session);
//! let system = workspace_system_prompt(config.tool_prefix.as_deref());
//! ```
//!
//! # Binary
//!
//! ```sh
//! # Run a script of commands, one JSON object per line
//! planchette --home ./project run --script edits.jsonl
//!
//! # One command
//! planchette exec open '{"file": "README.md"}'
//!
//! # Tool definitions for a function-calling API
//! planchette tools
//! ```

pub mod config;
pub mod prompt;
pub mod script;

pub use config::SessionConfig;
pub use prompt::workspace_system_prompt;
pub use script::{ScriptLine, ScriptSummary, run_script};
