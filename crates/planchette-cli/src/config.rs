//! Driver configuration with sensible defaults.
//!
//! [`SessionConfig`] is layered: built-in defaults, then an optional JSON
//! config file, then command-line flags. It converts into library types via
//! [`build_session`](SessionConfig::build_session) and
//! [`build_tool_set`](SessionConfig::build_tool_set).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use planchette::WorkspaceConfig;
use planchette::session::Session;
use planchette::storage::{Home, Storage};
use planchette::tools::core::{DEFAULT_MAX_RESULT_BYTES, ToolSet};
use planchette::tools::WorkspaceToolsExt;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Directory relative paths resolve against. Default: `"."`.
    pub home: String,
    /// Page size and report budget.
    #[serde(flatten)]
    pub workspace: WorkspaceConfig,
    /// Tool output cap in bytes. Default: `30000`.
    pub max_result_bytes: usize,
    /// Namespace for tool names (`{prefix}.open`). Default: none.
    pub tool_prefix: Option<String>,
    /// Check arguments against each tool's JSON Schema. Default: `true`.
    pub validate_args: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            home: ".".to_string(),
            workspace: WorkspaceConfig::default(),
            max_result_bytes: DEFAULT_MAX_RESULT_BYTES,
            tool_prefix: None,
            validate_args: true,
        }
    }
}

impl SessionConfig {
    /// Read a JSON config file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {e}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| format!("invalid config {}: {e}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// The home directory as an absolute path when it exists.
    pub fn resolved_home(&self) -> PathBuf {
        std::fs::canonicalize(&self.home).unwrap_or_else(|_| PathBuf::from(&self.home))
    }

    pub fn build_storage(&self) -> Arc<dyn Storage> {
        Arc::new(Home::local(self.resolved_home()))
    }

    pub fn build_session(&self) -> Session {
        self.workspace.build_session(self.build_storage())
    }

    /// One tool per workspace command, all driving `session`.
    pub fn build_tool_set(&self, session: &Session) -> ToolSet {
        let tools = ToolSet::new()
            .with_max_result_bytes(self.max_result_bytes)
            .with_arg_validation(self.validate_args);
        match &self.tool_prefix {
            Some(prefix) => tools.with_workspace_tools_prefixed(session, prefix),
            None => tools.with_workspace_tools(session),
        }
    }

    /// The registered tool name for a bare command name.
    pub fn tool_name(&self, command: &str) -> String {
        match &self.tool_prefix {
            Some(prefix) if !command.starts_with(&format!("{prefix}.")) => {
                format!("{prefix}.{command}")
            }
            _ => command.to_string(),
        }
    }
}
