//! Workspace commands as LLM tools.
//!
//! - [`core`]: the [`Tool`] trait and [`ToolSet`] dispatcher.
//! - [`spec`]: structured [`ToolSpec`](spec::ToolSpec) descriptions.
//! - [`commands`]: the typed [`Command`](commands::Command) table.
//! - [`workspace`]: one [`CommandTool`] per command, and the
//!   [`WorkspaceToolsExt`] registration trait below.

pub mod commands;
pub mod core;
pub mod spec;
pub mod workspace;

pub use self::core::{DEFAULT_MAX_RESULT_BYTES, Tool, ToolFuture, ToolSet};
pub use commands::{Command, CommandKind};
pub use workspace::CommandTool;

use crate::session::Session;

// ── Tool name constants ─────────────────────────────────────────────

pub const OPEN: &str = "open";
pub const CLOSE: &str = "close";
pub const FOCUS: &str = "focus";
pub const BEFORE: &str = "before";
pub const AFTER: &str = "after";
pub const SELECT: &str = "select";
pub const DRAG: &str = "drag";
pub const EDIT: &str = "edit";
pub const SCROLL: &str = "scroll";

// ── Extension trait ─────────────────────────────────────────────────

/// Extension trait for registering workspace tools on a [`ToolSet`].
///
/// # Example
///
/// ```ignore
/// use planchette::prelude::*;
///
/// let tools = ToolSet::new()
///     .with_arg_validation(true)
///     .with_workspace_tools_prefixed(&session, "planchette");
/// ```
pub trait WorkspaceToolsExt {
    /// Register one tool per command, all driving `session`.
    fn with_workspace_tools(self, session: &Session) -> Self;

    /// Like [`with_workspace_tools`](Self::with_workspace_tools), with tool
    /// names of the form `{prefix}.{command}`.
    fn with_workspace_tools_prefixed(self, session: &Session, prefix: &str) -> Self;
}

impl WorkspaceToolsExt for ToolSet {
    fn with_workspace_tools(self, session: &Session) -> Self {
        CommandKind::ALL.into_iter().fold(self, |set, kind| {
            set.with(CommandTool::new(kind, session.clone()))
        })
    }

    fn with_workspace_tools_prefixed(self, session: &Session, prefix: &str) -> Self {
        CommandKind::ALL.into_iter().fold(self, |set, kind| {
            set.with(CommandTool::new(kind, session.clone()).with_prefix(prefix))
        })
    }
}
