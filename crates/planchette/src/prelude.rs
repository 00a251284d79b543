//! Convenience re-exports for embedding a workspace.
//!
//! ```ignore
//! use planchette::prelude::*;
//! ```

// ── Core types ──────────────────────────────────────────────────────
pub use crate::{
    Anchor, Display, Session, ToolDef, Window, Workspace, WorkspaceConfig, json_schema_for,
};

// ── Storage ─────────────────────────────────────────────────────────
pub use crate::file::File;
pub use crate::storage::{Home, LocalStorage, MemoryStorage, Storage};

// ── Tools ───────────────────────────────────────────────────────────
pub use crate::tools::spec::ToolSpec;
pub use crate::tools::{Command, CommandKind, CommandTool, Tool, ToolFuture, ToolSet, WorkspaceToolsExt};
