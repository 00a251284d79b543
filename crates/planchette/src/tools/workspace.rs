//! One [`Tool`] per workspace command.
//!
//! Every tool shares the same [`Session`]. A successful call returns the
//! freshly rendered workspace report, so the agent always sees the effect
//! of what it just did. Failures come back as `Error: ...` strings:
//! argument problems read `invalid arguments for '<name>'`, everything else
//! reads `<name> failed`.

use tracing::debug;

use crate::ToolDef;
use crate::session::Session;
use crate::tools::commands::{Command, CommandKind};
use crate::tools::core::{Tool, ToolFuture};
use crate::tools::spec::ToolSpec;

const REPORT_FORMAT: &str = "The rendered workspace as markdown: each open window's visible \
     lines in a code block, its scroll position, and the focused window's cursor or selection";

/// A workspace command exposed as a tool.
pub struct CommandTool {
    kind: CommandKind,
    prefix: Option<String>,
    session: Session,
}

impl CommandTool {
    pub fn new(kind: CommandKind, session: Session) -> Self {
        Self {
            kind,
            prefix: None,
            session,
        }
    }

    /// Namespace the tool name as `{prefix}.{command}`.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    fn qualified(&self, name: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}.{name}"),
            None => name.to_string(),
        }
    }
}

impl Tool for CommandTool {
    fn definition(&self) -> ToolDef {
        let info = self.kind.info();
        let (when, when_not) = guidance(self.kind);
        let mut spec = ToolSpec::builder(self.qualified(self.kind.name()), info.description)
            .when_to_use(when)
            .when_not_to_use(when_not)
            .parameters(self.kind.parameters())
            .example(info.example_arguments, info.example)
            .output_format(REPORT_FORMAT);
        if let Some((scenario, other, reason)) = confusable(self.kind) {
            spec = spec.disambiguate(scenario, self.qualified(other.name()), reason);
        }
        spec.to_tool_def()
    }

    fn execute(&self, arguments: &str) -> ToolFuture<'_> {
        let arguments = arguments.to_string();
        Box::pin(async move {
            let name = self.qualified(self.kind.name());
            let command = match Command::from_arguments(self.kind, &arguments) {
                Ok(command) => command,
                Err(e) => return format!("Error: {}", e.for_command(&name)),
            };
            match self.session.run(&command).await {
                Ok(report) => report,
                Err(e) if e.is_validation() => format!("Error: {}", e.for_command(&name)),
                Err(e) => {
                    debug!("{name} failed: {e}");
                    format!("Error: {name} failed: {e}")
                }
            }
        })
    }
}

fn guidance(kind: CommandKind) -> (&'static str, &'static str) {
    match kind {
        CommandKind::Open => (
            "When you need to see or change a file that is not yet in the workspace, \
             or to bring an open file back into focus",
            "When the file is already open and you only want to switch to it (use focus)",
        ),
        CommandKind::Close => (
            "When a file is no longer needed and is taking up report space",
            "When you want to discard unsaved changes; edits are already persisted",
        ),
        CommandKind::Focus => (
            "When a file is already open and you want cursor commands to apply to it",
            "When the file has not been opened yet (use open)",
        ),
        CommandKind::Before => (
            "When you want to insert text immediately ahead of a known anchor",
            "When you want to replace text (use select or drag, then edit)",
        ),
        CommandKind::After => (
            "When you want to insert text immediately following a known anchor",
            "When you want to replace text (use select or drag, then edit)",
        ),
        CommandKind::Select => (
            "When you know distinctive text at both the start and end of the region to replace",
            "When the cursor is already at the start of the region (use drag)",
        ),
        CommandKind::Drag => (
            "When the cursor already sits at the start of the region you want to replace",
            "When the region starts somewhere other than the cursor (use select)",
        ),
        CommandKind::Edit => (
            "After positioning the cursor or selecting text, to insert or replace content",
            "Before navigating; edit applies at the current cursor or selection",
        ),
        CommandKind::Scroll => (
            "When the focused file is longer than one page and the part you need is out of view",
            "When you want to move the cursor (use before or after)",
        ),
    }
}

fn confusable(kind: CommandKind) -> Option<(&'static str, CommandKind, &'static str)> {
    match kind {
        CommandKind::Open => Some((
            "Switching to a file that is already open",
            CommandKind::Focus,
            "focus never touches storage",
        )),
        CommandKind::Before => Some((
            "Placing the cursor past the anchor",
            CommandKind::After,
            "before stops at the first character of the match",
        )),
        CommandKind::After => Some((
            "Placing the cursor at the start of the anchor",
            CommandKind::Before,
            "after moves past the last character of the match",
        )),
        CommandKind::Select => Some((
            "Extending from where the cursor already is",
            CommandKind::Drag,
            "drag uses the cursor as the start",
        )),
        CommandKind::Drag => Some((
            "Selecting between two anchors",
            CommandKind::Select,
            "select resolves both ends by search",
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorkspaceConfig;
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    fn session() -> Session {
        WorkspaceConfig::default().build_session(Arc::new(
            MemoryStorage::new().with_file("notes.md", "# Title\n\nbody text"),
        ))
    }

    #[test]
    fn definition_carries_description_schema_and_example() {
        let tool = CommandTool::new(CommandKind::Select, session());
        let def = tool.definition();
        assert_eq!(def.function.name, "select");
        assert!(
            def.function
                .description
                .starts_with("Select text between start and end markers")
        );
        assert!(def.function.description.contains(r#"{"start": "function", "end": "}"}"#));
        assert!(def.function.description.contains("use 'drag' instead"));
        let required = def.function.parameters["required"].as_array().unwrap();
        assert!(required.contains(&"start".into()));
        assert!(required.contains(&"end".into()));
    }

    #[test]
    fn prefix_applies_to_name_and_disambiguation() {
        let tool = CommandTool::new(CommandKind::Before, session()).with_prefix("planchette");
        let def = tool.definition();
        assert_eq!(def.function.name, "planchette.before");
        assert!(def.function.description.contains("'planchette.after'"));
    }

    #[tokio::test]
    async fn success_returns_report() {
        let session = session();
        let open = CommandTool::new(CommandKind::Open, session.clone());
        let report = open.execute(r#"{"file": "notes.md"}"#).await;
        assert!(report.starts_with("# Workspace"));
        assert!(report.contains("## Focused: `notes.md`"));
    }

    #[tokio::test]
    async fn validation_and_execution_errors_differ() {
        let session = session();
        CommandTool::new(CommandKind::Open, session.clone())
            .execute(r#"{"file": "notes.md"}"#)
            .await;

        let scroll = CommandTool::new(CommandKind::Scroll, session.clone());
        let bad_args = scroll.execute(r#"{"lines": "lots"}"#).await;
        assert!(bad_args.starts_with("Error: invalid arguments for 'scroll'"));

        let before = CommandTool::new(CommandKind::Before, session);
        let missing = before.execute(r#"{"target": "absent"}"#).await;
        assert_eq!(
            missing,
            "Error: before failed: `absent` not found"
        );
    }

    #[tokio::test]
    async fn prefixed_errors_use_the_qualified_name() {
        let session = session();
        CommandTool::new(CommandKind::Open, session.clone())
            .execute(r#"{"file": "notes.md"}"#)
            .await;

        let scroll =
            CommandTool::new(CommandKind::Scroll, session.clone()).with_prefix("planchette");
        let malformed = scroll.execute(r#"{"lines": true}"#).await;
        assert!(malformed.starts_with("Error: invalid arguments for 'planchette.scroll'"));
        let not_numeric = scroll.execute(r#"{"lines": "lots"}"#).await;
        assert!(not_numeric.starts_with("Error: invalid arguments for 'planchette.scroll'"));

        let before = CommandTool::new(CommandKind::Before, session).with_prefix("planchette");
        let missing = before.execute(r#"{"target": "absent"}"#).await;
        assert_eq!(missing, "Error: planchette.before failed: `absent` not found");
    }

    #[tokio::test]
    async fn storage_errors_are_execution_errors() {
        let open = CommandTool::new(CommandKind::Open, session());
        let result = open.execute(r#"{"file": "nope.md"}"#).await;
        assert!(result.starts_with("Error: open failed: Failed to read nope.md"));
    }
}
