//! The typed command table.
//!
//! Each command is a [`Command`] variant carrying its own argument struct.
//! [`Command::validate`] is a pure shape check that runs before anything is
//! touched, so a bad argument always surfaces as
//! [`Error::Validation`](crate::Error::Validation) and never as a half-applied
//! change. [`Command::perform`] applies a validated command to a workspace.
//!
//! Commands serialize as `{"name": "...", "arguments": {...}}`.

use std::path::{Component, Path};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Error, Result};
use crate::file::normalize_path;
use crate::window::Anchor;
use crate::workspace::Workspace;

// ── Argument types ─────────────────────────────────────────────────

/// Arguments for `open`, `close`, and `focus`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FileArgs {
    /// Path of the file, relative to the workspace home.
    pub file: String,
}

impl FileArgs {
    pub fn new(file: impl Into<String>) -> Self {
        Self { file: file.into() }
    }
}

/// Arguments for `before`, `after`, and `drag`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TargetArgs {
    /// Literal text to search for in the focused window (not a regex).
    pub target: String,
}

impl TargetArgs {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }
}

/// Arguments for `select`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SelectArgs {
    /// Text where the selection begins, or a character offset.
    pub start: Anchor,
    /// Text where the selection ends (searched from `start`, inclusive), or
    /// a character offset.
    pub end: Anchor,
}

impl SelectArgs {
    pub fn new(start: impl Into<Anchor>, end: impl Into<Anchor>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// Arguments for `edit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EditArgs {
    /// Text that replaces the selection, or is inserted at the cursor.
    pub content: String,
}

impl EditArgs {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// A signed line count, given as a JSON integer or a numeric string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum LineDelta {
    Number(i64),
    Text(String),
}

/// Arguments for `scroll`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScrollArgs {
    /// Lines to scroll: positive moves down, negative moves up.
    pub lines: LineDelta,
}

impl ScrollArgs {
    pub fn new(lines: i64) -> Self {
        Self {
            lines: LineDelta::Number(lines),
        }
    }

    /// The parsed line delta.
    pub fn delta(&self) -> Result<i64> {
        match &self.lines {
            LineDelta::Number(n) => Ok(*n),
            LineDelta::Text(text) => text.trim().parse().map_err(|_| {
                Error::validation(
                    CommandKind::Scroll.name(),
                    format!("`lines` must be an integer, got {text:?}"),
                )
            }),
        }
    }
}

// ── Command kinds ──────────────────────────────────────────────────

/// The name of a command, without its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Open,
    Close,
    Focus,
    Before,
    After,
    Select,
    Drag,
    Edit,
    Scroll,
}

/// Human-readable metadata for a command.
#[derive(Debug, Clone, Copy)]
pub struct CommandInfo {
    pub description: &'static str,
    pub example: &'static str,
    pub example_arguments: &'static str,
}

impl CommandKind {
    pub const ALL: [CommandKind; 9] = [
        CommandKind::Open,
        CommandKind::Close,
        CommandKind::Focus,
        CommandKind::Before,
        CommandKind::After,
        CommandKind::Select,
        CommandKind::Drag,
        CommandKind::Edit,
        CommandKind::Scroll,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CommandKind::Open => "open",
            CommandKind::Close => "close",
            CommandKind::Focus => "focus",
            CommandKind::Before => "before",
            CommandKind::After => "after",
            CommandKind::Select => "select",
            CommandKind::Drag => "drag",
            CommandKind::Edit => "edit",
            CommandKind::Scroll => "scroll",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn info(self) -> CommandInfo {
        let (description, example, example_arguments) = match self {
            CommandKind::Open => (
                "Open the specified file in the current Workspace",
                "Open the file test.txt",
                r#"{"file": "test.txt"}"#,
            ),
            CommandKind::Close => (
                "Close the specified file in the current Workspace",
                "Close the file test.txt",
                r#"{"file": "test.txt"}"#,
            ),
            CommandKind::Focus => (
                "Focus on a specific file in the current Workspace",
                "Focus on the file utils.js",
                r#"{"file": "utils.js"}"#,
            ),
            CommandKind::Before => (
                "Position the cursor before specified text in the focused Window",
                "Position cursor before the first occurrence of \"function\"",
                r#"{"target": "function"}"#,
            ),
            CommandKind::After => (
                "Position the cursor after specified text in the focused Window",
                "Position cursor after the first occurrence of \"import\"",
                r#"{"target": "import"}"#,
            ),
            CommandKind::Select => (
                "Select text between start and end markers in the focused Window",
                "Select text from \"function\" to the next \"}\"",
                r#"{"start": "function", "end": "}"}"#,
            ),
            CommandKind::Drag => (
                "Select text from the current cursor position to specified target in the focused Window",
                "Select from current position to the next \";\"",
                r#"{"target": ";"}"#,
            ),
            CommandKind::Edit => (
                "Replace selected text or insert at cursor in the focused Window",
                "Replace selected text with \"const newFunction = () => {};\"",
                r#"{"content": "const newFunction = () => {};"}"#,
            ),
            CommandKind::Scroll => (
                "Scroll the focused Window up or down by specified lines",
                "Scroll down 10 lines",
                r#"{"lines": 10}"#,
            ),
        };
        CommandInfo {
            description,
            example,
            example_arguments,
        }
    }

    /// JSON Schema for this command's arguments.
    pub fn parameters(self) -> serde_json::Value {
        match self {
            CommandKind::Open | CommandKind::Close | CommandKind::Focus => {
                crate::json_schema_for::<FileArgs>()
            }
            CommandKind::Before | CommandKind::After | CommandKind::Drag => {
                crate::json_schema_for::<TargetArgs>()
            }
            CommandKind::Select => crate::json_schema_for::<SelectArgs>(),
            CommandKind::Edit => crate::json_schema_for::<EditArgs>(),
            CommandKind::Scroll => crate::json_schema_for::<ScrollArgs>(),
        }
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ── Command ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", content = "arguments", rename_all = "snake_case")]
pub enum Command {
    Open(FileArgs),
    Close(FileArgs),
    Focus(FileArgs),
    Before(TargetArgs),
    After(TargetArgs),
    Select(SelectArgs),
    Drag(TargetArgs),
    Edit(EditArgs),
    Scroll(ScrollArgs),
}

impl Command {
    /// Parse raw JSON `arguments` for the command `kind`.
    ///
    /// Malformed JSON and missing or mistyped fields are validation errors.
    pub fn from_arguments(kind: CommandKind, arguments: &str) -> Result<Self> {
        let invalid = |e: serde_json::Error| Error::validation(kind.name(), e.to_string());
        let command = match kind {
            CommandKind::Open => Command::Open(serde_json::from_str(arguments).map_err(invalid)?),
            CommandKind::Close => Command::Close(serde_json::from_str(arguments).map_err(invalid)?),
            CommandKind::Focus => Command::Focus(serde_json::from_str(arguments).map_err(invalid)?),
            CommandKind::Before => {
                Command::Before(serde_json::from_str(arguments).map_err(invalid)?)
            }
            CommandKind::After => Command::After(serde_json::from_str(arguments).map_err(invalid)?),
            CommandKind::Select => {
                Command::Select(serde_json::from_str(arguments).map_err(invalid)?)
            }
            CommandKind::Drag => Command::Drag(serde_json::from_str(arguments).map_err(invalid)?),
            CommandKind::Edit => Command::Edit(serde_json::from_str(arguments).map_err(invalid)?),
            CommandKind::Scroll => {
                Command::Scroll(serde_json::from_str(arguments).map_err(invalid)?)
            }
        };
        Ok(command)
    }

    /// Parse a command by name. Unknown names are validation errors.
    pub fn parse(name: &str, arguments: &str) -> Result<Self> {
        let kind = CommandKind::from_name(name)
            .ok_or_else(|| Error::validation(name, "unknown command"))?;
        Self::from_arguments(kind, arguments)
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Open(_) => CommandKind::Open,
            Command::Close(_) => CommandKind::Close,
            Command::Focus(_) => CommandKind::Focus,
            Command::Before(_) => CommandKind::Before,
            Command::After(_) => CommandKind::After,
            Command::Select(_) => CommandKind::Select,
            Command::Drag(_) => CommandKind::Drag,
            Command::Edit(_) => CommandKind::Edit,
            Command::Scroll(_) => CommandKind::Scroll,
        }
    }

    /// Check argument shape without touching any state.
    pub fn validate(&self) -> Result<()> {
        let name = self.kind().name();
        match self {
            Command::Open(args) | Command::Close(args) | Command::Focus(args) => {
                validate_file(name, &args.file)
            }
            Command::Before(args) | Command::After(args) | Command::Drag(args) => {
                require_text(name, "target", &args.target)
            }
            Command::Select(args) => {
                if let Anchor::Text(start) = &args.start {
                    require_text(name, "start", start)?;
                }
                if let Anchor::Text(end) = &args.end {
                    require_text(name, "end", end)?;
                }
                Ok(())
            }
            Command::Edit(_) => Ok(()),
            Command::Scroll(args) => args.delta().map(|_| ()),
        }
    }

    /// Validate, then apply to `workspace`.
    pub async fn perform(&self, workspace: &mut Workspace) -> Result<()> {
        self.validate()?;
        trace!("Performing {self:?}");
        match self {
            Command::Open(args) => workspace.open(&args.file).await,
            Command::Close(args) => {
                workspace.close(&args.file);
                Ok(())
            }
            Command::Focus(args) => {
                workspace.focus(&args.file);
                Ok(())
            }
            Command::Before(args) => workspace.current_or_err()?.before(&args.target),
            Command::After(args) => workspace.current_or_err()?.after(&args.target),
            Command::Select(args) => workspace
                .current_or_err()?
                .select(args.start.clone(), args.end.clone()),
            Command::Drag(args) => workspace.current_or_err()?.drag(&args.target),
            Command::Edit(args) => workspace.current_or_err()?.edit(&args.content).await,
            Command::Scroll(args) => {
                let delta = args.delta()?;
                workspace.current_or_err()?.scroll(delta);
                Ok(())
            }
        }
    }
}

fn require_text(command: &str, field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::validation(
            command,
            format!("`{field}` must not be empty"),
        ));
    }
    Ok(())
}

fn validate_file(command: &str, file: &str) -> Result<()> {
    if file.trim().is_empty() || normalize_path(file).is_empty() {
        return Err(Error::validation(command, "`file` must not be empty"));
    }
    if Path::new(file)
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return Err(Error::validation(
            command,
            format!("`file` must not contain '..': {file}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    fn workspace() -> Workspace {
        Workspace::new(Arc::new(
            MemoryStorage::new().with_file("doc.txt", "line1\nline2\nline3"),
        ))
    }

    #[test]
    fn every_kind_round_trips_its_name() {
        for kind in CommandKind::ALL {
            assert_eq!(CommandKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(CommandKind::from_name("delete"), None);
    }

    #[test]
    fn every_example_parses_and_validates() {
        for kind in CommandKind::ALL {
            let info = kind.info();
            let command = Command::from_arguments(kind, info.example_arguments)
                .unwrap_or_else(|e| panic!("{kind}: {e}"));
            assert_eq!(command.kind(), kind);
            command.validate().unwrap();
        }
    }

    #[test]
    fn deserializes_from_name_and_arguments() {
        let command: Command =
            serde_json::from_str(r#"{"name": "select", "arguments": {"start": "a", "end": 3}}"#)
                .unwrap();
        assert_eq!(
            command,
            Command::Select(SelectArgs::new("a", 3usize))
        );
    }

    #[test]
    fn scroll_accepts_integer_or_numeric_string() {
        let a = Command::parse("scroll", r#"{"lines": -4}"#).unwrap();
        let b = Command::parse("scroll", r#"{"lines": " 12 "}"#).unwrap();
        assert!(matches!(a, Command::Scroll(ref s) if s.delta().unwrap() == -4));
        assert!(matches!(b, Command::Scroll(ref s) if s.delta().unwrap() == 12));
    }

    #[test]
    fn scroll_rejects_non_numeric_string() {
        let command = Command::parse("scroll", r#"{"lines": "down"}"#).unwrap();
        let err = command.validate().unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("`lines` must be an integer"));
    }

    #[test]
    fn missing_or_mistyped_fields_are_validation_errors() {
        assert!(Command::parse("open", "{}").unwrap_err().is_validation());
        assert!(Command::parse("edit", r#"{"content": 5}"#).unwrap_err().is_validation());
        assert!(Command::parse("before", "not json").unwrap_err().is_validation());
        assert!(Command::parse("explode", "{}").unwrap_err().is_validation());
    }

    #[test]
    fn rejects_empty_targets_and_parent_paths() {
        assert!(Command::Before(TargetArgs::new("")).validate().is_err());
        assert!(Command::Open(FileArgs::new("  ")).validate().is_err());
        assert!(Command::Open(FileArgs::new("./")).validate().is_err());
        assert!(Command::Open(FileArgs::new("../etc/passwd")).validate().is_err());
        assert!(Command::Select(SelectArgs::new("", "x")).validate().is_err());
        assert!(Command::Open(FileArgs::new("src/lib.rs")).validate().is_ok());
        assert!(Command::Edit(EditArgs::new("")).validate().is_ok());
    }

    #[tokio::test]
    async fn invalid_command_does_not_mutate() {
        let mut ws = workspace();
        Command::Open(FileArgs::new("doc.txt")).perform(&mut ws).await.unwrap();
        Command::After(TargetArgs::new("line1")).perform(&mut ws).await.unwrap();

        let bad = Command::Scroll(ScrollArgs {
            lines: LineDelta::Text("lots".into()),
        });
        assert!(bad.perform(&mut ws).await.unwrap_err().is_validation());
        let window = ws.current().unwrap();
        assert_eq!(window.cursor_position(), 5);
        assert_eq!(window.scroll_position(), 0);
    }

    #[tokio::test]
    async fn perform_drives_the_focused_window() {
        let mut ws = workspace();
        for command in [
            Command::Open(FileArgs::new("doc.txt")),
            Command::Select(SelectArgs::new("line2", "line3")),
            Command::Edit(EditArgs::new("X")),
        ] {
            command.perform(&mut ws).await.unwrap();
        }
        assert_eq!(ws.current().unwrap().content(), "line1\nX");
    }

    #[tokio::test]
    async fn not_found_is_an_execution_error() {
        let mut ws = workspace();
        Command::Open(FileArgs::new("doc.txt")).perform(&mut ws).await.unwrap();
        let err = Command::Drag(TargetArgs::new("nope"))
            .perform(&mut ws)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
        assert!(!err.is_validation());
    }
}
