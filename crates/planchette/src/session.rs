//! A workspace shared between tools, plus the display that renders it.
//!
//! Every tool registered for a session holds a clone of the same
//! [`Session`]. The workspace sits behind one async mutex so a command
//! (including its storage round-trip) and the render that follows it see a
//! consistent window list.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::display::Display;
use crate::error::Result;
use crate::tools::commands::Command;
use crate::workspace::Workspace;

#[derive(Clone)]
pub struct Session {
    workspace: Arc<Mutex<Workspace>>,
    display: Display,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("display", &self.display)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(workspace: Workspace, display: Display) -> Self {
        Self {
            workspace: Arc::new(Mutex::new(workspace)),
            display,
        }
    }

    pub fn workspace(&self) -> &Arc<Mutex<Workspace>> {
        &self.workspace
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    /// Validate and apply `command`.
    pub async fn execute(&self, command: &Command) -> Result<()> {
        let mut workspace = self.workspace.lock().await;
        command.perform(&mut workspace).await
    }

    /// Render the workspace as it stands.
    pub async fn render(&self) -> String {
        let workspace = self.workspace.lock().await;
        self.display.render_workspace(&workspace)
    }

    /// Apply `command` and render the result under the same lock.
    pub async fn run(&self, command: &Command) -> Result<String> {
        let mut workspace = self.workspace.lock().await;
        command.perform(&mut workspace).await?;
        let report = self.display.render_workspace(&workspace);
        debug!(
            "{} -> report of {} chars",
            command.kind().name(),
            report.chars().count()
        );
        Ok(report)
    }
}
