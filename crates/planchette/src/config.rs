//! Workspace configuration with sensible defaults.
//!
//! [`WorkspaceConfig`] holds the two knobs that shape what an agent sees:
//! lines per window view and the report's character budget. It
//! deserializes from partial JSON (missing fields take their defaults) so
//! front ends can load it from a config file.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::display::{DEFAULT_SIZE_LIMIT, Display};
use crate::session::Session;
use crate::storage::Storage;
use crate::window::DEFAULT_PAGE_SIZE;
use crate::workspace::Workspace;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Lines shown per window. Default: `100`.
    pub page_size: usize,
    /// Report budget in characters. Default: `16384`.
    pub size_limit: usize,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            size_limit: DEFAULT_SIZE_LIMIT,
        }
    }
}

impl WorkspaceConfig {
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_size_limit(mut self, size_limit: usize) -> Self {
        self.size_limit = size_limit;
        self
    }

    pub fn build_workspace(&self, storage: Arc<dyn Storage>) -> Workspace {
        Workspace::new(storage).with_page_size(self.page_size)
    }

    pub fn build_display(&self) -> Display {
        Display::new(self.size_limit)
    }

    /// A fresh session over `storage`.
    pub fn build_session(&self, storage: Arc<dyn Storage>) -> Session {
        Session::new(self.build_workspace(storage), self.build_display())
    }
}
