//! The set of open windows, most recently focused first.
//!
//! The front of the deque is the focused window and the implicit target of
//! every cursor, selection, edit, and scroll command. There is at most one
//! window per path.

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::file::{File, normalize_path};
use crate::storage::Storage;
use crate::window::{DEFAULT_PAGE_SIZE, Window};

pub struct Workspace {
    storage: Arc<dyn Storage>,
    windows: VecDeque<Window>,
    page_size: usize,
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("windows", &self.paths())
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl Workspace {
    /// An empty workspace reading through `storage`. Pass a
    /// [`Home`](crate::storage::Home) to resolve relative paths.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            windows: VecDeque::new(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Lines per view for windows opened from now on (builder pattern).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Focus `path`, loading it first if it is not already open.
    ///
    /// An open window is moved to the front without re-reading storage. A
    /// failed read leaves the workspace unchanged.
    pub async fn open(&mut self, path: &str) -> Result<()> {
        let path = normalize_path(path);
        if self.focus(&path) {
            debug!("{path} already open, focused");
            return Ok(());
        }
        let file = File::new(&path, self.storage.clone());
        let window = Window::load(file).await?.with_page_size(self.page_size);
        info!(
            "Opened {path} ({} lines, {} windows open)",
            window.line_count(),
            self.windows.len() + 1
        );
        self.windows.push_front(window);
        Ok(())
    }

    /// Drop the window for `path`. Returns whether one was open.
    pub fn close(&mut self, path: &str) -> bool {
        match self.position(path) {
            Some(index) => {
                self.windows.remove(index);
                info!("Closed {path} ({} windows open)", self.windows.len());
                true
            }
            None => {
                debug!("close({path}): not open");
                false
            }
        }
    }

    /// Move the window for `path` to the front. Returns whether one was open.
    pub fn focus(&mut self, path: &str) -> bool {
        let Some(index) = self.position(path) else {
            return false;
        };
        if index > 0
            && let Some(window) = self.windows.remove(index)
        {
            self.windows.push_front(window);
            debug!("Focused {path}");
        }
        true
    }

    /// The focused window, if any.
    pub fn current(&self) -> Option<&Window> {
        self.windows.front()
    }

    pub fn current_mut(&mut self) -> Option<&mut Window> {
        self.windows.front_mut()
    }

    /// The focused window, or [`Error::NoFocusedWindow`].
    pub fn current_or_err(&mut self) -> Result<&mut Window> {
        self.windows.front_mut().ok_or(Error::NoFocusedWindow)
    }

    pub fn find(&self, path: &str) -> Option<&Window> {
        self.position(path).and_then(|index| self.windows.get(index))
    }

    /// Windows in focus order.
    pub fn windows(&self) -> impl Iterator<Item = &Window> {
        self.windows.iter()
    }

    pub fn paths(&self) -> Vec<&str> {
        self.windows.iter().map(Window::path).collect()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Index of the window for `path` under any spelling of it.
    fn position(&self, path: &str) -> Option<usize> {
        let path = normalize_path(path);
        self.windows.iter().position(|w| w.path() == path)
    }
}
