//! A single open file's text buffer with cursor, selection, and scroll state.
//!
//! Positions are character offsets (Unicode scalar values) into the buffer.
//! Navigation never stores anchors: every `before`/`after`/`select`/`drag`
//! re-derives offsets by literal substring search against the current
//! content, so edits cannot leave stale positions behind.
//!
//! Invariant maintained by every operation:
//! `0 <= cursor <= selection_end <= char_len(content)` and
//! `0 <= scroll <= lines.len()`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::file::File;

/// Lines shown per view unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 100;

// ── Anchor ─────────────────────────────────────────────────────────

/// One end of a selection: literal text to search for, or a character
/// offset used as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Anchor {
    Offset(usize),
    Text(String),
}

impl From<&str> for Anchor {
    fn from(text: &str) -> Self {
        Anchor::Text(text.to_string())
    }
}

impl From<String> for Anchor {
    fn from(text: String) -> Self {
        Anchor::Text(text)
    }
}

impl From<usize> for Anchor {
    fn from(offset: usize) -> Self {
        Anchor::Offset(offset)
    }
}

/// Half-open character range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectedRange {
    pub start: usize,
    pub end: usize,
}

/// 1-based inclusive range of visible lines. When the window is scrolled
/// past its last line, `start_line` is `total_lines + 1` and the range is
/// empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScrollSummary {
    pub start_line: usize,
    pub end_line: usize,
    pub total_lines: usize,
}

impl ScrollSummary {
    /// Whether no line is in view.
    pub fn is_empty(&self) -> bool {
        self.start_line > self.end_line
    }
}

// ── Window ─────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Window {
    file: File,
    content: String,
    lines: Vec<String>,
    char_len: usize,
    cursor: usize,
    selection_end: usize,
    scroll: usize,
    page_size: usize,
}

impl Window {
    /// Build a window over already-fetched content. Cursor, selection, and
    /// scroll all start at zero.
    pub fn new(file: File, content: impl Into<String>) -> Self {
        let content = content.into();
        let mut window = Self {
            file,
            content,
            lines: Vec::new(),
            char_len: 0,
            cursor: 0,
            selection_end: 0,
            scroll: 0,
            page_size: DEFAULT_PAGE_SIZE,
        };
        window.refresh();
        window
    }

    /// Read `file` through its storage and build a window over the result.
    pub async fn load(file: File) -> Result<Self> {
        let content = file.read().await?;
        Ok(Self::new(file, content))
    }

    /// Set lines per view (builder pattern). Zero is treated as one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn file(&self) -> &File {
        &self.file
    }

    pub fn path(&self) -> &str {
        self.file.path()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn scroll_position(&self) -> usize {
        self.scroll
    }

    /// Content length in characters.
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    // ── Navigation ─────────────────────────────────────────────────

    /// First occurrence of `target` at or after character offset `from`.
    pub fn find(&self, target: &str, from: usize) -> Result<usize> {
        if from > self.char_len {
            return Err(Error::not_found(target));
        }
        let from_byte = self.byte_offset(from);
        let haystack = self.content.get(from_byte..).unwrap_or_default();
        let found = haystack
            .find(target)
            .ok_or_else(|| Error::not_found(target))?;
        let skipped = haystack.get(..found).unwrap_or_default().chars().count();
        Ok(from + skipped)
    }

    /// Place the cursor at the start of the first `target`.
    pub fn before(&mut self, target: &str) -> Result<()> {
        let offset = self.find(target, 0)?;
        self.collapse_to(offset);
        debug!("{}: cursor before {target:?} at {offset}", self.path());
        Ok(())
    }

    /// Place the cursor just past the first `target`.
    pub fn after(&mut self, target: &str) -> Result<()> {
        let offset = self.find(target, 0)? + target.chars().count();
        self.collapse_to(offset);
        debug!("{}: cursor after {target:?} at {offset}", self.path());
        Ok(())
    }

    /// Select from `start` through the end of `end`. A text `end` is searched
    /// for starting at the resolved start, so it may overlap it.
    ///
    /// Leaves the window untouched on failure.
    pub fn select(&mut self, start: impl Into<Anchor>, end: impl Into<Anchor>) -> Result<()> {
        let range = self.resolve(&start.into(), &end.into())?;
        self.cursor = range.start;
        self.selection_end = range.end;
        debug!(
            "{}: selecting {}..{}",
            self.path(),
            range.start,
            range.end
        );
        Ok(())
    }

    /// Extend the selection from the cursor through the next `target`.
    pub fn drag(&mut self, target: &str) -> Result<()> {
        self.select(Anchor::Offset(self.cursor), Anchor::Text(target.to_string()))
    }

    /// Replace the selection (or insert at the cursor) and persist the whole
    /// buffer.
    ///
    /// Cursor and selection are not collapsed; `selection_end` is clamped if
    /// the buffer shrank past it. If the write fails the in-memory buffer
    /// keeps the edit and the storage error is returned.
    pub async fn edit(&mut self, replacement: &str) -> Result<()> {
        let start = self.byte_offset(self.cursor);
        let end = self.byte_offset(self.selection_end);
        self.content.replace_range(start..end, replacement);
        self.refresh();
        debug!(
            "{}: replaced {}..{} with {} chars",
            self.path(),
            self.cursor,
            self.selection_end,
            replacement.chars().count()
        );
        trace!("{}: replacement text {replacement:?}", self.path());

        if let Err(e) = self.file.write(&self.content).await {
            warn!("{}: edit kept in memory but not persisted: {e}", self.path());
            return Err(e.into());
        }
        Ok(())
    }

    /// Move the first visible line by `delta`, saturating at both ends.
    pub fn scroll(&mut self, delta: i64) {
        let max = self.lines.len() as i64;
        let next = (self.scroll as i64).saturating_add(delta).clamp(0, max);
        self.scroll = next as usize;
        trace!("{}: scrolled to line {}", self.path(), self.scroll);
    }

    // ── Queries ────────────────────────────────────────────────────

    pub fn cursor_position(&self) -> usize {
        self.cursor
    }

    pub fn is_selecting(&self) -> bool {
        self.selection_end > self.cursor
    }

    pub fn selected_range(&self) -> SelectedRange {
        SelectedRange {
            start: self.cursor,
            end: self.selection_end,
        }
    }

    pub fn selected_text(&self) -> &str {
        let start = self.byte_offset(self.cursor);
        let end = self.byte_offset(self.selection_end);
        self.content.get(start..end).unwrap_or_default()
    }

    /// The `page_size` lines starting at the scroll position.
    pub fn visible_text(&self) -> String {
        self.lines
            .iter()
            .skip(self.scroll)
            .take(self.page_size)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether part of the content is out of view.
    pub fn is_scrolled(&self) -> bool {
        self.lines.len() > self.page_size || self.scroll > 0
    }

    pub fn scroll_summary(&self) -> ScrollSummary {
        let total = self.lines.len();
        ScrollSummary {
            start_line: self.scroll + 1,
            end_line: (self.scroll + self.page_size).min(total),
            total_lines: total,
        }
    }

    // ── Internals ──────────────────────────────────────────────────

    fn resolve(&self, start: &Anchor, end: &Anchor) -> Result<SelectedRange> {
        let invalid = |start: usize, end: usize| Error::InvalidRange {
            start,
            end,
            len: self.char_len,
        };

        let start = match start {
            Anchor::Offset(n) if *n > self.char_len => return Err(invalid(*n, *n)),
            Anchor::Offset(n) => *n,
            Anchor::Text(text) => self.find(text, 0)?,
        };
        let end = match end {
            Anchor::Offset(n) => *n,
            Anchor::Text(text) => self.find(text, start)? + text.chars().count(),
        };
        if end < start || end > self.char_len {
            return Err(invalid(start, end));
        }
        Ok(SelectedRange { start, end })
    }

    fn collapse_to(&mut self, offset: usize) {
        self.cursor = offset;
        self.selection_end = offset;
    }

    /// Recompute derived state after `content` changes.
    fn refresh(&mut self) {
        self.lines = self.content.split('\n').map(str::to_string).collect();
        self.char_len = self.content.chars().count();
        self.cursor = self.cursor.min(self.char_len);
        self.selection_end = self.selection_end.clamp(self.cursor, self.char_len);
        self.scroll = self.scroll.min(self.lines.len());
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.content
            .char_indices()
            .nth(chars)
            .map_or(self.content.len(), |(byte, _)| byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, Storage};
    use std::sync::Arc;

    const THREE_LINES: &str = "line1\nline2\nline3";

    fn window(content: &str) -> (Window, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new().with_file("test.txt", content));
        let file = File::new("test.txt", storage.clone());
        (Window::new(file, content), storage)
    }

    #[test]
    fn starts_collapsed_at_zero() {
        let (w, _) = window(THREE_LINES);
        assert_eq!(w.cursor_position(), 0);
        assert!(!w.is_selecting());
        assert_eq!(w.selected_text(), "");
        assert_eq!(w.line_count(), 3);
    }

    #[test]
    fn before_and_after_position_cursor() {
        let (mut w, _) = window(THREE_LINES);
        w.before("line2").unwrap();
        assert_eq!(w.cursor_position(), 6);
        w.after("line2").unwrap();
        assert_eq!(w.cursor_position(), 11);
        assert!(!w.is_selecting());
    }

    #[test]
    fn before_then_after_differ_by_target_length() {
        let (mut w, _) = window("fn main() { println!(\"hi\"); }");
        w.before("println").unwrap();
        let before = w.cursor_position();
        w.after("println").unwrap();
        assert_eq!(w.cursor_position(), before + "println".len());
    }

    #[test]
    fn missing_target_is_not_found_and_keeps_state() {
        let (mut w, _) = window(THREE_LINES);
        w.before("line3").unwrap();
        let err = w.before("line9").unwrap_err();
        assert!(matches!(err, Error::NotFound { ref target } if target == "line9"));
        assert_eq!(w.cursor_position(), 12);
    }

    #[test]
    fn select_text_anchors() {
        let (mut w, _) = window(THREE_LINES);
        w.select("line2", "line3").unwrap();
        assert_eq!(w.selected_text(), "line2\nline3");
        assert_eq!(w.selected_range(), SelectedRange { start: 6, end: 17 });
        assert!(w.is_selecting());
    }

    #[test]
    fn select_end_may_overlap_start() {
        let (mut w, _) = window("abc abc");
        w.select("abc", "abc").unwrap();
        assert_eq!(w.selected_text(), "abc");
    }

    #[test]
    fn select_end_searched_from_start() {
        let (mut w, _) = window("} fn a() { body }");
        w.select("fn", "}").unwrap();
        assert_eq!(w.selected_text(), "fn a() { body }");
    }

    #[test]
    fn select_numeric_offsets() {
        let (mut w, _) = window(THREE_LINES);
        w.select(0usize, 5usize).unwrap();
        assert_eq!(w.selected_text(), "line1");
    }

    #[test]
    fn select_rejects_out_of_range_offsets() {
        let (mut w, _) = window("short");
        assert!(matches!(
            w.select(2usize, 99usize),
            Err(Error::InvalidRange { len: 5, .. })
        ));
        assert!(matches!(
            w.select(4usize, 1usize),
            Err(Error::InvalidRange { .. })
        ));
        assert!(!w.is_selecting());
    }

    #[test]
    fn drag_extends_from_cursor() {
        let (mut w, _) = window(THREE_LINES);
        w.before("line2").unwrap();
        w.drag("line3").unwrap();
        assert_eq!(w.selected_range(), SelectedRange { start: 6, end: 17 });
        assert_eq!(w.selected_text(), "line2\nline3");
    }

    #[test]
    fn drag_ignores_matches_before_cursor() {
        let (mut w, _) = window("a; b; c;");
        w.after("b").unwrap();
        w.drag(";").unwrap();
        assert_eq!(w.selected_text(), ";");
        assert_eq!(w.cursor_position(), 4);
    }

    #[tokio::test]
    async fn edit_inserts_without_selection() {
        let (mut w, storage) = window(THREE_LINES);
        w.after("line1").unwrap();
        w.edit(" extra").await.unwrap();
        assert_eq!(w.content(), "line1 extra\nline2\nline3");
        assert_eq!(w.char_len(), THREE_LINES.len() + " extra".len());
        assert_eq!(storage.get("test.txt").as_deref(), Some(w.content()));
    }

    #[tokio::test]
    async fn edit_replaces_selection_and_persists_whole_buffer() {
        let (mut w, storage) = window(THREE_LINES);
        w.select("line2", "line3").unwrap();
        w.edit("X").await.unwrap();
        assert_eq!(w.content(), "line1\nX");
        assert_eq!(w.lines(), ["line1", "X"]);
        assert_eq!(storage.get("test.txt").as_deref(), Some("line1\nX"));
        // Selection end is clamped to the shorter buffer, not collapsed.
        assert_eq!(w.selected_range(), SelectedRange { start: 6, end: 7 });
    }

    #[tokio::test]
    async fn edit_keeps_buffer_when_write_fails() {
        struct ReadOnly;
        impl Storage for ReadOnly {
            fn read<'a>(&'a self, _: &'a str) -> crate::storage::StorageFuture<'a, String> {
                Box::pin(async { Ok(String::new()) })
            }
            fn write<'a>(&'a self, path: &'a str, _: &'a str) -> crate::storage::StorageFuture<'a, ()> {
                Box::pin(async move {
                    Err(crate::error::StorageError::new(
                        crate::error::StorageOp::Write,
                        path,
                        std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
                    ))
                })
            }
            fn remove<'a>(&'a self, _: &'a str) -> crate::storage::StorageFuture<'a, ()> {
                Box::pin(async { Ok(()) })
            }
            fn exists<'a>(&'a self, _: &'a str) -> crate::storage::ExistsFuture<'a> {
                Box::pin(async { true })
            }
        }

        let mut w = Window::new(File::new("ro.txt", Arc::new(ReadOnly)), "abc");
        let err = w.edit("Z").await.unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
        assert_eq!(w.content(), "Zabc");
    }

    #[tokio::test]
    async fn multibyte_offsets_are_characters() {
        let (mut w, _) = window("héllo wörld");
        w.before("wörld").unwrap();
        assert_eq!(w.cursor_position(), 6);
        w.drag("ö").unwrap();
        assert_eq!(w.selected_text(), "wö");
        w.edit("W").await.unwrap();
        assert_eq!(w.content(), "héllo Wrld");
    }

    #[test]
    fn scroll_saturates() {
        let (mut w, _) = window(THREE_LINES);
        w.scroll(-10);
        assert_eq!(w.scroll_position(), 0);
        w.scroll(2);
        assert_eq!(w.scroll_position(), 2);
        w.scroll(i64::MAX);
        assert_eq!(w.scroll_position(), 3);
        w.scroll(i64::MIN);
        assert_eq!(w.scroll_position(), 0);
    }

    #[test]
    fn visible_text_and_scroll_summary() {
        let content = (1..=10).map(|i| format!("l{i}")).collect::<Vec<_>>().join("\n");
        let (w, _) = window(&content);
        let mut w = w.with_page_size(4);

        assert!(w.is_scrolled());
        assert_eq!(w.visible_text(), "l1\nl2\nl3\nl4");
        assert_eq!(
            w.scroll_summary(),
            ScrollSummary { start_line: 1, end_line: 4, total_lines: 10 }
        );

        w.scroll(8);
        assert_eq!(w.visible_text(), "l9\nl10");
        assert_eq!(
            w.scroll_summary(),
            ScrollSummary { start_line: 9, end_line: 10, total_lines: 10 }
        );
        assert!(!w.scroll_summary().is_empty());

        w.scroll(2);
        assert_eq!(w.visible_text(), "");
        let view = w.scroll_summary();
        assert_eq!(
            view,
            ScrollSummary { start_line: 11, end_line: 10, total_lines: 10 }
        );
        assert!(view.is_empty());
    }

    #[test]
    fn short_content_is_not_scrolled() {
        let (w, _) = window(THREE_LINES);
        assert!(!w.is_scrolled());
        assert_eq!(w.visible_text(), THREE_LINES);
    }

    #[tokio::test]
    async fn load_reads_through_storage() {
        let storage = Arc::new(MemoryStorage::new().with_file("a.txt", "from storage"));
        let w = Window::load(File::new("a.txt", storage)).await.unwrap();
        assert_eq!(w.content(), "from storage");
        assert_eq!(w.path(), "a.txt");
    }
}
