//! Markdown rendering of a workspace under a character budget.
//!
//! Windows are rendered in focus order. Each one becomes a block with a
//! header, its visible lines fenced as code, and a scroll status line; the
//! focused window also reports its cursor or selection. Blocks are added
//! while the report stays under the budget. The first block that would not
//! fit, and every block after it, is counted in a trailing `Hidden` note
//! instead of being cut mid-way.

use tracing::debug;

use crate::window::Window;
use crate::workspace::Workspace;

/// Default report budget in characters.
pub const DEFAULT_SIZE_LIMIT: usize = 16_384;

const TITLE: &str = "# Workspace\n\n";
const EMPTY: &str = "The Workspace is empty, no Windows are open.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Display {
    size_limit: usize,
}

impl Default for Display {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE_LIMIT)
    }
}

impl Display {
    pub fn new(size_limit: usize) -> Self {
        Self { size_limit }
    }

    pub fn size_limit(&self) -> usize {
        self.size_limit
    }

    pub fn render_workspace(&self, workspace: &Workspace) -> String {
        self.render(workspace.windows())
    }

    /// Render `windows`, the first of which is treated as focused.
    pub fn render<'a>(&self, windows: impl IntoIterator<Item = &'a Window>) -> String {
        let mut text = String::from(TITLE);
        let mut used = TITLE.chars().count();
        let mut shown = 0usize;
        let mut hidden = 0usize;

        for (index, window) in windows.into_iter().enumerate() {
            if hidden > 0 {
                hidden += 1;
                continue;
            }
            let block = render_block(index, window);
            let block_len = block.chars().count();
            if used + block_len < self.size_limit {
                text.push_str(&block);
                text.push_str("\n\n");
                used += block_len + 2;
                shown += 1;
            } else {
                hidden += 1;
            }
        }

        if shown == 0 && hidden == 0 {
            text.push_str(EMPTY);
            return text;
        }
        if hidden > 0 {
            text.push_str(&format!("## Hidden: {hidden} windows"));
        }
        debug!(
            "Rendered workspace: {shown} shown, {hidden} hidden, {used}/{} chars",
            self.size_limit
        );
        text
    }
}

fn render_block(index: usize, window: &Window) -> String {
    let head = if index == 0 {
        format!("## Focused: `{}`\n", window.path())
    } else {
        format!("## Window {index}: `{}`\n", window.path())
    };
    let body = format!("```\n{}\n```", window.visible_text());
    let info = if index == 0 {
        format!("{}\n\n{}", scroll_status(window), cursor_status(window))
    } else {
        scroll_status(window)
    };
    [head, body, info].join("\n\n")
}

fn scroll_status(window: &Window) -> String {
    if window.is_scrolled() {
        let view = window.scroll_summary();
        if view.is_empty() {
            return format!(
                "No lines shown, scrolled past line {} of {}",
                view.total_lines, view.total_lines
            );
        }
        format!(
            "Lines {}-{} of {}",
            view.start_line, view.end_line, view.total_lines
        )
    } else {
        "Full content shown".to_string()
    }
}

fn cursor_status(window: &Window) -> String {
    if window.is_selecting() {
        let range = window.selected_range();
        format!(
            "Selecting text from {} to {}:\n\n```\n{}\n```",
            range.start,
            range.end,
            window.selected_text()
        )
    } else {
        format!("Cursor at position {}", window.cursor_position())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::File;
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    fn window(path: &str, content: &str) -> Window {
        Window::new(File::new(path, Arc::new(MemoryStorage::new())), content)
    }

    #[test]
    fn empty_workspace_message() {
        let text = Display::default().render(std::iter::empty());
        assert_eq!(
            text,
            "# Workspace\n\nThe Workspace is empty, no Windows are open."
        );
    }

    #[test]
    fn focused_window_shows_cursor() {
        let w = window("main.rs", "fn main() {}");
        let text = Display::default().render([&w]);
        assert_eq!(
            text,
            "# Workspace\n\n\
             ## Focused: `main.rs`\n\n\n\
             ```\nfn main() {}\n```\n\n\
             Full content shown\n\n\
             Cursor at position 0\n\n"
        );
    }

    #[test]
    fn focused_window_shows_selection() {
        let mut w = window("a.txt", "line1\nline2\nline3");
        w.select("line2", "line3").unwrap();
        let text = Display::default().render([&w]);
        assert!(text.contains("Selecting text from 6 to 17:\n\n```\nline2\nline3\n```"));
        assert!(!text.contains("Cursor at position"));
    }

    #[test]
    fn background_windows_omit_cursor_info() {
        let a = window("a.txt", "alpha");
        let b = window("b.txt", "beta");
        let text = Display::default().render([&b, &a]);
        assert!(text.contains("## Focused: `b.txt`"));
        assert!(text.contains("## Window 1: `a.txt`"));
        assert_eq!(text.matches("Cursor at position").count(), 1);
        assert!(!text.contains("Hidden"));
    }

    #[test]
    fn scrolled_window_reports_line_range() {
        let content = (1..=5).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let mut w = window("n.txt", &content).with_page_size(2);
        w.scroll(1);
        let text = Display::default().render([&w]);
        assert!(text.contains("```\n2\n3\n```"));
        assert!(text.contains("Lines 2-3 of 5"));
    }

    #[test]
    fn scrolled_past_the_end_reports_no_lines() {
        let mut w = window("n.txt", "1\n2\n3");
        w.scroll(50);
        assert_eq!(w.scroll_position(), 3);
        let text = Display::default().render([&w]);
        assert!(text.contains("```\n\n```"));
        assert!(text.contains("No lines shown, scrolled past line 3 of 3"));
        assert!(!text.contains("Lines 3-3"));
    }

    #[test]
    fn over_budget_windows_are_hidden() {
        let a = window("a.txt", "x");
        let b = window("b.txt", "x");
        let text = Display::new(100).render([&b, &a]);
        assert!(text.contains("## Focused: `b.txt`"));
        assert!(!text.contains("a.txt"));
        assert!(text.ends_with("## Hidden: 1 windows"));
    }

    #[test]
    fn windows_after_first_overflow_stay_hidden() {
        let big = window("big.txt", &"y".repeat(500));
        let small = window("small.txt", "z");
        let focused = window("f.txt", "f");
        let text = Display::new(300).render([&focused, &big, &small]);
        assert!(text.contains("f.txt"));
        assert!(!text.contains("small.txt"));
        assert!(text.contains("## Hidden: 2 windows"));
    }

    #[test]
    fn everything_hidden_when_budget_is_tiny() {
        let a = window("a.txt", "x");
        let text = Display::new(10).render([&a]);
        assert_eq!(text, "# Workspace\n\n## Hidden: 1 windows");
    }

    #[test]
    fn budget_counts_characters_not_bytes() {
        let w = window("ü.txt", &"é".repeat(40));
        let rendered = Display::default().render([&w]);
        let chars = rendered.chars().count();
        assert!(rendered.len() > chars);
        assert!(Display::new(chars - 1).render([&w]).contains("Focused"));
        assert!(Display::new(chars - 2).render([&w]).contains("Hidden: 1"));
    }
}
