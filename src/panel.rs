//! Log panel buffer and its ratatui view
//!
//! The panel is a thread-safe, capped buffer of styled runs (one rendered log
//! line each) plus a render function that draws it as a read-only scrollable
//! view with auto-scroll and a scrollbar.

use std::collections::VecDeque;
use std::sync::RwLock;

use ratatui::prelude::*;
use ratatui::widgets::{
    Block, Borders, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};

use crate::level::LogLevel;

/// One rendered log line with its display colors
#[derive(Debug, Clone, PartialEq)]
pub struct StyledRun {
    pub text: String,
    pub fg: Color,
    pub bg: Color,
}

impl StyledRun {
    /// Build a run from a rendered line, taking colors from the level
    pub fn new(level: LogLevel, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fg: level.fg(),
            bg: level.bg(),
        }
    }
}

/// Thread-safe capped buffer of styled runs
pub struct LogPanel {
    runs: RwLock<VecDeque<StyledRun>>,
    max_runs: usize,
}

impl LogPanel {
    /// Create a panel keeping at most `max_runs` lines
    pub fn new(max_runs: usize) -> Self {
        Self {
            runs: RwLock::new(VecDeque::with_capacity(max_runs.min(1024))),
            max_runs,
        }
    }

    /// Append a run, evicting the oldest once the cap is reached
    pub fn append(&self, run: StyledRun) {
        if let Ok(mut runs) = self.runs.write() {
            if runs.len() >= self.max_runs {
                runs.pop_front();
            }
            runs.push_back(run);
        }
    }

    /// Get all runs as a vector (for rendering)
    pub fn runs(&self) -> Vec<StyledRun> {
        self.runs
            .read()
            .map(|r| r.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of runs currently held
    pub fn len(&self) -> usize {
        self.runs.read().map(|r| r.len()).unwrap_or(0)
    }

    /// Check if the panel has no runs
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Render the panel into `area` with scrolling and a key-hint footer
pub fn render_log_panel(
    frame: &mut Frame,
    area: Rect,
    panel: &LogPanel,
    title: &str,
    scroll_offset: usize,
    auto_scroll: bool,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)])
        .split(area);
    let content = chunks[0];

    let runs = panel.runs();
    let run_count = runs.len();

    // Visible area height (minus borders)
    let visible_height = content.height.saturating_sub(2) as usize;

    // Auto-scroll pins the view to the newest lines
    let effective_scroll = if auto_scroll && run_count > visible_height {
        run_count.saturating_sub(visible_height)
    } else {
        scroll_offset.min(run_count.saturating_sub(visible_height.max(1)))
    };

    if runs.is_empty() {
        let empty = Paragraph::new("No log entries yet.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(title.to_string()));
        frame.render_widget(empty, content);
    } else {
        let visible_runs: Vec<_> = runs
            .iter()
            .skip(effective_scroll)
            .take(visible_height)
            .collect();

        let items: Vec<ListItem> = visible_runs
            .iter()
            .map(|run| {
                let line = Line::from(Span::styled(
                    run.text.trim_end().to_string(),
                    Style::default().fg(run.fg).bg(run.bg),
                ));
                ListItem::new(line)
            })
            .collect();

        let block_title = format!(
            "{} [{}-{} of {}]{}",
            title,
            effective_scroll + 1,
            (effective_scroll + visible_runs.len()).min(run_count),
            run_count,
            if auto_scroll { " [auto-scroll]" } else { "" }
        );

        let list =
            List::new(items).block(Block::default().borders(Borders::ALL).title(block_title));
        frame.render_widget(list, content);

        // Skip the scrollbar when the content rect is too small to hold it
        if run_count > visible_height && content.width > 0 && content.height > 2 {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"));

            let mut scrollbar_state = ScrollbarState::new(run_count)
                .position(effective_scroll)
                .viewport_content_length(visible_height);

            let scrollbar_area = Rect {
                x: content.x + content.width.saturating_sub(1),
                y: content.y + 1,
                width: 1,
                height: content.height.saturating_sub(2),
            };
            frame.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
        }
    }

    let footer = Paragraph::new(
        "↑/k ↓/j: scroll | g: top | G: bottom (auto) | PgUp/PgDn: page | Esc/q: close",
    )
    .style(Style::default().fg(Color::DarkGray))
    .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[1]);
}
