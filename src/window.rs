//! Log window UI task
//!
//! Single consumer of the UI command queue. All panel mutations, window
//! lifecycle changes, and prompt dialogs are applied here in FIFO order, so
//! callers never touch the terminal and never block on rendering.

use std::io::{self, stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use tokio::sync::mpsc;

use crate::config::Config;
use crate::panel::{render_log_panel, LogPanel, StyledRun};

/// Reply channel for a prompt dialog
///
/// Carries `Some(text)` on Enter, `None` on Esc or when no dialog can be
/// shown. A std channel so callers can block without a runtime.
pub type PromptReply = std::sync::mpsc::Sender<Option<String>>;

/// Commands applied by the UI task
pub enum UiCommand {
    /// Append a styled line to the panel
    Append(StyledRun),
    /// Show the log window, creating it on first use
    Show { close_on_exit: bool },
    /// Hide the window and restore the terminal
    Close,
    /// Ask the user for a line of text via a modal dialog
    Prompt { label: String, reply: PromptReply },
}

/// Handle to a running UI task
pub struct UiHandle {
    /// Command queue into the UI task
    pub tx: mpsc::UnboundedSender<UiCommand>,
    /// The panel the task renders
    pub panel: Arc<LogPanel>,
    /// Whether the window is currently shown
    pub window_open: Arc<AtomicBool>,
}

/// Spawn the UI task and return a handle to it
///
/// Requires a tokio runtime. The task lives for the process lifetime; there
/// is no teardown path for the panel.
pub fn spawn_ui(config: &Config) -> UiHandle {
    let panel = Arc::new(LogPanel::new(config.max_panel_runs));
    let (tx, rx) = mpsc::unbounded_channel();
    let window_open = Arc::new(AtomicBool::new(false));

    tokio::spawn(run_ui(
        Arc::clone(&panel),
        config.clone(),
        rx,
        Arc::clone(&window_open),
    ));

    UiHandle {
        tx,
        panel,
        window_open,
    }
}

/// Pending modal input dialog
struct PromptState {
    label: String,
    input: String,
    reply: PromptReply,
}

/// Live window: terminal in raw mode + alternate screen
struct WindowState {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    close_on_exit: bool,
    scroll_offset: usize,
    auto_scroll: bool,
    prompt: Option<PromptState>,
}

impl WindowState {
    /// Take over the terminal and build the render surface
    fn open(close_on_exit: bool) -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;

        let init = || -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
            stdout()
                .execute(EnterAlternateScreen)
                .context("Failed to enter alternate screen")?;
            let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))
                .context("Failed to create terminal")?;
            terminal.hide_cursor()?;
            terminal.clear()?;
            Ok(terminal)
        };

        match init() {
            Ok(terminal) => Ok(Self {
                terminal,
                close_on_exit,
                scroll_offset: 0,
                auto_scroll: true,
                prompt: None,
            }),
            Err(e) => {
                let _ = stdout().execute(LeaveAlternateScreen);
                let _ = disable_raw_mode();
                Err(e)
            }
        }
    }
}

impl Drop for WindowState {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        let _ = stdout().execute(LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

#[derive(Debug, PartialEq, Eq)]
enum KeyOutcome {
    None,
    CloseRequested,
}

/// The UI task loop
///
/// Hidden: waits on the queue. Shown: drains the queue, polls key events,
/// and redraws on a fixed tick.
async fn run_ui(
    panel: Arc<LogPanel>,
    config: Config,
    mut rx: mpsc::UnboundedReceiver<UiCommand>,
    window_open: Arc<AtomicBool>,
) {
    let mut window: Option<WindowState> = None;
    let tick = Duration::from_millis(config.tick_rate_ms.max(10));

    loop {
        if window.is_none() {
            match rx.recv().await {
                Some(cmd) => apply_command(cmd, &mut window, &panel, &window_open),
                None => break,
            }
            continue;
        }

        // Drain queued commands in FIFO order
        loop {
            match rx.try_recv() {
                Ok(cmd) => apply_command(cmd, &mut window, &panel, &window_open),
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    close_window(&mut window, &window_open);
                    return;
                }
            }
            if window.is_none() {
                break;
            }
        }

        let mut close_requested = false;
        if let Some(win) = window.as_mut() {
            while event::poll(Duration::ZERO).unwrap_or(false) {
                match event::read() {
                    Ok(Event::Key(key)) => {
                        if handle_key(win, panel.len(), key) == KeyOutcome::CloseRequested {
                            close_requested = true;
                        }
                    }
                    // Resize is picked up by the next draw
                    Ok(_) => {}
                    Err(_) => break,
                }
            }
        }

        if close_requested {
            let close_on_exit = window.as_ref().map(|w| w.close_on_exit).unwrap_or(false);
            close_window(&mut window, &window_open);
            if close_on_exit {
                std::process::exit(0);
            }
            continue;
        }

        if let Some(win) = window.as_mut() {
            let scroll_offset = win.scroll_offset;
            let auto_scroll = win.auto_scroll;
            let prompt_view = win
                .prompt
                .as_ref()
                .map(|p| (p.label.clone(), p.input.clone()));
            let title = config.window_title.clone();

            let _ = win.terminal.draw(|frame| {
                let area = frame.size();
                render_log_panel(frame, area, &panel, &title, scroll_offset, auto_scroll);
                if let Some((label, input)) = &prompt_view {
                    render_prompt(frame, area, label, input);
                }
            });
        }

        tokio::time::sleep(tick).await;
    }
}

/// Apply one queued command
fn apply_command(
    cmd: UiCommand,
    window: &mut Option<WindowState>,
    panel: &LogPanel,
    window_open: &Arc<AtomicBool>,
) {
    match cmd {
        UiCommand::Append(run) => panel.append(run),
        UiCommand::Show { close_on_exit } => {
            if window.is_none() {
                match WindowState::open(close_on_exit) {
                    Ok(win) => {
                        *window = Some(win);
                        window_open.store(true, Ordering::SeqCst);
                    }
                    Err(e) => eprintln!("logpane: failed to open log window: {:#}", e),
                }
            }
            // Already shown: re-show is a no-op, the close policy stays as configured
        }
        UiCommand::Close => close_window(window, window_open),
        UiCommand::Prompt { label, reply } => match window.as_mut() {
            Some(win) if win.prompt.is_none() => {
                win.prompt = Some(PromptState {
                    label,
                    input: String::new(),
                    reply,
                });
            }
            // No window to anchor the dialog, or one is already pending
            _ => {
                let _ = reply.send(None);
            }
        },
    }
}

/// Tear down the window, answering any pending prompt with `None`
fn close_window(window: &mut Option<WindowState>, window_open: &Arc<AtomicBool>) {
    if let Some(mut win) = window.take() {
        if let Some(prompt) = win.prompt.take() {
            let _ = prompt.reply.send(None);
        }
        // Terminal restored by WindowState::drop
    }
    window_open.store(false, Ordering::SeqCst);
}

/// Handle one key event while the window is shown
fn handle_key(win: &mut WindowState, panel_len: usize, key: KeyEvent) -> KeyOutcome {
    if key.kind != KeyEventKind::Press {
        return KeyOutcome::None;
    }

    // Modal prompt swallows all keys until answered
    if win.prompt.is_some() {
        match key.code {
            KeyCode::Enter => {
                if let Some(prompt) = win.prompt.take() {
                    let _ = prompt.reply.send(Some(prompt.input));
                }
            }
            KeyCode::Esc => {
                if let Some(prompt) = win.prompt.take() {
                    let _ = prompt.reply.send(None);
                }
            }
            KeyCode::Backspace => {
                if let Some(prompt) = win.prompt.as_mut() {
                    prompt.input.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(prompt) = win.prompt.as_mut() {
                    prompt.input.push(c);
                }
            }
            _ => {}
        }
        return KeyOutcome::None;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return KeyOutcome::CloseRequested,
        KeyCode::Up | KeyCode::Char('k') => {
            win.auto_scroll = false;
            win.scroll_offset = win.scroll_offset.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            win.auto_scroll = false;
            win.scroll_offset = (win.scroll_offset + 1).min(panel_len.saturating_sub(1));
        }
        KeyCode::PageUp => {
            win.auto_scroll = false;
            win.scroll_offset = win.scroll_offset.saturating_sub(10);
        }
        KeyCode::PageDown => {
            win.auto_scroll = false;
            win.scroll_offset = (win.scroll_offset + 10).min(panel_len.saturating_sub(1));
        }
        KeyCode::Char('g') => {
            win.auto_scroll = false;
            win.scroll_offset = 0;
        }
        KeyCode::Char('G') => {
            win.auto_scroll = true;
        }
        _ => {}
    }
    KeyOutcome::None
}

/// Draw the modal input box over the panel
fn render_prompt(frame: &mut Frame, area: Rect, label: &str, input: &str) {
    let width = area.width.saturating_sub(4).min(50).max(10);
    let rect = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(3) / 2,
        width,
        height: area.height.min(3),
    }
    .intersection(area);
    let dialog = Paragraph::new(input.to_string()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(label.to_string()),
    );
    frame.render_widget(Clear, rect);
    frame.render_widget(dialog, rect);
}
