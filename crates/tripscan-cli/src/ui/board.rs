//! Source Board - live per-source progress
//!
//! One row per configured source, redrawn in place as sources settle. When
//! stdout is not a terminal the board degrades to one plain line per settled
//! source.

use super::buffer::OutputBuffer;
use super::progress::{ProgressIndicator, format_elapsed, format_found};
use super::theme::Theme;
use crossterm::{
    QueueableCommand,
    cursor::{MoveDown, MoveToColumn, MoveUp, RestorePosition, SavePosition},
    style::Stylize,
    terminal::{Clear, ClearType},
};
use std::io::{self, Stdout, Write};
use std::time::Duration;
use tripscan_schema::SourceId;

/// Screen space reserved for the board, one line per source.
///
/// Rows are addressed relative to a saved anchor at the top of the block, so
/// the board redraws correctly wherever the prompt left the cursor.
struct BoardFrame<W: Write = Stdout> {
    out: W,
    rows: u16,
}

impl<W: Write> BoardFrame<W> {
    /// Print `rows` blank lines and anchor at the first of them.
    fn reserve(mut out: W, rows: u16) -> io::Result<Self> {
        for _ in 0..rows {
            writeln!(out)?;
        }
        if rows > 0 {
            out.queue(MoveUp(rows))?;
        }
        out.queue(MoveToColumn(0))?;
        out.queue(SavePosition)?;
        out.flush()?;
        Ok(Self { out, rows })
    }

    /// Replace the text of `row`. Queued until [`Self::flush`].
    fn draw(&mut self, row: u16, line: &str) -> io::Result<()> {
        if row >= self.rows {
            return Ok(());
        }
        self.out.queue(RestorePosition)?;
        if row > 0 {
            self.out.queue(MoveDown(row))?;
        }
        self.out.queue(MoveToColumn(0))?;
        write!(self.out, "{line}")?;
        // Clear the tail after writing so a row never flashes blank
        self.out.queue(Clear(ClearType::UntilNewLine))?;
        self.out.queue(RestorePosition)?;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    /// Leave the cursor on the line below the board.
    fn park(&mut self) -> io::Result<()> {
        self.out.queue(RestorePosition)?;
        if self.rows > 0 {
            self.out.queue(MoveDown(self.rows))?;
        }
        self.out.queue(MoveToColumn(0))?;
        self.out.flush()
    }
}

impl<W: Write> std::fmt::Debug for BoardFrame<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardFrame")
            .field("rows", &self.rows)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum RowState {
    Pending,
    Loading,
    Success { count: usize, elapsed: Duration },
    Failed { reason: String, elapsed: Duration },
}

impl RowState {
    fn is_active(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

#[derive(Clone, Debug)]
struct SourceRow {
    source: SourceId,
    state: RowState,
}

/// Message severity for footer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Error,
}

#[derive(Debug)]
pub struct SourceBoard {
    rows: Vec<SourceRow>,
    theme: Theme,
    progress: ProgressIndicator,
    frame: Option<BoardFrame>,
    live: bool,
}

impl SourceBoard {
    /// `live` selects in-place redraws; otherwise settled rows are appended.
    pub fn new(theme: Theme, live: bool) -> Self {
        Self {
            rows: Vec::new(),
            theme,
            progress: ProgressIndicator::default(),
            frame: None,
            live,
        }
    }

    /// Reset the board for a new search and reserve its screen space.
    pub fn prepare(&mut self, buffer: &mut OutputBuffer, title: &str, sources: &[SourceId]) {
        self.close();
        self.rows = sources
            .iter()
            .map(|source| SourceRow {
                source: source.clone(),
                state: RowState::Pending,
            })
            .collect();

        buffer.blank();
        buffer.write_styled(&format!("{}", title.bold()));
        buffer.flush();

        if self.live {
            buffer.hide_cursor();
            self.frame = BoardFrame::reserve(std::io::stdout(), self.rows.len() as u16).ok();
            self.render_all();
        }
    }

    /// Update a row. Returns false for an unknown source.
    pub fn update(&mut self, source: &SourceId, state: RowState) -> bool {
        let Some(idx) = self.rows.iter().position(|r| &r.source == source) else {
            return false;
        };
        self.rows[idx].state = state;

        if self.live {
            self.render_row(idx);
            self.flush_frame();
        } else if !self.rows[idx].state.is_active() {
            println!("{}", self.format_row(idx));
        }
        true
    }

    /// Re-render rows that are animating.
    pub fn render_active(&mut self) {
        if !self.live || self.frame.is_none() {
            return;
        }
        let active: Vec<usize> = (0..self.rows.len())
            .filter(|&i| self.rows[i].state.is_active())
            .collect();
        if active.is_empty() {
            return;
        }
        for idx in active {
            self.render_row(idx);
        }
        self.flush_frame();
    }

    pub fn render_all(&mut self) {
        for idx in 0..self.rows.len() {
            self.render_row(idx);
        }
        self.flush_frame();
    }

    fn flush_frame(&mut self) {
        if let Some(frame) = self.frame.as_mut() {
            let _ = frame.flush();
        }
    }

    fn render_row(&mut self, idx: usize) {
        let line = self.format_row(idx);
        if let Some(frame) = self.frame.as_mut() {
            let _ = frame.draw(idx as u16, &line);
        }
    }

    fn format_row(&self, idx: usize) -> String {
        let row = &self.rows[idx];
        let theme = &self.theme;

        let (icon, color, status) = match &row.state {
            RowState::Pending => (theme.icons.pending, theme.colors.secondary, "pending".to_string()),
            RowState::Loading => (
                self.progress.current_icon(),
                theme.colors.active,
                "fetching...".to_string(),
            ),
            RowState::Success { count, elapsed } => (
                theme.icons.success,
                theme.colors.success,
                format_found(*count, *elapsed),
            ),
            RowState::Failed { reason, elapsed } => (
                theme.icons.error,
                theme.colors.error,
                format!("failed after {}: {reason}", format_elapsed(*elapsed)),
            ),
        };

        let name = format!(
            "{:<width$}",
            row.source.as_str(),
            width = theme.layout.source_width
        );
        format!(
            "  {} {} {}",
            icon.with(color),
            name.with(theme.colors.title),
            status.with(color)
        )
    }

    /// Close the live frame (if any) and print a footer line.
    pub fn print_footer(&mut self, buffer: &mut OutputBuffer, message: &str, severity: Severity) {
        self.close();
        buffer.show_cursor();

        let icons = &self.theme.icons;
        let line = match severity {
            Severity::Success => format!("{} {}", icons.success.green(), message.green()),
            Severity::Warning => format!("{} {}", icons.warning.yellow(), message.yellow()),
            Severity::Error => format!("{} {}", icons.error.red(), message.red()),
        };
        buffer.blank();
        buffer.write_styled(&line);
        buffer.flush();
    }

    fn close(&mut self) {
        if let Some(mut frame) = self.frame.take() {
            let _ = frame.park();
        }
    }
}

impl Drop for SourceBoard {
    fn drop(&mut self) {
        self.close();
    }
}
