//! Output Buffer - Atomic terminal rendering
//!
//! Commands queue styled lines here and flush once, so a block of output is
//! never interleaved with progress updates from the UI actor.

use crossterm::{
    QueueableCommand, cursor, execute,
    style::{Color, SetForegroundColor},
};
use std::io::{Stdout, Write};

pub struct OutputBuffer {
    stdout: Stdout,
}

impl std::fmt::Debug for OutputBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("OutputBuffer")
    }
}

impl OutputBuffer {
    pub fn new(stdout: Stdout) -> Self {
        Self { stdout }
    }

    /// Write text on a new line with color
    pub fn write_line(&mut self, text: &str, color: Color) {
        let _ = self.stdout.queue(SetForegroundColor(color));
        let _ = writeln!(self.stdout, "{text}");
        let _ = self.stdout.queue(SetForegroundColor(Color::Reset));
    }

    /// Write an already-styled line as is
    pub fn write_styled(&mut self, text: &str) {
        let _ = writeln!(self.stdout, "{text}");
    }

    pub fn blank(&mut self) {
        let _ = writeln!(self.stdout);
    }

    pub fn hide_cursor(&mut self) {
        let _ = execute!(self.stdout, cursor::Hide);
    }

    pub fn show_cursor(&mut self) {
        let _ = execute!(self.stdout, cursor::Show);
    }

    /// Flush all queued output (atomic render)
    pub fn flush(&mut self) {
        let _ = self.stdout.flush();
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new(std::io::stdout())
    }
}
