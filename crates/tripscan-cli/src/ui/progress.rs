//! Progress Indicators
//!
//! Blinking icon for in-flight sources and the status text shown beside each
//! source on the board.

use super::theme::Icons;
use std::time::{Duration, Instant};

/// Time-based blink between the active and pending icons.
#[derive(Debug, Clone)]
pub struct ProgressIndicator {
    start_time: Instant,
    icons: Icons,
}

impl ProgressIndicator {
    pub fn new(icons: Icons) -> Self {
        Self {
            start_time: Instant::now(),
            icons,
        }
    }

    /// Current animation frame; 200ms per frame regardless of render rate.
    pub fn frame(&self) -> usize {
        self.start_time.elapsed().as_millis() as usize / 200
    }

    pub fn current_icon(&self) -> &'static str {
        if self.frame() % 2 == 0 {
            self.icons.active
        } else {
            self.icons.pending
        }
    }
}

impl Default for ProgressIndicator {
    fn default() -> Self {
        Self::new(Icons::default())
    }
}

/// "1.2s", or "850ms" under a second.
pub fn format_elapsed(elapsed: Duration) -> String {
    if elapsed < Duration::from_secs(1) {
        format!("{}ms", elapsed.as_millis())
    } else {
        format!("{:.1}s", elapsed.as_secs_f64())
    }
}

/// Status text for a source that returned `count` packages.
pub fn format_found(count: usize, elapsed: Duration) -> String {
    let noun = if count == 1 { "package" } else { "packages" };
    format!("{count} {noun} in {}", format_elapsed(elapsed))
}
