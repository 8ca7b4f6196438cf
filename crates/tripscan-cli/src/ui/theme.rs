//! UI Theme - Design system constants
//!
//! Colors, icons and column widths shared by every renderer, plus the
//! price formatting used wherever a package is shown.

use crossterm::style::Color;

/// Default theme for tripscan output
#[derive(Debug, Clone, Default)]
pub struct Theme {
    pub colors: ColorScheme,
    pub icons: Icons,
    pub layout: Layout,
}

#[derive(Debug, Clone)]
pub struct ColorScheme {
    /// Package titles and source names
    pub title: Color,
    /// Current price
    pub price: Color,
    /// Struck-through original price, durations, secondary text
    pub secondary: Color,
    /// Discount badge
    pub discount: Color,
    /// Star rating
    pub rating: Color,
    /// Highlight chips
    pub highlight: Color,
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    /// In-flight sources
    pub active: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            title: Color::Cyan,
            price: Color::White,
            secondary: Color::DarkGrey,
            discount: Color::Red,
            rating: Color::Yellow,
            highlight: Color::DarkYellow,
            header: Color::DarkGrey,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            active: Color::Blue,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Icons {
    /// Pending source (○)
    pub pending: &'static str,
    /// Fetching source (●)
    pub active: &'static str,
    pub success: &'static str,
    pub error: &'static str,
    pub warning: &'static str,
    pub info: &'static str,
    pub star: &'static str,
    pub currency: &'static str,
}

impl Default for Icons {
    fn default() -> Self {
        Self {
            pending: "○",
            active: "●",
            success: "✓",
            error: "✗",
            warning: "⚠",
            info: "ℹ",
            star: "★",
            currency: "₹",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Layout {
    /// Width of the source name column on the progress board
    pub source_width: usize,
    /// Width of the package title column
    pub title_width: usize,
    /// Width of the price column
    pub price_width: usize,
    /// Width of the duration column
    pub duration_width: usize,
    /// Highlights shown per package
    pub max_highlights: usize,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            source_width: 16,
            title_width: 30,
            price_width: 10,
            duration_width: 20,
            max_highlights: 3,
        }
    }
}

/// Format a price with thousands separators: `12999.0` -> `"₹12,999"`.
pub fn format_price(price: f64) -> String {
    let whole = price.round().max(0.0) as u64;
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}{grouped}", Icons::default().currency)
}

/// Truncate `text` to `width` characters, marking the cut with `…`.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}
