//! Package list formatting
//!
//! Column-aligned rendering for search results: price (with the struck-out
//! original and discount), rating, duration and source on the first line,
//! highlights underneath.

use super::buffer::OutputBuffer;
use super::theme::{Theme, format_price, truncate};
use crossterm::style::Stylize;
use tripscan_core::ViewSummary;
use tripscan_schema::{FEATURED, Package, SortKey};

/// "Found 5 packages from 4 sources", plus the active sort and filter.
pub fn print_list_header(
    buffer: &mut OutputBuffer,
    summary: ViewSummary,
    sort: SortKey,
    min_rating: f64,
) {
    let theme = Theme::default();
    let filter = if min_rating > 0.0 {
        format!(", rating {min_rating}+")
    } else {
        String::new()
    };
    let line = format!(
        "  Found {} package{} from {} source{} (sorted by {sort}{filter})",
        summary.visible,
        if summary.visible == 1 { "" } else { "s" },
        summary.sources,
        if summary.sources == 1 { "" } else { "s" },
    );
    buffer.blank();
    buffer.write_line(&line, theme.colors.header);
    buffer.blank();
}

/// Format the first line of a package row.
pub fn format_package_line(index: usize, pkg: &Package, theme: &Theme) -> String {
    let layout = &theme.layout;
    let raw = pkg.raw();

    let title = format!(
        "{:<width$}",
        truncate(pkg.title(), layout.title_width),
        width = layout.title_width
    );
    let price = format!("{:>width$}", format_price(pkg.price()), width = layout.price_width);

    let mut deal = String::new();
    if let Some(original) = raw.original_price.filter(|o| *o > pkg.price()) {
        deal.push_str(&format!(" {}", format_price(original).crossed_out().with(theme.colors.secondary)));
    }
    if let Some(discount) = raw.discount.filter(|d| *d > 0) {
        deal.push_str(&format!(" {}", format!("{discount}% OFF").with(theme.colors.discount)));
    }

    let rating = match raw.rating {
        Some(r) => {
            let reviews = raw.reviews.map(|n| format!(" ({n})")).unwrap_or_default();
            format!("{} {r:.1}{reviews}", theme.icons.star)
        }
        None => "-".to_string(),
    };
    let duration = format!(
        "{:<width$}",
        pkg.duration().unwrap_or("-"),
        width = layout.duration_width
    );

    format!(
        "{:>3}. {} {}{}  {}  {} {}",
        index,
        title.with(theme.colors.title),
        price.with(theme.colors.price).bold(),
        deal,
        rating.with(theme.colors.rating),
        duration.with(theme.colors.secondary),
        pkg.source().as_str().with(theme.colors.secondary),
    )
}

/// Highlights line, or `None` when the package has none.
pub fn format_highlights(pkg: &Package, theme: &Theme) -> Option<String> {
    let highlights = &pkg.raw().highlights;
    if highlights.is_empty() {
        return None;
    }
    let shown: Vec<&str> = highlights
        .iter()
        .take(theme.layout.max_highlights)
        .map(String::as_str)
        .collect();
    Some(format!("       {}", shown.join(" · ")))
}

/// Print a numbered package list (1-based, matching `book <n>`).
pub fn print_packages(buffer: &mut OutputBuffer, packages: &[&Package]) {
    let theme = Theme::default();
    for (i, pkg) in packages.iter().enumerate() {
        buffer.write_styled(&format_package_line(i + 1, pkg, &theme));
        if let Some(line) = format_highlights(pkg, &theme) {
            buffer.write_line(&line, theme.colors.highlight);
        }
    }
    buffer.flush();
}

/// Print the featured destinations offered before any search.
pub fn print_featured(buffer: &mut OutputBuffer) {
    let theme = Theme::default();
    buffer.blank();
    for featured in FEATURED {
        let line = format!(
            "  {} {}",
            format!("{:<20}", featured.title).with(theme.colors.title),
            featured.blurb.with(theme.colors.secondary)
        );
        buffer.write_styled(&line);
    }
    buffer.flush();
}
