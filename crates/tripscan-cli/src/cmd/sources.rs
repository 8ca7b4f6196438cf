//! Sources command

use anyhow::Result;
use crossterm::style::Stylize;
use tripscan_core::{Config, Mode};

use crate::GlobalArgs;

/// List configured sources and where each one is fetched from.
pub fn sources(global: &GlobalArgs) -> Result<()> {
    let config = super::load_config(global)?;
    let theme = crate::ui::Theme::default();

    println!();
    for source in &config.sources {
        let name = format!("{:<width$}", source.name, width = theme.layout.source_width);
        println!("  {} {}", name.with(theme.colors.title), describe(&config, source).dark_grey());
    }
    println!();
    println!(
        "  {} sources, {} mode, {}s timeout",
        config.sources.len(),
        match config.search.mode {
            Mode::Live => "live",
            Mode::Mock => "mock",
        },
        config.search.timeout_secs
    );
    Ok(())
}

fn describe(config: &Config, source: &tripscan_core::config::SourceConfig) -> String {
    let mut text = match config.search.mode {
        Mode::Live => format!(
            "{}/{}",
            config.live.base_url.trim_end_matches('/'),
            source.path.trim_start_matches('/')
        ),
        Mode::Mock => "simulated".to_string(),
    };
    if let Some(var) = &source.token_env {
        let state = if std::env::var_os(var).is_some() {
            "set"
        } else {
            "unset"
        };
        text.push_str(&format!(" (token: ${var}, {state})"));
    }
    text
}
