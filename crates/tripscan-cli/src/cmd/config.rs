//! Config command

use anyhow::{Context, Result, anyhow};
use crossterm::style::Stylize;
use tripscan_core::Config;
use tripscan_core::paths::default_config_path;

use crate::GlobalArgs;
use crate::ui::Theme;

/// Print the effective configuration, or write a default one with `--init`.
pub fn config(global: &GlobalArgs, init: bool) -> Result<()> {
    if init {
        let path = match &global.config {
            Some(path) => path.clone(),
            None => default_config_path()
                .ok_or_else(|| anyhow!("Could not determine home directory"))?,
        };
        Config::default()
            .write_new(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        if !global.quiet {
            let theme = Theme::default();
            println!(
                "{} Wrote default config to {}",
                theme.icons.success.green(),
                path.display()
            );
        }
        return Ok(());
    }

    let config = super::load_config(global)?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}
