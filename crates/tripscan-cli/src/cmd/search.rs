//! Search command

use anyhow::{Context, Result, bail};
use std::sync::Arc;
use tripscan_core::{NullReporter, Reporter, SearchOutcome, SearchSession};
use tripscan_schema::SortKey;

use crate::GlobalArgs;
use crate::ui::Output;
use crate::ui::buffer::OutputBuffer;
use crate::ui::list::{print_list_header, print_packages};

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub sort: SortKey,
    pub min_rating: f64,
    pub limit: Option<usize>,
    pub json: bool,
}

/// One-shot search: live per-source progress, then the projected list.
pub async fn search(global: &GlobalArgs, destination: &str, opts: &SearchOptions) -> Result<()> {
    let config = super::load_config(global)?;

    let output = (!opts.json && !global.quiet).then(Output::new);
    let reporter: Arc<dyn Reporter> = match &output {
        Some(output) => Arc::new(output.clone()),
        None => Arc::new(NullReporter),
    };

    let mut session = super::build_session(&config, reporter)?;
    session.set_sort(opts.sort);
    session.set_min_rating(opts.min_rating)?;

    let outcome = session.submit(destination).await;
    if let Some(output) = &output {
        output.wait_async().await;
    }

    if let SearchOutcome::Rejected = outcome {
        // Only validation rejects a submit
        let msg = session
            .error()
            .map_or_else(|| "invalid destination".to_string(), ToString::to_string);
        bail!(msg);
    }

    if opts.json {
        return print_json(&session, opts.limit);
    }

    if let Some(err) = session.error() {
        if global.quiet {
            eprintln!("{err}");
        }
        return Ok(());
    }

    let mut view = session.view();
    if let Some(limit) = opts.limit {
        view.truncate(limit);
    }
    let mut buffer = OutputBuffer::default();
    print_list_header(&mut buffer, session.summary(), session.sort(), session.min_rating());
    print_packages(&mut buffer, &view);
    Ok(())
}

fn print_json(session: &SearchSession, limit: Option<usize>) -> Result<()> {
    let mut snapshot = session.snapshot();
    if let Some(limit) = limit {
        snapshot.packages.truncate(limit);
    }
    let json = serde_json::to_string_pretty(&snapshot).context("Failed to serialize results")?;
    println!("{json}");
    Ok(())
}
