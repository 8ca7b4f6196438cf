//! Interactive search session

use anyhow::{Context, Result};
use crossterm::style::Stylize;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tripscan_core::{SearchOutcome, SearchSession, SearchTicket, SessionError};
use tripscan_schema::{SortKey, SourceStatus, suggest};

use crate::GlobalArgs;
use crate::ui::Output;
use crate::ui::buffer::OutputBuffer;
use crate::ui::list::{print_featured, print_list_header, print_packages};

const HELP: &str = "\
  search <destination>   fetch packages from every source
  refresh                re-run the current search
  back                   return to the search screen
  sort <price|rating|duration>
  min <0-5|all>          hide packages rated below this
  list                   show the current results
  status                 per-source status of the last search
  book <n>               open package n in the browser
  suggest <text>         destination suggestions
  featured               popular destinations
  help                   this text
  quit";

#[derive(Debug, Clone, PartialEq)]
enum ShellCommand {
    Search(String),
    Refresh,
    Back,
    Sort(SortKey),
    MinRating(f64),
    List,
    Status,
    Book(usize),
    Suggest(String),
    Featured,
    Help,
    Quit,
    Empty,
}

fn parse(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match verb.to_ascii_lowercase().as_str() {
        "" => ShellCommand::Empty,
        "search" | "s" => ShellCommand::Search(rest.to_string()),
        "refresh" | "r" => ShellCommand::Refresh,
        "back" | "b" => ShellCommand::Back,
        "sort" => ShellCommand::Sort(rest.parse::<SortKey>().map_err(|e| e.to_string())?),
        "min" => {
            let value = if rest.eq_ignore_ascii_case("all") {
                0.0
            } else {
                rest.parse()
                    .map_err(|_| format!("'{rest}' is not a rating (try 0, 3, 4, 4.5 or all)"))?
            };
            ShellCommand::MinRating(value)
        }
        "list" | "ls" => ShellCommand::List,
        "status" => ShellCommand::Status,
        "book" => ShellCommand::Book(
            rest.parse()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| format!("'{rest}' is not a package number"))?,
        ),
        "suggest" => ShellCommand::Suggest(rest.to_string()),
        "featured" => ShellCommand::Featured,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(format!("unknown command '{other}' (type 'help')")),
    };
    Ok(command)
}

pub async fn shell(global: &GlobalArgs) -> Result<()> {
    let config = super::load_config(global)?;
    let output = Output::new();
    let mut session = super::build_session(&config, Arc::new(output.clone()))?;
    let mut buffer = OutputBuffer::default();

    println!("{}", "tripscan - compare travel packages".bold());
    println!("Type a command, or 'help'. Popular destinations:");
    print_featured(&mut buffer);
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt(&session)?;
        // Once a search has listened for Ctrl-C the default handler is gone,
        // so the prompt has to honour it too.
        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read input")?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };

        let command = match parse(&line) {
            Ok(command) => command,
            Err(msg) => {
                output.warning(&msg);
                output.wait_async().await;
                continue;
            }
        };

        match command {
            ShellCommand::Empty => {}
            ShellCommand::Quit => break,
            ShellCommand::Help => println!("{HELP}"),
            ShellCommand::Search(input) => {
                if let Ok(ticket) = session.begin(&input) {
                    run_ticket(&mut session, ticket, &output).await;
                }
                report(&session, &output, &mut buffer).await;
            }
            ShellCommand::Refresh => match session.destination().cloned() {
                Some(destination) => {
                    if let Ok(ticket) = session.begin(destination.as_str()) {
                        run_ticket(&mut session, ticket, &output).await;
                    }
                    report(&session, &output, &mut buffer).await;
                }
                None => output.info("Nothing to refresh yet; search for a destination first."),
            },
            ShellCommand::Back => {
                session.back();
                print_featured(&mut buffer);
            }
            ShellCommand::Sort(key) => {
                session.set_sort(key);
                show_list(&session, &mut buffer);
            }
            ShellCommand::MinRating(value) => match session.set_min_rating(value) {
                Ok(()) => show_list(&session, &mut buffer),
                Err(e) => output.warning(&e.to_string()),
            },
            ShellCommand::List => show_list(&session, &mut buffer),
            ShellCommand::Status => show_status(&session),
            ShellCommand::Book(n) => book(&session, n, &output),
            ShellCommand::Suggest(text) => {
                let hits = suggest(&text, 5);
                if hits.is_empty() {
                    output.info(&format!("No destinations match '{text}'"));
                }
                for hit in hits {
                    println!("  {}", hit.city.cyan());
                }
            }
            ShellCommand::Featured => print_featured(&mut buffer),
        }
        output.wait_async().await;
    }

    Ok(())
}

/// Run a search, abandoning it on Ctrl-C.
async fn run_ticket(session: &mut SearchSession, ticket: SearchTicket, output: &Output) {
    tokio::select! {
        done = ticket.run() => {
            if let SearchOutcome::Superseded = session.complete(done) {
                tracing::debug!("Search result superseded");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            session.cancel();
            output.warning("Search cancelled");
        }
    }
}

async fn report(session: &SearchSession, output: &Output, buffer: &mut OutputBuffer) {
    output.wait_async().await;
    match session.error() {
        // Progress footers already covered fetch outcomes
        Some(SessionError::Validation(e)) => output.warning(&e.to_string()),
        Some(_) => {}
        None if !session.is_loading() => show_list(session, buffer),
        None => {}
    }
}

fn show_list(session: &SearchSession, buffer: &mut OutputBuffer) {
    if session.destination().is_none() {
        println!("  No search yet.");
        return;
    }
    let view = session.view();
    print_list_header(buffer, session.summary(), session.sort(), session.min_rating());
    print_packages(buffer, &view);
}

fn show_status(session: &SearchSession) {
    let theme = crate::ui::Theme::default();
    for (source, status) in session.statuses().iter() {
        let icon = match status {
            SourceStatus::Pending => theme.icons.pending,
            SourceStatus::Loading => theme.icons.active,
            SourceStatus::Success => theme.icons.success,
            SourceStatus::Error => theme.icons.error,
        };
        println!(
            "  {icon} {:<width$} {status}",
            source.as_str(),
            width = theme.layout.source_width
        );
    }
}

fn book(session: &SearchSession, n: usize, output: &Output) {
    let view = session.view();
    let Some(pkg) = view.get(n - 1) else {
        output.warning(&format!("No package #{n} in the current list"));
        return;
    };
    match pkg.booking_url() {
        Some(url) => match open::that(url) {
            Ok(()) => output.info(&format!("Opened {url}")),
            Err(e) => output.error(&format!("Failed to open {url}: {e}")),
        },
        None => output.warning(&format!("{} has no booking link", pkg.title())),
    }
}

fn prompt(session: &SearchSession) -> Result<()> {
    let label = session
        .destination()
        .map_or_else(|| "tripscan".to_string(), |d| format!("tripscan:{d}"));
    print!("{}{} ", label.dark_grey(), ">".bold());
    std::io::stdout().flush().context("Failed to flush prompt")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse("search Goa"), Ok(ShellCommand::Search("Goa".into())));
        assert_eq!(
            parse("  s   Kerala Backwaters "),
            Ok(ShellCommand::Search("Kerala Backwaters".into()))
        );
        assert_eq!(parse("sort rating"), Ok(ShellCommand::Sort(SortKey::Rating)));
        assert_eq!(parse("min 4.5"), Ok(ShellCommand::MinRating(4.5)));
        assert_eq!(parse("min all"), Ok(ShellCommand::MinRating(0.0)));
        assert_eq!(parse("book 2"), Ok(ShellCommand::Book(2)));
        assert_eq!(parse("REFRESH"), Ok(ShellCommand::Refresh));
        assert_eq!(parse(""), Ok(ShellCommand::Empty));
        assert_eq!(parse("exit"), Ok(ShellCommand::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse("sort cost").is_err());
        assert!(parse("min lots").is_err());
        assert!(parse("book 0").is_err());
        assert!(parse("book").is_err());
        assert!(parse("fly Goa").is_err());
    }

    #[test]
    fn test_blank_search_is_still_a_search() {
        // Validation happens in the session so the message matches other front-ends
        assert_eq!(parse("search"), Ok(ShellCommand::Search(String::new())));
    }
}
