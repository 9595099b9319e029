use super::dashboard::Dashboard;
use super::ui;
use crate::core::config::AppConfig;
use crate::core::tax::parse_volume;
use crate::core::{CalculationInput, Country, LivePrice, PriceProvider, Structure};
use crate::poller::{PollerConfig, PricePoller};
use anyhow::{Result, anyhow, bail};
use std::io::ErrorKind;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

/// A line typed by the user while the dashboard is live.
#[derive(Debug, Clone, PartialEq)]
pub enum InputCommand {
    Volume(f64),
    Country(Country),
    Structure(Structure),
    Redraw,
    Help,
    Quit,
}

pub const HELP: &str =
    "Commands: volume <amount> | country <name> | structure <name|slug> | help | quit";

pub fn parse_input_command(line: &str) -> Result<InputCommand> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(InputCommand::Redraw);
    }

    let (verb, arg) = match line.split_once(char::is_whitespace) {
        Some((verb, arg)) => (verb, arg.trim()),
        None => (line, ""),
    };

    match verb.to_lowercase().as_str() {
        "volume" | "v" => Ok(InputCommand::Volume(parse_volume(arg))),
        "country" | "c" => {
            if arg.is_empty() {
                bail!("Missing country name");
            }
            Ok(InputCommand::Country(arg.parse()?))
        }
        "structure" | "s" => {
            if arg.is_empty() {
                bail!("Missing structure name");
            }
            Ok(InputCommand::Structure(arg.parse()?))
        }
        "help" | "h" | "?" => Ok(InputCommand::Help),
        "quit" | "q" | "exit" => Ok(InputCommand::Quit),
        _ => Err(anyhow!("Unknown command: {}", verb)),
    }
}

/// What a single read from stdin means for the session.
#[derive(Debug, PartialEq)]
enum StdinEvent {
    Command(InputCommand),
    Notice(String),
    Closed,
}

fn read_event(line: std::io::Result<Option<String>>) -> StdinEvent {
    match line {
        Ok(Some(line)) => match parse_input_command(&line) {
            Ok(command) => StdinEvent::Command(command),
            Err(e) => StdinEvent::Notice(e.to_string()),
        },
        Ok(None) => {
            debug!("Stdin closed, continuing with price updates only");
            StdinEvent::Closed
        }
        // The offending line has already been consumed, so reading can go on.
        Err(e) if e.kind() == ErrorKind::InvalidData => {
            StdinEvent::Notice(format!("Ignored unreadable input: {e}"))
        }
        Err(e) => {
            warn!(error = %e, "Stopped reading stdin");
            StdinEvent::Closed
        }
    }
}

/// Runs the live dashboard until the user quits or presses Ctrl-C. The price
/// poller is torn down before returning.
pub async fn run(
    config: &AppConfig,
    input: CalculationInput,
    provider: Arc<dyn PriceProvider>,
) -> Result<()> {
    let handle = PricePoller::spawn(provider, PollerConfig::from(config));
    let mut prices = handle.subscribe();
    let mut dashboard = Dashboard::new(input);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut notice: Option<String> = Some(HELP.to_string());

    loop {
        let live = prices.borrow_and_update().clone();
        redraw(&mut dashboard, &live, notice.take().as_deref());

        tokio::select! {
            changed = prices.changed() => {
                if changed.is_err() {
                    debug!("Price channel closed");
                    break;
                }
            }
            line = lines.next_line(), if stdin_open => match read_event(line) {
                StdinEvent::Command(InputCommand::Volume(v)) => dashboard.set_volume(v),
                StdinEvent::Command(InputCommand::Country(c)) => dashboard.set_country(c),
                StdinEvent::Command(InputCommand::Structure(s)) => dashboard.set_structure(s),
                StdinEvent::Command(InputCommand::Redraw) => {}
                StdinEvent::Command(InputCommand::Help) => notice = Some(HELP.to_string()),
                StdinEvent::Command(InputCommand::Quit) => break,
                StdinEvent::Notice(text) => notice = Some(text),
                StdinEvent::Closed => stdin_open = false,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    handle.shutdown().await;
    Ok(())
}

fn redraw(dashboard: &mut Dashboard, live: &LivePrice, notice: Option<&str>) {
    let term = console::Term::stdout();
    if term.is_term() {
        let _ = term.clear_screen();
    }
    println!("{}", dashboard.render(live));
    if let Some(notice) = notice {
        println!("{}", ui::style_text(notice, ui::StyleType::Subtle));
    }
    print!("> ");
    let _ = std::io::Write::flush(&mut std::io::stdout());
}
