mod app_state;
mod config;
mod controller;
mod logging;
mod tui;
mod ui;

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use geopost_input::{char_len, BoundedTextInput, InputBuffer};
use geopost_models::{newest_first, Clock, CoordinateSource, Message};
use geopost_store::MessageStore;

use crate::app_state::AppController;
use crate::config::AppConfig;
use crate::controller::{flatten_line_breaks, FeedController, SubmitOutcome};
use crate::ui::FeedApp;

const TICK_RATE: Duration = Duration::from_millis(250);

#[derive(Parser, Debug)]
#[command(name = "geopost")]
#[command(author, version, about = "Post short geotagged notes and browse the feed", long_about = None)]
pub struct Cli {
    /// Message file (env: GEOPOST_STORE, default: messages.json)
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Character budget per message (env: GEOPOST_MAX_CHARS, default: 50)
    #[arg(long, global = true, value_name = "N")]
    pub max_chars: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Interactive feed with a compose window (default)
    Tui,
    /// Post a message; words are joined with single spaces
    Post {
        #[arg(required = true, num_args = 1.., value_name = "TEXT")]
        text: Vec<String>,
    },
    /// Print the feed, newest first
    Feed {
        /// Show at most N messages
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
        /// Append (lat, lon) to each line
        #[arg(long)]
        coords: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env()
        .context("invalid environment configuration")?
        .with_overrides(cli.store, cli.max_chars);
    let policy = config.input_policy()?;

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => run_tui(&config, policy),
        Command::Post { text } => {
            logging::init_stderr();
            let mut controller = system_controller(&config);
            post(&mut controller, policy, &text.join(" "), &mut io::stdout().lock())
        }
        Command::Feed { limit, coords } => {
            logging::init_stderr();
            let messages = system_controller(&config)
                .feed()
                .with_context(|| format!("could not read {}", config.store_path.display()))?;
            print_feed(&messages, limit, coords, &mut io::stdout().lock())?;
            Ok(())
        }
    }
}

fn system_controller(config: &AppConfig) -> FeedController<geopost_models::LocalClock, geopost_models::ThreadCoordinates> {
    FeedController::system(MessageStore::new(config.store_path.clone()), config.max_chars)
}

/// One-shot post: the text goes through the paste path into an empty
/// buffer, exactly as if it had been pasted into the compose window.
fn post<C: Clock, S: CoordinateSource>(
    controller: &mut FeedController<C, S>,
    policy: BoundedTextInput,
    text: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let text = flatten_line_breaks(text);
    let mut buffer = InputBuffer::new(policy);
    buffer.paste(&text);
    if buffer.char_len() < char_len(&text) {
        tracing::warn!(
            kept = buffer.char_len(),
            given = char_len(&text),
            "message cut to the character budget"
        );
    }

    match controller
        .submit(&mut buffer)
        .with_context(|| format!("could not post to {}", controller.store().path().display()))?
    {
        SubmitOutcome::Posted(posted) => {
            writeln!(out, "{}", posted.message.feed_line())?;
            Ok(())
        }
        SubmitOutcome::Suppressed { .. } => bail!("nothing to post"),
    }
}

fn print_feed(messages: &[Message], limit: Option<usize>, coords: bool, out: &mut impl Write) -> io::Result<()> {
    for m in newest_first(messages).take(limit.unwrap_or(usize::MAX)) {
        if coords {
            writeln!(out, "{} ({}, {})", m.feed_line(), m.lat, m.lon)?;
        } else {
            writeln!(out, "{}", m.feed_line())?;
        }
    }
    Ok(())
}

fn run_tui(config: &AppConfig, policy: BoundedTextInput) -> anyhow::Result<()> {
    let log_path = config.log_path();
    logging::init_file(&log_path).with_context(|| format!("could not open log file {}", log_path.display()))?;
    tracing::info!(store = %config.store_path.display(), max_chars = config.max_chars, "starting feed");

    let mut app = FeedApp::new(system_controller(config), policy);
    let mut terminal = tui::init()?;
    let result = event_loop(&mut terminal, &mut app);
    tui::restore()?;
    result
}

fn event_loop(terminal: &mut tui::Tui, app: &mut impl AppController) -> anyhow::Result<()> {
    while !app.should_quit() {
        terminal.draw(|f| app.render(f))?;
        let action = tui::next_action(TICK_RATE)?;
        app.update(action);
        if app.take_bell() {
            tui::ring_bell()?;
        }
    }
    tracing::info!("feed closed");
    Ok(())
}
