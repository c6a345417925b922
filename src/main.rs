use std::io::{Write, stdout};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use countdown::{ChannelListener, TimerConfig, TimerEvent, TimerSession, TimerStatus};

/// Counts down from a number of minutes on the terminal.
///
/// While running, type `p` to pause, `r` to resume and `s` or `q` to stop.
#[derive(Parser, Debug)]
#[command(name = "countdown", version)]
struct Cli {
    /// Minutes to count down from.
    #[arg(short, long)]
    minutes: String,

    /// Milliseconds between display updates.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    interval_ms: Option<u64>,

    /// Seconds left at which the display switches to a warning.
    #[arg(long)]
    warn_secs: Option<u64>,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn render(session: &TimerSession) -> Result<()> {
    let paused = session
        .current()
        .is_some_and(|timer| timer.status() == TimerStatus::Paused);
    let state = match (paused, session.urgency()) {
        (true, _) => "paused".to_string(),
        (false, Some(urgency)) => urgency.to_string(),
        (false, None) => String::new(),
    };

    let mut out = stdout().lock();
    write!(out, "\r{} [{state:<7}]", session.readout())?;
    out.flush().context("failed to flush stdout")
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = TimerConfig::from_env().context("invalid environment configuration")?;
    if let Some(millis) = cli.interval_ms {
        config = config.with_update_interval_ms(millis);
    }
    if let Some(seconds) = cli.warn_secs {
        config = config.with_warn_threshold_secs(seconds);
    }

    let (listener, events) = ChannelListener::bounded(16);
    let mut session = TimerSession::new(config, listener);
    session
        .start_input(&cli.minutes)
        .context("could not start countdown")?;
    render(&session)?;

    let mut commands = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(TimerEvent::Update { .. }) => render(&session)?,
                Ok(TimerEvent::Complete) => {
                    render(&session)?;
                    println!();
                    break;
                }
                Err(_) => break,
            },
            line = commands.next_line(), if stdin_open => {
                let Some(line) = line.context("failed to read stdin")? else {
                    stdin_open = false;
                    continue;
                };
                match line.trim() {
                    "p" => {
                        session.pause();
                    }
                    "r" => {
                        session.resume();
                    }
                    "s" | "q" => {
                        session.end();
                        render(&session)?;
                        println!();
                        break;
                    }
                    "" => {}
                    other => tracing::warn!(command = other, "unknown command"),
                }
                render(&session)?;
            }
        }
    }

    Ok(())
}
