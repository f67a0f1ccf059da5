use clap::Parser;
use color_eyre::eyre::{eyre, WrapErr};
use echo_core::{Report, Session, Size};
use rand::{rngs::StdRng, SeedableRng};
use std::{
    fs::File,
    net::IpAddr,
    path::Path,
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing_subscriber::EnvFilter;

use crate::{app::App, cli::Cli, event::EventHandler};

mod app;
mod cli;
mod event;
mod ui;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        init_tracing(path)?;
    }

    let config = cli.config();
    let address = resolve(&cli.destination).await?;
    tracing::info!(destination = %cli.destination, %address, "destination resolved");

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let (width, height) =
        crossterm::terminal::size().wrap_err("failed to query terminal size")?;
    let session = Session::new(
        config.clone(),
        cli.destination.clone(),
        Size::new(i32::from(width), i32::from(height)),
        rng,
    )?;

    let started = Instant::now();
    let mut terminal = ratatui::init();
    let events = EventHandler::new(Duration::from_millis(u64::from(config.tick_ms)));
    let result = App::new(session, events).run(&mut terminal).await;
    ratatui::restore();
    let outcome = result?;
    tracing::info!(rounds = outcome.results().len(), aborted = outcome.is_aborted(), "match over");

    let report = Report::new(
        cli.destination,
        address,
        &config.payload,
        outcome,
        started.elapsed().as_secs(),
    );
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }
    Ok(())
}

/// Send tracing output to `path`; the terminal itself belongs to the game
fn init_tracing(path: &Path) -> color_eyre::Result<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// First address the destination resolves to
async fn resolve(destination: &str) -> color_eyre::Result<IpAddr> {
    let mut addrs = tokio::net::lookup_host((destination, 0))
        .await
        .wrap_err_with(|| format!("failed to resolve {destination}"))?;
    addrs
        .next()
        .map(|addr| addr.ip())
        .ok_or_else(|| eyre!("no address found for {destination}"))
}
