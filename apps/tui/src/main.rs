mod app;
mod cli;
mod event;
mod terminal;
mod ui;

use app::actions::AppActions;
use app::{App, Tab};
use clap::Parser;
use cli::CliArgs;
use color_eyre::Result;
use elsa_dashboard::aggregate::WaveSelection;
use elsa_dashboard::config::init_app_config;
use event::HeadlessOptions;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let cli = CliArgs::parse();
    cli.apply_env_overrides();
    let config = init_app_config()?;

    let headless = cli.headless || !is_terminal();
    let _guard = init_tracing(&cli, headless, &config.log_dir)?;
    info!(api_base = %config.api_base, headless, "starting dashboard");

    let actions = AppActions::new(&config.api_base);

    if headless {
        let options = HeadlessOptions {
            json: cli.json,
            seed: config.seed,
            waves: WaveSelection::new(&cli.waves),
            map_waves: WaveSelection::new(&cli.map_waves),
        };
        return event::run_headless(&actions, &config.aggregator, options).await;
    }

    let mut app = App::new(config.aggregator, config.seed);
    for wave in &cli.waves {
        app.toggle_wave(Tab::Bar, wave);
        app.toggle_wave(Tab::Scatter, wave);
    }
    for wave in &cli.map_waves {
        app.toggle_wave(Tab::Map, wave);
    }

    // Setup terminal
    let mut terminal = terminal::setup()?;

    let result = event::run(&mut terminal, &mut app, &actions).await;

    // Restore terminal
    terminal::cleanup(true, true);

    result
}

/// Logs go to a file while the TUI owns the screen, and to stderr otherwise.
fn init_tracing(
    cli: &CliArgs,
    headless: bool,
    log_dir: &std::path::Path,
) -> Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));

    if headless {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    }

    std::fs::create_dir_all(log_dir)?;
    let appender = tracing_appender::rolling::never(log_dir, "elsa-dashboard.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(Some(guard))
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
