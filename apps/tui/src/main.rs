use clap::Parser;
use color_eyre::Result;
use shoresquad_tui::app::{App, AppActions};
use shoresquad_tui::cli::CliArgs;
use shoresquad_tui::config::init_app_config;
use shoresquad_tui::crews::CrewRegistry;
use shoresquad_tui::domain::CleanupEvent;
use shoresquad_tui::store::{Store, EVENTS_KEY};
use shoresquad_tui::{event, terminal};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let cli = CliArgs::parse();
    cli.apply_env_overrides();

    let config = init_app_config()?;
    if config.debug {
        eprintln!("Using store file: {}", config.store_path.display());
    }

    let store = Store::open(config.store_path.clone());
    let events: Vec<CleanupEvent> = store.load(EVENTS_KEY);
    let registry = CrewRegistry::load(store);
    let actions = Arc::new(AppActions::from_config(&config)?);

    let mut app = App::new(registry, events, actions);

    // Fall back to the headless summary outside a terminal.
    if cli.headless || !is_terminal() {
        return event::run_headless(&app, cli.json);
    }

    let mut terminal = terminal::setup_terminal()?;

    let result = event::run(&mut terminal, &mut app).await;

    terminal::cleanup_terminal_state(true, true);

    result
}

fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
