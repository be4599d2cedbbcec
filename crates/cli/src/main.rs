use crate::{
    commands::{Commands, RunArgs},
    error::CliError,
    shutdown::{SHUTDOWN_EXIT_CODE, ShutdownCoordinator},
    source::NumberedPages,
    viewport::Viewport,
};
use adapter_runtime::{AdapterConfig, EndlessList, RowChange, Settlement};
use clap::Parser;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod output;
mod shutdown;
mod source;
mod viewport;

#[derive(Parser)]
#[command(
    name = "endless-demo",
    version = "0.1.0",
    about = "Endless list paging demo"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            let shutdown = ShutdownCoordinator::new(CancellationToken::new());
            shutdown.register_handlers();

            run(args, shutdown.cancel_token()).await?;

            if shutdown.is_shutdown_requested() {
                std::process::exit(SHUTDOWN_EXIT_CODE);
            }
        }
        Commands::ShowConfig { config } => {
            let config = load_config(config.as_deref()).await?;
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
    }

    Ok(())
}

async fn load_config(path: Option<&str>) -> Result<AdapterConfig, CliError> {
    let config = match path {
        Some(path) => AdapterConfig::load(path).await?,
        None => AdapterConfig::default(),
    };
    Ok(config.with_env_overrides()?)
}

async fn run(args: RunArgs, cancel: CancellationToken) -> Result<(), CliError> {
    if args.viewport == 0 {
        return Err(CliError::InvalidArgument(
            "--viewport must be at least 1".to_string(),
        ));
    }

    let mut config = load_config(args.config.as_deref()).await?;
    if let Some(page_size) = args.page_size {
        config.items_per_page = page_size;
    }

    let source = NumberedPages::new(config.items_per_page)
        .with_delay(Duration::from_millis(args.delay_ms))
        .with_short_page(args.short_page)
        .failing_once_at(args.fail_on_page)
        .retry_on_error(args.retry_on_error);
    let first_page = source.first_page();

    let mut list = EndlessList::with_config(source, config, first_page)?
        .with_listener(|change: RowChange| output::print_change(&change));
    let mut viewport = Viewport::new(args.viewport);

    info!(
        items_per_page = list.items_per_page(),
        viewport = args.viewport,
        "starting scroll"
    );

    for step in 0..args.max_steps {
        let placeholder_visible = viewport.render(&mut list)?;
        output::print_screen(step, viewport.top(), viewport.visible());

        if placeholder_visible {
            let settlement = tokio::select! {
                _ = cancel.cancelled() => break,
                settlement = list.settle() => settlement,
            };
            match settlement {
                Some(Settlement::Appended { count, .. }) => info!(count, "page arrived"),
                Some(Settlement::Failed { keep_appending, .. }) => {
                    warn!(keep_appending, "page failed")
                }
                Some(Settlement::Stale { .. }) | None => {}
            }
        }

        if cancel.is_cancelled() {
            break;
        }
        if !viewport.scroll(list.row_count()) && !list.is_keep_appending() {
            info!(rows = list.row_count(), "reached the end of the list");
            break;
        }
    }

    if let Some(id) = list.cancel_pending_fetch() {
        info!(fetch_id = %id, "released pending fetch");
    }
    output::print_metrics(&list.metrics().snapshot())?;
    Ok(())
}
