mod commands;

use anyhow::Result;
use clap::Parser;
use commands::Command;
use nbpdash_client::HttpServiceSource;
use nbpdash_controller::{DashboardController, UiEvent};
use nbpdash_core::config::Config;
use nbpdash_view::{MultiSurface, PageModel, RenderSurface, TerminalSurface};
use nbpdash_web::WebServer;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "nbpdash", about = "NBP/DR traffic-ratio monitoring dashboard")]
struct Cli {
    /// Path to configuration file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the services API, overrides api.base_url
    #[arg(long)]
    base_url: Option<String>,

    /// Refresh period in milliseconds, overrides dashboard.poll_interval_ms
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Serve the web dashboard, overrides web.enabled
    #[arg(long)]
    web: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }
    if let Some(interval_ms) = cli.interval_ms {
        config.dashboard.poll_interval_ms = interval_ms;
    }
    if cli.web {
        config.web.enabled = true;
    }
    config.validate()?;

    // Initialize logging
    init_logging(&config.logging);

    info!(
        base_url = %config.api.base_url,
        interval_ms = config.dashboard.poll_interval_ms,
        "starting nbpdash"
    );

    let source = Arc::new(HttpServiceSource::new(
        &config.api.base_url,
        config.api.request_timeout_secs.map(Duration::from_secs),
    )?);

    let page = Arc::new(PageModel::new(config.dashboard.locale));
    // The writer task runs until exit; it is not joined.
    let (terminal, _writer) = TerminalSurface::spawn(config.dashboard.locale, tokio::io::stdout());
    let terminal = Arc::new(terminal);
    let surface = MultiSurface::new()
        .with(page.clone())
        .with(terminal.clone());

    let controller = DashboardController::new(source, Arc::new(surface), &config.dashboard);

    // Shutdown signal
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (events_tx, events_rx) = mpsc::channel::<UiEvent>(32);
    let (quit_tx, mut quit_rx) = mpsc::channel::<()>(1);

    let mut tasks = Vec::new();

    {
        let controller = controller.clone();
        let rx = shutdown_rx.clone();
        tasks.push(tokio::spawn(async move {
            if let Err(e) = controller.run(events_rx, rx).await {
                error!("dashboard controller error: {e}");
            }
        }));
    }

    if config.web.enabled {
        let addr: SocketAddr = config.web.listen.parse()?;
        let web = WebServer::new(addr, page.clone(), events_tx.clone())
            .with_refresh_ms(config.dashboard.poll_interval_ms);
        let rx = shutdown_rx.clone();
        tasks.push(tokio::spawn(async move {
            if let Err(e) = web.run(rx).await {
                error!("web dashboard error: {e}");
            }
        }));
    }

    // Terminal commands. Not joined on shutdown: a pending stdin read cannot be
    // interrupted.
    tokio::spawn(read_commands(controller.clone(), terminal, events_tx, quit_tx));

    // Wait for shutdown signal
    tokio::select! {
        res = tokio::signal::ctrl_c() => {
            res?;
            info!("shutdown signal received, stopping...");
        }
        _ = quit_rx.recv() => {
            info!("quit requested, stopping...");
        }
    }
    let _ = shutdown_tx.send(true);

    for task in tasks {
        let _ = task.await;
    }

    info!("nbpdash stopped");
    Ok(())
}

async fn read_commands(
    controller: DashboardController,
    terminal: Arc<TerminalSurface>,
    events: mpsc::Sender<UiEvent>,
    quit: mpsc::Sender<()>,
) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!("stdin read failed: {e}");
                break;
            }
        };

        match Command::parse(&line) {
            Some(Command::Select(id)) => {
                if events.send(UiEvent::Select(id)).await.is_err() {
                    break;
                }
            }
            Some(Command::Detail) => match controller.detail().await {
                Some((id, detail)) => terminal.render_service_detail(&id, &detail).await,
                None => terminal.print("no service detail loaded yet"),
            },
            Some(Command::List) => {
                let selected = controller.selected().await;
                let mut text = String::new();
                for service in controller.services().await {
                    let marker = if Some(&service.id) == selected.as_ref() { "*" } else { " " };
                    text.push_str(&format!(
                        "{marker} {} {} ({})\n",
                        service.id, service.name, service.status
                    ));
                }
                terminal.print(text);
            }
            Some(Command::Help) => terminal.print(commands::HELP),
            Some(Command::Quit) => {
                let _ = quit.send(()).await;
                break;
            }
            None => {}
        }
    }
}

fn init_logging(config: &nbpdash_core::config::LoggingConfig) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    // stdout belongs to the terminal dashboard
    match config.format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
