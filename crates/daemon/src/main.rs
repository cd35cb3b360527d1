use anyhow::Result;
use clap::Parser;
use racefeed_api_client::ApiClient;
use racefeed_core::{CategoryId, Clock, EventSource, SystemClock, normalize};
use racefeed_daemon::config;
use racefeed_daemon::render::render;
use racefeed_daemon::{FeedSession, FeedState, SessionConfig};
use racefeed_runtime_config::FeedConfig;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

/// Live next-to-go race list.
#[derive(Debug, Parser)]
#[command(name = "racefeed", version)]
struct Args {
    /// Config file (defaults to $RACEFEED_CONFIG or ~/.config/racefeed/racefeed.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only show one category, by label ("horse") or id
    #[arg(long)]
    category: Option<String>,

    /// Fetch once, print, and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("racefeed=info".parse().unwrap())
                .add_directive("racefeed_daemon=info".parse().unwrap())
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    if let Err(e) = run(Args::parse()).await {
        error!("racefeed fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let path = config::config_path(args.config.as_deref())?;
    let cfg = config::load_config(&path)?;
    info!("Using config {}", path.display());

    let mut filter = args
        .category
        .as_deref()
        .and_then(|value| config::parse_filter_input(value, &cfg))
        .flatten();

    let source = ApiClient::new(
        &cfg.source.base_url,
        cfg.source.count,
        Duration::from_secs(cfg.source.timeout_secs),
    )?;
    let session_config = SessionConfig::from(&cfg.feed);

    if args.once {
        return run_once(&source, &cfg, session_config, filter.as_ref()).await;
    }

    info!(
        "Polling {} every {}s",
        source.base_url(),
        cfg.feed.fetch_interval_secs
    );
    let session = FeedSession::start(source, SystemClock, session_config, filter.clone());
    let mut state_rx = session.subscribe();
    let mut redraw = tokio::time::interval(Duration::from_secs(1));
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let shutdown = wait_for_shutdown();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = redraw.tick() => {}
            res = state_rx.changed() => {
                if res.is_err() {
                    break;
                }
            }
            line = input.next_line(), if stdin_open => {
                match line {
                    Ok(Some(line)) => {
                        if let Some(next) = config::parse_filter_input(&line, &cfg) {
                            info!(
                                "Filter changed to {}",
                                next.as_ref().map_or("all", CategoryId::as_str)
                            );
                            filter = next.clone();
                            session.set_filter(next);
                        }
                    }
                    Ok(None) => stdin_open = false,
                    Err(e) => {
                        warn!("Stopped reading filter input: {e}");
                        stdin_open = false;
                    }
                }
            }
            res = &mut shutdown => {
                res?;
                break;
            }
        }
        let state = state_rx.borrow_and_update().clone();
        draw(&state, filter.as_ref(), &cfg);
    }

    info!("Shutdown signal received, stopping...");
    session.shutdown().await;
    Ok(())
}

/// Single fetch without the polling loops.
async fn run_once(
    source: &ApiClient,
    cfg: &FeedConfig,
    session_config: SessionConfig,
    filter: Option<&CategoryId>,
) -> Result<()> {
    let now = SystemClock.now();
    let state = match source.fetch().await {
        Ok(catalog) => FeedState {
            visible_events: session_config
                .policy
                .apply(&normalize(catalog), filter, now),
            is_loading: false,
            error_message: None,
        },
        Err(e) => FeedState {
            visible_events: Vec::new(),
            is_loading: false,
            error_message: Some(e.to_string()),
        },
    };
    print!(
        "{}",
        render(&state, now, filter.map(CategoryId::as_str), cfg)
    );
    Ok(())
}

fn draw(state: &FeedState, filter: Option<&CategoryId>, cfg: &FeedConfig) {
    let out = render(
        state,
        SystemClock.now(),
        filter.map(CategoryId::as_str),
        cfg,
    );
    if std::io::stdout().is_terminal() {
        // clear screen, cursor home
        print!("\x1b[2J\x1b[H{out}\n{}\n", filter_hint(cfg));
    } else {
        println!("{out}");
    }
}

fn filter_hint(cfg: &FeedConfig) -> String {
    let labels: Vec<&str> = cfg.categories.iter().map(|c| c.label.as_str()).collect();
    format!("Type all, {} (or a category id) + Enter to filter", labels.join(", "))
}

/// Wait for SIGTERM or SIGINT
async fn wait_for_shutdown() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        tokio::select! {
            _ = sigterm.recv() => info!("Received SIGTERM"),
            _ = sigint.recv() => info!("Received SIGINT"),
        }
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        info!("Received Ctrl+C");
    }
    Ok(())
}
