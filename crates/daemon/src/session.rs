//! Wires the fetch scheduler, the expiry ticker and the state owner together.

use std::sync::Arc;
use std::time::Duration;

use racefeed_core::{CategoryId, Clock, EventSource, WindowPolicy};
use racefeed_runtime_config::FeedSettings;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::scheduler::{FetchContext, FirstFetch, run_scheduler};
use crate::state::{FeedCommand, FeedState, FeedStore};
use crate::ticker::run_ticker;

/// Timing and window settings for a [`FeedSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub fetch_interval: Duration,
    pub tick_interval: Duration,
    pub policy: WindowPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fetch_interval: Duration::from_secs(60),
            tick_interval: Duration::from_secs(1),
            policy: WindowPolicy::default(),
        }
    }
}

impl From<&FeedSettings> for SessionConfig {
    fn from(settings: &FeedSettings) -> Self {
        Self {
            fetch_interval: Duration::from_secs(settings.fetch_interval_secs),
            tick_interval: Duration::from_secs(settings.tick_interval_secs),
            policy: WindowPolicy {
                grace_period_secs: settings.grace_period_secs,
                max_display: settings.max_display,
            },
        }
    }
}

/// Handle to a running feed.
///
/// State is owned by a single actor task; the scheduler, the ticker and
/// [`FeedSession::set_filter`] only send it commands. Changing the filter
/// bumps the generation and restarts the fetch loop, so results for an old
/// filter can never land.
pub struct FeedSession {
    commands: mpsc::UnboundedSender<FeedCommand>,
    state: watch::Receiver<FeedState>,
    shutdown: watch::Sender<bool>,
    actor: JoinHandle<()>,
    ticker: JoinHandle<()>,
}

impl FeedSession {
    /// Spawn the session on the current tokio runtime. The first fetch starts
    /// immediately.
    pub fn start<S: EventSource, C: Clock>(
        source: S,
        clock: C,
        config: SessionConfig,
        filter: Option<CategoryId>,
    ) -> Self {
        let clock = Arc::new(clock);
        let store = FeedStore::new(config.policy, filter);
        let (state_tx, state_rx) = watch::channel(store.state().clone());
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let ctx = FetchContext {
            source: Arc::new(source),
            clock: Arc::clone(&clock),
            policy: config.policy,
            period: config.fetch_interval,
        };

        let actor = tokio::spawn(run_actor(
            store,
            ctx,
            commands_rx,
            commands_tx.clone(),
            state_tx,
            shutdown_rx.clone(),
        ));
        let ticker = tokio::spawn(run_ticker(
            clock,
            config.tick_interval,
            commands_tx.clone(),
            shutdown_rx,
        ));

        Self {
            commands: commands_tx,
            state: state_rx,
            shutdown: shutdown_tx,
            actor,
            ticker,
        }
    }

    /// Receiver that is notified whenever the presentation state changes.
    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.state.clone()
    }

    pub fn current(&self) -> FeedState {
        self.state.borrow().clone()
    }

    /// Switch the category filter (`None` shows every category) and re-fetch
    /// right away.
    pub fn set_filter(&self, filter: Option<CategoryId>) {
        if self.commands.send(FeedCommand::SetFilter { filter }).is_err() {
            debug!("set_filter after session stopped");
        }
    }

    /// Stop both loops and wait for them to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.actor.await;
        let _ = self.ticker.await;
        info!("Feed session stopped");
    }
}

/// Sole owner of the feed state. Applies commands in arrival order and
/// restarts the fetch loop on every filter change.
///
/// A fetch loop that dies on its own is reported as a failed fetch and
/// resumed on the next cycle.
async fn run_actor<S: EventSource, C: Clock>(
    mut store: FeedStore,
    ctx: FetchContext<S, C>,
    mut commands: mpsc::UnboundedReceiver<FeedCommand>,
    commands_tx: mpsc::UnboundedSender<FeedCommand>,
    state_tx: watch::Sender<FeedState>,
    mut shutdown: watch::Receiver<bool>,
) {
    let scheduler_shutdown = shutdown.clone();
    let spawn_scheduler = |store: &FeedStore, first: FirstFetch| {
        tokio::spawn(run_scheduler(
            ctx.clone(),
            store.generation(),
            store.filter().cloned(),
            first,
            commands_tx.clone(),
            scheduler_shutdown.clone(),
        ))
    };
    let mut scheduler = spawn_scheduler(&store, FirstFetch::Immediate);

    loop {
        tokio::select! {
            Some(command) = commands.recv() => {
                let restart = matches!(command, FeedCommand::SetFilter { .. });
                if store.apply(command) {
                    state_tx.send_replace(store.state().clone());
                }
                if restart {
                    scheduler.abort();
                    scheduler = spawn_scheduler(&store, FirstFetch::Immediate);
                }
            }
            res = &mut scheduler => {
                if *shutdown.borrow() {
                    // handle already consumed; nothing left to join
                    return;
                }
                let reason = match res {
                    Err(e) if e.is_panic() => "fetch loop panicked".to_string(),
                    Err(e) => format!("fetch loop stopped: {e}"),
                    Ok(()) => "fetch loop exited".to_string(),
                };
                error!("{reason} (generation {}), resuming next cycle", store.generation());
                let failed = FeedCommand::FetchFailed {
                    generation: store.generation(),
                    message: reason,
                };
                if store.apply(failed) {
                    state_tx.send_replace(store.state().clone());
                }
                scheduler = spawn_scheduler(&store, FirstFetch::NextCycle);
            }
            res = shutdown.changed() => {
                if res.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    scheduler.abort();
    let _ = scheduler.await;
}
