use std::sync::Arc;
use std::time::Duration;

use racefeed_core::{CategoryId, Clock, EventSource, WindowPolicy, normalize};
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::state::FeedCommand;

/// Everything a fetch loop needs besides its generation and filter.
pub(crate) struct FetchContext<S, C> {
    pub source: Arc<S>,
    pub clock: Arc<C>,
    pub policy: WindowPolicy,
    pub period: Duration,
}

impl<S, C> Clone for FetchContext<S, C> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            clock: Arc::clone(&self.clock),
            policy: self.policy,
            period: self.period,
        }
    }
}

/// When a fetch loop's first fetch happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FirstFetch {
    Immediate,
    /// One full period from now (used when resuming a loop that died).
    NextCycle,
}

/// Run the fetch loop for one filter generation: first fetch per `first`,
/// then every `period`, until shut down, aborted or the state owner goes away.
///
/// Failures are reported and then simply wait for the next tick.
pub(crate) async fn run_scheduler<S: EventSource, C: Clock>(
    ctx: FetchContext<S, C>,
    generation: u64,
    filter: Option<CategoryId>,
    first: FirstFetch,
    commands: mpsc::UnboundedSender<FeedCommand>,
    mut shutdown: watch::Receiver<bool>,
) {
    let start = match first {
        FirstFetch::Immediate => Instant::now(),
        FirstFetch::NextCycle => Instant::now() + ctx.period,
    };
    let mut interval = tokio::time::interval_at(start, ctx.period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if run_cycle(&ctx, generation, filter.as_ref(), &commands).await.is_err() {
                    debug!("State owner gone, scheduler exiting");
                    break;
                }
            }
            res = shutdown.changed() => {
                if res.is_err() || *shutdown.borrow() {
                    debug!("Scheduler shutting down (generation {generation})");
                    break;
                }
            }
        }
    }
}

/// One fetch, normalize and window pass.
async fn run_cycle<S: EventSource, C: Clock>(
    ctx: &FetchContext<S, C>,
    generation: u64,
    filter: Option<&CategoryId>,
    commands: &mpsc::UnboundedSender<FeedCommand>,
) -> Result<(), mpsc::error::SendError<FeedCommand>> {
    commands.send(FeedCommand::FetchStarted { generation })?;

    let command = match ctx.source.fetch().await {
        Ok(catalog) => {
            let snapshot = normalize(catalog);
            let events = ctx.policy.apply(&snapshot, filter, ctx.clock.now());
            info!(
                "Fetched {} races, {} visible (generation {generation})",
                snapshot.len(),
                events.len()
            );
            FeedCommand::FetchSucceeded { generation, events }
        }
        Err(e) => {
            warn!("Race fetch failed: {e}");
            FeedCommand::FetchFailed {
                generation,
                message: e.to_string(),
            }
        }
    };

    commands.send(command)
}
