use std::sync::Arc;
use std::time::Duration;

use racefeed_core::Clock;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::state::FeedCommand;

/// Ask the state owner to drop aged-out events every `period`.
///
/// Runs for the whole session, independent of fetches.
pub(crate) async fn run_ticker<C: Clock>(
    clock: Arc<C>,
    period: Duration,
    commands: mpsc::UnboundedSender<FeedCommand>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if commands.send(FeedCommand::Prune { now: clock.now() }).is_err() {
                    break;
                }
            }
            res = shutdown.changed() => {
                if res.is_err() || *shutdown.borrow() {
                    debug!("Expiry ticker shutting down");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use racefeed_core::clock::ManualClock;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_every_period_with_current_time() {
        let clock = Arc::new(ManualClock::new(500));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(run_ticker(
            Arc::clone(&clock),
            Duration::from_secs(1),
            tx,
            shutdown_rx,
        ));

        assert_eq!(rx.recv().await, Some(FeedCommand::Prune { now: 500 }));
        clock.advance(1);
        assert_eq!(rx.recv().await, Some(FeedCommand::Prune { now: 501 }));
        clock.advance(1);
        assert_eq!(rx.recv().await, Some(FeedCommand::Prune { now: 502 }));

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_when_session_handle_dropped() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(run_ticker(
            Arc::new(ManualClock::new(0)),
            Duration::from_secs(1),
            tx,
            shutdown_rx,
        ));

        drop(shutdown_tx);
        handle.await.unwrap();
    }
}
