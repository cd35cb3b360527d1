use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use racefeed_core::{EventSource, RaceCatalog, SourceError};
use tokio::sync::{Notify, oneshot};

/// One scripted answer from [`ScriptedSource`].
pub enum Step {
    Ok(RaceCatalog),
    Err(SourceError),
    /// Resolves when the test sends on the paired sender.
    Gated(oneshot::Receiver<Result<RaceCatalog, SourceError>>),
    /// Panics inside the fetch, killing the calling task.
    Panic,
}

/// Event source that replays a fixed script, then never answers again.
pub struct ScriptedSource {
    steps: Mutex<VecDeque<Step>>,
    calls: AtomicUsize,
    called: Notify,
}

impl ScriptedSource {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            calls: AtomicUsize::new(0),
            called: Notify::new(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn wait_for_calls(&self, n: usize) {
        loop {
            let notified = self.called.notified();
            if self.calls() >= n {
                return;
            }
            notified.await;
        }
    }
}

impl EventSource for ScriptedSource {
    async fn fetch(&self) -> Result<RaceCatalog, SourceError> {
        let step = self.steps.lock().unwrap().pop_front();
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.called.notify_waiters();

        match step {
            Some(Step::Ok(catalog)) => Ok(catalog),
            Some(Step::Err(err)) => Err(err),
            Some(Step::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(SourceError::Transport("gate dropped".to_string()))),
            Some(Step::Panic) => panic!("scripted fetch panic"),
            None => std::future::pending().await,
        }
    }
}
