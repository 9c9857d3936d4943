//! Judging dispatcher
//!
//! A bounded pool of workers shares the submission queue. Each worker
//! handles one submission end-to-end (sandbox runs, scoring, leaderboard
//! update) before claiming the next; the channel guarantees at most one
//! worker ever receives a given submission id.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::{
    config::JudgeConfig, leaderboard::Leaderboard, registry::ContestRegistry,
    store::SubmissionStore,
};

use super::{
    runner::{self, JudgeContext},
    sandbox::Sandbox,
};

/// Running worker pool plus the queue feeding it
pub struct JudgeEngine {
    queue: mpsc::Sender<Uuid>,
    workers: Vec<JoinHandle<()>>,
}

impl JudgeEngine {
    /// Spawn the worker pool and return the engine handle
    pub fn start(
        config: JudgeConfig,
        registry: Arc<ContestRegistry>,
        store: Arc<SubmissionStore>,
        leaderboard: Arc<Leaderboard>,
        sandbox: Arc<dyn Sandbox>,
    ) -> Self {
        let (queue, rx) = mpsc::channel(config.queue_capacity.max(1));
        let rx = Arc::new(Mutex::new(rx));
        let worker_count = config.workers.max(1);

        let ctx = Arc::new(JudgeContext {
            config,
            registry,
            store,
            leaderboard,
            sandbox,
        });

        let workers = (0..worker_count)
            .map(|worker| {
                let rx = Arc::clone(&rx);
                let ctx = Arc::clone(&ctx);
                tokio::spawn(async move {
                    tracing::debug!(worker, "judge worker started");
                    loop {
                        // Hold the lock only for the dequeue itself so the
                        // other workers keep draining while this one judges
                        let next = { rx.lock().await.recv().await };
                        match next {
                            Some(id) => runner::judge_submission(&ctx, id).await,
                            None => break,
                        }
                    }
                    tracing::debug!(worker, "judge worker stopped");
                })
            })
            .collect();

        Self { queue, workers }
    }

    /// Sender side of the bounded submission queue
    pub fn queue(&self) -> mpsc::Sender<Uuid> {
        self.queue.clone()
    }

    /// Close the queue and wait for in-flight judging to finish
    pub async fn shutdown(self) {
        drop(self.queue);
        for worker in self.workers {
            if let Err(e) = worker.await {
                tracing::error!("judge worker panicked: {}", e);
            }
        }
    }
}
