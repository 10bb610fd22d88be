//! Write Queue Task
//!
//! Serializes asynchronous writes: one drain loop runs a single task to
//! completion before starting the next, in submission order.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::cache::StatsRecorder;
use crate::error::{CacheError, Result};

/// Boxed write operation run by the drain loop.
type WriteFuture = Pin<Box<dyn Future<Output = Result<()>> + Send + 'static>>;

#[derive(Clone, Copy)]
enum TaskKind {
    /// A real write, counted in the stats
    Write,
    /// Marker used by `flush` to wait for everything queued before it
    Barrier,
}

struct WriteTask {
    future: WriteFuture,
    completion: Completion,
}

/// Reports the outcome of one task.
///
/// A completion dropped before `finish` marks a counted write as failed, so
/// tasks lost with their runtime still leave the pending count.
struct Completion {
    label: String,
    kind: TaskKind,
    done: Option<oneshot::Sender<Result<()>>>,
    stats: Arc<StatsRecorder>,
}

impl Completion {
    fn finish(mut self, outcome: Result<()>) {
        if let TaskKind::Write = self.kind {
            match &outcome {
                Ok(()) => {
                    self.stats.record_write_completed();
                    debug!("Write to {} completed", self.label);
                }
                Err(err) => {
                    self.stats.record_write_failed();
                    warn!("Write to {} failed: {}", self.label, err);
                }
            }
        }

        if let Some(done) = self.done.take() {
            // The caller may have dropped its handle.
            let _ = done.send(outcome);
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        // Dropping the sender makes the handle report `WriteAborted`.
        if self.done.take().is_some() {
            if let TaskKind::Write = self.kind {
                self.stats.record_write_failed();
                warn!("Write to {} was dropped before it ran to completion", self.label);
            }
        }
    }
}

// == Write Handle ==
/// Completion handle of an enqueued write.
///
/// Dropping it is the fire-and-forget path; the write still runs.
#[derive(Debug)]
pub struct WriteHandle {
    key: String,
    receiver: oneshot::Receiver<Result<()>>,
}

impl WriteHandle {
    /// Key the write targets.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Waits for the write to finish and returns its outcome.
    pub async fn wait(self) -> Result<()> {
        let WriteHandle { key, receiver } = self;
        match receiver.await {
            Ok(outcome) => outcome,
            Err(_) => Err(CacheError::WriteAborted(key)),
        }
    }
}

// == Write Queue ==
/// FIFO queue of write tasks with a lazily started drain loop.
///
/// The first enqueue spawns the loop on the caller's Tokio runtime. If that
/// runtime goes away, the next enqueue starts a fresh loop.
pub struct WriteQueue {
    sender: Mutex<Option<mpsc::UnboundedSender<WriteTask>>>,
    stats: Arc<StatsRecorder>,
}

impl WriteQueue {
    pub fn new(stats: Arc<StatsRecorder>) -> Self {
        Self {
            sender: Mutex::new(None),
            stats,
        }
    }

    // == Enqueue ==
    /// Appends a write to the queue and returns its completion handle.
    ///
    /// # Errors
    /// - `NoRuntime` if the drain loop must be started and the caller is not
    ///   inside a Tokio runtime. Nothing is queued or counted in that case.
    pub fn enqueue<F>(&self, label: impl Into<String>, future: F) -> Result<WriteHandle>
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        self.submit(label.into(), TaskKind::Write, Box::pin(future))
    }

    // == Flush ==
    /// Waits until every task enqueued before this call has finished.
    pub async fn flush(&self) {
        let submitted = self.submit(
            "flush".to_string(),
            TaskKind::Barrier,
            Box::pin(async { Ok(()) }),
        );
        // A barrier never fails; an error only means the loop went away.
        if let Ok(handle) = submitted {
            let _ = handle.wait().await;
        }
    }

    /// Number of writes enqueued but not yet finished.
    pub fn pending(&self) -> u64 {
        self.stats.snapshot(0).pending_writes()
    }

    fn submit(&self, label: String, kind: TaskKind, future: WriteFuture) -> Result<WriteHandle> {
        let mut sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner);

        let tx = match sender.as_ref().filter(|tx| !tx.is_closed()) {
            Some(tx) => tx.clone(),
            None => {
                let runtime = Handle::try_current().map_err(|_| CacheError::NoRuntime)?;
                let (tx, rx) = mpsc::unbounded_channel();
                spawn_drain_loop(&runtime, rx);
                *sender = Some(tx.clone());
                tx
            }
        };

        if let TaskKind::Write = kind {
            self.stats.record_write_enqueued();
        }

        let (done, receiver) = oneshot::channel();
        let task = WriteTask {
            future,
            completion: Completion {
                label: label.clone(),
                kind,
                done: Some(done),
                stats: Arc::clone(&self.stats),
            },
        };
        // A rejected task is dropped here and its completion reports the abort.
        let _ = tx.send(task);

        Ok(WriteHandle {
            key: label,
            receiver,
        })
    }
}

/// Spawns the loop that runs queued tasks one at a time.
///
/// Each task runs on its own Tokio task and is awaited before the next one
/// starts, so a panicking write is contained like a failing one.
fn spawn_drain_loop(
    runtime: &Handle,
    mut receiver: mpsc::UnboundedReceiver<WriteTask>,
) -> JoinHandle<()> {
    runtime.spawn(async move {
        debug!("Write queue drain loop started");

        while let Some(WriteTask { future, completion }) = receiver.recv().await {
            let outcome = match tokio::spawn(future).await {
                Ok(outcome) => outcome,
                Err(join_error) => {
                    error!("Write task for {} panicked: {}", completion.label, join_error);
                    Err(CacheError::WriteAborted(completion.label.clone()))
                }
            };
            completion.finish(outcome);
        }

        debug!("Write queue drain loop stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn queue() -> (WriteQueue, Arc<StatsRecorder>) {
        let stats = Arc::new(StatsRecorder::new());
        (WriteQueue::new(Arc::clone(&stats)), stats)
    }

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_tasks_run_in_submission_order() {
        let (queue, _) = queue();
        let log = Arc::new(Mutex::new(Vec::new()));

        for (i, delay) in [30u64, 0, 10].into_iter().enumerate() {
            let log = Arc::clone(&log);
            let handle = queue.enqueue(format!("task-{}", i), async move {
                log.lock().unwrap().push(format!("start-{}", i));
                tokio::time::sleep(Duration::from_millis(delay)).await;
                log.lock().unwrap().push(format!("end-{}", i));
                Ok(())
            });
            assert!(handle.is_ok());
        }

        queue.flush().await;
        assert_eq!(
            *log.lock().unwrap(),
            vec!["start-0", "end-0", "start-1", "end-1", "start-2", "end-2"]
        );
    }

    #[tokio::test]
    async fn test_failure_does_not_stall_queue() {
        let (queue, stats) = queue();

        let failed = queue
            .enqueue("bad", async { Err(CacheError::Store("offline".into())) })
            .unwrap();
        let ok = queue.enqueue("good", async { Ok(()) }).unwrap();

        assert_eq!(failed.wait().await, Err(CacheError::Store("offline".into())));
        assert_eq!(ok.wait().await, Ok(()));

        let snapshot = stats.snapshot(0);
        assert_eq!(snapshot.writes_enqueued, 2);
        assert_eq!(snapshot.writes_completed, 1);
        assert_eq!(snapshot.writes_failed, 1);
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        let (queue, stats) = queue();

        let panicked = queue
            .enqueue("boom", async {
                if true {
                    panic!("write exploded");
                }
                Ok(())
            })
            .unwrap();
        let after = queue.enqueue("after", async { Ok(()) }).unwrap();

        assert_eq!(
            panicked.wait().await,
            Err(CacheError::WriteAborted("boom".to_string()))
        );
        assert!(after.wait().await.is_ok());
        assert_eq!(stats.snapshot(0).writes_failed, 1);
    }

    #[tokio::test]
    async fn test_dropped_handle_still_runs() {
        let (queue, stats) = queue();
        let ran = Arc::new(Mutex::new(false));

        let flag = Arc::clone(&ran);
        drop(queue.enqueue("fire-and-forget", async move {
            *flag.lock().unwrap() = true;
            Ok(())
        }));

        queue.flush().await;
        assert!(*ran.lock().unwrap());
        assert_eq!(queue.pending(), 0);
        assert_eq!(stats.snapshot(0).writes_completed, 1);
    }

    #[tokio::test]
    async fn test_flush_on_idle_queue() {
        let (queue, stats) = queue();
        queue.flush().await;
        assert_eq!(stats.snapshot(0).writes_enqueued, 0);
    }

    #[tokio::test]
    async fn test_handle_reports_key() {
        let (queue, _) = queue();
        let handle = queue.enqueue("team:a/b", async { Ok(()) }).unwrap();
        assert_eq!(handle.key(), "team:a/b");
        handle.wait().await.unwrap();
    }

    #[test]
    fn test_enqueue_without_runtime_is_rejected() {
        let (queue, stats) = queue();

        let result = queue.enqueue("orphan", async { Ok(()) });

        assert!(matches!(result, Err(CacheError::NoRuntime)));
        assert_eq!(stats.snapshot(0).writes_enqueued, 0);
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn test_writes_lost_with_runtime_are_counted_failed() {
        let (queue, stats) = queue();

        let first = runtime();
        let stranded = first
            .block_on(async {
                queue.enqueue("stranded", async {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(())
                })
            })
            .unwrap();
        drop(first);

        let second = runtime();
        second.block_on(async {
            assert_eq!(
                stranded.wait().await,
                Err(CacheError::WriteAborted("stranded".to_string()))
            );
            let next = queue.enqueue("next", async { Ok(()) }).unwrap();
            queue.flush().await;
            assert_eq!(next.wait().await, Ok(()));
        });

        let snapshot = stats.snapshot(0);
        assert_eq!(snapshot.writes_enqueued, 2);
        assert_eq!(snapshot.writes_failed, 1);
        assert_eq!(snapshot.writes_completed, 1);
        assert_eq!(queue.pending(), 0);
    }
}
