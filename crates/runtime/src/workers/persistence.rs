//! Persistence worker for background save writes.
//!
//! Gameplay hands a finished [`SaveDocument`] to the worker and moves on.
//! The queue is bounded: when it is full the new save is dropped with a
//! warning, since the next commit will produce a newer document anyway.
//! Write failures are logged and published but never reach gameplay.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::error::{Result, RuntimeError};
use crate::events::{Event, EventBus, PersistenceEvent};
use crate::repository::{SaveDocument, SaveRepository};

/// Commands that can be sent to the persistence worker
enum Command {
    Save(Box<SaveDocument>),
    /// Replies once every save queued before it has been written.
    Flush { reply: oneshot::Sender<()> },
    Shutdown,
}

/// Background worker that owns the save repository.
pub struct PersistenceWorker {
    repository: Arc<dyn SaveRepository>,
    events: EventBus,
    command_rx: mpsc::Receiver<Command>,
    written: u64,
}

impl PersistenceWorker {
    /// Spawns the worker on the current Tokio runtime.
    ///
    /// Fails with [`RuntimeError::NoAsyncRuntime`] outside a runtime.
    pub fn spawn(
        repository: Arc<dyn SaveRepository>,
        events: EventBus,
        buffer: usize,
    ) -> Result<(PersistenceHandle, JoinHandle<()>)> {
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| RuntimeError::NoAsyncRuntime)?;
        let (command_tx, command_rx) = mpsc::channel(buffer.max(1));
        let worker = Self {
            repository,
            events,
            command_rx,
            written: 0,
        };
        let task = runtime.spawn(worker.run());
        Ok((PersistenceHandle { command_tx }, task))
    }

    async fn run(mut self) {
        debug!("PersistenceWorker started");

        while let Some(command) = self.command_rx.recv().await {
            match command {
                Command::Save(document) => self.write(&document),
                Command::Flush { reply } => {
                    let _ = reply.send(());
                }
                Command::Shutdown => break,
            }
        }

        debug!(written = self.written, "PersistenceWorker stopped");
    }

    fn write(&mut self, document: &SaveDocument) {
        match self.repository.save(document) {
            Ok(()) => {
                self.written += 1;
                self.events
                    .publish(Event::Persistence(PersistenceEvent::Saved {
                        commits: document.commits.len(),
                    }));
            }
            Err(e) => {
                error!("Failed to write save: {}", e);
                self.events
                    .publish(Event::Persistence(PersistenceEvent::SaveFailed {
                        reason: e.to_string(),
                    }));
            }
        }
    }
}

/// Cloneable sender side of the persistence worker.
#[derive(Clone)]
pub struct PersistenceHandle {
    command_tx: mpsc::Sender<Command>,
}

impl PersistenceHandle {
    /// Queues `document` without waiting. Returns `false` if it was dropped.
    pub fn save(&self, document: SaveDocument) -> bool {
        match self.command_tx.try_send(Command::Save(Box::new(document))) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Save queue full, dropping save");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!("PersistenceWorker stopped, dropping save");
                false
            }
        }
    }

    /// Waits until every save queued so far has been written.
    pub async fn flush(&self) -> Result<()> {
        let (reply, done) = oneshot::channel();
        self.command_tx
            .send(Command::Flush { reply })
            .await
            .map_err(|_| RuntimeError::WorkerStopped)?;
        done.await.map_err(|_| RuntimeError::WorkerStopped)
    }

    /// Asks the worker to stop after the saves already queued.
    pub async fn shutdown(&self) -> Result<()> {
        self.command_tx
            .send(Command::Shutdown)
            .await
            .map_err(|_| RuntimeError::WorkerStopped)
    }
}

#[cfg(test)]
mod tests {
    use crawl_core::GameState;

    use super::*;
    use crate::events::Topic;
    use crate::history::History;
    use crate::repository::{InMemorySaveRepository, RepositoryError};

    fn document() -> SaveDocument {
        History::new(&GameState::new(1, 10)).unwrap().to_document()
    }

    struct FailingRepository;

    impl SaveRepository for FailingRepository {
        fn save(&self, _document: &SaveDocument) -> crate::repository::Result<()> {
            Err(RepositoryError::Io(std::io::Error::other("disk full")))
        }

        fn load(&self) -> crate::repository::Result<Option<SaveDocument>> {
            Ok(None)
        }

        fn exists(&self) -> bool {
            false
        }

        fn delete(&self) -> crate::repository::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn flush_waits_for_queued_saves() {
        let repository = Arc::new(InMemorySaveRepository::new());
        let (handle, task) =
            PersistenceWorker::spawn(repository.clone(), EventBus::new(), 4).unwrap();

        assert!(handle.save(document()));
        assert!(handle.save(document()));
        handle.flush().await.unwrap();

        assert_eq!(repository.save_count(), 2);
        assert_eq!(repository.load().unwrap(), Some(document()));

        handle.shutdown().await.unwrap();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn write_failures_are_published_not_returned() {
        let events = EventBus::new();
        let mut saves = events.subscribe(Topic::Persistence);
        let (handle, _task) =
            PersistenceWorker::spawn(Arc::new(FailingRepository), events, 4).unwrap();

        assert!(handle.save(document()));
        handle.flush().await.unwrap();

        match saves.recv().await.unwrap() {
            Event::Persistence(PersistenceEvent::SaveFailed { reason }) => {
                assert!(reason.contains("disk full"));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn stopped_worker_drops_saves() {
        let (handle, task) =
            PersistenceWorker::spawn(Arc::new(InMemorySaveRepository::new()), EventBus::new(), 1)
                .unwrap();
        handle.shutdown().await.unwrap();
        task.await.unwrap();

        assert!(!handle.save(document()));
        assert!(matches!(handle.flush().await, Err(RuntimeError::WorkerStopped)));
    }

    #[test]
    fn spawning_outside_a_runtime_fails() {
        let result = PersistenceWorker::spawn(
            Arc::new(InMemorySaveRepository::new()),
            EventBus::new(),
            1,
        );
        assert!(matches!(result, Err(RuntimeError::NoAsyncRuntime)));
    }
}
