//! Game session: live world state, history and persistence in one owner.
//!
//! A [`Session`] is the single writer of its world. Each call to
//! [`Session::dispatch`] resolves one action, settles the enemy turn that
//! may follow, commits the quiescent state and hands a save to the
//! background worker without waiting for it.

use std::sync::Arc;

use crawl_core::{Action, ContentOracle, GameEngine, GameError, GameState, Phase, ResolveOutcome};
use tokio::task::JoinHandle;

use crate::config::RuntimeConfig;
use crate::error::Result;
use crate::events::{Event, EventBus, HistoryEvent, PersistenceEvent};
use crate::history::{CommitId, History};
use crate::repository::{FileSaveRepository, SaveRepository};
use crate::workers::{PersistenceHandle, PersistenceWorker};

struct Persistence {
    handle: PersistenceHandle,
    task: JoinHandle<()>,
}

/// Builder for [`Session`].
pub struct SessionBuilder {
    content: Arc<dyn ContentOracle>,
    config: RuntimeConfig,
    repository: Option<Arc<dyn SaveRepository>>,
    seed: u64,
}

impl SessionBuilder {
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Use `repository` instead of the file named by the config.
    pub fn repository(mut self, repository: Arc<dyn SaveRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Seed for a freshly generated world.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Starts a new run, ignoring any existing save.
    pub fn new_game(self) -> Result<Session> {
        let repository = self.resolve_repository()?;
        let state = crawl_core::new_game(self.content.as_ref(), &self.config.game, self.seed)?;
        let history = History::new(&state)?;
        tracing::debug!(seed = self.seed, map = %state.map_id, "new game");
        self.finish(state, history, repository, true)
    }

    /// Resumes the saved history, or starts a new run when no usable save
    /// exists. Unreadable or inconsistent saves count as missing.
    pub fn load_or_new(self) -> Result<Session> {
        let repository = self.resolve_repository()?;
        let restored = repository.as_ref().and_then(|repository| match repository.load() {
            Ok(Some(document)) => match History::from_document(document) {
                Ok(history) => Some(history),
                Err(e) => {
                    tracing::warn!(
                        code = e.error_code(),
                        severity = e.severity().as_str(),
                        "Ignoring inconsistent save: {}",
                        e
                    );
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Ignoring unreadable save: {}", e);
                None
            }
        });

        let Some(history) = restored else {
            return self.new_game();
        };
        let state = history.current_state()?.clone();
        tracing::debug!(
            branch = history.current_branch(),
            commits = history.commit_count(),
            "resumed saved game"
        );
        self.finish(state, history, repository, false)
    }

    fn resolve_repository(&self) -> Result<Option<Arc<dyn SaveRepository>>> {
        if let Some(repository) = &self.repository {
            return Ok(Some(Arc::clone(repository)));
        }
        match &self.config.save_path {
            Some(path) => Ok(Some(Arc::new(FileSaveRepository::new(path)?))),
            None => Ok(None),
        }
    }

    fn finish(
        self,
        state: GameState,
        history: History,
        repository: Option<Arc<dyn SaveRepository>>,
        save_now: bool,
    ) -> Result<Session> {
        let events = EventBus::with_capacity(self.config.event_buffer_size);
        let persistence = match repository {
            Some(repository) if self.config.enable_persistence => {
                let (handle, task) = PersistenceWorker::spawn(
                    repository,
                    events.clone(),
                    self.config.persistence_buffer_size,
                )?;
                Some(Persistence { handle, task })
            }
            _ => None,
        };

        let session = Session {
            content: self.content,
            config: self.config,
            state,
            history,
            events,
            persistence,
        };
        if save_now {
            session.persist();
        }
        Ok(session)
    }
}

/// Live game session.
pub struct Session {
    content: Arc<dyn ContentOracle>,
    config: RuntimeConfig,
    state: GameState,
    history: History,
    events: EventBus,
    persistence: Option<Persistence>,
}

impl Session {
    pub fn builder(content: Arc<dyn ContentOracle>) -> SessionBuilder {
        SessionBuilder {
            content,
            config: RuntimeConfig::default(),
            repository: None,
            seed: 0,
        }
    }

    /// Resolves `action`, settles a following enemy turn, then commits.
    ///
    /// The returned outcome lists every phase change in order, including the
    /// ones produced while settling.
    pub fn dispatch(&mut self, action: Action) -> Result<ResolveOutcome> {
        let mut observer = self.events.clone();
        let mut engine = GameEngine::new(&mut self.state, self.content.as_ref(), &self.config.game)
            .with_observer(&mut observer);

        let mut outcome = engine.resolve(action);
        if engine.state().phase == Phase::EnemyTurn {
            let settled = engine.resolve(Action::Proceed);
            outcome.transitions.extend(settled.transitions);
        }

        let id = self.history.commit(&self.state)?;
        self.events.publish(Event::History(HistoryEvent::Committed {
            id,
            branch: self.history.current_branch().to_owned(),
        }));
        self.persist();
        Ok(outcome)
    }

    /// Creates branch `name` at commit `from` without switching to it.
    pub fn create_branch(&mut self, name: &str, from: &CommitId) -> Result<()> {
        self.history.create_branch(name, from)?;
        self.events.publish(Event::History(HistoryEvent::BranchCreated {
            name: name.to_owned(),
            from: from.clone(),
        }));
        self.persist();
        Ok(())
    }

    /// Switches to branch `name`; the live state becomes a copy of its head.
    pub fn checkout(&mut self, name: &str) -> Result<()> {
        let state = self.history.checkout(name)?.clone();
        self.state = state;
        if let Some(head) = self.history.head().cloned() {
            self.events.publish(Event::History(HistoryEvent::CheckedOut {
                branch: name.to_owned(),
                head,
            }));
        }
        self.persist();
        Ok(())
    }

    pub fn current_branch(&self) -> &str {
        self.history.current_branch()
    }

    /// Head commit of the active branch.
    pub fn head(&self) -> Option<&CommitId> {
        self.history.head()
    }

    /// Read-only view of the live world, for rendering.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn content(&self) -> &dyn ContentOracle {
        self.content.as_ref()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Waits until every save handed out so far has been written.
    pub async fn flush(&self) -> Result<()> {
        match &self.persistence {
            Some(persistence) => persistence.handle.flush().await,
            None => Ok(()),
        }
    }

    /// Writes pending saves and stops the persistence worker.
    pub async fn shutdown(self) -> Result<()> {
        if let Some(persistence) = self.persistence {
            persistence.handle.shutdown().await?;
            if let Err(e) = persistence.task.await {
                tracing::error!("PersistenceWorker panicked: {}", e);
            }
        }
        Ok(())
    }

    /// Hands the worker a document of the whole history. Snapshots are
    /// shared with the history; encoding happens on the worker.
    fn persist(&self) {
        let Some(persistence) = &self.persistence else {
            return;
        };
        if !persistence.handle.save(self.history.to_document()) {
            self.events
                .publish(Event::Persistence(PersistenceEvent::SaveDropped));
        }
    }
}
