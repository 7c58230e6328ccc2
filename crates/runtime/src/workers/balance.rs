//! Balance worker: queues simulation jobs and answers over oneshot replies.

use std::sync::Arc;

use game_content::ContentBundle;
use game_core::{BugType, CharacterClass};
use simulation::{Harness, Matchup, MatchupResult, SimConfig, SimulationReport};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{Result, RuntimeError};

const COMMAND_BUFFER: usize = 16;

/// Jobs the worker accepts.
pub enum BalanceCommand {
    Matchup {
        matchup: Matchup,
        reply: oneshot::Sender<Result<MatchupResult>>,
    },
    FullSuite {
        level: u32,
        severity: u8,
        complexity: u32,
        reply: oneshot::Sender<Result<SimulationReport>>,
    },
    Progression {
        class: CharacterClass,
        bug_type: BugType,
        levels: Vec<u32>,
        severities: Vec<u8>,
        reply: oneshot::Sender<Result<Vec<MatchupResult>>>,
    },
}

impl BalanceCommand {
    fn name(&self) -> &'static str {
        match self {
            Self::Matchup { .. } => "matchup",
            Self::FullSuite { .. } => "full-suite",
            Self::Progression { .. } => "progression",
        }
    }
}

/// Owns the content and config; processes one job at a time.
pub struct BalanceWorker {
    content: Arc<ContentBundle>,
    config: SimConfig,
    command_rx: mpsc::Receiver<BalanceCommand>,
}

impl BalanceWorker {
    /// Validates `config` up front and spawns the worker loop.
    pub fn spawn(content: Arc<ContentBundle>, config: SimConfig) -> Result<(BalanceWorkerHandle, JoinHandle<()>)> {
        config.validate()?;
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let worker = Self {
            content,
            config,
            command_rx,
        };
        let join = tokio::spawn(worker.run());
        Ok((BalanceWorkerHandle { command_tx }, join))
    }

    async fn run(mut self) {
        info!(trials = self.config.trials, "balance worker started");
        while let Some(cmd) = self.command_rx.recv().await {
            let name = cmd.name();
            debug!(command = name, "balance job received");
            self.handle_command(cmd).await;
        }
        info!("balance worker stopped");
    }

    async fn handle_command(&self, cmd: BalanceCommand) {
        match cmd {
            BalanceCommand::Matchup { matchup, reply } => {
                let result = self
                    .blocking(move |harness| harness.simulate_matchup(matchup))
                    .await;
                if reply.send(result).is_err() {
                    debug!("Matchup reply channel closed (caller dropped)");
                }
            }
            BalanceCommand::FullSuite {
                level,
                severity,
                complexity,
                reply,
            } => {
                let result = self
                    .blocking(move |harness| harness.run_full_simulation(level, severity, complexity))
                    .await;
                if reply.send(result).is_err() {
                    debug!("FullSuite reply channel closed (caller dropped)");
                }
            }
            BalanceCommand::Progression {
                class,
                bug_type,
                levels,
                severities,
                reply,
            } => {
                let result = self
                    .blocking(move |harness| {
                        harness.run_progression_simulation(class, bug_type, &levels, &severities)
                    })
                    .await;
                if reply.send(result).is_err() {
                    debug!("Progression reply channel closed (caller dropped)");
                }
            }
        }
    }

    async fn blocking<T, F>(&self, job: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Harness<'_>) -> simulation::Result<T> + Send + 'static,
    {
        let content = Arc::clone(&self.content);
        let config = self.config.clone();
        let joined = tokio::task::spawn_blocking(move || {
            let harness = Harness::new(&content, config)?;
            job(&harness)
        })
        .await;

        match joined {
            Ok(result) => result.map_err(RuntimeError::from),
            Err(err) => {
                warn!(%err, "balance job panicked or was cancelled");
                Err(RuntimeError::WorkerJoin(err))
            }
        }
    }
}

/// Cloneable client for a running [`BalanceWorker`].
#[derive(Clone, Debug)]
pub struct BalanceWorkerHandle {
    command_tx: mpsc::Sender<BalanceCommand>,
}

impl BalanceWorkerHandle {
    pub async fn simulate_matchup(&self, matchup: Matchup) -> Result<MatchupResult> {
        let (reply, reply_rx) = oneshot::channel();
        self.send(BalanceCommand::Matchup { matchup, reply }).await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    pub async fn run_full_suite(&self, level: u32, severity: u8, complexity: u32) -> Result<SimulationReport> {
        let (reply, reply_rx) = oneshot::channel();
        self.send(BalanceCommand::FullSuite {
            level,
            severity,
            complexity,
            reply,
        })
        .await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    pub async fn run_progression(
        &self,
        class: CharacterClass,
        bug_type: BugType,
        levels: Vec<u32>,
        severities: Vec<u8>,
    ) -> Result<Vec<MatchupResult>> {
        let (reply, reply_rx) = oneshot::channel();
        self.send(BalanceCommand::Progression {
            class,
            bug_type,
            levels,
            severities,
            reply,
        })
        .await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    async fn send(&self, cmd: BalanceCommand) -> Result<()> {
        self.command_tx
            .send(cmd)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }
}
