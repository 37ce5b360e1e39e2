//! Session Actor
//!
//! Owns a `GameSession` inside a tokio task. Handles send commands over an
//! mpsc queue and await replies on oneshot channels.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::core::rng::DrawSource;
use crate::game::events::GameEvent;
use crate::game::material::{MaskPosition, Token};
use crate::game::session::{Advance, GameError, GameSession, SessionView};

/// Command queue depth.
const COMMAND_QUEUE_SIZE: usize = 64;

/// Service errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The session rejected the operation.
    #[error("Game error: {0}")]
    Game(#[from] GameError),

    /// The session task has stopped.
    #[error("Session closed")]
    Closed,
}

/// Commands processed by the session task.
#[derive(Debug)]
enum Command {
    Start {
        reply: oneshot::Sender<Advance>,
    },
    Draw {
        reply: oneshot::Sender<Result<Token, GameError>>,
    },
    Place {
        position: MaskPosition,
        reply: oneshot::Sender<Result<Advance, GameError>>,
    },
    CacheCurrent {
        reply: oneshot::Sender<Result<Advance, GameError>>,
    },
    Discard {
        reply: oneshot::Sender<Result<Advance, GameError>>,
    },
    Retrieve {
        token: Token,
        reply: oneshot::Sender<Result<(), GameError>>,
    },
    Lift {
        position: MaskPosition,
        reply: oneshot::Sender<Result<Token, GameError>>,
    },
    Submit {
        reply: oneshot::Sender<Result<(), GameError>>,
    },
    SetCacheSize {
        size: usize,
        reply: oneshot::Sender<Vec<Token>>,
    },
    View {
        reply: oneshot::Sender<SessionView>,
    },
    TakeEvents {
        reply: oneshot::Sender<Vec<GameEvent>>,
    },
}

/// Cloneable handle to a session task.
///
/// The task stops once every handle is dropped.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    sender: mpsc::Sender<Command>,
}

impl SessionHandle {
    /// Move a session into a new task and return its handle.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<R>(session: GameSession<R>) -> Self
    where
        R: DrawSource + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel(COMMAND_QUEUE_SIZE);
        tokio::spawn(run(session, receiver));
        Self { sender }
    }

    /// Deal a fresh game.
    pub async fn start_game(&self) -> Result<Advance, ServiceError> {
        self.request(|reply| Command::Start { reply }).await
    }

    /// Deal a fresh game (alias of `start_game`).
    pub async fn reset(&self) -> Result<Advance, ServiceError> {
        self.start_game().await
    }

    /// Draw into the empty hand.
    pub async fn draw(&self) -> Result<Token, ServiceError> {
        Ok(self.request(|reply| Command::Draw { reply }).await??)
    }

    /// Place the in-hand token, then advance.
    pub async fn place(&self, position: MaskPosition) -> Result<Advance, ServiceError> {
        Ok(self.request(|reply| Command::Place { position, reply }).await??)
    }

    /// Cache the in-hand token, then advance.
    pub async fn cache_current(&self) -> Result<Advance, ServiceError> {
        Ok(self.request(|reply| Command::CacheCurrent { reply }).await??)
    }

    /// Discard the in-hand token, then advance.
    pub async fn discard(&self) -> Result<Advance, ServiceError> {
        Ok(self.request(|reply| Command::Discard { reply }).await??)
    }

    /// Move a cached token into the empty hand.
    pub async fn retrieve(&self, token: Token) -> Result<(), ServiceError> {
        Ok(self.request(|reply| Command::Retrieve { token, reply }).await??)
    }

    /// Take a placed token back into the empty hand.
    pub async fn lift(&self, position: MaskPosition) -> Result<Token, ServiceError> {
        Ok(self.request(|reply| Command::Lift { position, reply }).await??)
    }

    /// Submit the mask.
    pub async fn submit(&self) -> Result<(), ServiceError> {
        Ok(self.request(|reply| Command::Submit { reply }).await??)
    }

    /// Resize the cache; returns discarded evictions.
    pub async fn set_cache_size(&self, size: usize) -> Result<Vec<Token>, ServiceError> {
        self.request(|reply| Command::SetCacheSize { size, reply }).await
    }

    /// Current session picture.
    pub async fn view(&self) -> Result<SessionView, ServiceError> {
        self.request(|reply| Command::View { reply }).await
    }

    /// Drain pending events.
    pub async fn take_events(&self) -> Result<Vec<GameEvent>, ServiceError> {
        self.request(|reply| Command::TakeEvents { reply }).await
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, ServiceError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(make(reply))
            .await
            .map_err(|_| ServiceError::Closed)?;
        response.await.map_err(|_| ServiceError::Closed)
    }
}

/// Apply commands one at a time until every handle is gone.
async fn run<R: DrawSource>(mut session: GameSession<R>, mut receiver: mpsc::Receiver<Command>) {
    info!(seed = session.seed(), "session task started");

    while let Some(command) = receiver.recv().await {
        debug!(?command, "command");
        // A dropped reply receiver only means the caller stopped waiting
        match command {
            Command::Start { reply } => {
                let _ = reply.send(session.start_game());
            }
            Command::Draw { reply } => {
                let _ = reply.send(session.draw());
            }
            Command::Place { position, reply } => {
                let _ = reply.send(session.place(position));
            }
            Command::CacheCurrent { reply } => {
                let _ = reply.send(session.cache_current());
            }
            Command::Discard { reply } => {
                let _ = reply.send(session.discard());
            }
            Command::Retrieve { token, reply } => {
                let _ = reply.send(session.retrieve(token));
            }
            Command::Lift { position, reply } => {
                let _ = reply.send(session.lift(position));
            }
            Command::Submit { reply } => {
                let _ = reply.send(session.submit());
            }
            Command::SetCacheSize { size, reply } => {
                let _ = reply.send(session.set_cache_size(size));
            }
            Command::View { reply } => {
                let _ = reply.send(session.view());
            }
            Command::TakeEvents { reply } => {
                let _ = reply.send(session.take_events());
            }
        }
    }

    info!(actions = session.actions(), "session task stopped");
}
