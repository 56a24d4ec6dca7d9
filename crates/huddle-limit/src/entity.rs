//! Limiter actor: one task owning every per-address record.
//!
//! The limiter is a singleton entity, so a single task serializes all
//! check/reset traffic; records for different addresses still live
//! under separate storage keys (`rate:{addr}`).

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use huddle_protocol::RateDecision;
use huddle_store::{Clock, Storage};

use crate::entry::{evaluate, Outcome};
use crate::{LimitConfig, LimitError, RateEntry};

fn storage_key(addr: &str) -> String {
    format!("rate:{addr}")
}

enum LimiterCommand {
    Check {
        addr: String,
        reply: oneshot::Sender<Result<RateDecision, LimitError>>,
    },
    Reset {
        addr: String,
        reply: oneshot::Sender<Result<(), LimitError>>,
    },
}

/// Handle to the running limiter actor. Cheap to clone.
#[derive(Clone)]
pub struct RateLimiterHandle {
    sender: mpsc::Sender<LimiterCommand>,
}

impl RateLimiterHandle {
    /// Accounts one room-creation attempt from `addr`.
    ///
    /// Returns whether it is allowed and, if not, how many whole
    /// seconds to wait. A denied attempt does not advance the
    /// address's state.
    pub async fn check(&self, addr: &str) -> Result<RateDecision, LimitError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(LimiterCommand::Check { addr: addr.to_string(), reply: reply_tx })
            .await
            .map_err(|_| LimitError::Unavailable)?;
        reply_rx.await.map_err(|_| LimitError::Unavailable)?
    }

    /// Deletes `addr`'s record, returning it to first-use state.
    pub async fn reset(&self, addr: &str) -> Result<(), LimitError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(LimiterCommand::Reset { addr: addr.to_string(), reply: reply_tx })
            .await
            .map_err(|_| LimitError::Unavailable)?;
        reply_rx.await.map_err(|_| LimitError::Unavailable)?
    }
}

struct RateLimiterEntity {
    config: LimitConfig,
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    receiver: mpsc::Receiver<LimiterCommand>,
}

impl RateLimiterEntity {
    async fn run(mut self) {
        tracing::debug!("rate limiter actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                LimiterCommand::Check { addr, reply } => {
                    let _ = reply.send(self.handle_check(&addr));
                }
                LimiterCommand::Reset { addr, reply } => {
                    let _ = reply.send(self.handle_reset(&addr));
                }
            }
        }

        tracing::debug!("rate limiter actor stopped");
    }

    fn load(&self, addr: &str) -> Result<Option<RateEntry>, LimitError> {
        let Some(bytes) = self.storage.get(&storage_key(addr))? else {
            return Ok(None);
        };
        match serde_json::from_slice(&bytes) {
            Ok(entry) => Ok(Some(entry)),
            Err(e) => {
                // A corrupt entry must not lock an address out forever;
                // treat it as absent and let the next write replace it.
                tracing::warn!(%addr, error = %e, "corrupt rate entry, treating as absent");
                Ok(None)
            }
        }
    }

    fn handle_check(&self, addr: &str) -> Result<RateDecision, LimitError> {
        let entry = self.load(addr)?;
        let now = self.clock.now();

        match evaluate(entry, now, &self.config) {
            Outcome::Allowed(next) => {
                let bytes = serde_json::to_vec(&next).map_err(|e| {
                    huddle_store::StorageError::Corrupt(format!("rate entry encode: {e}"))
                })?;
                self.storage.put(&storage_key(addr), &bytes)?;
                tracing::debug!(%addr, count = next.count, "creation attempt allowed");
                Ok(RateDecision { allowed: true, retry_after: 0 })
            }
            Outcome::Denied { retry_after } => {
                tracing::debug!(%addr, retry_after, "creation attempt denied");
                Ok(RateDecision { allowed: false, retry_after })
            }
        }
    }

    fn handle_reset(&self, addr: &str) -> Result<(), LimitError> {
        self.storage.delete(&storage_key(addr))?;
        tracing::debug!(%addr, "rate entry reset");
        Ok(())
    }
}

/// Spawns the limiter actor and returns a handle to it.
pub fn spawn_limiter(
    config: LimitConfig,
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
) -> RateLimiterHandle {
    let (tx, rx) = mpsc::channel(64);

    let entity = RateLimiterEntity { config, storage, clock, receiver: rx };
    tokio::spawn(entity.run());

    RateLimiterHandle { sender: tx }
}
