use log::{info, warn};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

use super::types::{AcceptedCommand, Command, CommandKind, CommandParams};
use crate::backend::ClientError;

/// Anything that can submit one command to the backend.
pub trait CommandSink: Send + Sync + 'static {
    fn submit(
        &self,
        command: &Command,
    ) -> impl Future<Output = Result<AcceptedCommand, ClientError>> + Send;
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("a command is already in flight")]
    InFlight,
    #[error("command failed: {0}")]
    Client(#[from] ClientError),
}

/// Whether a command submission is outstanding. Clones share the flag.
#[derive(Debug, Clone, Default)]
pub struct DispatchState {
    in_flight: Arc<AtomicBool>,
}

impl DispatchState {
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn try_acquire(&self) -> Option<InFlightGuard> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard {
                in_flight: self.in_flight.clone(),
            })
    }
}

/// Clears the in-flight flag when dropped, on every exit path.
struct InFlightGuard {
    in_flight: Arc<AtomicBool>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

/// Submits operator commands one at a time.
pub struct CommandDispatcher<C: CommandSink> {
    sink: C,
    state: DispatchState,
}

impl<C: CommandSink> CommandDispatcher<C> {
    pub fn new(sink: C) -> Self {
        Self {
            sink,
            state: DispatchState::default(),
        }
    }

    pub fn state(&self) -> &DispatchState {
        &self.state
    }

    pub fn is_in_flight(&self) -> bool {
        self.state.is_in_flight()
    }

    pub async fn dispatch(
        &self,
        kind: CommandKind,
        parameters: CommandParams,
    ) -> Result<AcceptedCommand, DispatchError> {
        self.submit(Command::new(kind, parameters)).await
    }

    /// Submits `command` unless another one is in flight.
    pub async fn submit(&self, command: Command) -> Result<AcceptedCommand, DispatchError> {
        let Some(_guard) = self.state.try_acquire() else {
            warn!("Rejecting {}: another command is in flight", command.command);
            return Err(DispatchError::InFlight);
        };

        for advisory in command.advisories() {
            warn!("Command {}: {}", command.command, advisory);
        }

        info!("Dispatching {}", command.command);
        match self.sink.submit(&command).await {
            Ok(accepted) => {
                info!("Command {} accepted as #{}", accepted.command, accepted.id);
                Ok(accepted)
            }
            Err(e) => {
                warn!("Command {} failed: {}", command.command, e);
                Err(e.into())
            }
        }
    }
}
