//! Operator commands and their one-at-a-time submission.

mod dispatcher;
mod panel;
mod types;

pub use dispatcher::{CommandDispatcher, CommandSink, DispatchError, DispatchState};
pub use panel::ControlPanel;
pub use types::{AcceptedCommand, Command, CommandKind, CommandParams};
