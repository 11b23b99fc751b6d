//! Command dispatch: bridges CLI args -> bridge calls -> output formatting.

pub mod actions;
pub mod callbacks;
pub mod devices;
pub mod run;

use nukilatch_core::LockAction;

use crate::cli::{Command, GlobalOpts};
use crate::config::Loaded;
use crate::error::CliError;

/// Dispatch a bridge-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, loaded: &Loaded, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Run => run::handle(loaded).await,
        Command::Devices => devices::handle(loaded, global).await,
        Command::Callbacks => callbacks::list(loaded, global).await,
        Command::Register(args) => callbacks::register(loaded, args, global).await,
        Command::Lock => actions::handle(loaded, LockAction::Lock, global).await,
        Command::Unlock => actions::handle(loaded, LockAction::Unlock, global).await,
        Command::Unlatch => actions::handle(loaded, LockAction::Unlatch, global).await,
        // Completions are handled before dispatch
        Command::Completions(_) => Ok(()),
    }
}
