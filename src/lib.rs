pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{CliArgs, Command};
pub use config::FacadeConfig;

pub use adapters::{HttpTransport, ScriptedInteraction, TerminalInteraction};
pub use crate::core::{
    callbacks::Callbacks, facade::ModelFacade, handlers::DriverHandlers,
    listeners::ListenerRegistry,
};
pub use domain::model::{Connection, Dispatch, NotifySummary};
pub use domain::ports::{Interaction, ModelListener};
pub use utils::error::{FacadeError, Result};
