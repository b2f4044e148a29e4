//! Application wiring: configuration → directory, session and console.

pub mod command;
pub mod context;

pub use command::{Cli, Command, UsersAction, run};
pub use context::AppContext;
