//! Terminal front end for the strictly_millionaire quiz engine.
//!
//! The [`driver`] owns a [`GameSession`](strictly_millionaire::GameSession)
//! inside a tokio task, the [`scheduler`] runs its countdown and settle
//! delay as cancelable tasks, and [`tui`] renders snapshots with ratatui.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod driver;
pub mod scheduler;
pub mod tui;

pub use cli::{Cli, Command as CliCommand};
pub use config::{AppConfig, ConfigError};
pub use driver::{Command, Driver, DriverEvent, DriverHandle};
pub use scheduler::{Scheduler, TICK_PERIOD, Timer};
