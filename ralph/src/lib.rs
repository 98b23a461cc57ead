#![deny(missing_docs)]
//! The Ralph service: configuration, wiring and entry points.
//!
//! `ralph serve` runs the HTTP control surface over one loop;
//! `ralph cycle` runs a single cycle and prints its report as JSON.

mod app;
mod cli;
mod config;
mod error;

pub use app::{Services, build_notifier, build_store, init_tracing, probe_rpc, run_cycle, serve};
pub use cli::{CliArgs, Command, USAGE, parse_args};
pub use config::{DEFAULT_CONFIG_FILE, RalphConfig, StoreKind, TelegramConfig};
pub use error::RalphError;
