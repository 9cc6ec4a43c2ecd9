#![allow(clippy::uninlined_format_args)]

pub mod app;
pub mod config;
pub mod embed;
pub mod facts;
pub mod fetch;
pub mod gallery;
pub mod logging;
pub mod modal;
pub mod normalize;
pub mod page;
pub mod record;
pub mod server;
pub mod source;
pub mod surface;
pub mod ui;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use app::{run, RunOptions};
