pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{cli::FileTokenStore, Settings};

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use core::{client::HttpShortenerClient, form::LinkForm, routes::Routes};
pub use utils::error::{Result, ShortenerError};
