pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::TomlConfig, Settings};
pub use crate::core::{
    dispatcher::Dispatcher,
    registry::{LoadReport, Registry},
};
pub use domain::model::{Boat, Location, LocationKind, Money};
pub use utils::error::{DecodeError, MarinaError, Result};
