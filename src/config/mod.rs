pub mod cli;
pub mod toml_config;

use crate::core::registry::DEFAULT_MAX_BOATS;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::path::{Path, PathBuf};
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use clap::Parser;

/// 單一登錄可容納的船數上限
pub const MAX_ALLOWED_BOATS: usize = 100_000;

pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "marina")]
#[command(about = "Keep track of the boats in a marina: slips, land bays, trailers and storage")]
pub struct CliConfig {
    /// Boat data file, one `name,length,kind,detail,owed` record per line
    pub data_file: PathBuf,

    #[arg(long, help = "Maximum number of boats the registry holds [default: 120]")]
    pub max_boats: Option<usize>,

    #[arg(long, help = "Optional TOML settings file")]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Reads the optional settings file and merges it under the command-line flags.
    pub fn into_settings(self) -> Result<Settings> {
        let file = match &self.config {
            Some(path) => Some(TomlConfig::from_file(path)?),
            None => None,
        };
        Ok(Settings::resolve(
            self.data_file,
            self.max_boats,
            file.as_ref(),
            self.verbose,
        ))
    }
}

/// Effective settings after merging flags, settings file and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_file: PathBuf,
    pub max_boats: usize,
    pub log_level: Option<String>,
    pub verbose: bool,
}

impl Settings {
    /// 優先順序：命令列 > 設定檔 > 預設值
    pub fn resolve(
        data_file: PathBuf,
        max_boats: Option<usize>,
        file: Option<&TomlConfig>,
        verbose: bool,
    ) -> Self {
        let max_boats = max_boats
            .or_else(|| file.and_then(TomlConfig::max_boats))
            .unwrap_or(DEFAULT_MAX_BOATS);
        let log_level = file.and_then(|f| f.log_level()).map(str::to_string);

        Self {
            data_file,
            max_boats,
            log_level,
            verbose,
        }
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_path("data_file", &self.data_file.to_string_lossy())?;
        validation::validate_range("max_boats", self.max_boats, 1, MAX_ALLOWED_BOATS)?;
        if let Some(level) = &self.log_level {
            validation::validate_one_of("logging.level", level, &LOG_LEVELS)?;
        }
        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn data_file(&self) -> &Path {
        &self.data_file
    }

    fn max_boats(&self) -> usize {
        self.max_boats
    }
}
