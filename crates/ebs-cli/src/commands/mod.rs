pub mod calendar;
pub mod config;
pub mod guess;

use std::path::PathBuf;

use ebs_core::{Config, Result};

/// Options shared by every command.
pub struct Context {
    pub dir: PathBuf,
    pub config_path: Option<PathBuf>,
}

impl Context {
    pub fn config_path(&self) -> Result<PathBuf> {
        match &self.config_path {
            Some(path) => Ok(path.clone()),
            None => Config::path(),
        }
    }

    pub fn load_config(&self) -> Result<Config> {
        Config::load_from(&self.config_path()?)
    }
}
