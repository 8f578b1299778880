use std::fs::{self, File};

use anyhow::{Error, Result};
use serde::Deserialize;

use self::{codec::CodecConfig, log::LogConfig};

pub mod codec;
pub mod log;

pub const CONFIG_PATH_ENV: &str = "SJ_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "sqljson.yml";

#[derive(Deserialize, Default, Debug)]
pub struct Config {
    #[serde(default)]
    log: LogConfig,
    #[serde(default)]
    codec: CodecConfig,
}

impl Config {
    pub fn log(&self) -> &LogConfig {
        &self.log
    }

    pub fn codec(&self) -> &CodecConfig {
        &self.codec
    }
}

/// Path from `SJ_CONFIG_PATH`, or `sqljson.yml` in the working directory.
pub fn config_path() -> Result<String> {
    let config_path = match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) => path,
        Err(_) => DEFAULT_CONFIG_PATH.to_owned(),
    };

    if fs::metadata(&config_path).is_err() {
        return Err(Error::msg(format!(
            "{config_path} file specified in {CONFIG_PATH_ENV} environment variable or current directory must exist"
        )));
    }

    Ok(config_path)
}

pub fn from_path(path: &str) -> Result<Config> {
    let file = File::open(path)
        .map_err(|err| Error::msg(format!("Failed to open config file '{path}': {err}")))?;
    serde_yaml::from_reader::<_, Config>(file)
        .map_err(|err| Error::msg(format!("Failed to parse config file '{path}': {err}")))
}

pub fn from_yaml(yaml: &str) -> Result<Config> {
    Ok(serde_yaml::from_str::<Config>(yaml)?)
}
