use std::{env, path::PathBuf, str::FromStr};

use anyhow::{anyhow, Result};
use log::LevelFilter;
use log4rs::{
    append::file::FileAppender,
    config::{Appender, Config, Root},
    encode::json::JsonEncoder,
};
use once_cell::sync::OnceCell;

const DEFAULT_LOG_PATH: &str = "kubescope.log";

pub static LOGGER_ENABLED: OnceCell<bool> = OnceCell::new();

#[macro_export]
macro_rules! logger {
    ($level:ident, $($arg:tt)+) => {
        if let Some(true) = $crate::logging::LOGGER_ENABLED.get() {
            ::log::$level!($($arg)+);
        }
    };
}

/// Log level and destination, taken from `RUST_LOG` and `LOG_PATH`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    pub level: LevelFilter,
    pub path: PathBuf,
}

impl LogOptions {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(env::var("RUST_LOG").ok(), env::var("LOG_PATH").ok())
    }

    fn from_vars(level: Option<String>, path: Option<String>) -> Result<Self> {
        let level = match level.as_deref().filter(|l| !l.is_empty()) {
            Some(level) => LevelFilter::from_str(level)
                .map_err(|_| anyhow!("Invalid RUST_LOG level: {}", level))?,
            None => LevelFilter::Info,
        };

        let path = path
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_PATH.to_string());

        Ok(Self {
            level,
            path: path.into(),
        })
    }
}

pub struct Logger;

impl Logger {
    pub fn init() -> Result<()> {
        Self::init_with(LogOptions::from_env()?)
    }

    /// Installs the JSON file appender and turns `logger!` on.
    pub fn init_with(options: LogOptions) -> Result<()> {
        let logfile = FileAppender::builder()
            .append(false)
            .encoder(Box::new(JsonEncoder::new()))
            .build(&options.path)?;

        let config = Config::builder()
            .appender(Appender::builder().build("logfile", Box::new(logfile)))
            .build(Root::builder().appender("logfile").build(options.level))?;

        log4rs::init_config(config)?;

        LOGGER_ENABLED
            .set(true)
            .map_err(|_| anyhow!("logger is already initialized"))?;

        logger!(
            info,
            "{} {} logging to {} at {}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            options.path.display(),
            options.level
        );

        Ok(())
    }
}
