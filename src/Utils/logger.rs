//! logging setup shared by the example runner and library users
use std::fs::File;

use chrono::Local;
use log::info;
use simplelog::*;

use crate::symbolic::symbolic_errors::SymbolicError;

/// Maps a loglevel name to a filter: "debug", "info", "warn", "error", "off"/"none".
/// No loglevel means Info.
pub fn level_filter(loglevel: Option<&str>) -> Result<LevelFilter, SymbolicError> {
    match loglevel {
        None => Ok(LevelFilter::Info),
        Some(level) => match level {
            "debug" => Ok(LevelFilter::Debug),
            "info" => Ok(LevelFilter::Info),
            "warn" => Ok(LevelFilter::Warn),
            "error" => Ok(LevelFilter::Error),
            "off" | "none" => Ok(LevelFilter::Off),
            other => Err(SymbolicError::InvalidConfig {
                reason: format!(
                    "loglevel must be debug, info, warn, error, off or none, got '{}'",
                    other
                ),
            }),
        },
    }
}

/// Installs a terminal logger and, if `log_to_file`, a logger writing to `log_<date>_<time>.txt`.
/// If a logger is already installed the call leaves it in place.
pub fn init_logger(loglevel: Option<&str>, log_to_file: bool) -> Result<(), SymbolicError> {
    let log_option = level_filter(loglevel)?;
    if log_option == LevelFilter::Off {
        return Ok(());
    }
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        log_option,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if log_to_file {
        let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let name = format!("log_{}.txt", date_and_time);
        loggers.push(WriteLogger::new(
            log_option,
            Config::default(),
            File::create(name)?,
        ));
    }
    match CombinedLogger::init(loggers) {
        Ok(()) => info!("logger started with loglevel: {}", log_option),
        Err(_) => info!("logger already installed"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filter() {
        assert_eq!(level_filter(None).unwrap(), LevelFilter::Info);
        assert_eq!(level_filter(Some("warn")).unwrap(), LevelFilter::Warn);
        assert_eq!(level_filter(Some("none")).unwrap(), LevelFilter::Off);
        assert!(matches!(
            level_filter(Some("verbose")),
            Err(SymbolicError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_init_twice() {
        init_logger(Some("error"), false).unwrap();
        init_logger(Some("error"), false).unwrap();
        init_logger(Some("off"), false).unwrap();
    }
}
