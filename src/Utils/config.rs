//! TOML configuration: processing options and parameter values in one document
//!
//! ```toml
//! [processing]
//! fold_constants = false
//! loglevel = "info"
//!
//! [parameters]
//! Ln = 0.05
//! Ls = 0.02
//! Lp = 0.21
//! "current function" = "sinusoidal_current"
//! ```
//! Numbers become constant bindings; strings name a standard current function or an
//! elementary function (exp, ln, sin, ...).
use std::fs;
use std::path::Path;

use log::info;

use crate::Utils::logger::{init_logger, level_filter};
use crate::parameters::standard_current_functions;
use crate::symbolic::parameter_table::{Binding, ParameterTable};
use crate::symbolic::symbolic_errors::SymbolicError;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProcessingConfig {
    /// fold constant subtrees during substitution
    pub fold_constants: bool,
    /// "debug", "info", "warn", "error", "off" or "none"
    pub loglevel: Option<String>,
}

impl ProcessingConfig {
    /// Reads the `[processing]` section; a missing section or key keeps the default.
    pub fn from_toml_str(document: &str) -> Result<ProcessingConfig, SymbolicError> {
        let table: toml::Table = document.parse()?;
        ProcessingConfig::from_toml_table(&table)
    }

    /// Starts logging at the configured loglevel (Info when none is set).
    pub fn start_logger(&self, log_to_file: bool) -> Result<(), SymbolicError> {
        init_logger(self.loglevel.as_deref(), log_to_file)
    }

    fn from_toml_table(table: &toml::Table) -> Result<ProcessingConfig, SymbolicError> {
        let mut config = ProcessingConfig::default();
        let Some(section) = table.get("processing") else {
            return Ok(config);
        };
        let section = section.as_table().ok_or_else(|| SymbolicError::InvalidConfig {
            reason: "[processing] must be a table".to_string(),
        })?;
        for (key, value) in section.iter() {
            match key.as_str() {
                "fold_constants" => {
                    config.fold_constants =
                        value.as_bool().ok_or_else(|| SymbolicError::InvalidConfig {
                            reason: format!("fold_constants must be a boolean, got {}", value),
                        })?;
                }
                "loglevel" => {
                    let level = value.as_str().ok_or_else(|| SymbolicError::InvalidConfig {
                        reason: format!("loglevel must be a string, got {}", value),
                    })?;
                    level_filter(Some(level))?;
                    config.loglevel = Some(level.to_string());
                }
                other => {
                    return Err(SymbolicError::InvalidConfig {
                        reason: format!("unknown processing option '{}'", other),
                    });
                }
            }
        }
        Ok(config)
    }
}

/// Reads the `[parameters]` section into a table; a missing section gives an empty table.
pub fn parameters_from_toml_str(document: &str) -> Result<ParameterTable, SymbolicError> {
    let table: toml::Table = document.parse()?;
    parameters_from_toml_table(&table, "toml")
}

fn parameters_from_toml_table(
    table: &toml::Table,
    source_name: &str,
) -> Result<ParameterTable, SymbolicError> {
    let mut parameters = ParameterTable::new();
    let Some(section) = table.get("parameters") else {
        return Ok(parameters);
    };
    let invalid = |reason: String| SymbolicError::InvalidParameterFile {
        source_name: source_name.to_string(),
        reason,
    };
    let section = section
        .as_table()
        .ok_or_else(|| invalid("[parameters] must be a table".to_string()))?;
    for (name, value) in section.iter() {
        let binding = match value {
            toml::Value::Float(val) => Binding::Constant(*val),
            toml::Value::Integer(val) => Binding::Constant(*val as f64),
            toml::Value::String(function_name) => standard_current_functions::by_name(function_name)
                .map(Binding::Function)
                .ok_or_else(|| {
                    invalid(format!("unknown function '{}' for parameter '{}'", function_name, name))
                })?,
            other => {
                return Err(invalid(format!(
                    "parameter '{}' must be a number or a function name, got {}",
                    name, other
                )));
            }
        };
        parameters.insert(name.as_str(), binding)?;
    }
    Ok(parameters)
}

/// Loads both sections of a TOML file.
pub fn load_toml_file<P: AsRef<Path>>(
    path: P,
) -> Result<(ProcessingConfig, ParameterTable), SymbolicError> {
    let path = path.as_ref();
    let document = fs::read_to_string(path)?;
    let table: toml::Table = document.parse()?;
    let config = ProcessingConfig::from_toml_table(&table)?;
    let parameters = parameters_from_toml_table(&table, &path.display().to_string())?;
    info!(
        "loaded {} parameters from {}, fold_constants = {}",
        parameters.len(),
        path.display(),
        config.fold_constants
    );
    Ok((config, parameters))
}
