//! different utility modules used throughout the project
/// processing options and parameter values from TOML documents
pub mod config;
/// logging setup (terminal and file)
pub mod logger;
