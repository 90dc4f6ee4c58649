//! examples of usage of RustedParams
/// parameter substitution and evaluation examples
pub mod parameter_examples;
