//! Standard parameters of the cell model expressed as symbolic expressions
/// geometric parameters (electrode and separator lengths) and current scaling
pub mod standard_parameters;
/// named current profiles I(t) to be bound to the "current function" parameter
pub mod standard_current_functions;
