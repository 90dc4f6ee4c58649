use std::fmt;

/// Error types of the symbolic parameter engine
#[derive(Debug)]
pub enum SymbolicError {
    /// substitution met a parameter (or function parameter) name absent from the table
    UnboundParameter { name: String },
    /// evaluation met the independent variable but no value was bound to it
    UnboundVariable { name: String },
    /// divisor evaluated to zero; `expression` is the offending division node
    DivisionByZero { expression: String },
    /// the same name was bound twice while building a parameter table
    DuplicateParameterName { name: String },
    /// evaluation met a parameter that was never substituted
    UnprocessedParameter { name: String },
    /// parameter file (csv or toml) could not be interpreted
    InvalidParameterFile { source_name: String, reason: String },
    /// processing options (loglevel, flags) that cannot be interpreted
    InvalidConfig { reason: String },
    Io(std::io::Error),
}

impl fmt::Display for SymbolicError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SymbolicError::UnboundParameter { name } => {
                write!(f, "parameter '{}' not found in the parameter table", name)
            }
            SymbolicError::UnboundVariable { name } => {
                write!(f, "no value bound to the independent variable '{}'", name)
            }
            SymbolicError::DivisionByZero { expression } => {
                write!(f, "division by zero while evaluating {}", expression)
            }
            SymbolicError::DuplicateParameterName { name } => {
                write!(f, "parameter '{}' is bound more than once", name)
            }
            SymbolicError::UnprocessedParameter { name } => write!(
                f,
                "parameter '{}' must be substituted before evaluation",
                name
            ),
            SymbolicError::InvalidParameterFile {
                source_name,
                reason,
            } => write!(f, "invalid parameter file {}: {}", source_name, reason),
            SymbolicError::InvalidConfig { reason } => write!(f, "invalid configuration: {}", reason),
            SymbolicError::Io(err) => write!(f, "i/o error: {}", err),
        }
    }
}

impl std::error::Error for SymbolicError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SymbolicError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SymbolicError {
    fn from(err: std::io::Error) -> Self {
        SymbolicError::Io(err)
    }
}

impl From<csv::Error> for SymbolicError {
    fn from(err: csv::Error) -> Self {
        SymbolicError::InvalidParameterFile {
            source_name: "csv".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for SymbolicError {
    fn from(err: toml::de::Error) -> Self {
        SymbolicError::InvalidParameterFile {
            source_name: "toml".to_string(),
            reason: err.to_string(),
        }
    }
}

impl SymbolicError {
    /// name of the parameter or variable the error is about, if any
    pub fn offending_name(&self) -> Option<&str> {
        match self {
            SymbolicError::UnboundParameter { name }
            | SymbolicError::UnboundVariable { name }
            | SymbolicError::DuplicateParameterName { name }
            | SymbolicError::UnprocessedParameter { name } => Some(name.as_str()),
            _ => None,
        }
    }
}
