//! Parameter tables: the values (or functions of time) that parameters are replaced with.
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use itertools::Itertools;
use log::{debug, info};

use crate::parameters::standard_current_functions::constant_current;
use crate::symbolic::symbolic_engine::NativeFunction;
use crate::symbolic::symbolic_errors::SymbolicError;

/// name of the typical current parameter in the default table
pub const TYPICAL_CURRENT: &str = "I_typ";
/// name of the current function parameter in the default table
pub const CURRENT_FUNCTION: &str = "current function";

/// What a parameter name is bound to
#[derive(Clone, Debug)]
pub enum Binding {
    Constant(f64),
    /// unary function of the independent variable
    Function(NativeFunction),
}

impl Binding {
    pub fn function<F>(name: &str, func: F) -> Binding
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Binding::Function(NativeFunction::new(name, func))
    }

    pub fn as_constant(&self) -> Option<f64> {
        match self {
            Binding::Constant(val) => Some(*val),
            Binding::Function(_) => None,
        }
    }
}

impl From<f64> for Binding {
    fn from(value: f64) -> Self {
        Binding::Constant(value)
    }
}

impl From<NativeFunction> for Binding {
    fn from(func: NativeFunction) -> Self {
        Binding::Function(func)
    }
}

/// Mapping from parameter name to its binding. Names are unique.
#[derive(Clone, Debug, Default)]
pub struct ParameterTable {
    entries: HashMap<String, Binding>,
}

impl ParameterTable {
    pub fn new() -> ParameterTable {
        ParameterTable::default()
    }

    /// Builds a table from (name, binding) pairs; a repeated name is an error, not an overwrite.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let table = ParameterTable::from_entries([("Ln", 0.05), ("Ls", 0.02), ("Lp", 0.21)])?;
    /// ```
    pub fn from_entries<I, S, B>(entries: I) -> Result<ParameterTable, SymbolicError>
    where
        I: IntoIterator<Item = (S, B)>,
        S: Into<String>,
        B: Into<Binding>,
    {
        let mut table = ParameterTable::new();
        for (name, binding) in entries {
            table.insert(name, binding)?;
        }
        Ok(table)
    }

    /// Default parameter set: typical current of 1 and the constant current function.
    pub fn with_defaults() -> ParameterTable {
        let mut entries = HashMap::new();
        entries.insert(TYPICAL_CURRENT.to_string(), Binding::Constant(1.0));
        entries.insert(
            CURRENT_FUNCTION.to_string(),
            Binding::Function(constant_current()),
        );
        ParameterTable { entries }
    }

    /// Adds a new binding; fails with `DuplicateParameterName` if the name is already bound.
    pub fn insert<S, B>(&mut self, name: S, binding: B) -> Result<(), SymbolicError>
    where
        S: Into<String>,
        B: Into<Binding>,
    {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(SymbolicError::DuplicateParameterName { name });
        }
        self.entries.insert(name, binding.into());
        Ok(())
    }

    /// Overwrites (or adds) a binding, returning the previous one.
    pub fn update<S, B>(&mut self, name: S, binding: B) -> Option<Binding>
    where
        S: Into<String>,
        B: Into<Binding>,
    {
        self.entries.insert(name.into(), binding.into())
    }

    /// Overwrites bindings with all entries of `other`
    pub fn update_from(&mut self, other: &ParameterTable) {
        for (name, binding) in other.entries.iter() {
            self.entries.insert(name.clone(), binding.clone());
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.entries.get(name)
    }

    pub fn get_constant(&self, name: &str) -> Option<f64> {
        self.lookup(name).and_then(|binding| binding.as_constant())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Binding> {
        self.entries.remove(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().sorted().collect()
    }

    /// Reads rows `name,value` (with a header row); lines starting with '#' are skipped.
    /// `source_name` only labels error messages.
    pub fn from_csv_reader<R: Read>(
        reader: R,
        source_name: &str,
    ) -> Result<ParameterTable, SymbolicError> {
        let mut rdr = csv::ReaderBuilder::new()
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);
        let headers = rdr.headers()?;
        if headers.len() != 2 || &headers[0] != "name" || &headers[1] != "value" {
            return Err(SymbolicError::InvalidParameterFile {
                source_name: source_name.to_string(),
                reason: "line 1: expected header name,value".to_string(),
            });
        }
        let mut table = ParameterTable::new();
        for record in rdr.records() {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let invalid = |reason: String| SymbolicError::InvalidParameterFile {
                source_name: source_name.to_string(),
                reason: format!("line {}: {}", line, reason),
            };
            if record.len() != 2 {
                return Err(invalid(format!(
                    "expected 2 fields (name,value), found {}",
                    record.len()
                )));
            }
            let name = &record[0];
            if name.is_empty() {
                return Err(invalid("empty parameter name".to_string()));
            }
            let value: f64 = record[1]
                .parse()
                .map_err(|_| invalid(format!("'{}' is not a number", &record[1])))?;
            debug!("{}: {} = {}", source_name, name, value);
            table.insert(name, value)?;
        }
        info!(
            "loaded {} parameters from {}",
            table.len(),
            source_name
        );
        Ok(table)
    }

    pub fn from_csv_file<P: AsRef<Path>>(path: P) -> Result<ParameterTable, SymbolicError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        ParameterTable::from_csv_reader(file, &path.display().to_string())
    }
}

impl fmt::Display for ParameterTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for name in self.names() {
            match &self.entries[&name] {
                Binding::Constant(val) => writeln!(f, "{} = {}", name, val)?,
                Binding::Function(func) => writeln!(f, "{} = {}(t)", name, func.name())?,
            }
        }
        Ok(())
    }
}
