// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
pub mod Examples;
pub mod Utils;
pub mod parameters;
pub mod symbolic;

pub use symbolic::parameter_table::{Binding, ParameterTable};
pub use symbolic::symbolic_engine::{Expr, NativeFunction};
pub use symbolic::symbolic_errors::SymbolicError;
pub use symbolic::symbolic_evaluation::{EvaluationBinding, Value};
pub use symbolic::symbolic_identity::Identity;
pub use symbolic::symbolic_substitution::{ParameterProcessor, substitute};
