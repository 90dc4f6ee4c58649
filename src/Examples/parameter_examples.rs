// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
#![allow(non_snake_case)]

use log::{error, info};
use ndarray::Array1;

use crate::parameters::standard_current_functions::{constant_current, sinusoidal_current};
use crate::parameters::standard_parameters::{
    Ln, Lp, Ls, Lx, default_dimensional_current, dimensional_current, dimensionless_current, ln,
    lp, ls,
};
use crate::symbolic::parameter_table::{Binding, CURRENT_FUNCTION, ParameterTable};
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_errors::SymbolicError;
use crate::symbolic::symbolic_substitution::ParameterProcessor;
use crate::Utils::config::{ProcessingConfig, parameters_from_toml_str};

pub fn parameter_examples(example: usize) {
    let res = match example {
        0 => geometry_example(),
        1 => current_example(),
        2 => toml_example(),
        3 => error_example(),
        _ => {
            error!("no example number {}", example);
            Ok(())
        }
    };
    if let Err(err) = res {
        error!("example {} failed: {}", example, err);
    }
}

fn geometry_example() -> Result<(), SymbolicError> {
    // GEOMETRY: lengths and their fractions of the cell length
    let parameter_values =
        ParameterTable::from_entries([("Ln", 0.05), ("Ls", 0.02), ("Lp", 0.21)])?;
    let mut processor = parameter_values.processor();
    let Ln_eval = processor.process_symbol(&Ln())?;
    let Ls_eval = processor.process_symbol(&Ls())?;
    let Lp_eval = processor.process_symbol(&Lp())?;
    let Lx_eval = processor.process_symbol(&Lx())?;
    let sum = Ln_eval + Ls_eval + Lp_eval;
    info!("Ln + Ls + Lp = {} = {}", sum, sum.evaluate()?);
    info!("Lx = {} = {}", Lx_eval, Lx_eval.evaluate()?);
    info!("same identity: {}", sum.identity() == Lx_eval.identity());
    let fractions = processor.process_symbols(&[ln(), ls(), lp()])?;
    for (name, fraction) in ["ln", "ls", "lp"].iter().zip(fractions.iter()) {
        info!("{} = {}", name, fraction.evaluate()?);
    }
    info!(
        "{} nodes processed, {} found in cache",
        processor.cache_len(),
        processor.cache_hits()
    );
    Ok(())
}

fn current_example() -> Result<(), SymbolicError> {
    // CURRENT: functions of time bound at substitution, time bound at evaluation
    let t = Expr::t();
    let current = dimensional_current(2.0, &constant_current(), &t);
    let dimensionless = dimensionless_current(&constant_current(), &t);
    let parameter_values = ParameterTable::with_defaults();
    let current_eval = parameter_values.process_symbol(&current)?;
    let dimensionless_eval = parameter_values.process_symbol(&dimensionless)?;
    info!("I(3) = {}", current_eval.evaluate_at(3.0)?);
    info!("i(3) = {}", dimensionless_eval.evaluate_at(3.0)?);

    let mut sinusoidal = ParameterTable::with_defaults();
    sinusoidal.update(CURRENT_FUNCTION, Binding::Function(sinusoidal_current()));
    let drive = sinusoidal.process_symbol(&default_dimensional_current(&t))?;
    let times = Array1::linspace(0.0, 1.0, 9);
    info!("{} on {} = {}", drive, times, drive.evaluate_on(&times)?);
    let many = drive.evaluate_many(times.as_slice().unwrap_or(&[]))?;
    info!("parallel evaluation: {:?}", many);
    Ok(())
}

fn toml_example() -> Result<(), SymbolicError> {
    // CONFIGURATION: options and parameters from one TOML document
    let document = r#"
[processing]
fold_constants = true
loglevel = "info"

[parameters]
Ln = 0.05
Ls = 0.02
Lp = 0.21
I_typ = 5
"current function" = "sinusoidal_current"
"#;
    let config = ProcessingConfig::from_toml_str(document)?;
    config.start_logger(false)?;
    let parameter_values = parameters_from_toml_str(document)?;
    info!("parameters:\n{}", parameter_values);
    let mut processor = ParameterProcessor::with_config(&parameter_values, &config);
    let expr = default_dimensional_current(&Expr::t()) / Lx();
    let processed = processor.process_symbol(&expr)?;
    info!("{} -> {}", expr, processed);
    info!("value at t = 0.25: {}", processed.evaluate_at(0.25)?);
    Ok(())
}

fn error_example() -> Result<(), SymbolicError> {
    // ERRORS: each one names the offending parameter or node
    let parameter_values = ParameterTable::from_entries([("Ln", 0.05)])?;
    if let Err(err) = parameter_values.process_symbol(&Lx()) {
        info!("substitution: {}", err);
    }
    if let Err(err) = (Expr::Const(1.0) / Expr::Const(0.0)).evaluate() {
        info!("evaluation: {}", err);
    }
    if let Err(err) = Ln().evaluate() {
        info!("evaluation: {}", err);
    }
    if let Err(err) = ParameterTable::from_entries([("Ln", 0.05), ("Ln", 0.06)]) {
        info!("table: {}", err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_examples_run() {
        geometry_example().unwrap();
        current_example().unwrap();
        toml_example().unwrap();
        error_example().unwrap();
    }
}
