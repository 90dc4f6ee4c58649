#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// expression trees over parameters and time:
/// 1) build expressions from constants, named parameters, time and functions with ordinary operators
/// 2) compare them by structural identity
/// 3) print them in a human-readable form
///# Example#
/// ```
/// use RustedParams::symbolic::symbolic_engine::Expr;
/// let Ln = Expr::Parameter("Ln");
/// let Lx = Expr::Parameter("Ln") + Expr::Parameter("Ls") + Expr::Parameter("Lp");
/// let ln = Ln / Lx;
/// println!("ln = {}", ln);
/// assert_eq!(ln.all_parameters(), vec!["Ln", "Lp", "Ls"]);
/// // built twice, equal by structure
/// let again = Expr::Parameter("Ln")
///     / (Expr::Parameter("Ln") + Expr::Parameter("Ls") + Expr::Parameter("Lp"));
/// assert_eq!(ln.identity(), again.identity());
/// ```
/// ________________________________________________________________________________________________________________________________________________
pub mod symbolic_engine;
/// deterministic structural identity of expression trees
pub mod symbolic_identity;
///________________________________________________________________________________________________________________________________________________
///
/// parameter values and functions of time, and their substitution into expressions
/// Example#
/// ```
/// use RustedParams::symbolic::symbolic_engine::Expr;
/// use RustedParams::symbolic::parameter_table::{Binding, ParameterTable};
/// let parameter_values = ParameterTable::from_entries(vec![
///     ("Ln", Binding::Constant(0.05)),
///     ("Ls", Binding::Constant(0.02)),
///     ("Lp", Binding::Constant(0.21)),
///     ("current function", Binding::function("ramp", |t| 0.5 * t)),
/// ])
/// .unwrap();
/// let Lx = Expr::Parameter("Ln") + Expr::Parameter("Ls") + Expr::Parameter("Lp");
/// let Lx_eval = parameter_values.process_symbol(&Lx).unwrap();
/// println!("Lx = {} = {}", Lx_eval, Lx_eval.evaluate().unwrap());
/// let current = Expr::Parameter("current function") / Lx;
/// let current_eval = parameter_values.process_symbol(&current).unwrap();
/// // time is bound only at evaluation
/// let i_3 = current_eval.evaluate_at(3.0).unwrap();
/// assert!((i_3 - 1.5 / 0.28).abs() < 1e-12);
/// // unknown names are reported
/// assert!(parameter_values.process_symbol(&Expr::Parameter("Unknown")).is_err());
/// ```
pub mod parameter_table;
pub mod symbolic_substitution;
///________________________________________________________________________________________________________________________________________________
///
/// evaluation of processed expressions for no time, one time or an array of times
/// Example#
/// ```
/// use RustedParams::symbolic::symbolic_engine::Expr;
/// use ndarray::array;
/// let f = Expr::t() * Expr::Const(2.0) + Expr::Const(1.0);
/// assert_eq!(f.evaluate_at(3.0).unwrap(), 7.0);
/// assert_eq!(f.evaluate_on(&array![0.0, 1.0]).unwrap(), array![1.0, 3.0]);
/// assert!((Expr::Const(1.0) / Expr::Const(0.0)).evaluate().is_err());
/// ```
pub mod symbolic_evaluation;
pub mod symbolic_errors;
