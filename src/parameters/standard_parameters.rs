//! Geometric and current parameters.
//!
//! Dimensional lengths `Ln`, `Ls`, `Lp` are parameters; the cell length `Lx` and the
//! dimensionless lengths `ln`, `ls`, `lp` are derived from them symbolically, so any
//! parameter table that binds the three lengths also fixes the derived quantities.
#![allow(non_snake_case)]

use crate::symbolic::parameter_table::{CURRENT_FUNCTION, TYPICAL_CURRENT};
use crate::symbolic::symbolic_engine::{Expr, NativeFunction};

/// negative electrode length [m]
pub fn Ln() -> Expr {
    Expr::Parameter("Ln")
}

/// separator length [m]
pub fn Ls() -> Expr {
    Expr::Parameter("Ls")
}

/// positive electrode length [m]
pub fn Lp() -> Expr {
    Expr::Parameter("Lp")
}

/// cell length [m]
pub fn Lx() -> Expr {
    Ln() + Ls() + Lp()
}

pub fn ln() -> Expr {
    Ln() / Lx()
}

pub fn ls() -> Expr {
    Ls() / Lx()
}

pub fn lp() -> Expr {
    Lp() / Lx()
}

/// typical current [A]
pub fn I_typ() -> Expr {
    Expr::Parameter(TYPICAL_CURRENT)
}

/// `current_scale * current_function(t)`
pub fn dimensional_current(
    current_scale: impl Into<Expr>,
    current_function: &NativeFunction,
    t: &Expr,
) -> Expr {
    current_scale.into() * Expr::call(current_function, t.clone())
}

/// dimensional current scaled by the typical current, divided by the typical current
pub fn dimensionless_current(current_function: &NativeFunction, t: &Expr) -> Expr {
    dimensional_current(I_typ(), current_function, t) / I_typ()
}

/// `I_typ * current function(t)` where the current function itself is a parameter
pub fn default_dimensional_current(t: &Expr) -> Expr {
    I_typ() * Expr::FunctionParameter(CURRENT_FUNCTION, t.clone())
}
