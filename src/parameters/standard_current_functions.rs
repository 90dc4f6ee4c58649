use std::f64::consts::PI;
use std::str::FromStr;

use crate::symbolic::symbolic_engine::{Elementary, NativeFunction};

/// I(t) = 1 for every t
pub fn constant_current() -> NativeFunction {
    NativeFunction::new("constant_current", |_t| 1.0)
}

/// I(t) = sin(2 pi t)
pub fn sinusoidal_current() -> NativeFunction {
    NativeFunction::new("sinusoidal_current", |t| (2.0 * PI * t).sin())
}

/// Looks a function up by name: the standard current profiles first, then elementary functions.
pub fn by_name(name: &str) -> Option<NativeFunction> {
    match name {
        "constant_current" => Some(constant_current()),
        "sinusoidal_current" => Some(sinusoidal_current()),
        _ => Elementary::from_str(name)
            .ok()
            .map(|elementary| NativeFunction::new(name, move |x| elementary.apply(x))),
    }
}
