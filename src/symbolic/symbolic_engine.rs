//! # Symbolic Engine Module
//!
//! Expression trees over named parameters and the independent variable (time).
//!
//! ## Main Structures
//!
//! ### `Expr`
//! A cheap-to-clone handle (`Arc`) to an immutable node. Nodes are never mutated after
//! construction, so one subtree can be shared by many parents and by many threads.
//! The node kinds (`ExprKind`) are:
//! - **Constants**: `Const(f64)`
//! - **Parameters**: `Parameter(String)` - named placeholders like "Ln", resolved by substitution
//! - **Time**: `Time` - the independent variable, bound only at evaluation time
//! - **Operations**: `Binary(BinOp, lhs, rhs)` with `+ - * / ^`
//! - **Functions**: `Call(Callable, arg)` - function parameters, native closures and elementary functions
//!
//! ### Equality
//! Two expressions are equal when their structural identities are equal
//! (see `symbolic_identity`), not when they point to the same allocation.
//!
//! ## Interesting Code Features
//!
//! 1. **Operator Overloading**: `std::ops` traits (Add, Sub, Mul, Div, Neg) for
//!    natural syntax: `Ln + Ls + Lp`
//! 2. **Lazy identity**: every node carries a `OnceLock` with its identity, filled on first request

#![allow(non_camel_case_types)]

use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, OnceLock};

use rustc_hash::FxHashSet;
use strum_macros::{EnumIter, EnumString};

use crate::symbolic::symbolic_identity::Identity;

/// name under which the independent variable is printed and reported in errors
pub const TIME_NAME: &str = "t";

/// Binary operators of the expression algebra
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Pow => "^",
        }
    }
    /// plain IEEE arithmetic; zero divisors are screened by the evaluator before this is called
    #[inline(always)]
    pub fn apply(&self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinOp::Add => lhs + rhs,
            BinOp::Sub => lhs - rhs,
            BinOp::Mul => lhs * rhs,
            BinOp::Div => lhs / rhs,
            BinOp::Pow => lhs.powf(rhs),
        }
    }
}

/// Built-in elementary functions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, EnumString, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Elementary {
    Exp,
    Ln,
    Sin,
    Cos,
    Tan,
    Sqrt,
    Abs,
}

impl Elementary {
    #[inline(always)]
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            Elementary::Exp => x.exp(),
            Elementary::Ln => x.ln(),
            Elementary::Sin => x.sin(),
            Elementary::Cos => x.cos(),
            Elementary::Tan => x.tan(),
            Elementary::Sqrt => x.sqrt(),
            Elementary::Abs => x.abs(),
        }
    }
}

/// A named Rust closure of one argument, e.g. a current profile I(t).
///
/// The name is part of the structural identity of every call node built from the
/// function, so two different closures must be registered under different names.
#[derive(Clone)]
pub struct NativeFunction {
    name: Arc<str>,
    func: Arc<dyn Fn(f64) -> f64 + Send + Sync>,
}

impl NativeFunction {
    pub fn new<F>(name: &str, func: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        NativeFunction {
            name: Arc::from(name),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    pub fn call(&self, x: f64) -> f64 {
        (self.func)(x)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "NativeFunction({})", self.name)
    }
}

/// What a `Call` node applies to its argument
#[derive(Clone, Debug)]
pub enum Callable {
    /// function parameter, resolved from the parameter table by name
    Named(String),
    Native(NativeFunction),
    Elementary(Elementary),
}

impl Callable {
    pub fn name(&self) -> String {
        match self {
            Callable::Named(name) => name.clone(),
            Callable::Native(func) => func.name().to_string(),
            Callable::Elementary(elementary) => elementary.to_string(),
        }
    }
}

/// Node kinds of the expression tree
#[derive(Clone, Debug)]
pub enum ExprKind {
    /// Numerical constant value
    Const(f64),
    /// Unresolved symbolic parameter
    Parameter(String),
    /// The independent variable
    Time,
    Binary(BinOp, Expr, Expr),
    Call(Callable, Expr),
}

pub(crate) struct ExprNode {
    kind: ExprKind,
    identity: OnceLock<Identity>,
}

/// Shared handle to an immutable expression node.
///
/// # Examples
/// ```rust, ignore
/// let Ln = Expr::Parameter("Ln");
/// let expr = Ln / Expr::Const(2.0);
/// ```
#[derive(Clone)]
pub struct Expr(Arc<ExprNode>);

impl Expr {
    /// BASIC FEATURES

    pub fn new(kind: ExprKind) -> Expr {
        Expr(Arc::new(ExprNode {
            kind,
            identity: OnceLock::new(),
        }))
    }

    pub fn kind(&self) -> &ExprKind {
        &self.0.kind
    }

    /// Structural identity of this subtree, computed once and memoised inside the node.
    pub fn identity(&self) -> Identity {
        *self
            .0
            .identity
            .get_or_init(|| Identity::of_kind(&self.0.kind))
    }

    /// true when both handles point at the very same node (not just an equal one)
    pub fn ptr_eq(&self, other: &Expr) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn Const(value: f64) -> Expr {
        Expr::new(ExprKind::Const(value))
    }

    pub fn Parameter(name: &str) -> Expr {
        Expr::new(ExprKind::Parameter(name.to_string()))
    }

    /// Creates multiple parameters from a comma-separated string like "Ln, Ls, Lp".
    pub fn Parameters(names: &str) -> Vec<Expr> {
        names
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(Expr::Parameter)
            .collect()
    }

    /// The independent variable
    pub fn t() -> Expr {
        Expr::new(ExprKind::Time)
    }

    pub fn Binary(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::new(ExprKind::Binary(op, lhs, rhs))
    }

    /// Function parameter: a function known only by name until substitution, applied to `arg`.
    pub fn FunctionParameter(name: &str, arg: Expr) -> Expr {
        Expr::new(ExprKind::Call(Callable::Named(name.to_string()), arg))
    }

    pub fn call(func: &NativeFunction, arg: Expr) -> Expr {
        Expr::new(ExprKind::Call(Callable::Native(func.clone()), arg))
    }

    pub fn apply(callable: Callable, arg: Expr) -> Expr {
        Expr::new(ExprKind::Call(callable, arg))
    }

    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Binary(BinOp::Pow, self, rhs)
    }

    pub fn exp(self) -> Expr {
        Expr::apply(Callable::Elementary(Elementary::Exp), self)
    }

    pub fn ln(self) -> Expr {
        Expr::apply(Callable::Elementary(Elementary::Ln), self)
    }

    pub fn sin(self) -> Expr {
        Expr::apply(Callable::Elementary(Elementary::Sin), self)
    }

    pub fn cos(self) -> Expr {
        Expr::apply(Callable::Elementary(Elementary::Cos), self)
    }

    pub fn tan(self) -> Expr {
        Expr::apply(Callable::Elementary(Elementary::Tan), self)
    }

    pub fn sqrt(self) -> Expr {
        Expr::apply(Callable::Elementary(Elementary::Sqrt), self)
    }

    pub fn abs(self) -> Expr {
        Expr::apply(Callable::Elementary(Elementary::Abs), self)
    }

    //___________________________________QUERIES____________________________________

    pub fn as_const(&self) -> Option<f64> {
        match self.kind() {
            ExprKind::Const(val) => Some(*val),
            _ => None,
        }
    }

    /// Checks if expression is exactly zero (constant 0.0).
    pub fn is_zero(&self) -> bool {
        matches!(self.kind(), ExprKind::Const(val) if *val == 0.0)
    }

    /// check if the expression contains a parameter (or function parameter) with this name
    pub fn contains_parameter(&self, param_name: &str) -> bool {
        self.any_node(
            &|kind| match kind {
                ExprKind::Parameter(name) | ExprKind::Call(Callable::Named(name), _) => {
                    name == param_name
                }
                _ => false,
            },
            &mut FxHashSet::default(),
        )
    }

    pub fn contains_time(&self) -> bool {
        self.any_node(
            &|kind| matches!(kind, ExprKind::Time),
            &mut FxHashSet::default(),
        )
    }

    // shared subtrees are visited once
    fn any_node(&self, pred: &impl Fn(&ExprKind) -> bool, seen: &mut FxHashSet<Identity>) -> bool {
        if !seen.insert(self.identity()) {
            return false;
        }
        if pred(self.kind()) {
            return true;
        }
        match self.kind() {
            ExprKind::Const(_) | ExprKind::Parameter(_) | ExprKind::Time => false,
            ExprKind::Binary(_, lhs, rhs) => lhs.any_node(pred, seen) || rhs.any_node(pred, seen),
            ExprKind::Call(_, arg) => arg.any_node(pred, seen),
        }
    }

    /// sorted names of all parameters and function parameters in the tree
    pub fn all_parameters(&self) -> Vec<String> {
        let mut names = BTreeSet::new();
        self.collect_parameters(&mut names, &mut FxHashSet::default());
        names.into_iter().collect()
    }

    fn collect_parameters(&self, names: &mut BTreeSet<String>, seen: &mut FxHashSet<Identity>) {
        if !seen.insert(self.identity()) {
            return;
        }
        match self.kind() {
            ExprKind::Parameter(name) => {
                names.insert(name.clone());
            }
            ExprKind::Const(_) | ExprKind::Time => {}
            ExprKind::Binary(_, lhs, rhs) => {
                lhs.collect_parameters(names, seen);
                rhs.collect_parameters(names, seen);
            }
            ExprKind::Call(callable, arg) => {
                if let Callable::Named(name) = callable {
                    names.insert(name.clone());
                }
                arg.collect_parameters(names, seen);
            }
        }
    }

    /// true when nothing is left for substitution to resolve
    pub fn is_processed(&self) -> bool {
        self.all_parameters().is_empty()
    }

    /// number of nodes counted as a tree (shared subtrees counted at every occurrence).
    /// Walks every occurrence, so a deeply shared DAG is expensive; see `distinct_node_count`.
    pub fn node_count(&self) -> usize {
        match self.kind() {
            ExprKind::Const(_) | ExprKind::Parameter(_) | ExprKind::Time => 1,
            ExprKind::Binary(_, lhs, rhs) => 1 + lhs.node_count() + rhs.node_count(),
            ExprKind::Call(_, arg) => 1 + arg.node_count(),
        }
    }

    /// number of structurally distinct nodes
    pub fn distinct_node_count(&self) -> usize {
        let mut seen = FxHashSet::default();
        self.any_node(&|_| false, &mut seen);
        seen.len()
    }

    /// `Display` form cut after `limit` bytes (then "..." is appended); stops walking the
    /// tree once the limit is reached.
    pub fn describe(&self, limit: usize) -> String {
        let mut writer = BoundedWriter {
            buf: String::new(),
            limit,
        };
        match fmt::Write::write_fmt(&mut writer, format_args!("{}", self)) {
            Ok(()) => writer.buf,
            Err(_) => writer.buf + "...",
        }
    }
}

struct BoundedWriter {
    buf: String,
    limit: usize,
}

impl fmt::Write for BoundedWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = self.limit.saturating_sub(self.buf.len());
        if s.len() <= room {
            self.buf.push_str(s);
            return Ok(());
        }
        let mut end = room;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        self.buf.push_str(&s[..end]);
        Err(fmt::Error)
    }
}

/// Display implementation for pretty printing symbolic expressions.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind() {
            ExprKind::Const(val) => write!(f, "{}", val),
            ExprKind::Parameter(name) => write!(f, "{}", name),
            ExprKind::Time => write!(f, "{}", TIME_NAME),
            ExprKind::Binary(op, lhs, rhs) => write!(f, "({} {} {})", lhs, op.symbol(), rhs),
            ExprKind::Call(callable, arg) => write!(f, "{}({})", callable.name(), arg),
        }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Expr[{}]({})", self.identity(), self)
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.identity() == other.identity()
    }
}

impl Eq for Expr {}

impl std::hash::Hash for Expr {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::Const(value)
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Binary(BinOp::Add, self, rhs)
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Binary(BinOp::Sub, self, rhs)
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Binary(BinOp::Mul, self, rhs)
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Binary(BinOp::Div, self, rhs)
    }
}

// borrowed operands only bump reference counts
macro_rules! impl_borrowed_op {
    ($trait:ident, $method:ident, $op:expr) => {
        impl<'a> std::ops::$trait<&'a Expr> for &'a Expr {
            type Output = Expr;

            fn $method(self, rhs: &'a Expr) -> Expr {
                Expr::Binary($op, self.clone(), rhs.clone())
            }
        }
    };
}

impl_borrowed_op!(Add, add, BinOp::Add);
impl_borrowed_op!(Sub, sub, BinOp::Sub);
impl_borrowed_op!(Mul, mul, BinOp::Mul);
impl_borrowed_op!(Div, div, BinOp::Div);

impl std::ops::AddAssign for Expr {
    fn add_assign(&mut self, rhs: Self) {
        *self = Expr::Binary(BinOp::Add, self.clone(), rhs);
    }
}

impl std::ops::SubAssign for Expr {
    fn sub_assign(&mut self, rhs: Self) {
        *self = Expr::Binary(BinOp::Sub, self.clone(), rhs);
    }
}

impl std::ops::MulAssign for Expr {
    fn mul_assign(&mut self, rhs: Self) {
        *self = Expr::Binary(BinOp::Mul, self.clone(), rhs);
    }
}

impl std::ops::DivAssign for Expr {
    fn div_assign(&mut self, rhs: Self) {
        *self = Expr::Binary(BinOp::Div, self.clone(), rhs);
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Binary(BinOp::Mul, Expr::Const(-1.0), self)
    }
}

//___________________________________MACROS____________________________________

/// Macro to create parameters from a comma-separated list
/// Usage: parameters!(Ln, Ls, Lp) -> creates parameters named "Ln", "Ls", "Lp"
#[macro_export]
macro_rules! parameters {
    ($($var:ident),+ $(,)?) => {
        ($(
            $crate::symbolic::symbolic_engine::Expr::Parameter(stringify!($var))
        ),+)
    };
}
