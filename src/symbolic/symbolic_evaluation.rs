//! # Evaluation of processed expressions
//!
//! A processed tree (no parameters left) is evaluated against a binding of the
//! independent variable: none, one scalar time or an array of times. Array
//! evaluation works element-wise; constant subtrees stay scalar and are broadcast
//! against array operands.
//!
//! Division by a zero divisor is an error (`DivisionByZero`) instead of an IEEE
//! infinity or NaN; for arrays one zero element is enough.
//!
//! Values are memoised by node identity within one evaluation, so a subtree shared
//! by many parents is computed once.
use log::debug;
use ndarray::{Array1, ArrayView1, Zip};
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::symbolic::symbolic_engine::{BinOp, Callable, Expr, ExprKind, TIME_NAME};
use crate::symbolic::symbolic_errors::SymbolicError;
use crate::symbolic::symbolic_identity::Identity;

// longest rendering of a failing division kept in the error
const MAX_DESCRIPTION: usize = 256;

/// value bound to the independent variable for one evaluation
#[derive(Clone, Debug)]
pub enum EvaluationBinding<'a> {
    Unbound,
    Scalar(f64),
    Array(ArrayView1<'a, f64>),
}

impl<'a> EvaluationBinding<'a> {
    pub fn none() -> EvaluationBinding<'static> {
        EvaluationBinding::Unbound
    }

    pub fn scalar(t: f64) -> EvaluationBinding<'static> {
        EvaluationBinding::Scalar(t)
    }

    pub fn array(t: &'a Array1<f64>) -> EvaluationBinding<'a> {
        EvaluationBinding::Array(t.view())
    }
}

/// result of an evaluation
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Scalar(f64),
    Array(Array1<f64>),
}

impl Value {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(val) => Some(*val),
            Value::Array(_) => None,
        }
    }

    /// array of length `len`; a scalar is repeated
    pub fn into_array(self, len: usize) -> Array1<f64> {
        match self {
            Value::Scalar(val) => Array1::from_elem(len, val),
            Value::Array(arr) => arr,
        }
    }

    fn has_zero(&self) -> bool {
        match self {
            Value::Scalar(val) => *val == 0.0,
            Value::Array(arr) => arr.iter().any(|val| *val == 0.0),
        }
    }

    fn map(self, f: impl Fn(f64) -> f64) -> Value {
        match self {
            Value::Scalar(val) => Value::Scalar(f(val)),
            Value::Array(arr) => Value::Array(arr.mapv(f)),
        }
    }
}

fn combine(op: BinOp, lhs: Value, rhs: Value) -> Value {
    match (lhs, rhs) {
        (Value::Scalar(l), Value::Scalar(r)) => Value::Scalar(op.apply(l, r)),
        (Value::Array(l), Value::Scalar(r)) => Value::Array(l.mapv(|x| op.apply(x, r))),
        (Value::Scalar(l), Value::Array(r)) => Value::Array(r.mapv(|y| op.apply(l, y))),
        (Value::Array(l), Value::Array(r)) => {
            Value::Array(Zip::from(&l).and(&r).map_collect(|&x, &y| op.apply(x, y)))
        }
    }
}

fn unprocessed(name: &str) -> SymbolicError {
    SymbolicError::UnprocessedParameter {
        name: name.to_string(),
    }
}

impl Expr {
    /// Evaluates the tree with the given binding of the independent variable.
    pub fn evaluate_with(&self, binding: &EvaluationBinding) -> Result<Value, SymbolicError> {
        match binding {
            EvaluationBinding::Unbound => self.eval_scalar(None).map(Value::Scalar),
            EvaluationBinding::Scalar(t) => self.eval_scalar(Some(*t)).map(Value::Scalar),
            EvaluationBinding::Array(t) => self.eval_array(t),
        }
    }

    /// Evaluates an expression without the independent variable.
    pub fn evaluate(&self) -> Result<f64, SymbolicError> {
        self.eval_scalar(None)
    }

    /// Evaluates the expression at time `t`.
    pub fn evaluate_at(&self, t: f64) -> Result<f64, SymbolicError> {
        self.eval_scalar(Some(t))
    }

    /// Evaluates the expression for every element of `t`; the result has the length of `t`.
    pub fn evaluate_on(&self, t: &Array1<f64>) -> Result<Array1<f64>, SymbolicError> {
        let value = self.eval_array(&t.view())?;
        Ok(value.into_array(t.len()))
    }

    /// Evaluates the expression at many time points in parallel.
    pub fn evaluate_many(&self, ts: &[f64]) -> Result<Vec<f64>, SymbolicError> {
        debug!("evaluating {} at {} time points", self, ts.len());
        ts.par_iter().map(|&t| self.eval_scalar(Some(t))).collect()
    }

    fn eval_scalar(&self, t: Option<f64>) -> Result<f64, SymbolicError> {
        self.eval_scalar_memo(t, &mut FxHashMap::default())
    }

    fn eval_array(&self, t: &ArrayView1<f64>) -> Result<Value, SymbolicError> {
        self.eval_array_memo(t, &mut FxHashMap::default())
    }

    fn division_by_zero(&self) -> SymbolicError {
        SymbolicError::DivisionByZero {
            expression: self.describe(MAX_DESCRIPTION),
        }
    }

    fn eval_scalar_memo(
        &self,
        t: Option<f64>,
        memo: &mut FxHashMap<Identity, f64>,
    ) -> Result<f64, SymbolicError> {
        let val = match self.kind() {
            ExprKind::Const(val) => return Ok(*val),
            ExprKind::Time => {
                return t.ok_or_else(|| SymbolicError::UnboundVariable {
                    name: TIME_NAME.to_string(),
                });
            }
            ExprKind::Parameter(name) => return Err(unprocessed(name)),
            ExprKind::Binary(op, lhs, rhs) => {
                if let Some(val) = memo.get(&self.identity()) {
                    return Ok(*val);
                }
                let l = lhs.eval_scalar_memo(t, memo)?;
                let r = rhs.eval_scalar_memo(t, memo)?;
                if *op == BinOp::Div && r == 0.0 {
                    return Err(self.division_by_zero());
                }
                op.apply(l, r)
            }
            ExprKind::Call(callable, arg) => {
                if let Some(val) = memo.get(&self.identity()) {
                    return Ok(*val);
                }
                let x = arg.eval_scalar_memo(t, memo)?;
                match callable {
                    Callable::Native(func) => func.call(x),
                    Callable::Elementary(elementary) => elementary.apply(x),
                    Callable::Named(name) => return Err(unprocessed(name)),
                }
            }
        };
        memo.insert(self.identity(), val);
        Ok(val)
    }

    fn eval_array_memo(
        &self,
        t: &ArrayView1<f64>,
        memo: &mut FxHashMap<Identity, Value>,
    ) -> Result<Value, SymbolicError> {
        let value = match self.kind() {
            ExprKind::Const(val) => return Ok(Value::Scalar(*val)),
            ExprKind::Time => return Ok(Value::Array(t.to_owned())),
            ExprKind::Parameter(name) => return Err(unprocessed(name)),
            ExprKind::Binary(op, lhs, rhs) => {
                if let Some(value) = memo.get(&self.identity()) {
                    return Ok(value.clone());
                }
                let l = lhs.eval_array_memo(t, memo)?;
                let r = rhs.eval_array_memo(t, memo)?;
                if *op == BinOp::Div && r.has_zero() {
                    return Err(self.division_by_zero());
                }
                combine(*op, l, r)
            }
            ExprKind::Call(callable, arg) => {
                if let Some(value) = memo.get(&self.identity()) {
                    return Ok(value.clone());
                }
                let x = arg.eval_array_memo(t, memo)?;
                match callable {
                    Callable::Native(func) => x.map(|v| func.call(v)),
                    Callable::Elementary(elementary) => x.map(|v| elementary.apply(v)),
                    Callable::Named(name) => return Err(unprocessed(name)),
                }
            }
        };
        memo.insert(self.identity(), value.clone());
        Ok(value)
    }
}
