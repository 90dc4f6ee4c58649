//! Structural identity of expression trees.
//!
//! The identity of a node is a 64-bit fingerprint of its kind, its scalar payload
//! (value, name, operator) and the identities of its children. It never depends on
//! where a node lives in memory or in which order nodes were allocated, so two trees
//! built independently but with the same structure get the same identity, in this
//! process and in any other. The hasher is the seedless `FxHasher`.
use std::fmt;
use std::hash::Hasher;

use rustc_hash::FxHasher;

use crate::symbolic::symbolic_engine::{BinOp, Callable, Elementary, ExprKind};

const TAG_CONST: u8 = 1;
const TAG_PARAMETER: u8 = 2;
const TAG_TIME: u8 = 3;
const TAG_BINARY: u8 = 4;
const TAG_CALL: u8 = 5;

const TAG_NAMED: u8 = 16;
const TAG_NATIVE: u8 = 17;
const TAG_ELEMENTARY: u8 = 18;

// end marker after every name so that ("ab","c") and ("a","bc") hash apart
const NAME_END: u8 = 0xff;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(u64);

impl Identity {
    pub fn value(&self) -> u64 {
        self.0
    }

    /// identity of a node of this kind; children identities are taken from the (memoised) children
    pub(crate) fn of_kind(kind: &ExprKind) -> Identity {
        let mut hasher = FxHasher::default();
        match kind {
            ExprKind::Const(val) => {
                hasher.write_u8(TAG_CONST);
                hasher.write_u64(canonical_bits(*val));
            }
            ExprKind::Parameter(name) => {
                hasher.write_u8(TAG_PARAMETER);
                write_name(&mut hasher, name);
            }
            ExprKind::Time => hasher.write_u8(TAG_TIME),
            ExprKind::Binary(op, lhs, rhs) => {
                hasher.write_u8(TAG_BINARY);
                hasher.write_u8(binop_tag(op));
                hasher.write_u64(lhs.identity().value());
                hasher.write_u64(rhs.identity().value());
            }
            ExprKind::Call(callable, arg) => {
                hasher.write_u8(TAG_CALL);
                match callable {
                    Callable::Named(name) => {
                        hasher.write_u8(TAG_NAMED);
                        write_name(&mut hasher, name);
                    }
                    Callable::Native(func) => {
                        hasher.write_u8(TAG_NATIVE);
                        write_name(&mut hasher, func.name());
                    }
                    Callable::Elementary(elementary) => {
                        hasher.write_u8(TAG_ELEMENTARY);
                        hasher.write_u8(elementary_tag(elementary));
                    }
                }
                hasher.write_u64(arg.identity().value());
            }
        }
        Identity(hasher.finish())
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Identity({:016x})", self.0)
    }
}

/// -0.0 is folded onto 0.0 and every NaN onto one quiet NaN
fn canonical_bits(val: f64) -> u64 {
    if val == 0.0 {
        0.0f64.to_bits()
    } else if val.is_nan() {
        f64::NAN.to_bits()
    } else {
        val.to_bits()
    }
}

fn write_name(hasher: &mut FxHasher, name: &str) {
    hasher.write(name.as_bytes());
    hasher.write_u8(NAME_END);
}

// explicit tags instead of discriminant casts keep identities stable if variants get reordered
fn binop_tag(op: &BinOp) -> u8 {
    match op {
        BinOp::Add => 1,
        BinOp::Sub => 2,
        BinOp::Mul => 3,
        BinOp::Div => 4,
        BinOp::Pow => 5,
    }
}

fn elementary_tag(elementary: &Elementary) -> u8 {
    match elementary {
        Elementary::Exp => 1,
        Elementary::Ln => 2,
        Elementary::Sin => 3,
        Elementary::Cos => 4,
        Elementary::Tan => 5,
        Elementary::Sqrt => 6,
        Elementary::Abs => 7,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::symbolic_engine::{Expr, NativeFunction};
    use itertools::Itertools;
    use strum::IntoEnumIterator;

    #[test]
    fn test_identity_independent_of_construction_path() {
        let a = Expr::Parameter("Ln") + Expr::Parameter("Ls");
        let b = Expr::Parameter("Ln") + Expr::Parameter("Ls");
        assert!(!a.ptr_eq(&b));
        assert_eq!(a.identity(), b.identity());
        assert_eq!(a, b);
    }

    #[test]
    fn test_identity_is_order_sensitive() {
        let a = Expr::Parameter("Ln") - Expr::Parameter("Ls");
        let b = Expr::Parameter("Ls") - Expr::Parameter("Ln");
        assert_ne!(a.identity(), b.identity());
    }

    #[test]
    fn test_identity_stable_across_calls() {
        let expr = (Expr::Parameter("Ln") / Expr::Const(2.0)).exp() * Expr::t();
        let first = expr.identity();
        for _ in 0..10 {
            assert_eq!(expr.identity(), first);
        }
        let _ = expr.evaluate_with(&crate::symbolic::symbolic_evaluation::EvaluationBinding::none());
        assert_eq!(expr.identity(), first);
    }

    // fixed values: identities must agree between runs and builds (64-bit FxHasher)
    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_identity_values_pinned() {
        assert_eq!(Expr::Parameter("Ln").identity().value(), 0xf0f13f13a6e16c37);
        assert_eq!(Expr::t().identity().value(), 0xfa2c9ff53f4e81c2);
        let sum = Expr::Parameter("Ln") + Expr::Parameter("Ls");
        assert_eq!(sum.identity().value(), 0x78c32be5814053a5);
        assert_eq!(sum.identity().to_string(), "78c32be5814053a5");
    }

    #[test]
    fn test_identity_distinguishes_kinds() {
        let leaves = vec![
            Expr::Const(1.0),
            Expr::Const(2.0),
            Expr::Parameter("x"),
            Expr::Parameter("y"),
            Expr::t(),
            Expr::FunctionParameter("x", Expr::t()),
            Expr::call(&NativeFunction::new("x", |t| t), Expr::t()),
        ];
        let ids = leaves.iter().map(|e| e.identity()).collect::<Vec<_>>();
        assert_eq!(ids.iter().unique().count(), ids.len());
    }

    #[test]
    fn test_identity_distinguishes_operators_and_functions() {
        let x = Expr::Parameter("x");
        let mut ids = BinOp::iter()
            .map(|op| Expr::Binary(op, x.clone(), x.clone()).identity())
            .collect::<Vec<_>>();
        ids.extend(
            Elementary::iter().map(|e| Expr::apply(Callable::Elementary(e), x.clone()).identity()),
        );
        assert_eq!(ids.iter().unique().count(), ids.len());
    }

    #[test]
    fn test_name_boundaries() {
        let a = Expr::FunctionParameter("ab", Expr::Parameter("c"));
        let b = Expr::FunctionParameter("a", Expr::Parameter("bc"));
        assert_ne!(a.identity(), b.identity());
    }

    #[test]
    fn test_signed_zero_and_nan() {
        assert_eq!(Expr::Const(0.0).identity(), Expr::Const(-0.0).identity());
        assert_eq!(
            Expr::Const(f64::NAN).identity(),
            Expr::Const(-f64::NAN).identity()
        );
    }

    #[test]
    fn test_identity_concurrent_requests() {
        let expr = Expr::Parameter("Ln") * Expr::Parameter("Lp") + Expr::t();
        let expected = (Expr::Parameter("Ln") * Expr::Parameter("Lp") + Expr::t()).identity();
        std::thread::scope(|s| {
            let handles = (0..4)
                .map(|_| s.spawn(|| expr.identity()))
                .collect::<Vec<_>>();
            for h in handles {
                assert_eq!(h.join().unwrap(), expected);
            }
        });
    }
}
