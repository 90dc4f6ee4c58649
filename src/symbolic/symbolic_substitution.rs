//! # Parameter substitution
//!
//! Replaces every `Parameter` node and every named function call of a tree with the
//! binding found in a `ParameterTable`:
//! - numeric binding of a parameter → `Const(value)`
//! - function binding of a parameter → `f(t)`, a native call on the independent variable
//! - function binding of a function parameter `g(arg)` → native call on the processed `arg`
//! - numeric binding of a function parameter → `Const(value)` (constant function)
//!
//! `Time` and constants pass through. Subtrees that contain nothing to substitute are
//! returned as the very same node, so processed trees keep the sharing of the input.
//! A processor memoises its results by node identity: a subtree reachable from several
//! parents, or met again in a later `process_symbol` call, is processed only once.
use log::debug;
use rustc_hash::FxHashMap;

use crate::Utils::config::ProcessingConfig;
use crate::symbolic::parameter_table::{Binding, ParameterTable};
use crate::symbolic::symbolic_engine::{BinOp, Callable, Expr, ExprKind};
use crate::symbolic::symbolic_errors::SymbolicError;
use crate::symbolic::symbolic_identity::Identity;

pub struct ParameterProcessor<'a> {
    table: &'a ParameterTable,
    fold_constants: bool,
    cache: FxHashMap<Identity, Expr>,
    cache_hits: usize,
}

impl<'a> ParameterProcessor<'a> {
    pub fn new(table: &'a ParameterTable) -> ParameterProcessor<'a> {
        ParameterProcessor {
            table,
            fold_constants: false,
            cache: FxHashMap::default(),
            cache_hits: 0,
        }
    }

    pub fn with_config(table: &'a ParameterTable, config: &ProcessingConfig) -> ParameterProcessor<'a> {
        ParameterProcessor::new(table).fold_constants(config.fold_constants)
    }

    /// Fold `Const op Const` (and functions of constants) while substituting.
    /// Off by default: folded trees evaluate to the same numbers but no longer share
    /// identity with trees that were summed after substitution.
    pub fn fold_constants(mut self, fold: bool) -> Self {
        self.fold_constants = fold;
        self
    }

    pub fn table(&self) -> &ParameterTable {
        self.table
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn cache_hits(&self) -> usize {
        self.cache_hits
    }

    pub fn process_symbol(&mut self, expr: &Expr) -> Result<Expr, SymbolicError> {
        debug!("processing {}", expr);
        let processed = self.process(expr)?;
        debug!("processed into {}", processed);
        Ok(processed)
    }

    pub fn process_symbols(&mut self, exprs: &[Expr]) -> Result<Vec<Expr>, SymbolicError> {
        exprs.iter().map(|expr| self.process_symbol(expr)).collect()
    }

    fn process(&mut self, expr: &Expr) -> Result<Expr, SymbolicError> {
        let id = expr.identity();
        if let Some(done) = self.cache.get(&id) {
            self.cache_hits += 1;
            return Ok(done.clone());
        }
        let table = self.table;
        let processed = match expr.kind() {
            ExprKind::Const(_) | ExprKind::Time => expr.clone(),
            ExprKind::Parameter(name) => match table.lookup(name) {
                Some(Binding::Constant(val)) => Expr::Const(*val),
                Some(Binding::Function(func)) => Expr::call(func, Expr::t()),
                None => {
                    return Err(SymbolicError::UnboundParameter { name: name.clone() });
                }
            },
            ExprKind::Binary(op, lhs, rhs) => {
                let new_lhs = self.process(lhs)?;
                let new_rhs = self.process(rhs)?;
                self.rebuild_binary(expr, *op, new_lhs, new_rhs, lhs, rhs)
            }
            ExprKind::Call(Callable::Named(name), arg) => match table.lookup(name) {
                Some(Binding::Function(func)) => {
                    let new_arg = self.process(arg)?;
                    self.rebuild_call(Callable::Native(func.clone()), new_arg)
                }
                Some(Binding::Constant(val)) => {
                    // the argument is dropped, but its parameters must still be bound
                    self.process(arg)?;
                    Expr::Const(*val)
                }
                None => {
                    return Err(SymbolicError::UnboundParameter { name: name.clone() });
                }
            },
            ExprKind::Call(callable, arg) => {
                let new_arg = self.process(arg)?;
                if new_arg.ptr_eq(arg) && !(self.fold_constants && new_arg.as_const().is_some()) {
                    expr.clone()
                } else {
                    self.rebuild_call(callable.clone(), new_arg)
                }
            }
        };
        self.cache.insert(id, processed.clone());
        Ok(processed)
    }

    fn rebuild_binary(
        &self,
        original: &Expr,
        op: BinOp,
        new_lhs: Expr,
        new_rhs: Expr,
        lhs: &Expr,
        rhs: &Expr,
    ) -> Expr {
        if self.fold_constants {
            if let (Some(l), Some(r)) = (new_lhs.as_const(), new_rhs.as_const()) {
                // a zero divisor is left in place for the evaluator to report
                if !(op == BinOp::Div && r == 0.0) {
                    return Expr::Const(op.apply(l, r));
                }
            }
        }
        if new_lhs.ptr_eq(lhs) && new_rhs.ptr_eq(rhs) {
            original.clone()
        } else {
            Expr::Binary(op, new_lhs, new_rhs)
        }
    }

    fn rebuild_call(&self, callable: Callable, new_arg: Expr) -> Expr {
        if self.fold_constants {
            if let Some(x) = new_arg.as_const() {
                match &callable {
                    Callable::Native(func) => return Expr::Const(func.call(x)),
                    Callable::Elementary(elementary) => return Expr::Const(elementary.apply(x)),
                    Callable::Named(_) => {}
                }
            }
        }
        Expr::apply(callable, new_arg)
    }
}

/// Substitutes the bindings of `table` into `expr` with a fresh processor.
pub fn substitute(expr: &Expr, table: &ParameterTable) -> Result<Expr, SymbolicError> {
    ParameterProcessor::new(table).process_symbol(expr)
}

impl ParameterTable {
    /// Substitutes this table into `expr` (see `substitute`).
    pub fn process_symbol(&self, expr: &Expr) -> Result<Expr, SymbolicError> {
        substitute(expr, self)
    }

    pub fn processor(&self) -> ParameterProcessor<'_> {
        ParameterProcessor::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::symbolic_engine::NativeFunction;

    fn geometry() -> ParameterTable {
        ParameterTable::from_entries([("Ln", 0.05), ("Ls", 0.02), ("Lp", 0.21)]).unwrap()
    }

    #[test]
    fn test_constant_binding() {
        let processed = substitute(&Expr::Parameter("Ln"), &geometry()).unwrap();
        assert_eq!(processed.as_const(), Some(0.05));
    }

    #[test]
    fn test_function_binding_becomes_call_on_time() {
        let table = ParameterTable::from_entries(vec![(
            "current function",
            Binding::function("doubled", |t| 2.0 * t),
        )])
        .unwrap();
        let processed = substitute(&Expr::Parameter("current function"), &table).unwrap();
        match processed.kind() {
            ExprKind::Call(Callable::Native(func), arg) => {
                assert_eq!(func.name(), "doubled");
                assert!(matches!(arg.kind(), ExprKind::Time));
            }
            other => panic!("expected native call, got {:?}", other),
        }
        assert_eq!(processed.to_string(), "doubled(t)");
    }

    #[test]
    fn test_function_parameter() {
        let table = ParameterTable::from_entries(vec![
            ("f", Binding::function("square", |x| x * x)),
            ("g", Binding::Constant(4.0)),
            ("Ln", Binding::Constant(0.5)),
        ])
        .unwrap();
        let expr = Expr::FunctionParameter("f", Expr::Parameter("Ln") * Expr::t());
        let processed = substitute(&expr, &table).unwrap();
        assert_eq!(processed.to_string(), "square((0.5 * t))");
        let constant_function = substitute(&Expr::FunctionParameter("g", Expr::t()), &table).unwrap();
        assert_eq!(constant_function.as_const(), Some(4.0));
    }

    #[test]
    fn test_unbound_parameter() {
        let expr = Expr::Parameter("Ln") + Expr::Parameter("Unknown");
        match substitute(&expr, &geometry()) {
            Err(SymbolicError::UnboundParameter { name }) => assert_eq!(name, "Unknown"),
            other => panic!("expected unbound parameter, got {:?}", other),
        }
        let call = Expr::FunctionParameter("missing function", Expr::t());
        match substitute(&call, &geometry()) {
            Err(err) => assert_eq!(err.offending_name(), Some("missing function")),
            Ok(expr) => panic!("expected an error, got {}", expr),
        }
    }

    #[test]
    fn test_unbound_argument_of_any_function_parameter() {
        let table = ParameterTable::from_entries(vec![
            ("f", Binding::function("square", |x| x * x)),
            ("g", Binding::Constant(4.0)),
        ])
        .unwrap();
        for name in ["f", "g"] {
            let expr = Expr::FunctionParameter(name, Expr::Parameter("Unknown"));
            match substitute(&expr, &table) {
                Err(SymbolicError::UnboundParameter { name }) => assert_eq!(name, "Unknown"),
                other => panic!("expected unbound parameter for {}, got {:?}", name, other),
            }
        }
    }

    #[test]
    fn test_time_and_constants_untouched() {
        let expr = Expr::t() * Expr::Const(3.0);
        let processed = substitute(&expr, &ParameterTable::new()).unwrap();
        assert!(processed.ptr_eq(&expr));
    }

    #[test]
    fn test_idempotent() {
        let table = geometry();
        let expr = Expr::Parameter("Ln") / (Expr::Parameter("Ln") + Expr::Parameter("Lp")) * Expr::t();
        let once = substitute(&expr, &table).unwrap();
        let twice = substitute(&once, &table).unwrap();
        assert_eq!(once.identity(), twice.identity());
        assert!(twice.ptr_eq(&once));
    }

    #[test]
    fn test_shared_subtree_processed_once() {
        let table = geometry();
        let shared = Expr::Parameter("Ln") * Expr::Parameter("Ls");
        let expr = &shared + &shared;
        let mut processor = table.processor();
        let processed = processor.process_symbol(&expr).unwrap();
        // root, shared product, Ln, Ls
        assert_eq!(processor.cache_len(), 4);
        assert_eq!(processor.cache_hits(), 1);
        match processed.kind() {
            ExprKind::Binary(BinOp::Add, lhs, rhs) => assert!(lhs.ptr_eq(rhs)),
            other => panic!("expected a sum, got {:?}", other),
        }
    }

    #[test]
    fn test_cache_reused_across_symbols() {
        let table = geometry();
        let mut processor = ParameterProcessor::new(&table);
        let first = processor.process_symbol(&(Expr::Parameter("Ln") + Expr::Parameter("Ls"))).unwrap();
        let hits_before = processor.cache_hits();
        let second = processor
            .process_symbol(&((Expr::Parameter("Ln") + Expr::Parameter("Ls")) * Expr::Parameter("Lp")))
            .unwrap();
        assert_eq!(processor.cache_hits(), hits_before + 1);
        match second.kind() {
            ExprKind::Binary(BinOp::Mul, lhs, _) => assert!(lhs.ptr_eq(&first)),
            other => panic!("expected a product, got {:?}", other),
        }
    }

    #[test]
    fn test_constant_folding() {
        let table = geometry();
        let expr = (Expr::Parameter("Ln") + Expr::Parameter("Ls")).exp() * Expr::t();
        let folded = ParameterProcessor::new(&table)
            .fold_constants(true)
            .process_symbol(&expr)
            .unwrap();
        let plain = substitute(&expr, &table).unwrap();
        assert_eq!(folded.node_count(), 3);
        assert!(plain.node_count() > folded.node_count());
        for t in [0.0, 1.5, 10.0] {
            let a = folded.evaluate_at(t).unwrap();
            let b = plain.evaluate_at(t).unwrap();
            approx::assert_relative_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_folding_keeps_zero_division() {
        let table = ParameterTable::from_entries([("a", 1.0), ("b", 0.0)]).unwrap();
        let expr = Expr::Parameter("a") / Expr::Parameter("b");
        let folded = ParameterProcessor::new(&table)
            .fold_constants(true)
            .process_symbol(&expr)
            .unwrap();
        assert!(folded.as_const().is_none());
        assert!(matches!(
            folded.evaluate(),
            Err(SymbolicError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_folding_native_calls_of_constants() {
        let table = ParameterTable::from_entries([("a", 3.0)]).unwrap();
        let cube = NativeFunction::new("cube", |x| x * x * x);
        let expr = Expr::call(&cube, Expr::Parameter("a"));
        let folded = ParameterProcessor::new(&table)
            .fold_constants(true)
            .process_symbol(&expr)
            .unwrap();
        assert_eq!(folded.as_const(), Some(27.0));
    }

    #[test]
    fn test_process_symbols() {
        let table = geometry();
        let exprs = Expr::Parameters("Ln, Ls, Lp");
        let processed = table.processor().process_symbols(&exprs).unwrap();
        let values = processed.iter().map(|e| e.as_const().unwrap()).collect::<Vec<_>>();
        assert_eq!(values, vec![0.05, 0.02, 0.21]);
    }
}
