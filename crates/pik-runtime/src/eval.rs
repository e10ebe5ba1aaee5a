use pik_core::{
    try_value, Call, Completion, EvalResult, EvaluationError, Expression, Host, ObjectRef, Script,
    Value,
};
use tracing::trace;

use crate::context::ExecutionContext;

/// Tree-walking evaluator. Holds no state of its own; everything an evaluation
/// needs is in the `ExecutionContext` passed down.
pub struct Evaluator<'h> {
    host: &'h dyn Host,
}

impl<'h> Evaluator<'h> {
    pub fn new(host: &'h dyn Host) -> Self {
        Self { host }
    }

    /// Statements run in order; the last one's value is the script's value.
    pub fn eval_script(&self, script: &Script, cx: &ExecutionContext) -> EvalResult {
        let mut last = Value::Null;
        for statement in &script.statements {
            last = try_value!(self.eval_expression(statement, cx));
        }
        Ok(Completion::Value(last))
    }

    pub fn eval_expression(&self, expression: &Expression, cx: &ExecutionContext) -> EvalResult {
        match expression {
            Expression::Number { value } => Ok(Value::Number(*value).into()),
            Expression::String { value } => Ok(Value::String(value.clone()).into()),
            Expression::Bool { value } => Ok(Value::Bool(*value).into()),
            Expression::Identifier { name } => Ok(eval_identifier(name, cx).into()),
            Expression::MethodCall {
                target,
                method,
                args,
            } => self.eval_call(target, method, args, cx),
        }
    }

    fn eval_call(
        &self,
        target: &ObjectRef,
        method: &str,
        args: &[Expression],
        cx: &ExecutionContext,
    ) -> EvalResult {
        let object = cx
            .resolve(target)
            .ok_or_else(|| EvaluationError::unresolved_target(&target.to_string()))?;

        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(try_value!(self.eval_expression(arg, cx)));
        }

        if !object.has_capability(method) {
            return Err(EvaluationError::capability_unsupported(
                object.name(),
                object.kind(),
                method,
            ));
        }

        trace!(object = object.name(), method, args = values.len(), "dispatch");
        object.invoke(&Call {
            target: &object,
            method,
            args: &values,
            this: cx.this.as_ref(),
            host: self.host,
        })
    }
}

fn eval_identifier(name: &str, cx: &ExecutionContext) -> Value {
    if let Some(value) = cx.positional(name) {
        return value;
    }
    match cx.lookup(name) {
        Some(object) => Value::Object(object),
        None if name == "THIS" => Value::Null,
        None => Value::String(name.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{engine_with, entries, new_log, script, Probe};
    use pik_core::{EvalErrorKind, Interrupt};
    use pretty_assertions::assert_eq;

    fn run(host: &dyn Host, source: &str) -> EvalResult {
        host.execute_callback(None, &script(source), vec![])
    }

    #[test]
    fn nested_call_result_is_passed_as_value() {
        let log = new_log();
        let engine = engine_with(vec![
            Probe::new("OUTER", &log).handle(),
            Probe::new("INNER", &log).with_value(42.0).handle(),
        ]);
        let result = run(&engine, "OUTER.MARK(INNER.GET())").expect("script should run");
        assert_eq!(result, Completion::Value(Value::from(42.0)));
        assert_eq!(entries(&log), vec!["OUTER:42".to_string()]);
    }

    #[test]
    fn arguments_evaluate_left_to_right_before_dispatch() {
        let log = new_log();
        let engine = engine_with(vec![Probe::new("P", &log).handle()]);
        run(&engine, "P.MARK(P.MARK(\"g\"), P.MARK(\"h\"))").expect("script should run");
        assert_eq!(
            entries(&log),
            vec!["P:g".to_string(), "P:h".to_string(), "P:g,h".to_string()]
        );
    }

    #[test]
    fn script_value_is_last_statement() {
        let engine = engine_with(vec![]);
        let result = run(&engine, "1; \"two\"; TRUE").expect("script should run");
        assert_eq!(result, Completion::Value(Value::Bool(true)));
    }

    #[test]
    fn interrupt_tunnels_through_nested_calls_untouched() {
        let log = new_log();
        let engine = engine_with(vec![Probe::new("P", &log).handle()]);
        let result = run(&engine, "P.MARK(P.MARK(P.MARK(P.SKIPIF()))); P.MARK(\"after\")")
            .expect("interrupt is not an error");
        assert_eq!(result, Completion::Interrupt(Interrupt::ContinueIteration));
        assert!(entries(&log).is_empty());
    }

    #[test]
    fn missing_target_is_unresolved() {
        let engine = engine_with(vec![]);
        let error = run(&engine, "GHOST.FOO()").expect_err("target is missing");
        assert_eq!(error.kind, EvalErrorKind::UnresolvedTarget);
    }

    #[test]
    fn missing_method_is_capability_unsupported() {
        let log = new_log();
        let engine = engine_with(vec![Probe::new("P", &log).handle()]);
        let error = run(&engine, "P.FOO()").expect_err("method is missing");
        assert_eq!(error.kind, EvalErrorKind::CapabilityUnsupported);
    }

    #[test]
    fn advertised_but_undispatched_method_is_unknown() {
        let log = new_log();
        let engine = engine_with(vec![Probe::new("P", &log).handle()]);
        let error = run(&engine, "P.BROKEN()").expect_err("method is not dispatched");
        assert_eq!(error.kind, EvalErrorKind::UnknownMethod);
    }

    #[test]
    fn arguments_are_evaluated_even_if_capability_is_missing() {
        let log = new_log();
        let engine = engine_with(vec![Probe::new("P", &log).handle()]);
        let error = run(&engine, "P.FOO(P.MARK(1))").expect_err("method is missing");
        assert_eq!(error.kind, EvalErrorKind::CapabilityUnsupported);
        assert_eq!(entries(&log), vec!["P:1".to_string()]);
    }

    #[test]
    fn identifiers_resolve_to_arguments_objects_or_text() {
        let log = new_log();
        let engine = engine_with(vec![Probe::new("P", &log).with_value(5.0).handle()]);
        let body = script("P.MARK($1, P, LABEL, $9)");
        engine
            .execute_callback(None, &body, vec![Value::from("arg")])
            .expect("script should run");
        assert_eq!(entries(&log), vec!["P:arg,5,LABEL,NULL".to_string()]);
    }
}
