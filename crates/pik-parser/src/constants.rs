use pik_core::{EvalErrorKind, EvaluationError, Expression, ScriptError, Value};

use crate::parser::parse_arguments;

/// Reads a definition-time argument list without any object context.
///
/// Bare identifiers evaluate to their own text. Method calls are rejected: there
/// is nothing to dispatch them to yet.
pub fn evaluate_constant_args(source: &str) -> Result<Vec<Value>, ScriptError> {
    let args = parse_arguments(source)?;
    let values = args
        .iter()
        .map(constant_value)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(values)
}

pub fn constant_value(expression: &Expression) -> Result<Value, EvaluationError> {
    match expression {
        Expression::Number { value } => Ok(Value::Number(*value)),
        Expression::String { value } => Ok(Value::String(value.clone())),
        Expression::Bool { value } => Ok(Value::Bool(*value)),
        Expression::Identifier { name } => Ok(Value::String(name.clone())),
        Expression::MethodCall { target, method, .. } => Err(EvaluationError::new(
            EvalErrorKind::NotConstant,
            format!(
                "Method call {}.{}() cannot appear in a constant argument list.",
                target, method
            ),
        )),
    }
}
