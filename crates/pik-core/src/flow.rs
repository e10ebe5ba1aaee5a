use crate::error::EvaluationError;
use crate::value::Value;

/// Non-error unwinding toward the nearest loop driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    ContinueIteration,
    BreakLoop,
}

/// Outcome of evaluating a node: a value, or an interrupt passing through.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Value(Value),
    Interrupt(Interrupt),
}

pub type EvalResult = Result<Completion, EvaluationError>;

impl Completion {
    pub fn null() -> Self {
        Self::Value(Value::Null)
    }

    pub fn is_interrupt(&self) -> bool {
        matches!(self, Self::Interrupt(_))
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Interrupt(_) => None,
        }
    }
}

impl From<Value> for Completion {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Interrupt> for Completion {
    fn from(interrupt: Interrupt) -> Self {
        Self::Interrupt(interrupt)
    }
}

/// Unwraps a value from an `EvalResult`, returning errors and interrupts to the
/// caller unchanged.
#[macro_export]
macro_rules! try_value {
    ($result:expr) => {
        match $result? {
            $crate::Completion::Value(value) => value,
            interrupt @ $crate::Completion::Interrupt(_) => return Ok(interrupt),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passthrough(input: EvalResult) -> EvalResult {
        let value = try_value!(input);
        Ok(Completion::Value(Value::String(format!("got {}", value.to_text()))))
    }

    #[test]
    fn try_value_unwraps_values() {
        let result = passthrough(Ok(Value::from(3.0).into())).expect("value should pass");
        assert_eq!(result, Completion::Value(Value::from("got 3")));
    }

    #[test]
    fn try_value_forwards_interrupts_untouched() {
        let result = passthrough(Ok(Interrupt::BreakLoop.into())).expect("interrupt is not error");
        assert_eq!(result, Completion::Interrupt(Interrupt::BreakLoop));
    }

    #[test]
    fn try_value_forwards_errors() {
        let error = passthrough(Err(EvaluationError::invalid_argument("x")))
            .expect_err("error should propagate");
        assert_eq!(error.code(), "EVAL_INVALID_ARGUMENT");
    }
}
