use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use pik_core::{
    Call, CallbackDefinition, EvalResult, EvaluationError, Host, Interrupt, ObjectHandle,
    ScriptObject, Value,
};

use crate::callback::fire;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "EQUAL",
            Self::NotEqual => "NOTEQUAL",
            Self::Less => "LESS",
            Self::Greater => "GREATER",
            Self::LessEqual => "LESSEQUAL",
            Self::GreaterEqual => "GREATEREQUAL",
        }
    }

    fn holds(self, ordering: Ordering) -> bool {
        match self {
            Self::Equal => ordering == Ordering::Equal,
            Self::NotEqual => ordering != Ordering::Equal,
            Self::Less => ordering == Ordering::Less,
            Self::Greater => ordering == Ordering::Greater,
            Self::LessEqual => ordering != Ordering::Greater,
            Self::GreaterEqual => ordering != Ordering::Less,
        }
    }

    fn is_equality(self) -> bool {
        matches!(self, Self::Equal | Self::NotEqual)
    }
}

impl FromStr for Operator {
    type Err = EvaluationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "EQUAL" => Ok(Self::Equal),
            "NOTEQUAL" => Ok(Self::NotEqual),
            "LESS" => Ok(Self::Less),
            "GREATER" => Ok(Self::Greater),
            "LESSEQUAL" => Ok(Self::LessEqual),
            "GREATEREQUAL" => Ok(Self::GreaterEqual),
            other => Err(EvaluationError::invalid_argument(format!(
                "Unknown condition operator \"{}\".",
                other
            ))),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compares two operands. Operands that name an object in scope are read
/// through that object's value at check time.
pub struct Condition {
    name: String,
    operand1: Value,
    operator: Operator,
    operand2: Value,
    on_success: CallbackDefinition,
    on_failed: CallbackDefinition,
}

impl Condition {
    pub fn new(name: &str, operand1: Value, operator: Operator, operand2: Value) -> Self {
        Self {
            name: name.to_string(),
            operand1,
            operator,
            operand2,
            on_success: CallbackDefinition::none(),
            on_failed: CallbackDefinition::none(),
        }
    }

    pub fn with_on_success(mut self, on_success: CallbackDefinition) -> Self {
        self.on_success = on_success;
        self
    }

    pub fn with_on_failed(mut self, on_failed: CallbackDefinition) -> Self {
        self.on_failed = on_failed;
        self
    }

    pub fn handle(self) -> ObjectHandle {
        Rc::new(self)
    }

    fn operand(&self, host: &dyn Host, operand: &Value) -> Value {
        match operand {
            Value::String(name) => match host.resolve(name) {
                Some(object) => object.value(),
                None => operand.clone(),
            },
            other => other.resolved(),
        }
    }

    fn evaluate(&self, host: &dyn Host) -> Result<bool, EvaluationError> {
        let left = self.operand(host, &self.operand1);
        let right = self.operand(host, &self.operand2);
        let ordering = match (left.to_number(), right.to_number()) {
            (Some(left), Some(right)) => left.partial_cmp(&right),
            _ if self.operator.is_equality() => Some(left.to_text().cmp(&right.to_text())),
            _ => None,
        };
        let ordering = ordering.ok_or_else(|| {
            EvaluationError::invalid_argument(format!(
                "Condition \"{}\" cannot order {} and {} with {}.",
                self.name,
                left.to_text(),
                right.to_text(),
                self.operator
            ))
        })?;
        Ok(self.operator.holds(ordering))
    }

    /// Returns the outcome, or an interrupt raised by the outcome callback.
    fn check(&self, call: &Call<'_>, notify: bool) -> EvalResult {
        let passed = self.evaluate(call.host)?;
        if notify {
            let callbacks = if passed {
                &self.on_success
            } else {
                &self.on_failed
            };
            let outcome = fire(call.host, Some(call.target), callbacks, None, vec![])?;
            if outcome.is_interrupt() {
                return Ok(outcome);
            }
        }
        Ok(Value::Bool(passed).into())
    }

    /// Raises `interrupt` when the check comes out as the expected outcome.
    fn interrupt_if(&self, call: &Call<'_>, interrupt: Interrupt) -> EvalResult {
        call.expect_arity(0, Some(1))?;
        let expected = call.bool_or(0, true)?;
        let passed = self.evaluate(call.host)?;
        if passed == expected {
            return Ok(interrupt.into());
        }
        Ok(Value::Bool(passed).into())
    }
}

impl ScriptObject for Condition {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "CONDITION"
    }

    fn methods(&self) -> &'static [&'static str] {
        &["CHECK", "BREAK", "ONE_BREAK"]
    }

    fn invoke(&self, call: &Call<'_>) -> EvalResult {
        match call.method {
            "CHECK" => {
                call.expect_arity(0, Some(1))?;
                let notify = call.bool_or(0, false)?;
                self.check(call, notify)
            }
            "BREAK" => self.interrupt_if(call, Interrupt::BreakLoop),
            "ONE_BREAK" => self.interrupt_if(call, Interrupt::ContinueIteration),
            _ => Err(call.unknown_method()),
        }
    }
}
