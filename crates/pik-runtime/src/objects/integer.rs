use std::cell::Cell;
use std::rc::Rc;

use pik_core::{
    Call, CallbackDefinition, Completion, EvalResult, EvaluationError, ObjectHandle, ScriptObject,
    Value,
};

use crate::callback::fire;

pub struct Integer {
    name: String,
    value: Cell<i64>,
    on_changed: CallbackDefinition,
}

impl Integer {
    pub fn new(name: &str, value: i64) -> Self {
        Self {
            name: name.to_string(),
            value: Cell::new(value),
            on_changed: CallbackDefinition::none(),
        }
    }

    pub fn with_on_changed(mut self, on_changed: CallbackDefinition) -> Self {
        self.on_changed = on_changed;
        self
    }

    pub fn handle(self) -> ObjectHandle {
        Rc::new(self)
    }

    pub fn get(&self) -> i64 {
        self.value.get()
    }

    /// Stores `value` and fires `ONCHANGED` keyed by it. The cell is written
    /// before the callback runs, so handlers reading this integer see the new
    /// value. An interrupt raised by a handler is returned from the method.
    fn update(&self, call: &Call<'_>, value: i64) -> EvalResult {
        self.value.set(value);
        let outcome = fire(
            call.host,
            Some(call.target),
            &self.on_changed,
            Some(&Value::from(value as f64)),
            vec![],
        )?;
        if outcome.is_interrupt() {
            return Ok(outcome);
        }
        Ok(Completion::null())
    }

    fn operand(call: &Call<'_>, index: usize) -> Result<i64, EvaluationError> {
        call.number(index).map(|number| number as i64)
    }

    fn divisor(call: &Call<'_>) -> Result<i64, EvaluationError> {
        match Self::operand(call, 0)? {
            0 => Err(EvaluationError::invalid_argument(format!(
                "{}.{} by zero.",
                call.target.name(),
                call.method
            ))),
            divisor => Ok(divisor),
        }
    }
}

impl ScriptObject for Integer {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "INTEGER"
    }

    fn methods(&self) -> &'static [&'static str] {
        &[
            "INC", "DEC", "ADD", "SUB", "MUL", "DIV", "MOD", "CLAMP", "SET", "GET",
        ]
    }

    fn invoke(&self, call: &Call<'_>) -> EvalResult {
        let current = self.value.get();
        match call.method {
            "INC" => self.update(call, current.wrapping_add(1)),
            "DEC" => self.update(call, current.wrapping_sub(1)),
            "ADD" => {
                call.expect_arity(1, Some(1))?;
                self.update(call, current.wrapping_add(Self::operand(call, 0)?))
            }
            "SUB" => {
                call.expect_arity(1, Some(1))?;
                self.update(call, current.wrapping_sub(Self::operand(call, 0)?))
            }
            "MUL" => {
                call.expect_arity(1, Some(1))?;
                self.update(call, current.wrapping_mul(Self::operand(call, 0)?))
            }
            "DIV" => {
                call.expect_arity(1, Some(1))?;
                self.update(call, current.wrapping_div(Self::divisor(call)?))
            }
            "MOD" => {
                call.expect_arity(1, Some(1))?;
                self.update(call, current.wrapping_rem(Self::divisor(call)?))
            }
            "CLAMP" => {
                call.expect_arity(2, Some(2))?;
                let min = Self::operand(call, 0)?;
                let max = Self::operand(call, 1)?;
                self.update(call, current.max(min).min(max))
            }
            "SET" => {
                call.expect_arity(1, Some(1))?;
                self.update(call, Self::operand(call, 0)?)
            }
            "GET" => Ok(self.value().into()),
            _ => Err(call.unknown_method()),
        }
    }

    fn value(&self) -> Value {
        Value::Number(self.value.get() as f64)
    }
}
