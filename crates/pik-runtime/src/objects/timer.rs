use std::cell::Cell;
use std::rc::Rc;

use pik_core::{
    Call, CallbackDefinition, Completion, EvalResult, EvaluationError, Host, ObjectHandle,
    ScriptObject, Value,
};
use tracing::trace;

use crate::callback::fire_detached;

/// Fires `ONTICK` every `ELAPSE` milliseconds of engine time while enabled.
///
/// Time only advances through `tick`, so a timer is deterministic: it catches
/// up on every whole period the elapsed time covers, firing once per period.
pub struct Timer {
    name: String,
    elapse: Cell<f64>,
    enabled: Cell<bool>,
    elapsed: Cell<f64>,
    ticks: Cell<u64>,
    on_tick: CallbackDefinition,
    on_init: CallbackDefinition,
}

impl Timer {
    pub fn new(name: &str, elapse_ms: f64) -> Self {
        Self {
            name: name.to_string(),
            elapse: Cell::new(elapse_ms),
            enabled: Cell::new(true),
            elapsed: Cell::new(0.0),
            ticks: Cell::new(0),
            on_tick: CallbackDefinition::none(),
            on_init: CallbackDefinition::none(),
        }
    }

    pub fn with_enabled(self, enabled: bool) -> Self {
        self.enabled.set(enabled);
        self
    }

    pub fn with_on_tick(mut self, on_tick: CallbackDefinition) -> Self {
        self.on_tick = on_tick;
        self
    }

    pub fn with_on_init(mut self, on_init: CallbackDefinition) -> Self {
        self.on_init = on_init;
        self
    }

    pub fn handle(self) -> ObjectHandle {
        Rc::new(self)
    }

    fn reset(&self) {
        self.elapsed.set(0.0);
        self.ticks.set(0);
    }

    fn due_ticks(&self) -> u64 {
        let elapse = self.elapse.get();
        if elapse <= 0.0 {
            return 0;
        }
        (self.elapsed.get() / elapse).floor() as u64
    }
}

impl ScriptObject for Timer {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "TIMER"
    }

    fn methods(&self) -> &'static [&'static str] {
        &["ENABLE", "DISABLE", "RESET", "SETELAPSE", "GETTICKS"]
    }

    fn invoke(&self, call: &Call<'_>) -> EvalResult {
        match call.method {
            "ENABLE" => self.enabled.set(true),
            "DISABLE" => self.enabled.set(false),
            "RESET" => self.reset(),
            "SETELAPSE" => {
                call.expect_arity(1, Some(1))?;
                self.elapse.set(call.number(0)?);
            }
            "GETTICKS" => return Ok(Value::Number(self.ticks.get() as f64).into()),
            _ => return Err(call.unknown_method()),
        }
        Ok(Completion::null())
    }

    fn value(&self) -> Value {
        Value::Number(self.ticks.get() as f64)
    }

    fn ready(&self, me: &ObjectHandle, host: &dyn Host) -> Result<(), EvaluationError> {
        self.reset();
        if self.enabled.get() {
            fire_detached(host, Some(me), &self.on_init, None, vec![])?;
        }
        Ok(())
    }

    fn tick(
        &self,
        me: &ObjectHandle,
        host: &dyn Host,
        elapsed_ms: f64,
    ) -> Result<(), EvaluationError> {
        if !self.enabled.get() {
            return Ok(());
        }
        self.elapsed.set(self.elapsed.get() + elapsed_ms);
        // A handler may disable or reset the timer between periods.
        while self.enabled.get() && self.ticks.get() < self.due_ticks() {
            let count = self.ticks.get() + 1;
            self.ticks.set(count);
            trace!(timer = %self.name, count, "timer tick");
            let key = Value::Number(count as f64);
            fire_detached(host, Some(me), &self.on_tick, Some(&key), vec![])?;
        }
        Ok(())
    }

    fn destroy(&self) {
        self.enabled.set(false);
    }
}
