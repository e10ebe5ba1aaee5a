use std::rc::Rc;

use pik_core::{
    try_value, Call, Completion, EvalResult, EvaluationError, Host, ObjectHandle, Script,
    ScriptObject, Value,
};
use tracing::debug;

use crate::looping::{drive_loop, stepped_range};

/// Name that makes a behaviour run once as soon as it is ready.
pub const INIT_BEHAVIOUR: &str = "__INIT__";

/// A named piece of code other objects and callbacks can run.
pub struct Behaviour {
    name: String,
    code: Rc<Script>,
    condition: Option<String>,
}

impl Behaviour {
    pub fn new(name: &str, code: Rc<Script>) -> Self {
        Self {
            name: name.to_string(),
            code,
            condition: None,
        }
    }

    /// Guards `RUNC` and every `RUNLOOPED` iteration with the named condition.
    pub fn with_condition(mut self, condition: &str) -> Self {
        self.condition = Some(condition.to_string());
        self
    }

    pub fn handle(self) -> ObjectHandle {
        Rc::new(self)
    }

    /// Runs the body once. Interrupts end the body and stop here.
    fn run(&self, host: &dyn Host, this: &ObjectHandle, args: Vec<Value>) -> EvalResult {
        match host.execute_callback(Some(Rc::clone(this)), &self.code, args)? {
            Completion::Interrupt(_) => Ok(Completion::null()),
            value => Ok(value),
        }
    }

    /// Checks the guard condition, firing its outcome callbacks. An interrupt
    /// raised by one of those callbacks comes back instead of the outcome.
    fn check_guard(&self, host: &dyn Host, this: &ObjectHandle) -> EvalResult {
        let Some(name) = &self.condition else {
            return Ok(Value::Bool(true).into());
        };
        let condition = host
            .resolve(name)
            .ok_or_else(|| EvaluationError::unresolved_target(name))?;
        if !condition.has_capability("CHECK") {
            return Err(EvaluationError::capability_unsupported(
                condition.name(),
                condition.kind(),
                "CHECK",
            ));
        }
        let args = [Value::Bool(true)];
        condition.invoke(&Call {
            target: &condition,
            method: "CHECK",
            args: &args,
            this: Some(this),
            host,
        })
    }

    fn run_looped(&self, call: &Call<'_>, this: &ObjectHandle) -> EvalResult {
        call.expect_arity(2, None)?;
        let start = call.number(0)?;
        let len = call.number(1)?;
        let step = call.number_or(2, 1.0)?;
        let extra = call.rest(3);

        let summary = drive_loop(stepped_range(start, len, step)?, |index| {
            let open = try_value!(self.check_guard(call.host, this));
            if open.to_bool() != Some(true) {
                return Ok(Completion::null());
            }
            let mut args = vec![Value::Number(index), Value::Number(step)];
            args.extend(extra.iter().cloned());
            call.host
                .execute_callback(Some(Rc::clone(this)), &self.code, args)
        })?;
        debug!(
            behaviour = %self.name,
            completed = summary.completed,
            skipped = summary.skipped,
            broken = summary.broken,
            "loop finished"
        );
        Ok(Completion::null())
    }
}

impl ScriptObject for Behaviour {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "BEHAVIOUR"
    }

    fn methods(&self) -> &'static [&'static str] {
        &["RUN", "RUNC", "RUNLOOPED"]
    }

    fn invoke(&self, call: &Call<'_>) -> EvalResult {
        // The body sees the caller's THIS; a behaviour run from outside any
        // object is its own THIS.
        let this = call.this.unwrap_or(call.target);
        match call.method {
            "RUN" => self.run(call.host, this, call.args.to_vec()),
            "RUNC" => match self.check_guard(call.host, this)? {
                Completion::Value(open) if open.to_bool() == Some(true) => {
                    self.run(call.host, this, call.args.to_vec())
                }
                _ => Ok(Completion::null()),
            },
            "RUNLOOPED" => self.run_looped(call, this),
            _ => Err(call.unknown_method()),
        }
    }

    fn ready(&self, me: &ObjectHandle, host: &dyn Host) -> Result<(), EvaluationError> {
        if self.name == INIT_BEHAVIOUR {
            debug!("running init behaviour");
            self.run(host, me, vec![])?;
        }
        Ok(())
    }
}
