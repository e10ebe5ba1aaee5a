use crate::error::{EvalErrorKind, EvaluationError};
use crate::flow::EvalResult;
use crate::types::Script;
use crate::value::{ObjectHandle, Value};

/// What object kinds can reach back into while they run.
pub trait Host {
    /// Local-then-global lookup. A missing name is `None`, never an error.
    fn resolve(&self, name: &str) -> Option<ObjectHandle>;

    /// Runs `script` in a fresh execution context. Interrupts come back as
    /// `Completion::Interrupt`, errors as `Err`.
    fn execute_callback(
        &self,
        this: Option<ObjectHandle>,
        script: &Script,
        args: Vec<Value>,
    ) -> EvalResult;
}

/// One capability dispatch: the resolved receiver, the method name and the
/// already evaluated arguments.
pub struct Call<'a> {
    pub target: &'a ObjectHandle,
    pub method: &'a str,
    pub args: &'a [Value],
    /// `THIS` of the calling script, if any.
    pub this: Option<&'a ObjectHandle>,
    pub host: &'a dyn Host,
}

impl<'a> Call<'a> {
    pub fn arg(&self, index: usize) -> Option<&'a Value> {
        self.args.get(index)
    }

    pub fn rest(&self, from: usize) -> Vec<Value> {
        self.args.iter().skip(from).cloned().collect()
    }

    pub fn expect_arity(&self, min: usize, max: Option<usize>) -> Result<(), EvaluationError> {
        let count = self.args.len();
        let too_many = max.is_some_and(|max| count > max);
        if count >= min && !too_many {
            return Ok(());
        }
        let expected = match max {
            Some(max) if max == min => format!("{}", min),
            Some(max) => format!("{}..{}", min, max),
            None => format!("at least {}", min),
        };
        Err(EvaluationError::new(
            EvalErrorKind::ArityMismatch,
            format!(
                "{}.{} expects {} argument(s), got {}.",
                self.target.name(),
                self.method,
                expected,
                count
            ),
        ))
    }

    pub fn number(&self, index: usize) -> Result<f64, EvaluationError> {
        let Some(value) = self.arg(index) else {
            return Err(EvaluationError::new(
                EvalErrorKind::ArityMismatch,
                format!(
                    "{}.{} is missing argument {}.",
                    self.target.name(),
                    self.method,
                    index + 1
                ),
            ));
        };
        value.to_number().ok_or_else(|| {
            EvaluationError::invalid_argument(format!(
                "{}.{} argument {} must be numeric, got {:?}.",
                self.target.name(),
                self.method,
                index + 1,
                value
            ))
        })
    }

    pub fn number_or(&self, index: usize, default: f64) -> Result<f64, EvaluationError> {
        if self.arg(index).is_none() {
            return Ok(default);
        }
        self.number(index)
    }

    pub fn bool_or(&self, index: usize, default: bool) -> Result<bool, EvaluationError> {
        let Some(value) = self.arg(index) else {
            return Ok(default);
        };
        value.to_bool().ok_or_else(|| {
            EvaluationError::invalid_argument(format!(
                "{}.{} argument {} must be boolean, got {:?}.",
                self.target.name(),
                self.method,
                index + 1,
                value
            ))
        })
    }

    /// Fall-through for methods an object advertises but does not dispatch.
    pub fn unknown_method(&self) -> EvaluationError {
        EvaluationError::new(
            EvalErrorKind::UnknownMethod,
            format!(
                "{} \"{}\" does not implement \"{}\".",
                self.target.kind(),
                self.target.name(),
                self.method
            ),
        )
    }
}

/// A live object of the scene graph. Dispatch is by capability name only; the
/// evaluator never looks at concrete kinds.
///
/// Methods take `&self`: a script run by one object may call back into the same
/// object, so state lives behind `Cell`/`RefCell` and no borrow may be held
/// across a callback.
pub trait ScriptObject {
    fn name(&self) -> &str;

    fn kind(&self) -> &'static str;

    /// Capability table.
    fn methods(&self) -> &'static [&'static str];

    fn has_capability(&self, method: &str) -> bool {
        self.methods().contains(&method)
    }

    fn invoke(&self, call: &Call<'_>) -> EvalResult;

    /// Current value when the object is used where a scalar is expected.
    fn value(&self) -> Value {
        Value::Null
    }

    /// Called once the object is reachable through the scope.
    fn ready(&self, _me: &ObjectHandle, _host: &dyn Host) -> Result<(), EvaluationError> {
        Ok(())
    }

    fn tick(
        &self,
        _me: &ObjectHandle,
        _host: &dyn Host,
        _elapsed_ms: f64,
    ) -> Result<(), EvaluationError> {
        Ok(())
    }

    /// Called after the object has left the scope for good.
    fn destroy(&self) {}
}
