use std::cell::RefCell;
use std::rc::Rc;

use pik_core::{Call, Completion, EvalResult, Interrupt, ObjectHandle, ScriptObject, Value};
use pik_parser::parse_script;

use crate::engine::{ScriptEngine, ScriptEngineOptions};

pub(crate) type Log = Rc<RefCell<Vec<String>>>;

/// Records every call it receives and raises interrupts on request.
pub(crate) struct Probe {
    name: String,
    value: Value,
    log: Log,
}

impl Probe {
    pub(crate) fn new(name: &str, log: &Log) -> Self {
        Self {
            name: name.to_string(),
            value: Value::Null,
            log: Rc::clone(log),
        }
    }

    pub(crate) fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self
    }

    pub(crate) fn handle(self) -> ObjectHandle {
        Rc::new(self)
    }

    fn matches(call: &Call<'_>) -> bool {
        match (call.arg(0), call.arg(1)) {
            (Some(left), Some(right)) => left.to_text() == right.to_text(),
            _ => true,
        }
    }
}

impl ScriptObject for Probe {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "PROBE"
    }

    fn methods(&self) -> &'static [&'static str] {
        &["MARK", "GET", "SKIPIF", "STOPIF", "BROKEN"]
    }

    fn invoke(&self, call: &Call<'_>) -> EvalResult {
        match call.method {
            "MARK" => {
                let texts = call.args.iter().map(Value::to_text).collect::<Vec<_>>();
                self.log
                    .borrow_mut()
                    .push(format!("{}:{}", self.name, texts.join(",")));
                Ok(call.arg(0).cloned().unwrap_or_default().into())
            }
            "GET" => Ok(self.value.clone().into()),
            "SKIPIF" if Self::matches(call) => Ok(Interrupt::ContinueIteration.into()),
            "STOPIF" if Self::matches(call) => Ok(Interrupt::BreakLoop.into()),
            "SKIPIF" | "STOPIF" => Ok(Completion::null()),
            _ => Err(call.unknown_method()),
        }
    }

    fn value(&self) -> Value {
        self.value.clone()
    }
}

pub(crate) fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

pub(crate) fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

pub(crate) fn engine_with(globals: Vec<ObjectHandle>) -> ScriptEngine {
    ScriptEngine::new(ScriptEngineOptions::default(), globals).expect("engine should build")
}

pub(crate) fn script(source: &str) -> Rc<pik_core::Script> {
    Rc::new(parse_script(source).expect("test script should parse"))
}
