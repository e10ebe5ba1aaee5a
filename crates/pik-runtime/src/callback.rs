use pik_core::{
    Call, Callback, CallbackDefinition, Completion, EvalResult, EvaluationError, Host,
    ObjectHandle, Value,
};
use tracing::debug;

/// Fires a callback slot for one trigger.
///
/// The nonparametrized entry runs first, then the parametrized entry for `key`
/// if there is one. Missing entries are a silent no-op. An interrupt from the
/// first entry stops the second one and is returned unchanged.
pub fn fire(
    host: &dyn Host,
    this: Option<&ObjectHandle>,
    definition: &CallbackDefinition,
    key: Option<&Value>,
    args: Vec<Value>,
) -> EvalResult {
    let parametrized = key.and_then(|key| definition.entry(key));
    let mut last = Completion::null();

    if let Some(callback) = &definition.nonparametrized {
        last = run_callback(host, this, callback, args.clone())?;
        if last.is_interrupt() {
            return Ok(last);
        }
    }

    if let Some(callback) = parametrized {
        debug!(key = %key.map(pik_core::Value::to_key).unwrap_or_default(), "parametrized callback");
        last = run_callback(host, this, callback, args)?;
    }

    Ok(last)
}

/// Same as [`fire`] but for triggers that have no loop around them: interrupts
/// end the callback and go no further.
pub fn fire_detached(
    host: &dyn Host,
    this: Option<&ObjectHandle>,
    definition: &CallbackDefinition,
    key: Option<&Value>,
    args: Vec<Value>,
) -> Result<(), EvaluationError> {
    fire(host, this, definition, key, args)?;
    Ok(())
}

pub fn run_callback(
    host: &dyn Host,
    this: Option<&ObjectHandle>,
    callback: &Callback,
    args: Vec<Value>,
) -> EvalResult {
    match callback {
        Callback::Inline(script) => host.execute_callback(this.cloned(), script, args),
        Callback::Behaviour {
            name,
            args: bound_args,
        } => {
            let behaviour = host
                .resolve(name)
                .ok_or_else(|| EvaluationError::unresolved_target(name))?;
            if !behaviour.has_capability("RUN") {
                return Err(EvaluationError::capability_unsupported(
                    behaviour.name(),
                    behaviour.kind(),
                    "RUN",
                ));
            }
            let mut all_args = bound_args.clone();
            all_args.extend(args);
            behaviour.invoke(&Call {
                target: &behaviour,
                method: "RUN",
                args: &all_args,
                this,
                host,
            })
        }
    }
}
