use pik_core::{
    Completion, EvaluationError, Host, ObjectHandle, Script, ScriptError, SyntaxError, Value,
};
use pik_defs::{load_definitions, DefinitionError};
use pik_runtime::{ScriptEngine, ScriptEngineOptions};
use thiserror::Error;
use tracing::warn;

pub use pik_runtime::DEFAULT_MAX_CALL_DEPTH;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    #[error(transparent)]
    Definition(#[from] DefinitionError),
    #[error(transparent)]
    Script(#[from] ScriptError),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Definition(error) => error.code(),
            Self::Script(error) => error.code(),
        }
    }
}

impl From<EvaluationError> for ApiError {
    fn from(error: EvaluationError) -> Self {
        Self::Script(error.into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct CreateEngineOptions {
    /// Definition text for the global layer.
    pub global_definitions: String,
    /// Definition text of the first scene, entered right after the globals.
    pub scene_definitions: Option<String>,
    pub max_call_depth: Option<usize>,
}

/// Parses script text once so it can be run many times.
pub fn load_script(text: &str) -> Result<Script, SyntaxError> {
    pik_parser::parse_script(text)
}

/// Reads a definition-time argument list; no object exists yet, so method calls
/// are rejected.
pub fn evaluate_constant_args(text: &str) -> Result<Vec<Value>, ScriptError> {
    pik_parser::evaluate_constant_args(text)
}

/// Runs `script` as a top-level callback.
///
/// An interrupt that reaches this point had no loop around it: it ends the
/// callback early and the result is `Null`.
pub fn execute_callback(
    engine: &ScriptEngine,
    this: Option<ObjectHandle>,
    script: &Script,
    args: Vec<Value>,
) -> Result<Value, EvaluationError> {
    match engine.execute_callback(this, script, args) {
        Ok(Completion::Value(value)) => Ok(value),
        Ok(Completion::Interrupt(_)) => Ok(Value::Null),
        Err(error) => {
            warn!(code = error.code(), %error, "callback failed");
            Err(error)
        }
    }
}

pub fn create_engine_from_definitions(
    options: CreateEngineOptions,
) -> Result<ScriptEngine, ApiError> {
    let globals = load_definitions(&options.global_definitions)?;
    let engine_options = ScriptEngineOptions {
        max_call_depth: options.max_call_depth.unwrap_or(DEFAULT_MAX_CALL_DEPTH),
    };
    let engine = ScriptEngine::new(engine_options, globals)?;
    if let Some(scene) = options.scene_definitions {
        change_scene_from_definitions(&engine, &scene)?;
    }
    Ok(engine)
}

/// Loads a scene's definitions and swaps them in as the local layer. Returns the
/// names of the objects the previous scene dropped.
pub fn change_scene_from_definitions(
    engine: &ScriptEngine,
    text: &str,
) -> Result<Vec<String>, ApiError> {
    let objects = load_definitions(text)?;
    Ok(engine.change_scene(objects)?)
}
