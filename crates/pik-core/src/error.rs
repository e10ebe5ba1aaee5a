use serde::Serialize;
use thiserror::Error;

use crate::types::SourceSpan;

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{message} at line {}, column {}", span.start.line, span.start.column)]
pub struct SyntaxError {
    pub message: String,
    pub span: SourceSpan,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, span: SourceSpan) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    pub fn code(&self) -> &'static str {
        "SYNTAX_ERROR"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EvalErrorKind {
    UnresolvedTarget,
    UnknownMethod,
    ArityMismatch,
    CapabilityUnsupported,
    InvalidArgument,
    CallDepthExceeded,
    NotConstant,
}

impl EvalErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            Self::UnresolvedTarget => "EVAL_UNRESOLVED_TARGET",
            Self::UnknownMethod => "EVAL_UNKNOWN_METHOD",
            Self::ArityMismatch => "EVAL_ARITY_MISMATCH",
            Self::CapabilityUnsupported => "EVAL_CAPABILITY_UNSUPPORTED",
            Self::InvalidArgument => "EVAL_INVALID_ARGUMENT",
            Self::CallDepthExceeded => "EVAL_CALL_DEPTH_EXCEEDED",
            Self::NotConstant => "EVAL_NOT_CONSTANT",
        }
    }
}

/// A genuine evaluation failure. Loop interrupts never travel through this type.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{}: {message}", kind.code())]
pub struct EvaluationError {
    pub kind: EvalErrorKind,
    pub message: String,
}

impl EvaluationError {
    pub fn new(kind: EvalErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unresolved_target(name: &str) -> Self {
        Self::new(
            EvalErrorKind::UnresolvedTarget,
            format!("Object \"{}\" is not defined in scope.", name),
        )
    }

    pub fn capability_unsupported(object: &str, kind: &str, method: &str) -> Self {
        Self::new(
            EvalErrorKind::CapabilityUnsupported,
            format!(
                "Object \"{}\" of type {} has no method \"{}\".",
                object, kind, method
            ),
        )
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(EvalErrorKind::InvalidArgument, message)
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScriptError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

impl ScriptError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Syntax(error) => error.code(),
            Self::Evaluation(error) => error.code(),
        }
    }
}
