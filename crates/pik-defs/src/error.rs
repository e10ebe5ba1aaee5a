use pik_core::ScriptError;
use thiserror::Error;

/// Everything that can go wrong while reading a definition file. Every variant
/// carries the 1-based line it was found on.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DefinitionError {
    #[error("line {line}: cannot read definition line \"{text}\"")]
    MalformedLine { line: usize, text: String },
    #[error("line {line}: field set on undeclared object \"{object}\"")]
    UndeclaredObject { line: usize, object: String },
    #[error("line {line}: object \"{object}\" is already declared")]
    DuplicateObject { line: usize, object: String },
    #[error("line {line}: unknown object type \"{kind}\" for \"{object}\"")]
    UnknownType {
        line: usize,
        object: String,
        kind: String,
    },
    #[error("line {line}: {object} has no {field}")]
    MissingField {
        line: usize,
        object: String,
        field: String,
    },
    #[error("line {line}: {object}:{field} {message}")]
    InvalidField {
        line: usize,
        object: String,
        field: String,
        message: String,
    },
    #[error("line {line}: {object}:{field}: {source}")]
    Script {
        line: usize,
        object: String,
        field: String,
        #[source]
        source: ScriptError,
    },
}

impl DefinitionError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedLine { .. } => "DEFS_MALFORMED_LINE",
            Self::UndeclaredObject { .. } => "DEFS_UNDECLARED_OBJECT",
            Self::DuplicateObject { .. } => "DEFS_DUPLICATE_OBJECT",
            Self::UnknownType { .. } => "DEFS_UNKNOWN_TYPE",
            Self::MissingField { .. } => "DEFS_MISSING_FIELD",
            Self::InvalidField { .. } => "DEFS_INVALID_FIELD",
            Self::Script { .. } => "DEFS_SCRIPT_ERROR",
        }
    }

    pub fn line(&self) -> usize {
        match self {
            Self::MalformedLine { line, .. }
            | Self::UndeclaredObject { line, .. }
            | Self::DuplicateObject { line, .. }
            | Self::UnknownType { line, .. }
            | Self::MissingField { line, .. }
            | Self::InvalidField { line, .. }
            | Self::Script { line, .. } => *line,
        }
    }
}
