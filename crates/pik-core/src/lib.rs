pub mod callback;
pub mod error;
pub mod flow;
pub mod object;
pub mod types;
pub mod value;

pub use callback::{Callback, CallbackDefinition};
pub use error::{EvalErrorKind, EvaluationError, ScriptError, SyntaxError};
pub use flow::{Completion, EvalResult, Interrupt};
pub use object::{Call, Host, ScriptObject};
pub use types::*;
pub use value::{ObjectHandle, Value};
