//! Tree-walking runtime: scope, evaluator, callbacks and the built-in object
//! kinds.

mod callback;
mod context;
mod engine;
mod eval;
mod looping;
pub mod objects;
mod scope;
#[cfg(test)]
mod test_support;

pub use callback::{fire, fire_detached, run_callback};
pub use context::ExecutionContext;
pub use engine::{ScriptEngine, ScriptEngineOptions, DEFAULT_MAX_CALL_DEPTH};
pub use eval::Evaluator;
pub use looping::{drive_loop, stepped_range, LoopSummary};
pub use scope::{Scope, ScopeLayer};
