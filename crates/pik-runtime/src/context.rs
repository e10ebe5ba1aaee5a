use pik_core::{ObjectHandle, ObjectRef, Value};

use crate::scope::Scope;

/// State threaded through one invocation: who `THIS` is, the scope snapshot and
/// the callback arguments. Each invocation owns its own context.
#[derive(Clone)]
pub struct ExecutionContext {
    pub this: Option<ObjectHandle>,
    pub scope: Scope,
    pub args: Vec<Value>,
}

impl ExecutionContext {
    pub fn new(this: Option<ObjectHandle>, scope: Scope, args: Vec<Value>) -> Self {
        Self { this, scope, args }
    }

    pub fn resolve(&self, target: &ObjectRef) -> Option<ObjectHandle> {
        match target.scope_key() {
            Some(name) => self.scope.lookup(&name),
            None => self.this.clone(),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<ObjectHandle> {
        if name == "THIS" {
            return self.this.clone();
        }
        self.scope.lookup(name)
    }

    /// `$1`, `$2`, ... read callback arguments; past the end they read `Null`.
    pub fn positional(&self, name: &str) -> Option<Value> {
        let index = name.strip_prefix('$')?.parse::<usize>().ok()?;
        if index == 0 {
            return None;
        }
        Some(self.args.get(index - 1).cloned().unwrap_or_default())
    }
}
