use std::collections::BTreeMap;
use std::rc::Rc;

use crate::types::Script;
use crate::value::Value;

/// One handler entry of a callback slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Callback {
    /// Code written directly in the definition, parsed once at load time.
    Inline(Rc<Script>),
    /// A behaviour object run by name, with constant arguments read at load time.
    Behaviour { name: String, args: Vec<Value> },
}

impl Callback {
    pub fn inline(script: Script) -> Self {
        Self::Inline(Rc::new(script))
    }
}

/// The handlers of a callback slot. Either part may be absent; when both are
/// present both fire, the nonparametrized entry first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallbackDefinition {
    pub nonparametrized: Option<Callback>,
    pub parametrized: BTreeMap<String, Callback>,
}

impl CallbackDefinition {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nonparametrized.is_none() && self.parametrized.is_empty()
    }

    pub fn with_nonparametrized(mut self, callback: Callback) -> Self {
        self.nonparametrized = Some(callback);
        self
    }

    pub fn with_parametrized(mut self, key: impl Into<Value>, callback: Callback) -> Self {
        self.parametrized.insert(key.into().to_key(), callback);
        self
    }

    pub fn entry(&self, key: &Value) -> Option<&Callback> {
        self.parametrized.get(&key.to_key())
    }
}
