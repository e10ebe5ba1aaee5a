use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use pik_core::ObjectHandle;

pub type ScopeLayer = BTreeMap<String, ObjectHandle>;

/// Name to object mapping in two layers. Cloning is cheap and yields a snapshot:
/// replacing a layer never mutates the maps an earlier clone holds.
#[derive(Clone, Default)]
pub struct Scope {
    global: Rc<ScopeLayer>,
    local: Rc<ScopeLayer>,
}

impl Scope {
    pub fn new(global: Vec<ObjectHandle>) -> Self {
        Self {
            global: layer(global),
            local: Rc::default(),
        }
    }

    /// Same global layer, entirely new local layer.
    pub fn with_local(&self, local: Vec<ObjectHandle>) -> Self {
        Self {
            global: Rc::clone(&self.global),
            local: layer(local),
        }
    }

    /// Local first, then global.
    pub fn lookup(&self, name: &str) -> Option<ObjectHandle> {
        self.local
            .get(name)
            .or_else(|| self.global.get(name))
            .cloned()
    }

    pub fn local_objects(&self) -> impl Iterator<Item = &ObjectHandle> {
        self.local.values()
    }

    pub fn global_objects(&self) -> impl Iterator<Item = &ObjectHandle> {
        self.global.values()
    }
}

fn layer(objects: Vec<ObjectHandle>) -> Rc<ScopeLayer> {
    let mut entries = ScopeLayer::new();
    for object in objects {
        entries.insert(object.name().to_string(), object);
    }
    Rc::new(entries)
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("global", &self.global.keys().collect::<Vec<_>>())
            .field("local", &self.local.keys().collect::<Vec<_>>())
            .finish()
    }
}
