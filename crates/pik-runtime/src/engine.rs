use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pik_core::{EvalErrorKind, EvalResult, EvaluationError, Host, ObjectHandle, Script, Value};
use tracing::{debug, trace};

use crate::context::ExecutionContext;
use crate::eval::Evaluator;
use crate::scope::Scope;

pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

#[derive(Debug, Clone)]
pub struct ScriptEngineOptions {
    /// Nested callback invocations allowed before evaluation fails.
    pub max_call_depth: usize,
}

impl Default for ScriptEngineOptions {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

/// Owns the scope and runs callbacks against it.
///
/// Single threaded and synchronous. A top-level invocation captures the scope
/// once; re-entrant invocations made while it runs see the same snapshot, so a
/// scene change requested mid-script only shows up for the next top-level call.
pub struct ScriptEngine {
    options: ScriptEngineOptions,
    scope: RefCell<Scope>,
    active: RefCell<Option<Scope>>,
    depth: Cell<usize>,
}

impl ScriptEngine {
    /// Builds the global layer and readies its objects.
    pub fn new(
        options: ScriptEngineOptions,
        globals: Vec<ObjectHandle>,
    ) -> Result<Self, EvaluationError> {
        let engine = Self {
            options,
            scope: RefCell::new(Scope::new(globals.clone())),
            active: RefCell::new(None),
            depth: Cell::new(0),
        };
        for object in &globals {
            object.ready(object, &engine)?;
        }
        Ok(engine)
    }

    pub fn options(&self) -> &ScriptEngineOptions {
        &self.options
    }

    /// Snapshot of the current scope.
    pub fn scope(&self) -> Scope {
        self.scope.borrow().clone()
    }

    /// Replaces the whole local layer.
    ///
    /// Incoming objects are readied in the given order; afterwards every object of
    /// the old layer that did not carry over is destroyed. Returns the names of
    /// the objects that were dropped.
    pub fn change_scene(&self, objects: Vec<ObjectHandle>) -> Result<Vec<String>, EvaluationError> {
        let (previous, next) = {
            let mut scope = self.scope.borrow_mut();
            let previous = scope.local_objects().cloned().collect::<Vec<_>>();
            *scope = scope.with_local(objects.clone());
            (previous, scope.clone())
        };
        debug!(
            dropped = previous.len(),
            added = objects.len(),
            "scene changed"
        );

        // Inside a running script the incoming objects are readied against the
        // new scope; the running script keeps its own snapshot afterwards.
        let outer = self
            .active
            .borrow_mut()
            .as_mut()
            .map(|active| std::mem::replace(active, next));
        let readied = objects
            .iter()
            .try_for_each(|object| object.ready(object, self));
        if let Some(outer) = outer {
            *self.active.borrow_mut() = Some(outer);
        }

        let mut dropped = Vec::new();
        for object in previous {
            if objects.iter().any(|kept| Rc::ptr_eq(kept, &object)) {
                continue;
            }
            object.destroy();
            dropped.push(object.name().to_string());
        }

        readied.map(|_| dropped)
    }

    /// Advances every object by `elapsed_ms`, local layer first.
    pub fn tick(&self, elapsed_ms: f64) -> Result<(), EvaluationError> {
        let scope = self.scope();
        for object in scope.local_objects().chain(scope.global_objects()) {
            object.tick(object, self, elapsed_ms)?;
        }
        Ok(())
    }

    fn invocation_scope(&self) -> Scope {
        match self.active.borrow().as_ref() {
            Some(snapshot) => snapshot.clone(),
            None => self.scope(),
        }
    }
}

impl Host for ScriptEngine {
    fn resolve(&self, name: &str) -> Option<ObjectHandle> {
        self.invocation_scope().lookup(name)
    }

    fn execute_callback(
        &self,
        this: Option<ObjectHandle>,
        script: &Script,
        args: Vec<Value>,
    ) -> EvalResult {
        let depth = self.depth.get();
        if depth >= self.options.max_call_depth {
            return Err(EvaluationError::new(
                EvalErrorKind::CallDepthExceeded,
                format!(
                    "Callback nesting exceeded {} levels.",
                    self.options.max_call_depth
                ),
            ));
        }

        let scope = if depth == 0 {
            let snapshot = self.scope();
            *self.active.borrow_mut() = Some(snapshot.clone());
            snapshot
        } else {
            self.invocation_scope()
        };

        trace!(depth, statements = script.statements.len(), "execute callback");
        self.depth.set(depth + 1);
        let cx = ExecutionContext::new(this, scope, args);
        let result = Evaluator::new(self).eval_script(script, &cx);
        self.depth.set(depth);
        if depth == 0 {
            self.active.borrow_mut().take();
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{Behaviour, Integer, Timer};
    use crate::test_support::{engine_with, entries, new_log, script, Probe};
    use pik_core::{Call, Callback, CallbackDefinition, Completion, ScriptObject};
    use pretty_assertions::assert_eq;
    use std::rc::Weak;

    #[test]
    fn scene_change_drops_old_local_names_and_keeps_globals() {
        let log = new_log();
        let engine = engine_with(vec![Probe::new("APP", &log).handle()]);
        engine
            .change_scene(vec![Probe::new("OLD", &log).handle()])
            .expect("first scene should load");
        assert!(engine.resolve("OLD").is_some());

        let dropped = engine
            .change_scene(vec![Probe::new("NEW", &log).handle()])
            .expect("second scene should load");
        assert_eq!(dropped, vec!["OLD".to_string()]);
        assert!(engine.resolve("OLD").is_none());
        assert!(engine.resolve("NEW").is_some());
        assert!(engine.resolve("APP").is_some());
    }

    struct Tracked {
        name: &'static str,
        destroyed: Rc<Cell<bool>>,
    }

    impl ScriptObject for Tracked {
        fn name(&self) -> &str {
            self.name
        }

        fn kind(&self) -> &'static str {
            "TRACKED"
        }

        fn methods(&self) -> &'static [&'static str] {
            &[]
        }

        fn invoke(&self, call: &Call<'_>) -> EvalResult {
            Err(call.unknown_method())
        }

        fn destroy(&self) {
            self.destroyed.set(true);
        }
    }

    #[test]
    fn scene_change_destroys_only_objects_that_did_not_carry_over() {
        let engine = engine_with(vec![]);
        let gone = Rc::new(Cell::new(false));
        let kept = Rc::new(Cell::new(false));
        let kept_object: ObjectHandle = Rc::new(Tracked {
            name: "KEPT",
            destroyed: Rc::clone(&kept),
        });
        let gone_object: ObjectHandle = Rc::new(Tracked {
            name: "GONE",
            destroyed: Rc::clone(&gone),
        });
        engine
            .change_scene(vec![gone_object, kept_object.clone()])
            .expect("scene should load");
        engine
            .change_scene(vec![kept_object])
            .expect("scene should load");
        assert!(gone.get());
        assert!(!kept.get());
    }

    /// Swaps the scene out from under the script that calls it.
    struct SceneSwitch {
        engine: RefCell<Weak<ScriptEngine>>,
        next: RefCell<Vec<ObjectHandle>>,
    }

    impl SceneSwitch {
        fn wire(next: Vec<ObjectHandle>, globals: Vec<ObjectHandle>) -> Rc<ScriptEngine> {
            let switch = Rc::new(SceneSwitch {
                engine: RefCell::new(Weak::new()),
                next: RefCell::new(next),
            });
            let switch_handle: ObjectHandle = switch.clone();
            let mut all = vec![switch_handle];
            all.extend(globals);
            let engine = Rc::new(engine_with(all));
            *switch.engine.borrow_mut() = Rc::downgrade(&engine);
            engine
        }
    }

    impl ScriptObject for SceneSwitch {
        fn name(&self) -> &str {
            "SWITCH"
        }

        fn kind(&self) -> &'static str {
            "SWITCH"
        }

        fn methods(&self) -> &'static [&'static str] {
            &["GO"]
        }

        fn invoke(&self, call: &Call<'_>) -> EvalResult {
            let engine = self
                .engine
                .borrow()
                .upgrade()
                .ok_or_else(|| call.unknown_method())?;
            let next = self.next.borrow_mut().drain(..).collect();
            engine.change_scene(next)?;
            Ok(Completion::null())
        }
    }

    #[test]
    fn scene_change_during_invocation_is_seen_by_next_invocation() {
        let log = new_log();
        let engine = SceneSwitch::wire(vec![], vec![]);
        engine
            .change_scene(vec![Probe::new("P", &log).handle()])
            .expect("scene should load");

        engine
            .execute_callback(None, &script("SWITCH.GO(); P.MARK(\"still\")"), vec![])
            .expect("snapshot keeps P alive for this invocation");
        assert_eq!(entries(&log), vec!["P:still".to_string()]);

        let error = engine
            .execute_callback(None, &script("P.MARK(\"gone\")"), vec![])
            .expect_err("P left the scope");
        assert_eq!(error.kind, EvalErrorKind::UnresolvedTarget);
    }

    #[test]
    fn scene_entered_mid_script_readies_against_its_own_objects() {
        let log = new_log();
        let room_var = Integer::new("ROOM_VAR", 0).handle();
        let engine = SceneSwitch::wire(
            vec![
                room_var.clone(),
                Behaviour::new("__INIT__", script("ROOM_VAR.INC(); P.MARK(\"init\")")).handle(),
            ],
            vec![Probe::new("P", &log).handle()],
        );
        engine
            .change_scene(vec![Integer::new("HALL_VAR", 0).handle()])
            .expect("first scene should load");

        engine
            .execute_callback(None, &script("SWITCH.GO(); HALL_VAR.INC()"), vec![])
            .expect("init of the new scene should resolve its own objects");
        assert_eq!(room_var.value(), Value::from(1.0));
        assert_eq!(entries(&log), vec!["P:init".to_string()]);
        assert!(engine.resolve("HALL_VAR").is_none());
        assert!(engine.resolve("ROOM_VAR").is_some());
    }

    #[test]
    fn reentrant_callbacks_keep_outer_context() {
        let log = new_log();
        let engine = engine_with(vec![
            Probe::new("P", &log).handle(),
            Behaviour::new("BEH_INNER", script("P.MARK(\"inner\", $1)")).handle(),
        ]);
        let outer = Integer::new("OUTER", 7).handle();
        let body = script("BEH_INNER.RUN(\"x\"); P.MARK(THIS, $1)");
        engine
            .execute_callback(Some(outer), &body, vec![Value::from("outer-arg")])
            .expect("script should run");
        assert_eq!(
            entries(&log),
            vec!["P:inner,x".to_string(), "P:7,outer-arg".to_string()]
        );
    }

    #[test]
    fn runaway_recursion_fails_with_call_depth_error() {
        let engine = ScriptEngine::new(
            ScriptEngineOptions { max_call_depth: 8 },
            vec![Behaviour::new("BEH_LOOP", script("BEH_LOOP.RUN()")).handle()],
        )
        .expect("engine should build");
        let error = engine
            .execute_callback(None, &script("BEH_LOOP.RUN()"), vec![])
            .expect_err("recursion should be bounded");
        assert_eq!(error.kind, EvalErrorKind::CallDepthExceeded);
        // the depth counter unwinds with the error
        assert!(engine
            .execute_callback(None, &script("1"), vec![])
            .is_ok());
    }

    #[test]
    fn tick_runs_local_objects_before_globals() {
        let log = new_log();
        let marker = |label: &str| {
            CallbackDefinition::none().with_nonparametrized(Callback::Inline(script(&format!(
                "P.MARK(\"{}\")",
                label
            ))))
        };
        let engine = engine_with(vec![
            Probe::new("P", &log).handle(),
            Timer::new("A_GLOBAL", 10.0)
                .with_on_tick(marker("global"))
                .handle(),
        ]);
        engine
            .change_scene(vec![Timer::new("Z_LOCAL", 10.0)
                .with_on_tick(marker("local"))
                .handle()])
            .expect("scene should load");
        engine.tick(10.0).expect("tick should run");
        assert_eq!(
            entries(&log),
            vec!["P:local".to_string(), "P:global".to_string()]
        );
    }
}
