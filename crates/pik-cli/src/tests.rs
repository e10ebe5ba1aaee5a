use super::*;
use pik_core::Value;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time should be monotonic")
        .as_nanos();
    std::env::temp_dir().join(format!("pik-cli-{}-{}", name, nanos))
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent should be created");
    }
    fs::write(path, content).expect("file should be written");
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

const GLOBAL: &str = r#"
OBJECT=SCORE
SCORE:TYPE=INTEGER
SCORE:VALUE=1
"#;

const SCENE: &str = r#"
OBJECT=CLOCK
CLOCK:TYPE=TIMER
CLOCK:ELAPSE=10
CLOCK:ONTICK={SCORE.INC()}
"#;

#[test]
fn check_accepts_valid_definition_tree() {
    let root = temp_path("check-ok");
    write_file(&root.join("global.cnv"), GLOBAL);
    write_file(&root.join("scenes").join("intro.cnv"), SCENE);

    let code = run_cli_from_args(["pik", "check", "--path", &path_arg(&root)]);
    assert_eq!(code, 0);
}

#[test]
fn check_reports_first_broken_file() {
    let root = temp_path("check-broken");
    write_file(&root.join("a.cnv"), GLOBAL);
    write_file(&root.join("b.cnv"), "OBJECT=X\nX:TYPE=BEHAVIOUR\nX:CODE={X.RUN(}\n");

    let code = run_cli_from_args(["pik", "check", "--path", &path_arg(&root)]);
    assert_eq!(code, 1);

    let error = run_check(CheckArgs {
        path: path_arg(&root),
    })
    .expect_err("broken file should fail");
    assert_eq!(error.code, "DEFS_SCRIPT_ERROR");
    assert!(error.message.contains("b.cnv"));
}

#[test]
fn run_executes_calls_and_ticks() {
    let root = temp_path("run-ok");
    let global = root.join("global.cnv");
    let scene = root.join("scene.cnv");
    write_file(&global, GLOBAL);
    write_file(&scene, SCENE);

    let code = run_cli_from_args([
        "pik",
        "run",
        "--global",
        &path_arg(&global),
        "--scene",
        &path_arg(&scene),
        "--call",
        "SCORE.ADD(10)",
        "--ticks",
        "3",
        "--tick-ms",
        "10",
    ]);
    assert_eq!(code, 0);
}

#[test]
fn run_surfaces_evaluation_errors() {
    let root = temp_path("run-error");
    let global = root.join("global.cnv");
    write_file(&global, GLOBAL);

    let error = run_scene(RunArgs {
        global: path_arg(&global),
        scene: None,
        calls: vec!["SCORE.FLY()".to_string()],
        ticks: 0,
        tick_ms: 16.0,
        max_call_depth: None,
    })
    .expect_err("method is not supported");
    assert_eq!(error.code, "EVAL_CAPABILITY_UNSUPPORTED");
}

#[test]
fn capture_state_lets_local_objects_hide_globals() {
    let engine = create_engine_from_definitions(CreateEngineOptions {
        global_definitions: GLOBAL.to_string(),
        scene_definitions: Some("OBJECT=SCORE\nSCORE:TYPE=INTEGER\nSCORE:VALUE=7\n".to_string()),
        max_call_depth: None,
    })
    .expect("engine should build");
    let state = capture_state(&engine);
    assert_eq!(state.get("SCORE"), Some(&Value::from(7.0)));
    assert_eq!(
        serde_json::to_string(&state).expect("state should serialize"),
        "{\"SCORE\":7.0}"
    );
}

#[test]
fn invalid_arguments_do_not_reach_the_engine() {
    let code = run_cli_from_args(["pik", "run"]);
    assert_ne!(code, 0);
}
