use std::{
    env,
    fs,
    path::{Path, PathBuf},
    process::Command,
};

fn norm_newlines(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "")
}

const STAGES: &str = r#"[
  {"id": 1, "group": 1, "target": 5, "margin": 0.1},
  {"id": 2, "group": 1, "target": 6, "margin": 0.1, "multi": [2, 4, 6]},
  {"id": 3, "group": 1, "exam": true, "examName": "Final", "target": 10, "margin": 0.2}
]"#;

const MISSIONS: &str = r#"[
  {"id": 1, "type": "play_count", "target": 1, "title": "First play"},
  {"id": 2, "type": "lucky", "hidden": true}
]"#;

/// Fresh directory holding a config, stage and mission files.
fn game_dir(name: &str, gate: &str) -> PathBuf {
    let dir = env::temp_dir().join(format!("timer_cli_{name}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("stages.json"), STAGES).unwrap();
    fs::write(dir.join("missions.json"), MISSIONS).unwrap();
    fs::write(
        dir.join("game.toml"),
        format!(
            "stages_path = \"stages.json\"\nmissions_path = \"missions.json\"\nstorage_dir = \"save\"\ngate = \"{gate}\"\n"
        ),
    )
    .unwrap();
    dir
}

fn run(dir: &Path, args: &[&str]) -> std::process::Output {
    let exe = env!("CARGO_BIN_EXE_timer_cli");
    let config = dir.join("game.toml");
    Command::new(exe)
        .arg("--config")
        .arg(&config)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn validate_counts_catalog_entries() {
    let dir = game_dir("validate", "open");
    let out = run(&dir, &["validate"]);

    assert!(out.status.success());
    let stdout = norm_newlines(&String::from_utf8_lossy(&out.stdout));
    assert!(stdout.contains("stages=3\n"));
    assert!(stdout.contains("groups=1\n"));
    assert!(stdout.contains("exams=1\n"));
    assert!(stdout.contains("missions=2\n"));
}

#[test]
fn simulate_multi_target_failure() {
    let dir = game_dir("simulate_multi", "open");
    let out = run(&dir, &["simulate", "2", "--stop", "2.05", "--stop", "4.5"]);

    assert!(out.status.success());
    let stdout = norm_newlines(&String::from_utf8_lossy(&out.stdout));
    assert!(stdout.contains("laps=2.000,4.000,6.000\n"));
    assert!(stdout.contains("lap 1: target=2.000 stopped=2.050 diff=0.050 ok\n"));
    assert!(stdout.contains("lap 2: target=4.000 stopped=4.500 diff=0.500 miss\n"));
    assert!(stdout.contains("result: FAIL diff=999.000 stopped=4.500\n"));

    // Simulation never writes progress
    assert!(!dir.join("save").join("timerGameData.json").exists());
}

#[test]
fn simulate_single_target_clear() {
    let dir = game_dir("simulate_single", "sequential");
    let out = run(&dir, &["simulate", "1", "--stop", "5.05"]);

    assert!(out.status.success());
    let stdout = norm_newlines(&String::from_utf8_lossy(&out.stdout));
    assert!(stdout.contains("Stage 1 target=5.000 margin=0.1\n"));
    assert!(stdout.contains("result: CLEAR diff=0.050 stopped=5.050\n"));
    assert!(stdout.contains("mission completed: 1\n"));
    assert!(stdout.contains("next: 2\n"));
}

#[test]
fn simulate_locked_stage_is_an_error() {
    let dir = game_dir("simulate_locked", "sequential");
    let out = run(&dir, &["simulate", "3", "--stop", "10"]);

    assert!(!out.status.success());
    assert_eq!(out.status.code(), Some(1));
    let stderr = norm_newlines(&String::from_utf8_lossy(&out.stderr));
    assert!(stderr.contains("Error: stage 3 is unknown or locked"));
}

#[test]
fn simulate_late_stop_auto_stops() {
    let dir = game_dir("simulate_auto_stop", "open");
    let out = run(&dir, &["simulate", "1", "--stop", "12"]);

    assert!(out.status.success());
    let stdout = norm_newlines(&String::from_utf8_lossy(&out.stdout));
    assert!(stdout.contains("auto-stopped\n"));
    assert!(stdout.contains("result: FAIL"));
}

#[test]
fn missing_stage_file_is_reported_with_context() {
    let dir = game_dir("missing_stages", "open");
    fs::remove_file(dir.join("stages.json")).unwrap();
    let out = run(&dir, &["validate"]);

    assert!(!out.status.success());
    let stderr = norm_newlines(&String::from_utf8_lossy(&out.stderr));
    assert!(stderr.contains("Error: failed to read stages:"));
    assert!(stderr.contains("stages.json"));
    assert!(stderr.contains("Caused by:"));
}

#[test]
fn missing_mission_file_is_reported_with_context() {
    let dir = game_dir("missing_missions", "open");
    fs::remove_file(dir.join("missions.json")).unwrap();
    let out = run(&dir, &["validate"]);

    assert!(!out.status.success());
    let stderr = norm_newlines(&String::from_utf8_lossy(&out.stderr));
    assert!(stderr.contains("Error: failed to read missions:"));
    assert!(stderr.contains("missions.json"));
    assert!(stderr.contains("Caused by:"));
}

#[test]
fn fresh_progress_and_mission_listing() {
    let dir = game_dir("progress", "sectioned");

    let out = run(&dir, &["progress"]);
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["schemaVersion"], 2);
    assert_eq!(v["totalPlays"], 0);

    let out = run(&dir, &["missions"]);
    assert!(out.status.success());
    let stdout = norm_newlines(&String::from_utf8_lossy(&out.stdout));
    assert!(stdout.contains("[ ] 1 play_count 0/1 First play\n"));
    assert!(stdout.contains("[ ] ???\n"));
    assert!(stdout.contains("medal=none\n"));

    let out = run(&dir, &["gate"]);
    assert!(out.status.success());
    let stdout = norm_newlines(&String::from_utf8_lossy(&out.stdout));
    assert!(stdout.contains("  1 Stage 1 open\n"));
    assert!(stdout.contains("  3 Final locked section=0/2\n"));
}

#[test]
fn skin_selection_persists() {
    let dir = game_dir("skin", "open");

    let out = run(&dir, &["skin", "forest"]);
    assert!(out.status.success());

    let out = run(&dir, &["skin"]);
    let stdout = norm_newlines(&String::from_utf8_lossy(&out.stdout));
    assert!(stdout.contains("* forest\n"));
    assert!(stdout.contains("  default\n"));

    let out = run(&dir, &["skin", "plaid"]);
    assert!(!out.status.success());
}

#[test]
fn help_mentions_subcommands() {
    let exe = env!("CARGO_BIN_EXE_timer_cli");
    let output = Command::new(exe).arg("--help").output().unwrap();

    assert!(output.status.success());
    let stdout = norm_newlines(&String::from_utf8_lossy(&output.stdout));
    for sub in ["simulate", "play", "missions", "gate"] {
        assert!(stdout.contains(sub));
    }
}
