use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const LENS_IDS: [&str; 5] = ["calm", "bridge", "cynical", "opposite", "playful"];

fn flip_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("flip");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let config_content = format!(
        r#"[db]
path = "{}/data/flip.sqlite"

[user]
name = "Sam Rivera"
handle = "@sam"

[pool]
seed = 7
"#,
        root.display()
    );

    let config_path = config_dir.join("flip.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_flip(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = flip_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .env_remove("FLIPSIDE_LOG")
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("Failed to run flip binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

fn run_json(config_path: &Path, args: &[&str]) -> serde_json::Value {
    let (stdout, stderr, success) = run_flip(config_path, args);
    assert!(success, "{:?} failed: stdout={}, stderr={}", args, stdout, stderr);
    serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("{:?} printed invalid JSON ({}): {}", args, e, stdout))
}

/// Starts a draft on t01 and locks the first candidate of every lens.
fn lock_full_draft(config_path: &Path) -> Vec<String> {
    let (_, stderr, success) = run_flip(
        config_path,
        &["draft", "start", "Ban phones in school", "--topic", "t01"],
    );
    assert!(success, "draft start failed: {}", stderr);

    let mut locked = Vec::new();
    for lens in LENS_IDS {
        let candidates = run_json(config_path, &["draft", "candidates", lens, "--json"]);
        let candidates = candidates.as_array().unwrap();
        assert!(candidates.len() >= 5, "{} has {} candidates", lens, candidates.len());
        for c in candidates {
            assert_eq!(c["topic_id"], "t01");
            assert_eq!(c["lens"], lens);
        }
        let id = candidates[0]["id"].as_str().unwrap().to_string();
        let (_, stderr, success) = run_flip(config_path, &["draft", "lock", lens, &id]);
        assert!(success, "lock {} failed: {}", lens, stderr);
        locked.push(id);
    }
    locked
}

#[test]
fn test_init_creates_database() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_flip(&config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("initialized"));
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config_path) = setup_test_env();

    let (_, _, success1) = run_flip(&config_path, &["init"]);
    assert!(success1, "First init failed");

    let (_, _, success2) = run_flip(&config_path, &["init"]);
    assert!(success2, "Second init failed (not idempotent)");
}

#[test]
fn test_lenses_without_config() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope.toml");

    let (stdout, _, success) = run_flip(&missing, &["lenses"]);
    assert!(success);
    let ids: Vec<&str> = stdout
        .lines()
        .filter_map(|l| l.split_whitespace().nth(1))
        .collect();
    assert_eq!(ids, LENS_IDS);
}

#[test]
fn test_unknown_lens_rejected() {
    let (_tmp, config_path) = setup_test_env();
    let (_, stderr, success) = run_flip(&config_path, &["draft", "candidates", "sarcastic"]);
    assert!(!success);
    assert!(stderr.contains("sarcastic"));
}

#[test]
fn test_publish_incomplete_draft_fails() {
    let (_tmp, config_path) = setup_test_env();
    run_flip(&config_path, &["init"]);
    lock_full_draft(&config_path);

    let (_, _, success) = run_flip(&config_path, &["draft", "unlock", "calm"]);
    assert!(success);

    let (_, stderr, success) = run_flip(&config_path, &["draft", "publish"]);
    assert!(!success, "publish should refuse a 4-of-5 draft");
    assert!(stderr.contains("calm"));

    // Draft is still there
    let show = run_json(&config_path, &["draft", "show", "--json"]);
    assert_eq!(show["status"]["missing"], serde_json::json!(["calm"]));
}

#[test]
fn test_lock_wrong_lens_fails() {
    let (_tmp, config_path) = setup_test_env();
    run_flip(&config_path, &["draft", "start", "Ban phones", "--topic", "t01"]);

    let (_, _, success) = run_flip(&config_path, &["draft", "lock", "calm", "t01_bridge_0"]);
    assert!(!success);
    let (_, _, success) = run_flip(&config_path, &["draft", "lock", "calm", "t02_calm_0"]);
    assert!(!success);
    let (_, _, success) = run_flip(&config_path, &["draft", "lock", "calm", "t01_calm_0"]);
    assert!(success);
}

#[test]
fn test_phones_scenario_end_to_end() {
    let (_tmp, config_path) = setup_test_env();
    run_flip(&config_path, &["init"]);
    let locked = lock_full_draft(&config_path);

    let deck = run_json(&config_path, &["draft", "publish", "--json"]);
    let deck_id = deck["id"].as_str().unwrap().to_string();
    assert_eq!(deck["anchor"]["text"], "Ban phones in school");
    assert_eq!(deck["locked"]["calm"]["id"], locked[0].as_str());

    // Draft is gone after publishing
    let show = run_json(&config_path, &["draft", "show", "--json"]);
    assert!(show.is_null());

    let decks = run_json(&config_path, &["decks", "list", "--json"]);
    assert_eq!(decks.as_array().unwrap().len(), 1);

    let room = run_json(
        &config_path,
        &["room", "create", "--title", "Phones debate", "--deck", &deck_id, "--json"],
    );
    let room_id = room["id"].as_str().unwrap().to_string();
    let messages = room["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 6);
    assert_eq!(messages[0]["lens"], "anchor");
    assert_eq!(messages[0]["content"], "Ban phones in school");
    assert_eq!(messages[1]["lens"], "calm");

    let (_, stderr, success) = run_flip(
        &config_path,
        &["room", "say", &room_id, "I disagree", "--author", "Alex"],
    );
    assert!(success, "say failed: {}", stderr);

    let (prompt, stderr, success) = run_flip(&config_path, &["room", "prompt", &room_id]);
    assert!(success, "prompt failed: {}", stderr);
    assert!(prompt.contains("[1] Seed (anchor) — Sam Rivera @sam: Ban phones in school"));
    assert!(prompt.contains("[7] Chat — Alex: I disagree"));
    assert!(prompt.contains("## The Case for This Approach"));
    assert!(prompt.contains("Not stated in chat."));
}

#[test]
fn test_prompt_from_room_file_without_config() {
    let (tmp, config_path) = setup_test_env();
    let deck_file = tmp.path().join("legacy.json");
    fs::write(&deck_file, r#"{"anchorText": "Fares should be free"}"#).unwrap();

    let room = run_json(
        &config_path,
        &["room", "create", "--file", deck_file.to_str().unwrap(), "--json"],
    );
    assert_eq!(room["title"], "Untitled room");
    let room_file = tmp.path().join("room.json");
    fs::write(&room_file, room.to_string()).unwrap();

    let missing_config = tmp.path().join("missing.toml");
    let (prompt, stderr, success) = run_flip(
        &missing_config,
        &["room", "prompt", "--file", room_file.to_str().unwrap()],
    );
    assert!(success, "prompt --file failed: {}", stderr);
    assert!(prompt.contains("[1] Seed (anchor) — Unknown: Fares should be free"));
    assert!(prompt.contains("[2] Seed (calm) — Unknown: (Missing matched post text)"));
}

#[test]
fn test_vote_fans_out_to_deck_copy() {
    let (_tmp, config_path) = setup_test_env();
    run_flip(&config_path, &["init"]);
    let locked = lock_full_draft(&config_path);
    let deck = run_json(&config_path, &["draft", "publish", "--json"]);
    let deck_id = deck["id"].as_str().unwrap();
    let before = deck["locked"]["calm"]["votes"].as_i64().unwrap();

    let (stdout, stderr, success) = run_flip(&config_path, &["vote", &locked[0], "up"]);
    assert!(success, "vote failed: {}", stderr);
    assert!(stdout.contains("2 copies"));

    let deck = run_json(&config_path, &["decks", "show", deck_id, "--json"]);
    assert_eq!(deck["locked"]["calm"]["votes"].as_i64().unwrap(), before + 1);

    let (_, _, success) = run_flip(&config_path, &["vote", "no_such_post", "down"]);
    assert!(!success);
}

#[test]
fn test_room_solution_lifecycle() {
    let (_tmp, config_path) = setup_test_env();
    run_flip(&config_path, &["init"]);
    lock_full_draft(&config_path);
    run_flip(&config_path, &["draft", "publish"]);

    let room = run_json(&config_path, &["room", "create", "--json"]);
    let room_id = room["id"].as_str().unwrap().to_string();

    let (_, _, success) = run_flip(&config_path, &["room", "complete", &room_id]);
    assert!(!success, "complete without a solution should fail");

    // Generation is disabled in this config
    let (_, _, success) = run_flip(&config_path, &["room", "solve", &room_id]);
    assert!(!success);

    let (_, _, success) = run_flip(
        &config_path,
        &["room", "solution", &room_id, "Phones stay in lockers. [1][7]"],
    );
    assert!(success);
    let (_, _, success) = run_flip(&config_path, &["room", "complete", &room_id]);
    assert!(success);

    let shown = run_json(&config_path, &["room", "show", &room_id, "--json"]);
    assert_eq!(shown["solution"]["status"], "complete");

    let (_, _, success) = run_flip(&config_path, &["room", "delete", &room_id]);
    assert!(success);
    let rooms = run_json(&config_path, &["room", "list", "--json"]);
    assert!(rooms.as_array().unwrap().is_empty());
}
