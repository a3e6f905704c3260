use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_letter"))
}

fn letter(config_home: &Path, args: &[&str]) -> Output {
    Command::new(bin())
        .args(args)
        .env("XDG_CONFIG_HOME", config_home)
        .env_remove("LETTER_CONFIG")
        .env("NO_COLOR", "1")
        .output()
        .expect("run letter")
}

fn write_draft(dir: &Path) -> PathBuf {
    let path = dir.join("draft.toml");
    std::fs::write(
        &path,
        r#"
title = "Note"

[[paragraphs]]
message = "Meet at noon"
password = "swordfish"
hint = "time"

[[paragraphs]]
message = "Bring the map"
password = "atlas"
"#,
    )
    .expect("write draft");
    path
}

fn seal_json(home: &TempDir) -> serde_json::Value {
    let draft = write_draft(home.path());
    let output = letter(
        home.path(),
        &["seal", "--draft", draft.to_str().unwrap(), "--no-input", "--json"],
    );
    assert!(
        output.status.success(),
        "seal failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("seal output is JSON")
}

#[test]
fn test_seal_then_open_with_passwords() {
    let home = TempDir::new().expect("tempdir");
    let sealed = seal_json(&home);
    assert_eq!(sealed["paragraphs"], 2);
    let link = sealed["link"].as_str().expect("link").to_string();
    assert!(link.starts_with("https://letters.example/read?d="));

    let output = letter(
        home.path(),
        &["open", &link, "--password", "1=swordfish", "--password", "2=atlas", "--json"],
    );
    assert!(
        output.status.success(),
        "open failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let opened: serde_json::Value = serde_json::from_slice(&output.stdout).expect("JSON");
    assert_eq!(opened["title"], "Note");
    assert_eq!(opened["decrypted"], 2);
    assert_eq!(opened["paragraphs"][0]["message"], "Meet at noon");
    assert_eq!(opened["paragraphs"][0]["hint"], "time");
    assert_eq!(opened["paragraphs"][1]["message"], "Bring the map");
}

#[test]
fn test_open_partial_and_wrong_password() {
    let home = TempDir::new().expect("tempdir");
    let sealed = seal_json(&home);
    let token = sealed["token"].as_str().expect("token").to_string();

    let output = letter(
        home.path(),
        &["open", &token, "--password", "1=wrong", "--no-input", "--json"],
    );
    assert_eq!(output.status.code(), Some(5));

    let opened: serde_json::Value = serde_json::from_slice(&output.stdout).expect("JSON");
    assert_eq!(opened["decrypted"], 0);
    assert_eq!(opened["paragraphs"][0]["state"], "failed");
    assert_eq!(
        opened["paragraphs"][0]["error"],
        "Incorrect password or corrupted data"
    );
    assert!(opened["paragraphs"][0]["message"].is_null());
    assert_eq!(opened["paragraphs"][1]["state"], "pending");
}

#[test]
fn test_open_blank_password_does_not_abort_siblings() {
    let home = TempDir::new().expect("tempdir");
    let sealed = seal_json(&home);
    assert_eq!(sealed["long_link_warning"], false);
    let token = sealed["token"].as_str().expect("token").to_string();

    let output = letter(
        home.path(),
        &["open", &token, "--password", "1= ", "--password", "2=atlas", "--no-input", "--json"],
    );
    assert_eq!(output.status.code(), Some(4));

    let opened: serde_json::Value = serde_json::from_slice(&output.stdout).expect("JSON");
    assert_eq!(opened["decrypted"], 1);
    assert_eq!(opened["paragraphs"][0]["state"], "pending");
    assert_eq!(opened["paragraphs"][0]["error"], "Password cannot be empty");
    assert_eq!(opened["paragraphs"][1]["message"], "Bring the map");
}

#[test]
fn test_inspect_shows_hints_without_decrypting() {
    let home = TempDir::new().expect("tempdir");
    let sealed = seal_json(&home);
    let token = sealed["token"].as_str().expect("token").to_string();

    let output = letter(home.path(), &["inspect", &token, "--json"]);
    assert!(output.status.success());
    let inspected: serde_json::Value = serde_json::from_slice(&output.stdout).expect("JSON");
    assert_eq!(inspected["title"], "Note");
    assert_eq!(inspected["paragraphs"][0]["hint"], "time");
    assert!(inspected["paragraphs"][1]["hint"].is_null());
    assert_eq!(inspected["paragraphs"][0]["message_bytes"], "Meet at noon".len());
}

#[test]
fn test_corrupt_link_exit_code() {
    let home = TempDir::new().expect("tempdir");
    let output = letter(home.path(), &["open", "not-a-valid-token", "--no-input"]);
    assert_eq!(output.status.code(), Some(6));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid or corrupted link"));
}

#[test]
fn test_seal_rejects_blank_paragraph() {
    let home = TempDir::new().expect("tempdir");
    let draft = home.path().join("draft.toml");
    std::fs::write(
        &draft,
        "[[paragraphs]]\nmessage = \"   \"\npassword = \"pw\"\n",
    )
    .expect("write draft");

    let output = letter(
        home.path(),
        &["seal", "--draft", draft.to_str().unwrap(), "--no-input"],
    );
    assert_eq!(output.status.code(), Some(4));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Paragraph 1 message cannot be empty"));
}

#[test]
fn test_seal_without_draft_and_no_input_fails() {
    let home = TempDir::new().expect("tempdir");
    let output = letter(home.path(), &["seal", "--no-input"]);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_config_init_and_base_url() {
    let home = TempDir::new().expect("tempdir");
    let output = letter(home.path(), &["config", "init"]);
    assert!(output.status.success());

    let config_path = home.path().join("letter").join("config.toml");
    assert!(config_path.exists());
    std::fs::write(
        &config_path,
        "[link]\nbase_url = \"https://example.org/letter\"\nwarn_length = 10\n",
    )
    .expect("write config");

    let sealed = seal_json(&home);
    assert!(sealed["link"]
        .as_str()
        .unwrap()
        .starts_with("https://example.org/letter?d="));
    assert_eq!(sealed["long_link_warning"], true);

    let again = letter(home.path(), &["config", "init"]);
    assert_eq!(again.status.code(), Some(4));
}
