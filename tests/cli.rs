//! Argument and input validation tests. No network I/O.
//!
//! Every failure here is raised before a live adapter would be built, so no
//! API keys or cassettes are involved.

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("guru");
    cmd.env("GURU_CONFIG", "/nonexistent/guru/config.toml")
        .env_remove("GURU_REPLAY")
        .env_remove("GURU_REC")
        .env_remove("GEMINI_API_KEY")
        .env_remove("api_key")
        .env_remove("OCTOAI_TOKEN");
    cmd
}

#[test]
fn missing_prompt_exits_with_error() {
    cmd()
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter a prompt."));
}

#[test]
fn blank_prompt_exits_with_error() {
    cmd()
        .args(["generate", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter a prompt."));
}

#[test]
fn chat_model_rejected_for_generation() {
    cmd()
        .args(["generate", "--engine", "pro", "a cat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used for image generation"));
}

#[test]
fn unknown_engine_exits_with_error() {
    cmd()
        .args(["generate", "--engine", "dall-e-3", "a cat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown provider for model"));
}

#[test]
fn invalid_aspect_ratio_exits_with_error() {
    cmd()
        .args(["generate", "--aspect-ratio", "100:200", "a cat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported aspect ratio"));
}

#[test]
fn invalid_format_exits_with_error() {
    cmd()
        .args(["generate", "--format", "gif", "a cat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported format"));
}

#[test]
fn invalid_steps_exits_with_error() {
    cmd()
        .args(["generate", "--steps", "0", "a cat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported steps"));
}

#[test]
fn generate_without_token_names_env_var() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .args(["generate", "a cat"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No API key for OctoAI").and(predicate::str::contains("OCTOAI_TOKEN")));
}

#[test]
fn caption_without_image_exits_with_error() {
    cmd()
        .arg("caption")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please upload an image."));
}

#[test]
fn caption_missing_file_exits_with_error() {
    cmd()
        .args(["caption", "/nonexistent/cat.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please upload an image."));
}

#[test]
fn caption_rejects_non_image_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "definitely not an image").unwrap();

    cmd()
        .args(["caption", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported image format"));
}

#[test]
fn image_engine_rejected_for_chat() {
    cmd()
        .args(["chat", "--model", "sdxl", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used for chat"));
}

#[test]
fn chat_without_key_names_env_var() {
    cmd()
        .args(["chat", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GEMINI_API_KEY"));
}
