// tests/cli_exit.rs
use std::process::{Command, Output};

const SECRETS: &[&str] = &["TELEGRAM_TOKEN", "CHAT_ID", "EMAIL_USER", "EMAIL_PASSWORD", "EMAIL_TO", "SMTP_HOST"];

/// Run the binary from an empty directory with no credentials in the environment.
fn chartpost(args: &[&str]) -> Output {
    let tmp = tempfile::tempdir().unwrap();
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_chartpost"));
    cmd.args(args).current_dir(tmp.path()).env("CHARTPOST_OUT_DIR", tmp.path());
    for key in SECRETS {
        cmd.env_remove(key);
    }
    cmd.output().unwrap()
}

#[test]
fn missing_chat_credentials_exit_1() {
    let out = chartpost(&["run", "markets"]);
    assert_eq!(out.status.code(), Some(1));
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.contains("TELEGRAM_TOKEN"), "{err}");
    // Nothing was fetched, so nothing was logged about sources.
    assert!(!err.contains("Fetching"), "{err}");
}

#[test]
fn missing_mail_credentials_exit_1() {
    let out = chartpost(&["run", "indicators"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("EMAIL_USER"));
}

#[test]
fn ping_without_token_exit_1() {
    let out = chartpost(&["ping"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn unknown_job_exit_1() {
    let out = chartpost(&["run", "weather", "--notify", "none"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("weather"));
}

#[test]
fn jobs_lists_presets() {
    let out = chartpost(&["jobs"]);
    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stdout);
    for job in ["markets", "indicators", "world"] {
        assert!(text.contains(job), "{text}");
    }
}
