use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("chirp")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("login")
                .and(predicate::str::contains("post"))
                .and(predicate::str::contains("refresh"))
                .and(predicate::str::contains("revoke")),
        );
}

#[test]
fn missing_credentials_file_is_reported() {
    Command::cargo_bin("chirp")
        .unwrap()
        .env_remove("CHIRP_REFRESH_TOKEN")
        .args([
            "--credentials",
            "/nonexistent/credentials.json",
            "refresh",
            "--refresh-token",
            "R",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/credentials.json"));
}

#[test]
fn invalid_credentials_file_is_reported() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    use std::io::Write;
    file.write_all(b"{not json").unwrap();

    Command::cargo_bin("chirp")
        .unwrap()
        .args([
            "--credentials",
            file.path().to_str().unwrap(),
            "refresh",
            "--refresh-token",
            "R",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error in credentials file"));
}

#[test]
fn poll_duration_requires_poll_options() {
    Command::cargo_bin("chirp")
        .unwrap()
        .args([
            "post",
            "hello",
            "--access-token",
            "A",
            "--poll-duration",
            "120",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--poll-options"));
}
