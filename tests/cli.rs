use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn no_arguments_prints_usage_and_fails() {
    Command::cargo_bin("tubescribe")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_describes_the_pipeline() {
    Command::cargo_bin("tubescribe")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Whisper"))
        .stdout(predicate::str::contains("URL_OR_FILE"));
}

#[test]
fn rejects_unparseable_url_argument() {
    Command::cargo_bin("tubescribe")
        .unwrap()
        .arg("definitely not a url or file")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid URL"));
}

#[test]
fn model_flag_rejects_unknown_size() {
    Command::cargo_bin("tubescribe")
        .unwrap()
        .args(["-m", "enormous", "https://youtu.be/x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
