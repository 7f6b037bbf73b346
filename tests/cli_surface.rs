use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_the_cli_surface() {
    Command::cargo_bin("repolens")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("ingest")
                .and(predicate::str::contains("ask"))
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("reset")),
        );
}

#[test]
fn version_subcommand_prints_version() {
    Command::cargo_bin("repolens")
        .unwrap()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("repolens v"));
}
