#![allow(clippy::expect_used, clippy::unwrap_used)]
#![cfg(unix)]
//! End-to-end tests for the `stow` binary.

mod common;

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

use common::{IntegrationTestContext, TestContextBuilder};

/// A `stow` invocation isolated to the test's container, home, and log cache.
fn stow(ctx: &IntegrationTestContext, cache: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("stow").unwrap();
    cmd.env("XDG_CACHE_HOME", cache.path())
        .env_remove("STOW_LOG")
        .env_remove("STOW_DOTFILES_DIR")
        .arg("--dotfiles-dir")
        .arg(ctx.dotfiles_path())
        .arg("--relative-base")
        .arg(ctx.home_path());
    cmd
}

#[test]
fn install_then_uninstall() {
    let ctx = TestContextBuilder::new()
        .with_package_file("zsh/.zshrc", "")
        .build();
    let cache = tempfile::tempdir().unwrap();

    stow(&ctx, &cache)
        .args(["install", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ zsh"));
    assert!(ctx.dest(".zshrc").symlink_metadata().unwrap().is_symlink());

    stow(&ctx, &cache)
        .args(["uninstall", "zsh"])
        .assert()
        .success();
    assert!(ctx.dest(".zshrc").symlink_metadata().is_err());
}

#[test]
fn install_all_expands_packages() {
    let ctx = TestContextBuilder::new()
        .with_package_file("zsh/.zshrc", "")
        .with_package_file("git/.gitconfig", "")
        .build();
    let cache = tempfile::tempdir().unwrap();

    stow(&ctx, &cache).args(["install", "all"]).assert().success();

    assert_eq!(ctx.home_tree(), vec![".gitconfig@", ".zshrc@"]);
}

#[test]
fn conflict_exits_nonzero_and_reports() {
    let ctx = TestContextBuilder::new()
        .with_package_file("zsh/.zshrc", "")
        .with_home_file(".zshrc", "mine")
        .build();
    let cache = tempfile::tempdir().unwrap();

    stow(&ctx, &cache)
        .args(["install", "zsh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("destination already exists"));
    assert_eq!(fs::read_to_string(ctx.dest(".zshrc")).unwrap(), "mine");
}

#[test]
fn dry_run_is_visible_without_verbose() {
    let ctx = TestContextBuilder::new()
        .with_package_file("zsh/.zshrc", "")
        .build();
    let cache = tempfile::tempdir().unwrap();

    stow(&ctx, &cache)
        .args(["--dry-run", "install", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[DRY RUN]").and(predicate::str::contains("ln -s")));
    assert!(ctx.home_tree().is_empty());
}

#[test]
fn missing_package_fails() {
    let ctx = TestContextBuilder::new().build();
    let cache = tempfile::tempdir().unwrap();

    stow(&ctx, &cache)
        .args(["install", "tmux"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("dotfiles package not found"));
}

#[test]
fn list_prints_names() {
    let ctx = TestContextBuilder::new()
        .with_package_file("zsh/.zshrc", "")
        .with_package_file("git/.gitconfig", "")
        .build();
    let cache = tempfile::tempdir().unwrap();

    stow(&ctx, &cache)
        .arg("list")
        .assert()
        .success()
        .stdout("git\nzsh\n");
}

#[test]
fn log_file_is_written() {
    let ctx = TestContextBuilder::new()
        .with_package_file("zsh/.zshrc", "")
        .build();
    let cache = tempfile::tempdir().unwrap();

    stow(&ctx, &cache).args(["install", "zsh"]).assert().success();

    let log = fs::read_to_string(cache.path().join("stow/install.log")).unwrap();
    assert!(log.contains("ln -s"), "{log}");
    assert!(!log.contains('\x1b'), "{log}");
}

#[test]
fn version_prints_name() {
    Command::cargo_bin("stow")
        .unwrap()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("stow "));
}

#[test]
fn completions_generate_script() {
    Command::cargo_bin("stow")
        .unwrap()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_stow"));
}
