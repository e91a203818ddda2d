//! Binary-level tests: argument handling, validation and `--once`

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn foldsync() -> Command {
    Command::cargo_bin("foldsync").expect("binary should build")
}

#[test]
fn test_missing_options_fail_before_running() {
    foldsync()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing required option"));
}

#[test]
fn test_missing_source_is_fatal() {
    let root = TempDir::new().expect("create tempdir");

    foldsync()
        .arg("--source-folder")
        .arg(root.path().join("does-not-exist"))
        .arg("--replica-folder")
        .arg(root.path().join("replica"))
        .arg("--interval")
        .arg("5")
        .arg("--log-folder")
        .arg(root.path().join("logs"))
        .arg("--once")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Source path does not exist"));

    assert!(!root.path().join("replica").exists());
}

#[test]
fn test_nested_replica_is_rejected() {
    let root = TempDir::new().expect("create tempdir");
    let source = root.path().join("src");
    fs::create_dir(&source).expect("create source");

    foldsync()
        .arg("--source_folder")
        .arg(&source)
        .arg("--replica_folder")
        .arg(source.join("mirror"))
        .arg("--interval")
        .arg("5")
        .arg("--log_folder")
        .arg(root.path().join("logs"))
        .arg("--once")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nested"));
}

#[test]
fn test_once_mirrors_and_writes_log() {
    let root = TempDir::new().expect("create tempdir");
    let source = root.path().join("src");
    let replica = root.path().join("replica");
    let logs = root.path().join("logs");
    fs::create_dir_all(source.join("sub")).expect("create source");
    fs::write(source.join("sub/a.txt"), b"hello").expect("write");

    foldsync()
        .arg("--source_folder")
        .arg(&source)
        .arg("--replica_folder")
        .arg(&replica)
        .arg("--interval")
        .arg("60")
        .arg("--log_folder")
        .arg(&logs)
        .arg("--once")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sync run completed"));

    assert_eq!(fs::read(replica.join("sub/a.txt")).expect("read copy"), b"hello");

    let log_files: Vec<_> = fs::read_dir(&logs)
        .expect("log folder exists")
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with("foldsync"))
        .collect();
    assert_eq!(log_files.len(), 1);
    let contents = fs::read_to_string(log_files[0].path()).expect("read log");
    assert!(contents.contains("File sub/a.txt copied"));
    assert!(contents.contains("Exiting after 1 run(s)."));
}

#[test]
fn test_config_file_supplies_options() {
    let root = TempDir::new().expect("create tempdir");
    let source = root.path().join("src");
    let replica = root.path().join("replica");
    fs::create_dir(&source).expect("create source");
    fs::write(source.join("b.txt"), b"from config").expect("write");

    let config_path = root.path().join("foldsync.toml");
    fs::write(
        &config_path,
        format!(
            "source_folder = {:?}\nreplica_folder = {:?}\ninterval = 30\nlog_folder = {:?}\n",
            source.display().to_string(),
            replica.display().to_string(),
            root.path().join("logs").display().to_string(),
        ),
    )
    .expect("write config");

    foldsync()
        .arg("--config")
        .arg(&config_path)
        .arg("--once")
        .assert()
        .success();

    assert_eq!(fs::read(replica.join("b.txt")).expect("read copy"), b"from config");
}

#[test]
fn test_log_folder_inside_replica_is_rejected() {
    let root = TempDir::new().expect("create tempdir");
    let source = root.path().join("src");
    let replica = root.path().join("replica");
    fs::create_dir(&source).expect("create source");

    foldsync()
        .arg("--source-folder")
        .arg(&source)
        .arg("--replica-folder")
        .arg(&replica)
        .arg("--interval")
        .arg("5")
        .arg("--log-folder")
        .arg(replica.join("logs"))
        .arg("--once")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Log folder cannot be inside the replica"));

    assert!(!replica.exists());
}
