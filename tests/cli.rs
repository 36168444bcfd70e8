use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const DAY: u64 = 24 * 60 * 60;

struct Roots {
    temp: TempDir,
}

impl Roots {
    fn new() -> Self {
        let roots = Self {
            temp: TempDir::new().unwrap(),
        };
        fs::create_dir_all(roots.mail_root()).unwrap();
        roots
    }

    fn mail_root(&self) -> PathBuf {
        self.temp.path().join("vhosts")
    }

    fn backup_root(&self) -> PathBuf {
        self.temp.path().join("backup")
    }

    fn log_dir(&self) -> PathBuf {
        self.temp.path().join("log")
    }

    fn mailbox(&self, domain: &str, user: &str, age_days: u64) -> PathBuf {
        let dir = self.mail_root().join(domain).join(user);
        fs::create_dir_all(dir.join("cur")).unwrap();
        fs::write(dir.join("cur/1700000000.M1P1.host:2,S"), b"Subject: hi\n\nhello\n").unwrap();
        let mtime = SystemTime::now() - Duration::from_secs(age_days * DAY);
        File::open(&dir).unwrap().set_modified(mtime).unwrap();
        dir
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("mailbackup").unwrap();
        cmd.env("MAILBACKUP_MAIL_ROOT", self.mail_root())
            .env("MAILBACKUP_BACKUP_ROOT", self.backup_root())
            .env("MAILBACKUP_LOG_DIR", self.log_dir())
            .env("MAILBACKUP_CONFIG", self.temp.path().join("config.json"));
        cmd
    }

    /// Contents of the single log file a run leaves behind
    fn run_log(&self) -> String {
        let logs: Vec<_> = fs::read_dir(self.log_dir())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(logs.len(), 1, "{:?}", logs);
        fs::read_to_string(&logs[0]).unwrap()
    }

    fn archives(&self) -> Vec<PathBuf> {
        let mut found = Vec::new();
        collect_archives(&self.backup_root(), &mut found);
        found.sort();
        found
    }
}

fn collect_archives(dir: &Path, found: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect_archives(&path, found);
        } else if path.to_string_lossy().ends_with(".tar.gz") {
            found.push(path);
        }
    }
}

#[test]
fn batch_backup_archives_old_and_keeps_recent() {
    let roots = Roots::new();
    let alice = roots.mailbox("example.com", "alice", 100);
    let bob = roots.mailbox("example.com", "bob", 10);

    roots
        .cmd()
        .args(["--batch", "--min-age", "90"])
        .assert()
        .success()
        .stdout(predicate::str::contains("archived"))
        .stdout(predicate::str::contains("1 mailbox(es) archived and deleted, 1 skipped, 0 failed"));

    assert!(!alice.exists());
    assert!(bob.is_dir());

    let archives = roots.archives();
    assert_eq!(archives.len(), 1);
    let name = archives[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("example.com_alice_"), "{}", name);

    let log = roots.run_log();
    let count = |needle: &str| log.lines().filter(|l| l.contains(needle)).count();
    assert_eq!(count("Archived example.com/alice"), 1);
    assert_eq!(count("Deleted mailbox"), 1);
    assert_eq!(count(&format!("Deleted mailbox {}", alice.display())), 1);
    assert_eq!(count("Skipping"), 1);
    assert_eq!(count(&format!("Skipping {}", bob.display())), 1);
    assert_eq!(count("Failed to process"), 0);
}

#[test]
fn dry_run_changes_nothing() {
    let roots = Roots::new();
    let alice = roots.mailbox("example.com", "alice", 100);

    roots
        .cmd()
        .args(["--batch", "--dry-run"])
        .assert()
        .success()
        .stderr(predicate::str::contains("[DRY RUN] Would archive"))
        .stderr(predicate::str::contains(format!(
            "[DRY RUN] Would delete mailbox {}",
            alice.display()
        )))
        .stdout(predicate::str::contains("would archive"));

    assert!(alice.is_dir());
    assert!(!roots.backup_root().exists());

    let log = roots.run_log();
    assert_eq!(log.matches("[DRY RUN] Would delete mailbox").count(), 1);
    assert!(!log.contains("Deleted mailbox"));
}

#[test]
fn empty_mail_root_is_not_an_abort() {
    let roots = Roots::new();
    roots
        .cmd()
        .arg("--batch")
        .assert()
        .success()
        .stderr(predicate::str::contains("No domain directories"));
}

#[test]
fn batch_backup_then_search_then_restore() {
    let roots = Roots::new();
    let alice = roots.mailbox("example.com", "alice", 100);
    roots.mailbox("example.com", "bob", 100);

    roots.cmd().args(["--batch"]).assert().success();
    assert!(!alice.exists());

    let output = roots
        .cmd()
        .args(["--search", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("example.com_alice_"))
        .stdout(predicate::str::contains("bob").not())
        .get_output()
        .stdout
        .clone();
    let archive = String::from_utf8(output)
        .unwrap()
        .lines()
        .next()
        .unwrap()
        .to_string();

    roots
        .cmd()
        .args(["--batch", "--restore", archive.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Restored example.com/alice"));

    assert!(alice.join("cur").is_dir());
}

#[test]
fn restore_refuses_to_overwrite_without_force() {
    let roots = Roots::new();
    let alice = roots.mailbox("example.com", "alice", 100);
    roots.cmd().args(["--batch"]).assert().success();
    let archive = roots.archives().remove(0);

    fs::create_dir_all(alice.join("new")).unwrap();
    roots
        .cmd()
        .arg("--batch")
        .arg("--restore")
        .arg(&archive)
        .assert()
        .code(73);
    assert!(alice.join("new").is_dir());

    roots
        .cmd()
        .arg("--batch")
        .arg("--force")
        .arg("--restore")
        .arg(&archive)
        .assert()
        .success();
    assert!(!alice.join("new").exists());
    assert!(alice.join("cur").is_dir());
}

#[test]
fn restore_missing_archive_is_no_input() {
    let roots = Roots::new();
    roots
        .cmd()
        .args(["--restore", "/nonexistent/example.com_alice_2024-01-01_00-00-00.tar.gz"])
        .assert()
        .code(66)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn restore_corrupt_archive_is_data_error() {
    let roots = Roots::new();
    let bogus = roots
        .temp
        .path()
        .join("example.com_alice_2024-01-01_00-00-00.tar.gz");
    fs::write(&bogus, b"not a gzip stream").unwrap();

    roots
        .cmd()
        .arg("--restore")
        .arg(&bogus)
        .assert()
        .code(65);
    assert!(!roots.mail_root().join("example.com").exists());
}

#[test]
fn search_without_backup_root_fails() {
    let roots = Roots::new();
    roots.cmd().args(["--search", "alice"]).assert().code(66);
}

#[test]
fn search_with_no_hits() {
    let roots = Roots::new();
    fs::create_dir_all(roots.backup_root()).unwrap();
    roots
        .cmd()
        .args(["--search", "zed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No archives matching 'zed'."));
}

#[test]
fn missing_mail_root_is_no_input() {
    let roots = Roots::new();
    fs::remove_dir(roots.mail_root()).unwrap();
    roots.cmd().arg("--batch").assert().code(66);
}

#[test]
fn batch_with_traversal_domain_is_usage_error() {
    let roots = Roots::new();
    roots.mailbox("example.com", "alice", 100);
    roots
        .cmd()
        .args(["--batch", "--domain", ".."])
        .assert()
        .code(64);
    assert!(roots.mail_root().join("example.com/alice").is_dir());
}

#[test]
fn invalid_settings_file_is_config_error() {
    let roots = Roots::new();
    let config = roots.temp.path().join("config.json");
    fs::write(&config, "{ broken").unwrap();
    roots
        .cmd()
        .arg("--batch")
        .assert()
        .code(78)
        .stderr(predicate::str::contains("Failed to parse settings file"));
}

#[test]
fn conflicting_modes_are_rejected() {
    let roots = Roots::new();
    roots
        .cmd()
        .args(["--restore", "a.tar.gz", "--search", "a"])
        .assert()
        .failure();
    roots.cmd().args(["--min-age", "soon", "--batch"]).assert().failure();
    roots.cmd().args(["--min-age", "30"]).assert().failure();
}

#[test]
fn interactive_run_reads_answers_from_stdin() {
    let roots = Roots::new();
    let alice = roots.mailbox("example.com", "alice", 100);
    roots.mailbox("other.org", "carol", 100);

    roots
        .cmd()
        .write_stdin("example.com\n30\nyes\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. example.com"))
        .stdout(predicate::str::contains("2. other.org"));

    assert!(!alice.exists());
    assert!(roots.mail_root().join("other.org/carol").is_dir());
}

#[test]
fn interactive_run_declined_is_temp_fail() {
    let roots = Roots::new();
    let alice = roots.mailbox("example.com", "alice", 100);

    roots.cmd().write_stdin("all\n\nno\n").assert().code(75);
    assert!(alice.is_dir());
}
