//! Helpers shared by the backup tests

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use walkdir::WalkDir;

/// Populate a maildir-like mailbox with a few messages and an empty `tmp/`
pub fn write_mailbox(path: &Path) {
    for sub in ["cur", "new", "tmp", ".Sent/cur"] {
        fs::create_dir_all(path.join(sub)).unwrap();
    }

    // Poorly compressible payload so archives have some bulk to them
    let mut state: u32 = 0x2545_f491;
    let mut body = Vec::with_capacity(16 * 1024);
    for _ in 0..16 * 1024 {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        body.push((state & 0xff) as u8);
    }

    fs::write(path.join("cur").join("1700000000.M1P1.host:2,S"), &body).unwrap();
    fs::write(
        path.join("new").join("1700000001.M2P1.host"),
        b"From: bob@example.com\r\nSubject: hi\r\n\r\nhello\r\n",
    )
    .unwrap();
    fs::write(path.join(".Sent").join("cur").join("1700000002.M3P1.host:2,S"), &body[..512])
        .unwrap();
    fs::write(path.join("dovecot-uidlist"), b"3 V1700000000 N4\n").unwrap();
}

/// Relative path -> file contents (`None` for directories), root excluded
pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, Option<Vec<u8>>> {
    let mut tree = BTreeMap::new();
    if !root.exists() {
        return tree;
    }
    for entry in WalkDir::new(root).min_depth(1) {
        let entry = entry.unwrap();
        let rel = entry.path().strip_prefix(root).unwrap().to_path_buf();
        let contents = if entry.file_type().is_file() {
            Some(fs::read(entry.path()).unwrap())
        } else {
            None
        };
        tree.insert(rel, contents);
    }
    tree
}

/// Backdate a directory's mtime by `days`
pub fn set_age_days(path: &Path, now: SystemTime, days: u64) {
    let when = now - Duration::from_secs(days * 86_400);
    File::open(path).unwrap().set_modified(when).unwrap();
}
