//! Tests of the `bakr` binary

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Env {
    temp: TempDir,
}

impl Env {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let data = temp.path().join("data");
        fs::create_dir_all(&data).unwrap();
        // Keep the ancestor search inside the fixture
        fs::write(
            data.join("config.json"),
            r#"{"search": {"max_ancestor_levels": 1}}"#,
        )
        .unwrap();
        fs::create_dir_all(temp.path().join("work")).unwrap();
        Self { temp }
    }

    fn work(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp.path().join("work").join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn data(&self) -> PathBuf {
        self.temp.path().join("data")
    }

    fn bakr(&self) -> Command {
        let mut cmd = Command::cargo_bin("bakr").unwrap();
        cmd.env("BAKR_DATA_DIR", self.data()).env_remove("BAKR_LOG");
        cmd
    }
}

fn arg(path: &Path) -> String {
    path.display().to_string()
}

#[test]
fn locate_prints_backup() {
    let env = Env::new();
    let file = env.work("notes.txt", "new");
    env.work("notes.txt.bak", "old");

    env.bakr()
        .args(["locate", &arg(&file)])
        .assert()
        .success()
        .stdout(predicate::str::contains("notes.txt.bak"));
}

#[test]
fn locate_reports_missing_backup() {
    let env = Env::new();
    let file = env.work("lonely.txt", "x");

    env.bakr()
        .args(["locate", &arg(&file)])
        .assert()
        .success()
        .stdout(predicate::str::contains("No backup found"));
}

#[test]
fn locate_explain_shows_plan() {
    let env = Env::new();
    let file = env.work("notes.txt", "new");

    env.bakr()
        .args(["locate", "--explain", &arg(&file)])
        .assert()
        .success()
        .stdout(predicate::str::contains("Same directory:"))
        .stdout(predicate::str::contains("Winner: none"));
}

#[test]
fn preview_does_not_modify() {
    let env = Env::new();
    let file = env.work("notes.txt", "new");
    env.work("notes.txt.bak", "old");

    env.bakr()
        .args(["preview", &arg(&file)])
        .assert()
        .success()
        .stdout(predicate::str::contains("notes.txt.new"));

    assert_eq!(fs::read_to_string(&file).unwrap(), "new");
    assert!(!file.with_file_name("notes.txt.new").exists());
}

#[test]
fn restore_without_force_prints_plan() {
    let env = Env::new();
    let file = env.work("notes.txt", "new");
    env.work("notes.txt.bak", "old");

    env.bakr()
        .args(["restore", &arg(&file)])
        .assert()
        .success()
        .stdout(predicate::str::contains("Restore plan:"))
        .stdout(predicate::str::contains("--force"));

    assert_eq!(fs::read_to_string(&file).unwrap(), "new");
}

#[test]
fn restore_with_force_restores_and_records_history() {
    let env = Env::new();
    let file = env.work("notes.txt", "new");
    let backup = env.work("notes.txt.bak", "old");

    env.bakr()
        .args(["restore", "--force", &arg(&file)])
        .assert()
        .success()
        .stdout(predicate::str::contains("[100%]"));

    assert_eq!(fs::read_to_string(&file).unwrap(), "old");
    assert_eq!(
        fs::read_to_string(file.with_file_name("notes.txt.new")).unwrap(),
        "new"
    );
    assert!(!backup.exists());
    assert_eq!(fs::read_dir(env.data().join("trash")).unwrap().count(), 1);

    env.bakr()
        .args(["history"])
        .assert()
        .success()
        .stdout(predicate::str::contains("RESTORED"));
}

#[test]
fn restore_with_force_handles_same_named_files() {
    let env = Env::new();
    let mtime = std::time::SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_700_000_000);
    let files: Vec<PathBuf> = ["d1", "d2"]
        .iter()
        .map(|dir| {
            fs::create_dir_all(env.temp.path().join("work").join(dir)).unwrap();
            env.work(&format!("{}/f.txt.bak", dir), "old");
            let file = env.work(&format!("{}/f.txt", dir), "new");
            fs::File::options()
                .write(true)
                .open(&file)
                .unwrap()
                .set_modified(mtime)
                .unwrap();
            file
        })
        .collect();

    env.bakr()
        .args(["restore", "--force", &arg(&files[0]), &arg(&files[1])])
        .assert()
        .success();

    for file in &files {
        assert_eq!(fs::read_to_string(file).unwrap(), "old");
    }
}

#[test]
fn restore_with_force_fails_without_backup() {
    let env = Env::new();
    let file = env.work("lonely.txt", "x");

    env.bakr()
        .args(["restore", "--force", &arg(&file)])
        .assert()
        .failure();
}

#[test]
fn backup_override_requires_single_file() {
    let env = Env::new();
    let a = env.work("a.txt", "1");
    let b = env.work("b.txt", "2");
    let bak = env.work("x.bak", "0");

    env.bakr()
        .args(["restore", "--backup", &arg(&bak), &arg(&a), &arg(&b)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("single file"));
}

#[test]
fn queue_workflow() {
    let env = Env::new();
    let file = env.work("notes.txt", "new");
    env.work("notes.txt.bak", "old");
    let out = env.temp.path().join("queue.yaml");

    env.bakr()
        .args(["queue", "add", &arg(&file)])
        .assert()
        .success()
        .stdout(predicate::str::contains("Queued"));

    env.bakr()
        .args(["queue", "scan"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[100%] Found backup notes.txt.bak"));

    env.bakr()
        .args(["queue", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("completed"));

    env.bakr()
        .args(["queue", "restore"])
        .assert()
        .success();
    assert_eq!(fs::read_to_string(&file).unwrap(), "old");

    env.bakr()
        .args(["queue", "report", "--csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("id,name,path,size,status"));

    env.bakr()
        .args(["queue", "export", &arg(&out)])
        .assert()
        .success();
    let yaml = fs::read_to_string(&out).unwrap();
    assert!(yaml.starts_with("# bakr queue export"));
    assert!(yaml.contains("notes.txt"));

    env.bakr().args(["queue", "clear"]).assert().success();
    env.bakr()
        .args(["queue", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Queue is empty."));
}

#[test]
fn queue_bind_rejects_mismatch() {
    let env = Env::new();
    let file = env.work("notes.txt", "four");

    let output = env
        .bakr()
        .args(["queue", "expect", "notes.txt", "3"])
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let id = stdout
        .split_whitespace()
        .skip_while(|w| *w != "as")
        .nth(1)
        .unwrap()
        .to_string();

    env.bakr()
        .args(["queue", "bind", &id, &arg(&file)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not match"));
}

#[test]
fn config_shows_paths() {
    let env = Env::new();

    env.bakr()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains(arg(&env.data())))
        .stdout(predicate::str::contains("Max ancestor levels: 1"));
}
