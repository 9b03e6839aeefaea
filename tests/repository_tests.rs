//! Integration tests for the MacroVault repository.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use macrovault::crypto::seal;
use macrovault::errors::MacroVaultError;
use macrovault::repository::{MacroRepository, Record};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tempfile::TempDir;

const PASSWORD: &str = "secret123";

/// Helper: a macro file path inside a fresh temp dir.
fn macro_path(name: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join(format!("{name}.gma.json"));
    (dir, path)
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Operation {
    kind: String,
    x: i32,
    y: i32,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Recording {
    name: String,
    created_at: String,
    operations: Vec<Operation>,
    #[serde(default)]
    metadata: std::collections::BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// Save and load round trip
// ---------------------------------------------------------------------------

#[test]
fn save_and_load_opaque_record() {
    let (_dir, path) = macro_path("m1");
    let repo = MacroRepository::new();

    repo.save(&json!({"name": "m1", "operations": []}), &path, PASSWORD)
        .expect("save");

    let record: Record = repo.load(&path, PASSWORD).expect("load");
    assert_eq!(record["name"], "m1");
    assert_eq!(record["operations"], json!([]));
    assert!(!record.contains_key("_metadata"));
}

#[test]
fn save_and_load_typed_record_preserves_order() {
    let (_dir, path) = macro_path("typed");
    let repo = MacroRepository::new();

    let recording = Recording {
        name: "typed".into(),
        created_at: "2024-05-01T12:00:00Z".into(),
        operations: vec![
            Operation { kind: "click".into(), x: 1, y: 2 },
            Operation { kind: "drag".into(), x: 3, y: 4 },
            Operation { kind: "click".into(), x: 5, y: 6 },
        ],
        metadata: [("author".to_string(), "qa".to_string())].into(),
    };

    repo.save(&recording, &path, PASSWORD).unwrap();
    let loaded: Recording = repo.load(&path, PASSWORD).unwrap();
    assert_eq!(loaded, recording);
}

#[test]
fn file_on_disk_is_not_plaintext() {
    let (_dir, path) = macro_path("secret");
    let repo = MacroRepository::new();
    repo.save(&json!({"name": "very-secret-macro"}), &path, PASSWORD)
        .unwrap();

    let raw = fs::read(&path).unwrap();
    let needle = b"very-secret-macro";
    assert!(!raw.windows(needle.len()).any(|w| w == needle));
}

#[test]
fn save_overwrites_previous_content() {
    let (_dir, path) = macro_path("m1");
    let repo = MacroRepository::new();

    repo.save(&json!({"name": "first"}), &path, PASSWORD).unwrap();
    repo.save(&json!({"name": "second"}), &path, "another-pass")
        .unwrap();

    let record: Record = repo.load(&path, "another-pass").unwrap();
    assert_eq!(record["name"], "second");
    assert!(matches!(
        repo.load::<Record>(&path, PASSWORD),
        Err(MacroVaultError::InvalidPassword)
    ));
}

// ---------------------------------------------------------------------------
// Load failures
// ---------------------------------------------------------------------------

#[test]
fn missing_file_is_not_found() {
    let (_dir, path) = macro_path("missing");
    let result = MacroRepository::new().load::<Record>(&path, PASSWORD);
    assert!(matches!(result, Err(MacroVaultError::NotFound(p)) if p == path));
}

#[test]
fn wrong_password_is_invalid_password() {
    let (_dir, path) = macro_path("m1");
    let repo = MacroRepository::new();
    repo.save(&json!({"name": "m1"}), &path, PASSWORD).unwrap();

    for wrong in ["wrong", "secret1234", "Secret123"] {
        assert!(matches!(
            repo.load::<Record>(&path, wrong),
            Err(MacroVaultError::InvalidPassword)
        ));
    }
}

#[test]
fn tampered_file_is_invalid_password() {
    let (_dir, path) = macro_path("m1");
    let repo = MacroRepository::new();
    repo.save(&json!({"name": "m1"}), &path, PASSWORD).unwrap();

    let mut data = fs::read(&path).unwrap();
    let last = data.len() - 1;
    data[last] ^= 0xFF;
    fs::write(&path, &data).unwrap();

    assert!(matches!(
        repo.load::<Record>(&path, PASSWORD),
        Err(MacroVaultError::InvalidPassword)
    ));
}

#[test]
fn truncated_file_is_corrupted() {
    let (_dir, path) = macro_path("short");
    fs::write(&path, [0u8; 20]).unwrap();

    assert!(matches!(
        MacroRepository::new().load::<Record>(&path, PASSWORD),
        Err(MacroVaultError::CorruptedData(_))
    ));
}

#[test]
fn decrypted_garbage_is_corrupted_not_invalid_password() {
    let (_dir, path) = macro_path("garbage");
    fs::write(&path, seal(b"\x00\x01 not json", PASSWORD).unwrap()).unwrap();

    assert!(matches!(
        MacroRepository::new().load::<Record>(&path, PASSWORD),
        Err(MacroVaultError::CorruptedData(_))
    ));
}

#[test]
fn decrypted_non_object_is_corrupted() {
    let (_dir, path) = macro_path("array");
    fs::write(&path, seal(b"[1, 2, 3]", PASSWORD).unwrap()).unwrap();

    assert!(matches!(
        MacroRepository::new().load::<Record>(&path, PASSWORD),
        Err(MacroVaultError::CorruptedData(_))
    ));
}

#[test]
fn missing_required_fields_are_corrupted() {
    let (_dir, path) = macro_path("partial");
    let repo = MacroRepository::new();
    repo.save(&json!({"name": "partial"}), &path, PASSWORD)
        .unwrap();

    assert!(matches!(
        repo.load::<Recording>(&path, PASSWORD),
        Err(MacroVaultError::CorruptedData(_))
    ));
}

#[test]
fn legacy_file_without_metadata_still_loads() {
    let (_dir, path) = macro_path("legacy");
    fs::write(
        &path,
        seal(br#"{"name":"legacy","operations":[]}"#, PASSWORD).unwrap(),
    )
    .unwrap();

    let record: Record = MacroRepository::new().load(&path, PASSWORD).unwrap();
    assert_eq!(record["name"], "legacy");
}

// ---------------------------------------------------------------------------
// exists / delete / list / info
// ---------------------------------------------------------------------------

#[test]
fn exists_tracks_the_file() {
    let (dir, path) = macro_path("m1");
    let repo = MacroRepository::new();

    assert!(!repo.exists(&path));
    repo.save(&json!({"name": "m1"}), &path, PASSWORD).unwrap();
    assert!(repo.exists(&path));
    assert!(!repo.exists(dir.path()), "directories are not macro files");
}

#[test]
fn delete_then_delete_again_succeeds() {
    let (_dir, path) = macro_path("m1");
    let repo = MacroRepository::new();
    repo.save(&json!({"name": "m1"}), &path, PASSWORD).unwrap();

    assert!(repo.delete(&path).unwrap());
    assert!(!repo.delete(&path).unwrap());
    assert!(!path.exists());
}

fn set_mtime(path: &std::path::Path, secs_ago: u64) {
    let when = SystemTime::now() - Duration::from_secs(secs_ago);
    fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(when)
        .unwrap();
}

#[test]
fn list_recordings_newest_first_and_filtered() {
    let dir = TempDir::new().unwrap();
    let repo = MacroRepository::new();

    for (name, age) in [("old", 300), ("newest", 10), ("middle", 100)] {
        let path = dir.path().join(format!("{name}.gma.json"));
        repo.save(&json!({"name": name}), &path, PASSWORD).unwrap();
        set_mtime(&path, age);
    }
    fs::write(dir.path().join("notes.txt"), b"ignore me").unwrap();
    fs::write(dir.path().join("plain.json"), b"{}").unwrap();

    let listed = repo.list_recordings(dir.path()).unwrap();
    let names: Vec<String> = listed
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(
        names,
        ["newest.gma.json", "middle.gma.json", "old.gma.json"]
    );

    // Re-listing reflects the current filesystem, not a cached view.
    repo.delete(&listed[0]).unwrap();
    assert_eq!(repo.list_recordings(dir.path()).unwrap().len(), 2);
}

#[test]
fn list_recordings_of_missing_dir_is_empty() {
    let dir = TempDir::new().unwrap();
    let listed = MacroRepository::new()
        .list_recordings(&dir.path().join("nope"))
        .unwrap();
    assert!(listed.is_empty());
}

#[test]
fn file_info_reads_metadata_without_password() {
    let (_dir, path) = macro_path("m1");
    let repo = MacroRepository::new();
    repo.save(&json!({"name": "m1"}), &path, PASSWORD).unwrap();

    let info = repo.file_info(&path).unwrap();
    assert_eq!(info.name, "m1.gma.json");
    assert_eq!(info.size, fs::metadata(&path).unwrap().len());
    assert!(info.encrypted);
    assert!(info.modified <= chrono::Utc::now());
}
