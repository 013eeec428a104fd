extern crate assert_cmd;
extern crate predicates;
extern crate tempfile;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

const LINEAR: &str = r#"{
    "n": 8, "split": 2, "iters": 20, "frameCount": 3, "r": 1.5, "p": 2,
    "seqType": "linear", "c": [0, 0], "linear": {"cEnd": [0.3, 0.3]}
}"#;

#[test]
fn render_writes_frames_manifest_and_caption() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.json");
    fs::write(&input, LINEAR).unwrap();

    Command::cargo_bin("julia")
        .unwrap()
        .arg("render")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(dir.path())
        .arg("--threads")
        .arg("2")
        .assert()
        .success();

    for frame in 0..3 {
        assert!(dir
            .path()
            .join(format!("images/frame{}.png", frame))
            .exists());
    }
    let manifest = fs::read_to_string(dir.path().join("framelist.txt")).unwrap();
    assert_eq!(manifest.lines().count(), 66);
    assert!(manifest.starts_with("file 'images/frame0.png'\n"));
    let caption = fs::read_to_string(dir.path().join("caption.txt")).unwrap();
    assert!(caption.contains("from 0.00 + 0.00i to 0.30 + 0.30i"));
}

#[test]
fn forward_playback_has_no_return_trip() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.json");
    fs::write(&input, LINEAR).unwrap();

    Command::cargo_bin("julia")
        .unwrap()
        .args(&["render", "--playback", "forward", "--input"])
        .arg(&input)
        .arg("--output")
        .arg(dir.path())
        .assert()
        .success();

    let manifest = fs::read_to_string(dir.path().join("framelist.txt")).unwrap();
    assert_eq!(manifest.lines().count(), 33);
}

#[test]
fn malformed_input_fails_before_rendering() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.json");
    fs::write(&input, LINEAR.replace(r#""split": 2"#, r#""split": 0"#)).unwrap();

    Command::cargo_bin("julia")
        .unwrap()
        .arg("render")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration"));
    assert!(!dir.path().join("images").exists());
}

#[test]
fn generate_writes_a_usable_input_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.json");

    Command::cargo_bin("julia")
        .unwrap()
        .args(&["generate", "--seed", "9", "--output"])
        .arg(&input)
        .assert()
        .success();

    let text = fs::read_to_string(&input).unwrap();
    let parsed = juliaseq::InputFile::from_json(&text).unwrap();
    assert!(parsed.validate().is_ok());
    assert_eq!(parsed.n, 256);
}

#[test]
fn bad_thread_count_is_rejected() {
    Command::cargo_bin("julia")
        .unwrap()
        .args(&["render", "--threads", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Thread count"));
}
