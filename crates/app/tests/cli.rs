use std::{fs, path::Path, process::Command};

use image::{Rgb, RgbImage};

fn shelfwatch() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_shelfwatch"));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write_png(path: &Path, shade: u8) {
    RgbImage::from_pixel(48, 32, Rgb([shade, shade, shade]))
        .save(path)
        .unwrap();
}

#[test]
fn synthetic_run_reports_demo_defect() {
    let output = shelfwatch()
        .args(["--camera-id", "aisle-9"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("frame_id=0 defects=1 camera_id=aisle-9\n"), "{stdout}");
    assert!(stdout.contains("WrongItem confidence=0.95"));
}

#[test]
fn timings_list_every_stage() {
    let output = shelfwatch().arg("--timings").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("stage[0] resize:"));
    assert!(stdout.contains("stage[1] normalize:"));
    assert!(stdout.contains("stage[2] defect_detection:"));
}

#[test]
fn multiple_inputs_write_one_report_each() {
    let dir = tempfile::tempdir().unwrap();
    let left = dir.path().join("left.png");
    let right = dir.path().join("right.png");
    write_png(&left, 10);
    write_png(&right, 200);
    let out_dir = dir.path().join("reports");

    let output = shelfwatch()
        .arg("--json")
        .arg("--workers")
        .arg("2")
        .arg("--output-dir")
        .arg(&out_dir)
        .arg("--input")
        .arg(&left)
        .arg(&right)
        .arg(dir.path().join("missing.png"))
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0]["input"].as_str().unwrap().ends_with("left.png"));
    assert!(lines[1]["input"].as_str().unwrap().ends_with("right.png"));

    for stem in ["left", "right"] {
        let text = fs::read_to_string(out_dir.join(format!("{stem}.txt"))).unwrap();
        assert!(text.starts_with("frame_id=0 defects=1"));
    }
}

#[test]
fn config_file_controls_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("pipeline.toml");
    fs::write(&config, "confidence_threshold = 0.99\nresize_width = 32\nresize_height = 32\n")
        .unwrap();

    let output = shelfwatch().arg("--config").arg(&config).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("frame_id=0 defects=0"), "{stdout}");
}

#[test]
fn model_backend_without_model_fails() {
    let output = shelfwatch().args(["--backend", "onnx"]).output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("requires model_path"), "{stderr}");
}

#[test]
fn unloadable_single_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = shelfwatch()
        .arg("--input")
        .arg(dir.path().join("nothing.png"))
        .output()
        .unwrap();
    assert!(!output.status.success());
}
