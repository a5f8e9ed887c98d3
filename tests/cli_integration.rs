//! Runs the binary against the shipped catalog.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

fn sizer_cmd() -> Command {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_station-sizer"));
    cmd.current_dir(root).arg("--catalog").arg(root.join("datasets"));
    cmd
}

fn run(args: &[&str]) -> Output {
    sizer_cmd().args(args).output().expect("binary should run")
}

#[test]
fn prints_text_report() {
    let out = run(&["--archetype", "apartment_small", "--pack", "fridge"]);
    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("--- Energy Profile ---"));
    assert!(stdout.contains("2.5 / 4 / 6.5"));
    assert!(stdout.contains("tier_3_resilience"));
}

#[test]
fn prints_json_report() {
    let out = run(&[
        "--archetype",
        "apartment_small",
        "--select",
        "ac1p:fridge:1",
        "--city",
        "Istanbul",
        "--solar-wp",
        "2000",
        "--json",
    ]);
    assert!(out.status.success());

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).expect("stdout is JSON");
    assert_eq!(json["profile"]["solar"]["avg_daily_kwh"], 8.48);
    assert_eq!(json["profile"]["savings"]["year1_savings_tl"], 4526.0);
}

#[test]
fn reads_request_file_and_writes_csv() {
    let dir = tempdir().unwrap();
    let request = dir.path().join("request.json");
    let csv_out = dir.path().join("tiers.csv");
    std::fs::write(
        &request,
        r#"{"archetype": "off_grid_cabin", "packs": ["lighting_basic"]}"#,
    )
    .unwrap();

    let out = run(&[
        "--request",
        request.to_str().unwrap(),
        "--recommendations-out",
        csv_out.to_str().unwrap(),
    ]);
    assert!(out.status.success());

    let csv = std::fs::read_to_string(&csv_out).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("rank,tier_id,name,capacity_wh_total,inverter_w_continuous")
    );
    assert!(lines.next().unwrap().starts_with("1,tier_2_comfort,Comfort,2048,"));
}

#[test]
fn unknown_archetype_exits_nonzero() {
    let out = run(&["--archetype", "castle"]);
    assert!(!out.status.success());
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Archetype 'castle' not found."));
}

#[test]
fn missing_catalog_exits_nonzero() {
    let out = Command::new(env!("CARGO_BIN_EXE_station-sizer"))
        .args(["--catalog", "/nonexistent/catalog", "--archetype", "apartment_small"])
        .output()
        .expect("binary should run");
    assert_eq!(out.status.code(), Some(1));
}
