// Integration tests for the partline binary: exit codes and the --json
// stdout contract.
//
// Every test points --config at a scratch settings file so the user's own
// settings and catalog are never touched.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../rows/tests/fixtures")
        .join(name)
}

struct Scratch {
    dir: TempDir,
    config: PathBuf,
}

impl Scratch {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("settings.toml");
        let db = dir.path().join("catalog.db");
        std::fs::write(
            &config,
            format!("[catalog]\ndatabase = {:?}\n", db.to_str().unwrap()),
        )
        .unwrap();
        Self { dir, config }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_partline"))
            .arg("--config")
            .arg(&self.config)
            .args(args)
            .env_remove("RUST_LOG")
            .output()
            .expect("run partline")
    }
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim())
        .unwrap_or_else(|e| panic!("stdout must be one JSON value: {e}\n{stdout}"))
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "exit code: {:?}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
}

// ===========================================================================
// generate
// ===========================================================================

#[test]
fn generate_matches_golden_file() {
    let s = Scratch::new();
    let sheet = fixture("job-24001.json");
    let golden = fixture("job-24001.expected.json");

    let output = s.run(&["generate", arg(&sheet), "--expect", arg(&golden), "--json"]);
    assert_success(&output);

    let json = stdout_json(&output);
    assert_eq!(json["job_number"], "24001");
    assert_eq!(json["heater_items"].as_array().unwrap().len(), 7);
    assert_eq!(json["heater_items"][0]["item_number"], "24001-01");
    assert_eq!(json["heater_items"][0]["template"], "FGFAB");
    assert_eq!(json["tank_items"][0]["item_number"], "24001-02");
}

#[test]
fn generate_table_output() {
    let s = Scratch::new();
    let output = s.run(&["generate", arg(&fixture("job-24001.json"))]);
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let first = stdout.lines().next().unwrap();
    assert!(first.starts_with("Item Number"));
    assert!(first.ends_with("Product Type"));
    assert!(stdout.contains("24001-01-000"));
    assert!(stdout.contains("Pegged Supply"));
}

#[test]
fn generate_single_record() {
    let s = Scratch::new();
    let record = s.write(
        "tank.json",
        r#"{"kind": "tank", "job_number": "25007", "tank_diameter": 120, "tank_height": 16}"#,
    );

    let output = s.run(&["generate", arg(&record), "--json"]);
    assert_success(&output);
    let json = stdout_json(&output);
    let rows = json["rows"].as_array().unwrap();
    assert!(!rows.is_empty());
    assert_eq!(rows[0]["item_number"], "25007-01");
    assert_eq!(rows[0]["bom"], "25007-01-000");
}

#[test]
fn generate_reports_golden_mismatch() {
    let s = Scratch::new();
    let golden = std::fs::read_to_string(fixture("job-24001.expected.json"))
        .unwrap()
        .replacen("HEATER, SHELL", "HEATER, SHEL", 1);
    let golden = s.write("golden.json", &golden);

    let output = s.run(&["generate", arg(&fixture("job-24001.json")), "--expect", arg(&golden)]);
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("description"), "stderr: {stderr}");
    assert!(stderr.contains("1 mismatch"), "stderr: {stderr}");
}

#[test]
fn generate_missing_and_invalid_sheets() {
    let s = Scratch::new();
    let missing = s.run(&["generate", arg(&s.path("nope.json"))]);
    assert_eq!(missing.status.code(), Some(2));

    let bad = s.write("bad.json", r#"{"kind": "pump", "job_number": "1"}"#);
    let invalid = s.run(&["generate", arg(&bad)]);
    assert_eq!(invalid.status.code(), Some(4));
}

// ===========================================================================
// sync / search / suggest
// ===========================================================================

const SNAPSHOT: &str = "\
Item Number,Description,Size,Unit Cost,Vendor Name
VLV-100,GATE VALVE,4,120.00,Valveco
VLV-200,BALL VALVE 2IN,2,\"$1,045.50\",Acme
PIP-010,PIPE SCH40,2,8.25,Acme Valve
,ORPHAN ROW,1,1.00,Nobody
";

#[test]
fn sync_then_search_and_suggest() {
    let s = Scratch::new();
    let snapshot = s.write("parts.csv", SNAPSHOT);

    let first = s.run(&["sync", arg(&snapshot), "--json"]);
    assert_success(&first);
    let report = stdout_json(&first);
    assert_eq!(report["summary"]["created"], 3);
    assert_eq!(report["summary"]["skipped"], 1);
    assert_eq!(report["skipped"][0]["reason"], "missing_key");

    let again = s.run(&["sync", arg(&snapshot), "--json"]);
    assert_success(&again);
    let report = stdout_json(&again);
    assert_eq!(report["summary"]["created"], 0);
    assert_eq!(report["summary"]["updated"], 0);
    assert_eq!(report["summary"]["unchanged"], 3);

    let found = s.run(&["search", "valve", "--json"]);
    assert_success(&found);
    let page = stdout_json(&found);
    assert_eq!(page["total"], 3);
    assert_eq!(page["results"][0]["item_number"], "VLV-100");
    assert_eq!(page["results"][1]["unit_cost"], 1045.5);

    let vendor_only = s.run(&["search", "valve", "--column", "vendor_name", "--json"]);
    assert_success(&vendor_only);
    assert_eq!(stdout_json(&vendor_only)["total"], 2);

    let suggested = s.run(&["suggest", "vlv", "--json"]);
    assert_success(&suggested);
    let items: Vec<String> = stdout_json(&suggested)
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["item_number"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(items, vec!["VLV-100", "VLV-200"]);
}

#[test]
fn sync_soft_deletes_and_dry_run_writes_nothing() {
    let s = Scratch::new();
    let full = s.write("full.csv", SNAPSHOT);
    assert_success(&s.run(&["sync", arg(&full)]));

    let partial = s.write(
        "partial.json",
        r#"[{"Item Number": "VLV-100", "Description": "GATE VALVE", "Size": "4", "Unit Cost": 135, "Vendor Name": "Valveco"}]"#,
    );

    let preview = s.run(&["sync", arg(&partial), "--dry-run", "--json"]);
    assert_success(&preview);
    let report = stdout_json(&preview);
    assert_eq!(report["summary"]["dry_run"], true);
    assert_eq!(report["updated"], serde_json::json!(["VLV-100"]));
    assert_eq!(report["deleted"], serde_json::json!(["PIP-010", "VLV-200"]));

    // Still three live entries after the dry run.
    assert_eq!(stdout_json(&s.run(&["search", "a", "--json"]))["total"], 3);

    assert_success(&s.run(&["sync", arg(&partial)]));
    let page = stdout_json(&s.run(&["search", "valve", "--json"]));
    assert_eq!(page["total"], 1);
    assert_eq!(page["results"][0]["unit_cost"], 135.0);
}

#[test]
fn search_table_and_empty_result() {
    let s = Scratch::new();
    assert_success(&s.run(&["sync", arg(&s.write("parts.csv", SNAPSHOT))]));

    let table = s.run(&["search", "pipe"]);
    assert_success(&table);
    let stdout = String::from_utf8_lossy(&table.stdout);
    assert!(stdout.contains("PIP-010"));
    assert!(stdout.contains("page 1/1 (1 matches)"));

    let none = s.run(&["search", "gasket"]);
    assert_success(&none);
    assert!(String::from_utf8_lossy(&none.stdout).contains("no matches"));
}

#[test]
fn bad_snapshot_exit_code() {
    let s = Scratch::new();
    let bad = s.write("parts.json", r#"{"not": "an array"}"#);
    let output = s.run(&["sync", arg(&bad)]);
    assert_eq!(output.status.code(), Some(10));
}

#[test]
fn non_object_snapshot_element_is_skipped() {
    let s = Scratch::new();
    let mixed = s.write(
        "mixed.json",
        r#"[{"item_number": "P-1", "description": "ELBOW"}, 42, {"item_number": "P-2", "description": "TEE"}]"#,
    );
    let output = s.run(&["sync", arg(&mixed), "--json"]);
    assert_success(&output);
    let report = stdout_json(&output);
    assert_eq!(report["summary"]["created"], 2);
    assert_eq!(report["summary"]["skipped"], 1);
    assert_eq!(report["skipped"][0]["reason"], "missing_key");
}

// ===========================================================================
// config
// ===========================================================================

#[test]
fn invalid_settings_exit_code() {
    let s = Scratch::new();
    std::fs::write(&s.config, "[generator]\nsuffix_style = \"sideways\"\n").unwrap();
    let output = s.run(&["generate", arg(&fixture("job-24001.json"))]);
    assert_eq!(output.status.code(), Some(20));
    assert!(String::from_utf8_lossy(&output.stderr).contains("hint:"));
}

#[test]
fn settings_change_numbering_and_config_shows_them() {
    let s = Scratch::new();
    std::fs::write(&s.config, "[generator]\ndefault_dash = \"07\"\n").unwrap();

    let record = s.write(
        "pump.json",
        r#"{"kind": "pump", "job_number": "25010", "hp": 10, "skid_length": 60, "skid_width": 30, "skid_height": 24}"#,
    );
    let output = s.run(&["generate", arg(&record), "--json"]);
    assert_success(&output);
    assert_eq!(stdout_json(&output)["rows"][0]["item_number"], "25010-07");

    let shown = s.run(&["config"]);
    assert_success(&shown);
    assert!(String::from_utf8_lossy(&shown.stdout).contains("default_dash = \"07\""));
}

#[test]
fn config_init_writes_once() {
    let s = Scratch::new();
    let fresh = s.path("fresh").join("settings.toml");
    let output = Command::new(env!("CARGO_BIN_EXE_partline"))
        .args(["config", "--init", "--config", arg(&fresh)])
        .output()
        .unwrap();
    assert_success(&output);
    assert!(fresh.exists());

    let again = Command::new(env!("CARGO_BIN_EXE_partline"))
        .args(["config", "--init", "--config", arg(&fresh)])
        .output()
        .unwrap();
    assert_success(&again);
    assert!(String::from_utf8_lossy(&again.stdout).contains("already exists"));
}
