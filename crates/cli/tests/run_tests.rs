// Integration tests for `scorematch run`, `check` and `config validate`.
// Run with: cargo test -p scorematch-cli --test run_tests -- --nocapture

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const MANUAL: &str = "\
MatNo,Name,Department,CA,Exam
PHY/01,Jane Doe,Physics, 18 ,44
,Ada Obi,Physics,20,50
PHY/09,Jon Smith,Physics,12,30
";

const TEMPLATE: &str = "\
MatNo,Name,Department
phy/01,Jane Doe,Physics
PHY/02,ada obi,PHYSICS
PHY/03,John Smith,Physics
PHY/99,Nobody,Physics
";

fn scorematch() -> Command {
    Command::new(env!("CARGO_BIN_EXE_scorematch"))
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn run_in(dir: &Path, manual: &str, template: &str, extra: &[&str]) -> Output {
    let m = write(dir, "manual.csv", manual);
    let t = write(dir, "template.csv", template);
    scorematch()
        .arg("run")
        .arg("--manual")
        .arg(&m)
        .arg("--template")
        .arg(&t)
        .arg("--out-dir")
        .arg(dir.join("out"))
        .args(["--prefix", "BIO111"])
        .args(extra)
        .output()
        .expect("scorematch run")
}

/// The single output file whose name starts with `prefix`, if any.
fn find_output(dir: &Path, prefix: &str) -> Option<PathBuf> {
    let mut hits: Vec<PathBuf> = fs::read_dir(dir.join("out"))
        .ok()?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(prefix))
        })
        .collect();
    assert!(hits.len() <= 1, "more than one {prefix}* file: {hits:?}");
    hits.pop()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

// ---------------------------------------------------------------------------
// run: output files
// ---------------------------------------------------------------------------

#[test]
fn run_writes_completed_matched_unmatched_and_stats() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_in(dir.path(), MANUAL, TEMPLATE, &[]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let completed = find_output(dir.path(), "BIO111_Results_Completed_").expect("completed table");
    let name = completed.file_name().unwrap().to_str().unwrap();
    assert!(name.ends_with(".csv"));
    // BIO111_Results_Completed_YYYYMMDD_HHMMSS.csv
    let stamp = &name["BIO111_Results_Completed_".len()..name.len() - 4];
    assert_eq!(stamp.len(), 15, "timestamp {stamp:?}");
    assert_eq!(&stamp[8..9], "_");

    let text = fs::read_to_string(&completed).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "MatNo,Name,Department,CA,Exam",
            "phy/01,Jane Doe,Physics,18,44",
            "PHY/02,ada obi,PHYSICS,20,50",
            "PHY/03,John Smith,Physics,12,30",
            "PHY/99,Nobody,Physics,,",
        ]
    );

    let matched = fs::read_to_string(find_output(dir.path(), "BIO111_Matched_Log_").unwrap()).unwrap();
    let matched: Vec<&str> = matched.lines().collect();
    assert_eq!(matched[0], "MatNo,Name,Department,CA,Exam,match_tier,fuzzy_score");
    assert!(matched[1].ends_with(",exact_id,"));
    assert!(matched[2].ends_with(",exact_name_dept,"));
    assert!(matched[3].ends_with(",fuzzy_name,94.74"), "got {}", matched[3]);

    let unmatched = fs::read_to_string(find_output(dir.path(), "BIO111_Unmatched_Log_").unwrap()).unwrap();
    assert_eq!(unmatched.lines().collect::<Vec<_>>(), vec!["MatNo,Name,Department", "PHY/99,Nobody,Physics"]);

    let stats: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(find_output(dir.path(), "BIO111_Stats_").unwrap()).unwrap())
            .expect("stats JSON");
    assert_eq!(stats["total_template"], 4);
    assert_eq!(stats["matched"], 3);
    assert_eq!(stats["unmatched"], 1);
    assert_eq!(stats["blank_ids_manual"], 1);

    let err = stderr(&out);
    assert!(err.contains("matched 3 of 4 template rows"), "stderr: {err}");
    assert!(err.contains("wrote "));
}

#[test]
fn run_skips_unmatched_log_when_everything_matches() {
    let dir = tempfile::tempdir().unwrap();
    let template = "MatNo,Name,Department\nPHY/01,Jane Doe,Physics\n";
    let out = run_in(dir.path(), MANUAL, template, &["-q"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(find_output(dir.path(), "BIO111_Results_Completed_").is_some());
    assert!(find_output(dir.path(), "BIO111_Unmatched_Log_").is_none());
    assert!(stderr(&out).is_empty(), "quiet run printed: {}", stderr(&out));
}

#[test]
fn no_fuzzy_leaves_near_name_unmatched() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_in(dir.path(), MANUAL, TEMPLATE, &["--no-fuzzy", "--json"]);
    assert!(out.status.success());
    let stats: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(stats["matched_by_tier"]["fuzzy_name"], 0);
    assert_eq!(stats["unmatched"], 2);
}

#[test]
fn json_stdout_is_single_stats_object() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_in(dir.path(), MANUAL, TEMPLATE, &["--json"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    let stats: serde_json::Value = serde_json::from_str(stdout.trim()).expect("one JSON value");
    assert_eq!(stats["matched_by_tier"]["exact_id"], 1);
    assert_eq!(stats["matched_by_tier"]["exact_name_dept"], 1);
    assert_eq!(stats["matched_by_tier"]["fuzzy_name"], 1);
}

#[test]
fn preview_prints_first_rows() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_in(dir.path(), MANUAL, TEMPLATE, &["--preview", "2", "-q"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 4, "header, rule, two rows: {stdout}");
    assert!(lines[0].starts_with("MatNo"));
    assert!(lines[2].starts_with("phy/01"));
    assert!(lines[3].starts_with("PHY/02"));
}

// ---------------------------------------------------------------------------
// run: exit codes
// ---------------------------------------------------------------------------

#[test]
fn fail_on_unmatched_exits_7_after_writing() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_in(dir.path(), MANUAL, TEMPLATE, &["--fail-on-unmatched"]);
    assert_eq!(out.status.code(), Some(7));
    assert!(stderr(&out).contains("1 template row(s) unmatched"));
    assert!(find_output(dir.path(), "BIO111_Results_Completed_").is_some());
}

#[test]
fn missing_column_exits_3_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_in(dir.path(), "MatNo,Name,Department,CA\nPHY/01,Jane,Physics,10\n", TEMPLATE, &[]);
    assert_eq!(out.status.code(), Some(3));
    let err = stderr(&out);
    assert!(err.contains("error: manual table: missing required column 'Exam'"), "stderr: {err}");
    assert!(err.contains("hint:"));
    assert!(find_output(dir.path(), "BIO111_").is_none());
}

#[test]
fn ragged_input_exits_4() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_in(dir.path(), MANUAL, "MatNo,Name,Department\nA,B,C,D\n", &[]);
    assert_eq!(out.status.code(), Some(4), "stderr: {}", stderr(&out));
}

#[test]
fn missing_input_file_exits_5() {
    let dir = tempfile::tempdir().unwrap();
    let out = scorematch()
        .arg("run")
        .arg("--manual")
        .arg(dir.path().join("nope.csv"))
        .arg("--template")
        .arg(dir.path().join("nope-either.csv"))
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(5));
    assert!(stderr(&out).contains("cannot read"));
}

#[test]
fn threshold_out_of_range_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_in(dir.path(), MANUAL, TEMPLATE, &["--threshold", "150"]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn config_maps_custom_headers() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(
        dir.path(),
        "bio.toml",
        "[columns.manual]\nidentifier = \"Reg No\"\nca = \"CA (30)\"\n\n[matching]\nfuzzy = false\n",
    );
    let manual = "Reg No,Name,Department,CA (30),Exam\nPHY/01,Jane Doe,Physics,25,60\n";
    let out = run_in(
        dir.path(),
        manual,
        TEMPLATE,
        &["--config", config.to_str().unwrap(), "--json"],
    );
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let stats: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(stats["matched"], 1);
}

#[test]
fn bad_config_exits_6() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(dir.path(), "bad.toml", "[matching]\nfuzzy_threshold = 150\n");
    let out = run_in(dir.path(), MANUAL, TEMPLATE, &["--config", config.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(6));
}

// ---------------------------------------------------------------------------
// check / config validate
// ---------------------------------------------------------------------------

#[test]
fn check_reports_row_counts() {
    let dir = tempfile::tempdir().unwrap();
    let m = write(dir.path(), "m.csv", MANUAL);
    let t = write(dir.path(), "t.csv", "S/N,MatNo,Name,Department\n1,PHY/01,Jane,Physics\n");
    let out = scorematch()
        .arg("check")
        .arg("--manual")
        .arg(&m)
        .arg("--template")
        .arg(&t)
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let err = stderr(&out);
    assert!(err.contains("ok: manual 3 row(s), template 1 row(s)"), "stderr: {err}");
    assert!(err.contains("template extra columns (dropped): S/N"));
}

#[test]
fn check_flags_missing_template_columns() {
    let dir = tempfile::tempdir().unwrap();
    let m = write(dir.path(), "m.csv", MANUAL);
    let t = write(dir.path(), "t.csv", "MatNo\nPHY/01\n");
    let out = scorematch()
        .arg("check")
        .arg("--manual")
        .arg(&m)
        .arg("--template")
        .arg(&t)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(3));
    assert!(stderr(&out).contains("template table: missing required columns 'Name', 'Department'"));
}

#[test]
fn config_validate_accepts_and_rejects() {
    let dir = tempfile::tempdir().unwrap();
    let good = write(dir.path(), "good.toml", "[matching]\nfuzzy_threshold = 90\n");
    let out = scorematch().args(["config", "validate"]).arg(&good).output().unwrap();
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stderr(&out).contains("fuzzy name > 90"));

    let bad = write(dir.path(), "bad.toml", "[matching]\nfuzzy_treshold = 90\n");
    let out = scorematch().args(["config", "validate"]).arg(&bad).output().unwrap();
    assert_eq!(out.status.code(), Some(6));
}
