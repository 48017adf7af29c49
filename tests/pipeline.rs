use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use vendor_risk::register::charts::{REMEDIATION_PIE_CHART, TOP_RISK_CHART};
use vendor_risk::register::domain::{Cell, NEEDS_REVIEW, RISK_CATEGORY};
use vendor_risk::register::report::{FLAGGED_WORKBOOK, HIGH_RISK_CSV, NEEDS_REVIEW_CSV};
use vendor_risk::register::{self, ResolveError};

const REGISTER_CSV: &str = "\
Vendor Name,Service,Risk Score,Assessment Date,Remediation Status,Owner
Acme,Hosting,91,2022-01-01,Open,IT
Globex,Payroll,80,2024-05-01,In Progress,Finance
Initech,Archival,34,2024-05-01,Resolved,Ops
Umbrella,Couriers,not-a-number,not-a-date,,Ops
Hooli,Analytics,55,,Open,IT
";

fn evaluation_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date")
}

fn run_pipeline(input: &Path, outdir: &Path) -> register::Frame {
    let source = register::resolve_source(&[input.to_path_buf()]).expect("input exists");
    let mut frame = register::load(&source).expect("register loads");
    register::ensure_columns(&mut frame);
    register::compute_flags(&mut frame, evaluation_date(), 365, 80.0);

    fs::create_dir_all(outdir).expect("outdir created");
    register::write_reports(&frame, outdir, 80.0).expect("reports written");
    register::render_charts(&frame, outdir).expect("charts rendered");
    frame
}

fn first_column(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("read csv")
        .lines()
        .skip(1)
        .map(|line| line.split(',').next().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn full_run_emits_every_artifact() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("register.csv");
    fs::write(&input, REGISTER_CSV).expect("write input");
    let outdir = dir.path().join("outputs");

    run_pipeline(&input, &outdir);

    for artifact in [
        HIGH_RISK_CSV,
        NEEDS_REVIEW_CSV,
        FLAGGED_WORKBOOK,
        TOP_RISK_CHART,
        REMEDIATION_PIE_CHART,
    ] {
        assert!(outdir.join(artifact).exists(), "{artifact} should exist");
    }
}

#[test]
fn extracts_have_exact_membership_in_source_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("register.csv");
    fs::write(&input, REGISTER_CSV).expect("write input");
    let outdir = dir.path().join("outputs");

    run_pipeline(&input, &outdir);

    // Score 91 and the inclusive boundary 80 qualify; coercion-failed and
    // null scores never do.
    assert_eq!(first_column(&outdir.join(HIGH_RISK_CSV)), ["Acme", "Globex"]);
    // Stale, unparseable, and missing assessment dates all flag.
    assert_eq!(
        first_column(&outdir.join(NEEDS_REVIEW_CSV)),
        ["Acme", "Umbrella", "Hooli"]
    );
}

#[test]
fn source_missing_assessment_date_column_still_completes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("register.csv");
    fs::write(
        &input,
        "Vendor Name,Service,Risk Score\nAcme,Hosting,91\nGlobex,Payroll,12\n",
    )
    .expect("write input");
    let outdir = dir.path().join("outputs");

    let frame = run_pipeline(&input, &outdir);

    for row in 0..frame.row_count() {
        assert_eq!(frame.value(row, NEEDS_REVIEW), &Cell::Bool(true));
    }
    assert_eq!(
        first_column(&outdir.join(NEEDS_REVIEW_CSV)),
        ["Acme", "Globex"]
    );
}

#[test]
fn rerun_reproduces_extract_membership() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("register.csv");
    fs::write(&input, REGISTER_CSV).expect("write input");
    let outdir = dir.path().join("outputs");

    run_pipeline(&input, &outdir);
    let high_first = first_column(&outdir.join(HIGH_RISK_CSV));
    let needs_first = first_column(&outdir.join(NEEDS_REVIEW_CSV));

    run_pipeline(&input, &outdir);
    assert_eq!(first_column(&outdir.join(HIGH_RISK_CSV)), high_first);
    assert_eq!(first_column(&outdir.join(NEEDS_REVIEW_CSV)), needs_first);
}

#[test]
fn flag_recomputation_over_flagged_extract_is_stable() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("register.csv");
    fs::write(&input, REGISTER_CSV).expect("write input");
    let outdir = dir.path().join("outputs");

    let frame = run_pipeline(&input, &outdir);

    // Feed the flagged workbook back through the front of the pipeline.
    let reflagged = run_pipeline(&outdir.join(FLAGGED_WORKBOOK), &dir.path().join("second"));

    assert_eq!(reflagged.row_count(), frame.row_count());
    for row in 0..frame.row_count() {
        assert_eq!(
            reflagged.value(row, NEEDS_REVIEW),
            frame.value(row, NEEDS_REVIEW),
            "row {row} review flag should be stable"
        );
        assert_eq!(
            reflagged.value(row, RISK_CATEGORY),
            frame.value(row, RISK_CATEGORY),
            "row {row} category should be stable"
        );
    }
}

#[test]
fn missing_input_aborts_before_any_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let candidates: Vec<PathBuf> = vec![
        dir.path().join("register.xlsx"),
        dir.path().join("register.csv"),
    ];

    let error = register::resolve_source(&candidates).expect_err("nothing to load");
    let ResolveError::InputNotFound { searched } = error;
    assert_eq!(searched, candidates);
    assert!(fs::read_dir(dir.path()).expect("list dir").next().is_none());
}
