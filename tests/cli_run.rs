//! CLI integration tests for the simulation binary.

use std::io::Write;
use std::process::Command;

fn summary_value<'a>(stdout: &'a str, key: &str) -> &'a str {
    let prefix = format!("{key}=");
    stdout
        .lines()
        .find_map(|line| line.strip_prefix(prefix.as_str()))
        .unwrap_or_else(|| panic!("{key} line missing"))
        .trim()
}

#[test]
fn run_reports_every_item_delivered() {
    let bin = env!("CARGO_BIN_EXE_automail");
    let output = Command::new(bin)
        .args(["--mail", "30", "--robots", "2"])
        .output()
        .expect("failed to run binary");

    assert!(
        output.status.success(),
        "run exited with non-zero status: {:?}",
        output.status
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("SIMULATION SUMMARY"),
        "summary missing from output"
    );
    assert_eq!(summary_value(&stdout, "mail_total"), "30");
    assert_eq!(summary_value(&stdout, "delivered"), "30");
    assert_eq!(summary_value(&stdout, "robots"), "2");
}

#[test]
fn config_file_feeds_the_run() {
    let bin = env!("CARGO_BIN_EXE_automail");
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        "robots = 3\nmail_to_create = 20\nmail_max_weight = 3000\nfloors = 6"
    )
    .expect("write config");

    let output = Command::new(bin)
        .arg("run")
        .arg("--config")
        .arg(file.path())
        .output()
        .expect("failed to run binary");
    assert!(output.status.success(), "status: {:?}", output.status);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(summary_value(&stdout, "floors"), "6");
    assert_eq!(summary_value(&stdout, "delivered"), "20");
}

#[test]
fn same_seed_prints_same_summary() {
    let bin = env!("CARGO_BIN_EXE_automail");
    let run = || {
        Command::new(bin)
            .args(["run", "--seed", "42", "--mail", "25"])
            .output()
            .expect("failed to run binary")
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn invalid_config_exits_with_usage_status() {
    let bin = env!("CARGO_BIN_EXE_automail");
    let output = Command::new(bin)
        .args(["--robots", "0"])
        .output()
        .expect("failed to run binary");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("robots must be > 0"), "stderr: {stderr}");
}

#[test]
fn bench_prints_csv_rows() {
    let bin = env!("CARGO_BIN_EXE_automail");
    let output = Command::new(bin)
        .args(["bench", "--robot-sets", "1,2", "--seeds", "1", "--mail", "10"])
        .output()
        .expect("failed to run binary");
    assert!(output.status.success(), "status: {:?}", output.status);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut lines = stdout.lines();
    assert!(lines.next().expect("header").starts_with("robots,seed,"));
    let rows: Vec<_> = lines.collect();
    assert_eq!(rows.len(), 2);
    assert!(rows[0].starts_with("1,1,10,"));
    assert!(rows[1].starts_with("2,1,10,"));
}
