use std::{
    env, fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

fn test_dir(name: &str) -> PathBuf {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    fs::remove_dir_all(&test_dir).ok();
    fs::create_dir(&test_dir).expect("failed to create test directory");
    test_dir
}

/// Thirty years of monthly anomalies with a warming trend and a seasonal wiggle.
fn write_anomalies(file: &Path) {
    let mut contents = String::from("YearMonth Anomaly\n");
    for i_month in 0..360 {
        let year = 1994 + i_month / 12;
        let month = 1 + i_month % 12;
        let t = i_month as f64;
        let value = 0.2 + 0.0025 * t + 0.12 * (t / 7.0).sin() + 0.05 * (t * 1.7).cos();
        contents += &format!("{year}{month:02} {value:.3}\n");
    }
    fs::write(file, contents).expect("failed to write data file");
}

fn run_bin(args: &[&str]) -> Output {
    let bin = PathBuf::from(env!("CARGO_BIN_EXE_anomfit"));
    Command::new(bin)
        .args(args)
        .output()
        .expect("failed to execute command")
}

fn assert_success(args: &[&str]) -> String {
    let output = run_bin(args);

    let stdout_str =
        std::str::from_utf8(&output.stdout).expect("failed to convert stdout to string");
    let stderr_str =
        std::str::from_utf8(&output.stderr).expect("failed to convert stderr to string");

    assert!(
        output.status.success(),
        "failed to run binary with {args:?}\nstdout:\n{stdout_str}\nstderr:\n{stderr_str}\n"
    );

    stdout_str.to_string()
}

#[test]
fn basic_workflow() {
    let test_dir = test_dir("basic_workflow");

    let data_path = test_dir.join("30years_monthlydata.txt");
    write_anomalies(&data_path);

    let config_path = test_dir.join("config.toml");
    let config_contents = String::new()
        + "[regression]\n"
        + "degree = 6\n"
        + "curve_samples = 200\n"
        + "\n"
        + "[distribution]\n"
        + "hist_bins = 12\n";
    fs::write(&config_path, config_contents).expect("failed to write config file");

    let out_dir = test_dir.join("out");

    let data_str = data_path.to_str().expect("failed to convert path to string");
    let config_str = config_path
        .to_str()
        .expect("failed to convert path to string");
    let out_str = out_dir.to_str().expect("failed to convert path to string");
    let common = ["--data-file", data_str, "--config", config_str, "--out-dir", out_str];

    let stdout = assert_success(&[&common[..], &["fit"][..]].concat());
    assert!(stdout.starts_with("Polynomial Equation (Degree 6):"));
    assert!(stdout.contains("R-squared: 0."));
    assert!(out_dir.join("polynomial_fit.svg").is_file());
    let summary = fs::read_to_string(out_dir.join("polynomial_fit.toml"))
        .expect("failed to read fit summary");
    assert!(summary.contains("degree = 6"));
    assert!(summary.contains("n_obs = 360"));

    let stdout = assert_success(&[&common[..], &["distribution"][..]].concat());
    assert!(stdout.starts_with("Mean (μ): "));
    assert!(stdout.contains("μ ± 2σ: ["));
    assert!(stdout.contains("Percentage of data within μ ± 3σ: "));
    assert!(out_dir.join("distribution.svg").is_file());
    assert!(out_dir.join("distribution.toml").is_file());

    let stdout = assert_success(&[&common[..], &["all"][..]].concat());
    assert!(stdout.contains("R-squared: "));
    assert!(stdout.contains("Mean (μ): "));

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn default_config_uses_degree_twenty() {
    let test_dir = test_dir("default_config");

    let data_path = test_dir.join("data.txt");
    write_anomalies(&data_path);

    let data_str = data_path.to_str().expect("failed to convert path to string");
    let out_str = test_dir.to_str().expect("failed to convert path to string");

    let stdout = assert_success(&["--data-file", data_str, "--out-dir", out_str, "fit"]);
    assert!(stdout.starts_with("Polynomial Equation (Degree 20):"));
    assert!(stdout.contains("x^20"));

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn malformed_rows_abort_the_run() {
    let test_dir = test_dir("malformed_rows");

    let data_path = test_dir.join("data.txt");
    fs::write(&data_path, "YearMonth Anomaly\n199401 0.1\n199413 0.2\n")
        .expect("failed to write data file");

    let data_str = data_path.to_str().expect("failed to convert path to string");
    let out_str = test_dir.to_str().expect("failed to convert path to string");

    let output = run_bin(&["--data-file", data_str, "--out-dir", out_str, "distribution"]);
    assert!(!output.status.success());
    let stderr_str = String::from_utf8_lossy(&output.stderr);
    assert!(stderr_str.contains("MalformedInput"), "stderr:\n{stderr_str}");

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn out_of_order_periods_abort_the_run() {
    let test_dir = test_dir("out_of_order_periods");

    let data_path = test_dir.join("data.txt");
    fs::write(
        &data_path,
        "YearMonth Anomaly\n199403 0.3\n199401 0.1\n199402 0.2\n",
    )
    .expect("failed to write data file");

    let data_str = data_path.to_str().expect("failed to convert path to string");
    let out_str = test_dir.to_str().expect("failed to convert path to string");

    let output = run_bin(&["--data-file", data_str, "--out-dir", out_str, "fit"]);
    assert!(!output.status.success());
    let stderr_str = String::from_utf8_lossy(&output.stderr);
    assert!(stderr_str.contains("does not follow"), "stderr:\n{stderr_str}");
    assert!(!test_dir.join("polynomial_fit.svg").exists());

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn empty_series_is_reported() {
    let test_dir = test_dir("empty_series");

    let data_path = test_dir.join("data.txt");
    fs::write(&data_path, "YearMonth Anomaly\n").expect("failed to write data file");

    let data_str = data_path.to_str().expect("failed to convert path to string");
    let out_str = test_dir.to_str().expect("failed to convert path to string");

    for command in ["fit", "distribution"] {
        let output = run_bin(&["--data-file", data_str, "--out-dir", out_str, command]);
        assert!(!output.status.success());
        let stderr_str = String::from_utf8_lossy(&output.stderr);
        assert!(stderr_str.contains("EmptySeries"), "stderr:\n{stderr_str}");
    }

    fs::remove_dir_all(&test_dir).ok();
}
