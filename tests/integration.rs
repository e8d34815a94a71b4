use std::{
    env, fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

fn test_dir(name: &str) -> PathBuf {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    fs::remove_dir_all(&test_dir).ok();
    fs::create_dir_all(&test_dir).expect("failed to create test directory");
    test_dir
}

fn run_bin(args: &[&str]) -> Output {
    let bin = PathBuf::from(env!("CARGO_BIN_EXE_time-effort-estimation"));
    Command::new(bin)
        .args(args)
        .env_remove("DISPLAY")
        .env_remove("WAYLAND_DISPLAY")
        .output()
        .expect("failed to execute command")
}

fn assert_failure(output: &Output, expected: &str) {
    let stdout_str = String::from_utf8_lossy(&output.stdout);
    let stderr_str = String::from_utf8_lossy(&output.stderr);
    assert!(
        !output.status.success(),
        "binary unexpectedly succeeded\nstdout:\n{stdout_str}\nstderr:\n{stderr_str}\n"
    );
    assert!(
        stderr_str.contains(expected),
        "stderr does not mention {expected:?}\nstderr:\n{stderr_str}\n"
    );
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("failed to convert path to string")
}

fn assert_success(output: &Output) {
    let stdout_str = String::from_utf8_lossy(&output.stdout);
    let stderr_str = String::from_utf8_lossy(&output.stderr);
    assert!(
        output.status.success(),
        "binary failed\nstdout:\n{stdout_str}\nstderr:\n{stderr_str}\n"
    );
}

fn file_len(path: &Path) -> u64 {
    fs::metadata(path)
        .unwrap_or_else(|err| panic!("failed to stat {path:?}: {err}"))
        .len()
}

#[test]
fn basic_workflow() {
    let test_dir = test_dir("basic_workflow");
    let data_dir = test_dir.join("answers");
    fs::create_dir(&data_dir).expect("failed to create data directory");
    for (name, hours) in [
        ("sprint-1.csv", "1\n2\n3\n4\n5\n"),
        ("sprint-2.csv", "4\n8\n8\n16\n"),
        ("sprint-3.csv", "0.5\n1.5\n"),
        ("sprint-4.csv", "10\n12\n30\n"),
    ] {
        let rows: String = hours
            .lines()
            .enumerate()
            .map(|(i, h)| format!("{i},{h}\n"))
            .collect();
        fs::write(data_dir.join(name), format!("id,hours\n{rows}"))
            .expect("failed to write csv");
    }

    let output = run_bin(&[path_str(&data_dir), "--no_show"]);
    assert_success(&output);
    let default_output = data_dir.join("time_effort_estimation.png");
    assert!(file_len(&default_output) > 0);

    let single_output = run_bin(&[path_str(&data_dir.join("sprint-2.csv")), "--no_show"]);
    assert_success(&single_output);
    assert!(file_len(&default_output) > 0);

    let svg_file = test_dir.join("report.svg");
    let args = [
        path_str(&data_dir),
        "--ncols",
        "2",
        "--figsize",
        "8",
        "6",
        "--output_file",
        path_str(&svg_file),
        "--no_show",
    ];

    assert_success(&run_bin(&args));
    let first = fs::read_to_string(&svg_file).expect("failed to read svg");
    assert!(first.contains("5 responses; mean = 3.0; median = 3.0"));
    assert!(first.contains("Estimated Hours"));

    fs::write(&svg_file, "stale").expect("failed to overwrite svg");
    assert_success(&run_bin(&args));
    let second = fs::read_to_string(&svg_file).expect("failed to read svg");
    assert_eq!(first, second);

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn figsize_without_numbers_fails() {
    let test_dir = test_dir("figsize_no_number");
    let file = test_dir.join("a.csv");
    fs::write(&file, "id,hours\n1,4\n").expect("failed to write csv");

    let output = run_bin(&[path_str(&file), "--no_show", "--figsize"]);

    assert_failure(&output, "FigsizeArgument");
    assert!(!test_dir.join("time_effort_estimation.png").exists());

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn figsize_with_one_number_fails_before_reading_input() {
    let test_dir = test_dir("figsize_one_number");
    let missing = test_dir.join("missing.csv");

    let output = run_bin(&[path_str(&missing), "--figsize", "10", "--no_show"]);

    assert_failure(&output, "FigsizeArgument");
    assert!(!test_dir.join("time_effort_estimation.png").exists());

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn non_numeric_value_fails_without_output() {
    let test_dir = test_dir("non_numeric_value");
    fs::write(test_dir.join("a.csv"), "id,hours\n1,4\n2,8\n").expect("failed to write csv");
    fs::write(test_dir.join("b.csv"), "id,hours\n1,abc\n").expect("failed to write csv");

    let output = run_bin(&[path_str(&test_dir), "--no_show"]);

    assert_failure(&output, "DataFormat");
    assert!(!test_dir.join("time_effort_estimation.png").exists());

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn missing_input_fails() {
    let test_dir = test_dir("missing_input");

    let output = run_bin(&[path_str(&test_dir.join("nope")), "--no_show"]);

    assert_failure(&output, "InputNotFound");

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn empty_directory_fails() {
    let test_dir = test_dir("empty_directory");
    fs::write(test_dir.join("readme.txt"), "nothing here\n").expect("failed to write file");

    let output = run_bin(&[path_str(&test_dir), "--no_show"]);

    assert_failure(&output, "NoDatasets");

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn column_index_out_of_range_fails() {
    let test_dir = test_dir("column_index");
    let file = test_dir.join("a.csv");
    fs::write(&file, "id,hours\n1,4\n").expect("failed to write csv");

    let output = run_bin(&[path_str(&file), "--data_col_index", "5", "--no_show"]);

    assert_failure(&output, "ColumnIndex");

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn unsupported_output_format_fails() {
    let test_dir = test_dir("output_format");
    let file = test_dir.join("a.csv");
    fs::write(&file, "id,hours\n1,4\n").expect("failed to write csv");
    let output_file = test_dir.join("plot.pdf");

    let output = run_bin(&[
        path_str(&file),
        "--output_file",
        path_str(&output_file),
        "--no_show",
    ]);

    assert_failure(&output, "OutputFormat");
    assert!(!output_file.exists());

    fs::remove_dir_all(&test_dir).ok();
}
