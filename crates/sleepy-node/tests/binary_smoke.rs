//! Smoke tests for the `sleepy-node` binary.

#[cfg(unix)]
fn run_with_config(config: &str) -> (std::process::ExitStatus, String) {
    use std::process::{Command, Stdio};

    let bin = env!("CARGO_BIN_EXE_sleepy-node");

    let mut config_file = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(&mut config_file, config.as_bytes()).unwrap();

    // tracing_subscriber writes to stdout by default
    let stdout_file = tempfile::NamedTempFile::new().unwrap();
    let stdout_writer = stdout_file.reopen().unwrap();

    let child = Command::new(bin)
        .args(["--config", config_file.path().to_str().unwrap()])
        .env("RUST_LOG_FORMAT", "json")
        .env("RUST_LOG", "info")
        .stdout(Stdio::from(stdout_writer))
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to spawn sleepy-node");

    // Safety net in case the node never stops on its own.
    let pid = child.id();
    let guard = std::thread::spawn(move || {
        std::thread::sleep(std::time::Duration::from_secs(10));
        let _ = Command::new("kill").args(["-9", &pid.to_string()]).status();
    });

    let output = child.wait_with_output().expect("failed to wait on child");
    drop(guard);

    let stdout = std::fs::read_to_string(stdout_file.path()).unwrap();
    (output.status, stdout)
}

#[cfg(unix)]
#[test]
fn stack_driven_stop_exits_cleanly() {
    let config = "[network]\npoll_period_ms = 20\n\n[simulation]\nstop_after_polls = 3\n";
    let (status, stdout) = run_with_config(config);

    assert!(
        status.success(),
        "expected exit code 0, got {:?}",
        status.code()
    );
    assert!(
        stdout.lines().any(|l| l.starts_with('{')),
        "expected at least one JSON log line, got: {stdout}"
    );
    assert!(
        stdout.contains("applying operational dataset"),
        "dataset summary not logged: {stdout}"
    );
    assert!(stdout.contains("OpenThread-af16"));
}

#[cfg(unix)]
#[test]
fn rejected_dataset_aborts() {
    use std::os::unix::process::ExitStatusExt;

    let config = "[simulation]\nfail_step = \"dataset_apply\"\n";
    let (status, stdout) = run_with_config(config);

    assert!(!status.success());
    assert_eq!(status.signal(), Some(6), "expected SIGABRT, got {status:?}");
    let fatal = stdout
        .lines()
        .find(|l| l.contains("\"ERROR\""))
        .unwrap_or_else(|| panic!("no error line logged: {stdout}"));
    assert!(fatal.contains("dataset_apply"), "step missing: {fatal}");
}

#[cfg(unix)]
#[test]
fn invalid_config_exits_with_error() {
    let (status, _stdout) = run_with_config("[host.uart]\ndata_bits = 12\n");
    assert_eq!(status.code(), Some(1));
}
