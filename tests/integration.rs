//! End-to-end tests for the conformance CLI
//!
//! These tests run the built binary against a fake toolchain implemented as
//! an `sh -c` script. For a program `cases/t1.calc` run in mode `run`, the
//! fake toolchain:
//! 1. records the invocation by creating `cases/t1.run.ran`
//! 2. exits 7 if `cases/t1.run.crash` exists
//! 3. otherwise prints the content of `cases/t1.run`

#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

const FAKE_TOOLCHAIN: &str = r#"
[ "$CALC_ASSERTIONS" = "enabled" ] || { echo "assertions disabled" >&2; exit 9; }
base="${2%.calc}"
touch "$base.$1.ran"
if [ -f "$base.$1.crash" ]; then
  echo "partial output"
  echo "toolchain exploded" >&2
  exit 7
fi
cat "$base.$1"
"#;

/// Test context with a private working directory
struct TestContext {
    /// Temporary directory; the binary runs with this as its working directory
    dir: tempfile::TempDir,
    /// Path to the conformance binary
    bin: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        fs::create_dir(dir.path().join("cases")).expect("Failed to create fixture dir");

        let ctx = Self {
            dir,
            bin: PathBuf::from(env!("CARGO_BIN_EXE_conformance")),
        };
        ctx.write_config("exit 0");
        ctx
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write the config file with the given build script
    fn write_config(&self, build_script: &str) {
        let config = format!(
            r#"
[toolchain]
program = "sh"
args = ["-c", {script:?}, "toolchain"]
argument_style = "separate"

[toolchain.env]
CALC_ASSERTIONS = "enabled"

[build]
program = "sh"
args = ["-c", {build:?}]

[fixtures]
dir = "cases"

[timeouts]
case_secs = 30
"#,
            script = FAKE_TOOLCHAIN,
            build = build_script,
        );
        fs::write(self.path().join("conformance.toml"), config).expect("Failed to write config");
    }

    /// Add a fixture pair plus the output the fake toolchain prints per mode
    fn add_case(&self, base: &str, expected: &str, interpreted: &str, compiled: &str) {
        let cases = self.path().join("cases");
        fs::write(cases.join(format!("{base}.calc")), "print 1;;").unwrap();
        fs::write(cases.join(format!("{base}.out")), expected).unwrap();
        fs::write(cases.join(format!("{base}.run")), interpreted).unwrap();
        fs::write(cases.join(format!("{base}.crun")), compiled).unwrap();
    }

    fn crash_on(&self, base: &str, subcommand: &str) {
        let marker = self.path().join("cases").join(format!("{base}.{subcommand}.crash"));
        fs::write(marker, "").unwrap();
    }

    fn ran(&self, base: &str, subcommand: &str) -> bool {
        self.path()
            .join("cases")
            .join(format!("{base}.{subcommand}.ran"))
            .exists()
    }

    /// Point the toolchain at a program that does not exist
    fn use_missing_toolchain(&self) {
        let path = self.path().join("conformance.toml");
        let config = fs::read_to_string(&path).unwrap().replacen(
            "program = \"sh\"",
            "program = \"no-such-toolchain-xyz\"",
            1,
        );
        fs::write(path, config).unwrap();
    }

    fn run(&self, args: &[&str]) -> Output {
        let output = Command::new(&self.bin)
            .args(args)
            .current_dir(self.path())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to run conformance");

        Output {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            code: output.status.code(),
        }
    }
}

#[derive(Debug)]
struct Output {
    stdout: String,
    stderr: String,
    code: Option<i32>,
}

#[test]
fn test_all_cases_pass() {
    let ctx = TestContext::new();
    ctx.add_case("t1", "5\n", "5\n", "5\n");
    ctx.add_case("t2", "1\n2\n", "1\n2\n", "1\n2\n");

    let out = ctx.run(&[]);

    assert_eq!(out.code, Some(0), "{out:?}");
    assert!(out.stdout.contains("Running INTERPRETED tests"));
    assert!(out.stdout.contains("Running COMPILED tests"));
    assert_eq!(out.stdout.matches("[OK] cases/t1.calc").count(), 2);
    assert_eq!(out.stdout.matches("[OK] cases/t2.calc").count(), 2);
    assert!(out.stdout.contains("4 passed, 0 failed"));
}

#[test]
fn test_mismatch_fails_run_but_continues() {
    let ctx = TestContext::new();
    ctx.add_case("t1", "5\n", "4\n", "5\n");
    ctx.add_case("t2", "2\n", "2\n", "2\n");

    let out = ctx.run(&["--no-build"]);

    assert_eq!(out.code, Some(1), "{out:?}");
    assert!(out.stdout.contains("[FAIL] cases/t1.calc"));
    assert!(out.stdout.contains("Expected:\n5\n"));
    assert!(out.stdout.contains("Got:\n4\n"));
    assert!(ctx.ran("t2", "run"));
    assert!(ctx.ran("t2", "crun"));
    assert!(out.stdout.contains("3 passed, 1 failed"));
    assert!(out
        .stderr
        .contains("Error: Output of cases/t1.calc (INTERPRETED) did not match the expected fixture"));
}

#[test]
fn test_missing_trailing_newline_is_a_mismatch() {
    let ctx = TestContext::new();
    ctx.add_case("t1", "3\n", "3", "3\n");

    let out = ctx.run(&["--no-build", "--mode", "interpreted"]);

    assert_eq!(out.code, Some(1), "{out:?}");
    assert!(out.stdout.contains("[FAIL] cases/t1.calc"));
    assert!(!ctx.ran("t1", "crun"));
}

#[test]
fn test_crash_aborts_remaining_cases() {
    let ctx = TestContext::new();
    ctx.add_case("a", "1\n", "1\n", "1\n");
    ctx.add_case("x", "2\n", "2\n", "2\n");
    ctx.add_case("z", "3\n", "3\n", "3\n");
    ctx.crash_on("x", "crun");

    let out = ctx.run(&["--no-build"]);

    assert_eq!(out.code, Some(1), "{out:?}");
    assert!(out.stdout.contains("Test cases/x.calc failed with error code 7"));
    assert!(out.stdout.contains("partial output"));
    assert!(out.stdout.contains("toolchain exploded"));
    assert!(out.stderr.contains("Error: Test cases/x.calc (COMPILED) failed with error code 7"));
    assert!(ctx.ran("z", "run"));
    assert!(ctx.ran("a", "crun"));
    assert!(!ctx.ran("z", "crun"));
}

#[test]
fn test_dry_run_lists_without_invoking() {
    let ctx = TestContext::new();
    ctx.add_case("a1", "", "", "");
    ctx.add_case("a2", "", "", "");
    ctx.add_case("b1", "", "", "");
    // Would fail if the build step ran
    ctx.write_config("exit 3");

    let out = ctx.run(&["--dry-run", "--filter", "cases/a"]);

    assert_eq!(out.code, Some(0), "{out:?}");
    let listed: Vec<&str> = out.stdout.lines().take(3).collect();
    assert_eq!(
        listed,
        vec!["Compiling: sh -c exit 3 (skipped, dry run)", "cases/a1.calc", "cases/a2.calc"]
    );
    assert!(!out.stdout.contains("b1"));
    for base in ["a1", "a2", "b1"] {
        assert!(!ctx.ran(base, "run"));
        assert!(!ctx.ran(base, "crun"));
    }
}

#[test]
fn test_filter_restricts_both_modes() {
    let ctx = TestContext::new();
    ctx.add_case("a1", "1\n", "1\n", "1\n");
    ctx.add_case("b1", "2\n", "2\n", "2\n");

    let out = ctx.run(&["--no-build", "--filter", "cases/b"]);

    assert_eq!(out.code, Some(0), "{out:?}");
    assert!(ctx.ran("b1", "run"));
    assert!(ctx.ran("b1", "crun"));
    assert!(!ctx.ran("a1", "run"));
    assert!(!ctx.ran("a1", "crun"));
}

#[test]
fn test_invalid_filter() {
    let ctx = TestContext::new();
    ctx.add_case("a1", "1\n", "1\n", "1\n");

    let out = ctx.run(&["--filter", "("]);

    assert_eq!(out.code, Some(1), "{out:?}");
    assert!(out.stderr.contains("Invalid filter pattern"));
    assert!(!ctx.ran("a1", "run"));
}

#[test]
fn test_missing_fixture_executes_nothing() {
    let ctx = TestContext::new();
    ctx.add_case("a", "1\n", "1\n", "1\n");
    fs::write(ctx.path().join("cases").join("orphan.calc"), "1;;").unwrap();

    let out = ctx.run(&["--no-build"]);

    assert_eq!(out.code, Some(1), "{out:?}");
    assert!(out.stderr.contains("has no expected output fixture"));
    assert!(out.stderr.contains("orphan.out"));
    assert!(!ctx.ran("a", "run"));
}

#[test]
fn test_build_failure_is_fatal() {
    let ctx = TestContext::new();
    ctx.add_case("a", "1\n", "1\n", "1\n");
    ctx.write_config("exit 4");

    let out = ctx.run(&[]);

    assert_eq!(out.code, Some(1), "{out:?}");
    assert!(out.stderr.contains("failed with exit code 4"));
    assert!(!ctx.ran("a", "run"));
}

#[test]
fn test_json_report() {
    let ctx = TestContext::new();
    ctx.add_case("t1", "5\n", "5\n", "6\n");

    let out = ctx.run(&["--no-build", "--report", "reports/run.json"]);
    assert_eq!(out.code, Some(1), "{out:?}");

    let report = fs::read_to_string(ctx.path().join("reports").join("run.json"))
        .expect("Report was not written");
    let value: serde_json::Value = serde_json::from_str(&report).unwrap();

    assert_eq!(value["selected"][0], "cases/t1.calc");
    assert_eq!(value["aborted"], false);
    assert_eq!(value["outcomes"][0]["mode"], "interpreted");
    assert_eq!(value["outcomes"][0]["verdict"]["status"], "ok");
    assert_eq!(value["outcomes"][1]["mode"], "compiled");
    assert_eq!(value["outcomes"][1]["verdict"]["status"], "fail");
    assert_eq!(value["outcomes"][1]["verdict"]["actual"], "6\n");
}

#[test]
fn test_no_compile_alias() {
    let ctx = TestContext::new();
    ctx.add_case("t1", "5\n", "5\n", "5\n");
    ctx.write_config("exit 1");

    let out = ctx.run(&["--no-compile"]);

    assert_eq!(out.code, Some(0), "{out:?}");
}

#[test]
fn test_missing_toolchain_still_reports() {
    let ctx = TestContext::new();
    ctx.add_case("t1", "5\n", "5\n", "5\n");
    ctx.add_case("t2", "6\n", "6\n", "6\n");
    ctx.use_missing_toolchain();

    let out = ctx.run(&["--no-build", "--report", "run.json"]);

    assert_eq!(out.code, Some(1), "{out:?}");
    assert!(out.stdout.contains("Test cases/t1.calc could not be launched"));
    assert!(out.stdout.contains("0 passed, 1 failed"));
    assert!(out.stderr.contains("no-such-toolchain-xyz"));

    let report = fs::read_to_string(ctx.path().join("run.json")).expect("Report was not written");
    let value: serde_json::Value = serde_json::from_str(&report).unwrap();
    assert_eq!(value["aborted"], true);
    assert_eq!(value["outcomes"].as_array().map(Vec::len), Some(1));
    assert_eq!(value["outcomes"][0]["verdict"]["status"], "launch_failed");
}
