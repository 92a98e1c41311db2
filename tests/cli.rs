//! Round-trips a JSON-serialized program through the `minimc` binary.

use std::fs;
use std::process::Command;

use tempfile::tempdir;

fn minimc() -> Command {
    Command::new(env!("CARGO_BIN_EXE_minimc"))
}

#[test]
fn compiles_a_trivial_program_to_stdout() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("program.json");
    fs::write(
        &input,
        r#"{"decls":[],"instr":{"Block":{"vars":[],"body":[{"Expr":{"Cste":0}}]}}}"#,
    )
    .unwrap();

    let output = minimc().arg(&input).output().unwrap();
    assert!(output.status.success(), "{:?}", output);
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("START"));
    assert!(stdout.contains("STOP"));
}

#[test]
fn writes_to_the_requested_output_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("program.json");
    let output_path = dir.path().join("program.vm");
    fs::write(
        &input,
        r#"{"decls":[],"instr":{"Expr":{"Cste":1}}}"#,
    )
    .unwrap();

    let status = minimc()
        .arg(&input)
        .arg("-o")
        .arg(&output_path)
        .status()
        .unwrap();
    assert!(status.success());

    let vm_program = fs::read_to_string(&output_path).unwrap();
    assert!(vm_program.contains("PUSHI 1"));
}

#[test]
fn reports_a_contextual_error_and_exits_nonzero() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("program.json");
    fs::write(
        &input,
        r#"{"decls":[],"instr":{"Expr":{"Id":"nope"}}}"#,
    )
    .unwrap();

    let output = minimc().arg(&input).output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("UnknownIdentifier"));
}
