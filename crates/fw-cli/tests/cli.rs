//! Integration tests for the fwrap CLI

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use fw_cli::commands::gen::{gen_command, GenArgs};
use fw_cli::config::FwrapConfig;
use fw_core::{Argument, ConfigTypeParam, Dtype, FcType, Intent, Procedure, TypeCatalog};
use predicates::prelude::*;
use tempfile::TempDir;

fn procedures() -> Vec<Procedure> {
    vec![
        Procedure::subroutine(
            "axpy",
            vec![
                Argument::new("n", Dtype::default_integer(), Intent::In),
                Argument::new("a", Dtype::default_real(), Intent::In),
                Argument::new("x", Dtype::default_real(), Intent::In).with_dimension(["n"]),
                Argument::new("y", Dtype::default_real(), Intent::InOut).with_dimension(["n"]),
            ],
        ),
        Procedure::function(
            "count_char",
            vec![
                Argument::new("s", Dtype::default_character("*"), Intent::In),
                Argument::new("c", Dtype::default_character("1"), Intent::In),
            ],
            Dtype::default_integer(),
        ),
    ]
}

fn type_spec() -> String {
    TypeCatalog::new([
        ConfigTypeParam::new(&Dtype::default_integer(), FcType::CInt),
        ConfigTypeParam::new(&Dtype::default_character("*"), FcType::CChar),
        ConfigTypeParam::new(&Dtype::npy_intp(), FcType::CIntptrT),
        ConfigTypeParam::new(&Dtype::default_real(), FcType::CFloat),
    ])
    .to_json()
    .unwrap()
}

fn write_inputs(dir: &Path) {
    fs::write(
        dir.join("interface.json"),
        serde_json::to_string_pretty(&procedures()).unwrap(),
    )
    .unwrap();
    fs::write(dir.join("types.json"), type_spec()).unwrap();
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("fwrap").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("gen"))
        .stdout(predicate::str::contains("probe"))
        .stdout(predicate::str::contains("names"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("fwrap").unwrap();
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_names_command() {
    let mut cmd = Command::cargo_bin("fwrap").unwrap();
    cmd.args(["--quiet", "names", "foo(a, b-3+x(14), c=d+1)"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("names: a, b, d"))
        .stdout(predicate::str::contains("funcnames: foo, x"));
}

#[test]
fn test_names_command_json() {
    let mut cmd = Command::cargo_bin("fwrap").unwrap();
    cmd.args(["--quiet", "names", "--json", "PI*PI/10"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#"{"names":["PI","PI"],"funcnames":[]}"#));
}

#[test]
fn test_names_command_reports_bad_expression() {
    let mut cmd = Command::cargo_bin("fwrap").unwrap();
    cmd.args(["--quiet", "names", "a + $"]);
    cmd.assert().failure().stderr(predicate::str::contains("$"));
}

#[test]
fn test_gen_with_type_spec() {
    let temp_dir = TempDir::new().unwrap();
    write_inputs(temp_dir.path());
    let outdir = temp_dir.path().join("build");

    let mut cmd = Command::cargo_bin("fwrap").unwrap();
    cmd.current_dir(temp_dir.path())
        .args(["--quiet", "gen", "interface.json", "--name", "blas1"])
        .args(["--type-spec", "types.json", "--outdir"])
        .arg(&outdir);
    cmd.assert().success();

    for file in [
        "fwrap_ktp_mod.f90",
        "fwrap_ktp_header.h",
        "fwrap_ktp.pxd",
        "fwrap_ktp.pxi",
        "fwrap_type_specs.json",
        "blas1_fc.f90",
        "blas1_fc.h",
        "blas1_fc.pxd",
        "blas1.pyx",
    ] {
        assert!(outdir.join(file).exists(), "missing {file}");
    }
    let pyx = fs::read_to_string(outdir.join("blas1.pyx")).unwrap();
    assert!(pyx.contains("cpdef api object axpy(fwi_integer_t n, fwr_real_t a, object x, object y):"));
    assert!(pyx.contains("cpdef api object count_char(fw_bytes s, fw_bytes c):"));
    assert!(pyx.contains("    return (fw_ret_arg,)\n"));
}

#[test]
fn test_gen_writes_nothing_on_failure() {
    let temp_dir = TempDir::new().unwrap();
    write_inputs(temp_dir.path());
    let partial = TypeCatalog::new([ConfigTypeParam::new(
        &Dtype::default_integer(),
        FcType::CInt,
    )]);
    fs::write(temp_dir.path().join("partial.json"), partial.to_json().unwrap()).unwrap();
    let outdir = temp_dir.path().join("build");

    let args = GenArgs {
        input: temp_dir.path().join("interface.json"),
        name: "blas1".to_string(),
        outdir: outdir.clone(),
        type_spec: Some(temp_dir.path().join("partial.json")),
        compiler: None,
    };
    let err = gen_command(args, &FwrapConfig::default()).unwrap_err();
    assert!(err.to_string().contains("has not been resolved"));
    assert!(!outdir.exists());
}

#[test]
fn test_gen_rejects_missing_input() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("fwrap").unwrap();
    cmd.current_dir(temp_dir.path())
        .args(["--quiet", "gen", "missing.json", "--name", "x", "--type-spec", "t.json"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("missing.json"));
}
