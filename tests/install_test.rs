#![cfg(unix)]

mod common;

use anyhow::Result;
use common::{TestEnv, path_str};
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

#[test]
fn test_install_symlink_is_relative() -> Result<()> {
    let env = TestEnv::new()?;
    let tool = env.program("tool")?;

    env.cmd()?
        .args(["install", path_str(&tool)])
        .assert()
        .success()
        .stdout(format!("Symlinking tool -> {}\n", tool.display()));

    assert_eq!(fs::read_link(env.entry("tool"))?, Path::new("../src/tool"));

    env.cmd()?
        .args(["list", "-l"])
        .assert()
        .success()
        .stdout(format!("tool -> {}\n", tool.display()));

    Ok(())
}

#[test]
fn test_install_relative_argument_uses_cwd() -> Result<()> {
    let env = TestEnv::new()?;
    let tool = env.program("tool")?;

    env.cmd()?
        .current_dir(&env.src_dir)
        .args(["i", "./tool"])
        .assert()
        .success()
        .stdout(format!("Symlinking tool -> {}\n", tool.display()));

    Ok(())
}

#[test]
fn test_install_twice_is_already_installed() -> Result<()> {
    let env = TestEnv::new()?;
    let tool = env.program("tool")?;

    env.cmd()?.args(["install", path_str(&tool)]).assert().success();
    env.cmd()?
        .args(["install", path_str(&tool)])
        .assert()
        .success()
        .stdout(predicate::str::ends_with("(already installed)\n"));

    Ok(())
}

#[test]
fn test_install_conflict_requires_force() -> Result<()> {
    let env = TestEnv::new()?;
    let first = env.program("tool")?;
    fs::create_dir_all(env.src_dir.join("other"))?;
    let second = env.src_dir.join("other/tool");
    fs::copy(&first, &second)?;

    env.cmd()?.args(["install", path_str(&first)]).assert().success();
    env.cmd()?
        .args(["install", path_str(&second)])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "tool exists (overwrite with --force)",
        ));

    env.cmd()?
        .args(["install", "--force", path_str(&second)])
        .assert()
        .success();
    assert_eq!(
        fs::read_link(env.entry("tool"))?,
        Path::new("../src/other/tool")
    );

    Ok(())
}

#[test]
fn test_install_continues_past_failures() -> Result<()> {
    let env = TestEnv::new()?;
    let a = env.program("a")?;
    let plain = env.file("plain", "data", 0o644)?;
    let c = env.program("c")?;
    let missing = env.src_dir.join("missing");

    env.cmd()?
        .args([
            "install",
            path_str(&a),
            path_str(&plain),
            path_str(&missing),
            path_str(&c),
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(format!(
            "{}: not an executable",
            plain.display()
        )))
        .stderr(predicate::str::contains(format!(
            "{}: file not found",
            missing.display()
        )));

    assert_eq!(env.entries()?, ["a", "c"]);
    Ok(())
}

#[test]
fn test_install_rejects_directories_and_hidden_files() -> Result<()> {
    let env = TestEnv::new()?;
    let hidden = env.program(".hidden")?;

    env.cmd()?
        .args(["install", path_str(&env.src_dir), path_str(&hidden)])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("is a directory"))
        .stderr(predicate::str::contains("program must not start with '.'"));

    Ok(())
}

#[test]
fn test_install_copy_preserves_mode() -> Result<()> {
    let env = TestEnv::new()?;
    let tool = env.file("tool.sh", "#!/bin/sh\n", 0o750)?;

    env.cmd()?
        .args(["install", "--copy", "--no-ext", path_str(&tool)])
        .assert()
        .success()
        .stdout(format!("Copying tool from {}\n", tool.display()));

    let entry = env.entry("tool");
    assert!(!fs::symlink_metadata(&entry)?.file_type().is_symlink());
    assert_eq!(fs::read_to_string(&entry)?, "#!/bin/sh\n");
    assert_eq!(fs::metadata(&entry)?.permissions().mode() & 0o7777, 0o750);

    env.cmd()?
        .args(["install", "-cn", path_str(&tool)])
        .assert()
        .success()
        .stdout(predicate::str::contains("(already installed)"));

    Ok(())
}

#[test]
fn test_install_move_relocates_source() -> Result<()> {
    let env = TestEnv::new()?;
    let tool = env.program("tool")?;

    env.cmd()?
        .args(["install", "--move", path_str(&tool)])
        .assert()
        .success()
        .stdout(format!("Moving tool from {}\n", tool.display()));

    assert!(!tool.exists());
    assert!(env.entry("tool").is_file());
    Ok(())
}

#[test]
fn test_install_move_refuses_symlinks() -> Result<()> {
    let env = TestEnv::new()?;
    let tool = env.program("tool")?;
    let link = env.src_dir.join("link");
    std::os::unix::fs::symlink(&tool, &link)?;

    env.cmd()?
        .args(["install", "-m", path_str(&link)])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot install symlinks with --move"));

    assert!(fs::symlink_metadata(&link).is_ok());
    Ok(())
}

#[test]
fn test_install_rename() -> Result<()> {
    let env = TestEnv::new()?;
    let tool = env.program("tool.py")?;

    env.cmd()?
        .args(["install", "-r", "t", path_str(&tool)])
        .assert()
        .success()
        .stdout(format!("Symlinking t -> {}\n", tool.display()));

    assert_eq!(env.entries()?, ["t"]);
    Ok(())
}

#[test]
fn test_install_rename_needs_single_program() -> Result<()> {
    let env = TestEnv::new()?;
    let a = env.program("a")?;
    let b = env.program("b")?;

    env.cmd()?
        .args(["install", "--rename", "x", path_str(&a), path_str(&b)])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--rename requires a single program"));

    assert!(!env.bin_dir.exists() || env.entries()?.is_empty());
    Ok(())
}

#[test]
fn test_install_flag_conflicts_exit_one() -> Result<()> {
    let env = TestEnv::new()?;
    let tool = env.program("tool")?;

    env.cmd()?
        .args(["install", "-c", "-m", path_str(&tool)])
        .assert()
        .code(1);
    env.cmd()?
        .args(["install", "-n", "-r", "x", path_str(&tool)])
        .assert()
        .code(1);

    Ok(())
}

#[test]
fn test_install_mode_from_config() -> Result<()> {
    let env = TestEnv::new()?;
    let tool = env.program("tool.sh")?;
    fs::write(
        &env.config_path,
        "[install]\nmode = \"copy\"\nno_ext = true\n",
    )?;

    env.cmd()?
        .args(["install", path_str(&tool)])
        .assert()
        .success()
        .stdout(format!("Copying tool from {}\n", tool.display()));

    Ok(())
}
