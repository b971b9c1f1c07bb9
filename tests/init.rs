use std::process::Command;

#[test]
fn init_creates_valid_toml() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_revstat"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "revstat init failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let config_path = dir.path().join(".revstat.toml");
    assert!(config_path.exists(), ".revstat.toml should exist");

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[review]"));
    assert!(content.contains("[git]"));

    // Verify it's valid TOML that revstat-core can parse
    let config: revstat_core::RevstatConfig = toml::from_str(&content).unwrap();
    assert_eq!(config.git.program, "git");
}

#[test]
fn init_refuses_if_exists() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".revstat.toml"), "# existing").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_revstat"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let content = std::fs::read_to_string(dir.path().join(".revstat.toml")).unwrap();
    assert_eq!(content, "# existing");
}
