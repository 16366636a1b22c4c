use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn command_to_json_newick() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("tredraw")?;
    let output = cmd.arg("to-json").arg("tests/newick/abc.nwk").output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert!(output.status.success());
    let doc: serde_json::Value = serde_json::from_str(&stdout)?;
    assert_eq!(doc["version"], "phylogenetic-tree-v1");
    assert_eq!(doc["updated"]["creator"], "tredraw to-json");
    assert_eq!(doc["tree"]["subtree"][0]["edge_length"], 3.0);
    assert_eq!(doc["tree"]["subtree"][0]["number_strains"], 2);
    assert_eq!(doc["tree"]["subtree"][0]["subtree"][1]["name"], "B");
    assert_eq!(doc["tree"]["subtree"][1]["name"], "C");
    assert!(doc.get("_settings").is_none());

    Ok(())
}

#[test]
fn command_to_json_dates() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("tredraw")?;
    let output = cmd.arg("to-json").arg("tests/newick/flu.nwk").output()?;
    let stdout = String::from_utf8(output.stdout)?;

    let doc: serde_json::Value = serde_json::from_str(&stdout)?;
    let leaf = &doc["tree"]["subtree"][0]["subtree"][2];
    assert_eq!(leaf["name"], "A/HONG KONG/3/2019");
    assert_eq!(leaf["date"], "2019-02-20");

    Ok(())
}

#[test]
fn command_to_json_keeps_settings() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("tredraw")?;
    cmd.arg("to-json")
        .arg("tests/newick/flu.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"_settings\""))
        .stdout(predicate::str::contains("\"H3N2\""));

    Ok(())
}

#[test]
fn command_to_json_xz() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let xz = dir.path().join("abc.json.xz");

    let mut cmd = Command::cargo_bin("tredraw")?;
    cmd.arg("to-json")
        .arg("tests/newick/abc.nwk")
        .arg("-o")
        .arg(&xz)
        .assert()
        .success();
    let data = std::fs::read(&xz)?;
    assert!(data.starts_with(&[0xFD, b'7', b'z', b'X', b'Z', 0x00]));

    // compressed json reads back
    let mut cmd = Command::cargo_bin("tredraw")?;
    cmd.arg("to-json")
        .arg(&xz)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"C\""));

    Ok(())
}

#[test]
fn command_to_json_ladderize() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("tredraw")?;
    let output = cmd
        .arg("to-json")
        .arg("tests/newick/abc.nwk")
        .arg("--ladderize")
        .arg("-p")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;
    let stderr = String::from_utf8(output.stderr)?;

    let doc: serde_json::Value = serde_json::from_str(&stdout)?;
    assert_eq!(doc["tree"]["subtree"][0]["name"], "C");
    assert!(stderr.starts_with("(\n  C:4\n  (\n    A:1\n"));

    Ok(())
}

#[test]
fn command_to_json_errors() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let junk = dir.path().join("junk.txt");
    std::fs::write(&junk, "hello")?;

    let mut cmd = Command::cargo_bin("tredraw")?;
    cmd.arg("to-json")
        .arg(&junk)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized source format"));

    let mut cmd = Command::cargo_bin("tredraw")?;
    cmd.arg("to-json")
        .arg(r#"{"version": "phylogenetic-tree-v2", "tree": {}}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported version phylogenetic-tree-v2"));

    let mut cmd = Command::cargo_bin("tredraw")?;
    cmd.arg("to-json")
        .arg(r#"{"version": "phylogenetic-tree-v1", "tree": {"subtree": [{"name": "A", "date": "2019"}]}}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot parse date from 2019"));

    Ok(())
}
