use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn command_diff_same() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("tredraw")?;
    cmd.arg("diff")
        .arg("tests/newick/flu.nwk")
        .arg("tests/newick/flu.json")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    Ok(())
}

#[test]
fn command_diff_edges() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("tredraw")?;
    cmd.arg("diff")
        .arg("tests/newick/abc.nwk")
        .arg("((A:1,B:2):3,C:5);")
        .assert()
        .failure()
        .stdout(predicate::str::contains("leaf 2 C: edge 4 vs 5"))
        .stderr(predicate::str::contains("differ"));

    Ok(())
}

#[test]
fn command_diff_topology() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("tredraw")?;
    cmd.arg("diff")
        .arg("tests/newick/abc.nwk")
        .arg("(A:1,(B:2,C:4):3);")
        .assert()
        .failure()
        .stdout(predicate::str::contains("topology or internal edge lengths differ"));

    let mut cmd = Command::cargo_bin("tredraw")?;
    cmd.arg("diff")
        .arg("tests/newick/abc.nwk")
        .arg("(C:4,(A:1,B:2):3);")
        .assert()
        .failure()
        .stdout(predicate::str::contains("leaf 0: name A vs C"));

    Ok(())
}
