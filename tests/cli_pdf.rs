use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn command_pdf_newick() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let pdf = dir.path().join("abc.pdf");

    let mut cmd = Command::cargo_bin("tredraw")?;
    cmd.arg("pdf")
        .arg("tests/newick/abc.nwk")
        .arg(&pdf)
        .assert()
        .success();

    let data = std::fs::read(&pdf)?;
    assert!(data.starts_with(b"%PDF"));

    Ok(())
}

#[test]
fn command_pdf_xz_stdin() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let pdf = dir.path().join("abc.pdf");

    let mut cmd = Command::cargo_bin("tredraw")?;
    cmd.arg("pdf")
        .arg("stdin")
        .arg(&pdf)
        .write_stdin(std::fs::read("tests/newick/abc.nwk.xz")?)
        .assert()
        .success();
    assert!(std::fs::read(&pdf)?.starts_with(b"%PDF"));

    Ok(())
}

#[test]
fn command_pdf_settings() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let pdf = dir.path().join("flu.pdf");
    let settings = dir.path().join("settings.json");
    let json = dir.path().join("flu.json");

    let mut cmd = Command::cargo_bin("tredraw")?;
    cmd.arg("pdf")
        .arg("tests/newick/flu.json")
        .arg(&pdf)
        .arg("--continents")
        .arg("--clades")
        .arg("--subtree-top-bottom")
        .arg("--settings")
        .arg(&settings)
        .arg("--json")
        .arg(&json)
        .assert()
        .success();
    assert!(std::fs::read(&pdf)?.starts_with(b"%PDF"));

    let s: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&settings)?)?;
    assert_eq!(s["border"], 0.1);
    assert_eq!(s["canvas"][0], 612.0);
    assert_eq!(s["title"]["text"], "H3N2");
    assert_eq!(s["tree"]["number_of_lines"], 6);
    assert_eq!(s["time_series"]["begin"], "2019-01-01");
    assert_eq!(s["time_series"]["end"], "2019-05-01");
    assert_eq!(s["time_series"]["number_of_months"], 5);
    assert_eq!(s["time_series"]["max_number_of_months"], 12);
    assert_eq!(s["time_series"]["show_subtree_top_bottom"], true);
    assert_eq!(s["clades"]["show"], true);

    let per_clade = s["clades"]["per_clade"].as_array().unwrap();
    assert_eq!(per_clade.len(), 3);
    let a1 = per_clade.iter().find(|c| c["_id"] == "3C.2a1").unwrap();
    assert_eq!(a1["label"], "2a1");
    assert_eq!(a1["label_position"], "top");
    assert_eq!(a1["begin"], 0);
    assert_eq!(a1["end"], 1);

    // the written tree carries the same settings and reloads
    let t: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&json)?)?;
    assert_eq!(t["version"], "phylogenetic-tree-v1");
    assert_eq!(t["updated"]["creator"], "tredraw pdf");
    assert_eq!(t["_settings"], s);

    let pdf2 = dir.path().join("flu2.pdf");
    let mut cmd = Command::cargo_bin("tredraw")?;
    cmd.arg("pdf").arg(&json).arg(&pdf2).assert().success();

    Ok(())
}

#[test]
fn command_pdf_print() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let pdf = dir.path().join("flu.pdf");

    let mut cmd = Command::cargo_bin("tredraw")?;
    let output = cmd
        .arg("pdf")
        .arg("tests/newick/flu.nwk")
        .arg(&pdf)
        .arg("-p")
        .arg("--edges")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert!(output.status.success());
    assert!(stdout.contains("    A/HONG KONG/3/2019 2019-02-20:0.002\n"));
    assert!(stdout.contains("  ):0.018\n"));
    assert!(stdout.contains("0.001 1\n"));
    assert!(stdout.contains("min: 0.001  max: 0.018"));

    Ok(())
}

#[test]
fn command_pdf_print_with_pdf_on_stdout() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("tredraw")?;
    let output = cmd
        .arg("pdf")
        .arg("tests/newick/flu.nwk")
        .arg("-")
        .arg("-p")
        .arg("--edges")
        .output()?;
    let stderr = String::from_utf8(output.stderr)?;

    assert!(output.status.success());
    assert!(output.stdout.starts_with(b"%PDF"));
    assert!(stderr.contains("    A/HONG KONG/3/2019 2019-02-20:0.002\n"));
    assert!(stderr.contains("min: 0.001  max: 0.018"));

    Ok(())
}

#[test]
fn command_pdf_ladderize_fix_labels() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let pdf = dir.path().join("out.pdf");

    let mut cmd = Command::cargo_bin("tredraw")?;
    let output = cmd
        .arg("pdf")
        .arg("((A/HUMAN/X:1,B:5):1,(C:2,D__E:2):1);")
        .arg(&pdf)
        .arg("--ladderize")
        .arg("--fix-labels")
        .arg("--aa-at")
        .arg("142")
        .arg("-p")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert!(output.status.success());
    let leaves: Vec<_> = stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.starts_with('(') && !l.starts_with(')'))
        .collect();
    assert_eq!(leaves, vec!["C:2", "D E:2", "AX:1", "B:5"]);

    Ok(())
}

#[test]
fn command_pdf_errors() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("tredraw")?;
    cmd.arg("pdf")
        .arg("tests/newick/not-there.nwk")
        .arg("out.pdf")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot open tests/newick/not-there.nwk"));

    let mut cmd = Command::cargo_bin("tredraw")?;
    cmd.arg("pdf")
        .arg("(A:1,B:x);")
        .arg("out.pdf")
        .assert()
        .failure()
        .stderr(predicate::str::contains("edge length expected at 7"));

    let mut cmd = Command::cargo_bin("tredraw")?;
    cmd.arg("pdf")
        .arg("tests/newick/abc.nwk")
        .arg("out.pdf")
        .arg("--continents")
        .arg("--aa-at")
        .arg("142")
        .assert()
        .failure();

    Ok(())
}
