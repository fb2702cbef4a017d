mod common;

use anyhow::Result;
use predicates::prelude::*;
use sccs_test::TestEnvironment;

use common::*;

#[test]
fn test_cli_help_command() {
    let env = TestEnvironment::new().unwrap();
    sccs_cmd(&env)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("wordsize"))
        .stdout(predicate::str::contains("cutpoint"))
        .stdout(predicate::str::contains("cluster"))
        .stdout(predicate::str::contains("classify"));
}

#[test]
fn test_cli_version_command() {
    let env = TestEnvironment::new().unwrap();
    sccs_cmd(&env)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sccs"));
}

#[test]
fn test_config_init_and_show() -> Result<()> {
    let env = TestEnvironment::new()?;

    sccs_cmd(&env).args(["config", "--init"]).assert().success();
    assert!(env.root().join("config.toml").exists());

    // A second init without --force refuses to overwrite
    sccs_cmd(&env).args(["config", "--init"]).assert().code(2);
    sccs_cmd(&env)
        .args(["config", "--init", "--force"])
        .assert()
        .success();

    sccs_cmd(&env)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("[cutpoint]"))
        .stdout(predicate::str::contains("crecut"));
    Ok(())
}

#[test]
fn test_broken_config_exits_with_configuration_code() -> Result<()> {
    let env = TestEnvironment::new()?;
    let config = env.write_file("bad.toml", "[cutpoint\nnot toml")?;
    let scores = env.write_file("scores.tsv", "a\t0.1\n")?;

    sccs_cmd(&env)
        .arg("--config")
        .arg(&config)
        .arg("cutpoint")
        .arg(&scores)
        .assert()
        .code(2);
    Ok(())
}

#[test]
fn test_cutpoint_scenario() -> Result<()> {
    let env = TestEnvironment::new()?;
    let scores = env.write_file(
        "scores.tsv",
        "# label\tdivergence\ne1\t0.01\ne2\t0.02\ne3\t0.5\ne4\t0.9\n",
    )?;
    let good = env.path("good.txt");

    let output = sccs_cmd(&env)
        .args(["cutpoint", "--dy", "0.4", "--mre", "0.935", "--json"])
        .arg(&scores)
        .arg("--good")
        .arg(&good)
        .output()?;
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["cutpoint"], 3);
    assert_eq!(report["bad"], serde_json::json!(["e4"]));

    let written = std::fs::read_to_string(&good)?;
    assert!(written.contains("e1\t"));
    assert!(!written.contains("e4"));
    Ok(())
}

#[test]
fn test_cutpoint_error_codes() -> Result<()> {
    let env = TestEnvironment::new()?;
    let empty = env.write_file("empty.tsv", "# nothing here\n")?;
    let malformed = env.write_file("bad.tsv", "e1\tnot-a-number\n")?;
    let scores = env.write_file("scores.tsv", "e1\t0.1\ne2\t0.2\n")?;

    sccs_cmd(&env).arg("cutpoint").arg(&empty).assert().code(6);
    sccs_cmd(&env).arg("cutpoint").arg(&malformed).assert().code(4);
    sccs_cmd(&env)
        .arg("cutpoint")
        .arg(env.path("missing.tsv"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Error:"));
    sccs_cmd(&env)
        .args(["cutpoint", "--dy", "0.9"])
        .arg(&scores)
        .assert()
        .code(5);
    Ok(())
}

#[test]
fn test_wordsize_reports_selection() -> Result<()> {
    let env = TestEnvironment::new()?;
    let fasta = two_family_fasta(&env)?;

    let output = sccs_cmd(&env)
        .args(["wordsize", "--limit", "8", "--json"])
        .arg(&fasta)
        .output()?;
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let k = report["word_size"].as_u64().unwrap();
    assert!((3..=8).contains(&k));
    assert_eq!(report["sequences"], 20);

    sccs_cmd(&env)
        .args(["wordsize", "--details", "3"])
        .arg(&fasta)
        .assert()
        .success()
        .stdout(predicate::str::contains("Selected word size"))
        .stdout(predicate::str::contains("alpha_0"));
    Ok(())
}

#[test]
fn test_cluster_separates_families() -> Result<()> {
    let env = TestEnvironment::new()?;
    let fasta = two_family_fasta(&env)?;
    let out = env.out_dir();

    let output = sccs_cmd(&env)
        .args(["cluster", "-k", "4", "--json", "--prefix", "fam"])
        .arg(&fasta)
        .arg("-o")
        .arg(&out)
        .output()?;
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let best = &report["trials"][0];
    assert_eq!(best["clusters"].as_array().unwrap().len(), 2);
    assert!(best["score"].is_number());

    assert!(out.join("fam.cluster0.tsv").exists());
    assert!(out.join("fam.cluster1.tsv").exists());
    Ok(())
}

#[test]
fn test_classify_without_context_size_fails() -> Result<()> {
    let env = TestEnvironment::new()?;
    let fixture = classify_fixture(&env)?;

    sccs_cmd(&env)
        .arg("classify")
        .arg("--seeds")
        .arg(&fixture.seeds)
        .arg("--candidates")
        .arg(&fixture.candidates)
        .arg("--genome-dir")
        .arg(&fixture.genome_dir)
        .assert()
        .code(7)
        .stderr(predicate::str::contains("CTXSZ"));
    Ok(())
}

#[test]
fn test_classify_writes_final_sets() -> Result<()> {
    let env = TestEnvironment::new()?;
    let fixture = classify_fixture(&env)?;
    let out = env.out_dir();

    sccs_cmd(&env)
        .arg("classify")
        .arg("--seeds")
        .arg(&fixture.seeds)
        .arg("--candidates")
        .arg(&fixture.candidates)
        .arg("--genome-dir")
        .arg(&fixture.genome_dir)
        // A median cut in the context phase keeps only the closest members
        .args(["--context", "80", "-k", "4", "--dy", "0.0", "--plots"])
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Final good"));

    let good = sccs_bio::read_entries(out.join("seeds.good.tsv"))?;
    let bad = sccs_bio::read_entries(out.join("seeds.bad.tsv"))?;
    assert_eq!(good.len() + bad.len(), fixture.members.len() + fixture.decoys.len());
    assert!(good.iter().all(|e| fixture.members.contains(e)));
    assert!(out.join("divergence_run0_delta80.csv").exists());

    // The context size now travels with the seeds
    let seeds = std::fs::read_to_string(&fixture.seeds)?;
    assert!(seeds.contains("CTXSZ 80"));

    sccs_cmd(&env)
        .arg("classify")
        .arg("--seeds")
        .arg(&fixture.seeds)
        .arg("--candidates")
        .arg(&fixture.candidates)
        .arg("--genome-dir")
        .arg(&fixture.genome_dir)
        .args(["-k", "4", "--json"])
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"delta\": 80"));
    Ok(())
}

#[test]
fn test_classify_unknown_genome_key() -> Result<()> {
    let env = TestEnvironment::new()?;
    let fixture = classify_fixture(&env)?;

    sccs_cmd(&env)
        .arg("classify")
        .arg("--seeds")
        .arg(&fixture.seeds)
        .arg("--candidates")
        .arg(&fixture.candidates)
        .args(["--genome", "hg19", "--context", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("hg19"));
    Ok(())
}
