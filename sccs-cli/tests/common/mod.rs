#![allow(dead_code)]

use anyhow::Result;
use assert_cmd::Command;
use sccs_core::EntryRef;
use sccs_test::{mutate, MarkovSource, TestEnvironment, TestGenome, TestSequence};
use std::path::PathBuf;

/// `sccs` isolated from the user's home and environment
pub fn sccs_cmd(env: &TestEnvironment) -> Command {
    let mut cmd = Command::cargo_bin("sccs").unwrap();
    cmd.env("SCCS_HOME", env.root())
        .env_remove("SCCS_CONFIG")
        .env_remove("SCCS_LOG");
    cmd
}

/// Two families of ten sequences each from unrelated sources
pub fn two_family_fasta(env: &TestEnvironment) -> Result<PathBuf> {
    let mut sequences = sccs_test::sequence_family(
        "alpha",
        &MarkovSource::random(2, 0.8, 21),
        10,
        600,
        0.03,
        1,
    );
    sequences.extend(sccs_test::sequence_family(
        "beta",
        &MarkovSource::random(2, 0.8, 42),
        10,
        600,
        0.03,
        2,
    ));
    env.write_fasta("families.fa", &sequences)
}

/// A genome with six seeds and six more family members, plus unrelated regions
pub struct ClassifyFixture {
    pub seeds: PathBuf,
    pub candidates: PathBuf,
    pub genome_dir: PathBuf,
    pub members: Vec<EntryRef>,
    pub decoys: Vec<EntryRef>,
}

pub fn classify_fixture(env: &TestEnvironment) -> Result<ClassifyFixture> {
    let family = MarkovSource::random(2, 0.8, 11);
    let stranger = MarkovSource::random(2, 0.8, 97);
    let core = family.generate(300, 1);
    let flank = family.generate(80, 2);

    let mut genome = TestGenome::new("chr1", 3);
    let mut seeds = Vec::new();
    let mut members = Vec::new();
    for i in 0..12u64 {
        genome.spacer(40);
        genome.append(&mutate(&flank, 0.05, 10 + i));
        let symbols = mutate(&core, 0.05, 20 + i);
        let entry = genome.append(&symbols);
        genome.append(&mutate(&flank, 0.05, 30 + i));
        if i < 6 {
            seeds.push(TestSequence::new(entry.to_string(), symbols));
        } else {
            members.push(entry);
        }
    }
    let mut decoys = Vec::new();
    for i in 0..3u64 {
        genome.spacer(120);
        decoys.push(genome.append(&stranger.generate(300, 50 + i)));
    }
    genome.spacer(120);

    let genome_dir = env.write_genome("synthetic", &[&genome])?;
    let seeds = env.write_fasta("seeds.fa", &seeds)?;

    let mut candidates: Vec<EntryRef> = members.clone();
    candidates.extend(decoys.iter().cloned());
    let candidates_path = env.path("candidates.tsv");
    sccs_bio::write_entries(&candidates_path, &candidates)?;

    Ok(ClassifyFixture {
        seeds,
        candidates: candidates_path,
        genome_dir,
        members,
        decoys,
    })
}
