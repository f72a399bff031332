use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ArgMatches;
use tracing::info;

use svdb_carriers::MemoryCatalog;
use svdb_import::{
    ImportConfig, build_annotators, import_cohort, read_calls, read_patients, write_catalog,
    write_patient_svs,
};

use super::cli::{CATALOG_FILE, PATIENT_SV_FILE};

pub fn run_import(matches: &ArgMatches) -> Result<()> {
    let config = matches
        .get_one::<String>("config")
        .context("A path to an import config is required.")?;
    let patients = matches
        .get_one::<String>("patients")
        .context("A path to a patient table is required.")?;
    let calls = matches
        .get_one::<String>("calls")
        .context("A path to a call table is required.")?;
    let output = matches
        .get_one::<String>("output")
        .context("An output directory is required.")?;

    let config = ImportConfig::try_from(Path::new(config))
        .with_context(|| format!("Failed to load config: {config}"))?;
    let annotators =
        build_annotators(&config.annotation).context("Failed to load reference tables")?;
    let patients = read_patients(Path::new(patients))
        .with_context(|| format!("Failed to read patients: {patients}"))?;
    let calls =
        read_calls(Path::new(calls)).with_context(|| format!("Failed to read calls: {calls}"))?;

    let mut catalog = MemoryCatalog::new();
    let summary = import_cohort(&mut catalog, &patients, calls, &config, &annotators)?;
    info!(?summary, "import finished");

    let output = PathBuf::from(output);
    fs::create_dir_all(&output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))?;

    let catalog_path = output.join(CATALOG_FILE);
    let file = File::create(&catalog_path)
        .with_context(|| format!("Failed to create {}", catalog_path.display()))?;
    write_catalog(&catalog, BufWriter::new(file))?;

    let patient_sv_path = output.join(PATIENT_SV_FILE);
    let file = File::create(&patient_sv_path)
        .with_context(|| format!("Failed to create {}", patient_sv_path.display()))?;
    write_patient_svs(&catalog, BufWriter::new(file))?;

    info!(
        catalog = %catalog_path.display(),
        patient_svs = %patient_sv_path.display(),
        "wrote outputs"
    );

    Ok(())
}
