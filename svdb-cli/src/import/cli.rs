use clap::{Command, arg};

pub const IMPORT_CMD: &str = "import";
pub const DEFAULT_OUT: &str = ".";
pub const CATALOG_FILE: &str = "catalog.tsv";
pub const PATIENT_SV_FILE: &str = "patient_sv.tsv";

pub fn create_import_cli() -> Command {
    Command::new(IMPORT_CMD)
        .about("Import a cohort's SV calls into a catalog, flag duplicate calls and count carrier families.")
        .arg(arg!(--config <config> "YAML import config").required(true))
        .arg(arg!(--patients <patients> "Patient table (TSV with name and family_id)").required(true))
        .arg(arg!(--calls <calls> "Typed call table (TSV, optionally gzip'd)").required(true))
        .arg(
            arg!(--output <output> "Directory for catalog.tsv and patient_sv.tsv")
                .default_value(DEFAULT_OUT),
        )
}
