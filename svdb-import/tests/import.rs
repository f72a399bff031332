use std::fs::{self, File};
use std::path::Path;

use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::tempdir;

use svdb_carriers::MemoryCatalog;
use svdb_import::{
    ImportConfig, ImportSummary, build_annotators, import_cohort, read_calls, read_patients,
    write_catalog, write_patient_svs,
};

#[rstest]
fn test_import_fixture_cohort() {
    let data = Path::new("../tests/data/import");
    let config = ImportConfig::try_from(data.join("config.yml").as_path()).unwrap();
    let annotators = build_annotators(&config.annotation).unwrap();
    let patients = read_patients(&data.join("patients.tsv")).unwrap();
    let calls = read_calls(&data.join("calls.tsv")).unwrap();

    let mut catalog = MemoryCatalog::new();
    let summary = import_cohort(&mut catalog, &patients, calls, &config, &annotators).unwrap();
    assert_eq!(
        summary,
        ImportSummary {
            patients: 3,
            calls: 6,
            dropped: 2,
            svs: 5,
            patient_svs: 6,
            duplicates: 1,
        }
    );

    let dir = tempdir().unwrap();
    let catalog_path = dir.path().join("catalog.tsv");
    let patient_sv_path = dir.path().join("patient_sv.tsv");
    write_catalog(&catalog, File::create(&catalog_path).unwrap()).unwrap();
    write_patient_svs(&catalog, File::create(&patient_sv_path).unwrap()).unwrap();

    let written = fs::read_to_string(&catalog_path).unwrap();
    assert_eq!(
        written.lines().collect::<Vec<_>>(),
        vec![
            "id\tname\tchrom\tstart\tend\tsv_type\tn_carriers\tdbvar_count",
            "1\tchr1-1000-2000-LOSS\tchr1\t1000\t2000\tLOSS\t2\t12",
            "2\tchr1-1000-2050-LOSS\tchr1\t1000\t2050\tLOSS\t2\t12",
            "3\tchr1-5000-6000-GAIN\tchr1\t5000\t6000\tGAIN\t1\t",
            "4\tchr1-1010-1990-LOSS\tchr1\t1010\t1990\tLOSS\t2\t12",
            "5\tchr2-300-900-INV\tchr2\t300\t900\tINV\t1\t",
        ]
    );

    let written = fs::read_to_string(&patient_sv_path).unwrap();
    assert_eq!(
        written.lines().collect::<Vec<_>>(),
        vec![
            "patient\tfamily_id\tsv_id\tsv_name\tgenotype\tvcf_id\tsource\tfilter\tis_duplicate",
            "P1\tF1\t1\tchr1-1000-2000-LOSS\tHET\tMantaDEL:1\tmanta\tPASS\t0",
            "P1\tF1\t2\tchr1-1000-2050-LOSS\tHET\tCanvas:LOSS:1\tcanvas\tPASS\t1",
            "P1\tF1\t3\tchr1-5000-6000-GAIN\tHOM\tMantaDUP:2\tmanta\tLowQual\t0",
            "P2\tF2\t4\tchr1-1010-1990-LOSS\tHET\tMantaDEL:7\tmanta\tPASS\t0",
            "P2\tF2\t5\tchr2-300-900-INV\tHET\tMantaINV:8\tmanta\tPASS\t0",
            "P3\tF1\t3\tchr1-5000-6000-GAIN\tHET\tCanvas:GAIN:4\tcanvas\tPASS\t0",
        ]
    );
}
