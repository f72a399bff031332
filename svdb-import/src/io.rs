use std::collections::{BTreeSet, HashMap};
use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use serde::Deserialize;

use svdb_carriers::Catalog;
use svdb_core::models::{Filter, Genotype, Interval, Sv, SvType};

use crate::errors::{ImportError, Result};

///
/// Get a buffered reader for a plain or gzip'd file, picked by the `gz`
/// extension.
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path)?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

fn tsv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_reader(reader)
}

fn tsv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(writer)
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PatientRecord {
    pub name: String,
    pub family_id: String,
}

#[derive(Deserialize, Debug)]
struct CallRecord {
    patient: String,
    chrom: String,
    start: u32,
    end: u32,
    sv_type: SvType,
    filter: String,
    source: String,
    vcf_id: String,
    genotype: Genotype,
}

impl CallRecord {
    fn into_sv(self) -> Result<(String, Sv)> {
        let interval = Interval::new(self.chrom, self.start, self.end)?;
        let filter = match self.filter.parse::<Filter>() {
            Ok(filter) => filter,
            Err(never) => match never {},
        };
        let sv = Sv::new(
            interval,
            self.sv_type,
            filter,
            self.source,
            self.vcf_id,
            self.genotype,
        );
        Ok((self.patient, sv))
    }
}

/// Read the patient table. Columns other than `name` and `family_id` are
/// ignored.
pub fn read_patients(path: &Path) -> Result<Vec<PatientRecord>> {
    let mut reader = tsv_reader(get_dynamic_reader(path)?);
    let mut patients = vec![];
    for record in reader.deserialize() {
        patients.push(record?);
    }
    Ok(patients)
}

///
/// Read typed calls and bucket them by patient, keeping file order within
/// each patient.
///
pub fn read_calls(path: &Path) -> Result<HashMap<String, Vec<Sv>>> {
    let mut reader = tsv_reader(get_dynamic_reader(path)?);
    let mut calls: HashMap<String, Vec<Sv>> = HashMap::new();
    for record in reader.deserialize::<CallRecord>() {
        let (patient, sv) = record?.into_sv()?;
        calls.entry(patient).or_default().push(sv);
    }
    Ok(calls)
}

fn is_bed_header(line: &str) -> bool {
    line.is_empty()
        || line.starts_with('#')
        || line.starts_with("track")
        || line.starts_with("browser")
}

fn parse_field<T: std::str::FromStr>(field: Option<&str>, name: &str, line: usize) -> Result<T> {
    let field = field.ok_or_else(|| ImportError::MalformedLine {
        line,
        reason: format!("missing {name} field"),
    })?;
    field.trim().parse::<T>().map_err(|_| ImportError::MalformedLine {
        line,
        reason: format!("invalid {name}: {field}"),
    })
}

///
/// Read BED-like rows, returning the 1-based line number, the interval and
/// any remaining columns of every data line. Header, comment and blank lines
/// are skipped.
///
pub(crate) fn read_bed_rows(path: &Path) -> Result<Vec<(usize, Interval, Vec<String>)>> {
    let reader = get_dynamic_reader(path)?;
    let mut rows = vec![];

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if is_bed_header(&line) {
            continue;
        }
        let number = index + 1;
        let mut fields = line.split('\t');

        let chrom: String = parse_field(fields.next(), "chrom", number)?;
        let start: u32 = parse_field(fields.next(), "start", number)?;
        let end: u32 = parse_field(fields.next(), "end", number)?;
        let rest = fields.map(str::to_string).collect();

        rows.push((number, Interval::new(chrom, start, end)?, rest));
    }

    Ok(rows)
}

/// Read the first three columns of a BED file as intervals.
pub fn read_bed_intervals(path: &Path) -> Result<Vec<Interval>> {
    Ok(read_bed_rows(path)?
        .into_iter()
        .map(|(_, interval, _)| interval)
        .collect())
}

///
/// Write the catalog as TSV: one row per SV, with one column per
/// annotation name seen anywhere in the catalog. Absent or inapplicable
/// annotations are left empty.
///
pub fn write_catalog<C: Catalog + ?Sized, W: Write>(catalog: &C, writer: W) -> Result<()> {
    let annotation_names: BTreeSet<&str> = catalog
        .svs()
        .flat_map(|record| record.annotations.keys().map(String::as_str))
        .collect();

    let mut writer = tsv_writer(writer);

    let mut header = vec!["id", "name", "chrom", "start", "end", "sv_type", "n_carriers"];
    header.extend(annotation_names.iter().copied());
    writer.write_record(&header)?;

    for record in catalog.svs() {
        let mut row = vec![
            record.id.to_string(),
            record.name.clone(),
            record.interval.chrom().to_string(),
            record.interval.start().to_string(),
            record.interval.end().to_string(),
            record.sv_type.to_string(),
            record.n_carriers.map(|n| n.to_string()).unwrap_or_default(),
        ];
        for name in &annotation_names {
            let value = record.annotations.get(*name).copied().flatten();
            row.push(value.map(|v| v.to_string()).unwrap_or_default());
        }
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the per-patient call rows as TSV.
pub fn write_patient_svs<C: Catalog + ?Sized, W: Write>(catalog: &C, writer: W) -> Result<()> {
    let mut writer = tsv_writer(writer);
    writer.write_record([
        "patient",
        "family_id",
        "sv_id",
        "sv_name",
        "genotype",
        "vcf_id",
        "source",
        "filter",
        "is_duplicate",
    ])?;

    for row in catalog.patient_svs() {
        let (patient, family_id) = catalog
            .patient(row.patient_id)
            .map(|p| (p.name.as_str(), p.family_id.as_str()))
            .unwrap_or_default();
        let sv_name = catalog
            .sv(row.sv_id)
            .map(|sv| sv.name.as_str())
            .unwrap_or_default();

        writer.write_record([
            patient,
            family_id,
            row.sv_id.to_string().as_str(),
            sv_name,
            row.genotype.as_str(),
            row.vcf_id.as_str(),
            row.source.as_str(),
            row.filter.to_string().as_str(),
            if row.is_duplicate { "1" } else { "0" },
        ])?;
    }

    writer.flush()?;
    Ok(())
}
