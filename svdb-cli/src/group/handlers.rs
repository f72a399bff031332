use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use tracing::info;

use svdb_core::models::Interval;
use svdb_grouping::{Group, group};
use svdb_import::read_bed_intervals;

const HEADER: &str = "id\tparent\tcore\tloose\tmean\tstdev_start\tstdev_end\tn";

pub fn run_group(matches: &ArgMatches) -> Result<()> {
    let bed = matches
        .get_one::<String>("bed")
        .context("A path to a BED file is required.")?;
    let eps = matches.get_one::<f64>("cluster").copied();
    if let Some(eps) = eps {
        if eps.is_nan() || eps < 0.0 {
            anyhow::bail!("Cluster distance must be a non-negative number, got {eps}");
        }
    }

    let intervals = read_bed_intervals(Path::new(bed))
        .with_context(|| format!("Failed to read intervals: {bed}"))?;
    let n_intervals = intervals.len();
    let groups = group(intervals)?;
    info!(intervals = n_intervals, groups = groups.len(), "grouped intervals");

    let out: Box<dyn Write> = match matches.get_one::<String>("output") {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create output file: {path}"))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut out = BufWriter::new(out);

    write_groups(&mut out, &groups, eps)?;
    out.flush()?;

    Ok(())
}

fn write_row<W: Write>(out: &mut W, id: &str, parent: &str, g: &Group<Interval>) -> io::Result<()> {
    writeln!(
        out,
        "{id}\t{parent}\t{}\t{}\t{}\t{:.2}\t{:.2}\t{}",
        g.core_interval(),
        g.loose_interval(),
        g.mean_interval(),
        g.stdev_start(),
        g.stdev_end(),
        g.len()
    )
}

///
/// One row per group, then, when `eps` is given, one row per sub-cluster
/// directly after its parent. Group ids are 1-based; sub-cluster ids are
/// `{group}.{n}` in core-name order.
///
fn write_groups<W: Write>(out: &mut W, groups: &[Group<Interval>], eps: Option<f64>) -> Result<()> {
    writeln!(out, "{HEADER}")?;
    for (i, g) in groups.iter().enumerate() {
        let id = (i + 1).to_string();
        write_row(out, &id, "", g)?;

        if let Some(eps) = eps {
            for (j, sub_group) in g.cluster(eps)?.values().enumerate() {
                write_row(out, &format!("{id}.{}", j + 1), &id, sub_group)?;
            }
        }
    }
    Ok(())
}
