use clap::{Command, arg};

pub const GROUP_CMD: &str = "group";

pub fn create_group_cli() -> Command {
    Command::new(GROUP_CMD)
        .about("Group overlapping intervals of a BED file and optionally split each group into sub-clusters.")
        .arg(arg!(--bed <bed> "BED file of intervals (optionally gzip'd)").required(true))
        .arg(
            arg!(--cluster <eps> "Split each group with DBSCAN at this IoU distance")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(arg!(--output <output> "Output file, defaults to stdout"))
}
