mod group;
mod import;

use anyhow::Result;
use clap::Command;
use tracing_subscriber::EnvFilter;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "svdb";
    pub const BIN_NAME: &str = "svdb";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Group, deduplicate and count carriers of structural-variant calls across a cohort.")
        .subcommand_required(true)
        .subcommand(import::cli::create_import_cli())
        .subcommand(group::cli::create_group_cli())
}

/// Logs go to stderr so TSV written to stdout stays clean. `RUST_LOG`
/// overrides the default `info` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // IMPORT
        //
        Some((import::cli::IMPORT_CMD, matches)) => {
            import::handlers::run_import(matches)?;
        }

        //
        // GROUP
        //
        Some((group::cli::GROUP_CMD, matches)) => {
            group::handlers::run_group(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    fn test_parser_is_consistent() {
        build_parser().debug_assert();
    }

    #[rstest]
    fn test_parse_import() {
        let matches = build_parser()
            .try_get_matches_from([
                consts::BIN_NAME,
                import::cli::IMPORT_CMD,
                "--config",
                "config.yml",
                "--patients",
                "patients.tsv",
                "--calls",
                "calls.tsv",
            ])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, import::cli::IMPORT_CMD);
        assert_eq!(sub.get_one::<String>("output").unwrap(), ".");
    }

    #[rstest]
    fn test_import_requires_config() {
        let result = build_parser().try_get_matches_from([
            consts::BIN_NAME,
            import::cli::IMPORT_CMD,
            "--patients",
            "patients.tsv",
            "--calls",
            "calls.tsv",
        ]);
        assert!(result.is_err());
    }
}
