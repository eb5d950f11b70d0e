//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use registrar_core::models::School;
use registrar_core::{Collection, RecordKind};

#[derive(Parser, Debug)]
#[command(name = "registrar", author, version, about = "Check, normalize and store OFS registrar records")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// List every record kind name
    Kinds,

    /// Decode and validate a JSON file ("-" reads stdin)
    #[command(alias = "v")]
    Validate {
        /// Record kind, e.g. Section or onCreateSectionTask
        #[arg(short, long)]
        kind: RecordKind,
        file: PathBuf,
        /// The file holds an array of records
        #[arg(long)]
        many: bool,
    },

    /// Print the normalized JSON of a record
    #[command(alias = "n")]
    Normalize {
        #[arg(short, long)]
        kind: RecordKind,
        file: PathBuf,
        #[arg(long)]
        many: bool,
    },

    /// Validate an array of records and save it as a snapshot
    Import {
        /// Collection name, e.g. students or attendance:2024-09-04
        collection: Collection,
        file: PathBuf,
    },

    /// Show stored collections and their age
    Status,

    /// Show or update the configuration
    Config {
        /// Default campus (OFS-US or OFS-MS)
        #[arg(long)]
        school: Option<School>,
        /// Default academic year, e.g. 2024-2025
        #[arg(long)]
        year: Option<String>,
        /// Store directory
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, clap::Error> {
        Args::try_parse_from(std::iter::once("registrar").chain(args.iter().copied())).map(|a| a.command)
    }

    #[test]
    fn test_validate_args() {
        let command = parse(&["validate", "--kind", "Section", "section.json"]).unwrap();
        assert_eq!(
            command,
            Command::Validate {
                kind: RecordKind::Section,
                file: PathBuf::from("section.json"),
                many: false,
            }
        );

        let command = parse(&["v", "-k", "onCreateSectionTask", "--many", "-"]).unwrap();
        assert!(matches!(
            command,
            Command::Validate { kind: RecordKind::OnCreateSectionTask, many: true, .. }
        ));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!(parse(&["validate", "--kind", "section", "x.json"]).is_err());
        assert!(parse(&["normalize", "x.json"]).is_err());
    }

    #[test]
    fn test_import_args() {
        let command = parse(&["import", "attendance:2024-09-04", "day.json"]).unwrap();
        match command {
            Command::Import { collection, file } => {
                assert_eq!(collection.to_string(), "attendance:2024-09-04");
                assert_eq!(file, PathBuf::from("day.json"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(parse(&["import", "grades", "x.json"]).is_err());
    }

    #[test]
    fn test_config_args() {
        let command = parse(&["config", "--school", "OFS-MS", "--year", "2024-2025"]).unwrap();
        assert_eq!(
            command,
            Command::Config {
                school: Some(School::MiddleSchool),
                year: Some("2024-2025".to_string()),
                data_dir: None,
            }
        );
        assert!(parse(&["config", "--school", "OFS-HS"]).is_err());
    }
}
