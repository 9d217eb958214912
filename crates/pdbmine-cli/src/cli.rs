use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu, William A. Goddard III, Victor Wai Tak Kam",
    version,
    about = "pdbmine CLI - Query PDB annotation reports and filter macromolecular structures.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Retrieve a PDB custom report and filter it with an expression and with SQL.
    Report(ReportArgs),
    /// List structure files that contain alternate atom locations.
    Altloc(AltlocArgs),
}

/// Arguments for the `report` subcommand.
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Report columns to retrieve, separated by commas (e.g., 'Ki,Kd,hetId,ecNo').
    #[arg(long, value_name = "COLUMNS", value_delimiter = ',')]
    pub columns: Option<Vec<String>>,

    /// Filter condition applied to the report
    /// (e.g., "(Ki IS NOT NULL OR Kd IS NOT NULL) AND ecNo LIKE '2.7.11.%'").
    #[arg(short, long, value_name = "CONDITION")]
    pub filter: Option<String>,

    /// Maximum number of rows shown in each preview.
    #[arg(short = 'n', long, value_name = "INT")]
    pub limit: Option<usize>,

    /// Execution master: 'local', 'local[N]' or 'local[*]'.
    #[arg(short, long, value_name = "MASTER")]
    pub master: Option<String>,

    /// Application name used for the session and its worker threads.
    #[arg(long, value_name = "NAME")]
    pub app_name: Option<String>,

    /// Read the report from a local CSV file instead of the report service.
    #[arg(short, long, value_name = "PATH")]
    pub input_csv: Option<PathBuf>,

    /// Override the URL of the custom report service.
    #[arg(long, value_name = "URL")]
    pub service_url: Option<String>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S report.preview-rows=20
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `altloc` subcommand.
#[derive(Args, Debug)]
pub struct AltlocArgs {
    /// PDB files to inspect.
    #[arg(required = true, value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// List the files without alternate locations instead.
    #[arg(long)]
    pub invert: bool,

    /// Also keep structures containing a group with this name (e.g., 'HEM').
    /// Can be used multiple times.
    #[arg(short, long = "group", value_name = "NAME")]
    pub groups: Vec<String>,

    /// Execution master: 'local', 'local[N]' or 'local[*]'.
    #[arg(short, long, value_name = "MASTER", default_value = "local[*]")]
    pub master: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_arguments_are_parsed() {
        let cli = Cli::parse_from([
            "pdbmine",
            "-vv",
            "report",
            "--columns",
            "Ki,Kd,ecNo",
            "--filter",
            "Ki IS NOT NULL",
            "-n",
            "5",
            "-S",
            "session.master=local[2]",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Report(args) => {
                assert_eq!(
                    args.columns,
                    Some(vec!["Ki".to_string(), "Kd".to_string(), "ecNo".to_string()])
                );
                assert_eq!(args.filter.as_deref(), Some("Ki IS NOT NULL"));
                assert_eq!(args.limit, Some(5));
                assert_eq!(args.set_values, vec!["session.master=local[2]"]);
            }
            other => panic!("Expected 'report' subcommand, got {other:?}"),
        }
    }

    #[test]
    fn altloc_requires_files() {
        assert!(Cli::try_parse_from(["pdbmine", "altloc"]).is_err());

        let cli = Cli::parse_from(["pdbmine", "altloc", "a.pdb", "b.pdb", "--invert", "-g", "HEM"]);
        match cli.command {
            Commands::Altloc(args) => {
                assert_eq!(args.files.len(), 2);
                assert!(args.invert);
                assert_eq!(args.groups, vec!["HEM"]);
                assert_eq!(args.master, "local[*]");
            }
            other => panic!("Expected 'altloc' subcommand, got {other:?}"),
        }
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["pdbmine", "-q", "-v", "altloc", "a.pdb"]).is_err());
    }
}
