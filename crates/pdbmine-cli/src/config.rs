mod defaults;
mod models;

pub use defaults::ReportDefaults;
pub use models::{ReportAppConfig, ReportInput};

use crate::cli::ReportArgs;
use crate::error::{CliError, Result};
use pdbmine::session::{Master, SessionConfig};
use pdbmine::workflows::custom_report::CustomReportRequest;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialSessionConfig {
    master: Option<String>,
    #[serde(rename = "app-name")]
    app_name: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialReportSection {
    columns: Option<Vec<String>>,
    filter: Option<String>,
    #[serde(rename = "view-name")]
    view_name: Option<String>,
    #[serde(rename = "preview-rows")]
    preview_rows: Option<usize>,
    #[serde(rename = "verify-equivalence")]
    verify_equivalence: Option<bool>,
    #[serde(rename = "service-url")]
    service_url: Option<String>,
    #[serde(rename = "input-csv")]
    input_csv: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialReportConfig {
    session: Option<PartialSessionConfig>,
    report: Option<PartialReportSection>,
}

impl PartialReportConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Loads the file named by `--config`, or starts from an empty configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Resolves every setting with the precedence flag > `--set` > file > default.
    pub fn merge_with_cli(mut self, args: &ReportArgs) -> Result<ReportAppConfig> {
        self.apply_set_values(&args.set_values)?;

        let defaults = ReportDefaults::default();
        let session_config = self.session.take().unwrap_or_default();
        let report_config = self.report.take().unwrap_or_default();

        let master_text = args
            .master
            .clone()
            .or(session_config.master)
            .unwrap_or(defaults.master);
        let master = Master::from_str(&master_text).map_err(|e| CliError::Config(e.to_string()))?;
        let app_name = args
            .app_name
            .clone()
            .or(session_config.app_name)
            .unwrap_or(defaults.app_name);

        let columns: Vec<String> = args
            .columns
            .clone()
            .or(report_config.columns)
            .unwrap_or(defaults.columns)
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        if columns.is_empty() {
            return Err(CliError::Config(
                "At least one report column must be requested.".to_string(),
            ));
        }

        let condition = args
            .filter
            .clone()
            .or(report_config.filter)
            .unwrap_or(defaults.condition);
        let mut request = CustomReportRequest::from_condition_text(columns, &condition)
            .map_err(|e| CliError::Argument(format!("Invalid filter '{}': {}", condition, e)))?;
        request.view_name = report_config.view_name.unwrap_or(defaults.view_name);
        request.preview_rows = args
            .limit
            .or(report_config.preview_rows)
            .unwrap_or(defaults.preview_rows);
        request.verify_equivalence = report_config
            .verify_equivalence
            .unwrap_or(defaults.verify_equivalence);

        let input = match args.input_csv.clone().or(report_config.input_csv) {
            Some(path) => ReportInput::CsvFile(path),
            None => ReportInput::Service {
                url: args
                    .service_url
                    .clone()
                    .or(report_config.service_url)
                    .unwrap_or(defaults.service_url),
            },
        };

        Ok(ReportAppConfig {
            session: SessionConfig::new(master, app_name),
            request,
            input,
        })
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value_str) = kv_pair.split_once('=').ok_or_else(|| {
                CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                ))
            })?;

            match key {
                "session.master" => {
                    self.session.get_or_insert_with(Default::default).master =
                        Some(value_str.to_string());
                }
                "session.app-name" => {
                    self.session.get_or_insert_with(Default::default).app_name =
                        Some(value_str.to_string());
                }
                "report.columns" => {
                    self.report.get_or_insert_with(Default::default).columns =
                        Some(value_str.split(',').map(|c| c.trim().to_string()).collect());
                }
                "report.filter" => {
                    self.report.get_or_insert_with(Default::default).filter =
                        Some(value_str.to_string());
                }
                "report.view-name" => {
                    self.report.get_or_insert_with(Default::default).view_name =
                        Some(value_str.to_string());
                }
                "report.preview-rows" => {
                    self.report.get_or_insert_with(Default::default).preview_rows =
                        Some(value_str.parse().map_err(|_| {
                            CliError::Config(format!(
                                "Invalid integer value for {}: {}",
                                key, value_str
                            ))
                        })?);
                }
                "report.verify-equivalence" => {
                    self.report
                        .get_or_insert_with(Default::default)
                        .verify_equivalence = Some(value_str.parse().map_err(|_| {
                        CliError::Config(format!(
                            "Invalid boolean value for {}: {}",
                            key, value_str
                        ))
                    })?);
                }
                "report.service-url" => {
                    self.report.get_or_insert_with(Default::default).service_url =
                        Some(value_str.to_string());
                }
                "report.input-csv" => {
                    self.report.get_or_insert_with(Default::default).input_csv =
                        Some(PathBuf::from(value_str));
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use once_cell::sync::Lazy;
    use pdbmine::query::col;
    use std::fs;
    use tempfile::{TempDir, tempdir};

    static TEST_DIR: Lazy<TempDir> = Lazy::new(|| tempdir().expect("Failed to create temp dir"));

    fn write_config_file(name: &str, content: &str) -> PathBuf {
        let file_path = TEST_DIR.path().join(name);
        fs::write(&file_path, content).unwrap();
        file_path
    }

    fn report_args(extra: &[&str]) -> ReportArgs {
        let mut argv = vec!["pdbmine", "report"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Report(args) => args,
            other => panic!("Expected 'report' subcommand, got {other:?}"),
        }
    }

    #[test]
    fn defaults_reproduce_the_kinase_report() {
        let config = PartialReportConfig::default()
            .merge_with_cli(&report_args(&[]))
            .unwrap();

        assert_eq!(config.session.master, Master::LocalAllCores);
        assert_eq!(config.session.app_name, "CustomReportDemo");
        assert_eq!(config.request, CustomReportRequest::kinases());
        assert_eq!(
            config.input,
            ReportInput::Service {
                url: ReportDefaults::default().service_url
            }
        );
    }

    #[test]
    fn resolved_config_can_be_logged() {
        let config = PartialReportConfig::default()
            .merge_with_cli(&report_args(&["--input-csv", "report.csv"]))
            .unwrap();
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("CustomReportDemo"));
        assert!(rendered.contains("report.csv"));
    }

    #[test]
    fn defaults_follow_the_workflow_constants() {
        use pdbmine::workflows::custom_report::{
            DEFAULT_COLUMNS, DEFAULT_CONDITION, DEFAULT_PREVIEW_ROWS, DEFAULT_VIEW_NAME,
        };

        let defaults = ReportDefaults::default();
        assert_eq!(defaults.columns, DEFAULT_COLUMNS);
        assert_eq!(defaults.condition, DEFAULT_CONDITION);
        assert_eq!(defaults.view_name, DEFAULT_VIEW_NAME);
        assert_eq!(defaults.preview_rows, DEFAULT_PREVIEW_ROWS);
    }

    #[test]
    fn file_values_override_defaults() {
        let path = write_config_file(
            "file_values.toml",
            r#"
        [session]
        master = "local[2]"
        app-name = "Binding affinities"

        [report]
        columns = ["Ki", "ecNo"]
        filter = "Ki IS NOT NULL"
        preview-rows = 3
        verify-equivalence = false
        "#,
        );

        let config = PartialReportConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&report_args(&[]))
            .unwrap();

        assert_eq!(config.session.master, Master::LocalThreads(2));
        assert_eq!(config.session.app_name, "Binding affinities");
        assert_eq!(config.request.columns, vec!["Ki", "ecNo"]);
        assert_eq!(config.request.condition, col("Ki").is_not_null());
        assert_eq!(config.request.preview_rows, 3);
        assert!(!config.request.verify_equivalence);
    }

    #[test]
    fn cli_args_override_file_values() {
        let path = write_config_file(
            "cli_override.toml",
            r#"
        [session]
        master = "local[2]" # Will be overridden

        [report]
        preview-rows = 3 # Will be overridden
        "#,
        );

        let args = report_args(&[
            "--master",
            "local",
            "-n",
            "25",
            "--input-csv",
            "report.csv",
        ]);
        let config = PartialReportConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap();

        assert_eq!(config.session.master, Master::Local);
        assert_eq!(config.request.preview_rows, 25);
        assert_eq!(config.input, ReportInput::CsvFile(PathBuf::from("report.csv")));
    }

    #[test]
    fn set_values_override_file_but_not_flags() {
        let args = report_args(&[
            "--master",
            "local[8]",
            "-S",
            "session.master=local[4]",
            "-S",
            "report.columns=Kd, hetId",
            "-S",
            "report.service-url=http://localhost:8080/report",
        ]);
        let config = PartialReportConfig::default().merge_with_cli(&args).unwrap();

        assert_eq!(config.session.master, Master::LocalThreads(8));
        assert_eq!(config.request.columns, vec!["Kd", "hetId"]);
        assert_eq!(
            config.input,
            ReportInput::Service {
                url: "http://localhost:8080/report".to_string()
            }
        );
    }

    #[test]
    fn unsupported_master_is_a_config_error() {
        let result = PartialReportConfig::default().merge_with_cli(&report_args(&["-m", "yarn"]));
        assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("yarn")));
    }

    #[test]
    fn invalid_filter_is_an_argument_error() {
        let result = PartialReportConfig::default()
            .merge_with_cli(&report_args(&["--filter", "Ki IS NOT"]));
        assert!(matches!(result, Err(CliError::Argument(_))));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let path = write_config_file("unknown_key.toml", "[report]\nrows = 3\n");
        assert!(matches!(
            PartialReportConfig::from_file(&path),
            Err(CliError::FileParsing { .. })
        ));

        let result = PartialReportConfig::default()
            .merge_with_cli(&report_args(&["-S", "report.rows=3"]));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn malformed_set_value_is_rejected() {
        let result =
            PartialReportConfig::default().merge_with_cli(&report_args(&["-S", "report.filter"]));
        assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("KEY=VALUE")));
    }
}
