use crate::cli::ReportArgs;
use crate::config::{PartialReportConfig, ReportAppConfig, ReportInput};
use crate::error::{CliError, Result};
use crate::service::{DownloadProgress, ReportService};
use crate::utils::progress::CliProgressHandler;
use indicatif::{ProgressBar, ProgressStyle};
use pdbmine::dataset::CsvReportSource;
use pdbmine::engine::progress::ProgressReporter;
use pdbmine::workflows::custom_report::{self, CustomReportResult};
use tracing::{debug, info};

pub async fn run(args: ReportArgs) -> Result<()> {
    info!("Loading configuration for report...");
    let app_config = PartialReportConfig::load(args.config.as_deref())?.merge_with_cli(&args)?;
    debug!("Resolved report configuration: {:?}", app_config);

    let source = load_source(&app_config).await?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let result = tokio::task::block_in_place(|| {
        custom_report::run(&app_config.session, &source, &app_config.request, &reporter)
    })?;

    print_result(&app_config, &result);
    Ok(())
}

async fn load_source(app_config: &ReportAppConfig) -> Result<CsvReportSource> {
    match &app_config.input {
        ReportInput::CsvFile(path) => {
            info!("Reading custom report from {:?}", path);
            CsvReportSource::from_path(path).map_err(|e| CliError::FileParsing {
                path: path.clone(),
                source: e.into(),
            })
        }
        ReportInput::Service { url } => {
            let text = download_report(url, &app_config.request.columns).await?;
            Ok(CsvReportSource::new(text))
        }
    }
}

async fn download_report(url: &str, columns: &[String]) -> Result<String> {
    let service = ReportService::new(url);

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
        )
        .map_err(|e| CliError::Other(e.into()))?
        .progress_chars("#>-"),
    );
    pb.set_draw_target(indicatif::ProgressDrawTarget::stderr_with_hz(2));

    println!("Requesting custom report from: {}", service.url());

    let progress_callback = |progress: DownloadProgress| match progress {
        DownloadProgress::Started { total_size } => {
            if let Some(size) = total_size {
                pb.set_length(size);
            }
            pb.set_message("Downloading...");
        }
        DownloadProgress::Downloading { downloaded } => {
            pb.set_position(downloaded);
        }
        DownloadProgress::Finished => {}
    };

    match service.fetch_report(columns, progress_callback).await {
        Ok(text) => {
            pb.finish_with_message("✓ Report downloaded.");
            Ok(text)
        }
        Err(e) => {
            pb.finish_with_message("✗ Download failed.");
            Err(e)
        }
    }
}

fn print_result(app_config: &ReportAppConfig, result: &CustomReportResult) {
    let request = &app_config.request;

    println!("\nSchema of the custom report:");
    println!("{}", result.schema);

    println!("Filtered with expression: {}", request.condition);
    println!("{}", result.expression_preview);

    println!("Filtered with SQL: {}", request.sql_statement());
    println!("{}", result.sql_preview);

    println!(
        "Kept {} of {} rows (expression: {}, SQL: {}).",
        result.expression_result.len(),
        result.total_rows,
        result.expression_result.len(),
        result.sql_result.len()
    );
    if result.equivalent {
        println!("Both query paths returned the same rows.");
    } else {
        println!("⚠ The expression and SQL results differ.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;

    const REPORT: &str = "\
structureId,chainId,Ki,Kd,hetId,ecNo
1ATP,E,0.3,,ATP,2.7.11.11
1HCL,A,,12.0,STU,2.7.11.22
3PGK,A,2.0,,ADP,2.7.2.3
";

    fn report_args(extra: &[&str]) -> ReportArgs {
        let mut argv = vec!["pdbmine", "report"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Report(args) => args,
            other => panic!("Expected 'report' subcommand, got {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn runs_the_workflow_on_a_local_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        fs::write(&path, REPORT).unwrap();

        let path_text = path.to_string_lossy().to_string();
        let args = report_args(&["--input-csv", &path_text, "--master", "local[2]"]);
        run(args).await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn missing_csv_is_a_file_parsing_error() {
        let args = report_args(&["--input-csv", "/nonexistent/report.csv"]);
        let result = run(args).await;
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }
}
