use crate::dataset::{AnnotationSource, AnnotationTable, DatasetError};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::query::{Expr, QueryError, col, parse_predicate};
use crate::session::{Session, SessionConfig, SessionError};
use thiserror::Error;
use tracing::{info, instrument, warn};

pub const DEFAULT_COLUMNS: [&str; 4] = ["Ki", "Kd", "hetId", "ecNo"];
pub const DEFAULT_CONDITION: &str = "(Ki IS NOT NULL OR Kd IS NOT NULL) AND ecNo LIKE '2.7.11.%'";
pub const DEFAULT_VIEW_NAME: &str = "table";
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Failed to retrieve annotations: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Invalid filter condition: {0}")]
    Query(#[from] QueryError),

    #[error(
        "Expression filter and SQL filter disagree ({expression_rows} vs {sql_rows} rows)"
    )]
    Divergence {
        expression_rows: usize,
        sql_rows: usize,
    },
}

/// What to retrieve and how to filter it.
///
/// The same condition is applied twice: once as an expression tree
/// (`condition`) and once as the `WHERE` clause of a SQL statement over a
/// temporary view (`condition_text`).
#[derive(Debug, Clone, PartialEq)]
pub struct CustomReportRequest {
    pub columns: Vec<String>,
    pub condition: Expr,
    pub condition_text: String,
    pub view_name: String,
    pub preview_rows: usize,
    /// Fail with [`WorkflowError::Divergence`] when the two filters disagree.
    pub verify_equivalence: bool,
}

impl CustomReportRequest {
    /// Kinase entries with a binding constant: the builder form of [`DEFAULT_CONDITION`].
    pub fn kinases() -> Self {
        Self {
            columns: DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect(),
            condition: col("Ki")
                .is_not_null()
                .or(col("Kd").is_not_null())
                .and(col("ecNo").like("2.7.11.%")),
            condition_text: DEFAULT_CONDITION.to_string(),
            view_name: DEFAULT_VIEW_NAME.to_string(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
            verify_equivalence: true,
        }
    }

    /// Builds a request whose expression is parsed from `condition_text`.
    pub fn from_condition_text(columns: Vec<String>, condition_text: &str) -> Result<Self, QueryError> {
        Ok(Self {
            columns,
            condition: parse_predicate(condition_text)?,
            condition_text: condition_text.to_string(),
            view_name: DEFAULT_VIEW_NAME.to_string(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
            verify_equivalence: true,
        })
    }

    pub fn sql_statement(&self) -> String {
        format!(
            "SELECT * FROM `{}` WHERE {}",
            self.view_name, self.condition_text
        )
    }
}

impl Default for CustomReportRequest {
    fn default() -> Self {
        Self::kinases()
    }
}

#[derive(Debug, Clone)]
pub struct CustomReportResult {
    pub total_rows: usize,
    /// Schema of the retrieved report, rendered as a tree.
    pub schema: String,
    pub expression_result: AnnotationTable,
    pub sql_result: AnnotationTable,
    pub expression_preview: String,
    pub sql_preview: String,
    pub equivalent: bool,
}

/// Retrieves a custom report and filters it through both query paths.
///
/// The session is started from `config` and released before returning, also
/// when a step fails.
#[instrument(skip_all, name = "custom_report_workflow")]
pub fn run<S: AnnotationSource + ?Sized>(
    config: &SessionConfig,
    source: &S,
    request: &CustomReportRequest,
    reporter: &ProgressReporter,
) -> Result<CustomReportResult, WorkflowError> {
    info!(
        "Starting custom report workflow for columns [{}].",
        request.columns.join(", ")
    );

    Session::scoped(config.clone(), |session| {
        let report = reporter.phase("Fetching report", || source.fetch(&request.columns))?;
        reporter.report(Progress::TableReady {
            rows: report.len(),
            columns: report.schema().len(),
        });
        let schema = report.print_schema();
        info!(
            "Retrieved {} rows with {} columns.",
            report.len(),
            report.schema().len()
        );

        let expression_result = reporter.phase("Filtering with expression", || {
            session.filter(&report, &request.condition)
        })?;

        let total_rows = report.len();
        session.create_or_replace_temp_view(&request.view_name, report);
        let statement = request.sql_statement();
        let sql_result = reporter.phase("Filtering with SQL", || session.sql(&statement))?;
        session.drop_temp_view(&request.view_name);

        let equivalent = expression_result == sql_result;
        if !equivalent {
            warn!(
                "Filters disagree: expression kept {} rows, SQL kept {}.",
                expression_result.len(),
                sql_result.len()
            );
            if request.verify_equivalence {
                return Err(WorkflowError::Divergence {
                    expression_rows: expression_result.len(),
                    sql_rows: sql_result.len(),
                });
            }
        }

        info!(
            "Workflow complete. {} of {} rows passed the filter.",
            expression_result.len(),
            total_rows
        );
        Ok(CustomReportResult {
            total_rows,
            schema,
            expression_preview: expression_result.show(request.preview_rows),
            sql_preview: sql_result.show(request.preview_rows),
            expression_result,
            sql_result,
            equivalent,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::CsvReportSource;
    use crate::session::Master;
    use std::sync::Mutex;

    const REPORT: &str = "\
structureId,chainId,Ki,Kd,hetId,ecNo
1ATP,E,,0.02,ATP,2.7.11.11
1HCL,A,34,,,2.7.11.22
2SRC,A,,,ANP,2.7.10.2
3ERT,A,0.5,,OHT,
4HHB,A,,,HEM,
1FIN,A,,,ATP,2.7.11.22
2PHK,A,,120,ATP,2.7.11.19
";

    fn config() -> SessionConfig {
        SessionConfig::new(Master::LocalThreads(2), "Custom Report")
    }

    fn ids(table: &AnnotationTable) -> Vec<String> {
        table
            .column("structureChainId")
            .unwrap()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn expression_and_sql_paths_return_the_same_rows() {
        let source = CsvReportSource::new(REPORT);
        let result = run(
            &config(),
            &source,
            &CustomReportRequest::kinases(),
            &ProgressReporter::new(),
        )
        .unwrap();

        assert!(result.equivalent);
        assert_eq!(result.total_rows, 7);
        assert_eq!(ids(&result.expression_result), vec!["1ATP.E", "1HCL.A", "2PHK.A"]);
        assert_eq!(result.expression_result, result.sql_result);
        assert_eq!(result.expression_preview, result.sql_preview);
        assert!(result.schema.starts_with("root\n |-- structureChainId: string"));
        assert!(result.schema.contains(" |-- Ki: double (nullable = true)"));
    }

    #[test]
    fn parsed_request_matches_builder_request() {
        let parsed = CustomReportRequest::from_condition_text(
            DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect(),
            DEFAULT_CONDITION,
        )
        .unwrap();
        assert_eq!(parsed, CustomReportRequest::kinases());
    }

    #[test]
    fn preview_is_bounded() {
        let mut request = CustomReportRequest::kinases();
        request.preview_rows = 1;
        let result = run(
            &config(),
            &CsvReportSource::new(REPORT),
            &request,
            &ProgressReporter::new(),
        )
        .unwrap();
        assert!(result.sql_preview.ends_with("only showing top 1 row\n"));
        assert_eq!(result.sql_result.len(), 3);
    }

    #[test]
    fn disagreeing_filters_are_reported() {
        let mut request = CustomReportRequest::kinases();
        request.condition_text = "Ki IS NOT NULL".to_string();

        let err = run(
            &config(),
            &CsvReportSource::new(REPORT),
            &request,
            &ProgressReporter::new(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::Divergence {
                expression_rows: 3,
                sql_rows: 2
            }
        ));

        request.verify_equivalence = false;
        let result = run(
            &config(),
            &CsvReportSource::new(REPORT),
            &request,
            &ProgressReporter::new(),
        )
        .unwrap();
        assert!(!result.equivalent);
    }

    #[test]
    fn missing_column_fails_the_workflow() {
        let mut request = CustomReportRequest::kinases();
        request.columns.push("IC50".to_string());
        let err = run(
            &config(),
            &CsvReportSource::new(REPORT),
            &request,
            &ProgressReporter::new(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::Dataset(DatasetError::MissingColumn { .. })
        ));
    }

    #[test]
    fn reports_phases_in_order() {
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|e| events.lock().unwrap().push(e)));
        run(
            &config(),
            &CsvReportSource::new(REPORT),
            &CustomReportRequest::kinases(),
            &reporter,
        )
        .unwrap();
        drop(reporter);

        let events = events.into_inner().unwrap();
        let phases: Vec<&str> = events
            .iter()
            .filter_map(|e| match e {
                Progress::PhaseStart { name } => Some(*name),
                _ => None,
            })
            .collect();
        assert_eq!(
            phases,
            vec!["Fetching report", "Filtering with expression", "Filtering with SQL"]
        );
        assert!(events.contains(&Progress::TableReady {
            rows: 7,
            columns: 7
        }));
    }
}
