use pdbmine::session::SessionConfig;
use pdbmine::workflows::custom_report::CustomReportRequest;
use std::path::PathBuf;

/// Where the report rows come from.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportInput {
    Service { url: String },
    CsvFile(PathBuf),
}

#[derive(Debug, Clone)]
pub struct ReportAppConfig {
    pub session: SessionConfig,
    pub request: CustomReportRequest,
    pub input: ReportInput,
}
