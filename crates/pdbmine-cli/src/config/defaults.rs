use pdbmine::workflows::custom_report::{
    DEFAULT_COLUMNS, DEFAULT_CONDITION, DEFAULT_PREVIEW_ROWS, DEFAULT_VIEW_NAME,
};

pub struct ReportDefaults {
    pub master: String,
    pub app_name: String,
    pub columns: Vec<String>,
    pub condition: String,
    pub view_name: String,
    pub preview_rows: usize,
    pub verify_equivalence: bool,
    pub service_url: String,
}

impl Default for ReportDefaults {
    fn default() -> Self {
        Self {
            master: "local[*]".to_string(),
            app_name: "CustomReportDemo".to_string(),
            columns: DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect(),
            condition: DEFAULT_CONDITION.to_string(),
            view_name: DEFAULT_VIEW_NAME.to_string(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
            verify_equivalence: true,
            service_url: "https://www.rcsb.org/pdb/rest/customReport".to_string(),
        }
    }
}
