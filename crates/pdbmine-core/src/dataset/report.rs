use super::AnnotationSource;
use super::error::DatasetError;
use super::fields::known_field_type;
use super::schema::{Field, Schema};
use super::table::{AnnotationTable, Row};
use super::value::{DataType, Value};
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

pub const STRUCTURE_ID: &str = "structureId";
pub const CHAIN_ID: &str = "chainId";
pub const STRUCTURE_CHAIN_ID: &str = "structureChainId";

/// Builds the request body asking the report service for `columns` of every entry.
pub fn custom_report_query<S: AsRef<str>>(columns: &[S]) -> String {
    let joined = columns
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(",");
    format!(
        "pdbids=*&service=wsfile&format=csv&primaryOnly=1&customReportColumns={}",
        joined
    )
}

/// Parses a CSV custom report into an annotation table.
///
/// The identifier columns (`structureId`, `chainId`) are kept in front of the
/// requested `columns`; an empty `columns` slice keeps every column of the
/// report. When both identifiers are present a `structureChainId` column
/// (`"1ABC.A"`) is prepended. Empty cells become nulls.
///
/// # Errors
///
/// Returns [`DatasetError::MissingColumn`] when a requested column is not in
/// the report, [`DatasetError::EmptyReport`] when there is no header row, and
/// [`DatasetError::Csv`] for malformed CSV.
pub fn parse_report<R: Read, S: AsRef<str>>(
    reader: R,
    columns: &[S],
) -> Result<AnnotationTable, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if headers.is_empty() {
        return Err(DatasetError::EmptyReport);
    }
    let records = csv_reader
        .records()
        .collect::<Result<Vec<csv::StringRecord>, _>>()?;
    debug!(
        "Read custom report with {} columns and {} rows.",
        headers.len(),
        records.len()
    );

    let selected = select_report_columns(&headers, columns)?;

    let fields: Vec<Field> = selected
        .iter()
        .map(|&i| {
            let name = &headers[i];
            let data_type =
                infer_column_type(name, records.iter().map(|r| r.get(i).unwrap_or("")));
            Field::new(name, data_type)
        })
        .collect();

    let mut rows: Vec<Row> = records
        .iter()
        .map(|record| {
            selected
                .iter()
                .zip(&fields)
                .map(|(&i, field)| {
                    Value::parse_as(record.get(i).unwrap_or(""), field.data_type)
                        .unwrap_or(Value::Null)
                })
                .collect()
        })
        .collect();

    let mut schema_fields = fields;
    let structure_pos = schema_fields.iter().position(|f| f.name == STRUCTURE_ID);
    let chain_pos = schema_fields.iter().position(|f| f.name == CHAIN_ID);
    if let (Some(s), Some(c)) = (structure_pos, chain_pos) {
        for row in &mut rows {
            let combined = match (&row[s], &row[c]) {
                (Value::Null, _) | (_, Value::Null) => Value::Null,
                (structure, chain) => Value::String(format!("{}.{}", structure, chain)),
            };
            row.insert(0, combined);
        }
        schema_fields.insert(0, Field::new(STRUCTURE_CHAIN_ID, DataType::String));
    }

    AnnotationTable::new(Schema::new(schema_fields), rows)
}

fn select_report_columns<S: AsRef<str>>(
    headers: &csv::StringRecord,
    columns: &[S],
) -> Result<Vec<usize>, DatasetError> {
    let position = |name: &str| headers.iter().position(|h| h == name);

    if columns.is_empty() {
        return Ok((0..headers.len()).collect());
    }

    let mut selected: Vec<usize> = [STRUCTURE_ID, CHAIN_ID]
        .into_iter()
        .filter_map(position)
        .collect();
    for name in columns {
        let name = name.as_ref();
        let index = position(name).ok_or_else(|| DatasetError::MissingColumn {
            name: name.to_string(),
        })?;
        if !selected.contains(&index) {
            selected.push(index);
        }
    }
    Ok(selected)
}

fn infer_column_type<'a, I>(name: &str, cells: I) -> DataType
where
    I: Iterator<Item = &'a str> + Clone,
{
    let fits = |data_type: DataType| {
        cells
            .clone()
            .all(|cell| Value::parse_as(cell, data_type).is_some())
    };

    if let Some(declared) = known_field_type(name) {
        if fits(declared) {
            return declared;
        }
        warn!(
            "Column '{}' does not hold {} values throughout; inferring its type instead.",
            name, declared
        );
    }

    if cells.clone().all(str::is_empty) {
        DataType::String
    } else if fits(DataType::Integer) {
        DataType::Integer
    } else if fits(DataType::Double) {
        DataType::Double
    } else {
        DataType::String
    }
}

/// An [`AnnotationSource`] over an already retrieved CSV report.
#[derive(Debug, Clone)]
pub struct CsvReportSource {
    text: String,
}

impl CsvReportSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        Ok(Self::new(std::fs::read_to_string(path)?))
    }
}

impl AnnotationSource for CsvReportSource {
    fn fetch(&self, columns: &[String]) -> Result<AnnotationTable, DatasetError> {
        parse_report(self.text.as_bytes(), columns)
    }
}
