use super::error::DatasetError;
use super::schema::Schema;
use super::value::Value;

/// One row of an annotation table, aligned with the table schema.
pub type Row = Vec<Value>;

const SHOW_CELL_WIDTH: usize = 20;
const SHOW_MIN_COLUMN_WIDTH: usize = 3;

/// An in-memory table of annotations with a discoverable schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationTable {
    schema: Schema,
    rows: Vec<Row>,
}

impl AnnotationTable {
    /// Creates a table, checking that every row matches the schema width.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::RowArity`] for the first row with the wrong number of values.
    pub fn new(schema: Schema, rows: Vec<Row>) -> Result<Self, DatasetError> {
        if let Some((row, values)) = rows
            .iter()
            .enumerate()
            .find(|(_, values)| values.len() != schema.len())
        {
            return Err(DatasetError::RowArity {
                row,
                expected: schema.len(),
                found: values.len(),
            });
        }
        Ok(Self { schema, rows })
    }

    pub(crate) fn from_parts_unchecked(schema: Schema, rows: Vec<Row>) -> Self {
        Self { schema, rows }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column in row order.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value>> {
        let index = self.schema.index_of(name)?;
        Some(self.rows.iter().map(move |row| &row[index]))
    }

    /// Returns a table holding only the named columns, in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::MissingColumn`] when a name is not in the schema.
    pub fn select<S: AsRef<str>>(&self, columns: &[S]) -> Result<Self, DatasetError> {
        let indices = columns
            .iter()
            .map(|name| {
                self.schema
                    .index_of(name.as_ref())
                    .ok_or_else(|| DatasetError::MissingColumn {
                        name: name.as_ref().to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let fields = indices
            .iter()
            .map(|&i| self.schema.fields()[i].clone())
            .collect();
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Ok(Self::from_parts_unchecked(Schema::new(fields), rows))
    }

    /// Keeps at most the first `n` rows.
    pub fn limit(&self, n: usize) -> Self {
        Self::from_parts_unchecked(
            self.schema.clone(),
            self.rows.iter().take(n).cloned().collect(),
        )
    }

    pub fn print_schema(&self) -> String {
        self.schema.tree_string()
    }

    /// Renders up to `n` rows as a bordered text table.
    ///
    /// Cells are right aligned. Cells longer than 20 characters are cut to 17
    /// characters followed by `...`. When rows were left out a footer line
    /// says how many are shown.
    pub fn show(&self, n: usize) -> String {
        let header: Vec<String> = self.schema.names().map(truncate_cell).collect();
        let body: Vec<Vec<String>> = self
            .rows
            .iter()
            .take(n)
            .map(|row| row.iter().map(|v| truncate_cell(&v.to_string())).collect())
            .collect();

        let widths: Vec<usize> = (0..header.len())
            .map(|i| {
                body.iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(header[i].chars().count()))
                    .max()
                    .unwrap_or(0)
                    .max(SHOW_MIN_COLUMN_WIDTH)
            })
            .collect();

        let separator = widths.iter().fold(String::from("+"), |mut line, &w| {
            line.push_str(&"-".repeat(w));
            line.push('+');
            line
        });
        let render_row = |cells: &[String]| {
            cells
                .iter()
                .zip(&widths)
                .fold(String::from("|"), |mut line, (cell, &w)| {
                    line.push_str(&format!("{:>width$}|", cell, width = w));
                    line
                })
        };

        let mut out = String::new();
        out.push_str(&separator);
        out.push('\n');
        out.push_str(&render_row(&header));
        out.push('\n');
        out.push_str(&separator);
        out.push('\n');
        for row in &body {
            out.push_str(&render_row(row));
            out.push('\n');
        }
        out.push_str(&separator);
        out.push('\n');
        if self.rows.len() > n {
            out.push_str(&format!(
                "only showing top {} {}\n",
                n,
                if n == 1 { "row" } else { "rows" }
            ));
        }
        out
    }
}

fn truncate_cell(text: &str) -> String {
    if text.chars().count() > SHOW_CELL_WIDTH {
        let head: String = text.chars().take(SHOW_CELL_WIDTH - 3).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
