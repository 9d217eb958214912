use super::value::DataType;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
}

impl Field {
    pub fn new(name: &str, data_type: DataType) -> Self {
        Self {
            name: name.to_string(),
            data_type,
            nullable: true,
        }
    }
}

/// Ordered list of named, typed columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Position of the column called `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    /// Renders the schema as an indented tree.
    ///
    /// ```text
    /// root
    ///  |-- structureId: string (nullable = true)
    ///  |-- Ki: double (nullable = true)
    /// ```
    pub fn tree_string(&self) -> String {
        let mut out = String::from("root\n");
        for field in &self.fields {
            out.push_str(&format!(
                " |-- {}: {} (nullable = {})\n",
                field.name, field.data_type, field.nullable
            ));
        }
        out
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tree_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Schema {
        Schema::new(vec![
            Field::new("structureId", DataType::String),
            Field::new("Ki", DataType::Double),
        ])
    }

    #[test]
    fn index_of_finds_columns_by_exact_name() {
        let schema = sample();
        assert_eq!(schema.index_of("Ki"), Some(1));
        assert_eq!(schema.index_of("ki"), None);
        assert_eq!(schema.len(), 2);
    }

    #[test]
    fn tree_string_lists_every_field() {
        assert_eq!(
            sample().tree_string(),
            "root\n |-- structureId: string (nullable = true)\n |-- Ki: double (nullable = true)\n"
        );
    }
}
