use super::value::DataType;
use phf::phf_map;

/// Declared types of well-known custom report columns.
///
/// Identifier columns are strings even when every value in a particular
/// report happens to be numeric, and affinity measures are doubles even when
/// every value happens to be whole.
static KNOWN_REPORT_FIELDS: phf::Map<&'static str, DataType> = phf_map! {
    "structureId" => DataType::String,
    "chainId" => DataType::String,
    "structureChainId" => DataType::String,
    "entityId" => DataType::String,
    "ligandId" => DataType::String,
    "hetId" => DataType::String,
    "ecNo" => DataType::String,
    "uniprotAcc" => DataType::String,
    "pfamAccession" => DataType::String,
    "experimentalTechnique" => DataType::String,
    "releaseDate" => DataType::String,
    "classification" => DataType::String,
    "taxonomyId" => DataType::Integer,
    "residueCount" => DataType::Integer,
    "atomSiteCount" => DataType::Integer,
    "Ki" => DataType::Double,
    "Kd" => DataType::Double,
    "EC50" => DataType::Double,
    "IC50" => DataType::Double,
    "deltaG" => DataType::Double,
    "deltaH" => DataType::Double,
    "Ka" => DataType::Double,
    "resolution" => DataType::Double,
    "rFree" => DataType::Double,
    "rWork" => DataType::Double,
    "ligandMolecularWeight" => DataType::Double,
    "structureMolecularWeight" => DataType::Double,
};

/// Returns the declared type of a well-known report column.
pub fn known_field_type(name: &str) -> Option<DataType> {
    KNOWN_REPORT_FIELDS.get(name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affinity_and_identifier_columns_are_declared() {
        assert_eq!(known_field_type("Ki"), Some(DataType::Double));
        assert_eq!(known_field_type("ecNo"), Some(DataType::String));
        assert_eq!(known_field_type("structureId"), Some(DataType::String));
        assert_eq!(known_field_type("somethingElse"), None);
    }
}
