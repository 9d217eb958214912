use crate::core::io::traits::StructureFile;
use crate::core::models::atom::Atom;
use crate::core::models::chain::ChainType;
use crate::core::models::ids::ResidueId;
use crate::core::models::structure::Structure;
use nalgebra::Point3;
use std::io::{self, BufRead};
use thiserror::Error;
use tracing::debug;

const WATER_RESIDUE_NAMES: [&str; 3] = ["HOH", "WAT", "DOD"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdbMetadata {
    pub id_code: Option<String>,
    pub classification: Option<String>,
    /// `true` when the file holds further models after the first one.
    pub has_more_models: bool,
}

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PdbParseErrorKind,
    },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
    #[error("Line is too short for ATOM/HETATM record (must be at least 54 chars)")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn parse_int(line: &str, line_num: usize, start: usize, end: usize) -> Result<isize, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidInt {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

fn parse_float(line: &str, line_num: usize, start: usize, end: usize) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

/// Optional trailing columns default when blank or absent.
fn parse_optional_float(
    line: &str,
    line_num: usize,
    start: usize,
    end: usize,
    default: f64,
) -> Result<f64, PdbError> {
    if slice_and_trim(line, start, end).is_empty() {
        Ok(default)
    } else {
        parse_float(line, line_num, start, end)
    }
}

fn chain_type_for(record_type: &str, res_name: &str) -> ChainType {
    if record_type == "ATOM" {
        ChainType::Polymer
    } else if WATER_RESIDUE_NAMES.contains(&res_name) {
        ChainType::Water
    } else {
        ChainType::NonPolymer
    }
}

/// Reader for the fixed-column Protein Data Bank format.
///
/// Only the first model of a multi-model file is read.
pub struct PdbFile;

impl StructureFile for PdbFile {
    type Metadata = PdbMetadata;
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<(Structure, Self::Metadata), Self::Error> {
        let mut structure = Structure::default();
        let mut metadata = PdbMetadata::default();
        let mut current_residue: Option<(char, isize, Option<char>, ResidueId)> = None;
        let mut first_model_done = false;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            let record_type = slice_and_trim(&line, 0, 6);

            if first_model_done {
                if record_type == "MODEL" {
                    metadata.has_more_models = true;
                    break;
                }
                continue;
            }

            match record_type {
                "HEADER" => {
                    let classification = slice_and_trim(&line, 10, 50);
                    if !classification.is_empty() {
                        metadata.classification = Some(classification.to_string());
                    }
                    let id_code = slice_and_trim(&line, 62, 66);
                    if !id_code.is_empty() {
                        metadata.id_code = Some(id_code.to_string());
                    }
                }
                "ATOM" | "HETATM" => {
                    if line.len() < 54 {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::LineTooShort,
                        });
                    }

                    let serial = parse_int(&line, line_num, 6, 11)?;
                    let name = slice_and_trim(&line, 12, 16);
                    if name.is_empty() {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::MissingRequiredField {
                                columns: "13-16".into(),
                            },
                        });
                    }
                    let alt_loc = slice_and_trim(&line, 16, 17);
                    let res_name = slice_and_trim(&line, 17, 20);
                    let chain_id = slice_and_trim(&line, 21, 22).chars().next().unwrap_or(' ');
                    let res_seq = parse_int(&line, line_num, 22, 26)?;
                    let insertion_code = slice_and_trim(&line, 26, 27).chars().next();
                    let x = parse_float(&line, line_num, 30, 38)?;
                    let y = parse_float(&line, line_num, 38, 46)?;
                    let z = parse_float(&line, line_num, 46, 54)?;
                    let occupancy = parse_optional_float(&line, line_num, 54, 60, 1.0)?;
                    let b_factor = parse_optional_float(&line, line_num, 60, 66, 0.0)?;
                    let element = match slice_and_trim(&line, 76, 78) {
                        "" => name
                            .chars()
                            .find(|c| c.is_ascii_alphabetic())
                            .map(|c| c.to_string())
                            .unwrap_or_default(),
                        symbol => symbol.to_string(),
                    };

                    let residue_id = match current_residue {
                        Some((chain, seq, icode, id))
                            if chain == chain_id && seq == res_seq && icode == insertion_code =>
                        {
                            id
                        }
                        _ => {
                            let chain =
                                structure.add_chain(chain_id, chain_type_for(record_type, res_name));
                            let id = structure
                                .add_inserted_residue(chain, res_seq, insertion_code, res_name)
                                .ok_or_else(|| {
                                    PdbError::MissingRecord(format!("chain '{}'", chain_id))
                                })?;
                            current_residue = Some((chain_id, res_seq, insertion_code, id));
                            id
                        }
                    };

                    let mut atom = Atom::new(name, residue_id, Point3::new(x, y, z));
                    atom.serial = serial.max(0) as usize;
                    atom.alt_loc = alt_loc.to_string();
                    atom.element = element;
                    atom.occupancy = occupancy;
                    atom.b_factor = b_factor;
                    atom.is_hetero = record_type == "HETATM";
                    structure.add_atom_to_residue(residue_id, atom);
                }
                "ENDMDL" => first_model_done = true,
                "END" => break,
                _ => {}
            }
        }

        if structure.atom_count() == 0 {
            return Err(PdbError::MissingRecord("ATOM/HETATM records".into()));
        }
        if let Some(id_code) = &metadata.id_code {
            structure.set_id(id_code);
        }
        debug!(
            "Parsed PDB structure '{}' with {} atoms.",
            structure.id(),
            structure.atom_count()
        );
        Ok((structure, metadata))
    }
}
