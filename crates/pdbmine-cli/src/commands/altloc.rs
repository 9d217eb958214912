use crate::cli::AltlocArgs;
use crate::error::{CliError, Result};
use pdbmine::core::filters::{
    ContainsAlternativeLocations, ContainsGroup, NotFilter, OrFilter, StructureFilter,
};
use pdbmine::core::io::pdb::PdbFile;
use pdbmine::core::io::traits::StructureFile;
use pdbmine::core::models::structure::Structure;
use pdbmine::session::{Master, Session, SessionConfig};
use std::path::PathBuf;
use tracing::{info, warn};

pub async fn run(args: AltlocArgs) -> Result<()> {
    let master: Master = args
        .master
        .parse()
        .map_err(|e| CliError::Argument(format!("{}", e)))?;

    let entries = read_structures(&args.files)?;
    let filter = build_filter(args.invert, &args.groups);

    let kept = tokio::task::block_in_place(|| {
        Session::scoped(
            SessionConfig::new(master, "pdbmine-altloc"),
            |session| -> Result<Vec<String>> {
                Ok(session.filter_structures(&entries, &filter)?)
            },
        )
    })?;

    for path in &kept {
        println!("{}", path);
    }
    println!("{} of {} structures kept.", kept.len(), entries.len());
    Ok(())
}

fn read_structures(files: &[PathBuf]) -> Result<Vec<(String, Option<Structure>)>> {
    files
        .iter()
        .map(|path| {
            info!("Reading structure from {:?}", path);
            let (structure, metadata) =
                PdbFile::read_from_path(path).map_err(|e| CliError::FileParsing {
                    path: path.clone(),
                    source: e.into(),
                })?;
            if metadata.has_more_models {
                warn!("{:?} holds several models; only the first one is inspected.", path);
            }
            Ok((path.display().to_string(), Some(structure)))
        })
        .collect()
}

fn build_filter(invert: bool, groups: &[String]) -> Box<dyn StructureFilter<Structure>> {
    let mut filter: Box<dyn StructureFilter<Structure>> = Box::new(ContainsAlternativeLocations);
    if !groups.is_empty() {
        filter = Box::new(OrFilter::new(vec![
            filter,
            Box::new(ContainsGroup::new(groups.iter().cloned())),
        ]));
    }
    if invert {
        filter = Box::new(NotFilter::new(filter));
    }
    filter
}
