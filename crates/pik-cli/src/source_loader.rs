use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::{map_cli_source_path, map_cli_source_read, map_cli_source_scan, CliError};

pub(crate) const DEFINITION_EXTENSION: &str = "cnv";

pub(crate) fn resolve_source_path(path: &str) -> Result<PathBuf, CliError> {
    let path = PathBuf::from(path);
    let absolute = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .map_err(map_cli_source_path)?
            .join(path)
    };

    if !absolute.exists() {
        return Err(CliError::new(
            "CLI_SOURCE_NOT_FOUND",
            format!("path does not exist: {}", absolute.display()),
        ));
    }

    Ok(absolute)
}

/// `path` itself when it is a file, otherwise every `*.cnv` file below it in
/// path order.
pub(crate) fn collect_definition_files(path: &Path) -> Result<Vec<PathBuf>, CliError> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(map_cli_source_scan)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_definition = entry
            .path()
            .extension()
            .is_some_and(|extension| extension == DEFINITION_EXTENSION);
        if is_definition {
            files.push(entry.into_path());
        }
    }

    if files.is_empty() {
        return Err(CliError::new(
            "CLI_SOURCE_EMPTY",
            format!("No .{} files under {}", DEFINITION_EXTENSION, path.display()),
        ));
    }

    Ok(files)
}

pub(crate) fn read_source(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|error| map_cli_source_read(error).in_file(path))
}
