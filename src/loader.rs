//! Loading templates and subtemplate directories from the filesystem.

use std::fs;
use std::io;
use std::path::Path;

use globset::{Glob, GlobMatcher};
use indexmap::IndexMap;
use log::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::settings::SyntaxSettings;
use crate::template::TextTemplate;

/// Reads and parses one template file.
///
/// # Errors
/// * `Error::IoError` if the file cannot be read
/// * `Error::Syntax` if its content does not parse
pub fn load_template<P: AsRef<Path>>(path: P, settings: &SyntaxSettings) -> Result<TextTemplate> {
    let path = path.as_ref();
    debug!("Loading template from {}", path.display());
    let source = fs::read_to_string(path).map_err(Error::IoError)?;
    Ok(TextTemplate::parse_with(source, settings)?)
}

/// Loads every file under `dir` matching `pattern` as a subtemplate.
///
/// Each template is named after its path relative to `dir`, `/`-separated and
/// without the final extension: `partials/header.tpl` becomes
/// `partials/header`. Files are visited in name order so the result does not
/// depend on the filesystem.
///
/// # Errors
/// * `Error::ConfigError` if `pattern` is not a valid glob
/// * `Error::IoError` if the directory cannot be walked or a file read
/// * `Error::Syntax` if a matching file does not parse
/// * `Error::DuplicateSubtemplate` if two files map to the same name
pub fn load_subtemplates<P: AsRef<Path>>(
    dir: P,
    pattern: &str,
    settings: &SyntaxSettings,
) -> Result<IndexMap<String, TextTemplate>> {
    let dir = dir.as_ref();
    let matcher = compile_pattern(pattern)?;
    let mut templates = IndexMap::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::IoError(io::Error::from(e)))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(dir) else {
            continue;
        };
        if !matcher.is_match(relative) {
            continue;
        }

        let name = subtemplate_name(relative);
        if templates.contains_key(&name) {
            return Err(Error::DuplicateSubtemplate { name });
        }
        let template = load_template(entry.path(), settings)?;
        debug!("Loaded subtemplate '{name}'");
        templates.insert(name, template);
    }

    Ok(templates)
}

fn compile_pattern(pattern: &str) -> Result<GlobMatcher> {
    match Glob::new(pattern) {
        Ok(glob) => Ok(glob.compile_matcher()),
        Err(e) => {
            let message = format!("invalid subtemplate pattern '{pattern}': {e}");
            Err(Error::ConfigError(message))
        }
    }
}

/// `partials/header.tpl` -> `partials/header`
fn subtemplate_name(relative: &Path) -> String {
    let stem = relative.with_extension("");
    stem.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
