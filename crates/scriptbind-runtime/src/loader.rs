//! Script library lookup
//!
//! A location is tried as given when absolute, then relative to the working
//! directory, then against each directory of `SCRIPTBIND_PATH`.

use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::ScriptError;

/// Environment variable holding extra script directories
pub const SEARCH_PATH_VAR: &str = "SCRIPTBIND_PATH";

/// Directories listed in `SCRIPTBIND_PATH`, in order
pub fn search_path() -> Vec<PathBuf> {
    env::var_os(SEARCH_PATH_VAR)
        .map(|value| env::split_paths(&value).filter(|p| !p.as_os_str().is_empty()).collect())
        .unwrap_or_default()
}

/// Reads the script text stored at `location`
pub fn load_script_library(location: &str) -> Result<String, ScriptError> {
    load_from(location, &search_path())
}

fn load_from(location: &str, dirs: &[PathBuf]) -> Result<String, ScriptError> {
    let path = Path::new(location);
    let candidates: Vec<PathBuf> = if path.is_absolute() {
        vec![path.to_path_buf()]
    } else {
        std::iter::once(path.to_path_buf())
            .chain(dirs.iter().map(|dir| dir.join(path)))
            .collect()
    };

    for candidate in &candidates {
        match fs::read_to_string(candidate) {
            Ok(text) => return Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(source) => {
                return Err(ScriptError::Io {
                    path: candidate.clone(),
                    source,
                })
            }
        }
    }

    Err(ScriptError::NotFound {
        location: location.to_string(),
        searched: candidates,
    })
}
