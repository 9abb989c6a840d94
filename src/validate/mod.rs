//! Positional-argument and filesystem preconditions.

use std::path::PathBuf;

use crate::error::LoaderError;

/// Check that exactly one positional argument was given and that it names
/// an existing directory.
///
/// Runs before any network resolution so obviously-bad invocations fail
/// cheaply.
pub fn target_directory(positionals: &[PathBuf]) -> Result<PathBuf, LoaderError> {
    let dir = match positionals {
        [] => return Err(LoaderError::Usage("Missing data directory argument".to_string())),
        [one] => one,
        _ => return Err(LoaderError::Usage("Too many arguments".to_string())),
    };

    if !dir.exists() {
        return Err(LoaderError::Validation(format!("Unknown directory: {}", dir.display())));
    }
    if !dir.is_dir() {
        return Err(LoaderError::Validation(format!("{} is not a directory", dir.display())));
    }

    Ok(dir.clone())
}
