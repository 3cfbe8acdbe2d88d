//! Reading analysis input from files.

use std::fmt;
use std::fs;
use std::path::Path;

/// Extensions accepted for file input (lowercase, without the dot).
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["txt", "csv", "json"];

/// Why a file could not be used as input.
#[derive(Debug)]
pub enum FileInputError {
    /// Extension missing or not in [`ACCEPTED_EXTENSIONS`].
    Unsupported(String),
    /// The file exists but could not be read as UTF-8 text.
    Unreadable(std::io::Error),
}

impl fmt::Display for FileInputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported(name) => write!(
                f,
                "Unsupported file type: {name} (use .txt, .csv or .json)"
            ),
            Self::Unreadable(e) => write!(f, "Could not read file: {e}"),
        }
    }
}

impl std::error::Error for FileInputError {}

/// Whether `path` has one of the accepted extensions (case-insensitive).
pub fn is_accepted(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
}

/// Read the whole file as text. The content is passed through unchanged;
/// CSV and JSON are analyzed as plain text.
pub fn read_input(path: &Path) -> Result<String, FileInputError> {
    if !is_accepted(path) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        return Err(FileInputError::Unsupported(name));
    }
    fs::read_to_string(path).map_err(FileInputError::Unreadable)
}
