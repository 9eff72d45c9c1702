//! Class label resolution.
//!
//! Classifier outputs are index-aligned probability vectors; turning an
//! index into a human-readable name requires an ordered label set. Labels
//! come from, in priority order:
//!
//! 1. A label file on disk, one label per line (order = class index)
//! 2. The model's own index-to-name mapping, ascending by index
//! 3. Nothing: callers substitute synthetic `class_N` names at evaluation
//!    time
//!
//! The file format skips blank lines and `#` comments and trims surrounding
//! whitespace, so label files can be annotated in place.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Error raised while reading a label file.
#[derive(Debug)]
pub enum LabelError {
    /// The label file could not be opened or read.
    Read {
        /// Path of the file that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl fmt::Display for LabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelError::Read { path, source } => {
                write!(f, "failed to read label file {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for LabelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LabelError::Read { source, .. } => Some(source),
        }
    }
}

/// Resolve an ordered label set for one classifier.
///
/// Returns the first non-empty source: the label file (if given), then the
/// model mapping, then an empty vector. A present-but-unreadable file is an
/// error rather than a silent fall-through; a deployment that ships a label
/// file expects it to be used.
pub fn resolve_labels(
    label_file: Option<&Path>,
    model_names: &BTreeMap<usize, String>,
) -> Result<Vec<String>, LabelError> {
    if let Some(path) = label_file {
        let from_file = load_label_file(path)?;
        if !from_file.is_empty() {
            return Ok(from_file);
        }
    }

    // BTreeMap iteration is ascending by index, which is exactly the
    // linearization the probability vector expects.
    let from_model: Vec<String> = model_names.values().cloned().collect();
    Ok(from_model)
}

/// Load labels from a file, one per line.
///
/// Blank lines and lines starting with `#` are skipped; each remaining
/// line is trimmed and taken verbatim as the label for the next class
/// index.
pub fn load_label_file(path: &Path) -> Result<Vec<String>, LabelError> {
    let file = File::open(path).map_err(|source| LabelError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let mut labels = Vec::new();
    for line_result in reader.lines() {
        let line = line_result.map_err(|source| LabelError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        labels.push(line.to_string());
    }

    Ok(labels)
}

/// Synthetic fallback names `class_0..class_{n-1}`.
///
/// Used whenever a resolved label set does not match a model's output
/// dimensionality at evaluation time.
pub fn synthetic_labels(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("class_{}", i)).collect()
}
