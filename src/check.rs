//! Resolving every shader below a directory.

use std::path::{Path, PathBuf};

use crate::{error::ResolveError, resolve::Resolver};

/// Extensions of the files [`check_directory`] resolves.
pub const SHADER_EXTENSIONS: &[&str] = &[
    "glsl", "vert", "frag", "geom", "comp", "tesc", "tese", "wgsl",
];

pub fn is_shader(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| SHADER_EXTENSIONS.contains(&extension))
}

#[derive(Debug)]
pub enum CheckFailure {
    /// An entry below the directory could not be visited.
    Scan(walkdir::Error),
    /// A shader was found but its includes did not resolve.
    Resolve { path: PathBuf, error: ResolveError },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CheckSummary {
    /// Shader files that were resolved, successfully or not.
    pub checked: usize,
    /// Scan and resolve failures together.
    pub failed: usize,
}

/// Resolves every shader file below `root`, in file name order.
///
/// Failures do not stop the walk. Each one is handed to `report`; only an error returned
/// by `report` itself ends the walk early.
pub fn check_directory<E>(
    resolver: &Resolver,
    root: &Path,
    mut report: impl FnMut(CheckFailure) -> Result<(), E>,
) -> Result<CheckSummary, E> {
    let mut summary = CheckSummary::default();

    for entry in walkdir::WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let path = match entry {
            Ok(entry) => entry.into_path(),
            Err(error) => {
                summary.failed += 1;
                report(CheckFailure::Scan(error))?;
                continue;
            }
        };

        if !path.is_file() || !is_shader(&path) {
            continue;
        }

        summary.checked += 1;
        match resolver.resolve(&path) {
            Ok(resolution) => {
                let dependencies = resolution.dependencies.len();
                debug!(path = %path.display(), dependencies, "ok")
            }
            Err(error) => {
                summary.failed += 1;
                report(CheckFailure::Resolve { path, error })?;
            }
        }
    }

    Ok(summary)
}
